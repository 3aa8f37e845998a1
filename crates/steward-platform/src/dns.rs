//! The DNS zone contract and hostname helpers.
//!
//! Every service owns a domain under the cluster zone; every member gets
//! a hostname there with a static IP pinned at first assignment.

use async_trait::async_trait;

use crate::container::PlatformResult;

/// Default domain for a cluster's services.
pub fn gen_default_domain_name(cluster: &str) -> String {
    format!("{cluster}-steward.local")
}

/// Fully qualified hostname of a member.
pub fn gen_dns_name(member_name: &str, domain: &str) -> String {
    format!("{member_name}.{domain}")
}

/// A DNS zone that assigns and resolves member static IPs.
#[async_trait]
pub trait DnsZone: Send + Sync {
    /// Assign a static IP for the hostname, or return the one already
    /// assigned. Assignment is stable: the same hostname always maps to
    /// the same IP for the lifetime of the zone entry.
    async fn assign_static_ip(&self, domain: &str, hostname: &str) -> PlatformResult<String>;

    /// Look up a previously assigned IP.
    async fn lookup(&self, domain: &str, hostname: &str) -> PlatformResult<Option<String>>;

    /// Remove the hostname from the zone. Returns true if it existed.
    async fn remove(&self, domain: &str, hostname: &str) -> PlatformResult<bool>;
}
