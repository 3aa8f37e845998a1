//! steward-platform — contracts for the control plane's external
//! collaborators: the container platform that runs the service replicas
//! and the DNS zone that owns member hostnames and static IPs.
//!
//! The traits are the seam the rest of the workspace programs against;
//! the in-memory implementations back tests and the daemon's standalone
//! mode.

pub mod dns;
pub mod memory;

mod container;
mod info;

pub use container::{
    ContainerPlatform, CreateServiceOptions, PlatformError, PlatformResult, RunTaskOptions,
};
pub use dns::{DnsZone, gen_default_domain_name, gen_dns_name};
pub use info::{create_log_config_for_stream, LogConfig, ServerInfo};
pub use memory::{MemoryDnsZone, MemoryPlatform};
