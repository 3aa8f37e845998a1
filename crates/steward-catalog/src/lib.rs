//! steward-catalog — per-kind knowledge of the managed services.
//!
//! One module per catalog kind. Each provides a default create-request
//! generator and a request validator; kinds with a post-deploy protocol
//! additionally provide an init-task generator and the pure content
//! probes/transforms the config mutators apply.
//!
//! Everything here is pure: no I/O, no store access. Cross-service
//! references (Kafka → ZooKeeper, Kibana → Elasticsearch) arrive as
//! already-resolved attribute records.

pub mod cassandra;
pub mod consul;
pub mod couchdb;
pub mod elasticsearch;
pub mod kafka;
pub mod kibana;
pub mod logstash;
pub mod mongodb;
pub mod postgres;
pub mod redis;
pub mod zookeeper;

use thiserror::Error;

use steward_platform::gen_dns_name;

/// A create request that fails catalog validation.
#[derive(Debug, Error)]
#[error("invalid request: {0}")]
pub struct InvalidRequest(pub String);

/// Name of the replica at the given index.
pub fn member_name(service_name: &str, index: u32) -> String {
    format!("{service_name}-{index}")
}

/// Hostnames of all replicas under the service domain.
pub fn member_hosts(domain: &str, service_name: &str, replicas: u32) -> Vec<String> {
    (0..replicas)
        .map(|i| gen_dns_name(&member_name(service_name, i), domain))
        .collect()
}

/// Round-robin the configured availability zones across replicas.
pub(crate) fn zones_for_replicas(azs: &[String], replicas: u32) -> Vec<String> {
    (0..replicas as usize)
        .map(|i| azs[i % azs.len()].clone())
        .collect()
}

/// Default mode for generated config files.
pub(crate) const CONFIG_FILE_MODE: u32 = 0o600;
