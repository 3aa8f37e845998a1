//! steward-core — shared types for the steward control plane.
//!
//! Holds the catalog taxonomy, the persisted domain entities, and the
//! request/response types of the management API. Every other crate in the
//! workspace builds on these; this crate stays free of I/O.

pub mod ops;
pub mod requests;
pub mod service;

pub use requests::*;
pub use service::*;

use serde::{Deserialize, Serialize};

/// System name, echoed in the `server` response header.
pub const SYSTEM_NAME: &str = "steward";

/// Task type used for post-deploy initialization jobs.
pub const TASK_TYPE_INIT: &str = "init";

/// A managed-service kind.
///
/// Each kind carries its own create-request generator and, where needed,
/// an initialization protocol. `General` covers services created through
/// the raw `CreateServiceRequest` path with no catalog semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    MongoDB,
    PostgreSQL,
    Cassandra,
    ZooKeeper,
    Kafka,
    Redis,
    CouchDB,
    Consul,
    ElasticSearch,
    Kibana,
    Logstash,
    General,
}

impl CatalogKind {
    /// Whether a create of this kind registers an init task.
    ///
    /// Redis only needs one in cluster mode; the caller decides that from
    /// the shard count and this method reports the capability only.
    pub fn may_require_init_task(self) -> bool {
        matches!(
            self,
            CatalogKind::MongoDB
                | CatalogKind::Cassandra
                | CatalogKind::CouchDB
                | CatalogKind::Redis
        )
    }

    /// Whether `SetServiceInit` accepts this kind.
    pub fn has_set_init_op(self) -> bool {
        matches!(
            self,
            CatalogKind::MongoDB | CatalogKind::Cassandra | CatalogKind::CouchDB
        )
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CatalogKind::MongoDB => "mongodb",
            CatalogKind::PostgreSQL => "postgresql",
            CatalogKind::Cassandra => "cassandra",
            CatalogKind::ZooKeeper => "zookeeper",
            CatalogKind::Kafka => "kafka",
            CatalogKind::Redis => "redis",
            CatalogKind::CouchDB => "couchdb",
            CatalogKind::Consul => "consul",
            CatalogKind::ElasticSearch => "elasticsearch",
            CatalogKind::Kibana => "kibana",
            CatalogKind::Logstash => "logstash",
            CatalogKind::General => "general",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_kind_serializes_lowercase() {
        let json = serde_json::to_string(&CatalogKind::MongoDB).unwrap();
        assert_eq!(json, "\"mongodb\"");

        let kind: CatalogKind = serde_json::from_str("\"elasticsearch\"").unwrap();
        assert_eq!(kind, CatalogKind::ElasticSearch);
    }

    #[test]
    fn init_task_capability() {
        assert!(CatalogKind::MongoDB.may_require_init_task());
        assert!(CatalogKind::Redis.may_require_init_task());
        assert!(!CatalogKind::PostgreSQL.may_require_init_task());
        assert!(!CatalogKind::Consul.may_require_init_task());
    }

    #[test]
    fn set_init_capability() {
        assert!(CatalogKind::Cassandra.has_set_init_op());
        assert!(!CatalogKind::Redis.has_set_init_op());
        assert!(!CatalogKind::General.has_set_init_op());
    }
}
