//! Persisted domain entities.
//!
//! These are the records the metadata store keeps for each deployed
//! service: the (cluster, name) → UUID mapping, the service attributes,
//! one member record per replica, and the versioned config files the
//! members reference. All values are JSON-serialized for storage.

use serde::{Deserialize, Serialize};

use crate::CatalogKind;

/// Maps (cluster, serviceName) to the service UUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Service {
    pub cluster: String,
    pub service_name: String,
    pub service_uuid: String,
}

/// Lifecycle status of a service.
///
/// Transitions are monotonic: CREATING → INITIALIZING → ACTIVE, with
/// DELETING terminal. The store rejects backward moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    Creating,
    Initializing,
    Active,
    Deleting,
}

impl ServiceStatus {
    /// Position in the monotonic order.
    pub fn rank(self) -> u8 {
        match self {
            ServiceStatus::Creating => 0,
            ServiceStatus::Initializing => 1,
            ServiceStatus::Active => 2,
            ServiceStatus::Deleting => 3,
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ServiceStatus::Creating => "CREATING",
            ServiceStatus::Initializing => "INITIALIZING",
            ServiceStatus::Active => "ACTIVE",
            ServiceStatus::Deleting => "DELETING",
        };
        f.write_str(s)
    }
}

/// Attributes of a service, keyed by its UUID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceAttr {
    pub service_uuid: String,
    pub service_name: String,
    pub cluster: String,
    pub region: String,
    pub catalog: CatalogKind,
    pub service_status: ServiceStatus,
    pub replicas: u32,
    /// DNS domain the member hostnames live under.
    pub domain_name: String,
    /// The catalog options the service was created with, kept verbatim.
    pub user_options: serde_json::Value,
}

/// One config-file slot owned by a service member.
///
/// References a [`ConfigFile`] by id; the MD5 is duplicated here so a
/// reader can detect divergence without fetching the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MemberConfig {
    pub file_name: String,
    pub file_id: String,
    pub file_md5: String,
}

/// A data volume owned by a service member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MemberVolume {
    pub volume_id: String,
    pub size_gb: u32,
    pub device_name: String,
}

/// One replica of a service.
///
/// The static IP and availability zone are pinned at creation and never
/// change; only the config slots are mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceMember {
    pub service_uuid: String,
    pub member_name: String,
    pub availability_zone: String,
    pub static_ip: String,
    pub volumes: Vec<MemberVolume>,
    pub configs: Vec<MemberConfig>,
}

/// An immutable, versioned config file.
///
/// The file id embeds (memberName, fileName, version); updates create a
/// new file under the next version and repoint the member slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConfigFile {
    pub service_uuid: String,
    pub file_id: String,
    pub file_name: String,
    pub file_mode: u32,
    pub file_md5: String,
    pub content: String,
}
