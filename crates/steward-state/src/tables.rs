//! redb table definitions.
//!
//! All tables map string keys to JSON-serialized values. Composite keys
//! use `/` between cluster and service name, and `:` between a service
//! UUID and a subordinate identifier, enabling prefix scans.

use redb::TableDefinition;

/// `cluster/serviceName` → [`steward_core::Service`]
pub const SERVICES: TableDefinition<&str, &[u8]> = TableDefinition::new("services");

/// `serviceUUID` → [`steward_core::ServiceAttr`]
pub const SERVICE_ATTRS: TableDefinition<&str, &[u8]> = TableDefinition::new("service_attrs");

/// `serviceUUID:memberName` → [`steward_core::ServiceMember`]
pub const MEMBERS: TableDefinition<&str, &[u8]> = TableDefinition::new("members");

/// `serviceUUID:fileID` → [`steward_core::ConfigFile`]
pub const CONFIG_FILES: TableDefinition<&str, &[u8]> = TableDefinition::new("config_files");
