//! Request and response types of the management API.
//!
//! Field names serialize PascalCase to match the documented wire format
//! (`{"Service":{"Cluster":"c1",...},"Options":{...}}`). Every request
//! embeds the target (cluster, region) pair; the server rejects bodies
//! that do not match its own.

use serde::{Deserialize, Serialize};

use crate::service::{MemberVolume, ServiceAttr};
use crate::CatalogKind;

/// The (region, cluster, serviceName) triple every operation addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceCommonRequest {
    pub region: String,
    pub cluster: String,
    pub service_name: String,
}

/// Container resource limits and reservations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Resources {
    pub max_cpu_units: u32,
    pub reserve_cpu_units: u32,
    #[serde(rename = "MaxMemMB")]
    pub max_mem_mb: u32,
    #[serde(rename = "ReserveMemMB")]
    pub reserve_mem_mb: u32,
}

/// One config file materialized for a replica at create time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReplicaConfigFile {
    pub file_name: String,
    pub file_mode: u32,
    pub content: String,
}

/// Per-replica placement and default configs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReplicaConfig {
    pub zone: String,
    pub configs: Vec<ReplicaConfigFile>,
}

/// The normalized create request the create protocol consumes.
///
/// Catalog generators produce these; the raw `PUT /<service>` path accepts
/// them directly with `Catalog` defaulting to `general`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateServiceRequest {
    pub service: ServiceCommonRequest,
    #[serde(default = "default_catalog")]
    pub catalog: CatalogKind,
    pub resource: Resources,
    pub container_image: String,
    pub replicas: u32,
    pub port: u16,
    pub container_path: String,
    #[serde(rename = "VolumeSizeGB")]
    pub volume_size_gb: u32,
    pub replica_configs: Vec<ReplicaConfig>,
}

fn default_catalog() -> CatalogKind {
    CatalogKind::General
}

// ── Catalog create requests ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogMongoDBOptions {
    pub replicas: u32,
    #[serde(rename = "VolumeSizeGB")]
    pub volume_size_gb: u32,
    pub repl_set_name: String,
    pub admin: String,
    pub admin_passwd: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogCreateMongoDBRequest {
    pub service: ServiceCommonRequest,
    pub resource: Resources,
    pub options: CatalogMongoDBOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogPostgreSQLOptions {
    pub replicas: u32,
    #[serde(rename = "VolumeSizeGB")]
    pub volume_size_gb: u32,
    pub admin_passwd: String,
    pub replica_user: String,
    pub replica_user_passwd: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogCreatePostgreSQLRequest {
    pub service: ServiceCommonRequest,
    pub resource: Resources,
    pub options: CatalogPostgreSQLOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogCassandraOptions {
    pub replicas: u32,
    #[serde(rename = "VolumeSizeGB")]
    pub volume_size_gb: u32,
    #[serde(rename = "HeapSizeMB")]
    pub heap_size_mb: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogCreateCassandraRequest {
    pub service: ServiceCommonRequest,
    pub resource: Resources,
    pub options: CatalogCassandraOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogZooKeeperOptions {
    pub replicas: u32,
    #[serde(rename = "VolumeSizeGB")]
    pub volume_size_gb: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogCreateZooKeeperRequest {
    pub service: ServiceCommonRequest,
    pub resource: Resources,
    pub options: CatalogZooKeeperOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogKafkaOptions {
    pub replicas: u32,
    #[serde(rename = "VolumeSizeGB")]
    pub volume_size_gb: u32,
    pub retention_hours: u32,
    pub allow_topic_del: bool,
    /// Name of the ZooKeeper service the brokers coordinate through.
    pub zk_service_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogCreateKafkaRequest {
    pub service: ServiceCommonRequest,
    pub resource: Resources,
    pub options: CatalogKafkaOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogRedisOptions {
    /// Shard count; >= 3 selects cluster mode.
    pub shards: u32,
    pub replicas_per_shard: u32,
    #[serde(rename = "MemoryCacheSizeMB")]
    pub memory_cache_size_mb: u32,
    #[serde(rename = "VolumeSizeGB")]
    pub volume_size_gb: u32,
    pub auth_pass: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogCreateRedisRequest {
    pub service: ServiceCommonRequest,
    pub resource: Resources,
    pub options: CatalogRedisOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogCouchDBOptions {
    pub replicas: u32,
    #[serde(rename = "VolumeSizeGB")]
    pub volume_size_gb: u32,
    pub admin: String,
    pub admin_passwd: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogCreateCouchDBRequest {
    pub service: ServiceCommonRequest,
    pub resource: Resources,
    pub options: CatalogCouchDBOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogConsulOptions {
    pub replicas: u32,
    #[serde(rename = "VolumeSizeGB")]
    pub volume_size_gb: u32,
    pub datacenter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogCreateConsulRequest {
    pub service: ServiceCommonRequest,
    pub resource: Resources,
    pub options: CatalogConsulOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogCreateConsulResponse {
    #[serde(rename = "ConsulServerIPs")]
    pub consul_server_ips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogElasticSearchOptions {
    pub replicas: u32,
    #[serde(rename = "VolumeSizeGB")]
    pub volume_size_gb: u32,
    #[serde(rename = "HeapSizeMB")]
    pub heap_size_mb: u32,
    pub dedicated_masters: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogCreateElasticSearchRequest {
    pub service: ServiceCommonRequest,
    pub resource: Resources,
    pub options: CatalogElasticSearchOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogKibanaOptions {
    pub replicas: u32,
    #[serde(rename = "VolumeSizeGB")]
    pub volume_size_gb: u32,
    /// Name of the Elasticsearch service this Kibana fronts.
    pub es_service_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogCreateKibanaRequest {
    pub service: ServiceCommonRequest,
    pub resource: Resources,
    pub options: CatalogKibanaOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogLogstashOptions {
    pub replicas: u32,
    #[serde(rename = "VolumeSizeGB")]
    pub volume_size_gb: u32,
    #[serde(rename = "HeapSizeMB")]
    pub heap_size_mb: u32,
    /// Pipeline definition, written verbatim as the pipeline config file.
    pub pipeline_config: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogCreateLogstashRequest {
    pub service: ServiceCommonRequest,
    pub resource: Resources,
    pub options: CatalogLogstashOptions,
}

// ── Init operations ────────────────────────────────────────────────

/// Recovery poll: is the service initialized, and if not, what is the
/// init task doing right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogCheckServiceInitRequest {
    pub service: ServiceCommonRequest,
    pub service_type: CatalogKind,
    /// Credentials the resumed task needs; ignored by catalogs without auth.
    #[serde(default)]
    pub admin: String,
    #[serde(default)]
    pub admin_passwd: String,
    #[serde(default)]
    pub shards: u32,
    #[serde(default)]
    pub replicas_per_shard: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogCheckServiceInitResponse {
    pub initialized: bool,
    pub status_message: String,
}

/// Acknowledge catalog-specific init completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogSetServiceInitRequest {
    pub region: String,
    pub cluster: String,
    pub service_name: String,
    pub service_type: CatalogKind,
}

/// Cluster-mode Redis: deliver the member → node-id mapping produced by
/// the init job, triggering the rewrite-and-restart flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogSetRedisInitRequest {
    pub region: String,
    pub cluster: String,
    pub service_name: String,
    pub node_ids: Vec<String>,
}

// ── Reads ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListServiceRequest {
    pub region: String,
    pub cluster: String,
    #[serde(default)]
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListServiceResponse {
    pub services: Vec<ServiceAttr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListVolumeRequest {
    pub service: ServiceCommonRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListVolumeResponse {
    pub volumes: Vec<MemberVolume>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetServiceAttributesResponse {
    pub service: ServiceAttr,
}

/// Running/desired counts reported by the container platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRunningStatus {
    pub running_count: u32,
    pub desired_count: u32,
}

// ── Operator tasks ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnvKeyValue {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunTaskRequest {
    pub service: ServiceCommonRequest,
    pub resource: Resources,
    pub container_image: String,
    pub task_type: String,
    #[serde(default)]
    pub envkvs: Vec<EnvKeyValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunTaskResponse {
    #[serde(rename = "TaskID")]
    pub task_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetTaskStatusRequest {
    pub service: ServiceCommonRequest,
    #[serde(rename = "TaskID")]
    pub task_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskStatus {
    pub status: String,
    #[serde(default)]
    pub stopped_reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetTaskStatusResponse {
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteTaskRequest {
    pub service: ServiceCommonRequest,
    pub task_type: String,
}
