//! Redis: single instance, master-slave, or cluster mode.
//!
//! Shard count selects the mode: one shard is a single instance or a
//! master with slaves, three or more shards run cluster mode. Cluster
//! mode needs a post-deploy protocol: the init job assembles the cluster
//! and reports the member → node-id mapping through `SetRedisInit`, which
//! writes a `cluster.info` file on every member, uncomments the auth
//! password, pins `cluster-announce-ip` to each member's static IP, and
//! restarts the replicas.

use steward_core::{
    CatalogCreateRedisRequest, CatalogKind, CatalogRedisOptions, CreateServiceRequest,
    EnvKeyValue, ReplicaConfig, ReplicaConfigFile, Resources, ServiceCommonRequest,
    TASK_TYPE_INIT,
};
use steward_platform::{create_log_config_for_stream, RunTaskOptions};

use crate::{zones_for_replicas, InvalidRequest, CONFIG_FILE_MODE};

pub const CONTAINER_IMAGE: &str = "steward/redis:4.0";
pub const INIT_CONTAINER_IMAGE: &str = "steward/redis-init:4.0";
pub const PORT: u16 = 6379;
pub const CLUSTER_BUS_PORT: u16 = 16379;
pub const CONTAINER_PATH: &str = "/data/redis";
pub const CONF_FILE_NAME: &str = "redis.conf";
pub const CLUSTER_INFO_FILE_NAME: &str = "cluster.info";

/// Minimum shard count for Redis cluster mode.
pub const MIN_CLUSTER_SHARDS: u32 = 3;

/// Whether the shard count selects cluster mode.
pub fn is_cluster_mode(shards: u32) -> bool {
    shards >= MIN_CLUSTER_SHARDS
}

/// Total member count for the topology.
pub fn member_count(shards: u32, replicas_per_shard: u32) -> u32 {
    shards * replicas_per_shard
}

/// Whether the member config slot holds the redis config file.
pub fn is_redis_conf_file(file_name: &str) -> bool {
    file_name == CONF_FILE_NAME
}

/// Whether the member config slot holds the cluster-info file.
pub fn is_cluster_info_file(file_name: &str) -> bool {
    file_name == CLUSTER_INFO_FILE_NAME
}

/// The auth password ships commented out; enabling auth uncomments it.
pub fn need_to_enable_auth(content: &str) -> bool {
    content.lines().any(|l| l.starts_with("#requirepass "))
}

pub fn enable_auth(content: &str) -> String {
    content
        .lines()
        .map(|l| match l.strip_prefix("#requirepass ") {
            Some(rest) => format!("requirepass {rest}"),
            None => l.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}

/// `cluster-announce-ip` is only needed in cluster mode and only until
/// it has been pinned once.
pub fn need_to_set_cluster_announce_ip(content: &str) -> bool {
    content.contains("cluster-enabled yes") && !content.contains("cluster-announce-ip ")
}

pub fn set_cluster_announce_ip(content: &str, static_ip: &str) -> String {
    format!("{content}cluster-announce-ip {static_ip}\n")
}

/// Content of the `cluster.info` file: the member → node-id mapping,
/// one entry per line, ordered like the members list.
pub fn create_cluster_info_content(node_ids: &[String]) -> String {
    let mut content = node_ids.join("\n");
    content.push('\n');
    content
}

pub fn validate_request(req: &CatalogCreateRedisRequest) -> Result<(), InvalidRequest> {
    let opts = &req.options;
    if opts.shards == 0 || opts.replicas_per_shard == 0 {
        return Err(InvalidRequest(
            "shards and replicas per shard must be >= 1".to_string(),
        ));
    }
    if opts.shards == 2 {
        return Err(InvalidRequest(format!(
            "cluster mode needs at least {MIN_CLUSTER_SHARDS} shards"
        )));
    }
    if opts.memory_cache_size_mb == 0 {
        return Err(InvalidRequest("memory cache size is required".to_string()));
    }
    if is_cluster_mode(opts.shards) && opts.auth_pass.is_empty() {
        return Err(InvalidRequest(
            "cluster mode requires an auth password".to_string(),
        ));
    }
    Ok(())
}

fn redis_conf(opts: &CatalogRedisOptions) -> String {
    let mut conf = format!(
        "bind 0.0.0.0\nport {PORT}\ndir {CONTAINER_PATH}\nmaxmemory {}mb\nmaxmemory-policy allkeys-lru\nappendonly yes\n",
        opts.memory_cache_size_mb
    );
    if !opts.auth_pass.is_empty() {
        conf.push_str(&format!("#requirepass {}\n", opts.auth_pass));
    }
    if is_cluster_mode(opts.shards) {
        conf.push_str(&format!(
            "cluster-enabled yes\ncluster-config-file nodes.conf\ncluster-node-timeout 15000\ncluster-announce-port {PORT}\ncluster-announce-bus-port {CLUSTER_BUS_PORT}\n"
        ));
    }
    conf
}

pub fn gen_default_create_service_request(
    region: &str,
    azs: &[String],
    cluster: &str,
    service_name: &str,
    opts: &CatalogRedisOptions,
    resource: &Resources,
) -> CreateServiceRequest {
    let replicas = member_count(opts.shards, opts.replicas_per_shard);
    let content = redis_conf(opts);

    let replica_configs = zones_for_replicas(azs, replicas)
        .into_iter()
        .map(|zone| ReplicaConfig {
            zone,
            configs: vec![ReplicaConfigFile {
                file_name: CONF_FILE_NAME.to_string(),
                file_mode: CONFIG_FILE_MODE,
                content: content.clone(),
            }],
        })
        .collect();

    CreateServiceRequest {
        service: ServiceCommonRequest {
            region: region.to_string(),
            cluster: cluster.to_string(),
            service_name: service_name.to_string(),
        },
        catalog: CatalogKind::Redis,
        resource: *resource,
        container_image: CONTAINER_IMAGE.to_string(),
        replicas,
        port: PORT,
        container_path: CONTAINER_PATH.to_string(),
        volume_size_gb: opts.volume_size_gb,
        replica_configs,
    }
}

/// Init job for cluster mode: meet the nodes, assign slots, then report
/// the node-id mapping through `SetRedisInit`.
pub fn gen_default_init_task_request(
    service: &ServiceCommonRequest,
    service_uuid: &str,
    shards: u32,
    replicas_per_shard: u32,
    manage_url: &str,
) -> RunTaskOptions {
    let envkvs = vec![
        EnvKeyValue {
            name: "REGION".to_string(),
            value: service.region.clone(),
        },
        EnvKeyValue {
            name: "CLUSTER".to_string(),
            value: service.cluster.clone(),
        },
        EnvKeyValue {
            name: "SERVICE_NAME".to_string(),
            value: service.service_name.clone(),
        },
        EnvKeyValue {
            name: "SHARDS".to_string(),
            value: shards.to_string(),
        },
        EnvKeyValue {
            name: "REPLICAS_PERSHARD".to_string(),
            value: replicas_per_shard.to_string(),
        },
        EnvKeyValue {
            name: "MANAGE_SERVER_URL".to_string(),
            value: manage_url.to_string(),
        },
        EnvKeyValue {
            name: "OP".to_string(),
            value: "SetRedisInit".to_string(),
        },
    ];

    RunTaskOptions {
        cluster: service.cluster.clone(),
        service_name: service.service_name.clone(),
        service_uuid: service_uuid.to_string(),
        container_image: INIT_CONTAINER_IMAGE.to_string(),
        resource: Resources::default(),
        task_type: TASK_TYPE_INIT.to_string(),
        envkvs,
        log_config: create_log_config_for_stream(
            &service.cluster,
            &service.service_name,
            service_uuid,
            TASK_TYPE_INIT,
        ),
    }
}
