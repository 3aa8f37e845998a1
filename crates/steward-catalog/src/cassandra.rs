//! Cassandra ring.
//!
//! The first members act as seeds. The init job waits for the ring to
//! form and adjusts system keyspaces, then acknowledges through
//! `SetServiceInit`, which flips the service ACTIVE without any config
//! rewrite.

use steward_core::{
    CatalogCassandraOptions, CatalogCreateCassandraRequest, CatalogKind, CreateServiceRequest,
    EnvKeyValue, ReplicaConfig, ReplicaConfigFile, Resources, ServiceCommonRequest,
    TASK_TYPE_INIT,
};
use steward_platform::{
    create_log_config_for_stream, gen_default_domain_name, gen_dns_name, RunTaskOptions,
};

use crate::{member_name, zones_for_replicas, InvalidRequest, CONFIG_FILE_MODE};

pub const CONTAINER_IMAGE: &str = "steward/cassandra:3.11";
pub const INIT_CONTAINER_IMAGE: &str = "steward/cassandra-init:3.11";
pub const PORT: u16 = 9042;
pub const CONTAINER_PATH: &str = "/var/lib/cassandra";
pub const CONF_FILE_NAME: &str = "cassandra.yaml";

/// How many members act as gossip seeds.
const MAX_SEEDS: u32 = 3;

pub fn validate_request(req: &CatalogCreateCassandraRequest) -> Result<(), InvalidRequest> {
    if req.options.replicas == 0 {
        return Err(InvalidRequest("replicas must be >= 1".to_string()));
    }
    if req.options.heap_size_mb == 0 {
        return Err(InvalidRequest("heap size is required".to_string()));
    }
    Ok(())
}

fn cassandra_yaml(cluster_name: &str, member_host: &str, seeds: &[String]) -> String {
    format!(
        "cluster_name: '{cluster_name}'\nlisten_address: {member_host}\nrpc_address: 0.0.0.0\nbroadcast_rpc_address: {member_host}\nseed_provider:\n  - class_name: org.apache.cassandra.locator.SimpleSeedProvider\n    parameters:\n      - seeds: \"{}\"\nendpoint_snitch: GossipingPropertyFileSnitch\n",
        seeds.join(",")
    )
}

pub fn gen_default_create_service_request(
    region: &str,
    azs: &[String],
    cluster: &str,
    service_name: &str,
    opts: &CatalogCassandraOptions,
    resource: &Resources,
) -> CreateServiceRequest {
    let domain = gen_default_domain_name(cluster);
    let seed_count = opts.replicas.min(MAX_SEEDS);
    let seeds: Vec<String> = (0..seed_count)
        .map(|i| gen_dns_name(&member_name(service_name, i), &domain))
        .collect();

    let replica_configs = zones_for_replicas(azs, opts.replicas)
        .into_iter()
        .enumerate()
        .map(|(i, zone)| {
            let host = gen_dns_name(&member_name(service_name, i as u32), &domain);
            ReplicaConfig {
                zone,
                configs: vec![ReplicaConfigFile {
                    file_name: CONF_FILE_NAME.to_string(),
                    file_mode: CONFIG_FILE_MODE,
                    content: cassandra_yaml(service_name, &host, &seeds),
                }],
            }
        })
        .collect();

    CreateServiceRequest {
        service: ServiceCommonRequest {
            region: region.to_string(),
            cluster: cluster.to_string(),
            service_name: service_name.to_string(),
        },
        catalog: CatalogKind::Cassandra,
        resource: *resource,
        container_image: CONTAINER_IMAGE.to_string(),
        replicas: opts.replicas,
        port: PORT,
        container_path: CONTAINER_PATH.to_string(),
        volume_size_gb: opts.volume_size_gb,
        replica_configs,
    }
}

/// Init job: wait for the ring, then call back `SetServiceInit`.
pub fn gen_default_init_task_request(
    service: &ServiceCommonRequest,
    service_uuid: &str,
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
            name: "MANAGE_SERVER_URL".to_string(),
            value: manage_url.to_string(),
        },
        EnvKeyValue {
            name: "OP".to_string(),
            value: "SetServiceInit".to_string(),
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
