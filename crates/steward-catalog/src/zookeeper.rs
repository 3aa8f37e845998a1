//! ZooKeeper ensemble.
//!
//! Every member shares the same `zoo.cfg` listing the whole ensemble and
//! carries its own `myid`. Create-only: the ensemble self-assembles, so
//! the create call flips the service ACTIVE.

use steward_core::{
    CatalogCreateZooKeeperRequest, CatalogKind, CatalogZooKeeperOptions, CreateServiceRequest,
    ReplicaConfig, ReplicaConfigFile, Resources, ServiceAttr, ServiceCommonRequest,
};
use steward_platform::{gen_default_domain_name, gen_dns_name};

use crate::{member_name, zones_for_replicas, InvalidRequest, CONFIG_FILE_MODE};

pub const CONTAINER_IMAGE: &str = "steward/zookeeper:3.4";
pub const PORT: u16 = 2181;
pub const PEER_PORT: u16 = 2888;
pub const ELECTION_PORT: u16 = 3888;
pub const CONTAINER_PATH: &str = "/data";
pub const CONF_FILE_NAME: &str = "zoo.cfg";
pub const MYID_FILE_NAME: &str = "myid";

pub fn validate_request(req: &CatalogCreateZooKeeperRequest) -> Result<(), InvalidRequest> {
    if req.options.replicas == 0 {
        return Err(InvalidRequest("replicas must be >= 1".to_string()));
    }
    if req.options.replicas % 2 == 0 {
        return Err(InvalidRequest(
            "an ensemble needs an odd member count".to_string(),
        ));
    }
    Ok(())
}

fn zoo_cfg(domain: &str, service_name: &str, replicas: u32) -> String {
    let mut cfg = format!(
        "tickTime=2000\ninitLimit=10\nsyncLimit=5\ndataDir={CONTAINER_PATH}\nclientPort={PORT}\n"
    );
    for i in 0..replicas {
        let host = gen_dns_name(&member_name(service_name, i), domain);
        cfg.push_str(&format!(
            "server.{}={host}:{PEER_PORT}:{ELECTION_PORT}\n",
            i + 1
        ));
    }
    cfg
}

pub fn gen_default_create_service_request(
    region: &str,
    azs: &[String],
    cluster: &str,
    service_name: &str,
    opts: &CatalogZooKeeperOptions,
    resource: &Resources,
) -> CreateServiceRequest {
    let domain = gen_default_domain_name(cluster);
    let shared = zoo_cfg(&domain, service_name, opts.replicas);

    let replica_configs = zones_for_replicas(azs, opts.replicas)
        .into_iter()
        .enumerate()
        .map(|(i, zone)| ReplicaConfig {
            zone,
            configs: vec![
                ReplicaConfigFile {
                    file_name: CONF_FILE_NAME.to_string(),
                    file_mode: CONFIG_FILE_MODE,
                    content: shared.clone(),
                },
                ReplicaConfigFile {
                    file_name: MYID_FILE_NAME.to_string(),
                    file_mode: CONFIG_FILE_MODE,
                    content: format!("{}\n", i + 1),
                },
            ],
        })
        .collect();

    CreateServiceRequest {
        service: ServiceCommonRequest {
            region: region.to_string(),
            cluster: cluster.to_string(),
            service_name: service_name.to_string(),
        },
        catalog: CatalogKind::ZooKeeper,
        resource: *resource,
        container_image: CONTAINER_IMAGE.to_string(),
        replicas: opts.replicas,
        port: PORT,
        container_path: CONTAINER_PATH.to_string(),
        volume_size_gb: opts.volume_size_gb,
        replica_configs,
    }
}

/// Client connect string of an existing ensemble, for services that
/// coordinate through it.
pub fn connect_string(attr: &ServiceAttr) -> String {
    (0..attr.replicas)
        .map(|i| {
            format!(
                "{}:{PORT}",
                gen_dns_name(&member_name(&attr.service_name, i), &attr.domain_name)
            )
        })
        .collect::<Vec<_>>()
        .join(",")
}
