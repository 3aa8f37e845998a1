//! Logstash pipeline workers.
//!
//! The caller supplies the pipeline definition verbatim; it is written as
//! its own config file next to `logstash.yml`. Create-only.

use steward_core::{
    CatalogCreateLogstashRequest, CatalogKind, CatalogLogstashOptions, CreateServiceRequest,
    ReplicaConfig, ReplicaConfigFile, Resources, ServiceCommonRequest,
};
use steward_platform::{gen_default_domain_name, gen_dns_name};

use crate::{member_name, zones_for_replicas, InvalidRequest, CONFIG_FILE_MODE};

pub const CONTAINER_IMAGE: &str = "steward/logstash:5.6";
pub const PORT: u16 = 5044;
pub const CONTAINER_PATH: &str = "/usr/share/logstash/data";
pub const CONF_FILE_NAME: &str = "logstash.yml";
pub const PIPELINE_FILE_NAME: &str = "pipeline.conf";

pub fn validate_request(req: &CatalogCreateLogstashRequest) -> Result<(), InvalidRequest> {
    if req.options.replicas == 0 {
        return Err(InvalidRequest("replicas must be >= 1".to_string()));
    }
    if req.options.pipeline_config.is_empty() {
        return Err(InvalidRequest(
            "a pipeline definition is required".to_string(),
        ));
    }
    Ok(())
}

fn logstash_yml(member_host: &str) -> String {
    format!("node.name: {member_host}\nhttp.host: 0.0.0.0\npath.data: {CONTAINER_PATH}\n")
}

pub fn gen_default_create_service_request(
    region: &str,
    azs: &[String],
    cluster: &str,
    service_name: &str,
    opts: &CatalogLogstashOptions,
    resource: &Resources,
) -> CreateServiceRequest {
    let domain = gen_default_domain_name(cluster);

    let replica_configs = zones_for_replicas(azs, opts.replicas)
        .into_iter()
        .enumerate()
        .map(|(i, zone)| {
            let host = gen_dns_name(&member_name(service_name, i as u32), &domain);
            ReplicaConfig {
                zone,
                configs: vec![
                    ReplicaConfigFile {
                        file_name: CONF_FILE_NAME.to_string(),
                        file_mode: CONFIG_FILE_MODE,
                        content: logstash_yml(&host),
                    },
                    ReplicaConfigFile {
                        file_name: PIPELINE_FILE_NAME.to_string(),
                        file_mode: CONFIG_FILE_MODE,
                        content: opts.pipeline_config.clone(),
                    },
                ],
            }
        })
        .collect();

    CreateServiceRequest {
        service: ServiceCommonRequest {
            region: region.to_string(),
            cluster: cluster.to_string(),
            service_name: service_name.to_string(),
        },
        catalog: CatalogKind::Logstash,
        resource: *resource,
        container_image: CONTAINER_IMAGE.to_string(),
        replicas: opts.replicas,
        port: PORT,
        container_path: CONTAINER_PATH.to_string(),
        volume_size_gb: opts.volume_size_gb,
        replica_configs,
    }
}
