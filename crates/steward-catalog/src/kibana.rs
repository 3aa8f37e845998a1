//! Kibana in front of an Elasticsearch service.
//!
//! The generator takes the already-resolved Elasticsearch entry point;
//! the façade looks it up from the named service's attributes.

use steward_core::{
    CatalogCreateKibanaRequest, CatalogKibanaOptions, CatalogKind, CreateServiceRequest,
    ReplicaConfig, ReplicaConfigFile, Resources, ServiceCommonRequest,
};
use steward_platform::{gen_default_domain_name, gen_dns_name};

use crate::{elasticsearch, member_name, zones_for_replicas, InvalidRequest, CONFIG_FILE_MODE};

pub const CONTAINER_IMAGE: &str = "steward/kibana:5.6";
pub const PORT: u16 = 5601;
pub const CONTAINER_PATH: &str = "/usr/share/kibana/data";
pub const CONF_FILE_NAME: &str = "kibana.yml";

pub fn validate_request(req: &CatalogCreateKibanaRequest) -> Result<(), InvalidRequest> {
    if req.options.replicas == 0 {
        return Err(InvalidRequest("replicas must be >= 1".to_string()));
    }
    if req.options.es_service_name.is_empty() {
        return Err(InvalidRequest(
            "an Elasticsearch service name is required".to_string(),
        ));
    }
    Ok(())
}

fn kibana_yml(member_host: &str, es_node: &str) -> String {
    format!(
        "server.name: {member_host}\nserver.host: 0.0.0.0\nserver.port: {PORT}\nelasticsearch.url: http://{es_node}:{}\n",
        elasticsearch::PORT
    )
}

pub fn gen_default_create_service_request(
    region: &str,
    azs: &[String],
    cluster: &str,
    service_name: &str,
    opts: &CatalogKibanaOptions,
    resource: &Resources,
    es_node: &str,
) -> CreateServiceRequest {
    let domain = gen_default_domain_name(cluster);

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
                    content: kibana_yml(&host, es_node),
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
        catalog: CatalogKind::Kibana,
        resource: *resource,
        container_image: CONTAINER_IMAGE.to_string(),
        replicas: opts.replicas,
        port: PORT,
        container_path: CONTAINER_PATH.to_string(),
        volume_size_gb: opts.volume_size_gb,
        replica_configs,
    }
}
