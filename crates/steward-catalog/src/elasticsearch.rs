//! Elasticsearch cluster.
//!
//! Create-only; nodes discover each other through the unicast host list.
//! Kibana resolves its backend through [`first_member_host`].

use steward_core::{
    CatalogCreateElasticSearchRequest, CatalogElasticSearchOptions, CatalogKind,
    CreateServiceRequest, ReplicaConfig, ReplicaConfigFile, Resources, ServiceCommonRequest,
};
use steward_platform::{gen_default_domain_name, gen_dns_name};

use crate::{member_hosts, member_name, zones_for_replicas, InvalidRequest, CONFIG_FILE_MODE};

pub const CONTAINER_IMAGE: &str = "steward/elasticsearch:5.6";
pub const PORT: u16 = 9200;
pub const TRANSPORT_PORT: u16 = 9300;
pub const CONTAINER_PATH: &str = "/usr/share/elasticsearch/data";
pub const CONF_FILE_NAME: &str = "elasticsearch.yml";

/// Hostname of the first member, the stable entry point other services
/// (Kibana) are pointed at.
pub fn first_member_host(domain_name: &str, service_name: &str) -> String {
    gen_dns_name(&member_name(service_name, 0), domain_name)
}

pub fn validate_request(req: &CatalogCreateElasticSearchRequest) -> Result<(), InvalidRequest> {
    let opts = &req.options;
    if opts.replicas == 0 {
        return Err(InvalidRequest("replicas must be >= 1".to_string()));
    }
    if opts.heap_size_mb == 0 {
        return Err(InvalidRequest("heap size is required".to_string()));
    }
    if opts.dedicated_masters != 0 && (opts.dedicated_masters < 3 || opts.dedicated_masters % 2 == 0)
    {
        return Err(InvalidRequest(
            "dedicated masters must be an odd count >= 3".to_string(),
        ));
    }
    Ok(())
}

fn elasticsearch_yml(service_name: &str, member_host: &str, hosts: &[String], replicas: u32) -> String {
    let unicast = hosts
        .iter()
        .map(|h| format!("\"{h}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let min_masters = replicas / 2 + 1;
    format!(
        "cluster.name: {service_name}\nnode.name: {member_host}\nnetwork.host: 0.0.0.0\nhttp.port: {PORT}\ntransport.tcp.port: {TRANSPORT_PORT}\ndiscovery.zen.ping.unicast.hosts: [{unicast}]\ndiscovery.zen.minimum_master_nodes: {min_masters}\n"
    )
}

pub fn gen_default_create_service_request(
    region: &str,
    azs: &[String],
    cluster: &str,
    service_name: &str,
    opts: &CatalogElasticSearchOptions,
    resource: &Resources,
) -> CreateServiceRequest {
    let domain = gen_default_domain_name(cluster);
    let hosts = member_hosts(&domain, service_name, opts.replicas);

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
                    content: elasticsearch_yml(service_name, &host, &hosts, opts.replicas),
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
        catalog: CatalogKind::ElasticSearch,
        resource: *resource,
        container_image: CONTAINER_IMAGE.to_string(),
        replicas: opts.replicas,
        port: PORT,
        container_path: CONTAINER_PATH.to_string(),
        volume_size_gb: opts.volume_size_gb,
        replica_configs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quorum_and_discovery_settings() {
        let azs = vec!["a".to_string()];
        let opts = CatalogElasticSearchOptions {
            replicas: 3,
            volume_size_gb: 20,
            heap_size_mb: 2048,
            dedicated_masters: 0,
        };
        let req = gen_default_create_service_request(
            "local-1",
            &azs,
            "c1",
            "es1",
            &opts,
            &Resources::default(),
        );

        let conf = &req.replica_configs[0].configs[0].content;
        assert!(conf.contains("discovery.zen.minimum_master_nodes: 2"));
        assert!(conf.contains("\"es1-2.c1-steward.local\""));
    }

    #[test]
    fn first_member_host_shape() {
        assert_eq!(
            first_member_host("c1-steward.local", "es1"),
            "es1-0.c1-steward.local"
        );
    }

    #[test]
    fn dedicated_master_validation() {
        let mut req = CatalogCreateElasticSearchRequest {
            service: ServiceCommonRequest {
                region: "local-1".to_string(),
                cluster: "c1".to_string(),
                service_name: "es1".to_string(),
            },
            resource: Resources::default(),
            options: CatalogElasticSearchOptions {
                replicas: 3,
                volume_size_gb: 20,
                heap_size_mb: 2048,
                dedicated_masters: 4,
            },
        };
        assert!(validate_request(&req).is_err());
        req.options.dedicated_masters = 3;
        assert!(validate_request(&req).is_ok());
    }
}
