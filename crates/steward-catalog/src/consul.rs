//! Consul server cluster.
//!
//! The basic config ships with member DNS names in `retry_join`; at create
//! time — after the control-plane create assigned static IPs, before the
//! container create — every member's file is rewritten to use the IPs, so
//! the servers can form a quorum before DNS is serving. The create
//! response returns the server IPs to the caller.

use std::collections::HashMap;

use steward_core::{
    CatalogConsulOptions, CatalogCreateConsulRequest, CatalogKind, CreateServiceRequest,
    ReplicaConfig, ReplicaConfigFile, Resources, ServiceCommonRequest,
};
use steward_platform::{gen_default_domain_name, gen_dns_name};

use crate::{member_hosts, member_name, zones_for_replicas, InvalidRequest, CONFIG_FILE_MODE};

pub const CONTAINER_IMAGE: &str = "steward/consul:1.0";
pub const PORT: u16 = 8500;
pub const CONTAINER_PATH: &str = "/consul/data";
pub const BASIC_CONFIG_FILE_NAME: &str = "basic_config.json";

/// Whether the member config slot holds the basic config file.
pub fn is_basic_config_file(file_name: &str) -> bool {
    file_name == BASIC_CONFIG_FILE_NAME
}

/// Replace member DNS names by their assigned static IPs.
pub fn replace_member_names(content: &str, member_ips: &HashMap<String, String>) -> String {
    let mut result = content.to_string();
    for (dns_name, ip) in member_ips {
        result = result.replace(dns_name.as_str(), ip.as_str());
    }
    result
}

pub fn validate_request(req: &CatalogCreateConsulRequest) -> Result<(), InvalidRequest> {
    if req.options.replicas == 0 {
        return Err(InvalidRequest("replicas must be >= 1".to_string()));
    }
    if req.options.replicas % 2 == 0 {
        return Err(InvalidRequest(
            "a server cluster needs an odd member count".to_string(),
        ));
    }
    Ok(())
}

fn basic_config(
    datacenter: &str,
    member_host: &str,
    all_hosts: &[String],
    bootstrap_expect: u32,
) -> String {
    let retry_join = serde_json::to_string(all_hosts).unwrap_or_default();
    format!(
        "{{\n  \"datacenter\": \"{datacenter}\",\n  \"node_name\": \"{member_host}\",\n  \"server\": true,\n  \"bootstrap_expect\": {bootstrap_expect},\n  \"retry_join\": {retry_join}\n}}\n"
    )
}

pub fn gen_default_create_service_request(
    region: &str,
    azs: &[String],
    cluster: &str,
    service_name: &str,
    opts: &CatalogConsulOptions,
    resource: &Resources,
) -> CreateServiceRequest {
    let domain = gen_default_domain_name(cluster);
    let hosts = member_hosts(&domain, service_name, opts.replicas);
    let datacenter = if opts.datacenter.is_empty() {
        region
    } else {
        opts.datacenter.as_str()
    };

    let replica_configs = zones_for_replicas(azs, opts.replicas)
        .into_iter()
        .enumerate()
        .map(|(i, zone)| {
            let host = gen_dns_name(&member_name(service_name, i as u32), &domain);
            ReplicaConfig {
                zone,
                configs: vec![ReplicaConfigFile {
                    file_name: BASIC_CONFIG_FILE_NAME.to_string(),
                    file_mode: CONFIG_FILE_MODE,
                    content: basic_config(datacenter, &host, &hosts, opts.replicas),
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
        catalog: CatalogKind::Consul,
        resource: *resource,
        container_image: CONTAINER_IMAGE.to_string(),
        replicas: opts.replicas,
        port: PORT,
        container_path: CONTAINER_PATH.to_string(),
        volume_size_gb: opts.volume_size_gb,
        replica_configs,
    }
}
