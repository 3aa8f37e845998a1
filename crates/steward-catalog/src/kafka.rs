//! Kafka brokers on an existing ZooKeeper ensemble.
//!
//! The create request is generated against the resolved attributes of the
//! ZooKeeper service the caller names; brokers are create-only.

use steward_core::{
    CatalogCreateKafkaRequest, CatalogKafkaOptions, CatalogKind, CreateServiceRequest,
    ReplicaConfig, ReplicaConfigFile, Resources, ServiceAttr, ServiceCommonRequest,
};
use steward_platform::{gen_default_domain_name, gen_dns_name};

use crate::{member_name, zones_for_replicas, zookeeper, InvalidRequest, CONFIG_FILE_MODE};

pub const CONTAINER_IMAGE: &str = "steward/kafka:1.0";
pub const PORT: u16 = 9092;
pub const CONTAINER_PATH: &str = "/kafka-logs";
pub const CONF_FILE_NAME: &str = "server.properties";

pub fn validate_request(req: &CatalogCreateKafkaRequest) -> Result<(), InvalidRequest> {
    if req.options.replicas == 0 {
        return Err(InvalidRequest("replicas must be >= 1".to_string()));
    }
    if req.options.zk_service_name.is_empty() {
        return Err(InvalidRequest(
            "a ZooKeeper service name is required".to_string(),
        ));
    }
    Ok(())
}

fn server_properties(
    broker_id: u32,
    member_host: &str,
    zk_connect: &str,
    opts: &CatalogKafkaOptions,
) -> String {
    format!(
        "broker.id={broker_id}\nlisteners=PLAINTEXT://{member_host}:{PORT}\nlog.dirs={CONTAINER_PATH}\nlog.retention.hours={}\ndelete.topic.enable={}\nzookeeper.connect={zk_connect}\n",
        opts.retention_hours, opts.allow_topic_del
    )
}

pub fn gen_default_create_service_request(
    region: &str,
    azs: &[String],
    cluster: &str,
    service_name: &str,
    opts: &CatalogKafkaOptions,
    resource: &Resources,
    zk_attr: &ServiceAttr,
) -> CreateServiceRequest {
    let domain = gen_default_domain_name(cluster);
    let zk_connect = zookeeper::connect_string(zk_attr);

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
                    content: server_properties(i as u32, &host, &zk_connect, opts),
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
        catalog: CatalogKind::Kafka,
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
    use steward_core::ServiceStatus;

    fn zk_attr() -> ServiceAttr {
        ServiceAttr {
            service_uuid: "zk-uuid".to_string(),
            service_name: "zk1".to_string(),
            cluster: "c1".to_string(),
            region: "local-1".to_string(),
            catalog: CatalogKind::ZooKeeper,
            service_status: ServiceStatus::Active,
            replicas: 3,
            domain_name: "c1-steward.local".to_string(),
            user_options: serde_json::Value::Null,
        }
    }

    #[test]
    fn brokers_reference_the_ensemble() {
        let azs = vec!["a".to_string()];
        let opts = CatalogKafkaOptions {
            replicas: 2,
            volume_size_gb: 30,
            retention_hours: 168,
            allow_topic_del: true,
            zk_service_name: "zk1".to_string(),
        };
        let req = gen_default_create_service_request(
            "local-1",
            &azs,
            "c1",
            "kafka1",
            &opts,
            &Resources::default(),
            &zk_attr(),
        );

        let first = &req.replica_configs[0].configs[0].content;
        assert!(first.contains("broker.id=0"));
        assert!(first.contains("zookeeper.connect=zk1-0.c1-steward.local:2181"));

        let second = &req.replica_configs[1].configs[0].content;
        assert!(second.contains("broker.id=1"));
        assert!(second.contains("listeners=PLAINTEXT://kafka1-1.c1-steward.local:9092"));
    }

    #[test]
    fn validation_requires_ensemble_name() {
        let req = CatalogCreateKafkaRequest {
            service: ServiceCommonRequest {
                region: "local-1".to_string(),
                cluster: "c1".to_string(),
                service_name: "kafka1".to_string(),
            },
            resource: Resources::default(),
            options: CatalogKafkaOptions {
                replicas: 3,
                volume_size_gb: 30,
                retention_hours: 168,
                allow_topic_del: false,
                zk_service_name: String::new(),
            },
        };
        assert!(validate_request(&req).is_err());
    }
}
