//! The control-plane side of the creation protocol.
//!
//! Persists the service record, the attributes, and one member per
//! replica with its static IP, availability zone, data volume, and
//! default config files. Every write is keyed by a derived identifier,
//! so replaying the whole sequence is safe; a service that already
//! exists with different parameters fails with `ServiceExists`.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use steward_catalog::member_name;
use steward_core::{
    CreateServiceRequest, MemberConfig, MemberVolume, Service, ServiceAttr, ServiceMember,
    ServiceStatus,
};
use steward_platform::{gen_dns_name, DnsZone};
use steward_state::{gen_member_config_file_id, MetaStore};

use crate::error::{Error, Result};

/// Device the data volume is attached on.
const DATA_DEVICE_NAME: &str = "/dev/xvdf";

/// Creates and resolves services in the metadata store and the DNS zone.
#[derive(Clone)]
pub struct ServiceManager {
    store: MetaStore,
    dns: Arc<dyn DnsZone>,
}

impl ServiceManager {
    pub fn new(store: MetaStore, dns: Arc<dyn DnsZone>) -> Self {
        Self { store, dns }
    }

    pub fn store(&self) -> &MetaStore {
        &self.store
    }

    pub(crate) fn dns(&self) -> &Arc<dyn DnsZone> {
        &self.dns
    }

    /// Run the control-plane create: service record, attributes with
    /// status CREATING, members with static IPs and default configs.
    /// Returns the service UUID.
    pub async fn create_service(
        &self,
        req: &CreateServiceRequest,
        domain: &str,
        user_options: serde_json::Value,
    ) -> Result<String> {
        let service = &req.service;
        if req.replica_configs.len() != req.replicas as usize {
            return Err(Error::BadRequest(format!(
                "{} replica configs for {} replicas",
                req.replica_configs.len(),
                req.replicas
            )));
        }

        // Reuse the UUID when the service record already exists.
        let record = Service {
            cluster: service.cluster.clone(),
            service_name: service.service_name.clone(),
            service_uuid: Uuid::new_v4().to_string(),
        };
        let record = self.store.create_service(&record)?;
        let service_uuid = record.service_uuid.clone();

        let attr = ServiceAttr {
            service_uuid: service_uuid.clone(),
            service_name: service.service_name.clone(),
            cluster: service.cluster.clone(),
            region: service.region.clone(),
            catalog: req.catalog,
            service_status: ServiceStatus::Creating,
            replicas: req.replicas,
            domain_name: domain.to_string(),
            user_options,
        };
        let stored_attr = self.store.create_service_attr(&attr)?;
        if stored_attr.replicas != req.replicas || stored_attr.catalog != req.catalog {
            return Err(Error::ServiceExists(format!(
                "service {} exists as {} with {} replicas",
                service.service_name, stored_attr.catalog, stored_attr.replicas
            )));
        }

        for (index, replica) in req.replica_configs.iter().enumerate() {
            let member_name = member_name(&service.service_name, index as u32);
            let static_ip = self.dns.assign_static_ip(domain, &member_name).await?;

            let mut configs = Vec::with_capacity(replica.configs.len());
            for file in &replica.configs {
                let file_id = gen_member_config_file_id(&member_name, &file.file_name, 0);
                let stored = self.store.create_config_file(
                    &service_uuid,
                    &file_id,
                    &file.file_name,
                    file.file_mode,
                    &file.content,
                )?;
                configs.push(MemberConfig {
                    file_name: stored.file_name,
                    file_id: stored.file_id,
                    file_md5: stored.file_md5,
                });
            }

            let member = ServiceMember {
                service_uuid: service_uuid.clone(),
                member_name: member_name.clone(),
                availability_zone: replica.zone.clone(),
                static_ip,
                volumes: vec![MemberVolume {
                    volume_id: format!("{service_uuid}-{member_name}-data"),
                    size_gb: req.volume_size_gb,
                    device_name: DATA_DEVICE_NAME.to_string(),
                }],
                configs,
            };
            self.store.create_service_member(&member)?;
            debug!(
                member = %member.member_name,
                host = %gen_dns_name(&member.member_name, domain),
                "member persisted"
            );
        }

        info!(
            service = %service.service_name,
            %service_uuid,
            replicas = req.replicas,
            "control-plane create done"
        );
        Ok(service_uuid)
    }

    /// Flip a freshly created service to INITIALIZING once both the
    /// metadata and the container platform agree it exists. Replays that
    /// find the service further along leave it untouched.
    pub fn set_service_initializing(&self, service_uuid: &str) -> Result<()> {
        let attr = self
            .store
            .get_service_attr(service_uuid)?
            .ok_or_else(|| Error::NotFound(format!("service attr {service_uuid}")))?;
        if attr.service_status == ServiceStatus::Creating {
            self.store
                .set_service_status(service_uuid, ServiceStatus::Initializing)?;
        }
        Ok(())
    }

    /// Mark a service ACTIVE.
    pub fn set_service_initialized(&self, cluster: &str, service_name: &str) -> Result<()> {
        let service = self
            .store
            .get_service(cluster, service_name)?
            .ok_or_else(|| Error::NotFound(format!("service {service_name}")))?;
        self.store
            .set_service_status(&service.service_uuid, ServiceStatus::Active)?;
        info!(service = %service_name, "service initialized");
        Ok(())
    }
}
