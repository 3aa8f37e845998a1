//! Per-catalog config mutators.
//!
//! All mutators share one skeleton: publish a status message, walk the
//! members locating the target config slot by file-name predicate, skip
//! members whose content already satisfies the probe, rewrite the rest
//! through the versioned update routine, then restart all containers and
//! flip the service ACTIVE. The probes make every mutator idempotent:
//! replaying one on a finished service writes no new config versions.

use std::collections::HashMap;

use tracing::{debug, info};

use steward_catalog::{consul, mongodb, redis};
use steward_core::{
    CatalogKind, CatalogSetRedisInitRequest, CatalogSetServiceInitRequest, ServiceMember,
};
use steward_platform::gen_dns_name;
use steward_state::md5_hex;

use crate::configs;
use crate::error::{Error, Result};
use crate::facade::CatalogService;

impl CatalogService {
    /// Acknowledge catalog-specific init completion.
    ///
    /// MongoDB runs the enable-auth mutator; Cassandra and CouchDB have
    /// nothing to rewrite and just flip ACTIVE.
    pub async fn set_service_init(&self, req: &CatalogSetServiceInitRequest) -> Result<()> {
        self.check_cluster_region(&req.cluster, &req.region)?;
        match req.service_type {
            CatalogKind::MongoDB => self.set_mongodb_init(req).await,
            CatalogKind::Cassandra | CatalogKind::CouchDB => {
                info!(service = %req.service_name, kind = %req.service_type, "init acknowledged");
                self.svc
                    .set_service_initialized(&self.cluster, &req.service_name)
            }
            kind => Err(Error::BadRequest(format!(
                "{kind} does not use SetServiceInit"
            ))),
        }
    }

    /// MongoDB mutator: enable auth on every member's mongod config,
    /// restart the replicas, flip ACTIVE.
    async fn set_mongodb_init(&self, req: &CatalogSetServiceInitRequest) -> Result<()> {
        let service = self
            .store
            .get_service(&self.cluster, &req.service_name)?
            .ok_or_else(|| Error::NotFound(format!("service {}", req.service_name)))?;
        let attr = self
            .store
            .get_service_attr(&service.service_uuid)?
            .ok_or_else(|| Error::NotFound(format!("service attr {}", service.service_uuid)))?;
        let members = self.store.list_service_members(&service.service_uuid)?;

        self.runner
            .update_task_status_msg(&service.service_uuid, "enable auth for MongoDB")
            .await;

        for member in members {
            if let Some(slot) = member
                .configs
                .iter()
                .position(|c| mongodb::is_mongodb_conf_file(&c.file_name))
            {
                self.enable_mongodb_auth(&member, slot)?;
            }
        }

        self.runner
            .update_task_status_msg(&service.service_uuid, "restarting all MongoDB containers")
            .await;
        self.platform
            .restart_service(&self.cluster, &req.service_name, attr.replicas)
            .await?;

        self.svc
            .set_service_initialized(&self.cluster, &req.service_name)
    }

    fn enable_mongodb_auth(&self, member: &ServiceMember, slot: usize) -> Result<()> {
        let config = &member.configs[slot];
        let file = self
            .store
            .get_config_file(&member.service_uuid, &config.file_id)?
            .ok_or_else(|| Error::Internal(format!("config file {} missing", config.file_id)))?;

        if mongodb::is_auth_enabled(&file.content) {
            debug!(member = %member.member_name, "auth already enabled, skipping");
            return Ok(());
        }

        let new_content = mongodb::enable_auth(&file.content);
        configs::update_member_config(&self.store, member, slot, &new_content)?;
        info!(member = %member.member_name, "auth enabled on mongod config");
        Ok(())
    }

    /// Cluster-mode Redis mutator: write the node-id mapping on every
    /// member, enable auth and pin `cluster-announce-ip`, restart, flip
    /// ACTIVE.
    pub async fn set_redis_init(&self, req: &CatalogSetRedisInitRequest) -> Result<()> {
        self.check_cluster_region(&req.cluster, &req.region)?;

        let service = self
            .store
            .get_service(&self.cluster, &req.service_name)?
            .ok_or_else(|| Error::NotFound(format!("service {}", req.service_name)))?;
        let attr = self
            .store
            .get_service_attr(&service.service_uuid)?
            .ok_or_else(|| Error::NotFound(format!("service attr {}", service.service_uuid)))?;
        let members = self.store.list_service_members(&service.service_uuid)?;

        if req.node_ids.len() != members.len() {
            return Err(Error::BadRequest(format!(
                "{} node ids for {} members",
                req.node_ids.len(),
                members.len()
            )));
        }

        self.runner
            .update_task_status_msg(
                &service.service_uuid,
                "create the member to Redis nodeID mapping for the Redis cluster",
            )
            .await;

        let cluster_info = redis::create_cluster_info_content(&req.node_ids);

        for member in members {
            let member = self.ensure_redis_cluster_file(member, &cluster_info)?;
            if let Some(slot) = member
                .configs
                .iter()
                .position(|c| redis::is_redis_conf_file(&c.file_name))
            {
                self.update_redis_configs(&member, slot)?;
            }
        }

        self.runner
            .update_task_status_msg(&service.service_uuid, "restarting all containers")
            .await;
        self.platform
            .restart_service(&self.cluster, &req.service_name, attr.replicas)
            .await?;

        self.svc
            .set_service_initialized(&self.cluster, &req.service_name)
    }

    /// Create the cluster-info file for the member, or verify the one a
    /// prior attempt left. Retries must carry identical node ids: an MD5
    /// mismatch means the operator fed divergent input and the task
    /// aborts.
    fn ensure_redis_cluster_file(
        &self,
        member: ServiceMember,
        cluster_info: &str,
    ) -> Result<ServiceMember> {
        for config in &member.configs {
            if redis::is_cluster_info_file(&config.file_name) {
                let checksum = md5_hex(cluster_info);
                if config.file_md5 != checksum {
                    return Err(Error::ConfigMismatch(format!(
                        "cluster info on {} has md5 {}, new mapping has {checksum}",
                        member.member_name, config.file_md5
                    )));
                }
                debug!(member = %member.member_name, "cluster info already written");
                return Ok(member);
            }
        }

        let updated = configs::append_member_config(
            &self.store,
            &member,
            redis::CLUSTER_INFO_FILE_NAME,
            0o600,
            cluster_info,
        )?;
        info!(member = %updated.member_name, "cluster info written");
        Ok(updated)
    }

    /// One combined rewrite for auth + announce-ip; both probes false is
    /// a no-op and writes no new version.
    fn update_redis_configs(&self, member: &ServiceMember, slot: usize) -> Result<()> {
        let config = &member.configs[slot];
        let file = self
            .store
            .get_config_file(&member.service_uuid, &config.file_id)?
            .ok_or_else(|| Error::Internal(format!("config file {} missing", config.file_id)))?;

        let enable_auth = redis::need_to_enable_auth(&file.content);
        let set_ip = redis::need_to_set_cluster_announce_ip(&file.content);
        if !enable_auth && !set_ip {
            debug!(member = %member.member_name, "redis config already complete, skipping");
            return Ok(());
        }

        let mut new_content = file.content.clone();
        if enable_auth {
            new_content = redis::enable_auth(&new_content);
        }
        if set_ip {
            new_content = redis::set_cluster_announce_ip(&new_content, &member.static_ip);
        }
        configs::update_member_config(&self.store, member, slot, &new_content)?;
        info!(member = %member.member_name, "redis config updated");
        Ok(())
    }

    /// Consul create-time rewrite: swap each member's DNS names for the
    /// assigned static IPs in the basic config. Returns the server IPs
    /// in member order.
    pub(crate) async fn update_consul_configs(
        &self,
        service_uuid: &str,
        domain: &str,
    ) -> Result<Vec<String>> {
        let members = self.store.list_service_members(service_uuid)?;

        let mut member_ips = HashMap::new();
        let mut server_ips = Vec::with_capacity(members.len());
        for member in &members {
            let member_dns = gen_dns_name(&member.member_name, domain);
            member_ips.insert(member_dns, member.static_ip.clone());
            server_ips.push(member.static_ip.clone());
        }

        for member in members {
            let slot = member
                .configs
                .iter()
                .position(|c| consul::is_basic_config_file(&c.file_name))
                .ok_or_else(|| {
                    Error::Internal(format!("member {} has no basic config", member.member_name))
                })?;
            let config = &member.configs[slot];
            let file = self
                .store
                .get_config_file(service_uuid, &config.file_id)?
                .ok_or_else(|| {
                    Error::Internal(format!("config file {} missing", config.file_id))
                })?;

            let new_content = consul::replace_member_names(&file.content, &member_ips);
            if new_content == file.content {
                debug!(member = %member.member_name, "ips already in place, skipping");
                continue;
            }
            configs::update_member_config(&self.store, &member, slot, &new_content)?;
        }

        info!(%service_uuid, ?server_ips, "consul configs updated with static ips");
        Ok(server_ips)
    }
}
