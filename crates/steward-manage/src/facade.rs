//! CatalogService — the public operations of the control plane.
//!
//! One method per API operation. Creates run the three-substrate
//! protocol and, for catalogs with a post-deploy protocol, register an
//! init task; `check_service_init` implements the client-driven recovery
//! protocol for services found INITIALIZING with no live task.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use steward_catalog::{
    cassandra, consul, couchdb, elasticsearch, kafka, kibana, logstash, mongodb, postgres, redis,
    zookeeper,
};
use steward_core::{
    CatalogCheckServiceInitRequest, CatalogCheckServiceInitResponse, CatalogCreateCassandraRequest,
    CatalogCreateConsulRequest, CatalogCreateConsulResponse, CatalogCreateCouchDBRequest,
    CatalogCreateElasticSearchRequest, CatalogCreateKafkaRequest, CatalogCreateKibanaRequest,
    CatalogCreateLogstashRequest, CatalogCreateMongoDBRequest, CatalogCreatePostgreSQLRequest,
    CatalogCreateRedisRequest, CatalogCreateZooKeeperRequest, CatalogKind, CreateServiceRequest,
    DeleteTaskRequest, GetTaskStatusRequest, ListServiceRequest, ListVolumeRequest, MemberVolume,
    RunTaskRequest, Service, ServiceAttr, ServiceCommonRequest, ServiceRunningStatus,
    ServiceStatus, TaskStatus,
};
use steward_platform::{
    create_log_config_for_stream, gen_default_domain_name, ContainerPlatform,
    CreateServiceOptions, DnsZone, RunTaskOptions, ServerInfo,
};
use steward_state::MetaStore;

use crate::create::ServiceManager;
use crate::error::{Error, Result};
use crate::tasks::{InitTaskRunner, ServiceTask};

/// The catalog façade: create operations, the init pipeline, and the
/// read/task passthroughs, scoped to one (cluster, region).
pub struct CatalogService {
    pub(crate) cluster: String,
    pub(crate) region: String,
    pub(crate) azs: Vec<String>,
    pub(crate) manage_url: String,
    pub(crate) store: MetaStore,
    pub(crate) platform: Arc<dyn ContainerPlatform>,
    pub(crate) svc: ServiceManager,
    pub(crate) runner: InitTaskRunner,
}

impl CatalogService {
    pub fn new(
        cluster: &str,
        manage_url: &str,
        server_info: &ServerInfo,
        store: MetaStore,
        dns: Arc<dyn DnsZone>,
        platform: Arc<dyn ContainerPlatform>,
    ) -> Self {
        let svc = ServiceManager::new(store.clone(), dns);
        let runner = InitTaskRunner::new(store.clone(), Arc::clone(&platform));
        Self {
            cluster: cluster.to_string(),
            region: server_info.local_region().to_string(),
            azs: server_info.local_availability_zones().to_vec(),
            manage_url: manage_url.to_string(),
            store,
            platform,
            svc,
            runner,
        }
    }

    /// Set how often init tasks re-check the service status.
    pub fn with_task_poll_interval(mut self, interval: Duration) -> Self {
        self.runner = self.runner.with_poll_interval(interval);
        self
    }

    pub fn store(&self) -> &MetaStore {
        &self.store
    }

    pub fn runner(&self) -> &InitTaskRunner {
        &self.runner
    }

    pub fn domain(&self) -> String {
        gen_default_domain_name(&self.cluster)
    }

    /// Reject requests addressed to another cluster or region.
    pub(crate) fn check_cluster_region(&self, cluster: &str, region: &str) -> Result<()> {
        if cluster != self.cluster || region != self.region {
            return Err(Error::BadRequest(format!(
                "request for ({cluster}, {region}) on control plane ({}, {})",
                self.cluster, self.region
            )));
        }
        Ok(())
    }

    fn check_common(&self, service: &ServiceCommonRequest) -> Result<()> {
        self.check_cluster_region(&service.cluster, &service.region)
    }

    fn resolve_service(&self, service_name: &str) -> Result<Service> {
        self.store
            .get_service(&self.cluster, service_name)?
            .ok_or_else(|| Error::NotFound(format!("service {service_name}")))
    }

    fn resolve_attr(&self, service_uuid: &str) -> Result<ServiceAttr> {
        self.store
            .get_service_attr(service_uuid)?
            .ok_or_else(|| Error::NotFound(format!("service attr {service_uuid}")))
    }

    // ── Creation protocol ──────────────────────────────────────────

    /// Generic create: control-plane create plus container create. The
    /// service is left INITIALIZING; the admin flips it ACTIVE through
    /// `SetServiceInitialized`.
    pub async fn create_service(&self, req: &CreateServiceRequest) -> Result<String> {
        self.check_common(&req.service)?;
        self.create_common_service(req, serde_json::Value::Null)
            .await
    }

    async fn create_common_service(
        &self,
        req: &CreateServiceRequest,
        user_options: serde_json::Value,
    ) -> Result<String> {
        let domain = self.domain();
        let service_uuid = self.svc.create_service(req, &domain, user_options).await?;
        self.create_container_service(req, &service_uuid).await?;
        // Both substrates agree the service exists now.
        self.svc.set_service_initializing(&service_uuid)?;
        Ok(service_uuid)
    }

    async fn create_container_service(
        &self,
        req: &CreateServiceRequest,
        service_uuid: &str,
    ) -> Result<()> {
        let exist = self
            .platform
            .is_service_exist(&req.service.cluster, &req.service.service_name)
            .await?;
        if !exist {
            let opts = CreateServiceOptions {
                cluster: req.service.cluster.clone(),
                service_name: req.service.service_name.clone(),
                service_uuid: service_uuid.to_string(),
                container_image: req.container_image.clone(),
                resource: req.resource,
                container_path: req.container_path.clone(),
                port: req.port,
                replicas: req.replicas,
            };
            self.platform.create_service(&opts).await?;
        }
        Ok(())
    }

    fn options_json<T: serde::Serialize>(options: &T) -> Result<serde_json::Value> {
        serde_json::to_value(options).map_err(|e| Error::Internal(e.to_string()))
    }

    // ── Catalog creates ────────────────────────────────────────────

    pub async fn create_mongodb(&self, req: &CatalogCreateMongoDBRequest) -> Result<()> {
        self.check_common(&req.service)?;
        mongodb::validate_request(req)?;

        let cr_req = mongodb::gen_default_create_service_request(
            &self.region,
            &self.azs,
            &self.cluster,
            &req.service.service_name,
            &req.options,
            &req.resource,
        );
        let service_uuid = self
            .create_common_service(&cr_req, Self::options_json(&req.options)?)
            .await?;

        info!(service = %req.service.service_name, %service_uuid, "mongodb created, adding init task");
        self.add_mongodb_init_task(
            &cr_req.service,
            &service_uuid,
            req.options.replicas,
            &req.options.admin,
            &req.options.admin_passwd,
        )
        .await;
        Ok(())
    }

    async fn add_mongodb_init_task(
        &self,
        service: &ServiceCommonRequest,
        service_uuid: &str,
        replicas: u32,
        admin: &str,
        admin_passwd: &str,
    ) {
        let opts = mongodb::gen_default_init_task_request(
            service,
            service_uuid,
            replicas,
            &self.manage_url,
            admin,
            admin_passwd,
        );
        self.runner
            .add_init_task(ServiceTask {
                service_uuid: service_uuid.to_string(),
                service_name: service.service_name.clone(),
                kind: CatalogKind::MongoDB,
                opts,
            })
            .await;
    }

    pub async fn create_postgresql(&self, req: &CatalogCreatePostgreSQLRequest) -> Result<()> {
        self.check_common(&req.service)?;
        postgres::validate_request(req)?;

        let cr_req = postgres::gen_default_create_service_request(
            &self.region,
            &self.azs,
            &self.cluster,
            &req.service.service_name,
            &req.options,
            &req.resource,
        );
        self.create_common_service(&cr_req, Self::options_json(&req.options)?)
            .await?;

        // No post-deploy protocol; the create takes the service ACTIVE.
        self.svc
            .set_service_initialized(&self.cluster, &req.service.service_name)
    }

    pub async fn create_cassandra(&self, req: &CatalogCreateCassandraRequest) -> Result<()> {
        self.check_common(&req.service)?;
        cassandra::validate_request(req)?;

        let cr_req = cassandra::gen_default_create_service_request(
            &self.region,
            &self.azs,
            &self.cluster,
            &req.service.service_name,
            &req.options,
            &req.resource,
        );
        let service_uuid = self
            .create_common_service(&cr_req, Self::options_json(&req.options)?)
            .await?;

        info!(service = %req.service.service_name, %service_uuid, "cassandra created, adding init task");
        self.add_cassandra_init_task(&cr_req.service, &service_uuid)
            .await;
        Ok(())
    }

    async fn add_cassandra_init_task(&self, service: &ServiceCommonRequest, service_uuid: &str) {
        let opts = cassandra::gen_default_init_task_request(service, service_uuid, &self.manage_url);
        self.runner
            .add_init_task(ServiceTask {
                service_uuid: service_uuid.to_string(),
                service_name: service.service_name.clone(),
                kind: CatalogKind::Cassandra,
                opts,
            })
            .await;
    }

    pub async fn create_zookeeper(&self, req: &CatalogCreateZooKeeperRequest) -> Result<()> {
        self.check_common(&req.service)?;
        zookeeper::validate_request(req)?;

        let cr_req = zookeeper::gen_default_create_service_request(
            &self.region,
            &self.azs,
            &self.cluster,
            &req.service.service_name,
            &req.options,
            &req.resource,
        );
        self.create_common_service(&cr_req, Self::options_json(&req.options)?)
            .await?;

        self.svc
            .set_service_initialized(&self.cluster, &req.service.service_name)
    }

    pub async fn create_kafka(&self, req: &CatalogCreateKafkaRequest) -> Result<()> {
        self.check_common(&req.service)?;
        kafka::validate_request(req)?;

        // Brokers are generated against the resolved ZooKeeper ensemble.
        let zk_service = self.resolve_service(&req.options.zk_service_name)?;
        let zk_attr = self.resolve_attr(&zk_service.service_uuid)?;

        let cr_req = kafka::gen_default_create_service_request(
            &self.region,
            &self.azs,
            &self.cluster,
            &req.service.service_name,
            &req.options,
            &req.resource,
            &zk_attr,
        );
        self.create_common_service(&cr_req, Self::options_json(&req.options)?)
            .await?;

        self.svc
            .set_service_initialized(&self.cluster, &req.service.service_name)
    }

    pub async fn create_redis(&self, req: &CatalogCreateRedisRequest) -> Result<()> {
        self.check_common(&req.service)?;
        redis::validate_request(req)?;

        let cr_req = redis::gen_default_create_service_request(
            &self.region,
            &self.azs,
            &self.cluster,
            &req.service.service_name,
            &req.options,
            &req.resource,
        );
        let service_uuid = self
            .create_common_service(&cr_req, Self::options_json(&req.options)?)
            .await?;

        if redis::is_cluster_mode(req.options.shards) {
            info!(service = %req.service.service_name, %service_uuid, "cluster-mode redis created, adding init task");
            self.add_redis_init_task(
                &cr_req.service,
                &service_uuid,
                req.options.shards,
                req.options.replicas_per_shard,
            )
            .await;
            return Ok(());
        }

        // Single instance and master-slave modes need no init.
        self.svc
            .set_service_initialized(&self.cluster, &req.service.service_name)
    }

    async fn add_redis_init_task(
        &self,
        service: &ServiceCommonRequest,
        service_uuid: &str,
        shards: u32,
        replicas_per_shard: u32,
    ) {
        let opts = redis::gen_default_init_task_request(
            service,
            service_uuid,
            shards,
            replicas_per_shard,
            &self.manage_url,
        );
        self.runner
            .add_init_task(ServiceTask {
                service_uuid: service_uuid.to_string(),
                service_name: service.service_name.clone(),
                kind: CatalogKind::Redis,
                opts,
            })
            .await;
    }

    pub async fn create_couchdb(&self, req: &CatalogCreateCouchDBRequest) -> Result<()> {
        self.check_common(&req.service)?;
        couchdb::validate_request(req)?;

        let cr_req = couchdb::gen_default_create_service_request(
            &self.region,
            &self.azs,
            &self.cluster,
            &req.service.service_name,
            &req.options,
            &req.resource,
        );
        let service_uuid = self
            .create_common_service(&cr_req, Self::options_json(&req.options)?)
            .await?;

        info!(service = %req.service.service_name, %service_uuid, "couchdb created, adding init task");
        self.add_couchdb_init_task(
            &cr_req.service,
            &service_uuid,
            req.options.replicas,
            &req.options.admin,
            &req.options.admin_passwd,
        )
        .await;
        Ok(())
    }

    async fn add_couchdb_init_task(
        &self,
        service: &ServiceCommonRequest,
        service_uuid: &str,
        replicas: u32,
        admin: &str,
        admin_passwd: &str,
    ) {
        let opts = couchdb::gen_default_init_task_request(
            service,
            service_uuid,
            replicas,
            &self.manage_url,
            admin,
            admin_passwd,
        );
        self.runner
            .add_init_task(ServiceTask {
                service_uuid: service_uuid.to_string(),
                service_name: service.service_name.clone(),
                kind: CatalogKind::CouchDB,
                opts,
            })
            .await;
    }

    /// Consul create: the member-name → static-IP rewrite happens after
    /// the control-plane create and before the container create, so the
    /// servers can form a quorum before DNS serves the member names.
    /// Returns the server IPs.
    pub async fn create_consul(
        &self,
        req: &CatalogCreateConsulRequest,
    ) -> Result<CatalogCreateConsulResponse> {
        self.check_common(&req.service)?;
        consul::validate_request(req)?;

        let cr_req = consul::gen_default_create_service_request(
            &self.region,
            &self.azs,
            &self.cluster,
            &req.service.service_name,
            &req.options,
            &req.resource,
        );

        let domain = self.domain();
        let service_uuid = self
            .svc
            .create_service(&cr_req, &domain, Self::options_json(&req.options)?)
            .await?;

        let server_ips = self.update_consul_configs(&service_uuid, &domain).await?;

        self.create_container_service(&cr_req, &service_uuid).await?;
        self.svc.set_service_initializing(&service_uuid)?;

        info!(
            service = %req.service.service_name,
            %service_uuid,
            ?server_ips,
            "consul created"
        );
        self.svc
            .set_service_initialized(&self.cluster, &req.service.service_name)?;

        Ok(CatalogCreateConsulResponse {
            consul_server_ips: server_ips,
        })
    }

    pub async fn create_elasticsearch(
        &self,
        req: &CatalogCreateElasticSearchRequest,
    ) -> Result<()> {
        self.check_common(&req.service)?;
        elasticsearch::validate_request(req)?;

        let cr_req = elasticsearch::gen_default_create_service_request(
            &self.region,
            &self.azs,
            &self.cluster,
            &req.service.service_name,
            &req.options,
            &req.resource,
        );
        self.create_common_service(&cr_req, Self::options_json(&req.options)?)
            .await?;

        self.svc
            .set_service_initialized(&self.cluster, &req.service.service_name)
    }

    pub async fn create_kibana(&self, req: &CatalogCreateKibanaRequest) -> Result<()> {
        self.check_common(&req.service)?;
        kibana::validate_request(req)?;

        // Kibana fronts the named Elasticsearch service's first member.
        let es_service = self.resolve_service(&req.options.es_service_name)?;
        let es_attr = self.resolve_attr(&es_service.service_uuid)?;
        let es_node =
            elasticsearch::first_member_host(&es_attr.domain_name, &es_attr.service_name);

        let cr_req = kibana::gen_default_create_service_request(
            &self.region,
            &self.azs,
            &self.cluster,
            &req.service.service_name,
            &req.options,
            &req.resource,
            &es_node,
        );
        self.create_common_service(&cr_req, Self::options_json(&req.options)?)
            .await?;

        self.svc
            .set_service_initialized(&self.cluster, &req.service.service_name)
    }

    pub async fn create_logstash(&self, req: &CatalogCreateLogstashRequest) -> Result<()> {
        self.check_common(&req.service)?;
        logstash::validate_request(req)?;

        let cr_req = logstash::gen_default_create_service_request(
            &self.region,
            &self.azs,
            &self.cluster,
            &req.service.service_name,
            &req.options,
            &req.resource,
        );
        self.create_common_service(&cr_req, Self::options_json(&req.options)?)
            .await?;

        self.svc
            .set_service_initialized(&self.cluster, &req.service.service_name)
    }

    // ── Init status ────────────────────────────────────────────────

    /// Admin operation: flip the service ACTIVE.
    pub async fn set_service_initialized(&self, req: &ServiceCommonRequest) -> Result<()> {
        self.check_common(req)?;
        self.svc
            .set_service_initialized(&self.cluster, &req.service_name)
    }

    /// The recovery poll.
    ///
    /// Reports in-progress when a live task exists. Otherwise the stored
    /// status decides: ACTIVE means done; INITIALIZING means the control
    /// plane lost the task (process restart) and the appropriate task is
    /// re-submitted from the stored attributes plus the caller-supplied
    /// credentials; anything else is an impossible state for this call.
    pub async fn check_service_init(
        &self,
        req: &CatalogCheckServiceInitRequest,
    ) -> Result<CatalogCheckServiceInitResponse> {
        self.check_common(&req.service)?;

        let service = self.resolve_service(&req.service.service_name)?;
        let (has_task, status_message) = self.runner.has_init_task(&service.service_uuid).await;
        if has_task {
            info!(service = %req.service.service_name, "service is under initialization");
            return Ok(CatalogCheckServiceInitResponse {
                initialized: false,
                status_message,
            });
        }

        let attr = self.resolve_attr(&service.service_uuid)?;
        match attr.service_status {
            ServiceStatus::Active => Ok(CatalogCheckServiceInitResponse {
                initialized: true,
                status_message: String::new(),
            }),

            ServiceStatus::Initializing => {
                let mut initialized = false;
                match req.service_type {
                    CatalogKind::MongoDB => {
                        self.add_mongodb_init_task(
                            &req.service,
                            &attr.service_uuid,
                            attr.replicas,
                            &req.admin,
                            &req.admin_passwd,
                        )
                        .await;
                    }
                    CatalogKind::Cassandra => {
                        self.add_cassandra_init_task(&req.service, &attr.service_uuid)
                            .await;
                    }
                    CatalogKind::CouchDB => {
                        self.add_couchdb_init_task(
                            &req.service,
                            &attr.service_uuid,
                            attr.replicas,
                            &req.admin,
                            &req.admin_passwd,
                        )
                        .await;
                    }
                    CatalogKind::Redis => {
                        self.add_redis_init_task(
                            &req.service,
                            &attr.service_uuid,
                            req.shards,
                            req.replicas_per_shard,
                        )
                        .await;
                    }
                    // These have no post-deploy protocol; a lost create
                    // just needs the final flip.
                    CatalogKind::PostgreSQL | CatalogKind::ZooKeeper | CatalogKind::Kafka => {
                        self.svc
                            .set_service_initialized(&self.cluster, &req.service.service_name)?;
                        initialized = true;
                    }
                    _ => {
                        return Err(Error::BadRequest(format!(
                            "{} has no init recovery",
                            req.service_type
                        )))
                    }
                }
                Ok(CatalogCheckServiceInitResponse {
                    initialized,
                    status_message: String::new(),
                })
            }

            status => Err(Error::BadRequest(format!(
                "service {} is {status}, not initializing",
                req.service.service_name
            ))),
        }
    }

    // ── Reads ──────────────────────────────────────────────────────

    pub async fn list_services(&self, req: &ListServiceRequest) -> Result<Vec<ServiceAttr>> {
        self.check_cluster_region(&req.cluster, &req.region)?;
        let mut attrs = Vec::new();
        for service in self.store.list_services(&self.cluster)? {
            if req.prefix.is_empty() || service.service_name.starts_with(&req.prefix) {
                attrs.push(self.resolve_attr(&service.service_uuid)?);
            }
        }
        Ok(attrs)
    }

    pub async fn get_service_attrs(&self, req: &ServiceCommonRequest) -> Result<ServiceAttr> {
        self.check_common(req)?;
        let service = self.resolve_service(&req.service_name)?;
        self.resolve_attr(&service.service_uuid)
    }

    pub async fn list_volumes(&self, req: &ListVolumeRequest) -> Result<Vec<MemberVolume>> {
        self.check_common(&req.service)?;
        let service = self.resolve_service(&req.service.service_name)?;
        let volumes = self
            .store
            .list_service_members(&service.service_uuid)?
            .into_iter()
            .flat_map(|m| m.volumes)
            .collect();
        Ok(volumes)
    }

    pub async fn get_service_running_status(
        &self,
        req: &ServiceCommonRequest,
    ) -> Result<ServiceRunningStatus> {
        self.check_common(req)?;
        let status = self
            .platform
            .get_service_status(&self.cluster, &req.service_name)
            .await?;
        Ok(status)
    }

    // ── Delete ─────────────────────────────────────────────────────

    /// Tear the service down across all three substrates. Platform and
    /// DNS removals are best-effort; metadata removal is authoritative.
    pub async fn delete_service(&self, req: &ServiceCommonRequest) -> Result<()> {
        self.check_common(req)?;
        let service = self.resolve_service(&req.service_name)?;
        let service_uuid = service.service_uuid;

        if let Err(err) = self
            .store
            .set_service_status(&service_uuid, ServiceStatus::Deleting)
        {
            warn!(service = %req.service_name, error = %err, "could not mark service deleting");
        }

        if self
            .platform
            .is_service_exist(&self.cluster, &req.service_name)
            .await?
        {
            if let Err(err) = self
                .platform
                .delete_service(&self.cluster, &req.service_name)
                .await
            {
                warn!(service = %req.service_name, error = %err, "platform delete failed");
            }
        }

        let domain = self.domain();
        for member in self.store.list_service_members(&service_uuid)? {
            if let Err(err) = self.svc.dns().remove(&domain, &member.member_name).await {
                warn!(member = %member.member_name, error = %err, "dns removal failed");
            }
            for config in &member.configs {
                self.store
                    .delete_config_file(&service_uuid, &config.file_id)?;
            }
            self.store
                .delete_service_member(&service_uuid, &member.member_name)?;
        }
        // Any config files the member slots no longer referenced.
        for file in self.store.list_config_files(&service_uuid)? {
            self.store.delete_config_file(&service_uuid, &file.file_id)?;
        }

        self.store.delete_service_attr(&service_uuid)?;
        self.store.delete_service(&self.cluster, &req.service_name)?;
        info!(service = %req.service_name, %service_uuid, "service deleted");
        Ok(())
    }

    // ── Operator tasks ─────────────────────────────────────────────

    pub async fn run_task(&self, req: &RunTaskRequest) -> Result<String> {
        self.check_common(&req.service)?;
        if req.task_type.is_empty() {
            return Err(Error::BadRequest("task type is required".to_string()));
        }
        let service = self.resolve_service(&req.service.service_name)?;

        let opts = RunTaskOptions {
            cluster: req.service.cluster.clone(),
            service_name: req.service.service_name.clone(),
            service_uuid: service.service_uuid.clone(),
            container_image: req.container_image.clone(),
            resource: req.resource,
            task_type: req.task_type.clone(),
            envkvs: req.envkvs.clone(),
            log_config: create_log_config_for_stream(
                &self.cluster,
                &req.service.service_name,
                &service.service_uuid,
                &req.task_type,
            ),
        };
        let task_id = self.platform.run_task(&opts).await?;
        info!(service = %req.service.service_name, %task_id, "task started");
        Ok(task_id)
    }

    pub async fn get_task_status(&self, req: &GetTaskStatusRequest) -> Result<TaskStatus> {
        self.check_common(&req.service)?;
        if req.task_id.is_empty() {
            return Err(Error::BadRequest("task id is required".to_string()));
        }
        let status = self
            .platform
            .get_task_status(&self.cluster, &req.task_id)
            .await?;
        Ok(status)
    }

    pub async fn delete_task(&self, req: &DeleteTaskRequest) -> Result<()> {
        self.check_common(&req.service)?;
        if req.service.service_name.is_empty() || req.task_type.is_empty() {
            return Err(Error::BadRequest(
                "service name and task type are required".to_string(),
            ));
        }
        self.platform
            .delete_task(&self.cluster, &req.service.service_name, &req.task_type)
            .await?;
        Ok(())
    }
}
