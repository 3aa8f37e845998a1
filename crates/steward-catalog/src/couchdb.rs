//! CouchDB cluster.
//!
//! Members carry an Erlang node name and the admin account. The init job
//! joins the nodes into one cluster and acknowledges through
//! `SetServiceInit`, which flips the service ACTIVE.

use steward_core::{
    CatalogCouchDBOptions, CatalogCreateCouchDBRequest, CatalogKind, CreateServiceRequest,
    EnvKeyValue, ReplicaConfig, ReplicaConfigFile, Resources, ServiceCommonRequest,
    TASK_TYPE_INIT,
};
use steward_platform::{
    create_log_config_for_stream, gen_default_domain_name, gen_dns_name, RunTaskOptions,
};

use crate::{member_name, zones_for_replicas, InvalidRequest, CONFIG_FILE_MODE};

pub const CONTAINER_IMAGE: &str = "steward/couchdb:2.1";
pub const INIT_CONTAINER_IMAGE: &str = "steward/couchdb-init:2.1";
pub const PORT: u16 = 5984;
pub const CONTAINER_PATH: &str = "/opt/couchdb/data";
pub const CONF_FILE_NAME: &str = "local.ini";
pub const VMARGS_FILE_NAME: &str = "vm.args";

pub fn validate_request(req: &CatalogCreateCouchDBRequest) -> Result<(), InvalidRequest> {
    if req.options.replicas == 0 {
        return Err(InvalidRequest("replicas must be >= 1".to_string()));
    }
    if req.options.admin.is_empty() || req.options.admin_passwd.is_empty() {
        return Err(InvalidRequest(
            "admin account and password are required".to_string(),
        ));
    }
    Ok(())
}

fn local_ini(opts: &CatalogCouchDBOptions) -> String {
    format!(
        "[chttpd]\nport = {PORT}\nbind_address = 0.0.0.0\n\n[admins]\n{} = {}\n",
        opts.admin, opts.admin_passwd
    )
}

fn vm_args(member_host: &str) -> String {
    format!("-name couchdb@{member_host}\n-setcookie steward\n")
}

pub fn gen_default_create_service_request(
    region: &str,
    azs: &[String],
    cluster: &str,
    service_name: &str,
    opts: &CatalogCouchDBOptions,
    resource: &Resources,
) -> CreateServiceRequest {
    let domain = gen_default_domain_name(cluster);
    let ini = local_ini(opts);

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
                        content: ini.clone(),
                    },
                    ReplicaConfigFile {
                        file_name: VMARGS_FILE_NAME.to_string(),
                        file_mode: CONFIG_FILE_MODE,
                        content: vm_args(&host),
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
        catalog: CatalogKind::CouchDB,
        resource: *resource,
        container_image: CONTAINER_IMAGE.to_string(),
        replicas: opts.replicas,
        port: PORT,
        container_path: CONTAINER_PATH.to_string(),
        volume_size_gb: opts.volume_size_gb,
        replica_configs,
    }
}

/// Init job: join the nodes, then call back `SetServiceInit`.
pub fn gen_default_init_task_request(
    service: &ServiceCommonRequest,
    service_uuid: &str,
    replicas: u32,
    manage_url: &str,
    admin: &str,
    admin_passwd: &str,
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
            name: "REPLICAS".to_string(),
            value: replicas.to_string(),
        },
        EnvKeyValue {
            name: "ADMIN".to_string(),
            value: admin.to_string(),
        },
        EnvKeyValue {
            name: "ADMIN_PASSWORD".to_string(),
            value: admin_passwd.to_string(),
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
