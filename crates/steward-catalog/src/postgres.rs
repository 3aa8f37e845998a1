//! PostgreSQL primary + streaming standbys.
//!
//! Member 0 is the primary; the containers decide their role from their
//! own hostname against `PRIMARY_HOST` in the member config. No
//! post-deploy protocol: the create call alone takes the service ACTIVE.

use steward_core::{
    CatalogCreatePostgreSQLRequest, CatalogKind, CatalogPostgreSQLOptions, CreateServiceRequest,
    ReplicaConfig, ReplicaConfigFile, Resources, ServiceCommonRequest,
};
use steward_platform::{gen_default_domain_name, gen_dns_name};

use crate::{member_name, zones_for_replicas, InvalidRequest, CONFIG_FILE_MODE};

pub const CONTAINER_IMAGE: &str = "steward/postgres:9.6";
pub const PORT: u16 = 5432;
pub const CONTAINER_PATH: &str = "/var/lib/postgresql/data";
pub const CONF_FILE_NAME: &str = "postgresql.conf";
pub const MEMBER_FILE_NAME: &str = "member.conf";

pub fn validate_request(req: &CatalogCreatePostgreSQLRequest) -> Result<(), InvalidRequest> {
    if req.options.replicas == 0 {
        return Err(InvalidRequest("replicas must be >= 1".to_string()));
    }
    if req.options.admin_passwd.is_empty() {
        return Err(InvalidRequest("admin password is required".to_string()));
    }
    if req.options.replicas > 1 && req.options.replica_user.is_empty() {
        return Err(InvalidRequest(
            "replica user is required for standbys".to_string(),
        ));
    }
    Ok(())
}

fn postgresql_conf() -> String {
    format!(
        "listen_addresses = '*'\nport = {PORT}\nwal_level = hot_standby\nmax_wal_senders = 5\nhot_standby = on\n"
    )
}

fn member_conf(primary_host: &str, member_host: &str, opts: &CatalogPostgreSQLOptions) -> String {
    format!(
        "PRIMARY_HOST={primary_host}\nMEMBER_HOST={member_host}\nREPLICA_USER={}\nREPLICA_PASSWORD={}\n",
        opts.replica_user, opts.replica_user_passwd
    )
}

pub fn gen_default_create_service_request(
    region: &str,
    azs: &[String],
    cluster: &str,
    service_name: &str,
    opts: &CatalogPostgreSQLOptions,
    resource: &Resources,
) -> CreateServiceRequest {
    let domain = gen_default_domain_name(cluster);
    let primary = gen_dns_name(&member_name(service_name, 0), &domain);
    let conf = postgresql_conf();

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
                        content: conf.clone(),
                    },
                    ReplicaConfigFile {
                        file_name: MEMBER_FILE_NAME.to_string(),
                        file_mode: CONFIG_FILE_MODE,
                        content: member_conf(&primary, &host, opts),
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
        catalog: CatalogKind::PostgreSQL,
        resource: *resource,
        container_image: CONTAINER_IMAGE.to_string(),
        replicas: opts.replicas,
        port: PORT,
        container_path: CONTAINER_PATH.to_string(),
        volume_size_gb: opts.volume_size_gb,
        replica_configs,
    }
}
