//! MongoDB replica set.
//!
//! Creates `Replicas` mongod members forming one replica set. Auth starts
//! disabled so the init job can configure the replica set and the admin
//! user; the enable-auth mutator then uncomments the security block and
//! the members restart into authenticated mode.

use steward_core::{
    CatalogCreateMongoDBRequest, CatalogKind, CatalogMongoDBOptions, CreateServiceRequest,
    EnvKeyValue, ReplicaConfig, ReplicaConfigFile, Resources, ServiceCommonRequest,
    TASK_TYPE_INIT,
};
use steward_platform::{
    create_log_config_for_stream, gen_default_domain_name, gen_dns_name, RunTaskOptions,
};

use crate::{member_hosts, member_name, zones_for_replicas, InvalidRequest, CONFIG_FILE_MODE};

pub const CONTAINER_IMAGE: &str = "steward/mongodb:4.0";
pub const INIT_CONTAINER_IMAGE: &str = "steward/mongodb-init:4.0";
pub const PORT: u16 = 27017;
pub const CONTAINER_PATH: &str = "/data/db";
pub const CONF_FILE_NAME: &str = "mongod.conf";

/// Whether the member config slot holds the mongod config file.
pub fn is_mongodb_conf_file(file_name: &str) -> bool {
    file_name == CONF_FILE_NAME
}

/// Whether access control is already switched on in the config content.
pub fn is_auth_enabled(content: &str) -> bool {
    content
        .lines()
        .any(|l| l.trim_start() == "authorization: enabled")
}

/// Uncomment the security block, turning access control on.
///
/// Applying this to content that already has auth enabled is the
/// caller's no-op case; the probe guards it.
pub fn enable_auth(content: &str) -> String {
    content.replace(
        "#security:\n#  authorization: enabled",
        "security:\n  authorization: enabled",
    )
}

pub fn validate_request(req: &CatalogCreateMongoDBRequest) -> Result<(), InvalidRequest> {
    if req.options.replicas == 0 {
        return Err(InvalidRequest("replicas must be >= 1".to_string()));
    }
    if req.options.replicas % 2 == 0 {
        return Err(InvalidRequest(
            "a replica set needs an odd member count".to_string(),
        ));
    }
    if req.options.admin.is_empty() || req.options.admin_passwd.is_empty() {
        return Err(InvalidRequest(
            "admin account and password are required".to_string(),
        ));
    }
    Ok(())
}

fn mongod_conf(repl_set_name: &str) -> String {
    format!(
        "storage:\n  dbPath: {CONTAINER_PATH}\n  journal:\n    enabled: true\n\nnet:\n  port: {PORT}\n  bindIp: 0.0.0.0\n\nreplication:\n  replSetName: {repl_set_name}\n\n#security:\n#  authorization: enabled\n"
    )
}

pub fn gen_default_create_service_request(
    region: &str,
    azs: &[String],
    cluster: &str,
    service_name: &str,
    opts: &CatalogMongoDBOptions,
    resource: &Resources,
) -> CreateServiceRequest {
    let repl_set_name = if opts.repl_set_name.is_empty() {
        service_name
    } else {
        opts.repl_set_name.as_str()
    };
    let content = mongod_conf(repl_set_name);

    let replica_configs = zones_for_replicas(azs, opts.replicas)
        .into_iter()
        .map(|zone| ReplicaConfig {
            zone,
            configs: vec![ReplicaConfigFile {
                file_name: CONF_FILE_NAME.to_string(),
                file_mode: CONFIG_FILE_MODE,
                content: content.clone(),
            }],
        })
        .collect();

    CreateServiceRequest {
        service: ServiceCommonRequest {
            region: region.to_string(),
            cluster: cluster.to_string(),
            service_name: service_name.to_string(),
        },
        catalog: CatalogKind::MongoDB,
        resource: *resource,
        container_image: CONTAINER_IMAGE.to_string(),
        replicas: opts.replicas,
        port: PORT,
        container_path: CONTAINER_PATH.to_string(),
        volume_size_gb: opts.volume_size_gb,
        replica_configs,
    }
}

/// Init job: initiate the replica set through the first member, create the
/// admin user, then acknowledge through `SetServiceInit`.
pub fn gen_default_init_task_request(
    service: &ServiceCommonRequest,
    service_uuid: &str,
    replicas: u32,
    manage_url: &str,
    admin: &str,
    admin_passwd: &str,
) -> RunTaskOptions {
    let domain = gen_default_domain_name(&service.cluster);
    let master = gen_dns_name(&member_name(&service.service_name, 0), &domain);
    let hosts = member_hosts(&domain, &service.service_name, replicas);

    let envkvs = vec![
        env("REGION", &service.region),
        env("CLUSTER", &service.cluster),
        env("SERVICE_NAME", &service.service_name),
        env("SERVICE_MASTER", &master),
        env("SERVICE_MEMBERS", &hosts.join(",")),
        env("ADMIN", admin),
        env("ADMIN_PASSWORD", admin_passwd),
        env("MANAGE_SERVER_URL", manage_url),
        env("OP", "SetServiceInit"),
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

fn env(name: &str, value: &str) -> EnvKeyValue {
    EnvKeyValue {
        name: name.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> CatalogMongoDBOptions {
        CatalogMongoDBOptions {
            replicas: 3,
            volume_size_gb: 10,
            repl_set_name: String::new(),
            admin: "dbadmin".to_string(),
            admin_passwd: "secret".to_string(),
        }
    }

    fn request() -> CatalogCreateMongoDBRequest {
        CatalogCreateMongoDBRequest {
            service: ServiceCommonRequest {
                region: "local-1".to_string(),
                cluster: "c1".to_string(),
                service_name: "mongo1".to_string(),
            },
            resource: Resources::default(),
            options: options(),
        }
    }

    #[test]
    fn validation_rules() {
        assert!(validate_request(&request()).is_ok());

        let mut req = request();
        req.options.replicas = 4;
        assert!(validate_request(&req).is_err());

        let mut req = request();
        req.options.admin_passwd.clear();
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn generated_request_shape() {
        let azs = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let req = gen_default_create_service_request(
            "local-1",
            &azs,
            "c1",
            "mongo1",
            &options(),
            &Resources::default(),
        );

        assert_eq!(req.catalog, CatalogKind::MongoDB);
        assert_eq!(req.replicas, 3);
        assert_eq!(req.replica_configs.len(), 3);
        assert_eq!(req.replica_configs[1].zone, "b");

        let conf = &req.replica_configs[0].configs[0];
        assert!(is_mongodb_conf_file(&conf.file_name));
        assert!(conf.content.contains("replSetName: mongo1"));
        assert!(!is_auth_enabled(&conf.content));
    }

    #[test]
    fn enable_auth_flips_the_probe() {
        let conf = mongod_conf("rs0");
        assert!(!is_auth_enabled(&conf));

        let enabled = enable_auth(&conf);
        assert!(is_auth_enabled(&enabled));

        // Idempotent: the enabled content is left untouched.
        assert_eq!(enable_auth(&enabled), enabled);
    }

    #[test]
    fn init_task_carries_credentials_and_callback() {
        let req = request();
        let opts =
            gen_default_init_task_request(&req.service, "u1", 3, "http://cp:27040", "a", "p");

        assert_eq!(opts.task_type, "init");
        assert_eq!(opts.container_image, INIT_CONTAINER_IMAGE);
        let names: Vec<&str> = opts.envkvs.iter().map(|kv| kv.name.as_str()).collect();
        assert!(names.contains(&"SERVICE_MASTER"));
        assert!(names.contains(&"ADMIN_PASSWORD"));
        assert!(names.contains(&"MANAGE_SERVER_URL"));
        let master = &opts.envkvs.iter().find(|kv| kv.name == "SERVICE_MASTER").unwrap().value;
        assert_eq!(master, "mongo1-0.c1-steward.local");
    }
}
