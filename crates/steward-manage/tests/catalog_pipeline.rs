//! End-to-end pipeline tests against in-memory collaborators: catalog
//! creates across all three substrates, the init mutators, and the
//! client-driven recovery protocol.

use std::sync::Arc;
use std::time::Duration;

use steward_catalog::{postgres, redis};
use steward_core::*;
use steward_manage::CatalogService;
use steward_platform::ContainerPlatform;
use steward_platform::{MemoryDnsZone, MemoryPlatform, ServerInfo};
use steward_state::{md5_hex, MetaStore};

const CLUSTER: &str = "c1";
const REGION: &str = "local-1";
const MANAGE_URL: &str = "http://127.0.0.1:27040";

struct Fixture {
    store: MetaStore,
    dns: Arc<MemoryDnsZone>,
    platform: Arc<MemoryPlatform>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            store: MetaStore::open_in_memory().unwrap(),
            dns: Arc::new(MemoryDnsZone::new()),
            platform: Arc::new(MemoryPlatform::new()),
        }
    }

    /// Build a façade over the fixture's substrates. Calling this twice
    /// models a control-plane restart: fresh task board, same state.
    fn catalog_service(&self) -> CatalogService {
        let info = ServerInfo::new(
            REGION,
            "vpc-1",
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        );
        CatalogService::new(
            CLUSTER,
            MANAGE_URL,
            &info,
            self.store.clone(),
            self.dns.clone(),
            self.platform.clone(),
        )
        .with_task_poll_interval(Duration::from_millis(10))
    }
}

fn common(service_name: &str) -> ServiceCommonRequest {
    ServiceCommonRequest {
        region: REGION.to_string(),
        cluster: CLUSTER.to_string(),
        service_name: service_name.to_string(),
    }
}

fn mongodb_request(name: &str) -> CatalogCreateMongoDBRequest {
    CatalogCreateMongoDBRequest {
        service: common(name),
        resource: Resources::default(),
        options: CatalogMongoDBOptions {
            replicas: 3,
            volume_size_gb: 10,
            repl_set_name: String::new(),
            admin: "dbadmin".to_string(),
            admin_passwd: "secret".to_string(),
        },
    }
}

fn redis_cluster_request(name: &str) -> CatalogCreateRedisRequest {
    CatalogCreateRedisRequest {
        service: common(name),
        resource: Resources::default(),
        options: CatalogRedisOptions {
            shards: 3,
            replicas_per_shard: 2,
            memory_cache_size_mb: 256,
            volume_size_gb: 10,
            auth_pass: "redispass".to_string(),
        },
    }
}

async fn wait_for_no_task(svc: &CatalogService, service_uuid: &str) {
    for _ in 0..200 {
        if !svc.runner().has_init_task(service_uuid).await.0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("init task for {service_uuid} never finished");
}

fn service_uuid(fix: &Fixture, name: &str) -> String {
    fix.store
        .get_service(CLUSTER, name)
        .unwrap()
        .unwrap()
        .service_uuid
}

fn attr(fix: &Fixture, name: &str) -> ServiceAttr {
    let uuid = service_uuid(fix, name);
    fix.store.get_service_attr(&uuid).unwrap().unwrap()
}

// ── Create-only catalogs ───────────────────────────────────────────

#[tokio::test]
async fn postgres_create_is_immediately_active() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    let req = CatalogCreatePostgreSQLRequest {
        service: common("pg1"),
        resource: Resources::default(),
        options: CatalogPostgreSQLOptions {
            replicas: 3,
            volume_size_gb: 20,
            admin_passwd: "pw".to_string(),
            replica_user: "repl".to_string(),
            replica_user_passwd: "rp".to_string(),
        },
    };
    svc.create_postgresql(&req).await.unwrap();

    let attr = attr(&fix, "pg1");
    assert_eq!(attr.service_status, ServiceStatus::Active);
    assert_eq!(attr.replicas, 3);

    // No init task was registered.
    assert_eq!(svc.runner().task_count().await, 0);

    // All three substrates hold the service.
    let uuid = service_uuid(&fix, "pg1");
    assert_eq!(fix.store.list_service_members(&uuid).unwrap().len(), 3);
    assert_eq!(fix.platform.restart_count(CLUSTER, "pg1"), 0);
}

#[tokio::test]
async fn kafka_resolves_its_zookeeper_ensemble() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    let kafka_req = CatalogCreateKafkaRequest {
        service: common("kafka1"),
        resource: Resources::default(),
        options: CatalogKafkaOptions {
            replicas: 3,
            volume_size_gb: 30,
            retention_hours: 168,
            allow_topic_del: false,
            zk_service_name: "zk1".to_string(),
        },
    };
    // Without the ensemble the create fails.
    let err = svc.create_kafka(&kafka_req).await.unwrap_err();
    assert_eq!(err.http_status(), 404);

    svc.create_zookeeper(&CatalogCreateZooKeeperRequest {
        service: common("zk1"),
        resource: Resources::default(),
        options: CatalogZooKeeperOptions {
            replicas: 3,
            volume_size_gb: 5,
        },
    })
    .await
    .unwrap();

    svc.create_kafka(&kafka_req).await.unwrap();
    assert_eq!(attr(&fix, "kafka1").service_status, ServiceStatus::Active);

    // Broker configs reference the resolved ensemble.
    let uuid = service_uuid(&fix, "kafka1");
    let member = &fix.store.list_service_members(&uuid).unwrap()[0];
    let file = fix
        .store
        .get_config_file(&uuid, &member.configs[0].file_id)
        .unwrap()
        .unwrap();
    assert!(file.content.contains("zookeeper.connect=zk1-0.c1-steward.local:2181"));
}

#[tokio::test]
async fn consul_create_returns_server_ips() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    let resp = svc
        .create_consul(&CatalogCreateConsulRequest {
            service: common("consul1"),
            resource: Resources::default(),
            options: CatalogConsulOptions {
                replicas: 3,
                volume_size_gb: 5,
                datacenter: String::new(),
            },
        })
        .await
        .unwrap();

    assert_eq!(resp.consul_server_ips.len(), 3);
    assert_eq!(attr(&fix, "consul1").service_status, ServiceStatus::Active);

    // Each member's basic config carries IPs instead of member DNS names.
    let uuid = service_uuid(&fix, "consul1");
    let members = fix.store.list_service_members(&uuid).unwrap();
    for (i, member) in members.iter().enumerate() {
        assert_eq!(member.static_ip, resp.consul_server_ips[i]);
        let file = fix
            .store
            .get_config_file(&uuid, &member.configs[0].file_id)
            .unwrap()
            .unwrap();
        assert!(!file.content.contains("c1-steward.local"));
        for ip in &resp.consul_server_ips {
            assert!(file.content.contains(ip.as_str()));
        }
        // The rewrite bumped the file to version 1.
        assert!(member.configs[0].file_id.ends_with("-v1"));
    }
}

// ── MongoDB init pipeline ──────────────────────────────────────────

#[tokio::test]
async fn mongodb_create_runs_the_init_pipeline() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    svc.create_mongodb(&mongodb_request("mongo1")).await.unwrap();

    let uuid = service_uuid(&fix, "mongo1");
    assert_eq!(attr(&fix, "mongo1").service_status, ServiceStatus::Initializing);

    // The init task is live and the recovery poll reports in-progress.
    let (has, _) = svc.runner().has_init_task(&uuid).await;
    assert!(has);
    let check = svc
        .check_service_init(&CatalogCheckServiceInitRequest {
            service: common("mongo1"),
            service_type: CatalogKind::MongoDB,
            admin: "dbadmin".to_string(),
            admin_passwd: "secret".to_string(),
            shards: 0,
            replicas_per_shard: 0,
        })
        .await
        .unwrap();
    assert!(!check.initialized);

    // The init job acknowledges through SetServiceInit: auth is enabled
    // member by member, then the containers restart and the service
    // turns ACTIVE.
    svc.set_service_init(&CatalogSetServiceInitRequest {
        region: REGION.to_string(),
        cluster: CLUSTER.to_string(),
        service_name: "mongo1".to_string(),
        service_type: CatalogKind::MongoDB,
    })
    .await
    .unwrap();

    assert_eq!(attr(&fix, "mongo1").service_status, ServiceStatus::Active);
    assert_eq!(fix.platform.restart_count(CLUSTER, "mongo1"), 1);

    for member in fix.store.list_service_members(&uuid).unwrap() {
        assert!(member.configs[0].file_id.ends_with("mongod.conf-v1"));
        let file = fix
            .store
            .get_config_file(&uuid, &member.configs[0].file_id)
            .unwrap()
            .unwrap();
        assert!(file.content.contains("security:\n  authorization: enabled"));
    }

    // The runner observes ACTIVE, cleans up, and the poll flips true.
    wait_for_no_task(&svc, &uuid).await;
    let check = svc
        .check_service_init(&CatalogCheckServiceInitRequest {
            service: common("mongo1"),
            service_type: CatalogKind::MongoDB,
            admin: "dbadmin".to_string(),
            admin_passwd: "secret".to_string(),
            shards: 0,
            replicas_per_shard: 0,
        })
        .await
        .unwrap();
    assert!(check.initialized);
    assert!(check.status_message.is_empty());

    svc.runner().stop_all().await;
}

#[tokio::test]
async fn mongodb_set_init_replay_writes_no_new_versions() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    svc.create_mongodb(&mongodb_request("mongo1")).await.unwrap();
    let set_req = CatalogSetServiceInitRequest {
        region: REGION.to_string(),
        cluster: CLUSTER.to_string(),
        service_name: "mongo1".to_string(),
        service_type: CatalogKind::MongoDB,
    };
    svc.set_service_init(&set_req).await.unwrap();
    svc.set_service_init(&set_req).await.unwrap();

    let uuid = service_uuid(&fix, "mongo1");
    for member in fix.store.list_service_members(&uuid).unwrap() {
        // Still version 1: the probe skipped the second rewrite.
        assert!(member.configs[0].file_id.ends_with("mongod.conf-v1"));
    }
    svc.runner().stop_all().await;
}

#[tokio::test]
async fn mongodb_create_is_idempotent() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    svc.create_mongodb(&mongodb_request("mongo1")).await.unwrap();
    let uuid = service_uuid(&fix, "mongo1");

    svc.create_mongodb(&mongodb_request("mongo1")).await.unwrap();
    assert_eq!(service_uuid(&fix, "mongo1"), uuid);
    assert_eq!(fix.store.list_service_members(&uuid).unwrap().len(), 3);
    assert_eq!(fix.store.list_config_files(&uuid).unwrap().len(), 3);
    assert_eq!(svc.runner().task_count().await, 1);

    svc.runner().stop_all().await;
}

#[tokio::test]
async fn divergent_create_is_a_conflict() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    svc.create_mongodb(&mongodb_request("svc1")).await.unwrap();

    let mut other = mongodb_request("svc1");
    other.options.replicas = 5;
    let err = svc.create_mongodb(&other).await.unwrap_err();
    assert_eq!(err.http_status(), 409);

    svc.runner().stop_all().await;
}

// ── Redis cluster pipeline ─────────────────────────────────────────

#[tokio::test]
async fn redis_cluster_init_writes_mapping_auth_and_announce_ip() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    svc.create_redis(&redis_cluster_request("redis1")).await.unwrap();
    let uuid = service_uuid(&fix, "redis1");
    assert_eq!(attr(&fix, "redis1").service_status, ServiceStatus::Initializing);
    assert_eq!(fix.store.list_service_members(&uuid).unwrap().len(), 6);

    let node_ids: Vec<String> = (0..6).map(|i| format!("node-{i}")).collect();
    svc.set_redis_init(&CatalogSetRedisInitRequest {
        region: REGION.to_string(),
        cluster: CLUSTER.to_string(),
        service_name: "redis1".to_string(),
        node_ids: node_ids.clone(),
    })
    .await
    .unwrap();

    assert_eq!(attr(&fix, "redis1").service_status, ServiceStatus::Active);
    assert_eq!(fix.platform.restart_count(CLUSTER, "redis1"), 1);

    let expected_md5 = md5_hex(&redis::create_cluster_info_content(&node_ids));
    for member in fix.store.list_service_members(&uuid).unwrap() {
        // Every member gained a cluster.info slot with the mapping MD5.
        let info = member
            .configs
            .iter()
            .find(|c| c.file_name == redis::CLUSTER_INFO_FILE_NAME)
            .unwrap();
        assert_eq!(info.file_md5, expected_md5);

        // redis.conf has auth enabled and the member's IP pinned.
        let conf_slot = member
            .configs
            .iter()
            .find(|c| c.file_name == redis::CONF_FILE_NAME)
            .unwrap();
        let file = fix
            .store
            .get_config_file(&uuid, &conf_slot.file_id)
            .unwrap()
            .unwrap();
        assert!(file.content.contains("requirepass redispass"));
        assert!(file
            .content
            .contains(&format!("cluster-announce-ip {}", member.static_ip)));
    }

    svc.runner().stop_all().await;
}

#[tokio::test]
async fn redis_set_init_replay_and_divergence() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    svc.create_redis(&redis_cluster_request("redis1")).await.unwrap();
    let uuid = service_uuid(&fix, "redis1");

    let node_ids: Vec<String> = (0..6).map(|i| format!("node-{i}")).collect();
    let set_req = CatalogSetRedisInitRequest {
        region: REGION.to_string(),
        cluster: CLUSTER.to_string(),
        service_name: "redis1".to_string(),
        node_ids: node_ids.clone(),
    };
    svc.set_redis_init(&set_req).await.unwrap();

    let before: Vec<ServiceMember> = fix.store.list_service_members(&uuid).unwrap();

    // Same node ids: a full no-op on configs.
    svc.set_redis_init(&set_req).await.unwrap();
    assert_eq!(fix.store.list_service_members(&uuid).unwrap(), before);

    // Divergent node ids: the idempotent write trips ConfigMismatch.
    let mut divergent = set_req.clone();
    divergent.node_ids[0] = "node-x".to_string();
    let err = svc.set_redis_init(&divergent).await.unwrap_err();
    assert_eq!(err.http_status(), 500);
    assert!(err.to_string().contains("config mismatch"));

    svc.runner().stop_all().await;
}

#[tokio::test]
async fn redis_single_instance_needs_no_init() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    let req = CatalogCreateRedisRequest {
        service: common("redis-single"),
        resource: Resources::default(),
        options: CatalogRedisOptions {
            shards: 1,
            replicas_per_shard: 1,
            memory_cache_size_mb: 256,
            volume_size_gb: 10,
            auth_pass: String::new(),
        },
    };
    svc.create_redis(&req).await.unwrap();

    assert_eq!(attr(&fix, "redis-single").service_status, ServiceStatus::Active);
    assert_eq!(svc.runner().task_count().await, 0);
}

#[tokio::test]
async fn redis_node_id_count_must_match_members() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    svc.create_redis(&redis_cluster_request("redis1")).await.unwrap();
    let err = svc
        .set_redis_init(&CatalogSetRedisInitRequest {
            region: REGION.to_string(),
            cluster: CLUSTER.to_string(),
            service_name: "redis1".to_string(),
            node_ids: vec!["n0".to_string()],
        })
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), 400);

    svc.runner().stop_all().await;
}

// ── Recovery protocol ──────────────────────────────────────────────

#[tokio::test]
async fn check_init_resumes_after_control_plane_restart() {
    let fix = Fixture::new();

    // First incarnation creates the service and then "crashes".
    {
        let svc = fix.catalog_service();
        svc.create_mongodb(&mongodb_request("mongo1")).await.unwrap();
        svc.runner().stop_all().await;
    }

    let uuid = service_uuid(&fix, "mongo1");
    assert_eq!(attr(&fix, "mongo1").service_status, ServiceStatus::Initializing);

    // Second incarnation has an empty task board; the recovery poll
    // reconstructs the task from the stored attrs plus the caller's
    // credentials.
    let svc = fix.catalog_service();
    assert_eq!(svc.runner().task_count().await, 0);

    let check_req = CatalogCheckServiceInitRequest {
        service: common("mongo1"),
        service_type: CatalogKind::MongoDB,
        admin: "dbadmin".to_string(),
        admin_passwd: "secret".to_string(),
        shards: 0,
        replicas_per_shard: 0,
    };
    let check = svc.check_service_init(&check_req).await.unwrap();
    assert!(!check.initialized);
    assert!(check.status_message.is_empty());
    assert!(svc.runner().has_init_task(&uuid).await.0);

    // The re-submitted task drives the service to ACTIVE once the job
    // acknowledges.
    svc.set_service_init(&CatalogSetServiceInitRequest {
        region: REGION.to_string(),
        cluster: CLUSTER.to_string(),
        service_name: "mongo1".to_string(),
        service_type: CatalogKind::MongoDB,
    })
    .await
    .unwrap();
    wait_for_no_task(&svc, &uuid).await;

    let check = svc.check_service_init(&check_req).await.unwrap();
    assert!(check.initialized);

    svc.runner().stop_all().await;
}

#[tokio::test]
async fn check_init_flips_init_free_catalogs_directly() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    // A generic create leaves the service INITIALIZING, modeling a
    // control plane that died before the final flip.
    let opts = CatalogPostgreSQLOptions {
        replicas: 1,
        volume_size_gb: 5,
        admin_passwd: "pw".to_string(),
        replica_user: String::new(),
        replica_user_passwd: String::new(),
    };
    let cr_req = postgres::gen_default_create_service_request(
        REGION,
        &["a".to_string()],
        CLUSTER,
        "pg1",
        &opts,
        &Resources::default(),
    );
    svc.create_service(&cr_req).await.unwrap();
    assert_eq!(attr(&fix, "pg1").service_status, ServiceStatus::Initializing);

    let check = svc
        .check_service_init(&CatalogCheckServiceInitRequest {
            service: common("pg1"),
            service_type: CatalogKind::PostgreSQL,
            admin: String::new(),
            admin_passwd: String::new(),
            shards: 0,
            replicas_per_shard: 0,
        })
        .await
        .unwrap();
    assert!(check.initialized);
    assert_eq!(attr(&fix, "pg1").service_status, ServiceStatus::Active);
}

#[tokio::test]
async fn check_init_rejects_catalogs_without_recovery() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    let cr_req = postgres::gen_default_create_service_request(
        REGION,
        &["a".to_string()],
        CLUSTER,
        "svc1",
        &CatalogPostgreSQLOptions {
            replicas: 1,
            volume_size_gb: 5,
            admin_passwd: "pw".to_string(),
            replica_user: String::new(),
            replica_user_passwd: String::new(),
        },
        &Resources::default(),
    );
    svc.create_service(&cr_req).await.unwrap();

    let err = svc
        .check_service_init(&CatalogCheckServiceInitRequest {
            service: common("svc1"),
            service_type: CatalogKind::Kibana,
            admin: String::new(),
            admin_passwd: String::new(),
            shards: 0,
            replicas_per_shard: 0,
        })
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), 400);
}

// ── Admin and passthrough operations ───────────────────────────────

#[tokio::test]
async fn generic_create_and_admin_flip() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    let cr_req = postgres::gen_default_create_service_request(
        REGION,
        &["a".to_string()],
        CLUSTER,
        "app1",
        &CatalogPostgreSQLOptions {
            replicas: 1,
            volume_size_gb: 5,
            admin_passwd: "pw".to_string(),
            replica_user: String::new(),
            replica_user_passwd: String::new(),
        },
        &Resources::default(),
    );
    svc.create_service(&cr_req).await.unwrap();
    assert_eq!(attr(&fix, "app1").service_status, ServiceStatus::Initializing);

    svc.set_service_initialized(&common("app1")).await.unwrap();
    assert_eq!(attr(&fix, "app1").service_status, ServiceStatus::Active);
}

#[tokio::test]
async fn cluster_region_mismatch_is_rejected() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    let mut req = mongodb_request("mongo1");
    req.service.cluster = "other".to_string();
    let err = svc.create_mongodb(&req).await.unwrap_err();
    assert_eq!(err.http_status(), 400);

    let mut req = mongodb_request("mongo1");
    req.service.region = "mars-1".to_string();
    let err = svc.create_mongodb(&req).await.unwrap_err();
    assert_eq!(err.http_status(), 400);
}

#[tokio::test]
async fn reads_and_tasks_round_trip() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    svc.create_postgresql(&CatalogCreatePostgreSQLRequest {
        service: common("pg1"),
        resource: Resources::default(),
        options: CatalogPostgreSQLOptions {
            replicas: 2,
            volume_size_gb: 5,
            admin_passwd: "pw".to_string(),
            replica_user: "r".to_string(),
            replica_user_passwd: "rp".to_string(),
        },
    })
    .await
    .unwrap();

    // List with and without prefix.
    let all = svc
        .list_services(&ListServiceRequest {
            region: REGION.to_string(),
            cluster: CLUSTER.to_string(),
            prefix: String::new(),
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    let none = svc
        .list_services(&ListServiceRequest {
            region: REGION.to_string(),
            cluster: CLUSTER.to_string(),
            prefix: "zzz".to_string(),
        })
        .await
        .unwrap();
    assert!(none.is_empty());

    // Volumes: one data volume per member.
    let volumes = svc
        .list_volumes(&ListVolumeRequest {
            service: common("pg1"),
        })
        .await
        .unwrap();
    assert_eq!(volumes.len(), 2);
    assert_eq!(volumes[0].size_gb, 5);

    // Container-platform status.
    let status = svc.get_service_running_status(&common("pg1")).await.unwrap();
    assert_eq!(status.desired_count, 2);

    // Operator task round trip.
    let task_id = svc
        .run_task(&RunTaskRequest {
            service: common("pg1"),
            resource: Resources::default(),
            container_image: "steward/pgtool:1".to_string(),
            task_type: "backup".to_string(),
            envkvs: vec![],
        })
        .await
        .unwrap();
    let status = svc
        .get_task_status(&GetTaskStatusRequest {
            service: common("pg1"),
            task_id: task_id.clone(),
        })
        .await
        .unwrap();
    assert_eq!(status.status, "RUNNING");
    svc.delete_task(&DeleteTaskRequest {
        service: common("pg1"),
        task_type: "backup".to_string(),
    })
    .await
    .unwrap();
    assert!(svc
        .get_task_status(&GetTaskStatusRequest {
            service: common("pg1"),
            task_id,
        })
        .await
        .is_err());
}

#[tokio::test]
async fn delete_service_clears_all_substrates() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    svc.create_postgresql(&CatalogCreatePostgreSQLRequest {
        service: common("pg1"),
        resource: Resources::default(),
        options: CatalogPostgreSQLOptions {
            replicas: 2,
            volume_size_gb: 5,
            admin_passwd: "pw".to_string(),
            replica_user: "r".to_string(),
            replica_user_passwd: "rp".to_string(),
        },
    })
    .await
    .unwrap();
    let uuid = service_uuid(&fix, "pg1");

    svc.delete_service(&common("pg1")).await.unwrap();

    assert!(fix.store.get_service(CLUSTER, "pg1").unwrap().is_none());
    assert!(fix.store.get_service_attr(&uuid).unwrap().is_none());
    assert!(fix.store.list_service_members(&uuid).unwrap().is_empty());
    assert!(fix.store.list_config_files(&uuid).unwrap().is_empty());
    assert!(!fix
        .platform
        .is_service_exist(CLUSTER, "pg1")
        .await
        .unwrap());
}

#[tokio::test]
async fn check_init_on_unknown_service_is_not_found() {
    let fix = Fixture::new();
    let svc = fix.catalog_service();

    let err = svc
        .check_service_init(&CatalogCheckServiceInitRequest {
            service: common("ghost"),
            service_type: CatalogKind::MongoDB,
            admin: String::new(),
            admin_passwd: String::new(),
            shards: 0,
            replicas_per_shard: 0,
        })
        .await
        .unwrap_err();
    assert_eq!(err.http_status(), 404);
}
