//! Operation names of the management API.
//!
//! Non-resource operations are addressed by the raw query string, e.g.
//! `POST /?CreateMongoDB`. Resource operations use the service name as the
//! path (`PUT /<service>`, `GET /<service>`, `DELETE /<service>`).

pub const CREATE_MONGODB: &str = "CreateMongoDB";
pub const CREATE_POSTGRESQL: &str = "CreatePostgreSQL";
pub const CREATE_CASSANDRA: &str = "CreateCassandra";
pub const CREATE_ZOOKEEPER: &str = "CreateZooKeeper";
pub const CREATE_KAFKA: &str = "CreateKafka";
pub const CREATE_REDIS: &str = "CreateRedis";
pub const CREATE_COUCHDB: &str = "CreateCouchDB";
pub const CREATE_CONSUL: &str = "CreateConsul";
pub const CREATE_ELASTICSEARCH: &str = "CreateElasticSearch";
pub const CREATE_KIBANA: &str = "CreateKibana";
pub const CREATE_LOGSTASH: &str = "CreateLogstash";

pub const SET_SERVICE_INITIALIZED: &str = "SetServiceInitialized";
pub const SET_SERVICE_INIT: &str = "SetServiceInit";
pub const SET_REDIS_INIT: &str = "SetRedisInit";
pub const CHECK_SERVICE_INIT: &str = "CheckServiceInit";

pub const LIST_SERVICE: &str = "ListService";
pub const LIST_VOLUME: &str = "ListVolume";
pub const GET_SERVICE_STATUS: &str = "GetServiceStatus";

pub const RUN_TASK: &str = "RunTask";
pub const GET_TASK_STATUS: &str = "GetTaskStatus";
pub const DELETE_TASK: &str = "DeleteTask";
