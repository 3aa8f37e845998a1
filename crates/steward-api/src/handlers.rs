//! Operation dispatch and handlers.
//!
//! axum cannot route on a raw query string, so `/` and `/{service}` each
//! get one dispatcher that buffers the body, picks the operation from
//! (method, query), and hands the decoded request to the façade. Typed
//! errors become status codes through `Error::http_status`.

use axum::body::to_bytes;
use axum::extract::{Path, Request, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::warn;

use steward_core::ops;
use steward_core::{
    CatalogCheckServiceInitRequest, CatalogCreateCassandraRequest, CatalogCreateConsulRequest,
    CatalogCreateCouchDBRequest, CatalogCreateElasticSearchRequest, CatalogCreateKafkaRequest,
    CatalogCreateKibanaRequest, CatalogCreateLogstashRequest, CatalogCreateMongoDBRequest,
    CatalogCreatePostgreSQLRequest, CatalogCreateRedisRequest, CatalogCreateZooKeeperRequest,
    CatalogSetRedisInitRequest, CatalogSetServiceInitRequest, CreateServiceRequest,
    DeleteTaskRequest, GetServiceAttributesResponse, GetTaskStatusRequest, GetTaskStatusResponse,
    ListServiceRequest, ListServiceResponse, ListVolumeRequest, ListVolumeResponse,
    RunTaskRequest, RunTaskResponse, ServiceCommonRequest,
};

use crate::ApiState;

/// Request bodies larger than this are rejected.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

fn bad_request(msg: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

fn error_response(err: &steward_manage::Error) -> Response {
    let status = StatusCode::from_u16(err.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    warn!(%status, error = %err, "operation failed");
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
        .into_response()
}

fn ok_empty() -> Response {
    Json(serde_json::json!({})).into_response()
}

fn ok_json<T: serde::Serialize>(value: &T) -> Response {
    Json(value).into_response()
}

fn decode<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|err| {
        warn!(error = %err, "request decode failed");
        bad_request(&format!("invalid request body: {err}"))
    })
}

/// Dispatcher for `/?<Operation>` requests.
pub async fn root_op(State(state): State<ApiState>, req: Request) -> Response {
    let method = req.method().clone();
    let op = req.uri().query().unwrap_or("").to_string();
    let body = match to_bytes(req.into_body(), MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => return bad_request(&format!("unreadable body: {err}")),
    };

    if method == Method::POST || method == Method::PUT {
        return match op.as_str() {
            ops::CREATE_MONGODB => create_mongodb(&state, &body).await,
            ops::CREATE_POSTGRESQL => create_postgresql(&state, &body).await,
            ops::CREATE_CASSANDRA => create_cassandra(&state, &body).await,
            ops::CREATE_ZOOKEEPER => create_zookeeper(&state, &body).await,
            ops::CREATE_KAFKA => create_kafka(&state, &body).await,
            ops::CREATE_REDIS => create_redis(&state, &body).await,
            ops::CREATE_COUCHDB => create_couchdb(&state, &body).await,
            ops::CREATE_CONSUL => create_consul(&state, &body).await,
            ops::CREATE_ELASTICSEARCH => create_elasticsearch(&state, &body).await,
            ops::CREATE_KIBANA => create_kibana(&state, &body).await,
            ops::CREATE_LOGSTASH => create_logstash(&state, &body).await,
            ops::SET_SERVICE_INITIALIZED => set_service_initialized(&state, &body).await,
            ops::SET_SERVICE_INIT => set_service_init(&state, &body).await,
            ops::SET_REDIS_INIT => set_redis_init(&state, &body).await,
            ops::RUN_TASK => run_task(&state, &body).await,
            _ => bad_request("unknown operation"),
        };
    }

    if method == Method::GET {
        return match op.as_str() {
            ops::CHECK_SERVICE_INIT => check_service_init(&state, &body).await,
            ops::LIST_SERVICE => list_services(&state, &body).await,
            ops::LIST_VOLUME => list_volumes(&state, &body).await,
            ops::GET_SERVICE_STATUS => get_service_status(&state, &body).await,
            ops::GET_TASK_STATUS => get_task_status(&state, &body).await,
            _ => bad_request("unknown operation"),
        };
    }

    if method == Method::DELETE {
        return match op.as_str() {
            ops::DELETE_TASK => delete_task(&state, &body).await,
            _ => bad_request("unknown operation"),
        };
    }

    StatusCode::NOT_IMPLEMENTED.into_response()
}

/// Dispatcher for `/{service}` requests: create, get attributes, delete.
pub async fn service_op(
    State(state): State<ApiState>,
    Path(service_name): Path<String>,
    req: Request,
) -> Response {
    let method = req.method().clone();
    let body = match to_bytes(req.into_body(), MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => return bad_request(&format!("unreadable body: {err}")),
    };

    if method == Method::POST || method == Method::PUT {
        let cr_req: CreateServiceRequest = match decode(&body) {
            Ok(req) => req,
            Err(resp) => return resp,
        };
        if cr_req.service.service_name != service_name {
            return bad_request("body service name does not match the path");
        }
        return match state.svc.create_service(&cr_req).await {
            Ok(_) => ok_empty(),
            Err(err) => error_response(&err),
        };
    }

    if method == Method::GET {
        let get_req: ServiceCommonRequest = match decode(&body) {
            Ok(req) => req,
            Err(resp) => return resp,
        };
        if get_req.service_name != service_name {
            return bad_request("body service name does not match the path");
        }
        return match state.svc.get_service_attrs(&get_req).await {
            Ok(service) => ok_json(&GetServiceAttributesResponse { service }),
            Err(err) => error_response(&err),
        };
    }

    if method == Method::DELETE {
        let del_req: ServiceCommonRequest = match decode(&body) {
            Ok(req) => req,
            Err(resp) => return resp,
        };
        if del_req.service_name != service_name {
            return bad_request("body service name does not match the path");
        }
        return match state.svc.delete_service(&del_req).await {
            Ok(()) => ok_empty(),
            Err(err) => error_response(&err),
        };
    }

    StatusCode::NOT_IMPLEMENTED.into_response()
}

// ── Catalog creates ────────────────────────────────────────────────

async fn create_mongodb(state: &ApiState, body: &[u8]) -> Response {
    let req: CatalogCreateMongoDBRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.create_mongodb(&req).await {
        Ok(()) => ok_empty(),
        Err(err) => error_response(&err),
    }
}

async fn create_postgresql(state: &ApiState, body: &[u8]) -> Response {
    let req: CatalogCreatePostgreSQLRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.create_postgresql(&req).await {
        Ok(()) => ok_empty(),
        Err(err) => error_response(&err),
    }
}

async fn create_cassandra(state: &ApiState, body: &[u8]) -> Response {
    let req: CatalogCreateCassandraRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.create_cassandra(&req).await {
        Ok(()) => ok_empty(),
        Err(err) => error_response(&err),
    }
}

async fn create_zookeeper(state: &ApiState, body: &[u8]) -> Response {
    let req: CatalogCreateZooKeeperRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.create_zookeeper(&req).await {
        Ok(()) => ok_empty(),
        Err(err) => error_response(&err),
    }
}

async fn create_kafka(state: &ApiState, body: &[u8]) -> Response {
    let req: CatalogCreateKafkaRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.create_kafka(&req).await {
        Ok(()) => ok_empty(),
        Err(err) => error_response(&err),
    }
}

async fn create_redis(state: &ApiState, body: &[u8]) -> Response {
    let req: CatalogCreateRedisRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.create_redis(&req).await {
        Ok(()) => ok_empty(),
        Err(err) => error_response(&err),
    }
}

async fn create_couchdb(state: &ApiState, body: &[u8]) -> Response {
    let req: CatalogCreateCouchDBRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.create_couchdb(&req).await {
        Ok(()) => ok_empty(),
        Err(err) => error_response(&err),
    }
}

async fn create_consul(state: &ApiState, body: &[u8]) -> Response {
    let req: CatalogCreateConsulRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.create_consul(&req).await {
        Ok(resp) => ok_json(&resp),
        Err(err) => error_response(&err),
    }
}

async fn create_elasticsearch(state: &ApiState, body: &[u8]) -> Response {
    let req: CatalogCreateElasticSearchRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.create_elasticsearch(&req).await {
        Ok(()) => ok_empty(),
        Err(err) => error_response(&err),
    }
}

async fn create_kibana(state: &ApiState, body: &[u8]) -> Response {
    let req: CatalogCreateKibanaRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.create_kibana(&req).await {
        Ok(()) => ok_empty(),
        Err(err) => error_response(&err),
    }
}

async fn create_logstash(state: &ApiState, body: &[u8]) -> Response {
    let req: CatalogCreateLogstashRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.create_logstash(&req).await {
        Ok(()) => ok_empty(),
        Err(err) => error_response(&err),
    }
}

// ── Init operations ────────────────────────────────────────────────

async fn set_service_initialized(state: &ApiState, body: &[u8]) -> Response {
    let req: ServiceCommonRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.set_service_initialized(&req).await {
        Ok(()) => ok_empty(),
        Err(err) => error_response(&err),
    }
}

async fn set_service_init(state: &ApiState, body: &[u8]) -> Response {
    let req: CatalogSetServiceInitRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.set_service_init(&req).await {
        Ok(()) => ok_empty(),
        Err(err) => error_response(&err),
    }
}

async fn set_redis_init(state: &ApiState, body: &[u8]) -> Response {
    let req: CatalogSetRedisInitRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.set_redis_init(&req).await {
        Ok(()) => ok_empty(),
        Err(err) => error_response(&err),
    }
}

async fn check_service_init(state: &ApiState, body: &[u8]) -> Response {
    let req: CatalogCheckServiceInitRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.check_service_init(&req).await {
        Ok(resp) => ok_json(&resp),
        Err(err) => error_response(&err),
    }
}

// ── Reads ──────────────────────────────────────────────────────────

async fn list_services(state: &ApiState, body: &[u8]) -> Response {
    let req: ListServiceRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.list_services(&req).await {
        Ok(services) => ok_json(&ListServiceResponse { services }),
        Err(err) => error_response(&err),
    }
}

async fn list_volumes(state: &ApiState, body: &[u8]) -> Response {
    let req: ListVolumeRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.list_volumes(&req).await {
        Ok(volumes) => ok_json(&ListVolumeResponse { volumes }),
        Err(err) => error_response(&err),
    }
}

async fn get_service_status(state: &ApiState, body: &[u8]) -> Response {
    let req: ServiceCommonRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.get_service_running_status(&req).await {
        Ok(status) => ok_json(&status),
        Err(err) => error_response(&err),
    }
}

// ── Operator tasks ─────────────────────────────────────────────────

async fn run_task(state: &ApiState, body: &[u8]) -> Response {
    let req: RunTaskRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.run_task(&req).await {
        Ok(task_id) => ok_json(&RunTaskResponse { task_id }),
        Err(err) => error_response(&err),
    }
}

async fn get_task_status(state: &ApiState, body: &[u8]) -> Response {
    let req: GetTaskStatusRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.get_task_status(&req).await {
        Ok(status) => ok_json(&GetTaskStatusResponse { status }),
        Err(err) => error_response(&err),
    }
}

async fn delete_task(state: &ApiState, body: &[u8]) -> Response {
    let req: DeleteTaskRequest = match decode(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    match state.svc.delete_task(&req).await {
        Ok(()) => ok_empty(),
        Err(err) => error_response(&err),
    }
}
