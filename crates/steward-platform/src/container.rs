//! The container platform contract.
//!
//! A platform runs a service as a set of identical containers and can run
//! one-shot tasks next to it. The control plane only ever drives it
//! through this trait; all calls are idempotent from the caller's side
//! (creation is guarded by an existence check).

use async_trait::async_trait;

use steward_core::{EnvKeyValue, Resources, ServiceRunningStatus, TaskStatus};

use crate::info::LogConfig;
use thiserror::Error;

/// Result type alias for container platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Errors reported by a container platform driver.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("service not found: {0}")]
    ServiceNotFound(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("platform error: {0}")]
    Internal(String),
}

/// Options for creating a service on the platform.
#[derive(Debug, Clone)]
pub struct CreateServiceOptions {
    pub cluster: String,
    pub service_name: String,
    pub service_uuid: String,
    pub container_image: String,
    pub resource: Resources,
    pub container_path: String,
    pub port: u16,
    pub replicas: u32,
}

/// Options for running a one-shot task on the platform.
#[derive(Debug, Clone)]
pub struct RunTaskOptions {
    pub cluster: String,
    pub service_name: String,
    pub service_uuid: String,
    pub container_image: String,
    pub resource: Resources,
    pub task_type: String,
    pub envkvs: Vec<EnvKeyValue>,
    pub log_config: LogConfig,
}

/// A scheduler for stateful services on some container substrate.
///
/// Implementations must tolerate replayed calls: the control plane
/// retries its creation protocol at-least-once and only skips
/// `create_service` when `is_service_exist` already answered true.
#[async_trait]
pub trait ContainerPlatform: Send + Sync {
    /// Whether the named service exists on the platform.
    async fn is_service_exist(&self, cluster: &str, service_name: &str) -> PlatformResult<bool>;

    /// Create the service with the given shape.
    async fn create_service(&self, opts: &CreateServiceOptions) -> PlatformResult<()>;

    /// Stop and start all replicas of the service.
    async fn restart_service(
        &self,
        cluster: &str,
        service_name: &str,
        replicas: u32,
    ) -> PlatformResult<()>;

    /// Running/desired replica counts.
    async fn get_service_status(
        &self,
        cluster: &str,
        service_name: &str,
    ) -> PlatformResult<ServiceRunningStatus>;

    /// Delete the service from the platform.
    async fn delete_service(&self, cluster: &str, service_name: &str) -> PlatformResult<()>;

    /// Start a one-shot task; returns the platform task id.
    async fn run_task(&self, opts: &RunTaskOptions) -> PlatformResult<String>;

    /// Status of a previously started task.
    async fn get_task_status(&self, cluster: &str, task_id: &str) -> PlatformResult<TaskStatus>;

    /// Delete the task registered for (service, taskType), if any.
    async fn delete_task(
        &self,
        cluster: &str,
        service_name: &str,
        task_type: &str,
    ) -> PlatformResult<()>;
}
