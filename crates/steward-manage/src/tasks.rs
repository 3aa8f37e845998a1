//! InitTaskRunner — the in-memory board of live initialization tasks.
//!
//! At most one task per service UUID. A task starts the catalog's init
//! job on the container platform and polls the service attributes until
//! they turn ACTIVE, then deletes the platform task and removes itself
//! from the board. The board is process-local and not persistent: a
//! control-plane restart loses all entries and recovery is client-driven
//! through `CheckServiceInit`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use steward_core::{CatalogKind, ServiceStatus};
use steward_platform::{ContainerPlatform, RunTaskOptions};
use steward_state::MetaStore;

/// A unit of initialization work for one service.
#[derive(Debug, Clone)]
pub struct ServiceTask {
    pub service_uuid: String,
    pub service_name: String,
    pub kind: CatalogKind,
    pub opts: RunTaskOptions,
}

/// Board slot for a live task.
struct TaskSlot {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
    status_tx: watch::Sender<String>,
}

/// Tracks and executes init tasks, one per service UUID.
#[derive(Clone)]
pub struct InitTaskRunner {
    store: MetaStore,
    platform: Arc<dyn ContainerPlatform>,
    /// Live tasks: serviceUUID → slot.
    tasks: Arc<RwLock<HashMap<String, TaskSlot>>>,
    poll_interval: Duration,
}

impl InitTaskRunner {
    pub fn new(store: MetaStore, platform: Arc<dyn ContainerPlatform>) -> Self {
        Self {
            store,
            platform,
            tasks: Arc::new(RwLock::new(HashMap::new())),
            poll_interval: Duration::from_secs(3),
        }
    }

    /// Set how often tasks re-check the service status.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Register and start a task, unless the service already has one.
    ///
    /// Single-writer-wins: when a task exists the call is a no-op and the
    /// existing run keeps owning the service. Returns whether the task
    /// was inserted.
    pub async fn add_init_task(&self, task: ServiceTask) -> bool {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.service_uuid) {
            debug!(
                service_uuid = %task.service_uuid,
                "init task already registered, keeping the existing run"
            );
            return false;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (status_tx, _status_rx) = watch::channel(format!("running {} init task", task.kind));

        let service_uuid = task.service_uuid.clone();
        let store = self.store.clone();
        let platform = Arc::clone(&self.platform);
        let board = Arc::clone(&self.tasks);
        let status_for_run = status_tx.clone();
        let poll = self.poll_interval;

        let handle = tokio::spawn(async move {
            let uuid = task.service_uuid.clone();
            let completed =
                run_init_task(store, platform, task, status_for_run, shutdown_rx, poll).await;
            if completed {
                let mut board = board.write().await;
                board.remove(&uuid);
                info!(service_uuid = %uuid, "init task completed, removed from board");
            }
        });

        info!(service_uuid = %service_uuid, "init task registered");
        tasks.insert(
            service_uuid,
            TaskSlot {
                handle,
                shutdown_tx,
                status_tx,
            },
        );
        true
    }

    /// Whether the service has a live task, and its latest status message.
    pub async fn has_init_task(&self, service_uuid: &str) -> (bool, String) {
        let tasks = self.tasks.read().await;
        match tasks.get(service_uuid) {
            Some(slot) => (true, slot.status_tx.borrow().clone()),
            None => (false, String::new()),
        }
    }

    /// Publish a task status message; last writer wins.
    pub async fn update_task_status_msg(&self, service_uuid: &str, msg: &str) {
        let tasks = self.tasks.read().await;
        if let Some(slot) = tasks.get(service_uuid) {
            debug!(%service_uuid, %msg, "task status updated");
            let _ = slot.status_tx.send(msg.to_string());
        }
    }

    /// Number of live tasks.
    pub async fn task_count(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// Stop every task (graceful daemon shutdown).
    pub async fn stop_all(&self) {
        let mut tasks = self.tasks.write().await;
        for (uuid, slot) in tasks.drain() {
            let _ = slot.shutdown_tx.send(true);
            slot.handle.abort();
            debug!(service_uuid = %uuid, "init task stopped");
        }
        info!("all init tasks stopped");
    }
}

/// Drive one init task to completion.
///
/// Starts (or re-attaches to) the platform job, then watches the service
/// attributes. Returns true when the service reached ACTIVE; false when
/// shut down early. Failures keep the board entry alive with the error
/// as the status message so `CheckServiceInit` can observe it.
async fn run_init_task(
    store: MetaStore,
    platform: Arc<dyn ContainerPlatform>,
    task: ServiceTask,
    status_tx: watch::Sender<String>,
    mut shutdown: watch::Receiver<bool>,
    poll: Duration,
) -> bool {
    let uuid = task.service_uuid.clone();

    let mut started = false;
    loop {
        // Start the platform job first so a poll can observe progress
        // immediately; replays re-attach to the existing job.
        if !started {
            match platform.run_task(&task.opts).await {
                Ok(task_id) => {
                    started = true;
                    debug!(service_uuid = %uuid, %task_id, "platform init job running");
                }
                Err(err) => {
                    warn!(service_uuid = %uuid, error = %err, "failed to start init job");
                    let _ = status_tx.send(format!("failed to start init job: {err}"));
                }
            }
        }

        if started {
            match store.get_service_attr(&uuid) {
                Ok(Some(attr)) if attr.service_status == ServiceStatus::Active => {
                    // Initialization acknowledged; clean up the job.
                    if let Err(err) = platform
                        .delete_task(&task.opts.cluster, &task.opts.service_name, &task.opts.task_type)
                        .await
                    {
                        warn!(service_uuid = %uuid, error = %err, "failed to delete init job");
                    }
                    return true;
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(service_uuid = %uuid, error = %err, "failed to read service attr");
                    let _ = status_tx.send(format!("failed to read service attr: {err}"));
                }
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(poll) => {}
            _ = shutdown.changed() => {
                debug!(service_uuid = %uuid, "init task shutting down");
                return false;
            }
        }
    }
}
