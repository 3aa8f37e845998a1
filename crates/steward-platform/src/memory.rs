//! In-memory collaborators for tests and standalone mode.
//!
//! `MemoryPlatform` keeps the created services and tasks in maps and
//! counts restarts so tests can assert on them; `MemoryDnsZone` hands out
//! stable private IPs per hostname.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use steward_core::{ServiceRunningStatus, TaskStatus};

use crate::container::{
    ContainerPlatform, CreateServiceOptions, PlatformError, PlatformResult, RunTaskOptions,
};
use crate::dns::DnsZone;

#[derive(Debug, Clone)]
struct PlatformService {
    replicas: u32,
    restart_count: u32,
}

#[derive(Debug, Clone)]
struct PlatformTask {
    task_id: String,
    status: String,
}

/// A container platform that exists only in process memory.
#[derive(Default)]
pub struct MemoryPlatform {
    /// `cluster/serviceName` → service.
    services: Mutex<HashMap<String, PlatformService>>,
    /// `cluster/serviceName/taskType` → task.
    tasks: Mutex<HashMap<String, PlatformTask>>,
    next_task_id: AtomicU64,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    fn service_key(cluster: &str, service_name: &str) -> String {
        format!("{cluster}/{service_name}")
    }

    fn task_key(cluster: &str, service_name: &str, task_type: &str) -> String {
        format!("{cluster}/{service_name}/{task_type}")
    }

    /// Restart count observed for a service (test hook).
    pub fn restart_count(&self, cluster: &str, service_name: &str) -> u32 {
        let services = self.services.lock().unwrap();
        services
            .get(&Self::service_key(cluster, service_name))
            .map(|s| s.restart_count)
            .unwrap_or(0)
    }

    /// Number of live tasks (test hook).
    pub fn task_count(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Mark a task stopped (test hook simulating task completion).
    pub fn stop_task(&self, cluster: &str, service_name: &str, task_type: &str) {
        let mut tasks = self.tasks.lock().unwrap();
        if let Some(task) = tasks.get_mut(&Self::task_key(cluster, service_name, task_type)) {
            task.status = "STOPPED".to_string();
        }
    }
}

#[async_trait]
impl ContainerPlatform for MemoryPlatform {
    async fn is_service_exist(&self, cluster: &str, service_name: &str) -> PlatformResult<bool> {
        let services = self.services.lock().unwrap();
        Ok(services.contains_key(&Self::service_key(cluster, service_name)))
    }

    async fn create_service(&self, opts: &CreateServiceOptions) -> PlatformResult<()> {
        let key = Self::service_key(&opts.cluster, &opts.service_name);
        let mut services = self.services.lock().unwrap();
        services.entry(key.clone()).or_insert(PlatformService {
            replicas: opts.replicas,
            restart_count: 0,
        });
        debug!(%key, replicas = opts.replicas, "platform service created");
        Ok(())
    }

    async fn restart_service(
        &self,
        cluster: &str,
        service_name: &str,
        replicas: u32,
    ) -> PlatformResult<()> {
        let key = Self::service_key(cluster, service_name);
        let mut services = self.services.lock().unwrap();
        let service = services
            .get_mut(&key)
            .ok_or_else(|| PlatformError::ServiceNotFound(key.clone()))?;
        service.replicas = replicas;
        service.restart_count += 1;
        debug!(%key, replicas, "platform service restarted");
        Ok(())
    }

    async fn get_service_status(
        &self,
        cluster: &str,
        service_name: &str,
    ) -> PlatformResult<ServiceRunningStatus> {
        let key = Self::service_key(cluster, service_name);
        let services = self.services.lock().unwrap();
        let service = services
            .get(&key)
            .ok_or_else(|| PlatformError::ServiceNotFound(key.clone()))?;
        Ok(ServiceRunningStatus {
            running_count: service.replicas,
            desired_count: service.replicas,
        })
    }

    async fn delete_service(&self, cluster: &str, service_name: &str) -> PlatformResult<()> {
        let key = Self::service_key(cluster, service_name);
        let mut services = self.services.lock().unwrap();
        services
            .remove(&key)
            .ok_or(PlatformError::ServiceNotFound(key))?;
        Ok(())
    }

    async fn run_task(&self, opts: &RunTaskOptions) -> PlatformResult<String> {
        let key = Self::task_key(&opts.cluster, &opts.service_name, &opts.task_type);
        let mut tasks = self.tasks.lock().unwrap();
        // A replayed run re-attaches to the existing task.
        if let Some(task) = tasks.get(&key) {
            return Ok(task.task_id.clone());
        }
        let id = self.next_task_id.fetch_add(1, Ordering::Relaxed);
        let task_id = format!("task-{id}");
        tasks.insert(
            key.clone(),
            PlatformTask {
                task_id: task_id.clone(),
                status: "RUNNING".to_string(),
            },
        );
        debug!(%key, %task_id, "platform task started");
        Ok(task_id)
    }

    async fn get_task_status(&self, _cluster: &str, task_id: &str) -> PlatformResult<TaskStatus> {
        let tasks = self.tasks.lock().unwrap();
        for task in tasks.values() {
            if task.task_id == task_id {
                return Ok(TaskStatus {
                    status: task.status.clone(),
                    stopped_reason: String::new(),
                });
            }
        }
        Err(PlatformError::TaskNotFound(task_id.to_string()))
    }

    async fn delete_task(
        &self,
        cluster: &str,
        service_name: &str,
        task_type: &str,
    ) -> PlatformResult<()> {
        let key = Self::task_key(cluster, service_name, task_type);
        let mut tasks = self.tasks.lock().unwrap();
        tasks.remove(&key);
        Ok(())
    }
}

/// A DNS zone that allocates private IPs from a fixed block.
#[derive(Default)]
pub struct MemoryDnsZone {
    /// `hostname.domain` → IP.
    entries: Mutex<HashMap<String, String>>,
    next_ip: AtomicU64,
}

impl MemoryDnsZone {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry_key(domain: &str, hostname: &str) -> String {
        format!("{hostname}.{domain}")
    }
}

#[async_trait]
impl DnsZone for MemoryDnsZone {
    async fn assign_static_ip(&self, domain: &str, hostname: &str) -> PlatformResult<String> {
        let key = Self::entry_key(domain, hostname);
        let mut entries = self.entries.lock().unwrap();
        if let Some(ip) = entries.get(&key) {
            return Ok(ip.clone());
        }
        let n = self.next_ip.fetch_add(1, Ordering::Relaxed);
        let ip = format!("172.31.{}.{}", 64 + n / 256, n % 256);
        entries.insert(key.clone(), ip.clone());
        debug!(%key, %ip, "static ip assigned");
        Ok(ip)
    }

    async fn lookup(&self, domain: &str, hostname: &str) -> PlatformResult<Option<String>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(&Self::entry_key(domain, hostname)).cloned())
    }

    async fn remove(&self, domain: &str, hostname: &str) -> PlatformResult<bool> {
        let mut entries = self.entries.lock().unwrap();
        Ok(entries.remove(&Self::entry_key(domain, hostname)).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steward_core::Resources;

    use crate::info::create_log_config_for_stream;

    fn create_opts(cluster: &str, name: &str, replicas: u32) -> CreateServiceOptions {
        CreateServiceOptions {
            cluster: cluster.to_string(),
            service_name: name.to_string(),
            service_uuid: "u1".to_string(),
            container_image: "steward/test:1".to_string(),
            resource: Resources::default(),
            container_path: "/data".to_string(),
            port: 5000,
            replicas,
        }
    }

    fn task_opts(cluster: &str, name: &str) -> RunTaskOptions {
        RunTaskOptions {
            cluster: cluster.to_string(),
            service_name: name.to_string(),
            service_uuid: "u1".to_string(),
            container_image: "steward/test-init:1".to_string(),
            resource: Resources::default(),
            task_type: "init".to_string(),
            envkvs: vec![],
            log_config: create_log_config_for_stream(cluster, name, "u1", "init"),
        }
    }

    #[tokio::test]
    async fn service_lifecycle() {
        let platform = MemoryPlatform::new();
        assert!(!platform.is_service_exist("c1", "db").await.unwrap());

        platform.create_service(&create_opts("c1", "db", 3)).await.unwrap();
        assert!(platform.is_service_exist("c1", "db").await.unwrap());

        let status = platform.get_service_status("c1", "db").await.unwrap();
        assert_eq!(status.desired_count, 3);

        platform.restart_service("c1", "db", 3).await.unwrap();
        assert_eq!(platform.restart_count("c1", "db"), 1);

        platform.delete_service("c1", "db").await.unwrap();
        assert!(!platform.is_service_exist("c1", "db").await.unwrap());
    }

    #[tokio::test]
    async fn restart_unknown_service_fails() {
        let platform = MemoryPlatform::new();
        let err = platform.restart_service("c1", "ghost", 1).await.unwrap_err();
        assert!(matches!(err, PlatformError::ServiceNotFound(_)));
    }

    #[tokio::test]
    async fn task_replay_reattaches() {
        let platform = MemoryPlatform::new();
        let first = platform.run_task(&task_opts("c1", "db")).await.unwrap();
        let second = platform.run_task(&task_opts("c1", "db")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(platform.task_count(), 1);

        let status = platform.get_task_status("c1", &first).await.unwrap();
        assert_eq!(status.status, "RUNNING");

        platform.stop_task("c1", "db", "init");
        let status = platform.get_task_status("c1", &first).await.unwrap();
        assert_eq!(status.status, "STOPPED");

        platform.delete_task("c1", "db", "init").await.unwrap();
        assert_eq!(platform.task_count(), 0);
    }

    #[tokio::test]
    async fn dns_assignment_is_stable() {
        let zone = MemoryDnsZone::new();
        let ip0 = zone.assign_static_ip("d", "db-0").await.unwrap();
        let ip1 = zone.assign_static_ip("d", "db-1").await.unwrap();
        assert_ne!(ip0, ip1);

        // Re-assignment returns the pinned IP.
        let again = zone.assign_static_ip("d", "db-0").await.unwrap();
        assert_eq!(again, ip0);

        assert_eq!(zone.lookup("d", "db-1").await.unwrap(), Some(ip1));
        assert!(zone.remove("d", "db-1").await.unwrap());
        assert_eq!(zone.lookup("d", "db-1").await.unwrap(), None);
    }
}
