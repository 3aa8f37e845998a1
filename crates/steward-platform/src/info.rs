//! Local server identity and log-stream configuration.

use serde::{Deserialize, Serialize};

/// Identity of the environment this control plane instance serves.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    region: String,
    vpc_id: String,
    availability_zones: Vec<String>,
}

impl ServerInfo {
    pub fn new(region: &str, vpc_id: &str, availability_zones: Vec<String>) -> Self {
        Self {
            region: region.to_string(),
            vpc_id: vpc_id.to_string(),
            availability_zones,
        }
    }

    pub fn local_region(&self) -> &str {
        &self.region
    }

    pub fn local_vpc_id(&self) -> &str {
        &self.vpc_id
    }

    pub fn local_availability_zones(&self) -> &[String] {
        &self.availability_zones
    }
}

/// Log group/stream a task's output is shipped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogConfig {
    pub log_group: String,
    pub log_stream: String,
}

/// Build the log destination for a service task stream.
pub fn create_log_config_for_stream(
    cluster: &str,
    service_name: &str,
    service_uuid: &str,
    task_type: &str,
) -> LogConfig {
    LogConfig {
        log_group: format!("{cluster}-{service_name}-{service_uuid}"),
        log_stream: task_type.to_string(),
    }
}
