//! Caller-facing description of a Docker app.

use std::collections::BTreeMap;
use std::time::Duration;

use super::monitor::MonitorConfig;

/// Request a hostname prefix on a container port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteOverride {
    pub hostname_prefix: String,
    pub port: u16,
}

impl RouteOverride {
    pub fn new(hostname_prefix: impl Into<String>, port: u16) -> Self {
        Self {
            hostname_prefix: hostname_prefix.into(),
            port,
        }
    }
}

pub type RouteOverrides = Vec<RouteOverride>;

/// Everything needed to desire a Docker app on the scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSpec {
    /// Process guid of the desired LRP; unique per scheduler.
    pub name: String,
    pub start_command: String,
    /// Human image path, e.g. `library/nginx:1.25` or `registry.local:5000/web`.
    pub docker_image_path: String,
    pub app_args: Vec<String>,
    pub environment_variables: BTreeMap<String, String>,
    /// Run the start command as root inside the container.
    pub privileged: bool,
    pub monitor: MonitorConfig,
    pub instances: u32,
    pub cpu_weight: u32,
    pub memory_mb: u32,
    pub disk_mb: u32,
    pub exposed_ports: Vec<u16>,
    pub working_dir: String,
    pub route_overrides: RouteOverrides,
    pub no_routes: bool,
    /// How long the scheduler waits for the first healthy report; zero keeps its default.
    pub timeout: Duration,
}
