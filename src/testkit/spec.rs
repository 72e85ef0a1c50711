//! Builders for [`AppSpec`] values.

use std::collections::BTreeMap;

use crate::domain::{AppSpec, MonitorConfig};

/// A port-monitored single-instance app on 8080 running `cloudfoundry/lattice-app`.
pub fn app_spec(name: &str) -> AppSpec {
    AppSpec {
        name: name.to_string(),
        start_command: "/lattice-app".to_string(),
        docker_image_path: "cloudfoundry/lattice-app".to_string(),
        app_args: Vec::new(),
        environment_variables: BTreeMap::new(),
        privileged: true,
        monitor: MonitorConfig::port(8080),
        instances: 1,
        cpu_weight: 100,
        memory_mb: 128,
        disk_mb: 1024,
        exposed_ports: vec![8080],
        working_dir: "/".to_string(),
        ..AppSpec::default()
    }
}

/// [`app_spec`] with extra environment variables.
pub fn app_spec_with_env(name: &str, vars: &[(&str, &str)]) -> AppSpec {
    let mut spec = app_spec(name);
    spec.environment_variables = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    spec
}
