//! Handler for the `create` command.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::cli::args::parse_env_var;
use crate::cli::{output, CreateArgs};
use crate::domain::route::compute_routes;
use crate::domain::{AppSpec, MonitorConfig};
use crate::error::{Error, Result};
use crate::port::SchedulerClient;
use crate::runner::AppRunner;

/// Execute the create command.
pub async fn execute<C: SchedulerClient>(runner: &AppRunner<C>, args: CreateArgs) -> Result<()> {
    let spec = app_spec(args, |key| std::env::var(key).ok())?;

    runner.create_docker_app(&spec).await?;

    output::success(&format!("{} is now running.", spec.name));
    let routes = compute_routes(&spec, runner.system_domain());
    if routes.is_empty() {
        output::field("routes", "none");
    }
    for route in routes {
        for hostname in route.hostnames {
            output::field("url", format!("http://{hostname}"));
        }
    }
    Ok(())
}

/// Map `create` flags onto an [`AppSpec`].
///
/// The monitored port defaults to the first exposed port and must be one of
/// the exposed ports.
pub fn app_spec(args: CreateArgs, lookup: impl Fn(&str) -> Option<String>) -> Result<AppSpec> {
    let mut command = args.command.into_iter();
    let start_command = command.next().ok_or_else(|| Error::InvalidArgument {
        flag: "START_COMMAND",
        reason: "a start command is required".to_string(),
    })?;

    let mut environment_variables = BTreeMap::new();
    for var in &args.env {
        let (key, value) = parse_env_var(var, &lookup)
            .map_err(|reason| Error::InvalidArgument { flag: "--env", reason })?;
        environment_variables.insert(key, value);
    }

    let exposed_ports = args.ports;
    let default_port = exposed_ports.first().copied().unwrap_or_default();

    let monitor = if args.no_monitor {
        MonitorConfig::none(args.monitor_port.unwrap_or(default_port))
    } else if let Some(url) = args.monitor_url {
        MonitorConfig::url(url.port.unwrap_or(default_port), url.uri)
            .with_timeout(args.monitor_timeout)
    } else {
        MonitorConfig::port(args.monitor_port.unwrap_or(default_port))
            .with_timeout(args.monitor_timeout)
    };

    if !args.no_monitor && !exposed_ports.contains(&monitor.port) {
        return Err(Error::InvalidArgument {
            flag: "--monitor-port",
            reason: format!(
                "monitor port {} is not one of the exposed ports {:?}",
                monitor.port, exposed_ports
            ),
        });
    }

    Ok(AppSpec {
        name: args.name,
        start_command,
        docker_image_path: args.docker_image,
        app_args: command.collect(),
        environment_variables,
        privileged: args.run_as_root,
        monitor,
        instances: args.instances,
        cpu_weight: args.cpu_weight,
        memory_mb: args.memory_mb,
        disk_mb: args.disk_mb,
        exposed_ports,
        working_dir: args.working_dir,
        route_overrides: args.routes,
        no_routes: args.no_routes,
        timeout: args.timeout.unwrap_or(Duration::ZERO),
    })
}
