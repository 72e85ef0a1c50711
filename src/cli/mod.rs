//! Command-line interface definitions.

pub mod args;
pub mod create;
pub mod list;
pub mod output;
pub mod remove;
pub mod routes;
pub mod scale;
pub mod submit;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::adapter::ReceptorClient;
use crate::config::Config;
use crate::domain::RouteOverride;
use crate::error::Result;
use crate::runner::AppRunner;

/// Apprunner - desire Docker apps on a lattice scheduler.
#[derive(Parser, Debug)]
#[command(name = "apprunner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file [default: ~/.apprunner/config.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit JSON lines instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Override log level (debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a Docker app
    Create(CreateArgs),

    /// Submit a desired LRP from a JSON file
    Submit(SubmitArgs),

    /// Change the number of instances of an app
    Scale(ScaleArgs),

    /// Replace the routes of an app
    UpdateRoutes(UpdateRoutesArgs),

    /// Remove one or more apps
    Remove(RemoveArgs),

    /// List apps
    List,
}

/// Arguments for the `create` subcommand.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// App name (process guid)
    pub name: String,

    /// Docker image, e.g. `cloudfoundry/lattice-app` or `registry.local:5000/web:v2`
    pub docker_image: String,

    /// Start command and its arguments, after `--`
    #[arg(last = true, required = true, value_name = "START_COMMAND")]
    pub command: Vec<String>,

    /// Working directory for the start command
    #[arg(long, default_value = "/")]
    pub working_dir: String,

    /// Run the start command as root
    #[arg(long)]
    pub run_as_root: bool,

    /// Environment variable; a bare KEY copies its value from the local environment
    #[arg(short, long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Relative CPU weight
    #[arg(long, default_value_t = 100)]
    pub cpu_weight: u32,

    /// Memory limit in MB (0 for unlimited)
    #[arg(short, long, default_value_t = 128)]
    pub memory_mb: u32,

    /// Disk limit in MB (0 for unlimited)
    #[arg(short, long, default_value_t = 0)]
    pub disk_mb: u32,

    /// Ports the container exposes
    #[arg(long, value_delimiter = ',', default_value = "8080")]
    pub ports: Vec<u16>,

    /// Port to health-check [default: first exposed port]
    #[arg(long, conflicts_with = "no_monitor")]
    pub monitor_port: Option<u16>,

    /// HTTP health check, as PORT:/path or /path
    #[arg(long, value_name = "PORT:URI", value_parser = args::parse_monitor_url, conflicts_with_all = ["no_monitor", "monitor_port"])]
    pub monitor_url: Option<args::MonitorUrl>,

    /// Timeout for each health check
    #[arg(long, value_parser = args::parse_duration, default_value = "1s")]
    pub monitor_timeout: Duration,

    /// Do not health-check the app
    #[arg(long)]
    pub no_monitor: bool,

    /// Route overrides, as PORT:HOSTNAME_PREFIX
    #[arg(short, long, value_delimiter = ',', value_parser = args::parse_route_override, conflicts_with = "no_routes")]
    pub routes: Vec<RouteOverride>,

    /// Do not register any routes
    #[arg(long)]
    pub no_routes: bool,

    /// Number of instances
    #[arg(short, long, default_value_t = 1)]
    pub instances: u32,

    /// How long to wait for the app to become healthy [default: scheduler default]
    #[arg(short, long, value_parser = args::parse_duration)]
    pub timeout: Option<Duration>,
}

/// Arguments for the `submit` subcommand.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// JSON desired LRP file, or `-` for stdin
    pub file: PathBuf,
}

/// Arguments for the `scale` subcommand.
#[derive(Args, Debug)]
pub struct ScaleArgs {
    pub name: String,
    pub instances: u32,
}

/// Arguments for the `update-routes` subcommand.
#[derive(Args, Debug)]
pub struct UpdateRoutesArgs {
    pub name: String,

    /// Comma-separated PORT:HOSTNAME_PREFIX list; omit to remove all routes
    #[arg(value_delimiter = ',', value_parser = args::parse_route_override)]
    pub routes: Vec<RouteOverride>,
}

/// Arguments for the `remove` subcommand.
#[derive(Args, Debug)]
pub struct RemoveArgs {
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// Load configuration, set up logging and run the selected command.
pub async fn run(cli: Cli) -> Result<()> {
    let path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(&path)?;

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.json {
        config.logging.format = "json".to_string();
    }
    config.init_logging();
    debug!(config = %path.display(), scheduler = %config.scheduler.url, "Loaded configuration");

    let scheduler = ReceptorClient::new(&config.scheduler)?;
    let runner = AppRunner::new(scheduler, config.system_domain.clone());

    match cli.command {
        Commands::Create(args) => create::execute(&runner, args).await,
        Commands::Submit(args) => submit::execute(&runner, &args).await,
        Commands::Scale(args) => scale::execute(&runner, &args).await,
        Commands::UpdateRoutes(args) => routes::execute(&runner, &args).await,
        Commands::Remove(args) => remove::execute(&runner, &args).await,
        Commands::List => list::execute(&runner).await,
    }
}
