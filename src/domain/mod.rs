//! Scheduler-agnostic app description and the desired-LRP wire model.
//!
//! - [`app`] - Caller-facing [`AppSpec`] and route overrides
//! - [`route`] - Route table computation
//! - [`env`] - Environment variable assembly
//! - [`monitor`] - Health monitor selection
//! - [`image`] - Docker image reference formatting
//! - [`lrp`] - Receptor desired-LRP request/response types

pub mod app;
pub mod env;
pub mod image;
pub mod lrp;
pub mod monitor;
pub mod route;

pub use app::{AppSpec, RouteOverride, RouteOverrides};
pub use lrp::{
    Action, DesiredLrp, DesiredLrpCreateRequest, DesiredLrpUpdateRequest, DownloadAction,
    EnvironmentVariable, RunAction,
};
pub use monitor::{MonitorConfig, MonitorMethod};
pub use route::{AppRoute, AppRoutes};

/// App name used internally to stream debug logs for lattice components.
pub const RESERVED_DEBUG_APP_ID: &str = "lattice-debug";

/// Scheduler domain every app created here is registered under.
pub const LRP_DOMAIN: &str = "lattice";

/// Where each instance fetches the health-check bundle from.
pub const HEALTHCHECK_DOWNLOAD_URL: &str =
    "http://file_server.service.dc1.consul:8080/v1/static/healthcheck.tgz";

/// Directory the health-check bundle is unpacked into.
pub const HEALTHCHECK_DIR: &str = "/tmp";

/// Health-check executable inside [`HEALTHCHECK_DIR`].
pub const HEALTHCHECK_PATH: &str = "/tmp/healthcheck";
