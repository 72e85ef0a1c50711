//! Docker app lifecycle on top of the scheduler.
//!
//! [`AppRunner`] turns an [`AppSpec`] into a desired LRP and drives create,
//! scale, route update and removal. It keeps no state between calls: every
//! operation looks the app up on the scheduler first.
//!
//! Existence checks and mutations are separate requests. Two concurrent
//! creates for the same name can both pass the check; the scheduler decides
//! which one wins and the loser sees a [`Error::Remote`].

use std::time::Duration;

use tracing::{debug, info};

use crate::domain::env::build_environment;
use crate::domain::image::format_for_receptor;
use crate::domain::monitor::healthcheck_setup;
use crate::domain::route::{compute_routes, routes_from_overrides};
use crate::domain::{
    Action, AppRoutes, AppSpec, DesiredLrp, DesiredLrpCreateRequest, DesiredLrpUpdateRequest,
    RouteOverride, RunAction, LRP_DOMAIN, RESERVED_DEBUG_APP_ID,
};
use crate::error::{Error, Result, SubmitError};
use crate::port::SchedulerClient;

/// Summary of a desired LRP for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSummary {
    pub name: String,
    pub instances: u32,
    pub cpu_weight: u32,
    pub memory_mb: u32,
    pub disk_mb: u32,
    pub routes: AppRoutes,
}

impl From<DesiredLrp> for AppSummary {
    fn from(lrp: DesiredLrp) -> Self {
        Self {
            routes: AppRoutes::from_routing_info(&lrp.routes),
            name: lrp.process_guid,
            instances: lrp.instances,
            cpu_weight: lrp.cpu_weight,
            memory_mb: lrp.memory_mb,
            disk_mb: lrp.disk_mb,
        }
    }
}

pub struct AppRunner<C> {
    scheduler: C,
    system_domain: String,
}

impl<C: SchedulerClient> AppRunner<C> {
    pub fn new(scheduler: C, system_domain: impl Into<String>) -> Self {
        Self {
            scheduler,
            system_domain: system_domain.into(),
        }
    }

    #[must_use]
    pub fn system_domain(&self) -> &str {
        &self.system_domain
    }

    #[must_use]
    pub fn scheduler(&self) -> &C {
        &self.scheduler
    }

    /// Desire a new Docker app.
    ///
    /// Fails with [`Error::ReservedName`], [`Error::InvalidMonitor`] or
    /// [`Error::ImageReference`] before touching the scheduler, and with
    /// [`Error::AlreadyExists`] if the name is taken.
    pub async fn create_docker_app(&self, spec: &AppSpec) -> Result<()> {
        if spec.name == RESERVED_DEBUG_APP_ID {
            return Err(Error::ReservedName);
        }
        spec.monitor.validate()?;
        let request = self.desired_lrp_request(spec)?;

        if self.desired_lrp_exists(&spec.name).await? {
            return Err(Error::AlreadyExists {
                name: spec.name.clone(),
            });
        }

        self.scheduler.upsert_domain(LRP_DOMAIN, Duration::ZERO).await?;
        self.scheduler.create_desired_lrp(&request).await?;

        info!(
            app = %spec.name,
            rootfs = %request.rootfs,
            instances = request.instances,
            "Desired app"
        );
        Ok(())
    }

    /// Submit a desired LRP in the scheduler's own JSON encoding, untranslated.
    ///
    /// Returns the process guid on success. On failure the error carries the
    /// guid whenever the JSON decoded.
    pub async fn submit_lrp(&self, json: &[u8]) -> std::result::Result<String, SubmitError> {
        let request: DesiredLrpCreateRequest =
            serde_json::from_slice(json).map_err(SubmitError::undecodable)?;
        let guid = request.process_guid.clone();

        if guid == RESERVED_DEBUG_APP_ID {
            return Err(SubmitError::attempted(&guid, Error::ReservedName));
        }

        let exists = self
            .desired_lrp_exists(&guid)
            .await
            .map_err(|e| SubmitError::attempted(&guid, e))?;
        if exists {
            return Err(SubmitError::attempted(
                &guid,
                Error::AlreadyExists { name: guid.clone() },
            ));
        }

        self.scheduler
            .upsert_domain(LRP_DOMAIN, Duration::ZERO)
            .await
            .map_err(|e| SubmitError::attempted(&guid, e))?;
        self.scheduler
            .create_desired_lrp(&request)
            .await
            .map_err(|e| SubmitError::attempted(&guid, e))?;

        info!(app = %guid, domain = %request.domain, "Submitted desired LRP");
        Ok(guid)
    }

    /// Set the instance count, leaving every other field alone.
    pub async fn scale_app(&self, name: &str, instances: u32) -> Result<()> {
        self.ensure_started(name).await?;

        self.scheduler
            .update_desired_lrp(name, &DesiredLrpUpdateRequest::instances(instances))
            .await?;

        info!(app = %name, instances, "Scaled app");
        Ok(())
    }

    /// Replace the app's routes with the ones described by `overrides`.
    ///
    /// An empty override list removes every route.
    pub async fn update_app_routes(&self, name: &str, overrides: &[RouteOverride]) -> Result<()> {
        self.ensure_started(name).await?;

        let routes = routes_from_overrides(overrides, &self.system_domain);
        self.scheduler
            .update_desired_lrp(name, &DesiredLrpUpdateRequest::routes(routes.routing_info()))
            .await?;

        info!(app = %name, ports = routes.len(), "Updated app routes");
        Ok(())
    }

    pub async fn remove_app(&self, name: &str) -> Result<()> {
        self.ensure_started(name).await?;

        self.scheduler.delete_desired_lrp(name).await?;

        info!(app = %name, "Removed app");
        Ok(())
    }

    /// Every desired LRP except the debug log stream, sorted by name.
    pub async fn list_apps(&self) -> Result<Vec<AppSummary>> {
        let mut apps: Vec<AppSummary> = self
            .scheduler
            .desired_lrps()
            .await?
            .into_iter()
            .filter(|lrp| lrp.process_guid != RESERVED_DEBUG_APP_ID)
            .map(AppSummary::from)
            .collect();

        apps.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(apps)
    }

    /// Build the full desired LRP for `spec` without submitting it.
    pub fn desired_lrp_request(&self, spec: &AppSpec) -> Result<DesiredLrpCreateRequest> {
        let rootfs = format_for_receptor(&spec.docker_image_path)?;
        let routes = compute_routes(spec, &self.system_domain);

        Ok(DesiredLrpCreateRequest {
            process_guid: spec.name.clone(),
            domain: LRP_DOMAIN.to_string(),
            rootfs,
            instances: spec.instances,
            routes: routes.routing_info(),
            cpu_weight: spec.cpu_weight,
            memory_mb: spec.memory_mb,
            disk_mb: spec.disk_mb,
            // Container-level privilege; the run action decides whether the
            // start command itself runs as root.
            privileged: true,
            ports: spec.exposed_ports.clone(),
            log_guid: spec.name.clone(),
            log_source: "APP".to_string(),
            metrics_guid: spec.name.clone(),
            environment_variables: build_environment(
                &spec.environment_variables,
                spec.monitor.port,
            ),
            setup: Some(healthcheck_setup()),
            action: Some(Action::Run(RunAction {
                path: spec.start_command.clone(),
                args: spec.app_args.clone(),
                dir: spec.working_dir.clone(),
                privileged: spec.privileged,
                ..RunAction::default()
            })),
            monitor: spec.monitor.action(),
            start_timeout: spec.timeout.as_secs(),
            ..DesiredLrpCreateRequest::default()
        })
    }

    async fn ensure_started(&self, name: &str) -> Result<()> {
        if self.desired_lrp_exists(name).await? {
            Ok(())
        } else {
            Err(Error::NotStarted {
                name: name.to_string(),
            })
        }
    }

    async fn desired_lrp_exists(&self, name: &str) -> Result<bool> {
        let exists = self.scheduler.desired_lrp(name).await?.is_some();
        debug!(app = %name, exists, "Checked desired LRP");
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MonitorConfig;
    use crate::testkit::scheduler::FakeScheduler;
    use crate::testkit::spec::app_spec;

    #[test]
    fn request_carries_lattice_metadata() {
        let runner = AppRunner::new(FakeScheduler::new(), "example.com");
        let spec = app_spec("web");

        let request = runner.desired_lrp_request(&spec).unwrap();

        assert_eq!(request.process_guid, "web");
        assert_eq!(request.domain, "lattice");
        assert_eq!(request.log_guid, "web");
        assert_eq!(request.metrics_guid, "web");
        assert_eq!(request.log_source, "APP");
        assert!(request.privileged);
        assert_eq!(request.rootfs, "docker:///cloudfoundry/lattice-app#latest");
    }

    #[test]
    fn run_action_follows_spec() {
        let runner = AppRunner::new(FakeScheduler::new(), "example.com");
        let mut spec = app_spec("web");
        spec.app_args = vec!["--verbose".into()];
        spec.working_dir = "/app".into();
        spec.privileged = false;

        let request = runner.desired_lrp_request(&spec).unwrap();
        let run = request.action.as_ref().and_then(Action::as_run).unwrap();

        assert_eq!(run.path, "/lattice-app");
        assert_eq!(run.args, vec!["--verbose"]);
        assert_eq!(run.dir, "/app");
        assert!(!run.privileged);
    }

    #[test]
    fn unmonitored_app_has_no_monitor_action_but_keeps_setup() {
        let runner = AppRunner::new(FakeScheduler::new(), "example.com");
        let mut spec = app_spec("web");
        spec.monitor = MonitorConfig::none(8080);

        let request = runner.desired_lrp_request(&spec).unwrap();

        assert!(request.monitor.is_none());
        assert!(matches!(request.setup, Some(Action::Download(_))));
    }

    #[test]
    fn start_timeout_is_whole_seconds() {
        let runner = AppRunner::new(FakeScheduler::new(), "example.com");
        let mut spec = app_spec("web");
        spec.timeout = Duration::from_millis(90_500);

        let request = runner.desired_lrp_request(&spec).unwrap();

        assert_eq!(request.start_timeout, 90);
    }
}
