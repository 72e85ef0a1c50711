//! Health monitor selection.
//!
//! Every instance downloads the health-check bundle in its setup phase; the
//! monitor action then runs it against the app's port (and URI, for URL
//! checks).

use std::time::Duration;

use thiserror::Error;

use super::lrp::{Action, DownloadAction, RunAction};
use super::{HEALTHCHECK_DIR, HEALTHCHECK_DOWNLOAD_URL, HEALTHCHECK_PATH};

/// How the scheduler decides an instance is healthy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonitorMethod {
    /// No monitor; an instance is healthy as soon as it starts.
    None,
    /// Healthy while the port accepts TCP connections.
    #[default]
    Port,
    /// Healthy while an HTTP GET on the URI succeeds.
    Url,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorConfig {
    pub method: MonitorMethod,
    pub uri: String,
    pub port: u16,
    /// Per-check timeout; zero leaves the health-check default in place.
    pub timeout: Duration,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MonitorError {
    #[error("monitor port must be set for {method:?} monitoring")]
    MissingPort { method: MonitorMethod },

    #[error("URL monitoring requires a URI")]
    MissingUri,
}

impl MonitorConfig {
    #[must_use]
    pub fn none(port: u16) -> Self {
        Self {
            method: MonitorMethod::None,
            port,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn port(port: u16) -> Self {
        Self {
            method: MonitorMethod::Port,
            port,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn url(port: u16, uri: impl Into<String>) -> Self {
        Self {
            method: MonitorMethod::Url,
            port,
            uri: uri.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.method != MonitorMethod::None && self.port == 0 {
            return Err(MonitorError::MissingPort {
                method: self.method,
            });
        }
        if self.method == MonitorMethod::Url && self.uri.is_empty() {
            return Err(MonitorError::MissingUri);
        }
        Ok(())
    }

    /// Arguments passed to the health-check executable.
    ///
    /// Order is `-timeout`, `-port`, `-uri`; empty for [`MonitorMethod::None`].
    #[must_use]
    pub fn healthcheck_args(&self) -> Vec<String> {
        if self.method == MonitorMethod::None {
            return Vec::new();
        }

        let mut args = Vec::with_capacity(6);
        if !self.timeout.is_zero() {
            args.push("-timeout".to_string());
            args.push(format_go_duration(self.timeout));
        }
        args.push("-port".to_string());
        args.push(self.port.to_string());
        if self.method == MonitorMethod::Url {
            args.push("-uri".to_string());
            args.push(self.uri.clone());
        }
        args
    }

    /// The monitor action, or `None` when the app is not monitored.
    #[must_use]
    pub fn action(&self) -> Option<Action> {
        match self.method {
            MonitorMethod::None => None,
            MonitorMethod::Port | MonitorMethod::Url => Some(Action::Run(RunAction {
                path: HEALTHCHECK_PATH.to_string(),
                args: self.healthcheck_args(),
                log_source: "HEALTH".to_string(),
                ..RunAction::default()
            })),
        }
    }
}

/// Setup action fetching the health-check bundle into each instance.
#[must_use]
pub fn healthcheck_setup() -> Action {
    Action::Download(DownloadAction {
        from: HEALTHCHECK_DOWNLOAD_URL.to_string(),
        to: HEALTHCHECK_DIR.to_string(),
        cache_key: String::new(),
    })
}

/// Render a duration the way the health-check binary's flag parser reads it
/// (`500ms`, `5s`, `1m30s`, `1h0m0s`).
#[must_use]
pub fn format_go_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        return format!("{}µs", trim_fraction(nanos, 1_000));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", trim_fraction(nanos, 1_000_000));
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = trim_fraction(
        u128::from(total_secs % 60) * 1_000_000_000 + u128::from(duration.subsec_nanos()),
        1_000_000_000,
    );

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

fn trim_fraction(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let fraction = value % unit;
    if fraction == 0 {
        return whole.to_string();
    }

    let width = unit.ilog10() as usize;
    let digits = format!("{fraction:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_monitor_without_timeout() {
        let monitor = MonitorConfig::port(8080);

        assert_eq!(monitor.healthcheck_args(), vec!["-port", "8080"]);
    }

    #[test]
    fn url_monitor_with_timeout_orders_flags() {
        let monitor = MonitorConfig::url(8080, "/health").with_timeout(Duration::from_secs(5));

        assert_eq!(
            monitor.healthcheck_args(),
            vec!["-timeout", "5s", "-port", "8080", "-uri", "/health"]
        );
    }

    #[test]
    fn no_monitor_has_no_action() {
        assert!(MonitorConfig::none(8080).action().is_none());
    }

    #[test]
    fn monitor_action_runs_healthcheck_with_health_log_source() {
        let action = MonitorConfig::port(9090).action().unwrap();
        let run = action.as_run().unwrap();

        assert_eq!(run.path, "/tmp/healthcheck");
        assert_eq!(run.log_source, "HEALTH");
        assert!(!run.privileged);
    }

    #[test]
    fn validate_rejects_url_without_uri() {
        let monitor = MonitorConfig::url(8080, "");

        assert_eq!(monitor.validate(), Err(MonitorError::MissingUri));
    }

    #[test]
    fn validate_rejects_missing_port() {
        assert_eq!(
            MonitorConfig::port(0).validate(),
            Err(MonitorError::MissingPort {
                method: MonitorMethod::Port
            })
        );
        assert!(MonitorConfig::none(0).validate().is_ok());
    }

    #[test]
    fn go_duration_formatting() {
        assert_eq!(format_go_duration(Duration::ZERO), "0s");
        assert_eq!(format_go_duration(Duration::from_nanos(250)), "250ns");
        assert_eq!(format_go_duration(Duration::from_micros(1500)), "1.5ms");
        assert_eq!(format_go_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_go_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_go_duration(Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_go_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_go_duration(Duration::from_secs(120)), "2m0s");
        assert_eq!(format_go_duration(Duration::from_secs(3600)), "1h0m0s");
    }
}
