//! Value parsers for command-line flags.

use std::time::Duration;

use crate::domain::RouteOverride;

/// `--monitor-url` value: an optional port and the URI to check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorUrl {
    pub port: Option<u16>,
    pub uri: String,
}

/// Parse `PORT:HOSTNAME_PREFIX`, e.g. `8080:api`.
pub fn parse_route_override(value: &str) -> Result<RouteOverride, String> {
    let (port, prefix) = value
        .split_once(':')
        .ok_or_else(|| format!("expected PORT:HOSTNAME_PREFIX, got '{value}'"))?;

    let port = parse_port(port)?;
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(format!("missing hostname prefix in '{value}'"));
    }

    Ok(RouteOverride::new(prefix, port))
}

/// Parse `PORT:/path` or `/path`.
pub fn parse_monitor_url(value: &str) -> Result<MonitorUrl, String> {
    let (port, uri) = match value.split_once(':') {
        Some((port, uri)) => (Some(parse_port(port)?), uri),
        None => (None, value),
    };

    if !uri.starts_with('/') {
        return Err(format!("monitor URI must start with '/', got '{uri}'"));
    }

    Ok(MonitorUrl {
        port,
        uri: uri.to_string(),
    })
}

/// Parse a duration such as `500ms`, `5s`, `2m`, `1h30m`; a bare number is seconds.
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    humantime::parse_duration(value).map_err(|e| format!("invalid duration '{value}': {e}"))
}

/// Split `KEY=VALUE`; a bare `KEY` takes its value from `lookup`.
pub fn parse_env_var(
    value: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(String, String), String> {
    let (key, val) = match value.split_once('=') {
        Some((key, val)) => (key, val.to_string()),
        None => (value, lookup(value).unwrap_or_default()),
    };

    if key.is_empty() {
        return Err(format!("missing variable name in '{value}'"));
    }
    Ok((key.to_string(), val))
}

fn parse_port(value: &str) -> Result<u16, String> {
    match value.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(format!("invalid port '{value}'")),
        Ok(port) => Ok(port),
    }
}
