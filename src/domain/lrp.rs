//! Receptor desired-LRP wire types.
//!
//! These mirror the scheduler's JSON encoding. Fields the crate does not
//! model are kept in `extra` so a raw descriptor survives a decode/encode
//! pass unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Router-keyed routing info, e.g. `{"cf-router": [...]}`.
pub type Routes = BTreeMap<String, serde_json::Value>;

/// A single `name=value` pair in a process environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

impl EnvironmentVariable {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Fetch an archive into the container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadAction {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cache_key: String,
}

/// Run a process inside the container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunAction {
    pub path: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dir: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvironmentVariable>,
    #[serde(default)]
    pub privileged: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log_source: String,
}

/// Scheduler action, encoded as `{"run": {...}}` or `{"download": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Download(DownloadAction),
    Run(RunAction),
    /// Any action kind not built by this crate, passed through untouched.
    #[serde(untagged)]
    Other(serde_json::Value),
}

impl Action {
    /// The run action, if this is one.
    #[must_use]
    pub fn as_run(&self) -> Option<&RunAction> {
        match self {
            Self::Run(run) => Some(run),
            _ => None,
        }
    }
}

/// Body of `POST /v1/desired_lrps`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesiredLrpCreateRequest {
    pub process_guid: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub rootfs: String,
    #[serde(default)]
    pub instances: u32,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub routes: Routes,
    #[serde(default)]
    pub cpu_weight: u32,
    #[serde(default)]
    pub memory_mb: u32,
    #[serde(default)]
    pub disk_mb: u32,
    #[serde(default)]
    pub privileged: bool,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<u16>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log_guid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log_source: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub metrics_guid: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        rename = "env",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub environment_variables: Vec<EnvironmentVariable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor: Option<Action>,
    /// Seconds the scheduler waits for a first healthy report.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub start_timeout: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of `PUT /v1/desired_lrps/{guid}`. Unset fields are left alone by the scheduler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesiredLrpUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<Routes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl DesiredLrpUpdateRequest {
    #[must_use]
    pub fn instances(instances: u32) -> Self {
        Self {
            instances: Some(instances),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn routes(routes: Routes) -> Self {
        Self {
            routes: Some(routes),
            ..Self::default()
        }
    }
}

/// The scheduler's view of a desired LRP.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesiredLrp {
    pub process_guid: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub rootfs: String,
    #[serde(default)]
    pub instances: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub routes: Routes,
    #[serde(default)]
    pub cpu_weight: u32,
    #[serde(default)]
    pub memory_mb: u32,
    #[serde(default)]
    pub disk_mb: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ports: Vec<u16>,
    #[serde(default, deserialize_with = "null_as_default", rename = "env")]
    pub environment_variables: Vec<EnvironmentVariable>,
    #[serde(default)]
    pub annotation: Option<String>,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

/// Go encodes nil slices and maps as `null`; read those as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
