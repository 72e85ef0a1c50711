//! In-memory scheduler for exercising [`AppRunner`](crate::runner::AppRunner).
//!
//! [`FakeScheduler`] behaves like the receptor for the calls the runner makes:
//! creates of an existing guid are rejected with 409, updates apply only the
//! fields that are set, and updates/deletes of unknown guids are 404s.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{DesiredLrp, DesiredLrpCreateRequest, DesiredLrpUpdateRequest};
use crate::error::{RemoteError, Result};
use crate::port::SchedulerClient;

/// Scheduler operations, for scripting failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Lookup,
    UpsertDomain,
    Create,
    Update,
    Delete,
}

/// A call received by the fake, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerCall {
    DesiredLrps,
    DesiredLrp(String),
    UpsertDomain { domain: String, ttl: Duration },
    Create(DesiredLrpCreateRequest),
    Update {
        process_guid: String,
        update: DesiredLrpUpdateRequest,
    },
    Delete(String),
}

impl SchedulerCall {
    /// True for calls that change scheduler state.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::DesiredLrps | Self::DesiredLrp(_))
    }
}

#[derive(Debug, Clone)]
struct ScriptedFailure {
    status: u16,
    message: String,
}

#[derive(Default)]
struct State {
    records: BTreeMap<String, DesiredLrp>,
    domains: BTreeMap<String, Duration>,
    calls: Vec<SchedulerCall>,
    failures: HashMap<Operation, ScriptedFailure>,
}

#[derive(Default)]
pub struct FakeScheduler {
    state: Mutex<State>,
}

impl FakeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing desired LRP.
    pub fn with_app(self, lrp: DesiredLrp) -> Self {
        self.lock().records.insert(lrp.process_guid.clone(), lrp);
        self
    }

    /// Seed a bare desired LRP named `name`.
    pub fn with_app_named(self, name: &str) -> Self {
        self.with_app(DesiredLrp {
            process_guid: name.to_string(),
            domain: crate::domain::LRP_DOMAIN.to_string(),
            instances: 1,
            ..DesiredLrp::default()
        })
    }

    /// Make every call of `operation` fail with the given status.
    pub fn fail_on(self, operation: Operation, status: u16, message: &str) -> Self {
        self.lock().failures.insert(
            operation,
            ScriptedFailure {
                status,
                message: message.to_string(),
            },
        );
        self
    }

    pub fn record(&self, process_guid: &str) -> Option<DesiredLrp> {
        self.lock().records.get(process_guid).cloned()
    }

    pub fn domains(&self) -> BTreeMap<String, Duration> {
        self.lock().domains.clone()
    }

    pub fn calls(&self) -> Vec<SchedulerCall> {
        self.lock().calls.clone()
    }

    pub fn mutations(&self) -> Vec<SchedulerCall> {
        self.calls().into_iter().filter(SchedulerCall::is_mutation).collect()
    }

    /// Create requests received, in order.
    pub fn created(&self) -> Vec<DesiredLrpCreateRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SchedulerCall::Create(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn begin(&self, operation: Operation, call: SchedulerCall) -> Result<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.calls.push(call);
        if let Some(failure) = state.failures.get(&operation) {
            return Err(RemoteError::Rejected {
                status: failure.status,
                kind: None,
                message: failure.message.clone(),
            }
            .into());
        }
        Ok(state)
    }
}

fn not_found(process_guid: &str) -> RemoteError {
    RemoteError::Rejected {
        status: 404,
        kind: Some("DesiredLRPNotFound".to_string()),
        message: format!("desired lrp '{process_guid}' not found"),
    }
}

fn record_from_request(request: &DesiredLrpCreateRequest) -> DesiredLrp {
    DesiredLrp {
        process_guid: request.process_guid.clone(),
        domain: request.domain.clone(),
        rootfs: request.rootfs.clone(),
        instances: request.instances,
        routes: request.routes.clone(),
        cpu_weight: request.cpu_weight,
        memory_mb: request.memory_mb,
        disk_mb: request.disk_mb,
        ports: request.ports.clone(),
        environment_variables: request.environment_variables.clone(),
        annotation: request.annotation.clone(),
    }
}

#[async_trait]
impl SchedulerClient for FakeScheduler {
    async fn desired_lrps(&self) -> Result<Vec<DesiredLrp>> {
        let state = self.begin(Operation::List, SchedulerCall::DesiredLrps)?;
        Ok(state.records.values().cloned().collect())
    }

    async fn desired_lrp(&self, process_guid: &str) -> Result<Option<DesiredLrp>> {
        let state = self.begin(
            Operation::Lookup,
            SchedulerCall::DesiredLrp(process_guid.to_string()),
        )?;
        Ok(state.records.get(process_guid).cloned())
    }

    async fn upsert_domain(&self, domain: &str, ttl: Duration) -> Result<()> {
        let mut state = self.begin(
            Operation::UpsertDomain,
            SchedulerCall::UpsertDomain {
                domain: domain.to_string(),
                ttl,
            },
        )?;
        state.domains.insert(domain.to_string(), ttl);
        Ok(())
    }

    async fn create_desired_lrp(&self, request: &DesiredLrpCreateRequest) -> Result<()> {
        let mut state = self.begin(Operation::Create, SchedulerCall::Create(request.clone()))?;
        if state.records.contains_key(&request.process_guid) {
            return Err(RemoteError::Rejected {
                status: 409,
                kind: Some("DesiredLRPAlreadyExists".to_string()),
                message: format!("desired lrp '{}' already exists", request.process_guid),
            }
            .into());
        }
        state
            .records
            .insert(request.process_guid.clone(), record_from_request(request));
        Ok(())
    }

    async fn update_desired_lrp(
        &self,
        process_guid: &str,
        update: &DesiredLrpUpdateRequest,
    ) -> Result<()> {
        let mut state = self.begin(
            Operation::Update,
            SchedulerCall::Update {
                process_guid: process_guid.to_string(),
                update: update.clone(),
            },
        )?;
        let record = state
            .records
            .get_mut(process_guid)
            .ok_or_else(|| not_found(process_guid))?;

        if let Some(instances) = update.instances {
            record.instances = instances;
        }
        if let Some(routes) = &update.routes {
            record.routes = routes.clone();
        }
        if let Some(annotation) = &update.annotation {
            record.annotation = Some(annotation.clone());
        }
        Ok(())
    }

    async fn delete_desired_lrp(&self, process_guid: &str) -> Result<()> {
        let mut state = self.begin(
            Operation::Delete,
            SchedulerCall::Delete(process_guid.to_string()),
        )?;
        state
            .records
            .remove(process_guid)
            .map(|_| ())
            .ok_or_else(|| not_found(process_guid).into())
    }
}
