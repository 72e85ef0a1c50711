//! Scheduler port for desired-state inventory and mutations.
//!
//! The scheduler owns every desired LRP; implementations hold no local state
//! and every call goes to the remote API.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{DesiredLrp, DesiredLrpCreateRequest, DesiredLrpUpdateRequest};
use crate::error::Result;

/// Operations the app runner needs from the remote scheduler.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - Failures are reported as [`crate::error::Error::Remote`]; nothing retries
/// - A missing record on lookup is `Ok(None)`, not an error
#[async_trait]
pub trait SchedulerClient: Send + Sync {
    /// All desired LRPs, across domains.
    async fn desired_lrps(&self) -> Result<Vec<DesiredLrp>>;

    /// A single desired LRP by process guid.
    async fn desired_lrp(&self, process_guid: &str) -> Result<Option<DesiredLrp>>;

    /// Register `domain`; a zero `ttl` means it never expires.
    async fn upsert_domain(&self, domain: &str, ttl: Duration) -> Result<()>;

    async fn create_desired_lrp(&self, request: &DesiredLrpCreateRequest) -> Result<()>;

    /// Apply a sparse update; unset fields keep their current value.
    async fn update_desired_lrp(
        &self,
        process_guid: &str,
        update: &DesiredLrpUpdateRequest,
    ) -> Result<()>;

    async fn delete_desired_lrp(&self, process_guid: &str) -> Result<()>;
}
