//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`scheduler`] - In-memory [`SchedulerClient`](crate::port::SchedulerClient)
//!   with a call log and injectable failures.
//! - [`spec`] - Builders for [`AppSpec`](crate::domain::AppSpec) values.

pub mod scheduler;
pub mod spec;
