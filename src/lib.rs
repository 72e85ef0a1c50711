//! Apprunner - desire Docker apps on a lattice scheduler.
//!
//! This crate translates a high-level Docker app description into the
//! scheduler's "desired LRP" (long-running process) request and manages the
//! app's lifecycle: create, raw submit, scale, route updates and removal.
//!
//! # Architecture
//!
//! - **`domain`** - Pure translation: routes, environment, health monitor,
//!   Docker image references and the desired LRP wire types
//! - **`port`** - The [`SchedulerClient`](port::SchedulerClient) trait the
//!   runner depends on
//! - **`adapter`** - HTTP implementation of the scheduler client (receptor API)
//! - **`runner`** - [`AppRunner`](runner::AppRunner), the lifecycle operations
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files and the environment
//! - [`error`] - Error types for the crate
//! - [`cli`] - Command-line interface
//!
//! # Features
//!
//! - `testkit` - In-memory scheduler and spec builders for integration tests
//!
//! # Example
//!
//! ```no_run
//! use apprunner::adapter::ReceptorClient;
//! use apprunner::config::SchedulerConfig;
//! use apprunner::runner::AppRunner;
//!
//! # async fn demo() -> apprunner::error::Result<()> {
//! let client = ReceptorClient::new(&SchedulerConfig::new("http://receptor.example.com"))?;
//! let runner = AppRunner::new(client, "example.com");
//! runner.scale_app("web", 3).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
pub mod runner;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
