//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! # Available Ports
//!
//! - [`SchedulerClient`] - Desired-LRP inventory and mutations on the remote scheduler

mod scheduler;

pub use scheduler::SchedulerClient;
