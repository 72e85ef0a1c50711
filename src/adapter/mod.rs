//! Implementations of ports (hexagonal adapters).

pub mod receptor;

pub use receptor::ReceptorClient;
