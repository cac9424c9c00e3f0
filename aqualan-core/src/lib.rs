//! Core types, scheduling engine, and service wiring for the Aqualan order backend.

/// Built-in catalog, categories, and delivery zones.
pub mod catalog;
/// Delivery cycle arithmetic: parity, cutoff, next dates.
pub mod cycle;
/// Email composition for customers and staff.
pub mod mail;
/// In-memory store implementations.
pub mod memory;
/// Domain models shared by every crate.
pub mod model;
/// Traits describing the external collaborators.
pub mod ports;
/// Free-text city to route lookup.
pub mod resolver;
/// Route entries and the two-cadence routing table.
pub mod route;
/// Delivery estimates and the shared, reloadable route tables.
pub mod scheduler;
/// High-level service facade used by clients.
pub mod service;

pub use memory::*;
pub use model::*;
pub use ports::*;
pub use resolver::*;
pub use route::*;
pub use scheduler::*;
pub use service::*;
