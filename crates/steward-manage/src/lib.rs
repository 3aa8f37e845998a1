//! steward-manage — the catalog creation and initialization pipeline.
//!
//! Couples the three-substrate create protocol (metadata + DNS + container
//! platform), the versioned member-config update routines, the in-memory
//! init task runner, and the per-catalog config mutators behind one
//! façade, [`CatalogService`], which the HTTP layer exposes.

pub mod configs;

mod create;
mod error;
mod facade;
mod mutators;
mod tasks;

pub use create::ServiceManager;
pub use error::{Error, Result};
pub use facade::CatalogService;
pub use tasks::{InitTaskRunner, ServiceTask};
