//! steward-state — metadata store for the steward control plane.
//!
//! Persists services, service attributes, service members, and versioned
//! config files in redb. The store is the sole consistency authority:
//! member updates are compare-and-swap, config writes are content-addressed
//! by MD5, and status transitions are monotonic.

mod error;
mod ids;
mod store;
mod tables;

pub use error::{StateError, StateResult};
pub use ids::{config_file_version, gen_member_config_file_id, md5_hex};
pub use store::MetaStore;
