//! Cart and catalog session state for the storefront, with snapshot fan-out
//! to any number of consumers.

pub mod channel;
pub mod store;
pub mod totals;
pub mod worker;

pub use channel::{SnapshotChannel, StoreEvent};
pub use store::{AddOutcome, StateStore, StoreConfig};
pub use totals::{compute_totals, DEFAULT_TAX_RATE_BASIS_POINTS};
pub use worker::{spawn_store, ActionResult, StorefrontClient, StorefrontHandle};
