//! Settings persistence.

mod models;
mod store;

pub use models::*;
pub use store::{SettingsStore, StoreError};
