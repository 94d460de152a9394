//! Settings document models.

pub mod settings;

pub use settings::{CannedMessage, Settings, USER_PLACEHOLDER};
