//! Permission system for checking the bot's own role.
//!
//! Automated join/leave notices are only sent when the bot is an admin of
//! the group. The check always fetches fresh metadata; roles change often
//! enough that a cached answer would send into groups that muted the bot.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let perms = Permissions::new(gateway.clone());
//!
//! if perms.is_self_admin("12036302@g.us").await? {
//!     // ...
//! }
//! ```

mod checker;

pub use checker::Permissions;
