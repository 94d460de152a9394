//! Utility functions.
//!
//! Collection of helper functions used across the bot.

pub mod parser;

pub use parser::{
    fill_placeholders, html_escape, is_digits, is_group_jid, mention_token, normalize_jid,
    split_command,
};
