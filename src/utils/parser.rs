//! Text helpers shared by commands, events and the console.
//!
//! - Command splitting: `leveling 50 10` -> (`leveling`, [`50`, `10`])
//! - JID helpers: local parts, mention tokens, group detection
//! - HTML escaping for the console page

/// Server part used by personal chat addresses.
pub const USER_SERVER: &str = "s.whatsapp.net";

/// Server part used by group chat addresses.
pub const GROUP_SERVER: &str = "g.us";

/// Split a command into its first word and the remaining words.
pub fn split_command(command: &str) -> (&str, Vec<&str>) {
    let mut words = command.split_whitespace();
    let head = words.next().unwrap_or("");
    (head, words.collect())
}

/// True when the string is non-empty and made of ASCII digits only.
pub fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Local part of a JID (`628123@s.whatsapp.net` -> `628123`).
pub fn jid_local_part(jid: &str) -> &str {
    jid.split('@').next().unwrap_or(jid)
}

/// Mention token rendered in message bodies (`@628123`).
pub fn mention_token(jid: &str) -> String {
    format!("@{}", jid_local_part(jid))
}

/// Whether a chat address points to a group.
pub fn is_group_jid(jid: &str) -> bool {
    jid.strip_suffix(GROUP_SERVER)
        .is_some_and(|rest| rest.ends_with('@'))
}

/// Strip the device suffix from a user JID.
///
/// The session identity looks like `628123:12@s.whatsapp.net`, while
/// group participant lists use `628123@s.whatsapp.net`.
pub fn normalize_jid(jid: &str) -> String {
    let (local, server) = match jid.split_once('@') {
        Some((local, server)) => (local, server),
        None => (jid, USER_SERVER),
    };
    let local = local.split(':').next().unwrap_or(local);
    format!("{}@{}", local, server)
}

/// Escape text for HTML bodies and attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Replace `{key}` placeholders with their values.
pub fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |text, (key, value)| {
        text.replace(&format!("{{{}}}", key), value)
    })
}
