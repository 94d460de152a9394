//! Internationalization (i18n) module.
//!
//! Chat replies are looked up by dotted key in embedded JSON tables.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::utils::fill_placeholders;

/// Language used when a key is missing from the requested table.
pub const FALLBACK_LOCALE: &str = "en";

/// Global translation store: LangCode -> Key -> Text
static TRANSLATIONS: Lazy<HashMap<&'static str, Value>> = Lazy::new(|| {
    let mut map = HashMap::new();

    for (lang, raw) in [("en", include_str!("en.json")), ("id", include_str!("id.json"))] {
        match serde_json::from_str(raw) {
            Ok(val) => {
                map.insert(lang, val);
            }
            Err(e) => tracing::error!("Invalid translation table '{}': {}", lang, e),
        }
    }

    map
});

/// Whether a translation table exists for the language.
pub fn is_supported(lang: &str) -> bool {
    TRANSLATIONS.contains_key(lang)
}

/// Get text for a key in a specific language.
/// Supports nested keys via dot notation, e.g., "leveling.usage".
pub fn get_text(lang: &str, key: &str) -> String {
    if let Some(text) = TRANSLATIONS.get(lang).and_then(|val| resolve_key(val, key)) {
        return text;
    }

    if lang != FALLBACK_LOCALE {
        if let Some(text) = TRANSLATIONS
            .get(FALLBACK_LOCALE)
            .and_then(|val| resolve_key(val, key))
        {
            return text;
        }
    }

    // Key not found
    key.to_string()
}

/// Get text and fill its `{placeholder}` slots.
pub fn get_text_with(lang: &str, key: &str, values: &[(&str, &str)]) -> String {
    fill_placeholders(&get_text(lang, key), values)
}

fn resolve_key(val: &Value, key: &str) -> Option<String> {
    let mut current = val;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    current.as_str().map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_fallback() {
        assert!(is_supported("id"));
        assert_eq!(get_text("id", "tagall.no_message"), "Tidak ada pesan tambahan.");
        assert_eq!(get_text("fr", "tagall.no_message"), "No additional message.");
        assert_eq!(get_text("en", "missing.key"), "missing.key");
    }

    #[test]
    fn test_placeholders() {
        let text = get_text_with("en", "leveling.no_results", &[("level", "50"), ("bonus", "0")]);
        assert_eq!(text, "❌ No results for level 50 with bonus EXP 0%");
    }
}
