use std::collections::HashMap;

use deunicode::deunicode;
use sha2::{Digest, Sha256};

/// Fixed storage directory prefix for rendered seat maps.
pub const STORAGE_PREFIX: &str = "generated_seat_maps";

/// Derive the cache/storage key for a guest's rendered seat map.
///
/// The readable part is the romanized guest name, extended with the romanized
/// category when the name occurs more than once in the roster. A short
/// content hash of `name::category` keeps keys unique even when two distinct
/// names romanize to the same slug.
pub fn image_object_key(
    guest_name: &str,
    guest_category: &str,
    name_counts: &HashMap<String, usize>,
) -> String {
    let ambiguous = name_counts.get(guest_name).copied().unwrap_or(0) > 1;
    let prefix = if ambiguous && !guest_category.is_empty() {
        format!("{}_{}", romanize(guest_name), romanize(guest_category))
    } else {
        romanize(guest_name)
    };

    let digest = Sha256::digest(format!("{}::{}", guest_name, guest_category).as_bytes());
    let hash = hex::encode(&digest[..3]);

    format!("{}/{}_{}.png", STORAGE_PREFIX, prefix, hash)
}

/// Transliterate to a lowercase, underscore-delimited, filesystem/URL-safe
/// token. Empty input maps to "unknown"; input with no representable
/// characters maps to "guest".
fn romanize(text: &str) -> String {
    if text.is_empty() {
        return "unknown".to_string();
    }

    let ascii = deunicode(text).to_lowercase();
    let mut out = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        let mapped = if c.is_ascii_alphanumeric() || matches!(c, '.' | '-') {
            c
        } else {
            '_'
        };
        if mapped == '_' && out.ends_with('_') {
            continue;
        }
        out.push(mapped);
    }

    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "guest".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, usize)]) -> HashMap<String, usize> {
        entries
            .iter()
            .map(|(name, n)| (name.to_string(), *n))
            .collect()
    }

    #[test]
    fn romanizes_cjk_names_to_safe_slugs() {
        assert_eq!(romanize("王小明"), "wang_xiao_ming");
        assert_eq!(romanize("Amy Lee"), "amy_lee");
        assert_eq!(romanize(""), "unknown");
    }

    #[test]
    fn derivation_is_idempotent() {
        let counts = counts(&[("王小明", 2)]);
        let a = image_object_key("王小明", "男方同事", &counts);
        let b = image_object_key("王小明", "男方同事", &counts);
        assert_eq!(a, b);
    }

    #[test]
    fn ambiguous_names_diverge_by_category() {
        let counts = counts(&[("王小明", 2)]);
        let a = image_object_key("王小明", "男方同事", &counts);
        let b = image_object_key("王小明", "女方同學", &counts);
        assert_ne!(a, b);
        assert!(a.contains("wang_xiao_ming_"));
    }

    #[test]
    fn unambiguous_name_omits_category_from_prefix() {
        let counts = counts(&[("王小明", 1)]);
        let key = image_object_key("王小明", "男方同事", &counts);
        assert!(key.starts_with("generated_seat_maps/wang_xiao_ming_"));
        assert!(key.ends_with(".png"));
        // prefix + 6 hex chars + extension
        let file = key.rsplit('/').next().unwrap();
        let hash = file
            .strip_prefix("wang_xiao_ming_")
            .unwrap()
            .strip_suffix(".png")
            .unwrap();
        assert_eq!(hash.len(), 6);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
