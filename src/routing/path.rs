//! Mount path derivation.
//!
//! A handler's URL path comes from its registration name: an explicit
//! per-name override when configured, otherwise `/` plus the name with
//! underscores mapped to path separators (`album_new` → `/album/new`).
//! Names are accepted with or without a source-file extension so override
//! tables written against file names keep working.

use std::collections::HashMap;

/// Names starting with this prefix are never mounted.
pub const IGNORE_PREFIX: char = '_';

/// Source-file extensions recognized (and stripped) in registration names
/// and override keys.
const SOURCE_EXTENSIONS: &[&str] = &["js"];

/// Strip one trailing recognized source extension, case-insensitively.
pub fn strip_source_extension(name: &str) -> &str {
    for ext in SOURCE_EXTENSIONS {
        let suffix_len = ext.len() + 1;
        let Some(split) = name.len().checked_sub(suffix_len) else { continue };
        // A tail that starts mid-character cannot be an ASCII extension.
        let Some(suffix) = name.get(split..) else { continue };
        if suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(ext) {
            return &name[..split];
        }
    }
    name
}

/// True when a registration name is mountable: no ignore prefix, and
/// either no extension at all or a recognized source one.
pub fn is_route_source(name: &str) -> bool {
    if name.starts_with(IGNORE_PREFIX) {
        return false;
    }
    strip_source_extension(name) != name || !name.contains('.')
}

/// Compute the mount path for a registration name.
///
/// Overrides are consulted with the name exactly as given; without one,
/// the extension-stripped name maps underscores to path separators.
pub fn derive_route_path(name: &str, overrides: &HashMap<String, String>) -> String {
    if let Some(path) = overrides.get(name) {
        return path.clone();
    }
    format!("/{}", strip_source_extension(name).replace('_', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_overrides() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn test_underscores_become_separators() {
        assert_eq!(derive_route_path("album_new.js", &no_overrides()), "/album/new");
        assert_eq!(derive_route_path("artist_album_top.js", &no_overrides()), "/artist/album/top");
    }

    #[test]
    fn test_name_without_extension_derives_the_same_path() {
        assert_eq!(derive_route_path("album_new", &no_overrides()), "/album/new");
    }

    #[test]
    fn test_single_segment_name() {
        assert_eq!(derive_route_path("login.js", &no_overrides()), "/login");
    }

    #[test]
    fn test_extension_strip_is_case_insensitive() {
        assert_eq!(strip_source_extension("album_new.JS"), "album_new");
        assert_eq!(strip_source_extension("album_new.Js"), "album_new");
    }

    #[test]
    fn test_unrecognized_extension_is_kept() {
        assert_eq!(strip_source_extension("album_new.ts"), "album_new.ts");
        assert_eq!(strip_source_extension("album_new"), "album_new");
    }

    #[test]
    fn test_multibyte_names_strip_without_panicking() {
        // "歌a" is 4 bytes; the candidate split lands inside '歌'.
        assert_eq!(strip_source_extension("歌a"), "歌a");
        assert_eq!(strip_source_extension("歌"), "歌");
        assert_eq!(strip_source_extension("歌.js"), "歌");
        assert_eq!(derive_route_path("歌a", &no_overrides()), "/歌a");
    }

    #[test]
    fn test_route_source_acceptance() {
        assert!(is_route_source("album_new.js"));
        assert!(is_route_source("album_new"));
        assert!(!is_route_source("_scratch.js"));
        assert!(!is_route_source("_scratch"));
        assert!(!is_route_source("notes.txt"));
    }

    #[test]
    fn test_override_wins_over_derivation() {
        let mut overrides = HashMap::new();
        overrides.insert("album_new.js".to_string(), "/custom".to_string());
        assert_eq!(derive_route_path("album_new.js", &overrides), "/custom");
    }

    #[test]
    fn test_override_for_other_name_is_ignored() {
        let mut overrides = HashMap::new();
        overrides.insert("song_url.js".to_string(), "/custom".to_string());
        assert_eq!(derive_route_path("album_new.js", &overrides), "/album/new");
    }
}
