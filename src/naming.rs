//! Artifact path convention.
//!
//! Every output is derived from one user-supplied prefix `O`:
//!
//! - `O.png` → the resized base image
//! - `O-<suffix>.png` → one filter artifact (`O-gray.png`, `O-ffb6c1.png`, ...)
//!
//! The prefix is used verbatim and may contain directories (`dist/photo` →
//! `dist/photo-gray.png`). Suffixes that come from outside the program
//! (catalog entry names) go through [`sanitize_suffix`] first, so they can
//! never escape the prefix's directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

const EXTENSION: &str = ".png";

/// Path of the resized base image: `O.png`.
pub fn base_path(prefix: &Path) -> PathBuf {
    let mut s: OsString = prefix.as_os_str().to_owned();
    s.push(EXTENSION);
    PathBuf::from(s)
}

/// Path of a filter artifact: `O-<suffix>.png`.
pub fn artifact_path(prefix: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = prefix.as_os_str().to_owned();
    s.push("-");
    s.push(suffix);
    s.push(EXTENSION);
    PathBuf::from(s)
}

/// Reduce an external name to `[A-Za-z0-9_-]`.
///
/// Other characters are dropped, not replaced, so `"#ffb6c1"` becomes
/// `"ffb6c1"` and `"../x"` becomes `"x"`. May return an empty string.
pub fn sanitize_suffix(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_appends_extension() {
        assert_eq!(base_path(Path::new("out")), PathBuf::from("out.png"));
    }

    #[test]
    fn artifact_path_appends_suffix() {
        assert_eq!(
            artifact_path(Path::new("out"), "nega"),
            PathBuf::from("out-nega.png")
        );
    }

    #[test]
    fn prefix_with_directories_is_kept() {
        assert_eq!(
            artifact_path(Path::new("dist/photo"), "sb"),
            PathBuf::from("dist/photo-sb.png")
        );
    }

    #[test]
    fn prefix_with_dot_is_not_treated_as_extension() {
        assert_eq!(
            artifact_path(Path::new("shots/v1.2"), "gray"),
            PathBuf::from("shots/v1.2-gray.png")
        );
    }

    #[test]
    fn sanitize_keeps_hex_codes() {
        assert_eq!(sanitize_suffix("ffb6c1"), "ffb6c1");
        assert_eq!(sanitize_suffix("#FFB6C1"), "FFB6C1");
    }

    #[test]
    fn sanitize_strips_path_separators() {
        assert_eq!(sanitize_suffix("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_suffix("sky blue"), "skyblue");
        assert_eq!(sanitize_suffix("deep_sky-blue"), "deep_sky-blue");
    }

    #[test]
    fn sanitize_can_be_empty() {
        assert_eq!(sanitize_suffix("桜色"), "");
        assert_eq!(sanitize_suffix(""), "");
    }
}
