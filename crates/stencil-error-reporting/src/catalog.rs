//! The error-code catalog.
//!
//! Codes look like `S-<subsystem>-<number>` and stay stable across releases
//! so users can search for them. The table lives in `error_catalog.json`
//! and is embedded into the binary.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    /// `expression`, `loop` or `internal`
    pub subsystem: String,
    /// Used as the diagnostic title
    pub title: String,
    pub message_template: String,
    pub since_version: String,
}

/// Every known code, parsed on first use.
///
/// The JSON is compiled in, so a parse failure is a packaging bug and panics.
pub static ERROR_CATALOG: Lazy<HashMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../error_catalog.json"))
        .expect("embedded error catalog is valid JSON")
});

/// Catalog entry for `code`.
///
/// ```
/// use stencil_error_reporting::catalog::get_error_info;
///
/// let info = get_error_info("S-1-1").unwrap();
/// assert_eq!(info.title, "Invalid Expression");
/// ```
pub fn get_error_info(code: &str) -> Option<&ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}

pub fn get_subsystem(code: &str) -> Option<&str> {
    get_error_info(code).map(|info| info.subsystem.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_code_is_listed() {
        let mut codes: Vec<&str> = ERROR_CATALOG.keys().map(String::as_str).collect();
        codes.sort_unstable();
        assert_eq!(codes, vec!["S-0-1", "S-1-1", "S-1-2", "S-2-1", "S-2-2"]);
    }

    #[test]
    fn test_loop_titles() {
        assert_eq!(get_error_info("S-2-1").unwrap().title, "Malformed Loop Expression");
        assert_eq!(get_error_info("S-2-2").unwrap().title, "Missing Loop Expression");
        assert!(get_error_info("S-2-3").is_none());
    }

    #[test]
    fn test_subsystems() {
        assert_eq!(get_subsystem("S-0-1"), Some("internal"));
        assert_eq!(get_subsystem("S-1-2"), Some("expression"));
        assert_eq!(get_subsystem("S-2-2"), Some("loop"));
        assert_eq!(get_subsystem("E-1-1"), None);
    }

    #[test]
    fn test_subsystem_number_matches_name() {
        for (code, info) in ERROR_CATALOG.iter() {
            let number = code.split('-').nth(1).unwrap();
            let expected = match info.subsystem.as_str() {
                "internal" => "0",
                "expression" => "1",
                "loop" => "2",
                other => panic!("unknown subsystem {other}"),
            };
            assert_eq!(number, expected, "{code}");
        }
    }
}
