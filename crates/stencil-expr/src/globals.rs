/*
 * globals.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Names that are never rewritten to context lookups.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Built-in globals available to every template expression.
pub static DEFAULT_GLOBALS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "Infinity",
        "undefined",
        "NaN",
        "isFinite",
        "isNaN",
        "parseFloat",
        "parseInt",
        "decodeURI",
        "decodeURIComponent",
        "encodeURI",
        "encodeURIComponent",
        "Math",
        "Number",
        "Date",
        "Array",
        "Object",
        "Boolean",
        "String",
        "RegExp",
        "Map",
        "Set",
        "JSON",
        "Intl",
        "BigInt",
        "require",
        "arguments",
    ]
    .into_iter()
    .collect()
});

/// The globals allowlist for one compile.
///
/// Hosts extend the default set with environment-specific names, or turn
/// the defaults off entirely for targets that provide none of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GlobalAllowlist {
    pub include_defaults: bool,
    pub extra: BTreeSet<String>,
}

impl Default for GlobalAllowlist {
    fn default() -> Self {
        GlobalAllowlist {
            include_defaults: true,
            extra: BTreeSet::new(),
        }
    }
}

impl GlobalAllowlist {
    /// Only the given names, without the built-in defaults.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GlobalAllowlist {
            include_defaults: false,
            extra: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_extra<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        (self.include_defaults && DEFAULT_GLOBALS.contains(name)) || self.extra.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let globals = GlobalAllowlist::default();
        assert!(globals.contains("Math"));
        assert!(globals.contains("undefined"));
        assert!(!globals.contains("window"));
    }

    #[test]
    fn test_extra_names() {
        let globals = GlobalAllowlist::default().with_extra(["window", "console"]);
        assert!(globals.contains("window"));
        assert!(globals.contains("Math"));
    }

    #[test]
    fn test_only() {
        let globals = GlobalAllowlist::only(["$t"]);
        assert!(globals.contains("$t"));
        assert!(!globals.contains("Math"));
    }
}
