/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Rewrite configuration.
//!
//! Options can be built in code or loaded from TOML:
//!
//! ```toml
//! prefix-identifiers = true
//! context-prefix = "_ctx."
//!
//! [globals]
//! include-defaults = true
//! extra = ["window", "console"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::globals::GlobalAllowlist;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TransformOptions {
    /// When false, expressions pass through untouched and unparsed.
    pub prefix_identifiers: bool,
    /// Text spliced in front of every free reference.
    pub context_prefix: String,
    pub globals: GlobalAllowlist,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions {
            prefix_identifiers: true,
            context_prefix: "_ctx.".to_string(),
            globals: GlobalAllowlist::default(),
        }
    }
}

impl TransformOptions {
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let options: TransformOptions = toml::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_toml_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.context_prefix.is_empty() || self.context_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidContextPrefix(self.context_prefix.clone()));
        }
        Ok(())
    }

    pub fn with_context_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.context_prefix = prefix.into();
        self
    }

    pub fn with_globals(mut self, globals: GlobalAllowlist) -> Self {
        self.globals = globals;
        self
    }

    pub fn with_prefix_identifiers(mut self, enabled: bool) -> Self {
        self.prefix_identifiers = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let options = TransformOptions::default();
        assert!(options.prefix_identifiers);
        assert_eq!(options.context_prefix, "_ctx.");
        assert!(options.globals.include_defaults);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(TransformOptions::from_toml_str("").unwrap(), TransformOptions::default());
    }

    #[test]
    fn test_full_toml() {
        let options = TransformOptions::from_toml_str(
            r#"
            prefix-identifiers = false
            context-prefix = "$data."

            [globals]
            include-defaults = false
            extra = ["window"]
            "#,
        )
        .unwrap();

        assert!(!options.prefix_identifiers);
        assert_eq!(options.context_prefix, "$data.");
        assert!(options.globals.contains("window"));
        assert!(!options.globals.contains("Math"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = TransformOptions::from_toml_str("prefix = true").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_invalid_prefix() {
        let err = TransformOptions::from_toml_str(r#"context-prefix = """#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidContextPrefix(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = TransformOptions::from_toml_file(Path::new("/nonexistent/stencil.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
