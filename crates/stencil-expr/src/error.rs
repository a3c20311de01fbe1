/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for loading rewrite configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading [`crate::TransformOptions`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has unknown keys.
    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// The context prefix cannot be spliced in front of an identifier.
    #[error("Invalid context prefix {0:?}: must be non-empty and contain no whitespace")]
    InvalidContextPrefix(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
