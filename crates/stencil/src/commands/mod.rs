//! Command implementations for the stencil CLI
//!
//! Each command module handles the CLI interface and delegates to
//! stencil-core and stencil-expr for the actual work.

pub mod compile;
pub mod rewrite;

use std::path::Path;

use anyhow::{Context, Result};
use stencil_error_reporting::DiagnosticMessage;
use stencil_expr::TransformOptions;
use stencil_source_map::SourceContext;

/// Options from `config` if given, otherwise the defaults.
pub fn load_options(config: Option<&Path>, no_prefix: bool) -> Result<TransformOptions> {
    let options = match config {
        Some(path) => TransformOptions::from_toml_file(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => TransformOptions::default(),
    };
    if no_prefix {
        return Ok(options.with_prefix_identifiers(false));
    }
    Ok(options)
}

/// Print diagnostics to stderr, with source snippets when `ctx` has the file.
pub fn print_diagnostics(diagnostics: &[DiagnosticMessage], ctx: Option<&SourceContext>) {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic.to_text(ctx));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = load_options(None, false).unwrap();
        assert_eq!(options, TransformOptions::default());
    }

    #[test]
    fn test_no_prefix_overrides() {
        let options = load_options(None, true).unwrap();
        assert!(!options.prefix_identifiers);
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_options(Some(Path::new("/nonexistent/stencil.toml")), false).unwrap_err();
        assert!(err.to_string().contains("Failed to load options"));
    }
}
