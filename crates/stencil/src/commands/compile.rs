/*
 * compile.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Compile command implementation
 */

//! Compile command implementation.
//!
//! `stencil compile` reads a template tree produced by an external parser,
//! runs every pass over it and prints the transformed tree as JSON.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use stencil_core::{TemplateRoot, transform_template};
use stencil_error_reporting::DiagnosticCollector;
use stencil_source_map::SourceContext;
use tracing::{debug, info};

/// Arguments for the compile command
#[derive(Debug)]
pub struct CompileArgs {
    /// Template tree as JSON
    pub input: PathBuf,
    pub config: Option<PathBuf>,
}

/// Execute the compile command
pub fn execute(args: CompileArgs) -> Result<ExitCode> {
    let options = super::load_options(args.config.as_deref(), false)?;

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let mut root: TemplateRoot = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse template tree in {}", args.input.display()))?;
    debug!(nodes = root.children.len(), "Loaded template tree");

    let mut diagnostics = DiagnosticCollector::new();
    transform_template(&mut root, &options, &mut diagnostics);
    info!(diagnostics = diagnostics.len(), "Compiled template");

    let has_errors = diagnostics.has_errors();
    // Snippets need the template text, which the tree may not carry
    let context = root.source.as_ref().map(|source| {
        let mut context = SourceContext::new();
        context.add_file("<template>", source.as_str());
        context
    });
    super::print_diagnostics(&diagnostics.into_diagnostics(), context.as_ref());

    println!("{}", serde_json::to_string_pretty(&root)?);

    Ok(if has_errors {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
