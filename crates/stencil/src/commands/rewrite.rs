/*
 * rewrite.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Rewrite command implementation
 */

//! Rewrite command implementation.
//!
//! `stencil rewrite` runs one expression through the rewriter and prints
//! the generated code, or the full node as JSON with `--json`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use stencil_error_reporting::DiagnosticCollector;
use stencil_expr::{RewriteContext, ScopeStack, SimpleExpression};
use stencil_source_map::{Position, SourceContext};
use tracing::debug;

/// Arguments for the rewrite command
#[derive(Debug)]
pub struct RewriteArgs {
    pub expression: String,
    /// Names treated as local bindings
    pub bind: Vec<String>,
    /// Parameter-list mode
    pub params: bool,
    pub config: Option<PathBuf>,
    pub no_prefix: bool,
    pub json: bool,
}

/// Execute the rewrite command
pub fn execute(args: RewriteArgs) -> Result<ExitCode> {
    let options = super::load_options(args.config.as_deref(), args.no_prefix)?;

    let mut scope = ScopeStack::new();
    if !args.bind.is_empty() {
        scope.push_frame(args.bind.iter().cloned());
    }
    let mut diagnostics = DiagnosticCollector::new();

    let input = SimpleExpression::from_source(args.expression.as_str(), Position::default());
    let (node, bindings) = {
        let mut ctx = RewriteContext::new(&options, &mut scope, &mut diagnostics);
        if args.params {
            let processed = ctx.process_parameters(input);
            (processed.node, Some(processed.bindings))
        } else {
            (ctx.process_expression(input), None)
        }
    };
    debug!(compound = node.is_compound(), "Rewrote expression");

    let has_errors = diagnostics.has_errors();
    let mut context = SourceContext::new();
    context.add_file("<expression>", args.expression.as_str());
    super::print_diagnostics(&diagnostics.into_diagnostics(), Some(&context));

    if args.json {
        let mut value = serde_json::json!({ "node": node });
        if let Some(bindings) = &bindings {
            value["bindings"] = serde_json::json!(bindings);
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", node.to_code());
        if let Some(bindings) = &bindings {
            println!("bindings: {}", bindings.join(", "));
        }
    }

    Ok(if has_errors {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
