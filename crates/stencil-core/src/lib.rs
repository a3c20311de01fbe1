/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template tree passes for the stencil template compiler.
//!
//! This crate owns the template side of expression rewriting: it walks a
//! [`TemplateRoot`], keeps the scope stack in step with loop and slot
//! directives, and hands each expression to [`stencil_expr`] for rewriting.
//!
//! # Example
//!
//! ```
//! use stencil_core::{TemplateRoot, transform_template};
//! use stencil_error_reporting::DiagnosticCollector;
//! use stencil_expr::TransformOptions;
//!
//! let mut root = TemplateRoot { source: None, children: vec![] };
//! let mut diagnostics = DiagnosticCollector::new();
//! transform_template(&mut root, &TransformOptions::default(), &mut diagnostics);
//! assert!(!diagnostics.has_errors());
//! ```

pub mod error;
pub mod for_expression;
pub mod transform;
pub mod transforms;
pub mod tree;

pub use error::{Result, TemplateError};
pub use for_expression::{ForExpression, parse_for_expression};
pub use transform::{NodeTransform, TemplatePipeline, TransformContext};
pub use transforms::{ExpressionTransform, ForTransform, SlotTransform};
pub use tree::{Attribute, Directive, Element, ForParseResult, TemplateNode, TemplateRoot};

use stencil_error_reporting::DiagnosticSink;
use stencil_expr::TransformOptions;

/// The standard passes, in the order they must run.
pub fn default_pipeline() -> TemplatePipeline {
    let mut pipeline = TemplatePipeline::new();
    pipeline.push(Box::new(ForTransform::new()));
    pipeline.push(Box::new(SlotTransform::new()));
    pipeline.push(Box::new(ExpressionTransform::new()));
    pipeline
}

/// Rewrite every expression in `root` in place.
///
/// Problems are reported to `diagnostics`; the compile always runs to the
/// end and expressions that could not be processed are left as written.
pub fn transform_template(
    root: &mut TemplateRoot,
    options: &TransformOptions,
    diagnostics: &mut dyn DiagnosticSink,
) {
    let mut ctx = TransformContext::new(options, diagnostics);
    let mut pipeline = default_pipeline();
    pipeline.execute(root, &mut ctx);
    debug_assert!(ctx.scope.is_empty(), "scope stack left unbalanced after compile");
}
