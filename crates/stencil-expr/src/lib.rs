/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Expression parsing and identifier rewriting for stencil templates.
//!
//! Template expressions are evaluated against a render context. This crate
//! takes the raw text of one expression and rewrites every free reference
//! into an access on that context (`foo` becomes `_ctx.foo`) while leaving
//! local bindings, allow-listed globals and literals untouched.
//!
//! # Example
//!
//! ```
//! use stencil_expr::{TransformOptions, rewrite_expression};
//!
//! let (node, diagnostics) = rewrite_expression("foo + Math.max(bar, 1)", &TransformOptions::default(), &[]);
//! assert!(diagnostics.is_empty());
//! assert_eq!(node.to_code(), "_ctx.foo + Math.max(_ctx.bar, 1)");
//! ```

pub mod ast;
pub mod error;
pub mod globals;
pub mod node;
pub mod options;
pub mod parser;
pub mod scope;
pub mod transform;

pub use error::{ConfigError, ConfigResult};
pub use globals::{DEFAULT_GLOBALS, GlobalAllowlist};
pub use node::{CompoundChild, CompoundExpression, ExpressionNode, SimpleExpression};
pub use options::TransformOptions;
pub use parser::{SyntaxError, is_function_expression, is_member_expression, parse_expression, parse_parameters};
pub use scope::{ScopeFrame, ScopeStack};
pub use transform::{ProcessedParameters, RewriteContext, is_simple_identifier, rewrite_expression};
