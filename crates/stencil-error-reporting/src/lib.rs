//! Error reporting and diagnostic messages for stencil.
//!
//! Messages follow the tidyverse layout (title, problem, bulleted details,
//! hints) and render with ariadne source snippets when the template text is
//! available.
//!
//! - [`DiagnosticMessage`]: One reported problem
//! - [`DiagnosticMessageBuilder`]: Fluent construction (`.problem()`, `.add_detail()`, `.add_hint()`)
//! - [`DiagnosticSink`]: Where diagnostics go while a compile is running
//! - [`DiagnosticCollector`]: A sink that keeps every diagnostic it is given
//! - [`ERROR_CATALOG`]: Stable error codes (`S-<subsystem>-<number>`)
//!
//! Reporting a diagnostic never fails and never aborts the compile; callers
//! decide afterwards whether any error-level diagnostic makes the result unusable.
//!
//! # Example
//!
//! ```
//! use stencil_error_reporting::{DiagnosticCollector, DiagnosticMessageBuilder, DiagnosticSink};
//!
//! let mut diagnostics = DiagnosticCollector::new();
//! diagnostics.report(
//!     DiagnosticMessageBuilder::error("Invalid Expression")
//!         .with_code("S-1-1")
//!         .problem("Error parsing expression: Unexpected end of expression")
//!         .build(),
//! );
//! assert!(diagnostics.has_errors());
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;
pub mod sink;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info, get_subsystem};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage};
pub use sink::{DiagnosticCollector, DiagnosticSink};
