//! Source mapping for stencil
//!
//! This crate tracks where every piece of a template came from. Expressions
//! are parsed out of a larger template, so the parser only ever sees a
//! substring; the types here translate substring-relative byte offsets back
//! to absolute positions in the original template text.
//!
//! # Overview
//!
//! The core types are:
//! - [`Position`]: An absolute point in a template (byte offset, 1-based line and column)
//! - [`SourceLocation`]: A span between two positions plus the text it covers
//! - [`SourceContext`]: Registered source files, used when rendering diagnostics
//!
//! # Example
//!
//! ```rust
//! use stencil_source_map::*;
//!
//! // `{{ foo(bar) }}`: the expression starts after `{{ `
//! let start = Position::new(3, 1, 4);
//! let loc = SourceLocation::from_source("foo(bar)", start);
//!
//! // `bar` sits at bytes 4..7 of the expression
//! let bar = loc.slice(4, 7);
//! assert_eq!(bar.source, "bar");
//! assert_eq!(bar.start, Position::new(7, 1, 8));
//! assert_eq!(bar.end, Position::new(10, 1, 11));
//! ```

pub mod context;
pub mod types;
pub mod utils;

// Re-export main types
pub use context::{SourceContext, SourceFile};
pub use types::{FileId, Position, SourceLocation};
pub use utils::{advance_position, offset_to_position};
