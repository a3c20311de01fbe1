//! Builder API for diagnostic messages.
//!
//! The builder encodes the tidyverse message structure: a short title, one
//! problem statement, bulleted details and trailing hints.

use stencil_source_map::{FileId, SourceLocation};

use crate::diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage};

/// Builder for [`DiagnosticMessage`].
///
/// # Example
///
/// ```
/// use stencil_error_reporting::DiagnosticMessageBuilder;
///
/// let error = DiagnosticMessageBuilder::error("Malformed Loop Expression")
///     .with_code("S-2-1")
///     .problem("A loop expression must have the form `alias in source`")
///     .add_detail("Found `item items`")
///     .add_hint("Did you forget `in`?")
///     .build();
/// assert_eq!(error.code.as_deref(), Some("S-2-1"));
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    message: DiagnosticMessage,
}

impl DiagnosticMessageBuilder {
    fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            message: DiagnosticMessage::new(kind, title),
        }
    }

    /// Start an error diagnostic
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    /// Start a warning diagnostic
    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    /// Start an informational diagnostic
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Info, title)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.message.code = Some(code.into());
        self
    }

    /// Set the problem statement
    pub fn problem(mut self, problem: impl Into<String>) -> Self {
        self.message.problem = Some(problem.into());
        self
    }

    /// Add an error detail (✖ bullet)
    pub fn add_detail(self, content: impl Into<String>) -> Self {
        self.push_detail(DetailKind::Error, content.into(), None)
    }

    /// Add an error detail pointing at its own location
    pub fn add_detail_at(self, content: impl Into<String>, location: SourceLocation) -> Self {
        self.push_detail(DetailKind::Error, content.into(), Some(location))
    }

    /// Add an info detail (ℹ bullet)
    pub fn add_info(self, content: impl Into<String>) -> Self {
        self.push_detail(DetailKind::Info, content.into(), None)
    }

    /// Add a note detail (• bullet)
    pub fn add_note(self, content: impl Into<String>) -> Self {
        self.push_detail(DetailKind::Note, content.into(), None)
    }

    /// Add a hint; hints should end with a question mark
    pub fn add_hint(mut self, hint: impl Into<String>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.message.location = Some(location);
        self
    }

    pub fn in_file(mut self, file_id: FileId) -> Self {
        self.message.file_id = Some(file_id);
        self
    }

    pub fn build(self) -> DiagnosticMessage {
        self.message
    }

    fn push_detail(
        mut self,
        kind: DetailKind,
        content: String,
        location: Option<SourceLocation>,
    ) -> Self {
        self.message.details.push(DetailItem {
            kind,
            content,
            location,
        });
        self
    }
}
