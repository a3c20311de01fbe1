//! Error types for stencil-core

use stencil_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, get_error_info};
use stencil_source_map::SourceLocation;
use thiserror::Error;

/// Structural problems found in template directives.
///
/// These never abort a compile. Passes turn them into diagnostics with
/// [`TemplateError::to_diagnostic`] and move on to the next node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("`{0}` is not of the form `alias in source`")]
    MalformedFor(String),

    #[error("The loop has no source expression")]
    MissingForSource,
}

pub type Result<T> = std::result::Result<T, TemplateError>;

impl TemplateError {
    /// Error-catalog code for this problem
    pub fn code(&self) -> &'static str {
        match self {
            TemplateError::MalformedFor(_) => "S-2-1",
            TemplateError::MissingForSource => "S-2-2",
        }
    }

    pub fn to_diagnostic(&self, location: SourceLocation) -> DiagnosticMessage {
        let code = self.code();
        let title = get_error_info(code)
            .map(|info| info.title.clone())
            .unwrap_or_else(|| "Invalid Template".to_string());
        let mut builder = DiagnosticMessageBuilder::error(title)
            .with_code(code)
            .problem(self.to_string())
            .with_location(location);
        if let TemplateError::MalformedFor(_) = self {
            builder = builder.add_hint("Write the loop as `item in items` or `(item, index) in items`");
        }
        builder.build()
    }
}
