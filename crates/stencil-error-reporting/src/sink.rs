//! Diagnostic sinks.
//!
//! The compiler never stops on a bad expression. Instead it hands a
//! diagnostic to a sink and carries on with the rest of the template.

use crate::diagnostic::DiagnosticMessage;

/// Receiver for diagnostics produced during a compile.
///
/// Any `FnMut(DiagnosticMessage)` closure is a sink, so hosts can forward
/// diagnostics to their own error channel without an adapter type.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: DiagnosticMessage);
}

impl<F> DiagnosticSink for F
where
    F: FnMut(DiagnosticMessage),
{
    fn report(&mut self, diagnostic: DiagnosticMessage) {
        self(diagnostic)
    }
}

/// Collects diagnostics during a compile.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<DiagnosticMessage>,
}

impl DiagnosticCollector {
    /// Create a new empty diagnostic collector.
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    /// Check if any errors have been collected.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(DiagnosticMessage::is_error)
    }

    /// Diagnostics in the order they were reported.
    pub fn diagnostics(&self) -> &[DiagnosticMessage] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Consume the collector, returning diagnostics sorted by source position.
    ///
    /// Diagnostics without a location keep their relative order and go last.
    pub fn into_diagnostics(mut self) -> Vec<DiagnosticMessage> {
        self.diagnostics
            .sort_by_key(|d| d.location.as_ref().map_or(usize::MAX, |l| l.start.offset));
        self.diagnostics
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn report(&mut self, diagnostic: DiagnosticMessage) {
        tracing::trace!(title = %diagnostic.title, "Collected diagnostic");
        self.diagnostics.push(diagnostic);
    }
}
