//! Diagnostic messages reported while compiling a template.
//!
//! A [`DiagnosticMessage`] is plain data. It can be rendered as text, with an
//! ariadne snippet when the template source is at hand, or as JSON for tools.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use stencil_source_map::{FileId, SourceContext, SourceLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// The affected expression could not be rewritten
    Error,
    Warning,
    Info,
    Note,
}

impl DiagnosticKind {
    fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
            DiagnosticKind::Info => "Info",
            DiagnosticKind::Note => "Note",
        }
    }
}

/// Bullet style of a detail line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailKind {
    Error,
    Info,
    Note,
}

impl DetailKind {
    fn bullet(self) -> &'static str {
        match self {
            DetailKind::Error => "✖",
            DetailKind::Info => "ℹ",
            DetailKind::Note => "•",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            DetailKind::Error => "error",
            DetailKind::Info => "info",
            DetailKind::Note => "note",
        }
    }
}

/// One bullet under a diagnostic, optionally pointing at its own span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailItem {
    pub kind: DetailKind,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

/// A problem found in a template, with enough context to show it to a user.
///
/// `title` is a short heading ("Invalid Expression"), `problem` says what
/// went wrong, `details` and `hints` add bullets underneath. `code` refers
/// to an entry in the error catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticMessage {
    /// Catalog code such as `S-1-1`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub title: String,
    pub kind: DiagnosticKind,
    pub problem: Option<String>,
    pub details: Vec<DetailItem>,
    pub hints: Vec<String>,

    /// Span in the template, with absolute positions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,

    /// The file `location` refers to, when more than one file is in play
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<FileId>,
}

impl DiagnosticMessage {
    /// A bare diagnostic. [`crate::DiagnosticMessageBuilder`] is usually nicer.
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        DiagnosticMessage {
            code: None,
            title: title.into(),
            kind,
            problem: None,
            details: vec![],
            hints: vec![],
            location: None,
            file_id: None,
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        DiagnosticMessage::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        DiagnosticMessage::new(DiagnosticKind::Warning, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        DiagnosticMessage::new(DiagnosticKind::Info, title)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }

    fn heading(&self) -> String {
        match &self.code {
            Some(code) => format!("{} [{}]: {}", self.kind.label(), code, self.title),
            None => format!("{}: {}", self.kind.label(), self.title),
        }
    }

    /// Render as plain text, one line per part:
    ///
    /// ```text
    /// Error [S-1-1]: Invalid Expression
    /// Error parsing expression: Unexpected end of expression
    /// ✖ detail
    /// ? hint
    /// ```
    ///
    /// If `ctx` holds the file the location points into, the heading,
    /// problem and located details are drawn as an ariadne snippet instead.
    /// Falls back to the plain form otherwise.
    ///
    /// ```
    /// use stencil_error_reporting::DiagnosticMessageBuilder;
    ///
    /// let text = DiagnosticMessageBuilder::error("Invalid Expression")
    ///     .with_code("S-1-1")
    ///     .add_hint("Check the brackets?")
    ///     .build()
    ///     .to_text(None);
    /// assert_eq!(text, "Error [S-1-1]: Invalid Expression\n? Check the brackets?");
    /// ```
    pub fn to_text(&self, ctx: Option<&SourceContext>) -> String {
        let snippet = self
            .location
            .as_ref()
            .zip(ctx)
            .and_then(|(location, ctx)| self.render_snippet(location, ctx));

        let mut lines = Vec::new();
        let bullet = |detail: &DetailItem| format!("{} {}", detail.kind.bullet(), detail.content);
        match snippet {
            Some(snippet) => {
                lines.push(snippet.trim_end().to_string());
                lines.extend(self.details.iter().filter(|d| d.location.is_none()).map(bullet));
            }
            None => {
                lines.push(self.heading());
                lines.extend(self.problem.iter().cloned());
                lines.extend(self.details.iter().map(bullet));
            }
        }
        lines.extend(self.hints.iter().map(|hint| format!("? {hint}")));
        lines.join("\n")
    }

    /// Render as a JSON object for machine consumers.
    ///
    /// Optional parts are omitted rather than written as `null`.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("kind".into(), json!(self.kind.label().to_lowercase()));
        obj.insert("title".into(), json!(self.title));
        if let Some(code) = &self.code {
            obj.insert("code".into(), json!(code));
        }
        if let Some(problem) = &self.problem {
            obj.insert("problem".into(), json!(problem));
        }
        if !self.details.is_empty() {
            let details = self
                .details
                .iter()
                .map(|detail| {
                    let mut item = json!({ "kind": detail.kind.as_str(), "content": detail.content });
                    if let Some(location) = &detail.location {
                        item["location"] = json!(location);
                    }
                    item
                })
                .collect::<Vec<_>>();
            obj.insert("details".into(), Value::Array(details));
        }
        if !self.hints.is_empty() {
            obj.insert("hints".into(), json!(self.hints));
        }
        if let Some(location) = &self.location {
            obj.insert("location".into(), json!(location));
        }
        Value::Object(obj)
    }

    fn render_snippet(&self, location: &SourceLocation, ctx: &SourceContext) -> Option<String> {
        use ariadne::{Config, Label, Report, ReportKind, Source};

        let file = ctx.get_file(self.file_id.unwrap_or(FileId(0)))?;
        // ariadne 0.4 counts characters, not bytes
        let span = |loc: &SourceLocation| {
            Some(char_index(&file.content, loc.start.offset)?..char_index(&file.content, loc.end.offset)?)
        };
        let primary = span(location)?;

        let kind = match self.kind {
            DiagnosticKind::Error => ReportKind::Error,
            DiagnosticKind::Warning => ReportKind::Warning,
            DiagnosticKind::Info | DiagnosticKind::Note => ReportKind::Advice,
        };
        let message = match &self.code {
            Some(code) => format!("[{}] {}", code, self.title),
            None => self.title.clone(),
        };

        let mut report = Report::build(kind, file.path.clone(), primary.start)
            .with_config(Config::default().with_color(false))
            .with_message(message)
            .with_label(
                Label::new((file.path.clone(), primary))
                    .with_message(self.problem.as_deref().unwrap_or(&self.title)),
            );
        for detail in &self.details {
            if let Some(range) = detail.location.as_ref().and_then(span) {
                report = report.with_label(Label::new((file.path.clone(), range)).with_message(&detail.content));
            }
        }

        let mut out = Vec::new();
        report
            .finish()
            .write((file.path.clone(), Source::from(file.content.as_str())), &mut out)
            .ok()?;
        String::from_utf8(out).ok()
    }
}

fn char_index(content: &str, byte_offset: usize) -> Option<usize> {
    content.get(..byte_offset).map(|prefix| prefix.chars().count())
}
