//! Template texts known to the diagnostic renderer

use serde::{Deserialize, Serialize};

use crate::types::FileId;

/// Registered source files, used to render diagnostics with source snippets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceContext {
    files: Vec<SourceFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path or display name, e.g. `<expression>`
    pub path: String,
    pub content: String,
}

impl SourceContext {
    pub fn new() -> Self {
        SourceContext { files: Vec::new() }
    }

    /// Register a text; ids are handed out in insertion order.
    pub fn add_file(&mut self, path: impl Into<String>, content: impl Into<String>) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(SourceFile {
            path: path.into(),
            content: content.into(),
        });
        id
    }

    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context() {
        let ctx = SourceContext::new();
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_add_and_get_file() {
        let mut ctx = SourceContext::new();
        let first = ctx.add_file("a.html", "{{ a }}");
        let second = ctx.add_file("b.html", "{{ b }}");

        assert_eq!(first, FileId(0));
        assert_eq!(second, FileId(1));
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.get_file(second).map(|f| f.path.as_str()), Some("b.html"));
        assert!(ctx.get_file(FileId(7)).is_none());
    }
}
