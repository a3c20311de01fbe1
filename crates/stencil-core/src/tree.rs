/*
 * tree.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The template tree handed over by a template parser.
//!
//! Every type here round-trips through serde so an external parser can
//! produce the tree as JSON. Expression slots hold [`ExpressionNode`]s;
//! a parser fills them with simple nodes and the passes in
//! [`crate::transforms`] replace them with rewritten ones.

use serde::{Deserialize, Serialize};
use stencil_expr::ExpressionNode;
use stencil_source_map::SourceLocation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRoot {
    /// Full template text, used to render diagnostics with context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemplateNode {
    Element(Element),
    Text {
        content: String,
        loc: SourceLocation,
    },
    /// `{{ expression }}`
    Interpolation {
        content: ExpressionNode,
        loc: SourceLocation,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub directives: Vec<Directive>,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
    pub loc: SourceLocation,
}

/// A plain, non-directive attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    pub loc: SourceLocation,
}

/// A directive such as `:title="heading"`, `@click="save($event)"` or
/// `v-for="item in items"`, with the prefix already stripped from `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub name: String,
    #[serde(default)]
    pub arg: Option<ExpressionNode>,
    #[serde(default)]
    pub exp: Option<ExpressionNode>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub loc: SourceLocation,
    /// Filled in by the loop pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_parse_result: Option<ForParseResult>,
}

/// The rewritten parts of a loop directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForParseResult {
    pub source: ExpressionNode,
    pub value: Option<ExpressionNode>,
    pub key: Option<ExpressionNode>,
    pub index: Option<ExpressionNode>,
}

impl TemplateNode {
    pub fn loc(&self) -> &SourceLocation {
        match self {
            TemplateNode::Element(element) => &element.loc,
            TemplateNode::Text { loc, .. } | TemplateNode::Interpolation { loc, .. } => loc,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            TemplateNode::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl Element {
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|directive| directive.name == name)
    }

    pub fn directive_mut(&mut self, name: &str) -> Option<&mut Directive> {
        self.directives.iter_mut().find(|directive| directive.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_minimal_tree() {
        let json = serde_json::json!({
            "children": [{
                "type": "element",
                "tag": "ul",
                "loc": { "start": { "offset": 0, "line": 1, "column": 1 },
                         "end": { "offset": 9, "line": 1, "column": 10 },
                         "source": "<ul></ul>" },
                "directives": [{
                    "name": "for",
                    "exp": { "type": "simple", "content": "x in xs",
                             "loc": { "start": { "offset": 0, "line": 1, "column": 1 },
                                      "end": { "offset": 7, "line": 1, "column": 8 },
                                      "source": "x in xs" } },
                    "loc": { "start": { "offset": 0, "line": 1, "column": 1 },
                             "end": { "offset": 7, "line": 1, "column": 8 },
                             "source": "x in xs" }
                }]
            }]
        });

        let root: TemplateRoot = serde_json::from_value(json).unwrap();
        assert_eq!(root.source, None);
        let element = root.children[0].as_element().unwrap();
        assert_eq!(element.tag, "ul");
        let directive = element.directive("for").unwrap();
        assert_eq!(directive.exp.as_ref().unwrap().to_code(), "x in xs");
        assert!(directive.arg.is_none());
        assert!(directive.for_parse_result.is_none());
    }
}
