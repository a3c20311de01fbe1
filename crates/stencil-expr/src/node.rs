/*
 * node.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Expression nodes produced by rewriting.

use serde::{Deserialize, Serialize};
use stencil_source_map::{Position, SourceLocation};

/// A single piece of expression text with its location in the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleExpression {
    pub content: String,
    /// Static text (e.g. a plain directive argument) is never parsed.
    #[serde(default)]
    pub is_static: bool,
    pub loc: SourceLocation,
}

impl SimpleExpression {
    pub fn new(content: impl Into<String>, loc: SourceLocation) -> Self {
        SimpleExpression {
            content: content.into(),
            is_static: false,
            loc,
        }
    }

    /// An expression whose content is exactly the template text at `start`.
    pub fn from_source(content: impl Into<String>, start: Position) -> Self {
        let content = content.into();
        let loc = SourceLocation::from_source(content.clone(), start);
        SimpleExpression::new(content, loc)
    }

    pub fn static_text(content: impl Into<String>, loc: SourceLocation) -> Self {
        SimpleExpression {
            is_static: true,
            ..SimpleExpression::new(content, loc)
        }
    }
}

/// One element of a compound expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompoundChild {
    /// Literal text, emitted verbatim
    Text(String),
    /// An identifier occurrence, possibly rewritten
    Expression(SimpleExpression),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundExpression {
    pub children: Vec<CompoundChild>,
    /// Location of the whole original expression
    pub loc: SourceLocation,
}

/// The result of rewriting one expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpressionNode {
    Simple(SimpleExpression),
    Compound(CompoundExpression),
}

impl ExpressionNode {
    pub fn loc(&self) -> &SourceLocation {
        match self {
            ExpressionNode::Simple(simple) => &simple.loc,
            ExpressionNode::Compound(compound) => &compound.loc,
        }
    }

    pub fn as_simple(&self) -> Option<&SimpleExpression> {
        match self {
            ExpressionNode::Simple(simple) => Some(simple),
            ExpressionNode::Compound(_) => None,
        }
    }

    pub fn children(&self) -> &[CompoundChild] {
        match self {
            ExpressionNode::Simple(_) => &[],
            ExpressionNode::Compound(compound) => &compound.children,
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, ExpressionNode::Compound(_))
    }

    /// The rewritten expression as code.
    pub fn to_code(&self) -> String {
        match self {
            ExpressionNode::Simple(simple) => simple.content.clone(),
            ExpressionNode::Compound(compound) => compound
                .children
                .iter()
                .map(|child| match child {
                    CompoundChild::Text(text) => text.as_str(),
                    CompoundChild::Expression(simple) => simple.content.as_str(),
                })
                .collect(),
        }
    }

    /// The content of each child in order: text as written, expressions by
    /// their (rewritten) content. A simple node yields its content alone.
    pub fn fragments(&self) -> Vec<&str> {
        match self {
            ExpressionNode::Simple(simple) => vec![simple.content.as_str()],
            ExpressionNode::Compound(compound) => compound
                .children
                .iter()
                .map(|child| match child {
                    CompoundChild::Text(text) => text.as_str(),
                    CompoundChild::Expression(simple) => simple.content.as_str(),
                })
                .collect(),
        }
    }
}

impl From<SimpleExpression> for ExpressionNode {
    fn from(simple: SimpleExpression) -> Self {
        ExpressionNode::Simple(simple)
    }
}
