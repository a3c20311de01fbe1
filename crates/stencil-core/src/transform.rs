/*
 * transform.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Template transformation pipeline infrastructure.
 */

//! Template transformation pipeline infrastructure.
//!
//! - [`NodeTransform`] - The trait implemented by every pass
//! - [`TemplatePipeline`] - Ordered collection of passes run over one tree
//! - [`TransformContext`] - Options, scope stack and diagnostics shared by the passes
//!
//! # Traversal order
//!
//! The tree is walked depth first. For each node every transform's `enter`
//! runs in registration order, then the children are visited, then every
//! `exit` runs in reverse order. A pass that pushes a scope frame in `enter`
//! pops it in `exit`, so names bound on an element are visible to the
//! element's own directives and to all of its descendants.

use stencil_error_reporting::DiagnosticSink;
use stencil_expr::{RewriteContext, ScopeStack, TransformOptions};

use crate::tree::{TemplateNode, TemplateRoot};

/// State shared by all passes during one compile.
pub struct TransformContext<'a> {
    pub options: &'a TransformOptions,
    pub scope: ScopeStack,
    pub diagnostics: &'a mut dyn DiagnosticSink,
}

impl<'a> TransformContext<'a> {
    pub fn new(options: &'a TransformOptions, diagnostics: &'a mut dyn DiagnosticSink) -> Self {
        TransformContext {
            options,
            scope: ScopeStack::new(),
            diagnostics,
        }
    }

    /// Borrow the pieces the expression rewriter needs.
    pub fn expressions(&mut self) -> RewriteContext<'_> {
        RewriteContext::new(self.options, &mut self.scope, &mut *self.diagnostics)
    }
}

/// One pass over the template tree.
pub trait NodeTransform {
    /// Human-readable name for this transform.
    ///
    /// Used for logging and debugging.
    fn name(&self) -> &str;

    /// Called before the node's children are visited.
    fn enter(&mut self, node: &mut TemplateNode, ctx: &mut TransformContext<'_>);

    /// Called after the node's children are visited.
    fn exit(&mut self, _node: &mut TemplateNode, _ctx: &mut TransformContext<'_>) {}
}

/// A pipeline of node transforms sharing a single traversal.
pub struct TemplatePipeline {
    transforms: Vec<Box<dyn NodeTransform>>,
}

impl TemplatePipeline {
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Add a transform to the pipeline.
    ///
    /// Transforms enter nodes in the order they are added.
    pub fn push(&mut self, transform: Box<dyn NodeTransform>) {
        self.transforms.push(transform);
    }

    pub fn extend(&mut self, transforms: impl IntoIterator<Item = Box<dyn NodeTransform>>) {
        self.transforms.extend(transforms);
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Walk the whole tree once, running every transform on every node.
    pub fn execute(&mut self, root: &mut TemplateRoot, ctx: &mut TransformContext<'_>) {
        for transform in &self.transforms {
            tracing::debug!(transform = transform.name(), "Running transform");
        }
        for node in &mut root.children {
            self.visit(node, ctx);
        }
    }

    fn visit(&mut self, node: &mut TemplateNode, ctx: &mut TransformContext<'_>) {
        for transform in self.transforms.iter_mut() {
            transform.enter(node, ctx);
        }

        if let TemplateNode::Element(element) = node {
            for child in &mut element.children {
                self.visit(child, ctx);
            }
        }

        for transform in self.transforms.iter_mut().rev() {
            transform.exit(node, ctx);
        }
    }

    /// List the names of all transforms in execution order.
    pub fn transform_names(&self) -> Vec<&str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }
}

impl Default for TemplatePipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;
    use stencil_error_reporting::DiagnosticCollector;
    use stencil_source_map::{Position, SourceLocation};

    use crate::tree::Element;

    /// Records every enter/exit call into a shared log.
    struct Recording {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    fn label(node: &TemplateNode) -> String {
        match node {
            TemplateNode::Element(element) => element.tag.clone(),
            TemplateNode::Text { content, .. } => content.clone(),
            TemplateNode::Interpolation { .. } => "interpolation".to_string(),
        }
    }

    impl NodeTransform for Recording {
        fn name(&self) -> &str {
            self.name
        }

        fn enter(&mut self, node: &mut TemplateNode, _ctx: &mut TransformContext<'_>) {
            self.log.borrow_mut().push(format!("enter {} {}", self.name, label(node)));
        }

        fn exit(&mut self, node: &mut TemplateNode, _ctx: &mut TransformContext<'_>) {
            self.log.borrow_mut().push(format!("exit {} {}", self.name, label(node)));
        }
    }

    fn loc() -> SourceLocation {
        SourceLocation::from_source("", Position::default())
    }

    fn element(tag: &str, children: Vec<TemplateNode>) -> TemplateNode {
        TemplateNode::Element(Element {
            tag: tag.to_string(),
            attributes: vec![],
            directives: vec![],
            children,
            loc: loc(),
        })
    }

    fn text(content: &str) -> TemplateNode {
        TemplateNode::Text {
            content: content.to_string(),
            loc: loc(),
        }
    }

    #[test]
    fn test_enter_in_order_exit_in_reverse() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut pipeline = TemplatePipeline::new();
        pipeline.push(Box::new(Recording { name: "a", log: log.clone() }));
        pipeline.push(Box::new(Recording { name: "b", log: log.clone() }));
        assert_eq!(pipeline.transform_names(), vec!["a", "b"]);

        let mut root = TemplateRoot {
            source: None,
            children: vec![element("div", vec![text("hi")])],
        };
        let options = TransformOptions::default();
        let mut diagnostics = DiagnosticCollector::new();
        let mut ctx = TransformContext::new(&options, &mut diagnostics);
        pipeline.execute(&mut root, &mut ctx);

        assert_eq!(
            *log.borrow(),
            vec![
                "enter a div",
                "enter b div",
                "enter a hi",
                "enter b hi",
                "exit b hi",
                "exit a hi",
                "exit b div",
                "exit a div",
            ]
        );
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = TemplatePipeline::default();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.len(), 0);
    }
}
