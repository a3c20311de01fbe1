/*
 * for_loop.rs
 * Copyright (c) 2025 Posit, PBC
 */

use stencil_expr::{ExpressionNode, SimpleExpression};

use crate::error::TemplateError;
use crate::for_expression::parse_for_expression;
use crate::transform::{NodeTransform, TransformContext};
use crate::tree::{Directive, ForParseResult, TemplateNode};

/// Scope pass for `for` directives.
///
/// The loop source is rewritten in the enclosing scope, before the aliases
/// exist. The aliases are then bound until the element is exited.
#[derive(Debug, Default)]
pub struct ForTransform {
    // one entry per entered element: did it push a frame?
    pushed: Vec<bool>,
}

impl ForTransform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NodeTransform for ForTransform {
    fn name(&self) -> &str {
        "for"
    }

    fn enter(&mut self, node: &mut TemplateNode, ctx: &mut TransformContext<'_>) {
        let TemplateNode::Element(element) = node else {
            return;
        };
        match element.directive_mut("for") {
            Some(directive) => {
                let bindings = process_for(directive, ctx);
                ctx.scope.push_frame(bindings);
                self.pushed.push(true);
            }
            None => self.pushed.push(false),
        }
    }

    fn exit(&mut self, node: &mut TemplateNode, ctx: &mut TransformContext<'_>) {
        if !matches!(node, TemplateNode::Element(_)) {
            return;
        }
        if self.pushed.pop() == Some(true) {
            ctx.scope.pop_frame();
        }
    }
}

/// Rewrite the loop parts and return the names the loop binds.
fn process_for(directive: &mut Directive, ctx: &mut TransformContext<'_>) -> Vec<String> {
    let Some(exp) = directive.exp.as_ref().and_then(ExpressionNode::as_simple).cloned() else {
        ctx.diagnostics
            .report(TemplateError::MissingForSource.to_diagnostic(directive.loc.clone()));
        return Vec::new();
    };

    let parsed = match parse_for_expression(&exp) {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::debug!(expression = %exp.content, %error, "Rejected loop expression");
            ctx.diagnostics.report(error.to_diagnostic(exp.loc.clone()));
            return Vec::new();
        }
    };

    let mut rewrite = ctx.expressions();
    let source = rewrite.process_expression(parsed.source);

    let mut bindings = Vec::new();
    let mut alias = |part: Option<SimpleExpression>| {
        part.map(|simple| {
            let processed = rewrite.process_parameters(simple);
            bindings.extend(processed.bindings);
            processed.node
        })
    };
    let value = alias(parsed.value);
    let key = alias(parsed.key);
    let index = alias(parsed.index);

    tracing::trace!(?bindings, "Loop aliases");
    directive.for_parse_result = Some(ForParseResult {
        source,
        value,
        key,
        index,
    });
    bindings
}
