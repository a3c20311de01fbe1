/*
 * expression.rs
 * Copyright (c) 2025 Posit, PBC
 */

use stencil_expr::{ExpressionNode, is_function_expression, is_member_expression};

use crate::transform::{NodeTransform, TransformContext};
use crate::transforms::dynamic_expression;
use crate::tree::{Directive, TemplateNode};

/// Rewrites interpolations, directive values and dynamic directive
/// arguments against the current scope.
///
/// `for` and `slot` values are owned by their scope passes and skipped.
#[derive(Debug, Default)]
pub struct ExpressionTransform;

impl ExpressionTransform {
    pub fn new() -> Self {
        ExpressionTransform
    }
}

impl NodeTransform for ExpressionTransform {
    fn name(&self) -> &str {
        "expression"
    }

    fn enter(&mut self, node: &mut TemplateNode, ctx: &mut TransformContext<'_>) {
        match node {
            TemplateNode::Interpolation { content, .. } => {
                if let ExpressionNode::Simple(simple) = content {
                    let simple = simple.clone();
                    *content = ctx.expressions().process_expression(simple);
                }
            }
            TemplateNode::Element(element) => {
                for directive in &mut element.directives {
                    rewrite_directive(directive, ctx);
                }
            }
            TemplateNode::Text { .. } => {}
        }
    }
}

fn rewrite_directive(directive: &mut Directive, ctx: &mut TransformContext<'_>) {
    if let Some(arg) = dynamic_expression(&directive.arg) {
        directive.arg = Some(ctx.expressions().process_expression(arg));
    }

    if directive.name == "for" || directive.name == "slot" {
        return;
    }
    let Some(exp) = dynamic_expression(&directive.exp) else {
        return;
    };

    // An inline handler statement runs with the event in scope
    let inline_handler = directive.name == "on"
        && !is_member_expression(&exp.content)
        && !is_function_expression(&exp.content);

    let rewritten = if inline_handler {
        ctx.scope.push_frame(["$event"]);
        let rewritten = ctx.expressions().process_expression(exp);
        ctx.scope.pop_frame();
        rewritten
    } else {
        ctx.expressions().process_expression(exp)
    };
    directive.exp = Some(rewritten);
}
