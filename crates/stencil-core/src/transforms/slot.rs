/*
 * slot.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::transform::{NodeTransform, TransformContext};
use crate::transforms::dynamic_expression;
use crate::tree::TemplateNode;

/// Scope pass for `slot` directives.
///
/// The directive value is a parameter list (`{ item, index }`); its names
/// are bound for the element's children and its defaults are rewritten.
#[derive(Debug, Default)]
pub struct SlotTransform {
    pushed: Vec<bool>,
}

impl SlotTransform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NodeTransform for SlotTransform {
    fn name(&self) -> &str {
        "slot"
    }

    fn enter(&mut self, node: &mut TemplateNode, ctx: &mut TransformContext<'_>) {
        let TemplateNode::Element(element) = node else {
            return;
        };
        let Some(directive) = element.directive_mut("slot") else {
            self.pushed.push(false);
            return;
        };
        let Some(props) = dynamic_expression(&directive.exp) else {
            self.pushed.push(false);
            return;
        };

        let processed = ctx.expressions().process_parameters(props);
        directive.exp = Some(processed.node);
        ctx.scope.push_frame(processed.bindings);
        self.pushed.push(true);
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
