/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The passes run by [`crate::transform_template`].
//!
//! - [`ForTransform`] - loop directives: rewrites the source, binds the aliases
//! - [`SlotTransform`] - slot directives: binds slot props for the element's children
//! - [`ExpressionTransform`] - rewrites every remaining expression slot
//!
//! The scope passes must come before [`ExpressionTransform`] so that names
//! bound on an element are visible to that element's other directives.

mod expression;
mod for_loop;
mod slot;

pub use expression::ExpressionTransform;
pub use for_loop::ForTransform;
pub use slot::SlotTransform;

use stencil_expr::{ExpressionNode, SimpleExpression};

/// The simple, non-static expression in a directive slot, if any.
pub(crate) fn dynamic_expression(slot: &Option<ExpressionNode>) -> Option<SimpleExpression> {
    match slot {
        Some(ExpressionNode::Simple(simple)) if !simple.is_static => Some(simple.clone()),
        _ => None,
    }
}
