/*
 * transform.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Identifier rewriting for template expressions.
//!
//! [`RewriteContext::process_expression`] turns the raw text of one
//! expression into an [`ExpressionNode`]. Free references get the context
//! prefix; locally bound names, globals and static keys are left alone.
//! The result is either a [`SimpleExpression`] or a compound node that
//! interleaves literal text with one sub-node per identifier occurrence,
//! each carrying its own absolute source location.

use stencil_error_reporting::{DiagnosticCollector, DiagnosticMessageBuilder, DiagnosticSink};
use stencil_source_map::{Position, SourceLocation};

use crate::ast::*;
use crate::node::{CompoundChild, CompoundExpression, ExpressionNode, SimpleExpression};
use crate::options::TransformOptions;
use crate::parser::{SyntaxError, is_keyword, parse_expression, parse_parameters};
use crate::scope::ScopeStack;

/// Per-compile state threaded through every rewrite.
pub struct RewriteContext<'a> {
    pub options: &'a TransformOptions,
    pub scope: &'a mut ScopeStack,
    pub diagnostics: &'a mut dyn DiagnosticSink,
}

/// A processed binding list and the names it introduces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedParameters {
    pub node: ExpressionNode,
    /// Bound names in source order, without duplicates
    pub bindings: Vec<String>,
}

impl<'a> RewriteContext<'a> {
    pub fn new(
        options: &'a TransformOptions,
        scope: &'a mut ScopeStack,
        diagnostics: &'a mut dyn DiagnosticSink,
    ) -> Self {
        RewriteContext {
            options,
            scope,
            diagnostics,
        }
    }

    /// Rewrite one expression against the current scope.
    ///
    /// Never fails: text that does not parse is reported to the diagnostics
    /// sink and returned unchanged.
    pub fn process_expression(&mut self, node: SimpleExpression) -> ExpressionNode {
        if !self.options.prefix_identifiers || node.is_static || node.content.trim().is_empty() {
            return node.into();
        }

        if is_simple_identifier(&node.content) {
            if !should_rewrite(self.options, self.scope, &node.content) {
                return node.into();
            }
            tracing::trace!(identifier = %node.content, "Rewrote bare identifier");
            let content = format!("{}{}", self.options.context_prefix, node.content);
            return SimpleExpression { content, ..node }.into();
        }

        let ast = match parse_expression(&node.content) {
            Ok(ast) => ast,
            Err(error) => {
                self.report_syntax_error(&node, &error, "S-1-1", "Invalid Expression");
                return node.into();
            }
        };

        let mut walker = Walker::new(self.options, self.scope);
        walker.expression(&ast);
        let occurrences = walker.finish();
        tracing::debug!(
            expression = %node.content,
            occurrences = occurrences.len(),
            "Rewrote expression"
        );
        assemble(node, occurrences)
    }

    /// Process a binding list such as a loop alias or slot props.
    ///
    /// Pattern names are emitted unprefixed and default values are
    /// rewritten with the pattern's own names already visible. The caller
    /// decides where the returned bindings are in scope.
    pub fn process_parameters(&mut self, node: SimpleExpression) -> ProcessedParameters {
        if !self.options.prefix_identifiers || node.is_static || node.content.trim().is_empty() {
            return ProcessedParameters {
                node: node.into(),
                bindings: Vec::new(),
            };
        }

        if is_simple_identifier(&node.content) {
            let bindings = vec![node.content.clone()];
            return ProcessedParameters {
                node: node.into(),
                bindings,
            };
        }

        let patterns = match parse_parameters(&node.content) {
            Ok(patterns) => patterns,
            Err(error) => {
                self.report_syntax_error(&node, &error, "S-1-2", "Invalid Binding Pattern");
                return ProcessedParameters {
                    node: node.into(),
                    bindings: Vec::new(),
                };
            }
        };

        let mut bindings = Vec::new();
        for pattern in &patterns {
            pattern.collect_bound_names(&mut bindings);
        }
        let mut seen = std::collections::HashSet::new();
        bindings.retain(|name| seen.insert(name.clone()));

        let mut walker = Walker::new(self.options, self.scope);
        walker.scope.push_frame(bindings.iter().cloned());
        for pattern in &patterns {
            walker.pattern(pattern);
        }
        walker.scope.pop_frame();
        let occurrences = walker.finish();

        ProcessedParameters {
            node: assemble(node, occurrences),
            bindings,
        }
    }

    fn report_syntax_error(
        &mut self,
        node: &SimpleExpression,
        error: &SyntaxError,
        code: &str,
        title: &str,
    ) {
        tracing::debug!(expression = %node.content, reason = %error.reason, "Failed to parse expression");
        let whole = SourceLocation::from_source(node.content.clone(), node.loc.start);
        let location = if error.range.is_empty() {
            whole
        } else {
            whole.slice(error.range.start, error.range.end)
        };
        self.diagnostics.report(
            DiagnosticMessageBuilder::error(title)
                .with_code(code)
                .problem(error.message())
                .add_detail(format!("While rewriting `{}`", node.content))
                .with_location(location)
                .build(),
        );
    }
}

/// Rewrite an expression that starts at the beginning of a document, with
/// `bound` treated as local names.
pub fn rewrite_expression(
    source: &str,
    options: &TransformOptions,
    bound: &[String],
) -> (ExpressionNode, DiagnosticCollector) {
    let mut scope = ScopeStack::new();
    let mut diagnostics = DiagnosticCollector::new();
    if !bound.is_empty() {
        scope.push_frame(bound.iter().cloned());
    }
    let node = {
        let mut ctx = RewriteContext::new(options, &mut scope, &mut diagnostics);
        ctx.process_expression(SimpleExpression::from_source(source, Position::default()))
    };
    (node, diagnostics)
}

/// A plain identifier that is not a reserved word.
pub fn is_simple_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        && !is_keyword(text)
}

fn should_rewrite(options: &TransformOptions, scope: &ScopeStack, name: &str) -> bool {
    !scope.is_bound(name) && !options.globals.contains(name)
}

/// One identifier to splice into the output.
#[derive(Debug)]
struct Occurrence {
    range: TextRange,
    content: String,
    /// Set for a rewritten shorthand property, which must grow a `key: `
    shorthand_key: Option<String>,
}

struct Walker<'w> {
    options: &'w TransformOptions,
    scope: &'w mut ScopeStack,
    occurrences: Vec<Occurrence>,
    depth: usize,
}

impl<'w> Walker<'w> {
    fn new(options: &'w TransformOptions, scope: &'w mut ScopeStack) -> Self {
        let depth = scope.depth();
        Walker {
            options,
            scope,
            occurrences: Vec::new(),
            depth,
        }
    }

    fn finish(mut self) -> Vec<Occurrence> {
        debug_assert_eq!(self.scope.depth(), self.depth, "unbalanced scope frames");
        self.occurrences.sort_by_key(|occurrence| occurrence.range.start);
        debug_assert!(
            self.occurrences
                .windows(2)
                .all(|pair| pair[0].range.start < pair[1].range.start),
            "identifier recorded twice"
        );
        self.occurrences
    }

    fn reference(&mut self, name: &str, range: TextRange, shorthand: bool) {
        let rewrite = should_rewrite(self.options, self.scope, name);
        let content = if rewrite {
            format!("{}{}", self.options.context_prefix, name)
        } else {
            name.to_string()
        };
        self.occurrences.push(Occurrence {
            range,
            content,
            shorthand_key: (rewrite && shorthand).then(|| name.to_string()),
        });
    }

    /// An identifier that is kept as written but still gets its own node.
    fn verbatim(&mut self, id: &Identifier) {
        self.occurrences.push(Occurrence {
            range: id.range,
            content: id.name.clone(),
            shorthand_key: None,
        });
    }

    fn expression(&mut self, expr: &Expr) {
        match &expr.node {
            Expression::Identifier(name) => self.reference(name, expr.range, false),
            Expression::Literal(_) => {}
            Expression::Template { expressions } => {
                for expression in expressions {
                    self.expression(expression);
                }
            }
            Expression::Array(elements) | Expression::Sequence(elements) => {
                for element in elements {
                    self.expression(element);
                }
            }
            Expression::Object(properties) => {
                for property in properties {
                    match property {
                        Property::KeyValue { key, value } => {
                            self.property_key(key);
                            self.expression(value);
                        }
                        Property::Shorthand(id) => self.reference(&id.name, id.range, true),
                        Property::Method { key, function } => {
                            self.property_key(key);
                            self.function(function);
                        }
                        Property::Spread(argument) => self.expression(argument),
                    }
                }
            }
            Expression::Function(function) => self.function(function),
            Expression::Unary { argument, .. }
            | Expression::Update { argument, .. }
            | Expression::Spread(argument) => self.expression(argument),
            Expression::Binary { left, right, .. } => {
                self.expression(left);
                self.expression(right);
            }
            Expression::Assignment { target, value, .. } => {
                self.expression(target);
                self.expression(value);
            }
            Expression::Conditional {
                test,
                consequent,
                alternate,
            } => {
                self.expression(test);
                self.expression(consequent);
                self.expression(alternate);
            }
            Expression::Call {
                callee, arguments, ..
            } => {
                self.expression(callee);
                for argument in arguments {
                    self.expression(argument);
                }
            }
            Expression::Member {
                object, property, ..
            } => {
                self.expression(object);
                self.verbatim(property);
            }
            Expression::Index { object, index, .. } => {
                self.expression(object);
                self.expression(index);
            }
        }
    }

    fn property_key(&mut self, key: &PropertyKey) {
        // Static keys are plain text, not even a verbatim node
        if let PropertyKey::Computed(expr) = key {
            self.expression(expr);
        }
    }

    fn function(&mut self, function: &Function) {
        // A named function expression sees its own name; the enclosing
        // expression does not.
        let mut names = Vec::new();
        if let Some(name) = &function.name {
            names.push(name.name.clone());
        }
        for param in &function.params {
            param.collect_bound_names(&mut names);
        }

        self.scope.push_frame(names);
        if let Some(name) = &function.name {
            self.verbatim(name);
        }
        for param in &function.params {
            self.pattern(param);
        }
        match &function.body {
            FunctionBody::Expression(body) => self.expression(body),
            FunctionBody::Block(statements) => self.statements(statements),
        }
        self.scope.pop_frame();
    }

    fn statements(&mut self, statements: &[Statement]) {
        // Declared names are visible from their declaration to the end of the block
        let mut pushed = 0;
        for statement in statements {
            match statement {
                Statement::Expression(expr) | Statement::Return(Some(expr)) => {
                    self.expression(expr)
                }
                Statement::Return(None) => {}
                Statement::Declaration { declarators, .. } => {
                    let mut names = Vec::new();
                    for declarator in declarators {
                        declarator.target.collect_bound_names(&mut names);
                    }
                    self.scope.push_frame(names);
                    pushed += 1;
                    for declarator in declarators {
                        self.pattern(&declarator.target);
                        if let Some(init) = &declarator.init {
                            self.expression(init);
                        }
                    }
                }
            }
        }
        for _ in 0..pushed {
            self.scope.pop_frame();
        }
    }

    fn pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Identifier(id) => self.verbatim(id),
            Pattern::Object(properties) => {
                for property in properties {
                    match property {
                        PatternProperty::KeyValue { key, value } => {
                            self.property_key(key);
                            self.pattern(value);
                        }
                        PatternProperty::Shorthand { name, default } => {
                            self.verbatim(name);
                            if let Some(default) = default {
                                self.expression(default);
                            }
                        }
                        PatternProperty::Rest(rest) => self.pattern(rest),
                    }
                }
            }
            Pattern::Array(elements) => {
                for element in elements {
                    self.pattern(element);
                }
            }
            Pattern::Assignment { target, default } => {
                self.pattern(target);
                self.expression(default);
            }
            Pattern::Rest(inner) => self.pattern(inner),
        }
    }
}

/// Splice occurrences back into the original text.
fn assemble(node: SimpleExpression, occurrences: Vec<Occurrence>) -> ExpressionNode {
    let raw = node.content.as_str();

    if occurrences.is_empty() {
        return node.into();
    }

    // One identifier covering everything collapses back to a simple node
    if let [only] = occurrences.as_slice() {
        if only.shorthand_key.is_none() && only.range == TextRange::new(0, raw.len()) {
            let content = only.content.clone();
            return SimpleExpression { content, ..node }.into();
        }
    }

    let whole = SourceLocation::from_source(raw, node.loc.start);
    let mut children = Vec::with_capacity(occurrences.len() * 2 + 1);
    let mut cursor = 0;
    for occurrence in occurrences {
        let mut leading = raw
            .get(cursor..occurrence.range.start)
            .unwrap_or_default()
            .to_string();
        if let Some(key) = &occurrence.shorthand_key {
            leading.push_str(key);
            leading.push_str(": ");
        }
        if !leading.is_empty() {
            children.push(CompoundChild::Text(leading));
        }
        children.push(CompoundChild::Expression(SimpleExpression::new(
            occurrence.content,
            whole.slice(occurrence.range.start, occurrence.range.end),
        )));
        cursor = occurrence.range.end;
    }
    if let Some(trailing) = raw.get(cursor..).filter(|rest| !rest.is_empty()) {
        children.push(CompoundChild::Text(trailing.to_string()));
    }

    ExpressionNode::Compound(CompoundExpression {
        children,
        loc: node.loc,
    })
}
