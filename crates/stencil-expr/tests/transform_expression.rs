/*
 * transform_expression.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! End-to-end checks of identifier rewriting, including source locations.

use pretty_assertions::assert_eq;
use stencil_error_reporting::{DiagnosticCollector, DiagnosticMessage};
use stencil_expr::{
    CompoundChild, ExpressionNode, GlobalAllowlist, ProcessedParameters, RewriteContext,
    ScopeStack, SimpleExpression, TransformOptions,
};
use stencil_source_map::Position;

struct Harness {
    options: TransformOptions,
    scope: ScopeStack,
    diagnostics: DiagnosticCollector,
}

impl Harness {
    fn new() -> Self {
        Harness {
            options: TransformOptions::default(),
            scope: ScopeStack::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn bind(mut self, names: &[&str]) -> Self {
        self.scope.push_frame(names.iter().copied());
        self
    }

    fn expression_at(&mut self, source: &str, start: Position) -> ExpressionNode {
        let mut ctx = RewriteContext::new(&self.options, &mut self.scope, &mut self.diagnostics);
        ctx.process_expression(SimpleExpression::from_source(source, start))
    }

    fn expression(&mut self, source: &str) -> ExpressionNode {
        self.expression_at(source, Position::default())
    }

    fn parameters(&mut self, source: &str) -> ProcessedParameters {
        let mut ctx = RewriteContext::new(&self.options, &mut self.scope, &mut self.diagnostics);
        ctx.process_parameters(SimpleExpression::from_source(source, Position::default()))
    }

    fn diagnostics(self) -> Vec<DiagnosticMessage> {
        self.diagnostics.into_diagnostics()
    }
}

fn fragments(source: &str) -> Vec<String> {
    let mut harness = Harness::new();
    let node = harness.expression(source);
    assert!(harness.diagnostics.is_empty(), "unexpected diagnostics for {source}");
    node.fragments().into_iter().map(String::from).collect()
}

#[test]
fn interpolation_identifier_is_prefixed() {
    let node = Harness::new().expression("foo");
    let simple = node.as_simple().unwrap();
    assert_eq!(simple.content, "_ctx.foo");
    assert_eq!(simple.loc.source, "foo");
}

#[test]
fn bound_identifier_is_unchanged() {
    let node = Harness::new().bind(&["foo"]).expression("foo");
    assert_eq!(node.as_simple().unwrap().content, "foo");
}

#[test]
fn globals_and_literals_are_unchanged() {
    let mut harness = Harness::new();
    for source in ["Math", "undefined", "true", "null", "this", "1"] {
        assert_eq!(harness.expression(source).to_code(), source);
    }
}

#[test]
fn locations_are_absolute() {
    let start = Position::new(3, 1, 4);
    let node = Harness::new().expression_at("foo(baz + 1, { key: kuz })", start);
    let nodes: Vec<&SimpleExpression> = node
        .children()
        .iter()
        .filter_map(|child| match child {
            CompoundChild::Expression(simple) => Some(simple),
            CompoundChild::Text(_) => None,
        })
        .collect();

    let spans: Vec<(&str, usize, usize, usize, usize)> = nodes
        .iter()
        .map(|n| {
            (
                n.content.as_str(),
                n.loc.start.offset,
                n.loc.end.offset,
                n.loc.start.column,
                n.loc.end.column,
            )
        })
        .collect();
    assert_eq!(
        spans,
        vec![
            ("_ctx.foo", 3, 6, 4, 7),
            ("_ctx.baz", 7, 10, 8, 11),
            ("_ctx.kuz", 23, 26, 24, 27),
        ]
    );
    assert_eq!(nodes[0].loc.source, "foo");
    assert_eq!(node.loc().start, start);
}

/// One line per child: text fragments quoted, rewritten nodes with their span.
fn render(node: &ExpressionNode) -> String {
    node.children()
        .iter()
        .map(|child| match child {
            CompoundChild::Text(text) => format!("text {text:?}"),
            CompoundChild::Expression(simple) => format!(
                "expr {} {}..{} {}:{}-{}:{}",
                simple.content,
                simple.loc.start.offset,
                simple.loc.end.offset,
                simple.loc.start.line,
                simple.loc.start.column,
                simple.loc.end.line,
                simple.loc.end.column,
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn compound_output_renders_with_locations() {
    let node = Harness::new().expression_at("foo(baz + 1, { key: kuz })", Position::new(3, 1, 4));
    insta::assert_snapshot!(render(&node), @r#"
    expr _ctx.foo 3..6 1:4-1:7
    text "("
    expr _ctx.baz 7..10 1:8-1:11
    text " + 1, { key: "
    expr _ctx.kuz 23..26 1:24-1:27
    text " })"
    "#);
}

#[test]
fn shorthand_output_renders_with_locations() {
    let node = Harness::new().expression("{ foo,\n  bar }");
    insta::assert_snapshot!(render(&node), @r#"
    text "{ foo: "
    expr _ctx.foo 2..5 1:3-1:6
    text ",\n  bar: "
    expr _ctx.bar 9..12 2:3-2:6
    text " }"
    "#);
}

#[test]
fn deeply_nested_parentheses_parse_quickly() {
    // `(v19 = (v18 = ... (v0 = 1)...))`: each level looks like an arrow
    // parameter list with a default until the missing `=>`
    let mut source = "1".to_string();
    for depth in 0..20 {
        source = format!("(v{depth} = {source})");
    }

    let started = std::time::Instant::now();
    let mut harness = Harness::new();
    let node = harness.expression(&source);
    let elapsed = started.elapsed();

    assert!(harness.diagnostics.is_empty());
    assert!(node.to_code().starts_with("(_ctx.v19 = (_ctx.v18 = "));
    assert!(elapsed < std::time::Duration::from_secs(2), "took {elapsed:?}");
}

#[test]
fn locations_across_lines() {
    let node = Harness::new().expression("a +\n  b");
    let CompoundChild::Expression(b) = &node.children()[2] else {
        panic!("expected expression child");
    };
    assert_eq!(b.content, "_ctx.b");
    assert_eq!(b.loc.start, Position::new(6, 2, 3));
}

#[test]
fn member_chain_keeps_property_names() {
    assert_eq!(fragments("foo.bar.baz"), vec!["_ctx.foo", ".", "bar", ".", "baz"]);
}

#[test]
fn computed_member_access() {
    assert_eq!(
        fragments("foo[bar][baz]"),
        vec!["_ctx.foo", "[", "_ctx.bar", "][", "_ctx.baz", "]"]
    );
}

#[test]
fn object_literal_keys() {
    assert_eq!(fragments("{ foo: bar }"), vec!["{ foo: ", "_ctx.bar", " }"]);
    assert_eq!(fragments("{ foo }"), vec!["{ foo: ", "_ctx.foo", " }"]);
    assert_eq!(
        fragments("{ [foo]: bar }"),
        vec!["{ [", "_ctx.foo", "]: ", "_ctx.bar", " }"]
    );
}

#[test]
fn object_method_body() {
    assert_eq!(
        fragments("{ foo() { baz() }, value: bar }"),
        vec!["{ foo() { ", "_ctx.baz", "() }, value: ", "_ctx.bar", " }"]
    );
}

#[test]
fn arrow_function_params() {
    assert_eq!(
        fragments("foo => foo + bar"),
        vec!["foo", " => ", "foo", " + ", "_ctx.bar"]
    );
    assert_eq!(
        fragments("(foo = baz) => foo + bar"),
        vec!["(", "foo", " = ", "_ctx.baz", ") => ", "foo", " + ", "_ctx.bar"]
    );
    assert_eq!(
        fragments("({ foo }) => foo + bar"),
        vec!["({ ", "foo", " }) => ", "foo", " + ", "_ctx.bar"]
    );
    assert_eq!(
        fragments("({ foo = bar }) => foo + bar"),
        vec!["({ ", "foo", " = ", "_ctx.bar", " }) => ", "foo", " + ", "_ctx.bar"]
    );
}

#[test]
fn arrow_params_do_not_leak() {
    assert_eq!(
        fragments("{ a: foo => foo, b: foo }"),
        vec!["{ a: ", "foo", " => ", "foo", ", b: ", "_ctx.foo", " }"]
    );
}

#[test]
fn function_expression() {
    assert_eq!(
        fragments("function foo() { return bar }"),
        vec!["function ", "foo", "() { return ", "_ctx.bar", " }"]
    );
}

#[test]
fn assignment_targets() {
    assert_eq!(fragments("x = 1"), vec!["_ctx.x", " = 1"]);
    assert_eq!(
        fragments("{ x, y: [z] } = obj"),
        vec!["{ x: ", "_ctx.x", ", y: [", "_ctx.z", "] } = ", "_ctx.obj"]
    );
}

#[test]
fn global_member_call() {
    assert_eq!(fragments("Math.max(1, 2)"), vec!["Math", ".", "max", "(1, 2)"]);
}

#[test]
fn custom_globals() {
    let mut harness = Harness::new();
    harness.options = TransformOptions::default()
        .with_globals(GlobalAllowlist::only(["window"]));
    assert_eq!(harness.expression("window").to_code(), "window");
    assert_eq!(harness.expression("Math").to_code(), "_ctx.Math");
}

#[test]
fn scope_is_restored_after_each_call() {
    let mut harness = Harness::new();
    harness.expression("(a) => { let b = a; return b }");
    assert!(harness.scope.is_empty());
    assert_eq!(harness.expression("a").to_code(), "_ctx.a");
}

#[test]
fn syntax_error_reports_once_and_returns_input() {
    let mut harness = Harness::new();
    let node = harness.expression("a( ");
    assert_eq!(node.as_simple().unwrap().content, "a( ");

    let diagnostics = harness.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.code.as_deref(), Some("S-1-1"));
    assert!(diagnostic.is_error());
    assert_eq!(
        diagnostic.problem.as_deref(),
        Some("Error parsing expression: Unexpected end of expression")
    );
}

#[test]
fn syntax_error_location_points_at_token() {
    let mut harness = Harness::new();
    harness.expression_at("a b", Position::new(10, 2, 5));
    let diagnostics = harness.diagnostics();
    let location = diagnostics[0].location.as_ref().unwrap();
    assert_eq!(location.start, Position::new(12, 2, 7));
    assert_eq!(location.source, "b");
}

#[test]
fn parameters_complex_alias() {
    let mut harness = Harness::new();
    let processed = harness.parameters("{ foo = bar, baz: [qux = quux] }");
    assert_eq!(processed.bindings, vec!["foo", "qux"]);
    assert_eq!(
        processed.node.fragments(),
        vec!["{ ", "foo", " = ", "_ctx.bar", ", baz: [", "qux", " = ", "_ctx.quux", "] }"]
    );
    assert!(harness.scope.is_empty());
}

#[test]
fn parameters_list_with_rest() {
    let processed = Harness::new().parameters("item, index, ...rest");
    assert_eq!(processed.bindings, vec!["item", "index", "rest"]);
    assert!(processed.node.is_compound());
}

#[test]
fn compound_serializes_with_type_tag() {
    let node = Harness::new().expression("a.b");
    let json = serde_json::to_value(&node).unwrap();
    assert_eq!(json["type"], "compound");
    assert_eq!(json["children"][1], ".");
    assert_eq!(json["children"][0]["content"], "_ctx.a");
}
