/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Parser adapter for template expressions.
//!
//! Expressions are lexed and parsed with chumsky. The two entry points are
//! [`parse_expression`] for expression text and [`parse_parameters`] for
//! binding lists such as loop aliases. Both are pure and report failure as a
//! [`SyntaxError`] carrying a byte range relative to the input text.

use chumsky::{
    error::RichReason,
    input::ValueInput,
    pratt::*,
    prelude::*,
    recursive::{Indirect, Recursive},
};
use std::fmt;
use thiserror::Error;

mod lexer;
pub use lexer::{Token, is_keyword, lexer};

use crate::ast::*;

pub type Span = SimpleSpan;
pub type ParseError<'src> = Rich<'src, Token<'src>, Span>;
type Extra<'src> = extra::Err<ParseError<'src>>;

type ExprParser<'src, I> = Recursive<Indirect<'src, 'src, I, Expr, Extra<'src>>>;
type PatternParser<'src, I> = Recursive<Indirect<'src, 'src, I, Pattern, Extra<'src>>>;

/// A parse failure: what went wrong and where, relative to the parsed text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error parsing expression: {reason}")]
pub struct SyntaxError {
    pub reason: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(reason: impl Into<String>, range: TextRange) -> Self {
        SyntaxError {
            reason: reason.into(),
            range,
        }
    }

    /// Full human-readable message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Parse one expression (a comma sequence is allowed at the top level).
pub fn parse_expression(src: &str) -> Result<Expr, SyntaxError> {
    parse_expression_at(src, 0)
}

/// Parse a comma-separated list of binding patterns, e.g. `item, index` or
/// `{ id, name = 'anon' }`.
pub fn parse_parameters(src: &str) -> Result<Vec<Pattern>, SyntaxError> {
    let tokens = lex(src, 0)?;
    let eoi = Span::from(src.len()..src.len());
    let (expr, pattern) = grammar();
    parameter_list(expr, pattern)
        .then_ignore(end())
        .parse(tokens.map(eoi, split_token))
        .into_result()
        .map_err(|errors| first_error(&errors, "token", eoi))
}

/// True if `src` is a member path such as `foo`, `foo.bar` or `foo[bar].baz`.
///
/// Event handlers use this to tell a handler reference from an inline
/// statement.
pub fn is_member_expression(src: &str) -> bool {
    parse_expression(src.trim()).is_ok_and(|expr| expr.node.is_member_path())
}

/// True if `src` is a function literal, arrow or `function`.
pub fn is_function_expression(src: &str) -> bool {
    parse_expression(src.trim()).is_ok_and(|expr| expr.node.is_function())
}

/// Parse `src` as if it started at byte `base` of a larger text.
fn parse_expression_at(src: &str, base: usize) -> Result<Expr, SyntaxError> {
    let tokens = lex(src, base)?;
    let eoi = Span::from(base + src.len()..base + src.len());
    let (expr, _) = grammar();
    sequence_of(expr)
        .then_ignore(end())
        .parse(tokens.map(eoi, split_token))
        .into_result()
        .map_err(|errors| first_error(&errors, "token", eoi))
}

fn lex(src: &str, base: usize) -> Result<Vec<(Token<'_>, Span)>, SyntaxError> {
    let tokens = lexer().parse(src).into_result().map_err(|errors| {
        let eoi = Span::from(src.len()..src.len());
        let mut error = first_error(&errors, "character", eoi);
        error.range = TextRange::new(error.range.start + base, error.range.end + base);
        error
    })?;
    Ok(tokens
        .into_iter()
        .map(|(token, span)| (token, Span::from(span.start + base..span.end + base)))
        .collect())
}

fn split_token<'a, 'src>(pair: &'a (Token<'src>, Span)) -> (&'a Token<'src>, &'a Span) {
    (&pair.0, &pair.1)
}

fn first_error<T: fmt::Display>(errors: &[Rich<'_, T, Span>], noun: &str, eoi: Span) -> SyntaxError {
    let Some(error) = errors.first() else {
        return SyntaxError::new("Invalid expression", TextRange::new(eoi.start, eoi.end));
    };
    let reason = match error.reason() {
        RichReason::Custom(message) => message.clone(),
        _ => match error.found() {
            Some(found) => format!("Unexpected {} `{}`", noun, found),
            None => "Unexpected end of expression".to_string(),
        },
    };
    let span = error.span();
    SyntaxError::new(reason, TextRange::new(span.start, span.end))
}

fn text_range(span: Span) -> TextRange {
    TextRange::new(span.start, span.end)
}

fn spanned<T>(node: T, span: Span) -> Spanned<T> {
    Spanned {
        node,
        range: text_range(span),
    }
}

fn punct<'src, I>(symbol: &'static str) -> impl Parser<'src, I, Token<'src>, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token<'src>, Span = Span>,
{
    just(Token::Punct(symbol))
}

fn keyword<'src, I>(word: &'static str) -> impl Parser<'src, I, Token<'src>, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token<'src>, Span = Span>,
{
    just(Token::Keyword(word))
}

/// Any punctuation or keyword token from `operators`, as text.
fn operator<'src, I>(
    operators: &'static [&'static str],
) -> impl Parser<'src, I, String, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token<'src>, Span = Span>,
{
    any()
        .filter(move |token: &Token<'src>| {
            matches!(token, Token::Punct(op) | Token::Keyword(op) if operators.contains(op))
        })
        .map(|token: Token<'src>| token.to_string())
}

const UNARY_OPERATORS: &[&str] = &["!", "~", "+", "-", "typeof", "void", "delete", "await", "new"];

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "**=", "<<=", ">>=", ">>>=", "&=", "|=", "^=", "&&=", "||=",
    "??=",
];

fn sequence_of<'src, I, P>(expr: P) -> impl Parser<'src, I, Expr, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token<'src>, Span = Span>,
    P: Parser<'src, I, Expr, Extra<'src>> + Clone,
{
    expr.separated_by(punct(","))
        .at_least(1)
        .collect::<Vec<_>>()
        .map_with(|mut items, extra| {
            if items.len() == 1 {
                items.remove(0)
            } else {
                spanned(Expression::Sequence(items), extra.span())
            }
        })
}

/// `a, { b } = c, ...rest` as used in parameter lists.
fn parameter_list<'src, I>(
    expr: ExprParser<'src, I>,
    pattern: PatternParser<'src, I>,
) -> impl Parser<'src, I, Vec<Pattern>, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token<'src>, Span = Span>,
{
    let rest = punct("...")
        .ignore_then(pattern.clone())
        .map(|inner| Pattern::Rest(Box::new(inner)));
    rest.or(with_default(expr, pattern))
        .separated_by(punct(","))
        .allow_trailing()
        .collect::<Vec<_>>()
}

/// A pattern with an optional `= default` suffix.
fn with_default<'src, I>(
    expr: ExprParser<'src, I>,
    pattern: PatternParser<'src, I>,
) -> impl Parser<'src, I, Pattern, Extra<'src>> + Clone
where
    I: ValueInput<'src, Token = Token<'src>, Span = Span>,
{
    pattern
        .then(punct("=").ignore_then(expr).or_not())
        .map(|(target, default)| match default {
            Some(default) => Pattern::Assignment {
                target: Box::new(target),
                default: Box::new(default),
            },
            None => target,
        })
}

enum Postfix {
    Call { arguments: Vec<Expr>, optional: bool },
    Member { property: Identifier, optional: bool },
    Index { index: Expr, optional: bool },
}

/// What follows an object literal key.
enum PropertyTail {
    Method { params: Vec<Pattern>, body: Vec<Statement> },
    Value(Expr),
}

fn apply_postfix(object: Expr, op: Postfix, span: Span) -> Expr {
    let object = Box::new(object);
    let node = match op {
        Postfix::Call {
            arguments,
            optional,
        } => Expression::Call {
            callee: object,
            arguments,
            optional,
        },
        Postfix::Member { property, optional } => Expression::Member {
            object,
            property,
            optional,
        },
        Postfix::Index { index, optional } => Expression::Index {
            object,
            index: Box::new(index),
            optional,
        },
    };
    spanned(node, span)
}

fn binary(left: Expr, operator: String, right: Expr, span: Span) -> Expr {
    spanned(
        Expression::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}

fn grammar<'src, I>() -> (ExprParser<'src, I>, PatternParser<'src, I>)
where
    I: ValueInput<'src, Token = Token<'src>, Span = Span>,
{
    let mut expr: ExprParser<'src, I> = Recursive::declare();
    let mut pattern: PatternParser<'src, I> = Recursive::declare();

    let identifier = select! { Token::Ident(name) => name.to_string() }
        .map_with(|name, extra| Identifier {
            name,
            range: text_range(extra.span()),
        });

    // After a dot any word is a property name, keywords included
    let property_name = select! {
        Token::Ident(name) => name.to_string(),
        Token::Keyword(name) => name.to_string(),
    }
    .map_with(|name, extra| Identifier {
        name,
        range: text_range(extra.span()),
    });

    let property_key = choice((
        property_name.clone().map(|id| {
            PropertyKey::Static(Spanned {
                node: id.name,
                range: id.range,
            })
        }),
        select! {
            Token::Str(raw) => raw.to_string(),
            Token::Number(raw) => raw.to_string(),
        }
        .map_with(|raw, extra| PropertyKey::Static(spanned(raw, extra.span()))),
        expr.clone()
            .delimited_by(punct("["), punct("]"))
            .map(|key| PropertyKey::Computed(Box::new(key))),
    ))
    .boxed();

    let sequence = sequence_of(expr.clone());
    let default_value = punct("=").ignore_then(expr.clone());
    let pattern_element = with_default(expr.clone(), pattern.clone());
    let params = parameter_list(expr.clone(), pattern.clone())
        .delimited_by(punct("("), punct(")"))
        .boxed();

    let object_pattern_property = choice((
        punct("...")
            .ignore_then(pattern.clone())
            .map(PatternProperty::Rest),
        property_key
            .clone()
            .then_ignore(punct(":"))
            .then(pattern_element.clone())
            .map(|(key, value)| PatternProperty::KeyValue { key, value }),
        identifier
            .clone()
            .then(default_value.clone().or_not())
            .map(|(name, default)| PatternProperty::Shorthand { name, default }),
    ));

    pattern.define(choice((
        identifier.clone().map(Pattern::Identifier),
        parameter_list(expr.clone(), pattern.clone())
            .delimited_by(punct("["), punct("]"))
            .map(Pattern::Array),
        object_pattern_property
            .separated_by(punct(","))
            .allow_trailing()
            .collect::<Vec<_>>()
            .delimited_by(punct("{"), punct("}"))
            .map(Pattern::Object),
    )));

    let block = {
        let declaration = choice((keyword("const"), keyword("let"), keyword("var")))
            .map(|token| token.to_string())
            .then(
                pattern
                    .clone()
                    .then(default_value.clone().or_not())
                    .map(|(target, init)| Declarator { target, init })
                    .separated_by(punct(","))
                    .at_least(1)
                    .collect::<Vec<_>>(),
            )
            .map(|(kind, declarators)| Statement::Declaration { kind, declarators });
        let return_statement = keyword("return")
            .ignore_then(sequence.clone().or_not())
            .map(Statement::Return);
        let expression_statement = sequence.clone().map(Statement::Expression);

        choice((declaration, return_statement, expression_statement))
            .then_ignore(punct(";").repeated())
            .repeated()
            .collect::<Vec<_>>()
            .delimited_by(punct("{"), punct("}"))
            .boxed()
    };

    let function_expression = keyword("function")
        .ignore_then(identifier.clone().or_not())
        .then(params.clone())
        .then(block.clone())
        .map(|((name, params), body)| Function {
            name,
            params,
            body: FunctionBody::Block(body),
            is_arrow: false,
        });

    // Skims `( ... ) =>` without building anything. Parameter defaults are
    // full expressions, so trying `params` on every `(` and then reparsing it
    // as a parenthesized expression would double the work per nesting level.
    let balanced = recursive(|balanced| {
        choice((
            balanced.delimited_by(punct("("), punct(")")),
            any()
                .filter(|token: &Token<'src>| !matches!(token, Token::Punct("(" | ")")))
                .ignored(),
        ))
        .repeated()
    });
    let arrow_head = balanced
        .delimited_by(punct("("), punct(")"))
        .then(punct("=>"))
        .rewind();

    let arrow_function = choice((
        identifier.clone().map(|id| vec![Pattern::Identifier(id)]),
        arrow_head.ignore_then(params.clone()),
    ))
    .then_ignore(punct("=>"))
    .then(choice((
        block.clone().map(FunctionBody::Block),
        expr.clone().map(|body| FunctionBody::Expression(Box::new(body))),
    )))
    .map(|(params, body)| Function {
        name: None,
        params,
        body,
        is_arrow: true,
    });

    let function = choice((arrow_function, function_expression))
        .map_with(|function, extra| spanned(Expression::Function(Box::new(function)), extra.span()));

    let literal = select! {
        Token::Number(raw) => Literal::Number(raw.to_string()),
        Token::Str(raw) => Literal::String(raw.to_string()),
        Token::Keyword("true") => Literal::Boolean(true),
        Token::Keyword("false") => Literal::Boolean(false),
        Token::Keyword("null") => Literal::Null,
        Token::Keyword("this") => Literal::This,
    }
    .map_with(|literal, extra| spanned(Expression::Literal(literal), extra.span()));

    let template = select! { Token::Template(raw) => raw }
        .try_map(|raw: &str, span: Span| {
            parse_template(raw, span.start).map_err(|error| {
                Rich::custom(Span::from(error.range.start..error.range.end), error.reason)
            })
        })
        .map_with(|expressions, extra| spanned(Expression::Template { expressions }, extra.span()));

    let element = choice((
        punct("...")
            .ignore_then(expr.clone())
            .map_with(|argument, extra| spanned(Expression::Spread(Box::new(argument)), extra.span())),
        expr.clone(),
    ));

    let array = element
        .clone()
        .separated_by(punct(","))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(punct("["), punct("]"))
        .map_with(|elements, extra| spanned(Expression::Array(elements), extra.span()));

    // The key is parsed once; a computed key must not be reparsed per form
    let keyed_property = property_key
        .clone()
        .then(choice((
            params
                .clone()
                .then(block.clone())
                .map(|(params, body)| PropertyTail::Method { params, body }),
            punct(":").ignore_then(expr.clone()).map(PropertyTail::Value),
        )))
        .map(|(key, tail)| match tail {
            PropertyTail::Method { params, body } => Property::Method {
                key,
                function: Function {
                    name: None,
                    params,
                    body: FunctionBody::Block(body),
                    is_arrow: false,
                },
            },
            PropertyTail::Value(value) => Property::KeyValue { key, value },
        });

    let object_property = choice((
        punct("...").ignore_then(expr.clone()).map(Property::Spread),
        keyed_property,
        identifier.clone().map(Property::Shorthand),
    ));

    let object = object_property
        .separated_by(punct(","))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(punct("{"), punct("}"))
        .map_with(|properties, extra| spanned(Expression::Object(properties), extra.span()));

    let variable = identifier.clone().map(|id| Spanned {
        node: Expression::Identifier(id.name),
        range: id.range,
    });

    let parenthesized = sequence.clone().delimited_by(punct("("), punct(")"));

    let atom = choice((function, literal, template, variable, array, object, parenthesized)).boxed();

    let call_arguments = element
        .separated_by(punct(","))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(punct("("), punct(")"));
    let index = sequence.clone().delimited_by(punct("["), punct("]"));

    let postfix_op = choice((
        punct("?.")
            .ignore_then(call_arguments.clone())
            .map(|arguments| Postfix::Call {
                arguments,
                optional: true,
            }),
        punct("?.")
            .ignore_then(index.clone())
            .map(|index| Postfix::Index {
                index,
                optional: true,
            }),
        punct("?.")
            .ignore_then(property_name.clone())
            .map(|property| Postfix::Member {
                property,
                optional: true,
            }),
        call_arguments.map(|arguments| Postfix::Call {
            arguments,
            optional: false,
        }),
        index.map(|index| Postfix::Index {
            index,
            optional: false,
        }),
        punct(".")
            .ignore_then(property_name)
            .map(|property| Postfix::Member {
                property,
                optional: false,
            }),
    ))
    .boxed();

    let conditional = punct("?").ignore_then(expr.clone()).then_ignore(punct(":"));

    expr.define(atom.pratt((
        postfix(20, postfix_op, |object, op, extra| apply_postfix(object, op, extra.span())),
        postfix(18, operator(&["++", "--"]), |argument, operator, extra| {
            spanned(
                Expression::Update {
                    operator,
                    prefix: false,
                    argument: Box::new(argument),
                },
                extra.span(),
            )
        }),
        prefix(16, operator(&["++", "--"]), |operator, argument, extra| {
            spanned(
                Expression::Update {
                    operator,
                    prefix: true,
                    argument: Box::new(argument),
                },
                extra.span(),
            )
        }),
        prefix(16, operator(UNARY_OPERATORS), |operator, argument, extra| {
            spanned(
                Expression::Unary {
                    operator,
                    argument: Box::new(argument),
                },
                extra.span(),
            )
        }),
        infix(right(15), operator(&["**"]), |l, op, r, extra| binary(l, op, r, extra.span())),
        infix(left(14), operator(&["*", "/", "%"]), |l, op, r, extra| {
            binary(l, op, r, extra.span())
        }),
        infix(left(13), operator(&["+", "-"]), |l, op, r, extra| binary(l, op, r, extra.span())),
        infix(left(12), operator(&["<<", ">>", ">>>"]), |l, op, r, extra| {
            binary(l, op, r, extra.span())
        }),
        infix(
            left(11),
            operator(&["<", ">", "<=", ">=", "instanceof", "in"]),
            |l, op, r, extra| binary(l, op, r, extra.span()),
        ),
        infix(left(10), operator(&["==", "!=", "===", "!=="]), |l, op, r, extra| {
            binary(l, op, r, extra.span())
        }),
        infix(left(9), operator(&["&"]), |l, op, r, extra| binary(l, op, r, extra.span())),
        infix(left(8), operator(&["^"]), |l, op, r, extra| binary(l, op, r, extra.span())),
        infix(left(7), operator(&["|"]), |l, op, r, extra| binary(l, op, r, extra.span())),
        infix(left(6), operator(&["&&"]), |l, op, r, extra| binary(l, op, r, extra.span())),
        infix(left(5), operator(&["||", "??"]), |l, op, r, extra| binary(l, op, r, extra.span())),
        infix(right(3), conditional, |test, consequent, alternate, extra| {
            spanned(
                Expression::Conditional {
                    test: Box::new(test),
                    consequent: Box::new(consequent),
                    alternate: Box::new(alternate),
                },
                extra.span(),
            )
        }),
        infix(
            right(2),
            operator(ASSIGNMENT_OPERATORS),
            |target, operator, value, extra| {
                spanned(
                    Expression::Assignment {
                        operator,
                        target: Box::new(target),
                        value: Box::new(value),
                    },
                    extra.span(),
                )
            },
        ),
    )));

    (expr, pattern)
}

/// Parse the `${}` substitutions of a raw template literal starting at `base`.
fn parse_template(raw: &str, base: usize) -> Result<Vec<Expr>, SyntaxError> {
    let bytes = raw.as_bytes();
    let mut expressions = Vec::new();
    // skip the opening backtick
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                let start = i + 2;
                let end = matching_brace(bytes, start).ok_or_else(|| {
                    SyntaxError::new(
                        "Unterminated template substitution",
                        TextRange::new(base + i, base + raw.len()),
                    )
                })?;
                expressions.push(parse_expression_at(&raw[start..end], base + start)?);
                i = end + 1;
            }
            _ => i += 1,
        }
    }
    Ok(expressions)
}

/// Index of the `}` closing a substitution whose body starts at `start`.
fn matching_brace(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = start;
    while i < bytes.len() {
        let byte = bytes[i];
        match quote {
            Some(q) => {
                if byte == b'\\' {
                    i += 1;
                } else if byte == q {
                    quote = None;
                }
            }
            None => match byte {
                b'\'' | b'"' => quote = Some(byte),
                b'`' => i = closing_backtick(bytes, i + 1)?,
                b'{' => depth += 1,
                b'}' if depth == 0 => return Some(i),
                b'}' => depth -= 1,
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Index of the backtick closing a template literal whose body starts at `start`.
fn closing_backtick(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return Some(i),
            b'$' if bytes.get(i + 1) == Some(&b'{') => i = matching_brace(bytes, i + 2)? + 1,
            _ => i += 1,
        }
    }
    None
}
