/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Abstract syntax tree for template expressions.
//!
//! The tree only models what identifier rewriting needs: every identifier
//! carries the byte range it was parsed from, and every construct that can
//! introduce or reference a name has its own variant. Ranges are relative to
//! the start of the parsed text.

/// Byte range within the parsed text (`start` inclusive, `end` exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        TextRange { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub range: TextRange,
}

pub type Expr = Spanned<Expression>;

/// A name together with where it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(String),
    String(String),
    Boolean(bool),
    Null,
    This,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(String),
    Literal(Literal),
    /// Template literal; only the `${}` substitutions matter for rewriting
    Template {
        expressions: Vec<Expr>,
    },
    Array(Vec<Expr>),
    Object(Vec<Property>),
    Function(Box<Function>),
    Unary {
        operator: String,
        argument: Box<Expr>,
    },
    Update {
        operator: String,
        prefix: bool,
        argument: Box<Expr>,
    },
    Binary {
        operator: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assignment {
        operator: String,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        optional: bool,
    },
    /// `object.property`; the property name is never a reference
    Member {
        object: Box<Expr>,
        property: Identifier,
        optional: bool,
    },
    /// `object[index]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        optional: bool,
    },
    Spread(Box<Expr>),
    Sequence(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    KeyValue { key: PropertyKey, value: Expr },
    /// `{ foo }`
    Shorthand(Identifier),
    /// `{ foo() { ... } }`
    Method { key: PropertyKey, function: Function },
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// Identifier, string or number key written without brackets
    Static(Spanned<String>),
    /// `[expr]`
    Computed(Box<Expr>),
}

/// A function literal: arrow function, function expression or object method.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Own name of a named function expression
    pub name: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: FunctionBody,
    pub is_arrow: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    Expression(Box<Expr>),
    Block(Vec<Statement>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(Expr),
    Return(Option<Expr>),
    /// `const`/`let`/`var` with one or more declarators
    Declaration {
        kind: String,
        declarators: Vec<Declarator>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub target: Pattern,
    pub init: Option<Expr>,
}

/// A binding position: parameters, loop aliases, declarations.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Identifier(Identifier),
    Object(Vec<PatternProperty>),
    Array(Vec<Pattern>),
    /// `target = default`
    Assignment {
        target: Box<Pattern>,
        default: Box<Expr>,
    },
    Rest(Box<Pattern>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternProperty {
    KeyValue {
        key: PropertyKey,
        value: Pattern,
    },
    /// `{ foo }` or `{ foo = default }`
    Shorthand {
        name: Identifier,
        default: Option<Expr>,
    },
    Rest(Pattern),
}

impl Pattern {
    /// Every name this pattern binds, in source order.
    ///
    /// Default values and computed keys are expressions, not bindings, so
    /// they contribute nothing.
    pub fn bound_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_bound_names(&mut names);
        names
    }

    pub(crate) fn collect_bound_names(&self, names: &mut Vec<String>) {
        match self {
            Pattern::Identifier(id) => names.push(id.name.clone()),
            Pattern::Object(properties) => {
                for property in properties {
                    match property {
                        PatternProperty::KeyValue { value, .. } => value.collect_bound_names(names),
                        PatternProperty::Shorthand { name, .. } => names.push(name.name.clone()),
                        PatternProperty::Rest(rest) => rest.collect_bound_names(names),
                    }
                }
            }
            Pattern::Array(elements) => {
                for element in elements {
                    element.collect_bound_names(names);
                }
            }
            Pattern::Assignment { target, .. } => target.collect_bound_names(names),
            Pattern::Rest(inner) => inner.collect_bound_names(names),
        }
    }
}

impl Expression {
    /// Whether this is a plain member access path like `a.b[c]`.
    pub fn is_member_path(&self) -> bool {
        match self {
            Expression::Identifier(_) => true,
            Expression::Member { object, .. } | Expression::Index { object, .. } => {
                object.node.is_member_path()
            }
            _ => false,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Expression::Function(_))
    }
}
