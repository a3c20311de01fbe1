/*
 * lexer.rs
 * Copyright (c) 2025 Posit, PBC
 */

use chumsky::prelude::*;
use std::fmt;

use super::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token<'src> {
    Ident(&'src str),
    Keyword(&'src str),
    Number(&'src str),
    /// Quoted string, quotes included
    Str(&'src str),
    /// Template literal, backticks included
    Template(&'src str),
    Punct(&'src str),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(text)
            | Token::Keyword(text)
            | Token::Number(text)
            | Token::Str(text)
            | Token::Template(text)
            | Token::Punct(text) => write!(f, "{text}"),
        }
    }
}

const KEYWORDS: &[&str] = &[
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "let",
    "new",
    "null",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

pub fn lexer<'src>()
-> impl Parser<'src, &'src str, Vec<(Token<'src>, Span)>, extra::Err<Rich<'src, char, Span>>> {
    let word = any()
        .filter(|c: &char| c.is_alphabetic() || *c == '_' || *c == '$')
        .then(
            any()
                .filter(|c: &char| c.is_alphanumeric() || *c == '_' || *c == '$')
                .repeated(),
        )
        .to_slice()
        .map(|word: &str| {
            if is_keyword(word) {
                Token::Keyword(word)
            } else {
                Token::Ident(word)
            }
        });

    // Loose on purpose: hex, separators and exponents all land in one token
    let number_tail = choice((
        one_of("eE").then(one_of("+-")).ignored(),
        any()
            .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
            .ignored(),
    ))
    .repeated();
    let number = any()
        .filter(char::is_ascii_digit)
        .ignored()
        .or(just('.').then(any().filter(char::is_ascii_digit)).ignored())
        .then(number_tail)
        .to_slice()
        .map(Token::Number);

    let escape = just('\\').then(any()).ignored();
    let single_quoted = just('\'')
        .then(escape.clone().or(none_of("\\'\n").ignored()).repeated())
        .then(just('\''))
        .to_slice();
    let double_quoted = just('"')
        .then(escape.clone().or(none_of("\\\"\n").ignored()).repeated())
        .then(just('"'))
        .to_slice();
    let string = single_quoted.clone().or(double_quoted.clone()).map(Token::Str);

    // Substitutions may hold strings, braces and further templates, so the
    // closing backtick is found by matching them rather than by the first `
    let template = recursive(|template| {
        let code = recursive(|code| {
            choice((
                template.clone(),
                single_quoted.clone().ignored(),
                double_quoted.clone().ignored(),
                code.delimited_by(just('{'), just('}')),
                none_of("`'\"{}").ignored(),
            ))
            .repeated()
        });
        just('`')
            .then(
                choice((
                    escape.clone(),
                    just("${").then(code).then(just('}')).ignored(),
                    none_of("\\`").ignored(),
                ))
                .repeated(),
            )
            .then(just('`'))
            .ignored()
    })
    .to_slice()
    .map(Token::Template);

    // Longest operators first
    let long_punct = choice((
        just(">>>="),
        just("..."),
        just("==="),
        just("!=="),
        just("**="),
        just("<<="),
        just(">>="),
        just(">>>"),
        just("&&="),
        just("||="),
        just("??="),
    ));
    let short_punct = choice((
        just("=>"),
        just("=="),
        just("!="),
        just("<="),
        just(">="),
        just("&&"),
        just("||"),
        just("??"),
        // `a?.5:b` is a conditional, not optional chaining
        just("?.").then_ignore(any().filter(char::is_ascii_digit).not()),
        just("++"),
        just("--"),
        just("+="),
        just("-="),
        just("*="),
        just("/="),
        just("%="),
        just("&="),
        just("|="),
        just("^="),
        just("**"),
        just("<<"),
        just(">>"),
    ));
    let punct = long_punct
        .or(short_punct)
        .ignored()
        .or(one_of("+-*/%<>=!~?:.,;()[]{}&|^").ignored())
        .to_slice()
        .map(Token::Punct);

    let token = choice((word, number, string, template, punct));

    token
        .map_with(|token, extra| (token, extra.span()))
        .padded()
        .repeated()
        .collect()
        .padded()
        .then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(src: &str) -> Vec<Token<'_>> {
        lexer()
            .parse(src)
            .into_result()
            .unwrap()
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn test_words_and_keywords() {
        assert_eq!(
            tokens("typeof $event _x in"),
            vec![
                Token::Keyword("typeof"),
                Token::Ident("$event"),
                Token::Ident("_x"),
                Token::Keyword("in"),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("1 2.5 .5 0xff 1e-3"),
            vec![
                Token::Number("1"),
                Token::Number("2.5"),
                Token::Number(".5"),
                Token::Number("0xff"),
                Token::Number("1e-3"),
            ]
        );
    }

    #[test]
    fn test_strings_keep_quotes() {
        assert_eq!(
            tokens(r#"'a\'b' "c" `d${e}`"#),
            vec![
                Token::Str(r"'a\'b'"),
                Token::Str(r#""c""#),
                Token::Template("`d${e}`"),
            ]
        );
    }

    #[test]
    fn test_longest_operator_wins() {
        assert_eq!(
            tokens("a ?. b ... c === d => e"),
            vec![
                Token::Ident("a"),
                Token::Punct("?."),
                Token::Ident("b"),
                Token::Punct("..."),
                Token::Ident("c"),
                Token::Punct("==="),
                Token::Ident("d"),
                Token::Punct("=>"),
                Token::Ident("e"),
            ]
        );
    }

    #[test]
    fn test_nested_template_is_one_token() {
        assert_eq!(
            tokens("`a${`b${c}` + '}'}` d"),
            vec![Token::Template("`a${`b${c}` + '}'}`"), Token::Ident("d")]
        );
    }

    #[test]
    fn test_question_dot_before_digit_is_conditional() {
        assert_eq!(
            tokens("x?.5:y"),
            vec![
                Token::Ident("x"),
                Token::Punct("?"),
                Token::Number(".5"),
                Token::Punct(":"),
                Token::Ident("y"),
            ]
        );
    }

    #[test]
    fn test_member_dot_is_not_a_number() {
        assert_eq!(
            tokens("a.b"),
            vec![Token::Ident("a"), Token::Punct("."), Token::Ident("b")]
        );
    }

    #[test]
    fn test_spans_exclude_whitespace() {
        let spanned = lexer().parse("  foo( bar )").into_result().unwrap();
        let ranges: Vec<_> = spanned.iter().map(|(_, span)| (span.start, span.end)).collect();
        assert_eq!(ranges, vec![(2, 5), (5, 6), (7, 10), (11, 12)]);
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        assert!(lexer().parse("'abc").has_errors());
    }
}
