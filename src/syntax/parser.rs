//! Tessera parser.
//!
//! Converts script source into AST nodes with source location tracking.
//! Purely syntactic: no name resolution, no check-form validation.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::ast::{
    make_boolean, make_list, make_number, make_string, make_symbol, AstNode, Span,
};
use crate::errors::{
    DiagnosticInfo, ErrorKind, SourceContext, SourceInfo, TesseraError,
};

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct TessParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse tessera source code into AST nodes.
pub fn parse(source_text: &str, source: &SourceContext) -> Result<Vec<AstNode>, TesseraError> {
    if source_text.trim().is_empty() {
        return Ok(vec![]);
    }

    let pairs = TessParser::parse(Rule::program, source_text)
        .map_err(|e| convert_parse_error(e, source))?;

    let program = pairs
        .peek()
        .ok_or_else(|| missing_program_error(source))?;

    program
        .into_inner()
        .filter(|p| p.as_rule() != Rule::EOI)
        .map(|p| build_ast_node(p, source))
        .collect()
}

// ============================================================================
// AST BUILDERS
// ============================================================================

fn build_ast_node(pair: Pair<Rule>, source: &SourceContext) -> Result<AstNode, TesseraError> {
    let span = get_span(&pair);

    match pair.as_rule() {
        Rule::expr | Rule::atom => {
            let inner = pair
                .into_inner()
                .next()
                .ok_or_else(|| make_error(source, empty_node_kind(), span))?;
            build_ast_node(inner, source)
        }

        Rule::number => {
            let text = pair.as_str();
            let value = text.parse::<f64>().map_err(|_| {
                make_error(
                    source,
                    ErrorKind::InvalidLiteral {
                        literal_type: "number".into(),
                        value: text.into(),
                    },
                    span,
                )
            })?;
            Ok(make_number(value, span))
        }

        Rule::boolean => {
            let value = match pair.as_str() {
                "true" => true,
                "false" => false,
                text => {
                    return Err(make_error(
                        source,
                        ErrorKind::InvalidLiteral {
                            literal_type: "boolean".into(),
                            value: text.into(),
                        },
                        span,
                    ))
                }
            };
            Ok(make_boolean(value, span))
        }

        Rule::string => {
            let content = unescape_string(pair.as_str(), source, span)?;
            Ok(make_string(content, span))
        }

        Rule::symbol => Ok(make_symbol(pair.as_str(), span)),

        Rule::list => {
            let children: Result<Vec<_>, _> = pair
                .into_inner()
                .map(|p| build_ast_node(p, source))
                .collect();
            Ok(make_list(children?, span))
        }

        rule => Err(make_error(
            source,
            ErrorKind::Syntax {
                message: format!("unexpected rule {:?}", rule),
            },
            span,
        )),
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn get_span(pair: &Pair<Rule>) -> Span {
    let s = pair.as_span();
    Span {
        start: s.start(),
        end: s.end(),
        line: s.start_pos().line_col().0,
    }
}

/// Strips surrounding quotes and resolves escape sequences.
fn unescape_string(
    raw: &str,
    source: &SourceContext,
    span: Span,
) -> Result<String, TesseraError> {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            other => {
                return Err(make_error(
                    source,
                    ErrorKind::InvalidLiteral {
                        literal_type: "escape".into(),
                        value: other.map(|c| c.to_string()).unwrap_or_default(),
                    },
                    span,
                ))
            }
        }
    }
    Ok(out)
}

fn empty_node_kind() -> ErrorKind {
    ErrorKind::MissingElement {
        element: "expression".into(),
    }
}

fn make_error(source: &SourceContext, kind: ErrorKind, span: Span) -> TesseraError {
    let error_code = format!("tessera::parse::{}", kind.code_suffix());
    TesseraError {
        kind,
        source_info: SourceInfo {
            source: source.to_named_source(),
            primary_span: (span.start..span.end).into(),
            phase: "parse".into(),
        },
        diagnostic_info: DiagnosticInfo {
            help: None,
            error_code,
        },
    }
}

fn missing_program_error(source: &SourceContext) -> TesseraError {
    make_error(source, empty_node_kind(), Span::default())
}

fn convert_parse_error(
    error: pest::error::Error<Rule>,
    source: &SourceContext,
) -> TesseraError {
    let span = match error.location {
        pest::error::InputLocation::Pos(p) => Span {
            start: p,
            end: p,
            line: line_of(&source.content, p),
        },
        pest::error::InputLocation::Span((s, e)) => Span {
            start: s,
            end: e,
            line: line_of(&source.content, s),
        },
    };
    make_error(
        source,
        ErrorKind::Syntax {
            message: error.variant.message().into_owned(),
        },
        span,
    )
}

/// 1-based line number of a byte offset.
pub fn line_of(content: &str, offset: usize) -> usize {
    let clamped = offset.min(content.len());
    content[..clamped].bytes().filter(|b| *b == b'\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;

    fn ctx(text: &str) -> SourceContext {
        SourceContext::from_file("test.tess", text)
    }

    #[test]
    fn parses_literals_and_lists() {
        let text = "(+ 1 2) \"hi\" true falsey";
        let nodes = parse(text, &ctx(text)).unwrap();
        assert_eq!(nodes.len(), 4);
        assert!(matches!(*nodes[0].value, Expr::List(_)));
        assert!(matches!(*nodes[1].value, Expr::String(_)));
        assert!(matches!(*nodes[2].value, Expr::Bool(true)));
        // `falsey` is a symbol, not the boolean `false` plus trailing junk
        assert!(matches!(*nodes[3].value, Expr::Symbol(_)));
    }

    #[test]
    fn spans_carry_line_numbers() {
        let text = "1\n2\n(check-true \"x\" true)";
        let nodes = parse(text, &ctx(text)).unwrap();
        assert_eq!(nodes[2].span.line, 3);
    }

    #[test]
    fn unterminated_list_is_a_parse_error() {
        let text = "(define x 42";
        let err = parse(text, &ctx(text)).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Syntax { .. }));
    }

    #[test]
    fn comments_are_ignored() {
        let text = "; a comment\n42";
        let nodes = parse(text, &ctx(text)).unwrap();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn string_escapes_resolve() {
        let text = r#""a\nb\"c""#;
        let nodes = parse(text, &ctx(text)).unwrap();
        let Expr::String(s) = &*nodes[0].value else {
            panic!("expected string");
        };
        assert_eq!(s, "a\nb\"c");
    }

    #[test]
    fn line_of_counts_newlines() {
        assert_eq!(line_of("ab\ncd", 0), 1);
        assert_eq!(line_of("ab\ncd", 4), 2);
    }
}
