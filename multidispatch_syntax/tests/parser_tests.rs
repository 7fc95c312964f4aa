//! Integration tests for the annotation parser

use multidispatch_syntax::{parse, LiteralExpr, ParseError, Span, TypeExpr, TypeExprKind};
use pretty_assertions::assert_eq;

fn args_of(expr: &TypeExpr) -> &[TypeExpr] {
    match &expr.kind {
        TypeExprKind::Apply { args, .. } => args,
        other => panic!("expected Apply, got {:?}", other),
    }
}

// ==================== Round trips through Display ====================

#[test]
fn test_display_normalizes_whitespace() {
    let cases = [
        ("int", "int"),
        ("List[ int ]", "List[int]"),
        ("Dict[str,int]", "Dict[str, int]"),
        ("int|str|None", "int | str | None"),
        ("Tuple[int, ...]", "Tuple[int, ...]"),
        ("Literal[1, 'a']", "Literal[1, \"a\"]"),
        ("Sequence[?]", "Sequence[?]"),
        ("Optional[List[Dict[str, Any]]]", "Optional[List[Dict[str, Any]]]"),
    ];
    for (source, expected) in cases {
        let expr = parse(source).unwrap_or_else(|e| panic!("{}: {}", source, e));
        assert_eq!(expr.to_string(), expected, "display of {:?}", source);
    }
}

// ==================== Structure ====================

#[test]
fn test_nested_apply() {
    let expr = parse("List[Dict[str, int]]").unwrap();
    assert_eq!(expr.head_name(), Some("List"));
    let inner = &args_of(&expr)[0];
    assert_eq!(inner.head_name(), Some("Dict"));
    assert_eq!(args_of(inner).len(), 2);
    assert_eq!(inner.span, Span::new(5, 19));
}

#[test]
fn test_union_spans_cover_members() {
    let expr = parse("int | List[str]").unwrap();
    assert_eq!(expr.span, Span::new(0, 15));
    match &expr.kind {
        TypeExprKind::Union(members) => {
            assert_eq!(members.len(), 2);
            assert_eq!(members[1].span, Span::new(6, 15));
        }
        other => panic!("expected Union, got {:?}", other),
    }
}

#[test]
fn test_literal_arguments() {
    let expr = parse("Literal[-3, \"x\", True, None]").unwrap();
    let args = args_of(&expr);
    assert_eq!(args[0].kind, TypeExprKind::Literal(LiteralExpr::Int(-3)));
    assert_eq!(
        args[1].kind,
        TypeExprKind::Literal(LiteralExpr::Str("x".to_string()))
    );
    // Keyword-like literals stay names; the consumer interprets them
    assert_eq!(args[2].kind, TypeExprKind::Name("True".to_string()));
    assert_eq!(args[3].kind, TypeExprKind::Name("None".to_string()));
}

#[test]
fn test_ellipsis_argument() {
    let expr = parse("Tuple[int, ...]").unwrap();
    let args = args_of(&expr);
    assert!(!args[0].is_ellipsis());
    assert!(args[1].is_ellipsis());
}

#[test]
fn test_wildcard_top_level() {
    let expr = parse("?").unwrap();
    assert_eq!(expr.kind, TypeExprKind::Wildcard);
}

// ==================== Errors ====================

#[test]
fn test_empty_annotation() {
    let err = parse("").unwrap_err();
    assert_eq!(err, ParseError::unexpected_eof("a type", Span::point(0)));
}

#[test]
fn test_unclosed_bracket() {
    let err = parse("List[int").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnclosedBracket {
            bracket: '[',
            span: Span::new(4, 5)
        }
    );
    insta::assert_snapshot!(err.to_string(), @"unclosed bracket '[' at column 5");
}

#[test]
fn test_missing_separator() {
    let err = parse("Dict[str int]").unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"unexpected token 'int' at column 10, expected ',' or ']'"
    );
}

#[test]
fn test_bad_member() {
    let err = parse("int | 3").unwrap_err();
    assert_eq!(
        err,
        ParseError::unexpected_token("3", "a type", Span::new(6, 7))
    );
}

#[test]
fn test_unrecognized_character() {
    let err = parse("List[int & str]").unwrap_err();
    assert_eq!(err, ParseError::LexerError { span: Span::new(9, 10) });
}

#[test]
fn test_integer_overflow() {
    let err = parse("Literal[99999999999999999999]").unwrap_err();
    assert!(matches!(err, ParseError::InvalidNumber { .. }));
}
