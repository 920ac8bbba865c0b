//! Property-based fuzzing tests for the Nexus lexer, parser and evaluator
//!
//! These tests use proptest to generate random inputs and verify that:
//! 1. The lexer and parser never panic on arbitrary input
//! 2. Integer arithmetic matches native wrapping 64-bit arithmetic
//! 3. The canonical rendering of a parsed program parses back to itself

use nexus::lexer::{Lexer, TokenType};
use nexus::parser::parse;
use nexus::value::Value;
use nexus::{interpret, Config};
use proptest::prelude::*;

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

/// Generate random strings that might break the lexer or parser
fn arbitrary_source_string() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[\x00-\x7F]{0,300}").unwrap()
}

/// Generate printable ASCII with the whitespace the lexer skips
fn printable_source_string() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[ -~\t\n\r]{0,200}").unwrap()
}

/// Generate token soups that look like Nexus code
fn token_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(nexus_token(), 0..60).prop_map(|tokens| tokens.join(" "))
}

fn nexus_token() -> impl Strategy<Value = String> {
    prop_oneof![
        // Delimiters
        Just("(".to_string()),
        Just(")".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just(",".to_string()),
        Just(";".to_string()),
        // Keywords
        Just("let".to_string()),
        Just("const".to_string()),
        Just("fn".to_string()),
        Just("if".to_string()),
        Just("else".to_string()),
        Just("return".to_string()),
        Just("true".to_string()),
        Just("false".to_string()),
        // Operators
        Just("=".to_string()),
        Just("==".to_string()),
        Just("!=".to_string()),
        Just("!".to_string()),
        Just("+".to_string()),
        Just("-".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
        Just("<".to_string()),
        Just(">".to_string()),
        // Numbers, including ones too large for i64
        (0i64..1000i64).prop_map(|n| n.to_string()),
        Just("0".to_string()),
        Just("99999999999999999999".to_string()),
        // Identifiers
        "[a-z_][a-z_]{0,8}".prop_map(|s| s),
        // Illegal characters
        Just("@".to_string()),
        Just("\"".to_string()),
    ]
}

/// Identifiers that can never collide with a keyword
fn identifier() -> impl Strategy<Value = String> {
    "v[a-z]{0,2}".prop_map(|s| s)
}

/// Generate well-formed expressions without `if` or `fn`
fn valid_expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0i64..1000i64).prop_map(|n| n.to_string()),
        identifier(),
        Just("true".to_string()),
        Just("false".to_string()),
    ];

    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop::sample::select(vec!["+", "-", "*", "/", "<", ">", "==", "!="]),
                inner.clone()
            )
                .prop_map(|(l, op, r)| format!("{} {} {}", l, op, r)),
            (prop::sample::select(vec!["-", "!"]), inner.clone())
                .prop_map(|(op, operand)| format!("{}{}", op, operand)),
            inner.clone().prop_map(|e| format!("({})", e)),
            (identifier(), prop::collection::vec(inner, 0..3))
                .prop_map(|(name, args)| format!("{}({})", name, args.join(", "))),
        ]
    })
}

fn arithmetic_operator() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["+", "-", "*"])
}

// =============================================================================
// LEXER PROPERTIES
// =============================================================================

proptest! {
    /// The lexer never panics and always ends with EOF
    #[test]
    fn lexer_never_panics(source in arbitrary_source_string()) {
        let tokens = Lexer::new(&source).scan_tokens();
        prop_assert_eq!(tokens.last().map(|t| t.token_type), Some(TokenType::Eof));
    }

    /// Unicode input lexes without panic
    #[test]
    fn lexer_handles_unicode(source in any::<String>()) {
        let _ = Lexer::new(&source).scan_tokens();
    }

    /// Every non-whitespace character ends up in exactly one lexeme
    #[test]
    fn lexemes_cover_source(source in printable_source_string()) {
        let joined: String = Lexer::new(&source).map(|t| t.lexeme).collect();
        let expected: String = source
            .chars()
            .filter(|c| !matches!(c, ' ' | '\t' | '\n' | '\r'))
            .collect();
        prop_assert_eq!(joined, expected);
    }
}

// =============================================================================
// PARSER PROPERTIES
// =============================================================================

proptest! {
    /// The parser never panics on arbitrary input
    #[test]
    fn parser_never_panics(source in arbitrary_source_string()) {
        let _ = parse(&source);
    }

    /// The parser never panics on code-shaped token soups
    #[test]
    fn parser_never_panics_on_token_soup(source in token_soup()) {
        let _ = parse(&source);
    }

    /// Deeply nested groupings parse cleanly
    #[test]
    fn parser_handles_deep_nesting(depth in 1usize..100) {
        let source = format!("{}1 + 1{}", "(".repeat(depth), ")".repeat(depth));
        let (program, errors) = parse(&source);
        prop_assert!(errors.is_empty());
        prop_assert_eq!(program.to_string(), "(1 + 1)");
    }

    /// Unbalanced parentheses produce diagnostics, never a panic
    #[test]
    fn parser_reports_unbalanced_parens(opens in 0usize..50, closes in 0usize..50) {
        let source = format!("{}1{}", "(".repeat(opens), ")".repeat(closes));
        let (_, errors) = parse(&source);
        prop_assert_eq!(errors.is_empty(), opens == closes);
    }

    /// Rendering a parsed expression and parsing it again is stable
    #[test]
    fn rendering_is_a_fixed_point(source in valid_expression()) {
        let (program, errors) = parse(&source);
        prop_assert!(errors.is_empty(), "{:?} -> {:?}", source, errors);

        let rendered = program.to_string();
        let (reparsed, errors) = parse(&rendered);
        prop_assert!(errors.is_empty(), "{:?} -> {:?}", rendered, errors);
        prop_assert_eq!(reparsed.to_string(), rendered);
    }
}

// =============================================================================
// EVALUATOR PROPERTIES
// =============================================================================

proptest! {
    /// Interpreting arbitrary input never panics in either mode
    #[test]
    fn interpreter_never_panics(source in token_soup(), strict in any::<bool>()) {
        let config = Config { strict, ..Config::default() };
        let _ = interpret(&source, &config);
    }

    /// Addition, subtraction and multiplication wrap like i64
    #[test]
    fn arithmetic_matches_wrapping_ops(
        a in 0i64..=i64::MAX,
        b in 0i64..=i64::MAX,
        op in arithmetic_operator()
    ) {
        let expected = match op {
            "+" => a.wrapping_add(b),
            "-" => a.wrapping_sub(b),
            _ => a.wrapping_mul(b),
        };
        let source = format!("{} {} {}", a, op, b);
        prop_assert_eq!(
            interpret(&source, &Config::default()).ok(),
            Some(Some(Value::Integer(expected)))
        );
    }

    /// Returns nested inside `if` values of any depth unwind to a plain value
    #[test]
    fn nested_returns_unwind_to_plain_value(depth in 1usize..30, n in 0i64..1000) {
        let mut source = format!("return {}", n);
        for _ in 0..depth {
            source = format!("return if (true) {{ {}; }}", source);
        }
        source.push(';');

        prop_assert_eq!(
            interpret(&source, &Config::strict()).ok(),
            Some(Some(Value::Integer(n)))
        );
    }

    /// Division truncates toward zero
    #[test]
    fn division_truncates(a in -1_000_000i64..1_000_000, b in 1i64..1000) {
        let source = format!("{} / {}", a, b);
        prop_assert_eq!(
            interpret(&source, &Config::default()).ok(),
            Some(Some(Value::Integer(a / b)))
        );
    }

    /// Comparisons agree with native integer comparisons
    #[test]
    fn comparisons_match_native(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
        let config = Config::strict();
        prop_assert_eq!(interpret(&format!("{} < {}", a, b), &config).ok(), Some(Some(Value::Boolean(a < b))));
        prop_assert_eq!(interpret(&format!("{} > {}", a, b), &config).ok(), Some(Some(Value::Boolean(a > b))));
        prop_assert_eq!(interpret(&format!("{} == {}", a, b), &config).ok(), Some(Some(Value::Boolean(a == b))));
        prop_assert_eq!(interpret(&format!("{} != {}", a, b), &config).ok(), Some(Some(Value::Boolean(a != b))));
    }
}
