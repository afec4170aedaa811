use super::*;
use proptest::prelude::*;

/// Reverse of `escape_text`: one unescape pass.
fn unescape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[test]
fn text_renders_double_quoted() {
    let value = Value::Text("alice".to_string());

    assert_eq!(value.render().unwrap(), "\"alice\"");
}

#[test]
fn text_escapes_backslash_before_quote() {
    let value = Value::Text(r#"a\"b"#.to_string());

    assert_eq!(value.render().unwrap(), r#""a\\\"b""#);
}

#[test]
fn booleans_render_lowercase() {
    assert_eq!(Value::Bool(true).render().unwrap(), "true");
    assert_eq!(Value::Bool(false).render().unwrap(), "false");
}

#[test]
fn integers_render_as_decimal_text() {
    assert_eq!(Value::Int(30).render().unwrap(), "30");
    assert_eq!(Value::Int(-7).render().unwrap(), "-7");
}

#[test]
fn doubles_always_carry_a_decimal_point() {
    assert_eq!(Value::Float(3.5).render().unwrap(), "3.5");
    assert_eq!(Value::Float(30.0).render().unwrap(), "30.0");
}

#[test]
fn timestamps_render_unquoted_iso8601() {
    let ts = crate::types::Timestamp::from_ymd_hms(2024, 1, 15, 10, 30, 0).unwrap();

    assert_eq!(Value::Timestamp(ts).render().unwrap(), "2024-01-15T10:30:00");
}

#[test]
fn null_has_no_literal_form() {
    assert_eq!(Value::Null.render(), Err(LiteralError::NullLiteral));
}

#[test]
fn lists_have_no_literal_form() {
    let value = Value::from_slice(&[1, 2]);

    assert_eq!(value.render(), Err(LiteralError::UnsupportedCollection));
}

#[test]
fn option_none_converts_to_null() {
    let value: Value = Option::<i64>::None.into();

    assert!(value.is_null());
}

#[test]
fn kind_reports_scalar_categories() {
    assert_eq!(Value::Int(1).kind(), Some(ValueKind::Integer));
    assert_eq!(Value::Null.kind(), None);
    assert_eq!(Value::from_slice(&[1]).kind(), None);
}

proptest! {
    /// Escaping is single-pass idempotent: one escape then one unescape
    /// reproduces the original, including mixed `\` and `"` content.
    #[test]
    fn escape_round_trips(s in "[ -~]{0,64}") {
        let escaped = escape_text(&s);

        prop_assert_eq!(unescape_text(&escaped), s);
    }

    /// Escaped text never contains a bare quote, so the rendered literal
    /// is always well-delimited.
    #[test]
    fn escaped_text_has_no_bare_quotes(s in "[ -~]{0,64}") {
        let escaped = escape_text(&s);

        let mut prev_backslashes = 0_usize;
        for c in escaped.chars() {
            if c == '"' {
                prop_assert_eq!(prev_backslashes % 2, 1);
            }
            if c == '\\' {
                prev_backslashes += 1;
            } else {
                prev_backslashes = 0;
            }
        }
    }
}
