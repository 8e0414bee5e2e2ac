//! Canonical rendering of a query AST back to CQL text.
//!
//! Two semantically identical ASTs must render to byte-identical output:
//! quoting is reapplied from content alone, operators are always written
//! out (an implicit link renders as `OR`), and spacing is normalized to
//! single spaces.

use cql_query::{Binary, Expr, ExprContent, Field, Polarity, Query};

/// Characters that force a key or value to be quoted.
const RESERVED: [char; 4] = [':', '(', ')', '"'];

/// Renders a query AST to canonical CQL text.
pub fn normalize(query: &Query) -> String {
    match &query.content {
        Some(binary) => render_binary(binary),
        None => String::new(),
    }
}

/// Renders a binary chain with explicit operators.
pub(crate) fn render_binary(binary: &Binary) -> String {
    let mut out = render_expr(&binary.left);
    if let Some(right) = &binary.right {
        out.push(' ');
        out.push_str(&right.operator.to_string());
        out.push(' ');
        out.push_str(&render_binary(&right.binary));
    }
    out
}

/// Renders one expression, with its negation prefix where present.
pub(crate) fn render_expr(expr: &Expr) -> String {
    let body = match &expr.content {
        ExprContent::Str(node) => quote_if_needed(&node.text),
        ExprContent::Group(group) => format!("({})", render_binary(&group.content)),
        ExprContent::Field(field) => render_field(field),
    };

    // A field carries its own sigil; a bare `-` before other content is the
    // expression's polarity.
    if expr.polarity == Polarity::Negative && !matches!(expr.content, ExprContent::Field(_)) {
        format!("-{body}")
    } else {
        body
    }
}

/// Renders a chip as `+key:value` / `-key:value`, colon always included so
/// `+tag` and `+tag:` normalize identically.
fn render_field(field: &Field) -> String {
    let sigil = match field.polarity() {
        Polarity::Positive => '+',
        Polarity::Negative => '-',
    };
    let mut out = format!("{sigil}{}:", quote_if_needed(field.name()));
    if let Some(value) = field.value_text() {
        out.push_str(&quote_if_needed(value));
    }
    out
}

/// Quotes `text` when it contains whitespace or a reserved character,
/// escaping any embedded quotes.
fn quote_if_needed(text: &str) -> String {
    let needs_quoting = text
        .chars()
        .any(|c| c.is_whitespace() || RESERVED.contains(&c));
    if needs_quoting {
        format!("\"{}\"", text.replace('"', "\\\""))
    } else {
        text.to_string()
    }
}
