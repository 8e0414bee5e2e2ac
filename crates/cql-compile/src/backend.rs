//! Compilation of a query AST to a flat backend query string.
//!
//! Free text and boolean structure are concatenated into a single `q=`
//! parameter; each chip becomes its own `key=value` pair in source order.
//! The output is `application/x-www-form-urlencoded`, so the backend can
//! split it without knowing anything about CQL.

use chrono::{Local, NaiveDate};
use cql_query::{Binary, ExprContent, Field, Operator, Polarity, Query};
use url::form_urlencoded::Serializer;

use crate::{dates::resolve_date_value, error::CompileError, normalize::render_expr};

/// Compiles a query AST to a backend query string using today's date for
/// relative date values.
pub fn to_backend_query(query: &Query) -> Result<String, CompileError> {
    to_backend_query_at(query, Local::now().date_naive())
}

/// Compiles a query AST to a backend query string, resolving relative dates
/// against the given day. Pure function of its inputs.
pub fn to_backend_query_at(query: &Query, today: NaiveDate) -> Result<String, CompileError> {
    let Some(binary) = &query.content else {
        return Ok(String::new());
    };

    let mut collector = Collector {
        text_parts: Vec::new(),
        params: Vec::new(),
        today,
    };
    collector.walk(binary, Operator::Or)?;

    let mut serializer = Serializer::new(String::new());
    if !collector.text_parts.is_empty() {
        let mut q = String::new();
        for (index, (link, part)) in collector.text_parts.iter().enumerate() {
            if index > 0 {
                q.push(' ');
                q.push_str(&link.to_string());
                q.push(' ');
            }
            q.push_str(part);
        }
        serializer.append_pair("q", &q);
    }
    for (key, value) in &collector.params {
        serializer.append_pair(key, value);
    }
    Ok(serializer.finish())
}

/// Accumulates the `q` expression and the chip parameters during the walk.
struct Collector {
    /// Rendered non-chip expressions, each with the operator linking it to
    /// the previous one (ignored for the first).
    text_parts: Vec<(Operator, String)>,
    /// Chip parameters in source order.
    params: Vec<(String, String)>,
    /// The day relative dates resolve against.
    today: NaiveDate,
}

impl Collector {
    /// Walks a binary chain. `link` is the operator joining this chain's
    /// first expression to whatever came before it.
    fn walk(&mut self, binary: &Binary, link: Operator) -> Result<(), CompileError> {
        match &binary.left.content {
            ExprContent::Field(field) => self.param(field)?,
            _ => {
                // Groups cannot contain chips (the parser rejects them), so
                // everything that is not a chip renders into the q text.
                self.text_parts.push((link, render_expr(&binary.left)));
            }
        }

        if let Some(right) = &binary.right {
            self.walk(&right.binary, right.operator)?;
        }
        Ok(())
    }

    /// Converts a chip into a `key=value` parameter, resolving relative
    /// dates and expressing exclusion as a `-` value prefix.
    fn param(&mut self, field: &Field) -> Result<(), CompileError> {
        let Some(value) = field.value_text() else {
            return Err(CompileError::MissingValue {
                field: field.name().to_string(),
                position: field.key.start,
            });
        };

        let mut resolved = resolve_date_value(value, self.today);
        if field.polarity() == Polarity::Negative {
            resolved.insert(0, '-');
        }
        self.params.push((field.name().to_string(), resolved));
        Ok(())
    }
}
