//! Request path construction.
//!
//! # Responsibilities
//! - Substitute collected chain arguments into a source template
//! - Reject chains that are missing required parameters
//! - Reject arguments that are not strings or numbers
//!
//! # Design Decisions
//! - Substitution is positional: the n-th argument fills the n-th token
//! - Optional tokens without a value stay in the path verbatim
//! - Values are inserted as-is, without percent-encoding

use serde_json::Value;

use crate::error::UrlError;
use crate::routing::matcher::{Piece, UriTemplate};

/// Build the request path for `template` from the collected `args`.
pub fn build_url(template: &UriTemplate, args: &[Value]) -> Result<String, UrlError> {
    let missing: Vec<String> = template
        .params()
        .skip(args.len())
        .filter(|token| !token.is_optional())
        .map(|token| token.name())
        .collect();

    if !missing.is_empty() {
        return Err(UrlError::MissingArguments(missing));
    }

    let mut args = args.iter();
    let mut path = String::with_capacity(template.source().len());

    for piece in template.pieces() {
        match piece {
            Piece::Literal(text) => path.push_str(text),
            Piece::Param(token) => match args.next() {
                Some(value) => path.push_str(&path_value(token.raw(), value)?),
                None => path.push_str(token.raw()),
            },
        }
    }

    Ok(path)
}

fn path_value(token: &str, value: &Value) -> Result<String, UrlError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(format_number(n)),
        other => Err(UrlError::ArgumentType {
            token: token.to_string(),
            found: type_name(other),
        }),
    }
}

/// Integral floats render without a fraction (`3.0` → `3`).
fn format_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e21 => {
            format!("{:.0}", f)
        }
        _ => n.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
