//! FILENAME: core/engine/src/value.rs
//! PURPOSE: Defines the scalar value model and text-token type coercion.
//! CONTEXT: Every text-based format (CSV/TSV, XML, HTML, Markdown) carries
//! plain string cells; `coerce` is the single place where those tokens are
//! assigned a runtime kind. Formats with native typed values (JSON,
//! spreadsheet cells) bypass coercion and map their kinds directly.

use serde::{Deserialize, Serialize};

/// A single cell value. There is deliberately no date/time or binary kind;
/// timestamps stay as `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Canonical string form of the value.
    ///
    /// This is what the text-based serializers write out, and it is chosen
    /// so that coercion recovers the original kind: for every scalar `v`
    /// reachable through a text format, `coerce(Some(&v.render())) == v`.
    pub fn render(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
            Scalar::Number(n) => {
                // Format without unnecessary decimal places
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            Scalar::Text(s) => s.clone(),
        }
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Null
    }
}

// ============================================================================
// TYPE COERCION
// ============================================================================

/// Infers the runtime kind of a raw text token.
///
/// - Missing or blank input becomes `Null`.
/// - Case-insensitive `true`/`false` becomes `Boolean`.
/// - A token that fully parses as a finite decimal literal (optional sign,
///   optional fractional part, no exponent) becomes `Number`.
/// - Everything else stays `Text`, with its original (untrimmed) content.
pub fn coerce(token: Option<&str>) -> Scalar {
    let raw = match token {
        Some(raw) => raw,
        None => return Scalar::Null,
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Scalar::Null;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Scalar::Boolean(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Scalar::Boolean(false);
    }
    if is_numeric_literal(trimmed) {
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return Scalar::Number(n);
            }
        }
    }
    Scalar::Text(raw.to_string())
}

/// Checks for a plain decimal literal: optional sign, digits, at most one
/// decimal point. Rejects exponents and the textual `inf`/`NaN` forms that
/// `f64::from_str` would otherwise accept.
fn is_numeric_literal(s: &str) -> bool {
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    if body.is_empty() {
        return false;
    }
    let mut digits = 0usize;
    let mut dots = 0usize;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}
