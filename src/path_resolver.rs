//! Computation of the request address and action for a controller method.
//!
//! Generated calls take two path pieces: an *address* (the class route, shared by all
//! methods) and an *action* (the method route). Both are produced here as
//! [`Expression`]s and rendered to TypeScript by the method synthesizer.

use crate::classifier::PathVariable;
use log::debug;

/// A TypeScript expression producing a path string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// Static single-quoted string
    Literal(String),
    /// Template literal body, with `${parameter}` interpolations already in place
    Template(String),
    /// Reference to the class's `ADDRESS` constant
    BaseAddress,
}

/// Address and action of one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub address: Expression,
    pub action: Expression,
}

impl Expression {
    /// Render the expression as TypeScript source
    pub fn render(&self, class_name: &str) -> String {
        match self {
            Expression::Literal(text) => quote_literal(text),
            Expression::Template(body) => format!("`{}`", body),
            Expression::BaseAddress => format!("{}.ADDRESS", class_name),
        }
    }
}

/// Render text as a single-quoted TypeScript string literal
pub fn quote_literal(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            other => quoted.push(other),
        }
    }
    quoted.push('\'');
    quoted
}

/// Resolve the address and action of a method.
///
/// When the method has no route of its own, trailing segments of the class route are
/// moved into the action until one is non-empty or the class route is exhausted.
pub fn resolve_path(
    base_path: &str,
    path_variables: &[PathVariable],
    method_path: Option<&str>,
) -> ResolvedPath {
    let mut address = base_path.to_string();
    let mut action = method_path.unwrap_or_default().to_string();

    // Each pass removes at least one character from `address`
    while action.is_empty() && !address.is_empty() {
        match address.rfind('/') {
            Some(split) => {
                action = address[split + 1..].to_string();
                address.truncate(split);
            }
            None => action = std::mem::take(&mut address),
        }
    }

    if let Some(stripped) = action.strip_prefix('/') {
        action = stripped.to_string();
    }

    let action = if path_variables.is_empty() {
        Expression::Literal(action)
    } else {
        Expression::Template(substitute_variables(&action, path_variables))
    };

    let address = if address == base_path {
        Expression::BaseAddress
    } else {
        Expression::Literal(address)
    };

    debug!("Resolved path: address={:?}, action={:?}", address, action);
    ResolvedPath { address, action }
}

/// Replace each `{variable}` (or `{variable:pattern}`) with `${parameter}`.
///
/// Placeholders without a matching path variable are kept verbatim. Static text is
/// escaped for use inside a template literal.
fn substitute_variables(path: &str, path_variables: &[PathVariable]) -> String {
    let mut result = String::with_capacity(path.len() + 8);
    let mut rest = path;

    while let Some(open) = rest.find('{') {
        escape_template_text(&rest[..open], true, &mut result);
        let after = &rest[open..];
        let Some(close) = closing_brace(after) else {
            escape_template_text(after, false, &mut result);
            return result;
        };

        let placeholder = &after[1..close];
        let name = placeholder.split(':').next().unwrap_or(placeholder).trim();
        match path_variables.iter().find(|v| v.variable == name) {
            Some(variable) => {
                result.push_str("${");
                result.push_str(&variable.parameter);
                result.push('}');
            }
            None => escape_template_text(&after[..=close], false, &mut result),
        }
        rest = &after[close + 1..];
    }

    escape_template_text(rest, false, &mut result);
    result
}

/// Byte index of the `}` closing the placeholder `text` starts with.
///
/// Regex constraints may contain braces of their own (`{id:[0-9]{3}}`).
fn closing_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Escape static template text; `before_brace` tells whether a `{` follows it
fn escape_template_text(text: &str, before_brace: bool, out: &mut String) {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' if chars.peek().map_or(before_brace, |next| *next == '{') => out.push_str("\\$"),
            other => out.push(other),
        }
    }
}
