//! Per-clause error message tables.
//!
//! Clauses raise shape errors by tag (`array`, `object`, `arg`, ...). The tag
//! is looked up in the clause's own table first, then in [`BASE_MESSAGES`],
//! and `<name>` variables are substituted. An unknown tag is itself an error.

use crate::error::QueryBuilderError;

/// `(tag, template)` pairs.
pub type MessageTable = &'static [(&'static str, &'static str)];

/// Messages shared by every clause.
pub const BASE_MESSAGES: MessageTable = &[
    (
        "array",
        "Invalid array with <n> items specified for query builder \"<method>\" component.",
    ),
    (
        "object",
        "Invalid object with \"<keys>\" properties specified for query builder \"<method>\" component.",
    ),
    (
        "arg",
        "Invalid argument specified for query builder \"<method>\" component: <arg>",
    ),
    (
        "string",
        "Invalid string specified for query builder \"<method>\" component: <arg>",
    ),
    (
        "value",
        "Invalid value specified for query builder \"<method>\" component: <arg>",
    ),
    (
        "operator",
        "Invalid comparison operator \"<op>\" specified for query builder \"<method>\" component.",
    ),
    (
        "comparison",
        "Invalid comparison \"<keys>\" specified for query builder \"<method>\" component.  Valid comparisons are <valid>.",
    ),
];

/// Find the template for `tag`.
pub fn lookup(
    method: &'static str,
    own: MessageTable,
    tag: &str,
) -> Result<&'static str, QueryBuilderError> {
    own.iter()
        .chain(BASE_MESSAGES)
        .find(|(t, _)| *t == tag)
        .map(|(_, template)| *template)
        .ok_or_else(|| QueryBuilderError::MissingMessage {
            method,
            tag: tag.to_string(),
        })
}

/// Substitute `<name>` variables. Unknown variables are left in place.
pub fn format(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let name_len = tail
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(tail.len());
        let name = &tail[..name_len];
        let closed = tail[name_len..].starts_with('>');
        match vars.iter().find(|(k, _)| *k == name) {
            Some((_, value)) if closed && !name.is_empty() => {
                out.push_str(value);
                rest = &tail[name_len + 1..];
            }
            _ => {
                out.push('<');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render a list of alternatives as `"a", "b" and "c"`.
pub fn alternatives(items: &[&str]) -> String {
    let quoted: Vec<String> = items.iter().map(|i| format!("\"{i}\"")).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, init)) => format!("{} and {}", init.join(", "), last),
    }
}
