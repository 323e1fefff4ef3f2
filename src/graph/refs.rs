//! Reference Extraction
//!
//! Entities point at each other through string tokens such as
//! `#/types/aws:lambda/Runtime:Runtime`, which may sit anywhere in a definition
//! (a `$ref` value, an array element, a nested property). Extraction scans every
//! string leaf with an explicit stack, so deeply nested input cannot overflow.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::schema::{EntityKind, EntitySet, QualifiedName};

/// `<document>#/<section>/<qualified name>`; the document prefix is ignored
static REFERENCE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^#\s]*#/(types|resources|functions)/(\S+)$").expect("reference token regex is valid")
});

/// Decode a reference token into `(kind, qualified name)`.
///
/// Anything not shaped like a token (builtins such as `pulumi.json#/Archive`,
/// free text, an empty name) is ordinary text and yields `None`.
pub fn decode_reference(token: &str) -> Option<(EntityKind, QualifiedName)> {
    let captures = REFERENCE_TOKEN.captures(token)?;
    let kind = EntityKind::from_section(captures.get(1)?.as_str())?;
    let name = unescape_name(captures.get(2)?.as_str());
    Some((kind, name))
}

/// Tokens URL-escape `/` inside qualified names
fn unescape_name(raw: &str) -> QualifiedName {
    if raw.contains('%') {
        raw.replace("%2F", "/").replace("%2f", "/")
    } else {
        raw.to_string()
    }
}

/// Collect every entity referenced anywhere inside `node`.
///
/// Self references are kept; cycle handling belongs to the caller.
pub fn extract_references(node: &Value) -> EntitySet {
    let mut found = EntitySet::new();
    let mut stack = vec![node];

    while let Some(current) = stack.pop() {
        match current {
            Value::String(s) => {
                if let Some((kind, name)) = decode_reference(s) {
                    found.insert(kind, name);
                }
            }
            Value::Array(items) => stack.extend(items.iter()),
            Value::Object(map) => stack.extend(map.values()),
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }

    found
}
