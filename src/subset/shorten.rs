//! Description Shortening
//!
//! Subsets are checked in as test fixtures, and provider descriptions are long.
//! Shortening keeps the head and tail of each description and replaces the
//! middle with a marker.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How descriptions are shortened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortenOptions {
    /// Length of a shortened string, in characters
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Marker inserted in place of the removed span
    #[serde(default = "default_fill")]
    pub fill: String,

    /// Keys whose string values are shortened, at any depth
    #[serde(default = "default_keys")]
    pub keys: Vec<String>,
}

fn default_max_length() -> usize {
    99
}

fn default_fill() -> String {
    "<<shortened>>".to_string()
}

fn default_keys() -> Vec<String> {
    vec!["description".to_string()]
}

impl Default for ShortenOptions {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            fill: default_fill(),
            keys: default_keys(),
        }
    }
}

/// Shorten `text` to exactly `desired_length` characters by replacing an
/// interior span with `fill_with`.
///
/// The kept characters are split so the head gets `kept / 2` (rounded down)
/// and the tail the rest. Text that already fits is returned unchanged.
///
/// ```
/// use provider_schemas::subset::shorten;
///
/// assert_eq!(shorten("very very very very long string", 20, "...."), "very ver....g string");
/// ```
pub fn shorten(text: &str, desired_length: usize, fill_with: &str) -> String {
    let length = text.chars().count();
    if length <= desired_length {
        return text.to_string();
    }

    let fill_length = fill_with.chars().count();
    if fill_length >= desired_length {
        return fill_with.chars().take(desired_length).collect();
    }

    let kept = desired_length - fill_length;
    let head = kept / 2;
    let tail = kept - head;

    let mut shortened = String::with_capacity(text.len().min(desired_length * 4));
    shortened.extend(text.chars().take(head));
    shortened.push_str(fill_with);
    shortened.extend(text.chars().skip(length - tail));
    shortened
}

/// Copy of `value` with every description-bearing string shortened.
///
/// A description key holding a non-string (for instance a property that is
/// itself named `description`) is descended into like any other value.
pub fn shorten_descriptions(value: &Value, options: &ShortenOptions) -> Value {
    let mut copy = value.clone();
    let mut stack = vec![&mut copy];

    while let Some(node) = stack.pop() {
        match node {
            Value::Object(map) => {
                for (key, child) in map.iter_mut() {
                    if options.keys.iter().any(|k| k == key) {
                        if let Value::String(text) = child {
                            *text = shorten(text, options.max_length, &options.fill);
                            continue;
                        }
                    }
                    stack.push(child);
                }
            }
            Value::Array(items) => stack.extend(items.iter_mut()),
            Value::String(_) | Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }

    copy
}
