use std::sync::Arc;

use memchr::memmem;

use crate::error::{ConfigError, Result};
use crate::value::{Dict, Value};

/// Returns `true` if `input` is likely to contain a `{{ name }}` reference.
pub fn has_reference(input: &str) -> bool {
    memmem::find(input.as_bytes(), b"{{").is_some()
}

/// Replaces every `{{ name }}` reference in `value` with the value `lookup`
/// returns for `name`. A string that consists of exactly one reference
/// becomes the referenced value itself, type included. Arrays and
/// dictionaries are interpolated element-wise.
///
/// A `{{` preceded by a backslash is kept as a literal `{{`, as is a `{{`
/// that is never closed by `}}`.
///
/// ```rust
/// use siteconf::value::{interpolate, Value};
///
/// let lookup = |name: &str| match name {
///     "version" => Some(Value::from("3.0.0")),
///     "enabled" => Some(Value::from(true)),
///     _ => None,
/// };
///
/// let value = interpolate("v", Value::from("skinny-{{ version }}.jar"), lookup).unwrap();
/// assert_eq!(value, Value::from("skinny-3.0.0.jar"));
///
/// let value = interpolate("v", Value::from("{{enabled}}"), lookup).unwrap();
/// assert_eq!(value, Value::from(true));
///
/// let value = interpolate("v", Value::from(r"Use \{{ page.title }} here"), lookup).unwrap();
/// assert_eq!(value, Value::from("Use {{ page.title }} here"));
///
/// assert!(interpolate("v", Value::from("{{ missing }}"), lookup).is_err());
/// ```
pub fn interpolate<F>(option: &str, value: Value, lookup: F) -> Result<Value>
    where F: Fn(&str) -> Option<Value> + Copy
{
    match value {
        Value::String(s) if has_reference(&s) => interpolate_str(option, &s, lookup),
        Value::Array(array) => array.iter()
            .cloned()
            .map(|v| interpolate(option, v, lookup))
            .collect(),
        Value::Dict(dict) => {
            let mut interpolated = Dict::new();
            for (k, v) in dict.iter() {
                interpolated.insert(k.clone(), interpolate(option, v.clone(), lookup)?);
            }

            Ok(Value::Dict(Arc::new(interpolated)))
        }
        value => Ok(value),
    }
}

/// The name in `input` if `input` is exactly one `{{ name }}` reference.
fn sole_reference(input: &str) -> Option<&str> {
    let inner = input.strip_prefix("{{")?.strip_suffix("}}")?;
    match memmem::find(inner.as_bytes(), b"}}") {
        Some(_) => None,
        None => Some(inner.trim()),
    }
}

fn interpolate_str<F>(option: &str, input: &str, lookup: F) -> Result<Value>
    where F: Fn(&str) -> Option<Value>
{
    let resolve = |name: &str| -> Result<Value> {
        let valid = !name.is_empty() && name.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.');

        if !valid {
            return Err(ConfigError::invalid(option, input, "malformed `{{ name }}` reference").into());
        }

        lookup(name).ok_or_else(|| ConfigError::UndefinedReference {
            option: option.into(),
            reference: name.into(),
        }.into())
    };

    if let Some(name) = sole_reference(input) {
        return resolve(name);
    }

    let mut output = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = memmem::find(rest.as_bytes(), b"{{") {
        if let Some(prefix) = rest[..start].strip_suffix('\\') {
            output.push_str(prefix);
            output.push_str("{{");
            rest = &rest[start + 2..];
            continue;
        }

        let Some(len) = memmem::find(&rest.as_bytes()[start + 2..], b"}}") else {
            break;
        };

        output.push_str(&rest[..start]);
        output.push_str(&resolve(rest[start + 2..start + 2 + len].trim())?.to_string());
        rest = &rest[start + 2 + len + 2..];
    }

    output.push_str(rest);
    Ok(Value::from(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn versions(name: &str) -> Option<Value> {
        match name {
            "skinny_version" => Some(Value::from("3.0.0")),
            "scala" => Some(Value::from("2.12.6")),
            "port" => Some(Value::from(8080)),
            _ => None,
        }
    }

    #[test]
    fn plain_strings_are_untouched() {
        let value = interpolate("x", Value::from("just {text}"), versions).unwrap();
        assert_eq!(value, Value::from("just {text}"));
    }

    #[test]
    fn multiple_references() {
        let value = Value::from("scala {{ scala }} / skinny {{skinny_version}}!");
        let value = interpolate("x", value, versions).unwrap();
        assert_eq!(value, Value::from("scala 2.12.6 / skinny 3.0.0!"));
    }

    #[test]
    fn sole_reference_keeps_type() {
        let value = interpolate("x", Value::from("{{ port }}"), versions).unwrap();
        assert_eq!(value, Value::from(8080));

        let value = interpolate("x", Value::from("{{ port }}/"), versions).unwrap();
        assert_eq!(value, Value::from("8080/"));
    }

    #[test]
    fn escaped_and_unclosed_braces_are_literal() {
        let value = Value::from(r"Use \{{ page.title }} in templates");
        let value = interpolate("snippet", value, versions).unwrap();
        assert_eq!(value, Value::from("Use {{ page.title }} in templates"));

        let value = Value::from(r"\{{ scala }} is {{ scala }}");
        let value = interpolate("x", value, versions).unwrap();
        assert_eq!(value, Value::from("{{ scala }} is 2.12.6"));

        let value = interpolate("x", Value::from("{{ scala"), versions).unwrap();
        assert_eq!(value, Value::from("{{ scala"));

        let value = interpolate("x", Value::from(r"\{{port}}"), versions).unwrap();
        assert_eq!(value, Value::from("{{port}}"));
    }

    #[test]
    fn empty_prefix_keeps_string_type() {
        let lookup = |name: &str| match name {
            "empty" => Some(Value::from("")),
            _ => versions(name),
        };

        let value = interpolate("x", Value::from("{{ empty }}{{ port }}"), lookup).unwrap();
        assert_eq!(value, Value::from("8080"));

        let value = interpolate("x", Value::from("{{ empty }}"), lookup).unwrap();
        assert_eq!(value, Value::from(""));
    }

    #[test]
    fn nested_values() {
        let value = Value::from(vec!["{{ scala }}", "plain"]);
        let value = interpolate("x", value, versions).unwrap();
        assert_eq!(value, Value::from(vec!["2.12.6", "plain"]));

        let value = Value::from(crate::dict! { "v" => "{{ skinny_version }}" });
        let value = interpolate("x", value, versions).unwrap();
        assert_eq!(value.as_dict().unwrap()["v"], Value::from("3.0.0"));
    }

    #[test]
    fn bad_references() {
        let err = interpolate("x", Value::from("{{ nope }}"), versions).unwrap_err();
        assert_eq!(err.config_error(), Some(&ConfigError::UndefinedReference {
            option: "x".into(),
            reference: "nope".into(),
        }));

        let err = interpolate("x", Value::from("{{ a b }}"), versions).unwrap_err();
        assert!(matches!(err.config_error(), Some(ConfigError::InvalidValue { .. })));
    }
}
