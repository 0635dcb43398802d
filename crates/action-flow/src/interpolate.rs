//! `{name}` placeholder substitution
//!
//! Placeholders whose key is missing from the context stay in the output
//! verbatim. String values are inserted as-is; other JSON values use their
//! compact JSON rendering.

use std::collections::HashMap;

use serde_json::Value;

fn is_brace(c: char) -> bool {
    c == '{' || c == '}'
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Replace every `{key}` in `template` that has a value in `context`.
pub fn interpolate(template: &str, context: &HashMap<String, Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(is_brace) {
            Some(close) if after[close..].starts_with('}') => {
                let key = &after[..close];
                match context.get(key) {
                    Some(value) if !key.is_empty() => out.push_str(&render(value)),
                    _ => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Placeholder names referenced by `template`, in order of appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find(is_brace) {
            Some(close) if after[close..].starts_with('}') => {
                let key = &after[..close];
                if !key.is_empty() && !names.iter().any(|n| n == key) {
                    names.push(key.to_string());
                }
                rest = &after[close + 1..];
            }
            _ => rest = after,
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn missing_keys_stay_literal() {
        assert_eq!(
            interpolate("https://x.com/{user}", &HashMap::new()),
            "https://x.com/{user}"
        );
        assert_eq!(
            interpolate("https://x.com/{user}", &ctx(&[("user", json!("bob"))])),
            "https://x.com/bob"
        );
    }

    #[test]
    fn non_string_values_render_as_json() {
        let context = ctx(&[("n", json!(3)), ("ok", json!(true)), ("name", json!("Ada"))]);
        assert_eq!(interpolate("{name} has {n} ({ok})", &context), "Ada has 3 (true)");
    }

    #[test]
    fn unbalanced_braces_are_kept() {
        let context = ctx(&[("a", json!("x"))]);
        assert_eq!(interpolate("{ {a} }", &context), "{ x }");
        assert_eq!(interpolate("{{a}}", &context), "{x}");
        assert_eq!(interpolate("trailing {", &context), "trailing {");
        assert_eq!(interpolate("{}", &context), "{}");
    }

    #[test]
    fn placeholder_names() {
        assert_eq!(
            placeholders("{a}/{b}?q={a}&{ }&{}"),
            vec!["a".to_string(), "b".to_string(), " ".to_string()]
        );
    }
}
