use serde_json::Value;
use waypoint_core::Variable;

/// Replace every `<<key>>` placeholder in string values, at any depth.
///
/// Object keys are left alone and unknown placeholders pass through unchanged.
pub fn substitute(value: &Value, variables: &[Variable]) -> Value {
    if variables.is_empty() {
        return value.clone();
    }
    match value {
        Value::String(text) => Value::String(substitute_text(text, variables)),
        Value::Array(items) => Value::Array(items.iter().map(|v| substitute(v, variables)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), substitute(v, variables)))
                .collect(),
        ),
        other => other.clone(),
    }
}

pub fn substitute_text(text: &str, variables: &[Variable]) -> String {
    let mut result = text.to_string();
    for variable in variables {
        let placeholder = format!("<<{}>>", variable.key);
        if result.contains(&placeholder) {
            result = result.replace(&placeholder, &variable.value);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_substitutes_nested_strings() {
        let vars = vec![Variable::new("email", "a@b.c")];
        let params = json!({
            "index": 3,
            "text": "<<email>>",
            "extra": {"list": ["to <<email>>", "<<email>> and <<email>>"]}
        });
        let result = substitute(&params, &vars);
        assert_eq!(result["index"], 3);
        assert_eq!(result["text"], "a@b.c");
        assert_eq!(result["extra"]["list"][0], "to a@b.c");
        assert_eq!(result["extra"]["list"][1], "a@b.c and a@b.c");
    }

    #[test]
    fn test_unknown_placeholder_unchanged() {
        let vars = vec![Variable::new("name", "Ada")];
        assert_eq!(substitute_text("<<missing>> <<name>>", &vars), "<<missing>> Ada");
    }

    #[test]
    fn test_keys_not_substituted() {
        let vars = vec![Variable::new("k", "v")];
        let result = substitute(&json!({"<<k>>": "<<k>>"}), &vars);
        assert_eq!(result, json!({"<<k>>": "v"}));
    }
}
