use proptest::prelude::*;
use serde_json::json;
use waypoint_actions::{substitute, substitute_text};
use waypoint_core::Variable;

#[test]
fn test_nested_substitution() {
    let variables = vec![Variable::new("email", "a@b.c"), Variable::new("pw", "hunter2")];
    let params = json!({
        "form": {"fields": ["<<email>>", "<<pw>>", 7]},
        "<<email>>": "key untouched"
    });

    let result = substitute(&params, &variables);
    assert_eq!(result["form"]["fields"][0], "a@b.c");
    assert_eq!(result["form"]["fields"][1], "hunter2");
    assert_eq!(result["form"]["fields"][2], 7);
    assert_eq!(result["<<email>>"], "key untouched");
}

proptest! {
    #[test]
    fn prop_every_occurrence_replaced(
        key in "[a-z]{1,8}",
        value in "[A-Z0-9 ]{0,12}",
        prefix in "[a-z ]{0,10}",
        repeats in 1usize..5,
    ) {
        let text = format!("{}<<{}>>", prefix, key).repeat(repeats);
        let result = substitute_text(&text, &[Variable::new(key.clone(), value.clone())]);
        let placeholder = format!("<<{}>>", key);
        prop_assert!(!result.contains(&placeholder));
        prop_assert_eq!(result, format!("{}{}", prefix, value).repeat(repeats));
    }

    #[test]
    fn prop_no_variables_is_identity(text in ".{0,40}") {
        prop_assert_eq!(substitute_text(&text, &[]), text.clone());
        prop_assert_eq!(substitute(&json!(text), &[]), json!(text));
    }
}
