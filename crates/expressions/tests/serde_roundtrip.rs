use expressions::{
    EditorName, Expression, Operation, Operator, ProjectSpace, RepositoryExpression,
    RepositoryName, Term, TermOptions, TranslateExpression,
};
use serde_json::json;

fn sample() -> Expression {
    let base = RepositoryExpression::new(RepositoryName::new("internal").unwrap()).at_revision("7");
    base.edit_with(EditorName::new("scrubber").unwrap(), TermOptions::new())
        .translate_to(ProjectSpace::new("public").unwrap())
        .with_reference_from_codebase(RepositoryExpression::new(
            RepositoryName::new("public").unwrap(),
        ))
        .into()
}

#[test]
fn json_round_trip_preserves_tree_and_string() {
    let e = sample();
    let json = serde_json::to_string(&e).unwrap();
    let back: Expression = serde_json::from_str(&json).unwrap();
    assert_eq!(back, e);
    assert_eq!(
        back.to_string(),
        "internal{revision=7}|scrubber{}>public{referenceFromCodebase=public}"
    );
}

#[test]
fn deserializing_mismatched_operator_is_rejected() {
    let value = json!({
        "translate": {
            "to_translate": { "repository": { "repository": "myRepo" } },
            "operation": { "operator": "edit", "term": { "name": "public" } }
        }
    });
    let err = serde_json::from_value::<Expression>(value).unwrap_err();
    assert!(err.to_string().contains("Configuration error"), "{err}");
}

#[test]
fn deserializing_duplicate_option_keys_keeps_first_position() {
    let value = json!({
        "to_translate": { "repository": { "repository": "myRepo" } },
        "operation": {
            "operator": "translate",
            "term": { "name": "public", "options": [["a", "1"], ["b", "2"], ["a", "3"]] }
        }
    });
    let e: TranslateExpression = serde_json::from_value(value).unwrap();
    let expected = TranslateExpression::new(
        RepositoryExpression::new(RepositoryName::new("myRepo").unwrap()).into(),
        Operation::new(
            Operator::Translate,
            Term::new("public").with_option("a", "3").with_option("b", "2"),
        ),
    )
    .unwrap();
    assert_eq!(e, expected);
    assert_eq!(e.to_string(), "myRepo>public{a=3,b=2}");
}

#[test]
fn translate_node_rejects_edit_child_field() {
    let value = json!({
        "translate": {
            "to_edit": { "repository": { "repository": "myRepo" } },
            "operation": { "operator": "translate", "term": { "name": "public" } }
        }
    });
    assert!(serde_json::from_value::<Expression>(value).is_err());

    let value = json!({
        "edit": {
            "to_translate": { "repository": { "repository": "myRepo" } },
            "operation": { "operator": "edit", "term": { "name": "scrubber" } }
        }
    });
    assert!(serde_json::from_value::<Expression>(value).is_err());
}
