use super::*;
use crate::{
    model::{AttributeModel, ValueKind},
    value::{LiteralError, Value},
};

fn age() -> AttributeModel {
    AttributeModel::new("Age", ValueKind::Integer)
}

fn name() -> AttributeModel {
    AttributeModel::new("Name", ValueKind::String)
}

fn status() -> AttributeModel {
    AttributeModel::new("Status", ValueKind::String)
}

#[test]
fn comparison_binds_then_compares() {
    let expr = Expression::gt(age(), 30).unwrap();
    let pattern = expr.to_pattern("e").unwrap();

    assert_eq!(pattern, "$e has age $e_age; $e_age > 30");
    assert_eq!(pattern.matches("has age $e_age").count(), 1);
    assert_eq!(pattern.matches('>').count(), 1);
}

#[test]
fn each_comparison_operator_renders_once() {
    let cases = [
        (CompareOp::Eq, "=="),
        (CompareOp::Ne, "!="),
        (CompareOp::Lt, "<"),
        (CompareOp::Lte, "<="),
        (CompareOp::Gt, ">"),
        (CompareOp::Gte, ">="),
    ];

    for (op, rendered) in cases {
        let expr = CompareExpression::new(age(), op, Value::Int(5)).unwrap();
        let pattern = expr.to_pattern("e").unwrap();

        assert!(
            pattern.contains(&format!("$e_age {rendered} 5")),
            "missing `{rendered}` in `{pattern}`"
        );
    }
}

#[test]
fn comparison_rejects_null_at_construction() {
    let err = Expression::eq(age(), Value::Null).unwrap_err();

    assert_eq!(err, ExprError::Literal(LiteralError::NullLiteral));
}

#[test]
fn and_concatenates_operand_patterns() {
    let left = Expression::gt(age(), 30).unwrap();
    let right = Expression::contains(name(), "ali");
    let combined = Expression::and(vec![left.clone(), right.clone()]).unwrap();

    let expected = format!(
        "{}; {}",
        left.to_pattern("e").unwrap(),
        right.to_pattern("e").unwrap()
    );
    assert_eq!(combined.to_pattern("e").unwrap(), expected);
}

#[test]
fn or_wraps_each_operand_in_its_own_block() {
    let left = Expression::eq(status(), "active").unwrap();
    let right = Expression::eq(status(), "pending").unwrap();
    let combined = Expression::or(vec![left.clone(), right.clone()]).unwrap();

    let pattern = combined.to_pattern("e").unwrap();
    let left_pattern = left.to_pattern("e").unwrap();
    let right_pattern = right.to_pattern("e").unwrap();

    assert_eq!(
        pattern,
        format!("{{ {left_pattern}; }} or {{ {right_pattern}; }}")
    );

    // no operand text escapes its block
    let before_first_block = pattern.split('{').next().unwrap();
    assert!(before_first_block.trim().is_empty());
    assert!(pattern.ends_with('}'));
}

#[test]
fn not_wraps_operand_unmodified() {
    let inner = Expression::eq(status(), "archived").unwrap();
    let negated = Expression::not(inner.clone());

    assert_eq!(
        negated.to_pattern("e").unwrap(),
        format!("not {{ {}; }}", inner.to_pattern("e").unwrap())
    );
}

#[test]
fn nested_combinators_render_recursively() {
    let expr = Expression::and(vec![
        Expression::gte(age(), 18).unwrap(),
        Expression::not(Expression::eq(status(), "banned").unwrap()),
    ])
    .unwrap();

    assert_eq!(
        expr.to_pattern("e").unwrap(),
        "$e has age $e_age; $e_age >= 18; \
         not { $e has status $e_status; $e_status == \"banned\"; }"
    );
}

#[test]
fn and_requires_two_operands() {
    let err = Expression::and(vec![Expression::exists(age())]).unwrap_err();

    assert_eq!(
        err,
        ExprError::CombinatorArity {
            keyword: "and",
            expected: "at least 2",
            actual: 1,
        }
    );
}

#[test]
fn or_requires_two_operands() {
    assert!(matches!(
        Expression::or(vec![]),
        Err(ExprError::CombinatorArity { keyword: "or", .. })
    ));
}

#[test]
fn not_requires_exactly_one_operand() {
    let err = BooleanExpression::new(
        BoolOp::Not,
        vec![Expression::exists(age()), Expression::exists(name())],
    )
    .unwrap_err();

    assert_eq!(
        err,
        ExprError::CombinatorArity {
            keyword: "not",
            expected: "exactly 1",
            actual: 2,
        }
    );
}

#[test]
fn exists_emits_binding_only() {
    let pattern = Expression::exists(age()).to_pattern("e").unwrap();

    assert_eq!(pattern, "$e has age $e_age");
}

#[test]
fn set_membership_branches_share_one_variable() {
    let expr = Expression::in_set(
        status(),
        vec![Value::Text("active".into()), Value::Text("pending".into())],
    )
    .unwrap();

    let pattern = expr.to_pattern("e").unwrap();

    assert_eq!(
        pattern,
        "{ $e has status $e_status; $e_status == \"active\"; } or \
         { $e has status $e_status; $e_status == \"pending\"; }"
    );
    assert_eq!(pattern.matches(" or ").count(), 1);
    assert_eq!(pattern.matches("$e_status ==").count(), 2);
}

#[test]
fn set_membership_requires_values() {
    assert_eq!(
        Expression::in_set(status(), vec![]).unwrap_err(),
        ExprError::EmptyMembership
    );
}

#[test]
fn set_membership_rejects_null_candidates() {
    let err = Expression::in_set(status(), vec![Value::Null]).unwrap_err();

    assert_eq!(err, ExprError::Literal(LiteralError::NullLiteral));
}

#[test]
fn range_binds_once_with_inclusive_bounds() {
    let expr = Expression::range(age(), 18, 65, true).unwrap();

    assert_eq!(
        expr.to_pattern("e").unwrap(),
        "$e has age $e_age; $e_age >= 18; $e_age <= 65"
    );
}

#[test]
fn range_exclusive_uses_strict_comparators() {
    let expr = Expression::range(age(), 18, 65, false).unwrap();
    let pattern = expr.to_pattern("e").unwrap();

    assert!(pattern.contains("$e_age > 18"));
    assert!(pattern.contains("$e_age < 65"));
    assert_eq!(pattern.matches("has age").count(), 1);
}

#[test]
fn contains_uses_literal_keyword() {
    let pattern = Expression::contains(name(), "ali").to_pattern("e").unwrap();

    assert_eq!(pattern, "$e has name $e_name; $e_name contains \"ali\"");
}

#[test]
fn starts_with_compiles_to_anchored_pattern() {
    let pattern = Expression::starts_with(name(), "ali.ce")
        .to_pattern("e")
        .unwrap();

    assert_eq!(pattern, r#"$e has name $e_name; $e_name like "^ali\\.ce.*""#);
}

#[test]
fn ends_with_compiles_to_anchored_pattern() {
    let pattern = Expression::ends_with(name(), "son").to_pattern("e").unwrap();

    assert!(pattern.ends_with(r#"$e_name like ".*son$""#));
}

#[test]
fn escape_pattern_covers_all_metacharacters() {
    assert_eq!(escape_pattern(r"a.b*c"), r"a\.b\*c");
    assert_eq!(escape_pattern(r"x^$+?()[]{}|\y"), r"x\^\$\+\?\(\)\[\]\{\}\|\\y");
    assert_eq!(escape_pattern("plain"), "plain");
}

#[test]
fn case_insensitive_contains_compiles_through_like() {
    let expr = TextExpression::new(name(), TextOp::Contains, "Ali".into()).case_insensitive();
    let pattern = expr.to_pattern("e").unwrap();

    assert_eq!(pattern, r#"$e has name $e_name; $e_name like "(?i).*Ali.*""#);
}

#[test]
fn case_insensitive_prefixes_anchored_patterns() {
    let expr = TextExpression::new(name(), TextOp::StartsWith, "Ali".into()).case_insensitive();

    assert!(expr.to_pattern("e").unwrap().contains(r#""(?i)^Ali.*""#));
}

#[test]
fn unknown_text_tag_is_rejected() {
    let err = TextOp::from_tag("regex").unwrap_err();

    assert_eq!(
        err,
        ExprError::UnsupportedTextOperation {
            tag: "regex".to_string()
        }
    );
}

#[test]
fn text_expression_rejects_non_text_values() {
    let err = TextExpression::from_value(name(), TextOp::Contains, &Value::Int(1)).unwrap_err();

    assert_eq!(err, ExprError::TextValueRequired);
}

#[test]
fn aggregate_defaults_result_var_from_function_and_attribute() {
    let expr = AggregateExpression::new(age(), AggregateFn::Sum);

    assert_eq!(expr.result_var(), "sum_age");
    assert_eq!(expr.to_pattern("e"), "$e has age $e_age");
    assert_eq!(expr.reduce_fragment("e"), "$sum_age = sum($e_age)");
}

#[test]
fn aggregate_alias_overrides_result_var() {
    let expr = AggregateExpression::new(age(), AggregateFn::Mean).alias("avg_age");

    assert_eq!(expr.reduce_fragment("e"), "$avg_age = mean($e_age)");
}

#[test]
fn group_lists_assignments_within_group_var() {
    let city = AttributeModel::new("City", ValueKind::String);
    let group = GroupExpression::new(
        city,
        vec![
            AggregateExpression::new(age(), AggregateFn::Mean),
            AggregateExpression::new(age(), AggregateFn::Count),
        ],
    )
    .unwrap();

    assert_eq!(
        group.reduce_fragment("e"),
        "$mean_age = mean($e_age), $count_age = count($e_age) within $e_city"
    );
    // bindings deduplicate the doubly-aggregated attribute
    assert_eq!(
        group.to_pattern("e"),
        "$e has city $e_city; $e has age $e_age"
    );
}

#[test]
fn group_requires_at_least_one_aggregate() {
    let err = GroupExpression::new(status(), vec![]).unwrap_err();

    assert_eq!(err, ExprError::EmptyGroup);
}

#[test]
fn referenced_attributes_flatten_through_combinators() {
    let expr = Expression::and(vec![
        Expression::gt(age(), 30).unwrap(),
        Expression::or(vec![
            Expression::eq(status(), "active").unwrap(),
            Expression::contains(name(), "ali"),
        ])
        .unwrap(),
    ])
    .unwrap();

    let names: Vec<String> = expr
        .referenced_attributes()
        .iter()
        .map(|attr| attr.name().to_string())
        .collect();

    assert_eq!(names, vec!["age", "status", "name"]);
}
