//! End-to-end evaluation of raw expression strings against a fixed set of
//! contexts.

use bind_expression::{evaluate, EvalCtx, Expression, OperationRegistry};
use bind_value::{Object, Value};
use proptest::prelude::*;
use serde_json::json;

fn contexts() -> Object {
    let mut contexts = Object::new();
    contexts.insert(
        "user".into(),
        Value::from(json!({
            "name": "Ana",
            "age": 30,
            "tags": ["admin", "beta"],
            "address": {"city": "Recife"}
        })),
    );
    contexts.insert("flag".into(), Value::Bool(true));
    contexts.insert("items".into(), Value::from(json!([1, 2, 3])));
    contexts
}

fn eval(raw: &str) -> Value {
    let contexts = contexts();
    let operations = OperationRegistry::with_builtins();
    let ctx = EvalCtx::new(&contexts, &operations);
    evaluate(&Expression::parse(raw), &ctx)
}

fn check(raw: &str, expected: serde_json::Value) {
    assert_eq!(eval(raw), Value::from(expected), "expression: {raw}");
}

// ----------------------------------------------------------------- Arithmetic

#[test]
fn test_sum() {
    check("@{sum(6, 4)}", json!(10));
    check("@{sum(4.5, 6.0)}", json!(10.5));
    check("@{sum(1, true)}", json!(null));
    check("@{sum('1', '2')}", json!(3));
    check("@{sum(user.age, 1)}", json!(31));
}

#[test]
fn test_subtract() {
    check("@{subtract(6, 4)}", json!(2));
    check("@{subtract(4, 6, 4)}", json!(-6));
}

#[test]
fn test_multiply_divide() {
    check("@{multiply(2, 3, 4)}", json!(24));
    check("@{divide(8, 2)}", json!(4));
    check("@{divide(1, 0)}", json!(null));
}

// ----------------------------------------------------------------- Comparison

#[test]
fn test_ordering() {
    check("@{gt('2', 1)}", json!(true));
    check("@{gt(true, 2)}", json!(false));
    check("@{gte(user.age, 30)}", json!(true));
    check("@{lt(1, 2, 3)}", json!(false));
    check("@{lte(1.5, '1.5')}", json!(true));
}

#[test]
fn test_eq() {
    check("@{eq('1', '1.0')}", json!(true));
    check("@{eq(1, '1.0')}", json!(true));
    check("@{eq(true, 2)}", json!(false));
    check("@{eq(true, true)}", json!(true));
    check("@{eq('no', 'no')}", json!(true));
    check("@{eq(user.name, 'Ana')}", json!(true));
}

// ----------------------------------------------------------------- Logic

#[test]
fn test_logic() {
    check("@{and(flag, gt(user.age, 18))}", json!(true));
    check("@{or(false, not(flag))}", json!(false));
    check("@{condition(flag, 'on', 'off')}", json!("on"));
    check("@{condition(eq(user.age, 1), 'on', 'off')}", json!("off"));
    check("@{not(1)}", json!(null));
}

// ----------------------------------------------------------------- Strings

#[test]
fn test_strings() {
    check("@{substr('hello', 1, 3)}", json!("ell"));
    check("@{substr('hello', 10)}", json!(null));
    check("@{concat('Hi ', user.name)}", json!("Hi Ana"));
    check("@{concat('Hi ', user.age)}", json!(null));
    check("@{capitalize('recife')}", json!("Recife"));
    check("@{uppercase(user.address.city)}", json!("RECIFE"));
    check("@{lowercase('ABC')}", json!("abc"));
}

// ----------------------------------------------------------------- Arrays

#[test]
fn test_arrays() {
    check("@{insert(items, 4)}", json!([1, 2, 3, 4]));
    check("@{insert(items, 0, 0)}", json!([0, 1, 2, 3]));
    check("@{insert(items, 0, 9)}", json!(null));
    check("@{remove(items, 2)}", json!([1, 3]));
    check("@{removeIndex(items)}", json!([1, 2]));
    check("@{removeIndex(items, 0)}", json!([2, 3]));
    check("@{contains(user.tags, 'beta')}", json!(true));
    check("@{union(items, user.tags)}", json!([1, 2, 3, "admin", "beta"]));
}

// ----------------------------------------------------------------- Other

#[test]
fn test_type_operations() {
    check("@{isNull(user.missing)}", json!(true));
    check("@{isNull(user.name)}", json!(false));
    check("@{isEmpty(user.tags)}", json!(false));
    check("@{isEmpty(flag)}", json!(null));
    check("@{length(user.name)}", json!(3));
    check("@{length(user)}", json!(4));
    check("@{int('42')}", json!(42));
    check("@{double(3)}", json!(3.0));
    check("@{string(sum(1, 1))}", json!("2"));
    check("@{string(items)}", json!(null));
}

// ----------------------------------------------------------------- Templates

#[test]
fn test_templates() {
    check(
        "@{user.name} (@{user.age}) lives in @{user.address.city}",
        json!("Ana (30) lives in Recife"),
    );
    check("tags: @{user.tags}", json!("tags: [\"admin\",\"beta\"]"));
    check("missing: [@{user.nope}]", json!("missing: []"));
    check("escaped \\@{user.name}", json!("escaped @{user.name}"));
    check("@{user.tags[1]}", json!("beta"));
}

#[test]
fn test_degraded_expression_is_null() {
    check("@{user.name", json!(null));
    check("@{sum(1,}", json!(null));
}

#[test]
fn test_custom_operation() {
    let contexts = contexts();
    let mut operations = OperationRegistry::with_builtins();
    operations
        .register("initials", |params: &[Value]| {
            let text = params.first().and_then(Value::as_str).unwrap_or_default();
            Ok(Value::String(
                text.split_whitespace().filter_map(|w| w.chars().next()).collect(),
            ))
        })
        .unwrap();
    let ctx = EvalCtx::new(&contexts, &operations);
    let expr = Expression::parse("@{initials(concat(user.name, ' Maria'))}");
    assert_eq!(evaluate(&expr, &ctx), Value::from("AM"));
}

#[test]
fn test_exponent_literals() {
    check("@{sum(1e3, 1)}", json!(1001.0));
    check("@{multiply(2.5E-1, 4)}", json!(1.0));
    check("@{eq(1e2, '100')}", json!(true));
}

/// Ints, finite doubles and both as quoted numeric strings.
fn numeric_operand() -> impl Strategy<Value = String> {
    prop_oneof![
        (-1_000_000i64..1_000_000).prop_map(|n| n.to_string()),
        (-1_000_000i64..1_000_000).prop_map(|n| format!("'{n}'")),
        (-1.0e6..1.0e6f64).prop_map(|n| format!("{n:?}")),
        (-1.0e6..1.0e6f64).prop_map(|n| format!("'{n:?}'")),
    ]
}

fn any_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e12..1.0e12f64).prop_map(Value::Double),
        "[a-z ]{0,8}".prop_map(Value::from),
        (-10_000i64..10_000).prop_map(|n| Value::from(n.to_string())),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn sum_is_commutative(a in numeric_operand(), b in numeric_operand()) {
        prop_assert_eq!(eval(&format!("@{{sum({a}, {b})}}")), eval(&format!("@{{sum({b}, {a})}}")));
    }

    #[test]
    fn eq_is_reflexive(x in any_value()) {
        let mut contexts = Object::new();
        contexts.insert("x".into(), x);
        let operations = OperationRegistry::with_builtins();
        let ctx = EvalCtx::new(&contexts, &operations);
        prop_assert_eq!(evaluate(&Expression::parse("@{eq(x, x)}"), &ctx), Value::Bool(true));
    }

    #[test]
    fn subtract_two_is_difference(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
        prop_assert_eq!(eval(&format!("@{{subtract({a}, {b})}}")), Value::Int(a - b));
    }
}
