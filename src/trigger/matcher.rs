// src/trigger/matcher.rs

//! Deep-containment matching of criteria against message bodies.
//!
//! A criteria object is contained in a body when every key it names is
//! present in the body with an equal value. Nested objects recurse: the body
//! must hold an object at that key which in turn contains the nested
//! criteria. Any other value (scalars, arrays) is compared structurally,
//! with numbers compared by value (`5` and `5.0` are equal).
//! Keys the criteria do not mention are ignored.
//!
//! Everything here is a pure function of its inputs.

use serde_json::{Map, Number, Value};

use super::{CriteriaTrigger, Message};

/// Return the triggers whose criteria are contained in `message.body`,
/// in the order they were given.
pub fn match_triggers<'a, I>(triggers: I, message: &Message) -> Vec<&'a CriteriaTrigger>
where
    I: IntoIterator<Item = &'a CriteriaTrigger>,
{
    triggers
        .into_iter()
        .filter(|t| contains(&t.criteria, &message.body))
        .collect()
}

/// Whether `criteria` is deeply contained in `body`.
///
/// An empty criteria object is contained in everything. A non-object body
/// contains nothing else.
pub fn contains(criteria: &Map<String, Value>, body: &Value) -> bool {
    let Some(body) = body.as_object() else {
        return criteria.is_empty();
    };

    criteria.iter().all(|(key, expected)| match body.get(key) {
        Some(actual) => value_satisfies(expected, actual),
        None => false,
    })
}

fn value_satisfies(expected: &Value, actual: &Value) -> bool {
    match expected {
        // Object criteria require an object in the body; a scalar there is a
        // type mismatch, not an error.
        Value::Object(nested) => actual.is_object() && contains(nested, actual),
        other => values_equal(other, actual),
    }
}

/// Structural equality where numbers compare by value, so `5` equals `5.0`.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
