//! Boundary check for providers that signal failure by returning a falsy value
//! instead of raising an error.

use serde_json::Value;

pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(false, |x| x == 0.0 || x.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Turns an absent or falsy provider result into the caller's error.
pub fn ensure_truthy<E>(value: Option<Value>, err: impl FnOnce() -> E) -> Result<Value, E> {
    match value {
        Some(v) if !is_falsy(&v) => Ok(v),
        _ => Err(err()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_values() {
        for v in [json!(null), json!(false), json!(0), json!(""), json!([]), json!({})] {
            assert!(is_falsy(&v), "{v} should be falsy");
        }
        for v in [json!(true), json!(1), json!("ed25519:abc"), json!([1]), json!({"k": 1})] {
            assert!(!is_falsy(&v), "{v} should be truthy");
        }
    }

    #[test]
    fn ensure_truthy_maps_missing_and_falsy() {
        assert_eq!(ensure_truthy(None, || "missing"), Err("missing"));
        assert_eq!(ensure_truthy(Some(json!(false)), || "falsy"), Err("falsy"));
        assert_eq!(ensure_truthy(Some(json!("key")), || "x"), Ok(json!("key")));
    }
}
