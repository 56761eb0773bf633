//! Lenient helpers for reading typed values out of a `serde_json::Value` object.
//!
//! Each helper takes a JSON value, a key name, and a default. A missing key, a
//! value of the wrong type, or an integer that does not fit the target type
//! all yield the default. The CLI uses these for `--params` objects.

use serde_json::Value;

/// Extracts an `f32` from `params[name]`. Integers are accepted and converted.
pub fn param_f32(params: &Value, name: &str, default: f32) -> f32 {
    params
        .get(name)
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .unwrap_or(default)
}

/// Extracts an `i32` from `params[name]`. Floats and out-of-range integers
/// fall back to `default`.
pub fn param_i32(params: &Value, name: &str, default: i32) -> i32 {
    params
        .get(name)
        .and_then(Value::as_i64)
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(default)
}

/// Extracts a `u32` from `params[name]`. Negative values fall back to `default`.
pub fn param_u32(params: &Value, name: &str, default: u32) -> u32 {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- param_f32 --

    #[test]
    fn param_f32_extracts_existing_float() {
        let params = json!({"rotation": 22.5});
        assert!((param_f32(&params, "rotation", 0.0) - 22.5).abs() < f32::EPSILON);
    }

    #[test]
    fn param_f32_extracts_integer_as_float() {
        let params = json!({"rotation": 90});
        assert!((param_f32(&params, "rotation", 0.0) - 90.0).abs() < f32::EPSILON);
    }

    #[test]
    fn param_f32_returns_default_when_wrong_type() {
        let params = json!({"rotation": "ninety"});
        assert!((param_f32(&params, "rotation", 1.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn param_f32_returns_default_for_non_object() {
        let params = json!([1, 2, 3]);
        assert!((param_f32(&params, "rotation", 7.0) - 7.0).abs() < f32::EPSILON);
    }

    // -- param_i32 --

    #[test]
    fn param_i32_extracts_negative_integer() {
        let params = json!({"x": -40});
        assert_eq!(param_i32(&params, "x", 0), -40);
    }

    #[test]
    fn param_i32_returns_default_for_float_value() {
        let params = json!({"x": 2.5});
        assert_eq!(param_i32(&params, "x", 3), 3);
    }

    #[test]
    fn param_i32_returns_default_when_out_of_range() {
        let params = json!({"x": 5_000_000_000_i64});
        assert_eq!(param_i32(&params, "x", 9), 9);
    }

    #[test]
    fn param_i32_returns_default_when_key_missing() {
        let params = json!({});
        assert_eq!(param_i32(&params, "y", 12), 12);
    }

    // -- param_u32 --

    #[test]
    fn param_u32_extracts_existing_integer() {
        let params = json!({"surface_width": 1080});
        assert_eq!(param_u32(&params, "surface_width", 0), 1080);
    }

    #[test]
    fn param_u32_returns_default_for_negative_integer() {
        let params = json!({"surface_width": -1});
        assert_eq!(param_u32(&params, "surface_width", 640), 640);
    }

    #[test]
    fn param_u32_returns_default_for_null_value() {
        let params = json!({"surface_width": null});
        assert_eq!(param_u32(&params, "surface_width", 480), 480);
    }
}
