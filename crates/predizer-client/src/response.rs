use serde_json::Value;

use crate::error::{PredictError, body_snippet};

pub const PREDICTION_FIELD: &str = "prediction";
pub const DETAIL_FIELD: &str = "detail";

/// A response that can be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    /// 2xx with a `prediction` field; the value is opaque.
    Prediction(Value),
    /// Non-2xx with a `detail` field.
    Failure { status: u16, detail: Value },
}

/// Interpret a response body for the given status.
///
/// A body that is not JSON, or that lacks the field expected for its status, is an error the
/// caller is not expected to render.
pub fn parse_outcome(status: u16, body: &str) -> Result<PredictionOutcome, PredictError> {
    let parsed: Value =
        serde_json::from_str(body).map_err(|e| PredictError::Deserialization {
            status,
            message: e.to_string(),
            body_snippet: body_snippet(body),
        })?;

    let success = (200..300).contains(&status);
    let field = if success {
        PREDICTION_FIELD
    } else {
        DETAIL_FIELD
    };
    let Some(value) = parsed.get(field).cloned() else {
        return Err(PredictError::MissingField {
            status,
            field,
            body_snippet: body_snippet(body),
        });
    };

    Ok(if success {
        PredictionOutcome::Prediction(value)
    } else {
        PredictionOutcome::Failure {
            status,
            detail: value,
        }
    })
}

/// String conversion of a JSON value as a browser template literal would show it.
///
/// Strings are verbatim, arrays join their elements with `,` (null elements are empty), objects
/// are `[object Object]`, and numbers drop a redundant `.0`.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(display_number).unwrap_or_else(|| n.to_string())
            }
        }
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn display_number(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if f == 0.0 {
        return "0".to_string();
    }
    let abs = f.abs();
    if (1e-6..1e21).contains(&abs) {
        format!("{f}")
    } else {
        // 1e21 -> 1e+21, 1.5e-7 stays
        let s = format!("{f:e}");
        match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        }
    }
}
