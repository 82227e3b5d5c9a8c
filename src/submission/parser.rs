use std::collections::HashMap;

use serde_json::Value;

use crate::error::AppError;
use crate::models::RawSubmission;

/// Field carrying the form name on a direct (non-event) form post.
pub const FORM_NAME_FIELD: &str = "form-name";

/// Parse a request body into a submission based on the Content-Type header.
///
/// JSON bodies are form-hosting events shaped like
/// `{ "payload": { "form_name": ..., "data": { ... } } }`. URL-encoded bodies
/// are direct form posts that name their form in a `form-name` field.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<RawSubmission, AppError> {
    let ct = content_type.unwrap_or("application/json");

    if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else {
        parse_event(body)
    }
}

/// Parse a JSON submission event. An empty body counts as `{}`.
pub fn parse_event(body: &[u8]) -> Result<RawSubmission, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RawSubmission::default());
    }

    let event: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::MalformedInput(format!("Invalid JSON: {e}")))?;

    let payload = event.get("payload");
    let form_name = payload
        .and_then(|p| p.get("form_name"))
        .and_then(scalar_to_string)
        .unwrap_or_default();

    let fields = payload
        .and_then(|p| p.get("data"))
        .and_then(|d| d.as_object())
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
                .collect()
        })
        .unwrap_or_default();

    Ok(RawSubmission { form_name, fields })
}

fn parse_form_urlencoded(body: &[u8]) -> Result<RawSubmission, AppError> {
    let body_str = std::str::from_utf8(body)
        .map_err(|e| AppError::MalformedInput(format!("Invalid UTF-8: {e}")))?;
    let fields: HashMap<String, String> = form_urlencoded::parse(body_str.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let form_name = fields.get(FORM_NAME_FIELD).cloned().unwrap_or_default();
    Ok(RawSubmission { form_name, fields })
}

/// Strings pass through; numbers and booleans are stringified; anything
/// else (null, arrays, objects) counts as absent.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
