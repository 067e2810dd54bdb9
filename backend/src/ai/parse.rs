use serde_json::Value;

use super::AiError;

/// Removes markdown code-fence wrapping (```` ```json ```` / ```` ``` ````)
/// around a model reply.
pub fn strip_code_fences(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```") {
        // Drop the info string ("json", "JSON", ...) up to the first newline.
        cleaned = match rest.find('\n') {
            Some(idx) if rest[..idx].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
                &rest[idx + 1..]
            }
            _ => rest.trim_start_matches("json"),
        };
    }
    if let Some(rest) = cleaned.trim_end().strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

/// Fence-strip and decode. Anything other than a JSON object is rejected.
pub fn parse_model_json(text: &str) -> Result<Value, AiError> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    let value: Value =
        serde_json::from_str(cleaned).map_err(|e| AiError::InvalidJson(e.to_string()))?;
    if !value.is_object() {
        return Err(AiError::InvalidJson(format!(
            "expected an object, got {}",
            type_name(&value)
        )));
    }
    Ok(value)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
