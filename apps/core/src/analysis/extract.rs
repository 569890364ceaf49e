//! Structured-object extraction from free model output.
//!
//! Generative models wrap their JSON in commentary ("Sure! ... Hope that
//! helps!") or code fences. The scanner takes the span from the first `{` to
//! the last `}` and parses it. Nothing narrower is tried: if that span is not
//! a JSON object the reply has no usable structure.

use serde_json::Value;

/// Returns the JSON object spanning the first `{` to the last `}` of `text`.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }

    serde_json::from_str::<Value>(&text[start..=end])
        .ok()
        .filter(Value::is_object)
}
