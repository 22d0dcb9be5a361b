//! Parse model output into record pairs

use crate::error::ExtractorError;
use mediassist_domain::ExtractedRecord;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Parse a model reply into an [`ExtractedRecord`].
///
/// The reply is read as a JSON object first. When that fails and
/// `line_fallback` is set, `key: value` lines are used instead.
pub fn parse_record(
    response: &str,
    line_fallback: bool,
) -> Result<ExtractedRecord, ExtractorError> {
    match parse_json_object(response) {
        Ok(pairs) => Ok(ExtractedRecord::from_pairs(pairs)),
        Err(e) if line_fallback => {
            debug!("Reply is not a JSON object ({}), reading key/value lines", e);
            let pairs = parse_key_value_lines(response);
            if pairs.is_empty() {
                warn!("No key/value pairs found in extraction reply");
            }
            Ok(ExtractedRecord::from_pairs(pairs))
        }
        Err(e) => Err(e),
    }
}

/// Split text into `key: value` pairs.
///
/// Each line containing a colon is split on its first colon and both sides
/// are trimmed. Lines without a colon are dropped. A repeated key keeps its
/// last value.
///
/// JSON punctuation left over from a reply that failed to parse (braces,
/// quotes around keys and values, trailing commas) is stripped, so a
/// truncated object still yields its complete lines.
pub fn parse_key_value_lines(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .map(|line| line.trim().trim_start_matches('{').trim_end_matches('}'))
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (strip_json_punctuation(key), strip_json_punctuation(value)))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn strip_json_punctuation(s: &str) -> String {
    s.trim()
        .trim_end_matches(',')
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}

/// Parse the reply as a flat JSON object of field values
pub fn parse_json_object(response: &str) -> Result<BTreeMap<String, String>, ExtractorError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractorError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let obj = json
        .as_object()
        .ok_or_else(|| ExtractorError::InvalidFormat("Expected JSON object".to_string()))?;

    Ok(flatten_object(obj))
}

fn flatten_object(obj: &Map<String, Value>) -> BTreeMap<String, String> {
    obj.iter()
        .filter_map(|(key, value)| stringify(value).map(|v| (key.clone(), v)))
        .collect()
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Bool(b) => Some(if *b { "yes" } else { "no" }.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(stringify).collect();
            Some(parts.join(", "))
        }
        Value::Object(_) => Some(value.to_string()),
    }
}

/// Extract JSON from a reply, handling markdown code blocks and
/// surrounding prose
fn extract_json(response: &str) -> Result<String, ExtractorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let body: Vec<&str> = trimmed
            .lines()
            .skip(1)
            .take_while(|line| !line.trim_start().starts_with("```"))
            .collect();
        if body.is_empty() {
            return Err(ExtractorError::InvalidFormat("Empty code block".to_string()));
        }
        return Ok(body.join("\n"));
    }

    if trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(trimmed[start..=end].to_string()),
        _ => Err(ExtractorError::InvalidFormat("No JSON object in reply".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediassist_domain::RecordField;

    #[test]
    fn test_key_value_lines() {
        let pairs =
            parse_key_value_lines("name: Jane Doe\nage: 34\nnot a pair line\ncondition : flu");

        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs["name"], "Jane Doe");
        assert_eq!(pairs["age"], "34");
        assert_eq!(pairs["condition"], "flu");
    }

    #[test]
    fn test_key_value_splits_on_first_colon() {
        let pairs = parse_key_value_lines("symptoms: started at 10:30 this morning");
        assert_eq!(pairs["symptoms"], "started at 10:30 this morning");
    }

    #[test]
    fn test_key_value_later_line_wins() {
        let pairs = parse_key_value_lines("age: 33\nage: 34");
        assert_eq!(pairs["age"], "34");
    }

    #[test]
    fn test_parse_plain_json_object() {
        let pairs =
            parse_json_object(r#"{"name": "Jane Doe", "age": 34, "fever_or_cough": null}"#)
                .unwrap();
        assert_eq!(pairs["name"], "Jane Doe");
        assert_eq!(pairs["age"], "34");
        assert!(!pairs.contains_key("fever_or_cough"));
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "```json\n{\"allergies\": [\"penicillin\", \"peanuts\"]}\n```";
        let pairs = parse_json_object(response).unwrap();
        assert_eq!(pairs["allergies"], "penicillin, peanuts");
    }

    #[test]
    fn test_parse_json_with_surrounding_prose() {
        let response = "Here is the record:\n{\"name\": \"Sam\"}\nLet me know if you need more.";
        let pairs = parse_json_object(response).unwrap();
        assert_eq!(pairs["name"], "Sam");
    }

    #[test]
    fn test_parse_json_not_object() {
        assert!(parse_json_object(r#"["name", "age"]"#).is_err());
        assert!(parse_json_object("This is not JSON").is_err());
    }

    #[test]
    fn test_extract_json_empty_code_block() {
        assert!(matches!(extract_json("```\n```"), Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_record_prefers_json() {
        let record = parse_record(
            r#"{"Name": "Jane", "Pain Level": "7", "blood_type": "O+"}"#,
            true,
        )
        .unwrap();
        assert_eq!(record.get(RecordField::Name), Some("Jane"));
        assert_eq!(record.get(RecordField::PainLevel), Some("7"));
        assert_eq!(record.unrecognized()["blood_type"], "O+");
    }

    #[test]
    fn test_parse_record_falls_back_to_lines() {
        let record = parse_record(
            "name: Jane Doe\nage: 34\nnot a pair line\ncondition : flu",
            true,
        )
        .unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.get(RecordField::Condition), Some("flu"));
    }

    #[test]
    fn test_truncated_json_reply_falls_back_to_lines() {
        let response = "{\n  \"name\": \"Jane Doe\",\n  \"age\": \"34\",\n  \"condition\": \"fl";
        let record = parse_record(response, true).unwrap();

        assert_eq!(record.get(RecordField::Name), Some("Jane Doe"));
        assert_eq!(record.get(RecordField::Age), Some("34"));
        assert_eq!(record.get(RecordField::Condition), Some("fl"));
        assert!(record.unrecognized().is_empty());
    }

    #[test]
    fn test_trailing_comma_json_reply() {
        let response = "{\"name\": \"Jane Doe\",\n\"pain_level\": 7,\n}";
        let record = parse_record(response, true).unwrap();

        assert_eq!(record.get(RecordField::Name), Some("Jane Doe"));
        assert_eq!(record.get(RecordField::PainLevel), Some("7"));
    }

    #[test]
    fn test_parse_record_without_fallback() {
        assert!(parse_record("name: Jane", false).is_err());
    }
}
