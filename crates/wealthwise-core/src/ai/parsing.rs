//! Parsing helpers for AI backend responses
//!
//! Structured responses are validated strictly: a distribution plan must be
//! a JSON array whose elements are objects with exactly a string `name` and
//! a finite number `value`. Markdown code fences around the payload are
//! tolerated; any other surrounding text is not.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::Distribution;

/// Longest raw excerpt included in an error message
const MAX_RAW_EXCERPT: usize = 200;

/// Parse and validate a distribution plan
pub fn parse_distribution_plan(response: &str) -> Result<Vec<Distribution>> {
    let payload = strip_code_fence(response);
    if payload.is_empty() {
        return Err(Error::InvalidData("Empty response from AI".into()));
    }

    let value: Value = serde_json::from_str(payload).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid JSON from AI: {} | Raw: {}",
            e,
            excerpt(payload)
        ))
    })?;

    let Value::Array(items) = value else {
        return Err(Error::InvalidData(format!(
            "Expected a JSON array of allocations | Raw: {}",
            excerpt(payload)
        )));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_allocation(index, item))
        .collect()
}

fn parse_allocation(index: usize, item: &Value) -> Result<Distribution> {
    let Value::Object(fields) = item else {
        return Err(Error::InvalidData(format!(
            "Allocation {} is not an object",
            index
        )));
    };

    if let Some(extra) = fields.keys().find(|k| *k != "name" && *k != "value") {
        return Err(Error::InvalidData(format!(
            "Allocation {} has unexpected field '{}'",
            index, extra
        )));
    }

    let name = match fields.get("name") {
        Some(Value::String(name)) => name.clone(),
        Some(_) => {
            return Err(Error::InvalidData(format!(
                "Allocation {} has a non-string name",
                index
            )))
        }
        None => {
            return Err(Error::InvalidData(format!(
                "Allocation {} is missing name",
                index
            )))
        }
    };

    let value = match fields.get("value") {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).ok_or_else(|| {
            Error::InvalidData(format!("Allocation {} has a non-finite value", index))
        })?,
        Some(_) => {
            return Err(Error::InvalidData(format!(
                "Allocation {} has a non-numeric value",
                index
            )))
        }
        None => {
            return Err(Error::InvalidData(format!(
                "Allocation {} is missing value",
                index
            )))
        }
    };

    Ok(Distribution { name, value })
}

/// Accept free text, rejecting an empty answer
pub fn parse_text_response(response: &str) -> Result<String> {
    let text = response.trim();
    if text.is_empty() {
        return Err(Error::InvalidData("Empty response from AI".into()));
    }
    Ok(text.to_string())
}

/// Remove a surrounding ```json ... ``` fence, if any
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line
    match inner.find('\n') {
        Some(newline) => inner[newline + 1..].trim(),
        None => inner.trim(),
    }
}

fn excerpt(raw: &str) -> String {
    match raw.char_indices().nth(MAX_RAW_EXCERPT) {
        Some((cut, _)) => format!("{}...", &raw[..cut]),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_plan() {
        let plan = parse_distribution_plan(
            r#"[{"name":"Goal A","value":300},{"name":"Living Expenses","value":4000}]"#,
        )
        .unwrap();
        assert_eq!(
            plan,
            vec![
                Distribution::new("Goal A", 300.0),
                Distribution::new("Living Expenses", 4000.0)
            ]
        );
    }

    #[test]
    fn test_parse_fenced_plan() {
        let plan = parse_distribution_plan(
            "```json\n[{\"name\": \"Vacation\", \"value\": 1250.5}]\n```",
        )
        .unwrap();
        assert_eq!(plan, vec![Distribution::new("Vacation", 1250.5)]);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_distribution_plan("[]").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_array() {
        let err = parse_distribution_plan(r#"{"name":"A","value":1}"#).unwrap_err();
        assert!(err.to_string().contains("Expected a JSON array"));
    }

    #[test]
    fn test_rejects_surrounding_prose() {
        assert!(parse_distribution_plan(r#"Here is your plan: [{"name":"A","value":1}]"#).is_err());
    }

    #[test]
    fn test_rejects_malformed_elements() {
        let cases = [
            r#"[1, 2]"#,
            r#"[{"name":"A"}]"#,
            r#"[{"value":1}]"#,
            r#"[{"name":5,"value":1}]"#,
            r#"[{"name":"A","value":"100"}]"#,
            r#"[{"name":"A","value":1,"note":"x"}]"#,
            r#"[{"name":"A","value":null}]"#,
        ];
        for case in cases {
            assert!(
                matches!(parse_distribution_plan(case), Err(Error::InvalidData(_))),
                "accepted {}",
                case
            );
        }
    }

    #[test]
    fn test_rejects_empty_and_garbage() {
        assert!(parse_distribution_plan("   ").is_err());
        assert!(parse_distribution_plan("not json").is_err());
    }

    #[test]
    fn test_parse_text_response() {
        assert_eq!(
            parse_text_response("  Take a deep breath.\n").unwrap(),
            "Take a deep breath."
        );
        assert!(parse_text_response(" \n ").is_err());
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let long = "₹".repeat(300);
        let cut = excerpt(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), MAX_RAW_EXCERPT + 3);
    }
}
