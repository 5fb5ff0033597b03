//! Phase 1: compressed scene context.

use serde_json::Value;

use super::types::{check_non_empty, check_type, expect_map, field, item, LIST, STRING};
use crate::error::Issue;
use crate::report::ValidationReport;

const PATH: &str = "context";

/// Validates a context record.
///
/// Only a non-map input short-circuits; every field check runs and all
/// issues accumulate in encounter order.
pub fn validate_context(value: &Value) -> ValidationReport {
    let record = match expect_map(value, PATH) {
        Ok(record) => record,
        Err(issue) => return ValidationReport::fatal(issue),
    };

    let mut issues = Vec::new();
    for key in ["setting", "tone", "theme"] {
        issues.extend(check_type(record, PATH, key, STRING, true));
    }
    issues.extend(check_type(record, PATH, "ng", LIST, false));

    let chars_issues = check_type(record, PATH, "chars", LIST, true);
    if !chars_issues.is_empty() {
        issues.extend(chars_issues);
    } else if let Some(chars) = record.get("chars").and_then(Value::as_array) {
        let chars_path = field(PATH, "chars");
        if chars.is_empty() {
            issues.push(Issue::empty_list(&chars_path));
        }
        for (i, character) in chars.iter().enumerate() {
            issues.extend(validate_character(character, &item(&chars_path, i)));
        }
    }

    tracing::debug!(errors = issues.len(), "context validated");
    ValidationReport::from_issues(issues)
}

/// Validates one character reference at `path`.
fn validate_character(value: &Value, path: &str) -> Vec<Issue> {
    let record = match expect_map(value, path) {
        Ok(record) => record,
        Err(issue) => return vec![issue],
    };

    let mut issues = check_non_empty(record, path, "name");
    // look and voice must be present but may be empty
    issues.extend(check_type(record, path, "look", STRING, true));
    issues.extend(check_type(record, path, "voice", STRING, true));
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CharacterRef, ContextRecord};
    use serde_json::json;

    fn valid_context() -> Value {
        ContextRecord::new("rooftop at night", "tense", "betrayal")
            .with_character(CharacterRef::new("Aoi").with_look("short hair").with_voice("low"))
            .with_ng("gore")
            .to_value()
    }

    #[test]
    fn test_valid_context() {
        let report = validate_context(&valid_context());
        assert!(report.valid, "{:?}", report.messages());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_not_a_map_fails_fast() {
        let report = validate_context(&json!(["setting"]));
        assert_eq!(report.messages(), vec!["context: expected map, got list"]);
    }

    #[test]
    fn test_accumulates_all_errors() {
        let report = validate_context(&json!({
            "tone": 3,
            "ng": "none",
            "chars": []
        }));
        assert_eq!(
            report.messages(),
            vec![
                "context.setting: missing required field",
                "context.tone: expected string, got number",
                "context.theme: missing required field",
                "context.ng: expected list, got string",
                "context.chars: list is empty",
            ]
        );
    }

    #[test]
    fn test_character_checks_are_indexed() {
        let mut ctx = valid_context();
        ctx["chars"] = json!([
            { "name": "Aoi", "look": "", "voice": "" },
            { "name": "", "look": "tall" },
            "Ren"
        ]);
        let report = validate_context(&ctx);
        assert_eq!(
            report.messages(),
            vec![
                "context.chars[1].name: must not be empty",
                "context.chars[1].voice: missing required field",
                "context.chars[2]: expected map, got string",
            ]
        );
    }

    #[test]
    fn test_chars_missing() {
        let mut ctx = valid_context();
        ctx.as_object_mut().unwrap().remove("chars");
        let report = validate_context(&ctx);
        assert_eq!(report.messages(), vec!["context.chars: missing required field"]);
    }
}
