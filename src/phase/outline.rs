//! Phase 3: scene outline.
//!
//! The outline is checked in two layers: [`validate_outline_entry`] looks at
//! one record, [`validate_outline`] adds the cross-record rules (count,
//! duplicate ids, intensity jumps) and picks the format variant.

use std::collections::HashMap;

use serde_json::Value;

use super::types::{
    check_enum, check_range, check_type, expect_map, field, id_key, id_label, item, JsonType, LIST,
    MAP, NUMBER, NUMERIC, STRING,
};
use crate::config::Limits;
use crate::error::{Issue, Num};
use crate::report::ValidationReport;

const PATH: &str = "outline";

/// Allowed `erotic_level` values.
pub const EROTIC_LEVELS: &[&str] = &["none", "light", "medium", "heavy", "climax"];

/// Validates one outline entry.
///
/// `compact` relaxes `situation` to present-but-possibly-empty. It is
/// decided once per array by the caller.
pub fn validate_outline_entry(
    entry: &Value,
    index: usize,
    compact: bool,
    limits: &Limits,
) -> Vec<Issue> {
    let path = item(PATH, index);
    let record = match expect_map(entry, &path) {
        Ok(record) => record,
        Err(issue) => return vec![issue],
    };

    let mut issues = Vec::new();
    issues.extend(check_type(record, &path, "scene_id", NUMBER, true));
    issues.extend(check_type(record, &path, "title", STRING, true));
    issues.extend(check_type(record, &path, "intensity", NUMERIC, true));
    issues.extend(check_type(record, &path, "location", STRING, true));

    issues.extend(check_range(
        record,
        &path,
        "intensity",
        limits.intensity_min,
        limits.intensity_max,
    ));
    issues.extend(check_enum(record, &path, "erotic_level", EROTIC_LEVELS));

    issues.extend(check_type(record, &path, "situation", STRING, true));
    if !compact && record.get("situation").and_then(Value::as_str) == Some("") {
        issues.push(Issue::empty_string(field(&path, "situation")));
    }

    // start/end are both optional inside the arc
    issues.extend(check_type(record, &path, "emotional_arc", MAP, false));
    issues.extend(check_type(record, &path, "beats", LIST, false));

    issues
}

/// Validates a full outline array.
///
/// Not-a-list and empty input short-circuit; everything else accumulates.
pub fn validate_outline(
    value: &Value,
    expected_count: Option<usize>,
    limits: &Limits,
) -> ValidationReport {
    let entries = match value {
        Value::Array(entries) => entries,
        other => {
            return ValidationReport::fatal(Issue::wrong_type(PATH, LIST, JsonType::of(other)))
        }
    };
    if entries.is_empty() {
        return ValidationReport::fatal(Issue::empty_list(PATH));
    }

    let mut issues = Vec::new();

    if let Some(expected) = expected_count {
        if expected != entries.len() {
            issues.push(Issue::CountMismatch {
                path: PATH.to_string(),
                expected,
                actual: entries.len(),
            });
        }
    }

    let compact = entries.len() > limits.compact_threshold;

    issues.extend(duplicate_ids(entries));

    let mut previous: Option<f64> = None;
    for (i, entry) in entries.iter().enumerate() {
        issues.extend(validate_outline_entry(entry, i, compact, limits));

        let current = entry.get("intensity").and_then(Value::as_f64);
        if let (Some(prev), Some(cur)) = (previous, current) {
            let delta = cur - prev;
            if delta >= limits.max_intensity_jump {
                issues.push(Issue::IntensityJump {
                    path: field(&item(PATH, i), "intensity"),
                    previous: Num(prev),
                    current: Num(cur),
                    delta: Num(delta),
                });
            }
        }
        previous = current;
    }

    tracing::debug!(
        entries = entries.len(),
        compact,
        errors = issues.len(),
        "outline validated"
    );

    ValidationReport::from_issues(issues)
}

/// Reports every repeat of a `scene_id` after its first occurrence.
///
/// Numeric ids compare by value (see [`id_key`]).
fn duplicate_ids(entries: &[Value]) -> Vec<Issue> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut issues = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        let Some(id) = entry.get("scene_id") else {
            continue;
        };
        match seen.get(&id_key(id)) {
            Some(&first) => issues.push(Issue::DuplicateId {
                path: field(&item(PATH, i), "scene_id"),
                id: id_label(id),
                first,
            }),
            None => {
                seen.insert(id_key(id), i);
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EmotionalArc, EroticLevel, OutlineEntry};
    use serde_json::json;

    fn entry(id: i64, intensity: i64) -> Value {
        OutlineEntry::new(id, format!("Scene {}", id), intensity)
            .with_location("classroom")
            .with_situation("they talk after class")
            .to_value()
    }

    fn outline(len: i64) -> Vec<Value> {
        (1..=len).map(|i| entry(i, 2)).collect()
    }

    fn check(entries: Vec<Value>) -> ValidationReport {
        validate_outline(&Value::Array(entries), None, &Limits::default())
    }

    #[test]
    fn test_valid_outline() {
        let report = validate_outline(&Value::Array(outline(5)), Some(5), &Limits::default());
        assert!(report.valid, "{:?}", report.messages());
    }

    #[test]
    fn test_shape_short_circuits() {
        let report = validate_outline(&json!({}), Some(3), &Limits::default());
        assert_eq!(report.messages(), vec!["outline: expected list, got map"]);

        let report = validate_outline(&json!([]), Some(3), &Limits::default());
        assert_eq!(report.messages(), vec!["outline: list is empty"]);
    }

    #[test]
    fn test_count_mismatch_continues() {
        let mut entries = outline(4);
        entries[2]["title"] = json!(7);
        let report = validate_outline(&Value::Array(entries), Some(5), &Limits::default());
        assert_eq!(
            report.messages(),
            vec![
                "outline: expected 5 entries, got 4",
                "outline[2].title: expected string, got number",
            ]
        );
    }

    #[test]
    fn test_empty_situation_in_full_mode() {
        let mut entries = outline(12);
        entries[3]["situation"] = json!("");
        let report = check(entries);
        assert_eq!(report.messages(), vec!["outline[3].situation: must not be empty"]);
    }

    #[test]
    fn test_empty_situation_allowed_in_compact_mode() {
        let mut entries = outline(13);
        entries[3]["situation"] = json!("");
        assert!(check(entries).valid);
    }

    #[test]
    fn test_situation_required_in_compact_mode() {
        let mut entries = outline(13);
        entries[0].as_object_mut().unwrap().remove("situation");
        let report = check(entries);
        assert_eq!(report.messages(), vec!["outline[0].situation: missing required field"]);
    }

    #[test]
    fn test_compact_threshold_is_configurable() {
        let mut entries = outline(5);
        entries[1]["situation"] = json!("");
        let limits = Limits::default().with_compact_threshold(4);
        assert!(validate_outline(&Value::Array(entries), None, &limits).valid);
    }

    #[test]
    fn test_intensity_jump_only_on_rise() {
        let entries = vec![entry(1, 1), entry(2, 4), entry(3, 1), entry(4, 3), entry(5, 5)];
        let report = check(entries);
        assert_eq!(
            report.messages(),
            vec!["outline[1].intensity: intensity jump 1 -> 4 (+3)"]
        );
    }

    #[test]
    fn test_intensity_jump_for_every_adjacent_pair() {
        let levels = [1, 2, 5, 5, 1, 4, 2, 5, 3];
        let entries: Vec<Value> = levels
            .iter()
            .enumerate()
            .map(|(i, &l)| entry(i as i64 + 1, l))
            .collect();
        let report = check(entries);

        for i in 1..levels.len() {
            let flagged = report
                .messages()
                .iter()
                .any(|m| m.starts_with(&format!("outline[{}].intensity: intensity jump", i)));
            assert_eq!(flagged, levels[i] - levels[i - 1] >= 3, "pair ending at {}", i);
        }
    }

    #[test]
    fn test_non_numeric_intensity_breaks_chain() {
        let mut entries = vec![entry(1, 1), entry(2, 2), entry(3, 5)];
        entries[1]["intensity"] = json!("two");
        let report = check(entries);
        assert_eq!(
            report.messages(),
            vec!["outline[1].intensity: expected number or float, got string"]
        );
    }

    #[test]
    fn test_intensity_range_and_float() {
        let mut entries = outline(3);
        entries[0]["intensity"] = json!(0);
        entries[1]["intensity"] = json!(2.5);
        entries[2]["intensity"] = json!(6);
        let report = check(entries);
        assert_eq!(
            report.messages(),
            vec![
                "outline[0].intensity: value 0 out of range [1, 5]",
                "outline[2].intensity: value 6 out of range [1, 5]",
                "outline[2].intensity: intensity jump 2.5 -> 6 (+3.5)",
            ]
        );
    }

    #[test]
    fn test_duplicate_ids_reported_per_repeat() {
        let entries: Vec<Value> = [1, 2, 2, 3, 2].iter().map(|&id| entry(id, 2)).collect();
        let report = check(entries);
        assert_eq!(
            report.messages(),
            vec![
                "outline[2].scene_id: duplicate scene_id 2 (first seen at index 1)",
                "outline[4].scene_id: duplicate scene_id 2 (first seen at index 1)",
            ]
        );
    }

    #[test]
    fn test_duplicate_ids_compare_numerically() {
        let mut entries = vec![entry(1, 2), entry(2, 2)];
        entries[1]["scene_id"] = json!(1.0);
        let report = check(entries);
        assert_eq!(
            report.messages(),
            vec![
                "outline[1].scene_id: duplicate scene_id 1.0 (first seen at index 0)",
                "outline[1].scene_id: expected number, got float",
            ]
        );
    }

    #[test]
    fn test_duplicates_precede_entry_errors() {
        let mut entries = vec![entry(1, 2), entry(1, 2)];
        entries[0]["location"] = json!(null);
        let report = check(entries);
        assert_eq!(
            report.messages(),
            vec![
                "outline[1].scene_id: duplicate scene_id 1 (first seen at index 0)",
                "outline[0].location: expected string, got null",
            ]
        );
    }

    #[test]
    fn test_optional_fields() {
        let mut value = OutlineEntry::new(1, "Start", 2)
            .with_location("park")
            .with_situation("walk")
            .with_erotic_level(EroticLevel::Light)
            .with_emotional_arc(EmotionalArc::default())
            .to_value();
        assert!(validate_outline_entry(&value, 0, false, &Limits::default()).is_empty());

        value["erotic_level"] = json!("extreme");
        value["emotional_arc"] = json!("calm to angry");
        value["beats"] = json!({});
        let messages: Vec<String> = validate_outline_entry(&value, 0, false, &Limits::default())
            .iter()
            .map(|i| i.to_string())
            .collect();
        assert_eq!(
            messages,
            vec![
                "outline[0].erotic_level: invalid value \"extreme\" (allowed: none, light, medium, heavy, climax)",
                "outline[0].emotional_arc: expected map, got string",
                "outline[0].beats: expected list, got map",
            ]
        );
    }

    #[test]
    fn test_non_map_entry() {
        let report = check(vec![entry(1, 1), json!("scene two")]);
        assert_eq!(report.messages(), vec!["outline[1]: expected map, got string"]);
    }

    #[test]
    fn test_idempotent() {
        let mut entries = outline(14);
        entries[5]["scene_id"] = json!(2);
        entries[6]["intensity"] = json!(5);
        let value = Value::Array(entries);
        let first = validate_outline(&value, Some(15), &Limits::default());
        let second = validate_outline(&value, Some(15), &Limits::default());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
