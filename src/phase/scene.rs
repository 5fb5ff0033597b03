//! Phase 4: a single rendered scene.
//!
//! Scenes carry dialogue in one of two shapes: `bubbles` (current) or
//! `dialogue` (legacy). When both are present only `bubbles` is checked.

use serde_json::{Map, Value};

use super::types::{
    check_enum, check_non_empty, check_range, check_type, expect_map, field, item, LIST, MAP,
    NUMBER, NUMERIC, STRING,
};
use crate::config::Limits;
use crate::error::Issue;
use crate::report::ValidationReport;

/// `mood` value marking a generation that already failed upstream.
pub const ERROR_SENTINEL: &str = "error";

/// Allowed bubble `type` values.
pub const BUBBLE_TYPES: &[&str] = &["speech", "moan", "thought"];

/// Validates one bubble at `path`.
pub fn validate_bubble(value: &Value, path: &str) -> Vec<Issue> {
    let record = match expect_map(value, path) {
        Ok(record) => record,
        Err(issue) => return vec![issue],
    };

    let mut issues = check_non_empty(record, path, "speaker");
    issues.extend(check_enum(record, path, "type", BUBBLE_TYPES));
    issues.extend(check_non_empty(record, path, "text"));
    issues
}

/// Validates one legacy dialogue line at `path`.
pub fn validate_dialogue_entry(value: &Value, path: &str) -> Vec<Issue> {
    let record = match expect_map(value, path) {
        Ok(record) => record,
        Err(issue) => return vec![issue],
    };

    let mut issues = check_non_empty(record, path, "speaker");
    issues.extend(check_non_empty(record, path, "line"));
    issues
}

/// Validates a rendered scene.
///
/// `index` only affects the path prefix (`scene[3]` vs `scene`). A scene
/// whose `mood` is the error sentinel is returned as skipped without any
/// further checks.
pub fn validate_scene(value: &Value, index: Option<usize>, limits: &Limits) -> ValidationReport {
    let path = match index {
        Some(i) => item("scene", i),
        None => "scene".to_string(),
    };
    let record = match expect_map(value, &path) {
        Ok(record) => record,
        Err(issue) => return ValidationReport::fatal(issue),
    };

    if record.get("mood").and_then(Value::as_str) == Some(ERROR_SENTINEL) {
        tracing::trace!(path = %path, "skipping error-sentinel scene");
        return ValidationReport::skipped();
    }

    let mut issues = Vec::new();
    issues.extend(check_type(record, &path, "scene_id", NUMBER, true));
    for key in ["title", "description", "mood", "direction"] {
        issues.extend(check_type(record, &path, key, STRING, true));
    }

    // empty descriptions are exempt from the length heuristic
    if let Some(description) = record.get("description").and_then(Value::as_str) {
        let len = description.chars().count();
        if len > 0 && len < limits.min_description_chars {
            issues.push(Issue::DescriptionTooShort {
                path: field(&path, "description"),
                len,
                min: limits.min_description_chars,
            });
        }
    }

    issues.extend(check_non_empty(record, &path, "sd_prompt"));
    if let Some(prompt) = record.get("sd_prompt").and_then(Value::as_str) {
        let runs = japanese_runs(prompt, limits.contamination_samples);
        if !runs.is_empty() {
            issues.push(Issue::ScriptContamination {
                path: field(&path, "sd_prompt"),
                runs,
            });
        }
    }

    issues.extend(check_type(record, &path, "character_feelings", MAP, false));
    issues.extend(check_type(record, &path, "location_detail", STRING, false));
    issues.extend(check_type(record, &path, "story_flow", STRING, false));
    issues.extend(check_type(record, &path, "intensity", NUMERIC, false));
    issues.extend(check_range(
        record,
        &path,
        "intensity",
        limits.intensity_min,
        limits.intensity_max,
    ));

    issues.extend(check_dialogue(record, &path, limits));

    issues.extend(check_type(record, &path, "onomatopoeia", LIST, false));

    ValidationReport::from_issues(issues)
}

fn check_dialogue(record: &Map<String, Value>, path: &str, limits: &Limits) -> Vec<Issue> {
    if record.contains_key("bubbles") {
        let mut issues = check_type(record, path, "bubbles", LIST, true);
        if let Some(bubbles) = record.get("bubbles").and_then(Value::as_array) {
            let bubbles_path = field(path, "bubbles");
            if bubbles.len() > limits.max_bubbles {
                issues.push(Issue::TooManyBubbles {
                    path: bubbles_path.clone(),
                    count: bubbles.len(),
                    max: limits.max_bubbles,
                });
            }
            for (i, bubble) in bubbles.iter().enumerate() {
                issues.extend(validate_bubble(bubble, &item(&bubbles_path, i)));
            }
        }
        issues
    } else if record.contains_key("dialogue") {
        let mut issues = check_type(record, path, "dialogue", LIST, true);
        if let Some(lines) = record.get("dialogue").and_then(Value::as_array) {
            let dialogue_path = field(path, "dialogue");
            for (i, line) in lines.iter().enumerate() {
                issues.extend(validate_dialogue_entry(line, &item(&dialogue_path, i)));
            }
        }
        issues
    } else {
        vec![Issue::MissingDialogue {
            path: path.to_string(),
        }]
    }
}

/// Hiragana, Katakana (full and half width) and CJK ideographs.
fn is_japanese(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}'
        | '\u{30A0}'..='\u{30FF}'
        | '\u{31F0}'..='\u{31FF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FF66}'..='\u{FF9F}')
}

/// Returns up to `limit` distinct contiguous Japanese runs, in order of
/// first appearance.
pub fn japanese_runs(text: &str, limit: usize) -> Vec<String> {
    let mut runs: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in text.chars().chain(std::iter::once(' ')) {
        if is_japanese(c) {
            current.push(c);
            continue;
        }
        if !current.is_empty() {
            if runs.len() >= limit {
                break;
            }
            if !runs.contains(&current) {
                runs.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
    }
    runs.truncate(limit);
    runs
}
