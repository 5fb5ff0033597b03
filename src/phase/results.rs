//! Phase 5: the collection of rendered scenes.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use super::scene::validate_scene;
use super::types::{expect_map, id_key, id_label, item, JsonType, LIST};
use crate::config::Limits;
use crate::error::Issue;
use crate::report::{ResultsReport, ResultsStats};

const PATH: &str = "results";

/// Validates every scene of a results collection.
///
/// Scene ids default to the 1-based position when absent. Error-sentinel
/// scenes are counted both as skipped and as error scenes.
pub fn validate_results(value: &Value, limits: &Limits) -> ResultsReport {
    let scenes = match value {
        Value::Array(scenes) => scenes,
        other => return ResultsReport::fatal(Issue::wrong_type(PATH, LIST, JsonType::of(other))),
    };
    if scenes.is_empty() {
        return ResultsReport::fatal(Issue::empty_list(PATH));
    }

    let mut errors = Vec::new();
    let mut stats = ResultsStats {
        total: scenes.len(),
        ..Default::default()
    };

    // First pass: shape and duplicate ids
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut checkable = Vec::with_capacity(scenes.len());
    for (i, scene) in scenes.iter().enumerate() {
        let path = item(PATH, i);
        if let Err(issue) = expect_map(scene, &path) {
            errors.push(issue);
            continue;
        }
        checkable.push(i);

        let id = scene_id(scene, i);
        match seen.get(&id_key(&id)) {
            Some(&first) => errors.push(Issue::DuplicateId {
                path,
                id: id_label(&id),
                first,
            }),
            None => {
                seen.insert(id_key(&id), i);
            }
        }
    }

    // Second pass: per-scene checks
    let mut scene_errors: BTreeMap<String, Vec<Issue>> = BTreeMap::new();
    for i in checkable {
        let scene = &scenes[i];
        let report = validate_scene(scene, Some(i), limits);
        if report.skipped {
            stats.skipped += 1;
            stats.error_scenes += 1;
        } else if report.valid {
            stats.valid_count += 1;
        } else {
            stats.error_scenes += 1;
            errors.extend(report.errors.iter().cloned());
            scene_errors
                .entry(id_label(&scene_id(scene, i)))
                .or_default()
                .extend(report.errors);
        }
    }

    tracing::debug!(
        total = stats.total,
        valid = stats.valid_count,
        error_scenes = stats.error_scenes,
        skipped = stats.skipped,
        "results validated"
    );

    ResultsReport::new(errors, scene_errors, stats)
}

fn scene_id(scene: &Value, index: usize) -> Value {
    scene
        .get("scene_id")
        .cloned()
        .unwrap_or_else(|| Value::from(index + 1))
}
