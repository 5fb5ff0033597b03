//! Plain-text rendering of a pipeline report.

use std::fmt::Write;

use scenecheck::{PipelineReport, ResultsReport, ValidationReport};

fn mark(valid: bool) -> &'static str {
    if valid {
        "✓"
    } else {
        "✗"
    }
}

fn render_phase(out: &mut String, name: &str, report: &ValidationReport) {
    let _ = writeln!(out, "{} {} ({} errors)", mark(report.valid), name, report.errors.len());
    for error in &report.errors {
        let _ = writeln!(out, "    {}", error);
    }
}

fn render_results(out: &mut String, report: &ResultsReport) {
    let _ = writeln!(out, "{} results ({} errors)", mark(report.valid), report.errors.len());

    // collection-level issues are the ones not attributed to a scene
    let scene_level: usize = report.scene_errors.values().map(Vec::len).sum();
    for error in report.errors.iter().take(report.errors.len() - scene_level) {
        let _ = writeln!(out, "    {}", error);
    }
    for (id, errors) in &report.scene_errors {
        let _ = writeln!(out, "  scene {}:", id);
        for error in errors {
            let _ = writeln!(out, "    {}", error);
        }
    }

    let stats = &report.stats;
    let _ = writeln!(
        out,
        "  total: {}  valid: {}  error scenes: {}  skipped: {}",
        stats.total, stats.valid_count, stats.error_scenes, stats.skipped
    );
}

/// Renders every phase, grouped, followed by the summary line.
pub fn render_report(report: &PipelineReport) -> String {
    let mut out = String::new();
    if let Some(context) = &report.phases.context {
        render_phase(&mut out, "context", context);
    }
    if let Some(outline) = &report.phases.outline {
        render_phase(&mut out, "outline", outline);
    }
    if let Some(results) = &report.phases.results {
        render_results(&mut out, results);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", report.summary);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenecheck::{PipelineInput, Validator};
    use serde_json::json;

    #[test]
    fn test_render_groups_scene_errors() {
        let input = PipelineInput::new().with_results(json!([
            { "scene_id": 1, "mood": "error" },
            { "scene_id": 1, "mood": "error" },
            { "scene_id": 3, "title": "x", "description": "", "mood": "m",
              "direction": "d", "sd_prompt": "p" }
        ]));
        let report = Validator::new().validate_pipeline(&input, None);
        let text = render_report(&report);

        assert!(text.contains("✗ results (2 errors)"));
        assert!(text.contains("    results[1]: duplicate scene_id 1 (first seen at index 0)"));
        assert!(text.contains("  scene 3:\n    scene[2]: neither bubbles nor dialogue present"));
        assert!(text.contains("total: 3  valid: 0  error scenes: 3  skipped: 2"));
        assert!(text.ends_with("checked: results | errors: 2\n"));
    }
}
