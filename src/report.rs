//! Report types returned by the validators.
//!
//! Issues are kept as [`Issue`] values and serialized as their rendered
//! messages, so JSON consumers see plain strings.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::error::Issue;

fn serialize_issues<S: Serializer>(issues: &[Issue], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(issues.iter().map(|i| i.to_string()))
}

fn serialize_issue_map<S: Serializer>(
    map: &BTreeMap<String, Vec<Issue>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(
        map.iter()
            .map(|(id, issues)| (id, issues.iter().map(|i| i.to_string()).collect::<Vec<_>>())),
    )
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

// =============================================================================
// VALIDATION REPORT
// =============================================================================

/// Outcome of validating one phase value.
///
/// `valid` is always `errors.is_empty()`. A skipped scene (error
/// sentinel) is valid with no errors and `skipped` set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(serialize_with = "serialize_issues")]
    pub errors: Vec<Issue>,
    #[serde(skip_serializing_if = "is_false")]
    pub skipped: bool,
}

impl ValidationReport {
    /// Builds a report from accumulated issues.
    pub fn from_issues(errors: Vec<Issue>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            skipped: false,
        }
    }

    /// Report with a single fatal issue.
    pub fn fatal(issue: Issue) -> Self {
        Self::from_issues(vec![issue])
    }

    /// Report for a scene that was not checked.
    pub fn skipped() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            skipped: true,
        }
    }

    /// Rendered error messages, in encounter order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

// =============================================================================
// RESULTS REPORT
// =============================================================================

/// Counters over a results collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultsStats {
    /// Every element, maps or not.
    pub total: usize,
    /// Checked, passed, not skipped.
    pub valid_count: usize,
    /// Failed scenes plus skipped error-sentinel scenes.
    pub error_scenes: usize,
    pub skipped: usize,
}

/// Outcome of validating a results collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsReport {
    pub valid: bool,
    #[serde(serialize_with = "serialize_issues")]
    pub errors: Vec<Issue>,
    /// Per-scene issues keyed by scene id.
    #[serde(serialize_with = "serialize_issue_map")]
    pub scene_errors: BTreeMap<String, Vec<Issue>>,
    pub stats: ResultsStats,
}

impl ResultsReport {
    /// Builds a report; validity follows the flat error list.
    pub fn new(
        errors: Vec<Issue>,
        scene_errors: BTreeMap<String, Vec<Issue>>,
        stats: ResultsStats,
    ) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            scene_errors,
            stats,
        }
    }

    /// Report for input that is not a usable collection.
    pub fn fatal(issue: Issue) -> Self {
        Self::new(vec![issue], BTreeMap::new(), ResultsStats::default())
    }

    /// Rendered error messages, in encounter order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

// =============================================================================
// PIPELINE REPORT
// =============================================================================

/// Per-phase reports; a phase is present only when its input was supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhaseReports {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultsReport>,
}

impl PhaseReports {
    /// Names of the phases that were checked, in pipeline order.
    pub fn checked(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.context.is_some() {
            names.push("context");
        }
        if self.outline.is_some() {
            names.push("outline");
        }
        if self.results.is_some() {
            names.push("results");
        }
        names
    }

    /// Total error count across checked phases.
    pub fn error_count(&self) -> usize {
        self.context.as_ref().map_or(0, |r| r.errors.len())
            + self.outline.as_ref().map_or(0, |r| r.errors.len())
            + self.results.as_ref().map_or(0, |r| r.errors.len())
    }

    /// Conjunction of the checked phases' validity.
    pub fn all_valid(&self) -> bool {
        self.context.as_ref().map_or(true, |r| r.valid)
            && self.outline.as_ref().map_or(true, |r| r.valid)
            && self.results.as_ref().map_or(true, |r| r.valid)
    }
}

/// Merged report over every supplied phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub valid: bool,
    pub phases: PhaseReports,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_tracks_errors() {
        assert!(ValidationReport::from_issues(Vec::new()).valid);
        let report = ValidationReport::fatal(Issue::missing("context.setting"));
        assert!(!report.valid);
        assert_eq!(report.messages(), vec!["context.setting: missing required field"]);
    }

    #[test]
    fn test_serializes_errors_as_strings() {
        let report = ValidationReport::fatal(Issue::empty_list("outline"));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["valid"], false);
        assert_eq!(json["errors"][0], "outline: list is empty");
        assert!(json.get("skipped").is_none());

        let json = serde_json::to_value(ValidationReport::skipped()).unwrap();
        assert_eq!(json["skipped"], true);
    }

    #[test]
    fn test_phase_reports_helpers() {
        let phases = PhaseReports {
            context: Some(ValidationReport::from_issues(Vec::new())),
            outline: Some(ValidationReport::fatal(Issue::empty_list("outline"))),
            results: None,
        };
        assert_eq!(phases.checked(), vec!["context", "outline"]);
        assert_eq!(phases.error_count(), 1);
        assert!(!phases.all_valid());
        assert!(PhaseReports::default().all_valid());
    }
}
