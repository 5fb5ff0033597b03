//! Pipeline-level façade over the phase validators.

use serde::Deserialize;
use serde_json::Value;

use crate::config::Limits;
use crate::phase::{validate_context, validate_outline, validate_results, validate_scene};
use crate::report::{PhaseReports, PipelineReport, ResultsReport, ValidationReport};

/// Any subset of the pipeline's phase outputs.
///
/// A `None` phase is not checked at all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineInput {
    pub context: Option<Value>,
    pub outline: Option<Value>,
    pub results: Option<Value>,
}

impl PipelineInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Set the context phase value.
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Builder: Set the outline phase value.
    pub fn with_outline(mut self, outline: Value) -> Self {
        self.outline = Some(outline);
        self
    }

    /// Builder: Set the results phase value.
    pub fn with_results(mut self, results: Value) -> Self {
        self.results = Some(results);
        self
    }
}

/// Validates every supplied phase and merges the reports.
///
/// `expected_scenes` is forwarded to the outline count check.
pub fn validate_pipeline(
    input: &PipelineInput,
    expected_scenes: Option<usize>,
    limits: &Limits,
) -> PipelineReport {
    let _span = tracing::info_span!("validate_pipeline").entered();

    let phases = PhaseReports {
        context: input.context.as_ref().map(validate_context),
        outline: input
            .outline
            .as_ref()
            .map(|outline| validate_outline(outline, expected_scenes, limits)),
        results: input
            .results
            .as_ref()
            .map(|results| validate_results(results, limits)),
    };

    let valid = phases.all_valid();
    let summary = summarize(&phases, valid);
    tracing::debug!(valid, errors = phases.error_count(), "pipeline validated");

    PipelineReport {
        valid,
        phases,
        summary,
    }
}

fn summarize(phases: &PhaseReports, valid: bool) -> String {
    let checked = phases.checked();
    let checked = if checked.is_empty() {
        "none".to_string()
    } else {
        checked.join(", ")
    };
    let mut summary = format!("checked: {} | errors: {}", checked, phases.error_count());
    if valid {
        summary.push_str(" | all phases OK");
    }
    summary
}

// =============================================================================
// VALIDATOR
// =============================================================================

/// Validator bound to one set of [`Limits`].
///
/// Stateless apart from the limits; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    limits: Limits,
}

impl Validator {
    /// Creates a validator with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator with custom limits.
    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn validate_context(&self, context: &Value) -> ValidationReport {
        validate_context(context)
    }

    pub fn validate_outline(&self, outline: &Value, expected: Option<usize>) -> ValidationReport {
        validate_outline(outline, expected, &self.limits)
    }

    pub fn validate_scene(&self, scene: &Value, index: Option<usize>) -> ValidationReport {
        validate_scene(scene, index, &self.limits)
    }

    pub fn validate_results(&self, results: &Value) -> ResultsReport {
        validate_results(results, &self.limits)
    }

    pub fn validate_pipeline(
        &self,
        input: &PipelineInput,
        expected_scenes: Option<usize>,
    ) -> PipelineReport {
        validate_pipeline(input, expected_scenes, &self.limits)
    }
}
