//! SceneCheck - structural validator for multi-phase LLM scene generation output.
//!
//! A generation pipeline produces three JSON artifacts in sequence: a
//! compressed scene context, a per-scene outline, and the rendered scenes.
//! This crate checks each artifact after it has been decoded and before it
//! is persisted, and returns path-prefixed error reports instead of a
//! single pass/fail bit:
//!
//! - **Phase validators**: context, outline, single scene, results collection
//! - **Cross-record rules**: duplicate ids, intensity jumps, expected counts
//! - **Content heuristics**: short descriptions, Japanese text in image
//!   prompts, bubble caps
//!
//! Validation never fails and never mutates its input; every finding is a
//! report entry.
//!
//! # Example
//!
//! ```rust
//! use scenecheck::{PipelineInput, Validator};
//! use serde_json::json;
//!
//! let validator = Validator::new();
//! let input = PipelineInput::new().with_outline(json!([
//!     { "scene_id": 1, "title": "Opening", "intensity": 1,
//!       "location": "station", "situation": "they meet" },
//!     { "scene_id": 2, "title": "Rush", "intensity": 5,
//!       "location": "platform", "situation": "the train leaves" }
//! ]));
//!
//! let report = validator.validate_pipeline(&input, Some(2));
//! assert!(!report.valid);
//! assert_eq!(
//!     report.phases.outline.unwrap().messages(),
//!     vec!["outline[1].intensity: intensity jump 1 -> 5 (+4)"]
//! );
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod phase;
pub mod pipeline;
pub mod report;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use config::{ConfigError, Limits};
pub use error::Issue;
pub use phase::{
    validate_bubble, validate_context, validate_dialogue_entry, validate_outline,
    validate_outline_entry, validate_results, validate_scene,
};
pub use pipeline::{validate_pipeline, PipelineInput, Validator};
pub use report::{PhaseReports, PipelineReport, ResultsReport, ResultsStats, ValidationReport};
