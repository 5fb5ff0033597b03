//! Error types for the phase validators.
//!
//! Validation findings are [`Issue`] values. Each variant keeps the
//! structured payload of one finding; its `Display` impl renders the
//! path-prefixed message that report consumers match on.

use std::fmt;

use thiserror::Error;

use crate::phase::types::JsonType;

/// A single validation finding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Issue {
    /// Required key absent from a map.
    #[error("{path}: missing required field")]
    MissingField { path: String },

    /// Key present but holding a value of the wrong type.
    #[error("{path}: expected {expected}, got {actual}")]
    WrongType {
        path: String,
        expected: TypeSet,
        actual: JsonType,
    },

    /// String that must carry content is empty.
    #[error("{path}: must not be empty")]
    EmptyString { path: String },

    /// List that must carry at least one element is empty.
    #[error("{path}: list is empty")]
    EmptyList { path: String },

    /// Numeric value outside its closed range.
    #[error("{path}: value {value} out of range [{min}, {max}]")]
    OutOfRange {
        path: String,
        value: Num,
        min: Num,
        max: Num,
    },

    /// String value outside a closed set.
    #[error("{path}: invalid value \"{value}\" (allowed: {})", .allowed.join(", "))]
    NotInEnum {
        path: String,
        value: String,
        allowed: &'static [&'static str],
    },

    /// Array length differs from the caller's expected total.
    #[error("{path}: expected {expected} entries, got {actual}")]
    CountMismatch {
        path: String,
        expected: usize,
        actual: usize,
    },

    /// `scene_id` repeated within one array.
    #[error("{path}: duplicate scene_id {id} (first seen at index {first})")]
    DuplicateId {
        path: String,
        id: String,
        first: usize,
    },

    /// Intensity rose too steeply between adjacent entries.
    #[error("{path}: intensity jump {previous} -> {current} (+{delta})")]
    IntensityJump {
        path: String,
        previous: Num,
        current: Num,
        delta: Num,
    },

    /// Non-empty description below the minimum length.
    #[error("{path}: description too short ({len} chars, minimum {min})")]
    DescriptionTooShort { path: String, len: usize, min: usize },

    /// Japanese script found in a field meant for an image model.
    #[error("{path}: contains Japanese text: {}", quote_list(.runs))]
    ScriptContamination { path: String, runs: Vec<String> },

    /// More bubbles than a scene may carry.
    #[error("{path}: too many bubbles ({count} > {max})")]
    TooManyBubbles {
        path: String,
        count: usize,
        max: usize,
    },

    /// Scene has no dialogue representation at all.
    #[error("{path}: neither bubbles nor dialogue present")]
    MissingDialogue { path: String },
}

impl Issue {
    /// Creates a MissingField issue.
    pub fn missing(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }

    /// Creates a WrongType issue.
    pub fn wrong_type(path: impl Into<String>, expected: &[JsonType], actual: JsonType) -> Self {
        Self::WrongType {
            path: path.into(),
            expected: TypeSet(expected.to_vec()),
            actual,
        }
    }

    /// Creates an EmptyString issue.
    pub fn empty_string(path: impl Into<String>) -> Self {
        Self::EmptyString { path: path.into() }
    }

    /// Creates an EmptyList issue.
    pub fn empty_list(path: impl Into<String>) -> Self {
        Self::EmptyList { path: path.into() }
    }

    /// Creates an OutOfRange issue.
    pub fn out_of_range(path: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            path: path.into(),
            value: Num(value),
            min: Num(min),
            max: Num(max),
        }
    }

    /// Creates a NotInEnum issue.
    pub fn not_in_enum(
        path: impl Into<String>,
        value: impl Into<String>,
        allowed: &'static [&'static str],
    ) -> Self {
        Self::NotInEnum {
            path: path.into(),
            value: value.into(),
            allowed,
        }
    }

    /// The field path this issue is attached to.
    pub fn path(&self) -> &str {
        match self {
            Self::MissingField { path }
            | Self::WrongType { path, .. }
            | Self::EmptyString { path }
            | Self::EmptyList { path }
            | Self::OutOfRange { path, .. }
            | Self::NotInEnum { path, .. }
            | Self::CountMismatch { path, .. }
            | Self::DuplicateId { path, .. }
            | Self::IntensityJump { path, .. }
            | Self::DescriptionTooShort { path, .. }
            | Self::ScriptContamination { path, .. }
            | Self::TooManyBubbles { path, .. }
            | Self::MissingDialogue { path } => path,
        }
    }
}

/// Ordered set of acceptable types, rendered as `a or b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSet(pub Vec<JsonType>);

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ty) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" or ")?;
            }
            write!(f, "{}", ty)?;
        }
        Ok(())
    }
}

/// Numeric payload that prints integral values without a fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Num(pub f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_finite() && self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

fn quote_list(runs: &[String]) -> String {
    runs.iter()
        .map(|r| format!("\"{}\"", r))
        .collect::<Vec<_>>()
        .join(", ")
}
