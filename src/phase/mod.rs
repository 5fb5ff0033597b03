//! Phase validators.
//!
//! This module provides:
//! - `types`: field type checks shared by every phase
//! - `context`: Phase 1 compressed scene context
//! - `outline`: Phase 3 scene outline (per-entry and cross-record rules)
//! - `scene`: Phase 4 single rendered scene, bubbles and legacy dialogue
//! - `results`: Phase 5 collection of rendered scenes
//!
//! No phase calls another except `results`, which reuses the scene checks.

pub mod context;
pub mod outline;
pub mod results;
pub mod scene;
pub mod types;

pub use context::validate_context;
pub use outline::{validate_outline, validate_outline_entry};
pub use results::validate_results;
pub use scene::{validate_bubble, validate_dialogue_entry, validate_scene};
pub use types::{check_type, JsonType};
