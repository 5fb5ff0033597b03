//! Typed records for each pipeline phase.
//!
//! The validators work on decoded `serde_json::Value`s so they can report
//! wrong types. These structs are the shapes a valid value decodes into,
//! and builders for producing well-formed values.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decodes an already-validated phase value into its typed record.
pub fn typed<T: DeserializeOwned>(value: &Value) -> serde_json::Result<T> {
    T::deserialize(value)
}

fn to_json<T: Serialize>(record: &T) -> Value {
    // plain structs with string keys always serialize
    serde_json::to_value(record).unwrap_or(Value::Null)
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Phase 1 compressed scene context.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContextRecord {
    pub setting: String,
    pub tone: String,
    pub theme: String,
    /// Content to avoid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ng: Option<Vec<String>>,
    pub chars: Vec<CharacterRef>,
}

impl ContextRecord {
    pub fn new(
        setting: impl Into<String>,
        tone: impl Into<String>,
        theme: impl Into<String>,
    ) -> Self {
        Self {
            setting: setting.into(),
            tone: tone.into(),
            theme: theme.into(),
            ..Default::default()
        }
    }

    /// Builder: Add a character.
    pub fn with_character(mut self, character: CharacterRef) -> Self {
        self.chars.push(character);
        self
    }

    /// Builder: Add an NG entry.
    pub fn with_ng(mut self, item: impl Into<String>) -> Self {
        self.ng.get_or_insert_with(Vec::new).push(item.into());
        self
    }

    pub fn to_value(&self) -> Value {
        to_json(self)
    }
}

/// Character appearing in the context.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CharacterRef {
    pub name: String,
    pub look: String,
    pub voice: String,
}

impl CharacterRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: Set look.
    pub fn with_look(mut self, look: impl Into<String>) -> Self {
        self.look = look.into();
        self
    }

    /// Builder: Set voice.
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }
}

// =============================================================================
// OUTLINE
// =============================================================================

/// Content level of an outline entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EroticLevel {
    None,
    Light,
    Medium,
    Heavy,
    Climax,
}

/// Emotional start/end of a scene; both ends optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmotionalArc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl EmotionalArc {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }
}

/// Phase 3 outline entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutlineEntry {
    pub scene_id: i64,
    pub title: String,
    /// 1-5
    pub intensity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erotic_level: Option<EroticLevel>,
    pub location: String,
    /// May be empty in compact outlines
    pub situation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_arc: Option<EmotionalArc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beats: Option<Vec<Value>>,
}

impl OutlineEntry {
    pub fn new(scene_id: i64, title: impl Into<String>, intensity: i64) -> Self {
        Self {
            scene_id,
            title: title.into(),
            intensity: intensity as f64,
            erotic_level: None,
            location: String::new(),
            situation: String::new(),
            emotional_arc: None,
            beats: None,
        }
    }

    /// Builder: Set location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Builder: Set situation.
    pub fn with_situation(mut self, situation: impl Into<String>) -> Self {
        self.situation = situation.into();
        self
    }

    /// Builder: Set erotic level.
    pub fn with_erotic_level(mut self, level: EroticLevel) -> Self {
        self.erotic_level = Some(level);
        self
    }

    /// Builder: Set emotional arc.
    pub fn with_emotional_arc(mut self, arc: EmotionalArc) -> Self {
        self.emotional_arc = Some(arc);
        self
    }

    /// Builder: Add a beat.
    pub fn with_beat(mut self, beat: impl Into<Value>) -> Self {
        self.beats.get_or_insert_with(Vec::new).push(beat.into());
        self
    }

    /// JSON value; integral intensities are emitted as integers.
    pub fn to_value(&self) -> Value {
        let mut value = to_json(self);
        if self.intensity.fract() == 0.0 {
            value["intensity"] = Value::from(self.intensity as i64);
        }
        value
    }
}

// =============================================================================
// SCENE
// =============================================================================

/// Bubble tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BubbleKind {
    Speech,
    Moan,
    Thought,
}

/// Current-format dialogue unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bubble {
    pub speaker: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<BubbleKind>,
    pub text: String,
}

impl Bubble {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            kind: None,
            text: text.into(),
        }
    }

    /// Builder: Set bubble kind.
    pub fn with_kind(mut self, kind: BubbleKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Legacy-format dialogue line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DialogueEntry {
    pub speaker: String,
    pub line: String,
}

impl DialogueEntry {
    pub fn new(speaker: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            line: line.into(),
        }
    }
}

/// Phase 4 rendered scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SceneRecord {
    pub scene_id: i64,
    pub title: String,
    pub description: String,
    pub mood: String,
    pub direction: String,
    /// Image-generation prompt, expected free of Japanese text
    pub sd_prompt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_feelings: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_flow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bubbles: Option<Vec<Bubble>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<Vec<DialogueEntry>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onomatopoeia: Option<Vec<String>>,
}

impl SceneRecord {
    pub fn new(scene_id: i64, title: impl Into<String>) -> Self {
        Self {
            scene_id,
            title: title.into(),
            ..Default::default()
        }
    }

    /// Builder: Set description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: Set mood.
    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = mood.into();
        self
    }

    /// Builder: Set direction.
    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = direction.into();
        self
    }

    /// Builder: Set image prompt.
    pub fn with_sd_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.sd_prompt = prompt.into();
        self
    }

    /// Builder: Set intensity.
    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = Some(intensity);
        self
    }

    /// Builder: Append a bubble.
    pub fn with_bubble(mut self, bubble: Bubble) -> Self {
        self.bubbles.get_or_insert_with(Vec::new).push(bubble);
        self
    }

    /// Builder: Append a legacy dialogue line.
    pub fn with_dialogue(mut self, entry: DialogueEntry) -> Self {
        self.dialogue.get_or_insert_with(Vec::new).push(entry);
        self
    }

    /// Builder: Append an onomatopoeia.
    pub fn with_onomatopoeia(mut self, sound: impl Into<String>) -> Self {
        self.onomatopoeia
            .get_or_insert_with(Vec::new)
            .push(sound.into());
        self
    }

    /// Whether this scene is an upstream failure marker.
    pub fn is_error_sentinel(&self) -> bool {
        self.mood == crate::phase::scene::ERROR_SENTINEL
    }

    pub fn to_value(&self) -> Value {
        to_json(self)
    }
}
