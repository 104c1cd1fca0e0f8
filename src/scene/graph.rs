use serde::{Deserialize, Serialize};

/// Period of the cosmetic frame cycle. Animation is a pure function of
/// elapsed time, so the core owns no timers to cancel across transitions.
pub const FRAME_PERIOD_MS: f64 = 500.0;

/// One on-screen character: a name and an ordered sequence of image
/// frames cycled while the scene is shown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    pub frames: Vec<String>,
    #[serde(default)]
    pub action: String,
}

impl Character {
    pub fn new(name: impl Into<String>, frames: Vec<String>, action: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames,
            action: action.into(),
        }
    }

    /// Frame asset at the given elapsed time: `(elapsed / 500ms) % count`.
    /// Single-frame characters never cycle.
    pub fn frame_at(&self, elapsed_ms: f64) -> Option<&str> {
        if self.frames.is_empty() {
            return None;
        }
        let index = if self.frames.len() > 1 {
            (elapsed_ms.max(0.0) / FRAME_PERIOD_MS) as usize % self.frames.len()
        } else {
            0
        };
        self.frames.get(index).map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub target: usize,
}

impl Choice {
    pub fn new(label: impl Into<String>, target: usize) -> Self {
        Self {
            label: label.into(),
            target,
        }
    }
}

/// How a scene leaves itself: a branching choice set, a single linear
/// continuation, or the terminal marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Transition {
    Choices { options: Vec<Choice> },
    Next { scene: usize },
    End,
}

impl Default for Transition {
    fn default() -> Self {
        Transition::End
    }
}

/// One node of the dialogue graph. Authors may wire scenes into any
/// directed shape, cycles included; only the indices matter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scene {
    pub background: String,
    pub speaker: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub transition: Transition,
}

impl Scene {
    pub fn new(
        background: impl Into<String>,
        speaker: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            background: background.into(),
            speaker: speaker.into(),
            text: text.into(),
            characters: Vec::new(),
            transition: Transition::End,
        }
    }

    pub fn with_character(mut self, character: Character) -> Self {
        self.characters.push(character);
        self
    }

    pub fn with_next(mut self, scene: usize) -> Self {
        self.transition = Transition::Next { scene };
        self
    }

    pub fn with_choices(mut self, options: Vec<Choice>) -> Self {
        self.transition = Transition::Choices { options };
        self
    }
}
