use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::graph::{Character, Choice, Scene, Transition};

/// Interactive controls the presentation layer should offer for the
/// current scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum SceneControls {
    Choices { labels: Vec<String> },
    Continue,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharacterFrame {
    pub name: String,
    pub asset: String,
    #[serde(default)]
    pub action: String,
}

/// Render-state snapshot of the current scene at a given elapsed time.
/// The presentation adapter draws exactly this; the core never touches
/// the DOM.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SceneView {
    pub scene: usize,
    pub background: String,
    pub speaker: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub characters: Vec<CharacterFrame>,
    pub controls: SceneControls,
}

/// Walks a static scene graph. Only the current index is mutable; invalid
/// navigation halts progression silently instead of raising.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScenePlayer {
    scenes: Vec<Scene>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current: Option<usize>,
}

impl ScenePlayer {
    pub fn new(scenes: Vec<Scene>) -> Self {
        Self {
            scenes,
            current: None,
        }
    }

    /// A player over the built-in sample script, starting on scene 0.
    pub fn sample() -> Self {
        let mut player = Self::new(SAMPLE_SCRIPT.clone());
        player.show_scene(0);
        player
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.current.and_then(|index| self.scenes.get(index))
    }

    /// Shows scene `index`. An index with no scene behind it is a silent
    /// no-op: the previous scene stays rendered and progression stops.
    /// Showing the same index twice is idempotent; animation is derived
    /// from elapsed time, so there are no timers to double-schedule.
    pub fn show_scene(&mut self, index: usize) -> bool {
        if index >= self.scenes.len() {
            return false;
        }
        self.current = Some(index);
        true
    }

    /// Follows the linear `Next` edge. No-op on a branching scene, the
    /// terminal marker, or when nothing is shown.
    pub fn advance(&mut self) -> bool {
        match self.current_scene().map(|scene| scene.transition.clone()) {
            Some(Transition::Next { scene }) => self.show_scene(scene),
            _ => false,
        }
    }

    /// Follows branching choice `index` of the current scene, if any.
    pub fn choose(&mut self, index: usize) -> bool {
        let target = match self.current_scene() {
            Some(Scene {
                transition: Transition::Choices { options },
                ..
            }) => options.get(index).map(|choice| choice.target),
            _ => None,
        };
        match target {
            Some(target) => self.show_scene(target),
            None => false,
        }
    }

    /// Snapshot of the current scene with every character resolved to its
    /// frame at `elapsed_ms` since the scene was entered. `None` when no
    /// scene is shown.
    pub fn view(&self, elapsed_ms: f64) -> Option<SceneView> {
        let index = self.current?;
        let scene = self.scenes.get(index)?;
        let characters = scene
            .characters
            .iter()
            .filter_map(|character| {
                character.frame_at(elapsed_ms).map(|asset| CharacterFrame {
                    name: character.name.clone(),
                    asset: asset.to_string(),
                    action: character.action.clone(),
                })
            })
            .collect();
        let controls = match &scene.transition {
            Transition::Choices { options } => SceneControls::Choices {
                labels: options.iter().map(|choice| choice.label.clone()).collect(),
            },
            Transition::Next { .. } => SceneControls::Continue,
            Transition::End => SceneControls::None,
        };
        Some(SceneView {
            scene: index,
            background: scene.background.clone(),
            speaker: scene.speaker.clone(),
            text: scene.text.clone(),
            characters,
            controls,
        })
    }
}

/// Built-in script: a linear chain with one two-way branch that converges
/// back on the shared closing scene.
static SAMPLE_SCRIPT: Lazy<Vec<Scene>> = Lazy::new(|| {
    vec![
        // 0
        Scene::new("bar_exterior.png", "Narrator", "Last call at the Halfway House.")
            .with_character(Character::new(
                "Neon Sign",
                vec!["sign_on.png".into(), "sign_off.png".into()],
                "flicker",
            ))
            .with_next(1),
        // 1
        Scene::new(
            "bar_interior.png",
            "Barkeep",
            "Staying for one more, or heading out into the rain?",
        )
        .with_character(Character::new(
            "Barkeep",
            vec!["barkeep_wipe_0.png".into(), "barkeep_wipe_1.png".into()],
            "wipe",
        ))
        .with_choices(vec![
            Choice::new("One more.", 2),
            Choice::new("I'm done here.", 3),
        ]),
        // 2
        Scene::new(
            "bar_interior.png",
            "Barkeep",
            "Your funeral. This one's on the house.",
        )
        .with_character(Character::new(
            "Barkeep",
            vec!["barkeep_pour_0.png".into(), "barkeep_pour_1.png".into()],
            "pour",
        ))
        .with_next(4),
        // 3
        Scene::new(
            "bar_doorway.png",
            "You",
            "The rain can't be worse than the company.",
        )
        .with_next(4),
        // 4
        Scene::new("street_night.png", "Narrator", "Either way, the night ends the same."),
    ]
});
