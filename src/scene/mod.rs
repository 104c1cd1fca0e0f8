//! Visual-novel scene graph: static scenes, a current index, and
//! time-derived frame animation.

pub mod graph;
pub mod player;

pub use graph::{Character, Choice, Scene, Transition, FRAME_PERIOD_MS};
pub use player::{CharacterFrame, SceneControls, ScenePlayer, SceneView};
