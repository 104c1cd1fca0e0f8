pub mod game;
pub mod runner;
pub mod scene;
pub mod utils;

use std::str::FromStr;

use gloo_timers::future::TimeoutFuture;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use game::{
    DecisionCard, Deck, Demiurge, DemiurgeCard, GameEvent, GameOverReason, GameState, Player,
    RealCard, TurnEngine, TurnResolution,
};
pub use runner::{swipe_direction, PointerTracker, RunnerSnapshot, RunnerWorld, SwipeDirection};
pub use scene::{Character, Choice, Scene, SceneControls, ScenePlayer, SceneView, Transition};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn resolution_json(state: &GameState, events: Vec<GameEvent>) -> Result<String, JsValue> {
    let resolution = TurnResolution::new(state.clone(), events);
    if let Some(reason) = resolution.outcome {
        web_sys::console::log_1(&format!("lastcall: session over ({reason:?})").into());
    }
    serde_json::to_string(&resolution).map_err(serde_to_js_error)
}

/// Card-game session owned by the page: one `GameState` plus the turn
/// engine that drives it. Every operation returns a `TurnResolution` JSON
/// snapshot for the presentation layer.
#[wasm_bindgen]
pub struct GameEngine {
    state: GameState,
    engine: TurnEngine,
}

#[wasm_bindgen]
impl GameEngine {
    /// `seed` enables deterministic replay; `initial_state_json` resumes
    /// from a snapshot instead of a fresh session.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u32>, initial_state_json: Option<String>) -> Result<GameEngine, JsValue> {
        let state = if let Some(json) = initial_state_json {
            serde_json::from_str(&json).map_err(serde_to_js_error)?
        } else {
            GameState::new()
        };
        Ok(GameEngine {
            state,
            engine: TurnEngine::new(seed.map(u64::from)),
        })
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(serde_to_js_error)
    }

    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let state: GameState = serde_json::from_str(json).map_err(serde_to_js_error)?;
        self.state = state;
        Ok(())
    }

    pub fn begin(&mut self) -> Result<String, JsValue> {
        let events = self.engine.begin(&mut self.state);
        resolution_json(&self.state, events)
    }

    pub fn select_card(&mut self, index: usize) -> Result<String, JsValue> {
        let events = self.engine.select_card(&mut self.state, index);
        resolution_json(&self.state, events)
    }

    pub fn inspect(&mut self) -> Result<String, JsValue> {
        let events = self.engine.inspect_illusions(&mut self.state);
        resolution_json(&self.state, events)
    }

    pub fn quit(&mut self) -> Result<String, JsValue> {
        let events = self.engine.quit(&mut self.state);
        resolution_json(&self.state, events)
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Evaluates and returns the loss outcome, if any.
    pub fn check_game_over(&mut self) -> Result<JsValue, JsValue> {
        to_value(&TurnEngine::check_game_over(&mut self.state)).map_err(JsValue::from)
    }
}

/// Scene-graph session. Animation frames are derived from the elapsed
/// time the caller passes in; the page owns the actual clock.
#[wasm_bindgen]
pub struct SceneEngine {
    player: ScenePlayer,
}

#[wasm_bindgen]
impl SceneEngine {
    /// With no script JSON the built-in sample script is used.
    #[wasm_bindgen(constructor)]
    pub fn new(scenes_json: Option<String>) -> Result<SceneEngine, JsValue> {
        let player = if let Some(json) = scenes_json {
            let scenes: Vec<Scene> = serde_json::from_str(&json).map_err(serde_to_js_error)?;
            let mut player = ScenePlayer::new(scenes);
            player.show_scene(0);
            player
        } else {
            ScenePlayer::sample()
        };
        Ok(SceneEngine { player })
    }

    pub fn show_scene(&mut self, index: usize) -> bool {
        self.player.show_scene(index)
    }

    pub fn advance(&mut self) -> bool {
        self.player.advance()
    }

    pub fn choose(&mut self, index: usize) -> bool {
        self.player.choose(index)
    }

    /// Current view as JSON; `"null"` when nothing is shown.
    pub fn view_json(&self, elapsed_ms: f64) -> Result<String, JsValue> {
        serde_json::to_string(&self.player.view(elapsed_ms)).map_err(serde_to_js_error)
    }

    /// Resolves with the view as it will look `delay_ms` from
    /// `elapsed_ms`, for presentation layers that want the next animation
    /// frame pushed to them.
    pub fn peek_view(&self, elapsed_ms: f64, delay_ms: Option<u32>) -> Promise {
        let player = self.player.clone();
        let delay = delay_ms.unwrap_or(0);

        future_to_promise(async move {
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }
            let view = player.view(elapsed_ms + f64::from(delay));
            let json = serde_json::to_string(&view).map_err(serde_to_js_error)?;
            Ok(JsValue::from_str(&json))
        })
    }
}

/// Endless-runner session: world physics plus a pointer tracker that
/// turns down/up coordinate pairs into discrete swipes.
#[wasm_bindgen]
pub struct Runner {
    world: RunnerWorld,
    pointer: PointerTracker,
}

#[wasm_bindgen]
impl Runner {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, seed: Option<u32>) -> Runner {
        Runner {
            world: RunnerWorld::new(width, height, seed.map(u64::from)),
            pointer: PointerTracker::default(),
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.pointer.down(x, y);
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) {
        if let Some(direction) = self.pointer.up(x, y) {
            self.world.move_dir(direction);
        }
    }

    /// Direct button input: `"up"`, `"down"`, `"left"`, `"right"`.
    pub fn move_dir(&mut self, direction: &str) {
        if let Ok(direction) = SwipeDirection::from_str(direction) {
            self.world.move_dir(direction);
        }
    }

    pub fn tick(&mut self, dt: f64) {
        self.world.update(dt);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.world.resize(width, height);
    }

    pub fn reset(&mut self) {
        self.world.reset();
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.world.snapshot()).map_err(serde_to_js_error)
    }
}

/// Fresh card-game session state, for front-end debugging or explicit
/// initialization.
#[wasm_bindgen(js_name = "createGameState")]
pub fn create_game_state() -> Result<JsValue, JsValue> {
    to_value(&GameState::new()).map_err(JsValue::from)
}

/// The built-in sample scene script.
#[wasm_bindgen(js_name = "createSampleScenes")]
pub fn create_sample_scenes() -> Result<JsValue, JsValue> {
    to_value(ScenePlayer::sample().scenes()).map_err(JsValue::from)
}

/// Derives the discrete swipe (if any) from a pointer delta.
#[wasm_bindgen(js_name = "deriveSwipe")]
pub fn derive_swipe(dx: f64, dy: f64) -> Result<JsValue, JsValue> {
    to_value(&swipe_direction(dx, dy)).map_err(JsValue::from)
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
