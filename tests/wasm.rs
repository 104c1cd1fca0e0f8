#![cfg(target_arch = "wasm32")]

use lastcall_core::{GameEngine, SceneEngine};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn game_engine_round_trips_state_json() {
    let mut engine = GameEngine::new(Some(7), None).expect("fresh session");
    let opening = engine.begin().expect("begin serializes");
    assert!(opening.contains("RoundDealt"), "opening should deal a round");

    let snapshot = engine.state_json().expect("state serializes");
    let mut resumed = GameEngine::new(Some(7), Some(snapshot.clone())).expect("resume from json");
    assert_eq!(resumed.state_json().expect("state serializes"), snapshot);

    let resolution = resumed.select_card(0).expect("selection serializes");
    assert!(resolution.contains("CardChosen"));
}

#[wasm_bindgen_test]
fn scene_engine_serves_the_sample_script() {
    let engine = SceneEngine::new(None).expect("sample script");
    let view = engine.view_json(0.0).expect("view serializes");
    assert!(view.contains("Last call"));

    let missing = SceneEngine::new(Some("not json".into()));
    assert!(missing.is_err(), "malformed script JSON is a boundary error");
}
