use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::utils::session_rng;

use super::cards::{DemiurgeCard, RealCard, ILLUSION_LABELS, SEARCH_FINDS};
use super::state::{DecisionCard, GameEvent, GameOverReason, GameState};

/// Chance that an inspection sees through the illusions in the round.
pub const INSPECT_SUCCESS_CHANCE: f64 = 0.7;
/// Chance that picking an unrevealed illusion works out anyway.
pub const ILLUSION_GAMBLE_CHANCE: f64 = 0.3;

const ILLUSION_TURN_BONUS: i32 = 5;
const ILLUSION_TURN_PENALTY: i32 = -5;
const PIANO_TURN_BONUS: i32 = 2;
const DRINK_HEAL: i32 = 10;
const BRAWL_DAMAGE: i32 = 10;

/// Post-state plus the events produced by one operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResolution {
    pub state: GameState,
    pub events: Vec<GameEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<GameOverReason>,
}

impl TurnResolution {
    pub fn new(state: GameState, mut events: Vec<GameEvent>) -> Self {
        let outcome = state.outcome;
        if let Some(reason) = outcome {
            let has_event = events
                .iter()
                .any(|event| matches!(event, GameEvent::GameOver { .. }));
            if !has_event {
                events.push(GameEvent::GameOver { reason });
            }
        }
        Self {
            state,
            events,
            outcome,
        }
    }
}

/// Round loop: adversary draw, decision round, player choice, game-over
/// evaluation. Operations on a finished session or a dead player are
/// silent no-ops returning an empty event list.
pub struct TurnEngine {
    rng: SmallRng,
}

impl TurnEngine {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: session_rng(seed),
        }
    }

    pub fn begin(&mut self, state: &mut GameState) -> Vec<GameEvent> {
        if state.is_finished() || !state.round.is_empty() {
            return Vec::new();
        }
        let mut events = self.adversary_turn(state);
        events.extend(self.deal_round(state));
        events
    }

    pub fn adversary_turn(&mut self, state: &mut GameState) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if state.is_finished() || !state.player.is_alive() {
            return events;
        }
        let card = match state.demiurge.draw(&mut self.rng) {
            Some(card) => card,
            None => return events,
        };
        state.turn += 1;
        emit(state, &mut events, GameEvent::AdversaryDrew { card });
        emit(
            state,
            &mut events,
            GameEvent::Narrative {
                text: card.flavor().to_string(),
            },
        );

        // Only Attack carries a numeric effect; the rest are narrative.
        if card == DemiurgeCard::Attack {
            let roll = self.rng.gen_range(0..=2);
            let damage = (state.demiurge.attack - state.player.defense + roll).max(1);
            if let Some(event) = state.damage_player(damage) {
                emit(state, &mut events, event);
            }
            settle_outcome(state, &mut events);
        }
        events
    }

    /// 5 real cards plus 2 illusions, or 3 when the last adversary card
    /// summoned them; the combined batch is reshuffled.
    pub fn deal_round(&mut self, state: &mut GameState) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if state.is_finished() {
            return events;
        }

        let mut cards: Vec<DecisionCard> = RealCard::ALL
            .iter()
            .map(|card| DecisionCard::Real { card: *card })
            .collect();
        cards.shuffle(&mut self.rng);

        let illusion_count = if state.demiurge.last_card == Some(DemiurgeCard::SummonIllusion) {
            3
        } else {
            2
        };
        let mut labels = ILLUSION_LABELS.to_vec();
        labels.shuffle(&mut self.rng);
        cards.extend(labels.into_iter().take(illusion_count).map(|label| {
            DecisionCard::Illusion {
                label: label.to_string(),
                revealed: false,
            }
        }));
        cards.shuffle(&mut self.rng);

        let display: Vec<String> = cards.iter().map(DecisionCard::display_label).collect();
        state.round = cards;
        emit(state, &mut events, GameEvent::RoundDealt { cards: display });
        events
    }

    /// Success reveals every illusion and grants bonus turns; failure
    /// costs one turn. The round stays on the table either way.
    pub fn inspect_illusions(&mut self, state: &mut GameState) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if state.is_finished() || !state.player.is_alive() {
            return events;
        }
        if state.illusion_indices().is_empty() {
            emit(state, &mut events, GameEvent::NothingAmiss);
            return events;
        }

        if self.rng.gen_bool(INSPECT_SUCCESS_CHANCE) {
            if let Some(event) = state.adjust_turns(ILLUSION_TURN_BONUS) {
                emit(state, &mut events, event);
            }
            let mut count = 0;
            for card in &mut state.round {
                if let DecisionCard::Illusion { revealed, .. } = card {
                    if !*revealed {
                        *revealed = true;
                        count += 1;
                    }
                }
            }
            emit(state, &mut events, GameEvent::IllusionsRevealed { count });
        } else {
            emit(state, &mut events, GameEvent::InspectFailed);
            if let Some(event) = state.adjust_turns(-1) {
                emit(state, &mut events, event);
            }
            settle_outcome(state, &mut events);
        }
        events
    }

    pub fn select_card(&mut self, state: &mut GameState, index: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if state.is_finished() || !state.player.is_alive() {
            return events;
        }
        let card = match state.round.get(index) {
            Some(card) => card.clone(),
            None => return events,
        };
        emit(
            state,
            &mut events,
            GameEvent::CardChosen {
                index,
                label: card.display_label(),
            },
        );

        match card {
            DecisionCard::Real { card } => self.apply_real_card(state, &mut events, card),
            DecisionCard::Illusion {
                label,
                revealed: false,
            } => {
                if self.rng.gen_bool(ILLUSION_GAMBLE_CHANCE) {
                    emit(
                        state,
                        &mut events,
                        GameEvent::Narrative {
                            text: format!("You see through \"{label}\" just in time."),
                        },
                    );
                    if let Some(event) = state.adjust_turns(ILLUSION_TURN_BONUS) {
                        emit(state, &mut events, event);
                    }
                } else {
                    emit(
                        state,
                        &mut events,
                        GameEvent::Narrative {
                            text: format!("\"{label}\" swallows you whole for a moment."),
                        },
                    );
                    if let Some(event) = state.adjust_turns(ILLUSION_TURN_PENALTY) {
                        emit(state, &mut events, event);
                    }
                }
                // The act of choosing costs a turn on top of either branch.
                if let Some(event) = state.adjust_turns(-1) {
                    emit(state, &mut events, event);
                }
            }
            DecisionCard::Illusion {
                label,
                revealed: true,
            } => {
                emit(
                    state,
                    &mut events,
                    GameEvent::Narrative {
                        text: format!("Your hand passes straight through \"{label}\"."),
                    },
                );
                if let Some(event) = state.adjust_turns(-1) {
                    emit(state, &mut events, event);
                }
            }
        }

        settle_outcome(state, &mut events);
        if !state.is_finished() {
            events.extend(self.adversary_turn(state));
            events.extend(self.deal_round(state));
        }
        events
    }

    pub fn quit(&mut self, state: &mut GameState) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if state.is_finished() {
            return events;
        }
        state.declare_over(GameOverReason::Abandoned);
        events.push(GameEvent::GameOver {
            reason: GameOverReason::Abandoned,
        });
        events
    }

    pub fn check_game_over(state: &mut GameState) -> Option<GameOverReason> {
        state.evaluate_game_over()
    }

    fn apply_real_card(
        &mut self,
        state: &mut GameState,
        events: &mut Vec<GameEvent>,
        card: RealCard,
    ) {
        match card {
            RealCard::OrderADrink => {
                if let Some(event) = state.heal_player(DRINK_HEAL) {
                    emit(state, events, event);
                }
            }
            RealCard::StartABarBrawl => {
                if let Some(event) = state.damage_player(BRAWL_DAMAGE) {
                    emit(state, events, event);
                }
            }
            RealCard::SearchBehindTheBar => {
                if self.rng.gen_bool(0.5) {
                    if let Some(item) = SEARCH_FINDS.choose(&mut self.rng) {
                        state.player.inventory.push((*item).to_string());
                        emit(
                            state,
                            events,
                            GameEvent::ItemFound {
                                item: (*item).to_string(),
                            },
                        );
                    }
                } else {
                    emit(
                        state,
                        events,
                        GameEvent::Narrative {
                            text: "Nothing back there but dust and a sleeping cat.".to_string(),
                        },
                    );
                }
            }
            RealCard::ListenToThePiano => {
                emit(
                    state,
                    events,
                    GameEvent::Narrative {
                        text: "The piano plays a song that buys you a little more night."
                            .to_string(),
                    },
                );
                if let Some(event) = state.adjust_turns(PIANO_TURN_BONUS) {
                    emit(state, events, event);
                }
            }
            RealCard::TalkToTheBarkeep => {
                emit(
                    state,
                    events,
                    GameEvent::Narrative {
                        text: "The barkeep polishes a glass and says nothing useful.".to_string(),
                    },
                );
            }
        }
        if let Some(event) = state.adjust_turns(-1) {
            emit(state, events, event);
        }
    }
}

fn emit(state: &mut GameState, events: &mut Vec<GameEvent>, event: GameEvent) {
    state.record_event(event.clone());
    events.push(event);
}

// Pushes GameOver into the local batch only when this call tripped it;
// the session log is handled by declare_over.
fn settle_outcome(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let was_finished = state.is_finished();
    if let Some(reason) = state.evaluate_game_over() {
        if !was_finished {
            events.push(GameEvent::GameOver { reason });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Player;

    /// A round of the five real cards only, dealt by hand so tests can
    /// pick a known card without fighting the shuffle.
    fn real_only_state() -> GameState {
        let mut state = GameState::new();
        state.round = RealCard::ALL
            .iter()
            .map(|card| DecisionCard::Real { card: *card })
            .collect();
        state
    }

    fn index_of(state: &GameState, label: &str) -> usize {
        state
            .round
            .iter()
            .position(|card| card.display_label() == label)
            .expect("card should be in the round")
    }

    #[test]
    fn dealt_round_has_seven_cards_without_duplicates() {
        let mut engine = TurnEngine::new(Some(3));
        let mut state = GameState::new();
        engine.begin(&mut state);

        // The opening draw is seed-dependent; only a summon biases the
        // count, and that is covered separately below.
        let expected = if state.demiurge.last_card == Some(DemiurgeCard::SummonIllusion) {
            8
        } else {
            7
        };
        assert_eq!(state.round.len(), expected);

        let mut labels: Vec<String> = state.round.iter().map(DecisionCard::display_label).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), state.round.len(), "labels must be unique per batch");
    }

    #[test]
    fn summon_illusion_biases_the_round_to_eight_cards() {
        let mut engine = TurnEngine::new(Some(5));
        let mut state = GameState::new();
        state.demiurge.last_card = Some(DemiurgeCard::SummonIllusion);

        engine.deal_round(&mut state);

        assert_eq!(state.round.len(), 8);
        assert_eq!(state.illusion_indices().len(), 3);
    }

    #[test]
    fn non_summon_round_carries_two_illusions() {
        let mut engine = TurnEngine::new(Some(5));
        let mut state = GameState::new();
        state.demiurge.last_card = Some(DemiurgeCard::Mockery);

        engine.deal_round(&mut state);

        assert_eq!(state.round.len(), 7);
        assert_eq!(state.illusion_indices().len(), 2);
    }

    #[test]
    fn order_a_drink_clamps_hp_and_costs_one_turn() {
        // Scenario: fresh session, the drink heals into the cap and the
        // action itself costs the only turn spent.
        let mut engine = TurnEngine::new(Some(9));
        let mut state = GameState::new();
        engine.begin(&mut state);

        let index = index_of(&state, "Order a Drink");
        let events = engine.select_card(&mut state, index);

        assert!(
            events
                .iter()
                .any(|event| matches!(event, GameEvent::Healed { amount: 10, hp: 100 })),
            "heal should clamp at 100"
        );
        assert!(
            events
                .iter()
                .any(|event| matches!(event, GameEvent::TurnsChanged { delta: -1, turns: 59 })),
            "the choice should cost exactly one turn"
        );
    }

    #[test]
    fn bar_brawl_at_low_hp_ends_the_game_and_freezes_state() {
        let mut engine = TurnEngine::new(Some(13));
        let mut state = real_only_state();
        state.player.hp = 5;

        let index = index_of(&state, "Start a Bar Brawl");
        let events = engine.select_card(&mut state, index);

        assert!(state.player.hp <= 0, "the brawl should be lethal at 5 hp");
        assert_eq!(state.outcome, Some(GameOverReason::Defeat));
        assert!(
            events.iter().any(|event| matches!(
                event,
                GameEvent::GameOver {
                    reason: GameOverReason::Defeat
                }
            )),
            "game over should be announced"
        );

        // Once over, further selections are silent no-ops.
        let frozen = state.clone();
        let after = engine.select_card(&mut state, 0);
        assert!(after.is_empty(), "no events after game over");
        assert_eq!(state, frozen, "no mutation after game over");
    }

    #[test]
    fn inspecting_a_round_without_illusions_is_free() {
        let mut engine = TurnEngine::new(Some(1));
        let mut state = real_only_state();

        let events = engine.inspect_illusions(&mut state);

        assert_eq!(events, vec![GameEvent::NothingAmiss]);
        assert_eq!(state.player.turns, 60, "a clean round must not cost turns");
    }

    #[test]
    fn inspect_either_reveals_everything_or_costs_one_turn() {
        let mut engine = TurnEngine::new(Some(21));
        let mut state = GameState::new();
        state.demiurge.last_card = Some(DemiurgeCard::Mockery);
        engine.deal_round(&mut state);

        let events = engine.inspect_illusions(&mut state);

        let succeeded = events
            .iter()
            .any(|event| matches!(event, GameEvent::IllusionsRevealed { .. }));
        if succeeded {
            assert_eq!(state.player.turns, 65);
            assert!(
                state
                    .round
                    .iter()
                    .all(|card| !card.is_unrevealed_illusion()),
                "success reveals every illusion in the round"
            );
        } else {
            assert_eq!(state.player.turns, 59);
            assert!(events.contains(&GameEvent::InspectFailed));
        }
        assert!(
            state.round.len() == 7,
            "inspection never ends the round or redeals"
        );
    }

    #[test]
    fn illusion_gamble_pays_plus_four_or_minus_six() {
        let mut engine = TurnEngine::new(Some(17));
        let mut state = GameState::new();
        state.round = vec![DecisionCard::Illusion {
            label: "A Shimmering Door".into(),
            revealed: false,
        }];

        engine.select_card(&mut state, 0);

        // +5 or -5 from the gamble, -1 for the act of choosing; the
        // follow-up adversary draw never touches turns.
        assert!(
            state.player.turns == 64 || state.player.turns == 54,
            "turns should be 64 or 54, got {}",
            state.player.turns
        );
    }

    #[test]
    fn revealed_illusion_costs_only_the_action_turn() {
        let mut engine = TurnEngine::new(Some(17));
        let mut state = GameState::new();
        state.round = vec![DecisionCard::Illusion {
            label: "A Familiar Face".into(),
            revealed: true,
        }];

        engine.select_card(&mut state, 0);

        assert_eq!(state.player.turns, 59);
    }

    #[test]
    fn out_of_range_selection_is_a_silent_no_op() {
        let mut engine = TurnEngine::new(Some(2));
        let mut state = real_only_state();
        let before = state.clone();

        let events = engine.select_card(&mut state, 99);

        assert!(events.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn check_game_over_reports_iff_a_loss_condition_holds() {
        let mut state = GameState::new();
        assert_eq!(TurnEngine::check_game_over(&mut state), None);

        state.player.turns = 0;
        assert_eq!(
            TurnEngine::check_game_over(&mut state),
            Some(GameOverReason::Timeout)
        );
        assert!(state.is_finished());
    }

    #[test]
    fn adversary_never_acts_on_a_dead_player() {
        let mut engine = TurnEngine::new(Some(4));
        let mut state = GameState::new();
        state.player.hp = 0;
        state.evaluate_game_over();
        let before = state.clone();

        let events = engine.adversary_turn(&mut state);

        assert!(events.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn quit_finishes_the_session() {
        let mut engine = TurnEngine::new(Some(6));
        let mut state = GameState::new();
        engine.begin(&mut state);

        let events = engine.quit(&mut state);

        assert_eq!(state.outcome, Some(GameOverReason::Abandoned));
        assert!(events.iter().any(|event| matches!(
            event,
            GameEvent::GameOver {
                reason: GameOverReason::Abandoned
            }
        )));
        assert!(engine.inspect_illusions(&mut state).is_empty());
    }

    #[test]
    fn seeded_engines_replay_identically() {
        let mut first_engine = TurnEngine::new(Some(42));
        let mut second_engine = TurnEngine::new(Some(42));
        let mut first_state = GameState::new();
        let mut second_state = GameState::new();

        let first_events = first_engine.begin(&mut first_state);
        let second_events = second_engine.begin(&mut second_state);
        assert_eq!(first_events, second_events);
        assert_eq!(first_state, second_state);

        let first_pick = first_engine.select_card(&mut first_state, 0);
        let second_pick = second_engine.select_card(&mut second_state, 0);
        assert_eq!(first_pick, second_pick);
        assert_eq!(first_state, second_state);
    }

    #[test]
    fn resolution_appends_a_missing_game_over_event() {
        let mut state = GameState::new();
        state.player = Player {
            hp: 0,
            ..Player::new()
        };
        state.evaluate_game_over();

        let resolution = TurnResolution::new(state, Vec::new());

        assert_eq!(resolution.outcome, Some(GameOverReason::Defeat));
        assert!(resolution
            .events
            .iter()
            .any(|event| matches!(event, GameEvent::GameOver { .. })));
    }
}
