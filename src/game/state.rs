use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cards::{DemiurgeCard, RealCard};
use super::deck::Deck;

pub const MAX_HP: i32 = 100;
pub const STARTING_HP: i32 = 100;
pub const STARTING_TURNS: i32 = 60;
pub const STARTING_DEFENSE: i32 = 5;
pub const DEMIURGE_ATTACK: i32 = 10;

/// The patron trying to outlast the night.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub hp: i32,
    pub turns: i32,
    pub defense: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inventory: Vec<String>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            hp: STARTING_HP,
            turns: STARTING_TURNS,
            defense: STARTING_DEFENSE,
            inventory: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0 && self.turns > 0
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// The adversary behind the bar. Draws one sabotage card per round from a
/// deck that reshuffles itself whenever it runs dry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Demiurge {
    pub attack: i32,
    pub deck: Deck<DemiurgeCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_card: Option<DemiurgeCard>,
}

impl Demiurge {
    pub fn new() -> Self {
        Self {
            attack: DEMIURGE_ATTACK,
            deck: Deck::new(DemiurgeCard::FULL_SET.to_vec()),
            last_card: None,
        }
    }

    pub fn draw(&mut self, rng: &mut impl Rng) -> Option<DemiurgeCard> {
        let card = self.deck.draw_with_reshuffle(rng)?;
        self.last_card = Some(card);
        Some(card)
    }
}

impl Default for Demiurge {
    fn default() -> Self {
        Self::new()
    }
}

/// A decision option dealt to the player. Illusions are disguised until a
/// successful inspection relabels them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum DecisionCard {
    Real { card: RealCard },
    Illusion { label: String, revealed: bool },
}

impl DecisionCard {
    pub fn display_label(&self) -> String {
        match self {
            DecisionCard::Real { card } => card.label().to_string(),
            DecisionCard::Illusion { label, revealed } => {
                if *revealed {
                    format!("Illusion: {label}")
                } else {
                    format!("?? {label}")
                }
            }
        }
    }

    pub fn is_unrevealed_illusion(&self) -> bool {
        matches!(self, DecisionCard::Illusion { revealed: false, .. })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameOverReason {
    Defeat,
    Timeout,
    Abandoned,
}

/// Session event stream, recorded in order and handed to the presentation
/// layer for narration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    AdversaryDrew {
        card: DemiurgeCard,
    },
    Narrative {
        text: String,
    },
    DamageTaken {
        amount: i32,
        hp: i32,
    },
    Healed {
        amount: i32,
        hp: i32,
    },
    TurnsChanged {
        delta: i32,
        turns: i32,
    },
    ItemFound {
        item: String,
    },
    RoundDealt {
        cards: Vec<String>,
    },
    CardChosen {
        index: usize,
        label: String,
    },
    IllusionsRevealed {
        count: usize,
    },
    InspectFailed,
    NothingAmiss,
    GameOver {
        reason: GameOverReason,
    },
}

/// Whole-session state. Created once per game, mutated in place each turn,
/// discarded with the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub player: Player,
    pub demiurge: Demiurge,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub round: Vec<DecisionCard>,
    pub turn: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_log: Vec<GameEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<GameOverReason>,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            player: Player::new(),
            demiurge: Demiurge::new(),
            round: Vec::new(),
            turn: 0,
            event_log: Vec::new(),
            outcome: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn record_event(&mut self, event: GameEvent) {
        self.event_log.push(event);
    }

    pub fn damage_player(&mut self, amount: i32) -> Option<GameEvent> {
        if amount <= 0 {
            return None;
        }
        self.player.hp -= amount;
        Some(GameEvent::DamageTaken {
            amount,
            hp: self.player.hp,
        })
    }

    /// Heals clamp at [`MAX_HP`]; hp is never rendered above the cap.
    pub fn heal_player(&mut self, amount: i32) -> Option<GameEvent> {
        if amount <= 0 {
            return None;
        }
        self.player.hp = (self.player.hp + amount).min(MAX_HP);
        Some(GameEvent::Healed {
            amount,
            hp: self.player.hp,
        })
    }

    pub fn adjust_turns(&mut self, delta: i32) -> Option<GameEvent> {
        if delta == 0 {
            return None;
        }
        self.player.turns += delta;
        Some(GameEvent::TurnsChanged {
            delta,
            turns: self.player.turns,
        })
    }

    /// Indices of illusion cards in the current round, revealed or not.
    pub fn illusion_indices(&self) -> Vec<usize> {
        self.round
            .iter()
            .enumerate()
            .filter(|(_, card)| matches!(card, DecisionCard::Illusion { .. }))
            .map(|(index, _)| index)
            .collect()
    }

    /// Evaluates the loss conditions, latching the outcome on first trip.
    /// Defeat wins over timeout when both hold. Must run after every
    /// hp/turn mutation so the adversary never acts on a dead player.
    pub fn evaluate_game_over(&mut self) -> Option<GameOverReason> {
        if let Some(reason) = self.outcome {
            return Some(reason);
        }
        let reason = if self.player.hp <= 0 {
            Some(GameOverReason::Defeat)
        } else if self.player.turns <= 0 {
            Some(GameOverReason::Timeout)
        } else {
            None
        };
        if let Some(reason) = reason {
            self.declare_over(reason);
        }
        reason
    }

    pub fn declare_over(&mut self, reason: GameOverReason) {
        if self.outcome.is_none() {
            self.outcome = Some(reason);
            self.record_event(GameEvent::GameOver { reason });
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
