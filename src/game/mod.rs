//! Card-game core: entities, the self-reshuffling adversary deck, and the
//! turn engine.

pub mod cards;
pub mod deck;
pub mod rules;
pub mod state;

pub use cards::{DemiurgeCard, RealCard, ILLUSION_LABELS, SEARCH_FINDS};
pub use deck::Deck;
pub use rules::{TurnEngine, TurnResolution, ILLUSION_GAMBLE_CHANCE, INSPECT_SUCCESS_CHANCE};
pub use state::{
    DecisionCard,
    Demiurge,
    GameEvent,
    GameOverReason,
    GameState,
    Player,
    MAX_HP,
    STARTING_HP,
    STARTING_TURNS,
};
