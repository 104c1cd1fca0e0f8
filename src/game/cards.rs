use serde::{Deserialize, Serialize};

/// Sabotage cards the Demiurge draws each round.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DemiurgeCard {
    Attack,
    SummonIllusion,
    Mockery,
    Prophecy,
    LastOrders,
}

impl DemiurgeCard {
    /// The fixed multiset the adversary deck reshuffles back to.
    pub const FULL_SET: [DemiurgeCard; 6] = [
        DemiurgeCard::Attack,
        DemiurgeCard::Attack,
        DemiurgeCard::SummonIllusion,
        DemiurgeCard::Mockery,
        DemiurgeCard::Prophecy,
        DemiurgeCard::LastOrders,
    ];

    pub fn flavor(&self) -> &'static str {
        match self {
            DemiurgeCard::Attack => "The Demiurge lashes out from behind the taps.",
            DemiurgeCard::SummonIllusion => {
                "The Demiurge snaps its fingers and the room doubles in on itself."
            }
            DemiurgeCard::Mockery => "The Demiurge laughs at something you haven't done yet.",
            DemiurgeCard::Prophecy => "The Demiurge mutters a date that means nothing to you. Yet.",
            DemiurgeCard::LastOrders => "The Demiurge rings the bell. Nobody else looks up.",
        }
    }
}

/// Real decision cards presented to the player each round. The source list
/// is deduplicated; a dealt round contains each of these exactly once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RealCard {
    OrderADrink,
    StartABarBrawl,
    SearchBehindTheBar,
    ListenToThePiano,
    TalkToTheBarkeep,
}

impl RealCard {
    pub const ALL: [RealCard; 5] = [
        RealCard::OrderADrink,
        RealCard::StartABarBrawl,
        RealCard::SearchBehindTheBar,
        RealCard::ListenToThePiano,
        RealCard::TalkToTheBarkeep,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RealCard::OrderADrink => "Order a Drink",
            RealCard::StartABarBrawl => "Start a Bar Brawl",
            RealCard::SearchBehindTheBar => "Search Behind the Bar",
            RealCard::ListenToThePiano => "Listen to the Piano",
            RealCard::TalkToTheBarkeep => "Talk to the Barkeep",
        }
    }
}

/// Disguised options injected among the real cards.
pub const ILLUSION_LABELS: [&str; 3] = [
    "A Shimmering Door",
    "A Familiar Face",
    "An Untouched Glass",
];

/// Items the bar search can turn up.
pub const SEARCH_FINDS: [&str; 2] = ["Rusty Key", "Bottle of Gin"];
