use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Draw pile over a fixed full set of cards.
///
/// Cards are drawn without replacement; when the pile runs dry it is
/// refilled from the full set and shuffled before the next draw, so the
/// owner never runs out. Consecutive identical draws are possible right
/// after a reshuffle boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck<T> {
    #[serde(default = "Vec::new")]
    pile: Vec<T>,
    full_set: Vec<T>,
}

impl<T: Clone> Deck<T> {
    pub fn new(full_set: Vec<T>) -> Self {
        Self {
            pile: Vec::new(),
            full_set,
        }
    }

    pub fn remaining(&self) -> usize {
        self.pile.len()
    }

    pub fn full_set(&self) -> &[T] {
        &self.full_set
    }

    /// Pops one card, reshuffling the full set back in first when the pile
    /// is empty. Returns `None` only for an empty full set.
    pub fn draw_with_reshuffle(&mut self, rng: &mut impl Rng) -> Option<T> {
        if self.pile.is_empty() {
            self.pile = self.full_set.clone();
            self.pile.shuffle(rng);
        }
        self.pile.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_deck() -> Deck<u8> {
        Deck::new(vec![1, 2, 3, 4, 5])
    }

    #[test]
    fn draws_only_members_of_the_full_set() {
        let mut deck = sample_deck();
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..50 {
            let card = deck
                .draw_with_reshuffle(&mut rng)
                .expect("non-empty full set should always yield a card");
            assert!(deck.full_set().contains(&card), "card {card} is foreign");
        }
    }

    #[test]
    fn full_cycle_visits_every_card_once() {
        let mut deck = sample_deck();
        let mut rng = SmallRng::seed_from_u64(11);

        // First draw triggers the reshuffle, so the next five draws form a
        // window that does not cross a reshuffle boundary.
        let mut window: Vec<u8> = (0..5)
            .map(|_| {
                deck.draw_with_reshuffle(&mut rng)
                    .expect("deck should not be exhausted mid-cycle")
            })
            .collect();
        window.sort_unstable();
        assert_eq!(window, vec![1, 2, 3, 4, 5], "a full cycle must not starve any card");
        assert_eq!(deck.remaining(), 0, "pile should be empty after a full cycle");
    }

    #[test]
    fn empty_full_set_yields_nothing() {
        let mut deck: Deck<u8> = Deck::new(Vec::new());
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(deck.draw_with_reshuffle(&mut rng), None);
    }
}
