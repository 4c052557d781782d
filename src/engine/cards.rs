use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::audio::Sound;

/// Resolution delays after the second flip of a pair: short when the pair
/// matched, longer on a mismatch so both faces stay readable.
pub const MATCH_DELAY_MS: u64 = 250;
pub const MISMATCH_DELAY_MS: u64 = 700;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CardsStatus {
    Running,
    Won,
}

/// Pair-count presets; deck size is twice the pair count.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PairCount {
    Casual,
    Standard,
    Expert,
}

impl PairCount {
    pub fn pairs(self) -> usize {
        match self {
            PairCount::Casual => 6,
            PairCount::Standard => 8,
            PairCount::Expert => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PairCount::Casual => "Casual",
            PairCount::Standard => "Standard",
            PairCount::Expert => "Expert",
        }
    }

    pub fn all() -> [PairCount; 3] {
        [PairCount::Casual, PairCount::Standard, PairCount::Expert]
    }

    pub fn index(self) -> usize {
        match self {
            PairCount::Casual => 0,
            PairCount::Standard => 1,
            PairCount::Expert => 2,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Card {
    pub id: usize,
    pub value: u8,
    pub flipped: bool,
    pub matched: bool,
}

struct PendingPair {
    first: usize,
    second: usize,
    remaining_ms: u64,
    is_match: bool,
}

/// Memory match over a shuffled deck of value pairs. At most two unmatched
/// cards are face up at once; the second flip locks input until the pair
/// resolves.
pub struct CardsGame {
    cards: Vec<Card>,
    first_pick: Option<usize>,
    pending: Option<PendingPair>,
    moves: u32,
    elapsed_ms: u64,
    status: CardsStatus,
    pair_count: PairCount,
    rng: StdRng,
    sounds: Vec<Sound>,
}

impl CardsGame {
    pub fn new(pair_count: PairCount) -> Self {
        Self::with_seed(rand::random(), pair_count)
    }

    pub fn with_seed(seed: u64, pair_count: PairCount) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let cards = Self::shuffled_deck(&mut rng, pair_count.pairs());
        CardsGame {
            cards,
            first_pick: None,
            pending: None,
            moves: 0,
            elapsed_ms: 0,
            status: CardsStatus::Running,
            pair_count,
            rng,
            sounds: Vec::new(),
        }
    }

    fn shuffled_deck(rng: &mut StdRng, pairs: usize) -> Vec<Card> {
        let mut values: Vec<u8> = (1..=pairs as u8).flat_map(|v| [v, v]).collect();
        values.shuffle(rng);
        values
            .into_iter()
            .enumerate()
            .map(|(id, value)| Card {
                id,
                value,
                flipped: false,
                matched: false,
            })
            .collect()
    }

    // --- read model ---

    pub fn status(&self) -> CardsStatus {
        self.status
    }

    pub fn pair_count(&self) -> PairCount {
        self.pair_count
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn locked(&self) -> bool {
        self.pending.is_some()
    }

    pub fn take_sounds(&mut self) -> Vec<Sound> {
        std::mem::take(&mut self.sounds)
    }

    // --- transitions ---

    /// Start over with a freshly shuffled deck.
    pub fn reset(&mut self, pair_count: PairCount) {
        *self = CardsGame::with_seed(self.rng.gen(), pair_count);
    }

    /// Flip a card face up. Returns false when the flip is rejected: input
    /// is locked for resolution, the game is over, or the card is already
    /// face up or matched.
    pub fn flip(&mut self, card_id: usize) -> bool {
        if self.pending.is_some() || self.status != CardsStatus::Running {
            return false;
        }
        let Some(card) = self.cards.get(card_id).copied() else {
            return false;
        };
        if card.flipped || card.matched {
            return false;
        }

        self.cards[card_id].flipped = true;
        self.sounds.push(Sound::Flip);

        match self.first_pick.take() {
            None => {
                self.first_pick = Some(card_id);
            }
            Some(first) => {
                // Lock immediately; one move per attempted pair.
                self.moves += 1;
                let is_match = self.cards[first].value == card.value;
                self.pending = Some(PendingPair {
                    first,
                    second: card_id,
                    remaining_ms: if is_match { MATCH_DELAY_MS } else { MISMATCH_DELAY_MS },
                    is_match,
                });
            }
        }
        true
    }

    // --- simulation ---

    pub fn tick(&mut self, elapsed_ms: u64) {
        if self.status != CardsStatus::Running {
            return;
        }
        self.elapsed_ms += elapsed_ms;

        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        if pending.remaining_ms > elapsed_ms {
            pending.remaining_ms -= elapsed_ms;
            return;
        }

        let PendingPair { first, second, is_match, .. } = self.pending.take().unwrap();
        if is_match {
            self.cards[first].matched = true;
            self.cards[second].matched = true;
            self.sounds.push(Sound::Match);
            if self.cards.iter().all(|c| c.matched) {
                self.status = CardsStatus::Won;
                self.sounds.push(Sound::Win);
            }
        } else {
            self.cards[first].flipped = false;
            self.cards[second].flipped = false;
            self.sounds.push(Sound::Mismatch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_pair(game: &CardsGame) -> (usize, usize) {
        let cards = game.cards();
        for a in 0..cards.len() {
            for b in a + 1..cards.len() {
                if cards[a].value == cards[b].value {
                    return (a, b);
                }
            }
        }
        unreachable!("every value appears twice");
    }

    fn find_mismatch(game: &CardsGame) -> (usize, usize) {
        let cards = game.cards();
        for a in 0..cards.len() {
            for b in a + 1..cards.len() {
                if cards[a].value != cards[b].value {
                    return (a, b);
                }
            }
        }
        unreachable!("deck has more than one value");
    }

    #[test]
    fn deck_holds_every_value_exactly_twice() {
        for preset in PairCount::all() {
            let game = CardsGame::with_seed(1, preset);
            let pairs = preset.pairs();
            assert_eq!(game.cards().len(), pairs * 2);
            for value in 1..=pairs as u8 {
                let count = game.cards().iter().filter(|c| c.value == value).count();
                assert_eq!(count, 2, "value {value}");
            }
        }
    }

    #[test]
    fn matching_pair_stays_face_up() {
        let mut game = CardsGame::with_seed(2, PairCount::Casual);
        let (a, b) = find_pair(&game);

        assert!(game.flip(a));
        assert!(game.flip(b));
        assert!(game.locked());
        assert_eq!(game.moves(), 1);

        game.tick(MATCH_DELAY_MS);

        assert!(game.cards()[a].matched);
        assert!(game.cards()[b].matched);
        assert!(!game.locked());
    }

    #[test]
    fn mismatched_pair_flips_back_down() {
        let mut game = CardsGame::with_seed(3, PairCount::Casual);
        let (a, b) = find_mismatch(&game);

        assert!(game.flip(a));
        assert!(game.flip(b));
        assert_eq!(game.moves(), 1);

        // Not resolved at the (shorter) match delay.
        game.tick(MATCH_DELAY_MS);
        assert!(game.locked());

        game.tick(MISMATCH_DELAY_MS - MATCH_DELAY_MS);

        assert!(!game.cards()[a].flipped);
        assert!(!game.cards()[b].flipped);
        assert!(!game.cards()[a].matched);
        assert!(!game.locked());
    }

    #[test]
    fn third_flip_is_rejected_while_pending() {
        let mut game = CardsGame::with_seed(4, PairCount::Casual);
        let (a, b) = find_mismatch(&game);
        let other = (0..game.cards().len()).find(|&i| i != a && i != b).unwrap();

        game.flip(a);
        game.flip(b);

        assert!(!game.flip(other));
        assert!(!game.cards()[other].flipped);
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn refused_flips_leave_the_deck_unchanged() {
        let mut game = CardsGame::with_seed(5, PairCount::Casual);
        let (a, _) = find_pair(&game);

        assert!(game.flip(a));
        // Same card again.
        assert!(!game.flip(a));
        // Out of range.
        assert!(!game.flip(999));
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn matching_every_pair_wins_and_stops_the_clock() {
        let mut game = CardsGame::with_seed(6, PairCount::Casual);
        while game.status() == CardsStatus::Running {
            let cards = game.cards().to_vec();
            let next = cards
                .iter()
                .find(|c| !c.matched)
                .map(|c| (c.id, c.value))
                .unwrap();
            let partner = cards
                .iter()
                .find(|c| c.id != next.0 && c.value == next.1)
                .unwrap()
                .id;
            assert!(game.flip(next.0));
            assert!(game.flip(partner));
            game.tick(MATCH_DELAY_MS);
        }

        assert_eq!(game.status(), CardsStatus::Won);
        let elapsed = game.elapsed_ms();
        game.tick(5_000);
        assert_eq!(game.elapsed_ms(), elapsed);
    }

    #[test]
    fn move_counter_increments_once_per_pair() {
        let mut game = CardsGame::with_seed(7, PairCount::Casual);
        let (a, b) = find_mismatch(&game);

        game.flip(a);
        assert_eq!(game.moves(), 0);
        game.flip(b);
        assert_eq!(game.moves(), 1);
        game.tick(MISMATCH_DELAY_MS);
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn preset_change_reshuffles_from_scratch() {
        let mut game = CardsGame::with_seed(8, PairCount::Casual);
        let (a, b) = find_pair(&game);
        game.flip(a);
        game.flip(b);
        game.tick(MATCH_DELAY_MS);
        assert!(game.moves() > 0);

        game.reset(PairCount::Expert);

        assert_eq!(game.pair_count(), PairCount::Expert);
        assert_eq!(game.cards().len(), PairCount::Expert.pairs() * 2);
        assert_eq!(game.moves(), 0);
        assert_eq!(game.elapsed_ms(), 0);
        assert!(game.cards().iter().all(|c| !c.flipped && !c.matched));
    }
}
