use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The three card kinds of the 20-card hwatu subset. `Kwang` cards make
/// up the top-tier hands; `Yeol` and `Pi` matter for several of the
/// special hands.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Kwang,
    Yeol,
    Pi,
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Kwang => "kwang",
            Self::Yeol => "yeol",
            Self::Pi => "pi",
        };
        write!(f, "{repr}")
    }
}

/// Card months run 1 through 10.
pub type Month = u8;

/// A single hwatu card: a month paired with a kind.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Card {
    pub month: Month,
    pub kind: CardKind,
}

impl Card {
    #[must_use]
    pub const fn new(month: Month, kind: CardKind) -> Self {
        Self { month, kind }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.month, self.kind)
    }
}

/// The fixed deck composition: two cards per month, with kwang on
/// months 1, 3, and 8. Month 8 is the only month pairing a kwang with
/// a yeol; every other month carries a pi as its second card.
const DECK_LAYOUT: [Card; 20] = [
    Card::new(1, CardKind::Kwang),
    Card::new(1, CardKind::Pi),
    Card::new(2, CardKind::Yeol),
    Card::new(2, CardKind::Pi),
    Card::new(3, CardKind::Kwang),
    Card::new(3, CardKind::Pi),
    Card::new(4, CardKind::Yeol),
    Card::new(4, CardKind::Pi),
    Card::new(5, CardKind::Yeol),
    Card::new(5, CardKind::Pi),
    Card::new(6, CardKind::Yeol),
    Card::new(6, CardKind::Pi),
    Card::new(7, CardKind::Yeol),
    Card::new(7, CardKind::Pi),
    Card::new(8, CardKind::Kwang),
    Card::new(8, CardKind::Yeol),
    Card::new(9, CardKind::Yeol),
    Card::new(9, CardKind::Pi),
    Card::new(10, CardKind::Yeol),
    Card::new(10, CardKind::Pi),
];

/// The 20-card deck. The composition never changes; rounds only
/// reshuffle and re-deal from it.
#[derive(Debug)]
pub struct Deck {
    cards: [Card; 20],
    deck_idx: usize,
}

impl Default for Deck {
    fn default() -> Self {
        Self {
            cards: DECK_LAYOUT,
            deck_idx: 0,
        }
    }
}

impl Deck {
    pub fn deal_card(&mut self) -> Card {
        let card = self.cards[self.deck_idx];
        self.deck_idx += 1;
        card
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len() - self.deck_idx
    }

    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut rand::rng());
        self.deck_idx = 0;
    }
}

/// Type alias for chip amounts. Stacks, bets, and pots are all whole
/// chips; a u32 comfortably covers a five-seat table.
pub type Chips = u32;

/// Type alias for player identity, assigned per connection by the
/// gateway.
pub type PlayerId = Uuid;

/// A seat in a room. Survives across rounds; chips here are the
/// session truth and are only rewritten when a round settles.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SeatedPlayer {
    pub id: PlayerId,
    pub name: String,
    pub chips: Chips,
    pub is_spectator: bool,
}

impl SeatedPlayer {
    #[must_use]
    pub fn new(id: PlayerId, name: String, chips: Chips, is_spectator: bool) -> Self {
        Self {
            id,
            name,
            chips,
            is_spectator,
        }
    }
}

/// Status of a player within a single round.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Active,
    Die,
    AllIn,
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Active => "active",
            Self::Die => "die",
            Self::AllIn => "all-in",
        };
        write!(f, "{repr}")
    }
}

/// Betting actions a player on turn may take.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BetAction {
    /// Fold out of the round.
    Die,
    /// Match the current bet.
    Call,
    /// Call, then raise by half the pot.
    Half,
    /// Call, then raise by the current bet (a double).
    Ddadang,
    /// Push the whole remaining stack.
    AllIn,
}

impl fmt::Display for BetAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Die => "dies",
            Self::Call => "calls",
            Self::Half => "raises half the pot",
            Self::Ddadang => "raises ddadang",
            Self::AllIn => "goes all-in",
        };
        write!(f, "{repr}")
    }
}

/// A player's round-scoped record. `chips` is a working copy taken from
/// the seat at round start; settlement writes it back when the round
/// ends.
#[derive(Clone, Debug)]
pub struct RoundPlayer {
    pub id: PlayerId,
    pub name: String,
    pub chips: Chips,
    pub hand: [Card; 2],
    pub status: PlayerStatus,
    /// Cumulative chips this player has put into the pot this round.
    pub bet_amount: Chips,
    /// Whether the player has acted since the last raise.
    pub acted_this_round: bool,
    pub disconnected: bool,
}

impl RoundPlayer {
    /// Still in contention for the pot.
    #[must_use]
    pub fn is_survivor(&self) -> bool {
        self.status != PlayerStatus::Die && !self.disconnected
    }

    /// Able to take a betting action.
    #[must_use]
    pub fn can_bet(&self) -> bool {
        self.status == PlayerStatus::Active && !self.disconnected
    }
}
