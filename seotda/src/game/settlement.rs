//! Round settlement: winner selection and pot distribution.
//!
//! Settlement consumes a terminated round, credits the pot to the
//! winner(s), and produces a report the room broadcasts and retains
//! for late result queries. Chip conservation holds exactly: the pot
//! is distributed in full, with any split remainder going to the first
//! tied player in seat order.

use log::{info, warn};
use serde::Serialize;

use super::entities::{Chips, PlayerId, PlayerStatus};
use super::hand::{self, HandRank};
use super::round::{RoundEnd, RoundEngine, RoundPhase};

/// How the round resolved.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    LastManStanding,
    Showdown,
    Tie,
}

/// One player's line in the settlement report.
#[derive(Clone, Debug, Serialize)]
pub struct PlayerResult {
    pub id: PlayerId,
    pub name: String,
    /// Final chip count after distribution.
    pub chips: Chips,
    pub status: PlayerStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand_rank: Option<HandRank>,
    pub winnings: Chips,
}

/// Outcome of a settled round.
#[derive(Clone, Debug, Serialize)]
pub struct SettlementReport {
    pub reason: EndReason,
    /// Winning player ids in seat order. Empty only when every
    /// contender dropped before settlement.
    pub winners: Vec<PlayerId>,
    /// The pot that was distributed.
    pub pot: Chips,
    /// Per-winner share; the full pot for a single winner.
    pub share: Chips,
    /// Leftover chips from an uneven split, awarded to `winners[0]`.
    pub remainder: Chips,
    pub results: Vec<PlayerResult>,
}

/// Settle a terminated round: pick the winner(s), move the pot into
/// their round stacks, and zero it. The caller reconciles the round
/// stacks back into the seats afterwards.
pub fn settle(engine: &mut RoundEngine, end: &RoundEnd) -> SettlementReport {
    let pot = engine.pot;
    let mut winnings: Vec<Chips> = vec![0; engine.players.len()];
    let mut ranks: Vec<Option<HandRank>> = vec![None; engine.players.len()];

    let (reason, winner_indices) = match end {
        RoundEnd::LastManStanding { winner } => {
            let indices = match winner {
                Some(id) => engine
                    .players
                    .iter()
                    .position(|p| p.id == *id)
                    .into_iter()
                    .collect(),
                None => Vec::new(),
            };
            // ranked for display only; the hand stays unrevealed
            if let Some(&idx) = indices.first() {
                ranks[idx] = Some(hand::rank(&engine.players[idx].hand));
            }
            (EndReason::LastManStanding, indices)
        }
        RoundEnd::Showdown => {
            let contenders: Vec<usize> = engine
                .players
                .iter()
                .enumerate()
                .filter(|(_, p)| p.is_survivor())
                .map(|(i, _)| i)
                .collect();
            let mut contender_ranks = Vec::with_capacity(contenders.len());
            for &idx in &contenders {
                let rank = hand::rank(&engine.players[idx].hand);
                ranks[idx] = Some(rank);
                contender_ranks.push(rank);
            }
            let winners: Vec<usize> = hand::select_winners(&contender_ranks)
                .into_iter()
                .map(|i| contenders[i])
                .collect();
            let reason = if winners.len() > 1 {
                EndReason::Tie
            } else {
                EndReason::Showdown
            };
            (reason, winners)
        }
    };

    let (share, remainder) = if winner_indices.is_empty() {
        warn!(
            "round {}: no contender left at settlement, pot of {} forfeited",
            engine.round_number, pot
        );
        (0, 0)
    } else {
        let share = pot / winner_indices.len() as Chips;
        let remainder = pot - share * winner_indices.len() as Chips;
        for (order, &idx) in winner_indices.iter().enumerate() {
            let amount = share + if order == 0 { remainder } else { 0 };
            engine.players[idx].chips += amount;
            winnings[idx] = amount;
        }
        (share, remainder)
    };

    engine.pot = 0;
    engine.phase = RoundPhase::Ended;

    let winners: Vec<PlayerId> = winner_indices
        .iter()
        .map(|&i| engine.players[i].id)
        .collect();
    let results: Vec<PlayerResult> = engine
        .players
        .iter()
        .enumerate()
        .map(|(i, p)| PlayerResult {
            id: p.id,
            name: p.name.clone(),
            chips: p.chips,
            status: p.status,
            hand_rank: ranks[i],
            winnings: winnings[i],
        })
        .collect();

    info!(
        "round {} settled: {:?}, pot {}, winners {:?}",
        engine.round_number, reason, pot, winners
    );

    SettlementReport {
        reason,
        winners,
        pot,
        share,
        remainder,
        results,
    }
}
