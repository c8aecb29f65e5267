//! The betting round engine.
//!
//! One [`RoundEngine`] owns a single round from deal to termination:
//! it deals two cards to every entrant, collects the ante, rotates the
//! turn, and applies betting actions until either one survivor remains
//! or betting is exhausted and the round goes to showdown. Chip
//! mutations in here are working copies; settlement writes them back
//! into the seats when the round ends.

use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use super::entities::{
    BetAction, Card, Chips, Deck, PlayerId, PlayerStatus, RoundPlayer, SeatedPlayer,
};
use super::hand::{self, HandRank};

/// Phases of a round. Dealing happens inside construction, so an
/// engine observable from outside is always in `Betting` or later.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundPhase {
    Dealing,
    Betting,
    Showdown,
    Ended,
}

/// Rejected actions. Each leaves the round completely untouched.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ActionError {
    #[error("not your turn")]
    NotYourTurn,
    #[error("already folded")]
    AlreadyFolded,
    #[error("not in the betting phase")]
    NotBettingPhase,
}

/// How a round terminated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RoundEnd {
    /// Everyone else folded or dropped; the survivor (if any) takes the
    /// pot without a showdown.
    LastManStanding { winner: Option<PlayerId> },
    /// Betting is exhausted; remaining hands are revealed and ranked.
    Showdown,
}

/// Result of applying an action or advancing the turn.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TurnOutcome {
    Continue,
    Ended(RoundEnd),
}

/// State machine for one round of betting.
#[derive(Debug)]
pub struct RoundEngine {
    pub players: Vec<RoundPlayer>,
    pub current_player_index: usize,
    pub pot: Chips,
    /// Highest cumulative single-player bet this round.
    pub current_bet: Chips,
    pub phase: RoundPhase,
    pub last_raiser_index: Option<usize>,
    pub round_number: u32,
    pub ante: Chips,
    turn_count: u32,
}

impl RoundEngine {
    /// Deal a new round for the given entrants, in seat order, and
    /// collect the ante. Short stacks pay what they have; the table
    /// bet is the full ante regardless.
    #[must_use]
    pub fn new(entrants: &[SeatedPlayer], ante: Chips, round_number: u32) -> Self {
        let mut deck = Deck::default();
        deck.shuffle();

        let mut players: Vec<RoundPlayer> = entrants
            .iter()
            .map(|seat| RoundPlayer {
                id: seat.id,
                name: seat.name.clone(),
                chips: seat.chips,
                hand: [deck.deal_card(), deck.deal_card()],
                status: PlayerStatus::Active,
                bet_amount: 0,
                acted_this_round: false,
                disconnected: false,
            })
            .collect();

        let mut pot = 0;
        for player in &mut players {
            let amount = ante.min(player.chips);
            player.chips -= amount;
            player.bet_amount = amount;
            pot += amount;
        }

        let engine = Self {
            players,
            current_player_index: 0,
            pot,
            current_bet: ante,
            phase: RoundPhase::Betting,
            last_raiser_index: None,
            round_number,
            ante,
            turn_count: 0,
        };
        engine.debug_check_pot();
        engine
    }

    /// The player whose turn it is, while the round is live.
    #[must_use]
    pub fn current_player(&self) -> Option<&RoundPlayer> {
        if self.phase == RoundPhase::Betting {
            self.players.get(self.current_player_index)
        } else {
            None
        }
    }

    /// Apply a betting action for `player_id` and advance the turn.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] without touching any state when the
    /// action is out of turn, comes from a folded player, or arrives
    /// outside the betting phase.
    pub fn apply_action(
        &mut self,
        player_id: PlayerId,
        action: BetAction,
    ) -> Result<TurnOutcome, ActionError> {
        let idx = self.current_player_index;
        let player = self
            .players
            .get(idx)
            .filter(|p| p.id == player_id)
            .ok_or(ActionError::NotYourTurn)?;
        if player.status == PlayerStatus::Die {
            return Err(ActionError::AlreadyFolded);
        }
        if self.phase != RoundPhase::Betting {
            return Err(ActionError::NotBettingPhase);
        }

        let to_call = self.current_bet - player.bet_amount;
        let prev_bet = self.current_bet;

        match action {
            BetAction::Die => {
                self.players[idx].status = PlayerStatus::Die;
            }
            BetAction::Call => {
                if to_call > 0 && self.players[idx].chips <= to_call {
                    self.put_all_in(idx);
                } else {
                    self.put_chips(idx, to_call);
                }
            }
            BetAction::Half => {
                let raise = self.pot / 2;
                let total = to_call + raise;
                if self.players[idx].chips <= total {
                    self.put_all_in(idx);
                } else {
                    self.put_chips(idx, total);
                    self.current_bet = self.players[idx].bet_amount;
                    self.last_raiser_index = Some(idx);
                }
            }
            BetAction::Ddadang => {
                let raise = self.current_bet;
                let total = to_call + raise;
                if self.players[idx].chips <= total {
                    self.put_all_in(idx);
                } else {
                    self.put_chips(idx, total);
                    self.current_bet = self.players[idx].bet_amount;
                    self.last_raiser_index = Some(idx);
                }
            }
            BetAction::AllIn => {
                self.put_all_in(idx);
                if self.players[idx].bet_amount > self.current_bet {
                    self.current_bet = self.players[idx].bet_amount;
                    self.last_raiser_index = Some(idx);
                }
            }
        }

        // Half and ddadang reopen betting even when the raiser came up
        // short; a plain all-in only reopens when it actually raised.
        let is_raise = matches!(action, BetAction::Half | BetAction::Ddadang)
            || (action == BetAction::AllIn && self.players[idx].bet_amount > prev_bet);
        if is_raise {
            for player in &mut self.players {
                player.acted_this_round = false;
            }
        }
        self.players[idx].acted_this_round = true;
        self.turn_count += 1;

        debug!(
            "round {} turn {}: {} {} (bet {}, table bet {} -> {}, pot {})",
            self.round_number,
            self.turn_count,
            self.players[idx].name,
            action,
            self.players[idx].bet_amount,
            prev_bet,
            self.current_bet,
            self.pot,
        );
        self.debug_check_pot();

        Ok(self.advance_turn())
    }

    /// Move the turn to the next eligible player, or terminate the
    /// round. Safe to call repeatedly: once every eligible player has
    /// acted this lands in showdown without moving the turn marker.
    pub fn advance_turn(&mut self) -> TurnOutcome {
        let survivors: Vec<usize> = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_survivor())
            .map(|(i, _)| i)
            .collect();

        if survivors.len() <= 1 {
            self.phase = RoundPhase::Ended;
            let winner = survivors.first().map(|&i| self.players[i].id);
            return TurnOutcome::Ended(RoundEnd::LastManStanding { winner });
        }

        // Nobody left who can bet: everyone surviving is all-in.
        if !self.players.iter().any(RoundPlayer::can_bet) {
            self.phase = RoundPhase::Showdown;
            debug!("round {}: showdown, no bettable players", self.round_number);
            return TurnOutcome::Ended(RoundEnd::Showdown);
        }

        if self
            .players
            .iter()
            .filter(|p| p.can_bet())
            .all(|p| p.acted_this_round)
        {
            self.phase = RoundPhase::Showdown;
            debug!("round {}: showdown, all players acted", self.round_number);
            return TurnOutcome::Ended(RoundEnd::Showdown);
        }

        let count = self.players.len();
        let mut next = (self.current_player_index + 1) % count;
        let mut attempts = 0;
        while attempts < count {
            let player = &self.players[next];
            if player.can_bet() && !player.acted_this_round {
                break;
            }
            next = (next + 1) % count;
            attempts += 1;
        }

        if attempts >= count {
            // The checks above should have caught this; terminate the
            // round instead of stalling it.
            warn!(
                "round {}: turn scan found no eligible player, forcing showdown",
                self.round_number
            );
            self.phase = RoundPhase::Showdown;
            return TurnOutcome::Ended(RoundEnd::Showdown);
        }

        self.current_player_index = next;
        TurnOutcome::Continue
    }

    /// Fold a departing player out of the round. When it was their
    /// turn, the turn advances immediately so the round cannot stall.
    pub fn mark_disconnected(&mut self, player_id: PlayerId) -> Option<TurnOutcome> {
        let idx = self.players.iter().position(|p| p.id == player_id)?;
        self.players[idx].status = PlayerStatus::Die;
        self.players[idx].disconnected = true;

        if idx == self.current_player_index && self.phase == RoundPhase::Betting {
            Some(self.advance_turn())
        } else {
            None
        }
    }

    /// View of this round for one viewer. Hands stay hidden except the
    /// viewer's own until showdown, where every surviving hand is
    /// revealed together with its rank.
    #[must_use]
    pub fn view_for(&self, viewer: Option<PlayerId>) -> RoundView {
        let reveal_all = matches!(self.phase, RoundPhase::Showdown | RoundPhase::Ended);
        let current_id = self.current_player().map(|p| p.id);

        let players = self
            .players
            .iter()
            .map(|p| {
                let visible = viewer == Some(p.id) || (reveal_all && p.is_survivor());
                RoundPlayerView {
                    id: p.id,
                    name: p.name.clone(),
                    chips: p.chips,
                    bet_amount: p.bet_amount,
                    status: p.status,
                    is_current_turn: current_id == Some(p.id),
                    hand: visible.then_some(p.hand),
                    hand_rank: visible.then(|| hand::rank(&p.hand)),
                }
            })
            .collect();

        RoundView {
            pot: self.pot,
            current_bet: self.current_bet,
            phase: self.phase,
            round_number: self.round_number,
            current_player_id: current_id,
            players,
        }
    }

    fn put_chips(&mut self, idx: usize, amount: Chips) {
        let player = &mut self.players[idx];
        player.chips -= amount;
        player.bet_amount += amount;
        self.pot += amount;
    }

    fn put_all_in(&mut self, idx: usize) {
        let player = &mut self.players[idx];
        let amount = player.chips;
        player.chips = 0;
        player.bet_amount += amount;
        player.status = PlayerStatus::AllIn;
        self.pot += amount;
    }

    fn debug_check_pot(&self) {
        debug_assert_eq!(
            self.pot,
            self.players.iter().map(|p| p.bet_amount).sum::<Chips>(),
            "pot out of sync with player bets"
        );
    }
}

/// Redacted per-viewer snapshot of a round.
#[derive(Clone, Debug, Serialize)]
pub struct RoundView {
    pub pot: Chips,
    pub current_bet: Chips,
    pub phase: RoundPhase,
    pub round_number: u32,
    pub current_player_id: Option<PlayerId>,
    pub players: Vec<RoundPlayerView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoundPlayerView {
    pub id: PlayerId,
    pub name: String,
    pub chips: Chips,
    pub bet_amount: Chips,
    pub status: PlayerStatus,
    pub is_current_turn: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand: Option<[Card; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand_rank: Option<HandRank>,
}
