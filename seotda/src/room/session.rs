//! The room session: seats, host, and the round lifecycle.
//!
//! A [`GameRoom`] holds the state that outlives individual rounds.
//! Seat chips are the session truth; a live round works on copies, and
//! [`GameRoom::finish_round`] is the single place where round results
//! are written back.

use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use super::config::RoomConfig;
use crate::game::entities::{BetAction, Chips, PlayerId, SeatedPlayer};
use crate::game::round::{ActionError, RoundEngine, RoundEnd, RoundView, TurnOutcome};
use crate::game::settlement::{self, SettlementReport};

/// Room identity: a short numeric code players type to join.
pub type RoomId = String;

/// Validation failures for room-level requests. None of these change
/// any state; they go back to the single requester.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum RoomError {
    #[error("room not found")]
    NotFound,
    #[error("room is full")]
    RoomFull,
    #[error("already joined")]
    AlreadyJoined,
    #[error("only the host can start a round")]
    NotHost,
    #[error("a round is already in progress")]
    RoundInProgress,
    #[error("need at least 2 players with chips")]
    NotEnoughPlayers,
    #[error("room is closed")]
    Closed,
}

/// One multi-round session.
#[derive(Debug)]
pub struct GameRoom {
    pub room_id: RoomId,
    pub host_id: PlayerId,
    pub config: RoomConfig,
    pub seats: Vec<SeatedPlayer>,
    /// The live round while `started`, and the last finished round
    /// afterwards, kept read-only for late result queries until the
    /// next round replaces it.
    pub round: Option<RoundEngine>,
    pub started: bool,
    pub round_number: u32,
    /// Winner of the previous round; acts first next round.
    pub last_winner_id: Option<PlayerId>,
    pub last_result: Option<SettlementReport>,
}

impl GameRoom {
    /// Open a room and seat the host.
    #[must_use]
    pub fn new(room_id: RoomId, host_id: PlayerId, host_name: String, config: RoomConfig) -> Self {
        let host = SeatedPlayer::new(host_id, host_name, config.start_chips, false);
        Self {
            room_id,
            host_id,
            config,
            seats: vec![host],
            round: None,
            started: false,
            round_number: 0,
            last_winner_id: None,
            last_result: None,
        }
    }

    /// Seat a joining player. While a round is live the seat is a
    /// spectator until the next round starts.
    ///
    /// # Errors
    ///
    /// Rejects when the room is full or the player already holds a
    /// seat.
    pub fn add_player(&mut self, id: PlayerId, name: String) -> Result<bool, RoomError> {
        if self.seats.len() >= self.config.max_players {
            return Err(RoomError::RoomFull);
        }
        if self.seats.iter().any(|s| s.id == id) {
            return Err(RoomError::AlreadyJoined);
        }

        let is_spectator = self.started;
        self.seats.push(SeatedPlayer::new(
            id,
            name,
            self.config.start_chips,
            is_spectator,
        ));
        Ok(is_spectator)
    }

    /// Drop a departing player's seat. If a round is live, their round
    /// record folds and, when it held the turn, the turn advances; the
    /// returned outcome is `Some` in that case so the caller can react
    /// to a round ending.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Option<TurnOutcome> {
        self.seats.retain(|s| s.id != player_id);

        if player_id == self.host_id
            && let Some(first) = self.seats.first()
        {
            self.host_id = first.id;
        }

        if self.started
            && let Some(engine) = self.round.as_mut()
        {
            return engine.mark_disconnected(player_id);
        }
        None
    }

    /// Start the next round. Spectators are promoted first; seats with
    /// no chips sit the round out (they are normally evicted before
    /// this can happen). The previous winner deals, i.e. acts first.
    ///
    /// # Errors
    ///
    /// Rejects non-host requesters (when a requester is given), a
    /// round already in progress, and a table with fewer than two
    /// funded seats. Nothing changes on rejection.
    pub fn start_round(&mut self, requester: Option<PlayerId>) -> Result<(), RoomError> {
        if let Some(id) = requester
            && id != self.host_id
        {
            return Err(RoomError::NotHost);
        }
        if self.started {
            return Err(RoomError::RoundInProgress);
        }
        if self.seats.iter().filter(|s| s.chips > 0).count() < 2 {
            return Err(RoomError::NotEnoughPlayers);
        }

        for seat in &mut self.seats {
            seat.is_spectator = false;
        }

        let mut entrants: Vec<SeatedPlayer> = self
            .seats
            .iter()
            .filter(|s| s.chips > 0)
            .cloned()
            .collect();

        if let Some(winner) = self.last_winner_id
            && let Some(pos) = entrants.iter().position(|s| s.id == winner)
            && pos > 0
        {
            let dealer = entrants.remove(pos);
            entrants.insert(0, dealer);
        }

        self.round_number += 1;
        self.round = Some(RoundEngine::new(
            &entrants,
            self.config.ante,
            self.round_number,
        ));
        self.started = true;

        info!(
            "room {}: round {} started with {} players",
            self.room_id,
            self.round_number,
            entrants.len()
        );
        Ok(())
    }

    /// Forward a betting action to the live round.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionError`] from the round engine, or
    /// `NotBettingPhase` when no round is live at all.
    pub fn apply_action(
        &mut self,
        player_id: PlayerId,
        action: BetAction,
    ) -> Result<TurnOutcome, ActionError> {
        if !self.started {
            return Err(ActionError::NotBettingPhase);
        }
        let engine = self.round.as_mut().ok_or(ActionError::NotBettingPhase)?;
        engine.apply_action(player_id, action)
    }

    /// Settle the finished round, write the round stacks back into the
    /// seats, evict bankrupt seats, and hand the host seat on when it
    /// was evicted. Returns the settlement report plus the evicted
    /// seats; `None` when no round exists to settle.
    pub fn finish_round(&mut self, end: &RoundEnd) -> Option<(SettlementReport, Vec<SeatedPlayer>)> {
        let Some(engine) = self.round.as_mut() else {
            warn!("room {}: finish_round without a round", self.room_id);
            return None;
        };

        let report = settlement::settle(engine, end);

        // the single write path from round chips to session chips
        for round_player in &engine.players {
            if let Some(seat) = self.seats.iter_mut().find(|s| s.id == round_player.id) {
                seat.chips = round_player.chips;
            }
        }

        if let Some(&winner) = report.winners.first() {
            self.last_winner_id = Some(winner);
        }
        self.started = false;

        let evicted: Vec<SeatedPlayer> = self
            .seats
            .iter()
            .filter(|s| s.chips == 0)
            .cloned()
            .collect();
        self.seats.retain(|s| s.chips > 0);
        for seat in &evicted {
            info!("room {}: {} busted out", self.room_id, seat.name);
        }

        if !self.seats.iter().any(|s| s.id == self.host_id)
            && let Some(first) = self.seats.first()
        {
            self.host_id = first.id;
        }

        self.last_result = Some(report.clone());
        Some((report, evicted))
    }

    /// Seats that could enter the next round right now.
    #[must_use]
    pub fn eligible_count(&self) -> usize {
        self.seats.iter().filter(|s| s.chips > 0).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Build the redacted view for one viewer (or a pure spectator
    /// when `None`).
    #[must_use]
    pub fn view_for(&self, viewer: Option<PlayerId>) -> RoomView {
        RoomView {
            room_id: self.room_id.clone(),
            host_id: self.host_id,
            ante: self.config.ante,
            max_players: self.config.max_players,
            round_number: self.round_number,
            started: self.started,
            seats: self
                .seats
                .iter()
                .map(|s| SeatView {
                    id: s.id,
                    name: s.name.clone(),
                    chips: s.chips,
                    is_spectator: s.is_spectator,
                    is_host: s.id == self.host_id,
                })
                .collect(),
            round: self.round.as_ref().map(|engine| engine.view_for(viewer)),
            last_result: self.last_result.clone(),
        }
    }
}

/// A seat as shown to clients.
#[derive(Clone, Debug, Serialize)]
pub struct SeatView {
    pub id: PlayerId,
    pub name: String,
    pub chips: Chips,
    pub is_spectator: bool,
    pub is_host: bool,
}

/// Redacted per-viewer snapshot of the whole room.
#[derive(Clone, Debug, Serialize)]
pub struct RoomView {
    pub room_id: RoomId,
    pub host_id: PlayerId,
    pub ante: Chips,
    pub max_players: usize,
    pub round_number: u32,
    pub started: bool,
    pub seats: Vec<SeatView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<RoundView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_result: Option<SettlementReport>,
}
