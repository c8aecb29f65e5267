//! # Seotda
//!
//! An engine for seotda, the Korean two-card gambling game, built for
//! multi-round sessions behind a real-time gateway.
//!
//! ## Architecture
//!
//! The crate is split into a synchronous game core and an async room
//! layer:
//!
//! - **Deck & hand ranking**: a fixed 20-card deck and a pure
//!   evaluator with tiered hands plus rule-driven special hands.
//! - **Round engine**: a betting state machine covering the deal, the
//!   ante, turn rotation, raise semantics, and termination (showdown
//!   or last man standing).
//! - **Settlement**: winner selection, exact pot distribution with
//!   deterministic tie remainders, and the single write path from
//!   round chips back to seat chips.
//! - **Rooms**: one actor task per room serializes every mutation;
//!   a registry spawns actors and routes requests, and a cancellable
//!   single-shot timer drives automatic round progression.
//!
//! ## Example
//!
//! ```
//! use seotda::game::entities::SeatedPlayer;
//! use seotda::game::round::RoundEngine;
//! use uuid::Uuid;
//!
//! let seats = vec![
//!     SeatedPlayer::new(Uuid::new_v4(), "alice".into(), 10_000, false),
//!     SeatedPlayer::new(Uuid::new_v4(), "bob".into(), 10_000, false),
//! ];
//! let round = RoundEngine::new(&seats, 1_000, 1);
//! assert_eq!(round.pot, 2_000);
//! ```

/// Core game logic: deck, ranking, betting rounds, settlement.
pub mod game;
pub use game::{
    constants,
    entities::{self, BetAction, Card, CardKind, Chips, PlayerId, PlayerStatus, SeatedPlayer},
    hand,
    round::{ActionError, RoundEngine, RoundEnd, RoundPhase, TurnOutcome},
    settlement,
};

/// Room layer: sessions, per-room actors, and the registry.
pub mod room;
pub use room::{
    GameRoom, RoomConfig, RoomConfigError, RoomError, RoomHandle, RoomId, RoomManager, RoomMessage,
    RoomNotification, RoomView,
};
