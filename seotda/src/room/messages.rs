//! Room actor message types.

use tokio::sync::{mpsc, oneshot};

use super::session::{RoomError, RoomView};
use crate::game::entities::{BetAction, PlayerId};
use crate::game::round::ActionError;
use serde::Serialize;

/// Messages a [`super::RoomActor`] accepts through its inbox. All room
/// mutations flow through here, one at a time, in arrival order.
#[derive(Debug)]
pub enum RoomMessage {
    /// Seat a player (or admit a spectator mid-round). Replies with
    /// whether the seat is a spectator seat.
    Join {
        player_id: PlayerId,
        name: String,
        response: oneshot::Sender<Result<bool, RoomError>>,
    },

    /// Start the next round on the host's request.
    StartRound {
        player_id: PlayerId,
        response: oneshot::Sender<Result<(), RoomError>>,
    },

    /// A betting action from the player on turn.
    TakeAction {
        player_id: PlayerId,
        action: BetAction,
        response: oneshot::Sender<Result<(), ActionError>>,
    },

    /// Fetch the redacted view for one viewer.
    GetView {
        player_id: Option<PlayerId>,
        response: oneshot::Sender<RoomView>,
    },

    /// A player's connection went away. Replies with `true` when the
    /// room emptied and closed.
    Disconnect {
        player_id: PlayerId,
        response: oneshot::Sender<bool>,
    },

    /// Subscribe to state change notifications.
    Subscribe {
        player_id: PlayerId,
        sender: mpsc::Sender<RoomNotification>,
    },

    /// Unsubscribe from state change notifications.
    Unsubscribe { player_id: PlayerId },

    /// Internal: the armed next-round timer fired.
    NextRoundTimer,
}

/// Notifications pushed to subscribers. These are deliberately thin:
/// on receipt a client fetches its own redacted view, so no private
/// data ever travels through a shared channel.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomNotification {
    /// Something about the live round changed.
    StateChanged,
    /// A seat was added or removed.
    PlayerListChanged,
    /// A new round was dealt.
    RoundStarted { round_number: u32 },
    /// The round settled; the view now carries the result.
    RoundEnded,
    /// The next round starts automatically after this many seconds.
    NextRoundCountdown { seconds: u64 },
    /// The receiving player busted out and was removed from the room.
    Evicted,
}
