//! Room actor: one task per room, all mutations serialized.
//!
//! Each room runs as a single tokio task that owns its [`GameRoom`]
//! outright. Requests arrive through an mpsc inbox and are applied one
//! at a time in arrival order, so no mutation ever observes another
//! one in flight. The delayed next-round trigger is a separate sleep
//! task that posts back into the same inbox, which keeps the timer on
//! the same serialized path as everything else.

use log::{info, warn};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::messages::{RoomMessage, RoomNotification};
use super::session::{GameRoom, RoomError, RoomId};
use crate::game::entities::PlayerId;
use crate::game::round::{RoundEnd, TurnOutcome};

const INBOX_CAPACITY: usize = 64;
const NOTIFY_CAPACITY: usize = 32;

/// Cloneable handle for sending messages to a room actor.
#[derive(Clone)]
pub struct RoomHandle {
    sender: mpsc::Sender<RoomMessage>,
    room_id: RoomId,
}

impl RoomHandle {
    #[must_use]
    pub fn new(sender: mpsc::Sender<RoomMessage>, room_id: RoomId) -> Self {
        Self { sender, room_id }
    }

    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Send a message to the room.
    ///
    /// # Errors
    ///
    /// Fails with [`RoomError::Closed`] when the actor has shut down.
    pub async fn send(&self, message: RoomMessage) -> Result<(), RoomError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| RoomError::Closed)
    }
}

/// The actor owning one [`GameRoom`].
pub struct RoomActor {
    room: GameRoom,
    inbox: mpsc::Receiver<RoomMessage>,
    /// Sender into our own inbox, handed to the timer task.
    self_sender: mpsc::Sender<RoomMessage>,
    subscribers: HashMap<PlayerId, mpsc::Sender<RoomNotification>>,
    /// At most one pending next-round trigger exists at a time.
    pending_timer: Option<JoinHandle<()>>,
    closed: bool,
}

impl RoomActor {
    /// Wrap a room in an actor and hand back the sending side.
    #[must_use]
    pub fn new(room: GameRoom) -> (Self, RoomHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let handle = RoomHandle::new(sender.clone(), room.room_id.clone());
        let actor = Self {
            room,
            inbox,
            self_sender: sender,
            subscribers: HashMap::new(),
            pending_timer: None,
            closed: false,
        };
        (actor, handle)
    }

    /// Run the actor event loop until the room empties.
    pub async fn run(mut self) {
        info!("room {} opened", self.room.room_id);

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);
            if self.closed {
                break;
            }
        }

        self.disarm_timer();
        info!("room {} closed", self.room.room_id);
    }

    fn handle_message(&mut self, message: RoomMessage) {
        match message {
            RoomMessage::Join {
                player_id,
                name,
                response,
            } => {
                let result = self.room.add_player(player_id, name);
                if result.is_ok() {
                    self.notify(RoomNotification::PlayerListChanged);
                    // a join can restore quorum between rounds
                    if !self.room.started && self.room.round_number > 0 {
                        let funded_active = self
                            .room
                            .seats
                            .iter()
                            .filter(|s| s.chips > 0 && !s.is_spectator)
                            .count();
                        if funded_active >= 2 {
                            self.arm_next_round_timer();
                        }
                    }
                }
                let _ = response.send(result);
            }

            RoomMessage::StartRound {
                player_id,
                response,
            } => {
                let result = self.room.start_round(Some(player_id));
                if result.is_ok() {
                    self.disarm_timer();
                    self.notify(RoomNotification::RoundStarted {
                        round_number: self.room.round_number,
                    });
                }
                let _ = response.send(result);
            }

            RoomMessage::TakeAction {
                player_id,
                action,
                response,
            } => match self.room.apply_action(player_id, action) {
                Ok(outcome) => {
                    let _ = response.send(Ok(()));
                    self.notify(RoomNotification::StateChanged);
                    if let TurnOutcome::Ended(end) = outcome {
                        self.conclude_round(&end);
                    }
                }
                Err(e) => {
                    let _ = response.send(Err(e));
                }
            },

            RoomMessage::GetView {
                player_id,
                response,
            } => {
                let _ = response.send(self.room.view_for(player_id));
            }

            RoomMessage::Disconnect {
                player_id,
                response,
            } => {
                let outcome = self.room.remove_player(player_id);
                self.subscribers.remove(&player_id);

                if self.room.is_empty() {
                    self.closed = true;
                    let _ = response.send(true);
                    return;
                }

                self.notify(RoomNotification::PlayerListChanged);
                if let Some(outcome) = outcome {
                    self.notify(RoomNotification::StateChanged);
                    if let TurnOutcome::Ended(end) = outcome {
                        self.conclude_round(&end);
                    }
                }
                let _ = response.send(self.closed);
            }

            RoomMessage::Subscribe { player_id, sender } => {
                // prime the new subscriber so it fetches a first view
                let _ = sender.try_send(RoomNotification::StateChanged);
                self.subscribers.insert(player_id, sender);
            }

            RoomMessage::Unsubscribe { player_id } => {
                self.subscribers.remove(&player_id);
            }

            RoomMessage::NextRoundTimer => {
                self.pending_timer = None;
                if self.room.started {
                    // a round already started through another path
                    return;
                }
                if self.room.eligible_count() < 2 {
                    info!(
                        "room {}: not enough funded players, waiting",
                        self.room.room_id
                    );
                    return;
                }
                match self.room.start_round(None) {
                    Ok(()) => self.notify(RoomNotification::RoundStarted {
                        round_number: self.room.round_number,
                    }),
                    Err(e) => warn!("room {}: auto start failed: {e}", self.room.room_id),
                }
            }
        }
    }

    /// Settle an ended round, tell the table, kick the busted, and arm
    /// the next-round trigger when the table can go again.
    fn conclude_round(&mut self, end: &RoundEnd) {
        let Some((_report, evicted)) = self.room.finish_round(end) else {
            return;
        };

        self.notify(RoomNotification::RoundEnded);

        for seat in &evicted {
            if let Some(sender) = self.subscribers.remove(&seat.id) {
                let _ = sender.try_send(RoomNotification::Evicted);
            }
        }
        if !evicted.is_empty() {
            self.notify(RoomNotification::PlayerListChanged);
        }

        if self.room.is_empty() {
            self.closed = true;
            return;
        }

        if self.room.eligible_count() >= 2 {
            self.arm_next_round_timer();
        }
    }

    /// Arm the single-shot next-round trigger. Idempotent: a pending
    /// trigger is left alone.
    fn arm_next_round_timer(&mut self) {
        if self.pending_timer.is_some() {
            return;
        }
        let sender = self.self_sender.clone();
        let delay = self.room.config.next_round_delay;
        self.pending_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender.send(RoomMessage::NextRoundTimer).await;
        }));
        self.notify(RoomNotification::NextRoundCountdown {
            seconds: delay.as_secs(),
        });
    }

    fn disarm_timer(&mut self) {
        if let Some(handle) = self.pending_timer.take() {
            handle.abort();
        }
    }

    /// Push a notification to every subscriber, dropping the ones that
    /// went away.
    fn notify(&mut self, notification: RoomNotification) {
        self.subscribers.retain(|player_id, sender| {
            match sender.try_send(notification.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("subscriber {player_id} channel full, dropping notification");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            }
        });
    }
}

/// Capacity used for subscriber notification channels.
#[must_use]
pub fn notification_channel() -> (
    mpsc::Sender<RoomNotification>,
    mpsc::Receiver<RoomNotification>,
) {
    mpsc::channel(NOTIFY_CAPACITY)
}
