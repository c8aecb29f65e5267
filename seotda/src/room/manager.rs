//! Room registry: spawns room actors and routes to their handles.
//!
//! The manager is the only process-wide structure; it is created at
//! startup and injected into the gateway, so nothing here is a global
//! singleton. Rooms are keyed by a short numeric code, the way players
//! share them.

use log::info;
use rand::Rng;
use std::collections::HashMap;
use tokio::sync::{RwLock, oneshot};

use super::actor::{RoomActor, RoomHandle};
use super::config::{RoomConfig, RoomConfigError};
use super::messages::RoomMessage;
use super::session::{GameRoom, RoomError, RoomId};
use crate::game::entities::PlayerId;

/// Registry of live rooms.
pub struct RoomManager {
    rooms: RwLock<HashMap<RoomId, RoomHandle>>,
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Create a room, seat the host, and spawn its actor.
    ///
    /// # Errors
    ///
    /// Rejects invalid stake parameters before anything is created.
    pub async fn create_room(
        &self,
        host_id: PlayerId,
        host_name: String,
        config: RoomConfig,
    ) -> Result<RoomHandle, RoomConfigError> {
        config.validate()?;

        let mut rooms = self.rooms.write().await;
        let room_id = loop {
            let code = rand::rng().random_range(1000..10000).to_string();
            if !rooms.contains_key(&code) {
                break code;
            }
        };

        let room = GameRoom::new(room_id.clone(), host_id, host_name, config);
        let (actor, handle) = RoomActor::new(room);
        rooms.insert(room_id.clone(), handle.clone());
        drop(rooms);

        tokio::spawn(actor.run());

        info!("created room {room_id}");
        Ok(handle)
    }

    /// Look up a room's handle.
    pub async fn get_room(&self, room_id: &str) -> Option<RoomHandle> {
        let rooms = self.rooms.read().await;
        rooms.get(room_id).cloned()
    }

    /// Seat a player in an existing room. Returns whether they joined
    /// as a spectator.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown or closed rooms, otherwise whatever the
    /// room rejected the join with.
    pub async fn join_room(
        &self,
        room_id: &str,
        player_id: PlayerId,
        name: String,
    ) -> Result<bool, RoomError> {
        let handle = self.get_room(room_id).await.ok_or(RoomError::NotFound)?;

        let (tx, rx) = oneshot::channel();
        let sent = handle
            .send(RoomMessage::Join {
                player_id,
                name,
                response: tx,
            })
            .await;
        if sent.is_err() {
            // the actor is gone; drop the stale handle
            self.remove_room(room_id).await;
            return Err(RoomError::NotFound);
        }

        rx.await.map_err(|_| RoomError::NotFound)?
    }

    /// Route a disconnect to the player's room and clean up the
    /// registry when the room empties over it.
    pub async fn disconnect(&self, room_id: &str, player_id: PlayerId) {
        let Some(handle) = self.get_room(room_id).await else {
            return;
        };

        let (tx, rx) = oneshot::channel();
        let sent = handle
            .send(RoomMessage::Disconnect {
                player_id,
                response: tx,
            })
            .await;

        let room_closed = match sent {
            Ok(()) => rx.await.unwrap_or(true),
            Err(_) => true,
        };
        if room_closed {
            self.remove_room(room_id).await;
        }
    }

    pub async fn remove_room(&self, room_id: &str) {
        let mut rooms = self.rooms.write().await;
        if rooms.remove(room_id).is_some() {
            info!("removed room {room_id}");
        }
    }

    pub async fn room_count(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.len()
    }
}
