//! Room layer: sessions, per-room actors, and the room registry.
//!
//! Every room is a single-writer state machine. The [`RoomActor`] owns
//! the [`GameRoom`] and applies exactly one mutation at a time from its
//! inbox; the [`RoomManager`] spawns actors and routes requests to
//! their handles. Rooms are fully independent of each other.

pub mod actor;
pub mod config;
pub mod manager;
pub mod messages;
pub mod session;

pub use actor::{RoomActor, RoomHandle, notification_channel};
pub use config::{RoomConfig, RoomConfigError};
pub use manager::RoomManager;
pub use messages::{RoomMessage, RoomNotification};
pub use session::{GameRoom, RoomError, RoomId, RoomView, SeatView};
