//! Game-wide constants.

use std::time::Duration;

use super::entities::Chips;

/// Maximum number of seats in a room.
pub const MAX_PLAYERS: usize = 5;

/// Starting chip stack handed to every joining player unless the room
/// was created with a different value.
pub const DEFAULT_START_CHIPS: Chips = 100_000;

/// Forced bet collected from every player at the start of a round.
pub const DEFAULT_ANTE: Chips = 1_000;

/// Lower bound on a room's starting stack.
pub const MIN_START_CHIPS: Chips = 1_000;

/// Lower bound on a room's ante.
pub const MIN_ANTE: Chips = 100;

/// Delay before the next round starts automatically once enough
/// players with chips remain.
pub const DEFAULT_NEXT_ROUND_DELAY: Duration = Duration::from_secs(5);
