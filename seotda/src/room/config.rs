//! Room configuration.

use std::time::Duration;
use thiserror::Error;

use crate::game::constants::{
    DEFAULT_ANTE, DEFAULT_NEXT_ROUND_DELAY, DEFAULT_START_CHIPS, MAX_PLAYERS, MIN_ANTE,
    MIN_START_CHIPS,
};
use crate::game::entities::Chips;

/// Parameters a room is created with. Validated at the boundary so an
/// actor never runs with a degenerate stake structure.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoomConfig {
    /// Stack handed to every player on join.
    pub start_chips: Chips,
    /// Forced bet collected from every player each round.
    pub ante: Chips,
    /// Seat cap, spectators included.
    pub max_players: usize,
    /// Delay before the next round starts automatically.
    pub next_round_delay: Duration,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            start_chips: DEFAULT_START_CHIPS,
            ante: DEFAULT_ANTE,
            max_players: MAX_PLAYERS,
            next_round_delay: DEFAULT_NEXT_ROUND_DELAY,
        }
    }
}

/// Rejected room parameters.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum RoomConfigError {
    #[error("starting chips must be at least {MIN_START_CHIPS}")]
    StartChipsTooLow,
    #[error("ante must be at least {MIN_ANTE}")]
    AnteTooLow,
    #[error("ante cannot exceed a tenth of the starting chips")]
    AnteTooLarge,
}

impl RoomConfig {
    /// Validate the stake structure.
    ///
    /// # Errors
    ///
    /// Returns a [`RoomConfigError`] when the starting stack or ante
    /// falls outside the allowed bounds.
    pub fn validate(&self) -> Result<(), RoomConfigError> {
        if self.start_chips < MIN_START_CHIPS {
            return Err(RoomConfigError::StartChipsTooLow);
        }
        if self.ante < MIN_ANTE {
            return Err(RoomConfigError::AnteTooLow);
        }
        if self.ante > self.start_chips / 10 {
            return Err(RoomConfigError::AnteTooLarge);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RoomConfig::default().validate().is_ok());
    }

    #[test]
    fn test_start_chips_floor() {
        let config = RoomConfig {
            start_chips: 999,
            ante: 100,
            ..RoomConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            RoomConfigError::StartChipsTooLow
        );
    }

    #[test]
    fn test_ante_floor() {
        let config = RoomConfig {
            ante: 99,
            ..RoomConfig::default()
        };
        assert_eq!(config.validate().unwrap_err(), RoomConfigError::AnteTooLow);
    }

    #[test]
    fn test_ante_cap_relative_to_stack() {
        let config = RoomConfig {
            start_chips: 1_000,
            ante: 101,
            ..RoomConfig::default()
        };
        assert_eq!(config.validate().unwrap_err(), RoomConfigError::AnteTooLarge);

        let boundary = RoomConfig {
            start_chips: 1_000,
            ante: 100,
            ..RoomConfig::default()
        };
        assert!(boundary.validate().is_ok());
    }
}
