//! Team membership as stored by the game.

/// Side an entity plays on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Team {
    /// Any raw value outside the known sides, including unset memory.
    #[default]
    Unassigned,
    /// Observing, not playing.
    Spectator,
    /// The attacking side.
    Terrorists,
    /// The defending side.
    CounterTerrorists,
}

impl Team {
    /// Decodes the raw team number.
    ///
    /// # Examples
    /// ```
    /// use sightline::team::Team;
    /// assert_eq!(Team::from_raw(2), Team::Terrorists);
    /// assert_eq!(Team::from_raw(3), Team::CounterTerrorists);
    /// assert_eq!(Team::from_raw(7), Team::Unassigned);
    /// ```
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Self::Spectator,
            2 => Self::Terrorists,
            3 => Self::CounterTerrorists,
            _ => Self::Unassigned,
        }
    }

    /// Returns `true` for the two playing sides.
    #[must_use]
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Terrorists | Self::CounterTerrorists)
    }
}
