use serde::{Deserialize, Serialize};

/// Number of players in a duel. The arbiter relies on there being exactly two.
pub const PLAYER_COUNT: usize = 2;

/// One of the two fixed player slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; PLAYER_COUNT] = [PlayerSlot::One, PlayerSlot::Two];

    /// Map a 1-based player number to a slot. Anything else is out of range.
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(PlayerSlot::One),
            2 => Some(PlayerSlot::Two),
            _ => None,
        }
    }

    /// 1-based player number, as shown to players.
    pub fn number(self) -> u8 {
        match self {
            PlayerSlot::One => 1,
            PlayerSlot::Two => 2,
        }
    }

    /// 0-based index for per-slot arrays.
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

impl std::fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Colour band of a health bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthBand {
    Green,
    Yellow,
    Red,
}

impl HealthBand {
    /// Band for `health / max`: above half is green, above a quarter yellow, else red.
    pub fn from_health(health: f32, max: f32) -> Self {
        let ratio = if max > 0.0 { health / max } else { 0.0 };
        if ratio > 0.5 {
            HealthBand::Green
        } else if ratio > 0.25 {
            HealthBand::Yellow
        } else {
            HealthBand::Red
        }
    }
}

/// One row of the end-of-match leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based rank.
    pub rank: u8,
    pub slot: PlayerSlot,
    pub health: f32,
    pub alive: bool,
}
