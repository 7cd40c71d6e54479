use aftershock_core::collaborators::{ClipId, Collaborators};
use aftershock_core::player::PlayerSlot;
use aftershock_core::time::SimClock;

/// Decides the match on the first death and stays decided until reset.
#[derive(Debug, Clone, Default)]
pub struct GameOverArbiter {
    winner: Option<PlayerSlot>,
}

impl GameOverArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<PlayerSlot> {
        self.winner
    }

    /// Record a death. The first call picks the other slot as winner, freezes
    /// the clock, and shows victory; later calls return `None` and do nothing.
    pub fn player_died(
        &mut self,
        slot: PlayerSlot,
        clock: &mut SimClock,
        collab: &mut Collaborators,
    ) -> Option<PlayerSlot> {
        if self.winner.is_some() {
            tracing::debug!(%slot, "death after game over ignored");
            return None;
        }
        let winner = slot.opponent();
        self.winner = Some(winner);
        clock.freeze();
        collab.show_victory(winner);
        collab.play_one_shot(ClipId::Victory);
        tracing::info!(loser = %slot, %winner, "game over");
        Some(winner)
    }

    /// Clear the decision and unfreeze the clock for a new match.
    pub fn reset(&mut self, clock: &mut SimClock) {
        self.winner = None;
        clock.unfreeze();
    }
}
