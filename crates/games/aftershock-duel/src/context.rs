use aftershock_core::collaborators::Collaborators;
use aftershock_core::player::PlayerSlot;
use aftershock_core::time::SimClock;

use crate::arbiter::GameOverArbiter;

/// State shared by every component of one match.
///
/// Created with the match and dropped with it. Components receive it by
/// `&mut` in their tick calls instead of reaching for globals.
#[derive(Debug, Default)]
pub struct MatchContext {
    pub clock: SimClock,
    pub arbiter: GameOverArbiter,
    pub collaborators: Collaborators,
}

impl MatchContext {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            clock: SimClock::new(),
            arbiter: GameOverArbiter::new(),
            collaborators,
        }
    }

    /// Forward a death to the arbiter. Returns the winner on the deciding call.
    pub fn player_died(&mut self, slot: PlayerSlot) -> Option<PlayerSlot> {
        self.arbiter
            .player_died(slot, &mut self.clock, &mut self.collaborators)
    }
}
