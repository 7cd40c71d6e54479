use aftershock_core::player::Standing;

use crate::player::DuelPlayer;

/// Rank players for the leaderboard.
///
/// Ordering: alive before dead, then more remaining health, then lower slot.
pub fn standings(players: &[DuelPlayer]) -> Vec<Standing> {
    let mut rows: Vec<Standing> = players
        .iter()
        .map(|p| Standing {
            rank: 0,
            slot: p.slot,
            health: p.health.health(),
            alive: !p.is_dead(),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.alive
            .cmp(&a.alive)
            .then(b.health.total_cmp(&a.health))
            .then(a.slot.cmp(&b.slot))
    });
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = (i + 1) as u8;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use aftershock_core::collaborators::Collaborators;
    use aftershock_core::player::PlayerSlot;

    use crate::health::HealthConfig;
    use crate::locomotion::LocomotionConfig;

    fn pair() -> Vec<DuelPlayer> {
        PlayerSlot::ALL
            .iter()
            .map(|&s| DuelPlayer::new(s, &LocomotionConfig::default(), &HealthConfig::default()))
            .collect()
    }

    #[test]
    fn healthier_player_ranks_first() {
        let mut collab = Collaborators::detached();
        let mut players = pair();
        players[0].take_damage(40.0, &mut collab);
        players[1].take_damage(10.0, &mut collab);
        let rows = standings(&players);
        assert_eq!(rows[0].slot, PlayerSlot::Two);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].slot, PlayerSlot::One);
        assert_eq!(rows[1].rank, 2);
    }

    #[test]
    fn ties_break_on_slot() {
        let rows = standings(&pair());
        assert_eq!(rows[0].slot, PlayerSlot::One);
        assert_eq!(rows[1].slot, PlayerSlot::Two);
    }

    #[test]
    fn dead_player_ranks_last() {
        let mut collab = Collaborators::detached();
        let mut players = pair();
        players[0].take_damage(95.0, &mut collab);
        players[1].take_damage(100.0, &mut collab);
        let rows = standings(&players);
        assert_eq!(rows[0].slot, PlayerSlot::One);
        assert!(rows[0].alive);
        assert!(!rows[1].alive);
    }
}
