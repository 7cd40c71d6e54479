pub mod arbiter;
pub mod body;
pub mod config;
pub mod context;
pub mod hazard;
pub mod health;
pub mod locomotion;
pub mod noise;
pub mod player;
pub mod round;
pub mod scene_gen;
pub mod scoring;
pub mod world;

use glam::{EulerRot, Vec3};
use serde::{Deserialize, Serialize};

use aftershock_core::collaborators::{AudioChannel, ClipId, Collaborators};
use aftershock_core::input::InputSource;
use aftershock_core::player::{PlayerSlot, Standing};

use config::{DuelConfig, MENU_SCENE};
use context::MatchContext;
use hazard::{HazardPhase, HazardSimulator, TriggerOutcome};
use health::DamageOutcome;
use locomotion::{LocomotionInput, MotionState};
use player::DuelPlayer;
use round::{EndReason, RoundEvent, RoundOrchestrator, RoundPhase};
use world::WorldObject;

/// Something that happened during a duel tick, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelEvent {
    CountdownShown(u32),
    RoundStarted,
    PlayerJumped(PlayerSlot),
    HazardStarted,
    HazardEnded,
    PlayerDied(PlayerSlot),
    Victory(PlayerSlot),
    RoundEnded(EndReason),
}

/// What to do once a match is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostMatchAction {
    /// Reload the arena scene.
    Restart,
    /// Leave for the menu scene.
    MainMenu,
}

/// Serializable view of one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub slot: PlayerSlot,
    pub position: Vec3,
    pub yaw_degrees: f32,
    pub vertical_velocity: f32,
    pub grounded: bool,
    pub ducking: bool,
    pub jumping: bool,
    pub sprinting: bool,
    pub state: MotionState,
    pub health: f32,
    pub max_health: f32,
    pub dead: bool,
}

/// Serializable view of the whole match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelSnapshot {
    pub elapsed: f32,
    pub frozen: bool,
    pub round_phase: RoundPhase,
    pub countdown_remaining: f32,
    pub match_elapsed: f32,
    pub hazard_phase: HazardPhase,
    pub hazard_elapsed: f32,
    pub hazard_activations: u32,
    pub players: Vec<PlayerSnapshot>,
    pub winner: Option<PlayerSlot>,
}

/// The Earthquake Duel.
///
/// Owns every component of one match and drives them from a single
/// [`QuakeDuel::tick`] in a fixed order: locomotion, hazard, round, then
/// death notifications.
#[derive(Debug)]
pub struct QuakeDuel {
    scene_name: String,
    players: [DuelPlayer; 2],
    hazard: HazardSimulator,
    round: RoundOrchestrator,
    ctx: MatchContext,
    /// Events raised outside `tick`, flushed at the start of the next one.
    pending_events: Vec<DuelEvent>,
    started: bool,
    /// Set by `resolve`. Every later mutator is a no-op.
    resolved: bool,
}

impl QuakeDuel {
    pub fn new(
        config: DuelConfig,
        scene_name: impl Into<String>,
        objects: &[WorldObject],
        collaborators: Collaborators,
    ) -> Self {
        let config = config.validate();
        let players = PlayerSlot::ALL
            .map(|slot| DuelPlayer::new(slot, &config.locomotion, &config.health));
        Self {
            scene_name: scene_name.into(),
            players,
            hazard: HazardSimulator::new(config.hazard, objects),
            round: RoundOrchestrator::new(config.round),
            ctx: MatchContext::new(collaborators),
            pending_events: Vec::new(),
            started: false,
            resolved: false,
        }
    }

    pub fn scene_name(&self) -> &str {
        &self.scene_name
    }

    pub fn player(&self, slot: PlayerSlot) -> &DuelPlayer {
        &self.players[slot.index()]
    }

    pub fn players(&self) -> &[DuelPlayer] {
        &self.players
    }

    pub fn hazard(&self) -> &HazardSimulator {
        &self.hazard
    }

    pub fn round(&self) -> &RoundOrchestrator {
        &self.round
    }

    pub fn winner(&self) -> Option<PlayerSlot> {
        self.ctx.arbiter.winner()
    }

    pub fn elapsed(&self) -> f32 {
        self.ctx.clock.elapsed()
    }

    /// Round ended, a winner was declared, or the match was resolved.
    pub fn is_over(&self) -> bool {
        self.resolved
            || self.round.phase() == RoundPhase::Ended
            || self.ctx.arbiter.is_game_over()
    }

    /// A post-match action was applied. The instance is spent.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn standings(&self) -> Vec<Standing> {
        scoring::standings(&self.players)
    }

    /// Start music, publish health bars, and show the first countdown value.
    /// Called by the first `tick` if the host does not call it.
    pub fn start(&mut self) -> Vec<DuelEvent> {
        if self.started {
            return Vec::new();
        }
        self.started = true;
        let collab = &mut self.ctx.collaborators;
        collab.play_looping(AudioChannel::Music, ClipId::Music);
        for player in &self.players {
            player.publish_health(collab);
        }
        tracing::info!(scene = %self.scene_name, "match started");
        self.round
            .begin(collab)
            .and_then(map_round_event)
            .into_iter()
            .collect()
    }

    /// Advance the match by one frame of raw (unscaled) time.
    pub fn tick(&mut self, raw_dt: f32, input: &dyn InputSource) -> Vec<DuelEvent> {
        if self.resolved {
            return Vec::new();
        }
        let mut events = self.start();
        events.append(&mut self.pending_events);

        let dt = self.ctx.clock.advance(raw_dt);
        if self.round.phase() == RoundPhase::Ended {
            return events;
        }

        for player in &mut self.players {
            let sampled = LocomotionInput::sample(&player.bindings, input);
            let report = player.locomotion.tick(&sampled, dt);
            if report.jumped {
                self.ctx.collaborators.play_one_shot(ClipId::Jump);
                events.push(DuelEvent::PlayerJumped(player.slot));
            }
            let frame = player.locomotion.animation_frame();
            tracing::trace!(
                slot = %frame.slot,
                speed = frame.locomotion_speed,
                grounded = frame.grounded,
                ducking = frame.ducking,
                "animation"
            );
            self.ctx.collaborators.present_animation(&frame);
        }

        let hazard_report = self.hazard.tick(
            dt,
            self.ctx.clock.elapsed(),
            &mut self.players,
            &mut self.ctx.collaborators,
        );
        if hazard_report.ended {
            events.push(DuelEvent::HazardEnded);
        }

        for event in self
            .round
            .tick(dt, &mut self.hazard, &mut self.ctx.collaborators)
        {
            if event == RoundEvent::Ended(EndReason::TimeUp) {
                if self.hazard.halt(&mut self.ctx.collaborators) {
                    events.push(DuelEvent::HazardEnded);
                }
                let standings = scoring::standings(&self.players);
                self.ctx.collaborators.show_leaderboard(&standings);
            }
            events.extend(map_round_event(event));
        }

        for slot in hazard_report.deaths {
            events.extend(self.report_death(slot));
        }
        events
    }

    /// Start the hazard now, outside the round's schedule.
    ///
    /// Returns `None` once the match is over.
    pub fn trigger_hazard(&mut self) -> Option<TriggerOutcome> {
        if self.is_over() {
            tracing::debug!("hazard trigger after match end ignored");
            return None;
        }
        let outcome = self.hazard.trigger(&mut self.ctx.collaborators);
        if outcome == TriggerOutcome::Started {
            self.pending_events.push(DuelEvent::HazardStarted);
        }
        Some(outcome)
    }

    /// Damage a player by 1-based number. `None` for an unknown number.
    pub fn damage_player(&mut self, number: u8, amount: f32) -> Option<DamageOutcome> {
        if self.resolved {
            tracing::debug!(number, "damage after resolve ignored");
            return None;
        }
        let Some(slot) = PlayerSlot::from_number(number) else {
            tracing::warn!(number, "damage for unknown player ignored");
            return None;
        };
        let outcome =
            self.players[slot.index()].take_damage(amount, &mut self.ctx.collaborators);
        if outcome == DamageOutcome::Died {
            let events = self.report_death(slot);
            self.pending_events.extend(events);
        }
        Some(outcome)
    }

    /// Heal a player by 1-based number. False for an unknown number or a
    /// dead player.
    pub fn heal_player(&mut self, number: u8, amount: f32) -> bool {
        if self.resolved {
            tracing::debug!(number, "heal after resolve ignored");
            return false;
        }
        let Some(slot) = PlayerSlot::from_number(number) else {
            tracing::warn!(number, "heal for unknown player ignored");
            return false;
        };
        self.players[slot.index()].heal(amount, &mut self.ctx.collaborators)
    }

    /// Tear down the countdown, e.g. when the scene is left before the start.
    pub fn cancel(&mut self) -> bool {
        if self.resolved {
            return false;
        }
        let cancelled = self.round.cancel(&mut self.ctx.collaborators);
        if cancelled {
            if self.hazard.halt(&mut self.ctx.collaborators) {
                self.pending_events.push(DuelEvent::HazardEnded);
            }
            self.pending_events
                .push(DuelEvent::RoundEnded(EndReason::Cancelled));
        }
        cancelled
    }

    /// Leave a finished match. Unfreezes the clock before loading the scene.
    ///
    /// Returns false while the match is still running and on any call after
    /// the first. A resolved duel accepts no further ticks or mutations; the
    /// next match is a new `QuakeDuel`.
    pub fn resolve(&mut self, action: PostMatchAction) -> bool {
        if self.resolved {
            tracing::debug!(?action, "match already resolved");
            return false;
        }
        if !self.is_over() {
            tracing::warn!(?action, "post-match action before match end ignored");
            return false;
        }
        self.resolved = true;
        self.pending_events.clear();
        self.ctx.arbiter.reset(&mut self.ctx.clock);
        let collab = &mut self.ctx.collaborators;
        self.hazard.halt(collab);
        collab.stop_audio(AudioChannel::Music);
        let scene = match action {
            PostMatchAction::Restart => self.scene_name.as_str(),
            PostMatchAction::MainMenu => MENU_SCENE,
        };
        tracing::info!(?action, scene, "leaving match");
        collab.load_scene(scene);
        true
    }

    pub fn snapshot(&self) -> DuelSnapshot {
        DuelSnapshot {
            elapsed: self.ctx.clock.elapsed(),
            frozen: self.ctx.clock.is_frozen(),
            round_phase: self.round.phase(),
            countdown_remaining: self.round.countdown_remaining(),
            match_elapsed: self.round.match_elapsed(),
            hazard_phase: self.hazard.phase(),
            hazard_elapsed: self.hazard.elapsed(),
            hazard_activations: self.hazard.activations(),
            players: self.players.iter().map(snapshot_player).collect(),
            winner: self.ctx.arbiter.winner(),
        }
    }

    fn report_death(&mut self, slot: PlayerSlot) -> Vec<DuelEvent> {
        let mut events = vec![DuelEvent::PlayerDied(slot)];
        if let Some(winner) = self.ctx.player_died(slot) {
            events.push(DuelEvent::Victory(winner));
        }
        events
    }
}

fn map_round_event(event: RoundEvent) -> Option<DuelEvent> {
    match event {
        RoundEvent::CountdownShown(n) => Some(DuelEvent::CountdownShown(n)),
        RoundEvent::Started => Some(DuelEvent::RoundStarted),
        RoundEvent::HazardTriggered(TriggerOutcome::Started) => Some(DuelEvent::HazardStarted),
        RoundEvent::HazardTriggered(TriggerOutcome::AlreadyActive) => None,
        RoundEvent::Ended(reason) => Some(DuelEvent::RoundEnded(reason)),
    }
}

fn snapshot_player(player: &DuelPlayer) -> PlayerSnapshot {
    let motion = &player.locomotion;
    let (yaw, _, _) = motion.facing.to_euler(EulerRot::YXZ);
    PlayerSnapshot {
        slot: player.slot,
        position: motion.position,
        yaw_degrees: yaw.to_degrees(),
        vertical_velocity: motion.vertical_velocity,
        grounded: motion.is_grounded(),
        ducking: motion.is_ducking(),
        jumping: motion.is_jumping(),
        sprinting: motion.is_sprinting(),
        state: motion.state(),
        health: player.health.health(),
        max_health: player.health.max_health(),
        dead: player.is_dead(),
    }
}
