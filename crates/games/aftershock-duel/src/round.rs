use aftershock_core::collaborators::Collaborators;
use serde::{Deserialize, Serialize};

use crate::hazard::{HazardSimulator, TriggerOutcome};

/// Text shown when the countdown reaches zero.
pub const START_TEXT: &str = "START!";
/// Countdown remaining below this counts as finished.
const COUNTDOWN_EPSILON: f32 = 1e-4;

/// Round timing, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    pub countdown_secs: f32,
    /// How long the start banner stays up. Zero hides the countdown at once.
    pub start_banner_secs: f32,
    pub hazard_interval_secs: f32,
    pub round_duration_secs: f32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 5.0,
            start_banner_secs: 1.0,
            hazard_interval_secs: 10.0,
            round_duration_secs: 120.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Countdown,
    Active,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Round duration ran out.
    TimeUp,
    /// Countdown was torn down before the round started.
    Cancelled,
}

/// Transitions and displays produced by one round tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEvent {
    CountdownShown(u32),
    Started,
    HazardTriggered(TriggerOutcome),
    Ended(EndReason),
}

/// Match clock: countdown, then an active phase with a periodic hazard,
/// then a latched end.
#[derive(Debug, Clone)]
pub struct RoundOrchestrator {
    config: RoundConfig,
    phase: RoundPhase,
    countdown_remaining: f32,
    banner_remaining: Option<f32>,
    last_shown: Option<u32>,
    match_elapsed: f32,
    hazard_interval_elapsed: f32,
    end_reason: Option<EndReason>,
}

impl RoundOrchestrator {
    pub fn new(config: RoundConfig) -> Self {
        Self {
            countdown_remaining: config.countdown_secs,
            config,
            phase: RoundPhase::Countdown,
            banner_remaining: None,
            last_shown: None,
            match_elapsed: 0.0,
            hazard_interval_elapsed: 0.0,
            end_reason: None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn countdown_remaining(&self) -> f32 {
        self.countdown_remaining.max(0.0)
    }

    pub fn match_elapsed(&self) -> f32 {
        self.match_elapsed
    }

    pub fn hazard_interval_elapsed(&self) -> f32 {
        self.hazard_interval_elapsed
    }

    /// Show the opening countdown value. Safe to call more than once.
    pub fn begin(&mut self, collab: &mut Collaborators) -> Option<RoundEvent> {
        if self.phase != RoundPhase::Countdown || self.banner_remaining.is_some() {
            return None;
        }
        self.show_countdown(collab)
    }

    /// Tear down a pending countdown. Returns false once the round has started.
    pub fn cancel(&mut self, collab: &mut Collaborators) -> bool {
        if self.phase != RoundPhase::Countdown {
            return false;
        }
        collab.hide_countdown();
        self.banner_remaining = None;
        self.end(EndReason::Cancelled);
        true
    }

    pub fn tick(
        &mut self,
        dt: f32,
        hazard: &mut HazardSimulator,
        collab: &mut Collaborators,
    ) -> Vec<RoundEvent> {
        let mut events = Vec::new();
        if !dt.is_finite() || dt <= 0.0 {
            return events;
        }
        match self.phase {
            RoundPhase::Countdown => self.tick_countdown(dt, collab, &mut events),
            RoundPhase::Active => self.tick_active(dt, hazard, collab, &mut events),
            RoundPhase::Ended => {}
        }
        events
    }

    fn tick_countdown(
        &mut self,
        dt: f32,
        collab: &mut Collaborators,
        events: &mut Vec<RoundEvent>,
    ) {
        if let Some(banner) = self.banner_remaining.as_mut() {
            *banner -= dt;
            if *banner <= 0.0 {
                self.start(collab, events);
            }
            return;
        }

        self.countdown_remaining -= dt;
        if self.countdown_remaining > COUNTDOWN_EPSILON {
            events.extend(self.show_countdown(collab));
            return;
        }

        collab.show_countdown(START_TEXT);
        if self.config.start_banner_secs > 0.0 {
            self.banner_remaining = Some(self.config.start_banner_secs);
        } else {
            self.start(collab, events);
        }
    }

    fn tick_active(
        &mut self,
        dt: f32,
        hazard: &mut HazardSimulator,
        collab: &mut Collaborators,
        events: &mut Vec<RoundEvent>,
    ) {
        self.match_elapsed += dt;
        self.hazard_interval_elapsed += dt;

        if self.hazard_interval_elapsed >= self.config.hazard_interval_secs {
            self.hazard_interval_elapsed = 0.0;
            events.push(RoundEvent::HazardTriggered(hazard.trigger(collab)));
        }

        if self.match_elapsed >= self.config.round_duration_secs {
            self.end(EndReason::TimeUp);
            events.push(RoundEvent::Ended(EndReason::TimeUp));
        }
    }

    fn show_countdown(&mut self, collab: &mut Collaborators) -> Option<RoundEvent> {
        let value = self.countdown_remaining.max(0.0).ceil() as u32;
        if self.last_shown == Some(value) {
            return None;
        }
        self.last_shown = Some(value);
        collab.show_countdown(&value.to_string());
        Some(RoundEvent::CountdownShown(value))
    }

    fn start(&mut self, collab: &mut Collaborators, events: &mut Vec<RoundEvent>) {
        collab.hide_countdown();
        self.banner_remaining = None;
        self.phase = RoundPhase::Active;
        tracing::info!(
            duration = self.config.round_duration_secs,
            hazard_interval = self.config.hazard_interval_secs,
            "round started"
        );
        events.push(RoundEvent::Started);
    }

    fn end(&mut self, reason: EndReason) {
        self.phase = RoundPhase::Ended;
        self.end_reason = Some(reason);
        tracing::info!(?reason, elapsed = self.match_elapsed, "round ended");
    }
}
