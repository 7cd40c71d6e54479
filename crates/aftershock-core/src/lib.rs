pub mod collaborators;
pub mod input;
pub mod player;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::collaborators::{
        AnimationFrame, AnimationSink, AudioChannel, AudioCues, ClipId, Collaborators,
        SceneTransition, UiPresenter,
    };
    use crate::input::KeyboardState;
    use crate::player::{HealthBand, PlayerSlot, Standing};

    /// A call received by [`RecordingAudio`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum AudioCall {
        OneShot(ClipId),
        Loop(AudioChannel, ClipId),
        Stop(AudioChannel),
    }

    /// A call received by [`RecordingUi`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum UiCall {
        Countdown(String),
        HideCountdown,
        Health(PlayerSlot, f32, HealthBand),
        Victory(PlayerSlot),
        Leaderboard(Vec<Standing>),
    }

    /// Audio sink that records calls. Clones share the same log.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingAudio {
        log: Rc<RefCell<Vec<AudioCall>>>,
    }

    impl RecordingAudio {
        pub fn calls(&self) -> Vec<AudioCall> {
            self.log.borrow().clone()
        }
    }

    impl AudioCues for RecordingAudio {
        fn play_one_shot(&mut self, clip: ClipId) {
            self.log.borrow_mut().push(AudioCall::OneShot(clip));
        }

        fn play_looping(&mut self, channel: AudioChannel, clip: ClipId) {
            self.log.borrow_mut().push(AudioCall::Loop(channel, clip));
        }

        fn stop(&mut self, channel: AudioChannel) {
            self.log.borrow_mut().push(AudioCall::Stop(channel));
        }
    }

    /// UI presenter that records calls. Clones share the same log.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingUi {
        log: Rc<RefCell<Vec<UiCall>>>,
    }

    impl RecordingUi {
        pub fn calls(&self) -> Vec<UiCall> {
            self.log.borrow().clone()
        }

        /// Countdown texts in the order they were shown.
        pub fn countdown_texts(&self) -> Vec<String> {
            self.log
                .borrow()
                .iter()
                .filter_map(|c| match c {
                    UiCall::Countdown(text) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }

        /// Most recent health reading for a slot.
        pub fn last_health(&self, slot: PlayerSlot) -> Option<f32> {
            self.log.borrow().iter().rev().find_map(|c| match c {
                UiCall::Health(s, health, _) if *s == slot => Some(*health),
                _ => None,
            })
        }
    }

    impl UiPresenter for RecordingUi {
        fn show_countdown(&mut self, text: &str) {
            self.log
                .borrow_mut()
                .push(UiCall::Countdown(text.to_string()));
        }

        fn hide_countdown(&mut self) {
            self.log.borrow_mut().push(UiCall::HideCountdown);
        }

        fn show_health(&mut self, slot: PlayerSlot, health: f32, _max: f32, band: HealthBand) {
            self.log
                .borrow_mut()
                .push(UiCall::Health(slot, health, band));
        }

        fn show_victory(&mut self, winner: PlayerSlot) {
            self.log.borrow_mut().push(UiCall::Victory(winner));
        }

        fn show_leaderboard(&mut self, standings: &[Standing]) {
            self.log
                .borrow_mut()
                .push(UiCall::Leaderboard(standings.to_vec()));
        }
    }

    /// Animation sink that records frames. Clones share the same log.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingAnimation {
        log: Rc<RefCell<Vec<AnimationFrame>>>,
    }

    impl RecordingAnimation {
        pub fn frames(&self) -> Vec<AnimationFrame> {
            self.log.borrow().clone()
        }

        pub fn last_for(&self, slot: PlayerSlot) -> Option<AnimationFrame> {
            self.log
                .borrow()
                .iter()
                .rev()
                .find(|f| f.slot == slot)
                .copied()
        }
    }

    impl AnimationSink for RecordingAnimation {
        fn present(&mut self, frame: &AnimationFrame) {
            self.log.borrow_mut().push(*frame);
        }
    }

    /// Scene transition that records requested scene names.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingScenes {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl RecordingScenes {
        pub fn loaded(&self) -> Vec<String> {
            self.log.borrow().clone()
        }
    }

    impl SceneTransition for RecordingScenes {
        fn load_scene(&mut self, name: &str) {
            self.log.borrow_mut().push(name.to_string());
        }
    }

    /// Handles onto every recorder wired into a [`Collaborators`] bundle.
    #[derive(Debug, Clone, Default)]
    pub struct Recorders {
        pub audio: RecordingAudio,
        pub ui: RecordingUi,
        pub animation: RecordingAnimation,
        pub scenes: RecordingScenes,
    }

    /// Build a fully-attached bundle plus the handles to inspect it.
    pub fn recording_collaborators() -> (Collaborators, Recorders) {
        let recorders = Recorders::default();
        let collab = Collaborators::detached()
            .with_audio(recorders.audio.clone())
            .with_ui(recorders.ui.clone())
            .with_animation(recorders.animation.clone())
            .with_scenes(recorders.scenes.clone());
        (collab, recorders)
    }

    /// Keyboard with the given keys freshly pressed this frame.
    pub fn keys_pressed(codes: &[&str]) -> KeyboardState {
        let mut keyboard = KeyboardState::new();
        keyboard.apply_snapshot(codes.iter().copied());
        keyboard
    }
}
