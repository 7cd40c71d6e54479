use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Per-frame key queries the simulation needs from whatever owns the keyboard.
pub trait InputSource {
    /// Key is currently held.
    fn is_held(&self, code: &str) -> bool;

    /// Key went down this frame.
    fn just_pressed(&self, code: &str) -> bool;
}

/// Keyboard state keyed by `KeyboardEvent.code` strings ("KeyW", "ArrowUp", ...).
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    /// Keys currently held down.
    pub keys_down: HashSet<String>,
    /// Keys pressed this frame (cleared each frame).
    pub keys_just_pressed: HashSet<String>,
    /// Keys released this frame (cleared each frame).
    pub keys_just_released: HashSet<String>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key down event.
    pub fn on_key_down(&mut self, code: impl Into<String>) {
        let code = code.into();
        if self.keys_down.insert(code.clone()) {
            self.keys_just_pressed.insert(code);
        }
    }

    /// Register a key up event.
    pub fn on_key_up(&mut self, code: &str) {
        if self.keys_down.remove(code) {
            self.keys_just_released.insert(code.to_string());
        }
    }

    /// Replace the held set with a full snapshot, deriving press/release edges
    /// from the previous frame. Used by hosts that poll rather than receive events.
    pub fn apply_snapshot<I, S>(&mut self, held: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next: HashSet<String> = held.into_iter().map(Into::into).collect();
        self.keys_just_pressed = next.difference(&self.keys_down).cloned().collect();
        self.keys_just_released = self.keys_down.difference(&next).cloned().collect();
        self.keys_down = next;
    }

    /// Clear per-frame state. Call at the end of each frame.
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.keys_just_released.clear();
    }
}

impl InputSource for KeyboardState {
    fn is_held(&self, code: &str) -> bool {
        self.keys_down.contains(code)
    }

    fn just_pressed(&self, code: &str) -> bool {
        self.keys_just_pressed.contains(code)
    }
}

/// Key bindings for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub forward: String,
    pub back: String,
    pub left: String,
    pub right: String,
    pub jump: String,
    pub duck: String,
    pub sprint: String,
}

/// The two shared-keyboard layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlScheme {
    /// W/A/S/D move, Space jump, E duck, left Shift sprint.
    Wasd,
    /// Arrow keys move, Numpad 0 jump, right Control duck, right Shift sprint.
    Arrows,
}

impl ControlScheme {
    pub fn bindings(self) -> KeyBindings {
        let keys = match self {
            ControlScheme::Wasd => [
                "KeyW",
                "KeyS",
                "KeyA",
                "KeyD",
                "Space",
                "KeyE",
                "ShiftLeft",
            ],
            ControlScheme::Arrows => [
                "ArrowUp",
                "ArrowDown",
                "ArrowLeft",
                "ArrowRight",
                "Numpad0",
                "ControlRight",
                "ShiftRight",
            ],
        };
        let [forward, back, left, right, jump, duck, sprint] = keys.map(str::to_string);
        KeyBindings {
            forward,
            back,
            left,
            right,
            jump,
            duck,
            sprint,
        }
    }
}

impl KeyBindings {
    /// Digital movement axes `(x, z)`: right is +x, forward is +z.
    ///
    /// When both keys of an axis are held, left wins on x and forward wins on z.
    pub fn axes(&self, input: &dyn InputSource) -> (f32, f32) {
        let x = if input.is_held(&self.left) {
            -1.0
        } else if input.is_held(&self.right) {
            1.0
        } else {
            0.0
        };
        let z = if input.is_held(&self.forward) {
            1.0
        } else if input.is_held(&self.back) {
            -1.0
        } else {
            0.0
        };
        (x, z)
    }

    pub fn direction_keys(&self) -> [&str; 4] {
        [
            self.forward.as_str(),
            self.back.as_str(),
            self.left.as_str(),
            self.right.as_str(),
        ]
    }

    /// Any movement key went down this frame.
    pub fn direction_just_pressed(&self, input: &dyn InputSource) -> bool {
        self.direction_keys()
            .iter()
            .any(|code| input.just_pressed(code))
    }

    /// Any movement key is held.
    pub fn direction_held(&self, input: &dyn InputSource) -> bool {
        self.direction_keys().iter().any(|code| input.is_held(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_and_up() {
        let mut input = KeyboardState::new();
        input.on_key_down("KeyA");
        assert!(input.is_held("KeyA"));
        assert!(input.just_pressed("KeyA"));

        input.end_frame();
        assert!(input.is_held("KeyA"));
        assert!(!input.just_pressed("KeyA"));

        input.on_key_up("KeyA");
        assert!(!input.is_held("KeyA"));
        assert!(input.keys_just_released.contains("KeyA"));
    }

    #[test]
    fn duplicate_key_down_not_just_pressed_twice() {
        let mut input = KeyboardState::new();
        input.on_key_down("KeyA");
        input.on_key_down("KeyA");
        assert_eq!(input.keys_just_pressed.len(), 1);
    }

    #[test]
    fn snapshot_derives_edges() {
        let mut input = KeyboardState::new();
        input.apply_snapshot(["KeyW", "Space"]);
        assert!(input.just_pressed("KeyW"));
        assert!(input.just_pressed("Space"));

        input.apply_snapshot(["KeyW"]);
        assert!(input.is_held("KeyW"));
        assert!(!input.just_pressed("KeyW"));
        assert!(input.keys_just_released.contains("Space"));
    }

    #[test]
    fn schemes_do_not_share_keys() {
        let a = ControlScheme::Wasd.bindings();
        let b = ControlScheme::Arrows.bindings();
        let a_keys = [
            &a.forward, &a.back, &a.left, &a.right, &a.jump, &a.duck, &a.sprint,
        ];
        let b_keys = [
            &b.forward, &b.back, &b.left, &b.right, &b.jump, &b.duck, &b.sprint,
        ];
        for key in a_keys {
            assert!(!b_keys.contains(&key), "{key} bound in both schemes");
        }
    }

    #[test]
    fn axes_read_the_bound_scheme_only() {
        let mut input = KeyboardState::new();
        input.on_key_down("KeyD");
        input.on_key_down("ArrowUp");

        let wasd = ControlScheme::Wasd.bindings();
        let arrows = ControlScheme::Arrows.bindings();
        assert_eq!(wasd.axes(&input), (1.0, 0.0));
        assert_eq!(arrows.axes(&input), (0.0, 1.0));
    }

    #[test]
    fn direction_edges_and_holds() {
        let mut input = KeyboardState::new();
        let wasd = ControlScheme::Wasd.bindings();
        assert!(!wasd.direction_held(&input));

        input.on_key_down("KeyS");
        assert!(wasd.direction_just_pressed(&input));
        input.end_frame();
        assert!(!wasd.direction_just_pressed(&input));
        assert!(wasd.direction_held(&input));
    }
}
