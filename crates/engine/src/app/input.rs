use serde::{Deserialize, Serialize};

use crate::world::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Interact,
    Quit,
}

const ACTION_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Interact => 4,
            InputAction::Quit => 5,
        }
    }
}

/// Direction the player wants to walk this tick. Components are clamped to
/// `[-1, 1]` and the vector is capped at unit length before speed applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub dx: f32,
    pub dy: f32,
}

impl MoveIntent {
    pub const IDLE: MoveIntent = MoveIntent { dx: 0.0, dy: 0.0 };

    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    pub fn from_actions(actions: &ActionStates) -> Self {
        let mut dx = 0.0f32;
        let mut dy = 0.0f32;

        if actions.is_down(InputAction::MoveRight) {
            dx += 1.0;
        }
        if actions.is_down(InputAction::MoveLeft) {
            dx -= 1.0;
        }
        // Screen space: up is toward y = 0.
        if actions.is_down(InputAction::MoveUp) {
            dy -= 1.0;
        }
        if actions.is_down(InputAction::MoveDown) {
            dy += 1.0;
        }

        Self { dx, dy }
    }

    pub fn is_idle(&self) -> bool {
        self.step(1.0) == Vec2::ZERO
    }

    pub fn step(&self, speed: f32) -> Vec2 {
        let mut x = sanitize_axis(self.dx);
        let mut y = sanitize_axis(self.dy);

        let len_sq = x * x + y * y;
        if len_sq > 1.0 {
            let inv_len = len_sq.sqrt().recip();
            x *= inv_len;
            y *= inv_len;
        }

        Vec2 {
            x: x * speed,
            y: y * speed,
        }
    }
}

fn sanitize_axis(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Per-tick view of the digital input. `interact_pressed` is an edge: it is
/// true only on the tick the interact action went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    actions: ActionStates,
    interact_pressed: bool,
}

impl FrameInput {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_interact_pressed(mut self, interact_pressed: bool) -> Self {
        self.interact_pressed = interact_pressed;
        self
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn move_intent(&self) -> MoveIntent {
        MoveIntent::from_actions(&self.actions)
    }

    pub fn interact_pressed(&self) -> bool {
        self.interact_pressed
    }

    pub fn quit_requested(&self) -> bool {
        self.actions.is_down(InputAction::Quit)
    }
}

/// Accumulates held actions between ticks and turns the interact key into a
/// single press per key-down.
#[derive(Debug, Default)]
pub struct InputCollector {
    action_states: ActionStates,
    interact_is_down: bool,
    interact_pressed_edge: bool,
}

impl InputCollector {
    pub fn set_action(&mut self, action: InputAction, is_down: bool) {
        if action == InputAction::Interact {
            if is_down && !self.interact_is_down {
                self.interact_pressed_edge = true;
            }
            self.interact_is_down = is_down;
        }
        self.action_states.set(action, is_down);
    }

    /// Also drops an interact press not yet handed out by `snapshot_for_tick`.
    pub fn release_all(&mut self) {
        self.action_states = ActionStates::default();
        self.interact_is_down = false;
        self.interact_pressed_edge = false;
    }

    pub fn snapshot_for_tick(&mut self) -> FrameInput {
        let snapshot = FrameInput {
            actions: self.action_states,
            interact_pressed: self.interact_pressed_edge,
        };
        self.interact_pressed_edge = false;
        snapshot
    }
}
