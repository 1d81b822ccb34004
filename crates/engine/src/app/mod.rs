mod controller;
mod input;
mod snapshot;

pub use controller::{
    AppliedEffect, ControllerConfig, QuestController, TickError, DEFAULT_MOVE_SPEED,
};
pub use input::{ActionStates, FrameInput, InputAction, InputCollector, MoveIntent};
pub use snapshot::{
    paint_list, DialogSnapshot, FrameResult, PaintItem, PaintSource, SceneSnapshot,
};
