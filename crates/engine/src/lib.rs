//! Scene, dialog and inventory core for small top-down word quests.
//!
//! Rendering, asset decoding and device input stay with the host: textures
//! are opaque strings and input arrives as abstract move/interact intents.

pub mod app;
pub mod world;

pub use app::{
    paint_list, ActionStates, AppliedEffect, ControllerConfig, DialogSnapshot, FrameInput,
    FrameResult, InputAction, InputCollector, MoveIntent, PaintItem, PaintSource,
    QuestController, SceneSnapshot, TickError, DEFAULT_MOVE_SPEED,
};
pub use world::{
    ActiveDialog, DialogState, DialogStep, Entity, EntityId, EntityKind, GrantOutcome,
    InteractError, InteractionEffect, Inventory, InventoryEntry, Npc, PlayerSetup, Rect, Reward,
    Scene, SceneBuildFn, SceneError, SceneFactory, StaticObject, TextureRef, Vec2,
    DEFAULT_INTERACT_DISTANCE,
};
