mod entity;
mod geometry;
mod inventory;
mod scene;

pub use entity::{
    DialogStep, Entity, EntityId, EntityKind, InteractError, InteractionEffect, Npc, Reward,
    SceneBuildFn, SceneFactory, StaticObject, TextureRef,
};
pub use geometry::{Rect, Vec2};
pub use inventory::{GrantOutcome, Inventory, InventoryEntry};
pub use scene::{
    ActiveDialog, DialogState, PlayerSetup, Scene, SceneError, DEFAULT_INTERACT_DISTANCE,
};
