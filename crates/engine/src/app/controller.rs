use thiserror::Error;
use tracing::{debug, info, warn};

use super::input::{FrameInput, MoveIntent};
use super::snapshot::{FrameResult, SceneSnapshot};
use crate::world::{
    GrantOutcome, InteractError, InteractionEffect, Inventory, Rect, Scene, SceneError,
    SceneFactory, Vec2,
};

pub const DEFAULT_MOVE_SPEED: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    /// World units walked per tick at full intent.
    pub move_speed: f32,
    pub solid_collision: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            solid_collision: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum TickError {
    #[error(transparent)]
    Interact(#[from] InteractError),
    #[error("failed to build scene '{scene_id}': {source}")]
    SceneBuild {
        scene_id: &'static str,
        #[source]
        source: SceneError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedEffect {
    pub granted_word: Option<String>,
    pub transitioned_to: Option<&'static str>,
}

/// Owns the active scene, the player and the inventory. Every mutation goes
/// through `advance` or the two `apply_*` calls it is made of.
#[derive(Debug)]
pub struct QuestController {
    config: ControllerConfig,
    scene: Scene,
    player: Rect,
    inventory: Inventory,
    tick: u64,
}

impl QuestController {
    pub fn new(config: ControllerConfig, entry: SceneFactory) -> Result<Self, TickError> {
        let scene = build_scene(entry)?;
        Ok(Self::from_scene(config, scene))
    }

    pub fn from_scene(config: ControllerConfig, scene: Scene) -> Self {
        let player = scene.player_setup().spawn_rect();
        info!(
            scene = scene.id(),
            entity_count = scene.entities().len(),
            in_dialog = scene.is_in_dialog(),
            "scene_loaded"
        );
        Self {
            config,
            scene,
            player,
            inventory: Inventory::default(),
            tick: 0,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn player_rect(&self) -> Rect {
        self.player
    }

    /// Interaction range is measured from the player's center.
    pub fn player_position(&self) -> Vec2 {
        self.player.center()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn advance_input(&mut self, input: &FrameInput) -> Result<FrameResult, TickError> {
        self.advance(input.move_intent(), input.interact_pressed())
    }

    pub fn advance(
        &mut self,
        movement: MoveIntent,
        interact: bool,
    ) -> Result<FrameResult, TickError> {
        self.tick = self.tick.saturating_add(1);
        self.apply_movement(movement);

        let mut applied = AppliedEffect::default();
        if interact {
            match self.scene.interact(self.player.center()) {
                Ok(effect) => applied = self.apply_interaction_effect(&effect)?,
                Err(InteractError::NoInteractionTarget) => {
                    debug!(tick = self.tick, scene = self.scene.id(), "interaction_ignored");
                }
                Err(error) => return Err(error.into()),
            }
        }

        Ok(self.frame_result(applied))
    }

    /// Returns whether the player moved. Ignored while a dialog runs. With
    /// solid collision on, a move is rejected when it leaves the player
    /// overlapping a solid, unless it reduces an existing overlap.
    pub fn apply_movement(&mut self, intent: MoveIntent) -> bool {
        if self.scene.is_in_dialog() {
            return false;
        }
        let step = intent.step(self.config.move_speed);
        if step == Vec2::ZERO {
            return false;
        }

        let mut next = self.player.translated(step.x, step.y);
        if let Some(bounds) = self.scene.world_bounds() {
            next = next.clamped_within(bounds);
        }

        if self.config.solid_collision {
            let current = self.player;
            // A move ending inside a solid is allowed only while it shrinks an
            // overlap the player already had.
            let blocker = self.scene.solid_entities().find(|entity| {
                let after = entity.rect.overlap_area(&next);
                after > 0.0 && after >= entity.rect.overlap_area(&current)
            });
            if let Some(blocker) = blocker {
                debug!(
                    scene = self.scene.id(),
                    blocker = %blocker.id,
                    "movement_blocked"
                );
                return false;
            }
        }

        let moved = next != self.player;
        self.player = next;
        moved
    }

    /// The next scene is built before anything else changes, so a failing
    /// factory leaves the inventory and the active scene untouched.
    pub fn apply_interaction_effect(
        &mut self,
        effect: &InteractionEffect,
    ) -> Result<AppliedEffect, TickError> {
        let next_scene = effect.transition_to.map(build_scene).transpose()?;
        let mut applied = AppliedEffect::default();

        if let Some(reward) = &effect.grant_word {
            match self.inventory.grant(reward) {
                GrantOutcome::Added => {
                    info!(
                        word = %reward.word,
                        texture = %reward.texture,
                        inventory_len = self.inventory.len(),
                        "word_granted"
                    );
                    applied.granted_word = Some(reward.word.clone());
                }
                GrantOutcome::AlreadyPresent => {
                    debug!(word = %reward.word, "word_already_known");
                }
            }
        }

        if let Some(scene) = next_scene {
            let from = self.scene.id().to_string();
            if !scene.spawn_is_off_screen() {
                self.player = scene.player_setup().spawn_rect();
            }
            self.scene = scene;
            applied.transitioned_to = effect.transition_to.map(|factory| factory.scene_id());
            info!(
                from = %from,
                to = self.scene.id(),
                source = %effect.source,
                in_dialog = self.scene.is_in_dialog(),
                "scene_transition"
            );
        }

        Ok(applied)
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot::capture(&self.scene, self.player)
    }

    fn frame_result(&self, applied: AppliedEffect) -> FrameResult {
        FrameResult {
            tick: self.tick,
            scene: self.snapshot(),
            inventory: self.inventory.entries().to_vec(),
            granted_word: applied.granted_word,
            transitioned_to: applied.transitioned_to.map(str::to_string),
        }
    }
}

fn build_scene(factory: SceneFactory) -> Result<Scene, TickError> {
    factory.build().map_err(|source| {
        warn!(scene = factory.scene_id(), error = %source, "scene_build_failed");
        TickError::SceneBuild {
            scene_id: factory.scene_id(),
            source,
        }
    })
}
