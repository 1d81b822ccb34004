use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use super::entity::{DialogStep, Entity, EntityId, InteractError, InteractionEffect, TextureRef};
use super::geometry::{Rect, Vec2};

pub const DEFAULT_INTERACT_DISTANCE: f32 = 28.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("scene '{scene_id}' declares entity id '{entity_id}' more than once")]
    DuplicateEntityId {
        scene_id: String,
        entity_id: EntityId,
    },
    #[error("scene '{scene_id}' has no entity '{entity_id}'")]
    UnknownEntity {
        scene_id: String,
        entity_id: EntityId,
    },
    #[error("entity '{entity_id}' in scene '{scene_id}' is not an NPC")]
    NotAnNpc {
        scene_id: String,
        entity_id: EntityId,
    },
    #[error("NPC '{entity_id}' in scene '{scene_id}' has no dialog to start")]
    DialogUnavailable {
        scene_id: String,
        entity_id: EntityId,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialogState {
    #[default]
    Idle,
    InDialog {
        npc: usize,
        line_index: usize,
    },
}

#[derive(Debug, Clone)]
pub struct PlayerSetup {
    pub spawn: Vec2,
    pub size: Vec2,
    pub texture: TextureRef,
    pub scale_texture_to_rect: bool,
    pub z: i32,
}

impl PlayerSetup {
    pub fn new(spawn: Vec2, size: Vec2, texture: impl Into<TextureRef>) -> Self {
        Self {
            spawn,
            size,
            texture: texture.into(),
            scale_texture_to_rect: false,
            z: 0,
        }
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub fn with_scale_texture_to_rect(mut self, scale: bool) -> Self {
        self.scale_texture_to_rect = scale;
        self
    }

    pub fn spawn_rect(&self) -> Rect {
        Rect::from_origin_size(self.spawn, self.size)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ActiveDialog<'a> {
    pub npc: &'a Entity,
    pub line_index: usize,
    pub line: &'a str,
    pub line_count: usize,
}

#[derive(Debug, Clone)]
pub struct Scene {
    id: String,
    entities: Vec<Entity>,
    player: PlayerSetup,
    interact_distance: f32,
    world_bounds: Option<Rect>,
    dialog: DialogState,
}

impl Scene {
    pub fn new(
        id: impl Into<String>,
        entities: Vec<Entity>,
        player: PlayerSetup,
    ) -> Result<Self, SceneError> {
        let id = id.into();
        let mut seen = HashSet::with_capacity(entities.len());
        for entity in &entities {
            if !seen.insert(entity.id.as_str()) {
                return Err(SceneError::DuplicateEntityId {
                    scene_id: id,
                    entity_id: entity.id.clone(),
                });
            }
        }

        Ok(Self {
            id,
            entities,
            player,
            interact_distance: DEFAULT_INTERACT_DISTANCE,
            world_bounds: None,
            dialog: DialogState::Idle,
        })
    }

    pub fn with_interact_distance(mut self, interact_distance: f32) -> Self {
        self.interact_distance = interact_distance.max(0.0);
        self
    }

    /// Player movement is clamped to these bounds; usually the background.
    pub fn with_world_bounds(mut self, bounds: Rect) -> Self {
        self.world_bounds = Some(bounds);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id.as_str() == id)
    }

    pub fn player_setup(&self) -> &PlayerSetup {
        &self.player
    }

    pub fn interact_distance(&self) -> f32 {
        self.interact_distance
    }

    pub fn world_bounds(&self) -> Option<&Rect> {
        self.world_bounds.as_ref()
    }

    pub fn dialog_state(&self) -> DialogState {
        self.dialog
    }

    pub fn is_in_dialog(&self) -> bool {
        matches!(self.dialog, DialogState::InDialog { .. })
    }

    /// Cutscene scenes park the player outside the visible world.
    pub fn spawn_is_off_screen(&self) -> bool {
        self.world_bounds
            .is_some_and(|bounds| !bounds.intersects(&self.player.spawn_rect()))
    }

    pub fn solid_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|entity| entity.solid)
    }

    /// Ascending z; equal z keeps declaration order.
    pub fn entities_sorted_for_paint(&self) -> Vec<&Entity> {
        let mut sorted = self.entities.iter().collect::<Vec<_>>();
        sorted.sort_by_key(|entity| entity.z);
        sorted
    }

    pub fn find_interaction_target(&self, point: Vec2) -> Option<&Entity> {
        self.target_index(point).map(|index| &self.entities[index])
    }

    fn target_index(&self, point: Vec2) -> Option<usize> {
        let mut best: Option<(f32, usize)> = None;

        for (index, entity) in self.entities.iter().enumerate() {
            if let DialogState::InDialog { npc, .. } = self.dialog {
                if index != npc {
                    continue;
                }
            }
            if !entity.is_interactable() {
                continue;
            }
            let distance = entity.rect.distance_to(point);
            if distance > self.interact_distance {
                continue;
            }

            match best {
                Some((best_distance, _)) if best_distance <= distance => {}
                _ => best = Some((distance, index)),
            }
        }

        best.map(|(_, index)| index)
    }

    pub fn start_dialog_with(&mut self, npc_id: &str) -> Result<(), SceneError> {
        let index = self
            .entities
            .iter()
            .position(|entity| entity.id.as_str() == npc_id)
            .ok_or_else(|| SceneError::UnknownEntity {
                scene_id: self.id.clone(),
                entity_id: EntityId::new(npc_id),
            })?;
        let entity = &self.entities[index];
        let npc = entity.as_npc().ok_or_else(|| SceneError::NotAnNpc {
            scene_id: self.id.clone(),
            entity_id: entity.id.clone(),
        })?;
        if !entity.is_interactable() || npc.dialog_lines.is_empty() {
            return Err(SceneError::DialogUnavailable {
                scene_id: self.id.clone(),
                entity_id: entity.id.clone(),
            });
        }

        self.dialog = DialogState::InDialog {
            npc: index,
            line_index: 0,
        };
        debug!(scene = %self.id, npc = %entity.id, "dialog_started");
        Ok(())
    }

    pub fn active_dialog(&self) -> Option<ActiveDialog<'_>> {
        let DialogState::InDialog { npc, line_index } = self.dialog else {
            return None;
        };
        let entity = self.entities.get(npc)?;
        let dialog = entity.as_npc()?;
        Some(ActiveDialog {
            npc: entity,
            line_index,
            line: dialog.line(line_index)?,
            line_count: dialog.dialog_lines.len(),
        })
    }

    /// The active dialog NPC takes every interact while a dialog runs; otherwise
    /// the nearest interactable entity in range does.
    pub fn interact(&mut self, point: Vec2) -> Result<InteractionEffect, InteractError> {
        let (index, shown_line) = match self.dialog {
            DialogState::InDialog { npc, line_index } => (npc, Some(line_index)),
            DialogState::Idle => (
                self.target_index(point)
                    .ok_or(InteractError::NoInteractionTarget)?,
                None,
            ),
        };
        let entity = self
            .entities
            .get_mut(index)
            .ok_or(InteractError::NoInteractionTarget)?;
        let effect = entity.on_interact(shown_line)?;

        self.dialog = match effect.dialog {
            Some(DialogStep::Started { line_index }) => {
                debug!(scene = %self.id, npc = %effect.source, "dialog_started");
                DialogState::InDialog {
                    npc: index,
                    line_index,
                }
            }
            Some(DialogStep::Advanced { line_index }) => {
                debug!(scene = %self.id, npc = %effect.source, line_index, "dialog_advanced");
                DialogState::InDialog {
                    npc: index,
                    line_index,
                }
            }
            Some(DialogStep::Finished) => {
                debug!(
                    scene = %self.id,
                    npc = %effect.source,
                    mark_completed = effect.mark_completed,
                    "dialog_finished"
                );
                DialogState::Idle
            }
            None => DialogState::Idle,
        };
        Ok(effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::entity::{Npc, Reward, SceneFactory};

    fn player() -> PlayerSetup {
        PlayerSetup::new(Vec2::new(230.0, 220.0), Vec2::new(16.0, 16.0), "player.png")
            .with_z(3)
    }

    fn prop(id: &str, rect: Rect, z: i32) -> Entity {
        Entity::static_object(id, rect, format!("{id}.png")).with_z(z)
    }

    fn empty_scene() -> Result<Scene, SceneError> {
        Scene::new("next", Vec::new(), player())
    }

    fn two_line_npc(id: &str, rect: Rect) -> Entity {
        Entity::npc(
            id,
            rect,
            "npc.png",
            Npc::new(["first", "second"])
                .with_persist_progress(true)
                .with_reward(Reward::new("word", "word.png"))
                .with_next_scene(SceneFactory::new("next", empty_scene)),
        )
        .with_interactable(true)
    }

    #[test]
    fn duplicate_entity_ids_are_rejected() {
        let rect = Rect::new(0.0, 0.0, 1.0, 1.0);
        let error = Scene::new("dup", vec![prop("a", rect, 0), prop("a", rect, 1)], player())
            .expect_err("duplicate");
        assert_eq!(
            error,
            SceneError::DuplicateEntityId {
                scene_id: "dup".to_string(),
                entity_id: EntityId::from("a"),
            }
        );
    }

    #[test]
    fn paint_order_is_stable_for_equal_z() {
        let rect = Rect::new(0.0, 0.0, 1.0, 1.0);
        let scene = Scene::new(
            "paint",
            vec![
                prop("top", rect, 2),
                prop("bg", rect, 0),
                prop("house1", rect, 1),
                prop("house2", rect, 1),
                prop("tree", rect, 1),
            ],
            player(),
        )
        .expect("scene");

        let ids = |scene: &Scene| {
            scene
                .entities_sorted_for_paint()
                .iter()
                .map(|entity| entity.id.to_string())
                .collect::<Vec<_>>()
        };
        let first = ids(&scene);
        assert_eq!(first, vec!["bg", "house1", "house2", "tree", "top"]);
        for _ in 0..5 {
            assert_eq!(ids(&scene), first);
        }
    }

    #[test]
    fn target_is_nearest_interactable_in_range() {
        let far = prop("far", Rect::new(100.0, 0.0, 110.0, 10.0), 1).with_interactable(true);
        let near = prop("near", Rect::new(20.0, 0.0, 30.0, 10.0), 1).with_interactable(true);
        let inert = prop("inert", Rect::new(0.0, 0.0, 10.0, 10.0), 1);
        let scene = Scene::new("pick", vec![far, inert, near], player()).expect("scene");

        let target = scene
            .find_interaction_target(Vec2::new(5.0, 5.0))
            .expect("target");
        assert_eq!(target.id.as_str(), "near");
        assert!(scene
            .find_interaction_target(Vec2::new(60.0, 5.0))
            .is_none());
    }

    #[test]
    fn equal_distance_ties_resolve_by_declaration_order() {
        let left = prop("left", Rect::new(0.0, 0.0, 10.0, 10.0), 1).with_interactable(true);
        let right = prop("right", Rect::new(20.0, 0.0, 30.0, 10.0), 1).with_interactable(true);
        let scene = Scene::new("tie", vec![left, right], player()).expect("scene");
        let target = scene
            .find_interaction_target(Vec2::new(15.0, 5.0))
            .expect("target");
        assert_eq!(target.id.as_str(), "left");
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let post = prop("post", Rect::new(0.0, 0.0, 10.0, 10.0), 1).with_interactable(true);
        let scene = Scene::new("edge", vec![post], player())
            .expect("scene")
            .with_interact_distance(5.0);
        assert!(scene
            .find_interaction_target(Vec2::new(15.0, 5.0))
            .is_some());
        assert!(scene
            .find_interaction_target(Vec2::new(15.5, 5.0))
            .is_none());
    }

    #[test]
    fn npc_dialog_walks_through_idle_and_in_dialog_states() {
        let npc = two_line_npc("elder", Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut scene = Scene::new("talk", vec![npc], player()).expect("scene");
        let here = Vec2::new(5.0, 5.0);

        let effect = scene.interact(here).expect("start");
        assert_eq!(effect.dialog, Some(DialogStep::Started { line_index: 0 }));
        assert_eq!(
            scene.dialog_state(),
            DialogState::InDialog {
                npc: 0,
                line_index: 0
            }
        );
        assert_eq!(scene.active_dialog().expect("dialog").line, "first");

        let effect = scene.interact(here).expect("advance");
        assert_eq!(effect.grant_word, None);
        assert_eq!(scene.active_dialog().expect("dialog").line, "second");

        let effect = scene.interact(here).expect("finish");
        assert_eq!(effect.dialog, Some(DialogStep::Finished));
        assert_eq!(effect.grant_word, Some(Reward::new("word", "word.png")));
        assert_eq!(
            effect.transition_to.map(|factory| factory.scene_id()),
            Some("next")
        );
        assert_eq!(scene.dialog_state(), DialogState::Idle);

        assert_eq!(
            scene.interact(here).expect_err("done"),
            InteractError::NoInteractionTarget
        );
    }

    #[test]
    fn started_dialog_needs_exactly_one_interact_per_line() {
        let npc = two_line_npc("elder", Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut scene = Scene::new("cutscene", vec![npc], player()).expect("scene");
        scene.start_dialog_with("elder").expect("start");
        let off_screen = Vec2::new(-100.0, -100.0);

        let first = scene.interact(off_screen).expect("line 1");
        assert!(first.grant_word.is_none());
        assert!(first.transition_to.is_none());

        let second = scene.interact(off_screen).expect("line 2");
        assert!(second.grant_word.is_some());
        assert!(second.transition_to.is_some());
        assert!(!scene.is_in_dialog());
    }

    #[test]
    fn active_dialog_blocks_other_targets() {
        let npc = two_line_npc("elder", Rect::new(0.0, 0.0, 10.0, 10.0));
        let sign = prop("sign", Rect::new(12.0, 0.0, 20.0, 10.0), 1).with_interactable(true);
        let mut scene = Scene::new("busy", vec![npc, sign], player()).expect("scene");

        scene.start_dialog_with("elder").expect("start");
        let at_sign = Vec2::new(16.0, 5.0);
        let target = scene.find_interaction_target(at_sign).expect("target");
        assert_eq!(target.id.as_str(), "elder");

        let far_away = Vec2::new(300.0, 300.0);
        assert!(scene.find_interaction_target(far_away).is_none());
        let effect = scene.interact(far_away).expect("dialog still advances");
        assert_eq!(effect.source, EntityId::from("elder"));
    }

    #[test]
    fn repeatable_npc_replays_from_first_line() {
        let npc = Entity::npc(
            "bard",
            Rect::new(0.0, 0.0, 10.0, 10.0),
            "bard.png",
            Npc::new(["la", "la la"]).with_repeatable(true),
        )
        .with_interactable(true);
        let mut scene = Scene::new("tavern", vec![npc], player()).expect("scene");
        let here = Vec2::new(5.0, 5.0);

        for _ in 0..3 {
            scene.interact(here).expect("line 1");
            scene.interact(here).expect("line 2");
            let done = scene.interact(here).expect("finish");
            assert_eq!(done.dialog, Some(DialogStep::Finished));
            assert!(!done.mark_completed);
        }
        scene.interact(here).expect("restart");
        assert_eq!(scene.active_dialog().expect("dialog").line_index, 0);
    }

    #[test]
    fn start_dialog_with_rejects_unknown_and_static_entities() {
        let sign = prop("sign", Rect::new(0.0, 0.0, 10.0, 10.0), 1).with_interactable(true);
        let mut scene = Scene::new("s", vec![sign], player()).expect("scene");

        assert!(matches!(
            scene.start_dialog_with("ghost"),
            Err(SceneError::UnknownEntity { .. })
        ));
        assert!(matches!(
            scene.start_dialog_with("sign"),
            Err(SceneError::NotAnNpc { .. })
        ));
        assert!(!scene.is_in_dialog());
    }

    #[test]
    fn off_screen_spawn_is_detected_against_world_bounds() {
        let bounds = Rect::new(0.0, 0.0, 496.0, 279.0);
        let on_screen = Scene::new("walk", Vec::new(), player())
            .expect("scene")
            .with_world_bounds(bounds);
        assert!(!on_screen.spawn_is_off_screen());

        let hidden = PlayerSetup::new(Vec2::new(-100.0, -100.0), Vec2::new(16.0, 16.0), "p.png");
        let cutscene = Scene::new("talk", Vec::new(), hidden)
            .expect("scene")
            .with_world_bounds(bounds);
        assert!(cutscene.spawn_is_off_screen());
    }
}
