use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Rect;
use super::scene::{Scene, SceneError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Opaque handle for the rendering collaborator. Never opened here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureRef(String);

impl TextureRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TextureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TextureRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TextureRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

pub type SceneBuildFn = fn() -> Result<Scene, SceneError>;

/// Deferred scene constructor, identified by the id of the scene it builds.
/// Holding one never builds anything; `build` runs the constructor.
#[derive(Clone, Copy)]
pub struct SceneFactory {
    scene_id: &'static str,
    build: SceneBuildFn,
}

impl SceneFactory {
    pub const fn new(scene_id: &'static str, build: SceneBuildFn) -> Self {
        Self { scene_id, build }
    }

    pub fn scene_id(&self) -> &'static str {
        self.scene_id
    }

    pub fn build(&self) -> Result<Scene, SceneError> {
        (self.build)()
    }
}

impl fmt::Debug for SceneFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SceneFactory").field(&self.scene_id).finish()
    }
}

impl PartialEq for SceneFactory {
    fn eq(&self, other: &Self) -> bool {
        self.scene_id == other.scene_id
    }
}

impl Eq for SceneFactory {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub word: String,
    pub texture: TextureRef,
}

impl Reward {
    pub fn new(word: impl Into<String>, texture: impl Into<TextureRef>) -> Self {
        Self {
            word: word.into(),
            texture: texture.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticObject {
    pub next_scene: Option<SceneFactory>,
}

#[derive(Debug, Clone)]
pub struct Npc {
    pub dialog_lines: Vec<String>,
    pub repeatable: bool,
    pub persist_progress: bool,
    pub reward: Option<Reward>,
    pub next_scene: Option<SceneFactory>,
    completed: bool,
    reward_granted: bool,
}

impl Npc {
    pub fn new<I, S>(dialog_lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dialog_lines: dialog_lines.into_iter().map(Into::into).collect(),
            repeatable: false,
            persist_progress: false,
            reward: None,
            next_scene: None,
            completed: false,
            reward_granted: false,
        }
    }

    pub fn with_repeatable(mut self, repeatable: bool) -> Self {
        self.repeatable = repeatable;
        self
    }

    pub fn with_persist_progress(mut self, persist_progress: bool) -> Self {
        self.persist_progress = persist_progress;
        self
    }

    pub fn with_reward(mut self, reward: Reward) -> Self {
        self.reward = Some(reward);
        self
    }

    pub fn with_next_scene(mut self, next_scene: SceneFactory) -> Self {
        self.next_scene = Some(next_scene);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn reward_granted(&self) -> bool {
        self.reward_granted
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.dialog_lines.get(index).map(String::as_str)
    }

    fn advance(&mut self, source: EntityId, shown_line: Option<usize>) -> InteractionEffect {
        let mut effect = InteractionEffect::empty(source);
        if shown_line.is_none() && !self.dialog_lines.is_empty() {
            effect.dialog = Some(DialogStep::Started { line_index: 0 });
            return effect;
        }

        let next_line = shown_line.map_or(0, |index| index + 1);
        if next_line < self.dialog_lines.len() {
            effect.dialog = Some(DialogStep::Advanced {
                line_index: next_line,
            });
            return effect;
        }

        effect.dialog = Some(DialogStep::Finished);
        if !self.reward_granted {
            if let Some(reward) = &self.reward {
                effect.grant_word = Some(reward.clone());
                self.reward_granted = true;
            }
        }
        effect.transition_to = self.next_scene;
        effect.mark_completed = self.persist_progress || !self.repeatable;
        if effect.mark_completed {
            self.completed = true;
        }
        effect
    }
}

#[derive(Debug, Clone)]
pub enum EntityKind {
    Static(StaticObject),
    Npc(Npc),
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub name: Option<String>,
    pub rect: Rect,
    pub solid: bool,
    pub interactable: bool,
    pub texture: TextureRef,
    pub z: i32,
    pub scale_texture_to_rect: bool,
    pub kind: EntityKind,
}

impl Entity {
    pub fn static_object(
        id: impl Into<EntityId>,
        rect: Rect,
        texture: impl Into<TextureRef>,
    ) -> Self {
        Self::with_kind(id, rect, texture, EntityKind::Static(StaticObject::default()))
    }

    pub fn npc(
        id: impl Into<EntityId>,
        rect: Rect,
        texture: impl Into<TextureRef>,
        npc: Npc,
    ) -> Self {
        Self::with_kind(id, rect, texture, EntityKind::Npc(npc))
    }

    fn with_kind(
        id: impl Into<EntityId>,
        rect: Rect,
        texture: impl Into<TextureRef>,
        kind: EntityKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: None,
            rect,
            solid: false,
            interactable: false,
            texture: texture.into(),
            z: 0,
            scale_texture_to_rect: false,
            kind,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub fn with_solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }

    pub fn with_interactable(mut self, interactable: bool) -> Self {
        self.interactable = interactable;
        self
    }

    pub fn with_scale_texture_to_rect(mut self, scale: bool) -> Self {
        self.scale_texture_to_rect = scale;
        self
    }

    /// Static objects transition on interact; NPCs transition once their
    /// dialog completes.
    pub fn with_next_scene(mut self, next_scene: SceneFactory) -> Self {
        match &mut self.kind {
            EntityKind::Static(object) => object.next_scene = Some(next_scene),
            EntityKind::Npc(npc) => npc.next_scene = Some(next_scene),
        }
        self
    }

    pub fn as_npc(&self) -> Option<&Npc> {
        match &self.kind {
            EntityKind::Npc(npc) => Some(npc),
            EntityKind::Static(_) => None,
        }
    }

    pub fn is_npc(&self) -> bool {
        self.as_npc().is_some()
    }

    pub fn is_interactable(&self) -> bool {
        if !self.interactable {
            return false;
        }
        match &self.kind {
            EntityKind::Static(_) => true,
            EntityKind::Npc(npc) => !(npc.completed && !npc.repeatable),
        }
    }

    /// `shown_line` is the dialog line currently on screen when this entity
    /// owns the scene's active dialog, `None` otherwise. NPC progress is
    /// updated in place; the dialog state itself belongs to the scene.
    pub fn on_interact(
        &mut self,
        shown_line: Option<usize>,
    ) -> Result<InteractionEffect, InteractError> {
        if !self.is_interactable() {
            return Err(InteractError::PreconditionViolation {
                entity_id: self.id.clone(),
            });
        }
        let source = self.id.clone();
        match &mut self.kind {
            EntityKind::Static(object) => Ok(InteractionEffect {
                transition_to: object.next_scene,
                ..InteractionEffect::empty(source)
            }),
            EntityKind::Npc(npc) => Ok(npc.advance(source, shown_line)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum DialogStep {
    Started { line_index: usize },
    Advanced { line_index: usize },
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionEffect {
    pub source: EntityId,
    pub dialog: Option<DialogStep>,
    pub grant_word: Option<Reward>,
    pub transition_to: Option<SceneFactory>,
    pub mark_completed: bool,
}

impl InteractionEffect {
    fn empty(source: EntityId) -> Self {
        Self {
            source,
            dialog: None,
            grant_word: None,
            transition_to: None,
            mark_completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractError {
    #[error("interact called on non-interactable entity '{entity_id}'")]
    PreconditionViolation { entity_id: EntityId },
    #[error("no interaction target in range")]
    NoInteractionTarget,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::scene::PlayerSetup;
    use crate::world::Vec2;

    fn empty_scene() -> Result<Scene, SceneError> {
        Scene::new(
            "empty",
            Vec::new(),
            PlayerSetup::new(Vec2::ZERO, Vec2::new(16.0, 16.0), "player.png"),
        )
    }

    fn other_scene() -> Result<Scene, SceneError> {
        Scene::new(
            "other",
            Vec::new(),
            PlayerSetup::new(Vec2::ZERO, Vec2::new(16.0, 16.0), "player.png"),
        )
    }

    fn door(next_scene: Option<SceneFactory>) -> Entity {
        let door = Entity::static_object("door", Rect::new(0.0, 0.0, 10.0, 10.0), "door.png")
            .with_interactable(true);
        match next_scene {
            Some(factory) => door.with_next_scene(factory),
            None => door,
        }
    }

    fn talker(npc: Npc) -> Entity {
        Entity::npc("talker", Rect::new(0.0, 0.0, 10.0, 10.0), "talker.png", npc)
            .with_interactable(true)
    }

    #[test]
    fn static_object_effect_carries_transition_without_reward() {
        let factory = SceneFactory::new("empty", empty_scene);
        let mut entity = door(Some(factory));

        let effect = entity.on_interact(None).expect("interact");

        assert_eq!(effect.source, EntityId::from("door"));
        assert_eq!(effect.grant_word, None);
        assert_eq!(effect.transition_to, Some(factory));
        assert_eq!(effect.dialog, None);
        assert!(!effect.mark_completed);
        assert!(entity.is_interactable());
    }

    #[test]
    fn static_object_without_factory_is_a_plain_no_op() {
        let mut entity = door(None);
        let effect = entity.on_interact(None).expect("interact");
        assert_eq!(effect.transition_to, None);
        assert_eq!(effect.grant_word, None);
    }

    #[test]
    fn non_interactable_entity_reports_precondition_violation() {
        let mut entity =
            Entity::static_object("bg", Rect::new(0.0, 0.0, 496.0, 279.0), "bg.png");
        let error = entity.on_interact(None).expect_err("must fail");
        assert_eq!(
            error,
            InteractError::PreconditionViolation {
                entity_id: EntityId::from("bg")
            }
        );
    }

    #[test]
    fn npc_starts_then_advances_then_finishes() {
        let reward = Reward::new("word", "word.png");
        let mut entity = talker(
            Npc::new(["one", "two"])
                .with_reward(reward.clone())
                .with_next_scene(SceneFactory::new("empty", empty_scene)),
        );

        let started = entity.on_interact(None).expect("start");
        assert_eq!(started.dialog, Some(DialogStep::Started { line_index: 0 }));
        assert_eq!(started.grant_word, None);

        let advanced = entity.on_interact(Some(0)).expect("advance");
        assert_eq!(advanced.dialog, Some(DialogStep::Advanced { line_index: 1 }));
        assert_eq!(advanced.transition_to, None);

        let finished = entity.on_interact(Some(1)).expect("finish");
        assert_eq!(finished.dialog, Some(DialogStep::Finished));
        assert_eq!(finished.grant_word, Some(reward));
        assert_eq!(
            finished.transition_to.map(|factory| factory.scene_id()),
            Some("empty")
        );
        assert!(finished.mark_completed);
        assert!(!entity.is_interactable());
    }

    #[test]
    fn repeatable_npc_without_persist_stays_interactable_and_rewards_once() {
        let mut entity = talker(
            Npc::new(["hi"])
                .with_repeatable(true)
                .with_reward(Reward::new("hi", "hi.png")),
        );

        let first = entity.on_interact(Some(0)).expect("first finish");
        assert!(first.grant_word.is_some());
        assert!(!first.mark_completed);
        assert!(entity.is_interactable());

        let restarted = entity.on_interact(None).expect("restart");
        assert_eq!(restarted.dialog, Some(DialogStep::Started { line_index: 0 }));
        let second = entity.on_interact(Some(0)).expect("second finish");
        assert_eq!(second.dialog, Some(DialogStep::Finished));
        assert_eq!(second.grant_word, None);
    }

    #[test]
    fn repeatable_npc_with_persist_is_marked_completed_but_still_interactable() {
        let mut entity = talker(
            Npc::new(["hi"])
                .with_repeatable(true)
                .with_persist_progress(true),
        );
        let effect = entity.on_interact(Some(0)).expect("finish");
        assert!(effect.mark_completed);
        assert!(entity.as_npc().expect("npc").is_completed());
        assert!(entity.is_interactable());
    }

    #[test]
    fn npc_without_lines_finishes_on_first_interact() {
        let mut entity = talker(Npc::new(Vec::<String>::new()));
        let effect = entity.on_interact(None).expect("interact");
        assert_eq!(effect.dialog, Some(DialogStep::Finished));
    }

    #[test]
    fn factories_compare_by_scene_id_and_build_lazily() {
        let a = SceneFactory::new("empty", empty_scene);
        let b = SceneFactory::new("other", other_scene);
        assert_ne!(a, b);
        assert_eq!(a, SceneFactory::new("empty", empty_scene));
        assert_eq!(format!("{a:?}"), "SceneFactory(\"empty\")");
        assert_eq!(b.build().expect("build").id(), "other");
    }
}
