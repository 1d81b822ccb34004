use serde::Serialize;

use crate::world::{EntityId, InventoryEntry, Rect, Scene, TextureRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaintSource {
    Entity { id: EntityId },
    Player,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaintItem {
    pub source: PaintSource,
    pub texture: TextureRef,
    pub rect: Rect,
    pub z: i32,
    pub scale_texture_to_rect: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogSnapshot {
    pub npc: EntityId,
    pub speaker: Option<String>,
    pub line_index: usize,
    pub line_count: usize,
    pub line: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSnapshot {
    pub scene_id: String,
    pub player: Rect,
    pub focus: Option<EntityId>,
    pub dialog: Option<DialogSnapshot>,
    pub paint: Vec<PaintItem>,
}

impl SceneSnapshot {
    pub fn capture(scene: &Scene, player: Rect) -> Self {
        let dialog = scene.active_dialog().map(|active| DialogSnapshot {
            npc: active.npc.id.clone(),
            speaker: active.npc.name.clone(),
            line_index: active.line_index,
            line_count: active.line_count,
            line: active.line.to_string(),
        });
        let focus = scene
            .find_interaction_target(player.center())
            .map(|entity| entity.id.clone());

        Self {
            scene_id: scene.id().to_string(),
            player,
            focus,
            dialog,
            paint: paint_list(scene, player),
        }
    }
}

/// Entities in paint order with the player sprite placed after every entity
/// sharing its z.
pub fn paint_list(scene: &Scene, player: Rect) -> Vec<PaintItem> {
    let setup = scene.player_setup();
    let mut items = Vec::with_capacity(scene.entities().len() + 1);
    let mut player_painted = false;

    for entity in scene.entities_sorted_for_paint() {
        if !player_painted && entity.z > setup.z {
            items.push(player_item(scene, player));
            player_painted = true;
        }
        items.push(PaintItem {
            source: PaintSource::Entity {
                id: entity.id.clone(),
            },
            texture: entity.texture.clone(),
            rect: entity.rect,
            z: entity.z,
            scale_texture_to_rect: entity.scale_texture_to_rect,
        });
    }
    if !player_painted {
        items.push(player_item(scene, player));
    }
    items
}

fn player_item(scene: &Scene, player: Rect) -> PaintItem {
    let setup = scene.player_setup();
    PaintItem {
        source: PaintSource::Player,
        texture: setup.texture.clone(),
        rect: player,
        z: setup.z,
        scale_texture_to_rect: setup.scale_texture_to_rect,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameResult {
    pub tick: u64,
    pub scene: SceneSnapshot,
    pub inventory: Vec<InventoryEntry>,
    pub granted_word: Option<String>,
    pub transitioned_to: Option<String>,
}
