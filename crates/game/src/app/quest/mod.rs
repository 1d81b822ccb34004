//! The nine-step word quest: walk to a highlighted character, hear them say
//! their word, and carry a flower from the meadow back to grandmother.
//!
//! Every step is a factory building a fresh scene on demand; nothing here
//! keeps a built scene around.

use quest_engine::{Entity, Npc, PlayerSetup, Rect, Reward, Scene, SceneError, SceneFactory, Vec2};

const BACKGROUND_TEXTURE: &str = "sprites/backgrounds/root.png";
const HOUSE1_TEXTURE: &str = "sprites/objects/house1.png";
const HOUSE2_TEXTURE: &str = "sprites/objects/house2.png";
const GRANDPA_TEXTURE: &str = "sprites/objects/grandpa.png";
const GRANDPA_HIGHLIGHT_TEXTURE: &str = "sprites/objects/grandpa_highlited.png";
const GRANDMA_TEXTURE: &str = "sprites/objects/grandma.png";
const GRANDMA_HIGHLIGHT_TEXTURE: &str = "sprites/objects/grandma_highlited.png";
const FLOWER_TEXTURE: &str = "sprites/objects/flower.png";
const FLOWER_HIGHLIGHT_TEXTURE: &str = "sprites/objects/flower_highlited.png";
const PLAYER_TEXTURE: &str = "sprites/bahtiyar/down0.png";

const PLAYER_SPAWN: Vec2 = Vec2::new(230.0, 220.0);
const PLAYER_OFF_SCREEN: Vec2 = Vec2::new(-100.0, -100.0);
const PLAYER_SIZE: Vec2 = Vec2::new(16.0, 16.0);
const PLAYER_WALK_Z: i32 = 3;
const PLAYER_HIDDEN_Z: i32 = -1;
const INTERACT_DISTANCE: f32 = 28.0;

pub(crate) const SCENE1: SceneFactory = SceneFactory::new("scene1", scene1);
pub(crate) const SCENE2: SceneFactory = SceneFactory::new("scene2", scene2);
pub(crate) const SCENE3: SceneFactory = SceneFactory::new("scene3", scene3);
pub(crate) const SCENE4: SceneFactory = SceneFactory::new("scene4", scene4);
pub(crate) const SCENE5: SceneFactory = SceneFactory::new("scene5", scene5);
pub(crate) const SCENE6: SceneFactory = SceneFactory::new("scene6", scene6);
pub(crate) const SCENE7: SceneFactory = SceneFactory::new("scene7", scene7);
pub(crate) const SCENE8: SceneFactory = SceneFactory::new("scene8", scene8);
pub(crate) const SCENE9: SceneFactory = SceneFactory::new("scene9", scene9);

pub(crate) const QUEST_CHAIN: [SceneFactory; 9] = [
    SCENE1, SCENE2, SCENE3, SCENE4, SCENE5, SCENE6, SCENE7, SCENE8, SCENE9,
];
pub(crate) const ENTRY_SCENE: SceneFactory = SCENE1;
pub(crate) const FINAL_SCENE: SceneFactory = SCENE9;

pub(crate) fn quest_scene(scene_id: &str) -> Option<SceneFactory> {
    QUEST_CHAIN
        .iter()
        .copied()
        .find(|factory| factory.scene_id() == scene_id)
}

fn world_rect() -> Rect {
    Rect::new(0.0, 0.0, 496.0, 279.0)
}

fn background() -> Entity {
    Entity::static_object("bg", world_rect(), BACKGROUND_TEXTURE)
        .with_z(0)
        .with_scale_texture_to_rect(true)
}

fn houses() -> [Entity; 2] {
    [
        Entity::static_object("house1", Rect::new(40.0, 120.0, 120.0, 200.0), HOUSE1_TEXTURE)
            .with_z(1),
        Entity::static_object("house2", Rect::new(336.0, 120.0, 416.0, 200.0), HOUSE2_TEXTURE)
            .with_z(1),
    ]
}

fn grandpa(z: i32) -> Entity {
    Entity::static_object("babay", Rect::new(360.0, 150.0, 420.0, 260.0), GRANDPA_TEXTURE)
        .with_z(z)
}

fn grandma(z: i32) -> Entity {
    Entity::static_object("ebi", Rect::new(80.0, 150.0, 140.0, 260.0), GRANDMA_TEXTURE).with_z(z)
}

fn flower(z: i32) -> Entity {
    Entity::static_object("flower", Rect::new(236.0, 210.0, 260.0, 238.0), FLOWER_TEXTURE)
        .with_z(z)
}

/// Marks a small character as the next thing to walk to.
fn highlighted(entity: Entity, texture: &str, next_scene: SceneFactory) -> Entity {
    Entity {
        texture: texture.into(),
        ..entity
    }
    .with_interactable(true)
    .with_next_scene(next_scene)
}

fn close_up(id: &str, name: &str, rect: Rect, texture: &str, npc: Npc) -> Entity {
    Entity::npc(id, rect, texture, npc.with_persist_progress(true))
        .with_name(name)
        .with_interactable(true)
        .with_z(2)
}

fn walking_scene(id: &str, props: [Entity; 3]) -> Result<Scene, SceneError> {
    let player = PlayerSetup::new(PLAYER_SPAWN, PLAYER_SIZE, PLAYER_TEXTURE)
        .with_scale_texture_to_rect(true)
        .with_z(PLAYER_WALK_Z);
    let [house1, house2] = houses();
    let mut entities = vec![background(), house1, house2];
    entities.extend(props);
    Ok(Scene::new(id, entities, player)?
        .with_interact_distance(INTERACT_DISTANCE)
        .with_world_bounds(world_rect()))
}

/// Close-up conversation: the player waits off screen behind the background
/// and the scene opens already talking.
fn dialog_scene(id: &str, props: [Entity; 2], speaker: Entity) -> Result<Scene, SceneError> {
    let player = PlayerSetup::new(PLAYER_OFF_SCREEN, PLAYER_SIZE, PLAYER_TEXTURE)
        .with_z(PLAYER_HIDDEN_Z);
    let speaker_id = speaker.id.clone();
    let [house1, house2] = houses();
    let mut entities = vec![background(), house1, house2];
    entities.extend(props);
    entities.push(speaker);
    let mut scene = Scene::new(id, entities, player)?.with_world_bounds(world_rect());
    scene.start_dialog_with(speaker_id.as_str())?;
    Ok(scene)
}

fn scene1() -> Result<Scene, SceneError> {
    walking_scene(
        "scene1",
        [
            highlighted(grandpa(2), GRANDPA_HIGHLIGHT_TEXTURE, SCENE2).with_name("Бабай"),
            grandma(2).with_name("Әби"),
            flower(2).with_name("Чәчәк"),
        ],
    )
}

fn scene2() -> Result<Scene, SceneError> {
    dialog_scene(
        "scene2",
        [grandma(1), flower(1)],
        close_up(
            "babay_big",
            "Бабай",
            Rect::new(20.0, 20.0, 220.0, 259.0),
            GRANDPA_TEXTURE,
            Npc::new(["Сәлам!"])
                .with_reward(Reward::new("бабай", GRANDPA_TEXTURE))
                .with_next_scene(SCENE3),
        ),
    )
}

fn scene3() -> Result<Scene, SceneError> {
    walking_scene(
        "scene3",
        [
            grandpa(2),
            highlighted(grandma(2), GRANDMA_HIGHLIGHT_TEXTURE, SCENE4).with_name("Әби"),
            flower(2),
        ],
    )
}

fn scene4() -> Result<Scene, SceneError> {
    dialog_scene(
        "scene4",
        [grandpa(1), flower(1)],
        close_up(
            "ebi_big",
            "Әби",
            Rect::new(20.0, 20.0, 220.0, 259.0),
            GRANDMA_TEXTURE,
            Npc::new(["Исәнмесез, бир миңа чәчәк"])
                .with_reward(Reward::new("әби", GRANDMA_TEXTURE))
                .with_next_scene(SCENE5),
        ),
    )
}

fn scene5() -> Result<Scene, SceneError> {
    walking_scene(
        "scene5",
        [
            grandpa(2),
            grandma(2),
            highlighted(flower(2), FLOWER_HIGHLIGHT_TEXTURE, SCENE6).with_name("Чәчәк"),
        ],
    )
}

fn scene6() -> Result<Scene, SceneError> {
    dialog_scene(
        "scene6",
        [grandpa(1), grandma(1)],
        close_up(
            "flower_big",
            "Чәчәк",
            Rect::new(150.0, 30.0, 346.0, 250.0),
            FLOWER_TEXTURE,
            Npc::new(["Чәчәк"])
                .with_reward(Reward::new("чәчәк", FLOWER_TEXTURE))
                .with_next_scene(SCENE7),
        ),
    )
}

fn scene7() -> Result<Scene, SceneError> {
    walking_scene(
        "scene7",
        [
            grandpa(2),
            highlighted(grandma(2), GRANDMA_HIGHLIGHT_TEXTURE, SCENE8).with_name("Әби"),
            flower(2),
        ],
    )
}

fn scene8() -> Result<Scene, SceneError> {
    dialog_scene(
        "scene8",
        [grandpa(1), flower(1)],
        close_up(
            "ebi_big_final",
            "Әби",
            Rect::new(20.0, 20.0, 220.0, 259.0),
            GRANDMA_TEXTURE,
            Npc::new(["Рәхмәт"]).with_next_scene(SCENE9),
        ),
    )
}

fn scene9() -> Result<Scene, SceneError> {
    walking_scene("scene9", [grandpa(2), grandma(2), flower(2)])
}
