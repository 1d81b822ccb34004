use quest_engine::{MoveIntent, QuestController, Scene, Vec2};

/// Closer than this to a target center the autopilot stops steering.
const ARRIVAL_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum AutopilotStep {
    Act { movement: MoveIntent, interact: bool },
    Done,
}

/// Walks toward the nearest interactable entity and presses interact once
/// something is in range. Dialogs are clicked through line by line.
pub(crate) fn next_step(controller: &QuestController) -> AutopilotStep {
    let scene = controller.scene();
    let position = controller.player_position();

    if scene.is_in_dialog() || scene.find_interaction_target(position).is_some() {
        return AutopilotStep::Act {
            movement: MoveIntent::IDLE,
            interact: true,
        };
    }

    match nearest_interactable_center(scene, position) {
        Some(target) => AutopilotStep::Act {
            movement: steer_toward(position, target),
            interact: false,
        },
        None => AutopilotStep::Done,
    }
}

fn nearest_interactable_center(scene: &Scene, position: Vec2) -> Option<Vec2> {
    scene
        .entities()
        .iter()
        .filter(|entity| entity.is_interactable())
        .map(|entity| (entity.rect.distance_to(position), entity.rect.center()))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, center)| center)
}

fn steer_toward(current: Vec2, target: Vec2) -> MoveIntent {
    let dx = target.x - current.x;
    let dy = target.y - current.y;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance <= ARRIVAL_THRESHOLD {
        return MoveIntent::IDLE;
    }

    let inv_distance = distance.recip();
    MoveIntent::new(dx * inv_distance, dy * inv_distance)
}
