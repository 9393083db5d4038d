use crate::collision::{is_grounded, probe, resolve_vertical};
use crate::constants::*;
use crate::physics::{jump, move_left, move_right};
use crate::types::*;

/// Fixed key triples for player slots 0..4.
pub const PLAYER_BINDINGS: [KeyBindings; MAX_PLAYERS] = [
    KeyBindings { left: Key::Left, right: Key::Right, jump: Key::Up },
    KeyBindings { left: Key::A, right: Key::D, jump: Key::W },
    KeyBindings { left: Key::J, right: Key::L, jump: Key::I },
    KeyBindings { left: Key::F, right: Key::H, jump: Key::G },
];

pub const RESTART_KEY: Key = Key::R;

/// Turn held keys into velocity for one player. Walls are looked for one
/// double step ahead, so movement stops before the mask would touch.
pub fn apply_player_input(
    p: &mut Player,
    obstacles: &[Obstacle],
    keys: &KeySet,
    bindings: &KeyBindings,
    config: &GameConfig,
) -> (Option<usize>, Option<usize>) {
    p.vx = 0.0;
    let reach = (config.player_vel * 2.0) as i32;
    let blocked_left = probe(p, obstacles, -reach, 0);
    let blocked_right = probe(p, obstacles, reach, 0);

    if keys.contains(bindings.left) && blocked_left.is_none() {
        move_left(p, config.player_vel);
    }
    if keys.contains(bindings.right) && blocked_right.is_none() {
        move_right(p, config.player_vel);
    }
    // Input can only start the first jump; see INPUT_JUMP_GATE.
    if keys.contains(bindings.jump) && p.jump_count < INPUT_JUMP_GATE && jump(p, config) {
        log::debug!("player {} jumped", p.slot);
    }

    (blocked_left, blocked_right)
}

/// Full per-player input pass: key mapping, ground probe, then vertical
/// collision against the already integrated position. Returns the indices of
/// every obstacle touched this frame, in probe order.
pub fn resolve_player(
    p: &mut Player,
    obstacles: &[Obstacle],
    keys: &KeySet,
    bindings: &KeyBindings,
    config: &GameConfig,
) -> Vec<usize> {
    let (left, right) = apply_player_input(p, obstacles, keys, bindings, config);

    p.grounded = is_grounded(p, obstacles, config.ground_probe_stride);
    let dy = p.vy;
    let vertical = resolve_vertical(p, obstacles, dy);

    let mut touched = Vec::new();
    for i in left.into_iter().chain(right).chain(vertical) {
        if !touched.contains(&i) {
            touched.push(i);
        }
    }
    touched
}
