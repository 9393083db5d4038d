use std::sync::Arc;

use crate::animation::AnimationTable;
use crate::constants::*;
use crate::types::*;

/// Tunables built from the compile-time defaults.
pub fn default_config() -> GameConfig {
    GameConfig {
        screen_width: SCREEN_WIDTH,
        screen_height: SCREEN_HEIGHT,
        fps: FPS,
        player_vel: PLAYER_VEL,
        gravity: GRAVITY,
        jump_power: JUMP_POWER,
        animation_delay: ANIMATION_DELAY,
        hit_delay: HIT_DELAY,
        fall_threshold: FALL_THRESHOLD,
        spawn_stagger: SPAWN_STAGGER,
        damage_cooldown_ms: DAMAGE_COOLDOWN_MS,
        fall_cooldown_ms: FALL_COOLDOWN_MS,
        ground_probe_stride: GROUND_PROBE_STRIDE,
        camera_lerp: 1.0,
    }
}

/// Spawn position for a player slot: the level start shifted right by
/// `slot * stagger`.
pub fn spawn_point(start: Point, slot: usize, stagger: i32) -> Point {
    Point::new(start.x + slot as i32 * stagger, start.y)
}

/// Fresh player at `at`, idle and facing left, sized to the idle sheet.
pub fn spawn_player(slot: usize, at: Point, sprites: Arc<AnimationTable>) -> Player {
    let hitbox = sprites.hitbox(SpriteState::Idle, Facing::Left);
    Player {
        slot,
        rect: Rect::new(at.x, at.y, hitbox.width, hitbox.height),
        vx: 0.0,
        vy: 0.0,
        facing: Facing::Left,
        jump_count: 0,
        fall_count: 0,
        hit: false,
        hit_count: 0,
        grounded: false,
        animation_count: 0,
        sprite_state: SpriteState::Idle,
        frame: 0,
        last_damage_ms: None,
        last_fall_penalty_ms: None,
        hitbox,
        sprites,
    }
}

/// One player per slot, each with its roster character, staggered from `start`.
pub fn spawn_players(
    count: usize,
    start: Point,
    roster: &[Arc<AnimationTable>],
    config: &GameConfig,
) -> Vec<Player> {
    roster
        .iter()
        .take(count)
        .enumerate()
        .map(|(slot, sprites)| {
            spawn_player(
                slot,
                spawn_point(start, slot, config.spawn_stagger),
                Arc::clone(sprites),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::default_roster;

    #[test]
    fn default_config_matches_constants() {
        let config = default_config();
        assert_eq!(config.screen(), Dimensions { width: 1000, height: 800 });
        assert_eq!(config.fps, 60);
        assert_eq!(config.gravity * config.jump_power, 9.0);
        assert_eq!(config.fall_threshold, 715);
        assert_eq!(config.camera_lerp, 1.0);
        assert_eq!(GameConfig::default(), config);
    }

    #[test]
    fn partial_config_json_keeps_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"gravity": 2.0}"#).unwrap();
        assert_eq!(config.gravity, 2.0);
        assert_eq!(config.player_vel, PLAYER_VEL);
    }

    #[test]
    fn spawned_player_is_idle_and_sized_to_sheet() {
        let p = spawn_player(2, Point::new(40, 60), Arc::new(AnimationTable::solid(26, 70, 2)));
        assert_eq!(p.slot, 2);
        assert_eq!(p.rect, Rect::new(40, 60, 26, 70));
        assert_eq!(p.sprite_state, SpriteState::Idle);
        assert_eq!(p.facing, Facing::Left);
        assert!(!p.grounded);
        assert_eq!(p.jump_count, 0);
        assert_eq!(p.last_fall_penalty_ms, None);
    }

    #[test]
    fn players_are_staggered_per_slot() {
        let config = default_config();
        let roster: Vec<_> = default_roster().into_iter().map(Arc::new).collect();
        let players = spawn_players(3, Point::new(50, 400), &roster, &config);
        assert_eq!(players.len(), 3);
        let xs: Vec<i32> = players.iter().map(|p| p.rect.x).collect();
        assert_eq!(xs, vec![50, 150, 250]);
        assert!(players.iter().all(|p| p.rect.y == 400));
        // Each slot gets its own character size.
        assert_eq!((players[1].rect.width, players[1].rect.height), (30, 84));
    }
}
