use crate::animation::frame_index;
use crate::constants::*;
use crate::types::*;

/// Add a fractional displacement to a pixel coordinate, truncating toward zero.
fn shift(coord: i32, delta: f64) -> i32 {
    (coord as f64 + delta) as i32
}

/// Ramp vy by `min(1, fall_count / fps) * gravity`. Grounded players are skipped.
pub fn apply_gravity(p: &mut Player, config: &GameConfig) {
    if p.grounded {
        return;
    }
    let ramp = (p.fall_count as f64 / config.fps.max(1) as f64).min(1.0);
    p.vy += ramp * config.gravity;
}

/// Move the player's rectangle by its current velocity.
pub fn integrate(p: &mut Player) {
    p.rect.x = shift(p.rect.x, p.vx);
    p.rect.y = shift(p.rect.y, p.vy);
}

/// Advance the hit stun; it clears once the timer passes `fps * hit_delay`.
pub fn tick_hit(p: &mut Player, config: &GameConfig) {
    if p.hit {
        p.hit_count += 1;
    }
    if p.hit_count > config.fps * config.hit_delay {
        p.hit = false;
        p.hit_count = 0;
    }
}

/// Per-frame update: gravity, integration, hit stun, fall counter, sprite.
pub fn update_player(p: &mut Player, config: &GameConfig) {
    apply_gravity(p, config);
    integrate(p);
    tick_hit(p, config);
    p.fall_count += 1;
    update_sprite(p, config);
}

/// Priority cascade: hit > first-jump ascent > fall past 2g > running > idle.
/// Any other ascent (air jump, head-bump rebound) shows idle.
pub fn select_sprite_state(p: &Player, gravity: f64) -> SpriteState {
    if p.hit {
        SpriteState::Hit
    } else if p.vy < 0.0 {
        if p.jump_count == 1 {
            SpriteState::Jump
        } else {
            SpriteState::Idle
        }
    } else if p.vy > gravity * 2.0 {
        SpriteState::Fall
    } else if p.vx != 0.0 {
        SpriteState::Run
    } else {
        SpriteState::Idle
    }
}

/// Pick the sheet for the current physics state and advance its animation.
/// The hit-box is re-derived only when the (state, facing) sheet changes.
pub fn update_sprite(p: &mut Player, config: &GameConfig) {
    let state = select_sprite_state(p, config.gravity);
    if state != p.sprite_state {
        p.sprite_state = state;
        sync_hitbox(p);
    }

    let len = p.sprites.frames(state, p.facing).len();
    p.frame = frame_index(p.animation_count, config.animation_delay, len);
    p.animation_count += 1;
    if (p.animation_count / config.animation_delay.max(1)) as usize >= len {
        p.animation_count = 0;
    }
}

/// Resize the rectangle (keeping its top-left corner) and swap in the mask of
/// the active sheet.
pub fn sync_hitbox(p: &mut Player) {
    let hitbox = p.sprites.hitbox(p.sprite_state, p.facing);
    p.rect.width = hitbox.width;
    p.rect.height = hitbox.height;
    p.hitbox = hitbox;
}

/// Jump if fewer than `MAX_JUMPS` have been used. Returns whether it happened.
pub fn jump(p: &mut Player, config: &GameConfig) -> bool {
    if p.jump_count >= MAX_JUMPS {
        return false;
    }
    p.vy = -config.gravity * config.jump_power;
    p.animation_count = 0;
    p.jump_count += 1;
    // Only the first jump restarts the gravity ramp.
    if p.jump_count == 1 {
        p.fall_count = 0;
        p.grounded = false;
    }
    true
}

pub fn make_hit(p: &mut Player, now_ms: u64) {
    p.hit = true;
    p.last_damage_ms = Some(now_ms);
}

/// Hit the player unless it was damaged within the damage cooldown.
pub fn try_damage(p: &mut Player, now_ms: u64, config: &GameConfig) -> bool {
    let ready = p
        .last_damage_ms
        .map_or(true, |last| now_ms.saturating_sub(last) > config.damage_cooldown_ms);
    if ready {
        make_hit(p, now_ms);
    }
    ready
}

fn face(p: &mut Player, facing: Facing) {
    if p.facing != facing {
        p.facing = facing;
        p.animation_count = 0;
        sync_hitbox(p);
    }
}

pub fn move_left(p: &mut Player, vel: f64) {
    p.vx = -vel;
    face(p, Facing::Left);
}

pub fn move_right(p: &mut Player, vel: f64) {
    p.vx = vel;
    face(p, Facing::Right);
}

/// Standing on a surface: clears the fall ramp, vertical speed, and jumps.
pub fn landed(p: &mut Player) {
    p.fall_count = 0;
    p.vy = 0.0;
    p.jump_count = 0;
    p.grounded = true;
}

/// Bounce off a ceiling.
pub fn hit_head(p: &mut Player) {
    p.vy = -p.vy;
}

pub fn teleport(p: &mut Player, to: Point) {
    p.rect.x = to.x;
    p.rect.y = to.y;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationTable;
    use crate::init::{default_config, spawn_player};
    use std::sync::Arc;

    fn player_at(x: i32, y: i32) -> Player {
        spawn_player(0, Point::new(x, y), Arc::new(AnimationTable::solid(20, 40, 4)))
    }

    #[test]
    fn gravity_ramps_then_saturates() {
        let config = default_config();
        let mut p = player_at(0, 0);
        p.fall_count = 30;
        apply_gravity(&mut p, &config);
        assert_eq!(p.vy, 0.5);

        p.vy = 0.0;
        p.fall_count = 600;
        apply_gravity(&mut p, &config);
        assert_eq!(p.vy, config.gravity);
    }

    #[test]
    fn grounded_player_skips_gravity() {
        let config = default_config();
        let mut p = player_at(0, 0);
        p.grounded = true;
        p.fall_count = 120;
        apply_gravity(&mut p, &config);
        assert_eq!(p.vy, 0.0);
    }

    #[test]
    fn integration_truncates_toward_zero() {
        let mut p = player_at(100, 100);
        p.vx = 5.0;
        p.vy = -8.5;
        integrate(&mut p);
        assert_eq!(p.rect.x, 105);
        assert_eq!(p.rect.y, 91);

        p.vy = 0.9;
        integrate(&mut p);
        assert_eq!(p.rect.y, 91);
    }

    #[test]
    fn double_jump_is_capped() {
        let config = default_config();
        let mut p = player_at(0, 0);
        p.grounded = true;
        assert!(jump(&mut p, &config));
        assert!(!p.grounded);
        assert_eq!(p.fall_count, 0);

        p.vy = 3.0;
        p.fall_count = 17;
        assert!(jump(&mut p, &config));
        assert_eq!(p.jump_count, 2);
        // The air jump does not restart the gravity ramp.
        assert_eq!(p.fall_count, 17);

        p.vy = 4.0;
        assert!(!jump(&mut p, &config));
        assert_eq!(p.jump_count, 2);
        assert_eq!(p.vy, 4.0);
    }

    #[test]
    fn jump_velocity_is_gravity_times_power() {
        let config = default_config();
        let mut p = player_at(0, 0);
        p.animation_count = 7;
        jump(&mut p, &config);
        assert_eq!(p.vy, -9.0);
        assert_eq!(p.animation_count, 0);
    }

    #[test]
    fn hit_wins_over_any_velocity() {
        let mut p = player_at(0, 0);
        p.hit = true;
        for (vx, vy) in [(0.0, 0.0), (5.0, -9.0), (-5.0, 12.0), (0.0, 2.0)] {
            p.vx = vx;
            p.vy = vy;
            p.jump_count = 1;
            assert_eq!(select_sprite_state(&p, 1.0), SpriteState::Hit);
        }
    }

    #[test]
    fn ascent_shows_jump_only_on_first_jump() {
        let mut p = player_at(0, 0);
        p.vy = -3.0;
        p.vx = 5.0;
        p.jump_count = 1;
        assert_eq!(select_sprite_state(&p, 1.0), SpriteState::Jump);
        p.jump_count = 2;
        assert_eq!(select_sprite_state(&p, 1.0), SpriteState::Idle);
    }

    #[test]
    fn fall_needs_velocity_strictly_above_threshold() {
        let mut p = player_at(0, 0);
        p.vy = 2.0;
        assert_eq!(select_sprite_state(&p, 1.0), SpriteState::Idle);
        p.vx = 5.0;
        assert_eq!(select_sprite_state(&p, 1.0), SpriteState::Run);
        p.vy = 2.0001;
        assert_eq!(select_sprite_state(&p, 1.0), SpriteState::Fall);
    }

    #[test]
    fn hit_stun_clears_after_delay() {
        let config = default_config();
        let mut p = player_at(0, 0);
        make_hit(&mut p, 1234);
        assert_eq!(p.last_damage_ms, Some(1234));
        for _ in 0..config.fps * config.hit_delay {
            tick_hit(&mut p, &config);
        }
        assert!(p.hit);
        tick_hit(&mut p, &config);
        assert!(!p.hit);
        assert_eq!(p.hit_count, 0);
    }

    #[test]
    fn damage_respects_cooldown() {
        let config = default_config();
        let mut p = player_at(0, 0);
        assert!(try_damage(&mut p, 100, &config));
        assert!(!try_damage(&mut p, 1100, &config));
        assert_eq!(p.last_damage_ms, Some(100));
        assert!(try_damage(&mut p, 1101, &config));
        assert_eq!(p.last_damage_ms, Some(1101));
        // The fall penalty timer is separate.
        assert_eq!(p.last_fall_penalty_ms, None);
    }

    #[test]
    fn animation_counter_wraps_at_sheet_end() {
        let config = default_config();
        let mut p = player_at(0, 0);
        p.grounded = true;
        // 4 frames x delay 3 = 12 updates per cycle.
        let mut seen = Vec::new();
        for _ in 0..12 {
            update_sprite(&mut p, &config);
            seen.push(p.frame);
        }
        assert_eq!(seen, vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3]);
        assert_eq!(p.animation_count, 0);
    }

    #[test]
    fn turning_resets_animation() {
        let mut p = player_at(0, 0);
        p.animation_count = 5;
        move_left(&mut p, 5.0);
        assert_eq!(p.animation_count, 5);
        move_right(&mut p, 5.0);
        assert_eq!(p.animation_count, 0);
        assert_eq!(p.vx, 5.0);
        assert_eq!(p.facing, Facing::Right);
    }

    #[test]
    fn landing_resets_jump_state() {
        let mut p = player_at(0, 0);
        p.jump_count = 2;
        p.fall_count = 40;
        p.vy = 7.0;
        landed(&mut p);
        assert!(p.grounded);
        assert_eq!((p.jump_count, p.fall_count, p.vy), (0, 0, 0.0));
    }

    #[test]
    fn hitbox_follows_sheet_size() {
        let config = default_config();
        let mut named = std::collections::HashMap::new();
        for state in SpriteState::ALL {
            for facing in [Facing::Left, Facing::Right] {
                let h = if state == SpriteState::Run { 30 } else { 40 };
                named.insert(
                    crate::animation::sheet_name(state, facing),
                    vec![crate::animation::SpriteFrame::solid(0, 20, h)],
                );
            }
        }
        let table = Arc::new(AnimationTable::from_named(named).unwrap());
        let mut p = spawn_player(0, Point::new(10, 10), table);
        assert_eq!(p.rect.height, 40);
        move_right(&mut p, 5.0);
        update_sprite(&mut p, &config);
        assert_eq!(p.sprite_state, SpriteState::Run);
        assert_eq!(p.rect.height, 30);
        assert_eq!((p.rect.x, p.rect.y), (10, 10));
    }
}
