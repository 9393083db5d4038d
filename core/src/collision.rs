use crate::mask::Mask;
use crate::physics::{hit_head, landed};
use crate::types::*;

/// Two-phase overlap: rectangle pre-filter, then mask against mask.
pub fn overlaps(rect: &Rect, mask: &Mask, obstacle: &Obstacle) -> bool {
    if !rect.intersects(&obstacle.rect) {
        return false;
    }
    mask.overlaps(
        &obstacle.mask,
        obstacle.rect.x - rect.x,
        obstacle.rect.y - rect.y,
    )
}

/// Index of the first obstacle the player would overlap after a hypothetical
/// displacement of `(dx, dy)`. The player is not touched.
pub fn probe(p: &Player, obstacles: &[Obstacle], dx: i32, dy: i32) -> Option<usize> {
    let moved = p.rect.translated(dx, dy);
    obstacles
        .iter()
        .position(|o| overlaps(&moved, &p.hitbox.mask, o))
}

/// Push the player out of every obstacle it overlaps at its current position.
/// Falling (`dy > 0`) lands on the obstacle's top; rising (`dy < 0`) bumps
/// against its bottom. Returns indices of all overlapped obstacles.
pub fn resolve_vertical(p: &mut Player, obstacles: &[Obstacle], dy: f64) -> Vec<usize> {
    let mut collided = Vec::new();
    for (i, o) in obstacles.iter().enumerate() {
        if !overlaps(&p.rect, &p.hitbox.mask, o) {
            continue;
        }
        if dy > 0.0 {
            p.rect.y = o.rect.top() - p.rect.height;
            landed(p);
        } else if dy < 0.0 {
            p.rect.y = o.rect.bottom();
            hit_head(p);
        }
        collided.push(i);
    }
    collided
}

/// Sample 1x1 points one pixel below the player's bottom edge every `stride`
/// pixels; any rectangle hit means the player is standing on something.
pub fn is_grounded(p: &Player, obstacles: &[Obstacle], stride: usize) -> bool {
    let bottom = p.rect.bottom() + 1;
    (0..p.rect.width.max(0))
        .step_by(stride.max(1))
        .map(|dx| Rect::new(p.rect.x + dx, bottom, 1, 1))
        .any(|sample| obstacles.iter().any(|o| sample.intersects(&o.rect)))
}
