use crate::types::{Dimensions, Point};

/// Top-left of the view window centred on `target`, clamped per axis to
/// `[0, level - screen]`. When the level is smaller than the screen the
/// lower bound wins and the offset is 0.
pub fn camera_follow(target: Point, level: Dimensions, screen: Dimensions) -> Point {
    Point::new(
        clamp_axis(target.x - screen.width / 2, level.width - screen.width),
        clamp_axis(target.y - screen.height / 2, level.height - screen.height),
    )
}

fn clamp_axis(offset: i32, max: i32) -> i32 {
    offset.min(max).max(0)
}

/// Move `current` a fraction `lerp` of the way toward `target`. A lerp of
/// 1.0 or more lands exactly on the target.
pub fn smooth_follow(current: Point, target: Point, lerp: f64) -> Point {
    if lerp >= 1.0 {
        return target;
    }
    let lerp = lerp.max(0.0);
    let step = |from: i32, to: i32| from + ((to - from) as f64 * lerp).round() as i32;
    Point::new(step(current.x, target.x), step(current.y, target.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Dimensions = Dimensions {
        width: 1000,
        height: 800,
    };

    #[test]
    fn centres_target_inside_large_level() {
        let level = Dimensions { width: 3000, height: 2000 };
        assert_eq!(
            camera_follow(Point::new(1500, 1000), level, SCREEN),
            Point::new(1000, 600)
        );
    }

    #[test]
    fn clamps_at_level_edges() {
        let level = Dimensions { width: 3000, height: 2000 };
        assert_eq!(camera_follow(Point::new(-500, -500), level, SCREEN), Point::new(0, 0));
        assert_eq!(
            camera_follow(Point::new(9000, 9000), level, SCREEN),
            Point::new(2000, 1200)
        );
    }

    #[test]
    fn small_level_pins_to_origin() {
        let level = Dimensions { width: 288, height: 288 };
        assert_eq!(camera_follow(Point::new(900, 700), level, SCREEN), Point::new(0, 0));
    }

    #[test]
    fn offset_stays_in_bounds_for_any_target() {
        let level = Dimensions { width: 2400, height: 1100 };
        for x in (-3000..6000).step_by(137) {
            for y in (-3000..6000).step_by(151) {
                let off = camera_follow(Point::new(x, y), level, SCREEN);
                assert!((0..=level.width - SCREEN.width).contains(&off.x));
                assert!((0..=level.height - SCREEN.height).contains(&off.y));
            }
        }
    }

    #[test]
    fn smooth_follow_closes_gap_fractionally() {
        let from = Point::new(0, 100);
        let to = Point::new(100, 0);
        assert_eq!(smooth_follow(from, to, 0.25), Point::new(25, 75));
        assert_eq!(smooth_follow(from, to, 1.0), to);
        assert_eq!(smooth_follow(from, to, 0.0), from);
    }
}
