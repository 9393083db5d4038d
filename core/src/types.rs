use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationTable, Hitbox};
use crate::mask::Mask;

// ── Primitives ──────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Pixel-space rectangle with its origin at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Strict overlap: touching edges do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn centered_at(center: Point, width: i32, height: i32) -> Rect {
        Rect::new(center.x - width / 2, center.y - height / 2, width, height)
    }
}

// ── Input ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Left,
    Right,
    Up,
    W,
    A,
    D,
    I,
    J,
    L,
    F,
    G,
    H,
    R,
}

impl Key {
    pub const ALL: [Key; 13] = [
        Key::Left,
        Key::Right,
        Key::Up,
        Key::W,
        Key::A,
        Key::D,
        Key::I,
        Key::J,
        Key::L,
        Key::F,
        Key::G,
        Key::H,
        Key::R,
    ];

    pub fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Set of keys held down during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Key>", into = "Vec<Key>")]
pub struct KeySet(u32);

impl KeySet {
    pub const EMPTY: KeySet = KeySet(0);

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn insert(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    pub fn with(mut self, key: Key) -> Self {
        self.insert(key);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = Key> + '_ {
        Key::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl FromIterator<Key> for KeySet {
    fn from_iter<T: IntoIterator<Item = Key>>(iter: T) -> Self {
        let mut set = KeySet::EMPTY;
        for key in iter {
            set.insert(key);
        }
        set
    }
}

impl From<Vec<Key>> for KeySet {
    fn from(keys: Vec<Key>) -> Self {
        keys.into_iter().collect()
    }
}

impl From<KeySet> for Vec<Key> {
    fn from(set: KeySet) -> Self {
        set.iter().collect()
    }
}

/// Key triple driving one player slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub left: Key,
    pub right: Key,
    pub jump: Key,
}

/// Raw input snapshot for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    #[serde(default)]
    pub keys: KeySet,
    /// Mouse click position, if a click happened this frame.
    #[serde(default)]
    pub click: Option<Point>,
    #[serde(default)]
    pub quit: bool,
}

pub const NULL_INPUT: FrameInput = FrameInput {
    keys: KeySet::EMPTY,
    click: None,
    quit: false,
};

impl FrameInput {
    pub fn keys(keys: KeySet) -> Self {
        FrameInput { keys, ..NULL_INPUT }
    }

    pub fn click(x: i32, y: i32) -> Self {
        FrameInput {
            click: Some(Point::new(x, y)),
            ..NULL_INPUT
        }
    }
}

// ── Animation ───────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn index(self) -> usize {
        match self {
            Facing::Left => 0,
            Facing::Right => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Animation sheet selected from the physics state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpriteState {
    Idle,
    Run,
    Jump,
    Fall,
    Hit,
}

impl SpriteState {
    pub const ALL: [SpriteState; 5] = [
        SpriteState::Idle,
        SpriteState::Run,
        SpriteState::Jump,
        SpriteState::Fall,
        SpriteState::Hit,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            SpriteState::Idle => "idle",
            SpriteState::Run => "run",
            SpriteState::Jump => "jump",
            SpriteState::Fall => "fall",
            SpriteState::Hit => "hit",
        }
    }
}

impl fmt::Display for SpriteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque handle to an image frame owned by the asset collaborator.
pub type FrameId = u32;

// ── Level geometry ──────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Block,
    Exit,
}

/// Static level geometry with a pixel mask for precise overlap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub rect: Rect,
    pub mask: Mask,
}

impl Obstacle {
    /// Obstacle whose every pixel is solid.
    pub fn solid(kind: ObstacleKind, rect: Rect) -> Self {
        Obstacle {
            kind,
            rect,
            mask: Mask::filled(rect.width.max(0) as usize, rect.height.max(0) as usize),
        }
    }

    pub fn block(x: i32, y: i32, size: i32) -> Self {
        Obstacle::solid(ObstacleKind::Block, Rect::new(x, y, size, size))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: i32,
    pub height: i32,
}

// ── Player ──────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    /// Player slot, 0..4; selects key bindings and spawn offset.
    pub slot: usize,
    pub rect: Rect,
    pub vx: f64,
    pub vy: f64,
    pub facing: Facing,
    /// Jumps since last landing, never above `MAX_JUMPS`.
    pub jump_count: u32,
    /// Frames since the last landing or first jump; drives the gravity ramp.
    pub fall_count: u32,
    pub hit: bool,
    pub hit_count: u32,
    pub grounded: bool,
    pub animation_count: u32,
    pub sprite_state: SpriteState,
    /// Index of the displayed frame within the active sheet.
    pub frame: usize,
    /// Monotonic time of the last damage taken.
    pub last_damage_ms: Option<u64>,
    /// Monotonic time of the last fall-off penalty.
    pub last_fall_penalty_ms: Option<u64>,
    pub hitbox: Hitbox,
    pub sprites: Arc<AnimationTable>,
}

impl Player {
    pub fn center(&self) -> Point {
        self.rect.center()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            slot: self.slot,
            rect: self.rect,
            vx: self.vx,
            vy: self.vy,
            facing: self.facing,
            jump_count: self.jump_count,
            grounded: self.grounded,
            hit: self.hit,
            sprite_state: self.sprite_state,
        }
    }
}

// ── Session ─────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Menu,
    Playing,
    GameOver,
    GameWin,
}

/// Serializable view of one player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub slot: usize,
    pub rect: Rect,
    pub vx: f64,
    pub vy: f64,
    pub facing: Facing,
    pub jump_count: u32,
    pub grounded: bool,
    pub hit: bool,
    pub sprite_state: SpriteState,
}

/// Serializable view of the whole session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub mode: GameMode,
    pub frame: u64,
    pub lives: i32,
    pub level_index: usize,
    pub level_name: String,
    pub camera: Point,
    pub players: Vec<PlayerSnapshot>,
}

// ── Config ──────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: i32,
    pub screen_height: i32,
    pub fps: u32,
    pub player_vel: f64,
    pub gravity: f64,
    pub jump_power: f64,
    pub animation_delay: u32,
    /// Seconds a hit stun lasts.
    pub hit_delay: u32,
    pub fall_threshold: i32,
    pub spawn_stagger: i32,
    pub damage_cooldown_ms: u64,
    pub fall_cooldown_ms: u64,
    pub ground_probe_stride: usize,
    /// Fraction of the gap to the target the camera covers per frame; 1.0 follows rigidly.
    pub camera_lerp: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        crate::init::default_config()
    }
}

impl GameConfig {
    pub fn screen(&self) -> Dimensions {
        Dimensions {
            width: self.screen_width,
            height: self.screen_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&b.translated(-1, 0)));
    }

    #[test]
    fn contains_point_is_half_open() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains_point(Point::new(0, 0)));
        assert!(r.contains_point(Point::new(9, 9)));
        assert!(!r.contains_point(Point::new(10, 5)));
        assert!(!r.contains_point(Point::new(5, 10)));
    }

    #[test]
    fn center_rounds_down() {
        assert_eq!(Rect::new(1, 1, 5, 5).center(), Point::new(3, 3));
    }

    #[test]
    fn keyset_serializes_as_key_names() {
        let keys = KeySet::EMPTY.with(Key::Left).with(Key::W);
        let json = serde_json::to_string(&keys).unwrap();
        assert_eq!(json, r#"["left","w"]"#);
        let back: KeySet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, keys);
    }

    #[test]
    fn frame_input_fields_default() {
        let input: FrameInput = serde_json::from_str(r#"{"keys":["right"]}"#).unwrap();
        assert!(input.keys.contains(Key::Right));
        assert!(!input.keys.contains(Key::Left));
        assert_eq!(input.click, None);
        assert!(!input.quit);
    }
}
