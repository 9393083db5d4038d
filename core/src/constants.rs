// All values are per-frame at 60 Hz unless noted.

// Screen
pub const SCREEN_WIDTH: i32 = 1000;
pub const SCREEN_HEIGHT: i32 = 800;
pub const FPS: u32 = 60;

// Physics
pub const PLAYER_VEL: f64 = 5.0;
pub const GRAVITY: f64 = 1.0;
pub const JUMP_POWER: f64 = 9.0;

/// Jumps available before landing again (ground jump + one air jump).
pub const MAX_JUMPS: u32 = 2;
/// Input may only start a jump while the jump count is below this.
/// Raising it to `MAX_JUMPS` lets players trigger the air jump themselves.
pub const INPUT_JUMP_GATE: u32 = 1;

// Animation
pub const ANIMATION_DELAY: u32 = 3;
/// Seconds a hit stun lasts.
pub const HIT_DELAY: u32 = 2;

// Level
pub const BLOCK_SIZE: i32 = 96;
/// Top edge beyond which an airborne player has fallen off the map.
pub const FALL_THRESHOLD: i32 = 715;
/// Horizontal gap between consecutive player slots at spawn.
pub const SPAWN_STAGGER: i32 = 100;

// Collision
/// Horizontal stride between ground probe samples.
pub const GROUND_PROBE_STRIDE: usize = 4;
/// Alpha above which a sprite pixel counts as solid.
pub const MASK_ALPHA_THRESHOLD: u8 = 127;

// Cooldowns (milliseconds of monotonic time)
pub const DAMAGE_COOLDOWN_MS: u64 = 1000;
pub const FALL_COOLDOWN_MS: u64 = 1000;

// Session
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

// Menu layout
pub const MENU_OPTION_WIDTH: i32 = 240;
pub const MENU_OPTION_HEIGHT: i32 = 60;
pub const MENU_OPTION_SPACING: i32 = 80;

// HUD
pub const HUD_LIVES_X: i32 = 10;
pub const HUD_LIVES_Y: i32 = 10;

/// Background tile size used when the asset collaborator gives none.
pub const DEFAULT_BACKGROUND_TILE: i32 = 64;

/// Character folder names, one per player slot.
pub const CHARACTER_NAMES: [&str; MAX_PLAYERS] = ["p1Njal", "p2Revna", "p3Dwalin", "p4Bjorn"];

/// Hit-box sizes of the character sprites (sheet frame size scaled x2).
pub const CHARACTER_SIZES: [(i32, i32); MAX_PLAYERS] = [(24, 90), (30, 84), (26, 70), (20, 86)];
