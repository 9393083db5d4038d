pub mod animation;
pub mod camera;
pub mod collision;
pub mod constants;
pub mod error;
pub mod game_loop;
pub mod hash;
pub mod init;
pub mod input;
pub mod level;
pub mod mask;
pub mod physics;
pub mod render;
pub mod step;
pub mod types;

pub use animation::{default_roster, AnimationTable, Hitbox, SpriteFrame};
pub use camera::{camera_follow, smooth_follow};
pub use collision::{is_grounded, probe, resolve_vertical};
pub use constants::*;
pub use error::{GameError, GameResult};
pub use game_loop::{
    run, Clock, FrameClock, FrameGovernor, InputSource, LastFrame, MonotonicClock, NullPresenter,
    Presenter, Replay, RunEnd, RunSummary,
};
pub use hash::*;
pub use init::*;
pub use input::{apply_player_input, resolve_player, PLAYER_BINDINGS, RESTART_KEY};
pub use level::{load_level_dir, Level, LevelFile, LevelObject, LevelSet};
pub use mask::Mask;
pub use physics::{jump, make_hit, try_damage, update_player};
pub use render::{draw_calls, draw_calls_with, Background, DrawCall};
pub use step::{step_mut, Session, StepOutcome};
pub use types::*;
