use std::path::PathBuf;

use thiserror::Error;

use crate::types::{Facing, SpriteState};

#[derive(Debug, Error)]
pub enum GameError {
    #[error("animation table has no `{state}_{facing}` sheet")]
    MissingAnimationState { state: SpriteState, facing: Facing },
    #[error("animation sheet `{0}` has no frames")]
    EmptyAnimation(String),
    #[error("failed to read level file {path}: {source}")]
    LevelIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse level file {path}: {source}")]
    LevelParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("level `{0}` has no exit")]
    MissingExit(String),
    #[error("no levels available")]
    NoLevels,
    #[error("player count {0} is outside 2..=4")]
    InvalidPlayerCount(usize),
    #[error("roster has {have} characters, {need} needed")]
    RosterTooSmall { have: usize, need: usize },
    #[error("failed to parse transcript: {0}")]
    Transcript(#[from] serde_json::Error),
}

pub type GameResult<T> = Result<T, GameError>;
