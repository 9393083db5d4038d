use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::types::*;

// ── File format ─────────────────────────────────────────────

/// One level as stored on disk (`levelN.json`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelFile {
    pub name: String,
    pub background: String,
    pub player_start: Point,
    pub objects: Vec<LevelObject>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LevelObject {
    Block { x: i32, y: i32, size: i32 },
    Exit { x: i32, y: i32, width: i32, height: i32 },
}

// ── Loaded level ────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub name: String,
    pub background: String,
    /// Collision set; the exit is not part of it.
    pub obstacles: Vec<Obstacle>,
    pub exit: Obstacle,
    pub player_start: Point,
    pub dimensions: Dimensions,
}

impl Level {
    /// Build collision geometry from a level file. Dimensions come from the
    /// block extents, or the screen size when there are no blocks.
    pub fn from_file(file: &LevelFile, screen: Dimensions) -> GameResult<Level> {
        let mut obstacles = Vec::new();
        let mut exit = None;
        for object in &file.objects {
            match *object {
                LevelObject::Block { x, y, size } => obstacles.push(Obstacle::block(x, y, size)),
                LevelObject::Exit { x, y, width, height } => {
                    if exit.is_some() {
                        log::warn!("level `{}` has several exits, keeping the last", file.name);
                    }
                    exit = Some(Obstacle::solid(
                        ObstacleKind::Exit,
                        Rect::new(x, y, width, height),
                    ));
                }
            }
        }
        let exit = exit.ok_or_else(|| GameError::MissingExit(file.name.clone()))?;

        Ok(Level {
            name: file.name.clone(),
            background: file.background.clone(),
            dimensions: block_extents(&obstacles).unwrap_or(screen),
            obstacles,
            exit,
            player_start: file.player_start,
        })
    }
}

fn block_extents(blocks: &[Obstacle]) -> Option<Dimensions> {
    let min_x = blocks.iter().map(|b| b.rect.left()).min()?;
    let max_x = blocks.iter().map(|b| b.rect.right()).max()?;
    let min_y = blocks.iter().map(|b| b.rect.top()).min()?;
    let max_y = blocks.iter().map(|b| b.rect.bottom()).max()?;
    Some(Dimensions {
        width: max_x - min_x,
        height: max_y - min_y,
    })
}

/// Ordered levels of a run. A missing index means there are no more levels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelSet {
    levels: Vec<Level>,
}

impl LevelSet {
    pub fn new(files: &[LevelFile], screen: Dimensions) -> GameResult<LevelSet> {
        let levels = files
            .iter()
            .map(|f| Level::from_file(f, screen))
            .collect::<GameResult<Vec<_>>>()?;
        Ok(LevelSet { levels })
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

// ── Loading ─────────────────────────────────────────────────

pub fn level_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("level{}.json", index + 1))
}

pub fn parse_level(json: &str, path: &Path) -> GameResult<LevelFile> {
    serde_json::from_str(json).map_err(|source| GameError::LevelParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read `level1.json`, `level2.json`, ... from `dir` until the first missing
/// index. A missing file ends the sequence; any other failure is an error.
pub fn load_level_dir(dir: &Path) -> GameResult<Vec<LevelFile>> {
    let mut files = Vec::new();
    loop {
        let path = level_path(dir, files.len());
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => break,
            Err(source) => return Err(GameError::LevelIo { path, source }),
        };
        let file = parse_level(&json, &path)?;
        log::info!("loaded level {} `{}` from {}", files.len() + 1, file.name, path.display());
        files.push(file);
    }
    Ok(files)
}
