use std::collections::HashMap;

use crate::constants::*;
use crate::error::{GameError, GameResult};
use crate::mask::Mask;
use crate::types::*;

/// One image of a sprite sheet together with its alpha-derived mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteFrame {
    pub image: FrameId,
    pub width: i32,
    pub height: i32,
    pub mask: Mask,
}

impl SpriteFrame {
    pub fn solid(image: FrameId, width: i32, height: i32) -> Self {
        SpriteFrame {
            image,
            width,
            height,
            mask: Mask::filled(width.max(0) as usize, height.max(0) as usize),
        }
    }
}

/// Logical collision shape of an actor: size plus mask, taken from the first
/// frame of the active sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hitbox {
    pub width: i32,
    pub height: i32,
    pub mask: Mask,
}

pub fn sheet_name(state: SpriteState, facing: Facing) -> String {
    format!("{}_{}", state.name(), facing.name())
}

/// Index of the displayed frame for an animation counter.
pub fn frame_index(counter: u32, delay: u32, frame_count: usize) -> usize {
    if frame_count == 0 {
        return 0;
    }
    (counter / delay.max(1)) as usize % frame_count
}

/// Fixed per-character table of frame sequences, indexed by state then facing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationTable {
    sheets: [[Vec<SpriteFrame>; 2]; 5],
}

impl AnimationTable {
    /// Convert the asset collaborator's `"<state>_<facing>"` mapping. Every
    /// state must be present for both facings and hold at least one frame.
    pub fn from_named(mut named: HashMap<String, Vec<SpriteFrame>>) -> GameResult<Self> {
        let mut sheets: [[Vec<SpriteFrame>; 2]; 5] = Default::default();
        for state in SpriteState::ALL {
            for facing in [Facing::Left, Facing::Right] {
                let name = sheet_name(state, facing);
                let frames = named
                    .remove(&name)
                    .ok_or(GameError::MissingAnimationState { state, facing })?;
                if frames.is_empty() {
                    return Err(GameError::EmptyAnimation(name));
                }
                sheets[state.index()][facing.index()] = frames;
            }
        }
        if !named.is_empty() {
            log::debug!("ignoring {} unused animation sheets", named.len());
        }
        Ok(AnimationTable { sheets })
    }

    /// Table where every sheet holds `frames` fully solid frames of one size.
    /// Frame ids are unique across the table.
    pub fn solid(width: i32, height: i32, frames: usize) -> Self {
        let frames = frames.max(1);
        let sheets = std::array::from_fn(|s| {
            std::array::from_fn(|f| {
                (0..frames)
                    .map(|i| {
                        let id = ((s * 2 + f) * frames + i) as FrameId;
                        SpriteFrame::solid(id, width, height)
                    })
                    .collect()
            })
        });
        AnimationTable { sheets }
    }

    pub fn frames(&self, state: SpriteState, facing: Facing) -> &[SpriteFrame] {
        &self.sheets[state.index()][facing.index()]
    }

    pub fn frame(
        &self,
        state: SpriteState,
        facing: Facing,
        counter: u32,
        delay: u32,
    ) -> &SpriteFrame {
        let frames = self.frames(state, facing);
        &frames[frame_index(counter, delay, frames.len())]
    }

    pub fn hitbox(&self, state: SpriteState, facing: Facing) -> Hitbox {
        let first = &self.frames(state, facing)[0];
        Hitbox {
            width: first.width,
            height: first.height,
            mask: first.mask.clone(),
        }
    }
}

/// Placeholder characters with the hit-box sizes of the shipped sprites.
pub fn default_roster() -> Vec<AnimationTable> {
    CHARACTER_SIZES
        .iter()
        .map(|&(w, h)| AnimationTable::solid(w, h, 4))
        .collect()
}
