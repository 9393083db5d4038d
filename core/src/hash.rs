use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::GameResult;
use crate::types::{FrameInput, GameConfig};

/// Recorded input for a headless run: one `FrameInput` per frame, plus an
/// optional config override.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default)]
    pub config: Option<GameConfig>,
    pub frames: Vec<FrameInput>,
}

impl Transcript {
    pub fn from_json(json: &str) -> GameResult<Transcript> {
        Ok(serde_json::from_str(json)?)
    }
}

/// SHA-256 over the frame inputs. Per frame: key bits (u32 LE), click flag
/// and coordinates (u8, i32 LE, i32 LE; zero when absent), quit flag (u8).
pub fn hash_transcript(frames: &[FrameInput]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for input in frames {
        hasher.update(input.keys.bits().to_le_bytes());
        let (flag, x, y) = match input.click {
            Some(p) => (1u8, p.x, p.y),
            None => (0u8, 0, 0),
        };
        hasher.update([flag]);
        hasher.update(x.to_le_bytes());
        hasher.update(y.to_le_bytes());
        hasher.update([input.quit as u8]);
    }
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Key, KeySet, NULL_INPUT};

    #[test]
    fn transcript_hash_deterministic() {
        let frames = vec![NULL_INPUT; 100];
        assert_eq!(hash_transcript(&frames), hash_transcript(&frames));
    }

    #[test]
    fn different_transcripts_different_hash() {
        let t1 = vec![NULL_INPUT; 100];
        let mut t2 = vec![NULL_INPUT; 100];
        t2[50].keys = KeySet::EMPTY.with(Key::Up);
        assert_ne!(hash_transcript(&t1), hash_transcript(&t2));
    }

    #[test]
    fn click_at_origin_differs_from_no_click() {
        let none = [NULL_INPUT];
        let origin = [FrameInput::click(0, 0)];
        assert_ne!(hash_transcript(&none), hash_transcript(&origin));
    }

    #[test]
    fn transcript_json_without_config() {
        let json = r#"{"frames":[{"click":{"x":500,"y":400}},{"keys":["right","up"]},{}]}"#;
        let t = Transcript::from_json(json).unwrap();
        assert!(t.config.is_none());
        assert_eq!(t.frames.len(), 3);
        assert_eq!(t.frames[0], FrameInput::click(500, 400));
        assert!(t.frames[1].keys.contains(Key::Up));
        assert_eq!(t.frames[2], NULL_INPUT);
    }

    #[test]
    fn malformed_transcript_is_an_error() {
        assert!(Transcript::from_json(r#"{"frames": 3}"#).is_err());
    }
}
