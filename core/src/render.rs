use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::step::Session;
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

pub const BLACK: Color = Color(0, 0, 0);
pub const WHITE: Color = Color(255, 255, 255);
pub const MENU_BOX: Color = Color(100, 100, 100);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    TopLeft,
    Center,
}

/// One primitive for the rendering collaborator, in screen coordinates.
/// Calls are ordered back to front.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "draw", rename_all = "snake_case")]
pub enum DrawCall {
    Clear {
        color: Color,
    },
    Tile {
        image: String,
        x: i32,
        y: i32,
    },
    Obstacle {
        kind: ObstacleKind,
        rect: Rect,
    },
    Sprite {
        slot: usize,
        image: FrameId,
        x: i32,
        y: i32,
    },
    Fill {
        rect: Rect,
        color: Color,
    },
    Text {
        text: String,
        x: i32,
        y: i32,
        size: u32,
        anchor: Anchor,
        color: Color,
    },
}

/// Background image identifier plus its native size.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Background {
    pub image: String,
    pub width: i32,
    pub height: i32,
}

impl Background {
    /// Background with the default tile size, for when the asset side gives none.
    pub fn with_default_tile(image: &str) -> Self {
        Background {
            image: image.to_string(),
            width: DEFAULT_BACKGROUND_TILE,
            height: DEFAULT_BACKGROUND_TILE,
        }
    }

    /// Tile origins covering the screen, one extra row and column for the
    /// partial tiles at the edges.
    pub fn tiles(&self, screen: Dimensions) -> Vec<Point> {
        let (w, h) = (self.width.max(1), self.height.max(1));
        let mut tiles = Vec::new();
        for i in 0..=screen.width / w {
            for j in 0..=screen.height / h {
                tiles.push(Point::new(i * w, j * h));
            }
        }
        tiles
    }
}

fn text(text: impl Into<String>, x: i32, y: i32, size: u32, anchor: Anchor) -> DrawCall {
    DrawCall::Text {
        text: text.into(),
        x,
        y,
        size,
        anchor,
        color: WHITE,
    }
}

/// Draw calls for the current frame, using a default-sized background tile.
pub fn draw_calls(session: &Session) -> Vec<DrawCall> {
    let background = Background::with_default_tile(&session.level().background);
    draw_calls_with(session, &background)
}

pub fn draw_calls_with(session: &Session, background: &Background) -> Vec<DrawCall> {
    let screen = session.config().screen();
    let (cx, cy) = (screen.width / 2, screen.height / 2);
    match session.mode() {
        GameMode::Menu => {
            let mut calls = vec![
                DrawCall::Clear { color: BLACK },
                text("Select Number of Players", cx, screen.height / 4, 60, Anchor::Center),
            ];
            for (i, region) in session.menu_regions().iter().enumerate() {
                calls.push(DrawCall::Fill {
                    rect: *region,
                    color: MENU_BOX,
                });
                let c = region.center();
                calls.push(text(
                    format!("{} Players", i + MIN_PLAYERS),
                    c.x,
                    c.y,
                    60,
                    Anchor::Center,
                ));
            }
            calls
        }
        GameMode::Playing => playing_calls(session, background, screen),
        GameMode::GameOver => vec![
            DrawCall::Clear { color: BLACK },
            text("Game Over", cx, cy, 60, Anchor::Center),
            text("Press R to Restart the Level", cx, cy + 50, 30, Anchor::Center),
        ],
        GameMode::GameWin => vec![
            DrawCall::Clear { color: BLACK },
            text("You Win!", cx, cy, 60, Anchor::Center),
            text("Press R to Restart", cx, cy + 50, 30, Anchor::Center),
        ],
    }
}

fn playing_calls(session: &Session, background: &Background, screen: Dimensions) -> Vec<DrawCall> {
    let camera = session.camera();
    let to_screen = |r: Rect| r.translated(-camera.x, -camera.y);
    let level = session.level();

    // The background does not scroll.
    let mut calls: Vec<DrawCall> = background
        .tiles(screen)
        .into_iter()
        .map(|t| DrawCall::Tile {
            image: background.image.clone(),
            x: t.x,
            y: t.y,
        })
        .collect();

    calls.extend(level.obstacles.iter().map(|o| DrawCall::Obstacle {
        kind: o.kind,
        rect: to_screen(o.rect),
    }));
    calls.push(DrawCall::Obstacle {
        kind: level.exit.kind,
        rect: to_screen(level.exit.rect),
    });

    for p in session.players() {
        let frames = p.sprites.frames(p.sprite_state, p.facing);
        let frame = &frames[p.frame % frames.len()];
        let at = to_screen(p.rect);
        calls.push(DrawCall::Sprite {
            slot: p.slot,
            image: frame.image,
            x: at.x,
            y: at.y,
        });
    }

    calls.push(text(
        format!("Lives: {}", session.lives()),
        HUD_LIVES_X,
        HUD_LIVES_Y,
        36,
        Anchor::TopLeft,
    ));
    calls
}
