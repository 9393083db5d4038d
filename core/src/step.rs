use std::sync::Arc;

use crate::animation::AnimationTable;
use crate::camera::{camera_follow, smooth_follow};
use crate::constants::*;
use crate::error::{GameError, GameResult};
use crate::init::{spawn_players, spawn_point};
use crate::input::{resolve_player, PLAYER_BINDINGS, RESTART_KEY};
use crate::level::{Level, LevelSet};
use crate::physics::{jump, teleport, update_player};
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Quit,
}

/// Level the session returns to on restart.
#[derive(Clone, Debug)]
struct RetainedLevel {
    level: Level,
    index: usize,
}

/// Everything the frame loop mutates, owned in one place.
#[derive(Clone, Debug)]
pub struct Session {
    config: GameConfig,
    levels: LevelSet,
    roster: Vec<Arc<AnimationTable>>,
    mode: GameMode,
    players: Vec<Player>,
    /// Shared pool across all players.
    lives: i32,
    camera: Point,
    level: Level,
    level_index: usize,
    retained: RetainedLevel,
    snap_camera: bool,
    frame: u64,
    /// Obstacles each player touched during the last frame, by slot.
    contacts: Vec<Vec<usize>>,
}

impl Session {
    /// Start in the menu with level 0 loaded. The roster needs one character
    /// per possible player slot.
    pub fn new(
        config: GameConfig,
        levels: LevelSet,
        roster: Vec<AnimationTable>,
    ) -> GameResult<Session> {
        let level = levels.get(0).cloned().ok_or(GameError::NoLevels)?;
        if roster.len() < MAX_PLAYERS {
            return Err(GameError::RosterTooSmall {
                have: roster.len(),
                need: MAX_PLAYERS,
            });
        }
        log::info!("session ready: {} levels, first `{}`", levels.len(), level.name);
        Ok(Session {
            config,
            levels,
            roster: roster.into_iter().map(Arc::new).collect(),
            mode: GameMode::Menu,
            players: Vec::new(),
            lives: 0,
            camera: Point::default(),
            retained: RetainedLevel {
                level: level.clone(),
                index: 0,
            },
            level,
            level_index: 0,
            snap_camera: true,
            frame: 0,
            contacts: Vec::new(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Direct access for scripted scenarios and tooling.
    pub fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn camera(&self) -> Point {
        self.camera
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn contacts(&self) -> &[Vec<usize>] {
        &self.contacts
    }

    /// Clickable menu options for 2, 3 and 4 players, top to bottom.
    pub fn menu_regions(&self) -> [Rect; 3] {
        let screen = self.config.screen();
        std::array::from_fn(|i| {
            Rect::centered_at(
                Point::new(
                    screen.width / 2,
                    screen.height / 2 + i as i32 * MENU_OPTION_SPACING,
                ),
                MENU_OPTION_WIDTH,
                MENU_OPTION_HEIGHT,
            )
        })
    }

    /// Leave the menu with `count` players on the current level.
    pub fn select_players(&mut self, count: usize) -> GameResult<()> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            return Err(GameError::InvalidPlayerCount(count));
        }
        if self.mode != GameMode::Menu {
            log::warn!("ignoring player selection outside the menu");
            return Ok(());
        }
        self.players = spawn_players(count, self.level.player_start, &self.roster, &self.config);
        self.contacts = vec![Vec::new(); count];
        self.lives = count as i32 + 1;
        self.snap_camera = true;
        self.mode = GameMode::Playing;
        log::info!(
            "{} players on level {} `{}`, {} lives",
            count,
            self.level_index + 1,
            self.level.name,
            self.lives
        );
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            frame: self.frame,
            lives: self.lives,
            level_index: self.level_index,
            level_name: self.level.name.clone(),
            camera: self.camera,
            players: self.players.iter().map(Player::snapshot).collect(),
        }
    }

    fn click_menu(&mut self, at: Point) {
        let Some(i) = self.menu_regions().iter().position(|r| r.contains_point(at)) else {
            log::warn!("menu click at ({}, {}) hit no option", at.x, at.y);
            return;
        };
        if let Err(e) = self.select_players(i + MIN_PLAYERS) {
            log::warn!("menu selection failed: {e}");
        }
    }

    fn play_frame(&mut self, input: &FrameInput, now_ms: u64) {
        let config = &self.config;
        let obstacles = &self.level.obstacles;

        for p in self.players.iter_mut() {
            update_player(p, config);
        }
        for (p, touched) in self.players.iter_mut().zip(self.contacts.iter_mut()) {
            *touched = resolve_player(p, obstacles, &input.keys, &PLAYER_BINDINGS[p.slot], config);
        }

        self.follow_camera();
        self.apply_fall_penalties(now_ms);

        let exit = self.level.exit.rect;
        let all_in = self.players.iter().all(|p| exit.contains_point(p.center()));
        if !self.players.is_empty() && all_in {
            self.advance_level();
        }

        if self.mode == GameMode::Playing && self.lives <= 0 {
            log::info!("out of lives on level {}", self.level_index + 1);
            self.mode = GameMode::GameOver;
        }
    }

    fn follow_camera(&mut self) {
        let Some(lead) = self.players.first() else {
            return;
        };
        let target = camera_follow(lead.center(), self.level.dimensions, self.config.screen());
        self.camera = if self.snap_camera {
            target
        } else {
            smooth_follow(self.camera, target, self.config.camera_lerp)
        };
        self.snap_camera = false;
    }

    fn apply_fall_penalties(&mut self, now_ms: u64) {
        for p in self.players.iter_mut() {
            if p.grounded || p.rect.top() <= self.config.fall_threshold {
                continue;
            }
            let ready = p
                .last_fall_penalty_ms
                .map_or(true, |last| now_ms.saturating_sub(last) > self.config.fall_cooldown_ms);
            if !ready {
                continue;
            }
            jump(p, &self.config);
            p.last_fall_penalty_ms = Some(now_ms);
            self.lives -= 1;
            log::debug!("player {} fell off, {} lives left", p.slot, self.lives);
        }
    }

    fn advance_level(&mut self) {
        let next = self.level_index + 1;
        let Some(level) = self.levels.get(next).cloned() else {
            log::info!("last level cleared");
            self.mode = GameMode::GameWin;
            return;
        };
        log::info!("advancing to level {} `{}`", next + 1, level.name);
        self.level = level;
        self.level_index = next;
        self.retained = RetainedLevel {
            level: self.level.clone(),
            index: next,
        };
        self.respawn_players();
        self.snap_camera = true;
    }

    /// Move every player back to its spawn point; velocities are kept.
    fn respawn_players(&mut self) {
        let start = self.level.player_start;
        for p in self.players.iter_mut() {
            teleport(p, spawn_point(start, p.slot, self.config.spawn_stagger));
        }
    }

    /// Back to the menu on the retained level, with session state cleared.
    fn restart(&mut self) {
        self.level = self.retained.level.clone();
        self.level_index = self.retained.index;
        self.players.clear();
        self.contacts.clear();
        self.lives = 0;
        self.camera = Point::default();
        self.snap_camera = true;
        self.mode = GameMode::Menu;
        log::info!("restart on level {} `{}`", self.level_index + 1, self.level.name);
    }
}

/// Advance the session by one frame.
///
/// Sub-step order while playing:
///  1. Quit check (returns before anything else)
///  2. Physics update for every player
///  3. Input mapping, ground probe and vertical collision per player
///  4. Camera follow on player 0
///  5. Fall-off penalties
///  6. Exit check: level advance or win
///  7. Lives check
pub fn step_mut(session: &mut Session, input: &FrameInput, now_ms: u64) -> StepOutcome {
    if input.quit {
        log::info!("quit requested at frame {}", session.frame);
        return StepOutcome::Quit;
    }

    match session.mode {
        GameMode::Menu => {
            if let Some(at) = input.click {
                session.click_menu(at);
            }
        }
        GameMode::Playing => session.play_frame(input, now_ms),
        GameMode::GameOver | GameMode::GameWin => {
            if input.keys.contains(RESTART_KEY) {
                session.restart();
            }
        }
    }

    session.frame += 1;
    StepOutcome::Continue
}
