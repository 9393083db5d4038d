use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::render::{draw_calls, DrawCall};
use crate::step::{step_mut, Session, StepOutcome};
use crate::types::{FrameInput, SessionSnapshot};

/// Monotonic game time in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> u64;

    /// Called once after every completed frame.
    fn tick(&mut self) {}
}

/// Wall-clock time since construction.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Time derived from the frame count, so replays see identical timestamps.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    fps: u32,
    frame: u64,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        FrameClock {
            fps: fps.max(1),
            frame: 0,
        }
    }
}

impl Clock for FrameClock {
    fn now_ms(&self) -> u64 {
        self.frame * 1000 / self.fps as u64
    }

    fn tick(&mut self) {
        self.frame += 1;
    }
}

/// Source of per-frame input. `None` means no more input will come.
pub trait InputSource {
    fn poll(&mut self) -> Option<FrameInput>;
}

/// Plays back recorded frames in order.
#[derive(Clone, Debug)]
pub struct Replay {
    frames: std::vec::IntoIter<FrameInput>,
}

impl Replay {
    pub fn new(frames: Vec<FrameInput>) -> Self {
        Replay {
            frames: frames.into_iter(),
        }
    }
}

impl InputSource for Replay {
    fn poll(&mut self) -> Option<FrameInput> {
        self.frames.next()
    }
}

/// Receives the draw calls of every completed frame.
pub trait Presenter {
    fn present(&mut self, calls: &[DrawCall]);
}

/// Drops every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _calls: &[DrawCall]) {}
}

/// Keeps only the most recent frame.
#[derive(Clone, Debug, Default)]
pub struct LastFrame {
    pub calls: Vec<DrawCall>,
    pub presented: u64,
}

impl Presenter for LastFrame {
    fn present(&mut self, calls: &[DrawCall]) {
        self.calls.clear();
        self.calls.extend_from_slice(calls);
        self.presented += 1;
    }
}

/// Paces the loop to a target frame rate by sleeping out the rest of each
/// frame's budget. Unpaced governors never sleep.
#[derive(Clone, Copy, Debug)]
pub struct FrameGovernor {
    budget: Option<Duration>,
    frame_start: Instant,
}

impl FrameGovernor {
    pub fn paced(fps: u32) -> Self {
        FrameGovernor {
            budget: Some(Duration::from_secs_f64(1.0 / fps.max(1) as f64)),
            frame_start: Instant::now(),
        }
    }

    pub fn unpaced() -> Self {
        FrameGovernor {
            budget: None,
            frame_start: Instant::now(),
        }
    }

    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    /// Sleep until the current frame's budget is used up, then start the next.
    pub fn wait(&mut self) {
        if let Some(budget) = self.budget {
            let spent = self.frame_start.elapsed();
            if let Some(rest) = budget.checked_sub(spent) {
                thread::sleep(rest);
            } else {
                log::trace!("frame over budget by {:?}", spent - budget);
            }
        }
        self.frame_start = Instant::now();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEnd {
    Quit,
    InputExhausted,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub end: RunEnd,
    /// Frames fully simulated; a quit frame is not counted.
    pub frames: u64,
    pub last: SessionSnapshot,
}

/// Drive the session until quit or until the input source runs dry.
pub fn run(
    session: &mut Session,
    input: &mut dyn InputSource,
    presenter: &mut dyn Presenter,
    clock: &mut dyn Clock,
    governor: &mut FrameGovernor,
) -> RunSummary {
    let mut frames = 0u64;
    let end = loop {
        let Some(frame_input) = input.poll() else {
            break RunEnd::InputExhausted;
        };
        if step_mut(session, &frame_input, clock.now_ms()) == StepOutcome::Quit {
            break RunEnd::Quit;
        }
        presenter.present(&draw_calls(session));
        frames += 1;
        clock.tick();
        governor.wait();
    };
    log::info!("run ended ({end:?}) after {frames} frames in {:?}", session.mode());
    RunSummary {
        end,
        frames,
        last: session.snapshot(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::default_roster;
    use crate::init::default_config;
    use crate::level::{LevelFile, LevelObject, LevelSet};
    use crate::types::*;

    fn session() -> Session {
        let file = LevelFile {
            name: "fjord".into(),
            background: "Blue.png".into(),
            player_start: Point::new(100, 500),
            objects: vec![
                LevelObject::Block { x: 0, y: 704, size: 96 },
                LevelObject::Exit { x: 900, y: 600, width: 40, height: 104 },
            ],
        };
        let config = default_config();
        let levels = LevelSet::new(&[file], config.screen()).unwrap();
        Session::new(config, levels, default_roster()).unwrap()
    }

    #[test]
    fn frame_clock_follows_frame_count() {
        let mut clock = FrameClock::new(60);
        assert_eq!(clock.now_ms(), 0);
        for _ in 0..3 {
            clock.tick();
        }
        assert_eq!(clock.now_ms(), 50);
        for _ in 0..57 {
            clock.tick();
        }
        assert_eq!(clock.now_ms(), 1000);
    }

    #[test]
    fn paced_governor_budget_matches_fps() {
        let gov = FrameGovernor::paced(60);
        let budget = gov.budget().unwrap();
        assert!(budget > Duration::from_millis(16) && budget < Duration::from_millis(17));
        assert!(FrameGovernor::unpaced().budget().is_none());
    }

    #[test]
    fn replay_runs_until_input_exhausted() {
        let mut s = session();
        let mut frames = vec![FrameInput::click(500, 400)];
        frames.extend(std::iter::repeat(NULL_INPUT).take(9));
        let mut presenter = LastFrame::default();
        let summary = run(
            &mut s,
            &mut Replay::new(frames),
            &mut presenter,
            &mut FrameClock::new(60),
            &mut FrameGovernor::unpaced(),
        );
        assert_eq!(summary.end, RunEnd::InputExhausted);
        assert_eq!(summary.frames, 10);
        assert_eq!(presenter.presented, 10);
        assert_eq!(summary.last.mode, GameMode::Playing);
        assert_eq!(summary.last.players.len(), 2);
        assert!(matches!(presenter.calls.last(), Some(DrawCall::Text { .. })));
    }

    #[test]
    fn quit_ends_run_without_presenting() {
        let mut s = session();
        let quit = FrameInput {
            quit: true,
            ..NULL_INPUT
        };
        let frames = vec![NULL_INPUT, NULL_INPUT, quit, NULL_INPUT];
        let mut presenter = LastFrame::default();
        let summary = run(
            &mut s,
            &mut Replay::new(frames),
            &mut presenter,
            &mut FrameClock::new(60),
            &mut FrameGovernor::unpaced(),
        );
        assert_eq!(summary.end, RunEnd::Quit);
        assert_eq!(summary.frames, 2);
        assert_eq!(presenter.presented, 2);
        assert_eq!(summary.last.mode, GameMode::Menu);
    }
}
