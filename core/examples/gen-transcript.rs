//! Generates test transcript JSON files for the headless host.
//!
//! Usage:
//!   cargo run -p glory-core --example gen-transcript -- [idle|walk|short] > transcript.json

use glory_core::*;

/// Flat floor ending in a wall with the exit just before it, used to
/// sanity-check the generated input. Walking right ends in a win.
fn demo_levels(config: &GameConfig) -> GameResult<LevelSet> {
    let wall_x = 11 * BLOCK_SIZE;
    let objects = (0..12)
        .map(|i| LevelObject::Block { x: i * BLOCK_SIZE, y: 704, size: BLOCK_SIZE })
        .chain([
            LevelObject::Block { x: wall_x, y: 704 - BLOCK_SIZE, size: BLOCK_SIZE },
            LevelObject::Exit { x: wall_x - 156, y: 560, width: 156, height: 144 },
        ])
        .collect();
    let file = LevelFile {
        name: "demo".into(),
        background: "Blue.png".into(),
        player_start: Point::new(100, 500),
        objects,
    };
    LevelSet::new(&[file], config.screen())
}

fn main() -> GameResult<()> {
    let mode = std::env::args().nth(1).unwrap_or_else(|| "idle".to_string());
    let config = default_config();

    // Every transcript starts by picking "2 Players" in the menu.
    let mut frames = vec![FrameInput::click(config.screen_width / 2, config.screen_height / 2)];
    match mode.as_str() {
        "idle" => frames.extend(std::iter::repeat(NULL_INPUT).take(config.fps as usize * 10)),
        "walk" => {
            // P0 and P1 walk right into the wall, P0 hopping every second.
            for frame in 0..config.fps * 10 {
                let mut keys = KeySet::EMPTY.with(Key::Right).with(Key::D);
                if frame % config.fps == 0 {
                    keys.insert(Key::Up);
                }
                frames.push(FrameInput::keys(keys));
            }
        }
        "short" => frames.extend(std::iter::repeat(NULL_INPUT).take(100)),
        _ => {
            eprintln!("Unknown mode: {}. Use 'idle', 'walk', or 'short'", mode);
            std::process::exit(1);
        }
    }

    // Verify by running the sim
    let mut session = Session::new(config.clone(), demo_levels(&config)?, default_roster())?;
    let summary = run(
        &mut session,
        &mut Replay::new(frames.clone()),
        &mut NullPresenter,
        &mut FrameClock::new(config.fps),
        &mut FrameGovernor::unpaced(),
    );

    eprintln!("=== Sim result ({} mode) ===", mode);
    eprintln!("Frames: {}", summary.frames);
    eprintln!("Mode: {:?}", summary.last.mode);
    eprintln!("Lives: {}", summary.last.lives);
    for p in &summary.last.players {
        eprintln!("P{}: x={} y={} {:?}", p.slot, p.rect.x, p.rect.y, p.sprite_state);
    }

    let transcript = Transcript {
        config: None,
        frames,
    };
    println!("{}", serde_json::to_string(&transcript)?);
    Ok(())
}
