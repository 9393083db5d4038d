use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use glory_core::*;

const USAGE: &str =
    "usage: glory-host <levels-dir> [transcript.json|-] [--config cfg.json] [--draw] [--paced]";

struct Args {
    levels_dir: PathBuf,
    transcript: Option<PathBuf>,
    config: Option<PathBuf>,
    draw: bool,
    paced: bool,
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut draw = false;
    let mut paced = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a file path")?;
                config = Some(PathBuf::from(path));
            }
            "--draw" => draw = true,
            "--paced" => paced = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("unknown flag {flag}\n{USAGE}"),
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let mut positional = positional.into_iter();
    let levels_dir = positional.next().context(USAGE)?;
    // "-" and a missing path both mean stdin.
    let transcript = positional.next().filter(|p| p.as_os_str() != "-");
    if let Some(extra) = positional.next() {
        bail!("unexpected argument {}\n{USAGE}", extra.display());
    }

    Ok(Args {
        levels_dir,
        transcript,
        config,
        draw,
        paced,
    })
}

fn load_transcript(path: Option<&Path>) -> Result<Transcript> {
    let json = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read transcript {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read transcript from stdin")?;
            buf
        }
    };
    Ok(Transcript::from_json(&json)?)
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

fn print_result(summary: &RunSummary, hash: &[u8; 32]) {
    let last = &summary.last;
    println!("=== Run result ===");
    println!("End: {:?} after {} frames", summary.end, summary.frames);
    println!("Mode: {:?}", last.mode);
    println!("Level: {} `{}`", last.level_index + 1, last.level_name);
    println!("Lives: {}", last.lives);
    for p in &last.players {
        println!(
            "P{} ({}): x={} y={} vx={} vy={} {} {}",
            p.slot,
            CHARACTER_NAMES[p.slot],
            p.rect.x,
            p.rect.y,
            p.vx,
            p.vy,
            p.sprite_state,
            p.facing
        );
    }
    println!("Transcript hash: {}", hex::encode(hash));
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let transcript = load_transcript(args.transcript.as_deref())?;
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => transcript.config.clone().unwrap_or_default(),
    };

    let files = load_level_dir(&args.levels_dir)
        .with_context(|| format!("failed to load levels from {}", args.levels_dir.display()))?;
    let levels = LevelSet::new(&files, config.screen())?;
    let mut session = Session::new(config.clone(), levels, default_roster())?;

    log::info!("replaying {} frames", transcript.frames.len());
    let hash = hash_transcript(&transcript.frames);
    let mut presenter = LastFrame::default();
    let mut replay = Replay::new(transcript.frames);

    let summary = if args.paced {
        run(
            &mut session,
            &mut replay,
            &mut presenter,
            &mut MonotonicClock::new(),
            &mut FrameGovernor::paced(config.fps),
        )
    } else {
        run(
            &mut session,
            &mut replay,
            &mut presenter,
            &mut FrameClock::new(config.fps),
            &mut FrameGovernor::unpaced(),
        )
    };

    print_result(&summary, &hash);
    if args.draw {
        println!("{}", serde_json::to_string_pretty(&presenter.calls)?);
    }
    Ok(())
}
