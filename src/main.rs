//! Night Shift - Entry Point
//!
//! Runs one night headless (virtual time) or against the wall clock, then
//! prints the report, star rating and achievements.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use night_shift::core::config::SessionConfig;
use night_shift::core::error::{NightError, Result};
use night_shift::core::types::{DoorSide, Millis};
use night_shift::night::{power, preset, DifficultyTable, NightSetup, NightShift, SessionReport};
use night_shift::scoring::{Achievement, AchievementTracker, StarRating};

/// Virtual step per loop iteration
const STEP_MS: Millis = 100;

/// Night Shift - survive until 6 AM
#[derive(Parser, Debug)]
#[command(name = "night_shift")]
#[command(about = "Run one night shift in the security office")]
struct Args {
    /// Scripted night (1-6; higher plays as night 6)
    #[arg(long, default_value_t = 1)]
    night: u32,

    /// Custom night levels as freddy,bonnie,chica,foxy, or a preset name
    #[arg(long)]
    custom: Option<String>,

    /// Easy mode
    #[arg(long)]
    easy: bool,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Session tuning file (TOML)
    #[arg(long)]
    config: Option<String>,

    /// Follow the wall clock instead of running as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Wall-clock speed-up in realtime mode
    #[arg(long, default_value_t = 1.0)]
    speed: f32,

    /// Shut a door whenever someone stands in it
    #[arg(long)]
    guard: bool,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

#[derive(Serialize)]
struct NightResult {
    seed: u64,
    report: SessionReport,
    rating: StarRating,
    achievements: Vec<Achievement>,
    points: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("night_shift=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let mut setup = match &args.custom {
        Some(arg) => NightSetup::custom(parse_levels(arg)?, &config),
        None => NightSetup::scripted(args.night, &config),
    };
    if args.easy {
        setup = setup.with_easy_mode();
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let tracker = Rc::new(RefCell::new(AchievementTracker::new()));

    let mut shift = NightShift::with_seed(config.clone(), seed)?;
    shift.subscribe(tracker.clone());
    shift.start(setup)?;

    // Generous cap: a full night plus the longest blackout
    let limit = shift.setup().hour_ms * config.hours_per_night as Millis
        + config.blackout_strike_min_ms
        + config.blackout_strike_spread_ms;

    if args.realtime {
        let period = realtime_period(args.speed)?;
        let rt = Runtime::new()?;
        rt.block_on(run_realtime(&mut shift, period, args.guard, limit))?;
    } else {
        run_headless(&mut shift, args.guard, limit)?;
    }

    let Some(report) = shift.last_report().cloned() else {
        return Err(NightError::Unfinished { limit_ms: limit });
    };

    let tracker = tracker.borrow();
    let result = NightResult {
        seed,
        rating: StarRating::from_report(&report),
        achievements: tracker.unlocked().to_vec(),
        points: tracker.total_points(),
        report,
    };

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_text(&result);
    }
    Ok(())
}

fn run_headless(shift: &mut NightShift, guard: bool, limit: Millis) -> Result<()> {
    let deadline = shift.now() + limit;
    while shift.session().is_playing() && shift.now() < deadline {
        if guard {
            guard_doors(shift);
        }
        shift.advance(STEP_MS)?;
    }
    Ok(())
}

/// Wall-clock time per virtual step, never below 1 ms
fn realtime_period(speed: f32) -> Result<Duration> {
    if !(speed.is_finite() && speed > 0.0) {
        return Err(NightError::InvalidConfig(format!(
            "speed ({}) must be a positive number",
            speed
        )));
    }
    let nanos = (STEP_MS as f64 * 1_000_000.0 / speed as f64).round() as u64;
    Ok(Duration::from_nanos(nanos).max(Duration::from_millis(1)))
}

async fn run_realtime(
    shift: &mut NightShift,
    period: Duration,
    guard: bool,
    limit: Millis,
) -> Result<()> {
    let mut interval = tokio::time::interval(period);
    let deadline = shift.now() + limit;

    while shift.session().is_playing() && shift.now() < deadline {
        interval.tick().await;
        if guard {
            guard_doors(shift);
        }
        shift.advance(STEP_MS)?;
    }
    Ok(())
}

/// Close a door while someone is in it, open it again once they leave
fn guard_doors(shift: &mut NightShift) {
    for side in [DoorSide::Left, DoorSide::Right] {
        let occupied = shift.roster().door_visitor(side).is_some();
        if occupied != shift.session().door_closed(side) {
            shift.toggle_door(side);
        }
    }
}

fn parse_levels(arg: &str) -> Result<DifficultyTable> {
    if let Some(found) = preset(arg) {
        return Ok(found.levels);
    }

    let levels = arg
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| NightError::InvalidConfig(format!("custom levels '{}': {}", arg, e)))?;

    match levels.as_slice() {
        &[freddy, bonnie, chica, foxy] => {
            if levels.iter().any(|&l| l > DifficultyTable::MAX_LEVEL) {
                return Err(NightError::InvalidConfig(format!(
                    "custom levels must be 0-{}",
                    DifficultyTable::MAX_LEVEL
                )));
            }
            Ok(DifficultyTable::custom(freddy, bonnie, chica, foxy))
        }
        _ => Err(NightError::InvalidConfig(format!(
            "expected four levels, got '{}'",
            arg
        ))),
    }
}

fn print_text(result: &NightResult) {
    let report = &result.report;
    println!("\n=== NIGHT {} ===", report.night);
    match report.cause {
        None => println!("6 AM - you survived"),
        Some(cause) => println!("Caught by {}", cause),
    }
    println!(
        "Time: {}s  Power left: {}%{}",
        report.time_survived_secs,
        power::display_percent(report.final_power),
        if report.easy_mode { "  (easy)" } else { "" }
    );
    println!(
        "Rating: {} {}  Score: {}",
        result.rating.display(),
        result.rating.message(),
        result.rating.score
    );
    for achievement in &result.achievements {
        let tag = if achievement.is_secret() { " [secret]" } else { "" };
        println!("  Unlocked {:?} (+{}){}", achievement, achievement.points(), tag);
    }
    println!("Seed: {}", result.seed);
}
