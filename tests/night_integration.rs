//! End-to-end nights driven through `NightShift`

use std::cell::RefCell;
use std::rc::Rc;

use night_shift::core::config::SessionConfig;
use night_shift::core::random::ScriptedRandom;
use night_shift::core::types::{AnimatronicId, CameraId, DoorSide, Location};
use night_shift::night::*;
use night_shift::scoring::{Achievement, AchievementTracker, StarRating};

const ALWAYS: f32 = 0.0;
const NEVER: f32 = 0.999;

fn shift_with(config: SessionConfig, fraction: f32) -> NightShift {
    NightShift::new(config, ScriptedRandom::always(fraction)).unwrap()
}

fn shift(fraction: f32) -> NightShift {
    shift_with(SessionConfig::default(), fraction)
}

fn finished_count(events: &[NightEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, NightEvent::Finished(_)))
        .count()
}

#[test]
fn test_power_runs_out_then_stalker_strikes() {
    // Hours long enough that the battery dies first
    let config = SessionConfig {
        hour_ms: 10_000_000,
        ..SessionConfig::default()
    };
    let mut night = shift_with(config, NEVER);
    night.start(NightSetup::scripted(1, night.config())).unwrap();

    while !night.session().power_out {
        night.advance(100).unwrap();
        assert!(night.now() < 600_000, "power should be gone by now");
    }
    let out_at = night.now();

    let session = night.session();
    assert_eq!(session.power, 0.0);
    assert!(!session.left_door_closed);
    assert!(!session.right_door_closed);
    assert!(!session.left_light_on);
    assert!(!session.right_light_on);
    assert!(session.is_playing());

    night.run_to_end(100, 20_000).unwrap();

    let report = night.last_report().unwrap();
    assert!(!report.survived);
    assert_eq!(report.cause, Some(BLACKOUT_STALKER));
    let strike_delay = night.session().ended_at.unwrap() - out_at;
    assert!((5_000..=15_000).contains(&strike_delay));
    assert!(night.roster().get(BLACKOUT_STALKER).is_at_door());
}

#[test]
fn test_blackout_forces_consumers_off() {
    let config = SessionConfig {
        drain_per_unit: 5.0,
        ..SessionConfig::default()
    };
    let mut night = shift_with(config, NEVER);
    night.start(NightSetup::scripted(1, night.config())).unwrap();
    night.toggle_door(DoorSide::Left);
    night.toggle_light(DoorSide::Right);
    night.take_events();

    night.advance(1_000).unwrap();

    let session = night.session();
    assert!(session.power_out);
    assert!(!session.left_door_closed);
    assert!(!session.right_light_on);
    assert_eq!(session.power_usage, 1);

    // Dead controls
    assert!(!night.toggle_door(DoorSide::Left));
    assert!(!night.toggle_light(DoorSide::Left));
    assert!(night.take_events().contains(&NightEvent::Cue(AudioCue::PowerOut)));
}

#[test]
fn test_closed_door_blocks_every_attack() {
    let mut night = shift(ALWAYS);
    night.start(NightSetup::scripted(1, night.config())).unwrap();
    assert!(night.toggle_door(DoorSide::Left));
    night.roster_mut().get_mut(AnimatronicId::Bonnie).force_to_door();

    for _ in 0..100 {
        night.attack_check();
    }

    assert!(night.session().is_playing());
    assert!(night.last_report().is_none());
    assert_eq!(
        night.roster().get(AnimatronicId::Bonnie).position(),
        Location::LEFT_DOOR
    );
}

#[test]
fn test_open_door_attack_lands_first_check() {
    let mut night = shift(ALWAYS);
    night.start(NightSetup::scripted(1, night.config())).unwrap();
    night.roster_mut().get_mut(AnimatronicId::Bonnie).force_to_door();

    night.attack_check();

    assert!(night.session().is_game_over());
    assert_eq!(night.session().cause, Some(AnimatronicId::Bonnie));
    assert_eq!(
        night.last_report().unwrap().cause,
        Some(AnimatronicId::Bonnie)
    );
}

#[test]
fn test_six_hours_win_once() {
    let mut night = shift(NEVER);
    night.start(NightSetup::scripted(1, night.config())).unwrap();
    night.take_events();

    for _ in 0..6 {
        night.hour_tick();
    }
    assert_eq!(night.session().hour, 6);
    assert_eq!(night.session().phase, SessionPhase::Won);

    // A stray extra firing changes nothing
    night.hour_tick();
    assert_eq!(night.session().hour, 6);

    let events = night.take_events();
    assert_eq!(finished_count(&events), 1);
    assert!(night.last_report().unwrap().survived);
    assert_eq!(night.scheduler().pending(), 0);
}

#[test]
fn test_foxy_rush_against_closed_door() {
    let mut night = shift(ALWAYS);
    night.start(NightSetup::scripted(1, night.config())).unwrap();

    for expected in 1..FOXY_RUSH_STAGE {
        night.move_tick(AnimatronicId::Foxy);
        let foxy = night.roster().get(AnimatronicId::Foxy);
        assert_eq!(foxy.stage(), Some(expected));
        assert_eq!(foxy.position(), Location::Camera(FOXY_HOME));
    }

    night.move_tick(AnimatronicId::Foxy);
    let foxy = night.roster().get(AnimatronicId::Foxy);
    assert!(foxy.is_rushing());
    assert_eq!(foxy.position(), Location::Door(FOXY_DOOR));
    assert!(night.scheduler().is_scheduled(night_shift::schedule::Task::RushResolve));

    assert!(night.toggle_door(FOXY_DOOR));
    night.take_events();
    night.advance(night.config().rush_resolve_ms).unwrap();

    let foxy = night.roster().get(AnimatronicId::Foxy);
    assert_eq!(foxy.stage(), Some(0));
    assert_eq!(foxy.position(), Location::Camera(FOXY_HOME));
    assert!(night.session().is_playing());

    // 15 drain ticks at usage 2, plus 5% for night 1
    let expected = 100.0 - 15.0 * 2.0 * 0.018 - 5.0;
    assert!((night.session().power - expected).abs() < 0.01);
    assert!(night.take_events().contains(&NightEvent::Cue(AudioCue::Door)));
}

#[test]
fn test_foxy_rush_through_open_door() {
    let mut night = shift(ALWAYS);
    night.start(NightSetup::scripted(1, night.config())).unwrap();
    for _ in 0..FOXY_RUSH_STAGE {
        night.move_tick(AnimatronicId::Foxy);
    }

    night.advance(night.config().rush_resolve_ms).unwrap();

    assert_eq!(night.session().cause, Some(AnimatronicId::Foxy));
}

#[test]
fn test_rush_penalty_can_empty_the_battery() {
    let config = SessionConfig {
        rush_penalty_per_night: 200.0,
        ..SessionConfig::default()
    };
    let mut night = shift_with(config, ALWAYS);
    night.start(NightSetup::scripted(1, night.config())).unwrap();
    night.toggle_door(FOXY_DOOR);
    night.roster_mut().get_mut(AnimatronicId::Foxy).set_stage(3);
    night.move_tick(AnimatronicId::Foxy);

    night.resolve_rush();

    assert_eq!(night.session().power, 0.0);
    assert!(night.session().power_out);
    assert!(!night.session().left_door_closed);
    assert!(night
        .scheduler()
        .is_scheduled(night_shift::schedule::Task::BlackoutStrike));
}

#[test]
fn test_second_jumpscare_is_ignored() {
    let mut night = shift(NEVER);
    night.start(NightSetup::scripted(2, night.config())).unwrap();
    night.take_events();

    assert!(night.jumpscare(AnimatronicId::Chica));
    let ended_at = night.session().ended_at;
    assert!(!night.jumpscare(AnimatronicId::Foxy));
    assert!(!night.victory());

    assert_eq!(night.session().cause, Some(AnimatronicId::Chica));
    assert_eq!(night.session().ended_at, ended_at);
    assert_eq!(finished_count(&night.take_events()), 1);
}

#[test]
fn test_pending_rush_does_not_leak_into_next_session() {
    let mut night = shift(ALWAYS);
    night.start(NightSetup::scripted(1, night.config())).unwrap();
    for _ in 0..FOXY_RUSH_STAGE {
        night.move_tick(AnimatronicId::Foxy);
    }
    let first = night.session().id;

    // Nobody moves in the second session
    let quiet = NightSetup::custom(DifficultyTable::new(0, 0, 0, 0), night.config());
    let second = night.start(quiet).unwrap();
    assert_ne!(first, second);

    night.advance(5_000).unwrap();

    assert!(night.session().is_playing());
    assert!(!night.roster().get(AnimatronicId::Foxy).is_rushing());
    assert_eq!(night.roster().get(AnimatronicId::Foxy).stage(), Some(0));
}

#[test]
fn test_pending_blackout_does_not_leak_into_next_session() {
    let mut night = shift(NEVER);
    let mut doomed = NightSetup::scripted(1, night.config());
    doomed.drain_per_unit = 60.0;
    night.start(doomed).unwrap();
    night.advance(200).unwrap();
    assert!(night.session().power_out);

    night.start(NightSetup::scripted(1, night.config())).unwrap();
    night.advance(20_000).unwrap();

    assert!(night.session().is_playing());
    assert!(!night.session().power_out);
    assert!(night.last_report().is_none());
    assert!(night.session().power > 96.0);
}

#[test]
fn test_freddy_holds_still_on_camera() {
    let mut night = shift(ALWAYS);
    night.start(NightSetup::scripted(3, night.config())).unwrap();
    night.toggle_camera();

    night.move_tick(AnimatronicId::Freddy);
    assert_eq!(night.roster().get(AnimatronicId::Freddy).path_index(), Some(0));

    night.toggle_camera();
    night.move_tick(AnimatronicId::Freddy);
    assert_eq!(night.roster().get(AnimatronicId::Freddy).path_index(), Some(1));
}

#[test]
fn test_light_reveals_door_visitor() {
    let mut night = shift(NEVER);
    night.start(NightSetup::scripted(1, night.config())).unwrap();
    night.roster_mut().get_mut(AnimatronicId::Chica).force_to_door();

    assert_eq!(night.door_view().right, None);
    night.toggle_light(DoorSide::Right);
    assert_eq!(night.door_view().right, Some(AnimatronicId::Chica));
    assert_eq!(night.door_view().left, None);
}

#[test]
fn test_camera_works_during_blackout() {
    let mut night = shift(NEVER);
    let mut doomed = NightSetup::scripted(1, night.config());
    doomed.drain_per_unit = 60.0;
    night.start(doomed).unwrap();
    night.advance(200).unwrap();

    assert!(night.toggle_camera());
    assert!(night.switch_camera(CameraId::PirateCove));
    assert!(night.watching_cove());
    assert_eq!(night.camera_feed().unwrap().cove, Some(CoveView::BehindCurtain));
}

#[test]
fn test_same_seed_same_night() {
    let run = |seed| {
        let mut night = NightShift::with_seed(SessionConfig::default(), seed).unwrap();
        night.start(NightSetup::scripted(4, night.config())).unwrap();
        night.run_to_end(100, 700_000).unwrap().unwrap()
    };

    let a = run(7);
    let b = run(7);
    assert_eq!(a.survived, b.survived);
    assert_eq!(a.cause, b.cause);
    assert_eq!(a.final_power, b.final_power);
    assert_eq!(a.time_survived_secs, b.time_survived_secs);
}

#[test]
fn test_quiet_night_earns_rating_and_achievements() {
    let mut night = shift(NEVER);
    let tracker = Rc::new(RefCell::new(AchievementTracker::new()));
    night.subscribe(tracker.clone());
    night.start(NightSetup::scripted(1, night.config())).unwrap();

    let report = night.run_to_end(1_000, 600_000).unwrap().unwrap();

    assert!(report.survived);
    assert_eq!(report.time_survived_secs, 540);
    assert!(!report.camera_ever_used);
    // 540 s of base load only
    assert!((report.final_power - 2.8).abs() < 0.05);

    let rating = StarRating::from_report(&report);
    assert_eq!(rating.stars, 1);

    let tracker = tracker.borrow();
    assert!(tracker.is_unlocked(Achievement::SurviveNight(1)));
    assert!(tracker.is_unlocked(Achievement::BlindPlay));
    assert!(!tracker.is_unlocked(Achievement::PowerSaver));
}

#[test]
fn test_easy_mode_stretches_the_night() {
    let mut night = shift(NEVER);
    let setup = NightSetup::scripted(1, night.config()).with_easy_mode();
    night.start(setup).unwrap();

    let report = night.run_to_end(1_000, 700_000).unwrap().unwrap();

    assert!(report.survived);
    assert!(report.easy_mode);
    assert_eq!(report.time_survived_secs, 648);
    assert_eq!(night.setup().levels, DifficultyTable::new(0, 1, 1, 0));
}

#[test]
fn test_config_file_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/night.toml");
    let config = SessionConfig::load(path).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.hours_per_night, 6);
}

/// Power out at about 534 s with the strike still pending at 6 AM
fn blackout_before_dawn(night: &mut NightShift, log: &Rc<RefCell<EventLog>>) {
    night.subscribe(log.clone());
    night.start(NightSetup::scripted(1, night.config())).unwrap();
    night.advance(530_000).unwrap();

    // Every consumer on: usage 6 empties the last ~4.6% in under 5 s
    for side in [DoorSide::Left, DoorSide::Right] {
        assert!(night.toggle_door(side));
        assert!(night.toggle_light(side));
    }
    assert!(night.toggle_camera());
    night.advance(9_000).unwrap();

    assert!(night.session().power_out);
    assert!(night.session().is_playing());
    assert_eq!(night.session().hour, 5);
    assert!(night
        .scheduler()
        .is_scheduled(night_shift::schedule::Task::BlackoutStrike));
}

#[test]
fn test_dawn_beats_a_pending_blackout_strike() {
    let mut night = shift(NEVER);
    let log = Rc::new(RefCell::new(EventLog::new()));
    blackout_before_dawn(&mut night, &log);

    // 6 AM at 540 s, strike would land near 549 s
    night.advance(30_000).unwrap();

    assert_eq!(night.session().phase, SessionPhase::Won);
    assert_eq!(night.session().cause, None);
    let report = night.last_report().unwrap();
    assert!(report.survived);
    assert_eq!(report.final_power, 0.0);
    assert_eq!(log.borrow().reports().count(), 1);
    assert!(!log.borrow().cues().any(|c| c == AudioCue::Jumpscare));
}

#[test]
fn test_earlier_jumpscare_beats_a_pending_blackout_strike() {
    let mut night = shift(NEVER);
    let log = Rc::new(RefCell::new(EventLog::new()));
    blackout_before_dawn(&mut night, &log);

    assert!(night.jumpscare(AnimatronicId::Bonnie));
    night.advance(30_000).unwrap();

    assert!(night.session().is_game_over());
    assert_eq!(night.session().cause, Some(AnimatronicId::Bonnie));
    assert!(!night.roster().get(BLACKOUT_STALKER).is_at_door());
    assert_eq!(log.borrow().reports().count(), 1);
    assert!(!night.last_report().unwrap().survived);
}

#[test]
fn test_nights_past_the_nightmare_are_not_custom() {
    let mut night = shift(NEVER);
    night.start(NightSetup::scripted(CUSTOM_NIGHT, night.config())).unwrap();

    assert_eq!(night.session().night, NIGHTMARE_NIGHT);
    assert!(!night.setup().custom);
}
