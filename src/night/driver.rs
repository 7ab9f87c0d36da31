//! Night shift driver - owns a session and every process acting on it
//!
//! Flow per firing:
//! clock -> power -> animatronic movement -> attack check -> outcome
//!
//! All timers live in one `Scheduler`. Each callback runs to completion
//! and starts with a liveness guard, so nothing mutates a session after
//! its terminal event. Starting a session cancels every timer of the
//! previous one before registering fresh ones.

use std::collections::VecDeque;

use tracing::{debug, error, info, trace};

use crate::core::config::SessionConfig;
use crate::core::error::{NightError, Result};
use crate::core::random::{RandomSource, SeededRandom};
use crate::core::types::{AnimatronicId, CameraId, DoorSide, Millis, SessionId};
use crate::night::animatronic::{MoveOutcome, Roster, BLACKOUT_STALKER, FOXY_DOOR, FOXY_HOME};
use crate::night::attack;
use crate::night::cameras::{CameraFeed, DoorView};
use crate::night::controls;
use crate::night::difficulty::NightSetup;
use crate::night::events::{AudioCue, NightEvent, NightObserver};
use crate::night::outcome::{self, Outcome, SessionReport};
use crate::night::power::{self, DrainOutcome};
use crate::night::session::{Session, SessionPhase};
use crate::schedule::{Fired, Scheduler, Task};

/// Movement processes in registration order
const MOVERS: [AnimatronicId; 4] = [
    AnimatronicId::Bonnie,
    AnimatronicId::Chica,
    AnimatronicId::Freddy,
    AnimatronicId::Foxy,
];

/// Polling queue capacity; the oldest events are dropped past this
pub const MAX_QUEUED_EVENTS: usize = 1024;

pub struct NightShift {
    config: SessionConfig,
    setup: NightSetup,
    session: Session,
    roster: Roster,
    scheduler: Scheduler,
    rng: Box<dyn RandomSource>,
    observers: Vec<Box<dyn NightObserver>>,
    outbox: VecDeque<NightEvent>,
    doors_shown: DoorView,
    last_report: Option<SessionReport>,
}

impl NightShift {
    pub fn new(config: SessionConfig, rng: impl RandomSource + 'static) -> Result<Self> {
        config.validate()?;
        let setup = NightSetup::scripted(1, &config);
        Ok(Self {
            roster: Roster::new(setup.levels),
            setup,
            config,
            session: Session::idle(),
            scheduler: Scheduler::new(),
            rng: Box::new(rng),
            observers: Vec::new(),
            outbox: VecDeque::new(),
            doors_shown: DoorView::default(),
            last_report: None,
        })
    }

    pub fn with_seed(config: SessionConfig, seed: u64) -> Result<Self> {
        Self::new(config, SeededRandom::new(seed))
    }

    pub fn subscribe(&mut self, observer: impl NightObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn setup(&self) -> &NightSetup {
        &self.setup
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Direct roster access for harnesses that stage a scenario
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn now(&self) -> Millis {
        self.scheduler.now()
    }

    /// Report of the most recent finished session
    pub fn last_report(&self) -> Option<&SessionReport> {
        self.last_report.as_ref()
    }

    /// Drain queued events (polling consumers)
    ///
    /// Holds at most `MAX_QUEUED_EVENTS` of the current session.
    pub fn take_events(&mut self) -> Vec<NightEvent> {
        self.outbox.drain(..).collect()
    }

    // === LIFECYCLE ===

    /// Reset everything and start a new session
    pub fn start(&mut self, setup: NightSetup) -> Result<SessionId> {
        setup.validate()?;
        self.scheduler.cancel_all();
        self.outbox.clear();

        let now = self.scheduler.now();
        self.session = Session::new(&setup, now);
        self.roster.reset(setup.levels);
        self.setup = setup;
        self.doors_shown = DoorView::default();

        self.scheduler.every(Task::Hour, self.setup.hour_ms)?;
        self.scheduler.every(Task::Power, self.config.power_tick_ms)?;
        for id in MOVERS {
            let period = self.setup.move_period(&self.config, id);
            self.scheduler.every(Task::Move(id), period)?;
        }
        self.scheduler
            .every(Task::AttackCheck, self.config.attack_check_ms)?;

        info!(
            session = ?self.session.id,
            night = self.setup.night,
            levels = ?self.setup.levels,
            easy = self.setup.easy_mode,
            "Night shift started"
        );

        self.emit(NightEvent::Started {
            session: self.session.id,
            night: self.session.night,
        });
        self.emit(NightEvent::HourChanged { hour: 0 });
        self.emit_power();
        self.emit_doors();
        self.emit_lights();
        Ok(self.session.id)
    }

    /// Tear down the current session without an outcome
    pub fn abort(&mut self) {
        self.scheduler.cancel_all();
        if self.session.is_playing() {
            self.session.phase = SessionPhase::Aborted;
            self.session.ended_at = Some(self.scheduler.now());
            info!(session = ?self.session.id, "Night shift aborted");
        }
    }

    /// Run every timer due within the next `dt` milliseconds
    pub fn advance(&mut self, dt: Millis) -> Result<()> {
        let until = self.scheduler.now().saturating_add(dt);
        while let Some(fired) = self.scheduler.pop_due(until) {
            self.dispatch(fired)?;
        }
        self.scheduler.settle(until);
        Ok(())
    }

    /// Advance in `step` increments until the session ends or `limit` passes
    pub fn run_to_end(&mut self, step: Millis, limit: Millis) -> Result<Option<SessionReport>> {
        let deadline = self.scheduler.now().saturating_add(limit);
        while self.session.is_playing() && self.scheduler.now() < deadline {
            let dt = step.min(deadline - self.scheduler.now());
            self.advance(dt)?;
        }
        Ok(if self.session.is_finished() {
            self.last_report.clone()
        } else {
            None
        })
    }

    /// Run one fired timer
    pub fn dispatch(&mut self, fired: Fired) -> Result<()> {
        if fired.epoch != self.scheduler.epoch() {
            error!(
                task = ?fired.task,
                epoch = fired.epoch,
                current = self.scheduler.epoch(),
                "Timer from a torn-down session"
            );
            return Err(NightError::StaleTask {
                task: fired.task,
                epoch: fired.epoch,
            });
        }

        match fired.task {
            Task::Hour => self.hour_tick(),
            Task::Power => self.power_tick(),
            Task::AttackCheck => self.attack_check(),
            Task::Move(id) => self.move_tick(id),
            Task::RushResolve => self.resolve_rush(),
            Task::BlackoutStrike => self.blackout_strike(),
        }
        Ok(())
    }

    // === PROCESSES ===

    pub fn hour_tick(&mut self) {
        if !self.session.is_playing() {
            return;
        }
        self.session.hour += 1;
        debug!(hour = self.session.hour, "Hour passed");
        self.emit(NightEvent::HourChanged {
            hour: self.session.hour,
        });

        if self.session.hour >= self.config.hours_per_night {
            self.victory();
        }
    }

    pub fn power_tick(&mut self) {
        if !self.session.is_playing() {
            return;
        }
        match power::drain(&mut self.session, self.setup.drain_per_unit) {
            DrainOutcome::Idle => {}
            DrainOutcome::Drained => {
                trace!(power = self.session.power, usage = self.session.power_usage, "Power drained");
                self.emit_power();
            }
            DrainOutcome::Exhausted => {
                self.emit_power();
                self.begin_blackout();
            }
        }
    }

    pub fn attack_check(&mut self) {
        if !self.session.is_playing() {
            return;
        }
        let attacker = attack::resolve(
            &self.session,
            &self.roster,
            self.rng.as_mut(),
            &self.config,
        );
        match attacker {
            Some(cause) => {
                self.jumpscare(cause);
            }
            None => self.refresh_doors(false),
        }
    }

    pub fn move_tick(&mut self, id: AnimatronicId) {
        if !self.session.is_playing() {
            return;
        }
        let outcome = self.roster.get_mut(id).tick(
            &self.session,
            self.rng.as_mut(),
            self.config.ai_roll_range,
        );

        match outcome {
            MoveOutcome::Stayed | MoveOutcome::Suppressed => {}
            MoveOutcome::Moved(location) => {
                debug!(animatronic = %id, to = %location, "Animatronic moved");
                self.refresh_camera();
                self.refresh_doors(false);
            }
            MoveOutcome::Escalated(stage) | MoveOutcome::Calmed(stage) => {
                debug!(stage, "Foxy stage changed");
                self.refresh_camera();
            }
            MoveOutcome::Rushed => {
                debug!("Foxy is running for the door");
                self.scheduler
                    .after(Task::RushResolve, self.config.rush_resolve_ms);
                self.refresh_camera();
                self.refresh_doors(false);
            }
        }
    }

    /// Foxy arrives at the door
    pub fn resolve_rush(&mut self) {
        if !self.session.is_playing() || !self.roster.get(AnimatronicId::Foxy).is_rushing() {
            return;
        }

        if !self.session.door_closed(FOXY_DOOR) {
            self.jumpscare(AnimatronicId::Foxy);
            return;
        }

        let penalty = self.config.rush_penalty_per_night * self.session.night as f32;
        debug!(penalty, "Foxy bangs on the closed door");
        self.roster.get_mut(AnimatronicId::Foxy).reset();
        self.emit(NightEvent::Cue(AudioCue::Door));

        match power::apply_penalty(&mut self.session, penalty) {
            DrainOutcome::Exhausted => {
                self.emit_power();
                self.begin_blackout();
            }
            _ => self.emit_power(),
        }
        self.refresh_camera();
        self.refresh_doors(false);
    }

    /// The delayed strike after the power ran out
    pub fn blackout_strike(&mut self) {
        if !self.session.is_playing() || self.session.power > 0.0 {
            return;
        }
        self.roster.get_mut(BLACKOUT_STALKER).force_to_door();
        self.jumpscare(BLACKOUT_STALKER);
    }

    fn begin_blackout(&mut self) {
        if !power::cut_power(&mut self.session) {
            return;
        }
        let spread = self.config.blackout_strike_spread_ms as f32;
        let delay = self.config.blackout_strike_min_ms + self.rng.roll(spread) as Millis;
        info!(delay_ms = delay, "Power out");

        self.scheduler.after(Task::BlackoutStrike, delay);
        self.emit(NightEvent::Cue(AudioCue::PowerOut));
        self.emit(NightEvent::PowerOut);
        self.emit_doors();
        self.emit_lights();
        self.emit_power();
        self.refresh_doors(true);
    }

    // === OUTCOMES ===

    /// Loss; only the first call of a session counts
    pub fn jumpscare(&mut self, cause: AnimatronicId) -> bool {
        let now = self.scheduler.now();
        let Some(report) = outcome::finish(&mut self.session, Outcome::Jumpscare(cause), now)
        else {
            debug!(animatronic = %cause, "Ignored jumpscare, session not playing");
            return false;
        };
        self.scheduler.cancel_all();
        info!(
            animatronic = %cause,
            night = report.night,
            hour = self.session.hour,
            "Caught"
        );

        if !self.session.easy_mode {
            self.emit(NightEvent::Cue(AudioCue::Jumpscare));
        }
        self.finish_with(report);
        true
    }

    /// Win; reached through the hour process
    pub fn victory(&mut self) -> bool {
        let now = self.scheduler.now();
        let Some(report) = outcome::finish(&mut self.session, Outcome::Victory, now) else {
            debug!("Ignored victory, session not playing");
            return false;
        };
        self.scheduler.cancel_all();
        info!(
            night = report.night,
            power = report.final_power,
            secs = report.time_survived_secs,
            "Survived the night"
        );

        self.emit(NightEvent::Cue(AudioCue::Victory));
        self.finish_with(report);
        true
    }

    fn finish_with(&mut self, report: SessionReport) {
        self.last_report = Some(report.clone());
        self.emit(NightEvent::Finished(report));
    }

    // === CONTROLS ===

    pub fn toggle_door(&mut self, side: DoorSide) -> bool {
        if !controls::toggle_door(&mut self.session, side) {
            debug!(?side, power = self.session.power, "Door input rejected");
            return false;
        }
        self.emit(NightEvent::Cue(AudioCue::Door));
        self.emit_doors();
        self.emit_power();
        true
    }

    pub fn toggle_light(&mut self, side: DoorSide) -> bool {
        if !controls::toggle_light(&mut self.session, side) {
            debug!(?side, power = self.session.power, "Light input rejected");
            return false;
        }
        self.emit_lights();
        self.emit_power();
        self.refresh_doors(true);
        true
    }

    pub fn toggle_camera(&mut self) -> bool {
        if !controls::toggle_camera(&mut self.session) {
            return false;
        }
        self.emit(NightEvent::Cue(AudioCue::Camera));
        self.emit(NightEvent::CameraChanged {
            open: self.session.camera_open,
            camera: self.session.current_camera,
        });
        self.emit_power();
        self.refresh_camera();
        true
    }

    pub fn switch_camera(&mut self, camera: CameraId) -> bool {
        if !controls::switch_camera(&mut self.session, camera) {
            return false;
        }
        self.emit(NightEvent::Cue(AudioCue::Camera));
        self.emit(NightEvent::CameraChanged {
            open: self.session.camera_open,
            camera,
        });
        self.refresh_camera();
        true
    }

    /// Current frame of the watched camera, if the monitor is up
    pub fn camera_feed(&self) -> Option<CameraFeed> {
        self.session
            .camera_open
            .then(|| CameraFeed::capture(&self.roster, self.session.current_camera))
    }

    pub fn door_view(&self) -> DoorView {
        DoorView::capture(&self.session, &self.roster)
    }

    /// Whether the watched camera is the one Foxy hides behind
    pub fn watching_cove(&self) -> bool {
        self.session.camera_open && self.session.current_camera == FOXY_HOME
    }

    // === DISPLAY ===

    fn refresh_camera(&mut self) {
        if let Some(feed) = self.camera_feed() {
            self.emit(NightEvent::CameraFeed(feed));
        }
    }

    fn refresh_doors(&mut self, force: bool) {
        let view = self.door_view();
        if force || view != self.doors_shown {
            self.doors_shown = view;
            self.emit(NightEvent::DoorVisitors(view));
        }
    }

    fn emit_power(&mut self) {
        self.emit(NightEvent::PowerChanged {
            power: self.session.power,
            usage: self.session.power_usage,
        });
    }

    fn emit_doors(&mut self) {
        self.emit(NightEvent::DoorsChanged {
            left_closed: self.session.left_door_closed,
            right_closed: self.session.right_door_closed,
        });
    }

    fn emit_lights(&mut self) {
        self.emit(NightEvent::LightsChanged {
            left_on: self.session.left_light_on,
            right_on: self.session.right_light_on,
        });
    }

    fn emit(&mut self, event: NightEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
        if self.outbox.len() >= MAX_QUEUED_EVENTS {
            self.outbox.pop_front();
        }
        self.outbox.push_back(event);
    }
}
