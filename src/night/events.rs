//! Events leaving the simulation core
//!
//! Display, audio, scoring and achievements all hang off this boundary.
//! Consumers either subscribe an observer or drain the event queue.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::core::types::{CameraId, SessionId};
use crate::night::cameras::{CameraFeed, DoorView};
use crate::night::outcome::SessionReport;

/// Sound cue points; the audio side picks and plays the sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    Door,
    Camera,
    Jumpscare,
    PowerOut,
    Victory,
}

impl AudioCue {
    pub fn name(&self) -> &'static str {
        match self {
            AudioCue::Door => "door",
            AudioCue::Camera => "camera",
            AudioCue::Jumpscare => "jumpscare",
            AudioCue::PowerOut => "powerout",
            AudioCue::Victory => "victory",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NightEvent {
    Started { session: SessionId, night: u32 },
    HourChanged { hour: u32 },
    PowerChanged { power: f32, usage: u32 },
    DoorsChanged { left_closed: bool, right_closed: bool },
    LightsChanged { left_on: bool, right_on: bool },
    DoorVisitors(DoorView),
    CameraChanged { open: bool, camera: CameraId },
    CameraFeed(CameraFeed),
    Cue(AudioCue),
    /// The power ran out; the blackout strike is pending
    PowerOut,
    Finished(SessionReport),
}

pub trait NightObserver {
    fn on_event(&mut self, event: &NightEvent);
}

// Lets the caller keep a handle on an observer after subscribing it
impl<O: NightObserver + ?Sized> NightObserver for Rc<RefCell<O>> {
    fn on_event(&mut self, event: &NightEvent) {
        self.borrow_mut().on_event(event);
    }
}

/// Observer that records everything it sees
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<NightEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> impl Iterator<Item = AudioCue> + '_ {
        self.events.iter().filter_map(|e| match e {
            NightEvent::Cue(cue) => Some(*cue),
            _ => None,
        })
    }

    pub fn reports(&self) -> impl Iterator<Item = &SessionReport> + '_ {
        self.events.iter().filter_map(|e| match e {
            NightEvent::Finished(report) => Some(report),
            _ => None,
        })
    }
}

impl NightObserver for EventLog {
    fn on_event(&mut self, event: &NightEvent) {
        self.events.push(event.clone());
    }
}
