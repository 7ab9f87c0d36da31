//! Night shift simulation - the security office
//!
//! A session runs from 12 AM to 6 AM. Four animatronics roam the building
//! while the player spends a finite battery on doors, lights and cameras.
//!
//! Key pieces:
//! - `driver::NightShift` owns the session and its timers
//! - `power` turns active consumers into drain and handles the blackout
//! - `animatronic` holds the movement state machines
//! - `attack` decides whether someone in a doorway gets in
//! - `outcome` makes win and loss final and builds the report

pub mod animatronic;
pub mod attack;
pub mod cameras;
pub mod controls;
pub mod difficulty;
pub mod driver;
pub mod events;
pub mod outcome;
pub mod power;
pub mod session;

// Re-exports for convenient access
pub use animatronic::{
    path_of, Animatronic, MoveOutcome, Roster, BLACKOUT_STALKER, CAMERA_SHY, FOXY_DOOR,
    FOXY_HOME, FOXY_RUSH_STAGE,
};
pub use cameras::{CameraFeed, CameraInfo, CoveView, DoorView};
pub use difficulty::{
    is_night_unlocked, preset, DifficultyTable, NightSetup, Preset, CUSTOM_NIGHT, EASY_MODE,
    NIGHTMARE_NIGHT, PRESETS,
};
pub use driver::{NightShift, MAX_QUEUED_EVENTS};
pub use events::{AudioCue, EventLog, NightEvent, NightObserver};
pub use outcome::{Outcome, SessionReport};
pub use session::{Session, SessionPhase};
