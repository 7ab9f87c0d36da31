//! The Session aggregate - everything one play attempt knows about itself

use serde::{Deserialize, Serialize};

use crate::core::types::{AnimatronicId, CameraId, DoorSide, Millis, SessionId};
use crate::night::difficulty::NightSetup;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Nothing started yet
    Idle,
    Playing,
    /// Survived until the last hour
    Won,
    /// Caught by an animatronic
    Lost,
    /// Torn down before a terminal event
    Aborted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub night: u32,
    /// 0 = 12 AM; the night is won at `hours_per_night`
    pub hour: u32,
    /// Remaining power in percent, never below 0
    pub power: f32,
    /// Active consumers including the base load (1..=6)
    pub power_usage: u32,
    pub phase: SessionPhase,
    /// Power ran out and the blackout strike is pending
    pub power_out: bool,
    pub camera_open: bool,
    pub current_camera: CameraId,
    pub left_door_closed: bool,
    pub right_door_closed: bool,
    pub left_light_on: bool,
    pub right_light_on: bool,
    pub camera_ever_used: bool,
    pub easy_mode: bool,
    pub started_at: Millis,
    pub ended_at: Option<Millis>,
    pub cause: Option<AnimatronicId>,
}

impl Session {
    /// A fresh session at 12 AM with full power
    pub fn new(setup: &NightSetup, started_at: Millis) -> Self {
        Self {
            id: SessionId::new(),
            night: setup.night,
            hour: 0,
            power: 100.0,
            power_usage: 1,
            phase: SessionPhase::Playing,
            power_out: false,
            camera_open: false,
            current_camera: CameraId::ShowStage,
            left_door_closed: false,
            right_door_closed: false,
            left_light_on: false,
            right_light_on: false,
            camera_ever_used: false,
            easy_mode: setup.easy_mode,
            started_at,
            ended_at: None,
            cause: None,
        }
    }

    /// Placeholder before the first start
    pub fn idle() -> Self {
        Self {
            phase: SessionPhase::Idle,
            ..Self::new(&NightSetup::scripted(1, &Default::default()), 0)
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == SessionPhase::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::Lost
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, SessionPhase::Won | SessionPhase::Lost)
    }

    pub fn door_closed(&self, side: DoorSide) -> bool {
        match side {
            DoorSide::Left => self.left_door_closed,
            DoorSide::Right => self.right_door_closed,
        }
    }

    pub fn light_on(&self, side: DoorSide) -> bool {
        match side {
            DoorSide::Left => self.left_light_on,
            DoorSide::Right => self.right_light_on,
        }
    }

    pub(crate) fn door_mut(&mut self, side: DoorSide) -> &mut bool {
        match side {
            DoorSide::Left => &mut self.left_door_closed,
            DoorSide::Right => &mut self.right_door_closed,
        }
    }

    pub(crate) fn light_mut(&mut self, side: DoorSide) -> &mut bool {
        match side {
            DoorSide::Left => &mut self.left_light_on,
            DoorSide::Right => &mut self.right_light_on,
        }
    }

    /// Milliseconds since start, frozen once the session ends
    pub fn elapsed_ms(&self, now: Millis) -> Millis {
        self.ended_at.unwrap_or(now).saturating_sub(self.started_at)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::idle()
    }
}
