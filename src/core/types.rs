//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for one play attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulation time in milliseconds since the scheduler was created
pub type Millis = u64;

/// The four animatronics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimatronicId {
    Freddy,
    Bonnie,
    Chica,
    Foxy,
}

impl AnimatronicId {
    pub const ALL: [AnimatronicId; 4] = [
        AnimatronicId::Freddy,
        AnimatronicId::Bonnie,
        AnimatronicId::Chica,
        AnimatronicId::Foxy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AnimatronicId::Freddy => "Freddy",
            AnimatronicId::Bonnie => "Bonnie",
            AnimatronicId::Chica => "Chica",
            AnimatronicId::Foxy => "Foxy",
        }
    }

    /// Index into per-agent arrays (difficulty tables, roster slots)
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for AnimatronicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which side of the office
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorSide {
    Left,
    Right,
}

/// Surveillance cameras
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraId {
    ShowStage,
    DiningArea,
    WestHall,
    WestHallCorner,
    PirateCove,
    EastHall,
    EastHallCorner,
}

impl CameraId {
    pub const ALL: [CameraId; 7] = [
        CameraId::ShowStage,
        CameraId::DiningArea,
        CameraId::WestHall,
        CameraId::WestHallCorner,
        CameraId::PirateCove,
        CameraId::EastHall,
        CameraId::EastHallCorner,
    ];

    /// Short code printed on the feed ("CAM 1A")
    pub fn code(&self) -> &'static str {
        match self {
            CameraId::ShowStage => "1A",
            CameraId::DiningArea => "1B",
            CameraId::WestHall => "2A",
            CameraId::WestHallCorner => "2B",
            CameraId::PirateCove => "3",
            CameraId::EastHall => "4A",
            CameraId::EastHallCorner => "4B",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|cam| cam.code().eq_ignore_ascii_case(code))
    }
}

/// A location token an animatronic can occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Camera(CameraId),
    /// Door sentinel: standing in the office doorway
    Door(DoorSide),
}

impl Location {
    pub const LEFT_DOOR: Location = Location::Door(DoorSide::Left);
    pub const RIGHT_DOOR: Location = Location::Door(DoorSide::Right);

    pub fn is_door(&self) -> bool {
        matches!(self, Location::Door(_))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Camera(cam) => write!(f, "CAM {}", cam.code()),
            Location::Door(DoorSide::Left) => f.write_str("LEFT_DOOR"),
            Location::Door(DoorSide::Right) => f.write_str("RIGHT_DOOR"),
        }
    }
}
