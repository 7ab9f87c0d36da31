//! Camera registry and what each feed shows
//!
//! The registry is static. Feeds are computed on demand from the roster,
//! so a refresh never shows a stale frame.

use serde::{Deserialize, Serialize};

use crate::core::types::{AnimatronicId, CameraId, DoorSide, Location};
use crate::night::animatronic::{Roster, FOXY_HOME};
use crate::night::session::Session;

/// Display metadata of one camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraInfo {
    pub id: CameraId,
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub fn info(id: CameraId) -> CameraInfo {
    let (name, description) = match id {
        CameraId::ShowStage => ("Show Stage", "Main stage area"),
        CameraId::DiningArea => ("Dining Area", "Tables and chairs"),
        CameraId::WestHall => ("West Hall", "Left corridor"),
        CameraId::WestHallCorner => ("West Hall Corner", "Near left door"),
        CameraId::PirateCove => ("Pirate Cove", "Foxy's lair"),
        CameraId::EastHall => ("East Hall", "Right corridor"),
        CameraId::EastHallCorner => ("East Hall Corner", "Near right door"),
    };
    CameraInfo {
        id,
        code: id.code(),
        name,
        description,
    }
}

pub fn registry() -> impl Iterator<Item = CameraInfo> {
    CameraId::ALL.into_iter().map(info)
}

/// What the Pirate Cove feed shows of Foxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoveView {
    BehindCurtain,
    Peeking,
    OutOfCove,
    Empty,
}

impl CoveView {
    pub fn from_stage(stage: u8) -> Self {
        match stage {
            0 => CoveView::BehindCurtain,
            1 => CoveView::Peeking,
            2 => CoveView::OutOfCove,
            _ => CoveView::Empty,
        }
    }
}

/// One frame of a camera feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraFeed {
    pub camera: CameraId,
    pub occupants: Vec<AnimatronicId>,
    /// Set only for Pirate Cove
    pub cove: Option<CoveView>,
}

impl CameraFeed {
    pub fn capture(roster: &Roster, camera: CameraId) -> Self {
        let occupants = roster.at(Location::Camera(camera)).collect();
        let cove = (camera == FOXY_HOME).then(|| {
            let stage = roster.get(AnimatronicId::Foxy).stage().unwrap_or(0);
            CoveView::from_stage(stage)
        });
        Self {
            camera,
            occupants,
            cove,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }
}

/// Who is visible in each doorway
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorView {
    pub left: Option<AnimatronicId>,
    pub right: Option<AnimatronicId>,
}

impl DoorView {
    /// Doorways are only visible with the light on
    pub fn capture(session: &Session, roster: &Roster) -> Self {
        let seen = |side| {
            if session.light_on(side) {
                roster.door_visitor(side)
            } else {
                None
            }
        };
        Self {
            left: seen(DoorSide::Left),
            right: seen(DoorSide::Right),
        }
    }
}
