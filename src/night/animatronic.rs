//! Animatronic state machines
//!
//! Freddy, Bonnie and Chica walk a fixed path one step at a time and never
//! step back. Foxy instead escalates through stages in Pirate Cove and
//! rushes the left door once the last stage is reached.

use crate::core::random::RandomSource;
use crate::core::types::{AnimatronicId, CameraId, DoorSide, Location};
use crate::night::difficulty::DifficultyTable;
use crate::night::session::Session;

use CameraId::*;

pub const FREDDY_PATH: [Location; 6] = [
    Location::Camera(ShowStage),
    Location::Camera(DiningArea),
    Location::Camera(WestHall),
    Location::Camera(EastHall),
    Location::Camera(EastHallCorner),
    Location::RIGHT_DOOR,
];

pub const BONNIE_PATH: [Location; 6] = [
    Location::Camera(ShowStage),
    Location::Camera(DiningArea),
    Location::Camera(PirateCove),
    Location::Camera(WestHall),
    Location::Camera(WestHallCorner),
    Location::LEFT_DOOR,
];

pub const CHICA_PATH: [Location; 5] = [
    Location::Camera(ShowStage),
    Location::Camera(DiningArea),
    Location::Camera(EastHall),
    Location::Camera(EastHallCorner),
    Location::RIGHT_DOOR,
];

pub const FOXY_HOME: CameraId = PirateCove;
pub const FOXY_DOOR: DoorSide = DoorSide::Left;
/// Stage at which Foxy leaves the cove
pub const FOXY_RUSH_STAGE: u8 = 4;

/// Only moves while the cameras are down
pub const CAMERA_SHY: AnimatronicId = AnimatronicId::Freddy;

/// Forced to the door when the power runs out
pub const BLACKOUT_STALKER: AnimatronicId = AnimatronicId::Freddy;

pub fn path_of(id: AnimatronicId) -> Option<&'static [Location]> {
    match id {
        AnimatronicId::Freddy => Some(&FREDDY_PATH),
        AnimatronicId::Bonnie => Some(&BONNIE_PATH),
        AnimatronicId::Chica => Some(&CHICA_PATH),
        AnimatronicId::Foxy => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Motion {
    Walk {
        path: &'static [Location],
        step: usize,
    },
    Rush {
        stage: u8,
        /// Out of the cove and on the way to the door
        rushing: bool,
    },
}

/// Result of one movement tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Roll failed, or already at the end of the path
    Stayed,
    /// Not allowed to act this tick
    Suppressed,
    Moved(Location),
    Escalated(u8),
    /// Watched on camera; stage after the decrease
    Calmed(u8),
    /// Foxy left the cove and is now at the door
    Rushed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animatronic {
    pub id: AnimatronicId,
    pub ai_level: u8,
    motion: Motion,
}

impl Animatronic {
    pub fn new(id: AnimatronicId, ai_level: u8) -> Self {
        let motion = match path_of(id) {
            Some(path) => Motion::Walk { path, step: 0 },
            None => Motion::Rush {
                stage: 0,
                rushing: false,
            },
        };
        Self {
            id,
            ai_level,
            motion,
        }
    }

    pub fn position(&self) -> Location {
        match &self.motion {
            Motion::Walk { path, step } => path[*step],
            Motion::Rush { rushing: true, .. } => Location::Door(FOXY_DOOR),
            Motion::Rush { rushing: false, .. } => Location::Camera(FOXY_HOME),
        }
    }

    /// Index into the path, walkers only
    pub fn path_index(&self) -> Option<usize> {
        match &self.motion {
            Motion::Walk { step, .. } => Some(*step),
            Motion::Rush { .. } => None,
        }
    }

    /// Cove stage, Foxy only
    pub fn stage(&self) -> Option<u8> {
        match &self.motion {
            Motion::Rush { stage, .. } => Some(*stage),
            Motion::Walk { .. } => None,
        }
    }

    pub fn is_rushing(&self) -> bool {
        matches!(self.motion, Motion::Rush { rushing: true, .. })
    }

    pub fn is_at_door(&self) -> bool {
        self.position().is_door()
    }

    /// Roll against the AI level
    pub fn roll(&self, rng: &mut dyn RandomSource, range: f32) -> bool {
        rng.roll(range) < self.ai_level as f32
    }

    /// Back to the starting position
    pub fn reset(&mut self) {
        match &mut self.motion {
            Motion::Walk { step, .. } => *step = 0,
            Motion::Rush { stage, rushing } => {
                *stage = 0;
                *rushing = false;
            }
        }
    }

    /// Put the animatronic straight into its doorway
    pub fn force_to_door(&mut self) {
        match &mut self.motion {
            Motion::Walk { path, step } => *step = path.len() - 1,
            Motion::Rush { stage, rushing } => {
                *stage = FOXY_RUSH_STAGE;
                *rushing = true;
            }
        }
    }

    /// Force Foxy's cove stage (below the rush stage)
    pub fn set_stage(&mut self, new_stage: u8) {
        if let Motion::Rush { stage, rushing } = &mut self.motion {
            *stage = new_stage.min(FOXY_RUSH_STAGE - 1);
            *rushing = false;
        }
    }

    /// One movement tick
    pub fn tick(
        &mut self,
        session: &Session,
        rng: &mut dyn RandomSource,
        roll_range: f32,
    ) -> MoveOutcome {
        if self.id == CAMERA_SHY && session.camera_open {
            return MoveOutcome::Suppressed;
        }

        let watched_cove =
            session.camera_open && session.current_camera == FOXY_HOME;
        let passes = match &self.motion {
            Motion::Rush { rushing: true, .. } => return MoveOutcome::Suppressed,
            Motion::Rush { .. } if watched_cove => false,
            _ => self.roll(rng, roll_range),
        };

        match &mut self.motion {
            Motion::Walk { path, step } => {
                if !passes || *step + 1 >= path.len() {
                    return MoveOutcome::Stayed;
                }
                *step += 1;
                MoveOutcome::Moved(path[*step])
            }
            Motion::Rush { stage, rushing } => {
                if watched_cove {
                    *stage = stage.saturating_sub(1);
                    return MoveOutcome::Calmed(*stage);
                }
                if !passes {
                    return MoveOutcome::Stayed;
                }
                *stage += 1;
                if *stage >= FOXY_RUSH_STAGE {
                    *rushing = true;
                    MoveOutcome::Rushed
                } else {
                    MoveOutcome::Escalated(*stage)
                }
            }
        }
    }
}

/// The four animatronics of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    agents: [Animatronic; 4],
}

impl Roster {
    pub fn new(levels: DifficultyTable) -> Self {
        Self {
            agents: AnimatronicId::ALL.map(|id| Animatronic::new(id, levels.level(id))),
        }
    }

    /// Everyone home, levels from the new table
    pub fn reset(&mut self, levels: DifficultyTable) {
        for agent in &mut self.agents {
            agent.reset();
            agent.ai_level = levels.level(agent.id);
        }
    }

    pub fn get(&self, id: AnimatronicId) -> &Animatronic {
        &self.agents[id.index()]
    }

    pub fn get_mut(&mut self, id: AnimatronicId) -> &mut Animatronic {
        &mut self.agents[id.index()]
    }

    /// Animatronics standing at a location
    pub fn at(&self, location: Location) -> impl Iterator<Item = AnimatronicId> + '_ {
        self.agents
            .iter()
            .filter(move |a| a.position() == location)
            .map(|a| a.id)
    }

    /// Who the light would reveal in a doorway
    pub fn door_visitor(&self, side: DoorSide) -> Option<AnimatronicId> {
        let order = match side {
            DoorSide::Left => [AnimatronicId::Bonnie, AnimatronicId::Foxy],
            DoorSide::Right => [AnimatronicId::Chica, AnimatronicId::Freddy],
        };
        order
            .into_iter()
            .find(|id| self.get(*id).position() == Location::Door(side))
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(DifficultyTable::for_night(1))
    }
}
