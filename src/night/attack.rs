//! Door attack resolution
//!
//! Runs on its own period, separate from Foxy's rush. An animatronic
//! standing in an open doorway rolls to attack; a closed door blocks the
//! roll entirely and the animatronic just waits there.

use crate::core::config::SessionConfig;
use crate::core::random::RandomSource;
use crate::core::types::{AnimatronicId, DoorSide, Location};
use crate::night::animatronic::Roster;
use crate::night::session::Session;

/// Walkers that attack through a door, in check order
pub const DOOR_ATTACKERS: [(AnimatronicId, DoorSide); 3] = [
    (AnimatronicId::Bonnie, DoorSide::Left),
    (AnimatronicId::Chica, DoorSide::Right),
    (AnimatronicId::Freddy, DoorSide::Right),
];

/// Attack chance per check for an animatronic in an open doorway
///
/// Only Freddy grows more dangerous with his AI level.
pub fn attack_chance(id: AnimatronicId, ai_level: u8, config: &SessionConfig) -> f32 {
    match id {
        AnimatronicId::Freddy => {
            config.door_attack_chance + ai_level as f32 * config.freddy_attack_scale
        }
        _ => config.door_attack_chance,
    }
}

/// One attack check; returns the attacker, if any
pub fn resolve(
    session: &Session,
    roster: &Roster,
    rng: &mut dyn RandomSource,
    config: &SessionConfig,
) -> Option<AnimatronicId> {
    if !session.is_playing() {
        return None;
    }

    for (id, side) in DOOR_ATTACKERS {
        let agent = roster.get(id);
        if agent.position() != Location::Door(side) || session.door_closed(side) {
            continue;
        }
        if rng.chance(attack_chance(id, agent.ai_level, config)) {
            return Some(id);
        }
    }
    None
}
