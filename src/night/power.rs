//! Power economy
//!
//! Usage is the base load plus one unit per active consumer. Each power
//! tick drains `usage * drain_per_unit`. Power never goes below 0; the
//! moment it reaches 0 every door and light is forced off and the
//! session enters the blackout.

use crate::core::types::DoorSide;
use crate::night::session::Session;

/// The office always draws this much
pub const BASE_LOAD: u32 = 1;

/// Result of taking power away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Nothing drained (not playing, or already empty)
    Idle,
    Drained,
    /// This drain emptied the battery
    Exhausted,
}

/// Current draw from the configuration of consumers
pub fn usage(session: &Session) -> u32 {
    BASE_LOAD
        + session.left_door_closed as u32
        + session.right_door_closed as u32
        + session.left_light_on as u32
        + session.right_light_on as u32
        + session.camera_open as u32
}

pub fn refresh_usage(session: &mut Session) -> u32 {
    session.power_usage = usage(session);
    session.power_usage
}

/// One power tick
pub fn drain(session: &mut Session, drain_per_unit: f32) -> DrainOutcome {
    let amount = session.power_usage as f32 * drain_per_unit;
    take(session, amount)
}

/// Flat power loss, e.g. Foxy banging on a closed door
pub fn apply_penalty(session: &mut Session, amount: f32) -> DrainOutcome {
    take(session, amount)
}

fn take(session: &mut Session, amount: f32) -> DrainOutcome {
    if !session.is_playing() || session.power <= 0.0 {
        return DrainOutcome::Idle;
    }
    session.power -= amount;
    if session.power <= 0.0 {
        session.power = 0.0;
        DrainOutcome::Exhausted
    } else {
        DrainOutcome::Drained
    }
}

/// Force every toggleable consumer off and enter the blackout
///
/// Returns false if the blackout had already begun.
pub fn cut_power(session: &mut Session) -> bool {
    if session.power_out {
        return false;
    }
    session.power = 0.0;
    session.power_out = true;
    for side in [DoorSide::Left, DoorSide::Right] {
        *session.door_mut(side) = false;
        *session.light_mut(side) = false;
    }
    refresh_usage(session);
    true
}

/// Power as shown on the HUD, rounded up
pub fn display_percent(power: f32) -> u32 {
    power.max(0.0).ceil() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SessionConfig;
    use crate::night::difficulty::NightSetup;

    fn session() -> Session {
        Session::new(&NightSetup::scripted(1, &SessionConfig::default()), 0)
    }

    #[test]
    fn test_usage_counts_every_consumer() {
        let mut s = session();
        assert_eq!(usage(&s), 1);

        s.left_door_closed = true;
        s.right_door_closed = true;
        s.left_light_on = true;
        s.right_light_on = true;
        s.camera_open = true;
        assert_eq!(usage(&s), 6);
    }

    #[test]
    fn test_drain_scales_with_usage() {
        let mut s = session();
        s.left_door_closed = true;
        refresh_usage(&mut s);

        assert_eq!(drain(&mut s, 0.5), DrainOutcome::Drained);
        assert!((s.power - 99.0).abs() < 1e-4);
    }

    #[test]
    fn test_drain_clamps_at_zero() {
        let mut s = session();
        s.power = 0.01;

        assert_eq!(drain(&mut s, 0.018), DrainOutcome::Exhausted);
        assert_eq!(s.power, 0.0);
        assert_eq!(drain(&mut s, 0.018), DrainOutcome::Idle);
    }

    #[test]
    fn test_penalty_cannot_overdraw() {
        let mut s = session();
        s.power = 3.0;

        assert_eq!(apply_penalty(&mut s, 25.0), DrainOutcome::Exhausted);
        assert_eq!(s.power, 0.0);
    }

    #[test]
    fn test_cut_power_forces_consumers_off_once() {
        let mut s = session();
        s.left_door_closed = true;
        s.right_light_on = true;
        refresh_usage(&mut s);

        assert!(cut_power(&mut s));
        assert!(!s.left_door_closed && !s.right_door_closed);
        assert!(!s.left_light_on && !s.right_light_on);
        assert!(s.power_out);
        assert_eq!(s.power_usage, 1);

        assert!(!cut_power(&mut s));
    }

    #[test]
    fn test_display_rounds_up() {
        assert_eq!(display_percent(41.2), 42);
        assert_eq!(display_percent(0.0), 0);
        assert_eq!(display_percent(-1.0), 0);
    }
}
