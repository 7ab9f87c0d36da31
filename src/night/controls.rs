//! Office controls: doors, lights and the camera monitor
//!
//! Each function returns whether the input was accepted. Doors and lights
//! are dead once the power is gone, whoever calls them.

use crate::core::types::{CameraId, DoorSide};
use crate::night::power;
use crate::night::session::Session;

pub fn toggle_door(session: &mut Session, side: DoorSide) -> bool {
    if !session.is_playing() || session.power <= 0.0 {
        return false;
    }
    let door = session.door_mut(side);
    *door = !*door;
    power::refresh_usage(session);
    true
}

pub fn toggle_light(session: &mut Session, side: DoorSide) -> bool {
    if !session.is_playing() || session.power <= 0.0 {
        return false;
    }
    let light = session.light_mut(side);
    *light = !*light;
    power::refresh_usage(session);
    true
}

/// Raise or lower the monitor; works without power
pub fn toggle_camera(session: &mut Session) -> bool {
    if !session.is_playing() {
        return false;
    }
    session.camera_open = !session.camera_open;
    if session.camera_open {
        session.camera_ever_used = true;
    }
    power::refresh_usage(session);
    true
}

/// Pick the watched feed; not power gated
pub fn switch_camera(session: &mut Session, camera: CameraId) -> bool {
    if !session.is_playing() {
        return false;
    }
    session.current_camera = camera;
    true
}
