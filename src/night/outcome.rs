//! Terminal outcomes and the report handed to scoring and achievements

use serde::{Deserialize, Serialize};

use crate::core::types::{AnimatronicId, Millis, SessionId};
use crate::night::session::{Session, SessionPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Jumpscare(AnimatronicId),
}

/// Final snapshot of a session
///
/// These fields are everything rating and achievement logic may use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub survived: bool,
    /// Remaining power, 0..=100
    pub final_power: f32,
    pub time_survived_secs: u64,
    pub night: u32,
    pub camera_ever_used: bool,
    pub easy_mode: bool,
    /// Who got the player, on a loss
    pub cause: Option<AnimatronicId>,
}

impl SessionReport {
    pub fn from_session(session: &Session, now: Millis) -> Self {
        Self {
            session_id: session.id,
            survived: session.phase == SessionPhase::Won,
            final_power: session.power.clamp(0.0, 100.0),
            time_survived_secs: session.elapsed_ms(now) / 1000,
            night: session.night,
            camera_ever_used: session.camera_ever_used,
            easy_mode: session.easy_mode,
            cause: session.cause,
        }
    }
}

/// Move a playing session into its terminal state
///
/// Only the first call of a session has any effect; later calls, and
/// calls on a session that is not playing, return `None`.
pub fn finish(session: &mut Session, outcome: Outcome, now: Millis) -> Option<SessionReport> {
    if !session.is_playing() {
        return None;
    }

    match outcome {
        Outcome::Victory => session.phase = SessionPhase::Won,
        Outcome::Jumpscare(cause) => {
            session.phase = SessionPhase::Lost;
            session.cause = Some(cause);
        }
    }
    session.ended_at = Some(now);

    Some(SessionReport::from_session(session, now))
}
