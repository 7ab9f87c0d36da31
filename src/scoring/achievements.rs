//! Night-end achievements
//!
//! Unlocks are derived from the session report alone. The tracker keeps
//! what has been unlocked in memory; storing it is someone else's job.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::night::events::{NightEvent, NightObserver};
use crate::night::outcome::SessionReport;

// Highest scripted night with its own survival achievement
const MAX_SURVIVAL_NIGHT: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Achievement {
    SurviveNight(u32),
    /// Finish with at least half the power left
    PowerSaver,
    /// Finish without ever raising the monitor
    BlindPlay,
    /// Finish in under five minutes
    SpeedDemon,
    /// Finish with the power gone
    Darkness,
}

impl Achievement {
    pub fn points(&self) -> u32 {
        match self {
            Achievement::SurviveNight(n) => match n {
                1 => 10,
                2 => 15,
                3 => 20,
                4 => 30,
                5 => 50,
                _ => 75,
            },
            Achievement::PowerSaver => 20,
            Achievement::BlindPlay => 40,
            Achievement::SpeedDemon => 35,
            Achievement::Darkness => 30,
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, Achievement::Darkness)
    }
}

/// Everything a report qualifies for
pub fn evaluate(report: &SessionReport) -> Vec<Achievement> {
    if !report.survived {
        return Vec::new();
    }

    let mut earned = Vec::new();
    if (1..=MAX_SURVIVAL_NIGHT).contains(&report.night) {
        earned.push(Achievement::SurviveNight(report.night));
    }
    if report.final_power >= 50.0 {
        earned.push(Achievement::PowerSaver);
    }
    if !report.camera_ever_used {
        earned.push(Achievement::BlindPlay);
    }
    if report.time_survived_secs < 300 {
        earned.push(Achievement::SpeedDemon);
    }
    if report.final_power <= 0.0 {
        earned.push(Achievement::Darkness);
    }
    earned
}

#[derive(Debug, Default)]
pub struct AchievementTracker {
    unlocked: AHashSet<Achievement>,
    /// Unlock order, for display
    recent: Vec<Achievement>,
}

impl AchievementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if it was already unlocked
    pub fn try_unlock(&mut self, achievement: Achievement) -> bool {
        if !self.unlocked.insert(achievement) {
            return false;
        }
        info!(?achievement, points = achievement.points(), "Achievement unlocked");
        self.recent.push(achievement);
        true
    }

    pub fn record(&mut self, report: &SessionReport) -> Vec<Achievement> {
        evaluate(report)
            .into_iter()
            .filter(|a| self.try_unlock(*a))
            .collect()
    }

    pub fn is_unlocked(&self, achievement: Achievement) -> bool {
        self.unlocked.contains(&achievement)
    }

    pub fn unlocked(&self) -> &[Achievement] {
        &self.recent
    }

    pub fn total_points(&self) -> u32 {
        self.unlocked.iter().map(|a| a.points()).sum()
    }
}

impl NightObserver for AchievementTracker {
    fn on_event(&mut self, event: &NightEvent) {
        if let NightEvent::Finished(report) = event {
            self.record(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AnimatronicId, SessionId};

    fn survived(night: u32, power: f32, secs: u64, camera: bool) -> SessionReport {
        SessionReport {
            session_id: SessionId::new(),
            survived: true,
            final_power: power,
            time_survived_secs: secs,
            night,
            camera_ever_used: camera,
            easy_mode: false,
            cause: None,
        }
    }

    #[test]
    fn test_loss_earns_nothing() {
        let mut report = survived(1, 90.0, 10, false);
        report.survived = false;
        report.cause = Some(AnimatronicId::Foxy);
        assert!(evaluate(&report).is_empty());
    }

    #[test]
    fn test_survival_and_skill_unlocks() {
        let earned = evaluate(&survived(2, 55.0, 540, false));
        assert_eq!(
            earned,
            vec![
                Achievement::SurviveNight(2),
                Achievement::PowerSaver,
                Achievement::BlindPlay
            ]
        );
    }

    #[test]
    fn test_darkness_and_speed() {
        let earned = evaluate(&survived(7, 0.0, 200, true));
        assert!(earned.contains(&Achievement::Darkness));
        assert!(earned.contains(&Achievement::SpeedDemon));
        // Custom night has no survival achievement of its own
        assert!(!earned.iter().any(|a| matches!(a, Achievement::SurviveNight(_))));
    }

    #[test]
    fn test_only_darkness_is_secret() {
        assert!(Achievement::Darkness.is_secret());
        assert!(!Achievement::SurviveNight(6).is_secret());
        assert!(!Achievement::BlindPlay.is_secret());
    }

    #[test]
    fn test_tracker_unlocks_once() {
        let mut tracker = AchievementTracker::new();
        let report = survived(1, 10.0, 540, true);

        assert_eq!(tracker.record(&report), vec![Achievement::SurviveNight(1)]);
        assert!(tracker.record(&report).is_empty());
        assert!(tracker.is_unlocked(Achievement::SurviveNight(1)));
        assert_eq!(tracker.total_points(), 10);
    }

    #[test]
    fn test_tracker_listens_for_finished_sessions() {
        let mut tracker = AchievementTracker::new();
        tracker.on_event(&NightEvent::HourChanged { hour: 3 });
        assert!(tracker.unlocked().is_empty());

        tracker.on_event(&NightEvent::Finished(survived(3, 10.0, 540, true)));
        assert_eq!(tracker.unlocked(), &[Achievement::SurviveNight(3)]);
    }
}
