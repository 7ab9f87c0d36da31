//! Star rating and leaderboard score for a finished night

use serde::{Deserialize, Serialize};

use crate::night::outcome::SessionReport;

pub const MAX_STARS: u8 = 5;

// Speed bonus threshold: a full night normally takes 540 s
const FAST_NIGHT_SECS: u64 = 420;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingBreakdown {
    pub power_bonus: u8,
    pub time_bonus: u8,
    pub difficulty_multiplier: f32,
}

impl Default for RatingBreakdown {
    fn default() -> Self {
        Self {
            power_bonus: 0,
            time_bonus: 0,
            difficulty_multiplier: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarRating {
    pub stars: u8,
    pub breakdown: RatingBreakdown,
    pub score: u64,
}

impl StarRating {
    pub fn from_report(report: &SessionReport) -> Self {
        let mut breakdown = RatingBreakdown::default();

        // Must survive to get any rating
        if !report.survived {
            return Self {
                stars: 0,
                breakdown,
                score: 0,
            };
        }

        let mut stars = 1;

        if report.final_power >= 50.0 {
            breakdown.power_bonus = 2;
        } else if report.final_power >= 25.0 {
            breakdown.power_bonus = 1;
        }
        stars += breakdown.power_bonus;

        if report.time_survived_secs <= FAST_NIGHT_SECS {
            breakdown.time_bonus = 1;
        }
        stars += breakdown.time_bonus;

        breakdown.difficulty_multiplier = 1.0 + report.night.saturating_sub(1) as f32 * 0.1;
        if report.easy_mode {
            breakdown.difficulty_multiplier *= 0.5;
        }

        Self {
            stars: stars.min(MAX_STARS),
            breakdown,
            score: score(report, &breakdown),
        }
    }

    /// "★★★☆☆"
    pub fn display(&self) -> String {
        let filled = "★".repeat(self.stars as usize);
        let empty = "☆".repeat((MAX_STARS - self.stars) as usize);
        filled + &empty
    }

    pub fn message(&self) -> &'static str {
        match self.stars {
            0 => "Try again!",
            1 => "Survived!",
            2 => "Well done!",
            3 => "Great!",
            4 => "Excellent!",
            _ => "Perfect!",
        }
    }
}

// Multiplier kept in exact tenths so whole scores don't round down
fn score(report: &SessionReport, breakdown: &RatingBreakdown) -> u64 {
    let base = report.night as f64 * 1000.0
        + report.final_power as f64 * 10.0
        + breakdown.power_bonus as f64 * 100.0
        + breakdown.time_bonus as f64 * 150.0;
    let tenths = 10 + report.night.saturating_sub(1) as u64;
    let divisor = if report.easy_mode { 20.0 } else { 10.0 };
    (base * tenths as f64 / divisor).floor() as u64
}
