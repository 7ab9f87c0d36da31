//! Difficulty tables and per-night setup
//!
//! Nights 1-5 follow a fixed, rising table. Night 6 is the nightmare tier
//! with harsher power and clock rules. Night 7 is the custom night, whose
//! table comes from the player.
//!
//! Easy mode is applied exactly once, when the setup is built. The core
//! only ever sees the already-scaled numbers plus the `easy_mode` flag.

use serde::{Deserialize, Serialize};

use crate::core::config::SessionConfig;
use crate::core::error::{NightError, Result};
use crate::core::types::{AnimatronicId, Millis};

/// Night number of the nightmare tier
pub const NIGHTMARE_NIGHT: u32 = 6;

/// Night number used for custom difficulty
pub const CUSTOM_NIGHT: u32 = 7;

/// Per-animatronic AI levels (0..=20)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub freddy: u8,
    pub bonnie: u8,
    pub chica: u8,
    pub foxy: u8,
}

impl DifficultyTable {
    pub const MAX_LEVEL: u8 = 20;

    pub const fn new(freddy: u8, bonnie: u8, chica: u8, foxy: u8) -> Self {
        Self {
            freddy,
            bonnie,
            chica,
            foxy,
        }
    }

    /// Scripted table for a night; 6 and above use the nightmare tier
    pub fn for_night(night: u32) -> Self {
        match night {
            0 | 1 => Self::new(0, 3, 2, 1),
            2 => Self::new(1, 5, 4, 2),
            3 => Self::new(2, 7, 6, 4),
            4 => Self::new(4, 9, 8, 6),
            5 => Self::new(6, 12, 11, 8),
            _ => Self::new(10, 15, 15, 10),
        }
    }

    /// Table from caller-validated custom levels
    ///
    /// Levels above 20 are a caller bug; they trip an assertion in debug
    /// builds and are clamped otherwise.
    pub fn custom(freddy: u8, bonnie: u8, chica: u8, foxy: u8) -> Self {
        let levels = [freddy, bonnie, chica, foxy];
        debug_assert!(
            levels.iter().all(|&l| l <= Self::MAX_LEVEL),
            "custom AI levels must be within 0..=20: {levels:?}"
        );
        let clamp = |l: u8| l.min(Self::MAX_LEVEL);
        Self::new(clamp(freddy), clamp(bonnie), clamp(chica), clamp(foxy))
    }

    pub fn level(&self, id: AnimatronicId) -> u8 {
        match id {
            AnimatronicId::Freddy => self.freddy,
            AnimatronicId::Bonnie => self.bonnie,
            AnimatronicId::Chica => self.chica,
            AnimatronicId::Foxy => self.foxy,
        }
    }

    /// Every level multiplied by `factor`, rounded down
    pub fn scaled(&self, factor: f32) -> Self {
        let scale = |l: u8| ((l as f32 * factor).floor() as u8).min(Self::MAX_LEVEL);
        Self::new(
            scale(self.freddy),
            scale(self.bonnie),
            scale(self.chica),
            scale(self.foxy),
        )
    }

    /// The legendary 20/20/20/20 table
    pub fn is_max_mode(&self) -> bool {
        [self.freddy, self.bonnie, self.chica, self.foxy]
            .iter()
            .all(|&l| l == Self::MAX_LEVEL)
    }
}

/// Named custom-night preset
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub levels: DifficultyTable,
}

pub const PRESETS: [Preset; 6] = [
    Preset {
        name: "easy",
        description: "Low difficulty for beginners",
        levels: DifficultyTable::new(5, 5, 5, 5),
    },
    Preset {
        name: "normal",
        description: "Average challenge",
        levels: DifficultyTable::new(10, 10, 10, 10),
    },
    Preset {
        name: "hard",
        description: "For experienced players",
        levels: DifficultyTable::new(15, 15, 15, 15),
    },
    Preset {
        name: "20/20/20/20",
        description: "Maximum aggression on every animatronic",
        levels: DifficultyTable::new(20, 20, 20, 20),
    },
    Preset {
        name: "foxy-nightmare",
        description: "Foxy at maximum, the rest moderate",
        levels: DifficultyTable::new(5, 5, 5, 20),
    },
    Preset {
        name: "freddy-finale",
        description: "Freddy is the real enemy",
        levels: DifficultyTable::new(20, 10, 10, 10),
    },
];

pub fn preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Whether a night can be played given the highest night completed so far
///
/// Each night opens after the previous one; the nightmare needs night 5
/// and the custom night needs the nightmare.
pub fn is_night_unlocked(night: u32, highest_completed: u32) -> bool {
    night >= 1 && night <= highest_completed.saturating_add(1).max(1)
}

/// Easy mode multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasyMode {
    pub ai_multiplier: f32,
    pub power_drain_multiplier: f32,
    pub hour_duration_multiplier: f32,
}

pub const EASY_MODE: EasyMode = EasyMode {
    ai_multiplier: 0.6,
    power_drain_multiplier: 0.7,
    hour_duration_multiplier: 1.2,
};

// Nightmare special rules
const NIGHTMARE_DRAIN_MULTIPLIER: f32 = 1.3;
const NIGHTMARE_HOUR_MS: Millis = 75_000;

/// Pre-scaled inputs for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightSetup {
    pub night: u32,
    pub levels: DifficultyTable,
    pub custom: bool,
    pub easy_mode: bool,
    pub hour_ms: Millis,
    pub drain_per_unit: f32,
    /// Multiplier on every animatronic's movement period
    pub move_scale: f32,
}

impl NightSetup {
    /// Scripted night; numbers past the nightmare tier play as the nightmare
    pub fn scripted(night: u32, config: &SessionConfig) -> Self {
        let night = night.clamp(1, NIGHTMARE_NIGHT);
        let (hour_ms, drain_per_unit) = if night >= NIGHTMARE_NIGHT {
            (
                NIGHTMARE_HOUR_MS,
                config.drain_per_unit * NIGHTMARE_DRAIN_MULTIPLIER,
            )
        } else {
            (config.hour_ms, config.drain_per_unit)
        };

        Self {
            night,
            levels: DifficultyTable::for_night(night),
            custom: false,
            easy_mode: false,
            hour_ms,
            drain_per_unit,
            move_scale: 1.0,
        }
    }

    pub fn custom(levels: DifficultyTable, config: &SessionConfig) -> Self {
        Self {
            night: CUSTOM_NIGHT,
            levels,
            custom: true,
            easy_mode: false,
            hour_ms: config.hour_ms,
            drain_per_unit: config.drain_per_unit,
            move_scale: 1.0,
        }
    }

    /// Apply easy mode; a second call changes nothing
    pub fn with_easy_mode(mut self) -> Self {
        if self.easy_mode {
            return self;
        }
        self.easy_mode = true;
        self.levels = self.levels.scaled(EASY_MODE.ai_multiplier);
        self.drain_per_unit *= EASY_MODE.power_drain_multiplier;
        self.hour_ms = (self.hour_ms as f32 * EASY_MODE.hour_duration_multiplier).round() as Millis;
        self.move_scale /= EASY_MODE.ai_multiplier;
        self
    }

    /// Reject hand-built setups the scheduler cannot run
    pub fn validate(&self) -> Result<()> {
        if self.hour_ms == 0 {
            return Err(NightError::InvalidConfig(
                "setup hour_ms must be greater than zero".into(),
            ));
        }
        if !(self.drain_per_unit.is_finite() && self.drain_per_unit > 0.0) {
            return Err(NightError::InvalidConfig(format!(
                "setup drain_per_unit ({}) must be positive",
                self.drain_per_unit
            )));
        }
        if !(self.move_scale.is_finite() && self.move_scale > 0.0) {
            return Err(NightError::InvalidConfig(format!(
                "setup move_scale ({}) must be positive",
                self.move_scale
            )));
        }
        Ok(())
    }

    /// Movement period of one animatronic for this night
    pub fn move_period(&self, config: &SessionConfig, id: AnimatronicId) -> Millis {
        let base = config.move_period(id) as f32;
        ((base * self.move_scale).round() as Millis).max(1)
    }
}
