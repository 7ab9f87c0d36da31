//! Session configuration with documented constants
//!
//! All timing and probability numbers of the night shift live here.
//! Values can be overridden from a TOML file; any key left out keeps
//! its default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{NightError, Result};
use crate::core::types::{AnimatronicId, Millis};

/// Tunable constants for one night shift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    // === CLOCK ===
    /// Real time per in-game hour (ms)
    ///
    /// At 90 000 ms the six hours of a night take 9 minutes.
    pub hour_ms: Millis,

    /// Hour at which the shift ends and the player wins
    pub hours_per_night: u32,

    // === POWER ===
    /// Period of the power drain process (ms)
    pub power_tick_ms: Millis,

    /// Power (percent) drained per usage unit per power tick
    ///
    /// At 0.018 with usage 1 and 100 ms ticks, 100% lasts about 555 s,
    /// slightly longer than a 540 s night.
    pub drain_per_unit: f32,

    /// Power lost per night number when Foxy bangs on a closed door
    pub rush_penalty_per_night: f32,

    /// Earliest strike after the power runs out (ms)
    pub blackout_strike_min_ms: Millis,

    /// Width of the randomized strike window after `blackout_strike_min_ms` (ms)
    pub blackout_strike_spread_ms: Millis,

    // === ANIMATRONICS ===
    /// Upper bound (exclusive) of the movement roll; a roll below the
    /// agent's AI level succeeds, so level 20 always moves
    pub ai_roll_range: f32,

    pub freddy_move_ms: Millis,
    pub bonnie_move_ms: Millis,
    pub chica_move_ms: Millis,
    pub foxy_move_ms: Millis,

    /// Delay between Foxy leaving the cove and hitting the door (ms)
    pub rush_resolve_ms: Millis,

    // === ATTACKS ===
    /// Period of the door attack check (ms)
    pub attack_check_ms: Millis,

    /// Chance per check that an agent standing in an open doorway attacks
    pub door_attack_chance: f32,

    /// Extra attack chance per AI level, Freddy only
    pub freddy_attack_scale: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hour_ms: 90_000,
            hours_per_night: 6,

            power_tick_ms: 100,
            drain_per_unit: 0.018,
            rush_penalty_per_night: 5.0,
            blackout_strike_min_ms: 5_000,
            blackout_strike_spread_ms: 10_000,

            ai_roll_range: 20.0,
            freddy_move_ms: 4_000,
            bonnie_move_ms: 5_000,
            chica_move_ms: 5_000,
            foxy_move_ms: 6_000,
            rush_resolve_ms: 1_500,

            attack_check_ms: 1_000,
            door_attack_chance: 0.3,
            freddy_attack_scale: 0.02,
        }
    }
}

impl SessionConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SessionConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Base movement period of one animatronic
    pub fn move_period(&self, id: AnimatronicId) -> Millis {
        match id {
            AnimatronicId::Freddy => self.freddy_move_ms,
            AnimatronicId::Bonnie => self.bonnie_move_ms,
            AnimatronicId::Chica => self.chica_move_ms,
            AnimatronicId::Foxy => self.foxy_move_ms,
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("hour_ms", self.hour_ms),
            ("power_tick_ms", self.power_tick_ms),
            ("attack_check_ms", self.attack_check_ms),
            ("freddy_move_ms", self.freddy_move_ms),
            ("bonnie_move_ms", self.bonnie_move_ms),
            ("chica_move_ms", self.chica_move_ms),
            ("foxy_move_ms", self.foxy_move_ms),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, period)| *period == 0) {
            return Err(NightError::InvalidConfig(format!(
                "{name} must be greater than zero"
            )));
        }

        if self.hours_per_night == 0 {
            return Err(NightError::InvalidConfig(
                "hours_per_night must be at least 1".into(),
            ));
        }

        if self.drain_per_unit <= 0.0 {
            return Err(NightError::InvalidConfig(format!(
                "drain_per_unit ({}) must be positive",
                self.drain_per_unit
            )));
        }

        if self.ai_roll_range <= 0.0 {
            return Err(NightError::InvalidConfig(format!(
                "ai_roll_range ({}) must be positive",
                self.ai_roll_range
            )));
        }

        if !(0.0..=1.0).contains(&self.door_attack_chance) {
            return Err(NightError::InvalidConfig(format!(
                "door_attack_chance ({}) must be within 0..=1",
                self.door_attack_chance
            )));
        }

        Ok(())
    }
}
