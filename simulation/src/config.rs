use std::time::Duration;

use quiz_defence_core::{SessionRules, DEFAULT_SLOT_POSITIONS};
use serde::{Deserialize, Serialize};

/// Tunable parameters a session is created with.
///
/// Every field has a default, so a configuration file only needs to name
/// the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Gold balance at session start.
    pub starting_gold: u32,
    /// Lives at session start.
    pub starting_lives: u32,
    /// Simulated milliseconds advanced by every tick.
    pub tick_millis: u64,
    /// Lane coordinate of every tower slot.
    pub slot_positions: Vec<f32>,
    /// Seed feeding the wave and loot random streams.
    pub rng_seed: u64,
    /// Probability that a killed non-boss enemy leaves a drop.
    pub drop_chance: f64,
    /// Topic forwarded to the question source, if any.
    pub topic: Option<String>,
}

impl SessionConfig {
    /// Session rules handed to the world on start and restart.
    #[must_use]
    pub fn rules(&self) -> SessionRules {
        SessionRules {
            starting_gold: self.starting_gold,
            starting_lives: self.starting_lives,
            slot_positions: self.slot_positions.clone(),
        }
    }

    /// Simulated time advanced per tick, never zero.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_gold: 50,
            starting_lives: 10,
            tick_millis: 100,
            slot_positions: DEFAULT_SLOT_POSITIONS.to_vec(),
            rng_seed: 0x5eed_cafe,
            drop_chance: 0.15,
            topic: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_keep_remaining_defaults() {
        let config: SessionConfig =
            toml::from_str("starting_gold = 120\ntopic = \"fractions\"\n").expect("config");

        assert_eq!(config.starting_gold, 120);
        assert_eq!(config.topic.as_deref(), Some("fractions"));
        assert_eq!(config.starting_lives, 10);
        assert_eq!(config.tick_duration(), Duration::from_millis(100));
    }

    #[test]
    fn rules_mirror_starting_values() {
        let config = SessionConfig {
            starting_lives: 3,
            slot_positions: vec![20.0, 80.0],
            ..SessionConfig::default()
        };
        let rules = config.rules();

        assert_eq!(rules.starting_gold, 50);
        assert_eq!(rules.starting_lives, 3);
        assert_eq!(rules.slot_positions, vec![20.0, 80.0]);
    }

    #[test]
    fn zero_tick_is_clamped() {
        let config = SessionConfig {
            tick_millis: 0,
            ..SessionConfig::default()
        };
        assert_eq!(config.tick_duration(), Duration::from_millis(1));
    }
}
