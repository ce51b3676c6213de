//! Runtime-tunable game settings. Defaults reproduce the shipped game; the
//! page may override any subset by passing JSON to `start_game_with_config`.

use std::ops::Range;

use thiserror::Error;

pub const DEFAULT_SHARE_URL: &str = "https://your-game-url.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(String),
    #[error("cue delay range {min}..{max} is empty")]
    EmptyDelayRange { min: u32, max: u32 },
    #[error("fake cue probability {0} is outside 0..=1")]
    Probability(f64),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Pause between mode selection and the first round.
    pub start_delay_ms: u32,
    /// Pause between a resolved round and the next one.
    pub next_round_delay_ms: u32,
    pub cue_delay_min_ms: u32,
    pub cue_delay_max_ms: u32, // exclusive
    /// Chance that an Advanced-mode cue is a trap.
    pub fake_probability: f64,
    /// How long a trap stays up before it resolves on its own.
    pub fake_duration_ms: u32,
    pub share_url: String,
    /// Directory holding `<sound>.mp3` files, relative to the page.
    pub asset_base: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 1000,
            next_round_delay_ms: 1000,
            cue_delay_min_ms: 1000,
            cue_delay_max_ms: 4000,
            fake_probability: 0.3,
            fake_duration_ms: 1500,
            share_url: DEFAULT_SHARE_URL.to_string(),
            asset_base: "assets".to_string(),
        }
    }
}

impl GameConfig {
    pub fn cue_delay_range(&self) -> Range<u32> {
        self.cue_delay_min_ms..self.cue_delay_max_ms
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cue_delay_min_ms >= self.cue_delay_max_ms {
            return Err(ConfigError::EmptyDelayRange {
                min: self.cue_delay_min_ms,
                max: self.cue_delay_max_ms,
            });
        }
        if !(0.0..=1.0).contains(&self.fake_probability) {
            return Err(ConfigError::Probability(self.fake_probability));
        }
        Ok(())
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn sound_url(&self, sound: crate::game::Sound) -> String {
        let base = self.asset_base.trim_end_matches('/');
        if base.is_empty() {
            format!("{}.mp3", sound.name())
        } else {
            format!("{}/{}.mp3", base, sound.name())
        }
    }
}
