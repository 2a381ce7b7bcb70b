use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::model::LANE_COUNT;
use crate::session::AutoplayMode;
use crate::timing::{DEFAULT_MAX_STEPS, DEFAULT_STEP_MS};

const CONFIG_FILE: &str = "judgeline.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub lane_count: usize,
    /// Simulation step in milliseconds.
    pub fixed_step_ms: f64,
    /// Catch-up limit per host frame.
    pub max_updates_per_frame: u32,
    /// How far ahead of its time a note becomes visible (ms).
    pub spawn_offset_ms: f64,
    /// Added to the chart's own offset when the clock starts (ms).
    pub audio_offset_ms: f64,
    /// Wait after the last note ends before showing results (ms).
    pub finish_margin_ms: f64,
    pub autoplay: AutoplayMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lane_count: LANE_COUNT,
            fixed_step_ms: DEFAULT_STEP_MS,
            max_updates_per_frame: DEFAULT_MAX_STEPS,
            spawn_offset_ms: 1500.0,
            audio_offset_ms: 0.0,
            finish_margin_ms: 2000.0,
            autoplay: AutoplayMode::Off,
        }
    }
}

impl EngineConfig {
    /// Loads config from the default config file.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Loads config from a specified path.
    /// Returns default config if file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves config to the default config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(CONFIG_FILE)
    }

    /// Saves config to a specified path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.lane_count > 0, "lane_count must be positive");
        anyhow::ensure!(
            self.fixed_step_ms.is_finite() && self.fixed_step_ms > 0.0,
            "fixed_step_ms must be positive, got {}",
            self.fixed_step_ms
        );
        anyhow::ensure!(
            self.max_updates_per_frame > 0,
            "max_updates_per_frame must be positive"
        );
        Ok(())
    }
}
