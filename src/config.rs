// Configuration — optional JSON file; every field falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SCREEN_DPI;
use crate::error::{Result, RingSizeError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Screen density reported by the platform, used for the uncalibrated estimate.
    pub screen_dpi: f64,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub max_steps: usize,
    pub max_samples: usize,
    /// Fixed seed for reproducible runs; the clock is used when absent.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_dpi: DEFAULT_SCREEN_DPI,
            simulation: SimulationConfig::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_steps: 20,
            max_samples: 10000,
            seed: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.screen_dpi.is_finite() && self.screen_dpi > 0.0) {
            return Err(RingSizeError::Config(format!(
                "screen_dpi must be positive, got {}",
                self.screen_dpi
            )));
        }
        if self.simulation.max_steps == 0 || self.simulation.max_samples == 0 {
            return Err(RingSizeError::Config(
                "simulation max_steps and max_samples must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
