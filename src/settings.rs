//! # Settings Module
//!
//! ## Purpose
//! Knobs of a simulation session: default portion size, the artificial "reaction time",
//! starting ambient conditions, slider ranges for temperature and pressure, an optional
//! random seed and the log level of the binary.
//!
//! Settings live in "simulation_settings.json" next to the library configuration.
//! A missing or broken file means defaults, the same policy as the library manager.
//!
//! | Field | Default |
//! |-------|---------|
//! | default_quantity | 1.0 mL |
//! | max_quantity | 10.0 mL |
//! | reaction_delay_ms | 1500 |
//! | initial_temperature | 25 °C |
//! | initial_pressure | 1 atm |
//! | temperature_range | 0..150 °C |
//! | pressure_range | 0.1..5 atm |

use crate::Reactions::formula_composer::UnknownProducts;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// quantity (mL) of a chemical added without an explicit amount
    pub default_quantity: f64,
    /// largest portion accepted; bigger ones are clamped
    pub max_quantity: f64,
    /// simulated reaction time between start and result
    pub reaction_delay_ms: u64,
    pub initial_temperature: f64,
    pub initial_pressure: f64,
    pub temperature_range: (f64, f64),
    pub pressure_range: (f64, f64),
    /// fixes the random stream for reproducible sessions
    pub seed: Option<u64>,
    /// what an unrecognised spontaneous reaction prints to the right of the arrow
    pub unknown_products: UnknownProducts,
    pub log_level: String,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            default_quantity: 1.0,
            max_quantity: 10.0,
            reaction_delay_ms: 1500,
            initial_temperature: 25.0,
            initial_pressure: 1.0,
            temperature_range: (0.0, 150.0),
            pressure_range: (0.1, 5.0),
            seed: None,
            unknown_products: UnknownProducts::Products,
            log_level: "info".to_string(),
        }
    }
}

impl SimulationSettings {
    pub fn load(path: &str) -> Self {
        match Self::try_load(path) {
            Ok(settings) => settings.validated(),
            Err(e) => {
                log::warn!("could not read settings '{}': {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    fn try_load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if Path::new(path).exists() {
            let content = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Replaces values the session cannot work with by their defaults, with a warning each:
    /// non-positive or non-finite quantities, a default quantity above the maximum,
    /// inverted or non-finite ranges and initial knobs outside their ranges.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let range_ok = |(low, high): (f64, f64)| low.is_finite() && high.is_finite() && low <= high;

        if !positive(self.max_quantity) {
            log::warn!("invalid max_quantity {}, using {}", self.max_quantity, defaults.max_quantity);
            self.max_quantity = defaults.max_quantity;
        }
        if !positive(self.default_quantity) || self.default_quantity > self.max_quantity {
            log::warn!(
                "invalid default_quantity {}, using {}",
                self.default_quantity, defaults.default_quantity
            );
            self.default_quantity = defaults.default_quantity.min(self.max_quantity);
        }
        if !range_ok(self.temperature_range) {
            log::warn!(
                "invalid temperature_range {:?}, using {:?}",
                self.temperature_range, defaults.temperature_range
            );
            self.temperature_range = defaults.temperature_range;
        }
        if !range_ok(self.pressure_range) || self.pressure_range.0 < 0.0 {
            log::warn!(
                "invalid pressure_range {:?}, using {:?}",
                self.pressure_range, defaults.pressure_range
            );
            self.pressure_range = defaults.pressure_range;
        }
        let (low, high) = self.temperature_range;
        if !(low..=high).contains(&self.initial_temperature) {
            let fallback = defaults.initial_temperature.clamp(low, high);
            log::warn!(
                "initial_temperature {} outside {:?}, using {}",
                self.initial_temperature, self.temperature_range, fallback
            );
            self.initial_temperature = fallback;
        }
        let (low, high) = self.pressure_range;
        if !(low..=high).contains(&self.initial_pressure) {
            let fallback = defaults.initial_pressure.clamp(low, high);
            log::warn!(
                "initial_pressure {} outside {:?}, using {}",
                self.initial_pressure, self.pressure_range, fallback
            );
            self.initial_pressure = fallback;
        }
        self
    }

    pub fn save(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn reaction_delay(&self) -> Duration {
        Duration::from_millis(self.reaction_delay_ms)
    }

    /// unknown level names fall back to Info
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}
