use crate::Substances::chemicals::TemperatureTrend;
use crate::Substances::color::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureChange {
    Increase,
    Decrease,
    None,
}

impl From<Option<TemperatureTrend>> for TemperatureChange {
    fn from(trend: Option<TemperatureTrend>) -> Self {
        match trend {
            Some(TemperatureTrend::Increase) => TemperatureChange::Increase,
            Some(TemperatureTrend::Decrease) => TemperatureChange::Decrease,
            None => TemperatureChange::None,
        }
    }
}

/// sound cue the front end plays with the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundEffect {
    Explosion,
    Hissing,
    Bubbling,
    Fizzing,
    None,
}

/// Outcome of one reaction cycle. Every field is always present: flags default to
/// false, `glow_color` is the only optional value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionResult {
    pub color: Color,
    pub temperature_change: TemperatureChange,
    /// °C, may drop below zero
    pub temperature: f64,
    pub has_bubbles: bool,
    pub has_smoke: bool,
    pub has_precipitate: bool,
    pub has_fire: bool,
    pub has_ice: bool,
    pub has_glow: bool,
    pub has_explosion: bool,
    pub has_gas: bool,
    pub glow_color: Option<Color>,
    /// scale of the rendered effects, not a chemical amount
    pub intensity: f64,
    pub sound_effect: SoundEffect,
    pub formula: String,
}

impl ReactionResult {
    /// a calm result at the given temperature: nothing happens
    pub fn quiet(color: Color, temperature: f64) -> Self {
        Self {
            color,
            temperature_change: TemperatureChange::None,
            temperature,
            has_bubbles: false,
            has_smoke: false,
            has_precipitate: false,
            has_fire: false,
            has_ice: false,
            has_glow: false,
            has_explosion: false,
            has_gas: false,
            glow_color: None,
            intensity: 1.0,
            sound_effect: SoundEffect::None,
            formula: String::new(),
        }
    }

    /// names of the effects that are switched on, in display order
    pub fn active_effects(&self) -> Vec<&'static str> {
        [
            (self.has_bubbles, "bubbles"),
            (self.has_gas, "gas"),
            (self.has_smoke, "smoke"),
            (self.has_precipitate, "precipitate"),
            (self.has_fire, "fire"),
            (self.has_ice, "ice"),
            (self.has_glow, "glow"),
            (self.has_explosion, "explosion"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

impl fmt::Display for ReactionResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} | {} {:.1} °C ({:?}) | intensity {:.2} | sound {:?} | effects: [{}]",
            self.formula,
            self.color,
            self.temperature,
            self.temperature_change,
            self.intensity,
            self.sound_effect,
            self.active_effects().join(", ")
        )
    }
}
