//! Intensity scalar and sound cue of a reaction.
use crate::Reactions::randomness::RandomSource;
use crate::Reactions::reaction_result::{SoundEffect, TemperatureChange};

/// quantity at which the quantity factor is exactly 1
pub const NOMINAL_QUANTITY: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub intensity: f64,
    pub sound_effect: SoundEffect,
}

/// Base level 5 for an explosion, 4 for fire; otherwise a heating reaction is graded by its
/// final temperature (>100 °C: 3, >60 °C: 2, else 1.5) and anything else is 1.
/// The level is scaled by sqrt(total_quantity / 2).
pub fn intensity(
    temperature_change: TemperatureChange,
    final_temperature: f64,
    has_explosion: bool,
    has_fire: bool,
    total_quantity: f64,
) -> f64 {
    let base = if has_explosion {
        5.0
    } else if has_fire {
        4.0
    } else if temperature_change == TemperatureChange::Increase {
        if final_temperature > 100.0 {
            3.0
        } else if final_temperature > 60.0 {
            2.0
        } else {
            1.5
        }
    } else {
        1.0
    };
    base * (total_quantity.max(0.0) / NOMINAL_QUANTITY).sqrt()
}

/// explosion > hissing (fire) > bubbling; a quiet reaction fizzes or stays silent on a coin flip
pub fn sound_effect(
    has_explosion: bool,
    has_fire: bool,
    has_bubbles: bool,
    rng: &mut dyn RandomSource,
) -> SoundEffect {
    if has_explosion {
        SoundEffect::Explosion
    } else if has_fire {
        SoundEffect::Hissing
    } else if has_bubbles {
        SoundEffect::Bubbling
    } else if rng.exceeds(0.5) {
        SoundEffect::Fizzing
    } else {
        SoundEffect::None
    }
}

pub fn classify(
    temperature_change: TemperatureChange,
    final_temperature: f64,
    has_explosion: bool,
    has_fire: bool,
    has_bubbles: bool,
    total_quantity: f64,
    rng: &mut dyn RandomSource,
) -> Classification {
    Classification {
        intensity: intensity(
            temperature_change,
            final_temperature,
            has_explosion,
            has_fire,
            total_quantity,
        ),
        sound_effect: sound_effect(has_explosion, has_fire, has_bubbles, rng),
    }
}
