//! # Reaction Resolver
//!
//! ## Purpose
//! Turns the contents of the test tube plus the ambient conditions into a `ReactionResult`.
//!
//! ## Two branches
//! 1. **Predefined reaction**: the flags come from the reaction's authored effects. The
//!    temperature starts from the reaction's ideal temperature and drifts with the ambient
//!    temperature, the pressure and some random jitter. Random rolls may add further effects.
//! 2. **Free mode**: the flags are inferred from the categories and states in the tube,
//!    the final temperature and a set of random rolls.
//!
//! Random rolls make the outcome for identical inputs vary between runs. Pass a seeded
//! or scripted `RandomSource` for a reproducible outcome.
use crate::Reactions::color_blender::blend;
use crate::Reactions::formula_composer::{FormulaComposer, UnknownProducts};
use crate::Reactions::intensity::{NOMINAL_QUANTITY, classify};
use crate::Reactions::mixture::Mixture;
use crate::Reactions::randomness::RandomSource;
use crate::Reactions::reaction_result::{ReactionResult, TemperatureChange};
use crate::Substances::chemicals::{Category, Chemical, PhysicalState, Portion, Reaction};
use crate::Substances::color::Color;
use crate::Substances::reference_data::ReferenceData;
use log::debug;

/// Everything a reaction cycle depends on, captured when the reaction starts
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionInputs {
    pub selection: Vec<Portion>,
    pub reaction: Option<Reaction>,
    /// ambient °C
    pub temperature: f64,
    /// ambient atm
    pub pressure: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct ReactionResolver<'a> {
    data: &'a ReferenceData,
    unknown_products: UnknownProducts,
}

impl<'a> ReactionResolver<'a> {
    pub fn new(data: &'a ReferenceData) -> Self {
        Self {
            data,
            unknown_products: UnknownProducts::Products,
        }
    }

    pub fn with_unknown_products(mut self, unknown_products: UnknownProducts) -> Self {
        self.unknown_products = unknown_products;
        self
    }

    fn composer(&self) -> FormulaComposer<'a> {
        FormulaComposer::new(self.data).with_unknown_products(self.unknown_products)
    }

    pub fn resolve(&self, inputs: &ReactionInputs, rng: &mut dyn RandomSource) -> ReactionResult {
        match &inputs.reaction {
            Some(reaction) => self.resolve_predefined(reaction, inputs, rng),
            None => self.resolve_free(inputs, rng),
        }
    }

    /// Outcome of an author-curated reaction
    pub fn resolve_predefined(
        &self,
        reaction: &Reaction,
        inputs: &ReactionInputs,
        rng: &mut dyn RandomSource,
    ) -> ReactionResult {
        let effects = &reaction.effects;
        let pressure = inputs.pressure;
        let change = TemperatureChange::from(effects.temperature);

        let mut final_temp = reaction.conditions.temperature;
        if inputs.temperature > final_temp && change == TemperatureChange::Increase {
            final_temp += 10.0 + rng.next_unit() * 15.0;
        } else if inputs.temperature < final_temp && change == TemperatureChange::Decrease {
            final_temp -= 5.0 + rng.next_unit() * 10.0;
        }
        if pressure > 1.5 {
            match change {
                TemperatureChange::Increase => final_temp += (pressure - 1.0) * 10.0,
                TemperatureChange::Decrease => final_temp -= (pressure - 1.0) * 5.0,
                TemperatureChange::None => {}
            }
        }

        let heating = change == TemperatureChange::Increase;
        let has_explosion = effects.explosion || (heating && final_temp > 130.0 && rng.exceeds(0.7));
        let has_fire = effects.fire || (heating && final_temp > 90.0 && rng.exceeds(0.6));
        let has_ice = effects.ice || (change == TemperatureChange::Decrease && final_temp < 5.0);
        let has_smoke = effects.smoke
            || (final_temp > 85.0 && rng.exceeds(0.5))
            || has_explosion
            || has_fire;
        let has_gas = effects.bubbles
            || (pressure < 0.8 && rng.exceeds(0.5))
            || (final_temp > 70.0 && rng.exceeds(0.7));
        let has_bubbles = effects.bubbles
            || (pressure < 0.8 && rng.exceeds(0.5))
            || (final_temp > 70.0 && rng.exceeds(0.7));
        let has_precipitate = effects.precipitate
            || (rng.exceeds(0.8)
                && inputs
                    .selection
                    .iter()
                    .any(|p| p.chemical.state == PhysicalState::Solid));
        let has_glow = effects.glow || rng.exceeds(0.85);

        // intensity of curated reactions is graded at the nominal amount
        let classification = classify(
            change,
            final_temp,
            has_explosion,
            has_fire,
            effects.bubbles,
            NOMINAL_QUANTITY,
            rng,
        );
        let formula = match &reaction.formula {
            Some(formula) => formula.clone(),
            None => {
                let reactants = chemicals_of(&inputs.selection);
                self.composer()
                    .compose(&reactants, &reaction.products, false)
            }
        };
        debug!(
            "predefined '{}' resolved at {:.1} °C ({:?})",
            reaction.id, final_temp, change
        );

        ReactionResult {
            color: effects.color,
            temperature_change: change,
            temperature: final_temp,
            has_bubbles,
            has_smoke,
            has_precipitate,
            has_fire,
            has_ice,
            has_glow,
            has_explosion,
            has_gas,
            glow_color: effects.glow_color,
            intensity: classification.intensity,
            sound_effect: classification.sound_effect,
            formula,
        }
    }

    /// Outcome inferred from arbitrary contents
    pub fn resolve_free(&self, inputs: &ReactionInputs, rng: &mut dyn RandomSource) -> ReactionResult {
        use Category::*;

        let m = Mixture::new(&inputs.selection);
        let pressure = inputs.pressure;
        let total_quantity = m.total_quantity();
        let quantity_factor = m.quantity_factor();
        let has_gas_state = m.has_state(PhysicalState::Gas);
        let has_liquid = m.has_state(PhysicalState::Liquid);
        let has_solid = m.has_state(PhysicalState::Solid);
        let alkali_in_water = m.has_both(AlkaliMetal, Water);

        let highly_reactive = m.has_both(Acid, Metal)
            || m.has_both(Oxidizer, Reducer)
            || alkali_in_water
            || (m.has_both(Acid, Base) && pressure > 1.5)
            || m.has_both(Chlorate, Fuel);

        let color = free_mode_color(&m, &inputs.selection);
        let (change, mut final_temp) = free_mode_temperature(&m, inputs.temperature, rng);

        if pressure > 1.5 {
            if change == TemperatureChange::Increase {
                final_temp += (pressure - 1.0) * 10.0 * quantity_factor;
            }
        } else if pressure < 0.7 && final_temp > 40.0 && has_liquid {
            final_temp += 10.0 * quantity_factor;
        }

        let has_bubbles = m.has_both(Acid, Metal)
            || (m.has_both(Acid, Salt) && m.has(Carbonate))
            || (has_liquid && final_temp > 70.0)
            || has_gas_state
            || (m.has_both(Acid, Base) && rng.exceeds(0.5))
            || pressure < 0.8
            || rng.exceeds(0.7);

        let has_gas = has_bubbles
            || has_gas_state
            || (has_liquid && final_temp > 85.0)
            || pressure < 0.7;

        let has_smoke = (has_gas_state && m.has(Oxidizer))
            || final_temp > 85.0
            || m.has(Fuming)
            || m.has_both(Oxidizer, Reducer)
            || highly_reactive
            || (total_quantity > 5.0 && rng.exceeds(0.5))
            || rng.exceeds(0.7);

        let has_precipitate = m.has_both(Salt, Precipitant)
            || m.has_both(Acid, Base)
            || m.has_both(SilverSalt, Halide)
            || (has_solid && has_liquid && rng.exceeds(0.5));

        let has_fire = (m.has_both(Oxidizer, Reducer) && final_temp > 80.0)
            || alkali_in_water
            || (highly_reactive && rng.exceeds(0.6))
            || (final_temp > 100.0 && rng.exceeds(0.6))
            || (total_quantity > 7.0 && highly_reactive && rng.exceeds(0.4));

        let has_ice = final_temp < 5.0;

        let has_glow = m.has_both(Peroxide, GlowActivator)
            || (m.has(Luminescent) && m.has(Oxidizer))
            || (has_fire && rng.exceeds(0.5))
            || (highly_reactive && rng.exceeds(0.7))
            || rng.exceeds(0.85);

        let glow_color = m.flame_tint().map(|t| t.color()).unwrap_or(Color::YELLOW);

        let has_explosion = m.has_both(Chlorate, Fuel)
            || (m.has(ExplosiveGas) && final_temp > 90.0)
            || (highly_reactive && final_temp > 100.0 && rng.exceeds(0.7))
            || (alkali_in_water && rng.exceeds(0.5))
            || final_temp > 140.0
            || (total_quantity > 8.0 && final_temp > 120.0 && rng.exceeds(0.5));

        let classification = classify(
            change,
            final_temp,
            has_explosion,
            has_fire,
            has_bubbles,
            total_quantity,
            rng,
        );
        let reactants = chemicals_of(&inputs.selection);
        let formula = self.composer().compose(&reactants, &[], true);
        debug!(
            "free mode resolved at {:.1} °C ({:?}), highly reactive: {}",
            final_temp, change, highly_reactive
        );

        ReactionResult {
            color,
            temperature_change: change,
            temperature: final_temp,
            has_bubbles,
            has_smoke,
            has_precipitate,
            has_fire,
            has_ice,
            has_glow,
            has_explosion,
            has_gas,
            glow_color: Some(glow_color),
            intensity: classification.intensity,
            sound_effect: classification.sound_effect,
            formula,
        }
    }
}

fn chemicals_of(selection: &[Portion]) -> Vec<&Chemical> {
    selection.iter().map(|p| &p.chemical).collect()
}

/// Signature colours of well-known combinations, otherwise the weighted blend
fn free_mode_color(m: &Mixture, selection: &[Portion]) -> Color {
    use Category::*;

    if m.has_both(Acid, Base) {
        Color::new(0xE6, 0xF7, 0xFF)
    } else if m.has_both(Metal, Acid) {
        Color::new(0xC8, 0xE6, 0xC9)
    } else if m.has_both(Oxidizer, Reducer) {
        Color::new(0xFF, 0xCC, 0xBC)
    } else if m.has_both(Oxidizer, Metal) {
        Color::new(0xBC, 0xAA, 0xA4)
    } else if m.has_both(AlkaliMetal, Water) {
        Color::new(0xFF, 0xEB, 0x3B)
    } else if m.has_both(SilverSalt, Salt) {
        Color::new(0xF5, 0xF5, 0xF5)
    } else if m.has_both(CopperSalt, Iron) {
        Color::new(0xA5, 0xD6, 0xA7)
    } else if m.has_both(Iodine, Starch) {
        Color::new(0x3F, 0x51, 0xB5)
    } else {
        blend(selection)
    }
}

/// Direction and size of the temperature swing, scaled by the amount in the tube
fn free_mode_temperature(
    m: &Mixture,
    ambient: f64,
    rng: &mut dyn RandomSource,
) -> (TemperatureChange, f64) {
    use Category::*;
    use TemperatureChange::{Decrease, Increase};

    let qf = m.quantity_factor();
    let has_solid = m.has_state(PhysicalState::Solid);
    let has_liquid = m.has_state(PhysicalState::Liquid);

    if m.has_both(Acid, Base) {
        (Increase, ambient + (15.0 + rng.next_unit() * 10.0) * qf)
    } else if m.has_both(Metal, Acid) {
        (Increase, ambient + (20.0 + rng.next_unit() * 15.0) * qf)
    } else if m.has_both(Oxidizer, Reducer) {
        (Increase, ambient + (25.0 + rng.next_unit() * 20.0) * qf)
    } else if m.has_both(AlkaliMetal, Water) {
        (Increase, ambient + (40.0 + rng.next_unit() * 30.0) * qf)
    } else if has_solid && has_liquid && m.has(Endothermic) {
        (
            Decrease,
            (ambient - (15.0 + rng.next_unit() * 10.0) * qf).max(0.0),
        )
    } else if m.has_both(ColdPack, Water) {
        (
            Decrease,
            (ambient - (20.0 + rng.next_unit() * 10.0) * qf).max(-5.0),
        )
    } else {
        let roll = rng.next_unit();
        if roll > 0.4 {
            if roll > 0.7 {
                (Increase, ambient + (10.0 + rng.next_unit() * 30.0) * qf)
            } else {
                (
                    Decrease,
                    (ambient - (10.0 + rng.next_unit() * 15.0) * qf).max(0.0),
                )
            }
        } else {
            (TemperatureChange::None, ambient)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reactions::randomness::{FixedRoll, ScriptedRolls};
    use crate::Reactions::reaction_result::SoundEffect;
    use crate::Substances::chemicals::FlameTint;
    use approx::assert_relative_eq;

    fn inputs(data: &ReferenceData, ids: &[(&str, f64)], temperature: f64, pressure: f64) -> ReactionInputs {
        ReactionInputs {
            selection: ids
                .iter()
                .map(|(id, q)| Portion::new(data.chemical(id).unwrap().clone(), *q))
                .collect(),
            reaction: None,
            temperature,
            pressure,
        }
    }

    #[test]
    fn test_free_acid_base_neutralization() {
        let data = ReferenceData::builtin().unwrap();
        let resolver = ReactionResolver::new(&data);
        let inputs = inputs(&data, &[("hcl", 1.0), ("naoh", 1.0)], 25.0, 1.0);
        let result = resolver.resolve(&inputs, &mut FixedRoll(0.0));

        assert_eq!(result.temperature_change, TemperatureChange::Increase);
        assert_relative_eq!(result.temperature, 40.0);
        assert_eq!(result.color, Color::new(0xE6, 0xF7, 0xFF));
        assert!(result.has_precipitate);
        // HCl fumes
        assert!(result.has_smoke);
        assert!(!result.has_bubbles);
        assert!(!result.has_fire);
        assert!(!result.has_explosion);
        assert_eq!(result.formula, "HCl + NaOH → Salt + H₂O");
        assert_eq!(result.glow_color, Some(Color::YELLOW));
        assert_relative_eq!(result.intensity, 1.5);
        assert_eq!(result.sound_effect, SoundEffect::None);
    }

    #[test]
    fn test_free_alkali_metal_in_water_explodes_above_140() {
        let data = ReferenceData::builtin().unwrap();
        let resolver = ReactionResolver::new(&data);
        let inputs = inputs(&data, &[("na", 3.0), ("h2o", 3.0)], 100.0, 1.0);
        let result = resolver.resolve(&inputs, &mut FixedRoll(0.0));

        // 100 + 40 * min(3, 6 / 2)
        assert_relative_eq!(result.temperature, 220.0);
        assert!(result.has_fire);
        assert!(result.has_explosion);
        assert_relative_eq!(result.intensity, 5.0 * 3.0_f64.sqrt());
        assert_eq!(result.sound_effect, SoundEffect::Explosion);
        assert_eq!(result.glow_color, Some(FlameTint::Sodium.color()));
        assert_eq!(result.color, Color::new(0xFF, 0xEB, 0x3B));
    }

    #[test]
    fn test_free_cooling_is_floored() {
        let data = ReferenceData::builtin().unwrap();
        let resolver = ReactionResolver::new(&data);
        // NH4Cl is solid, water liquid: endothermic dissolution
        let inputs = inputs(&data, &[("nh4cl", 5.0), ("h2o", 5.0)], 10.0, 1.0);
        let result = resolver.resolve(&inputs, &mut FixedRoll(0.0));
        assert_eq!(result.temperature_change, TemperatureChange::Decrease);
        assert_eq!(result.temperature, 0.0);
        assert!(result.has_ice);
    }

    #[test]
    fn test_free_quiet_mix_without_luck() {
        let data = ReferenceData::builtin().unwrap();
        let resolver = ReactionResolver::new(&data);
        let inputs = inputs(&data, &[("h2o", 1.0), ("c2h5oh", 1.0)], 25.0, 1.0);
        let result = resolver.resolve(&inputs, &mut FixedRoll(0.0));
        assert_eq!(result.temperature_change, TemperatureChange::None);
        assert_eq!(result.temperature, 25.0);
        assert!(result.active_effects().is_empty());
        let expected = blend(&inputs.selection);
        assert_eq!(result.color, expected);
        assert_relative_eq!(result.intensity, 1.0);
        assert_eq!(result.formula, "H₂O + C₂H₅OH → Products");
    }

    #[test]
    fn test_free_quiet_mix_with_luck() {
        let data = ReferenceData::builtin().unwrap();
        let resolver = ReactionResolver::new(&data);
        let inputs = inputs(&data, &[("h2o", 1.0), ("c2h5oh", 1.0)], 25.0, 1.0);
        let result = resolver.resolve(&inputs, &mut FixedRoll(0.99));
        // every roll succeeds: heating, bubbles, smoke, glow
        assert_eq!(result.temperature_change, TemperatureChange::Increase);
        assert_relative_eq!(result.temperature, 25.0 + 10.0 + 0.99 * 30.0);
        assert!(result.has_bubbles);
        assert!(result.has_smoke);
        assert!(result.has_glow);
        assert_eq!(result.sound_effect, SoundEffect::Bubbling);
    }

    #[test]
    fn test_free_low_pressure_bubbles() {
        let data = ReferenceData::builtin().unwrap();
        let resolver = ReactionResolver::new(&data);
        let inputs = inputs(&data, &[("h2o", 1.0), ("nacl", 1.0)], 25.0, 0.5);
        let result = resolver.resolve(&inputs, &mut FixedRoll(0.0));
        assert!(result.has_bubbles);
        assert!(result.has_gas);
    }

    #[test]
    fn test_free_chlorate_and_fuel() {
        let data = ReferenceData::builtin().unwrap();
        let resolver = ReactionResolver::new(&data);
        let inputs = inputs(&data, &[("kclo3", 1.0), ("s", 1.0)], 25.0, 1.0);
        let result = resolver.resolve(&inputs, &mut FixedRoll(0.0));
        assert!(result.has_explosion);
        assert!(result.has_smoke);
        assert_eq!(result.sound_effect, SoundEffect::Explosion);
    }

    #[test]
    fn test_free_silver_nitrate_precipitates_halide() {
        let data = ReferenceData::builtin().unwrap();
        let resolver = ReactionResolver::new(&data);
        let inputs = inputs(&data, &[("agno3", 1.0), ("nacl", 1.0)], 25.0, 1.0);
        let result = resolver.resolve(&inputs, &mut FixedRoll(0.0));
        assert!(result.has_precipitate);
        assert_eq!(result.color, Color::new(0xF5, 0xF5, 0xF5));
    }

    #[test]
    fn test_predefined_follows_effects_template() {
        let data = ReferenceData::builtin().unwrap();
        let resolver = ReactionResolver::new(&data);
        let reaction = data.reaction("acid-base-1").unwrap().clone();
        let mut inputs = inputs(&data, &[("hcl", 1.0), ("naoh", 1.0)], 25.0, 1.0);
        inputs.reaction = Some(reaction.clone());
        let result = resolver.resolve(&inputs, &mut FixedRoll(0.0));

        assert_eq!(result.color, reaction.effects.color);
        assert_eq!(result.temperature_change, TemperatureChange::Increase);
        // ambient equals the ideal temperature: no drift
        assert_eq!(result.temperature, 25.0);
        assert!(result.has_precipitate);
        assert!(!result.has_bubbles);
        assert!(!result.has_fire);
        assert_eq!(result.formula, "HCl + NaOH → NaCl + H₂O");
        assert_relative_eq!(result.intensity, 1.5);
    }

    #[test]
    fn test_predefined_hot_high_pressure_drift() {
        let data = ReferenceData::builtin().unwrap();
        let resolver = ReactionResolver::new(&data);
        let reaction = data.reaction("metal-acid-1").unwrap().clone();
        let mut inputs = inputs(&data, &[("zn", 1.0), ("hcl", 1.0)], 80.0, 3.0);
        inputs.reaction = Some(reaction);
        let mut rolls = ScriptedRolls::new(vec![0.0]);
        let result = resolver.resolve(&inputs, &mut rolls);
        // 25 + 10 + (3 - 1) * 10
        assert_relative_eq!(result.temperature, 55.0);
        assert!(result.has_bubbles);
        assert!(result.has_gas);
        assert_eq!(result.sound_effect, SoundEffect::Bubbling);
    }

    #[test]
    fn test_predefined_explicit_formula_wins() {
        let data = ReferenceData::builtin().unwrap();
        let resolver = ReactionResolver::new(&data);
        let mut reaction = data.reaction("acid-base-1").unwrap().clone();
        reaction.formula = Some("HCl + NaOH → NaCl + H₂O (aq)".to_string());
        let mut inputs = inputs(&data, &[("hcl", 1.0), ("naoh", 1.0)], 25.0, 1.0);
        inputs.reaction = Some(reaction);
        let result = resolver.resolve(&inputs, &mut FixedRoll(0.0));
        assert_eq!(result.formula, "HCl + NaOH → NaCl + H₂O (aq)");
    }

    #[test]
    fn test_predefined_cooling_drift_with_pressure() {
        let data = ReferenceData::builtin().unwrap();
        let resolver = ReactionResolver::new(&data);
        // ideal 450 °C, endothermic template
        let reaction = data.reaction("catalytic-2").unwrap().clone();
        let mut inputs = inputs(&data, &[("n2", 1.0), ("h2", 3.0)], 25.0, 3.0);
        inputs.reaction = Some(reaction);
        let result = resolver.resolve(&inputs, &mut FixedRoll(0.0));
        // 450 - 5 - (3 - 1) * 5
        assert_eq!(result.temperature_change, TemperatureChange::Decrease);
        assert_relative_eq!(result.temperature, 435.0);
        assert!(!result.has_fire);
        assert!(!result.has_explosion);
        assert!(!result.has_ice);
        assert_relative_eq!(result.intensity, 1.0);
        assert_eq!(result.formula, "N₂ + H₂ → NH₃");

        let result = resolver.resolve(&inputs, &mut FixedRoll(0.5));
        // 450 - (5 + 0.5 * 10) - 10
        assert_relative_eq!(result.temperature, 430.0);
    }

    #[test]
    fn test_free_low_pressure_heats_hot_liquid() {
        let data = ReferenceData::builtin().unwrap();
        let resolver = ReactionResolver::new(&data);
        let normal = inputs(&data, &[("hcl", 1.0), ("naoh", 1.0)], 30.0, 1.0);
        let result = resolver.resolve(&normal, &mut FixedRoll(0.0));
        assert_relative_eq!(result.temperature, 45.0);
        assert!(!result.has_gas);

        let thin_air = inputs(&data, &[("hcl", 1.0), ("naoh", 1.0)], 30.0, 0.5);
        let result = resolver.resolve(&thin_air, &mut FixedRoll(0.0));
        // 30 + 15 + 10 * quantity factor 1
        assert_relative_eq!(result.temperature, 55.0);
        assert!(result.has_bubbles);
        assert!(result.has_gas);

        // below 40 °C the boost does not apply
        let cool = inputs(&data, &[("hcl", 1.0), ("naoh", 1.0)], 10.0, 0.5);
        let result = resolver.resolve(&cool, &mut FixedRoll(0.0));
        assert_relative_eq!(result.temperature, 25.0);
    }
}
