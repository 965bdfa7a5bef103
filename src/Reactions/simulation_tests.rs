use crate::Reactions::errors::{ErrorKind, SimulationError};
use crate::Reactions::randomness::{FixedRoll, ScriptedRolls};
use crate::Reactions::reaction_result::TemperatureChange;
use crate::Reactions::simulation::{Phase, Simulation};
use crate::Substances::reference_data::ReferenceData;
use crate::settings::SimulationSettings;
use approx::assert_relative_eq;
use std::time::Duration;

const DELAY: Duration = Duration::from_millis(1500);

fn session() -> Simulation {
    Simulation::new(
        ReferenceData::builtin().unwrap(),
        SimulationSettings::default(),
    )
    .with_random_source(FixedRoll(0.0))
}

#[test]
fn test_new_session_is_idle() {
    let sim = session();
    assert_eq!(sim.phase(), Phase::Idle);
    assert!(!sim.is_reacting());
    assert!(sim.result().is_none());
    assert!(sim.selection().is_empty());
    assert_eq!(sim.temperature(), 25.0);
    assert_eq!(sim.pressure(), 1.0);
    assert_eq!(sim.clock(), Duration::ZERO);
}

#[test]
fn test_acid_base_neutralization_scenario() {
    let mut sim = session();
    sim.add_chemical("hcl").unwrap();
    sim.add_chemical("naoh").unwrap();
    sim.start_reaction().unwrap();
    assert!(sim.is_reacting());
    assert_eq!(sim.phase(), Phase::Pending);
    assert!(sim.result().is_none());

    assert!(sim.advance(Duration::from_millis(1499)).is_none());
    assert_eq!(sim.phase(), Phase::Pending);
    let result = sim.advance(Duration::from_millis(1)).cloned().unwrap();
    assert_eq!(result.temperature_change, TemperatureChange::Increase);
    assert!(result.formula.contains("HCl"));
    assert!(result.formula.contains("NaOH"));
    assert!(result.formula.contains("→"));
    assert_eq!(sim.phase(), Phase::Resolved);
    assert!(sim.is_reacting());
    assert_eq!(sim.result(), Some(&result));
}

#[test]
fn test_single_chemical_cannot_start() {
    let mut sim = session();
    sim.add_chemical("h2o").unwrap();
    let err = sim.start_reaction().unwrap_err();
    assert_eq!(err, SimulationError::NotEnoughChemicals { found: 1 });
    assert_eq!(err.kind(), ErrorKind::PreconditionUnmet);
    assert!(!sim.is_reacting());
    sim.advance(DELAY * 2);
    assert!(sim.result().is_none());
}

#[test]
fn test_empty_tube_cannot_start() {
    let mut sim = session();
    assert_eq!(
        sim.start_reaction(),
        Err(SimulationError::NotEnoughChemicals { found: 0 })
    );
    assert_eq!(sim.phase(), Phase::Idle);
}

#[test]
fn test_explosion_threshold_scenario() {
    let mut sim = session();
    sim.set_temperature(100.0);
    sim.add_chemical_with_quantity("na", 3.0).unwrap();
    sim.add_chemical_with_quantity("h2o", 3.0).unwrap();
    sim.start_reaction().unwrap();
    let result = sim.finish_pending().cloned().unwrap();
    assert!(result.temperature > 140.0);
    assert!(result.has_explosion);
    assert_relative_eq!(result.intensity, 5.0 * (6.0_f64 / 2.0).sqrt());
}

#[test]
fn test_clear_cancels_pending_result() {
    let mut sim = session();
    sim.add_chemical("hcl").unwrap();
    sim.add_chemical("naoh").unwrap();
    sim.start_reaction().unwrap();
    sim.clear_test_tube();
    assert!(!sim.is_reacting());
    assert!(sim.advance(DELAY * 2).is_none());
    assert!(sim.result().is_none());
    assert_eq!(sim.phase(), Phase::Idle);
}

#[test]
fn test_remove_cancels_pending_result() {
    let mut sim = session();
    sim.add_chemical("hcl").unwrap();
    sim.add_chemical("naoh").unwrap();
    sim.add_chemical("h2o").unwrap();
    sim.start_reaction().unwrap();
    sim.remove_chemical("h2o").unwrap();
    assert!(sim.advance(DELAY).is_none());
    assert!(sim.result().is_none());
    assert_eq!(sim.selection().len(), 2);
}

#[test]
fn test_restart_supersedes_pending_reaction() {
    let mut sim = session();
    sim.add_chemical("hcl").unwrap();
    sim.add_chemical("naoh").unwrap();
    let first = sim.start_reaction().unwrap();
    sim.advance(Duration::from_millis(1000));
    let second = sim.start_reaction().unwrap();
    assert!(second > first);
    // the first timer would have fired here
    assert!(sim.advance(Duration::from_millis(600)).is_none());
    assert!(sim.advance(Duration::from_millis(900)).is_some());
    assert_eq!(sim.generation(), second);
}

#[test]
fn test_inputs_are_snapshotted_at_start() {
    let mut sim = session();
    sim.add_chemical("hcl").unwrap();
    sim.add_chemical("naoh").unwrap();
    sim.start_reaction().unwrap();
    sim.set_temperature(120.0);
    let result = sim.finish_pending().cloned().unwrap();
    // 25 °C ambient at start: 25 + 15
    assert_relative_eq!(result.temperature, 40.0);
}

#[test]
fn test_stop_keeps_result_and_selection() {
    let mut sim = session();
    sim.add_chemical("hcl").unwrap();
    sim.add_chemical("naoh").unwrap();
    sim.start_reaction().unwrap();
    sim.finish_pending();
    sim.stop_reaction();
    assert!(!sim.is_reacting());
    assert!(sim.result().is_some());
    assert_eq!(sim.selection().len(), 2);
    assert_eq!(sim.phase(), Phase::Resolved);
}

#[test]
fn test_stop_cancels_pending_timer() {
    let mut sim = session();
    sim.add_chemical("hcl").unwrap();
    sim.add_chemical("naoh").unwrap();
    sim.start_reaction().unwrap();
    sim.stop_reaction();
    assert!(sim.advance(DELAY).is_none());
    assert!(sim.result().is_none());
}

#[test]
fn test_start_clears_previous_result() {
    let mut sim = session();
    sim.add_chemical("hcl").unwrap();
    sim.add_chemical("naoh").unwrap();
    sim.start_reaction().unwrap();
    sim.finish_pending();
    assert!(sim.result().is_some());
    sim.start_reaction().unwrap();
    assert!(sim.result().is_none());
    assert_eq!(sim.remaining_delay(), Some(DELAY));
}

#[test]
fn test_duplicate_rejected_in_free_mode() {
    let mut sim = session();
    sim.add_chemical("hcl").unwrap();
    let err = sim.add_chemical("hcl").unwrap_err();
    assert_eq!(err, SimulationError::DuplicateChemical("hcl".to_string()));
    assert_eq!(sim.selection().len(), 1);
}

#[test]
fn test_duplicate_allowed_with_predefined_reaction() {
    let mut sim = session();
    sim.select_reaction("acid-base-1").unwrap();
    sim.add_chemical("hcl").unwrap();
    sim.add_chemical("hcl").unwrap();
    assert_eq!(sim.selection().len(), 2);
    // removal takes every portion of the chemical
    sim.remove_chemical("hcl").unwrap();
    assert!(sim.selection().is_empty());
}

#[test]
fn test_select_reaction_resets_session() {
    let mut sim = session();
    sim.add_chemical("hcl").unwrap();
    sim.add_chemical("naoh").unwrap();
    sim.start_reaction().unwrap();
    sim.finish_pending();
    let reaction = sim.select_reaction("metal-acid-1").unwrap();
    assert_eq!(reaction.reactants, vec!["zn".to_string(), "hcl".to_string()]);
    assert!(sim.selection().is_empty());
    assert!(sim.result().is_none());
    assert!(!sim.is_reacting());
    assert_eq!(sim.selected_reaction().map(|r| r.id.as_str()), Some("metal-acid-1"));

    sim.deselect_reaction();
    assert!(sim.selected_reaction().is_none());
}

#[test]
fn test_predefined_reaction_cycle() {
    let mut sim = session();
    sim.select_reaction("acid-base-1").unwrap();
    sim.add_chemical("hcl").unwrap();
    sim.add_chemical("naoh").unwrap();
    sim.start_reaction().unwrap();
    let result = sim.finish_pending().cloned().unwrap();
    assert_eq!(result.formula, "HCl + NaOH → NaCl + H₂O");
    assert!(result.has_precipitate);
}

#[test]
fn test_lookup_failures_leave_state_unchanged() {
    let mut sim = session();
    sim.add_chemical("hcl").unwrap();
    let err = sim.add_chemical("unobtainium").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LookupFailure);
    let err = sim.select_reaction("nope").unwrap_err();
    assert_eq!(err, SimulationError::UnknownReaction("nope".to_string()));
    let err = sim.remove_chemical("naoh").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LookupFailure);
    assert_eq!(sim.selection().len(), 1);
    assert!(sim.selected_reaction().is_none());
}

#[test]
fn test_quantities_are_validated_and_clamped() {
    let mut sim = session();
    assert!(matches!(
        sim.add_chemical_with_quantity("hcl", 0.0),
        Err(SimulationError::InvalidQuantity { .. })
    ));
    assert!(matches!(
        sim.add_chemical_with_quantity("hcl", f64::NAN),
        Err(SimulationError::InvalidQuantity { .. })
    ));
    sim.add_chemical_with_quantity("hcl", 50.0).unwrap();
    assert_eq!(sim.selection()[0].quantity, 10.0);
    sim.set_quantity("hcl", 2.5).unwrap();
    assert_eq!(sim.selection()[0].quantity, 2.5);
    assert_eq!(
        sim.set_quantity("naoh", 1.0),
        Err(SimulationError::NotInTestTube("naoh".to_string()))
    );
}

#[test]
fn test_ambient_knobs_are_clamped() {
    let mut sim = session();
    assert_eq!(sim.set_temperature(500.0), 150.0);
    assert_eq!(sim.set_temperature(-20.0), 0.0);
    assert_eq!(sim.set_temperature(f64::NAN), 0.0);
    assert_eq!(sim.set_pressure(0.0), 0.1);
    assert_eq!(sim.set_pressure(2.0), 2.0);
    assert_eq!(sim.pressure(), 2.0);
}

#[test]
fn test_seeded_sessions_repeat() {
    let settings = SimulationSettings {
        seed: Some(42),
        ..SimulationSettings::default()
    };
    let run = || {
        let mut sim = Simulation::new(ReferenceData::builtin().unwrap(), settings.clone());
        sim.add_chemical("h2o").unwrap();
        sim.add_chemical("nacl").unwrap();
        sim.start_reaction().unwrap();
        sim.finish_pending().cloned().unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_resolution_draws_from_session_stream() {
    let mut sim = session().with_random_source(ScriptedRolls::new(vec![0.99]));
    sim.add_chemical("h2o").unwrap();
    sim.add_chemical("nacl").unwrap();
    sim.start_reaction().unwrap();
    let result = sim.finish_pending().cloned().unwrap();
    assert_eq!(result.temperature_change, TemperatureChange::Increase);
    assert!(result.has_bubbles);
}

#[test]
fn test_clock_saturates_instead_of_overflowing() {
    let mut sim = session();
    assert!(sim.advance(Duration::MAX).is_none());
    sim.add_chemical("hcl").unwrap();
    sim.add_chemical("naoh").unwrap();
    sim.start_reaction().unwrap();
    assert_eq!(sim.clock(), Duration::MAX);
    assert_eq!(sim.remaining_delay(), Some(Duration::ZERO));
    assert!(sim.advance(DELAY).is_some());
    assert_eq!(sim.clock(), Duration::MAX);
}

#[test]
fn test_zero_default_quantity_is_replaced() {
    let settings = SimulationSettings {
        default_quantity: 0.0,
        ..SimulationSettings::default()
    };
    let mut sim = Simulation::new(ReferenceData::builtin().unwrap(), settings);
    sim.add_chemical("hcl").unwrap();
    assert_eq!(sim.selection()[0].quantity, 1.0);
}

#[test]
fn test_replace_data_starts_over() {
    let mut sim = session();
    sim.select_reaction("acid-base-1").unwrap();
    sim.add_chemical("hcl").unwrap();
    sim.add_chemical("naoh").unwrap();
    let started = sim.start_reaction().unwrap();
    let water = r##"[{"id": "h2o", "name": "Water", "color": "#CCEEFF", "density": 1.0, "state": "liquid", "formula": "H2O", "categories": ["water"]}]"##;
    sim.replace_data(ReferenceData::from_json_str(water, "[]").unwrap());
    assert!(sim.selected_reaction().is_none());
    assert!(sim.selection().is_empty());
    assert!(sim.generation() > started);
    assert!(sim.advance(DELAY).is_none());
    assert_eq!(sim.phase(), Phase::Idle);
    assert_eq!(
        sim.add_chemical("hcl"),
        Err(SimulationError::UnknownChemical("hcl".to_string()))
    );
    sim.add_chemical("h2o").unwrap();
}
