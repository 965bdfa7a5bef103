/// eng
/// Weighted colour of a mixture: every portion contributes its colour with the weight
/// density x quantity. An empty tube is white, a single chemical keeps its colour.
pub mod color_blender;
/// Failures of session operations, grouped into lookup failures and unmet preconditions
pub mod errors;
/// Equation strings such as "HCl + NaOH → NaCl + H₂O". Unknown ids print upper-cased,
/// spontaneous reactions without products get a short narrative.
///
///  # Examples
/// ```
/// use ChemLab::Reactions::formula_composer::FormulaComposer;
/// use ChemLab::Substances::reference_data::ReferenceData;
/// let data = ReferenceData::builtin().unwrap();
/// let reactants = vec![data.chemical("zn").unwrap(), data.chemical("hcl").unwrap()];
/// let formula = FormulaComposer::new(&data).compose(&reactants, &[], true);
/// assert_eq!(formula, "Zn + HCl → Metal salt + H₂↑");
/// ```
pub mod formula_composer;
/// intensity scalar and sound cue
pub mod intensity;
/// category, state and quantity summary of the tube contents
pub mod mixture;
/// injectable random stream: any rand generator, or pinned draws for tests
pub mod randomness;
/// the canonical outcome record of one reaction cycle
pub mod reaction_result;
/// eng
/// Rule engine that turns a snapshot of the tube and the ambient conditions into a result.
/// A predefined reaction follows its authored effects; otherwise effects are inferred
/// from the categories of the chemicals, the final temperature and random rolls.
///
///  # Examples
/// ```
/// use ChemLab::Reactions::randomness::FixedRoll;
/// use ChemLab::Reactions::resolver::{ReactionInputs, ReactionResolver};
/// use ChemLab::Substances::chemicals::Portion;
/// use ChemLab::Substances::reference_data::ReferenceData;
/// let data = ReferenceData::builtin().unwrap();
/// let inputs = ReactionInputs {
///     selection: vec![
///         Portion::new(data.chemical("hcl").unwrap().clone(), 1.0),
///         Portion::new(data.chemical("naoh").unwrap().clone(), 1.0),
///     ],
///     reaction: None,
///     temperature: 25.0,
///     pressure: 1.0,
/// };
/// let result = ReactionResolver::new(&data).resolve(&inputs, &mut FixedRoll(0.0));
/// println!("{}", result);
/// ```
pub mod resolver;
/// eng
/// The test-tube session: selection, predefined reaction, ambient knobs and the delayed
/// reaction cycle on a simulated clock.
///
///  # Examples
/// ```
/// use std::time::Duration;
/// use ChemLab::Reactions::simulation::Simulation;
/// use ChemLab::Substances::reference_data::ReferenceData;
/// use ChemLab::settings::SimulationSettings;
/// let mut sim = Simulation::new(ReferenceData::builtin().unwrap(), SimulationSettings::default());
/// sim.add_chemical("zn").unwrap();
/// sim.add_chemical("hcl").unwrap();
/// sim.start_reaction().unwrap();
/// sim.advance(Duration::from_millis(1500));
/// assert!(sim.result().is_some());
/// ```
pub mod simulation;
#[cfg(test)]
mod simulation_tests;
