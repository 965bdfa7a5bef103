//! # Simulation Session
//!
//! ## Purpose
//! One test-tube session: the working selection, the optional predefined reaction,
//! the ambient knobs and the last `ReactionResult`.
//!
//! ## Lifecycle
//! ```text
//! Idle --start_reaction--> Pending --advance(delay)--> Resolved
//!   ^                         |                           |
//!   +----- clear / select / remove / stop ----------------+
//! ```
//! `Pending` lasts for the configured reaction delay (1.5 s by default). Time is simulated:
//! `advance(dt)` moves the session clock and publishes the result once the due time is
//! reached. Every operation that invalidates the outstanding timer bumps a generation
//! counter, so a superseded reaction can never land after a reset.
//!
//! ## Failures
//! Operations return `Result<_, SimulationError>` and log the failure. Nothing is fatal:
//! a failed operation leaves the session unchanged and the caller may simply ignore it.
use crate::Reactions::errors::SimulationError;
use crate::Reactions::randomness::{RandomSource, session_rng};
use crate::Reactions::reaction_result::ReactionResult;
use crate::Reactions::resolver::{ReactionInputs, ReactionResolver};
use crate::Substances::chemicals::{Portion, Reaction};
use crate::Substances::reference_data::ReferenceData;
use crate::settings::SimulationSettings;
use log::{debug, info, warn};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending,
    Resolved,
}

#[derive(Debug, Clone)]
struct PendingReaction {
    generation: u64,
    due_at: Duration,
    inputs: ReactionInputs,
}

pub struct Simulation {
    data: ReferenceData,
    settings: SimulationSettings,
    selected_reaction: Option<Reaction>,
    selection: Vec<Portion>,
    temperature: f64,
    pressure: f64,
    is_reacting: bool,
    result: Option<ReactionResult>,
    pending: Option<PendingReaction>,
    clock: Duration,
    generation: u64,
    rng: Box<dyn RandomSource>,
}

impl Simulation {
    /// Session on the given dataset, random stream seeded from `settings.seed`
    pub fn new(data: ReferenceData, settings: SimulationSettings) -> Self {
        let settings = settings.validated();
        let rng = session_rng(settings.seed);
        Self {
            temperature: settings.initial_temperature,
            pressure: settings.initial_pressure,
            data,
            settings,
            selected_reaction: None,
            selection: Vec::new(),
            is_reacting: false,
            result: None,
            pending: None,
            clock: Duration::ZERO,
            generation: 0,
            rng: Box::new(rng),
        }
    }

    pub fn with_random_source(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /////////////////////////////// READ API ///////////////////////////////////
    pub fn data(&self) -> &ReferenceData {
        &self.data
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn selected_reaction(&self) -> Option<&Reaction> {
        self.selected_reaction.as_ref()
    }

    pub fn selection(&self) -> &[Portion] {
        &self.selection
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn is_reacting(&self) -> bool {
        self.is_reacting
    }

    pub fn result(&self) -> Option<&ReactionResult> {
        self.result.as_ref()
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::Pending
        } else if self.result.is_some() {
            Phase::Resolved
        } else {
            Phase::Idle
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// simulated time since the session began
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// time left until the pending reaction resolves
    pub fn remaining_delay(&self) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.due_at.saturating_sub(self.clock))
    }

    /// Swaps in another dataset. The predefined reaction is dropped and the tube emptied,
    /// since their chemicals may not exist in the new data.
    pub fn replace_data(&mut self, data: ReferenceData) {
        info!(
            "dataset replaced: {} chemicals, {} reactions",
            data.chemicals().len(),
            data.reactions().len()
        );
        self.data = data;
        self.selected_reaction = None;
        self.reset_tube();
    }

    /////////////////////////////// SELECTION ///////////////////////////////////
    /// Makes a predefined reaction active and starts over with an empty tube
    pub fn select_reaction(&mut self, id: &str) -> Result<&Reaction, SimulationError> {
        let Some(reaction) = self.data.reaction(id).cloned() else {
            warn!("Reaction '{}' not found, selection unchanged", id);
            return Err(SimulationError::UnknownReaction(id.to_string()));
        };
        info!("selected reaction '{}' ({})", reaction.id, reaction.name);
        self.reset_tube();
        Ok(&*self.selected_reaction.insert(reaction))
    }

    /// Back to free mode; the tube is emptied
    pub fn deselect_reaction(&mut self) {
        if let Some(reaction) = self.selected_reaction.take() {
            info!("left reaction '{}', free mode", reaction.id);
        }
        self.reset_tube();
    }

    pub fn add_chemical(&mut self, id: &str) -> Result<(), SimulationError> {
        self.add_chemical_with_quantity(id, self.settings.default_quantity)
    }

    /// Pours `quantity` mL of a chemical into the tube. In free mode a chemical can be
    /// poured only once; with a predefined reaction active, repeats are allowed.
    pub fn add_chemical_with_quantity(&mut self, id: &str, quantity: f64) -> Result<(), SimulationError> {
        let quantity = self.checked_quantity(id, quantity)?;
        let Some(chemical) = self.data.chemical(id).cloned() else {
            warn!("Chemical '{}' not found", id);
            return Err(SimulationError::UnknownChemical(id.to_string()));
        };
        if self.selected_reaction.is_none() && self.contains(id) {
            warn!("Chemical '{}' is already in the test tube", id);
            return Err(SimulationError::DuplicateChemical(id.to_string()));
        }
        info!("added {} mL of {} ({})", quantity, chemical.name, chemical.id);
        self.selection.push(Portion::new(chemical, quantity));
        Ok(())
    }

    /// Changes the amount of the first portion of a chemical
    pub fn set_quantity(&mut self, id: &str, quantity: f64) -> Result<(), SimulationError> {
        let quantity = self.checked_quantity(id, quantity)?;
        match self.selection.iter_mut().find(|p| p.id() == id) {
            Some(portion) => {
                debug!("{}: {} mL -> {} mL", id, portion.quantity, quantity);
                portion.quantity = quantity;
                Ok(())
            }
            None => {
                warn!("Chemical '{}' is not in the test tube", id);
                Err(SimulationError::NotInTestTube(id.to_string()))
            }
        }
    }

    /// Removes every portion of a chemical; any pending or shown result is discarded
    pub fn remove_chemical(&mut self, id: &str) -> Result<(), SimulationError> {
        if !self.contains(id) {
            warn!("Chemical '{}' is not in the test tube", id);
            return Err(SimulationError::NotInTestTube(id.to_string()));
        }
        self.selection.retain(|p| p.id() != id);
        self.discard_result();
        info!("removed '{}', {} portion(s) left", id, self.selection.len());
        Ok(())
    }

    pub fn clear_test_tube(&mut self) {
        self.reset_tube();
        info!("test tube cleared");
    }

    /////////////////////////////// AMBIENT KNOBS ///////////////////////////////////
    /// Sets the ambient temperature (°C) clamped to the configured range; returns the applied value
    pub fn set_temperature(&mut self, value: f64) -> f64 {
        self.temperature = clamp_knob("temperature", value, self.settings.temperature_range, self.temperature);
        self.temperature
    }

    /// Sets the ambient pressure (atm) clamped to the configured range; returns the applied value
    pub fn set_pressure(&mut self, value: f64) -> f64 {
        self.pressure = clamp_knob("pressure", value, self.settings.pressure_range, self.pressure);
        self.pressure
    }

    /////////////////////////////// REACTION CYCLE ///////////////////////////////////
    /// Schedules a reaction on a snapshot of the current tube and knobs. Returns the
    /// generation of the new cycle. A cycle already pending is superseded.
    pub fn start_reaction(&mut self) -> Result<u64, SimulationError> {
        if self.selection.len() < 2 {
            warn!(
                "need at least 2 chemicals to start a reaction, have {}",
                self.selection.len()
            );
            return Err(SimulationError::NotEnoughChemicals {
                found: self.selection.len(),
            });
        }
        self.generation += 1;
        self.result = None;
        self.is_reacting = true;
        let due_at = self.clock.saturating_add(self.settings.reaction_delay());
        self.pending = Some(PendingReaction {
            generation: self.generation,
            due_at,
            inputs: ReactionInputs {
                selection: self.selection.clone(),
                reaction: self.selected_reaction.clone(),
                temperature: self.temperature,
                pressure: self.pressure,
            },
        });
        info!(
            "reaction #{} started with {} portion(s) at {:.1} °C, {:.2} atm",
            self.generation,
            self.selection.len(),
            self.temperature,
            self.pressure
        );
        Ok(self.generation)
    }

    /// Stops reacting. The timer is cancelled, the last result and the tube stay.
    pub fn stop_reaction(&mut self) {
        if self.pending.take().is_some() {
            self.generation += 1;
            debug!("pending reaction cancelled by stop");
        }
        self.is_reacting = false;
        info!("reaction stopped");
    }

    /// Moves the simulated clock forward. Returns the result if this step published one.
    pub fn advance(&mut self, dt: Duration) -> Option<&ReactionResult> {
        self.clock = self.clock.saturating_add(dt);
        let due = self
            .pending
            .as_ref()
            .is_some_and(|p| p.due_at <= self.clock);
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        if pending.generation != self.generation {
            debug!(
                "dropping stale reaction #{} (current #{})",
                pending.generation, self.generation
            );
            return None;
        }
        let resolver = ReactionResolver::new(&self.data)
            .with_unknown_products(self.settings.unknown_products);
        let result = resolver.resolve(&pending.inputs, self.rng.as_mut());
        info!("reaction #{} resolved: {}", pending.generation, result);
        self.result = Some(result);
        self.result.as_ref()
    }

    /// Skips the rest of the reaction delay
    pub fn finish_pending(&mut self) -> Option<&ReactionResult> {
        let remaining = self.remaining_delay()?;
        self.advance(remaining)
    }

    /////////////////////////////// INTERNALS ///////////////////////////////////
    fn contains(&self, id: &str) -> bool {
        self.selection.iter().any(|p| p.id() == id)
    }

    fn checked_quantity(&self, id: &str, quantity: f64) -> Result<f64, SimulationError> {
        if !quantity.is_finite() || quantity <= 0.0 {
            warn!("rejected quantity {} for '{}'", quantity, id);
            return Err(SimulationError::InvalidQuantity {
                id: id.to_string(),
                quantity,
            });
        }
        if quantity > self.settings.max_quantity {
            warn!(
                "quantity {} mL for '{}' clamped to {} mL",
                quantity, id, self.settings.max_quantity
            );
            return Ok(self.settings.max_quantity);
        }
        Ok(quantity)
    }

    /// drops the result and invalidates any outstanding timer
    fn discard_result(&mut self) {
        if self.pending.take().is_some() {
            debug!("pending reaction #{} invalidated", self.generation);
        }
        self.generation += 1;
        self.result = None;
        self.is_reacting = false;
    }

    fn reset_tube(&mut self) {
        self.selection.clear();
        self.discard_result();
    }
}

fn clamp_knob(name: &str, value: f64, (low, high): (f64, f64), current: f64) -> f64 {
    if !value.is_finite() {
        warn!("ignored non-finite {} {}", name, value);
        return current;
    }
    let clamped = value.max(low).min(high);
    if clamped != value {
        warn!("{} {} out of range [{}, {}], using {}", name, value, low, high, clamped);
    }
    clamped
}
