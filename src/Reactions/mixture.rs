//! Summary of the test tube contents the free-mode rules ask questions about.
use crate::Substances::chemicals::{Category, FlameTint, PhysicalState, Portion};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Mixture {
    categories: HashSet<Category>,
    states: HashSet<PhysicalState>,
    flame_tint: Option<FlameTint>,
    total_quantity: f64,
}

impl Mixture {
    pub fn new(portions: &[Portion]) -> Self {
        Self {
            categories: portions
                .iter()
                .flat_map(|p| p.chemical.categories.iter().copied())
                .collect(),
            states: portions.iter().map(|p| p.chemical.state).collect(),
            flame_tint: portions.iter().filter_map(|p| p.chemical.flame_tint).min(),
            total_quantity: portions.iter().map(|p| p.quantity).sum(),
        }
    }

    pub fn has(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    /// both categories are present (possibly on the same chemical)
    pub fn has_both(&self, first: Category, second: Category) -> bool {
        self.has(first) && self.has(second)
    }

    pub fn has_state(&self, state: PhysicalState) -> bool {
        self.states.contains(&state)
    }

    /// mL in the tube
    pub fn total_quantity(&self) -> f64 {
        self.total_quantity
    }

    /// Amplification of temperature swings by the amount in the tube, capped at 3
    pub fn quantity_factor(&self) -> f64 {
        (self.total_quantity / 2.0).min(3.0)
    }

    /// strongest flame colour among the chemicals, by tint precedence
    pub fn flame_tint(&self) -> Option<FlameTint> {
        self.flame_tint
    }
}
