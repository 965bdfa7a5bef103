//! # Formula Composer
//!
//! Builds the human-readable equation shown next to a reaction, e.g. `HCl + NaOH → NaCl + H₂O`.
//!
//! This is an illustrative lookup, not a balancing solver: coefficients are never computed,
//! and when the products are unknown a small table of narratives ("Salt + H₂O") keyed by
//! reactant categories stands in for them.
use crate::Substances::chemicals::{Category, Chemical};
use crate::Substances::reference_data::ReferenceData;
use serde::{Deserialize, Serialize};

pub const ARROW: &str = "→";

/// narratives for spontaneous reactions without a product list, first match wins
const NARRATIVES: &[(Category, Category, &str)] = &[
    (Category::Acid, Category::Metal, "Metal salt + H₂↑"),
    (Category::Acid, Category::Carbonate, "Salt + H₂O + CO₂↑"),
    (Category::Base, Category::Acid, "Salt + H₂O"),
];

/// Right-hand side printed when a spontaneous reaction matches no narrative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownProducts {
    /// `... → Products`
    Products,
    /// `... → No Reaction`
    NoReaction,
}

impl UnknownProducts {
    pub fn label(&self) -> &'static str {
        match self {
            UnknownProducts::Products => "Products",
            UnknownProducts::NoReaction => "No Reaction",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormulaComposer<'a> {
    data: &'a ReferenceData,
    unknown_products: UnknownProducts,
}

impl<'a> FormulaComposer<'a> {
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

    /// reactant formulas joined with " + "
    pub fn left_side(reactants: &[&Chemical]) -> String {
        reactants
            .iter()
            .map(|c| c.display_formula())
            .collect::<Vec<_>>()
            .join(" + ")
    }

    /// - products known: `left → right`, unknown product ids print upper-cased
    /// - no products, spontaneous: `left → narrative` (or the configured fallback)
    /// - no products, not spontaneous: `left`
    pub fn compose(&self, reactants: &[&Chemical], products: &[String], spontaneous: bool) -> String {
        let left = Self::left_side(reactants);
        if !products.is_empty() {
            let right = products
                .iter()
                .map(|id| self.data.formula_of(id))
                .collect::<Vec<_>>()
                .join(" + ");
            return format!("{} {} {}", left, ARROW, right);
        }
        if !spontaneous {
            return left;
        }
        let present = |category: Category| reactants.iter().any(|c| c.is(category));
        let narrative = NARRATIVES
            .iter()
            .find(|(first, second, _)| present(*first) && present(*second))
            .map(|(_, _, text)| *text)
            .unwrap_or(self.unknown_products.label());
        format!("{} {} {}", left, ARROW, narrative)
    }
}
