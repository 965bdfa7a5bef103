//! # Chemicals and reactions of the teaching lab
//!
//! ## Main Data Structures
//! - `Chemical`: a record of the reference dataset (display names, colour, density, state, formula)
//!   together with the category tags and flame tint the reaction rules look at
//! - `Reaction`: an author-curated reaction with expected reactants/products, ideal conditions
//!   and the visual outcome ("effects") the designer intended
//! - `Portion`: a chemical poured into the test tube together with its quantity (mL)
//!
//! Category tags replace the hand-kept lists of ids ("which ids are acids?") with an attribute
//! of the chemical itself, so a new chemical takes part in the rules as soon as it is tagged.
use crate::Substances::color::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Phase enum: solid, liquid, gas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalState {
    Solid,
    Liquid,
    Gas,
}

impl PhysicalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhysicalState::Solid => "solid",
            PhysicalState::Liquid => "liquid",
            PhysicalState::Gas => "gas",
        }
    }

    /// inverse of `as_str`, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "solid" => Some(PhysicalState::Solid),
            "liquid" => Some(PhysicalState::Liquid),
            "gas" => Some(PhysicalState::Gas),
            _ => None,
        }
    }
}

/// Chemical categories used by the free-mode reaction rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Acid,
    Base,
    Metal,
    Salt,
    Oxidizer,
    Reducer,
    Water,
    /// reacts violently with water (Na, K)
    AlkaliMetal,
    Carbonate,
    /// dissolving it cools the solution
    Endothermic,
    /// strongly endothermic on dissolution (instant cold pack)
    ColdPack,
    Precipitant,
    SilverSalt,
    Halide,
    Peroxide,
    GlowActivator,
    Luminescent,
    Fuming,
    ExplosiveGas,
    Chlorate,
    Fuel,
    CopperSalt,
    Iron,
    Iodine,
    Starch,
}

/// Colour a chemical gives to a flame. Variants are ordered by precedence:
/// when several tints are in the tube the first one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlameTint {
    Copper,
    Sodium,
    Potassium,
    Calcium,
    Boron,
}

impl FlameTint {
    pub fn color(&self) -> Color {
        match self {
            FlameTint::Copper => Color::new(0x00, 0xFF, 0xFF),
            FlameTint::Sodium => Color::new(0xFF, 0xAA, 0x00),
            FlameTint::Potassium => Color::new(0xFF, 0x00, 0xFF),
            FlameTint::Calcium => Color::new(0xFF, 0x00, 0x00),
            FlameTint::Boron => Color::new(0x00, 0xFF, 0x00),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chemical {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub localized_name: String,
    pub color: Color,
    /// g/mL, only used as a blending weight
    pub density: f64,
    pub state: PhysicalState,
    #[serde(default)]
    pub formula: String,
    #[serde(default)]
    pub categories: BTreeSet<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flame_tint: Option<FlameTint>,
}

impl Chemical {
    pub fn new(id: &str, name: &str, color: Color, density: f64, state: PhysicalState) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            localized_name: String::new(),
            color,
            density,
            state,
            formula: String::new(),
            categories: BTreeSet::new(),
            flame_tint: None,
        }
    }

    pub fn with_formula(mut self, formula: &str) -> Self {
        self.formula = formula.to_string();
        self
    }

    pub fn with_categories(mut self, categories: &[Category]) -> Self {
        self.categories.extend(categories.iter().copied());
        self
    }

    pub fn with_flame_tint(mut self, tint: FlameTint) -> Self {
        self.flame_tint = Some(tint);
        self
    }

    pub fn is(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    /// formula to print in equations; chemicals without one fall back to the upper-cased id
    pub fn display_formula(&self) -> String {
        if self.formula.trim().is_empty() {
            self.id.to_uppercase()
        } else {
            self.formula.clone()
        }
    }
}

impl fmt::Display for Chemical {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.display_formula())
    }
}

/// A chemical poured into the test tube
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portion {
    pub chemical: Chemical,
    /// mL
    pub quantity: f64,
}

impl Portion {
    pub fn new(chemical: Chemical, quantity: f64) -> Self {
        Self { chemical, quantity }
    }

    pub fn id(&self) -> &str {
        &self.chemical.id
    }

    /// blending weight: density x quantity
    pub fn weight(&self) -> f64 {
        self.chemical.density * self.quantity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureTrend {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    /// °C
    pub temperature: f64,
    /// atm
    pub pressure: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalyst: Option<String>,
}

impl Default for Conditions {
    fn default() -> Self {
        Self {
            temperature: 25.0,
            pressure: 1.0,
            catalyst: None,
        }
    }
}

/// visual outcome a reaction author expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effects {
    pub color: Color,
    #[serde(default)]
    pub bubbles: bool,
    #[serde(default)]
    pub precipitate: bool,
    #[serde(default)]
    pub smoke: bool,
    #[serde(default)]
    pub fire: bool,
    #[serde(default)]
    pub ice: bool,
    #[serde(default)]
    pub glow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glow_color: Option<Color>,
    #[serde(default)]
    pub explosion: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<TemperatureTrend>,
}

impl Effects {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            bubbles: false,
            precipitate: false,
            smoke: false,
            fire: false,
            ice: false,
            glow: false,
            glow_color: None,
            explosion: false,
            temperature: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub localized_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub localized_description: String,
    pub reactants: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub conditions: Conditions,
    pub effects: Effects,
    /// precomputed equation, overrides the composed one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

impl Reaction {
    pub fn new(id: &str, name: &str, reactants: &[&str], products: &[&str], effects: Effects) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            localized_name: String::new(),
            description: String::new(),
            localized_description: String::new(),
            reactants: reactants.iter().map(|s| s.to_string()).collect(),
            products: products.iter().map(|s| s.to_string()).collect(),
            conditions: Conditions::default(),
            effects,
            formula: None,
        }
    }
}
