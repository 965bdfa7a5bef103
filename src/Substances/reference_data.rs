//! # Reference Data Module
//!
//! ## Purpose
//! Read-only store of the chemicals and predefined reactions the lab knows about.
//! The data is plain JSON: an array of chemicals and an array of reactions.
//! The bundled dataset is compiled into the binary; other datasets are loaded
//! from the paths kept by the `library_manager`.
//!
//! ## Validation
//! - duplicate chemical/reaction ids and negative or non-finite densities are hard errors
//! - reactant/product ids that do not resolve are only logged: formulas degrade to the
//!   upper-cased id instead
use crate::Substances::chemicals::{Chemical, PhysicalState, Reaction};
use crate::library_manager::LibraryConfig;
use log::{info, warn};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use thiserror::Error;

const BUILTIN_CHEMICALS: &str = include_str!("../../data/chemicals.json");
const BUILTIN_REACTIONS: &str = include_str!("../../data/reactions.json");

/// Reaction families; a reaction belongs to the family its id starts with
pub const REACTION_CATEGORIES: &[&str] = &[
    "combustion",
    "metal-nonmetal",
    "metal-water",
    "metal-acid",
    "acid-base",
    "acid-oxide",
    "precipitation",
    "redox",
    "displacement",
    "double-displacement",
    "decomposition",
    "catalytic",
    "gas-formation",
];

#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid JSON in {what}: {source}")]
    Json {
        what: String,
        source: serde_json::Error,
    },
    #[error("Duplicate chemical id '{0}'")]
    DuplicateChemical(String),
    #[error("Duplicate reaction id '{0}'")]
    DuplicateReaction(String),
    #[error("Chemical '{id}' has invalid density {density}")]
    InvalidDensity { id: String, density: f64 },
}

#[derive(Debug, Clone)]
pub struct ReferenceData {
    chemicals: Vec<Chemical>,
    reactions: Vec<Reaction>,
    chemical_index: HashMap<String, usize>,
    reaction_index: HashMap<String, usize>,
}

impl ReferenceData {
    /// Builds a store from already parsed records, validating ids and densities
    pub fn new(chemicals: Vec<Chemical>, reactions: Vec<Reaction>) -> Result<Self, DataError> {
        let mut chemical_index = HashMap::new();
        for (i, chemical) in chemicals.iter().enumerate() {
            if !chemical.density.is_finite() || chemical.density < 0.0 {
                return Err(DataError::InvalidDensity {
                    id: chemical.id.clone(),
                    density: chemical.density,
                });
            }
            if chemical.density == 0.0 {
                warn!("chemical '{}' has zero density and will not tint blends", chemical.id);
            }
            if chemical_index.insert(chemical.id.clone(), i).is_some() {
                return Err(DataError::DuplicateChemical(chemical.id.clone()));
            }
        }
        let mut reaction_index = HashMap::new();
        for (i, reaction) in reactions.iter().enumerate() {
            if reaction_index.insert(reaction.id.clone(), i).is_some() {
                return Err(DataError::DuplicateReaction(reaction.id.clone()));
            }
        }
        let data = Self {
            chemicals,
            reactions,
            chemical_index,
            reaction_index,
        };
        for id in data.unresolved_ids() {
            warn!("reaction data references unknown chemical '{}'", id);
        }
        Ok(data)
    }

    /// Parses the two JSON documents (chemical array, reaction array)
    pub fn from_json_str(chemicals: &str, reactions: &str) -> Result<Self, DataError> {
        let chemicals: Vec<Chemical> =
            serde_json::from_str(chemicals).map_err(|source| DataError::Json {
                what: "chemicals".to_string(),
                source,
            })?;
        let reactions: Vec<Reaction> =
            serde_json::from_str(reactions).map_err(|source| DataError::Json {
                what: "reactions".to_string(),
                source,
            })?;
        Self::new(chemicals, reactions)
    }

    /// The dataset shipped with the crate
    pub fn builtin() -> Result<Self, DataError> {
        Self::from_json_str(BUILTIN_CHEMICALS, BUILTIN_REACTIONS)
    }

    /// Loads the datasets named in the library configuration. A path that does not
    /// exist falls back to the bundled file of the same kind.
    pub fn load(config: &LibraryConfig) -> Result<Self, DataError> {
        let chemicals = read_or_builtin(&config.chemical_base, BUILTIN_CHEMICALS)?;
        let reactions = read_or_builtin(&config.reaction_base, BUILTIN_REACTIONS)?;
        let data = Self::from_json_str(&chemicals, &reactions)?;
        info!(
            "loaded {} chemicals and {} reactions",
            data.chemicals.len(),
            data.reactions.len()
        );
        Ok(data)
    }

    pub fn chemical(&self, id: &str) -> Option<&Chemical> {
        self.chemical_index.get(id).map(|&i| &self.chemicals[i])
    }

    pub fn reaction(&self, id: &str) -> Option<&Reaction> {
        self.reaction_index.get(id).map(|&i| &self.reactions[i])
    }

    pub fn chemicals(&self) -> &[Chemical] {
        &self.chemicals
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    /// Chemicals whose name, localized name or id contains `term` (case-insensitive),
    /// optionally of one physical state only. An empty term matches every chemical.
    pub fn search_chemicals(&self, term: &str, state: Option<PhysicalState>) -> Vec<&Chemical> {
        let term = term.trim().to_lowercase();
        self.chemicals
            .iter()
            .filter(|c| state.is_none_or(|s| c.state == s))
            .filter(|c| {
                term.is_empty()
                    || c.name.to_lowercase().contains(&term)
                    || c.localized_name.to_lowercase().contains(&term)
                    || c.id.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Reactions of a family (id prefix such as "acid-base") whose name or description
    /// contains `term`, both in either language. No category and an empty term match all.
    pub fn search_reactions(&self, category: Option<&str>, term: &str) -> Vec<&Reaction> {
        let term = term.trim().to_lowercase();
        self.reactions
            .iter()
            .filter(|r| category.is_none_or(|prefix| r.id.starts_with(prefix)))
            .filter(|r| {
                term.is_empty()
                    || [&r.name, &r.localized_name, &r.description, &r.localized_description]
                        .iter()
                        .any(|text| text.to_lowercase().contains(&term))
            })
            .collect()
    }

    /// formula of a chemical id, or the upper-cased id when the chemical is unknown
    pub fn formula_of(&self, id: &str) -> String {
        match self.chemical(id) {
            Some(chemical) => chemical.display_formula(),
            None => id.to_uppercase(),
        }
    }

    /// reactant/product ids (and catalysts) that do not resolve against the chemical table
    pub fn unresolved_ids(&self) -> BTreeSet<String> {
        self.reactions
            .iter()
            .flat_map(|r| {
                r.reactants
                    .iter()
                    .chain(r.products.iter())
                    .chain(r.conditions.catalyst.iter())
            })
            .filter(|id| !self.chemical_index.contains_key(id.as_str()))
            .cloned()
            .collect()
    }
}

fn read_or_builtin(path: &str, builtin: &str) -> Result<String, DataError> {
    if Path::new(path).exists() {
        fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_string(),
            source,
        })
    } else {
        warn!("dataset '{}' not found, using the bundled one", path);
        Ok(builtin.to_string())
    }
}
