use thiserror::Error;

/// Two families of failure exist: an id that does not resolve, and an operation
/// whose precondition does not hold. Neither is fatal, the session keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LookupFailure,
    PreconditionUnmet,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("Chemical '{0}' not found")]
    UnknownChemical(String),
    #[error("Reaction '{0}' not found")]
    UnknownReaction(String),
    #[error("Chemical '{0}' is not in the test tube")]
    NotInTestTube(String),
    #[error("Chemical '{0}' is already in the test tube")]
    DuplicateChemical(String),
    #[error("At least 2 chemicals are needed to start a reaction, found {found}")]
    NotEnoughChemicals { found: usize },
    #[error("Invalid quantity {quantity} mL for '{id}'")]
    InvalidQuantity { id: String, quantity: f64 },
}

impl SimulationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SimulationError::UnknownChemical(_)
            | SimulationError::UnknownReaction(_)
            | SimulationError::NotInTestTube(_) => ErrorKind::LookupFailure,
            SimulationError::DuplicateChemical(_)
            | SimulationError::NotEnoughChemicals { .. }
            | SimulationError::InvalidQuantity { .. } => ErrorKind::PreconditionUnmet,
        }
    }
}
