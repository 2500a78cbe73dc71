/*
 * Error Module
 *
 * Error types surfaced while setting up a simulation. Faults inside a running
 * frame never reach here: they are logged and the frame carries on.
 */

use thiserror::Error;

pub use crate::species::SpeciesError;
pub use crate::steering::SteeringError;
pub use crate::vector::VectorError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid steering configuration: {0}")]
    Steering(#[from] SteeringError),

    #[error(transparent)]
    Species(#[from] SpeciesError),
}
