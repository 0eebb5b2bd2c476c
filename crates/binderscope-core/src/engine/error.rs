use crate::core::models::side::Side;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("The {side} structure has no residues eligible for interface analysis")]
    EmptyStructure { side: Side },

    #[error("Invalid contact cutoff {0}: must be a finite distance greater than zero")]
    InvalidCutoff(f64),

    #[error("Invalid clash threshold {0}: must be a finite, non-negative distance")]
    InvalidClashThreshold(f64),
}
