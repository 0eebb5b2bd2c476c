use super::prediction::PredictionError;
use super::stage::WorkflowStage;
use crate::core::io::ParseError;
use crate::core::models::side::Side;
use crate::core::validation::ValidationError;
use crate::engine::error::AnalysisError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Stage {stage} is not ready: {reason}")]
    StageNotReady { stage: WorkflowStage, reason: String },

    #[error("Cannot retreat from {from} to {to}: the target stage must come before the current one")]
    InvalidRetreat {
        from: WorkflowStage,
        to: WorkflowStage,
    },

    #[error("Artifacts of stage {stage} cannot change while the session is at {current}; retreat first")]
    StageLocked {
        stage: WorkflowStage,
        current: WorkflowStage,
    },

    #[error("No {side} input has been provided")]
    MissingInput { side: Side },

    #[error("The {side} input is not a sequence, so there is nothing to predict")]
    NoSequence { side: Side },

    #[error("Corrupt session document: {0}")]
    CorruptSession(String),

    #[error("Structure parsing failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Interface analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Structure prediction failed: {0}")]
    Prediction(#[from] PredictionError),

    #[error("I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to encode session: {0}")]
    Encode(#[source] serde_json::Error),
}
