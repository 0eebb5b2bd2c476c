use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The six ordered stages of a binder-evaluation project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStage {
    TargetInput,
    TargetPrediction,
    BinderDesign,
    BinderPrediction,
    ComplexAnalysis,
    Results,
}

impl WorkflowStage {
    pub const ALL: [WorkflowStage; 6] = [
        WorkflowStage::TargetInput,
        WorkflowStage::TargetPrediction,
        WorkflowStage::BinderDesign,
        WorkflowStage::BinderPrediction,
        WorkflowStage::ComplexAnalysis,
        WorkflowStage::Results,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn is_terminal(self) -> bool {
        self == WorkflowStage::Results
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowStage::TargetInput => "TARGET_INPUT",
            WorkflowStage::TargetPrediction => "TARGET_PREDICTION",
            WorkflowStage::BinderDesign => "BINDER_DESIGN",
            WorkflowStage::BinderPrediction => "BINDER_PREDICTION",
            WorkflowStage::ComplexAnalysis => "COMPLEX_ANALYSIS",
            WorkflowStage::Results => "RESULTS",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WorkflowStage::TargetInput => "Target Input",
            WorkflowStage::TargetPrediction => "Target Structure Prediction",
            WorkflowStage::BinderDesign => "Binder Design",
            WorkflowStage::BinderPrediction => "Binder Structure Prediction",
            WorkflowStage::ComplexAnalysis => "Complex Analysis",
            WorkflowStage::Results => "Results",
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown workflow stage '{0}'")]
pub struct ParseStageError(String);

impl FromStr for WorkflowStage {
    type Err = ParseStageError;

    /// Accepts the canonical upper-case names as well as lower-case and kebab-case forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == normalized)
            .ok_or_else(|| ParseStageError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    NotStarted,
    InProgress,
    Completed,
    /// Was completed, but an upstream artifact has since been replaced.
    Invalidated,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                StageStatus::NotStarted => "not started",
                StageStatus::InProgress => "in progress",
                StageStatus::Completed => "completed",
                StageStatus::Invalidated => "invalidated",
            }
        )
    }
}
