use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default contact cutoff between representative atoms, in Angstroms.
pub const DEFAULT_CUTOFF: f64 = 5.0;
/// Default distance below which a contact counts as a steric clash, in Angstroms.
pub const DEFAULT_CLASH_THRESHOLD: f64 = 2.5;
/// Residue-pair count at which the analyzer switches from brute force to the cell grid.
pub const DEFAULT_SPATIAL_INDEX_MIN_PAIRS: usize = 250_000;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for {parameter}: {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub cutoff: f64,
    pub clash_threshold: f64,
    pub include_hetero: bool,
    pub spatial_index_min_pairs: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            clash_threshold: DEFAULT_CLASH_THRESHOLD,
            include_hetero: false,
            spatial_index_min_pairs: DEFAULT_SPATIAL_INDEX_MIN_PAIRS,
        }
    }
}

impl AnalysisConfig {
    /// Default settings with a different cutoff. The cutoff is checked at analysis time.
    pub fn with_cutoff(cutoff: f64) -> Self {
        Self {
            cutoff,
            ..Self::default()
        }
    }
}

/// Builds an [`AnalysisConfig`], falling back to defaults for unset parameters.
#[derive(Default)]
pub struct AnalysisConfigBuilder {
    cutoff: Option<f64>,
    clash_threshold: Option<f64>,
    include_hetero: Option<bool>,
    spatial_index_min_pairs: Option<usize>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
    pub fn clash_threshold(mut self, threshold: f64) -> Self {
        self.clash_threshold = Some(threshold);
        self
    }
    pub fn include_hetero(mut self, include: bool) -> Self {
        self.include_hetero = Some(include);
        self
    }
    pub fn spatial_index_min_pairs(mut self, pairs: usize) -> Self {
        self.spatial_index_min_pairs = Some(pairs);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let defaults = AnalysisConfig::default();
        let cutoff = self.cutoff.unwrap_or(defaults.cutoff);
        if !cutoff.is_finite() || cutoff <= 0.0 {
            return Err(ConfigError::InvalidValue {
                parameter: "cutoff",
                reason: format!("{} is not a positive distance", cutoff),
            });
        }
        let clash_threshold = self.clash_threshold.unwrap_or(defaults.clash_threshold);
        if !clash_threshold.is_finite() || clash_threshold < 0.0 {
            return Err(ConfigError::InvalidValue {
                parameter: "clash_threshold",
                reason: format!("{} is not a non-negative distance", clash_threshold),
            });
        }
        Ok(AnalysisConfig {
            cutoff,
            clash_threshold,
            include_hetero: self.include_hetero.unwrap_or(defaults.include_hetero),
            spatial_index_min_pairs: self
                .spatial_index_min_pairs
                .unwrap_or(defaults.spatial_index_min_pairs),
        })
    }
}
