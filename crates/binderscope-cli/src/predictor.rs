use binderscope::workflows::prediction::{
    PredictionError, PredictionOutput, PredictorConfig, StructurePredictor,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A predictor that hands back a structure some external service already produced.
///
/// The structure file is returned as raw text so the session parses and validates it;
/// an optional side file supplies per-residue confidence.
#[derive(Debug, Clone)]
pub struct PrecomputedPredictor {
    structure_path: PathBuf,
    confidence_path: Option<PathBuf>,
}

impl PrecomputedPredictor {
    pub fn new(structure_path: &Path, confidence_path: Option<&Path>) -> Self {
        Self {
            structure_path: structure_path.to_path_buf(),
            confidence_path: confidence_path.map(Path::to_path_buf),
        }
    }
}

impl StructurePredictor for PrecomputedPredictor {
    fn predict(
        &self,
        sequence: &str,
        config: &PredictorConfig,
    ) -> Result<PredictionOutput, PredictionError> {
        info!(
            "Using precomputed '{}' prediction from {:?}",
            config.model, &self.structure_path
        );
        debug!("Sequence length: {}", sequence.len());
        let text = read(&self.structure_path)?;
        let confidence = match &self.confidence_path {
            Some(path) => Some(parse_confidence(&read(path)?).map_err(|reason| {
                PredictionError::Service {
                    model: config.model.clone(),
                    reason: format!("{}: {}", path.display(), reason),
                }
            })?),
            None => None,
        };
        Ok(PredictionOutput::Raw { text, confidence })
    }
}

fn read(path: &Path) -> Result<String, PredictionError> {
    fs::read_to_string(path).map_err(|source| PredictionError::Io {
        path: path.to_string_lossy().to_string(),
        source,
    })
}

/// Parses confidence values separated by whitespace or commas. `#` starts a comment.
pub fn parse_confidence(text: &str) -> Result<Vec<f64>, String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .flat_map(|line| line.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", token))
        })
        .collect()
}
