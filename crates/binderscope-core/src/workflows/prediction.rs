use super::error::WorkflowError;
use super::session::WorkflowSession;
use crate::core::io::ParseError;
use crate::core::models::side::Side;
use crate::core::models::structure::Structure;
use std::fmt;
use thiserror::Error;
use tracing::{info, instrument};

/// Connection settings for a structure-prediction service.
///
/// Passed explicitly to every [`StructurePredictor::predict`] call; nothing here is read
/// from the environment by the library.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PredictorConfig {
    pub model: String,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

impl PredictorConfig {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..Default::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }
}

impl fmt::Debug for PredictorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictorConfig")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// What a predictor hands back.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutput {
    /// A structure the predictor already parsed.
    Parsed(Structure),
    /// Raw PDB or mmCIF text, optionally with per-residue confidence reported separately.
    Raw {
        text: String,
        confidence: Option<Vec<f64>>,
    },
}

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Predictor '{model}' failed: {reason}")]
    Service { model: String, reason: String },

    #[error("Predictor is misconfigured: {0}")]
    Configuration(String),

    #[error("Failed to read prediction output '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Prediction output could not be parsed: {0}")]
    Parse(#[from] ParseError),
}

/// A service that turns an amino-acid sequence into a 3-D structure.
pub trait StructurePredictor {
    fn predict(
        &self,
        sequence: &str,
        config: &PredictorConfig,
    ) -> Result<PredictionOutput, PredictionError>;
}

/// Predicts the structure for `side` from its sequence input and stores the result.
///
/// The session is checked before the predictor is called, and a failed prediction leaves it
/// untouched.
#[instrument(skip_all, name = "prediction_workflow", fields(side = %side, model = %config.model))]
pub fn run_prediction(
    session: &mut WorkflowSession,
    side: Side,
    predictor: &impl StructurePredictor,
    config: &PredictorConfig,
) -> Result<(), WorkflowError> {
    session.ensure_writable(WorkflowSession::prediction_stage(side))?;
    let sequence = session
        .input_sequence(side)?
        .ok_or(WorkflowError::NoSequence { side })?
        .to_string();

    info!("Requesting structure prediction for a {}-residue sequence.", sequence.len());
    let output = predictor.predict(&sequence, config)?;
    session.accept_prediction(side, output, Some(&config.model))?;
    info!("Prediction stored.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::structure::StructureSource;
    use crate::workflows::inputs::{BinderInput, DesignMethod, TargetInput};
    use crate::workflows::stage::WorkflowStage;
    use std::cell::Cell;

    const TARGET_SEQUENCE: &str = "MKTAYIAKQRQISFVKSHFSRQ";

    fn pdb_text(residues: usize) -> String {
        let mut text = String::new();
        for i in 0..residues {
            text.push_str(&format!(
                "ATOM  {:>5}  CA  GLY A{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00 {:>5.2}           C\n",
                i + 1,
                i + 1,
                i as f64 * 3.8,
                0.0,
                0.0,
                85.0
            ));
        }
        text.push_str("END\n");
        text
    }

    struct FakePredictor {
        output: PredictionOutput,
        calls: Cell<usize>,
    }

    impl FakePredictor {
        fn new(output: PredictionOutput) -> Self {
            Self {
                output,
                calls: Cell::new(0),
            }
        }
    }

    impl StructurePredictor for FakePredictor {
        fn predict(
            &self,
            _sequence: &str,
            _config: &PredictorConfig,
        ) -> Result<PredictionOutput, PredictionError> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.output.clone())
        }
    }

    struct FailingPredictor;

    impl StructurePredictor for FailingPredictor {
        fn predict(
            &self,
            _sequence: &str,
            config: &PredictorConfig,
        ) -> Result<PredictionOutput, PredictionError> {
            Err(PredictionError::Service {
                model: config.model.clone(),
                reason: "quota exceeded".into(),
            })
        }
    }

    fn session_with_target_sequence() -> WorkflowSession {
        let mut session = WorkflowSession::new("prediction");
        session
            .set_target_input(TargetInput::from_sequence(TARGET_SEQUENCE).unwrap())
            .unwrap();
        session
    }

    #[test]
    fn raw_prediction_is_parsed_and_tagged_with_model() {
        let mut session = session_with_target_sequence();
        let predictor = FakePredictor::new(PredictionOutput::Raw {
            text: pdb_text(12),
            confidence: None,
        });

        run_prediction(&mut session, Side::Target, &predictor, &PredictorConfig::new("esmfold"))
            .unwrap();

        let structure = session.current_structure(Side::Target).unwrap();
        assert_eq!(structure.residue_count(), 12);
        assert_eq!(
            structure.source(),
            &StructureSource::SequenceDerived {
                model: Some("esmfold".into())
            }
        );
        assert_eq!(structure.mean_confidence(), Some(85.0));
        assert_eq!(predictor.calls.get(), 1);
    }

    #[test]
    fn explicit_confidence_overrides_b_factors() {
        let mut session = session_with_target_sequence();
        let predictor = FakePredictor::new(PredictionOutput::Raw {
            text: pdb_text(10),
            confidence: Some(vec![50.0; 10]),
        });
        run_prediction(&mut session, Side::Target, &predictor, &PredictorConfig::new("m"))
            .unwrap();
        assert_eq!(
            session.current_structure(Side::Target).unwrap().mean_confidence(),
            Some(50.0)
        );
    }

    #[test]
    fn mismatched_confidence_is_rejected_without_storing() {
        let mut session = session_with_target_sequence();
        let before = session.clone();
        let predictor = FakePredictor::new(PredictionOutput::Raw {
            text: pdb_text(10),
            confidence: Some(vec![50.0; 3]),
        });
        let err = run_prediction(&mut session, Side::Target, &predictor, &PredictorConfig::new("m"))
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
        assert_eq!(session, before);
    }

    #[test]
    fn predictor_failure_leaves_session_unchanged() {
        let mut session = session_with_target_sequence();
        let before = session.clone();
        let err = run_prediction(
            &mut session,
            Side::Target,
            &FailingPredictor,
            &PredictorConfig::new("esmfold"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Prediction(PredictionError::Service { .. })
        ));
        assert_eq!(session, before);
    }

    #[test]
    fn missing_or_structural_input_is_not_predicted() {
        let mut session = WorkflowSession::new("prediction");
        let predictor = FakePredictor::new(PredictionOutput::Raw {
            text: pdb_text(10),
            confidence: None,
        });
        let config = PredictorConfig::new("m");
        assert!(matches!(
            run_prediction(&mut session, Side::Binder, &predictor, &config),
            Err(WorkflowError::MissingInput { side: Side::Binder })
        ));

        let uploaded = crate::core::io::parse_structure(&pdb_text(12)).unwrap();
        session
            .set_binder_input(BinderInput::from_structure(uploaded, DesignMethod::Manual).unwrap())
            .unwrap();
        assert!(matches!(
            run_prediction(&mut session, Side::Binder, &predictor, &config),
            Err(WorkflowError::NoSequence { side: Side::Binder })
        ));
        assert_eq!(predictor.calls.get(), 0);
    }

    #[test]
    fn locked_stage_is_checked_before_calling_predictor() {
        let mut session = session_with_target_sequence();
        let predictor = FakePredictor::new(PredictionOutput::Raw {
            text: pdb_text(10),
            confidence: None,
        });
        let config = PredictorConfig::new("m");
        run_prediction(&mut session, Side::Target, &predictor, &config).unwrap();
        session.advance().unwrap();
        session.advance().unwrap();
        assert_eq!(session.current_stage(), WorkflowStage::BinderDesign);

        assert!(matches!(
            run_prediction(&mut session, Side::Target, &predictor, &config),
            Err(WorkflowError::StageLocked { .. })
        ));
        assert_eq!(predictor.calls.get(), 1);
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = PredictorConfig::new("esmfold").with_api_key("secret-token");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("<redacted>"));
    }
}
