use crate::cli::PredictArgs;
use crate::config::builder::build_predictor_config;
use crate::error::Result;
use crate::predictor::PrecomputedPredictor;
use crate::store::SessionStore;
use binderscope::core::models::side::Side;
use binderscope::workflows::error::WorkflowError;
use binderscope::workflows::persistence;
use binderscope::workflows::prediction::{StructurePredictor, run_prediction};
use tracing::info;

/// Stores a model output for one side of a session.
///
/// A sequence input goes through the regular prediction workflow. A structure input has
/// nothing to predict, so the supplied model output (usually the same coordinates with a
/// confidence file) is attached to it directly.

pub fn run(store: &SessionStore, args: PredictArgs) -> Result<()> {
    let config = build_predictor_config(&args)?;
    let (mut session, path) = store.load(&args.session)?;
    let side = Side::from(args.side);
    let predictor = PrecomputedPredictor::new(&args.structure, args.confidence.as_deref());

    info!("Storing {} prediction for session {}", side, session.id());
    if session.input_sequence(side)?.is_some() {
        run_prediction(&mut session, side, &predictor, &config)?;
    } else {
        let sequence = session
            .structure(side)
            .map(|s| s.value().sequence())
            .unwrap_or_default();
        info!("The {} input is a structure; attaching the supplied model output", side);
        let output = predictor
            .predict(&sequence, &config)
            .map_err(WorkflowError::from)?;
        session.accept_prediction(side, output, Some(&config.model))?;
    }
    persistence::save_to_path(&session, &path)?;

    if let Some(structure) = session.current_structure(side) {
        let confidence = structure
            .mean_confidence()
            .map(|c| format!(", mean confidence {:.1}", c))
            .unwrap_or_default();
        println!(
            "Stored {} structure from '{}': {} residues{}",
            side,
            config.model,
            structure.residue_count(),
            confidence
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SideArg;
    use crate::commands::fixtures::{TARGET_SEQUENCE, pdb_line, write};
    use crate::error::CliError;
    use binderscope::core::io::parse_structure;
    use binderscope::core::models::structure::StructureSource;
    use binderscope::workflows::inputs::TargetInput;
    use binderscope::workflows::session::WorkflowSession;
    use binderscope::workflows::stage::WorkflowStage;
    use tempfile::tempdir;

    #[test]
    fn prediction_is_stored_with_model_and_confidence() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(Some(dir.path())).unwrap();
        let mut session = WorkflowSession::new("predict");
        session
            .set_target_input(TargetInput::from_sequence(TARGET_SEQUENCE).unwrap())
            .unwrap();
        store.save(&session).unwrap();

        let structure = write(dir.path(), "model.pdb", &pdb_line('A', 22, 0.0, 50.0));
        let confidence = write(dir.path(), "plddt.txt", &"91.0\n".repeat(22));
        let args = PredictArgs {
            session: session.id().to_string(),
            side: SideArg::Target,
            structure,
            confidence: Some(confidence),
            model: Some("esmfold".into()),
            config: None,
        };
        run(&store, args).unwrap();

        let (mut stored, _) = store.load(&session.id().to_string()).unwrap();
        let target = stored.current_structure(Side::Target).unwrap();
        assert_eq!(target.mean_confidence(), Some(91.0));
        assert_eq!(
            target.source(),
            &StructureSource::SequenceDerived {
                model: Some("esmfold".into())
            }
        );
        stored.advance().unwrap();
        stored.advance().unwrap();
    }

    #[test]
    fn uploaded_target_takes_confidence_from_a_side_file() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(Some(dir.path())).unwrap();
        let coordinates = pdb_line('A', 22, 0.0, 120.0);
        let mut session = WorkflowSession::new("crystal");
        session
            .set_target_input(TargetInput::from_structure(parse_structure(&coordinates).unwrap()).unwrap())
            .unwrap();
        session.advance().unwrap();
        assert!(session.advance().is_err());
        store.save(&session).unwrap();

        let structure = write(dir.path(), "crystal.pdb", &coordinates);
        let confidence = write(dir.path(), "c.txt", &"75.0\n".repeat(22));
        let args = PredictArgs {
            session: session.id().to_string(),
            side: SideArg::Target,
            structure,
            confidence: Some(confidence),
            model: None,
            config: None,
        };
        run(&store, args).unwrap();

        let (mut stored, _) = store.load(&session.id().to_string()).unwrap();
        let target = stored.current_structure(Side::Target).unwrap();
        assert_eq!(target.mean_confidence(), Some(75.0));
        assert_eq!(target.source(), &StructureSource::Uploaded);
        assert_eq!(stored.advance().unwrap(), WorkflowStage::BinderDesign);
    }

    #[test]
    fn prediction_without_input_fails() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(Some(dir.path())).unwrap();
        let session = WorkflowSession::new("predict");
        store.save(&session).unwrap();
        let structure = write(dir.path(), "model.pdb", &pdb_line('A', 12, 0.0, 50.0));
        let args = PredictArgs {
            session: session.id().to_string(),
            side: SideArg::Binder,
            structure,
            confidence: None,
            model: None,
            config: None,
        };
        assert!(matches!(
            run(&store, args),
            Err(CliError::Workflow(WorkflowError::MissingInput { side: Side::Binder }))
        ));
    }
}
