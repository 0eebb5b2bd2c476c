use crate::cli::{BinderArgs, TargetArgs};
use crate::error::{CliError, Result};
use crate::store::SessionStore;
use crate::utils::input::{load_structure, read_sequence_file};
use binderscope::core::validation::parse_residue_selection;
use binderscope::workflows::inputs::{BinderInput, TargetInput};
use binderscope::workflows::persistence;
use tracing::info;

fn target_input(args: &TargetArgs) -> Result<TargetInput> {
    let source = &args.source;
    let input = if let Some(sequence) = &source.sequence {
        TargetInput::from_sequence(sequence)?
    } else if let Some(path) = &source.fasta {
        TargetInput::from_sequence(&read_sequence_file(path)?)?
    } else if let Some(path) = &source.structure {
        TargetInput::from_structure(load_structure(path)?)?
    } else if let Some(id) = &source.pdb_id {
        let fetched = args
            .fetched_structure
            .as_deref()
            .map(load_structure)
            .transpose()?;
        TargetInput::fetched(id, fetched)?
    } else {
        return Err(CliError::Argument(
            "one of --sequence, --fasta, --structure or --pdb-id is required".to_string(),
        ));
    };
    Ok(input)
}

fn binder_input(args: &BinderArgs) -> Result<BinderInput> {
    let source = &args.source;
    let input = if let Some(sequence) = &source.sequence {
        BinderInput::from_sequence(sequence, args.method)?
    } else if let Some(path) = &source.fasta {
        BinderInput::from_sequence(&read_sequence_file(path)?, args.method)?
    } else if let Some(path) = &source.structure {
        BinderInput::from_structure(load_structure(path)?, args.method)?
    } else {
        return Err(CliError::Argument(
            "one of --sequence, --fasta or --structure is required".to_string(),
        ));
    };
    Ok(input)
}

pub fn run_target(store: &SessionStore, args: TargetArgs) -> Result<()> {
    let (mut session, path) = store.load(&args.session)?;
    let input = target_input(&args)?;
    let binding_site = args
        .binding_site
        .as_deref()
        .map(parse_residue_selection)
        .transpose()?;
    let description = input.describe();
    session.set_target_input(input)?;
    if let Some(residues) = binding_site {
        session.set_binding_site(residues)?;
    }
    persistence::save_to_path(&session, &path)?;
    info!("Target input of session {} set to {}", session.id(), description);
    println!("Target set: {}", description);
    if !session.binding_site().is_empty() {
        println!("Binding site: {} residues", session.binding_site().len());
    }
    Ok(())
}

pub fn run_binder(store: &SessionStore, args: BinderArgs) -> Result<()> {
    let (mut session, path) = store.load(&args.session)?;
    let input = binder_input(&args)?;
    let description = input.describe();
    session.set_binder_input(input)?;
    persistence::save_to_path(&session, &path)?;
    info!("Binder input of session {} set to {}", session.id(), description);
    println!("Binder set: {}", description);
    Ok(())
}
