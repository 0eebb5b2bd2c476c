use crate::cli::ValidateArgs;
use crate::error::{CliError, Result};
use crate::utils::input::{load_structure, read_sequence_file};
use binderscope::core::validation::{validate_pdb_id, validate_sequence, validate_structure};

/// Checks one input against the rules a session applies, without creating a session.
pub fn run(args: ValidateArgs) -> Result<()> {
    if let Some(sequence) = &args.sequence {
        report_sequence(sequence)
    } else if let Some(path) = &args.fasta {
        report_sequence(&read_sequence_file(path)?)
    } else if let Some(path) = &args.structure {
        let structure = load_structure(path)?;
        validate_structure(&structure)?;
        println!(
            "Valid structure: {} chains, {} residues, {} atoms",
            structure.chains().len(),
            structure.residue_count(),
            structure.atom_count()
        );
        if let Some(mean) = structure.confidence_from_b_factors().map(|values| {
            values.iter().sum::<f64>() / values.len().max(1) as f64
        }) {
            println!("B-factor column reads as confidence (mean {:.1})", mean);
        }
        Ok(())
    } else if let Some(id) = &args.pdb_id {
        let id = validate_pdb_id(id)?;
        println!("Valid PDB id: {}", id);
        Ok(())
    } else {
        Err(CliError::Argument(
            "one of --sequence, --fasta, --structure or --pdb-id is required".to_string(),
        ))
    }
}

fn report_sequence(raw: &str) -> Result<()> {
    let sequence = validate_sequence(raw)?;
    println!("Valid sequence: {} residues", sequence.len());
    Ok(())
}
