use super::models::structure::Structure;
use std::collections::BTreeSet;
use thiserror::Error;

/// The twenty standard amino-acid one-letter codes accepted in input sequences.
pub const STANDARD_AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";
pub const MIN_SEQUENCE_LENGTH: usize = 10;
pub const MAX_SEQUENCE_LENGTH: usize = 2000;
pub const MIN_STRUCTURE_ATOMS: usize = 10;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Sequence is empty")]
    EmptySequence,
    #[error("Sequence contains non-standard residues: {residues}")]
    InvalidResidues { residues: String },
    #[error("Sequence is too short ({length} residues, minimum 10)")]
    SequenceTooShort { length: usize },
    #[error("Sequence is too long ({length} residues, maximum 2000)")]
    SequenceTooLong { length: usize },
    #[error("Structure contains no atoms")]
    NoAtoms,
    #[error("Structure has too few protein atoms ({count}, minimum 10)")]
    TooFewAtoms { count: usize },
    #[error("Invalid PDB id '{0}': expected 4 characters starting with a digit")]
    InvalidPdbId(String),
    #[error("No structure has been fetched for PDB id '{0}'")]
    MissingFetchedStructure(String),
    #[error("Confidence array has {actual} values but the structure has {expected} residues")]
    ConfidenceLengthMismatch { expected: usize, actual: usize },
    #[error("Confidence value {value} at index {index} is outside [0, 100]")]
    ConfidenceOutOfRange { index: usize, value: f64 },
    #[error("Invalid residue selection '{0}': use numbers or ranges such as 10-20, 45")]
    InvalidResidueSelection(String),
    #[error("Binding-site residue {residue} is outside 1..={max}")]
    BindingSiteOutOfRange { residue: isize, max: usize },
}

/// Cleans and validates a protein sequence.
///
/// FASTA header lines (starting with `>`) and all whitespace are removed and the
/// remainder is upper-cased. The cleaned sequence must use only the twenty standard
/// amino acids and be between [`MIN_SEQUENCE_LENGTH`] and [`MAX_SEQUENCE_LENGTH`]
/// residues long.
///
/// # Return
///
/// Returns the cleaned sequence.
///
/// # Errors
///
/// Returns the first rule the sequence breaks. Invalid characters are reported
/// before length, each listed once in order of first appearance.
pub fn validate_sequence(raw: &str) -> Result<String, ValidationError> {
    let cleaned: String = raw
        .lines()
        .filter(|line| !line.trim_start().starts_with('>'))
        .flat_map(str::chars)
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.is_empty() {
        return Err(ValidationError::EmptySequence);
    }

    let mut invalid: Vec<char> = Vec::new();
    for c in cleaned.chars() {
        if !STANDARD_AMINO_ACIDS.contains(c) && !invalid.contains(&c) {
            invalid.push(c);
        }
    }
    if !invalid.is_empty() {
        return Err(ValidationError::InvalidResidues {
            residues: invalid.into_iter().collect(),
        });
    }

    let length = cleaned.chars().count();
    if length < MIN_SEQUENCE_LENGTH {
        return Err(ValidationError::SequenceTooShort { length });
    }
    if length > MAX_SEQUENCE_LENGTH {
        return Err(ValidationError::SequenceTooLong { length });
    }

    Ok(cleaned)
}

/// Checks that a structure is large enough to serve as workflow input.
///
/// Only `ATOM` records count toward [`MIN_STRUCTURE_ATOMS`]; waters and ligands
/// from `HETATM` records do not.
pub fn validate_structure(structure: &Structure) -> Result<(), ValidationError> {
    if structure.is_empty() {
        return Err(ValidationError::NoAtoms);
    }
    match structure.atoms().filter(|a| !a.is_hetero).count() {
        count if count < MIN_STRUCTURE_ATOMS => Err(ValidationError::TooFewAtoms { count }),
        _ => Ok(()),
    }
}

/// Validates a PDB accession id and returns it upper-cased.
pub fn validate_pdb_id(id: &str) -> Result<String, ValidationError> {
    let trimmed = id.trim();
    let valid = trimmed.len() == 4
        && trimmed.chars().all(|c| c.is_ascii_alphanumeric())
        && trimmed.starts_with(|c: char| c.is_ascii_digit());
    if valid {
        Ok(trimmed.to_ascii_uppercase())
    } else {
        Err(ValidationError::InvalidPdbId(id.to_string()))
    }
}

pub fn validate_confidence(values: &[f64], residue_count: usize) -> Result<(), ValidationError> {
    if values.len() != residue_count {
        return Err(ValidationError::ConfidenceLengthMismatch {
            expected: residue_count,
            actual: values.len(),
        });
    }
    if let Some((index, &value)) = values
        .iter()
        .enumerate()
        .find(|(_, v)| !(0.0..=100.0).contains(*v))
    {
        return Err(ValidationError::ConfidenceOutOfRange { index, value });
    }
    Ok(())
}

/// Parses a residue selection such as `"10-20, 45, 67-72"`.
///
/// Returns the selected numbers ascending and without repeats. Blank text selects
/// nothing. A range may not be wider than [`MAX_SEQUENCE_LENGTH`].
pub fn parse_residue_selection(text: &str) -> Result<Vec<isize>, ValidationError> {
    let invalid = || ValidationError::InvalidResidueSelection(text.to_string());
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut residues = BTreeSet::new();
    for part in text.split(',').map(str::trim) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start: isize = start.trim().parse().map_err(|_| invalid())?;
                let end: isize = end.trim().parse().map_err(|_| invalid())?;
                if start > end || end - start >= MAX_SEQUENCE_LENGTH as isize {
                    return Err(invalid());
                }
                residues.extend(start..=end);
            }
            None => {
                residues.insert(part.parse().map_err(|_| invalid())?);
            }
        }
    }
    Ok(residues.into_iter().collect())
}

/// Checks binding-site residue numbers against the target length.
///
/// An empty site is valid and means the whole interface is of interest.
pub fn validate_binding_site(residues: &[isize], max_residue: usize) -> Result<(), ValidationError> {
    match residues
        .iter()
        .find(|&&r| r < 1 || r as usize > max_residue)
    {
        Some(&residue) => Err(ValidationError::BindingSiteOutOfRange {
            residue,
            max: max_residue,
        }),
        None => Ok(()),
    }
}
