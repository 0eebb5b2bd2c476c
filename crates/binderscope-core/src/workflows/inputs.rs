use crate::core::models::structure::{Structure, StructureSource};
use crate::core::validation::{
    ValidationError, validate_pdb_id, validate_sequence, validate_structure,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How the target protein was supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum TargetInput {
    /// An amino-acid sequence whose structure still has to be predicted.
    Sequence { sequence: String },
    /// A coordinate file supplied by the user.
    UploadedStructure { structure: Structure },
    /// A PDB accession id, with the structure once it has been retrieved.
    FetchedById {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        structure: Option<Structure>,
    },
}

impl TargetInput {
    /// Builds a sequence input from raw or FASTA text, storing the cleaned sequence.
    pub fn from_sequence(raw: &str) -> Result<Self, ValidationError> {
        Ok(TargetInput::Sequence {
            sequence: validate_sequence(raw)?,
        })
    }

    pub fn from_structure(structure: Structure) -> Result<Self, ValidationError> {
        validate_structure(&structure)?;
        Ok(TargetInput::UploadedStructure {
            structure: structure.with_source(StructureSource::Uploaded),
        })
    }

    /// Builds a fetched-by-id input. The id is normalized to upper case.
    pub fn fetched(id: &str, structure: Option<Structure>) -> Result<Self, ValidationError> {
        let id = validate_pdb_id(id)?;
        let structure = structure.map(|s| {
            s.with_source(StructureSource::FetchedById { id: id.clone() })
        });
        Ok(TargetInput::FetchedById { id, structure })
    }

    /// Checks the input against the rules for its variant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            TargetInput::Sequence { sequence } => validate_sequence(sequence).map(|_| ()),
            TargetInput::UploadedStructure { structure } => validate_structure(structure),
            TargetInput::FetchedById { id, structure } => {
                validate_pdb_id(id)?;
                match structure {
                    Some(structure) => validate_structure(structure),
                    None => Err(ValidationError::MissingFetchedStructure(id.clone())),
                }
            }
        }
    }

    pub fn sequence(&self) -> Option<&str> {
        match self {
            TargetInput::Sequence { sequence } => Some(sequence),
            _ => None,
        }
    }

    /// The highest residue number a binding site on this target may name: the sequence
    /// length, or the largest residue number in the structure. `None` while a fetched
    /// structure is still missing.
    pub fn max_residue_number(&self) -> Option<usize> {
        match self {
            TargetInput::Sequence { sequence } => Some(sequence.len()),
            _ => self.structure().map(Structure::max_residue_number),
        }
    }

    pub fn structure(&self) -> Option<&Structure> {
        match self {
            TargetInput::Sequence { .. } => None,
            TargetInput::UploadedStructure { structure } => Some(structure),
            TargetInput::FetchedById { structure, .. } => structure.as_ref(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            TargetInput::Sequence { sequence } => format!("sequence ({} residues)", sequence.len()),
            TargetInput::UploadedStructure { structure } => {
                format!("uploaded structure '{}'", structure.name())
            }
            TargetInput::FetchedById { id, structure } => match structure {
                Some(_) => format!("PDB entry {}", id),
                None => format!("PDB entry {} (not fetched)", id),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignMethod {
    /// Sequence or structure written by hand.
    #[default]
    Manual,
    /// Produced by a backbone-scaffolding design tool.
    Scaffold,
    /// Derived from a known binder template.
    Template,
}

impl fmt::Display for DesignMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DesignMethod::Manual => "manual",
                DesignMethod::Scaffold => "scaffold",
                DesignMethod::Template => "template",
            }
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown design method '{0}' (expected manual, scaffold or template)")]
pub struct ParseDesignMethodError(String);

impl FromStr for DesignMethod {
    type Err = ParseDesignMethodError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(DesignMethod::Manual),
            "scaffold" => Ok(DesignMethod::Scaffold),
            "template" => Ok(DesignMethod::Template),
            _ => Err(ParseDesignMethodError(s.to_string())),
        }
    }
}

/// How the binder candidate was supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum BinderInput {
    Sequence {
        sequence: String,
        #[serde(default)]
        method: DesignMethod,
    },
    UploadedStructure {
        structure: Structure,
        #[serde(default)]
        method: DesignMethod,
    },
}

impl BinderInput {
    pub fn from_sequence(raw: &str, method: DesignMethod) -> Result<Self, ValidationError> {
        Ok(BinderInput::Sequence {
            sequence: validate_sequence(raw)?,
            method,
        })
    }

    pub fn from_structure(structure: Structure, method: DesignMethod) -> Result<Self, ValidationError> {
        validate_structure(&structure)?;
        Ok(BinderInput::UploadedStructure {
            structure: structure.with_source(StructureSource::Uploaded),
            method,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            BinderInput::Sequence { sequence, .. } => validate_sequence(sequence).map(|_| ()),
            BinderInput::UploadedStructure { structure, .. } => validate_structure(structure),
        }
    }

    pub fn method(&self) -> DesignMethod {
        match self {
            BinderInput::Sequence { method, .. } | BinderInput::UploadedStructure { method, .. } => {
                *method
            }
        }
    }

    pub fn sequence(&self) -> Option<&str> {
        match self {
            BinderInput::Sequence { sequence, .. } => Some(sequence),
            BinderInput::UploadedStructure { .. } => None,
        }
    }

    pub fn structure(&self) -> Option<&Structure> {
        match self {
            BinderInput::Sequence { .. } => None,
            BinderInput::UploadedStructure { structure, .. } => Some(structure),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            BinderInput::Sequence { sequence, method } => {
                format!("{} sequence ({} residues)", method, sequence.len())
            }
            BinderInput::UploadedStructure { structure, method } => {
                format!("{} structure '{}'", method, structure.name())
            }
        }
    }
}
