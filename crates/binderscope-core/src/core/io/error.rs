use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("No ATOM or HETATM records found")]
    NoAtomRecords,
    #[error("Malformed coordinate on line {line} (value: '{value}')")]
    MalformedCoordinate { line: usize, value: String },
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
    #[error("Unrecognized structure format: expected PDB or mmCIF text")]
    UnrecognizedFormat,
}
