use crate::error::{CliError, Result};
use binderscope::core::io::read_structure;
use binderscope::core::models::structure::Structure;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads the sequence from a FASTA or plain-text file.
///
/// Header (`>`) and comment (`;`) lines are dropped and the remaining lines joined.
/// Only the first record of a multi-record FASTA file is used.
pub fn read_sequence_file(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)?;
    let mut sequence = String::new();
    let mut seen_header = false;
    for line in text.lines().map(str::trim) {
        if line.starts_with('>') {
            if seen_header && !sequence.is_empty() {
                break;
            }
            seen_header = true;
            continue;
        }
        if line.starts_with(';') {
            continue;
        }
        sequence.push_str(line);
    }
    debug!("Read {} sequence characters from {:?}", sequence.len(), path);
    Ok(sequence)
}

pub fn load_structure(path: &Path) -> Result<Structure> {
    read_structure(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e,
    })
}
