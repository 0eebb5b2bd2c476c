use super::error::ParseError;
use crate::core::models::structure::Structure;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading protein structure file formats.
///
/// Implementors handle format-specific parsing. Readers are pure: the same input
/// always yields the same structure, and nothing outside the reader is touched.
pub trait StructureFile {
    /// Reads a structure from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    ///
    /// # Return
    ///
    /// Returns the parsed structure, named after the file's own title when it has
    /// one and `"structure"` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Structure, ParseError>;

    /// Reads a structure from a file path, naming it after the file stem.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Structure, ParseError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let structure = Self::read_from(&mut reader)?;
        Ok(structure.with_name(&name_from_path(path)))
    }
}

pub(crate) const DEFAULT_STRUCTURE_NAME: &str = "structure";

pub(crate) fn name_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_STRUCTURE_NAME)
        .to_string()
}
