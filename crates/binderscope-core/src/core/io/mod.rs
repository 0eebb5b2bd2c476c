//! Provides input/output for protein structure files.
//!
//! Two coordinate formats are read: fixed-column PDB ([`pdb::PdbFile`]) and the
//! `_atom_site` loop of mmCIF ([`cif::CifFile`]). Both implement the
//! [`traits::StructureFile`] trait. [`parse_structure`] sniffs the format of raw text
//! and dispatches to the right reader. The PDB module also writes structures back
//! out, including a combined target/binder complex.

pub mod cif;
pub mod error;
pub mod pdb;
pub mod traits;

pub use error::ParseError;

use crate::core::models::structure::Structure;
use cif::CifFile;
use pdb::PdbFile;
use std::fs;
use std::path::Path;
use traits::StructureFile;

const PDB_RECORD_NAMES: &[&str] = &[
    "ATOM", "HETATM", "HEADER", "TITLE", "COMPND", "SOURCE", "REMARK", "CRYST1", "MODEL",
    "ENDMDL", "TER", "END", "SEQRES", "HELIX", "SHEET", "ANISOU", "CONECT", "MASTER",
    "EXPDTA", "AUTHOR", "KEYWDS", "ORIGX1", "SCALE1",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    Pdb,
    Mmcif,
}

impl StructureFormat {
    /// Guesses the format of structure text.
    ///
    /// mmCIF is recognized by a leading `data_` block header (comments and blank
    /// lines skipped). PDB is recognized by any line starting with a known record name.
    /// Returns `None` for anything else, such as FASTA or free text.
    pub fn detect(text: &str) -> Option<Self> {
        let first = text
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with('#'))?;
        if first.starts_with("data_") {
            return Some(StructureFormat::Mmcif);
        }
        let is_pdb = text.lines().any(|line| {
            let record = line.get(..6).unwrap_or(line).trim_end();
            let record = record.split_whitespace().next().unwrap_or("");
            PDB_RECORD_NAMES.contains(&record)
        });
        is_pdb.then_some(StructureFormat::Pdb)
    }

    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdb" | "ent" => Some(StructureFormat::Pdb),
            "cif" | "mmcif" => Some(StructureFormat::Mmcif),
            _ => None,
        }
    }
}

/// Parses PDB or mmCIF text into a [`Structure`].
///
/// # Errors
///
/// * [`ParseError::NoAtomRecords`] for blank text or text without atom records.
/// * [`ParseError::UnrecognizedFormat`] when the text is neither PDB nor mmCIF.
/// * [`ParseError::MalformedCoordinate`] when an atom's coordinates cannot be read.
pub fn parse_structure(text: &str) -> Result<Structure, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::NoAtomRecords);
    }
    let mut reader = text.as_bytes();
    match StructureFormat::detect(text) {
        Some(StructureFormat::Pdb) => PdbFile::read_from(&mut reader),
        Some(StructureFormat::Mmcif) => CifFile::read_from(&mut reader),
        None => Err(ParseError::UnrecognizedFormat),
    }
}

/// Reads a structure file, naming the structure after the file stem.
///
/// The format is sniffed from the content; the extension is only consulted when
/// the content alone is ambiguous.
pub fn read_structure<P: AsRef<Path>>(path: P) -> Result<Structure, ParseError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        return Err(ParseError::NoAtomRecords);
    }
    let format = StructureFormat::detect(&text)
        .or_else(|| StructureFormat::from_extension(path))
        .ok_or(ParseError::UnrecognizedFormat)?;
    let mut reader = text.as_bytes();
    let structure = match format {
        StructureFormat::Pdb => PdbFile::read_from(&mut reader)?,
        StructureFormat::Mmcif => CifFile::read_from(&mut reader)?,
    };
    Ok(structure.with_name(&traits::name_from_path(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PDB_TEXT: &str = "\
HEADER    TEST
ATOM      1  N   MET A   1      11.104   6.134  -6.504  1.00 85.00           N
ATOM      2  CA  MET A   1      11.639   6.071  -5.147  1.00 90.00           C
END
";

    const CIF_TEXT: &str = "\
data_test
loop_
_atom_site.group_PDB
_atom_site.id
_atom_site.type_symbol
_atom_site.label_atom_id
_atom_site.label_comp_id
_atom_site.label_asym_id
_atom_site.label_seq_id
_atom_site.Cartn_x
_atom_site.Cartn_y
_atom_site.Cartn_z
ATOM 1 N N MET A 1 11.104 6.134 -6.504
ATOM 2 C CA MET A 1 11.639 6.071 -5.147
";

    #[test]
    fn detect_recognizes_pdb_and_mmcif() {
        assert_eq!(StructureFormat::detect(PDB_TEXT), Some(StructureFormat::Pdb));
        assert_eq!(StructureFormat::detect(CIF_TEXT), Some(StructureFormat::Mmcif));
        assert_eq!(
            StructureFormat::detect("# comment\n\ndata_x\n"),
            Some(StructureFormat::Mmcif)
        );
    }

    #[test]
    fn detect_rejects_fasta_and_free_text() {
        assert_eq!(StructureFormat::detect(">seq\nMKTAYIAKQR\n"), None);
        assert_eq!(StructureFormat::detect("hello world"), None);
    }

    #[test]
    fn parse_structure_dispatches_by_format() {
        let pdb = parse_structure(PDB_TEXT).unwrap();
        let cif = parse_structure(CIF_TEXT).unwrap();
        assert_eq!(pdb.atom_count(), 2);
        assert_eq!(cif.atom_count(), 2);
        assert_eq!(pdb.sequence(), "M");
        assert_eq!(cif.sequence(), "M");
    }

    #[test]
    fn parse_structure_reports_empty_and_unrecognized_input() {
        assert!(matches!(parse_structure(""), Err(ParseError::NoAtomRecords)));
        assert!(matches!(parse_structure("  \n\t\n"), Err(ParseError::NoAtomRecords)));
        assert!(matches!(
            parse_structure(">binder\nMKTAYIAKQRQISFVKSHFSRQ\n"),
            Err(ParseError::UnrecognizedFormat)
        ));
    }

    #[test]
    fn parse_structure_without_atoms_is_no_atom_records() {
        assert!(matches!(
            parse_structure("HEADER    EMPTY\nEND\n"),
            Err(ParseError::NoAtomRecords)
        ));
    }

    #[test]
    fn read_structure_names_structure_after_file() {
        let mut file = tempfile::Builder::new()
            .prefix("target_")
            .suffix(".pdb")
            .tempfile()
            .unwrap();
        file.write_all(PDB_TEXT.as_bytes()).unwrap();
        let structure = read_structure(file.path()).unwrap();
        let stem = file.path().file_stem().unwrap().to_str().unwrap();
        assert_eq!(structure.name(), stem);
    }

    #[test]
    fn read_structure_fails_for_missing_file() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();
        drop(file);
        assert!(matches!(read_structure(&path), Err(ParseError::Io(_))));
    }

    #[test]
    fn from_extension_maps_known_suffixes() {
        assert_eq!(
            StructureFormat::from_extension(Path::new("a.PDB")),
            Some(StructureFormat::Pdb)
        );
        assert_eq!(
            StructureFormat::from_extension(Path::new("a.cif")),
            Some(StructureFormat::Mmcif)
        );
        assert_eq!(StructureFormat::from_extension(Path::new("a.fasta")), None);
    }
}
