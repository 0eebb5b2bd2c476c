use super::interface::InterfaceResult;
use crate::core::models::residue::ResidueKey;
use crate::core::models::side::Side;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV error for '{path}': {source}")]
    CsvFile { path: String, source: csv::Error },
}

/// One row of the exported contact table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRow {
    pub target_chain: char,
    pub target_residue: isize,
    pub target_name: String,
    pub binder_chain: char,
    pub binder_residue: isize,
    pub binder_name: String,
    /// Distance in Å, formatted with three decimals.
    pub distance: String,
}

/// A residue ranked by how many contacts it makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotspot {
    pub residue: ResidueKey,
    pub name: String,
    pub contacts: usize,
}

pub fn contact_rows(result: &InterfaceResult) -> Vec<ContactRow> {
    result
        .contacts()
        .iter()
        .map(|c| ContactRow {
            target_chain: c.target.chain_id,
            target_residue: c.target.number,
            target_name: c.target_name.clone(),
            binder_chain: c.binder.chain_id,
            binder_residue: c.binder.number,
            binder_name: c.binder_name.clone(),
            distance: format!("{:.3}", c.distance),
        })
        .collect()
}

const HEADER: [&str; 7] = [
    "target_chain",
    "target_residue",
    "target_name",
    "binder_chain",
    "binder_residue",
    "binder_name",
    "distance",
];

fn write_rows<W: Write>(
    csv_writer: &mut csv::Writer<W>,
    result: &InterfaceResult,
) -> Result<(), csv::Error> {
    // `serialize` only emits the header along with the first row.
    if !result.has_contacts() {
        csv_writer.write_record(HEADER)?;
    }
    for row in contact_rows(result) {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the contacts of `result` as CSV with a header row, in contact order.
pub fn write_contacts_csv(result: &InterfaceResult, writer: impl Write) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    write_rows(&mut csv_writer, result)?;
    Ok(())
}

pub fn write_contacts_csv_to_path(result: &InterfaceResult, path: &Path) -> Result<(), ExportError> {
    let to_export_error = |source: csv::Error| ExportError::CsvFile {
        path: path.to_string_lossy().to_string(),
        source,
    };
    let mut csv_writer = csv::Writer::from_path(path).map_err(to_export_error)?;
    write_rows(&mut csv_writer, result).map_err(to_export_error)
}

/// The residues on `side` with the most contacts, most-contacted first.
///
/// Ties are broken by residue key so the ranking is stable.
pub fn hotspots(result: &InterfaceResult, side: Side, limit: usize) -> Vec<Hotspot> {
    let mut ranked: Vec<Hotspot> = result
        .contacts_per_residue(side)
        .into_iter()
        .map(|(residue, contacts)| {
            let name = result
                .contacts()
                .iter()
                .find_map(|c| match side {
                    Side::Target if c.target == residue => Some(c.target_name.clone()),
                    Side::Binder if c.binder == residue => Some(c.binder_name.clone()),
                    _ => None,
                })
                .unwrap_or_default();
            Hotspot {
                residue,
                name,
                contacts,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.contacts.cmp(&a.contacts).then_with(|| a.residue.cmp(&b.residue)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::structure::{Structure, StructureBuilder};
    use crate::engine::interface::analyze;
    use nalgebra::Point3;
    use tempfile::tempdir;

    fn chain(chain: char, name: &str, coords: &[[f64; 3]]) -> Structure {
        let mut builder = StructureBuilder::new();
        for (i, xyz) in coords.iter().enumerate() {
            builder.add_atom(Atom::new(
                i + 1,
                "CA",
                name,
                chain,
                i as isize + 1,
                Point3::new(xyz[0], xyz[1], xyz[2]),
            ));
        }
        builder.build(name)
    }

    fn sample() -> InterfaceResult {
        let target = chain('A', "LYS", &[[0.0, 0.0, 0.0], [20.0, 0.0, 0.0]]);
        let binder = chain('B', "ASP", &[[3.0, 0.0, 0.0], [0.0, 4.5, 0.0], [20.0, 3.25, 0.0]]);
        analyze(&target, &binder, 5.0).unwrap()
    }

    #[test]
    fn csv_has_header_and_one_row_per_contact() {
        let mut buffer = Vec::new();
        write_contacts_csv(&sample(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "target_chain,target_residue,target_name,binder_chain,binder_residue,binder_name,distance"
        );
        assert_eq!(lines[1], "A,1,LYS,B,1,ASP,3.000");
        assert_eq!(lines[2], "A,2,LYS,B,3,ASP,3.250");
        assert_eq!(lines[3], "A,1,LYS,B,2,ASP,4.500");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn csv_of_empty_interface_has_only_header() {
        let target = chain('A', "LYS", &[[0.0, 0.0, 0.0]]);
        let binder = chain('B', "ASP", &[[40.0, 0.0, 0.0]]);
        let result = analyze(&target, &binder, 5.0).unwrap();

        let mut buffer = Vec::new();
        write_contacts_csv(&result, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("target_chain,"));
    }

    #[test]
    fn csv_file_can_be_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.csv");
        write_contacts_csv_to_path(&sample(), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<ContactRow> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows, contact_rows(&sample()));
    }

    #[test]
    fn csv_export_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("contacts.csv");
        assert!(matches!(
            write_contacts_csv_to_path(&sample(), &path),
            Err(ExportError::CsvFile { .. })
        ));
    }

    #[test]
    fn hotspots_rank_by_contact_count() {
        let spots = hotspots(&sample(), Side::Target, 10);
        assert_eq!(
            spots,
            vec![
                Hotspot {
                    residue: ResidueKey::new('A', 1),
                    name: "LYS".into(),
                    contacts: 2
                },
                Hotspot {
                    residue: ResidueKey::new('A', 2),
                    name: "LYS".into(),
                    contacts: 1
                },
            ]
        );
        assert_eq!(hotspots(&sample(), Side::Binder, 2).len(), 2);
        assert!(hotspots(&sample(), Side::Binder, 0).is_empty());
    }
}
