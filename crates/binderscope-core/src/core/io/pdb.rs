use super::error::ParseError;
use super::traits::{DEFAULT_STRUCTURE_NAME, StructureFile};
use crate::core::models::atom::Atom;
use crate::core::models::residue::{Residue, ResidueKey};
use crate::core::models::structure::{Structure, StructureBuilder};
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_coordinate(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_optional(value: &str) -> Option<f64> {
    if value.is_empty() {
        None
    } else {
        parse_coordinate(value)
    }
}

/// The fields of one ATOM/HETATM record, before element inference.
#[derive(Debug)]
struct AtomRecord<'a> {
    serial: Option<usize>,
    name: &'a str,
    alt_loc: Option<char>,
    residue_name: &'a str,
    chain_id: Option<char>,
    residue_number: isize,
    position: Point3<f64>,
    occupancy: Option<f64>,
    b_factor: Option<f64>,
    element: Option<&'a str>,
}

/// Why a record could not be read, used to pick the reported error.
enum RecordFailure {
    Coordinate(String),
    Field(String),
}

fn parse_fixed_columns(line: &str) -> Result<AtomRecord<'_>, RecordFailure> {
    let x_str = slice_and_trim(line, 30, 38);
    let y_str = slice_and_trim(line, 38, 46);
    let z_str = slice_and_trim(line, 46, 54);
    let (x, y, z) = match (
        parse_coordinate(x_str),
        parse_coordinate(y_str),
        parse_coordinate(z_str),
    ) {
        (Some(x), Some(y), Some(z)) => (x, y, z),
        _ => {
            return Err(RecordFailure::Coordinate(
                slice_and_trim(line, 30, 54).to_string(),
            ));
        }
    };

    let name = slice_and_trim(line, 12, 16);
    if name.is_empty() {
        return Err(RecordFailure::Field("atom name (columns 13-16) is empty".into()));
    }
    let residue_name = slice_and_trim(line, 17, 20);
    if residue_name.is_empty() {
        return Err(RecordFailure::Field(
            "residue name (columns 18-20) is empty".into(),
        ));
    }
    let res_seq_str = slice_and_trim(line, 22, 26);
    let residue_number: isize = res_seq_str.parse().map_err(|_| {
        RecordFailure::Field(format!(
            "invalid residue number in columns 23-26 (value: '{}')",
            res_seq_str
        ))
    })?;

    let element = slice_and_trim(line, 76, 78);
    Ok(AtomRecord {
        serial: slice_and_trim(line, 6, 11).parse().ok(),
        name,
        alt_loc: slice_and_trim(line, 16, 17).chars().next(),
        residue_name,
        chain_id: slice_and_trim(line, 21, 22).chars().next(),
        residue_number,
        position: Point3::new(x, y, z),
        occupancy: parse_optional(slice_and_trim(line, 54, 60)),
        b_factor: parse_optional(slice_and_trim(line, 60, 66)),
        element: (!element.is_empty() && element.chars().all(|c| c.is_ascii_alphabetic()))
            .then_some(element),
    })
}

/// Recovers records whose columns are shifted by splitting on whitespace.
///
/// Accepts `RECORD serial name resName [chain] resSeq x y z [occ [b [element]]]`.
fn parse_tokens(line: &str) -> Option<AtomRecord<'_>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 8 {
        return None;
    }

    let chain_token = tokens[4];
    let has_chain = tokens.len() >= 9
        && chain_token.chars().count() == 1
        && chain_token.chars().all(|c| c.is_ascii_alphabetic())
        && tokens[5].parse::<isize>().is_ok();
    let offset = if has_chain { 5 } else { 4 };

    let residue_number = tokens.get(offset)?.parse().ok()?;
    let x = parse_coordinate(tokens.get(offset + 1)?)?;
    let y = parse_coordinate(tokens.get(offset + 2)?)?;
    let z = parse_coordinate(tokens.get(offset + 3)?)?;
    let trailing = &tokens[offset + 4..];

    Some(AtomRecord {
        serial: tokens[1].parse().ok(),
        name: tokens[2],
        alt_loc: None,
        residue_name: tokens[3],
        chain_id: has_chain.then(|| chain_token.chars().next()).flatten(),
        residue_number,
        position: Point3::new(x, y, z),
        occupancy: trailing.first().and_then(|v| parse_coordinate(v)),
        b_factor: trailing.get(1).and_then(|v| parse_coordinate(v)),
        element: trailing
            .get(2)
            .copied()
            .filter(|e| e.len() <= 2 && e.chars().all(|c| c.is_ascii_alphabetic())),
    })
}

/// Reader and writer for fixed-column PDB files.
///
/// Only the first model is read. Alternate locations after the first are dropped,
/// and records for the same chain and residue number are merged into one residue
/// regardless of insertion code.
pub struct PdbFile;

impl StructureFile for PdbFile {
    fn read_from(reader: &mut impl BufRead) -> Result<Structure, ParseError> {
        let mut builder = StructureBuilder::new();
        let mut name = DEFAULT_STRUCTURE_NAME.to_string();
        let mut skipped_alt_locs = 0usize;
        let mut merged_duplicates = 0usize;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = slice_and_trim(&line, 0, 6)
                .split_whitespace()
                .next()
                .unwrap_or("");
            match record_type {
                "HEADER" => {
                    let id_code = slice_and_trim(&line, 62, 66);
                    if !id_code.is_empty() {
                        name = id_code.to_string();
                    }
                }
                "ENDMDL" | "END" => break,
                "ATOM" | "HETATM" => {
                    let record = match parse_fixed_columns(&line) {
                        Ok(record) => record,
                        Err(failure) => match parse_tokens(&line) {
                            Some(record) => {
                                warn!(
                                    line = line_num,
                                    "Recovered ATOM record with non-standard columns"
                                );
                                record
                            }
                            None => {
                                return Err(match failure {
                                    RecordFailure::Coordinate(value) => {
                                        ParseError::MalformedCoordinate {
                                            line: line_num,
                                            value,
                                        }
                                    }
                                    RecordFailure::Field(reason) => ParseError::MalformedRecord {
                                        line: line_num,
                                        reason,
                                    },
                                });
                            }
                        },
                    };

                    let chain_id = record.chain_id.unwrap_or('A');
                    let key = ResidueKey::new(chain_id, record.residue_number);
                    if builder.contains(key, record.name) {
                        if record.alt_loc.is_some() {
                            skipped_alt_locs += 1;
                            continue;
                        }
                        merged_duplicates += 1;
                        warn!(
                            line = line_num,
                            "Merged a second {} atom into residue {}; only the first is measured",
                            record.name,
                            key
                        );
                    }

                    let serial = record.serial.unwrap_or(builder.atom_count() + 1);
                    let mut atom = Atom::new(
                        serial,
                        record.name,
                        record.residue_name,
                        chain_id,
                        record.residue_number,
                        record.position,
                    )
                    .with_occupancy(record.occupancy)
                    .with_b_factor(record.b_factor);
                    if record_type == "HETATM" {
                        atom = atom.hetero();
                    }
                    if let Some(element) = record.element {
                        atom = atom.with_element(element);
                    }
                    builder.add_atom(atom);
                }
                _ => {}
            }
        }

        if builder.atom_count() == 0 {
            return Err(ParseError::NoAtomRecords);
        }
        debug!(
            atoms = builder.atom_count(),
            skipped_alt_locs, merged_duplicates, "Parsed PDB structure"
        );
        Ok(builder.build(&name).with_b_factor_confidence())
    }
}

impl PdbFile {
    /// Writes every atom of `structure` as ATOM/HETATM records followed by `END`.
    pub fn write_structure(structure: &Structure, writer: &mut impl Write) -> io::Result<()> {
        let mut serial = 1;
        for chain in structure.chains() {
            for residue in chain.residues() {
                for atom in residue.atoms() {
                    write_atom_line(writer, atom, serial, chain.id)?;
                    serial += 1;
                }
            }
            if let Some(last) = chain.residues().last() {
                write_ter_line(writer, serial, last, chain.id)?;
                serial += 1;
            }
        }
        writeln!(writer, "END")
    }

    /// Writes a target and a binder as one two-part complex.
    ///
    /// All target chains are relabelled to `target_chain` and all binder chains to
    /// `binder_chain`. Serial numbers run sequentially through both parts, so binder
    /// serials start after the target's. A `TER` record closes each part.
    pub fn write_complex(
        target: &Structure,
        binder: &Structure,
        target_chain: char,
        binder_chain: char,
        writer: &mut impl Write,
    ) -> io::Result<()> {
        writeln!(writer, "REMARK   1 COMBINED TARGET AND BINDER COMPLEX")?;
        writeln!(writer, "REMARK   1 TARGET: {} CHAIN {}", target.name(), target_chain)?;
        writeln!(writer, "REMARK   1 BINDER: {} CHAIN {}", binder.name(), binder_chain)?;

        let mut serial = 1;
        for (part, chain_id) in [(target, target_chain), (binder, binder_chain)] {
            let mut last: Option<&Residue> = None;
            for residue in part.residues() {
                for atom in residue.atoms() {
                    write_atom_line(writer, atom, serial, chain_id)?;
                    serial += 1;
                }
                last = Some(residue);
            }
            if let Some(residue) = last {
                write_ter_line(writer, serial, residue, chain_id)?;
                serial += 1;
            }
        }
        writeln!(writer, "END")
    }
}

fn format_atom_name(name: &str, element: &str) -> String {
    if name.len() < 4 && element.len() == 1 {
        format!(" {:<3}", name)
    } else {
        format!("{:<4.4}", name)
    }
}

/// Residue names wider than the three-character field are cut to fit.
fn fixed_residue_name(name: &str) -> &str {
    name.char_indices().nth(3).map_or(name, |(end, _)| &name[..end])
}

/// Clamps a residue number into the four-character field.
fn fixed_residue_number(number: isize) -> isize {
    number.clamp(-999, 9999)
}

fn write_atom_line(
    writer: &mut impl Write,
    atom: &Atom,
    serial: usize,
    chain_id: char,
) -> io::Result<()> {
    let record = if atom.is_hetero { "HETATM" } else { "ATOM" };
    writeln!(
        writer,
        "{:<6}{:>5} {} {:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
        record,
        serial % 100_000,
        format_atom_name(&atom.name, &atom.element),
        fixed_residue_name(&atom.residue_name),
        chain_id,
        fixed_residue_number(atom.residue_number),
        atom.position.x,
        atom.position.y,
        atom.position.z,
        atom.occupancy.unwrap_or(1.0),
        atom.b_factor.unwrap_or(0.0),
        atom.element,
    )
}

fn write_ter_line(
    writer: &mut impl Write,
    serial: usize,
    residue: &Residue,
    chain_id: char,
) -> io::Result<()> {
    writeln!(
        writer,
        "TER   {:>5}      {:>3} {}{:>4}",
        serial % 100_000,
        fixed_residue_name(&residue.name),
        chain_id,
        fixed_residue_number(residue.number)
    )
}
