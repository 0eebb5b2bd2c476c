use super::error::ParseError;
use super::traits::{DEFAULT_STRUCTURE_NAME, StructureFile};
use crate::core::models::atom::Atom;
use crate::core::models::residue::ResidueKey;
use crate::core::models::structure::{Structure, StructureBuilder};
use nalgebra::Point3;
use std::collections::HashMap;
use std::io::BufRead;
use tracing::debug;

const ATOM_SITE_PREFIX: &str = "_atom_site.";

/// Splits a CIF data line into tokens, honouring single and double quotes.
///
/// A quote only closes a token when followed by whitespace or the end of the line,
/// so `'O5''` style primes inside quoted names survive.
fn tokenize(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        if chars[i] == '#' {
            break;
        }
        if chars[i] == '\'' || chars[i] == '"' {
            let quote = chars[i];
            let start = i + 1;
            let mut end = start;
            while end < chars.len()
                && !(chars[end] == quote
                    && chars.get(end + 1).is_none_or(|c| c.is_whitespace()))
            {
                end += 1;
            }
            tokens.push(chars[start..end.min(chars.len())].iter().collect());
            i = end + 1;
        } else {
            let start = i;
            while i < chars.len() && !chars[i].is_whitespace() {
                i += 1;
            }
            tokens.push(chars[start..i].iter().collect());
        }
    }
    tokens
}

fn is_missing(value: &str) -> bool {
    value == "?" || value == "."
}

/// Column positions within the `_atom_site` loop.
struct AtomSiteColumns {
    count: usize,
    index: HashMap<String, usize>,
}

impl AtomSiteColumns {
    /// Looks up the first present column among `names`, in preference order.
    fn find(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|n| self.index.get(*n).copied())
    }

    fn value<'a>(&self, row: &'a [String], names: &[&str]) -> Option<&'a str> {
        self.find(names)
            .map(|i| row[i].as_str())
            .filter(|v| !is_missing(v))
    }
}

/// Reader for the `_atom_site` category of mmCIF files.
///
/// Author-assigned identifiers (`auth_*`) are preferred over label identifiers,
/// matching the numbering users see in PDB files. Only the first model is read.
pub struct CifFile;

impl StructureFile for CifFile {
    fn read_from(reader: &mut impl BufRead) -> Result<Structure, ParseError> {
        let mut name = DEFAULT_STRUCTURE_NAME.to_string();
        let mut in_loop = false;
        let mut header_line = 0usize;
        let mut columns: Option<AtomSiteColumns> = None;
        let mut names: Vec<String> = Vec::new();
        // Tokens of the row being assembled, with the line the row started on.
        let mut pending: Vec<String> = Vec::new();
        let mut row_line = 0usize;
        let mut rows: Vec<(usize, Vec<String>)> = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();

            if let Some(block) = trimmed.strip_prefix("data_") {
                if columns.is_some() {
                    break;
                }
                if !block.is_empty() {
                    name = block.to_string();
                }
                continue;
            }
            if trimmed == "loop_" {
                if columns.is_some() {
                    break;
                }
                in_loop = true;
                names.clear();
                continue;
            }
            if in_loop && columns.is_none() {
                if let Some(column) = trimmed.strip_prefix(ATOM_SITE_PREFIX) {
                    if names.is_empty() {
                        header_line = line_num;
                    }
                    names.push(column.to_string());
                    continue;
                }
                if trimmed.starts_with('_') {
                    in_loop = false;
                    continue;
                }
                if !names.is_empty() {
                    columns = Some(AtomSiteColumns {
                        count: names.len(),
                        index: names
                            .iter()
                            .enumerate()
                            .map(|(i, n)| (n.clone(), i))
                            .collect(),
                    });
                } else {
                    continue;
                }
            }

            let Some(cols) = columns.as_ref() else {
                continue;
            };
            if trimmed.starts_with('_') || trimmed.starts_with("loop_") {
                break;
            }
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if pending.is_empty() {
                row_line = line_num;
            }
            pending.extend(tokenize(trimmed));
            while pending.len() >= cols.count {
                let rest = pending.split_off(cols.count);
                rows.push((row_line, std::mem::replace(&mut pending, rest)));
                row_line = line_num;
            }
        }

        let Some(columns) = columns else {
            return Err(ParseError::NoAtomRecords);
        };
        if !pending.is_empty() {
            return Err(ParseError::MalformedRecord {
                line: row_line,
                reason: format!(
                    "incomplete _atom_site row ({} of {} values)",
                    pending.len(),
                    columns.count
                ),
            });
        }

        let coordinate_columns = ["Cartn_x", "Cartn_y", "Cartn_z"];
        let mut coordinate_indices = [0usize; 3];
        for (slot, column) in coordinate_indices.iter_mut().zip(coordinate_columns) {
            *slot = columns.find(&[column]).ok_or_else(|| ParseError::MalformedRecord {
                line: header_line,
                reason: format!("_atom_site loop has no {} column", column),
            })?;
        }

        let mut builder = StructureBuilder::new();
        let mut first_model: Option<String> = None;

        for (line, row) in &rows {
            let line = *line;
            if let Some(model) = columns.value(row, &["pdbx_PDB_model_num"]) {
                match &first_model {
                    None => first_model = Some(model.to_string()),
                    Some(first) if first != model => continue,
                    Some(_) => {}
                }
            }

            let mut xyz = [0.0f64; 3];
            for (value, &index) in xyz.iter_mut().zip(&coordinate_indices) {
                let raw = &row[index];
                *value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| ParseError::MalformedCoordinate {
                        line,
                        value: raw.clone(),
                    })?;
            }

            let missing = |field: &str| ParseError::MalformedRecord {
                line,
                reason: format!("missing {}", field),
            };
            let atom_name = columns
                .value(row, &["auth_atom_id", "label_atom_id"])
                .ok_or_else(|| missing("atom name"))?;
            let residue_name = columns
                .value(row, &["auth_comp_id", "label_comp_id"])
                .ok_or_else(|| missing("residue name"))?;
            let residue_number: isize = columns
                .value(row, &["auth_seq_id", "label_seq_id"])
                .ok_or_else(|| missing("residue number"))?
                .parse()
                .map_err(|_| missing("integer residue number"))?;
            let chain_id = columns
                .value(row, &["auth_asym_id", "label_asym_id"])
                .and_then(|c| c.chars().next())
                .unwrap_or('A');

            let key = ResidueKey::new(chain_id, residue_number);
            if columns.value(row, &["label_alt_id"]).is_some() && builder.contains(key, atom_name)
            {
                continue;
            }

            let serial = columns
                .value(row, &["id"])
                .and_then(|s| s.parse().ok())
                .unwrap_or(builder.atom_count() + 1);
            let optional = |names: &[&str]| {
                columns
                    .value(row, names)
                    .and_then(|v| v.parse::<f64>().ok())
                    .filter(|v| v.is_finite())
            };

            let mut atom = Atom::new(
                serial,
                atom_name,
                residue_name,
                chain_id,
                residue_number,
                Point3::new(xyz[0], xyz[1], xyz[2]),
            )
            .with_occupancy(optional(&["occupancy"]))
            .with_b_factor(optional(&["B_iso_or_equiv"]));
            if columns.value(row, &["group_PDB"]) == Some("HETATM") {
                atom = atom.hetero();
            }
            if let Some(element) = columns.value(row, &["type_symbol"]) {
                atom = atom.with_element(element);
            }
            builder.add_atom(atom);
        }

        if builder.atom_count() == 0 {
            return Err(ParseError::NoAtomRecords);
        }
        debug!(atoms = builder.atom_count(), rows = rows.len(), "Parsed mmCIF structure");
        Ok(builder.build(&name).with_b_factor_confidence())
    }
}
