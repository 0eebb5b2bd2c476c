use phf::{Map, Set, phf_map, phf_set};

static ONE_LETTER_CODES: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    // Protonation-state and modified variants that still map onto the standard alphabet.
    "HSD" => 'H', "HSE" => 'H', "HSP" => 'H', "HID" => 'H', "HIE" => 'H', "HIP" => 'H',
    "CYX" => 'C', "CYM" => 'C', "ASH" => 'D', "GLH" => 'E', "LYN" => 'K',
    "MSE" => 'M', "SEP" => 'S', "TPO" => 'T', "PTR" => 'Y',
};

static WATER_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "HOH", "WAT", "H2O", "DOD", "TIP", "TIP3", "SOL",
};

static ION_ELEMENTS: Set<&'static str> = phf_set! {
    "ZN", "MG", "FE", "CA", "MN", "CO", "NI", "CU", "CD", "NA", "CL", "BR", "HG", "SE",
};

/// Maps a three-letter residue name onto its one-letter amino-acid code.
pub fn residue_one_letter(residue_name: &str) -> Option<char> {
    ONE_LETTER_CODES
        .get(residue_name.trim().to_ascii_uppercase().as_str())
        .copied()
}

pub fn is_amino_acid(residue_name: &str) -> bool {
    residue_one_letter(residue_name).is_some()
}

pub fn is_water(residue_name: &str) -> bool {
    WATER_RESIDUE_NAMES.contains(residue_name.trim().to_ascii_uppercase().as_str())
}

/// Infers an element symbol from an atom name when the source file leaves the
/// element column blank.
///
/// Protein atoms always use the leading letter (`CA` is an alpha carbon). Hetero
/// groups may use a two-letter element: single-atom ions whose atom name matches
/// their residue name (`ZN` in `ZN`), and halogens (`CL1`, `BR2`).
pub fn infer_element(atom_name: &str, residue_name: &str, is_hetero: bool) -> String {
    let letters: String = atom_name
        .trim()
        .chars()
        .skip_while(|c| c.is_ascii_digit())
        .take_while(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if letters.is_empty() {
        return "X".to_string();
    }

    if is_hetero && letters.len() >= 2 {
        let candidate = &letters[..2];
        let is_ion = atom_name.trim().eq_ignore_ascii_case(residue_name.trim())
            && ION_ELEMENTS.contains(candidate);
        let is_halogen = matches!(candidate, "CL" | "BR");
        if is_ion || is_halogen {
            return candidate.to_string();
        }
    }

    letters[..1].to_string()
}
