pub mod analyze;
pub mod evaluate;
pub mod inputs;
pub mod predict;
pub mod session;
pub mod validate;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::fs;
    use std::path::{Path, PathBuf};

    pub const TARGET_SEQUENCE: &str = "MKTAYIAKQRQISFVKSHFSRQ";
    pub const BINDER_SEQUENCE: &str = "GSHMASMTGGQQMGRGS";

    /// PDB text of `residues` alanine alpha carbons spaced 3.8 Å apart along x.
    pub fn pdb_line(chain: char, residues: usize, y: f64, b_factor: f64) -> String {
        let mut text = String::new();
        for i in 0..residues {
            text.push_str(&format!(
                "ATOM  {:>5}  CA  ALA {}{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00 {:>5.2}           C\n",
                i + 1,
                chain,
                i + 1,
                i as f64 * 3.8,
                y,
                0.0,
                b_factor
            ));
        }
        text.push_str("END\n");
        text
    }

    pub fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }
}
