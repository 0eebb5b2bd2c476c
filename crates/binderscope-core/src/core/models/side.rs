use serde::{Deserialize, Serialize};
use std::fmt;

/// Which half of a target/binder pair a structure, input or residue belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Target,
    Binder,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Side::Target => "target",
                Side::Binder => "binder",
            }
        )
    }
}
