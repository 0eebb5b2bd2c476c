//! # Core Models Module
//!
//! Data structures used to represent protein structures throughout BinderScope.
//!
//! ## Overview
//!
//! A [`structure::Structure`] is an ordered collection of [`chain::Chain`]s, each an
//! ordered sequence of [`residue::Residue`]s, each a non-empty list of
//! [`atom::Atom`]s. Structures are produced by the readers in [`crate::core::io`] and
//! are never mutated in place afterwards; the workflow layer replaces them wholesale.
//!
//! ## Key Components
//!
//! - [`atom`] - Immutable atom records with coordinates and optional occupancy/B-factor
//! - [`residue`] - Residues, their ordering key and representative atom
//! - [`chain`] - Chains of residues
//! - [`structure`] - Whole structures, provenance tags and the builder used by readers
//! - [`side`] - Which half of a target/binder pair something belongs to
//!
//! ## Usage
//!
//! ```ignore
//! use binderscope::core::io::parse_structure;
//!
//! let structure = parse_structure(&std::fs::read_to_string("target.pdb")?)?;
//! println!("{} residues, sequence {}", structure.residue_count(), structure.sequence());
//! ```

pub mod atom;
pub mod chain;
pub mod residue;
pub mod side;
pub mod structure;
