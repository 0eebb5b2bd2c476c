//! # Core Module
//!
//! This module provides the fundamental building blocks for binder evaluation: typed
//! protein structures, the readers that produce them from coordinate text, and the
//! domain rules that decide whether a sequence or structure is usable as workflow input.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains and structures
//! - **File I/O** ([`io`]) - PDB and mmCIF readers, format detection, complex PDB writer
//! - **Input Rules** ([`validation`]) - Sequence alphabet/length, structure size, PDB ids,
//!   per-residue confidence arrays
//! - **Utilities** ([`utils`]) - Residue/element identifier tables and geometry helpers
//!
//! Everything in this module is free of side effects apart from explicit path-based I/O.

pub mod io;
pub mod models;
pub mod utils;
pub mod validation;
