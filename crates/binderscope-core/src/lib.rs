//! # BinderScope Core Library
//!
//! Geometric evaluation of protein binder candidates and the staged workflow that
//! carries a design project from target input to a graded binding interface.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so that every layer can be
//! tested on its own.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `Residue`, `Atom`),
//!   structure file readers and writers, and the sequence/structure validation rules.
//!
//! - **[`engine`]: The Analysis Core.** Pure functions over parsed structures: contact
//!   detection between a target and a binder, distance statistics, steric-clash flagging,
//!   and the heuristic quality rubric that turns an interface into a graded score.
//!
//! - **[`workflows`]: The Public API.** The stateful layer. A `WorkflowSession` owns every
//!   artifact of a design project, gates progression through six ordered stages, and
//!   persists itself as a versioned JSON document.

pub mod core;
pub mod engine;
pub mod workflows;
