//! # Engine Module
//!
//! The binding-interface analysis engine: everything that turns a target and a binder
//! structure into a graded interface.
//!
//! ## Overview
//!
//! Analysis is a pure function of two parsed structures and an [`config::AnalysisConfig`].
//! The [`interface`] analyzer finds residue contacts within a distance cutoff, summarizes
//! their distance statistics and flags steric clashes. The [`scoring`] rubric converts
//! that summary into a 0–100 score with a letter grade and targeted recommendations.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Cutoff, clash threshold, hetero handling, grid threshold
//! - **Spatial Index** (`grid`) - Uniform cell grid that bounds the contact search
//! - **Interface Analysis** ([`interface`]) - Contact pairs, interface residues, statistics
//! - **Quality Scoring** ([`scoring`]) - Heuristic rubric, grades and recommendations
//! - **Binding Site** ([`binding_site`]) - Overlap between the interface and an annotated site
//! - **Export** ([`contact_map`]) - CSV contact tables and per-residue hotspots
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Analysis failures
//!
//! No function in this module holds state between calls; repeated calls with the same
//! inputs return equal results.

pub mod binding_site;
pub mod config;
pub mod contact_map;
pub mod error;
pub(crate) mod grid;
pub mod interface;
pub mod progress;
pub mod scoring;
