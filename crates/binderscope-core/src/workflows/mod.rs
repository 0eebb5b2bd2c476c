//! # Workflows Module
//!
//! The stateful, public layer of BinderScope: a design project as a
//! [`session::WorkflowSession`] moving through six ordered stages.
//!
//! ## Overview
//!
//! A session collects a target input, a predicted or supplied target structure, a binder
//! input and its structure, then the interface analysis and quality score for the pair.
//! Each stage has a readiness predicate over the session's current artifacts, and the
//! session only advances when that predicate holds. Replacing an upstream artifact marks
//! everything computed from it stale, so old results can never unlock a later stage.
//!
//! ## Architecture
//!
//! - **Stages** ([`stage`]) - The ordered stage list and per-stage status values
//! - **Inputs** ([`inputs`]) - Tagged target and binder inputs with one validator each
//! - **Session** ([`session`]) - The aggregate, its artifacts and the state machine
//! - **Analysis Workflow** ([`analysis`]) - Interface analysis and scoring stored in one step
//! - **Prediction Boundary** ([`prediction`]) - The structure-predictor trait and its output
//! - **Persistence** ([`persistence`]) - Versioned JSON documents with consistency checks
//! - **Error Handling** ([`error`]) - Workflow failures
//!
//! Every mutating operation checks its preconditions before touching the session, so a
//! failed call leaves the session exactly as it was.

pub mod analysis;
pub mod error;
pub mod inputs;
pub mod persistence;
pub mod prediction;
pub mod session;
pub mod stage;
