//! Configuration for the CLI: a TOML file, `-S key=value` overrides and built-in defaults.
//!
//! Precedence is command-line flag, then `-S` override, then file value, then default.

pub mod builder;
pub mod defaults;
pub mod file;
