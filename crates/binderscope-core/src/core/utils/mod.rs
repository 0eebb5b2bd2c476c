//! Shared helpers: residue and element identifier tables, and the small amount of
//! geometry the interface engine needs (distances, grid cells, centroids).

pub mod geometry;
pub mod identifiers;
