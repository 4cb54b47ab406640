//! Numeric and lookup helpers shared by the readers, writers and the engine.
//!
//! - [`units`] - Angstrom/Bohr conversion and the reference constant
//! - [`geometry`] - Lattice matrices, orthogonality checks and coordinate transforms
//! - [`elements`] - Element symbol to atomic number lookup

pub mod elements;
pub mod geometry;
pub mod units;
