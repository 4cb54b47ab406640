//! # Core Module
//!
//! The stateless foundation of XVForge: data models, file formats and the
//! numeric helpers they rely on.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Parsed source structures, species maps and target structures
//! - **File I/O** ([`io`]) - POSCAR reading, XV reading and writing, token classification
//! - **Utilities** ([`utils`]) - Unit conversion, lattice geometry and element lookup
//!
//! Nothing in this module performs a conversion on its own; the [`crate::engine`]
//! combines these pieces into the Angstrom-to-Bohr pipeline.

pub mod io;
pub mod models;
pub mod utils;
