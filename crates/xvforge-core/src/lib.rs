//! # XVForge Core Library
//!
//! Converts VASP POSCAR crystal structures into SIESTA XV files: lattice
//! scaling, Angstrom to Bohr conversion, fractional to Cartesian coordinates
//! and per-atom species tagging, written in the fixed-width layout SIESTA reads.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Stateless data models (`StructureFile`,
//!   `SpeciesMap`, `TargetStructure`), the POSCAR and XV formats, and unit and
//!   geometry helpers.
//!
//! - **[`engine`]: The Logic Core.** Conversion configuration, the transform
//!   from a parsed structure to a write-ready one, the error taxonomy and
//!   progress reporting.
//!
//! - **[`workflows`]: The Public API.** Single-document and batch conversions
//!   that read, transform and write in one call.

pub mod core;
pub mod engine;
pub mod workflows;
