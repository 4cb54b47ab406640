//! # Core Models Module
//!
//! Data structures for the two ends of a conversion and the caller-supplied
//! species tagging that connects them.
//!
//! ## Key Components
//!
//! - [`structure`] - A parsed POSCAR document (`StructureFile`)
//! - [`species`] - Species tag / atomic number mapping and its expansion rules
//! - [`target`] - The write-ready XV representation (`TargetStructure`)
//!
//! Every value is immutable once built; each pipeline stage produces a new one.

pub mod species;
pub mod structure;
pub mod target;
