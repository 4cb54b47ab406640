//! Provides input/output functionality for crystal structure file formats.
//!
//! This module contains the readers and writers for the formats handled by
//! XVForge: VASP POSCAR documents on the input side and SIESTA XV files on the
//! output side. Both are expressed through the trait-based interface in
//! [`traits`], and share the numeric token classification in [`token`].

pub mod poscar;
pub mod token;
pub mod traits;
pub mod xv;
