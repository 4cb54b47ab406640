//! # Workflows Module
//!
//! The public entry points of XVForge. A workflow ties the readers and writers
//! of [`crate::core`] to the transform in [`crate::engine`] and runs a complete
//! conversion.
//!
//! - **Single conversion** ([`convert`]) - One POSCAR document to one XV file
//! - **Batch conversion** ([`batch`]) - Many independent documents on a thread pool

pub mod batch;
pub mod convert;
