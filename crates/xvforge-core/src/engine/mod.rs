//! # Engine Module
//!
//! The conversion logic that sits between the readers and writers of [`crate::core`].
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Unit constants, geometry tolerance, header layout and species tagging
//! - **Transform** ([`transform`]) - Scaling, Angstrom-to-Bohr and fractional-to-Cartesian conversion
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting for front ends
//! - **Error Handling** ([`error`]) - The conversion error taxonomy
//!
//! Every check runs before a target structure is produced, so a failed
//! conversion never leaves partial output behind.

pub mod config;
pub mod error;
pub mod progress;
pub mod transform;
