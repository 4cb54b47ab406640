use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::poscar::PoscarError;
use crate::core::io::xv::XvError;
use crate::core::models::species::SpeciesError;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Malformed structure: {0}")]
    MalformedStructure(PoscarError),

    #[error("Species map mismatch: expands to {found} {unit}, structure declares {expected}")]
    SpeciesMapMismatch {
        expected: usize,
        found: usize,
        unit: &'static str,
    },

    #[error("Invalid species map: {0}")]
    Species(SpeciesError),

    #[error(
        "Unsupported cell geometry: lattice vector {row} has off-diagonal component {column} = {value} (tolerance {tolerance}); only orthogonal cells are supported"
    )]
    UnsupportedCellGeometry {
        row: usize,
        column: usize,
        value: f64,
        tolerance: f64,
    },

    #[error("Invalid XV document: {0}")]
    MalformedTarget(XvError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PoscarError> for ConversionError {
    fn from(e: PoscarError) -> Self {
        match e {
            PoscarError::Io(io) => ConversionError::Io(io),
            other => ConversionError::MalformedStructure(other),
        }
    }
}

impl From<XvError> for ConversionError {
    fn from(e: XvError) -> Self {
        match e {
            XvError::Io(io) => ConversionError::Io(io),
            other => ConversionError::MalformedTarget(other),
        }
    }
}

impl From<SpeciesError> for ConversionError {
    fn from(e: SpeciesError) -> Self {
        match e {
            SpeciesError::Mismatch {
                expected,
                found,
                unit,
            } => ConversionError::SpeciesMapMismatch {
                expected,
                found,
                unit,
            },
            other => ConversionError::Species(other),
        }
    }
}
