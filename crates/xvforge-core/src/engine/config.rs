use crate::core::io::poscar::PoscarLayout;
use crate::core::models::species::SpeciesMap;
use crate::core::utils::geometry::DEFAULT_OFF_DIAGONAL_TOLERANCE;
use crate::core::utils::units::BOHR_IN_ANGSTROM;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConfig {
    /// Length of one Bohr in Angstrom; every length is divided by it.
    pub bohr_in_angstrom: f64,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            bohr_in_angstrom: BOHR_IN_ANGSTROM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryConfig {
    /// Largest off-diagonal lattice component (Angstrom) still treated as an orthogonal cell.
    pub off_diagonal_tolerance: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            off_diagonal_tolerance: DEFAULT_OFF_DIAGONAL_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    pub units: UnitConfig,
    pub geometry: GeometryConfig,
    pub layout: PoscarLayout,
    pub species_map: SpeciesMap,
    /// Number of unit cells the motif layout is repeated over.
    pub multiplicity: usize,
}

#[derive(Default)]
pub struct ConversionConfigBuilder {
    species_map: Option<SpeciesMap>,
    multiplicity: Option<usize>,
    bohr_in_angstrom: Option<f64>,
    off_diagonal_tolerance: Option<f64>,
    layout: Option<PoscarLayout>,
}

impl ConversionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn species_map(mut self, map: SpeciesMap) -> Self {
        self.species_map = Some(map);
        self
    }
    pub fn multiplicity(mut self, multiplicity: usize) -> Self {
        self.multiplicity = Some(multiplicity);
        self
    }
    pub fn bohr_in_angstrom(mut self, value: f64) -> Self {
        self.bohr_in_angstrom = Some(value);
        self
    }
    pub fn off_diagonal_tolerance(mut self, tolerance: f64) -> Self {
        self.off_diagonal_tolerance = Some(tolerance);
        self
    }
    pub fn layout(mut self, layout: PoscarLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn build(self) -> Result<ConversionConfig, ConfigError> {
        let species_map = self
            .species_map
            .ok_or(ConfigError::MissingParameter("species_map"))?;

        let multiplicity = self.multiplicity.unwrap_or(1);
        if multiplicity == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "multiplicity",
                reason: "must be at least 1".to_string(),
            });
        }
        species_map
            .check_multiplicity(multiplicity)
            .map_err(|e| ConfigError::InvalidParameter {
                name: "multiplicity",
                reason: e.to_string(),
            })?;

        let units = UnitConfig {
            bohr_in_angstrom: self.bohr_in_angstrom.unwrap_or(BOHR_IN_ANGSTROM),
        };
        if !(units.bohr_in_angstrom.is_finite() && units.bohr_in_angstrom > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "bohr_in_angstrom",
                reason: format!("must be a positive number, got {}", units.bohr_in_angstrom),
            });
        }

        let geometry = GeometryConfig {
            off_diagonal_tolerance: self
                .off_diagonal_tolerance
                .unwrap_or(DEFAULT_OFF_DIAGONAL_TOLERANCE),
        };
        if !(geometry.off_diagonal_tolerance.is_finite() && geometry.off_diagonal_tolerance >= 0.0)
        {
            return Err(ConfigError::InvalidParameter {
                name: "off_diagonal_tolerance",
                reason: format!(
                    "must be a non-negative number, got {}",
                    geometry.off_diagonal_tolerance
                ),
            });
        }

        Ok(ConversionConfig {
            units,
            geometry,
            layout: self.layout.unwrap_or_default(),
            species_map,
            multiplicity,
        })
    }
}
