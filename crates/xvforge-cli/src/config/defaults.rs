use xvforge::core::models::species::SpeciesLayout;
use xvforge::core::utils::geometry::DEFAULT_OFF_DIAGONAL_TOLERANCE;
use xvforge::core::utils::units::BOHR_IN_ANGSTROM;

pub struct DefaultsConfig {
    pub bohr_in_angstrom: f64,
    pub off_diagonal_tolerance: f64,
    pub multiplicity: usize,
    pub inline_layout: SpeciesLayout,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            bohr_in_angstrom: BOHR_IN_ANGSTROM,
            off_diagonal_tolerance: DEFAULT_OFF_DIAGONAL_TOLERANCE,
            multiplicity: 1,
            inline_layout: SpeciesLayout::Blocks,
        }
    }
}
