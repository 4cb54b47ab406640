/// Length of one Bohr radius in Angstrom, as used by the downstream XV consumer.
pub const BOHR_IN_ANGSTROM: f64 = 0.529177;

/// Converts a length in Angstrom to Bohr.
#[inline]
pub fn angstrom_to_bohr(value: f64, bohr_in_angstrom: f64) -> f64 {
    value / bohr_in_angstrom
}

/// Converts a length in Bohr to Angstrom.
#[inline]
pub fn bohr_to_angstrom(value: f64, bohr_in_angstrom: f64) -> f64 {
    value * bohr_in_angstrom
}
