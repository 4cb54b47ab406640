use nalgebra::{Matrix3, Point3, Vector3};

/// Default absolute tolerance, in Angstrom, below which an off-diagonal lattice
/// component is treated as zero.
pub const DEFAULT_OFF_DIAGONAL_TOLERANCE: f64 = 1e-8;

/// An off-diagonal lattice component that breaks the orthogonal-cell precondition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffDiagonalComponent {
    pub row: usize,
    pub column: usize,
    pub value: f64,
}

/// Stacks three lattice vectors as the rows of a matrix.
pub fn lattice_matrix(lattice: &[Vector3<f64>; 3]) -> Matrix3<f64> {
    Matrix3::from_rows(&[
        lattice[0].transpose(),
        lattice[1].transpose(),
        lattice[2].transpose(),
    ])
}

/// Returns the largest off-diagonal component exceeding `tolerance`, if any.
pub fn find_off_diagonal(
    lattice: &[Vector3<f64>; 3],
    tolerance: f64,
) -> Option<OffDiagonalComponent> {
    let mut worst: Option<OffDiagonalComponent> = None;
    for (row, vector) in lattice.iter().enumerate() {
        for column in (0..3).filter(|&c| c != row) {
            let value = vector[column];
            if value.abs() > tolerance && worst.is_none_or(|w| value.abs() > w.value.abs()) {
                worst = Some(OffDiagonalComponent { row, column, value });
            }
        }
    }
    worst
}

/// Converts fractional coordinates to Cartesian using only the diagonal of the lattice.
///
/// Only valid for orthogonal cells; callers check [`find_off_diagonal`] first.
pub fn fractional_to_cartesian_orthogonal(
    fractional: &Point3<f64>,
    lattice: &[Vector3<f64>; 3],
) -> Point3<f64> {
    let diagonal = Vector3::new(lattice[0].x, lattice[1].y, lattice[2].z);
    Point3::from(fractional.coords.component_mul(&diagonal))
}

/// Signed volume of the cell spanned by the lattice vectors.
pub fn cell_volume(lattice: &[Vector3<f64>; 3]) -> f64 {
    lattice_matrix(lattice).determinant()
}

/// Lengths of the three lattice vectors.
pub fn cell_lengths(lattice: &[Vector3<f64>; 3]) -> [f64; 3] {
    lattice.map(|v| v.norm())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetragonal() -> [Vector3<f64>; 3] {
        [
            Vector3::new(3.9, 0.0, 0.0),
            Vector3::new(0.0, 3.9, 0.0),
            Vector3::new(0.0, 0.0, 4.15),
        ]
    }

    #[test]
    fn orthogonal_cell_has_no_off_diagonal_components() {
        assert_eq!(find_off_diagonal(&tetragonal(), DEFAULT_OFF_DIAGONAL_TOLERANCE), None);
    }

    #[test]
    fn find_off_diagonal_reports_largest_violation() {
        let lattice = [
            Vector3::new(4.0, 0.1, 0.0),
            Vector3::new(0.0, 4.0, -0.3),
            Vector3::new(0.0, 0.0, 4.0),
        ];
        let found = find_off_diagonal(&lattice, 1e-6).unwrap();
        assert_eq!((found.row, found.column), (1, 2));
        assert_eq!(found.value, -0.3);
    }

    #[test]
    fn find_off_diagonal_ignores_noise_within_tolerance() {
        let lattice = [
            Vector3::new(4.0, 1e-12, 0.0),
            Vector3::new(0.0, 4.0, 0.0),
            Vector3::new(-1e-10, 0.0, 4.0),
        ];
        assert_eq!(find_off_diagonal(&lattice, 1e-8), None);
    }

    #[test]
    fn fractional_to_cartesian_uses_diagonal_terms() {
        let cart = fractional_to_cartesian_orthogonal(&Point3::new(0.5, 0.25, 1.0), &tetragonal());
        assert!((cart.x - 1.95).abs() < 1e-12);
        assert!((cart.y - 0.975).abs() < 1e-12);
        assert!((cart.z - 4.15).abs() < 1e-12);
    }

    #[test]
    fn volume_and_lengths_of_orthogonal_cell() {
        let lattice = tetragonal();
        assert!((cell_volume(&lattice) - 3.9 * 3.9 * 4.15).abs() < 1e-9);
        let lengths = cell_lengths(&lattice);
        for (got, want) in lengths.iter().zip([3.9, 3.9, 4.15]) {
            assert!((got - want).abs() < 1e-12);
        }
    }
}
