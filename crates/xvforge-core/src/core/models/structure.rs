use nalgebra::{Point3, Vector3};
use thiserror::Error;

/// The multiplier applied to the lattice vectors of a structure file.
///
/// POSCAR files carry either a single factor, applied to every component,
/// or three factors applied per Cartesian axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalingFactor {
    /// One factor shared by the x, y and z components.
    Uniform(f64),
    /// Independent factors for the x, y and z components.
    PerAxis([f64; 3]),
}

impl ScalingFactor {
    /// Returns the factor applied to the given Cartesian axis (0 = x, 1 = y, 2 = z).
    pub fn axis(&self, axis: usize) -> f64 {
        match self {
            ScalingFactor::Uniform(s) => *s,
            ScalingFactor::PerAxis(s) => s[axis],
        }
    }

    /// The factors as a vector, for component-wise products.
    pub fn as_vector(&self) -> Vector3<f64> {
        Vector3::new(self.axis(0), self.axis(1), self.axis(2))
    }

    /// Applies the factor component-wise to a vector.
    pub fn apply(&self, v: &Vector3<f64>) -> Vector3<f64> {
        v.component_mul(&self.as_vector())
    }
}

impl Default for ScalingFactor {
    fn default() -> Self {
        ScalingFactor::Uniform(1.0)
    }
}

/// How the coordinate block of a structure file is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateMode {
    /// Fractions of the lattice vectors.
    #[default]
    Direct,
    /// Absolute positions in (unscaled) Angstrom.
    Cartesian,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StructureError {
    #[error("Expected {expected} coordinate records from species counts, found {found}")]
    CoordinateCountMismatch { expected: usize, found: usize },
    #[error("Species label line has {labels} entries but {counts} counts were declared")]
    LabelCountMismatch { labels: usize, counts: usize },
}

/// A parsed POSCAR document.
///
/// Construction through [`StructureFile::new`] guarantees that the number of
/// coordinate records equals the sum of the species counts.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureFile {
    comment: String,
    scaling_factor: ScalingFactor,
    lattice_vectors: [Vector3<f64>; 3],
    species_labels: Option<Vec<String>>,
    species_counts: Vec<usize>,
    coordinate_mode: CoordinateMode,
    selective_dynamics: bool,
    coordinates: Vec<Point3<f64>>,
}

impl StructureFile {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        comment: String,
        scaling_factor: ScalingFactor,
        lattice_vectors: [Vector3<f64>; 3],
        species_labels: Option<Vec<String>>,
        species_counts: Vec<usize>,
        coordinate_mode: CoordinateMode,
        selective_dynamics: bool,
        coordinates: Vec<Point3<f64>>,
    ) -> Result<Self, StructureError> {
        let expected = species_counts
            .iter()
            .try_fold(0usize, |total, &n| total.checked_add(n));
        if expected != Some(coordinates.len()) {
            return Err(StructureError::CoordinateCountMismatch {
                expected: expected.unwrap_or(usize::MAX),
                found: coordinates.len(),
            });
        }
        if let Some(labels) = &species_labels {
            if labels.len() != species_counts.len() {
                return Err(StructureError::LabelCountMismatch {
                    labels: labels.len(),
                    counts: species_counts.len(),
                });
            }
        }
        Ok(Self {
            comment,
            scaling_factor,
            lattice_vectors,
            species_labels,
            species_counts,
            coordinate_mode,
            selective_dynamics,
            coordinates,
        })
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn scaling_factor(&self) -> ScalingFactor {
        self.scaling_factor
    }

    /// Lattice vectors as written in the file, before scaling.
    pub fn lattice_vectors(&self) -> &[Vector3<f64>; 3] {
        &self.lattice_vectors
    }

    /// Lattice vectors with the scaling factor applied, in Angstrom.
    pub fn scaled_lattice_vectors(&self) -> [Vector3<f64>; 3] {
        self.lattice_vectors.map(|v| self.scaling_factor.apply(&v))
    }

    pub fn species_labels(&self) -> Option<&[String]> {
        self.species_labels.as_deref()
    }

    pub fn species_counts(&self) -> &[usize] {
        &self.species_counts
    }

    pub fn coordinate_mode(&self) -> CoordinateMode {
        self.coordinate_mode
    }

    pub fn has_selective_dynamics(&self) -> bool {
        self.selective_dynamics
    }

    pub fn coordinates(&self) -> &[Point3<f64>] {
        &self.coordinates
    }

    pub fn atom_count(&self) -> usize {
        self.coordinates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(a: f64) -> [Vector3<f64>; 3] {
        [
            Vector3::new(a, 0.0, 0.0),
            Vector3::new(0.0, a, 0.0),
            Vector3::new(0.0, 0.0, a),
        ]
    }

    #[test]
    fn new_rejects_coordinate_count_mismatch() {
        let result = StructureFile::new(
            "test".into(),
            ScalingFactor::default(),
            cubic(4.0),
            None,
            vec![2, 1],
            CoordinateMode::Direct,
            false,
            vec![Point3::origin(), Point3::new(0.5, 0.5, 0.5)],
        );
        assert_eq!(
            result,
            Err(StructureError::CoordinateCountMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn new_rejects_counts_beyond_usize() {
        let result = StructureFile::new(
            "test".into(),
            ScalingFactor::default(),
            cubic(4.0),
            None,
            vec![usize::MAX, 1],
            CoordinateMode::Direct,
            false,
            vec![Point3::origin()],
        );
        assert_eq!(
            result,
            Err(StructureError::CoordinateCountMismatch {
                expected: usize::MAX,
                found: 1
            })
        );
    }

    #[test]
    fn new_rejects_label_count_mismatch() {
        let result = StructureFile::new(
            "test".into(),
            ScalingFactor::default(),
            cubic(4.0),
            Some(vec!["Pb".into()]),
            vec![1, 1],
            CoordinateMode::Direct,
            false,
            vec![Point3::origin(), Point3::new(0.5, 0.5, 0.5)],
        );
        assert!(matches!(
            result,
            Err(StructureError::LabelCountMismatch { labels: 1, counts: 2 })
        ));
    }

    #[test]
    fn scaled_lattice_applies_per_axis_factors() {
        let structure = StructureFile::new(
            String::new(),
            ScalingFactor::PerAxis([1.0, 2.0, 3.0]),
            [
                Vector3::new(1.0, 1.0, 1.0),
                Vector3::new(0.0, 2.0, 0.0),
                Vector3::new(0.0, 0.0, 3.0),
            ],
            None,
            vec![0],
            CoordinateMode::Direct,
            false,
            vec![],
        )
        .unwrap();

        let scaled = structure.scaled_lattice_vectors();
        assert_eq!(scaled[0], Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(scaled[1], Vector3::new(0.0, 4.0, 0.0));
        assert_eq!(scaled[2], Vector3::new(0.0, 0.0, 9.0));
    }

    #[test]
    fn uniform_factor_scales_every_axis() {
        let s = ScalingFactor::Uniform(2.5);
        assert_eq!(s.apply(&Vector3::new(1.0, 2.0, 4.0)), Vector3::new(2.5, 5.0, 10.0));
    }
}
