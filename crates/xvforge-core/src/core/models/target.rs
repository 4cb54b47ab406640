use nalgebra::{Point3, Vector3};

/// One atom of a write-ready structure.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    pub species_tag: u32,
    pub atomic_number: u32,
    /// Cartesian position in Bohr.
    pub position_bohr: Point3<f64>,
}

/// A structure in the units and coordinate system of the XV format.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetStructure {
    lattice_vectors_bohr: [Vector3<f64>; 3],
    atom_records: Vec<AtomRecord>,
}

impl TargetStructure {
    pub fn new(lattice_vectors_bohr: [Vector3<f64>; 3], atom_records: Vec<AtomRecord>) -> Self {
        Self {
            lattice_vectors_bohr,
            atom_records,
        }
    }

    pub fn lattice_vectors_bohr(&self) -> &[Vector3<f64>; 3] {
        &self.lattice_vectors_bohr
    }

    pub fn atom_records(&self) -> &[AtomRecord] {
        &self.atom_records
    }

    pub fn atom_count(&self) -> usize {
        self.atom_records.len()
    }

    /// Distinct species tags in order of first appearance, with their atomic number and count.
    pub fn species_summary(&self) -> Vec<(u32, u32, usize)> {
        let mut summary: Vec<(u32, u32, usize)> = Vec::new();
        for record in &self.atom_records {
            match summary
                .iter_mut()
                .find(|(tag, z, _)| *tag == record.species_tag && *z == record.atomic_number)
            {
                Some((_, _, count)) => *count += 1,
                None => summary.push((record.species_tag, record.atomic_number, 1)),
            }
        }
        summary
    }
}
