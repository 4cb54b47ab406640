use super::config::ConversionConfig;
use super::error::ConversionError;
use crate::core::models::species::{SpeciesEntry, SpeciesLayout};
use crate::core::models::structure::{CoordinateMode, StructureFile};
use crate::core::models::target::{AtomRecord, TargetStructure};
use crate::core::utils::elements;
use crate::core::utils::geometry::{find_off_diagonal, fractional_to_cartesian_orthogonal};
use crate::core::utils::units::angstrom_to_bohr;
use nalgebra::{Point3, Vector3};
use tracing::{debug, instrument, warn};

/// Converts every component of a vector from Angstrom to Bohr.
pub fn vector_to_bohr(v: &Vector3<f64>, bohr_in_angstrom: f64) -> Vector3<f64> {
    v.map(|c| angstrom_to_bohr(c, bohr_in_angstrom))
}

/// Returns the scaled lattice of `structure` in Bohr.
pub fn lattice_to_bohr(structure: &StructureFile, bohr_in_angstrom: f64) -> [Vector3<f64>; 3] {
    structure
        .scaled_lattice_vectors()
        .map(|v| vector_to_bohr(&v, bohr_in_angstrom))
}

/// Cartesian positions of every atom in Angstrom, after scaling.
///
/// Direct coordinates are multiplied by the diagonal of the scaled lattice, so
/// the cell must be orthogonal within `tolerance`; any larger off-diagonal
/// component fails with [`ConversionError::UnsupportedCellGeometry`].
pub fn cartesian_positions(
    structure: &StructureFile,
    tolerance: f64,
) -> Result<Vec<Point3<f64>>, ConversionError> {
    match structure.coordinate_mode() {
        CoordinateMode::Direct => {
            let lattice = structure.scaled_lattice_vectors();
            if let Some(component) = find_off_diagonal(&lattice, tolerance) {
                return Err(ConversionError::UnsupportedCellGeometry {
                    row: component.row,
                    column: component.column,
                    value: component.value,
                    tolerance,
                });
            }
            Ok(structure
                .coordinates()
                .iter()
                .map(|f| fractional_to_cartesian_orthogonal(f, &lattice))
                .collect())
        }
        CoordinateMode::Cartesian => {
            let scale = structure.scaling_factor();
            Ok(structure
                .coordinates()
                .iter()
                .map(|p| Point3::from(scale.apply(&p.coords)))
                .collect())
        }
    }
}

fn warn_on_label_mismatch(structure: &StructureFile, config: &ConversionConfig) {
    if config.species_map.layout() != SpeciesLayout::Blocks {
        return;
    }
    let Some(labels) = structure.species_labels() else {
        return;
    };
    for (label, entry) in labels.iter().zip(config.species_map.entries()) {
        if let Some(element) = &entry.element {
            if !elements::same_element(label, element) {
                warn!(
                    "Species label '{}' is mapped to tag {} declared as '{}'",
                    label, entry.tag, element
                );
            }
            continue;
        }
        let Some(expected) = elements::atomic_number(label) else {
            continue;
        };
        if expected != entry.atomic_number {
            warn!(
                "Species label '{}' (Z = {}) is mapped to tag {} with atomic number {}",
                label, expected, entry.tag, entry.atomic_number
            );
        }
    }
}

/// Derives the write-ready XV representation of a parsed structure.
///
/// All validation happens here, so a successful result can always be
/// serialized.
#[instrument(skip_all, fields(atoms = structure.atom_count()))]
pub fn to_target(
    structure: &StructureFile,
    config: &ConversionConfig,
) -> Result<TargetStructure, ConversionError> {
    let bohr = config.units.bohr_in_angstrom;

    let positions = cartesian_positions(structure, config.geometry.off_diagonal_tolerance)?;
    let species: Vec<&SpeciesEntry> = config
        .species_map
        .expand(structure.species_counts(), config.multiplicity)?;
    warn_on_label_mismatch(structure, config);

    let lattice_vectors_bohr = lattice_to_bohr(structure, bohr);
    let atom_records: Vec<AtomRecord> = positions
        .iter()
        .zip(species)
        .map(|(position, entry)| AtomRecord {
            species_tag: entry.tag,
            atomic_number: entry.atomic_number,
            position_bohr: Point3::from(vector_to_bohr(&position.coords, bohr)),
        })
        .collect();

    debug!(
        "Transformed {} atoms into Bohr (1 Bohr = {} Angstrom)",
        atom_records.len(),
        bohr
    );
    Ok(TargetStructure::new(lattice_vectors_bohr, atom_records))
}
