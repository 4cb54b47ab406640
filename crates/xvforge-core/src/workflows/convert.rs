use crate::core::io::poscar::PoscarFile;
use crate::core::io::traits::{StructureReader, StructureWriter};
use crate::core::io::xv::XvFile;
use crate::core::models::target::TargetStructure;
use crate::engine::config::ConversionConfig;
use crate::engine::error::ConversionError;
use crate::engine::progress::ProgressReporter;
use crate::engine::transform;
use std::io::BufRead;
use std::path::Path;
use tracing::{info, instrument};

/// Reads a POSCAR document and derives its XV representation without writing anything.
pub fn prepare(
    reader: &mut impl BufRead,
    config: &ConversionConfig,
) -> Result<TargetStructure, ConversionError> {
    let structure = PoscarFile::new(config.layout).read_from(reader)?;
    transform::to_target(&structure, config)
}

/// Converts a POSCAR document held in memory into XV text.
pub fn convert_str(source: &str, config: &ConversionConfig) -> Result<String, ConversionError> {
    let target = prepare(&mut source.as_bytes(), config)?;
    Ok(XvFile.render(&target))
}

/// Converts the POSCAR file at `input` into an XV file at `output`.
///
/// The output file is only created after reading and transforming succeeded,
/// so a failed conversion leaves nothing on disk.
#[instrument(skip_all, name = "convert_workflow", fields(input = %input.display()))]
pub fn run(
    input: &Path,
    output: &Path,
    config: &ConversionConfig,
    reporter: &ProgressReporter,
) -> Result<TargetStructure, ConversionError> {
    let structure = reporter.phase("Reading", || {
        PoscarFile::new(config.layout).read_from_path(input)
    })?;
    info!(
        "Read '{}' with {} atoms in {} species.",
        structure.comment(),
        structure.atom_count(),
        structure.species_counts().len()
    );

    let target = reporter.phase("Transforming", || transform::to_target(&structure, config))?;

    reporter.phase("Writing", || XvFile.write_to_path(&target, output))?;
    info!(
        "Wrote {} atoms to {}.",
        target.atom_count(),
        output.display()
    );

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::poscar::PoscarLayout;
    use crate::core::models::species::{SpeciesEntry, SpeciesLayout, SpeciesMap};
    use crate::engine::config::ConversionConfigBuilder;
    use std::fs;
    use tempfile::tempdir;

    const ZEROS: &str = "        0.000000000        0.000000000        0.000000000";

    const SINGLE_LEAD: &str = "\
Pb in a cube
1.0
4.0 0.0 0.0
0.0 4.0 0.0
0.0 0.0 4.0
Pb
1
Direct
0.5 0.5 0.5
";

    const TWO_SPECIES: &str = "\
two species
1.0
4.0 0.0 0.0
0.0 4.0 0.0
0.0 0.0 4.0
2 1
Direct
0.0 0.0 0.0
0.5 0.0 0.0
0.5 0.5 0.5
";

    fn lead_config() -> ConversionConfig {
        ConversionConfigBuilder::new()
            .species_map(
                SpeciesMap::new(vec![SpeciesEntry::new(1, 82)], SpeciesLayout::Blocks).unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn convert_str_produces_reference_document() {
        let xv = convert_str(SINGLE_LEAD, &lead_config()).unwrap();
        let expected = format!(
            "        7.558907511        0.000000000        0.000000000        {ZEROS}\n\
             \x20       0.000000000        7.558907511        0.000000000        {ZEROS}\n\
             \x20       0.000000000        0.000000000        7.558907511        {ZEROS}\n\
             \x20       1\n\
             \x20 1    82    3.779453756    3.779453756    3.779453756    {ZEROS}\n"
        );
        assert_eq!(xv, expected);
    }

    #[test]
    fn convert_str_is_deterministic() {
        let config = lead_config();
        assert_eq!(
            convert_str(SINGLE_LEAD, &config).unwrap(),
            convert_str(SINGLE_LEAD, &config).unwrap()
        );
    }

    #[test]
    fn run_writes_output_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("POSCAR");
        let output = dir.path().join("out.XV");
        fs::write(&input, SINGLE_LEAD).unwrap();

        let target = run(&input, &output, &lead_config(), &ProgressReporter::new()).unwrap();

        assert_eq!(target.atom_count(), 1);
        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written, convert_str(SINGLE_LEAD, &lead_config()).unwrap());
    }

    #[test]
    fn species_mismatch_leaves_no_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("POSCAR");
        let output = dir.path().join("out.XV");
        fs::write(&input, TWO_SPECIES).unwrap();

        let err = run(&input, &output, &lead_config(), &ProgressReporter::new()).unwrap_err();

        assert!(matches!(err, ConversionError::SpeciesMapMismatch { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn malformed_input_leaves_no_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("POSCAR");
        let output = dir.path().join("out.XV");
        fs::write(&input, "comment\n1.0\n4 0 0\n").unwrap();

        let err = run(&input, &output, &lead_config(), &ProgressReporter::new()).unwrap_err();

        assert!(matches!(err, ConversionError::MalformedStructure(_)));
        assert!(!output.exists());
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = run(
            &dir.path().join("absent"),
            &dir.path().join("out.XV"),
            &lead_config(),
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ConversionError::Io(_)));
    }

    #[test]
    fn unwritable_output_is_an_io_error() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("POSCAR");
        fs::write(&input, SINGLE_LEAD).unwrap();
        let output = dir.path().join("missing-dir").join("out.XV");

        let err = run(&input, &output, &lead_config(), &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, ConversionError::Io(_)));
    }

    #[test]
    fn custom_header_layout_is_honoured() {
        let shifted = SINGLE_LEAD.replacen("Pb in a cube\n", "Pb in a cube\nrelaxed, step 12\n", 1);
        let config = ConversionConfigBuilder::new()
            .species_map(
                SpeciesMap::new(vec![SpeciesEntry::new(1, 82)], SpeciesLayout::Blocks).unwrap(),
            )
            .layout(PoscarLayout {
                scale_line: 2,
                lattice_start: 3,
                species_line: 6,
            })
            .build()
            .unwrap();

        assert_eq!(
            convert_str(&shifted, &config).unwrap(),
            convert_str(SINGLE_LEAD, &lead_config()).unwrap()
        );
    }

    #[test]
    fn motif_layout_tags_a_supercell() {
        let mut poscar = String::from("2x1x1 PbTiO3\n1.0\n7.8 0 0\n0 3.9 0\n0 0 4.15\nPb Ti O\n");
        poscar.push_str("2 2 6\nDirect\n");
        // Atoms listed cell by cell: Pb Ti O O O, twice.
        for cell in 0..2 {
            let x0 = 0.5 * cell as f64;
            for (dx, y, z) in [
                (0.0, 0.0, 0.0),
                (0.25, 0.5, 0.54),
                (0.25, 0.5, 0.11),
                (0.25, 0.0, 0.62),
                (0.0, 0.5, 0.62),
            ] {
                poscar.push_str(&format!("{} {} {}\n", x0 + dx, y, z));
            }
        }
        let config = ConversionConfigBuilder::new()
            .species_map(
                SpeciesMap::new(
                    vec![
                        SpeciesEntry::new(1, 82),
                        SpeciesEntry::new(2, 22),
                        SpeciesEntry::new(3, 8),
                        SpeciesEntry::new(3, 8),
                        SpeciesEntry::new(3, 8),
                    ],
                    SpeciesLayout::Motif,
                )
                .unwrap(),
            )
            .multiplicity(2)
            .build()
            .unwrap();

        let target = prepare(&mut poscar.as_bytes(), &config).unwrap();
        let numbers: Vec<u32> = target.atom_records().iter().map(|r| r.atomic_number).collect();
        assert_eq!(numbers, vec![82, 22, 8, 8, 8, 82, 22, 8, 8, 8]);
    }
}
