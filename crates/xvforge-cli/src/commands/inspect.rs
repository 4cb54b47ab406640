use crate::cli::{FormatArg, InspectArgs};
use crate::error::{CliError, Result};
use std::fmt::Write;
use std::path::Path;
use tracing::info;
use xvforge::core::io::{poscar::PoscarFile, traits::StructureReader, xv::XvFile};
use xvforge::core::models::structure::{CoordinateMode, StructureFile};
use xvforge::core::models::target::TargetStructure;
use xvforge::core::utils::geometry::{cell_lengths, cell_volume};

pub fn run(args: InspectArgs) -> Result<()> {
    let format = args.format.unwrap_or_else(|| guess_format(&args.path));
    info!("Inspecting {} as {:?}", args.path.display(), format);

    let summary = match format {
        FormatArg::Poscar => {
            let structure = PoscarFile::default()
                .read_from_path(&args.path)
                .map_err(|e| CliError::FileParsing {
                    path: args.path.clone(),
                    source: e.into(),
                })?;
            summarize_poscar(&structure)
        }
        FormatArg::Xv => {
            let target = XvFile
                .read_from_path(&args.path)
                .map_err(|e| CliError::FileParsing {
                    path: args.path.clone(),
                    source: e.into(),
                })?;
            summarize_xv(&target)
        }
    };
    print!("{}", summary);
    Ok(())
}

fn guess_format(path: &Path) -> FormatArg {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xv") => FormatArg::Xv,
        _ => FormatArg::Poscar,
    }
}

pub fn summarize_poscar(structure: &StructureFile) -> String {
    let lattice = structure.scaled_lattice_vectors();
    let [a, b, c] = cell_lengths(&lattice);
    let mode = match structure.coordinate_mode() {
        CoordinateMode::Direct => "direct",
        CoordinateMode::Cartesian => "cartesian",
    };

    let mut out = String::new();
    let _ = writeln!(out, "Comment:   {}", structure.comment());
    let _ = writeln!(out, "Atoms:     {}", structure.atom_count());
    let _ = writeln!(out, "Cell (A):  {:.6} {:.6} {:.6}", a, b, c);
    let _ = writeln!(out, "Volume:    {:.6} A^3", cell_volume(&lattice));
    let _ = writeln!(
        out,
        "Positions: {}{}",
        mode,
        if structure.has_selective_dynamics() {
            " (selective dynamics)"
        } else {
            ""
        }
    );
    for (i, count) in structure.species_counts().iter().enumerate() {
        let label = structure
            .species_labels()
            .and_then(|labels| labels.get(i))
            .map(String::as_str)
            .unwrap_or("?");
        let _ = writeln!(out, "  block {:>2}  {:<4} x {}", i + 1, label, count);
    }
    out
}

pub fn summarize_xv(target: &TargetStructure) -> String {
    let lattice = target.lattice_vectors_bohr();
    let [a, b, c] = cell_lengths(lattice);

    let mut out = String::new();
    let _ = writeln!(out, "Atoms:     {}", target.atom_count());
    let _ = writeln!(out, "Cell (Bohr): {:.6} {:.6} {:.6}", a, b, c);
    let _ = writeln!(out, "Volume:    {:.6} Bohr^3", cell_volume(lattice));
    for (tag, z, count) in target.species_summary() {
        let _ = writeln!(out, "  species {:>3}  Z = {:>3}  x {}", tag, z, count);
    }
    out
}
