use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{AppConfig, SpeciesSource};
use crate::cli::{ConversionArgs, LayoutArg};
use crate::error::{CliError, Result};
use crate::utils::parser;
use tracing::debug;
use xvforge::core::models::species::{SpeciesLayout, SpeciesMap};
use xvforge::engine::config::ConversionConfigBuilder;

pub fn build_config(args: &ConversionArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let species_file = file_config.species.take().unwrap_or_default();
    let units_file = file_config.units.take().unwrap_or_default();
    let geometry_file = file_config.geometry.take().unwrap_or_default();

    let (species_map, species_source) = if !args.species.is_empty() {
        let entries = parser::parse_species_list(&args.species)
            .map_err(|e| CliError::Argument(e.to_string()))?;
        let layout = match args.layout {
            Some(LayoutArg::Blocks) => SpeciesLayout::Blocks,
            Some(LayoutArg::Motif) => SpeciesLayout::Motif,
            None => defaults.inline_layout,
        };
        let map = SpeciesMap::new(entries, layout)
            .map_err(|e| CliError::Argument(e.to_string()))?;
        (map, SpeciesSource::Inline)
    } else {
        let path = args
            .species_map
            .clone()
            .or(species_file.map)
            .ok_or_else(|| {
                CliError::Config(
                    "A species map is required, either via --species-map, --species or `species.map` in the config file."
                        .to_string(),
                )
            })?;
        let map = SpeciesMap::load(&path).map_err(|e| CliError::FileParsing {
            path: path.clone(),
            source: e.into(),
        })?;
        (map, SpeciesSource::File(path))
    };

    let multiplicity = args
        .multiplicity
        .or(species_file.multiplicity)
        .unwrap_or(defaults.multiplicity);
    let off_diagonal_tolerance = args
        .tolerance
        .or(geometry_file.off_diagonal_tolerance)
        .unwrap_or(defaults.off_diagonal_tolerance);
    let bohr_in_angstrom = units_file
        .bohr_in_angstrom
        .unwrap_or(defaults.bohr_in_angstrom);

    debug!(
        "Resolved {} species entries ({:?}), multiplicity {}, tolerance {}, 1 Bohr = {} Angstrom",
        species_map.entries().len(),
        species_map.layout(),
        multiplicity,
        off_diagonal_tolerance,
        bohr_in_angstrom
    );

    let core_config = ConversionConfigBuilder::new()
        .species_map(species_map)
        .multiplicity(multiplicity)
        .off_diagonal_tolerance(off_diagonal_tolerance)
        .bohr_in_angstrom(bohr_in_angstrom)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        species_source,
        core_config,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
            CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            ))
        })?;

        match key {
            "units.bohr-in-angstrom" => {
                config
                    .units
                    .get_or_insert_with(Default::default)
                    .bohr_in_angstrom = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                })?);
            }
            "geometry.off-diagonal-tolerance" => {
                config
                    .geometry
                    .get_or_insert_with(Default::default)
                    .off_diagonal_tolerance = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                })?);
            }
            "species.multiplicity" => {
                config
                    .species
                    .get_or_insert_with(Default::default)
                    .multiplicity = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
