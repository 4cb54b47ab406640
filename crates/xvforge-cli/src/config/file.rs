use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSpeciesConfig {
    /// Species map file; relative paths are resolved against the config file.
    pub map: Option<PathBuf>,
    pub multiplicity: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileUnitsConfig {
    pub bohr_in_angstrom: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileGeometryConfig {
    pub off_diagonal_tolerance: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub species: Option<FileSpeciesConfig>,
    pub units: Option<FileUnitsConfig>,
    pub geometry: Option<FileGeometryConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        if let (Some(species), Some(base)) = (config.species.as_mut(), path.parent()) {
            if let Some(map) = species.map.as_mut() {
                if map.is_relative() {
                    *map = base.join(&*map);
                }
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_all_sections_and_resolves_map_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("xvforge.toml");
        fs::write(
            &path,
            r#"
            [species]
            map = "maps/pto.toml"
            multiplicity = 20

            [units]
            bohr-in-angstrom = 0.52917721

            [geometry]
            off-diagonal-tolerance = 1e-6
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        let species = config.species.unwrap();
        assert_eq!(species.map, Some(dir.path().join("maps/pto.toml")));
        assert_eq!(species.multiplicity, Some(20));
        assert_eq!(config.units.unwrap().bohr_in_angstrom, Some(0.52917721));
        assert_eq!(config.geometry.unwrap().off_diagonal_tolerance, Some(1e-6));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("xvforge.toml");
        fs::write(&path, "[units]\nhartree = 27.2\n").unwrap();

        let err = FileConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = FileConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
