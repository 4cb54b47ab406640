use std::path::PathBuf;
use xvforge::engine::config::ConversionConfig;

/// Where the species tagging of a run came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeciesSource {
    File(PathBuf),
    Inline,
}

pub struct AppConfig {
    pub species_source: SpeciesSource,
    pub core_config: ConversionConfig,
}
