use crate::core::utils::elements;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// The downstream identity of one atom: its species index and atomic number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpeciesEntry {
    pub tag: u32,
    pub atomic_number: u32,
    /// Element symbol, when the entry was declared by name.
    pub element: Option<String>,
}

impl SpeciesEntry {
    pub fn new(tag: u32, atomic_number: u32) -> Self {
        Self {
            tag,
            atomic_number,
            element: None,
        }
    }

    /// Builds an entry from an element symbol, resolving its atomic number.
    pub fn from_element(tag: u32, symbol: &str) -> Result<Self, SpeciesError> {
        let atomic_number = elements::atomic_number(symbol)
            .ok_or_else(|| SpeciesError::UnknownElement(symbol.to_string()))?;
        Ok(Self {
            tag,
            atomic_number,
            element: Some(symbol.to_string()),
        })
    }
}

/// How the entries of a [`SpeciesMap`] line up with the atoms of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpeciesLayout {
    /// One entry per declared species block, repeated by that block's count.
    #[default]
    Blocks,
    /// One entry per atom of a unit cell, the whole motif repeated once per cell.
    Motif,
}

#[derive(Debug, Error)]
pub enum SpeciesError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Species map has no entries")]
    Empty,
    #[error("Unknown element symbol '{0}'")]
    UnknownElement(String),
    #[error("Species {tag} needs either `atomic-number` or `element`")]
    MissingAtomicNumber { tag: u32 },
    #[error(
        "Species {tag}: element '{element}' has atomic number {expected}, but {given} was given"
    )]
    ElementMismatch {
        tag: u32,
        element: String,
        expected: u32,
        given: u32,
    },
    #[error("Species map expands to {found} {unit}, but the structure declares {expected}")]
    Mismatch {
        expected: usize,
        found: usize,
        unit: &'static str,
    },
    #[error("A multiplicity of {0} only applies to the motif layout")]
    MultiplicityNotApplicable(usize),
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct SpeciesEntryFile {
    tag: u32,
    atomic_number: Option<u32>,
    element: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct SpeciesMapFile {
    #[serde(default)]
    layout: SpeciesLayout,
    species: Vec<SpeciesEntryFile>,
}

impl TryFrom<SpeciesEntryFile> for SpeciesEntry {
    type Error = SpeciesError;

    fn try_from(raw: SpeciesEntryFile) -> Result<Self, Self::Error> {
        match (raw.atomic_number, raw.element) {
            (Some(z), None) => Ok(SpeciesEntry::new(raw.tag, z)),
            (None, Some(element)) => SpeciesEntry::from_element(raw.tag, &element),
            (Some(z), Some(element)) => {
                let entry = SpeciesEntry::from_element(raw.tag, &element)?;
                if entry.atomic_number != z {
                    return Err(SpeciesError::ElementMismatch {
                        tag: raw.tag,
                        element,
                        expected: entry.atomic_number,
                        given: z,
                    });
                }
                Ok(entry)
            }
            (None, None) => Err(SpeciesError::MissingAtomicNumber { tag: raw.tag }),
        }
    }
}

/// Caller-supplied species tagging for a structure whose source format
/// carries no (or untrusted) element information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesMap {
    entries: Vec<SpeciesEntry>,
    layout: SpeciesLayout,
}

impl SpeciesMap {
    pub fn new(entries: Vec<SpeciesEntry>, layout: SpeciesLayout) -> Result<Self, SpeciesError> {
        if entries.is_empty() {
            return Err(SpeciesError::Empty);
        }
        Ok(Self { entries, layout })
    }

    pub fn load(path: &Path) -> Result<Self, SpeciesError> {
        let content = std::fs::read_to_string(path).map_err(|e| SpeciesError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content).map_err(|e| match e {
            SpeciesError::Toml { source, .. } => SpeciesError::Toml {
                path: path.to_string_lossy().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, SpeciesError> {
        let raw: SpeciesMapFile = toml::from_str(content).map_err(|e| SpeciesError::Toml {
            path: "<inline>".to_string(),
            source: e,
        })?;
        let entries = raw
            .species
            .into_iter()
            .map(SpeciesEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries, raw.layout)
    }

    pub fn entries(&self) -> &[SpeciesEntry] {
        &self.entries
    }

    pub fn layout(&self) -> SpeciesLayout {
        self.layout
    }

    /// Checks that `multiplicity` is meaningful for this map's layout.
    pub fn check_multiplicity(&self, multiplicity: usize) -> Result<(), SpeciesError> {
        if self.layout == SpeciesLayout::Blocks && multiplicity != 1 {
            return Err(SpeciesError::MultiplicityNotApplicable(multiplicity));
        }
        Ok(())
    }

    /// Expands the map into one entry per atom.
    ///
    /// The result has exactly `species_counts.iter().sum()` elements, or the
    /// call fails with [`SpeciesError::Mismatch`].
    pub fn expand(
        &self,
        species_counts: &[usize],
        multiplicity: usize,
    ) -> Result<Vec<&SpeciesEntry>, SpeciesError> {
        self.check_multiplicity(multiplicity)?;
        let total = species_counts
            .iter()
            .fold(0usize, |total, &n| total.saturating_add(n));

        match self.layout {
            SpeciesLayout::Blocks => {
                if self.entries.len() != species_counts.len() {
                    return Err(SpeciesError::Mismatch {
                        expected: species_counts.len(),
                        found: self.entries.len(),
                        unit: "species blocks",
                    });
                }
                Ok(self
                    .entries
                    .iter()
                    .zip(species_counts)
                    .flat_map(|(entry, &count)| std::iter::repeat_n(entry, count))
                    .collect())
            }
            SpeciesLayout::Motif => {
                let product = self.entries.len().checked_mul(multiplicity);
                let Some(found) = product.filter(|&n| n == total) else {
                    return Err(SpeciesError::Mismatch {
                        expected: total,
                        found: product.unwrap_or(usize::MAX),
                        unit: "atoms",
                    });
                };
                Ok(self.entries.iter().cycle().take(found).collect())
            }
        }
    }
}
