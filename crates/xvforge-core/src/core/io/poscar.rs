use crate::core::io::token::{self, Token, TokenError};
use crate::core::io::traits::StructureReader;
use crate::core::models::structure::{CoordinateMode, ScalingFactor, StructureError, StructureFile};
use nalgebra::{Point3, Vector3};
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

/// Zero-based line offsets of the fixed POSCAR header.
///
/// The species line may hold element labels (VASP 5) or the counts themselves
/// (VASP 4); everything after the counts is located relative to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoscarLayout {
    pub scale_line: usize,
    pub lattice_start: usize,
    pub species_line: usize,
}

impl PoscarLayout {
    pub const SCALE_LINE: usize = 1;
    pub const LATTICE_START: usize = 2;
    pub const SPECIES_LINE: usize = 5;
}

impl Default for PoscarLayout {
    fn default() -> Self {
        Self {
            scale_line: Self::SCALE_LINE,
            lattice_start: Self::LATTICE_START,
            species_line: Self::SPECIES_LINE,
        }
    }
}

#[derive(Debug, Error)]
pub enum PoscarError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PoscarParseErrorKind,
    },
    #[error("Missing required record: {0}")]
    MissingRecord(&'static str),
    #[error("Coordinate block ends after {found} of {expected} atoms")]
    TruncatedCoordinates { expected: usize, found: usize },
    #[error("Inconsistent data: {0}")]
    Inconsistency(#[from] StructureError),
}

#[derive(Debug, Error)]
pub enum PoscarParseErrorKind {
    #[error("Invalid scaling factor: {0}")]
    InvalidScalingFactor(TokenError),
    #[error("Scaling factor must have 1 or 3 values, found {0}")]
    ScalingFactorArity(usize),
    #[error("Scaling factor must be positive, found {0}")]
    NonPositiveScalingFactor(f64),
    #[error("Lattice vector needs 3 numeric components, found {found}")]
    InvalidLatticeVector { found: usize },
    #[error("Invalid species count: {0}")]
    InvalidCount(TokenError),
    #[error("Species counts add up to more atoms than can be addressed")]
    CountOverflow,
    #[error("Unrecognized coordinate mode line '{0}' (expected Direct or Cartesian)")]
    UnknownCoordinateMode(String),
    #[error("Coordinate record needs 3 leading numeric values, found {found}")]
    InvalidCoordinate { found: usize },
}

/// Reader for VASP POSCAR/CONTCAR documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoscarFile {
    layout: PoscarLayout,
}

impl PoscarFile {
    pub fn new(layout: PoscarLayout) -> Self {
        Self { layout }
    }
}

fn line_at<'a>(lines: &'a [String], index: usize, record: &'static str) -> Result<&'a str, PoscarError> {
    lines
        .get(index)
        .map(String::as_str)
        .ok_or(PoscarError::MissingRecord(record))
}

fn parse_scaling_factor(line: &str, line_num: usize) -> Result<ScalingFactor, PoscarError> {
    let parse_err = |kind| PoscarError::Parse {
        line: line_num,
        kind,
    };
    let values = line
        .split_whitespace()
        .map(token::parse_number)
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|e| parse_err(PoscarParseErrorKind::InvalidScalingFactor(e)))?;

    let factor = match values.as_slice() {
        [s] => ScalingFactor::Uniform(*s),
        [x, y, z] => ScalingFactor::PerAxis([*x, *y, *z]),
        other => return Err(parse_err(PoscarParseErrorKind::ScalingFactorArity(other.len()))),
    };
    if let Some(bad) = (0..3).map(|axis| factor.axis(axis)).find(|s| *s <= 0.0) {
        return Err(parse_err(PoscarParseErrorKind::NonPositiveScalingFactor(bad)));
    }
    Ok(factor)
}

/// Reads the leading three numeric tokens of a line; trailing tokens are ignored.
fn leading_triple(line: &str) -> Result<[f64; 3], usize> {
    let values: Vec<f64> = line
        .split_whitespace()
        .take(3)
        .map_while(|raw| Token::classify(raw).as_number())
        .collect();
    match values.as_slice() {
        [x, y, z] => Ok([*x, *y, *z]),
        other => Err(other.len()),
    }
}

fn parse_coordinate_mode(line: &str, line_num: usize) -> Result<CoordinateMode, PoscarError> {
    let trimmed = line.trim();
    match trimmed.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('d') => Ok(CoordinateMode::Direct),
        Some('c') | Some('k') => Ok(CoordinateMode::Cartesian),
        _ => Err(PoscarError::Parse {
            line: line_num,
            kind: PoscarParseErrorKind::UnknownCoordinateMode(trimmed.to_string()),
        }),
    }
}

fn is_selective_dynamics(line: &str) -> bool {
    line.trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.eq_ignore_ascii_case(&'s'))
}

impl StructureReader for PoscarFile {
    type Output = StructureFile;
    type Error = PoscarError;

    fn read_from(&self, reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        let lines = reader.lines().collect::<Result<Vec<String>, _>>()?;
        let layout = &self.layout;

        let comment = lines.first().map(|l| l.trim().to_string()).unwrap_or_default();

        let scale_line = line_at(&lines, layout.scale_line, "scaling factor")?;
        let scaling_factor = parse_scaling_factor(scale_line, layout.scale_line + 1)?;

        let mut lattice_vectors = [Vector3::zeros(); 3];
        for (i, vector) in lattice_vectors.iter_mut().enumerate() {
            let index = layout.lattice_start + i;
            let line = line_at(&lines, index, "lattice vector")?;
            let [x, y, z] = leading_triple(line).map_err(|found| PoscarError::Parse {
                line: index + 1,
                kind: PoscarParseErrorKind::InvalidLatticeVector { found },
            })?;
            *vector = Vector3::new(x, y, z);
        }

        let species_line = line_at(&lines, layout.species_line, "species counts")?;
        let species_tokens = token::tokenize(species_line);
        let (species_labels, counts_index) = match species_tokens.first() {
            None => return Err(PoscarError::MissingRecord("species counts")),
            Some(first) if first.is_numeric() => (None, layout.species_line),
            Some(_) => {
                let labels = species_line.split_whitespace().map(str::to_string).collect();
                (Some(labels), layout.species_line + 1)
            }
        };

        let counts_line = line_at(&lines, counts_index, "species counts")?;
        let species_counts = counts_line
            .split_whitespace()
            .map(token::parse_count)
            .collect::<Result<Vec<usize>, _>>()
            .map_err(|e| PoscarError::Parse {
                line: counts_index + 1,
                kind: PoscarParseErrorKind::InvalidCount(e),
            })?;
        if species_counts.is_empty() {
            return Err(PoscarError::MissingRecord("species counts"));
        }

        let mut cursor = counts_index + 1;
        let selective_dynamics = lines.get(cursor).is_some_and(|l| is_selective_dynamics(l));
        if selective_dynamics {
            cursor += 1;
        }

        let mode_line = line_at(&lines, cursor, "coordinate mode line")?;
        let coordinate_mode = parse_coordinate_mode(mode_line, cursor + 1)?;
        cursor += 1;

        let expected = species_counts
            .iter()
            .try_fold(0usize, |total, &n| total.checked_add(n))
            .ok_or(PoscarError::Parse {
                line: counts_index + 1,
                kind: PoscarParseErrorKind::CountOverflow,
            })?;
        let available = lines.len().saturating_sub(cursor);
        let mut coordinates = Vec::with_capacity(expected.min(available));
        for index in cursor..cursor.saturating_add(expected) {
            let line = lines.get(index).ok_or(PoscarError::TruncatedCoordinates {
                expected,
                found: coordinates.len(),
            })?;
            let [x, y, z] = leading_triple(line).map_err(|found| PoscarError::Parse {
                line: index + 1,
                kind: PoscarParseErrorKind::InvalidCoordinate { found },
            })?;
            coordinates.push(Point3::new(x, y, z));
        }

        debug!(
            "Parsed POSCAR '{}': {} species, {} atoms, {:?} coordinates{}",
            comment,
            species_counts.len(),
            expected,
            coordinate_mode,
            if selective_dynamics {
                ", selective dynamics"
            } else {
                ""
            }
        );

        Ok(StructureFile::new(
            comment,
            scaling_factor,
            lattice_vectors,
            species_labels,
            species_counts,
            coordinate_mode,
            selective_dynamics,
            coordinates,
        )?)
    }
}
