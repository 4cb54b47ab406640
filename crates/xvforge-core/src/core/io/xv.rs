//! The SIESTA `.XV` structure format.
//!
//! The layout is a compatibility contract with the downstream reader: every
//! real field carries exactly [`PRECISION`] decimals and the separators below
//! are reproduced byte for byte. Velocities are not tracked, so each line ends
//! with a zero triple in their place.

use crate::core::io::token::{self, TokenError};
use crate::core::io::traits::{StructureReader, StructureWriter};
use crate::core::models::target::{AtomRecord, TargetStructure};
use nalgebra::{Point3, Vector3};
use std::io::{self, BufRead};
use thiserror::Error;

/// Decimal digits written for every real-valued field.
pub const PRECISION: usize = 9;

const LATTICE_SEPARATOR: &str = "        ";
const ATOM_LEAD: &str = "  ";
const ATOM_SEPARATOR: &str = "    ";

#[derive(Debug, Error)]
pub enum XvError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XvParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(&'static str),
    #[error("Atom block ends after {found} of {expected} atoms")]
    TruncatedAtoms { expected: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum XvParseErrorKind {
    #[error("Expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },
    #[error("Invalid real field: {0}")]
    InvalidReal(TokenError),
    #[error("Invalid integer field '{0}'")]
    InvalidInteger(String),
}

const RESERVE_LIMIT: usize = 4096;

#[derive(Debug, Clone, Copy, Default)]
pub struct XvFile;

fn zero_triple() -> String {
    (0..3)
        .map(|_| format!("{LATTICE_SEPARATOR}{:.*}", PRECISION, 0.0))
        .collect()
}

fn format_lattice_line(vector: &Vector3<f64>, zeros: &str) -> String {
    let mut line: String = vector
        .iter()
        .map(|c| format!("{LATTICE_SEPARATOR}{:.*}", PRECISION, c))
        .collect();
    line.push_str(LATTICE_SEPARATOR);
    line.push_str(zeros);
    line
}

fn format_atom_line(record: &AtomRecord, zeros: &str) -> String {
    let mut line = format!(
        "{ATOM_LEAD}{}{ATOM_SEPARATOR}{}{ATOM_SEPARATOR}",
        record.species_tag, record.atomic_number
    );
    for c in record.position_bohr.coords.iter() {
        line.push_str(&format!("{:.*}{ATOM_SEPARATOR}", PRECISION, c));
    }
    line.push_str(zeros);
    line
}

impl StructureWriter for XvFile {
    type Input = TargetStructure;
    type Error = XvError;

    fn render(&self, input: &Self::Input) -> String {
        let zeros = zero_triple();
        let mut out = String::new();
        for vector in input.lattice_vectors_bohr() {
            out.push_str(&format_lattice_line(vector, &zeros));
            out.push('\n');
        }
        out.push_str(&format!("{LATTICE_SEPARATOR}{}\n", input.atom_count()));
        for record in input.atom_records() {
            out.push_str(&format_atom_line(record, &zeros));
            out.push('\n');
        }
        out
    }
}

fn fields(line: &str, expected: usize, line_num: usize) -> Result<Vec<&str>, XvError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < expected {
        return Err(XvError::Parse {
            line: line_num,
            kind: XvParseErrorKind::TooFewFields {
                expected,
                found: fields.len(),
            },
        });
    }
    Ok(fields)
}

fn real(raw: &str, line_num: usize) -> Result<f64, XvError> {
    token::parse_number(raw).map_err(|e| XvError::Parse {
        line: line_num,
        kind: XvParseErrorKind::InvalidReal(e),
    })
}

fn integer<T: std::str::FromStr>(raw: &str, line_num: usize) -> Result<T, XvError> {
    raw.parse().map_err(|_| XvError::Parse {
        line: line_num,
        kind: XvParseErrorKind::InvalidInteger(raw.to_string()),
    })
}

impl StructureReader for XvFile {
    type Output = TargetStructure;
    type Error = XvError;

    fn read_from(&self, reader: &mut impl BufRead) -> Result<Self::Output, Self::Error> {
        let mut lines = reader.lines().enumerate().map(|(i, l)| (i + 1, l));

        let mut lattice = [Vector3::zeros(); 3];
        for vector in lattice.iter_mut() {
            let (line_num, line) = lines.next().ok_or(XvError::MissingRecord("lattice vector"))?;
            let line = line?;
            let f = fields(&line, 3, line_num)?;
            *vector = Vector3::new(
                real(f[0], line_num)?,
                real(f[1], line_num)?,
                real(f[2], line_num)?,
            );
        }

        let (line_num, line) = lines.next().ok_or(XvError::MissingRecord("atom count"))?;
        let line = line?;
        let count: usize = integer(fields(&line, 1, line_num)?[0], line_num)?;

        // The count line is untrusted; reserve no more than a typical cell needs.
        let mut records = Vec::with_capacity(count.min(RESERVE_LIMIT));
        while records.len() < count {
            let Some((line_num, line)) = lines.next() else {
                return Err(XvError::TruncatedAtoms {
                    expected: count,
                    found: records.len(),
                });
            };
            let line = line?;
            let f = fields(&line, 5, line_num)?;
            records.push(AtomRecord {
                species_tag: integer(f[0], line_num)?,
                atomic_number: integer(f[1], line_num)?,
                position_bohr: Point3::new(
                    real(f[2], line_num)?,
                    real(f[3], line_num)?,
                    real(f[4], line_num)?,
                ),
            });
        }

        Ok(TargetStructure::new(lattice, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const ZEROS: &str = "        0.000000000        0.000000000        0.000000000";

    fn cubic_lead() -> TargetStructure {
        let a = 4.0 / 0.529177;
        TargetStructure::new(
            [
                Vector3::new(a, 0.0, 0.0),
                Vector3::new(0.0, a, 0.0),
                Vector3::new(0.0, 0.0, a),
            ],
            vec![AtomRecord {
                species_tag: 1,
                atomic_number: 82,
                position_bohr: Point3::new(a / 2.0, a / 2.0, a / 2.0),
            }],
        )
    }

    #[test]
    fn render_matches_reference_layout() {
        let text = XvFile.render(&cubic_lead());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0],
            format!("        7.558907511        0.000000000        0.000000000        {ZEROS}")
        );
        assert_eq!(
            lines[2],
            format!("        0.000000000        0.000000000        7.558907511        {ZEROS}")
        );
        assert_eq!(lines[3], "        1");
        assert_eq!(
            lines[4],
            format!("  1    82    3.779453756    3.779453756    3.779453756    {ZEROS}")
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn every_real_field_has_nine_decimals() {
        let text = XvFile.render(&cubic_lead());
        for line in text.lines() {
            for field in line.split_whitespace().filter(|f| f.contains('.')) {
                let decimals = field.split('.').nth(1).unwrap();
                assert_eq!(decimals.len(), PRECISION, "field {field}");
            }
        }
    }

    #[test]
    fn negative_components_keep_separators() {
        let target = TargetStructure::new(
            [Vector3::new(-1.0, 0.0, 0.0), Vector3::y(), Vector3::z()],
            vec![],
        );
        let text = XvFile.render(&target);
        assert!(text.starts_with("        -1.000000000        0.000000000"));
        assert_eq!(text.lines().nth(3), Some("        0"));
    }

    #[test]
    fn read_recovers_written_values() {
        let original = cubic_lead();
        let text = XvFile.render(&original);
        let parsed = XvFile.read_from(&mut Cursor::new(text)).unwrap();

        assert_eq!(parsed.atom_count(), 1);
        for (a, b) in parsed
            .lattice_vectors_bohr()
            .iter()
            .zip(original.lattice_vectors_bohr())
        {
            assert!((a - b).norm() < 1e-9);
        }
        let (a, b) = (&parsed.atom_records()[0], &original.atom_records()[0]);
        assert_eq!((a.species_tag, a.atomic_number), (1, 82));
        assert!((a.position_bohr - b.position_bohr).norm() < 1e-9);
    }

    #[test]
    fn read_rejects_truncated_atom_block() {
        let text = XvFile.render(&cubic_lead()).replace("        1\n", "        2\n");
        assert!(matches!(
            XvFile.read_from(&mut Cursor::new(text)),
            Err(XvError::TruncatedAtoms {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn read_survives_absurd_atom_count() {
        let text = XvFile
            .render(&cubic_lead())
            .replace("        1\n", "        100000000000000000\n");
        assert!(matches!(
            XvFile.read_from(&mut Cursor::new(text)),
            Err(XvError::TruncatedAtoms {
                expected: 100000000000000000,
                found: 1
            })
        ));
    }

    #[test]
    fn read_rejects_non_integer_atomic_number() {
        let text = XvFile.render(&cubic_lead()).replace("  1    82", "  1    Pb");
        assert!(matches!(
            XvFile.read_from(&mut Cursor::new(text)),
            Err(XvError::Parse {
                line: 5,
                kind: XvParseErrorKind::InvalidInteger(_),
            })
        ));
    }

    #[test]
    fn write_to_emits_rendered_document() {
        let mut sink = Vec::new();
        XvFile.write_to(&cubic_lead(), &mut sink).unwrap();
        assert_eq!(String::from_utf8(sink).unwrap(), XvFile.render(&cubic_lead()));
    }
}
