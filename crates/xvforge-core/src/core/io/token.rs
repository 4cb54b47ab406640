use thiserror::Error;

/// A single whitespace-separated field of a structure file line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
    /// A field that parsed completely as a finite floating-point value.
    Numeric(f64),
    /// Anything else, kept verbatim (element labels, markers, flags).
    Tag(&'a str),
}

impl<'a> Token<'a> {
    /// Classifies a raw field by attempting a full numeric parse.
    pub fn classify(raw: &'a str) -> Self {
        match parse_number(raw) {
            Ok(value) => Token::Numeric(value),
            Err(_) => Token::Tag(raw),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Token::Numeric(v) => Some(*v),
            Token::Tag(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Token::Numeric(_))
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TokenError {
    #[error("'{0}' is not a number")]
    NotNumeric(String),
    #[error("'{0}' is not a finite number")]
    NonFinite(String),
    #[error("'{0}' is not a non-negative integer")]
    NotCount(String),
}

/// Parses a field as a finite `f64`.
///
/// The whole token must be consumed by the parser, so partial matches such as
/// `"..."`, `"e-"` or `"1.2.3"` are rejected rather than coerced.
pub fn parse_number(raw: &str) -> Result<f64, TokenError> {
    let value: f64 = raw
        .parse()
        .map_err(|_| TokenError::NotNumeric(raw.to_string()))?;
    if !value.is_finite() {
        return Err(TokenError::NonFinite(raw.to_string()));
    }
    Ok(value)
}

/// Parses a field as an atom count.
pub fn parse_count(raw: &str) -> Result<usize, TokenError> {
    raw.parse()
        .map_err(|_| TokenError::NotCount(raw.to_string()))
}

/// Splits a line into classified tokens.
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    line.split_whitespace().map(Token::classify).collect()
}
