use thiserror::Error;
use xvforge::core::models::species::SpeciesEntry;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid species format for '{0}'. Expected 'TAG:Z' or 'TAG:SYMBOL' (e.g., '1:82' or '1:Pb').")]
    InvalidSpeciesFormat(String),

    #[error("Invalid species tag '{tag}' in '{name}'. Expected a positive integer.")]
    InvalidTag { tag: String, name: String },

    #[error("Unknown element '{element}' in '{name}'.")]
    UnknownElement { element: String, name: String },

    #[error("Component '{component}' cannot be empty in species entry '{name}'.")]
    EmptyComponent {
        component: &'static str,
        name: String,
    },
}

/// Parses one inline species entry: `TAG:Z` or `TAG:SYMBOL`.
pub fn parse_species_entry(name: &str) -> Result<SpeciesEntry, ParseError> {
    let (tag, identity) = name
        .split_once(':')
        .ok_or_else(|| ParseError::InvalidSpeciesFormat(name.to_string()))?;
    let (tag, identity) = (tag.trim(), identity.trim());

    if tag.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "tag",
            name: name.to_string(),
        });
    }
    if identity.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "element",
            name: name.to_string(),
        });
    }

    let tag: u32 = match tag.parse() {
        Ok(t) if t > 0 => t,
        _ => {
            return Err(ParseError::InvalidTag {
                tag: tag.to_string(),
                name: name.to_string(),
            });
        }
    };

    if identity.bytes().all(|b| b.is_ascii_digit()) {
        let z = identity
            .parse()
            .map_err(|_| ParseError::InvalidSpeciesFormat(name.to_string()))?;
        return Ok(SpeciesEntry::new(tag, z));
    }

    SpeciesEntry::from_element(tag, identity).map_err(|_| ParseError::UnknownElement {
        element: identity.to_string(),
        name: name.to_string(),
    })
}

pub fn parse_species_list(names: &[String]) -> Result<Vec<SpeciesEntry>, ParseError> {
    names.iter().map(|n| parse_species_entry(n)).collect()
}
