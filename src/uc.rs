//! Parsing of clustering records (usearch `.uc` output and reduced layouts of it).

use std::fmt;

use memchr::memchr_iter;
use serde::Deserialize;

use crate::errors::FormatError;

pub const COLUMN_SEPARATOR: u8 = b'\t';

/// Record type token of a read that was assigned to a cluster.
pub const HIT: &str = "H";

/// Identity columns holding this value carry no score.
pub const NO_IDENTITY: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Read id to OTU name.
    Mapping,
    /// OTU name to reference sequence id.
    Reference,
}

impl RecordKind {
    pub fn min_fields(&self) -> usize {
        match self {
            RecordKind::Mapping => 2,
            RecordKind::Reference => 3,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Mapping => write!(f, "OTU mapping"),
            RecordKind::Reference => write!(f, "reference mapping"),
        }
    }
}

/// Column positions of the fields a record kind consumes.
///
/// If `record_type` is `None`, every line is treated as a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnLayout {
    #[serde(default)]
    pub record_type: Option<usize>,
    pub query: usize,
    pub target: usize,
    #[serde(default)]
    pub identity: Option<usize>,
}

impl ColumnLayout {
    /// `H <read id> <OTU name>`
    pub const fn mapping() -> Self {
        Self {
            record_type: Some(0),
            query: 1,
            target: 2,
            identity: None,
        }
    }

    /// `<identity> <OTU name> <reference id>`
    pub const fn reference() -> Self {
        Self {
            record_type: None,
            query: 1,
            target: 2,
            identity: Some(0),
        }
    }

    /// The ten column usearch layout, with the read as query and the OTU as target.
    pub const fn usearch_mapping() -> Self {
        Self {
            record_type: Some(0),
            query: 8,
            target: 9,
            identity: Some(3),
        }
    }

    /// The ten column usearch layout, with the OTU as query and the reference as target.
    pub const fn usearch_reference() -> Self {
        Self::usearch_mapping()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record<'a> {
    Hit(Hit<'a>),
    /// Any other record type (no hit, cluster summary, ...), holding its type token.
    Other(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hit<'a> {
    pub query: &'a str,
    pub target: &'a str,
    pub identity: Option<f64>,
}

/// Split a line into columns, keeping empty fields including trailing ones.
pub fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;

    for i in memchr_iter(COLUMN_SEPARATOR, line.as_bytes()) {
        fields.push(&line[start..i]);
        start = i + 1;
    }

    fields.push(&line[start..]);
    fields
}

/// Parse one line into a record using the given layout.
pub fn parse_record<'a>(
    line: &'a str,
    kind: RecordKind,
    layout: &ColumnLayout,
) -> Result<Record<'a>, FormatError> {
    let fields = split_fields(line);

    if fields.len() < kind.min_fields() {
        return Err(FormatError::TooFewFields {
            found: fields.len(),
            min: kind.min_fields(),
        });
    }

    if let Some(col) = layout.record_type {
        let record_type = fields.get(col).copied().unwrap_or("");
        if record_type != HIT {
            return Ok(Record::Other(record_type));
        }
    }

    let query = column(&fields, layout.query, "query")?;
    let target = column(&fields, layout.target, "target")?;
    let identity = match layout.identity {
        Some(col) => parse_identity(column(&fields, col, "identity")?)?,
        None => None,
    };

    Ok(Record::Hit(Hit {
        query,
        target,
        identity,
    }))
}

fn column<'a>(fields: &[&'a str], column: usize, field: &'static str) -> Result<&'a str, FormatError> {
    fields
        .get(column)
        .copied()
        .ok_or(FormatError::MissingColumn { column, field })
}

fn parse_identity(value: &str) -> Result<Option<f64>, FormatError> {
    let value = value.trim();

    if value.is_empty() || value == NO_IDENTITY {
        return Ok(None);
    }

    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| FormatError::InvalidIdentity {
            value: value.to_owned(),
        })
}
