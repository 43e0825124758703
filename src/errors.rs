//! Error types for importing and aggregating community data.

use thiserror::Error;

use crate::uc::RecordKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed {kind} record in {origin} at line {line_no}: {source}\n  line: \"{line}\"")]
    Format {
        origin: String,
        line_no: usize,
        line: String,
        kind: RecordKind,
        source: FormatError,
    },

    #[error("OTU \"{otu}\" from the {kind} file {origin} (line {line_no}) does not exist in the OTUs\n  line: \"{line}\"")]
    ReferentialIntegrity {
        origin: String,
        line_no: usize,
        line: String,
        kind: RecordKind,
        otu: String,
    },

    #[error("OTU \"{otu}\" already has reference \"{existing}\", refusing to replace it with \"{replacement}\" ({origin}, line {line_no})")]
    DuplicateReference {
        origin: String,
        line_no: usize,
        otu: String,
        existing: String,
        replacement: String,
    },

    #[error("Could not classify read \"{read}\" of OTU \"{otu}\": {source}")]
    Classify {
        otu: String,
        read: String,
        source: FormatError,
    },

    #[error("Sample type is already set to \"{current}\", cannot change it to \"{requested}\"")]
    SampleTypeLocked { current: String, requested: String },

    #[error("Sample type must be set before reads can be classified into samples")]
    SampleTypeUnset,

    #[error("Unknown sample type \"{0}\", expected \"by plot\" or \"by subplot\"")]
    UnknownSampleType(String),

    #[error("Cannot rarefy to depth {depth}: {reason}")]
    Rarefaction { depth: usize, reason: &'static str },

    #[error("Error parsing config from {origin}: {source}")]
    Config {
        origin: String,
        source: Box<serde_yaml::Error>,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Error reading or writing file \"{file}\": {source}")]
    FileIo {
        file: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Error reading or writing bytes: {0}")]
    BytesIo(Box<dyn std::error::Error + Send + Sync>),
}

/// Problems with the content of a single line or label.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("expected at least {min} columns but found {found}")]
    TooFewFields { found: usize, min: usize },

    #[error("missing column {column} required for the {field} field")]
    MissingColumn { column: usize, field: &'static str },

    #[error("invalid identity score \"{value}\"")]
    InvalidIdentity { value: String },

    #[error("label \"{label}\" does not contain a sample {sample_type}")]
    UnrecognizedLabel { label: String, sample_type: String },
}
