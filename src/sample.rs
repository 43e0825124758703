//! Classification of read labels into samples.
//!
//! Read labels carry the sample they were sequenced from after the last sample separator,
//! e.g. `IDME8NM01EIUH4|45-S4` was read from plot `45`, subplot `S4`. Depending on the
//! [`SampleType`] of a community, that read belongs to sample `45` or `45-S4`.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::errors::*;

pub const BY_PLOT: &str = "by plot";
pub const BY_SUBPLOT: &str = "by subplot";

pub const SAMPLE_SEPARATOR: char = '|';
pub const SUBPLOT_SEPARATOR: char = '-';

lazy_static! {
    static ref SIZE_ANNOTATION: Regex = Regex::new(r";?size=\d+;?$").unwrap();
    static ref DEFAULT_LABEL: Regex = label_regex(SAMPLE_SEPARATOR, SUBPLOT_SEPARATOR);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum SampleType {
    #[default]
    #[serde(rename = "by plot")]
    ByPlot,
    #[serde(rename = "by subplot")]
    BySubplot,
}

impl SampleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleType::ByPlot => BY_PLOT,
            SampleType::BySubplot => BY_SUBPLOT,
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            BY_PLOT => Ok(SampleType::ByPlot),
            BY_SUBPLOT => Ok(SampleType::BySubplot),
            _ => Err(Error::UnknownSampleType(s.to_owned())),
        }
    }
}

/// Extracts the sample of a read label according to a sample type.
#[derive(Debug, Clone)]
pub struct SampleClassifier {
    sample_type: SampleType,
    pattern: Regex,
}

impl SampleClassifier {
    /// Classifier using the default `|` and `-` separators.
    pub fn new(sample_type: SampleType) -> Self {
        Self {
            sample_type,
            pattern: DEFAULT_LABEL.clone(),
        }
    }

    pub fn with_separators(
        sample_type: SampleType,
        sample_separator: char,
        subplot_separator: char,
    ) -> Self {
        Self {
            sample_type,
            pattern: label_regex(sample_separator, subplot_separator),
        }
    }

    pub fn sample_type(&self) -> SampleType {
        self.sample_type
    }

    pub fn classify(&self, label: &str) -> std::result::Result<String, FormatError> {
        classify_with(&self.pattern, self.sample_type, label)
    }
}

/// Classify a label with the default separators.
pub fn classify(sample_type: SampleType, label: &str) -> std::result::Result<String, FormatError> {
    classify_with(&DEFAULT_LABEL, sample_type, label)
}

fn classify_with(
    pattern: &Regex,
    sample_type: SampleType,
    label: &str,
) -> std::result::Result<String, FormatError> {
    let stripped = strip_size_annotation(label.trim());

    let unrecognized = || FormatError::UnrecognizedLabel {
        label: label.to_owned(),
        sample_type: sample_type.to_string(),
    };

    let caps = pattern.captures(&stripped).ok_or_else(unrecognized)?;

    match sample_type {
        SampleType::ByPlot => Ok(caps["plot"].to_owned()),
        SampleType::BySubplot => {
            if caps.name("subplot").is_none() {
                return Err(unrecognized());
            }
            Ok(caps["sample"].to_owned())
        }
    }
}

/// Remove a trailing usearch abundance annotation such as `;size=12;` from a name.
pub fn strip_size_annotation(name: &str) -> Cow<'_, str> {
    SIZE_ANNOTATION.replace(name, "")
}

fn label_regex(sample_separator: char, subplot_separator: char) -> Regex {
    let s = regex::escape(&sample_separator.to_string());
    let p = regex::escape(&subplot_separator.to_string());

    // the sample follows the last sample separator
    Regex::new(&format!(
        r"^.+{s}(?P<sample>(?P<plot>[^{s}{p}]+)(?:{p}(?P<subplot>[^{s}]+))?)$"
    ))
    .unwrap_or_else(|e| panic!("Invalid label pattern: {e}"))
}
