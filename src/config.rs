//! Import configuration, usually read from a YAML file.
//!
//! ```yaml
//! sample_type: by subplot
//! can_create_otu: false
//! reference_policy: reject
//! mapping_layout:
//!   record_type: 0
//!   query: 8
//!   target: 9
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::errors::*;
use crate::sample::*;
use crate::uc::ColumnLayout;

/// What to do when a second reference is mapped to an OTU that already has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferencePolicy {
    /// The last reference wins.
    #[default]
    Replace,
    /// Fail the import.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    pub sample_type: SampleType,
    pub sample_separator: char,
    pub subplot_separator: char,
    /// Create OTUs named in the mapping file that are missing from the OTUs.
    pub can_create_otu: bool,
    pub reference_policy: ReferencePolicy,
    /// Treat `OTU1;size=12;` and `OTU1` as the same OTU.
    pub strip_size_annotation: bool,
    pub mapping_layout: ColumnLayout,
    pub reference_layout: ColumnLayout,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            sample_type: SampleType::ByPlot,
            sample_separator: SAMPLE_SEPARATOR,
            subplot_separator: SUBPLOT_SEPARATOR,
            can_create_otu: true,
            reference_policy: ReferencePolicy::Replace,
            strip_size_annotation: false,
            mapping_layout: ColumnLayout::mapping(),
            reference_layout: ColumnLayout::reference(),
        }
    }
}

impl ImportConfig {
    /// Parse and validate a YAML config.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Self::parse(yaml, "string")
    }

    /// Read and validate a config file.
    pub fn from_yaml_file(file: impl AsRef<Path>) -> Result<Self> {
        let path = file.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| Error::FileIo {
            file: path.display().to_string(),
            source: Box::new(e),
        })?;

        Self::parse(&contents, &format!("file \"{}\"", path.display()))
    }

    fn parse(yaml: &str, origin: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| Error::Config {
            origin: origin.to_owned(),
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_separator == self.subplot_separator {
            return Err(Error::InvalidConfig(format!(
                "sample and subplot separators are both '{}'",
                self.sample_separator
            )));
        }

        for (name, layout) in [
            ("mapping_layout", &self.mapping_layout),
            ("reference_layout", &self.reference_layout),
        ] {
            if layout.query == layout.target {
                return Err(Error::InvalidConfig(format!(
                    "{name} uses column {} for both query and target",
                    layout.query
                )));
            }
        }

        Ok(())
    }
}
