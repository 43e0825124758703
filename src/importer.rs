//! Import passes that build OTUs and communities from clustering output.
//!
//! A community is usually built in three passes over three files:
//! 1. the representative sequences (fasta), whose headers name the OTUs,
//! 2. the OTU mapping records, assigning each read to an OTU,
//! 3. optionally, the reference mapping records, linking OTUs to reference sequences.
//!
//! Each pass reads its input once from top to bottom and stops at the first malformed line
//! or dangling OTU name. An OTU collection that failed to import should be discarded.

mod input;
pub use input::*;

mod seed_import;

mod mapping_import;

mod reference_import;

use std::borrow::Cow;

use log::info;

use crate::community::*;
use crate::config::ImportConfig;
use crate::diversity;
use crate::errors::*;
use crate::sample::strip_size_annotation;

/// Counts of what one import pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub lines: usize,
    pub hits: usize,
    /// Records of types other than hits, or non-header lines of an OTU file.
    pub skipped: usize,
    pub created_otus: usize,
    pub attached_reads: usize,
    pub references: usize,
}

/// Runs import passes with an explicit configuration.
#[derive(Debug, Clone, Default)]
pub struct CommunityImporter {
    config: ImportConfig,
}

impl CommunityImporter {
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Build a community from OTU sequences, OTU mapping records and reference mapping records.
    ///
    /// Without OTU sequences, all OTUs are created from the mapping records, which requires
    /// `can_create_otu`.
    pub fn build_community<'a>(
        &self,
        otus: Option<Input<'a>>,
        mapping: Input<'a>,
        references: Option<Input<'a>>,
    ) -> Result<Community> {
        let mut community =
            Community::with_separators(self.config.sample_separator, self.config.subplot_separator);

        if let Some(otus) = otus {
            self.import_otus(otus, community.otus_mut())?;
        } else if !self.config.can_create_otu {
            return Err(Error::InvalidConfig(
                "OTU sequences are required when can_create_otu is disabled".to_owned(),
            ));
        }

        self.import_community_mapping(mapping, &mut community)?;

        if let Some(references) = references {
            self.import_reference_mapping(references, community.otus_mut())?;
        }

        info!(
            "Community has {} OTUs, {} reads and {} samples",
            community.otus().len(),
            community.otus().total_reads(),
            community.samples().len()
        );

        Ok(community)
    }

    /// Map reads to the OTUs of a community, recording the sample of each read.
    ///
    /// The sample type of the community is set from the config unless it is already set.
    /// The diversity of the community is aggregated once all reads are mapped.
    pub fn import_community_mapping(&self, mapping: Input, community: &mut Community) -> Result<ImportStats> {
        if community.sample_type().is_none() {
            community.set_sample_type(self.config.sample_type)?;
        }
        if let Some(sample_type) = community.sample_type() {
            info!("Set sample type: {sample_type}");
        }

        let stats = {
            let (otus, tracker) = community.mapping_parts()?;
            self.import_mapping_with(mapping, otus, Some(tracker))?
        };

        diversity::aggregate(community)?;
        Ok(stats)
    }

    /// The name an OTU is stored under.
    fn otu_name<'n>(&self, name: &'n str) -> Cow<'n, str> {
        if self.config.strip_size_annotation {
            strip_size_annotation(name)
        } else {
            Cow::Borrowed(name)
        }
    }
}
