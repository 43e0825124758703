use log::{debug, info, warn};

use crate::community::*;
use crate::config::ReferencePolicy;
use crate::errors::*;
use crate::importer::*;
use crate::naming::Named;
use crate::uc::*;

impl CommunityImporter {
    /// Link OTUs to reference sequences from reference mapping records.
    ///
    /// Every hit must name an OTU that already exists.
    pub fn import_reference_mapping(&self, references: Input, otus: &mut Otus) -> Result<ImportStats> {
        const KIND: RecordKind = RecordKind::Reference;

        let (mut lines, origin) = references.lines();
        info!("Import reference sequence mapping (to OTU) from {origin}");

        let mut stats = ImportStats::default();

        while let Some((line_no, line)) = lines.next_line()? {
            stats.lines += 1;

            let record = parse_record(line, KIND, &self.config.reference_layout).map_err(|source| {
                Error::Format {
                    origin: origin.to_string(),
                    line_no,
                    line: line.to_owned(),
                    kind: KIND,
                    source,
                }
            })?;

            let hit = match record {
                Record::Hit(hit) => hit,
                Record::Other(record_type) => {
                    debug!("Skip record of type \"{record_type}\" at line {line_no}");
                    stats.skipped += 1;
                    continue;
                }
            };
            stats.hits += 1;

            let otu_name = self.otu_name(hit.query);
            let otu = otus
                .get_otu_mut(&otu_name)
                .ok_or_else(|| Error::ReferentialIntegrity {
                    origin: origin.to_string(),
                    line_no,
                    line: line.to_owned(),
                    kind: KIND,
                    otu: otu_name.to_string(),
                })?;

            if let Some(existing) = otu.reference() {
                match self.config.reference_policy {
                    ReferencePolicy::Replace => {
                        warn!(
                            "Replace reference \"{}\" of OTU \"{}\" with \"{}\" (line {line_no})",
                            existing.target_id(),
                            otu.name(),
                            hit.target
                        );
                    }
                    ReferencePolicy::Reject => {
                        return Err(Error::DuplicateReference {
                            origin: origin.to_string(),
                            line_no,
                            otu: otu.name().to_owned(),
                            existing: existing.target_id().to_owned(),
                            replacement: hit.target.to_owned(),
                        });
                    }
                }
            }

            let reference = Reference::new(otu.name(), hit.target, hit.identity);
            otu.attach_reference(reference);
            stats.references += 1;
        }

        info!("Mapped {} OTUs to reference sequences", stats.references);
        Ok(stats)
    }
}
