use log::{debug, info};

use crate::community::*;
use crate::errors::*;
use crate::importer::*;
use crate::uc::*;

impl CommunityImporter {
    /// Assign reads to OTUs from OTU mapping records, without tracking samples.
    pub fn import_mapping(&self, mapping: Input, otus: &mut Otus) -> Result<ImportStats> {
        self.import_mapping_with(mapping, otus, None)
    }

    /// Assign reads to OTUs from OTU mapping records.
    ///
    /// Only hit records are used. A hit naming an OTU that does not exist is an error unless
    /// `can_create_otu` is set, in which case the OTU is created. If a `tracker` is given,
    /// the label of every mapped read is classified into a sample.
    pub fn import_mapping_with(
        &self,
        mapping: Input,
        otus: &mut Otus,
        mut tracker: Option<SampleTracker>,
    ) -> Result<ImportStats> {
        const KIND: RecordKind = RecordKind::Mapping;

        let (mut lines, origin) = mapping.lines();
        info!("Import OTUs and OTU mapping from {origin}");

        let mut stats = ImportStats::default();

        while let Some((line_no, line)) = lines.next_line()? {
            stats.lines += 1;

            let format_error = |source| Error::Format {
                origin: origin.to_string(),
                line_no,
                line: line.to_owned(),
                kind: KIND,
                source,
            };

            let hit = match parse_record(line, KIND, &self.config.mapping_layout).map_err(format_error)? {
                Record::Hit(hit) => hit,
                Record::Other(record_type) => {
                    debug!("Skip record of type \"{record_type}\" at line {line_no}");
                    stats.skipped += 1;
                    continue;
                }
            };
            stats.hits += 1;

            let sample = match tracker.as_ref() {
                Some(tracker) => Some(tracker.classify(hit.query).map_err(format_error)?),
                None => None,
            };

            let otu_name = self.otu_name(hit.target);

            if !otus.contains_otu(&otu_name) {
                if !self.config.can_create_otu {
                    return Err(Error::ReferentialIntegrity {
                        origin: origin.to_string(),
                        line_no,
                        line: line.to_owned(),
                        kind: KIND,
                        otu: otu_name.into_owned(),
                    });
                }
                stats.created_otus += 1;
            }

            if !otus.add_unique_otu(&otu_name).attach_read(hit.query) {
                continue;
            }
            stats.attached_reads += 1;

            if let (Some(tracker), Some(sample)) = (tracker.as_mut(), sample) {
                tracker.record(&sample);
            }
        }

        info!(
            "Mapped {} reads from {} hits to {} OTUs ({} new)",
            stats.attached_reads,
            stats.hits,
            otus.len(),
            stats.created_otus
        );
        Ok(stats)
    }
}
