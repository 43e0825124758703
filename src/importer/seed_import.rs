use log::{debug, info, warn};

use crate::community::*;
use crate::errors::*;
use crate::importer::*;

/// Start of a header line in a fasta file.
pub const HEADER_PREFIX: char = '>';

impl CommunityImporter {
    /// Create an OTU for every header of a fasta file of representative sequences.
    ///
    /// The OTU is named by the rest of the header line after `>`. All other lines are
    /// ignored, so sequences are not stored and headers without a sequence are fine.
    pub fn import_otus(&self, otus_fasta: Input, otus: &mut Otus) -> Result<ImportStats> {
        let (mut lines, origin) = otus_fasta.lines();
        info!("Import OTUs from {origin}");

        let mut stats = ImportStats::default();

        while let Some((line_no, line)) = lines.next_line()? {
            stats.lines += 1;

            let Some(header) = line.strip_prefix(HEADER_PREFIX) else {
                stats.skipped += 1;
                continue;
            };
            stats.hits += 1;

            let name = self.otu_name(header.trim());
            if name.is_empty() {
                warn!("Skip header without an OTU name at line {line_no} of {origin}");
                continue;
            }

            let (_, created) = otus.get_or_insert_with(&name, || Otu::new(name.as_ref()));
            if created {
                stats.created_otus += 1;
            } else {
                debug!("OTU \"{name}\" is named again at line {line_no}");
            }
        }

        if stats.hits == 0 {
            info!("No OTUs in {origin}");
        } else {
            info!("Imported {} OTUs from {origin}", stats.created_otus);
        }
        Ok(stats)
    }
}
