//! Writing community matrices and summaries as CSV or TSV.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::{write::GzEncoder, Compression};

use crate::community::Otus;
use crate::diversity::DiversityTable;
use crate::errors::*;
use crate::naming::Named;

pub const POSTFIX_TSV: &str = ".tsv";

/// Write the OTU by sample matrix, with a header row of sample names.
pub fn write_matrix(table: &DiversityTable, writer: impl Write, delimiter: u8) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(delimiter).from_writer(writer);

    let header = std::iter::once("OTU").chain(table.samples().iter().map(|s| s.as_str()));
    wtr.write_record(header).map_err(csv_error)?;

    for (otu, counts) in table.rows() {
        let row = std::iter::once(otu.to_owned()).chain(counts.iter().map(|c| c.to_string()));
        wtr.write_record(row).map_err(csv_error)?;
    }

    wtr.flush().map_err(|e| Error::BytesIo(Box::new(e)))
}

/// Write the alpha diversity of every sample.
pub fn write_alpha_diversity(table: &DiversityTable, writer: impl Write, delimiter: u8) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(delimiter).from_writer(writer);

    for alpha in table.alpha_diversity() {
        wtr.serialize(alpha).map_err(csv_error)?;
    }

    wtr.flush().map_err(|e| Error::BytesIo(Box::new(e)))
}

/// Write the reference sequence of every OTU that has one.
pub fn write_references(otus: &Otus, writer: impl Write, delimiter: u8) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(delimiter).from_writer(writer);
    wtr.write_record(["OTU", "reference", "identity"]).map_err(csv_error)?;

    for otu in otus.sorted() {
        if let Some(reference) = otu.reference() {
            let identity = reference.identity().map(|i| i.to_string()).unwrap_or_default();
            wtr.write_record([otu.name(), reference.target_id(), identity.as_str()])
                .map_err(csv_error)?;
        }
    }

    wtr.flush().map_err(|e| Error::BytesIo(Box::new(e)))
}

/// Write the matrix to a file, tab delimited for `.tsv` and comma delimited otherwise.
///
/// Files ending in `.gz` are compressed.
pub fn write_matrix_file(table: &DiversityTable, file: impl AsRef<Path>) -> Result<()> {
    let (writer, delimiter, name) = create_writer(file.as_ref())?;
    write_matrix(table, writer, delimiter).map_err(|e| in_file(e, name))
}

pub fn write_alpha_diversity_file(table: &DiversityTable, file: impl AsRef<Path>) -> Result<()> {
    let (writer, delimiter, name) = create_writer(file.as_ref())?;
    write_alpha_diversity(table, writer, delimiter).map_err(|e| in_file(e, name))
}

pub fn write_references_file(otus: &Otus, file: impl AsRef<Path>) -> Result<()> {
    let (writer, delimiter, name) = create_writer(file.as_ref())?;
    write_references(otus, writer, delimiter).map_err(|e| in_file(e, name))
}

fn create_writer(path: &Path) -> Result<(Box<dyn Write>, u8, String)> {
    let name = path.display().to_string();
    let io_error = |e: std::io::Error| Error::FileIo {
        file: name.clone(),
        source: Box::new(e),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }

    let plain = name.strip_suffix(".gz").unwrap_or(&name);
    let delimiter = if plain.ends_with(POSTFIX_TSV) { b'\t' } else { b',' };

    let file = File::create(path).map_err(io_error)?;
    let writer: Box<dyn Write> = if name.ends_with(".gz") {
        Box::new(BufWriter::new(GzEncoder::new(file, Compression::default())))
    } else {
        Box::new(BufWriter::new(file))
    };

    Ok((writer, delimiter, name))
}

fn in_file(e: Error, file: String) -> Error {
    match e {
        Error::BytesIo(source) => Error::FileIo { file, source },
        e => e,
    }
}

fn csv_error(e: csv::Error) -> Error {
    Error::BytesIo(Box::new(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::community::*;
    use crate::diversity::aggregate;
    use crate::sample::SampleType;

    fn community() -> Community {
        let mut community = Community::new();
        community.set_sample_type(SampleType::ByPlot).unwrap();
        let otus = community.otus_mut();
        otus.add_unique_otu("B").attach_read("r1|2-A");
        otus.add_unique_otu("A").attach_read("r2|1-A");
        otus.add_unique_otu("A").attach_read("r3|2-B");
        aggregate(&mut community).unwrap();
        community
    }

    #[test]
    fn matrix_as_csv() {
        let community = community();
        let mut out = Vec::new();
        write_matrix(community.diversity().unwrap(), &mut out, b',').unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "OTU,1,2\nA,1,1\nB,0,1\n");
    }

    #[test]
    fn alpha_diversity_as_tsv() {
        let community = community();
        let mut out = Vec::new();
        write_alpha_diversity(community.diversity().unwrap(), &mut out, b'\t').unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "sample\treads\trichness\tshannon\tsimpson");
        assert!(lines[1].starts_with("1\t1\t1\t"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn references() {
        let mut otus = Otus::new();
        otus.add_unique_otu("B");
        otus.add_unique_otu("A")
            .attach_reference(Reference::new("A", "REF1", Some(0.98)));

        let mut out = Vec::new();
        write_references(&otus, &mut out, b'\t').unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "OTU\treference\tidentity\nA\tREF1\t0.98\n");
    }
}
