use std::error::Error as StdError;
use std::fs::{self, File};
use std::io::{Read, Write};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use tempfile::tempdir;

use otu_community::errors::Error;
use otu_community::*;

type TestResult = std::result::Result<(), Box<dyn StdError>>;

const OTUS: &str = ">A\nACGTACGTAC\n>B\nTTGACCAGTA\n";

const MAPPING: &str = "H\tread1|1-A\tA\n\
                       H\tread2|2-A\tB\n\
                       H\tread3|2-B\ta\n\
                       N\tread4|1-A\t*\n";

const REFERENCES: &str = "0.98\tA\tREF123\n0.87\tB\tREF7\n";

#[test]
fn test_build_community_from_files() -> TestResult {
    let dir = tempdir()?;
    let otus_path = dir.path().join("otus.fasta");
    let mapping_path = dir.path().join("otu_map.uc");
    let references_path = dir.path().join("reference_otus.uc");

    fs::write(&otus_path, OTUS)?;
    fs::write(&mapping_path, MAPPING)?;
    fs::write(&references_path, REFERENCES)?;

    let importer = CommunityImporter::new(ImportConfig {
        can_create_otu: false,
        ..ImportConfig::default()
    });
    let community = importer.build_community(
        Some(Input::from_file(&otus_path)?),
        Input::from_file(&mapping_path)?,
        Some(Input::from_file(&references_path)?),
    )?;

    let otus = community.otus();
    assert_eq!(otus.names().collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(otus.get_otu("a").map(|o| o.count()), Some(2));
    assert_eq!(otus.get_otu("B").map(|o| o.count()), Some(1));

    let reference = otus.get_otu("A").and_then(|o| o.reference()).unwrap();
    assert_eq!(reference.target_id(), "REF123");
    assert_eq!(reference.identity(), Some(0.98));

    assert_eq!(community.sample_type(), Some(SampleType::ByPlot));
    assert_eq!(community.samples().names().collect::<Vec<_>>(), vec!["1", "2"]);

    let table = community.diversity().unwrap();
    assert_eq!(table.otu_counts("A"), Some(&[1, 1][..]));
    assert_eq!(table.otu_counts("B"), Some(&[0, 1][..]));

    Ok(())
}

#[test]
fn test_header_only_otu_file() -> TestResult {
    let dir = tempdir()?;
    let otus_path = dir.path().join("otus.fasta");
    let mapping_path = dir.path().join("otu_map.uc");
    let references_path = dir.path().join("reference_otus.uc");

    fs::write(&otus_path, ";; representative sequences\n>A\n>B\n")?;
    fs::write(&mapping_path, "H\tread1|1-A\tA\nH\tread2|2-A\tB\n")?;
    fs::write(&references_path, "0.98\tA\tREF123\n")?;

    let importer = CommunityImporter::new(ImportConfig {
        can_create_otu: false,
        ..ImportConfig::default()
    });
    let community = importer.build_community(
        Some(Input::from_file(&otus_path)?),
        Input::from_file(&mapping_path)?,
        Some(Input::from_file(&references_path)?),
    )?;

    let otus = community.otus();
    assert_eq!(otus.names().collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(otus.get_otu("A").map(|o| o.count()), Some(1));
    assert_eq!(otus.get_otu("B").map(|o| o.count()), Some(1));
    assert_eq!(
        otus.get_otu("A").and_then(|o| o.reference()).map(|r| r.target_id()),
        Some("REF123")
    );
    assert!(otus.get_otu("B").and_then(|o| o.reference()).is_none());

    Ok(())
}

#[test]
fn test_gzipped_inputs() -> TestResult {
    let dir = tempdir()?;
    let mapping_path = dir.path().join("otu_map.uc.gz");

    let mut encoder = GzEncoder::new(File::create(&mapping_path)?, Compression::default());
    encoder.write_all(MAPPING.as_bytes())?;
    encoder.finish()?;

    let mut community = Community::new();
    let stats = CommunityImporter::default()
        .import_community_mapping(Input::from_file(&mapping_path)?, &mut community)?;

    assert_eq!(stats.lines, 4);
    assert_eq!(stats.hits, 3);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.created_otus, 2);
    assert_eq!(community.otus().len(), 2);

    Ok(())
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let result = Input::from_file(dir.path().join("missing.uc"));
    assert!(matches!(result, Err(Error::FileIo { .. })));
}

#[test]
fn test_mapping_to_unknown_otu_fails() -> TestResult {
    let importer = CommunityImporter::new(ImportConfig {
        can_create_otu: false,
        ..ImportConfig::default()
    });

    let result = importer.build_community(
        Some(Input::from(">A\nACGT\n")),
        Input::from("H\tread1|1-A\tA\nH\tread2|1-A\tZ\n"),
        None,
    );

    match result {
        Err(Error::ReferentialIntegrity { otu, line_no, .. }) => {
            assert_eq!(otu, "Z");
            assert_eq!(line_no, 2);
        }
        other => panic!("expected a referential integrity error, got {other:?}"),
    }

    Ok(())
}

#[test]
fn test_references_need_existing_otus() -> TestResult {
    let result = CommunityImporter::default().build_community(
        None,
        Input::from("H\tread1|1-A\tA\n"),
        Some(Input::from("0.98\tA\tREF123\n0.91\tC\tREF9\n")),
    );

    assert!(matches!(
        result,
        Err(Error::ReferentialIntegrity { ref otu, .. }) if otu == "C"
    ));

    Ok(())
}

#[test]
fn test_otus_required_without_creation() {
    let importer = CommunityImporter::new(ImportConfig {
        can_create_otu: false,
        ..ImportConfig::default()
    });

    let result = importer.build_community(None, Input::from("H\tr1|1-A\tA\n"), None);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

#[test]
fn test_config_file() -> TestResult {
    let dir = tempdir()?;
    let config_path = dir.path().join("import.yaml");
    fs::write(
        &config_path,
        r#"
sample_type: by subplot
strip_size_annotation: true
mapping_layout:
  record_type: 0
  query: 8
  target: 9
"#,
    )?;

    let config = ImportConfig::from_yaml_file(&config_path)?;
    assert_eq!(config.sample_type, SampleType::BySubplot);

    let uc = "S\t0\t250\t*\t*\t*\t*\t*\tr1|7-C;size=1;\t*\n\
              H\t0\t250\t99.6\t+\t0\t0\t250M\tr2|7-D;size=1;\tOTU_1;size=2;\n\
              H\t0\t250\t98.0\t+\t0\t0\t250M\tr3|8-C;size=1;\tOTU_1\n";

    let mut community = Community::new();
    CommunityImporter::new(config).import_community_mapping(Input::from(uc), &mut community)?;

    assert_eq!(community.otus().len(), 1);
    assert_eq!(community.otus().get_otu("OTU_1").map(|o| o.count()), Some(2));
    let table = community.diversity().unwrap();
    assert_eq!(table.samples(), ["7-D", "8-C"]);

    Ok(())
}

#[test]
fn test_bad_config_file() -> TestResult {
    let dir = tempdir()?;
    let config_path = dir.path().join("import.yaml");
    fs::write(&config_path, "sample_type: by country\n")?;

    let result = ImportConfig::from_yaml_file(&config_path);
    assert!(matches!(result, Err(Error::Config { .. })));

    fs::write(&config_path, "sample_separator: '-'\n")?;
    let result = ImportConfig::from_yaml_file(&config_path);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));

    Ok(())
}

#[test]
fn test_write_outputs() -> TestResult {
    let dir = tempdir()?;
    let community = CommunityImporter::default().build_community(
        Some(Input::from(OTUS)),
        Input::from(MAPPING),
        Some(Input::from(REFERENCES)),
    )?;
    let table = community.diversity().unwrap();

    let matrix_path = dir.path().join("out").join("community_matrix.tsv");
    write_matrix_file(table, &matrix_path)?;
    assert_eq!(fs::read_to_string(&matrix_path)?, "OTU\t1\t2\nA\t1\t1\nB\t0\t1\n");

    let gz_path = dir.path().join("community_matrix.csv.gz");
    write_matrix_file(table, &gz_path)?;
    let mut decoded = String::new();
    GzDecoder::new(File::open(&gz_path)?).read_to_string(&mut decoded)?;
    assert_eq!(decoded, "OTU,1,2\nA,1,1\nB,0,1\n");

    let references_path = dir.path().join("references.csv");
    write_references_file(community.otus(), &references_path)?;
    assert_eq!(
        fs::read_to_string(&references_path)?,
        "OTU,reference,identity\nA,REF123,0.98\nB,REF7,0.87\n"
    );

    let alpha_path = dir.path().join("alpha.csv");
    write_alpha_diversity_file(table, &alpha_path)?;
    assert_eq!(fs::read_to_string(&alpha_path)?.lines().count(), 3);

    Ok(())
}
