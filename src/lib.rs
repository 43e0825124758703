//! Rust library for building OTU community matrices from sequence clustering output.
//!
//! # Overview
//! Clustering tools such as usearch assign each sequencing read to a cluster, or
//! *operational taxonomic unit* (OTU). This crate turns their output into an in-memory
//! community: OTUs with their reads and reference sequences, the samples the reads were
//! sequenced from, and a table of reads per OTU and sample.
//!
//! This is useful for:
//! * Building community matrices for ecological analysis
//! * Checking that clustering output is consistent with the OTU sequences
//! * Computing the alpha diversity of samples, with or without rarefaction
//!
//! ## Inputs
//! A community is built from up to three files:
//! ```text
//! >OTU_1                              otus.fasta: one header per OTU
//! ACGT...
//!
//! H   IDME8NM01EIUH4|45-S4   OTU_1    otu mapping: read to OTU
//!
//! 0.98   OTU_1   REF123               reference mapping: OTU to reference sequence
//! ```
//! Records are tab separated. Only hit (`H`) records are used when the layout has a record
//! type column. The column of each field is set by a [`uc::ColumnLayout`], so the full ten
//! column usearch `.uc` output can be read as well.
//!
//! ## Samples
//! The sample of a read is encoded in its label after the last `|`, as `plot-subplot`.
//! A community classifies reads either [`SampleType::ByPlot`] (`45`) or
//! [`SampleType::BySubplot`] (`45-S4`).
//!
//! ## Example
//! ```no_run
//! use otu_community::*;
//!
//! let importer = CommunityImporter::new(ImportConfig::default());
//! let community = importer.build_community(
//!     Some(Input::from_file("otus.fasta")?),
//!     Input::from_file("otu_map.uc")?,
//!     Some(Input::from_file("reference.uc")?),
//! )?;
//!
//! if let Some(table) = community.diversity() {
//!     write_matrix_file(table, "community_matrix.csv")?;
//! }
//! # Ok::<(), otu_community::errors::Error>(())
//! ```
//!
//! ### Note
//! Every import stops at the first malformed line or unknown OTU. The partially built
//! OTUs are left as they were at that point and should not be used.

pub mod community;
pub mod config;
pub mod diversity;
pub mod errors;
pub mod importer;
pub mod naming;
pub mod output;
pub mod sample;
pub mod uc;

// commonly used functions and types

pub use crate::community::*;
pub use crate::config::*;
pub use crate::diversity::{aggregate, AlphaDiversity, DiversityTable};
pub use crate::importer::*;
pub use crate::naming::{Countable, Named};
pub use crate::output::*;
pub use crate::sample::{classify, SampleClassifier, SampleType};
