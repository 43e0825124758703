//! Reads per OTU and sample, and the alpha diversity of each sample.

use log::{info, warn};
use rand::seq::index;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::community::*;
use crate::errors::*;
use crate::naming::*;

/// Count the reads of every OTU in every sample and store the table in the community.
///
/// Every read label is classified with the sample type of the community. Running this again
/// recomputes the table from the current reads of the OTUs.
pub fn aggregate(community: &mut Community) -> Result<&DiversityTable> {
    let table = DiversityTable::from_community(community)?;
    info!(
        "Aggregated {} OTUs over {} samples",
        table.otus().len(),
        table.samples().len()
    );

    Ok(community.set_diversity(table))
}

/// OTU by sample read counts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiversityTable {
    otus: Vec<String>,
    samples: Vec<String>,
    /// Row per OTU, column per sample.
    counts: Vec<Vec<usize>>,
    otu_index: FxHashMap<String, usize>,
    sample_index: FxHashMap<String, usize>,
}

/// Alpha diversity of one sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlphaDiversity {
    pub sample: String,
    pub reads: usize,
    pub richness: usize,
    pub shannon: f64,
    pub simpson: f64,
}

impl DiversityTable {
    pub fn from_community(community: &Community) -> Result<Self> {
        let otus = community.otus();

        if otus.total_reads() == 0 {
            return Ok(Self::from_counts(
                otus.sorted().iter().map(|o| o.name().to_owned()).collect(),
                community.samples().sorted().iter().map(|s| s.name().to_owned()).collect(),
                |_, _| 0,
            ));
        }

        let classifier = community.classifier().ok_or(Error::SampleTypeUnset)?;

        let mut per_otu = Vec::with_capacity(otus.len());
        let mut samples = Samples::new();
        for sample in community.samples() {
            samples.get_or_insert_with(sample.name(), || Sample::new(sample.name()));
        }

        for otu in otus.sorted() {
            let mut counts = FxHashMap::<String, usize>::default();

            for read in otu.reads() {
                let sample = classifier.classify(read).map_err(|source| Error::Classify {
                    otu: otu.name().to_owned(),
                    read: read.to_owned(),
                    source,
                })?;

                let (sample, _) = samples.get_or_insert_with(&sample, || Sample::new(sample.as_str()));
                *counts.entry(name_key(sample.name())).or_default() += 1;
            }

            per_otu.push((otu.name().to_owned(), counts));
        }

        let sample_names = samples
            .sorted()
            .iter()
            .map(|s| s.name().to_owned())
            .collect::<Vec<_>>();
        let sample_keys = sample_names.iter().map(|s| name_key(s)).collect::<Vec<_>>();
        let otu_names = per_otu.iter().map(|(name, _)| name.clone()).collect::<Vec<_>>();

        Ok(Self::from_counts(otu_names, sample_names, |otu, sample| {
            per_otu[otu].1.get(&sample_keys[sample]).copied().unwrap_or(0)
        }))
    }

    fn from_counts(
        otus: Vec<String>,
        samples: Vec<String>,
        count: impl Fn(usize, usize) -> usize,
    ) -> Self {
        let counts = (0..otus.len())
            .map(|o| (0..samples.len()).map(|s| count(o, s)).collect())
            .collect();

        let otu_index = otus.iter().enumerate().map(|(i, o)| (name_key(o), i)).collect();
        let sample_index = samples.iter().enumerate().map(|(i, s)| (name_key(s), i)).collect();

        Self {
            otus,
            samples,
            counts,
            otu_index,
            sample_index,
        }
    }

    /// OTU names, ordered ignoring case.
    pub fn otus(&self) -> &[String] {
        &self.otus
    }

    /// Sample names, ordered ignoring case.
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.otus.is_empty()
    }

    pub fn count(&self, otu: &str, sample: &str) -> usize {
        match (
            self.otu_index.get(&name_key(otu)),
            self.sample_index.get(&name_key(sample)),
        ) {
            (Some(&o), Some(&s)) => self.counts[o][s],
            _ => 0,
        }
    }

    /// Reads of an OTU per sample, in the order of [`DiversityTable::samples`].
    pub fn otu_counts(&self, otu: &str) -> Option<&[usize]> {
        self.otu_index
            .get(&name_key(otu))
            .map(|&o| self.counts[o].as_slice())
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.otus
            .iter()
            .zip(&self.counts)
            .map(|(otu, counts)| (otu.as_str(), counts.as_slice()))
    }

    pub fn otu_total(&self, otu: &str) -> usize {
        self.otu_counts(otu).map(|c| c.iter().sum()).unwrap_or(0)
    }

    /// Number of samples an OTU has reads in.
    pub fn occupancy(&self, otu: &str) -> usize {
        self.otu_counts(otu)
            .map(|c| c.iter().filter(|&&n| n > 0).count())
            .unwrap_or(0)
    }

    fn column(&self, sample: &str) -> Option<impl Iterator<Item = usize> + '_> {
        let s = *self.sample_index.get(&name_key(sample))?;
        Some(self.counts.iter().map(move |row| row[s]))
    }

    pub fn sample_total(&self, sample: &str) -> usize {
        self.column(sample).map(|c| c.sum()).unwrap_or(0)
    }

    pub fn sample_totals(&self) -> Vec<usize> {
        (0..self.samples.len())
            .map(|s| self.counts.iter().map(|row| row[s]).sum())
            .collect()
    }

    /// Number of OTUs with reads in a sample.
    pub fn richness(&self, sample: &str) -> usize {
        self.column(sample)
            .map(|c| c.filter(|&n| n > 0).count())
            .unwrap_or(0)
    }

    /// Shannon index `-sum(p ln p)` of a sample.
    pub fn shannon(&self, sample: &str) -> f64 {
        let total = self.sample_total(sample);
        if total == 0 {
            return 0.0;
        }

        self.column(sample)
            .into_iter()
            .flatten()
            .filter(|&n| n > 0)
            .map(|n| {
                let p = n as f64 / total as f64;
                -p * p.ln()
            })
            .sum()
    }

    /// Gini-Simpson index `1 - sum(p^2)` of a sample.
    pub fn simpson(&self, sample: &str) -> f64 {
        let total = self.sample_total(sample);
        if total == 0 {
            return 0.0;
        }

        let dominance: f64 = self
            .column(sample)
            .into_iter()
            .flatten()
            .map(|n| {
                let p = n as f64 / total as f64;
                p * p
            })
            .sum();
        1.0 - dominance
    }

    pub fn alpha_diversity(&self) -> Vec<AlphaDiversity> {
        self.samples
            .iter()
            .map(|s| AlphaDiversity {
                sample: s.clone(),
                reads: self.sample_total(s),
                richness: self.richness(s),
                shannon: self.shannon(s),
                simpson: self.simpson(s),
            })
            .collect()
    }

    /// Subsample every sample to `depth` reads without replacement.
    ///
    /// Samples with fewer than `depth` reads are dropped. The same seed always gives
    /// the same table.
    pub fn rarefy(&self, depth: usize, seed: u64) -> Result<Self> {
        if depth == 0 {
            return Err(Error::Rarefaction {
                depth,
                reason: "depth must be positive",
            });
        }

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut samples = Vec::new();
        let mut columns = Vec::new();

        for (s, total) in self.sample_totals().into_iter().enumerate() {
            if total < depth {
                warn!(
                    "Drop sample \"{}\" with {total} reads when rarefying to {depth}",
                    self.samples[s]
                );
                continue;
            }

            // cumulative read counts of the OTUs in this sample
            let mut ends = Vec::with_capacity(self.otus.len());
            let mut end = 0;
            for row in &self.counts {
                end += row[s];
                ends.push(end);
            }

            let mut column = vec![0; self.otus.len()];
            for read in index::sample(&mut rng, total, depth) {
                let otu = ends.partition_point(|&e| e <= read);
                column[otu] += 1;
            }

            samples.push(self.samples[s].clone());
            columns.push(column);
        }

        if samples.is_empty() && !self.samples.is_empty() {
            return Err(Error::Rarefaction {
                depth,
                reason: "no sample has enough reads",
            });
        }

        Ok(Self::from_counts(self.otus.clone(), samples, |otu, sample| {
            columns[sample][otu]
        }))
    }
}
