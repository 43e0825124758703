//! The entity graph: OTUs, their reads and references, and the community built from them.

mod otu;
pub use otu::*;

mod otus;
pub use otus::*;

mod reference;
pub use reference::*;

mod samples;
pub use samples::*;

use crate::diversity::DiversityTable;
use crate::errors::*;
use crate::sample::*;

/// OTUs together with the samples their reads came from.
#[derive(Debug, Clone)]
pub struct Community {
    otus: Otus,
    sample_separator: char,
    subplot_separator: char,
    classifier: Option<SampleClassifier>,
    samples: Samples,
    diversity: Option<DiversityTable>,
}

impl Community {
    pub fn new() -> Self {
        Self::with_separators(SAMPLE_SEPARATOR, SUBPLOT_SEPARATOR)
    }

    /// Community whose read labels use custom separators, see [`SampleClassifier::with_separators`].
    pub fn with_separators(sample_separator: char, subplot_separator: char) -> Self {
        Self {
            otus: Otus::new(),
            sample_separator,
            subplot_separator,
            classifier: None,
            samples: Samples::new(),
            diversity: None,
        }
    }

    pub fn otus(&self) -> &Otus {
        &self.otus
    }

    pub fn otus_mut(&mut self) -> &mut Otus {
        &mut self.otus
    }

    pub fn sample_type(&self) -> Option<SampleType> {
        self.classifier.as_ref().map(|c| c.sample_type())
    }

    /// Set how read labels are classified into samples.
    ///
    /// The sample type can only be set once. Setting the same type again is a no-op.
    pub fn set_sample_type(&mut self, sample_type: SampleType) -> Result<()> {
        match self.sample_type() {
            Some(current) if current == sample_type => Ok(()),
            Some(current) => Err(Error::SampleTypeLocked {
                current: current.to_string(),
                requested: sample_type.to_string(),
            }),
            None => {
                self.classifier = Some(SampleClassifier::with_separators(
                    sample_type,
                    self.sample_separator,
                    self.subplot_separator,
                ));
                Ok(())
            }
        }
    }

    pub fn classifier(&self) -> Option<&SampleClassifier> {
        self.classifier.as_ref()
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Record one read from the sample `sample_id`.
    pub fn record_sample(&mut self, sample_id: &str) {
        self.samples.record_sample(sample_id);
    }

    /// Reads per OTU and sample, available once the diversity has been aggregated.
    pub fn diversity(&self) -> Option<&DiversityTable> {
        self.diversity.as_ref()
    }

    pub(crate) fn set_diversity(&mut self, diversity: DiversityTable) -> &DiversityTable {
        self.diversity.insert(diversity)
    }

    /// Borrow the OTUs and the sample tracking state separately for a mapping pass.
    pub(crate) fn mapping_parts(&mut self) -> Result<(&mut Otus, SampleTracker<'_>)> {
        let classifier = self.classifier.as_ref().ok_or(Error::SampleTypeUnset)?;
        Ok((
            &mut self.otus,
            SampleTracker {
                classifier,
                samples: &mut self.samples,
            },
        ))
    }
}

impl Default for Community {
    fn default() -> Self {
        Self::new()
    }
}

/// Classifies read labels and accumulates the samples they belong to.
pub struct SampleTracker<'a> {
    classifier: &'a SampleClassifier,
    samples: &'a mut Samples,
}

impl<'a> SampleTracker<'a> {
    pub fn new(classifier: &'a SampleClassifier, samples: &'a mut Samples) -> Self {
        Self {
            classifier,
            samples,
        }
    }

    /// The sample of a read label, without recording it.
    pub fn classify(&self, label: &str) -> std::result::Result<String, FormatError> {
        self.classifier.classify(label)
    }

    /// Record one read from an already classified sample.
    pub fn record(&mut self, sample: &str) -> &Sample {
        self.samples.record_sample(sample)
    }

    pub fn track(&mut self, label: &str) -> std::result::Result<&Sample, FormatError> {
        let sample = self.classify(label)?;
        Ok(self.record(&sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::*;

    #[test]
    fn sample_type_is_set_once() {
        let mut community = Community::new();
        assert_eq!(community.sample_type(), None);

        community.set_sample_type(SampleType::ByPlot).unwrap();
        community.set_sample_type(SampleType::ByPlot).unwrap();
        assert!(matches!(
            community.set_sample_type(SampleType::BySubplot),
            Err(Error::SampleTypeLocked { .. })
        ));
        assert_eq!(community.sample_type(), Some(SampleType::ByPlot));
    }

    #[test]
    fn mapping_parts_require_sample_type() {
        let mut community = Community::new();
        assert!(matches!(community.mapping_parts(), Err(Error::SampleTypeUnset)));
    }

    #[test]
    fn tracker_counts_reads_per_sample() {
        let mut community = Community::new();
        community.set_sample_type(SampleType::BySubplot).unwrap();

        {
            let (_, mut tracker) = community.mapping_parts().unwrap();
            tracker.track("r1|1-A").unwrap();
            tracker.track("r2|1-A").unwrap();
            tracker.track("r3|1-B").unwrap();
            assert!(tracker.track("r4").is_err());
        }

        let samples = community.samples();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples.get("1-A").map(|s| s.count()), Some(2));
        assert_eq!(samples.get("1-b").map(|s| s.count()), Some(1));
    }

    #[test]
    fn record_sample_deduplicates() {
        let mut community = Community::new();
        community.record_sample("45");
        community.record_sample("45");
        assert_eq!(community.samples().len(), 1);
    }
}
