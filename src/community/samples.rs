use crate::naming::*;

/// A plot or subplot that reads were sequenced from, counting the reads recorded for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    name: String,
    count: usize,
}

impl Sample {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 0,
        }
    }
}

impl Named for Sample {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Countable for Sample {
    fn count(&self) -> usize {
        self.count
    }

    fn increment_count(&mut self, step: usize) {
        self.count += step;
    }

    fn set_count(&mut self, count: usize) {
        self.count = count;
    }
}

pub type Samples = NamedCollection<Sample>;

impl Samples {
    /// Record one read from `sample`, adding the sample if it is new.
    pub fn record_sample(&mut self, sample: &str) -> &mut Sample {
        let (sample, _) = self.get_or_insert_with(sample, || Sample::new(sample));
        sample.increment_count(1);
        sample
    }
}
