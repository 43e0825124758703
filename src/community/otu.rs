use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use crate::community::Reference;
use crate::naming::*;

/// One cluster of reads.
#[derive(Debug, Clone)]
pub struct Otu {
    name: String,
    count: usize,
    reads: BTreeSet<String>,
    reference: Option<Reference>,
}

impl Otu {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 0,
            reads: BTreeSet::new(),
            reference: None,
        }
    }

    /// Add a read to this OTU.
    ///
    /// Returns `false` and leaves the count unchanged if the read was already present.
    pub fn attach_read(&mut self, read_id: impl Into<String>) -> bool {
        let inserted = self.reads.insert(read_id.into());
        if inserted {
            self.increment_count(1);
        }
        inserted
    }

    pub fn contains_read(&self, read_id: &str) -> bool {
        self.reads.contains(read_id)
    }

    /// Read ids in sorted order.
    pub fn reads(&self) -> impl Iterator<Item = &str> {
        self.reads.iter().map(|r| r.as_str())
    }

    pub fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }

    /// Store the reference of this OTU, returning the one it replaces.
    pub fn attach_reference(&mut self, reference: Reference) -> Option<Reference> {
        self.reference.replace(reference)
    }
}

impl Named for Otu {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Countable for Otu {
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

impl PartialEq for Otu {
    fn eq(&self, other: &Self) -> bool {
        name_key(&self.name) == name_key(&other.name)
    }
}

impl Eq for Otu {}

impl Hash for Otu {
    fn hash<H: Hasher>(&self, state: &mut H) {
        name_key(&self.name).hash(state);
    }
}

impl PartialOrd for Otu {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Otu {
    fn cmp(&self, other: &Self) -> Ordering {
        name_key(&self.name).cmp(&name_key(&other.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_read_is_idempotent() {
        let mut otu = Otu::new("OTU1");
        assert!(otu.attach_read("read2"));
        assert!(otu.attach_read("read1"));
        assert!(!otu.attach_read("read2"));

        assert_eq!(otu.count(), 2);
        assert_eq!(otu.reads().collect::<Vec<_>>(), vec!["read1", "read2"]);
        assert!(otu.contains_read("read1"));
    }

    #[test]
    fn equality_ignores_case() {
        assert_eq!(Otu::new("OTU1"), Otu::new("otu1"));
        assert!(Otu::new("a") < Otu::new("B"));
    }

    #[test]
    fn second_reference_replaces_first() {
        let mut otu = Otu::new("A");
        assert!(otu.attach_reference(Reference::new("A", "REF1", None)).is_none());
        let replaced = otu.attach_reference(Reference::new("A", "REF2", Some(0.9)));

        assert_eq!(replaced.map(|r| r.target_id().to_owned()), Some("REF1".to_owned()));
        assert_eq!(otu.reference().map(|r| r.target_id()), Some("REF2"));
        assert_eq!(otu.reference().and_then(|r| r.identity()), Some(0.9));
    }
}
