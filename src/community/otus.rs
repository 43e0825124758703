use crate::community::Otu;
use crate::naming::*;

/// OTUs with names unique ignoring case.
pub type Otus = NamedCollection<Otu>;

impl Otus {
    /// Look up the OTU called `name`, creating an empty one if it does not exist yet.
    pub fn add_unique_otu(&mut self, name: &str) -> &mut Otu {
        self.get_or_insert_with(name, || Otu::new(name)).0
    }

    pub fn contains_otu(&self, name: &str) -> bool {
        self.contains(name)
    }

    pub fn get_otu(&self, name: &str) -> Option<&Otu> {
        self.get(name)
    }

    pub fn get_otu_mut(&mut self, name: &str) -> Option<&mut Otu> {
        self.get_mut(name)
    }

    /// Total number of reads over all OTUs.
    pub fn total_reads(&self) -> usize {
        self.iter().map(|otu| otu.count()).sum()
    }
}
