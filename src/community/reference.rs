/// Link from an OTU to the reference sequence it was mapped to.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    otu: String,
    target_id: String,
    identity: Option<f64>,
}

impl Reference {
    pub fn new(otu: impl Into<String>, target_id: impl Into<String>, identity: Option<f64>) -> Self {
        Self {
            otu: otu.into(),
            target_id: target_id.into(),
            identity,
        }
    }

    /// Name of the OTU this reference belongs to.
    pub fn otu(&self) -> &str {
        &self.otu
    }

    /// Id of the reference sequence.
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Identity (or similarity) score of the mapping, if the input had one.
    pub fn identity(&self) -> Option<f64> {
        self.identity
    }
}
