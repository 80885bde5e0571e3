use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    feature::Feature,
    parts_db::{BaseSeqId, SiteId},
    record::Record,
};

/// A raw reusable sequence with its own annotations and a receiver site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseSequence {
    pub id: BaseSeqId,
    pub name: String,
    pub sequence: String,
    pub receiver_id: SiteId,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl BaseSequence {
    pub fn new(id: &str, name: &str, sequence: &str, receiver_id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            sequence: sequence.to_string(),
            receiver_id: receiver_id.to_string(),
            features: vec![],
        }
    }

    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }

    /// Annotated record of the raw sequence. Feature coordinates are emitted
    /// exactly as stored.
    pub fn to_record(&self, description: &str) -> Record {
        let mut record = Record::with_features(&self.sequence, &self.features);
        record.stamp(&self.id, &self.name, description);
        record
    }

    pub fn check_features(&self) -> Result<()> {
        let entity = self.describe();
        self.features
            .iter()
            .try_for_each(|feature| feature.check_bounds(&entity, self.sequence.len()))
    }

    pub(crate) fn describe(&self) -> String {
        format!("base sequence '{}'", self.name)
    }
}
