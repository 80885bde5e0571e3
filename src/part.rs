use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    backbone::BackboneView,
    composer::Composer,
    error::Result,
    feature::Feature,
    parts_db::{BackboneId, PartId, PartsDb},
    record::Record,
};

/// A node of the assembly DAG. A part with no outgoing edges is a leaf and
/// owns its sequence and features; otherwise it is composed from its children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub name: String,
    #[serde(default)]
    pub backbone_id: Option<BackboneId>,
    #[serde(default)]
    pub sequence: Option<String>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl Part {
    pub fn leaf(id: &str, name: &str, sequence: &str, backbone_id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            backbone_id: Some(backbone_id.to_string()),
            sequence: Some(sequence.to_string()),
            features: vec![],
        }
    }

    pub fn composite(id: &str, name: &str, backbone_id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            backbone_id: Some(backbone_id.to_string()),
            sequence: None,
            features: vec![],
        }
    }

    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }

    /// Leaf record of the part's own sequence, unstamped.
    pub(crate) fn own_record(&self, sequence: &str) -> Record {
        Record::with_features(sequence, &self.features)
    }

    pub(crate) fn describe(&self) -> String {
        format!("part '{}'", self.name)
    }
}

/// Per-part derived operations over a snapshot. Every call is an independent
/// traversal; nothing is cached between calls.
#[derive(Clone, Copy, Debug)]
pub struct PartView<'a> {
    db: &'a PartsDb,
    part: &'a Part,
}

impl<'a> PartView<'a> {
    pub fn new(db: &'a PartsDb, part: &'a Part) -> Self {
        Self { db, part }
    }

    pub fn part(&self) -> &'a Part {
        self.part
    }

    pub fn id(&self) -> &'a str {
        &self.part.id
    }

    pub fn children(&self) -> Result<Vec<PartView<'a>>> {
        Ok(self
            .db
            .children(&self.part.id)?
            .into_iter()
            .map(|child| PartView::new(self.db, child))
            .collect())
    }

    pub fn children_ids(&self) -> Result<Vec<&'a str>> {
        Ok(self
            .db
            .child_edges(&self.part.id)?
            .into_iter()
            .map(|edge| edge.child_id.as_str())
            .collect())
    }

    pub fn is_leaf(&self) -> Result<bool> {
        Ok(self.db.child_edges(&self.part.id)?.is_empty())
    }

    pub fn backbone(&self) -> Result<BackboneView<'a>> {
        Ok(BackboneView::new(self.db, self.db.part_backbone(self.part)?))
    }

    /// Payload length: the own sequence for a leaf, the sum of the children's
    /// sizes otherwise. Adapter and receiver flanks added during composition
    /// are not counted, so this is not the physical assembled length; use
    /// `composed_sequence().len()` for that.
    pub fn size(&self) -> Result<usize> {
        Composer::new(self.db).size(&self.part.id)
    }

    /// Nesting depth, 0 for leaves.
    pub fn level(&self) -> Result<usize> {
        Composer::new(self.db).level(&self.part.id)
    }

    /// `(site5, site3)` of the backbone's adapter.
    pub fn sites(&self) -> Result<(&'a str, &'a str)> {
        self.db.adapter_sites(self.part)
    }

    /// `(site5, site3)` of the backbone's base sequence receiver.
    pub fn receiver_sites(&self) -> Result<(&'a str, &'a str)> {
        self.db.receiver_sites(self.part)
    }

    pub fn composed_sequence(&self) -> Result<String> {
        debug!(part = %self.part.id, "composed sequence");
        Composer::new(self.db).composed_sequence(&self.part.id)
    }

    pub fn full_sequence(&self) -> Result<String> {
        debug!(part = %self.part.id, "full sequence");
        Composer::new(self.db).full_sequence(&self.part.id)
    }

    pub fn record(&self) -> Result<Record> {
        debug!(part = %self.part.id, "record");
        Composer::new(self.db).record(&self.part.id)
    }

    pub fn full_record(&self) -> Result<Record> {
        debug!(part = %self.part.id, "full record");
        Composer::new(self.db).full_record(&self.part.id)
    }
}
