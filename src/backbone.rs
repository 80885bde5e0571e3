use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    adapter_site::AdapterSite,
    base_sequence::BaseSequence,
    error::Result,
    parts_db::{BackboneId, BaseSeqId, PartsDb, SiteId},
    record::Record,
    restriction_enzyme::RestrictionEnzyme,
};

/// The vector scaffold a Part is inserted into: a base sequence plus the
/// adapter site used to splice payloads in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backbone {
    pub id: BackboneId,
    pub name: String,
    pub base_sequence_id: BaseSeqId,
    pub adapter_id: SiteId,
}

impl Backbone {
    pub fn new(id: &str, name: &str, base_sequence_id: &str, adapter_id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            base_sequence_id: base_sequence_id.to_string(),
            adapter_id: adapter_id.to_string(),
        }
    }
}

/// A backbone with its references resolved against a snapshot.
#[derive(Clone, Copy, Debug)]
pub struct BackboneView<'a> {
    db: &'a PartsDb,
    backbone: &'a Backbone,
}

impl<'a> BackboneView<'a> {
    pub fn new(db: &'a PartsDb, backbone: &'a Backbone) -> Self {
        Self { db, backbone }
    }

    pub fn backbone(&self) -> &'a Backbone {
        self.backbone
    }

    pub fn base_sequence(&self) -> Result<&'a BaseSequence> {
        self.db.base_sequence(&self.backbone.base_sequence_id)
    }

    pub fn adapter(&self) -> Result<&'a AdapterSite> {
        self.db.site(&self.backbone.adapter_id)
    }

    pub fn enzyme(&self) -> Result<&'a RestrictionEnzyme> {
        self.db.site_enzyme(self.adapter()?)
    }

    /// `site3 + rc(enzyme) + body + enzyme + site5`. The order encodes where
    /// the enzyme cuts to release or accept the payload and is fixed.
    pub fn sequence(&self) -> Result<String> {
        let adapter = self.adapter()?;
        let enzyme = self.enzyme()?;
        let body = self.base_sequence()?;
        let mut seq = String::with_capacity(
            adapter.site3.len() + 2 * enzyme.sequence.len() + body.sequence.len() + adapter.site5.len(),
        );
        seq.push_str(&adapter.site3);
        seq.push_str(&enzyme.reverse_complement()?);
        seq.push_str(&body.sequence);
        seq.push_str(&enzyme.sequence);
        seq.push_str(&adapter.site5);
        Ok(seq)
    }

    /// Same concatenation as [`sequence`](Self::sequence) on records. Only
    /// the base sequence contributes features; the result keeps the base
    /// sequence's identity.
    pub fn record(&self) -> Result<Record> {
        debug!(backbone = %self.backbone.id, "building backbone record");
        let settings = &self.db.settings;
        let adapter = self.adapter()?;
        let enzyme = self.enzyme()?;
        let body = self.base_sequence()?;

        let mut record = Record::new(&adapter.site3);
        record.push_str(&enzyme.reverse_complement()?);
        record.append(
            body.to_record(&settings.description),
            settings.feature_coordinates,
        );
        record.push_str(&enzyme.sequence);
        record.push_str(&adapter.site5);
        record.stamp(&body.id, &body.name, &settings.description);
        Ok(record)
    }
}
