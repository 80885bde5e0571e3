//! Annotated sequence records, backed by `gb_io::seq::Seq`.

use gb_io::seq::{Feature as GbFeature, Seq, Topology};
use loopdb_protocol::SequenceRecordView;
use serde::{Deserialize, Serialize};
use std::{fmt, io::Write};

use crate::{
    error::Result,
    feature::{Feature, feature_view, shift_location},
    nucleotides,
    settings::FeatureCoordinates,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Record {
    seq: Seq,
}

impl Record {
    /// A record with no features and no identity.
    pub fn new(sequence: &str) -> Self {
        Self::from_u8(sequence.as_bytes())
    }

    pub fn with_features(sequence: &str, features: &[Feature]) -> Self {
        let mut ret = Self::new(sequence);
        ret.seq.features = features.iter().map(Feature::to_gb_feature).collect();
        ret
    }

    fn from_u8(s: &[u8]) -> Self {
        let seq = Seq {
            name: None,
            topology: Topology::Linear,
            date: None,
            len: Some(s.len()),
            molecule_type: None,
            division: String::new(),
            definition: None,
            accession: None,
            version: None,
            source: None,
            dblink: None,
            keywords: None,
            references: vec![],
            comments: vec![],
            seq: s.to_vec(),
            contig: None,
            features: vec![],
        };
        Self { seq }
    }

    /// Appends raw bases; they carry no annotation.
    pub fn push_str(&mut self, bases: &str) {
        self.seq.seq.extend_from_slice(bases.as_bytes());
        self.seq.len = Some(self.seq.seq.len());
    }

    /// Appends `other` after the current sequence and merges its features
    /// according to `coordinates`. Identity of `other` is dropped.
    pub fn append(&mut self, other: Record, coordinates: FeatureCoordinates) {
        let offset = coordinates.offset(self.len());
        offset_and_merge(&mut self.seq.features, other.seq.features, offset);
        self.seq.seq.extend_from_slice(&other.seq.seq);
        self.seq.len = Some(self.seq.seq.len());
    }

    /// Sets id, name and description. Applied once, to top-level results.
    pub fn stamp(&mut self, id: &str, name: &str, description: &str) {
        self.seq.accession = Some(id.to_string());
        self.seq.name = Some(name.to_string());
        self.seq.definition = Some(description.to_string());
    }

    pub fn set_circular(&mut self, is_circular: bool) {
        self.seq.topology = match is_circular {
            true => Topology::Circular,
            false => Topology::Linear,
        };
    }

    pub fn is_circular(&self) -> bool {
        self.seq.topology == Topology::Circular
    }

    pub fn validate_alphabet(&self, entity: &str) -> Result<()> {
        nucleotides::validate_alphabet(entity, &self.seq.seq)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.seq.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.seq.is_empty()
    }

    pub fn sequence(&self) -> &[u8] {
        &self.seq.seq
    }

    pub fn get_forward_string(&self) -> String {
        String::from_utf8_lossy(&self.seq.seq).to_string()
    }

    pub fn features(&self) -> &Vec<GbFeature> {
        &self.seq.features
    }

    pub fn id(&self) -> Option<&str> {
        self.seq.accession.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.seq.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.seq.definition.as_deref()
    }

    pub fn as_genbank_seq(&self) -> &Seq {
        &self.seq
    }

    pub fn to_view(&self) -> SequenceRecordView {
        SequenceRecordView {
            id: self.id().unwrap_or_default().to_string(),
            name: self.name().unwrap_or_default().to_string(),
            sequence: self.get_forward_string(),
            description: self.description().unwrap_or_default().to_string(),
            features: self.seq.features.iter().map(feature_view).collect(),
        }
    }

    pub fn write_genbank<W: Write>(&self, writer: W) -> Result<()> {
        gb_io::writer::write(writer, &self.seq)?;
        Ok(())
    }
}

/// Appends `incoming` to `features`, moving each by `offset`. An offset of
/// zero keeps coordinates relative to their originating sequence.
pub fn offset_and_merge(features: &mut Vec<GbFeature>, incoming: Vec<GbFeature>, offset: i64) {
    if offset == 0 {
        features.extend(incoming);
        return;
    }
    features.extend(incoming.into_iter().map(|mut feature| {
        feature.location = shift_location(&feature.location, offset);
        feature
    }));
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.seq.seq))
    }
}
