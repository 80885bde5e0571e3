//! Machine-readable annotated-sequence contract shared by LoopDB and its
//! downstream consumers (exporters, shells, UIs).

use serde::{Deserialize, Serialize};
use std::fmt;

pub const PROTOCOL_VERSION: &str = "v1";

/// Feature orientation. Serialized as `1` (forward) or `-1` (reverse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

impl Strand {
    pub fn from_forward(forward: bool) -> Self {
        if forward {
            Strand::Forward
        } else {
            Strand::Reverse
        }
    }

    pub fn is_forward(self) -> bool {
        self == Strand::Forward
    }
}

impl From<Strand> for i8 {
    fn from(strand: Strand) -> Self {
        match strand {
            Strand::Forward => 1,
            Strand::Reverse => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStrand(pub i8);

impl fmt::Display for InvalidStrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "strand must be 1 or -1, got {}", self.0)
    }
}

impl TryFrom<i8> for Strand {
    type Error = InvalidStrand;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Strand::Forward),
            -1 => Ok(Strand::Reverse),
            other => Err(InvalidStrand(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureView {
    pub start: i64,
    pub end: i64,
    pub strand: Strand,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecordView {
    pub id: String,
    pub name: String,
    pub sequence: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<FeatureView>,
}

impl SequenceRecordView {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
