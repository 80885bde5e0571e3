//! Stored sequence annotations and their GenBank-style feature form.

use gb_io::seq::{Feature as GbFeature, Location};
use loopdb_protocol::{FeatureView, Strand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{LoopDbError, Result};

const LABEL: &str = "label";
const FWD_COLOR: &str = "ApEinfo_fwdcolor";
const REV_COLOR: &str = "ApEinfo_revcolor";

/// An annotation as stored with a leaf Part or a BaseSequence. Coordinates
/// are relative to the owner's own raw sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub strand: Strand,
    #[serde(default)]
    pub color: String,
}

impl Feature {
    pub fn new(label: &str, kind: &str, start: usize, end: usize, strand: Strand) -> Self {
        Self {
            label: label.to_string(),
            kind: kind.to_string(),
            start,
            end,
            strand,
            color: String::new(),
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn check_bounds(&self, entity: &str, len: usize) -> Result<()> {
        if self.start <= self.end && self.end <= len {
            return Ok(());
        }
        Err(LoopDbError::FeatureOutOfBounds {
            entity: entity.to_string(),
            label: self.label.clone(),
            start: self.start,
            end: self.end,
            len,
        })
    }

    pub fn to_gb_feature(&self) -> GbFeature {
        let range = Location::simple_range(self.start as i64, self.end as i64);
        let location = match self.strand {
            Strand::Forward => range,
            Strand::Reverse => Location::Complement(Box::new(range)),
        };
        GbFeature {
            kind: self.kind.clone().into(),
            location,
            qualifiers: vec![
                (LABEL.into(), Some(self.label.clone())),
                (FWD_COLOR.into(), Some(self.color.clone())),
                (REV_COLOR.into(), Some(self.color.clone())),
            ],
        }
    }
}

pub fn collect_location_strands(location: &Location, reverse: bool, strands: &mut Vec<bool>) {
    match location {
        Location::Range(_, _) | Location::Between(_, _) => strands.push(reverse),
        Location::Complement(inner) => collect_location_strands(inner, !reverse, strands),
        Location::Join(parts)
        | Location::Order(parts)
        | Location::Bond(parts)
        | Location::OneOf(parts) => {
            for part in parts {
                collect_location_strands(part, reverse, strands);
            }
        }
        Location::External(_, maybe_loc) => {
            if let Some(loc) = maybe_loc {
                collect_location_strands(loc, reverse, strands);
            }
        }
        Location::Gap(_) => {}
    }
}

pub fn feature_is_reverse(feature: &GbFeature) -> bool {
    let mut strands = Vec::new();
    collect_location_strands(&feature.location, false, &mut strands);
    if strands.is_empty() {
        false
    } else {
        strands.iter().filter(|is_reverse| **is_reverse).count() > strands.len() / 2
    }
}

/// Moves every coordinate of `location` by `offset`. External references and
/// gaps carry no local coordinates and are returned as-is.
pub fn shift_location(location: &Location, offset: i64) -> Location {
    match location {
        Location::Range((from, before), (to, after)) => {
            Location::Range((from + offset, before.clone()), (to + offset, after.clone()))
        }
        Location::Between(from, to) => Location::Between(from + offset, to + offset),
        Location::Complement(inner) => {
            Location::Complement(Box::new(shift_location(inner, offset)))
        }
        Location::Join(parts) => Location::Join(shift_all(parts, offset)),
        Location::Order(parts) => Location::Order(shift_all(parts, offset)),
        Location::Bond(parts) => Location::Bond(shift_all(parts, offset)),
        Location::OneOf(parts) => Location::OneOf(shift_all(parts, offset)),
        Location::External(_, _) | Location::Gap(_) => location.clone(),
    }
}

fn shift_all(parts: &[Location], offset: i64) -> Vec<Location> {
    parts
        .iter()
        .map(|part| shift_location(part, offset))
        .collect()
}

pub fn feature_view(feature: &GbFeature) -> FeatureView {
    let (start, end) = match feature.location.find_bounds() {
        Ok(bounds) => bounds,
        Err(e) => {
            warn!(kind = %feature.kind, "feature has no local bounds, reporting 0..0: {e:?}");
            (0, 0)
        }
    };
    let qualifier = |key: &str| {
        feature
            .qualifier_values(key.into())
            .next()
            .map(|value| value.to_string())
            .unwrap_or_default()
    };
    let strand = Strand::from_forward(!feature_is_reverse(feature));
    let color = match strand {
        Strand::Forward => qualifier(FWD_COLOR),
        Strand::Reverse => qualifier(REV_COLOR),
    };
    FeatureView {
        start,
        end,
        strand,
        kind: feature.kind.to_string(),
        label: qualifier(LABEL),
        color,
    }
}
