//! In-memory snapshot of the parts database.
//!
//! Entities live in maps keyed by their id and refer to each other by id.
//! Everything derived from the snapshot is computed by explicit lookups; the
//! snapshot itself is never mutated by composition.

use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::{
    ENZYMES,
    adapter_site::AdapterSite,
    backbone::{Backbone, BackboneView},
    base_sequence::BaseSequence,
    composer::Composer,
    error::{LoopDbError, Result},
    part::{Part, PartView},
    part_edge::{PartEdge, ordered_children},
    record::Record,
    restriction_enzyme::RestrictionEnzyme,
    settings::CompositionSettings,
};

pub type EnzymeId = String;
pub type SiteId = String;
pub type BaseSeqId = String;
pub type BackboneId = String;
pub type PartId = String;

/// Identity and unique name shared by all stored entities.
pub trait Entity {
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

macro_rules! impl_entity {
    ($type:ty, $kind:literal) => {
        impl Entity for $type {
            const KIND: &'static str = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn name(&self) -> &str {
                &self.name
            }
        }
    };
}

impl_entity!(RestrictionEnzyme, "restriction enzyme");
impl_entity!(AdapterSite, "adapter site");
impl_entity!(BaseSequence, "base sequence");
impl_entity!(Backbone, "backbone");
impl_entity!(Part, "part");

fn insert_unique<T: Entity>(map: &mut HashMap<String, T>, item: T) -> Result<()> {
    if map.contains_key(item.id()) {
        return Err(LoopDbError::DuplicateId {
            kind: T::KIND,
            id: item.id().to_string(),
        });
    }
    if map.values().any(|other| other.name() == item.name()) {
        return Err(LoopDbError::DuplicateName {
            kind: T::KIND,
            name: item.name().to_string(),
        });
    }
    map.insert(item.id().to_string(), item);
    Ok(())
}

fn lookup<'a, T: Entity>(map: &'a HashMap<String, T>, id: &str) -> Result<&'a T> {
    map.get(id).ok_or_else(|| LoopDbError::not_found(T::KIND, id))
}

fn by_name<'a, T: Entity>(map: &'a HashMap<String, T>, name: &str) -> Option<&'a T> {
    map.values().find(|item| item.name() == name)
}

fn check_unique_names<T: Entity>(map: &HashMap<String, T>) -> Result<()> {
    match map.values().map(|item| item.name()).sorted().duplicates().next() {
        Some(name) => Err(LoopDbError::DuplicateName {
            kind: T::KIND,
            name: name.to_string(),
        }),
        None => Ok(()),
    }
}

fn sorted_values<T: Entity>(map: &HashMap<String, T>) -> Vec<&T> {
    map.values().sorted_by(|a, b| a.id().cmp(b.id())).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PartsDb {
    pub enzymes: HashMap<EnzymeId, RestrictionEnzyme>,
    pub sites: HashMap<SiteId, AdapterSite>,
    pub base_sequences: HashMap<BaseSeqId, BaseSequence>,
    pub backbones: HashMap<BackboneId, Backbone>,
    pub parts: HashMap<PartId, Part>,
    pub edges: Vec<PartEdge>,
    pub settings: CompositionSettings,
}

impl PartsDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CompositionSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn load_from_path(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let db: Self = serde_json::from_str(&text)?;
        debug!(
            path,
            parts = db.parts.len(),
            edges = db.edges.len(),
            "loaded parts snapshot"
        );
        Ok(db)
    }

    pub fn save_to_path(&self, path: &str) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn add_enzyme(&mut self, enzyme: RestrictionEnzyme) -> Result<()> {
        insert_unique(&mut self.enzymes, enzyme)
    }

    /// Copies an enzyme of the builtin catalog into this snapshot, using its
    /// name as id.
    pub fn add_enzyme_from_catalog(&mut self, name: &str) -> Result<&RestrictionEnzyme> {
        let mut enzyme = ENZYMES
            .by_name(name)
            .cloned()
            .ok_or_else(|| LoopDbError::not_found(RestrictionEnzyme::KIND, name))?;
        enzyme.id = name.to_string();
        self.add_enzyme(enzyme)?;
        self.enzyme(name)
    }

    pub fn add_site(&mut self, site: AdapterSite) -> Result<()> {
        self.enzyme(&site.enzyme_id)?;
        insert_unique(&mut self.sites, site)
    }

    pub fn add_base_sequence(&mut self, base_sequence: BaseSequence) -> Result<()> {
        self.site(&base_sequence.receiver_id)?;
        base_sequence.check_features()?;
        insert_unique(&mut self.base_sequences, base_sequence)
    }

    pub fn add_backbone(&mut self, backbone: Backbone) -> Result<()> {
        self.base_sequence(&backbone.base_sequence_id)?;
        self.site(&backbone.adapter_id)?;
        insert_unique(&mut self.backbones, backbone)
    }

    pub fn add_part(&mut self, part: Part) -> Result<()> {
        if let Some(backbone_id) = &part.backbone_id {
            self.backbone(backbone_id)?;
        }
        Self::check_part_features(&part)?;
        insert_unique(&mut self.parts, part)
    }

    /// Adds a parent -> child edge. Both parts must exist and the position
    /// must be free among the parent's children.
    pub fn add_edge(&mut self, edge: PartEdge) -> Result<()> {
        self.part(&edge.parent_id)?;
        self.part(&edge.child_id)?;
        if self
            .edges
            .iter()
            .any(|other| other.parent_id == edge.parent_id && other.position == edge.position)
        {
            return Err(LoopDbError::DuplicatePosition {
                parent: edge.parent_id,
                position: edge.position,
            });
        }
        self.edges.push(edge);
        Ok(())
    }

    pub fn enzyme(&self, id: &str) -> Result<&RestrictionEnzyme> {
        lookup(&self.enzymes, id)
    }

    pub fn site(&self, id: &str) -> Result<&AdapterSite> {
        lookup(&self.sites, id)
    }

    pub fn base_sequence(&self, id: &str) -> Result<&BaseSequence> {
        lookup(&self.base_sequences, id)
    }

    pub fn backbone(&self, id: &str) -> Result<&Backbone> {
        lookup(&self.backbones, id)
    }

    pub fn part(&self, id: &str) -> Result<&Part> {
        lookup(&self.parts, id)
    }

    pub fn enzyme_by_name(&self, name: &str) -> Option<&RestrictionEnzyme> {
        by_name(&self.enzymes, name)
    }

    pub fn site_by_name(&self, name: &str) -> Option<&AdapterSite> {
        by_name(&self.sites, name)
    }

    pub fn base_sequence_by_name(&self, name: &str) -> Option<&BaseSequence> {
        by_name(&self.base_sequences, name)
    }

    pub fn backbone_by_name(&self, name: &str) -> Option<&Backbone> {
        by_name(&self.backbones, name)
    }

    pub fn part_by_name(&self, name: &str) -> Option<&Part> {
        by_name(&self.parts, name)
    }

    pub fn site_enzyme(&self, site: &AdapterSite) -> Result<&RestrictionEnzyme> {
        self.enzyme(&site.enzyme_id)
    }

    pub fn part_view(&self, id: &str) -> Result<PartView<'_>> {
        Ok(PartView::new(self, self.part(id)?))
    }

    pub fn backbone_view(&self, id: &str) -> Result<BackboneView<'_>> {
        Ok(BackboneView::new(self, self.backbone(id)?))
    }

    pub fn backbone_sequence(&self, id: &str) -> Result<String> {
        self.backbone_view(id)?.sequence()
    }

    /// The part's backbone; `MissingBackbone` when unset or dangling.
    pub fn part_backbone(&self, part: &Part) -> Result<&Backbone> {
        part.backbone_id
            .as_deref()
            .and_then(|id| self.backbones.get(id))
            .ok_or_else(|| LoopDbError::missing_backbone(&part.id))
    }

    /// `(site5, site3)` of the part's backbone adapter.
    pub fn adapter_sites(&self, part: &Part) -> Result<(&str, &str)> {
        let backbone = self.part_backbone(part)?;
        let adapter = self
            .sites
            .get(&backbone.adapter_id)
            .ok_or_else(|| LoopDbError::missing_backbone(&part.id))?;
        Ok(adapter.flanks())
    }

    /// `(site5, site3)` of the receiver of the part's backbone base sequence.
    pub fn receiver_sites(&self, part: &Part) -> Result<(&str, &str)> {
        let backbone = self.part_backbone(part)?;
        let receiver = self
            .base_sequences
            .get(&backbone.base_sequence_id)
            .and_then(|base| self.sites.get(&base.receiver_id))
            .ok_or_else(|| LoopDbError::missing_backbone(&part.id))?;
        Ok(receiver.flanks())
    }

    pub fn child_edges(&self, parent: &str) -> Result<Vec<&PartEdge>> {
        ordered_children(parent, &self.edges)
    }

    /// Children of `parent`, ordered by edge position.
    pub fn children(&self, parent: &str) -> Result<Vec<&Part>> {
        self.child_edges(parent)?
            .into_iter()
            .map(|edge| self.part(&edge.child_id))
            .collect()
    }

    /// Distinct parents of `child`, sorted by id.
    pub fn parents_of(&self, child: &str) -> Vec<&Part> {
        self.edges
            .iter()
            .filter(|edge| edge.child_id == child)
            .filter_map(|edge| self.parts.get(&edge.parent_id))
            .sorted_by(|a, b| a.id.cmp(&b.id))
            .dedup_by(|a, b| a.id == b.id)
            .collect()
    }

    /// Backbones built on `base_sequence`, sorted by id.
    pub fn backbones_using(&self, base_sequence: &str) -> Vec<&Backbone> {
        sorted_values(&self.backbones)
            .into_iter()
            .filter(|backbone| backbone.base_sequence_id == base_sequence)
            .collect()
    }

    fn check_part_features(part: &Part) -> Result<()> {
        match &part.sequence {
            Some(sequence) => {
                let entity = part.describe();
                part.features
                    .iter()
                    .try_for_each(|feature| feature.check_bounds(&entity, sequence.len()))
            }
            None => Ok(()),
        }
    }

    /// Checks the snapshot invariants and returns the first violation.
    pub fn validate(&self) -> Result<()> {
        let ret = self.validate_inner();
        if let Err(e) = &ret {
            warn!("parts snapshot is inconsistent: {e}");
        }
        ret
    }

    fn validate_inner(&self) -> Result<()> {
        check_unique_names(&self.enzymes)?;
        check_unique_names(&self.sites)?;
        check_unique_names(&self.base_sequences)?;
        check_unique_names(&self.backbones)?;
        check_unique_names(&self.parts)?;

        for enzyme in sorted_values(&self.enzymes) {
            enzyme.reverse_complement()?;
        }
        for site in sorted_values(&self.sites) {
            self.site_enzyme(site)?;
        }
        for base_sequence in sorted_values(&self.base_sequences) {
            self.site(&base_sequence.receiver_id)?;
            base_sequence.check_features()?;
        }
        for backbone in sorted_values(&self.backbones) {
            self.base_sequence(&backbone.base_sequence_id)?;
            self.site(&backbone.adapter_id)?;
        }
        for part in sorted_values(&self.parts) {
            if let Some(backbone_id) = &part.backbone_id {
                self.backbone(backbone_id)?;
            }
            Self::check_part_features(part)?;
        }
        for edge in &self.edges {
            self.part(&edge.parent_id)?;
            self.part(&edge.child_id)?;
        }

        // Level traversal visits every edge once and fails on duplicate
        // sibling positions and on cycles.
        let mut composer = Composer::new(self);
        for part in sorted_values(&self.parts) {
            composer.level(&part.id)?;
        }
        Ok(())
    }

    /// Full records of every part, each composed independently and in
    /// parallel. Sorted by part id.
    pub fn compose_all(&self) -> Vec<(PartId, Result<Record>)> {
        let ids: Vec<&str> = self.parts.keys().map(|id| id.as_str()).sorted().collect();
        ids.par_iter()
            .map(|id| {
                let record = Composer::new(self).full_record(id);
                (id.to_string(), record)
            })
            .collect()
    }
}
