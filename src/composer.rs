//! Recursive composition of parts into sequences and annotated records.
//!
//! A [`Composer`] walks the part DAG depth-first. It keeps the ids on the
//! current path to reject cycles, and memoizes finished nodes so that a
//! sub-assembly shared by several parents is composed once. The memo lives
//! as long as the composer; [`PartView`](crate::part::PartView) creates a
//! fresh one per top-level call.

use std::collections::HashMap;
use tracing::{debug, trace};

use crate::{
    error::{LoopDbError, Result},
    part::Part,
    parts_db::PartsDb,
    record::Record,
    settings::CompositionSettings,
};

#[derive(Debug)]
pub struct Composer<'a> {
    db: &'a PartsDb,
    path: Vec<&'a str>,
    sizes: HashMap<&'a str, usize>,
    levels: HashMap<&'a str, usize>,
    sequences: HashMap<&'a str, String>,
    records: HashMap<&'a str, Record>,
}

impl<'a> Composer<'a> {
    pub fn new(db: &'a PartsDb) -> Self {
        Self {
            db,
            path: vec![],
            sizes: HashMap::new(),
            levels: HashMap::new(),
            sequences: HashMap::new(),
            records: HashMap::new(),
        }
    }

    fn settings(&self) -> &'a CompositionSettings {
        &self.db.settings
    }

    fn enter(&mut self, part: &'a Part) -> Result<()> {
        if self.path.contains(&part.id.as_str()) {
            let mut path = self.path.join(" -> ");
            path.push_str(" -> ");
            path.push_str(&part.id);
            return Err(LoopDbError::CycleDetected {
                part: part.id.clone(),
                path,
            });
        }
        trace!(part = %part.id, depth = self.path.len(), "visit");
        self.path.push(part.id.as_str());
        Ok(())
    }

    /// Runs `body` with `part` on the path. The path is cut back to its
    /// entry depth whether or not `body` fails, so a composer stays usable
    /// after an error.
    fn visit<T>(
        &mut self,
        part: &'a Part,
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let depth = self.path.len();
        self.enter(part)?;
        let result = body(self);
        self.path.truncate(depth);
        result
    }

    fn own_sequence(part: &'a Part) -> Result<&'a str> {
        part.sequence
            .as_deref()
            .ok_or_else(|| LoopDbError::UndefinedSequence {
                part: part.id.clone(),
            })
    }

    pub fn size(&mut self, id: &str) -> Result<usize> {
        let part = self.db.part(id)?;
        if let Some(size) = self.sizes.get(part.id.as_str()) {
            return Ok(*size);
        }
        let size = self.visit(part, |this| {
            let children = this.db.children(&part.id)?;
            if children.is_empty() {
                return Ok(Self::own_sequence(part)?.len());
            }
            let mut total = 0;
            for child in children {
                total += this.size(&child.id)?;
            }
            Ok(total)
        })?;
        self.sizes.insert(part.id.as_str(), size);
        Ok(size)
    }

    pub fn level(&mut self, id: &str) -> Result<usize> {
        let part = self.db.part(id)?;
        if let Some(level) = self.levels.get(part.id.as_str()) {
            return Ok(*level);
        }
        let deepest = self.visit(part, |this| {
            let mut deepest = None;
            for child in this.db.children(&part.id)? {
                let level = this.level(&child.id)?;
                deepest = Some(deepest.map_or(level, |d: usize| d.max(level)));
            }
            Ok(deepest)
        })?;
        let level = deepest.map_or(0, |d| d + 1);
        self.levels.insert(part.id.as_str(), level);
        Ok(level)
    }

    /// Payload sequence: the own sequence of a leaf, or
    /// `receiver5 + c0 + (adapter5(ci) + ci)... + receiver3` for a composite.
    /// Only the left adapter flank of each non-first child forms a junction.
    pub fn composed_sequence(&mut self, id: &str) -> Result<String> {
        let part = self.db.part(id)?;
        if let Some(seq) = self.sequences.get(part.id.as_str()) {
            debug!(part = %part.id, "reusing composed sequence");
            return Ok(seq.clone());
        }
        let seq = self.visit(part, |this| {
            let children = this.db.children(&part.id)?;
            if children.is_empty() {
                return Ok(Self::own_sequence(part)?.to_string());
            }
            let (receiver5, receiver3) = this.db.receiver_sites(part)?;
            let mut seq = receiver5.to_string();
            for (index, child) in children.into_iter().enumerate() {
                if index > 0 {
                    seq.push_str(this.db.adapter_sites(child)?.0);
                }
                seq.push_str(&this.composed_sequence(&child.id)?);
            }
            seq.push_str(receiver3);
            Ok(seq)
        })?;
        self.sequences.insert(part.id.as_str(), seq.clone());
        Ok(seq)
    }

    /// Payload followed by the part's own backbone.
    pub fn full_sequence(&mut self, id: &str) -> Result<String> {
        let part = self.db.part(id)?;
        let backbone = self.db.backbone_view(&self.db.part_backbone(part)?.id)?;
        let mut seq = self.composed_sequence(id)?;
        seq.push_str(&backbone.sequence()?);
        Ok(seq)
    }

    /// Record counterpart of `composed_sequence`, without identity.
    fn compose_record(&mut self, id: &str) -> Result<Record> {
        let part = self.db.part(id)?;
        if let Some(record) = self.records.get(part.id.as_str()) {
            debug!(part = %part.id, "reusing composed record");
            return Ok(record.clone());
        }
        let coordinates = self.settings().feature_coordinates;
        let record = self.visit(part, |this| {
            let children = this.db.children(&part.id)?;
            if children.is_empty() {
                return Ok(part.own_record(Self::own_sequence(part)?));
            }
            let (receiver5, receiver3) = this.db.receiver_sites(part)?;
            let mut record = Record::new(receiver5);
            for (index, child) in children.into_iter().enumerate() {
                if index > 0 {
                    record.push_str(this.db.adapter_sites(child)?.0);
                }
                let child_record = this.compose_record(&child.id)?;
                record.append(child_record, coordinates);
            }
            record.push_str(receiver3);
            Ok(record)
        })?;
        self.records.insert(part.id.as_str(), record.clone());
        Ok(record)
    }

    pub fn record(&mut self, id: &str) -> Result<Record> {
        let part = self.db.part(id)?;
        let mut record = self.compose_record(id)?;
        record.stamp(&part.id, &part.name, &self.settings().description);
        Ok(record)
    }

    /// Payload record followed by the backbone record. The assembled
    /// sequence must be pure A/C/G/T.
    pub fn full_record(&mut self, id: &str) -> Result<Record> {
        let part = self.db.part(id)?;
        let settings = self.settings();
        let backbone = self.db.backbone_view(&self.db.part_backbone(part)?.id)?;
        let mut record = self.compose_record(id)?;
        record.append(backbone.record()?, settings.feature_coordinates);
        record.validate_alphabet(&part.describe())?;
        record.stamp(&part.id, &part.name, &settings.description);
        if settings.circular_full_record {
            record.set_circular(true);
        }
        Ok(record)
    }

    #[cfg(test)]
    fn composed_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .sequences
            .keys()
            .chain(self.records.keys())
            .map(|id| id.to_string())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}
