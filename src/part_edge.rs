use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    error::{LoopDbError, Result},
    parts_db::PartId,
};

/// Ordered parent -> child relation. Positions are unique among siblings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartEdge {
    pub parent_id: PartId,
    pub child_id: PartId,
    pub position: i64,
}

impl PartEdge {
    pub fn new(parent_id: &str, child_id: &str, position: i64) -> Self {
        Self {
            parent_id: parent_id.to_string(),
            child_id: child_id.to_string(),
            position,
        }
    }
}

/// Outgoing edges of `parent`, ascending by position.
pub fn ordered_children<'a>(parent: &str, edges: &'a [PartEdge]) -> Result<Vec<&'a PartEdge>> {
    let ordered: Vec<&PartEdge> = edges
        .iter()
        .filter(|edge| edge.parent_id == parent)
        .sorted_by_key(|edge| edge.position)
        .collect();
    if let Some((edge, _)) = ordered
        .iter()
        .tuple_windows()
        .find(|(a, b)| a.position == b.position)
    {
        return Err(LoopDbError::DuplicatePosition {
            parent: parent.to_string(),
            position: edge.position,
        });
    }
    Ok(ordered)
}
