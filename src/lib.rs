//! LoopDB: a hierarchical DNA parts database for Loop / Golden Gate assembly.
//!
//! Parts form a DAG through ordered [`PartEdge`](part_edge::PartEdge)s. A
//! leaf part owns its sequence; a composite part is assembled from its
//! children, bracketed by its backbone's receiver site. See
//! [`PartView`](part::PartView) for the per-part operations.

use enzymes::Enzymes;
use lazy_static::lazy_static;

pub mod adapter_site;
pub mod backbone;
pub mod base_sequence;
pub mod composer;
pub mod enzymes;
pub mod error;
pub mod feature;
pub mod nucleotides;
pub mod part;
pub mod part_edge;
pub mod parts_db;
pub mod record;
pub mod restriction_enzyme;
pub mod settings;

pub use error::{ErrorCode, LoopDbError, Result};
pub use loopdb_protocol::{FeatureView, SequenceRecordView, Strand};
pub use parts_db::PartsDb;

lazy_static! {
    // Builtin Type IIS restriction enzymes
    pub static ref ENZYMES: Enzymes = Enzymes::default();
}
