use serde::{Deserialize, Serialize};

use crate::parts_db::{EnzymeId, SiteId};

/// A pair of flanking sequences tied to one restriction enzyme. The same site
/// serves as an "adapter" (outer flank of a fragment) or a "receiver" (inner
/// flank accepting children), depending on who references it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterSite {
    pub id: SiteId,
    pub name: String,
    #[serde(default)]
    pub site5: String,
    #[serde(default)]
    pub site3: String,
    pub enzyme_id: EnzymeId,
}

impl AdapterSite {
    pub fn new(id: &str, name: &str, site5: &str, site3: &str, enzyme_id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            site5: site5.to_string(),
            site3: site3.to_string(),
            enzyme_id: enzyme_id.to_string(),
        }
    }

    /// `(site5, site3)`
    pub fn flanks(&self) -> (&str, &str) {
        (&self.site5, &self.site3)
    }
}
