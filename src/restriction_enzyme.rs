use serde::{Deserialize, Serialize};

use crate::{error::Result, nucleotides, parts_db::EnzymeId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionEnzyme {
    #[serde(default)]
    pub id: EnzymeId,
    pub name: String,
    pub sequence: String,
    #[serde(default)]
    pub note: Option<String>,
}

impl RestrictionEnzyme {
    pub fn new(id: &str, name: &str, sequence: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            sequence: sequence.to_string(),
            note: None,
        }
    }

    /// Recognition sequence on the opposite strand. Not stored; derived on each call.
    pub fn reverse_complement(&self) -> Result<String> {
        nucleotides::reverse_complement(&self.describe(), &self.sequence)
    }

    pub fn is_palindromic(&self) -> Result<bool> {
        Ok(self.sequence == self.reverse_complement()?)
    }

    pub(crate) fn describe(&self) -> String {
        format!("restriction enzyme '{}'", self.name)
    }
}
