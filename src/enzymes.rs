use crate::restriction_enzyme::RestrictionEnzyme;
use anyhow::{Result, anyhow};
use std::fs;
use tracing::warn;

const BUILTIN_ENZYMES_JSON: &str = include_str!("../assets/enzymes.json");

/// Catalog of known restriction enzymes, keyed by name.
#[derive(Clone, Debug)]
pub struct Enzymes {
    restriction_enzymes: Vec<RestrictionEnzyme>,
}

impl Enzymes {
    fn new(json_text: &str) -> Result<Self> {
        let mut ret = Self {
            restriction_enzymes: vec![],
        };
        let res: serde_json::Value = serde_json::from_str(json_text)?;
        let arr = res
            .as_array()
            .ok_or(anyhow!("Enzymes file is not a JSON array"))?;
        for row in arr {
            match row.get("type").and_then(|t| t.as_str()) {
                Some("restriction") => {
                    let mut re: RestrictionEnzyme = match serde_json::from_value(row.clone()).ok() {
                        Some(re) => re,
                        None => return Err(anyhow!("Bad restriction enzyme: {row}")),
                    };
                    re.reverse_complement()
                        .map_err(|e| anyhow!("Bad restriction enzyme {}: {e}", re.name))?;
                    if re.id.is_empty() {
                        re.id = re.name.clone();
                    }
                    ret.restriction_enzymes.push(re);
                }
                Some(other) => warn!("Skipping enzyme of type '{other}'"),
                None => return Err(anyhow!("Missing enzyme type for {}", row)),
            }
        }
        Ok(ret)
    }

    pub fn restriction_enzymes(&self) -> &Vec<RestrictionEnzyme> {
        &self.restriction_enzymes
    }

    pub fn by_name(&self, name: &str) -> Option<&RestrictionEnzyme> {
        self.restriction_enzymes.iter().find(|re| re.name == name)
    }

    pub fn restriction_enzymes_by_name(&self, names: &[&str]) -> Vec<RestrictionEnzyme> {
        self.restriction_enzymes
            .iter()
            .filter(|re| names.contains(&re.name.as_str()))
            .cloned()
            .collect()
    }
}

pub fn load_restriction_enzymes_from_json_text(json_text: &str) -> Result<Vec<RestrictionEnzyme>> {
    Ok(Enzymes::new(json_text)?.restriction_enzymes)
}

pub fn load_restriction_enzymes_from_path(path: &str) -> Result<Vec<RestrictionEnzyme>> {
    let text = fs::read_to_string(path)?;
    load_restriction_enzymes_from_json_text(&text)
}

impl Default for Enzymes {
    fn default() -> Self {
        Enzymes::new(BUILTIN_ENZYMES_JSON).expect("builtin enzyme catalog is valid")
    }
}
