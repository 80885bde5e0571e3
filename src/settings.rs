use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_DESCRIPTION: &str = "Generated by LoopDB";

/// How feature coordinates behave when records are concatenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureCoordinates {
    /// Coordinates stay relative to the leaf sequence that owns the feature.
    #[default]
    AsStored,
    /// Coordinates are moved by the length of everything concatenated before them.
    Shifted,
}

impl FeatureCoordinates {
    /// Offset applied to a record appended after `preceding_len` bases.
    pub fn offset(self, preceding_len: usize) -> i64 {
        match self {
            FeatureCoordinates::AsStored => 0,
            FeatureCoordinates::Shifted => preceding_len as i64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionSettings {
    pub description: String,
    pub feature_coordinates: FeatureCoordinates,
    pub circular_full_record: bool,
}

impl Default for CompositionSettings {
    fn default() -> Self {
        Self {
            description: DEFAULT_DESCRIPTION.to_string(),
            feature_coordinates: FeatureCoordinates::AsStored,
            circular_full_record: false,
        }
    }
}

impl CompositionSettings {
    pub fn load_from_path(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save_to_path(&self, path: &str) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: CompositionSettings =
            serde_json::from_str(r#"{"feature_coordinates":"Shifted"}"#).unwrap();
        assert_eq!(settings.feature_coordinates, FeatureCoordinates::Shifted);
        assert_eq!(settings.description, DEFAULT_DESCRIPTION);
        assert!(!settings.circular_full_record);
    }

    #[test]
    fn test_offsets() {
        assert_eq!(FeatureCoordinates::AsStored.offset(12), 0);
        assert_eq!(FeatureCoordinates::Shifted.offset(12), 12);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let path = path.to_str().unwrap();
        let settings = CompositionSettings {
            description: "Loop level 1".to_string(),
            feature_coordinates: FeatureCoordinates::Shifted,
            circular_full_record: true,
        };
        settings.save_to_path(path).unwrap();
        assert_eq!(CompositionSettings::load_from_path(path).unwrap(), settings);
    }
}
