use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::comparator::Metric;
use super::error::ConfigError;
use super::style::SeriesStyle;

/// Structure representing a rate study comparison. Contains the target, the summary files, and
/// how they are normalized and drawn.
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    pub target: String,
    pub files: Vec<PathBuf>,
    pub styles: Vec<SeriesStyle>,
    #[serde(default)]
    pub metric: Metric,
    #[serde(default)]
    pub reference_index: usize,
    #[serde(default)]
    pub last_runs: Option<usize>,
}

impl Default for StudyConfig {
    /// Generate a new StudyConfig. No files, normalized to the lowest current run
    fn default() -> Self {
        Self {
            target: String::from(""),
            files: vec![],
            styles: vec![],
            metric: Metric::RelativeYield,
            reference_index: 0,
            last_runs: None,
        }
    }
}

impl StudyConfig {
    /// Read the configuration in a YAML file
    /// Returns a StudyConfig if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Write the configuration to a YAML file
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(config_path, yaml_str)?;
        Ok(())
    }

    /// Append a file with its style
    pub fn add_file(&mut self, path: PathBuf, style: SeriesStyle) {
        self.files.push(path);
        self.styles.push(style);
    }

    /// Remove the file (and its style) at idx, if it exists
    pub fn remove_file(&mut self, idx: usize) {
        if idx < self.files.len() {
            self.files.remove(idx);
        }
        if idx < self.styles.len() {
            self.styles.remove(idx);
        }
    }

    pub fn has_target(&self) -> bool {
        !self.target.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{MarkerShape, StyleColor};

    #[test]
    fn test_read_yaml() {
        let yaml = r#"
target: Au197
files:
  - phase3/cafe_prod_Au197_MF_report_summary.csv
  - phase2/cafe_prod_Au197_MF_report_summary.csv
styles:
  - { marker: v, color: g }
  - { marker: "^", color: b, label: second pass }
metric: live_time
"#;
        let config: StudyConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.target, "Au197");
        assert_eq!(config.files.len(), 2);
        assert_eq!(config.styles[1].marker, MarkerShape::TriangleUp);
        assert_eq!(config.styles[1].label.as_deref(), Some("second pass"));
        assert_eq!(config.metric, Metric::LiveTime);
        assert_eq!(config.reference_index, 0);
        assert_eq!(config.last_runs, None);
    }

    #[test]
    fn test_add_remove_file() {
        let mut config = StudyConfig::default();
        assert!(!config.has_target());
        config.add_file(
            PathBuf::from("a.csv"),
            SeriesStyle::new(MarkerShape::Square, StyleColor::new(1, 2, 3)),
        );
        config.add_file(PathBuf::from("b.csv"), SeriesStyle::default());
        config.remove_file(0);
        assert_eq!(config.files, vec![PathBuf::from("b.csv")]);
        assert_eq!(config.styles, vec![SeriesStyle::default()]);
        config.remove_file(5);
        assert_eq!(config.files.len(), 1);
    }
}
