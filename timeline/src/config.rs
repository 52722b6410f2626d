use crate::error::{Error, Result};
use crate::layout::LanePolicy;
use chrono::format::{Item, StrftimeItems};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry and labelling knobs for the layout.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// pixels_per_day = 80.0
/// max_concurrent_lanes = 4
/// label_format = "%d/%m"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// x of the mainline lane
    pub main_x: f64,
    /// x of the development lane
    pub dev_x: f64,
    /// x of feature lane 0
    pub branch_offset_start: f64,
    /// Distance between neighbouring feature lanes
    pub branch_spacing: f64,
    /// Feature lanes before slots are recycled
    pub max_concurrent_lanes: usize,
    /// How feature lanes are handed out
    pub lane_policy: LanePolicy,
    pub pixels_per_day: f64,
    /// y of the range start
    pub top_padding: f64,
    pub min_height: f64,
    /// Added below the last day when sizing the canvas
    pub height_padding: f64,
    /// strftime pattern for axis labels
    pub label_format: String,
    /// Emit the synthetic dev -> main markers
    pub weekly_merges: bool,
    pub weekly_merge_day: Weekday,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            main_x: 50.0,
            dev_x: 150.0,
            branch_offset_start: 250.0,
            branch_spacing: 60.0,
            max_concurrent_lanes: 3,
            lane_policy: LanePolicy::RoundRobin,
            pixels_per_day: 100.0,
            top_padding: 40.0,
            min_height: 600.0,
            height_padding: 100.0,
            label_format: "%-d %b".to_string(),
            weekly_merges: true,
            weekly_merge_day: Weekday::Mon,
        }
    }
}

impl LayoutConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the geometry keeps fixed lanes apart from feature lanes
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_lanes == 0 {
            return Err(Error::InvalidConfig("max_concurrent_lanes must be at least 1".into()));
        }
        if !(self.pixels_per_day.is_finite() && self.pixels_per_day > 0.0) {
            return Err(Error::InvalidConfig("pixels_per_day must be positive".into()));
        }
        if !(self.branch_spacing.is_finite() && self.branch_spacing > 0.0) {
            return Err(Error::InvalidConfig("branch_spacing must be positive".into()));
        }
        if self.main_x == self.dev_x {
            return Err(Error::InvalidConfig("main_x and dev_x must differ".into()));
        }
        if self.branch_offset_start <= self.main_x.max(self.dev_x) {
            return Err(Error::InvalidConfig(
                "branch_offset_start must lie right of the main and dev lanes".into(),
            ));
        }
        if StrftimeItems::new(&self.label_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::InvalidConfig(format!(
                "label_format {:?} is not a valid strftime pattern",
                self.label_format
            )));
        }
        Ok(())
    }

    /// x of feature lane `index`
    pub fn lane_x(&self, index: usize) -> f64 {
        self.branch_offset_start + index as f64 * self.branch_spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = LayoutConfig::default();
        config.validate().unwrap();
        assert_eq!(config.lane_x(0), 250.0);
        assert_eq!(config.lane_x(2), 370.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = LayoutConfig::from_toml_str(
            "pixels_per_day = 80.0\nmax_concurrent_lanes = 4\nweekly_merge_day = \"Fri\"\n",
        )
        .unwrap();
        assert_eq!(config.pixels_per_day, 80.0);
        assert_eq!(config.max_concurrent_lanes, 4);
        assert_eq!(config.weekly_merge_day, Weekday::Fri);
        assert_eq!(config.lane_policy, LanePolicy::RoundRobin);
        assert_eq!(config.main_x, 50.0);
    }

    #[test]
    fn test_lane_policy_from_toml() {
        let config = LayoutConfig::from_toml_str("lane_policy = \"first-free\"").unwrap();
        assert_eq!(config.lane_policy, LanePolicy::FirstFree);
    }

    #[test]
    fn test_rejects_overlapping_lanes() {
        let err = LayoutConfig::from_toml_str("branch_offset_start = 100.0").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = LayoutConfig::from_toml_str("main_x = 150.0").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_zero_lanes_and_bad_format() {
        assert!(LayoutConfig::from_toml_str("max_concurrent_lanes = 0").is_err());
        assert!(LayoutConfig::from_toml_str("label_format = \"%Q\"").is_err());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = LayoutConfig::from_toml_str("pixels_per_day = \"lots\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "top_padding = 10.0").unwrap();
        let config = LayoutConfig::load(file.path()).unwrap();
        assert_eq!(config.top_padding, 10.0);

        let missing = LayoutConfig::load(Path::new("/nonexistent/lanes.toml")).unwrap_err();
        assert!(matches!(missing, Error::ConfigRead { .. }));
    }
}
