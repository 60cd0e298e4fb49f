//! Editor tuning parameters.
//!
//! All distances are in pixels. The defaults match a 1:1 zoom; hosts that
//! zoom the canvas scale these instead of the polygon coordinates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading an [`EditorConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for '{field}': {value} (must be positive)")]
    NonPositive { field: &'static str, value: i32 },
}

/// Configuration for constraint heuristics and hit testing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Two freshly adjacent vertices closer than this on an axis get an
    /// automatic vertical/horizontal edge constraint
    pub auto_constraint_threshold: i32,
    /// Maximum distance for a point to pick a vertex
    pub vertex_hit_radius: i32,
    /// Maximum perpendicular distance for a point to pick an edge
    pub edge_hit_distance: i32,
    /// Extent below which an edge is not range-checked on an axis
    pub edge_bbox_slack: i32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            auto_constraint_threshold: 5,
            vertex_hit_radius: 5,
            edge_hit_distance: 10,
            edge_bbox_slack: 20,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("auto_constraint_threshold", self.auto_constraint_threshold),
            ("vertex_hit_radius", self.vertex_hit_radius),
            ("edge_hit_distance", self.edge_hit_distance),
            ("edge_bbox_slack", self.edge_bbox_slack),
        ];
        for (field, value) in fields {
            if value <= 0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        Ok(())
    }
}
