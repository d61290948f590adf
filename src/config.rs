//! Construction-time configuration: column bindings, validation switches and
//! collection-level metadata.
//!
//! Everything here is plain data with serde defaults, so a config can be
//! written inline in code or read from a JSON file:
//!
//! ```json
//! {
//!   "bindings": { "profile_id": "id", "horizon_id": "hzid", "designation": "hzname" },
//!   "validation": { "gap_policy": "reject" },
//!   "crs": "EPSG:4326"
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Which input columns carry the structural fields of a horizon or site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnBindings {
    pub profile_id: String,
    pub horizon_id: String,
    pub top: String,
    pub bottom: String,
    /// Optional horizon designation label column (e.g. `hzname`).
    pub designation: Option<String>,
}

impl Default for ColumnBindings {
    fn default() -> Self {
        ColumnBindings {
            profile_id: "id".to_string(),
            horizon_id: "hzid".to_string(),
            top: "top".to_string(),
            bottom: "bottom".to_string(),
            designation: None,
        }
    }
}

impl ColumnBindings {
    pub fn new(
        profile_id: impl Into<String>,
        horizon_id: impl Into<String>,
        depths: (&str, &str),
    ) -> Self {
        ColumnBindings {
            profile_id: profile_id.into(),
            horizon_id: horizon_id.into(),
            top: depths.0.to_string(),
            bottom: depths.1.to_string(),
            designation: None,
        }
    }

    pub fn with_designation(mut self, column: impl Into<String>) -> Self {
        self.designation = Some(column.into());
        self
    }

    /// Whether `name` is one of the structural columns (not an attribute).
    pub fn is_structural(&self, name: &str) -> bool {
        name == self.profile_id || name == self.horizon_id || name == self.top || name == self.bottom
    }
}

/// What to do when a horizon does not start where its predecessor ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    Allow,
    #[default]
    Warn,
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Permit zero-thickness horizons (`top == bottom`). Inverted horizons
    /// are rejected regardless.
    pub allow_degenerate: bool,
    pub gap_policy: GapPolicy,
}

/// Full construction config for a [`ProfileCollection`](crate::ProfileCollection).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub bindings: ColumnBindings,
    pub validation: ValidationOptions,
    /// Opaque coordinate reference system tag, carried but never interpreted.
    pub crs: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl CollectionConfig {
    pub fn new(bindings: ColumnBindings) -> Self {
        CollectionConfig {
            bindings,
            ..Default::default()
        }
    }

    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = Some(crs.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_validation(mut self, validation: ValidationOptions) -> Self {
        self.validation = validation;
        self
    }

    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("parsing collection config")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text)
    }
}
