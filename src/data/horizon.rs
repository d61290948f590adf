use std::collections::BTreeMap;
use std::ops::Range;

use super::interval::DepthInterval;
use super::value::{column_kind, Value, ValueKind};

static NULL: Value = Value::Null;

// ---------------------------------------------------------------------------
// Horizon – one depth-bounded layer of a profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Horizon {
    /// Foreign key into the site table.
    pub profile_id: Value,
    /// Unique across the whole collection.
    pub horizon_id: Value,
    pub interval: DepthInterval,
    /// Attribute columns: column_name → value. The designation label, when
    /// bound, is one of these.
    pub attributes: BTreeMap<String, Value>,
}

impl Horizon {
    pub fn top(&self) -> f64 {
        self.interval.top
    }

    pub fn bottom(&self) -> f64 {
        self.interval.bottom
    }

    pub fn thickness(&self) -> f64 {
        self.interval.length()
    }

    /// Attribute value, `Null` when the horizon has no such attribute.
    pub fn attribute(&self, name: &str) -> &Value {
        self.attributes.get(name).unwrap_or(&NULL)
    }
}

// ---------------------------------------------------------------------------
// HorizonTable – all horizons, grouped by profile, plus the profile index
// ---------------------------------------------------------------------------

/// Horizons stored contiguously in profile order, each group sorted by top
/// depth. `groups[p]` is the range of rows belonging to the profile at
/// position `p`; it is built once and never re-derived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HorizonTable {
    horizons: Vec<Horizon>,
    groups: Vec<Range<usize>>,
    attribute_columns: Vec<String>,
}

impl HorizonTable {
    /// Build from per-profile groups, already in profile order and sorted.
    pub(crate) fn from_groups(groups: Vec<Vec<Horizon>>, attribute_columns: Vec<String>) -> Self {
        let total = groups.iter().map(Vec::len).sum();
        let mut horizons = Vec::with_capacity(total);
        let mut ranges = Vec::with_capacity(groups.len());
        for group in groups {
            let start = horizons.len();
            horizons.extend(group);
            ranges.push(start..horizons.len());
        }
        HorizonTable {
            horizons,
            groups: ranges,
            attribute_columns,
        }
    }

    /// Total number of horizons.
    pub fn len(&self) -> usize {
        self.horizons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.horizons.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Horizon> {
        self.horizons.iter()
    }

    pub fn as_slice(&self) -> &[Horizon] {
        &self.horizons
    }

    /// Number of profile groups (equals the site count, empty groups included).
    pub fn num_profiles(&self) -> usize {
        self.groups.len()
    }

    /// Horizons of the profile at `position`, ordered by top depth.
    pub fn profile_horizons(&self, position: usize) -> &[Horizon] {
        match self.groups.get(position) {
            Some(range) => &self.horizons[range.clone()],
            None => &[],
        }
    }

    /// Ordered attribute column names (structural columns excluded).
    pub fn attribute_columns(&self) -> &[String] {
        &self.attribute_columns
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute_columns.iter().any(|c| c == name)
    }

    /// Aggregation kind of an attribute column across the whole table.
    pub fn column_kind(&self, name: &str) -> ValueKind {
        column_kind(self.horizons.iter().map(|h| h.attribute(name)))
    }
}

impl<'a> IntoIterator for &'a HorizonTable {
    type Item = &'a Horizon;
    type IntoIter = std::slice::Iter<'a, Horizon>;

    fn into_iter(self) -> Self::IntoIter {
        self.horizons.iter()
    }
}
