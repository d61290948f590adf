use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{Error, Result};

use super::value::Value;

static NULL: Value = Value::Null;

// ---------------------------------------------------------------------------
// SiteRecord – profile-level attributes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SiteRecord {
    pub profile_id: Value,
    /// Site columns: column_name → value.
    pub attributes: BTreeMap<String, Value>,
}

impl SiteRecord {
    pub fn new(profile_id: Value) -> Self {
        SiteRecord {
            profile_id,
            attributes: BTreeMap::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> &Value {
        self.attributes.get(name).unwrap_or(&NULL)
    }
}

// ---------------------------------------------------------------------------
// SiteTable – one record per profile, in collection order
// ---------------------------------------------------------------------------

/// Site records with a pre-computed identity index and per-column
/// unique-value sets (used by [`filter`](super::filter)).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteTable {
    records: Vec<SiteRecord>,
    positions: HashMap<Value, usize>,
    /// Ordered list of site attribute column names.
    pub column_names: Vec<String>,
    /// For each attribute column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<Value>>,
    /// Opaque coordinate reference system tag.
    pub crs: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl SiteTable {
    /// Build the index from records in collection order. Profile identities
    /// must be unique and non-null.
    pub fn from_records(records: Vec<SiteRecord>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(records.len());
        let mut column_names: Vec<String> = Vec::new();
        let mut unique_values: BTreeMap<String, BTreeSet<Value>> = BTreeMap::new();

        for (pos, rec) in records.iter().enumerate() {
            if rec.profile_id.is_null() {
                return Err(Error::schema(format!("site row {pos} has a null profile id")));
            }
            if positions.insert(rec.profile_id.clone(), pos).is_some() {
                return Err(Error::consistency(format!(
                    "duplicate profile id {} in site table",
                    rec.profile_id
                )));
            }
            for (col, val) in &rec.attributes {
                if !unique_values.contains_key(col) {
                    column_names.push(col.clone());
                }
                unique_values.entry(col.clone()).or_default().insert(val.clone());
            }
        }

        Ok(SiteTable {
            records,
            positions,
            column_names,
            unique_values,
            crs: None,
            metadata: BTreeMap::new(),
        })
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SiteRecord] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&SiteRecord> {
        self.records.get(position)
    }

    pub fn position_of(&self, profile_id: &Value) -> Option<usize> {
        self.positions.get(profile_id).copied()
    }

    pub fn profile_ids(&self) -> impl Iterator<Item = &Value> + '_ {
        self.records.iter().map(|r| &r.profile_id)
    }

    /// A new table holding only `positions` (ascending, in range), carrying
    /// over CRS and metadata.
    pub(crate) fn subset(&self, positions: &[usize]) -> Result<Self> {
        let records = positions.iter().map(|&p| self.records[p].clone()).collect();
        let mut table = SiteTable::from_records(records)?;
        table.crs = self.crs.clone();
        table.metadata = self.metadata.clone();
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(id: &str, name: &str) -> SiteRecord {
        let mut rec = SiteRecord::new(Value::from(id));
        rec.attributes.insert("site_name".into(), Value::from(name));
        rec
    }

    #[test]
    fn indexes_positions_and_unique_values() {
        let table = SiteTable::from_records(vec![
            site("P2", "Beta"),
            site("P1", "Alpha"),
            site("P3", "Beta"),
        ])
        .unwrap();
        assert_eq!(table.position_of(&Value::from("P1")), Some(1));
        assert_eq!(table.column_names, vec!["site_name".to_string()]);
        assert_eq!(table.unique_values["site_name"].len(), 2);
    }

    #[test]
    fn duplicate_profile_ids_are_rejected() {
        let err = SiteTable::from_records(vec![site("P1", "a"), site("P1", "b")]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Consistency);
    }

    #[test]
    fn subset_keeps_crs() {
        let mut table = SiteTable::from_records(vec![site("P1", "a"), site("P2", "b")]).unwrap();
        table.crs = Some("EPSG:4326".into());
        let sub = table.subset(&[1]).unwrap();
        assert_eq!(sub.len(), 1);
        assert_eq!(sub.position_of(&Value::from("P2")), Some(0));
        assert_eq!(sub.crs.as_deref(), Some("EPSG:4326"));
    }
}
