use std::collections::{BTreeMap, HashSet};

use crate::error::{Error, Result};

use super::value::Value;

// ---------------------------------------------------------------------------
// Table – a raw, untyped input table (one row per record)
// ---------------------------------------------------------------------------

/// A rectangular table of dynamically-typed cells with named columns.
///
/// This is the input shape for collection construction; it carries no
/// soil semantics of its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// An empty table with the given columns.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.as_str()) {
                return Err(Error::schema(format!("duplicate column '{col}'")));
            }
        }
        Ok(Table {
            columns,
            rows: Vec::new(),
        })
    }

    /// Build a table column by column. All columns must have the same length.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<Value>)>) -> Result<Self> {
        let n_rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut names = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            let name = name.into();
            if values.len() != n_rows {
                return Err(Error::schema(format!(
                    "column '{name}' has {} values, expected {n_rows}",
                    values.len()
                )));
            }
            names.push(name);
            data.push(values);
        }

        let mut table = Table::new(names)?;
        let mut cols: Vec<_> = data.into_iter().map(Vec::into_iter).collect();
        for _ in 0..n_rows {
            let row = cols
                .iter_mut()
                .map(|c| c.next().unwrap_or(Value::Null))
                .collect();
            table.rows.push(row);
        }
        Ok(table)
    }

    /// Build a table from record-oriented maps. The column set is the union
    /// of all keys in first-seen order; absent cells become `Null`.
    pub fn from_records(records: Vec<BTreeMap<String, Value>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for rec in &records {
            for key in rec.keys() {
                if seen.insert(key.clone()) {
                    columns.push(key.clone());
                }
            }
        }
        let rows = records
            .into_iter()
            .map(|mut rec| {
                columns
                    .iter()
                    .map(|c| rec.remove(c).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Table { columns, rows }
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::schema(format!(
                "row {} has {} cells, expected {}",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Value]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rename columns through a `old name -> new name` mapping. Every source
    /// name must exist and no two columns may end up with the same name.
    pub fn rename_columns(&mut self, mapping: &BTreeMap<String, String>) -> Result<()> {
        for source in mapping.keys() {
            if !self.has_column(source) {
                return Err(Error::schema(format!(
                    "cannot rename missing column '{source}'"
                )));
            }
        }
        let renamed: Vec<String> = self
            .columns
            .iter()
            .map(|c| mapping.get(c).cloned().unwrap_or_else(|| c.clone()))
            .collect();
        let mut seen = HashSet::new();
        for col in &renamed {
            if !seen.insert(col.as_str()) {
                return Err(Error::schema(format!(
                    "renaming produces duplicate column '{col}'"
                )));
            }
        }
        self.columns = renamed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_columns_checks_lengths() {
        let err = Table::from_columns(vec![
            ("id", vec![Value::from("P1"), Value::from("P1")]),
            ("top", vec![Value::Integer(0)]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("top"));
    }

    #[test]
    fn from_records_fills_missing_cells_with_null() {
        let mut a = BTreeMap::new();
        a.insert("id".to_string(), Value::from("P1"));
        let mut b = BTreeMap::new();
        b.insert("id".to_string(), Value::from("P2"));
        b.insert("x".to_string(), Value::Integer(3));

        let table = Table::from_records(vec![a, b]);
        assert_eq!(table.columns(), &["id".to_string(), "x".to_string()]);
        let x: Vec<_> = table.column("x").unwrap().cloned().collect();
        assert_eq!(x, vec![Value::Null, Value::Integer(3)]);
    }

    #[test]
    fn rename_rejects_collisions_and_unknown_sources() {
        let mut table = Table::from_columns(vec![
            ("profile_id", vec![Value::from("P1")]),
            ("id", vec![Value::from("x")]),
        ])
        .unwrap();

        let mut clash = BTreeMap::new();
        clash.insert("profile_id".to_string(), "id".to_string());
        assert!(table.rename_columns(&clash).is_err());

        let mut unknown = BTreeMap::new();
        unknown.insert("nope".to_string(), "id".to_string());
        assert!(table.rename_columns(&unknown).is_err());
    }
}
