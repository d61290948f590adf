//! Single-sheet import: one flat table of horizons with source-specific
//! column names, mapped onto the configured bindings.

use std::collections::BTreeMap;

use crate::collection::ProfileCollection;
use crate::config::CollectionConfig;
use crate::data::table::Table;
use crate::error::Result;

/// Rename `sheet` columns through `schema` (`source name -> canonical
/// name`) and build a collection with inferred sites.
pub fn import_data_sheet(
    sheet: &Table,
    schema: &BTreeMap<String, String>,
    config: &CollectionConfig,
) -> Result<ProfileCollection> {
    let mut table = sheet.clone();
    table.rename_columns(schema)?;
    log::debug!("Imported sheet with columns {:?}", table.columns());
    ProfileCollection::from_horizons(&table, config)
}
