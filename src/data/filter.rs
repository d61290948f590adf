use std::collections::{BTreeMap, BTreeSet};

use super::site::SiteTable;
use super::value::Value;

// ---------------------------------------------------------------------------
// Filter predicate: which unique values are selected per site column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of selected values.
/// A column absent from the map is unconstrained.
pub type FilterState = BTreeMap<String, BTreeSet<Value>>;

/// Initialise a [`FilterState`] with every value selected (keeps everything).
pub fn init_filter_state(sites: &SiteTable) -> FilterState {
    sites
        .unique_values
        .iter()
        .map(|(col, vals)| (col.clone(), vals.clone()))
        .collect()
}

/// Return positions of profiles whose site record passes all filters.
///
/// A site passes a column filter when:
/// * The column is not present in `filters` → passes (no constraint)
/// * The filter set for that column is empty → nothing selected → fails
/// * The site's value for that column is in the selected set → passes
///   (a site without the column has value `Null`)
pub fn filtered_positions(sites: &SiteTable, filters: &FilterState) -> Vec<usize> {
    sites
        .records()
        .iter()
        .enumerate()
        .filter(|(_, site)| {
            filters.iter().all(|(col, selected)| {
                if selected.is_empty() {
                    return false;
                }
                if let Some(all_vals) = sites.unique_values.get(col) {
                    if selected.is_superset(all_vals) {
                        return true;
                    }
                }
                selected.contains(site.attribute(col))
            })
        })
        .map(|(i, _)| i)
        .collect()
}
