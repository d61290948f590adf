/// Data layer: cell values, tables, and the two linked soil tables.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────────────┐
///   │ SiteTable + HorizonTable │  linked by profile id (see collection)
///   └──────────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  site predicates → profile positions
///   └──────────┘
/// ```

pub mod filter;
pub mod horizon;
pub mod interval;
pub mod loader;
pub mod site;
pub mod table;
pub mod value;
