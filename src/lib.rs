//! Soil profile collections.
//!
//! A collection links a site table (one record per profile) with a horizon
//! table (depth-bounded layers, many per profile) through the profile
//! identity, and supports:
//!
//! - positional indexing along the profile and horizon axes
//!   ([`ProfileCollection::index`]),
//! - depth queries ([`ProfileCollection::depths`]),
//! - interval resampling and aggregation ("glom",
//!   [`ProfileCollection::glom`]),
//! - per-profile iteration and the data contract for sketch renderers.
//!
//! ```no_run
//! use soil_profile_collection::{load_collection, CollectionConfig, GlomOptions};
//! # fn main() -> anyhow::Result<()> {
//! let config = CollectionConfig::load("spc.json".as_ref())?;
//! let spc = load_collection(Some("site.csv".as_ref()), "horizons.csv".as_ref(), &config)?;
//! let glommed = spc.glom(&GlomOptions::new([0.0, 25.0, 50.0]))?;
//! println!("{glommed}");
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod config;
pub mod data;
pub mod depth;
pub mod error;
pub mod glom;
pub mod import;
pub mod sketch;

pub use collection::{ProfileCollection, ProfileView, Profiles, Selector};
pub use config::{CollectionConfig, ColumnBindings, GapPolicy, ValidationOptions};
pub use data::filter::{filtered_positions, init_filter_state, FilterState};
pub use data::horizon::{Horizon, HorizonTable};
pub use data::interval::DepthInterval;
pub use data::loader::{load_collection, load_table};
pub use data::site::{SiteRecord, SiteTable};
pub use data::table::Table;
pub use data::value::{Value, ValueKind};
pub use depth::{DepthMode, Depths, ProfileDepth};
pub use error::{Axis, Error, ErrorKind, Result};
pub use glom::{AggregationPolicy, GlomOptions};
pub use import::import_data_sheet;
pub use sketch::{ColorMap, ColorSpec, SketchColumn, SketchHorizon, SketchOptions};
