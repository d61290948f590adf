//! The profile collection: a site table and a horizon table linked by
//! profile identity, with positional indexing along two axes.
//!
//! ```text
//!   site Table ─┐                     ┌─ SiteTable    (one record per profile)
//!               ├─ validate + link ──▶│
//!   hz Table  ──┘                     └─ HorizonTable (grouped, sorted, indexed)
//! ```
//!
//! Collections are immutable. Indexing, subsetting and glom return new
//! collections; unmodified tables are shared behind `Arc`s.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};
use std::sync::Arc;

use crate::config::{CollectionConfig, ColumnBindings, GapPolicy, ValidationOptions};
use crate::data::filter::{filtered_positions, FilterState};
use crate::data::horizon::{Horizon, HorizonTable};
use crate::data::interval::DepthInterval;
use crate::data::site::{SiteRecord, SiteTable};
use crate::data::table::Table;
use crate::data::value::Value;
use crate::error::{Axis, Error, Result};

// ---------------------------------------------------------------------------
// Selector – one positional axis request
// ---------------------------------------------------------------------------

/// A positional request along one axis.
///
/// `Single` and `Positions` are strict: any position past the end of the
/// axis is an index error. Ranges behave like slices and are clamped to the
/// axis length, so `0..2` on a one-horizon profile selects that horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    All,
    Single(usize),
    Range(Range<usize>),
    /// Arbitrary positions; duplicates collapse and output keeps axis order.
    Positions(Vec<usize>),
}

impl Selector {
    /// Resolve to ascending, de-duplicated positions on an axis of `len`.
    pub fn resolve(&self, axis: Axis, len: usize) -> Result<Vec<usize>> {
        match self {
            Selector::All => Ok((0..len).collect()),
            Selector::Single(position) => {
                check_position(axis, *position, len)?;
                Ok(vec![*position])
            }
            Selector::Range(range) => {
                let end = range.end.min(len);
                Ok((range.start.min(end)..end).collect())
            }
            Selector::Positions(positions) => {
                let mut set = BTreeSet::new();
                for &position in positions {
                    check_position(axis, position, len)?;
                    set.insert(position);
                }
                Ok(set.into_iter().collect())
            }
        }
    }
}

fn check_position(axis: Axis, position: usize, len: usize) -> Result<()> {
    if position >= len {
        return Err(Error::Index {
            axis,
            position,
            len,
        });
    }
    Ok(())
}

impl From<usize> for Selector {
    fn from(position: usize) -> Self {
        Selector::Single(position)
    }
}

impl From<Range<usize>> for Selector {
    fn from(range: Range<usize>) -> Self {
        Selector::Range(range)
    }
}

impl From<RangeInclusive<usize>> for Selector {
    fn from(range: RangeInclusive<usize>) -> Self {
        Selector::Range(*range.start()..range.end().saturating_add(1))
    }
}

impl From<RangeFrom<usize>> for Selector {
    fn from(range: RangeFrom<usize>) -> Self {
        Selector::Range(range.start..usize::MAX)
    }
}

impl From<RangeTo<usize>> for Selector {
    fn from(range: RangeTo<usize>) -> Self {
        Selector::Range(0..range.end)
    }
}

impl From<RangeToInclusive<usize>> for Selector {
    fn from(range: RangeToInclusive<usize>) -> Self {
        Selector::Range(0..range.end.saturating_add(1))
    }
}

impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self {
        Selector::All
    }
}

impl From<Vec<usize>> for Selector {
    fn from(positions: Vec<usize>) -> Self {
        Selector::Positions(positions)
    }
}

impl From<&[usize]> for Selector {
    fn from(positions: &[usize]) -> Self {
        Selector::Positions(positions.to_vec())
    }
}

// ---------------------------------------------------------------------------
// ProfileCollection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ProfileCollection {
    sites: Arc<SiteTable>,
    horizons: Arc<HorizonTable>,
    bindings: ColumnBindings,
    validation: ValidationOptions,
}

impl ProfileCollection {
    /// Validate and link a site table and a horizon table.
    ///
    /// Profile order is the first-seen order of profile ids in `site`.
    pub fn new(site: &Table, horizons: &Table, config: &CollectionConfig) -> Result<Self> {
        let bindings = &config.bindings;
        check_horizon_schema(horizons, bindings)?;
        if !site.has_column(&bindings.profile_id) {
            return Err(Error::schema(format!(
                "site table is missing profile id column '{}'",
                bindings.profile_id
            )));
        }

        let id_idx = site.column_index(&bindings.profile_id).unwrap_or_default();
        let mut records = Vec::with_capacity(site.num_rows());
        for row in site.rows() {
            let mut rec = SiteRecord::new(row[id_idx].clone());
            for (col, val) in site.columns().iter().zip(row) {
                if *col != bindings.profile_id {
                    rec.attributes.insert(col.clone(), val.clone());
                }
            }
            records.push(rec);
        }
        let sites = SiteTable::from_records(records)?;
        Self::link(sites, horizons, config)
    }

    /// Build a collection from horizons alone; the site table holds one
    /// attribute-less record per profile in first-seen horizon order.
    pub fn from_horizons(horizons: &Table, config: &CollectionConfig) -> Result<Self> {
        let bindings = &config.bindings;
        check_horizon_schema(horizons, bindings)?;

        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for id in horizons.column(&bindings.profile_id).into_iter().flatten() {
            if !id.is_null() && seen.insert(id.clone()) {
                records.push(SiteRecord::new(id.clone()));
            }
        }
        let sites = SiteTable::from_records(records)?;
        Self::link(sites, horizons, config)
    }

    fn link(mut sites: SiteTable, table: &Table, config: &CollectionConfig) -> Result<Self> {
        let bindings = &config.bindings;
        let validation = &config.validation;
        sites.crs = config.crs.clone();
        sites.metadata = config.metadata.clone();

        let col = |name: &str| table.column_index(name).unwrap_or_default();
        let (pid_idx, hid_idx) = (col(&bindings.profile_id), col(&bindings.horizon_id));
        let (top_idx, bottom_idx) = (col(&bindings.top), col(&bindings.bottom));
        let attribute_columns: Vec<String> = table
            .columns()
            .iter()
            .filter(|c| !bindings.is_structural(c))
            .cloned()
            .collect();

        let mut groups: Vec<Vec<Horizon>> = vec![Vec::new(); sites.len()];
        let mut horizon_ids = HashSet::with_capacity(table.num_rows());

        for (row_no, row) in table.rows().enumerate() {
            let profile_id = &row[pid_idx];
            let horizon_id = &row[hid_idx];
            if profile_id.is_null() {
                return Err(Error::schema(format!("horizon row {row_no} has a null profile id")));
            }
            if horizon_id.is_null() {
                return Err(Error::schema(format!("horizon row {row_no} has a null horizon id")));
            }
            if !horizon_ids.insert(horizon_id.clone()) {
                return Err(Error::consistency(format!(
                    "duplicate horizon id {horizon_id} (row {row_no}, profile {profile_id})"
                )));
            }

            let top = depth_value(&row[top_idx], &bindings.top, row_no)?;
            let bottom = depth_value(&row[bottom_idx], &bindings.bottom, row_no)?;
            if top > bottom || (top == bottom && !validation.allow_degenerate) {
                return Err(Error::schema(format!(
                    "horizon {horizon_id} has top {top} >= bottom {bottom}"
                )));
            }

            let position = sites.position_of(profile_id).ok_or_else(|| {
                Error::schema(format!(
                    "horizon {horizon_id} references profile {profile_id} absent from the site table"
                ))
            })?;

            let attributes = table
                .columns()
                .iter()
                .zip(row)
                .filter(|(c, _)| !bindings.is_structural(c))
                .map(|(c, v)| (c.clone(), v.clone()))
                .collect();

            groups[position].push(Horizon {
                profile_id: profile_id.clone(),
                horizon_id: horizon_id.clone(),
                interval: DepthInterval::new(top, bottom),
                attributes,
            });
        }

        for group in &mut groups {
            sort_by_top(group);
            check_gaps(group, validation.gap_policy)?;
        }

        let collection = Self::from_parts(
            Arc::new(sites),
            groups,
            attribute_columns,
            bindings.clone(),
            *validation,
        )?;
        log::info!(
            "Built collection with {} profiles and {} horizons",
            collection.len(),
            collection.horizons.len()
        );
        Ok(collection)
    }

    /// Assemble from already-linked parts: `groups[p]` holds the horizons
    /// of site position `p`. Groups are sorted by top and checked for
    /// sibling overlap.
    pub(crate) fn from_parts(
        sites: Arc<SiteTable>,
        mut groups: Vec<Vec<Horizon>>,
        attribute_columns: Vec<String>,
        bindings: ColumnBindings,
        validation: ValidationOptions,
    ) -> Result<Self> {
        debug_assert_eq!(groups.len(), sites.len());
        for group in &mut groups {
            sort_by_top(group);
            check_overlaps(group)?;
        }
        Ok(ProfileCollection {
            sites,
            horizons: Arc::new(HorizonTable::from_groups(groups, attribute_columns)),
            bindings,
            validation,
        })
    }

    // -- accessors --

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn sites(&self) -> &SiteTable {
        &self.sites
    }

    pub fn horizons(&self) -> &HorizonTable {
        &self.horizons
    }

    pub fn bindings(&self) -> &ColumnBindings {
        &self.bindings
    }

    pub fn validation(&self) -> &ValidationOptions {
        &self.validation
    }

    pub fn crs(&self) -> Option<&str> {
        self.sites.crs.as_deref()
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.sites.metadata
    }

    pub fn profile_ids(&self) -> Vec<&Value> {
        self.sites.profile_ids().collect()
    }

    pub(crate) fn shared_sites(&self) -> Arc<SiteTable> {
        Arc::clone(&self.sites)
    }

    /// Thickness (`bottom - top`) of every horizon, in horizon-table order.
    pub fn thickness(&self) -> Vec<f64> {
        self.horizons.iter().map(Horizon::thickness).collect()
    }

    // -- per-profile views --

    pub fn profile(&self, position: usize) -> Result<ProfileView<'_>> {
        check_position(Axis::Profile, position, self.len())?;
        Ok(self.view(position))
    }

    pub fn get_profile(&self, profile_id: &Value) -> Result<ProfileView<'_>> {
        let position = self
            .sites
            .position_of(profile_id)
            .ok_or_else(|| Error::UnknownProfile(profile_id.to_string()))?;
        Ok(self.view(position))
    }

    /// Lazy iterator over every profile, in collection order. Calling it
    /// again restarts from the first profile.
    pub fn profiles(&self) -> Profiles<'_> {
        Profiles {
            collection: self,
            next: 0,
        }
    }

    /// Map `f` over every profile; results are paired with profile ids and
    /// keep collection order.
    pub fn profile_apply<T, F>(&self, mut f: F) -> Vec<(Value, T)>
    where
        F: FnMut(&ProfileView<'_>) -> T,
    {
        self.profiles()
            .map(|view| (view.profile_id().clone(), f(&view)))
            .collect()
    }

    fn view(&self, position: usize) -> ProfileView<'_> {
        ProfileView {
            collection: self,
            position,
        }
    }

    // -- positional indexing --

    /// Select whole profiles.
    pub fn select(&self, profiles: impl Into<Selector>) -> Result<Self> {
        self.index(profiles, Selector::All)
    }

    /// Two-axis selection: `profiles` picks profiles, `horizons` picks
    /// horizons within each selected profile by its local ordering.
    pub fn index(&self, profiles: impl Into<Selector>, horizons: impl Into<Selector>) -> Result<Self> {
        let profiles = profiles.into();
        let horizons = horizons.into();
        let positions = profiles.resolve(Axis::Profile, self.len())?;

        if horizons == Selector::All && positions.len() == self.len() {
            return Ok(self.clone());
        }

        let mut groups = Vec::with_capacity(positions.len());
        for &p in &positions {
            let local = self.horizons.profile_horizons(p);
            let picked = horizons.resolve(Axis::Horizon, local.len())?;
            groups.push(picked.into_iter().map(|h| local[h].clone()).collect());
        }

        let sites = self.sites.subset(&positions)?;
        log::debug!(
            "Indexed {} of {} profiles ({:?} horizons)",
            positions.len(),
            self.len(),
            horizons
        );
        Self::from_parts(
            Arc::new(sites),
            groups,
            self.horizons.attribute_columns().to_vec(),
            self.bindings.clone(),
            self.validation,
        )
    }

    /// Keep the listed profiles, in collection order.
    pub fn select_ids(&self, ids: &[Value]) -> Result<Self> {
        let positions = ids
            .iter()
            .map(|id| {
                self.sites
                    .position_of(id)
                    .ok_or_else(|| Error::UnknownProfile(id.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        self.select(positions)
    }

    /// Keep profiles whose mask entry is `true`.
    pub fn select_mask(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.len() {
            return Err(Error::config(format!(
                "mask has {} entries for {} profiles",
                mask.len(),
                self.len()
            )));
        }
        let positions: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect();
        self.select(positions)
    }

    /// Keep profiles whose site record satisfies `predicate`.
    pub fn select_where<F>(&self, mut predicate: F) -> Result<Self>
    where
        F: FnMut(&SiteRecord) -> bool,
    {
        let mask: Vec<bool> = self.sites.records().iter().map(|s| predicate(s)).collect();
        self.select_mask(&mask)
    }

    /// Keep profiles passing unique-value filters on site columns.
    pub fn select_filtered(&self, filters: &FilterState) -> Result<Self> {
        self.select(filtered_positions(&self.sites, filters))
    }
}

impl fmt::Display for ProfileCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProfileCollection with {} profiles and {} horizons",
            self.len(),
            self.horizons.len()
        )?;
        if let Some(crs) = self.crs() {
            write!(f, " (crs {crs})")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ProfileView – one profile's site record and horizons
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct ProfileView<'a> {
    collection: &'a ProfileCollection,
    position: usize,
}

impl<'a> ProfileView<'a> {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn profile_id(&self) -> &'a Value {
        &self.site().profile_id
    }

    pub fn site(&self) -> &'a SiteRecord {
        &self.collection.sites.records()[self.position]
    }

    /// Horizons ordered by top depth.
    pub fn horizons(&self) -> &'a [Horizon] {
        self.collection.horizons.profile_horizons(self.position)
    }

    /// `(min top, max bottom)`, `None` for a profile without horizons.
    pub fn depth_range(&self) -> Option<DepthInterval> {
        let horizons = self.horizons();
        let top = horizons.iter().map(Horizon::top).reduce(f64::min)?;
        let bottom = horizons.iter().map(Horizon::bottom).reduce(f64::max)?;
        Some(DepthInterval::new(top, bottom))
    }

    /// This profile as a standalone single-profile collection.
    pub fn to_collection(&self) -> Result<ProfileCollection> {
        self.collection.select(self.position)
    }
}

pub struct Profiles<'a> {
    collection: &'a ProfileCollection,
    next: usize,
}

impl<'a> Iterator for Profiles<'a> {
    type Item = ProfileView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.collection.len() {
            return None;
        }
        let view = self.collection.view(self.next);
        self.next += 1;
        Some(view)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.collection.len() - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Profiles<'_> {}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn check_horizon_schema(table: &Table, bindings: &ColumnBindings) -> Result<()> {
    let required = [
        ("profile id", &bindings.profile_id),
        ("horizon id", &bindings.horizon_id),
        ("top depth", &bindings.top),
        ("bottom depth", &bindings.bottom),
    ];
    for (role, name) in required {
        if !table.has_column(name) {
            return Err(Error::schema(format!(
                "horizon table is missing {role} column '{name}'"
            )));
        }
    }
    if let Some(designation) = &bindings.designation {
        if !table.has_column(designation) {
            return Err(Error::schema(format!(
                "horizon table is missing designation column '{designation}'"
            )));
        }
    }
    Ok(())
}

fn depth_value(value: &Value, column: &str, row: usize) -> Result<f64> {
    match value.as_f64() {
        Some(depth) if depth.is_finite() => Ok(depth),
        _ => Err(Error::schema(format!(
            "row {row}: depth column '{column}' holds non-numeric value {value}"
        ))),
    }
}

fn sort_by_top(group: &mut [Horizon]) {
    group.sort_by(|a, b| {
        a.top()
            .total_cmp(&b.top())
            .then(a.bottom().total_cmp(&b.bottom()))
    });
}

fn check_overlaps(group: &[Horizon]) -> Result<()> {
    let Some(first) = group.first() else {
        return Ok(());
    };
    // `deepest` holds the greatest bottom seen so far, so a point between
    // two overlapping horizons cannot hide the overlap.
    let mut deepest = first;
    for pair in group.windows(2) {
        let current = &pair[1];
        for earlier in [&pair[0], deepest] {
            if earlier.interval.overlaps(&current.interval) {
                return Err(Error::consistency(format!(
                    "profile {} has overlapping horizons {} {} and {} {}",
                    current.profile_id,
                    earlier.horizon_id,
                    earlier.interval,
                    current.horizon_id,
                    current.interval
                )));
            }
        }
        if current.bottom() > deepest.bottom() {
            deepest = current;
        }
    }
    Ok(())
}

fn check_gaps(group: &[Horizon], policy: GapPolicy) -> Result<()> {
    if policy == GapPolicy::Allow {
        return Ok(());
    }
    let Some(first) = group.first() else {
        return Ok(());
    };
    let mut deepest = first;
    for current in &group[1..] {
        if deepest.bottom() < current.top() {
            let message = format!(
                "profile {} has depth gaps between horizons {} and {} ({} to {})",
                current.profile_id,
                deepest.horizon_id,
                current.horizon_id,
                deepest.bottom(),
                current.top()
            );
            if policy == GapPolicy::Reject {
                return Err(Error::consistency(message));
            }
            log::warn!("{message}");
        }
        if current.bottom() > deepest.bottom() {
            deepest = current;
        }
    }
    Ok(())
}
