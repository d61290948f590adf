//! Glom: resample every profile's horizons onto caller-supplied depth
//! breakpoints.
//!
//! For each profile and each target interval the engine collects the
//! overlapping source horizons, weights them by their overlap length and
//! emits one aggregated horizon (or, under [`AggregationPolicy::Slice`], the
//! overlapping pieces themselves).
//!
//! Boundary policy:
//! * `truncate = true` (default): an aggregated horizon spans exactly the
//!   target interval, even when the profile only partly covers it.
//! * `truncate = false`: an aggregated horizon spans only the covered part of
//!   the target (the hull of the contributing pieces), so a profile ending at
//!   20 cm yields `[0, 20)` for a `[0, 25)` target. Output never extends
//!   past the target; sliced horizons keep their full source extent instead.
//! * A target no source horizon reaches emits nothing unless `fill` is set,
//!   in which case a placeholder spanning the target with all attributes
//!   `Null` is emitted.

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::collection::{ProfileCollection, ProfileView};
use crate::data::horizon::Horizon;
use crate::data::interval::DepthInterval;
use crate::data::value::{Value, ValueKind};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum AggregationPolicy {
    /// Length-weighted mean for numeric attributes, dominant value for the rest.
    #[default]
    WeightedMean,
    /// Value with the greatest summed overlap, for every attribute.
    Dominant,
    /// No aggregation: emit each overlapping source horizon.
    Slice,
}

impl FromStr for AggregationPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "weighted_mean" => Ok(AggregationPolicy::WeightedMean),
            "dominant" => Ok(AggregationPolicy::Dominant),
            "slice" => Ok(AggregationPolicy::Slice),
            other => Err(Error::config(format!("unknown aggregation policy '{other}'"))),
        }
    }
}

impl TryFrom<String> for AggregationPolicy {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlomOptions {
    /// Strictly increasing depths. A single breakpoint means "from here to
    /// the bottom of each profile".
    pub breakpoints: Vec<f64>,
    pub truncate: bool,
    pub policy: AggregationPolicy,
    /// Emit `Null` placeholders for target intervals without data.
    pub fill: bool,
    /// Attributes to carry; `None` means every attribute column.
    pub variables: Option<Vec<String>>,
}

impl Default for GlomOptions {
    fn default() -> Self {
        GlomOptions {
            breakpoints: Vec::new(),
            truncate: true,
            policy: AggregationPolicy::default(),
            fill: false,
            variables: None,
        }
    }
}

impl GlomOptions {
    pub fn new(breakpoints: impl Into<Vec<f64>>) -> Self {
        GlomOptions {
            breakpoints: breakpoints.into(),
            ..Default::default()
        }
    }

    pub fn policy(mut self, policy: AggregationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    pub fn fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    pub fn variables<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.variables = Some(names.into_iter().map(Into::into).collect());
        self
    }

    fn check_breakpoints(&self) -> Result<()> {
        if self.breakpoints.is_empty() {
            return Err(Error::config("at least one breakpoint is required"));
        }
        if let Some(bad) = self.breakpoints.iter().find(|b| !b.is_finite()) {
            return Err(Error::config(format!("breakpoint {bad} is not finite")));
        }
        for pair in self.breakpoints.windows(2) {
            if pair[0] >= pair[1] {
                return Err(Error::config(format!(
                    "breakpoints must be strictly increasing ({} then {})",
                    pair[0], pair[1]
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// One source horizon's share of a target interval.
struct Piece<'a> {
    source: &'a Horizon,
    clip: DepthInterval,
}

impl Piece<'_> {
    fn weight(&self) -> f64 {
        self.clip.length()
    }
}

impl ProfileCollection {
    /// Resample all profiles onto `options.breakpoints`.
    ///
    /// The result shares this collection's site table and holds only the
    /// glommed horizons, in profile order with ascending intervals.
    pub fn glom(&self, options: &GlomOptions) -> Result<ProfileCollection> {
        options.check_breakpoints()?;
        let columns = self.glom_columns(options)?;

        let existing: HashSet<&Value> = self.horizons().iter().map(|h| &h.horizon_id).collect();
        let mut used: HashSet<Value> = HashSet::new();
        let mut groups = Vec::with_capacity(self.len());

        for view in self.profiles() {
            let mut out: Vec<(DepthInterval, BTreeMap<String, Value>)> = Vec::new();
            let mut sliced: HashSet<&Value> = HashSet::new();
            for target in target_intervals(&options.breakpoints, &view) {
                let pieces: Vec<Piece<'_>> = overlapping(view.horizons(), &target)
                    .into_iter()
                    .filter(|p| p.weight() > 0.0)
                    .collect();
                if pieces.is_empty() {
                    if options.fill {
                        log::warn!(
                            "profile {} has no data in {target}, emitting placeholder",
                            view.profile_id()
                        );
                        let attributes = columns.iter().map(|(c, _)| (c.clone(), Value::Null)).collect();
                        out.push((target, attributes));
                    }
                    continue;
                }

                match options.policy {
                    AggregationPolicy::Slice => {
                        for piece in pieces {
                            let interval = if options.truncate {
                                piece.clip
                            } else if sliced.insert(&piece.source.horizon_id) {
                                piece.source.interval
                            } else {
                                continue;
                            };
                            let attributes = columns
                                .iter()
                                .map(|(c, _)| (c.clone(), piece.source.attribute(c).clone()))
                                .collect();
                            out.push((interval, attributes));
                        }
                    }
                    policy => {
                        let Some(covered) = pieces.iter().map(|p| p.clip).reduce(|a, b| a.hull(&b))
                        else {
                            continue;
                        };
                        let interval = if options.truncate { target } else { covered };
                        let attributes = columns
                            .iter()
                            .map(|(c, kind)| (c.clone(), aggregate(&pieces, c, *kind, policy)))
                            .collect();
                        out.push((interval, attributes));
                    }
                }
            }

            let group = out
                .into_iter()
                .map(|(interval, attributes)| Horizon {
                    profile_id: view.profile_id().clone(),
                    horizon_id: fresh_id(view.profile_id(), &interval, &existing, &mut used),
                    interval,
                    attributes,
                })
                .collect::<Vec<_>>();
            groups.push(group);
        }

        let mut bindings = self.bindings().clone();
        if let Some(designation) = &bindings.designation {
            if !columns.iter().any(|(c, _)| c == designation) {
                bindings.designation = None;
            }
        }
        let attribute_columns = columns.into_iter().map(|(c, _)| c).collect();

        let glommed = ProfileCollection::from_parts(
            self.shared_sites(),
            groups,
            attribute_columns,
            bindings,
            *self.validation(),
        )
        .map_err(|e| match e {
            Error::Consistency(msg) => Error::consistency(format!("glom produced overlap: {msg}")),
            other => other,
        })?;

        log::info!(
            "Glommed {} profiles onto {} breakpoints ({:?}): {} horizons",
            glommed.len(),
            options.breakpoints.len(),
            options.policy,
            glommed.horizons().len()
        );
        Ok(glommed)
    }

    /// Attribute columns to carry, with their aggregation kind.
    fn glom_columns(&self, options: &GlomOptions) -> Result<Vec<(String, ValueKind)>> {
        let table = self.horizons();
        let names: Vec<String> = match &options.variables {
            Some(vars) => {
                if let Some(unknown) = vars.iter().find(|v| !table.has_attribute(v)) {
                    return Err(Error::config(format!("unknown glom variable '{unknown}'")));
                }
                table
                    .attribute_columns()
                    .iter()
                    .filter(|c| vars.contains(c))
                    .cloned()
                    .collect()
            }
            None => table.attribute_columns().to_vec(),
        };
        Ok(names
            .into_iter()
            .map(|name| {
                let kind = table.column_kind(&name);
                log::debug!("glom column {name} aggregates as {kind:?}");
                (name, kind)
            })
            .collect())
    }
}

/// Target intervals for one profile.
fn target_intervals(breakpoints: &[f64], view: &ProfileView<'_>) -> Vec<DepthInterval> {
    if let [start] = breakpoints {
        return match view.depth_range() {
            Some(range) if range.bottom > *start => vec![DepthInterval::new(*start, range.bottom)],
            _ => Vec::new(),
        };
    }
    breakpoints
        .windows(2)
        .map(|w| DepthInterval::new(w[0], w[1]))
        .collect()
}

fn overlapping<'a>(horizons: &'a [Horizon], target: &DepthInterval) -> Vec<Piece<'a>> {
    horizons
        .iter()
        .filter_map(|source| {
            source
                .interval
                .intersect(target)
                .map(|clip| Piece { source, clip })
        })
        .collect()
}

fn aggregate(pieces: &[Piece<'_>], column: &str, kind: ValueKind, policy: AggregationPolicy) -> Value {
    let weighted = pieces
        .iter()
        .map(|p| (p.source.attribute(column), p.weight()))
        .filter(|(v, _)| !v.is_null());
    match (policy, kind) {
        (AggregationPolicy::WeightedMean, ValueKind::Numeric) => weighted_mean(weighted),
        _ => dominant(weighted),
    }
}

/// `sum(v * w) / sum(w)`; a single distinct value is returned as is.
fn weighted_mean<'a>(values: impl Iterator<Item = (&'a Value, f64)>) -> Value {
    let mut first: Option<&Value> = None;
    let mut uniform = true;
    let mut sum = 0.0;
    let mut total = 0.0;
    for (value, weight) in values {
        let Some(x) = value.as_f64() else { continue };
        match first {
            None => first = Some(value),
            Some(f) if f != value => uniform = false,
            _ => {}
        }
        sum += x * weight;
        total += weight;
    }
    match first {
        None => Value::Null,
        Some(v) if uniform => v.clone(),
        Some(_) => Value::Float(sum / total),
    }
}

/// Value with the greatest summed weight; ties go to the first seen.
fn dominant<'a>(values: impl Iterator<Item = (&'a Value, f64)>) -> Value {
    let mut totals: Vec<(&Value, f64)> = Vec::new();
    for (value, weight) in values {
        match totals.iter_mut().find(|(v, _)| *v == value) {
            Some((_, w)) => *w += weight,
            None => totals.push((value, weight)),
        }
    }
    let mut best: Option<(&Value, f64)> = None;
    for (value, weight) in totals {
        if best.map_or(true, |(_, w)| weight > w) {
            best = Some((value, weight));
        }
    }
    best.map(|(v, _)| v.clone()).unwrap_or(Value::Null)
}

fn fresh_id(
    profile_id: &Value,
    interval: &DepthInterval,
    existing: &HashSet<&Value>,
    used: &mut HashSet<Value>,
) -> Value {
    let base = format!("{profile_id}:{}-{}", interval.top, interval.bottom);
    let mut candidate = Value::Text(base.clone());
    let mut n = 1;
    while existing.contains(&candidate) || used.contains(&candidate) {
        candidate = Value::Text(format!("{base}#{n}"));
        n += 1;
    }
    used.insert(candidate.clone());
    candidate
}
