//! Depth queries: per-profile depth ranges and the collection-wide range.

use std::str::FromStr;

use crate::collection::ProfileCollection;
use crate::data::interval::DepthInterval;
use crate::data::value::Value;
use crate::error::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DepthMode {
    /// `(min top, max bottom)` for every profile.
    #[default]
    PerProfile,
    /// One range spanning the whole collection.
    MinMax,
    /// Maximum bottom depth for every profile.
    Max,
}

impl FromStr for DepthMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per_profile" => Ok(DepthMode::PerProfile),
            "minmax" => Ok(DepthMode::MinMax),
            "max" => Ok(DepthMode::Max),
            other => Err(Error::config(format!("unknown depth mode '{other}'"))),
        }
    }
}

/// Depth range of one profile; `range` is `None` when it has no horizons.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDepth {
    pub profile_id: Value,
    pub range: Option<DepthInterval>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Depths {
    PerProfile(Vec<ProfileDepth>),
    /// `None` when the collection holds no horizons at all.
    MinMax(Option<DepthInterval>),
    Max(Vec<(Value, Option<f64>)>),
}

impl Depths {
    pub fn per_profile(&self) -> Option<&[ProfileDepth]> {
        match self {
            Depths::PerProfile(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn minmax(&self) -> Option<DepthInterval> {
        match self {
            Depths::MinMax(range) => *range,
            _ => None,
        }
    }
}

impl ProfileCollection {
    /// Depth summary in the requested mode. Per-profile output follows
    /// collection order.
    pub fn depths(&self, mode: DepthMode) -> Depths {
        match mode {
            DepthMode::PerProfile => Depths::PerProfile(self.profile_depths()),
            DepthMode::MinMax => Depths::MinMax(self.depth_range()),
            DepthMode::Max => Depths::Max(
                self.profile_depths()
                    .into_iter()
                    .map(|d| (d.profile_id, d.range.map(|r| r.bottom)))
                    .collect(),
            ),
        }
    }

    /// Smallest top and greatest bottom observed anywhere in the collection.
    pub fn depth_range(&self) -> Option<DepthInterval> {
        self.profile_depths()
            .into_iter()
            .filter_map(|d| d.range)
            .reduce(|a, b| a.hull(&b))
    }

    fn profile_depths(&self) -> Vec<ProfileDepth> {
        self.profiles()
            .map(|view| ProfileDepth {
                profile_id: view.profile_id().clone(),
                range: view.depth_range(),
            })
            .collect()
    }
}
