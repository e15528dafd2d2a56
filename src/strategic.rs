//! Strategic-location selection across regions.
//!
//! Given warehouse records grouped by region, pick a few representative sites
//! per region:
//!
//! ```text
//! region records ──► count <= min_k ? ──yes──► keep all
//!                          │ no
//!                          ▼
//!                 KSelector (k-means + silhouette over [min_k, max_k])
//!                          ▼
//!                 k-means refit at chosen k ──► centroids
//!                          ▼
//!                 nearest real record per centroid (ground distance)
//!                          ▼
//!                 skip records already picked
//! ```
//!
//! # The refit
//!
//! The final centroids come from a *new* k-means run at the winning k, not
//! from the run that was scored. With random seeding the refit can land on a
//! different partition than the one the silhouette judged. The
//! [`RegionSummary::score`] reported is the scored run's.
//!
//! # Example
//!
//! ```rust
//! use depot::strategic::{group_by_region, SelectionPolicy, StrategicSelector, WarehouseRecord};
//!
//! let records = vec![
//!     WarehouseRecord::new("A", 52.52, 13.40, "Berlin", "BE", "Germany", "germany"),
//!     WarehouseRecord::new("B", 48.14, 11.58, "Munich", "BY", "Germany", "germany"),
//! ];
//! let groups = group_by_region(records, |w| w.region.as_str());
//!
//! let selection = StrategicSelector::new(SelectionPolicy::default())
//!     .with_seed(7)
//!     .select(groups.iter().map(|(r, ws)| (r.as_str(), ws.as_slice())))
//!     .unwrap();
//!
//! // Two sites is within the default minimum of 2: both kept.
//! assert_eq!(selection.records.len(), 2);
//! ```

use crate::cluster::{KSelector, Kmeans, DEFAULT_MAX_ITER};
use crate::error::{Error, Result};
use crate::geodesy::{GeoMetric, Point};
use rand::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Anything with a coordinate.
///
/// Every other field is carried through untouched.
pub trait Located {
    /// The record's `(lat, lon)`.
    fn point(&self) -> Point;
}

impl Located for Point {
    fn point(&self) -> Point {
        *self
    }
}

/// A warehouse as produced by the catalog loaders.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WarehouseRecord {
    /// Site name or code.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Country.
    pub country: String,
    /// Region tag, e.g. `"usa"`, `"europe"`, `"japan"`.
    pub region: String,
}

impl WarehouseRecord {
    /// Build a record.
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        city: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            city: city.into(),
            state: state.into(),
            country: country.into(),
            region: region.into(),
        }
    }
}

impl Located for WarehouseRecord {
    fn point(&self) -> Point {
        Point::new(self.latitude, self.longitude)
    }
}

/// Group records by region.
///
/// Regions appear in first-seen order; records keep their input order.
pub fn group_by_region<T, I, F>(records: I, region_of: F) -> Vec<(String, Vec<T>)>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> &str,
{
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();
    for record in records {
        let region = region_of(&record);
        match groups.iter().position(|(r, _)| r == region) {
            Some(pos) => groups[pos].1.push(record),
            None => {
                let key = region.to_owned();
                groups.push((key, vec![record]));
            }
        }
    }
    groups
}

/// Inclusive range of candidate cluster counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KRange {
    /// Lower bound; regions this small are kept whole.
    pub min_k: usize,
    /// Upper bound.
    pub max_k: usize,
}

impl KRange {
    /// Create `[min_k, max_k]`.
    pub const fn new(min_k: usize, max_k: usize) -> Self {
        Self { min_k, max_k }
    }

    /// Reject empty ranges and `min_k = 0`.
    pub fn validate(&self) -> Result<()> {
        if self.min_k == 0 || self.max_k < self.min_k {
            return Err(Error::InvalidRange {
                min_k: self.min_k,
                max_k: self.max_k,
            });
        }
        Ok(())
    }
}

/// Per-region k ranges: a "major" tier for designated large regions, and a
/// default for everything else.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionPolicy {
    /// Regions that use [`Self::major`].
    pub major_regions: BTreeSet<String>,
    /// Range for major regions.
    pub major: KRange,
    /// Range for every other region.
    pub default: KRange,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            major_regions: ["usa", "europe"].into_iter().map(String::from).collect(),
            major: KRange::new(4, 7),
            default: KRange::new(2, 4),
        }
    }
}

impl SelectionPolicy {
    /// Add a region to the major tier.
    pub fn with_major_region(mut self, region: impl Into<String>) -> Self {
        self.major_regions.insert(region.into());
        self
    }

    /// Set the major-tier range.
    pub fn with_major_range(mut self, min_k: usize, max_k: usize) -> Self {
        self.major = KRange::new(min_k, max_k);
        self
    }

    /// Set the default-tier range.
    pub fn with_default_range(mut self, min_k: usize, max_k: usize) -> Self {
        self.default = KRange::new(min_k, max_k);
        self
    }

    /// Range that applies to `region`.
    pub fn range_for(&self, region: &str) -> KRange {
        if self.major_regions.contains(region) {
            self.major
        } else {
            self.default
        }
    }

    /// Check both tiers.
    pub fn validate(&self) -> Result<()> {
        self.major.validate()?;
        self.default.validate()
    }
}

/// What happened to one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSummary {
    /// Region name.
    pub region: String,
    /// Records in the region.
    pub input_count: usize,
    /// Region was at or below `min_k` and kept whole.
    pub kept_all: bool,
    /// Cluster count used (the input count when kept whole).
    pub k: usize,
    /// Silhouette of the winning k, if one was scored.
    pub score: Option<f64>,
    /// Records this region added to the output.
    pub selected: usize,
}

/// Output of [`StrategicSelector::select`].
#[derive(Debug, Clone)]
pub struct Selection<'a, T> {
    /// Picked records, borrowed from the input, no record twice.
    pub records: Vec<&'a T>,
    /// One entry per region, in processing order.
    pub regions: Vec<RegionSummary>,
}

/// Picks representative records per region.
#[derive(Debug, Clone)]
pub struct StrategicSelector {
    policy: SelectionPolicy,
    metric: GeoMetric,
    max_iter: usize,
    seed: Option<u64>,
}

impl StrategicSelector {
    /// Create a selector with the given policy.
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            metric: GeoMetric::default(),
            max_iter: DEFAULT_MAX_ITER,
            seed: None,
        }
    }

    /// Distance used to snap centroids onto records.
    pub fn with_metric(mut self, metric: GeoMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Iteration cap for every k-means run.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The policy in use.
    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Select using the configured seed, or the thread RNG.
    pub fn select<'a, T, I>(&self, regions: I) -> Result<Selection<'a, T>>
    where
        T: Located,
        I: IntoIterator<Item = (&'a str, &'a [T])>,
    {
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.select_with_rng(regions, &mut rng)
    }

    /// Select, drawing all randomness from `rng`. Regions are processed in
    /// iteration order and share the one generator.
    pub fn select_with_rng<'a, T, I, R>(&self, regions: I, rng: &mut R) -> Result<Selection<'a, T>>
    where
        T: Located,
        I: IntoIterator<Item = (&'a str, &'a [T])>,
        R: Rng + ?Sized,
    {
        self.policy.validate()?;

        let mut records: Vec<&'a T> = Vec::new();
        let mut summaries = Vec::new();

        for (region, items) in regions {
            let range = self.policy.range_for(region);
            let count = items.len();
            info!(
                region,
                count,
                min_k = range.min_k,
                max_k = range.max_k,
                "processing region"
            );

            if count <= range.min_k {
                info!(region, count, "keeping all locations");
                let before = records.len();
                for item in items {
                    if !contains(&records, item) {
                        records.push(item);
                    }
                }
                summaries.push(RegionSummary {
                    region: region.to_owned(),
                    input_count: count,
                    kept_all: true,
                    k: count,
                    score: None,
                    selected: records.len() - before,
                });
                continue;
            }

            let points = finite_points(region, items)?;

            let choice = KSelector::new(range.min_k, range.max_k)
                .with_max_iter(self.max_iter)
                .select_with_rng(&points, rng)?;
            let fit = Kmeans::new(choice.k)
                .with_max_iter(self.max_iter)
                .fit_with_rng(&points, rng)?;
            debug!(region, k = choice.k, score = ?choice.score, "refit at chosen k");

            let before = records.len();
            for centroid in &fit.centroids {
                let Some(nearest) = self.nearest(centroid, items) else {
                    continue;
                };
                if contains(&records, nearest) {
                    debug!(region, "centroid resolved to an already selected record");
                    continue;
                }
                let p = nearest.point();
                info!(region, lat = p.lat, lon = p.lon, "selected location");
                records.push(nearest);
            }

            summaries.push(RegionSummary {
                region: region.to_owned(),
                input_count: count,
                kept_all: false,
                k: choice.k,
                score: choice.score,
                selected: records.len() - before,
            });
        }

        info!(total = records.len(), "strategic selection complete");
        Ok(Selection {
            records,
            regions: summaries,
        })
    }

    /// First record at minimal ground distance from `target`.
    fn nearest<'a, T: Located>(&self, target: &Point, items: &'a [T]) -> Option<&'a T> {
        let mut best: Option<(&'a T, f64)> = None;
        for item in items {
            let d = self.metric.distance_km(target, &item.point());
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((item, d));
            }
        }
        best.map(|(item, _)| item)
    }
}

/// Identity, not value: two records at the same spot are both selectable.
fn contains<T>(records: &[&T], candidate: &T) -> bool {
    records.iter().any(|r| std::ptr::eq(*r, candidate))
}

fn finite_points<T: Located>(region: &str, items: &[T]) -> Result<Vec<Point>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let p = item.point();
            if p.is_finite() {
                Ok(p)
            } else {
                warn!(region, index, "non-finite coordinate");
                Err(Error::NonFiniteCoordinate {
                    index,
                    latitude: p.lat,
                    longitude: p.lon,
                })
            }
        })
        .collect()
}
