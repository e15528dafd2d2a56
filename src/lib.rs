//! # depot
//!
//! Pick a handful of strategic sites out of a warehouse catalog, per region.
//!
//! Each region's coordinates are clustered with k-means; the number of
//! clusters is chosen by silhouette score over a configured range; each
//! centroid is then snapped to the nearest real warehouse by ground distance.
//!
//! Loading catalogs, geocoding and rendering are left to the caller: the
//! crate consumes in-memory records grouped by region and returns borrowed
//! references to the chosen ones.
//!
//! Randomness only enters through k-means seeding. Every entry point has a
//! `with_seed` builder and a `*_with_rng` variant taking any [`rand::Rng`].
//!
//! Logging goes through [`tracing`]; install a subscriber to see per-region
//! progress.

pub mod cluster;
/// Error types used across `depot`.
pub mod error;
pub mod geodesy;
pub mod metrics;
pub mod strategic;

#[cfg(test)]
mod strategic_tests;

pub use cluster::{Clustering, KSelection, KSelector, Kmeans, KmeansFit};
pub use error::{Error, Result};
pub use geodesy::{GeoMetric, Point};
pub use metrics::{silhouette_samples, silhouette_score, NOT_EVALUABLE};
pub use strategic::{
    group_by_region, KRange, Located, RegionSummary, Selection, SelectionPolicy,
    StrategicSelector, WarehouseRecord,
};
