//! Clustering traits.

use crate::error::Result;
use crate::geodesy::Point;

/// Trait for hard clustering of coordinate points.
pub trait Clustering {
    /// Fit the model to points and return cluster assignments.
    ///
    /// Returns a vector of cluster labels, one per input point.
    fn fit_predict(&self, points: &[Point]) -> Result<Vec<usize>>;

    /// Get the number of clusters requested.
    fn n_clusters(&self) -> usize;
}
