//! Internal clustering-quality metrics.
//!
//! These score a partition using only the points themselves (no ground truth).
//!
//! | Metric | Range | Best | Used for |
//! |--------|-------|------|----------|
//! | [`silhouette_score`] | [-1, 1] | 1 | choosing k |
//! | [`inertia`] | [0, ∞) | 0 | diagnostics |
//!
//! # Silhouette
//!
//! For a point p in cluster C:
//!
//! ```text
//! a(p) = mean dist(p, q)  for q ∈ C, q ≠ p        (0 if |C| = 1)
//! b(p) = min over C' ≠ C, C' non-empty of mean dist(p, q), q ∈ C'
//! s(p) = (b - a) / max(a, b)                       (0 if max(a, b) = 0)
//! ```
//!
//! The score is the mean of s(p). Distances are planar Euclidean on raw
//! degrees, the same geometry k-means optimized.
//!
//! # References
//!
//! - Rousseeuw (1987). "Silhouettes: a graphical aid to the interpretation
//!   and validation of cluster analysis"

use crate::geodesy::{euclidean, Point};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Sentinel returned by [`silhouette_score`] when a partition can't be scored.
pub const NOT_EVALUABLE: f64 = -1.0;

/// Mean silhouette coefficient of a partition.
///
/// `clusters[c]` holds indices into `points`; clusters may be empty.
///
/// Returns [`NOT_EVALUABLE`] (-1) when fewer than two clusters are non-empty,
/// or when there are no more points than clusters. Otherwise the result lies
/// in [-1, 1].
///
/// # Example
///
/// ```rust
/// use depot::geodesy::Point;
/// use depot::metrics::silhouette_score;
///
/// let points = [
///     Point::new(0.0, 0.0),
///     Point::new(0.0, 1.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 1.0),
/// ];
/// let score = silhouette_score(&points, &[vec![0, 1], vec![2, 3]]);
/// assert!(score > 0.9);
/// ```
pub fn silhouette_score(points: &[Point], clusters: &[Vec<usize>]) -> f64 {
    let non_empty = clusters.iter().filter(|c| !c.is_empty()).count();
    if non_empty < 2 || points.len() <= clusters.len() {
        return NOT_EVALUABLE;
    }

    let samples = silhouette_samples(points, clusters);
    if samples.is_empty() {
        return NOT_EVALUABLE;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Per-point silhouette coefficients, in cluster order.
///
/// No evaluability gate: with no other non-empty cluster, `b(p)` is taken as
/// 0, so a lone point in a lone cluster scores 0.
pub fn silhouette_samples(points: &[Point], clusters: &[Vec<usize>]) -> Vec<f64> {
    let members: Vec<(usize, usize)> = clusters
        .iter()
        .enumerate()
        .flat_map(|(c, idx)| idx.iter().map(move |&i| (c, i)))
        .collect();

    #[cfg(feature = "parallel")]
    let iter = members.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = members.iter();

    iter.map(|&(c, i)| point_silhouette(points, clusters, c, i))
        .collect()
}

fn point_silhouette(points: &[Point], clusters: &[Vec<usize>], own: usize, i: usize) -> f64 {
    let p = &points[i];

    let own_members = &clusters[own];
    let a = if own_members.len() > 1 {
        let sum: f64 = own_members
            .iter()
            .filter(|&&j| j != i)
            .map(|&j| euclidean(p, &points[j]))
            .sum();
        sum / (own_members.len() - 1) as f64
    } else {
        0.0
    };

    let b = clusters
        .iter()
        .enumerate()
        .filter(|(c, members)| *c != own && !members.is_empty())
        .map(|(_, members)| mean_distance(p, points, members))
        .fold(None, |best: Option<f64>, d| Some(best.map_or(d, |b| b.min(d))))
        .unwrap_or(0.0);

    let denom = a.max(b);
    if denom == 0.0 {
        0.0
    } else {
        (b - a) / denom
    }
}

fn mean_distance(p: &Point, points: &[Point], members: &[usize]) -> f64 {
    let sum: f64 = members.iter().map(|&j| euclidean(p, &points[j])).sum();
    sum / members.len() as f64
}

/// Within-cluster sum of squared Euclidean distances to each centroid.
pub fn inertia(points: &[Point], centroids: &[Point], clusters: &[Vec<usize>]) -> f64 {
    clusters
        .iter()
        .zip(centroids)
        .map(|(members, centroid)| {
            members
                .iter()
                .map(|&i| euclidean(&points[i], centroid).powi(2))
                .sum::<f64>()
        })
        .sum()
}
