//! K-means clustering on `(lat, lon)` points.
//!
//! Partitions points into k clusters by Lloyd iteration:
//!
//! 1. Initialize k centroids by sampling k *distinct* input points uniformly
//! 2. **Assign**: each point → nearest centroid (planar Euclidean, raw degrees)
//! 3. **Update**: each non-empty centroid → mean of its points
//! 4. Stop when the centroids stop moving *exactly*, or at `max_iter`
//!
//! # Differences from textbook k-means
//!
//! - Plain uniform seeding, not k-means++. Results depend on the RNG; use
//!   [`Kmeans::with_seed`] or [`Kmeans::fit_with_rng`] for reproducibility.
//! - Empty clusters keep their previous centroid (frozen) instead of being
//!   re-seeded. A frozen centroid may pick points up again later.
//! - Convergence is bitwise equality of the centroid matrix, no tolerance.
//!   Lloyd iteration reaches a fixed point in finitely many steps, so this
//!   terminates well before the cap on typical data.
//! - When `n <= k` there is nothing to optimize: every point is its own
//!   cluster and the centroids are the points themselves.
//!
//! # Cluster arena
//!
//! Clusters have no identity beyond one fit. [`KmeansFit::clusters`] is a
//! `Vec<Vec<usize>>` of point indices rebuilt on every iteration, indexed by
//! the same cluster id as [`KmeansFit::centroids`] and [`KmeansFit::labels`].

use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::geodesy::Point;
use ndarray::{Array2, ArrayView1};
use rand::prelude::*;
use rand::seq::index;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default iteration cap.
pub const DEFAULT_MAX_ITER: usize = 100;

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum iterations.
    max_iter: usize,
    /// Random seed.
    seed: Option<u64>,
}

/// Outcome of a single k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KmeansFit {
    /// One centroid per cluster. `min(k, n)` entries.
    pub centroids: Vec<Point>,
    /// Cluster id for each input point.
    pub labels: Vec<usize>,
    /// Point indices per cluster (possibly empty).
    pub clusters: Vec<Vec<usize>>,
    /// Lloyd iterations performed (0 for the `n <= k` shortcut).
    pub iterations: usize,
    /// Whether the centroids reached a fixed point before the cap.
    pub converged: bool,
}

impl KmeansFit {
    /// Number of clusters that received at least one point.
    pub fn non_empty_clusters(&self) -> usize {
        self.clusters.iter().filter(|c| !c.is_empty()).count()
    }

    /// Within-cluster sum of squared distances.
    pub fn inertia(&self, points: &[Point]) -> f64 {
        crate::metrics::inertia(points, &self.centroids, &self.clusters)
    }
}

impl Kmeans {
    /// Create a new K-means clusterer.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: DEFAULT_MAX_ITER,
            seed: None,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Requested cluster count.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Fit using the configured seed, or the thread RNG if none was set.
    pub fn fit(&self, points: &[Point]) -> Result<KmeansFit> {
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.fit_with_rng(points, &mut rng)
    }

    /// Fit drawing the initial centroids from `rng`.
    ///
    /// The configured seed is ignored.
    pub fn fit_with_rng<R: Rng + ?Sized>(&self, points: &[Point], rng: &mut R) -> Result<KmeansFit> {
        let n = points.len();
        if self.k == 0 {
            return Err(Error::InvalidClusterCount {
                requested: 0,
                n_items: n,
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        let data = to_matrix(points)?;

        if n <= self.k {
            return Ok(KmeansFit {
                centroids: points.to_vec(),
                labels: (0..n).collect(),
                clusters: (0..n).map(|i| vec![i]).collect(),
                iterations: 0,
                converged: true,
            });
        }

        let k = self.k;
        let mut centroids = Array2::<f64>::zeros((k, 2));
        for (c, idx) in index::sample(rng, n, k).into_iter().enumerate() {
            centroids.row_mut(c).assign(&data.row(idx));
        }

        let mut labels = vec![0usize; n];
        let mut clusters: Vec<Vec<usize>> = vec![Vec::new(); k];
        let mut iterations = 0;
        let mut converged = false;

        for iter in 0..self.max_iter {
            iterations = iter + 1;

            // Assignment step
            #[cfg(feature = "parallel")]
            {
                let centroids_ref = &centroids;
                labels.par_iter_mut().enumerate().for_each(|(i, label)| {
                    *label = nearest_centroid(&data.row(i), centroids_ref);
                });
            }

            #[cfg(not(feature = "parallel"))]
            for (i, label) in labels.iter_mut().enumerate() {
                *label = nearest_centroid(&data.row(i), &centroids);
            }

            clusters = vec![Vec::new(); k];
            for (i, &label) in labels.iter().enumerate() {
                clusters[label].push(i);
            }

            // Update step; empty clusters keep their centroid.
            let mut new_centroids = centroids.clone();
            for (c, members) in clusters.iter().enumerate() {
                if members.is_empty() {
                    continue;
                }
                let (mut lat_sum, mut lon_sum) = (0.0, 0.0);
                for &i in members {
                    lat_sum += data[[i, 0]];
                    lon_sum += data[[i, 1]];
                }
                let len = members.len() as f64;
                new_centroids[[c, 0]] = lat_sum / len;
                new_centroids[[c, 1]] = lon_sum / len;
            }

            if new_centroids == centroids {
                converged = true;
                break;
            }
            centroids = new_centroids;
        }

        debug!(n, k, iterations, converged, "k-means finished");

        Ok(KmeansFit {
            centroids: centroids
                .rows()
                .into_iter()
                .map(|r| Point::new(r[0], r[1]))
                .collect(),
            labels,
            clusters,
            iterations,
            converged,
        })
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, points: &[Point]) -> Result<Vec<usize>> {
        self.fit(points).map(|fit| fit.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// Copy points into an `(n, 2)` matrix, rejecting NaN/∞.
fn to_matrix(points: &[Point]) -> Result<Array2<f64>> {
    let mut flat = Vec::with_capacity(points.len() * 2);
    for (index, p) in points.iter().enumerate() {
        if !p.is_finite() {
            return Err(Error::NonFiniteCoordinate {
                index,
                latitude: p.lat,
                longitude: p.lon,
            });
        }
        flat.push(p.lat);
        flat.push(p.lon);
    }
    Array2::from_shape_vec((points.len(), 2), flat).map_err(|e| Error::Other(e.to_string()))
}

/// Index of the closest centroid; ties go to the lowest index.
fn nearest_centroid(point: &ArrayView1<'_, f64>, centroids: &Array2<f64>) -> usize {
    let mut best_cluster = 0;
    let mut best_dist = f64::INFINITY;
    for (c, centroid) in centroids.rows().into_iter().enumerate() {
        let dist = (point[0] - centroid[0]).powi(2) + (point[1] - centroid[1]).powi(2);
        if dist < best_dist {
            best_dist = dist;
            best_cluster = c;
        }
    }
    best_cluster
}
