//! Choosing k by silhouette.
//!
//! For each candidate k in `[min_k, max_k]` (clamped to the point count), run
//! a fresh k-means and score the partition with
//! [`silhouette_score`](crate::metrics::silhouette_score). The highest score
//! wins; ties go to the smaller k.
//!
//! Each candidate draws its own random initialization, so the chosen k can
//! differ between runs on identical input. Pin the RNG for reproducibility.

use super::kmeans::{Kmeans, DEFAULT_MAX_ITER};
use crate::error::{Error, Result};
use crate::geodesy::Point;
use crate::metrics::silhouette_score;
use rand::prelude::*;
use tracing::debug;

/// Silhouette-driven search over a range of cluster counts.
#[derive(Debug, Clone)]
pub struct KSelector {
    min_k: usize,
    max_k: usize,
    max_iter: usize,
    seed: Option<u64>,
}

/// Result of a k search.
#[derive(Debug, Clone, PartialEq)]
pub struct KSelection {
    /// Chosen cluster count.
    pub k: usize,
    /// Silhouette of the winning candidate; `None` if no scoring was needed.
    pub score: Option<f64>,
    /// Every `(k, silhouette)` evaluated, ascending by k.
    pub candidates: Vec<(usize, f64)>,
}

impl KSelection {
    fn unscored(k: usize) -> Self {
        Self {
            k,
            score: None,
            candidates: Vec::new(),
        }
    }
}

impl KSelector {
    /// Search the inclusive range `[min_k, max_k]`.
    pub fn new(min_k: usize, max_k: usize) -> Self {
        Self {
            min_k,
            max_k,
            max_iter: DEFAULT_MAX_ITER,
            seed: None,
        }
    }

    /// Iteration cap for each k-means run.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run the search with the configured seed, or the thread RNG.
    pub fn select(&self, points: &[Point]) -> Result<KSelection> {
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.select_with_rng(points, &mut rng)
    }

    /// Run the search, drawing every k-means initialization from `rng`.
    pub fn select_with_rng<R: Rng + ?Sized>(
        &self,
        points: &[Point],
        rng: &mut R,
    ) -> Result<KSelection> {
        if self.min_k == 0 || self.max_k < self.min_k {
            return Err(Error::InvalidRange {
                min_k: self.min_k,
                max_k: self.max_k,
            });
        }
        let n = points.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }

        // Every point its own cluster.
        if n <= self.min_k {
            return Ok(KSelection::unscored(n));
        }

        let lo = self.min_k.min(n);
        let hi = self.max_k.min(n);
        if lo == hi {
            return Ok(KSelection::unscored(lo));
        }

        let mut best_k = lo;
        let mut best_score = f64::NEG_INFINITY;
        let mut candidates = Vec::with_capacity(hi - lo + 1);

        for k in lo..=hi {
            let fit = Kmeans::new(k)
                .with_max_iter(self.max_iter)
                .fit_with_rng(points, rng)?;
            let score = silhouette_score(points, &fit.clusters);
            debug!(
                k,
                score,
                inertia = fit.inertia(points),
                iterations = fit.iterations,
                "scored candidate"
            );
            candidates.push((k, score));
            if score > best_score {
                best_score = score;
                best_k = k;
            }
        }

        Ok(KSelection {
            k: best_k,
            score: Some(best_score),
            candidates,
        })
    }
}
