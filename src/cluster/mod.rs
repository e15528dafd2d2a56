//! Clustering of `(lat, lon)` points.
//!
//! ## K-means
//!
//! Assign each point to the nearest centroid, then move each centroid to the
//! mean of its points. Repeat until nothing moves.
//!
//! **Objective**: minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! Here `x` is a raw `(lat, lon)` pair. At regional scale the planar
//! approximation groups sites sensibly. It is not a ground distance.
//!
//! ## Choosing k
//!
//! K-means needs k up front. [`KSelector`] tries every k in a small range and
//! keeps the one with the best
//! [silhouette](crate::metrics::silhouette_score).
//!
//! ## Usage
//!
//! ```rust
//! use depot::cluster::{Clustering, KSelector, Kmeans};
//! use depot::geodesy::Point;
//!
//! let points = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(0.1, 0.1),
//!     Point::new(10.0, 10.0),
//!     Point::new(10.1, 10.1),
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(1).fit_predict(&points).unwrap();
//! assert_eq!(labels.len(), 4);
//!
//! let choice = KSelector::new(2, 3).with_seed(1).select(&points).unwrap();
//! assert!((2..=3).contains(&choice.k));
//! ```

mod kmeans;
mod selector;
mod traits;

pub use kmeans::{Kmeans, KmeansFit, DEFAULT_MAX_ITER};
pub use selector::{KSelection, KSelector};
pub use traits::Clustering;
