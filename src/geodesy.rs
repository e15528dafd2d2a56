//! Coordinates and the two distance notions used by the crate.
//!
//! Clustering works on raw `(lat, lon)` degrees with plain Euclidean distance:
//! cheap, and good enough to group nearby sites. Longitude degrees are *not*
//! scaled by `cos(lat)`, so clusters stretch east-west at high latitudes.
//!
//! Mapping a centroid back onto a real site uses true ground distance
//! ([`GeoMetric`]), because "nearest warehouse" should mean nearest on Earth.
//!
//! ```text
//! clustering  : d = √((lat₁-lat₂)² + (lon₁-lon₂)²)      [degrees]
//! selection   : d = geodesic on WGS-84                  [km]
//! ```

use ::geo::{Distance, Geodesic, Haversine};

/// A `(latitude, longitude)` pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Point {
    /// Create a point from latitude and longitude.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    fn to_geo(self) -> ::geo::Point<f64> {
        // geo is (x, y) = (lon, lat)
        ::geo::Point::new(self.lon, self.lat)
    }
}

impl From<(f64, f64)> for Point {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.lat, p.lon)
    }
}

/// Planar distance on raw degrees.
#[inline]
pub fn euclidean(a: &Point, b: &Point) -> f64 {
    ((a.lat - b.lat).powi(2) + (a.lon - b.lon).powi(2)).sqrt()
}

/// Ground-distance metric used when picking the site nearest a centroid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeoMetric {
    /// Ellipsoidal (WGS-84) geodesic, Karney's algorithm.
    #[default]
    Geodesic,
    /// Great-circle distance on a sphere of mean Earth radius.
    Haversine,
}

impl GeoMetric {
    /// Distance between `a` and `b` in kilometres.
    pub fn distance_km(&self, a: &Point, b: &Point) -> f64 {
        let (pa, pb) = (a.to_geo(), b.to_geo());
        let meters = match self {
            GeoMetric::Geodesic => Geodesic::distance(pa, pb),
            GeoMetric::Haversine => Haversine::distance(pa, pb),
        };
        meters / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_is_planar() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(euclidean(&a, &b), 5.0);
        assert_eq!(euclidean(&b, &a), 5.0);
    }

    #[test]
    fn test_geodesic_one_degree_of_latitude() {
        // One degree of latitude at the equator is ~110.57 km on WGS-84.
        let d = GeoMetric::Geodesic.distance_km(&Point::new(0.0, 0.0), &Point::new(1.0, 0.0));
        assert!((d - 110.574).abs() < 0.05, "got {d}");
    }

    #[test]
    fn test_geodesic_and_haversine_agree_roughly() {
        // New York -> London
        let nyc = Point::new(40.7128, -74.0060);
        let lon = Point::new(51.5074, -0.1278);
        let g = GeoMetric::Geodesic.distance_km(&nyc, &lon);
        let h = GeoMetric::Haversine.distance_km(&nyc, &lon);
        assert!((g - 5585.0).abs() < 20.0, "geodesic {g}");
        assert!((g - h).abs() / g < 0.01);
    }

    #[test]
    fn test_longitude_not_latitude_corrected() {
        // Same raw-degree gap, very different ground distance.
        let eq = (Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        let north = (Point::new(60.0, 0.0), Point::new(60.0, 1.0));
        assert_eq!(euclidean(&eq.0, &eq.1), euclidean(&north.0, &north.1));
        let m = GeoMetric::Geodesic;
        assert!(m.distance_km(&north.0, &north.1) < 0.6 * m.distance_km(&eq.0, &eq.1));
    }

    #[test]
    fn test_is_finite() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f64::NAN, 2.0).is_finite());
        assert!(!Point::new(1.0, f64::INFINITY).is_finite());
    }
}
