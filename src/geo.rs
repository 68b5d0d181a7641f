//! Geodetic to Cartesian (ECEF) conversion on the WGS84 ellipsoid.
//!
//! Everything here is pure arithmetic. Angles are radians and lengths are
//! meters; feet only appear at the edges through [`feet_to_meters`].

/// WGS84 semi-major axis in meters.
pub const WGS84_A: f64 = 6378137.0;

/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = 0.006694379990197619;

pub const METERS_PER_FOOT: f64 = 0.3048;

/// A position relative to the reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticPoint {
    /// Radians.
    pub longitude: f64,
    /// Radians.
    pub latitude: f64,
    pub altitude_meters: f64,
}

impl GeodeticPoint {
    pub fn new(longitude: f64, latitude: f64, altitude_meters: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude_meters,
        }
    }

    /// Builds a point from decimal degrees, as reported by the flight feed.
    pub fn from_degrees(longitude: f64, latitude: f64, altitude_meters: f64) -> Self {
        Self::new(longitude.to_radians(), latitude.to_radians(), altitude_meters)
    }

    pub fn to_cartesian(&self) -> CartesianPoint {
        to_cartesian(self.longitude, self.latitude, self.altitude_meters)
    }
}

/// Earth-centered, earth-fixed coordinates in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianPoint {
    pub fn distance_to(&self, other: &CartesianPoint) -> f64 {
        distance(self, other)
    }
}

/// Prime-vertical radius of curvature at `latitude`.
fn prime_vertical_radius(latitude: f64) -> f64 {
    WGS84_A / (1.0 - WGS84_E2 * latitude.sin().powi(2)).sqrt()
}

/// Converts longitude/latitude (radians) and altitude (meters) to ECEF.
///
/// Total over all finite inputs; no unit validation is done here.
pub fn to_cartesian(longitude: f64, latitude: f64, altitude_meters: f64) -> CartesianPoint {
    let n = prime_vertical_radius(latitude);
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_lon, cos_lon) = longitude.sin_cos();

    CartesianPoint {
        x: (n + altitude_meters) * cos_lat * cos_lon,
        y: (n + altitude_meters) * cos_lat * sin_lon,
        z: ((1.0 - WGS84_E2) * n + altitude_meters) * sin_lat,
    }
}

/// Straight-line distance between two ECEF points.
pub fn distance(p1: &CartesianPoint, p2: &CartesianPoint) -> f64 {
    ((p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2) + (p2.z - p1.z).powi(2)).sqrt()
}

pub fn feet_to_meters(feet: f64) -> f64 {
    feet * METERS_PER_FOOT
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_origin_maps_to_semi_major_axis() {
        let p = to_cartesian(0.0, 0.0, 0.0);
        assert!((p.x - WGS84_A).abs() < EPS);
        assert!(p.y.abs() < EPS);
        assert!(p.z.abs() < EPS);
    }

    #[test]
    fn test_altitude_extends_radius_at_equator() {
        let p = to_cartesian(0.0, 0.0, 1000.0);
        assert!((p.x - (WGS84_A + 1000.0)).abs() < EPS);
    }

    #[test]
    fn test_ninety_degrees_east_lies_on_y_axis() {
        let p = to_cartesian(std::f64::consts::FRAC_PI_2, 0.0, 0.0);
        assert!(p.x.abs() < 1e-3);
        assert!((p.y - WGS84_A).abs() < EPS);
    }

    #[test]
    fn test_north_pole_uses_semi_minor_axis() {
        let p = to_cartesian(0.0, std::f64::consts::FRAC_PI_2, 0.0);
        // b = a * sqrt(1 - e2)
        let b = WGS84_A * (1.0 - WGS84_E2).sqrt();
        assert!(p.x.abs() < 1e-3);
        assert!((p.z - b).abs() < 1e-3);
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_on_self() {
        let p1 = GeodeticPoint::from_degrees(-122.41, 37.77, 300.0).to_cartesian();
        let p2 = GeodeticPoint::from_degrees(-122.0, 37.5, 10_000.0).to_cartesian();
        assert_eq!(distance(&p1, &p2), distance(&p2, &p1));
        assert_eq!(distance(&p1, &p1), 0.0);
        assert_eq!(p1.distance_to(&p2), distance(&p1, &p2));
    }

    #[test]
    fn test_distance_pythagorean() {
        let p1 = CartesianPoint { x: 0.0, y: 0.0, z: 0.0 };
        let p2 = CartesianPoint { x: 3.0, y: 4.0, z: 12.0 };
        assert!((distance(&p1, &p2) - 13.0).abs() < EPS);
    }

    #[test]
    fn test_vertical_separation_matches_altitude_difference() {
        let low = GeodeticPoint::from_degrees(10.0, 45.0, 0.0).to_cartesian();
        let high = GeodeticPoint::from_degrees(10.0, 45.0, 500.0).to_cartesian();
        assert!((distance(&low, &high) - 500.0).abs() < 1e-6);
    }

    #[test]
    fn test_feet_to_meters() {
        assert!((feet_to_meters(1000.0) - 304.8).abs() < EPS);
        assert_eq!(feet_to_meters(0.0), 0.0);
    }
}
