//! Observer position handling for the nearest-flight lookup.
//!
//! This module turns the raw numbers from a request ([`ObserverQuery`]) into
//! a [`GeodeticPoint`] and derives the [`BoundingBox`] used to scope the
//! upstream feed query around the observer.

use serde::{Deserialize, Serialize};

use crate::geo::{feet_to_meters, GeodeticPoint};

/// Unit in which observer longitude/latitude are supplied.
///
/// The transform always works in radians and the feed's `bounds` parameter
/// always in degrees; each side converts from this unit as needed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

/// Raw observer position as received from a request.
///
/// Ranges are not validated: `|latitude| > 90` produces a nonsensical but
/// finite result rather than an error.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ObserverQuery {
    pub longitude: f64,
    pub latitude: f64,
    /// Feet above the ellipsoid.
    pub altitude: f64,
}

impl ObserverQuery {
    /// Observer position on the ellipsoid, with altitude converted to meters.
    pub fn to_geodetic(&self, unit: AngleUnit) -> GeodeticPoint {
        let altitude_meters = feet_to_meters(self.altitude);
        match unit {
            AngleUnit::Degrees => {
                GeodeticPoint::from_degrees(self.longitude, self.latitude, altitude_meters)
            }
            AngleUnit::Radians => GeodeticPoint::new(self.longitude, self.latitude, altitude_meters),
        }
    }

    /// Query region centered on the observer, in the feed's degree units.
    pub fn bounding_box(&self, latitude_delta: f64, unit: AngleUnit) -> BoundingBox {
        let (longitude, latitude) = match unit {
            AngleUnit::Degrees => (self.longitude, self.latitude),
            AngleUnit::Radians => (self.longitude.to_degrees(), self.latitude.to_degrees()),
        };
        BoundingBox::around(longitude, latitude, latitude_delta)
    }

    /// True when every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite() && self.altitude.is_finite()
    }
}

/// Rectangular longitude/latitude region in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Small-angle approximation: the longitude half-width shrinks with
    /// `cos(latitude)` so the box stays roughly square on the ground.
    pub fn around(longitude: f64, latitude: f64, latitude_delta: f64) -> Self {
        let longitude_delta = latitude_delta * latitude.to_radians().cos();
        Self {
            north: latitude + latitude_delta,
            south: latitude - latitude_delta,
            west: longitude - longitude_delta,
            east: longitude + longitude_delta,
        }
    }

    /// `north,south,west,east` as the feed's `bounds` parameter expects.
    pub fn to_query_param(&self) -> String {
        format!(
            "{:.6},{:.6},{:.6},{:.6}",
            self.north, self.south, self.west, self.east
        )
    }
}
