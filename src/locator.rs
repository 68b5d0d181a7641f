//! Nearest-flight selection and the per-query lookup pipeline.
//!
//! A lookup is a single sequential pass: fetch the feed snapshot around the
//! observer, decode it, then fold over the candidates keeping the one with
//! the smallest straight-line distance.

use std::sync::Arc;

use tracing::{debug, info};

use crate::api::{FeedFetcher, SessionToken};
use crate::error::LocateError;
use crate::geo::CartesianPoint;
use crate::location::{AngleUnit, ObserverQuery};
use crate::models::{decode_feed, FlightRecord};

/// Closest candidate to `observer`, or `None` for an empty candidate set.
///
/// Only a strictly smaller distance replaces the current best, so on exact
/// ties the first candidate seen wins.
pub fn select_closest<I>(observer: &CartesianPoint, candidates: I) -> Option<FlightRecord>
where
    I: IntoIterator<Item = FlightRecord>,
{
    let mut best_distance = f64::INFINITY;
    let mut best = None;

    for candidate in candidates {
        let d = observer.distance_to(&candidate.cartesian());
        if d < best_distance {
            best_distance = d;
            best = Some(candidate);
        }
    }

    if let Some(flight) = &best {
        debug!("Closest flight {} at {:.0} m", flight.identifier, best_distance);
    }
    best
}

/// Parameters of a lookup that come from configuration.
#[derive(Debug, Clone, Copy)]
pub struct LocatorSettings {
    pub latitude_delta: f64,
    pub angle_unit: AngleUnit,
}

/// Answers "which aircraft is closest to this observer" against a live feed.
pub struct NearestFlightLocator {
    fetcher: Arc<dyn FeedFetcher>,
    session: SessionToken,
    settings: LocatorSettings,
}

impl NearestFlightLocator {
    pub fn new(fetcher: Arc<dyn FeedFetcher>, session: SessionToken, settings: LocatorSettings) -> Self {
        Self {
            fetcher,
            session,
            settings,
        }
    }

    pub async fn locate(&self, query: &ObserverQuery) -> Result<Option<FlightRecord>, LocateError> {
        let observer = query.to_geodetic(self.settings.angle_unit).to_cartesian();
        let bounds = query.bounding_box(self.settings.latitude_delta, self.settings.angle_unit);

        let raw = self.fetcher.fetch(&self.session, &bounds).await?;
        let candidates = decode_feed(&raw)?;
        let count = candidates.len();

        let closest = select_closest(&observer, candidates);
        info!(
            "Selected {} from {} candidates",
            closest.as_ref().map(|f| f.identifier.as_str()).unwrap_or("nothing"),
            count
        );
        Ok(closest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpstreamUnavailableError;
    use crate::geo::{GeodeticPoint, METERS_PER_FOOT};
    use crate::location::BoundingBox;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    fn record(id: &str, position: GeodeticPoint) -> FlightRecord {
        FlightRecord {
            identifier: id.into(),
            position,
            altitude_feet: (position.altitude_meters / METERS_PER_FOOT).round() as i32,
            aircraft_type_code: None,
            airline_code: None,
            origin_airport_code: None,
            destination_airport_code: None,
            registration: None,
            callsign: None,
        }
    }

    #[test]
    fn test_selects_nearest_of_three() {
        let base = GeodeticPoint::from_degrees(-122.41, 37.77, 0.0);
        let observer = base.to_cartesian();
        // Straight up from the observer, so distance equals altitude.
        let above = |m: f64| GeodeticPoint::new(base.longitude, base.latitude, m);
        let candidates = vec![
            record("far", above(5000.0)),
            record("near", above(100.0)),
            record("farthest", above(20000.0)),
        ];

        let closest = select_closest(&observer, candidates).unwrap();
        assert_eq!(closest.identifier, "near");
        assert!((observer.distance_to(&closest.cartesian()) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_candidates_is_none() {
        let observer = GeodeticPoint::new(0.0, 0.0, 0.0).to_cartesian();
        assert!(select_closest(&observer, Vec::<FlightRecord>::new()).is_none());
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let observer = GeodeticPoint::new(0.0, 0.0, 0.0).to_cartesian();
        let p = GeodeticPoint::new(0.0, 0.0, 1000.0);
        let closest = select_closest(&observer, vec![record("first", p), record("second", p)]).unwrap();
        assert_eq!(closest.identifier, "first");
    }

    #[test]
    fn test_selection_invariant_to_altitude_unit_scale() {
        let feet = [(0.0, 0.0, 30_000.0), (0.05, 0.0, 2_000.0), (0.0, 0.1, 8_000.0), (0.0, 0.0, 4_000.0)];
        let pick = |scale: f64| {
            let observer = GeodeticPoint::from_degrees(0.0, 0.0, 1_500.0 * scale).to_cartesian();
            let candidates = feet.iter().enumerate().map(|(i, (lon, lat, ft))| {
                record(&i.to_string(), GeodeticPoint::from_degrees(*lon, *lat, ft * scale))
            });
            select_closest(&observer, candidates).unwrap().identifier
        };
        assert_eq!(pick(METERS_PER_FOOT), pick(1.0));
        assert_eq!(pick(METERS_PER_FOOT), "3");
    }

    struct MockFeed {
        payload: Result<Vec<u8>, u16>,
        seen: Mutex<Vec<(String, BoundingBox)>>,
    }

    impl MockFeed {
        fn ok(payload: serde_json::Value) -> Self {
            Self {
                payload: Ok(payload.to_string().into_bytes()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn raw(bytes: &[u8]) -> Self {
            Self {
                payload: Ok(bytes.to_vec()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                payload: Err(status),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FeedFetcher for MockFeed {
        async fn fetch(
            &self,
            session: &SessionToken,
            bounds: &BoundingBox,
        ) -> Result<Vec<u8>, UpstreamUnavailableError> {
            self.seen
                .lock()
                .unwrap()
                .push((session.cookie().to_string(), *bounds));
            match &self.payload {
                Ok(bytes) => Ok(bytes.clone()),
                Err(code) => Err(UpstreamUnavailableError::Status(
                    reqwest::StatusCode::from_u16(*code).unwrap(),
                )),
            }
        }
    }

    fn settings() -> LocatorSettings {
        LocatorSettings {
            latitude_delta: 0.2,
            angle_unit: AngleUnit::Degrees,
        }
    }

    fn query() -> ObserverQuery {
        ObserverQuery {
            longitude: -122.41,
            latitude: 37.77,
            altitude: 0.0,
        }
    }

    #[tokio::test]
    async fn test_locate_picks_closest_from_feed() {
        let feed = Arc::new(MockFeed::ok(json!({
            "full_count": 3,
            "version": 4,
            "far": ["", 37.9, -122.3, 0, 10000, 0, "", "", "B738"],
            "near": ["", 37.78, -122.41, 0, 1500, 0, "", "", "A320"],
            "broken": ["", 37.77, -122.41],
        })));
        let locator = NearestFlightLocator::new(feed.clone(), SessionToken::new("id=1"), settings());

        let closest = locator.locate(&query()).await.unwrap().unwrap();
        assert_eq!(closest.identifier, "near");
        assert_eq!(closest.aircraft_type_code.as_deref(), Some("A320"));

        let seen = feed.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "id=1");
        assert!((seen[0].1.north - 37.97).abs() < 1e-9);
        assert!((seen[0].1.south - 37.57).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_locate_empty_feed_is_none() {
        let locator = NearestFlightLocator::new(
            Arc::new(MockFeed::ok(json!({"full_count": 0, "version": 4}))),
            SessionToken::new("id=1"),
            settings(),
        );
        assert!(locator.locate(&query()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_locate_reports_upstream_failure() {
        let locator = NearestFlightLocator::new(
            Arc::new(MockFeed::failing(403)),
            SessionToken::new("stale"),
            settings(),
        );
        let err = locator.locate(&query()).await.unwrap_err();
        assert!(matches!(
            err,
            LocateError::Upstream(UpstreamUnavailableError::Status(s)) if s.as_u16() == 403
        ));
    }

    #[tokio::test]
    async fn test_locate_reports_format_failure() {
        let locator = NearestFlightLocator::new(
            Arc::new(MockFeed::raw(b"\"rate limited\"")),
            SessionToken::new("id=1"),
            settings(),
        );
        let err = locator.locate(&query()).await.unwrap_err();
        assert!(matches!(err, LocateError::Format(_)));
    }
}
