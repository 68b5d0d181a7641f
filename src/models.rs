use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{FeedFormatError, PartialRecordError};
use crate::geo::{feet_to_meters, CartesianPoint, GeodeticPoint};

/// One aircraft from a single feed snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightRecord {
    /// Feed-assigned token; may be empty.
    pub identifier: String,
    /// Altitude already converted to meters.
    pub position: GeodeticPoint,
    pub altitude_feet: i32,
    pub aircraft_type_code: Option<String>,
    pub airline_code: Option<String>,
    pub origin_airport_code: Option<String>,
    pub destination_airport_code: Option<String>,
    pub registration: Option<String>,
    pub callsign: Option<String>,
}

impl FlightRecord {
    pub fn cartesian(&self) -> CartesianPoint {
        self.position.to_cartesian()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Text,
}

/// One slot of the feed's positional per-aircraft array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedColumn {
    pub index: usize,
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

const fn column(index: usize, name: &'static str, kind: FieldKind, required: bool) -> FeedColumn {
    FeedColumn {
        index,
        name,
        kind,
        required,
    }
}

pub const LATITUDE: FeedColumn = column(1, "latitude", FieldKind::Number, true);
pub const LONGITUDE: FeedColumn = column(2, "longitude", FieldKind::Number, true);
pub const ALTITUDE: FeedColumn = column(4, "altitude", FieldKind::Number, true);
pub const AIRCRAFT_TYPE: FeedColumn = column(8, "aircraft type", FieldKind::Text, false);
pub const REGISTRATION: FeedColumn = column(9, "registration", FieldKind::Text, false);
pub const ORIGIN_AIRPORT: FeedColumn = column(11, "origin airport", FieldKind::Text, false);
pub const DESTINATION_AIRPORT: FeedColumn =
    column(12, "destination airport", FieldKind::Text, false);
pub const CALLSIGN: FeedColumn = column(16, "callsign", FieldKind::Text, false);
pub const AIRLINE: FeedColumn = column(18, "airline", FieldKind::Text, false);

/// Every column the decoder understands. Indices not listed are ignored.
pub const FEED_SCHEMA: [FeedColumn; 9] = [
    LATITUDE,
    LONGITUDE,
    ALTITUDE,
    AIRCRAFT_TYPE,
    REGISTRATION,
    ORIGIN_AIRPORT,
    DESTINATION_AIRPORT,
    CALLSIGN,
    AIRLINE,
];

/// Top-level keys that carry feed statistics instead of flights.
pub const BOOKKEEPING_KEYS: [&str; 2] = ["full_count", "version"];

impl FeedColumn {
    /// Reads this column from `row`.
    ///
    /// `Ok(None)` means the field is absent (missing index, `null`, empty
    /// string, or a value of the wrong type) and the column is optional.
    /// Required columns turn those cases into a [`PartialRecordError`].
    pub fn extract(&self, id: &str, row: &[Value]) -> Result<Option<FieldValue>, PartialRecordError> {
        let value = match row.get(self.index) {
            None | Some(Value::Null) => return self.absent(id),
            Some(v) => v,
        };

        match self.kind {
            FieldKind::Number => match value.as_f64() {
                Some(n) => Ok(Some(FieldValue::Number(n))),
                None if self.required => Err(PartialRecordError::NotANumber {
                    id: id.to_string(),
                    field: self.name,
                    index: self.index,
                }),
                None => Ok(None),
            },
            FieldKind::Text => match value.as_str().map(str::trim) {
                Some(s) if !s.is_empty() => Ok(Some(FieldValue::Text(s.to_string()))),
                _ => self.absent(id),
            },
        }
    }

    fn absent(&self, id: &str) -> Result<Option<FieldValue>, PartialRecordError> {
        if self.required {
            Err(PartialRecordError::MissingField {
                id: id.to_string(),
                field: self.name,
                index: self.index,
            })
        } else {
            Ok(None)
        }
    }

    fn number(&self, id: &str, row: &[Value]) -> Result<f64, PartialRecordError> {
        match self.extract(id, row)? {
            Some(FieldValue::Number(n)) => Ok(n),
            _ => Err(PartialRecordError::MissingField {
                id: id.to_string(),
                field: self.name,
                index: self.index,
            }),
        }
    }

    /// Whole feet; values that don't fit an `i32` are rejected, not clamped.
    fn feet(&self, id: &str, row: &[Value]) -> Result<i32, PartialRecordError> {
        let feet = self.number(id, row)?.round();
        if feet.is_finite() && feet >= f64::from(i32::MIN) && feet <= f64::from(i32::MAX) {
            Ok(feet as i32)
        } else {
            Err(PartialRecordError::NotANumber {
                id: id.to_string(),
                field: self.name,
                index: self.index,
            })
        }
    }

    fn text(&self, id: &str, row: &[Value]) -> Option<String> {
        match self.extract(id, row) {
            Ok(Some(FieldValue::Text(s))) => Some(s),
            _ => None,
        }
    }
}

impl FlightRecord {
    /// Decodes one positional feed entry.
    pub fn from_feed_entry(id: &str, entry: &Value) -> Result<Self, PartialRecordError> {
        let row = entry.as_array().ok_or_else(|| PartialRecordError::NotAnArray {
            id: id.to_string(),
        })?;

        let latitude = LATITUDE.number(id, row)?;
        let longitude = LONGITUDE.number(id, row)?;
        let altitude_feet = ALTITUDE.feet(id, row)?;

        Ok(Self {
            identifier: id.to_string(),
            position: GeodeticPoint::from_degrees(
                longitude,
                latitude,
                feet_to_meters(f64::from(altitude_feet)),
            ),
            altitude_feet,
            aircraft_type_code: AIRCRAFT_TYPE.text(id, row),
            airline_code: AIRLINE.text(id, row),
            origin_airport_code: ORIGIN_AIRPORT.text(id, row),
            destination_airport_code: DESTINATION_AIRPORT.text(id, row),
            registration: REGISTRATION.text(id, row),
            callsign: CALLSIGN.text(id, row),
        })
    }
}

/// Decodes a raw feed snapshot into the candidate set.
///
/// Only a payload that is not a JSON object fails; malformed entries are
/// dropped one by one.
pub fn decode_feed(raw: &[u8]) -> Result<Vec<FlightRecord>, FeedFormatError> {
    let payload: Value = serde_json::from_slice(raw)?;
    decode_feed_value(payload)
}

pub fn decode_feed_value(payload: Value) -> Result<Vec<FlightRecord>, FeedFormatError> {
    let entries: Map<String, Value> = match payload {
        Value::Object(map) => map,
        other => return Err(FeedFormatError::NotAnObject(json_type_name(&other))),
    };

    let mut flights = Vec::with_capacity(entries.len());
    for (id, entry) in entries.iter() {
        if BOOKKEEPING_KEYS.contains(&id.as_str()) {
            continue;
        }
        match FlightRecord::from_feed_entry(id, entry) {
            Ok(flight) => flights.push(flight),
            Err(e) => warn!("Dropping feed record: {}", e),
        }
    }

    debug!("Decoded {} of {} feed entries", flights.len(), entries.len());
    Ok(flights)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
