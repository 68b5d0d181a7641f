//! Static code-to-name lookup tables.
//!
//! The tables come from openflights.org style CSV files where the first
//! column is the code and the second column is the human-readable name.
//! They are loaded once at startup and only read afterwards.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{info, warn};

use crate::config::DataConfig;
use crate::error::MetadataError;
use crate::models::FlightRecord;

pub const NO_AIRCRAFT_FOUND: &str = "No aircraft found nearby";

/// Code to name mapping for one reference table.
#[derive(Debug, Default, Clone)]
pub struct CodeTable {
    names: HashMap<String, String>,
}

impl CodeTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        info!("Loading {}", path.display());

        let rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|source| MetadataError::Csv {
                path: path.display().to_string(),
                source,
            })?;

        Self::from_csv(rdr, &path.display().to_string())
    }

    fn from_csv<R: Read>(mut rdr: csv::Reader<R>, origin: &str) -> Result<Self, MetadataError> {
        let mut names = HashMap::new();

        for result in rdr.records() {
            let record = result.map_err(|source| MetadataError::Csv {
                path: origin.to_string(),
                source,
            })?;

            match (record.get(0), record.get(1)) {
                (Some(code), Some(name)) => {
                    let code = code.trim();
                    if !code.is_empty() {
                        names.insert(code.to_string(), name.trim().to_string());
                    }
                }
                _ => warn!("Skipping short row in {}: {:?}", origin, record),
            }
        }

        info!("Loaded {} codes from {}", names.len(), origin);
        Ok(Self { names })
    }

    /// Name for `code`, or an empty string when the code is unknown.
    pub fn resolve(&self, code: &str) -> &str {
        self.names.get(code).map(String::as_str).unwrap_or("")
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.names.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CodeTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Resolves the coded fields of a [`FlightRecord`] to display names.
#[derive(Debug, Default, Clone)]
pub struct MetadataResolver {
    pub aircraft_types: CodeTable,
    pub airlines: CodeTable,
    pub airports: CodeTable,
}

impl MetadataResolver {
    pub fn load(data: &DataConfig) -> Result<Self, MetadataError> {
        Ok(Self {
            aircraft_types: CodeTable::load(&data.aircraft_types)?,
            airlines: CodeTable::load(&data.airlines)?,
            airports: CodeTable::load(&data.airports)?,
        })
    }

    pub fn resolve_aircraft_type(&self, code: &str) -> &str {
        self.aircraft_types.resolve(code)
    }

    pub fn resolve_airline(&self, code: &str) -> &str {
        self.airlines.resolve(code)
    }

    pub fn resolve_airport(&self, iata_code: &str) -> &str {
        self.airports.resolve(iata_code)
    }

    /// One human-readable line describing the selected flight.
    ///
    /// `"<airline> <aircraft type> from <origin> to <destination>"`; the
    /// from/to clauses are left out when the airport does not resolve.
    pub fn describe(&self, flight: Option<&FlightRecord>) -> String {
        let Some(flight) = flight else {
            return NO_AIRCRAFT_FOUND.to_string();
        };

        let resolve = |code: &Option<String>, table: &CodeTable| -> String {
            code.as_deref()
                .map(|c| table.resolve(c))
                .unwrap_or("")
                .to_string()
        };

        let airline = resolve(&flight.airline_code, &self.airlines);
        let aircraft = resolve(&flight.aircraft_type_code, &self.aircraft_types);
        let origin = resolve(&flight.origin_airport_code, &self.airports);
        let destination = resolve(&flight.destination_airport_code, &self.airports);

        let mut line = [airline.as_str(), aircraft.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if line.is_empty() {
            line.push_str("Unidentified aircraft");
        }
        if !origin.is_empty() {
            line.push_str(" from ");
            line.push_str(&origin);
        }
        if !destination.is_empty() {
            line.push_str(" to ");
            line.push_str(&destination);
        }
        line
    }
}
