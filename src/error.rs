use thiserror::Error;

/// The feed payload is not a JSON object of per-flight arrays.
#[derive(Debug, Error)]
pub enum FeedFormatError {
    #[error("feed payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("feed payload is not a JSON object (found {0})")]
    NotAnObject(&'static str),
}

/// A single feed record that could not be decoded. Recovered by dropping the
/// record; never aborts a batch.
#[derive(Debug, Error, PartialEq)]
pub enum PartialRecordError {
    #[error("record {id} is not an array")]
    NotAnArray { id: String },
    #[error("record {id} is missing {field} at index {index}")]
    MissingField {
        id: String,
        field: &'static str,
        index: usize,
    },
    #[error("record {id} has a non-numeric or out-of-range {field} at index {index}")]
    NotANumber {
        id: String,
        field: &'static str,
        index: usize,
    },
}

/// The upstream flight feed could not be reached or refused the request.
#[derive(Debug, Error)]
pub enum UpstreamUnavailableError {
    #[error("request to flight feed failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("flight feed answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("flight feed did not hand out a session cookie")]
    MissingSessionCookie,
}

/// Loading a metadata reference table failed.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read reference table {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Failure of a whole nearest-flight lookup.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error(transparent)]
    Upstream(#[from] UpstreamUnavailableError),
    #[error(transparent)]
    Format(#[from] FeedFormatError),
}
