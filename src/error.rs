//! Error taxonomy. Startup errors (config, model) abort the process; lookup
//! and prediction errors are per-request and map to HTTP statuses in `api`.
//! Dataset errors only surface from the `engineer` command.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cors origin {0:?} is not allowed: list explicit origins, credentials are enabled")]
    WildcardCorsOrigin(String),
}

/// Model artifact could not be loaded. Always fatal.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model manifest lists no feature columns")]
    EmptyColumns,

    #[error("feature column {0:?} listed more than once")]
    DuplicateColumn(String),

    #[error("{what} has {got} entries, model expects {expected} feature columns")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("onnx runtime: {0}")]
    Onnx(String),
}

/// Labelled training data could not be engineered.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset {path} is not a JSON array of objects: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("row {row}: column {column:?} is missing or not numeric")]
    MissingColumn { row: usize, column: &'static str },

    #[error("row {row}: column {column:?} is not finite")]
    NonFinite { row: usize, column: &'static str },
}

/// Outcome of a failed account lookup.
///
/// The API collapses every variant into one "not found" response unless
/// `fetcher.collapse_errors` is turned off.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("profile not found")]
    NotFound,

    #[error("profile source rate limited the lookup")]
    RateLimited,

    #[error("profile lookup timed out")]
    Timeout,

    #[error("profile lookup failed: {0}")]
    Transient(String),
}

/// Classifier could not produce a label.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("classifier returned class {0}, expected 0 or 1")]
    UnexpectedClass(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(FetchError::NotFound.to_string(), "profile not found");
        assert_eq!(
            PredictError::UnexpectedClass(2).to_string(),
            "classifier returned class 2, expected 0 or 1"
        );
        let e = ModelLoadError::DimensionMismatch {
            what: "coefficients",
            expected: 8,
            got: 3,
        };
        assert_eq!(
            e.to_string(),
            "coefficients has 3 entries, model expects 8 feature columns"
        );
        let e = DatasetError::MissingColumn {
            row: 4,
            column: "usernameLength",
        };
        assert_eq!(
            e.to_string(),
            "row 4: column \"usernameLength\" is missing or not numeric"
        );
    }
}
