use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::fs::read_utf8_file;
use crate::overpass::OverpassResponse;

/// Errors raised while loading a country dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be read.
    #[error("failed to read country dataset at {path}")]
    Read {
        /// Dataset location.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The dataset is not a valid Overpass JSON document.
    #[error("failed to decode country dataset at {path}")]
    Decode {
        /// Dataset location.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: simd_json::Error,
    },
}

/// Somewhere raw country boundary data can be loaded from.
///
/// Loading is blocking and may be slow; callers run it off the async
/// executor.
pub trait CountrySource: Send + Sync + 'static {
    /// Load the raw Overpass elements describing country boundaries.
    ///
    /// # Errors
    ///
    /// Returns a [`DatasetError`] when the data cannot be read or decoded.
    fn load(&self) -> Result<OverpassResponse, DatasetError>;
}

/// A pre-built Overpass JSON export on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFile {
    path: Utf8PathBuf,
}

impl DatasetFile {
    /// Dataset stored at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the dataset.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl CountrySource for DatasetFile {
    fn load(&self) -> Result<OverpassResponse, DatasetError> {
        let mut bytes = read_utf8_file(&self.path).map_err(|source| DatasetError::Read {
            path: self.path.clone(),
            source,
        })?;
        OverpassResponse::from_slice(&mut bytes).map_err(|source| DatasetError::Decode {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    fn dataset_with(contents: &str) -> (tempfile::TempDir, DatasetFile) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("countries.json");
        let mut file = std::fs::File::create(&path).expect("create dataset");
        file.write_all(contents.as_bytes()).expect("write dataset");
        let path = Utf8PathBuf::from_path_buf(path).expect("utf-8 temp path");
        (dir, DatasetFile::new(path))
    }

    #[rstest]
    fn loads_overpass_json() {
        let (_dir, dataset) = dataset_with(r#"{"elements": [{"type": "node", "id": 1, "lat": 0, "lon": 0}]}"#);
        let response = dataset.load().expect("dataset should load");
        assert_eq!(response.elements.len(), 1);
    }

    #[rstest]
    fn reports_missing_files() {
        let dataset = DatasetFile::new("/nonexistent/countries.json");
        let err = dataset.load().expect_err("dataset should be missing");
        assert!(matches!(err, DatasetError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/countries.json"));
    }

    #[rstest]
    fn reports_invalid_json() {
        let (_dir, dataset) = dataset_with("{not json");
        let err = dataset.load().expect_err("dataset should be invalid");
        assert!(matches!(err, DatasetError::Decode { .. }));
    }
}
