//! Test helpers for writing datasets into temporary workspaces.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use stitchmap_data::fs::create_utf8_file;
use tempfile::TempDir;

/// One country relation split over three ways, plus a park way.
pub(super) const SQUARELAND: &str = r#"{"elements": [
    {"type": "relation", "id": 10,
     "tags": {"type": "boundary", "boundary": "administrative", "admin_level": "2",
              "name": "Squareland"},
     "members": [
        {"type": "way", "ref": 1, "role": "outer",
         "geometry": [{"lat": 0, "lon": 0}, {"lat": 0, "lon": 1}]},
        {"type": "way", "ref": 2, "role": "outer",
         "geometry": [{"lat": 1, "lon": 1}, {"lat": 0, "lon": 1}]},
        {"type": "way", "ref": 3, "role": "outer",
         "geometry": [{"lat": 1, "lon": 1}, {"lat": 1, "lon": 0}, {"lat": 0, "lon": 0}]}
     ]},
    {"type": "way", "id": 20, "tags": {"leisure": "park", "name": "Green"},
     "geometry": [{"lat": 0.2, "lon": 0.2}, {"lat": 0.2, "lon": 0.4},
                  {"lat": 0.4, "lon": 0.4}, {"lat": 0.2, "lon": 0.2}]}
]}"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    let mut file = create_utf8_file(path).expect("create file");
    file.write_all(contents).expect("write file");
}

pub(super) fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace")
}
