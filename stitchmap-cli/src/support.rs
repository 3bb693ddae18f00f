//! Helpers shared by the subcommands.

use std::io::Write;

use camino::Utf8Path;
use stitchmap_core::Feature;
use stitchmap_data::fs::file_is_file;

use crate::CliError;

/// Ensure `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `features` as pretty-printed JSON followed by a newline.
pub(crate) fn write_features(writer: &mut dyn Write, features: &[Feature]) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(features).map_err(CliError::SerialiseFeatures)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
