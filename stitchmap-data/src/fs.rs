//! Capability-based file helpers built on `cap-std` and `camino`.

use std::io::{self, Read};

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};

/// Open a UTF-8 file path using ambient authority.
///
/// # Errors
///
/// Returns the underlying I/O error.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read the whole file at `path`.
///
/// # Errors
///
/// Returns the underlying I/O error.
pub fn read_utf8_file(path: &Utf8Path) -> io::Result<Vec<u8>> {
    let mut file = open_utf8_file(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Create or truncate the file at `path` inside its existing parent directory.
///
/// # Errors
///
/// Returns an error when the parent directory cannot be opened or the path
/// has no file name.
pub fn create_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    let (dir, file_name) = open_parent(path)?;
    dir.create(file_name)
}

/// Report whether `path` names a regular file.
///
/// # Errors
///
/// Returns `NotFound` when nothing exists at `path`, and other I/O errors
/// when the metadata cannot be read.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, file_name) = open_parent(path)?;
    dir.metadata(file_name).map(|meta| meta.is_file())
}

fn open_parent(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, &str)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}
