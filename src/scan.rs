use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::error::{JnlpError, Result};

/// Whether `file_name` is a jar of the bundle `bsn`: either `<bsn>.jar` or
/// `<bsn>_<anything>.jar`.
pub fn is_bundle_file(file_name: &str, bsn: &str) -> bool {
    if bsn.is_empty() || !file_name.ends_with(".jar") {
        return false;
    }
    match file_name.strip_prefix(bsn) {
        Some(rest) => rest == ".jar" || rest.starts_with('_'),
        None => false,
    }
}

/// Jars of bundle `bsn` directly inside `dir`, sorted by name.
pub fn bundle_candidates(dir: &Path, bsn: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(JnlpError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }

    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1))
        .hidden(false)
        .ignore(false)
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .build();

    let mut jars: Vec<PathBuf> = walker
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| is_bundle_file(name, bsn))
        })
        .map(|entry| entry.into_path())
        .collect();

    jars.sort();
    Ok(jars)
}
