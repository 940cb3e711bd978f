//! Version-free plugin names on the update site.
//!
//! When descriptors reference `plugins/<id>.jar`, the versioned jars Tycho
//! produced must be renamed. A site can carry several versions of one bundle;
//! only the highest `Bundle-Version` survives.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::archive::read_bundle_version;
use crate::error::{JnlpError, Result};
use crate::naming::plugin_path;
use crate::scan::bundle_candidates;
use crate::version::BundleVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<T> {
    pub keep: T,
    pub remove: Vec<T>,
}

/// Picks the single candidate carrying the maximum version.
///
/// Returns `None` for an empty input and `AmbiguousVersion` when more than one
/// candidate in `dir` shares the maximum.
pub fn select_highest<T>(
    dir: &Path,
    bsn: &str,
    candidates: Vec<(BundleVersion, T)>,
) -> Result<Option<Selection<T>>> {
    let Some(max) = candidates.iter().map(|(v, _)| v).max().cloned() else {
        return Ok(None);
    };

    let (mut top, rest): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|(v, _)| *v == max);
    if top.len() > 1 {
        return Err(JnlpError::AmbiguousVersion {
            bsn: bsn.to_string(),
            dir: dir.to_path_buf(),
            version: max.to_string(),
            count: top.len(),
        });
    }

    let (_, keep) = top.remove(0);
    Ok(Some(Selection {
        keep,
        remove: rest.into_iter().map(|(_, item)| item).collect(),
    }))
}

#[derive(Debug, Clone, Serialize)]
pub struct DedupResult {
    pub bsn: String,
    pub kept: Option<String>,
    pub version: Option<String>,
    pub removed: Vec<String>,
}

/// Deletes every jar of `bsn` in `dir` except the one with the highest
/// bundle version. Nothing is deleted if the highest version is ambiguous.
pub fn keep_highest_version(dir: &Path, bsn: &str) -> Result<DedupResult> {
    let mut versioned = Vec::new();
    for jar in bundle_candidates(dir, bsn)? {
        let version = read_bundle_version(&jar)?;
        debug!(jar = %jar.display(), %version, "bundle candidate");
        versioned.push((version, jar));
    }

    let version = versioned.iter().map(|(v, _)| v).max().map(ToString::to_string);
    let Some(selection) = select_highest(dir, bsn, versioned)? else {
        return Ok(DedupResult {
            bsn: bsn.to_string(),
            kept: None,
            version: None,
            removed: Vec::new(),
        });
    };

    let mut removed = Vec::with_capacity(selection.remove.len());
    for jar in selection.remove {
        std::fs::remove_file(&jar).map_err(|e| JnlpError::io(&jar, e))?;
        info!(jar = %jar.display(), "removed superseded bundle");
        removed.push(jar.to_string_lossy().to_string());
    }

    Ok(DedupResult {
        bsn: bsn.to_string(),
        kept: Some(selection.keep.to_string_lossy().to_string()),
        version,
        removed,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameOutcome {
    Renamed,
    Deduplicated,
    Missing,
}

/// Renames `plugins/<id>_<version>.jar` below `site_dir` to `plugins/<id>.jar`.
pub fn rename_plugin(site_dir: &Path, id: &str, version: &str) -> Result<RenameOutcome> {
    let source = site_dir.join(plugin_path(false, id, version));
    let target = site_dir.join(plugin_path(true, id, version));

    if !source.exists() {
        debug!(
            jar = %source.display(),
            "could not rename, because it didn't exist (maybe it was renamed already)"
        );
        return Ok(RenameOutcome::Missing);
    }

    if !target.exists() && std::fs::rename(&source, &target).is_ok() {
        return Ok(RenameOutcome::Renamed);
    }

    let plugins_dir = source.parent().unwrap_or(site_dir);
    if bundle_candidates(plugins_dir, id)?.len() <= 1 {
        return Err(JnlpError::NoAlternates {
            bsn: id.to_string(),
            from: source,
            to: target,
        });
    }

    info!(
        plugin = %target.display(),
        "plugin exists in more than one version; all but the highest will be removed"
    );
    let result = keep_highest_version(plugins_dir, id)?;

    if let Some(kept) = result.kept.map(PathBuf::from)
        && kept != target
    {
        std::fs::rename(&kept, &target).map_err(|e| JnlpError::io(&kept, e))?;
    }

    Ok(RenameOutcome::Deduplicated)
}
