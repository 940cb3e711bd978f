use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

use crate::error::{JnlpError, Result};
use crate::feature::{FeatureManifest, parse_feature_xml};
use crate::version::{BUNDLE_VERSION_ATTRIBUTE, BundleVersion, manifest_attribute};

pub const FEATURE_ENTRY: &str = "feature.xml";
pub const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

fn open_archive(path: &Path) -> Result<ZipArchive<Cursor<Mmap>>> {
    let file = File::open(path).map_err(|source| JnlpError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    // SAFETY: The file is opened read-only and the map is owned by the archive
    // reader, so it cannot outlive the mapping.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|source| JnlpError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    ZipArchive::new(Cursor::new(mmap)).map_err(|e| JnlpError::corrupt(path, e))
}

/// Reads `feature.xml` out of a feature archive.
///
/// Entries are visited in stored order and only the matching one is read.
pub fn read_feature_manifest(path: &Path) -> Result<FeatureManifest> {
    let mut archive = open_archive(path)?;

    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .map_err(|e| JnlpError::corrupt(path, e))?;
        if entry.name() != FEATURE_ENTRY {
            continue;
        }
        return parse_feature_xml(BufReader::new(entry))
            .map_err(|reason| JnlpError::corrupt(path, reason));
    }

    Err(JnlpError::MissingEntry {
        path: path.to_path_buf(),
        entry: FEATURE_ENTRY,
    })
}

/// Reads the `Bundle-Version` header from a plugin jar's manifest.
pub fn read_bundle_version(jar_path: &Path) -> Result<BundleVersion> {
    let mut archive = open_archive(jar_path)?;
    let bad = |reason: String| JnlpError::BundleVersion {
        path: jar_path.to_path_buf(),
        reason,
    };

    let mut content = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .map_err(|_| bad(format!("no {MANIFEST_ENTRY}")))?
        .read_to_string(&mut content)
        .map_err(|e| bad(format!("unreadable {MANIFEST_ENTRY}: {e}")))?;

    let raw = manifest_attribute(&content, BUNDLE_VERSION_ATTRIBUTE)
        .ok_or_else(|| bad(format!("missing {BUNDLE_VERSION_ATTRIBUTE} header")))?;
    raw.parse().map_err(|e: crate::version::ParseVersionError| bad(e.to_string()))
}
