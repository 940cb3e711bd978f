//! Eclipse `feature.xml` model and the walker that reads it.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::naming::feature_archive_name;

/// Version value Tycho writes for plugins it could not resolve.
pub const UNRESOLVED_VERSION: &str = "0.0.0";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureManifest {
    pub id: Option<String>,
    pub version: Option<String>,
    pub label: Option<String>,
    pub plugins: Vec<PluginRef>,
    pub includes: Vec<IncludeRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginRef {
    pub id: String,
    pub version: String,
    pub arch: String,
    pub os: String,
    pub ws: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncludeRef {
    pub id: String,
    pub version: String,
}

impl PluginRef {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_platform(mut self, arch: &str, os: &str, ws: &str) -> Self {
        self.arch = arch.to_string();
        self.os = os.to_string();
        self.ws = ws.to_string();
        self
    }

    /// Plugins with an empty or unresolved version are left out of the
    /// descriptor entirely.
    pub fn is_excluded(&self) -> bool {
        self.version.is_empty() || self.version == UNRESOLVED_VERSION
    }

    pub fn is_unqualified(&self) -> bool {
        self.arch.is_empty() && self.os.is_empty() && self.ws.is_empty()
    }
}

impl IncludeRef {
    pub fn archive_name(&self) -> String {
        feature_archive_name(&self.id, &self.version)
    }

    /// Sibling archive of the feature found in `features_dir`.
    pub fn archive_path(&self, features_dir: &Path) -> PathBuf {
        features_dir.join(self.archive_name())
    }
}

/// Parses a feature manifest, collecting the `<plugin>` and `<includes>`
/// children of the root element in document order.
pub fn parse_feature_xml<R: BufRead>(source: R) -> Result<FeatureManifest, String> {
    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::new();
    let mut manifest = FeatureManifest::default();
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                visit_element(&mut manifest, &e, depth, &mut saw_root)?;
                depth += 1;
            }
            Ok(Event::Empty(e)) => visit_element(&mut manifest, &e, depth, &mut saw_root)?,
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                ));
            }
        }
        buf.clear();
    }

    if !saw_root {
        return Err("document has no root element".to_string());
    }
    if depth != 0 {
        return Err("unexpected end of document".to_string());
    }

    Ok(manifest)
}

fn visit_element(
    manifest: &mut FeatureManifest,
    element: &BytesStart<'_>,
    depth: usize,
    saw_root: &mut bool,
) -> Result<(), String> {
    match depth {
        0 => {
            if *saw_root {
                return Err("more than one root element".to_string());
            }
            *saw_root = true;
            let mut attrs = attributes(element)?;
            manifest.id = attrs.remove("id");
            manifest.version = attrs.remove("version");
            manifest.label = attrs.remove("label");
        }
        1 => match element.name().as_ref() {
            b"plugin" => {
                let mut attrs = attributes(element)?;
                let mut take = |key: &str| attrs.remove(key).unwrap_or_default();
                manifest.plugins.push(PluginRef {
                    id: take("id"),
                    version: take("version"),
                    arch: take("arch"),
                    os: take("os"),
                    ws: take("ws"),
                });
            }
            b"includes" => {
                let mut attrs = attributes(element)?;
                let mut take = |key: &str| attrs.remove(key).unwrap_or_default();
                manifest.includes.push(IncludeRef {
                    id: take("id"),
                    version: take("version"),
                });
            }
            _ => {}
        },
        _ => {}
    }
    Ok(())
}

fn attributes(element: &BytesStart<'_>) -> Result<HashMap<String, String>, String> {
    let mut out = HashMap::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| format!("bad attribute: {e}"))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| format!("bad attribute value for {key}: {e}"))?
            .into_owned();
        out.insert(key, value);
    }
    Ok(out)
}
