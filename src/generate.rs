//! Depth-first generation of one descriptor per feature archive.
//!
//! Included features are resolved as `<id>_<version>.jar` next to the
//! including archive. Each nested feature is fully processed, written and
//! (when stripping versions) has its plugins renamed before the next sibling
//! include is looked at.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::archive::read_feature_manifest;
use crate::config::{ECLIPSE_FEATURE, JnlpConfig};
use crate::dedup::{RenameOutcome, rename_plugin};
use crate::descriptor::DescriptorBuilder;
use crate::error::JnlpError;
use crate::naming::{descriptor_file_name, extension_href};
use crate::writer::write_descriptor;

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDescriptor {
    pub feature_archive: String,
    pub descriptor_path: String,
    pub content_hash: String,
    pub jars: usize,
    pub extensions: usize,
    pub platform_groups: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateReport {
    pub feature_archive: String,
    pub skipped: bool,
    pub duration_ms: u64,
    pub descriptors: Vec<GeneratedDescriptor>,
    pub unresolved_includes: Vec<String>,
    pub renamed_plugins: usize,
    pub deleted_archives: Vec<String>,
}

/// Runs the whole pipeline for `config.feature_jar`.
///
/// A packaging other than `eclipse-feature` is a no-op. Any failure aborts
/// the run; unresolved includes are only reported.
pub fn generate(config: &JnlpConfig) -> Result<GenerateReport> {
    let start = Instant::now();
    let feature_archive = config.feature_jar.to_string_lossy().to_string();

    if !config.is_feature_packaging() {
        debug!(
            packaging = %config.packaging,
            "the packaging of the current project is not {ECLIPSE_FEATURE}"
        );
        return Ok(GenerateReport {
            feature_archive,
            skipped: true,
            ..GenerateReport::default()
        });
    }

    let mut generator = Generator::new(config);
    generator.process(&config.feature_jar)?;

    let mut deleted_archives = Vec::new();
    if config.delete_features {
        for archive in &generator.processed_archives {
            std::fs::remove_file(archive).with_context(|| {
                format!("Failed to delete feature archive: {}", archive.display())
            })?;
            deleted_archives.push(archive.to_string_lossy().to_string());
        }
    }

    Ok(GenerateReport {
        feature_archive,
        skipped: false,
        duration_ms: start.elapsed().as_millis() as u64,
        descriptors: generator.descriptors,
        unresolved_includes: generator.unresolved_includes,
        renamed_plugins: generator.renamed_plugins,
        deleted_archives,
    })
}

struct Generator<'a> {
    config: &'a JnlpConfig,
    in_progress: Vec<PathBuf>,
    completed: HashMap<PathBuf, String>,
    processed_archives: Vec<PathBuf>,
    descriptors: Vec<GeneratedDescriptor>,
    unresolved_includes: Vec<String>,
    renamed_plugins: usize,
}

impl<'a> Generator<'a> {
    fn new(config: &'a JnlpConfig) -> Self {
        Self {
            config,
            in_progress: Vec::new(),
            completed: HashMap::new(),
            processed_archives: Vec::new(),
            descriptors: Vec::new(),
            unresolved_includes: Vec::new(),
            renamed_plugins: 0,
        }
    }

    /// Processes `archive` and returns the file name of its descriptor.
    fn process(&mut self, archive: &Path) -> Result<String> {
        let key = archive
            .canonicalize()
            .unwrap_or_else(|_| archive.to_path_buf());

        if self.in_progress.contains(&key) {
            return Err(JnlpError::IncludeCycle { path: key }.into());
        }
        if let Some(name) = self.completed.get(&key) {
            debug!(archive = %archive.display(), "feature already generated in this run");
            return Ok(name.clone());
        }

        self.in_progress.push(key.clone());
        let result = self.process_archive(archive);
        self.in_progress.pop();

        let name = result?;
        self.completed.insert(key, name.clone());
        Ok(name)
    }

    fn process_archive(&mut self, archive: &Path) -> Result<String> {
        let manifest = read_feature_manifest(archive)
            .with_context(|| format!("Failed to read feature archive: {}", archive.display()))?;
        info!(
            archive = %archive.display(),
            feature = manifest.id.as_deref().unwrap_or("?"),
            plugins = manifest.plugins.len(),
            includes = manifest.includes.len(),
            "generating descriptor"
        );

        let features_dir = archive.parent().unwrap_or(Path::new("."));
        let mut builder = DescriptorBuilder::new(self.config);

        for include in &manifest.includes {
            let nested = include.archive_path(features_dir);
            if !nested.is_file() {
                warn!(include = %nested.display(), "unresolved include");
                self.unresolved_includes
                    .push(nested.to_string_lossy().to_string());
                continue;
            }

            let nested_name = self
                .process(&nested)
                .with_context(|| format!("While processing includes of {}", archive.display()))?;
            builder.add_extension(extension_href(&nested_name));
        }

        for plugin in &manifest.plugins {
            if plugin.is_excluded() {
                debug!(
                    plugin = %plugin.id,
                    version = %plugin.version,
                    "skipping unresolved plugin"
                );
                continue;
            }

            if self.config.strip_versions {
                let outcome = rename_plugin(&self.config.site_dir, &plugin.id, &plugin.version)
                    .with_context(|| {
                        format!(
                            "Failed to rename plugin {} referenced by {}",
                            plugin.id,
                            archive.display()
                        )
                    })?;
                if outcome != RenameOutcome::Missing {
                    self.renamed_plugins += 1;
                }
            }

            builder.add_plugin(plugin);
        }

        let descriptor = builder.build();
        let file_name = archive
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .with_context(|| format!("Feature archive has no file name: {}", archive.display()))?;
        let name = descriptor_file_name(&file_name, self.config.strip_versions);
        let output = archive.with_file_name(&name);

        let content_hash = write_descriptor(&descriptor, &output)?;
        info!(descriptor = %output.display(), jars = descriptor.jar_count(), "descriptor written");

        self.descriptors.push(GeneratedDescriptor {
            feature_archive: archive.to_string_lossy().to_string(),
            descriptor_path: output.to_string_lossy().to_string(),
            content_hash,
            jars: descriptor.jar_count(),
            extensions: descriptor.extension_count(),
            platform_groups: descriptor.platform_resources.len(),
        });
        self.processed_archives.push(archive.to_path_buf());

        Ok(name)
    }
}
