//! In-memory JNLP descriptor and the builder that fills it from a feature.

use crate::config::JnlpConfig;
use crate::feature::{FeatureManifest, PluginRef};
use crate::naming::plugin_path;
use crate::platform::{Placement, PlatformGroups, placement_for};

pub const JNLP_SPEC_VERSION: &str = "1.0+";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Information {
    pub title: String,
    pub vendor: String,
    pub offline_allowed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceEntry {
    Jar { href: String },
    Extension { href: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceGroup {
    pub os: Option<String>,
    pub arch: Option<String>,
    pub entries: Vec<ResourceEntry>,
}

impl ResourceGroup {
    pub fn jars(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| match e {
            ResourceEntry::Jar { href } => Some(href.as_str()),
            ResourceEntry::Extension { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub codebase: String,
    pub standalone: bool,
    pub information: Information,
    pub java_version: String,
    /// Unconditional resources; always emitted even when empty.
    pub default_resources: ResourceGroup,
    /// Platform-specific resources in creation order.
    pub platform_resources: Vec<ResourceGroup>,
}

impl Descriptor {
    pub fn jar_count(&self) -> usize {
        std::iter::once(&self.default_resources)
            .chain(&self.platform_resources)
            .map(|g| g.jars().count())
            .sum()
    }

    pub fn extension_count(&self) -> usize {
        std::iter::once(&self.default_resources)
            .chain(&self.platform_resources)
            .flat_map(|g| &g.entries)
            .filter(|e| matches!(e, ResourceEntry::Extension { .. }))
            .count()
    }
}

pub struct DescriptorBuilder {
    descriptor: Descriptor,
    groups: PlatformGroups,
    strip_versions: bool,
}

impl DescriptorBuilder {
    pub fn new(config: &JnlpConfig) -> Self {
        Self {
            descriptor: Descriptor {
                codebase: config.codebase.clone(),
                standalone: config.standalone,
                information: Information {
                    title: config.title.clone(),
                    vendor: config.vendor.clone(),
                    offline_allowed: true,
                },
                java_version: config.java_version.clone(),
                default_resources: ResourceGroup::default(),
                platform_resources: Vec::new(),
            },
            groups: PlatformGroups::default(),
            strip_versions: config.strip_versions,
        }
    }

    pub fn add_extension(&mut self, href: impl Into<String>) {
        self.descriptor
            .default_resources
            .entries
            .push(ResourceEntry::Extension { href: href.into() });
    }

    /// Adds one jar entry per group the plugin's platform expands to and
    /// returns the number of entries added.
    pub fn add_plugin(&mut self, plugin: &PluginRef) -> usize {
        if plugin.is_excluded() {
            return 0;
        }

        let href = plugin_path(self.strip_versions, &plugin.id, &plugin.version);
        match placement_for(plugin) {
            Placement::Default => {
                self.descriptor
                    .default_resources
                    .entries
                    .push(ResourceEntry::Jar { href });
                1
            }
            Placement::Platform(keys) => {
                for key in &keys {
                    self.groups
                        .group_for(key)
                        .entries
                        .push(ResourceEntry::Jar { href: href.clone() });
                }
                keys.len()
            }
        }
    }

    pub fn build(mut self) -> Descriptor {
        self.descriptor.platform_resources = self.groups.into_groups();
        self.descriptor
    }
}

/// Builds a descriptor for `manifest` without touching the filesystem.
/// Extension hrefs are placed ahead of the plugin jars.
pub fn build_descriptor(
    manifest: &FeatureManifest,
    config: &JnlpConfig,
    extensions: &[String],
) -> Descriptor {
    let mut builder = DescriptorBuilder::new(config);
    for href in extensions {
        builder.add_extension(href.as_str());
    }
    for plugin in &manifest.plugins {
        builder.add_plugin(plugin);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config() -> JnlpConfig {
        JnlpConfig::new(PathBuf::from("f_1.0.0.jar"), "ACME", "Demo", "http://example.org/site")
    }

    fn manifest(plugins: Vec<PluginRef>) -> FeatureManifest {
        FeatureManifest {
            plugins,
            ..FeatureManifest::default()
        }
    }

    #[test]
    fn empty_feature_has_default_group_and_fixed_blocks() {
        let d = build_descriptor(&FeatureManifest::default(), &config(), &[]);
        assert_eq!(d.information.title, "Demo");
        assert_eq!(d.information.vendor, "ACME");
        assert!(d.information.offline_allowed);
        assert_eq!(d.java_version, "1.6+");
        assert!(d.default_resources.entries.is_empty());
        assert!(d.platform_resources.is_empty());
    }

    #[test]
    fn x86_64_plugin_lands_in_two_groups() {
        let d = build_descriptor(
            &manifest(vec![PluginRef::new("swt", "3.8.0").with_platform("x86_64", "", "")]),
            &config(),
            &[],
        );
        assert_eq!(d.jar_count(), 2);
        let arches: Vec<_> = d.platform_resources.iter().map(|g| g.arch.as_deref()).collect();
        assert_eq!(arches, vec![Some("x86_64"), Some("amd64")]);
        assert!(d.default_resources.entries.is_empty());
    }

    #[test]
    fn x86_plugin_lands_in_three_groups() {
        let d = build_descriptor(
            &manifest(vec![PluginRef::new("swt", "3.8.0").with_platform("x86", "", "")]),
            &config(),
            &[],
        );
        assert_eq!(d.jar_count(), 3);
        let arches: Vec<_> = d.platform_resources.iter().map(|g| g.arch.as_deref()).collect();
        assert_eq!(arches, vec![Some("x86"), Some("i386"), Some("i686")]);
    }

    #[test]
    fn unresolved_plugin_produces_nothing() {
        let d = build_descriptor(
            &manifest(vec![
                PluginRef::new("gone", "0.0.0"),
                PluginRef::new("gone.too", "0.0.0").with_platform("x86", "win32", "win32"),
            ]),
            &config(),
            &[],
        );
        assert_eq!(d.jar_count(), 0);
        assert!(d.platform_resources.is_empty());
    }

    #[test]
    fn groups_are_shared_between_plugins_with_same_platform() {
        let d = build_descriptor(
            &manifest(vec![
                PluginRef::new("a", "1.0.0").with_platform("ppc", "linux", "gtk"),
                PluginRef::new("b", "1.0.0").with_platform("ppc", "linux", "gtk"),
                PluginRef::new("c", "1.0.0").with_platform("", "macosx", "cocoa"),
            ]),
            &config(),
            &[],
        );
        assert_eq!(d.platform_resources.len(), 2);
        assert_eq!(
            d.platform_resources[0].jars().collect::<Vec<_>>(),
            vec!["plugins/a_1.0.0.jar", "plugins/b_1.0.0.jar"]
        );
        assert_eq!(d.platform_resources[0].os.as_deref(), Some("Linux"));
        assert_eq!(d.platform_resources[1].os.as_deref(), Some("Mac"));
        assert_eq!(d.platform_resources[1].arch, None);
    }

    #[test]
    fn extensions_precede_jars_and_hrefs_follow_strip_flag() {
        let mut cfg = config();
        cfg.strip_versions = true;
        let d = build_descriptor(
            &manifest(vec![PluginRef::new("core", "1.0.0")]),
            &cfg,
            &["features/nested.jnlp".to_string()],
        );
        assert_eq!(
            d.default_resources.entries,
            vec![
                ResourceEntry::Extension {
                    href: "features/nested.jnlp".to_string()
                },
                ResourceEntry::Jar {
                    href: "plugins/core.jar".to_string()
                },
            ]
        );
        assert_eq!(d.extension_count(), 1);
    }
}
