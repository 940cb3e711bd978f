//! Platform-specific resource groups.
//!
//! Every qualified plugin is filed under one `<resources>` group per
//! (arch, os, ws) tuple. JNLP clients report the x86 architectures under
//! several names, so those expand to one group per alias.

use std::collections::HashMap;

use crate::descriptor::ResourceGroup;
use crate::feature::PluginRef;

pub const ARCH_X86_64: &str = "x86_64";
pub const ARCH_X86: &str = "x86";

const X86_64_ALIASES: &[&str] = &[ARCH_X86_64, "amd64"];
const X86_ALIASES: &[&str] = &[ARCH_X86, "i386", "i686"];

/// Lookup key of a platform group. The OS is kept raw so that `win32` and
/// `windows` stay separate groups even though both display as `Windows`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlatformKey {
    pub arch: String,
    pub os: String,
    pub ws: String,
}

impl PlatformKey {
    pub fn new(arch: &str, os: &str, ws: &str) -> Self {
        Self {
            arch: arch.to_string(),
            os: os.to_string(),
            ws: ws.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Default,
    Platform(Vec<PlatformKey>),
}

pub fn arch_aliases(arch: &str) -> Vec<&str> {
    match arch {
        ARCH_X86_64 => X86_64_ALIASES.to_vec(),
        ARCH_X86 => X86_ALIASES.to_vec(),
        other => vec![other],
    }
}

/// Groups a plugin belongs to, in output order.
pub fn placement_for(plugin: &PluginRef) -> Placement {
    if plugin.is_unqualified() {
        return Placement::Default;
    }

    Placement::Platform(
        arch_aliases(&plugin.arch)
            .into_iter()
            .map(|arch| PlatformKey::new(arch, &plugin.os, &plugin.ws))
            .collect(),
    )
}

/// JNLP `os` attribute for an Eclipse os qualifier.
pub fn os_display_label(os: &str) -> &str {
    if os.contains("win") {
        "Windows"
    } else if os.contains("mac") {
        "Mac"
    } else if os.contains("linux") {
        "Linux"
    } else {
        os
    }
}

/// Platform groups of a single descriptor, created lazily on first lookup.
#[derive(Debug, Default)]
pub struct PlatformGroups {
    index: HashMap<PlatformKey, usize>,
    groups: Vec<ResourceGroup>,
}

impl PlatformGroups {
    pub fn group_for(&mut self, key: &PlatformKey) -> &mut ResourceGroup {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                let label = os_display_label(&key.os);
                self.groups.push(ResourceGroup {
                    os: (!label.is_empty()).then(|| label.to_string()),
                    arch: (!key.arch.is_empty()).then(|| key.arch.clone()),
                    entries: Vec::new(),
                });
                self.index.insert(key.clone(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx]
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_groups(self) -> Vec<ResourceGroup> {
        self.groups
    }
}
