//! OSGi bundle versions and jar manifest attributes.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const BUNDLE_VERSION_ATTRIBUTE: &str = "Bundle-Version";

/// `major[.minor[.micro[.qualifier]]]`, ordered numerically on the first three
/// components and lexicographically on the qualifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BundleVersion {
    pub major: u64,
    pub minor: u64,
    pub micro: u64,
    pub qualifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid bundle version {input:?}: {reason}")]
pub struct ParseVersionError {
    pub input: String,
    pub reason: &'static str,
}

impl BundleVersion {
    pub fn new(major: u64, minor: u64, micro: u64) -> Self {
        Self {
            major,
            minor,
            micro,
            qualifier: String::new(),
        }
    }
}

impl FromStr for BundleVersion {
    type Err = ParseVersionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let input = raw.trim();
        let err = |reason| ParseVersionError {
            input: raw.to_string(),
            reason,
        };

        if input.is_empty() {
            return Ok(Self::default());
        }

        let mut parts = input.splitn(4, '.');
        let mut numeric = [0u64; 3];
        for slot in numeric.iter_mut() {
            match parts.next() {
                Some(part) => {
                    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                        return Err(err("numeric component expected"));
                    }
                    *slot = part.parse().map_err(|_| err("numeric component out of range"))?;
                }
                None => break,
            }
        }

        let qualifier = parts.next().unwrap_or_default();
        if !qualifier
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            return Err(err("qualifier may only contain letters, digits, '_' and '-'"));
        }
        if input.ends_with('.') {
            return Err(err("trailing separator"));
        }

        let [major, minor, micro] = numeric;
        Ok(Self {
            major,
            minor,
            micro,
            qualifier: qualifier.to_string(),
        })
    }
}

impl fmt::Display for BundleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if !self.qualifier.is_empty() {
            write!(f, ".{}", self.qualifier)?;
        }
        Ok(())
    }
}

/// Looks up a main-section attribute in `META-INF/MANIFEST.MF` content.
///
/// Continuation lines (leading single space) are joined onto the previous
/// header; the main section ends at the first blank line.
pub fn manifest_attribute(content: &str, name: &str) -> Option<String> {
    let mut current: Option<String> = None;

    for line in content.replace("\r\n", "\n").split('\n') {
        if let Some(rest) = line.strip_prefix(' ') {
            if let Some(header) = current.as_mut() {
                header.push_str(rest);
            }
            continue;
        }

        if let Some(value) = current.take().and_then(|h| header_value(&h, name)) {
            return Some(value);
        }

        if line.is_empty() {
            return None;
        }
        current = Some(line.to_string());
    }

    current.and_then(|h| header_value(&h, name))
}

fn header_value(header: &str, name: &str) -> Option<String> {
    let (key, value) = header.split_once(':')?;
    key.trim()
        .eq_ignore_ascii_case(name)
        .then(|| value.trim().to_string())
}
