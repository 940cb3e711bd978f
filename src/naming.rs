//! Filename conventions of a Tycho update site.

pub const PLUGINS_DIR: &str = "plugins";
pub const FEATURES_DIR: &str = "features";
pub const DESCRIPTOR_EXTENSION: &str = "jnlp";

/// Removes the `_<version>` segment from `filename`.
///
/// The segment runs from the first underscore up to the final extension, so
/// `org.junit_4.10.0.v4_10_0.jar` becomes `org.junit.jar`. Names without an
/// underscore are returned unchanged.
pub fn remove_version(filename: &str) -> String {
    let Some(underscore) = filename.find('_') else {
        return filename.to_string();
    };

    match filename.rfind('.') {
        Some(ext) if ext > underscore => format!("{}{}", &filename[..underscore], &filename[ext..]),
        _ => filename[..underscore].to_string(),
    }
}

/// Site-relative href of a plugin jar.
pub fn plugin_path(strip_version: bool, id: &str, version: &str) -> String {
    if strip_version {
        format!("{PLUGINS_DIR}/{id}.jar")
    } else {
        format!("{PLUGINS_DIR}/{id}_{version}.jar")
    }
}

/// Filename of the archive a feature `<includes>` entry refers to.
pub fn feature_archive_name(id: &str, version: &str) -> String {
    format!("{id}_{version}.jar")
}

pub fn descriptor_file_name(feature_filename: &str, strip_version: bool) -> String {
    let name = if strip_version {
        remove_version(feature_filename)
    } else {
        feature_filename.to_string()
    };

    match name.rfind('.') {
        Some(ext) => format!("{}.{DESCRIPTOR_EXTENSION}", &name[..ext]),
        None => format!("{name}.{DESCRIPTOR_EXTENSION}"),
    }
}

pub fn extension_href(descriptor_file_name: &str) -> String {
    format!("{FEATURES_DIR}/{descriptor_file_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASES: &[(&str, &str, &str)] = &[
        ("javax.wsdl_1.6.2.v201012040545.jar", "javax.wsdl.jar", "javax.wsdl.jnlp"),
        (
            "org.eclipse.core.databinding.property_1.4.100.v20120523-1955.jar",
            "org.eclipse.core.databinding.property.jar",
            "org.eclipse.core.databinding.property.jnlp",
        ),
        ("org.junit_4.10.0.v4_10_0_v20120426-0900.jar", "org.junit.jar", "org.junit.jnlp"),
    ];

    #[test]
    fn remove_version_strips_qualified_versions() {
        for (given, expected, _) in CASES {
            assert_eq!(remove_version(given), *expected, "input: {given}");
        }
    }

    #[test]
    fn remove_version_keeps_names_without_underscore() {
        assert_eq!(remove_version("plain.jar"), "plain.jar");
        assert_eq!(remove_version(""), "");
    }

    #[test]
    fn remove_version_without_extension_drops_tail() {
        assert_eq!(remove_version("foo_bar"), "foo");
        assert_eq!(remove_version("a.b_c"), "a.b");
    }

    #[test]
    fn plugin_path_honours_strip_flag() {
        assert_eq!(plugin_path(false, "abc", "1.0.0"), "plugins/abc_1.0.0.jar");
        assert_eq!(plugin_path(true, "abc", "1.0.0"), "plugins/abc.jar");
    }

    #[test]
    fn descriptor_file_name_strips_when_requested() {
        for (given, _, expected) in CASES {
            assert_eq!(descriptor_file_name(given, true), *expected);
        }
        assert_eq!(descriptor_file_name("foo_1.0.0.jar", true), "foo.jnlp");
        assert_eq!(descriptor_file_name("foo_1.0.0.jar", false), "foo_1.0.0.jnlp");
    }

    #[test]
    fn extension_href_points_into_features() {
        assert_eq!(extension_href("foo.jnlp"), "features/foo.jnlp");
        assert_eq!(feature_archive_name("foo", "1.0.0"), "foo_1.0.0.jar");
    }
}
