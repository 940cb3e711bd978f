use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

use crate::cli::GenerateArgs;

pub const ECLIPSE_FEATURE: &str = "eclipse-feature";
pub const DEFAULT_JAVA_VERSION: &str = "1.6+";
pub const TYCHO_SITE_DIR: &str = "target/site";
pub const CODEBASE_ENV: &str = "FEATURE_JNLP_CODEBASE";

/// Everything one generation run needs, resolved once up front.
#[derive(Debug, Clone)]
pub struct JnlpConfig {
    pub feature_jar: PathBuf,
    pub vendor: String,
    pub title: String,
    pub codebase: String,
    pub java_version: String,
    pub standalone: bool,
    pub strip_versions: bool,
    pub delete_features: bool,
    pub site_dir: PathBuf,
    pub packaging: String,
}

impl JnlpConfig {
    pub fn new(
        feature_jar: PathBuf,
        vendor: impl Into<String>,
        title: impl Into<String>,
        codebase: impl Into<String>,
    ) -> Self {
        Self {
            feature_jar,
            vendor: vendor.into(),
            title: title.into(),
            codebase: codebase.into(),
            java_version: DEFAULT_JAVA_VERSION.to_string(),
            standalone: false,
            strip_versions: false,
            delete_features: false,
            site_dir: default_site_dir(Path::new(".")),
            packaging: ECLIPSE_FEATURE.to_string(),
        }
    }

    pub fn from_args(args: &GenerateArgs) -> Result<Self> {
        let base_dir = resolve_base_dir(args.base_dir.as_deref())?;
        let site_dir = match args.site_dir.clone() {
            Some(p) => resolve_against(&base_dir, p),
            None => default_site_dir(&base_dir),
        };

        Ok(Self {
            feature_jar: resolve_against(&base_dir, args.feature_jar.clone()),
            vendor: args.vendor.clone(),
            title: args.title.clone(),
            codebase: resolve_codebase(args.codebase.as_deref())?,
            java_version: args.java_version.clone(),
            standalone: args.standalone,
            strip_versions: args.strip_versions,
            delete_features: args.delete_features,
            site_dir,
            packaging: args.packaging.clone(),
        })
    }

    pub fn is_feature_packaging(&self) -> bool {
        self.packaging.eq_ignore_ascii_case(ECLIPSE_FEATURE)
    }
}

pub fn default_site_dir(base_dir: &Path) -> PathBuf {
    base_dir.join(TYCHO_SITE_DIR)
}

fn resolve_base_dir(cli_value: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = cli_value {
        return Ok(p.to_path_buf());
    }
    env::current_dir().context("Failed to resolve current directory")
}

fn resolve_codebase(cli_value: Option<&str>) -> Result<String> {
    if let Some(c) = cli_value {
        return Ok(c.to_string());
    }

    env::var(CODEBASE_ENV)
        .with_context(|| format!("No codebase given: pass --codebase or set {CODEBASE_ENV}"))
}

fn resolve_against(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() { path } else { base.join(path) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn args() -> GenerateArgs {
        GenerateArgs {
            feature_jar: PathBuf::from("target/site/features/f_1.0.0.jar"),
            vendor: "ACME".to_string(),
            title: "Demo".to_string(),
            codebase: Some("http://example.org".to_string()),
            java_version: DEFAULT_JAVA_VERSION.to_string(),
            standalone: false,
            strip_versions: true,
            delete_features: false,
            base_dir: Some(PathBuf::from("/work/product")),
            site_dir: None,
            packaging: "Eclipse-Feature".to_string(),
            format: OutputFormat::Json,
        }
    }

    #[test]
    fn relative_paths_resolve_against_base_dir() {
        let config = JnlpConfig::from_args(&args()).unwrap();
        assert_eq!(
            config.feature_jar,
            PathBuf::from("/work/product/target/site/features/f_1.0.0.jar")
        );
        assert_eq!(config.site_dir, PathBuf::from("/work/product/target/site"));
        assert!(config.strip_versions);
    }

    #[test]
    fn explicit_site_dir_wins() {
        let mut a = args();
        a.site_dir = Some(PathBuf::from("/srv/site"));
        let config = JnlpConfig::from_args(&a).unwrap();
        assert_eq!(config.site_dir, PathBuf::from("/srv/site"));
    }

    #[test]
    fn packaging_compare_ignores_case() {
        let mut config = JnlpConfig::new(PathBuf::from("f.jar"), "v", "t", "c");
        assert!(config.is_feature_packaging());
        config.packaging = "Eclipse-Feature".to_string();
        assert!(config.is_feature_packaging());
        config.packaging = "eclipse-plugin".to_string();
        assert!(!config.is_feature_packaging());
    }
}
