use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "feature-jnlp")]
#[command(about = "Generate Java Web Start descriptors from Eclipse feature archives")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Tracing filter, e.g. `feature_jnlp=debug` (falls back to RUST_LOG)
    #[arg(long, value_name = "FILTER", global = true)]
    pub log_filter: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Write a .jnlp beside the feature archive and each included feature
    Generate(GenerateArgs),
    /// Print the parsed feature.xml of an archive as JSON
    Inspect {
        #[arg(value_name = "FEATURE_JAR")]
        feature_jar: PathBuf,
    },
    /// Delete all but the highest version of a bundle in a plugins directory
    Dedupe {
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        #[arg(value_name = "BSN")]
        bsn: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    #[arg(value_name = "FEATURE_JAR")]
    pub feature_jar: PathBuf,

    #[arg(long)]
    pub vendor: String,

    #[arg(long)]
    pub title: String,

    /// Codebase URL (falls back to FEATURE_JNLP_CODEBASE)
    #[arg(long, value_name = "URL")]
    pub codebase: Option<String>,

    #[arg(long, value_name = "VERSIONS", default_value = "1.6+")]
    pub java_version: String,

    #[arg(long)]
    pub standalone: bool,

    /// Reference plugins as `plugins/<id>.jar` and rename the jars on disk
    #[arg(long)]
    pub strip_versions: bool,

    /// Delete processed feature archives once all descriptors are written
    #[arg(long)]
    pub delete_features: bool,

    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Update-site root holding `plugins/` (default: <base-dir>/target/site)
    #[arg(long, value_name = "DIR")]
    pub site_dir: Option<PathBuf>,

    #[arg(long, default_value = "eclipse-feature")]
    pub packaging: String,

    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
