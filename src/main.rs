use anyhow::{Context, Result};
use clap::Parser;
use feature_jnlp::archive::read_feature_manifest;
use feature_jnlp::cli::{Cli, Commands, OutputFormat};
use feature_jnlp::config::JnlpConfig;
use feature_jnlp::dedup::keep_highest_version;
use feature_jnlp::generate::{GenerateReport, generate};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "feature_jnlp=info";

fn main() -> Result<()> {
    let cli = parse_cli();
    init_tracing(cli.log_filter.as_deref());

    match cli.command {
        Commands::Generate(args) => {
            let config = JnlpConfig::from_args(&args)?;
            let report = generate(&config)?;
            print_report(&report, args.format)?;
        }
        Commands::Inspect { feature_jar } => {
            let manifest = read_feature_manifest(&feature_jar).with_context(|| {
                format!("Failed to read feature archive: {}", feature_jar.display())
            })?;
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
        Commands::Dedupe { dir, bsn } => {
            let result = keep_highest_version(&dir, &bsn)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays parseable.
fn init_tracing(cli_filter: Option<&str>) {
    let filter = cli_filter
        .map(str::to_string)
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn parse_cli() -> Cli {
    let args: Vec<String> = std::env::args().collect();
    Cli::parse_from(rewrite_args_for_implicit_generate(args))
}

fn rewrite_args_for_implicit_generate(mut args: Vec<String>) -> Vec<String> {
    if args.len() <= 1 {
        return args;
    }

    let subcommands = ["generate", "inspect", "dedupe", "help"];

    let mut idx = 1usize;
    while idx < args.len() {
        let a = args[idx].as_str();
        if a == "--" {
            idx += 1;
            break;
        }

        if a == "--log-filter" {
            idx += 2;
            continue;
        }

        if a.starts_with('-') {
            if a == "-h" || a == "--help" || a == "-V" || a == "--version" {
                return args;
            }
            idx += 1;
            continue;
        }

        break;
    }

    if idx < args.len() {
        let token = args[idx].as_str();
        if !subcommands.contains(&token) {
            args.insert(idx, "generate".to_string());
        }
    }

    args
}

fn print_report(report: &GenerateReport, format: OutputFormat) -> Result<()> {
    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(&format!("feature_archive: {}\n", report.feature_archive));
            if report.skipped {
                out.push_str("skipped: packaging is not eclipse-feature\n");
            }
            out.push_str(&format!("duration_ms: {}\n", report.duration_ms));
            for d in &report.descriptors {
                out.push_str(&format!(
                    "- descriptor: {}, jars: {}, extensions: {}, platform_groups: {}\n",
                    d.descriptor_path, d.jars, d.extensions, d.platform_groups
                ));
            }
            for include in &report.unresolved_includes {
                out.push_str(&format!("- unresolved include: {include}\n"));
            }
            out.push_str(&format!("renamed_plugins: {}\n", report.renamed_plugins));
            for archive in &report.deleted_archives {
                out.push_str(&format!("- deleted: {archive}\n"));
            }
            out
        }
    };

    print!("{content}");
    if !content.ends_with('\n') {
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrite_inserts_generate_after_global_options() {
        let rewritten = rewrite_args_for_implicit_generate(strings(&[
            "feature-jnlp",
            "--log-filter",
            "feature_jnlp=debug",
            "target/site/features/f_1.0.0.jar",
            "--vendor",
            "ACME",
        ]));
        assert_eq!(rewritten[1], "--log-filter");
        assert_eq!(rewritten[2], "feature_jnlp=debug");
        assert_eq!(rewritten[3], "generate");
        assert_eq!(rewritten[4], "target/site/features/f_1.0.0.jar");
    }

    #[test]
    fn rewrite_keeps_explicit_subcommands() {
        let args = strings(&["feature-jnlp", "inspect", "f.jar"]);
        assert_eq!(rewrite_args_for_implicit_generate(args.clone()), args);

        let help = strings(&["feature-jnlp", "--help"]);
        assert_eq!(rewrite_args_for_implicit_generate(help.clone()), help);
    }
}
