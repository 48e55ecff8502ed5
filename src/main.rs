use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use laptop_cleaner::config::Config;
use laptop_cleaner::constants::DEFAULT_CONFIG_FILE;
use laptop_cleaner::pipeline::processing::rules::RuleSet;
use laptop_cleaner::{logging, metrics, storage, Pipeline};

#[derive(Parser)]
#[command(name = "laptop_cleaner")]
#[command(about = "Cleans and classifies laptop listing exports")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a listing export
    Clean {
        /// Run configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Input CSV (overrides the config file)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output CSV (overrides the config file)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Rule file replacing the built-in tables
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Write the coverage report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
        /// Write a Prometheus snapshot of the run's metrics
        #[arg(long)]
        metrics_out: Option<PathBuf>,
    },
    /// Validate a rule file and print its table sizes
    Rules {
        /// Rule file to check; the built-in tables when omitted
        path: Option<PathBuf>,
    },
}

fn load_rules(path: Option<&Path>) -> anyhow::Result<RuleSet> {
    match path {
        Some(path) => RuleSet::load(path).with_context(|| format!("Invalid rule file '{}'", path.display())),
        None => RuleSet::builtin().context("Built-in rule tables failed to compile"),
    }
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clean {
            config,
            input,
            output,
            rules,
            report,
            metrics_out,
        } => {
            let config = Config::load(&config)
                .with_context(|| format!("Failed to load config '{}'", config.display()))?;
            let _guard = logging::init_logging(&config.logging.directory);

            if metrics_out.is_some() {
                metrics::init_metrics();
            }

            let input = input.unwrap_or(config.io.input);
            let output = output.unwrap_or(config.io.output);
            let report = report.or(config.io.report);
            let rules_path = rules.or(config.rules.path);

            println!("🧹 Cleaning {}...", input.display());
            let pipeline = Pipeline::new(load_rules(rules_path.as_deref())?);
            let result = pipeline
                .run_file(&input, &output)
                .with_context(|| format!("Failed to clean '{}'", input.display()))?;

            println!("\n📊 Cleaning Results:");
            for stage in &result.coverage.stages {
                println!("   {:<24} {}", stage.stage, stage.rows);
            }
            println!("   Output file: {}", output.display());

            let unmatched: Vec<_> = result
                .coverage
                .unmatched
                .iter()
                .filter(|(_, count)| **count > 0)
                .collect();
            if !unmatched.is_empty() {
                println!("\n⚠️  Unclassified cells:");
                for (column, count) in unmatched {
                    println!("   - {}: {}", column, count);
                }
            }

            if let Some(report) = report {
                storage::write_json(&report, &result.coverage)
                    .with_context(|| format!("Failed to write report '{}'", report.display()))?;
                println!("   Report file: {}", report.display());
            }

            if let Some(metrics_out) = metrics_out {
                match metrics::render() {
                    Some(snapshot) => {
                        fs::write(&metrics_out, snapshot)
                            .with_context(|| format!("Failed to write metrics '{}'", metrics_out.display()))?;
                        info!(path = %metrics_out.display(), "Wrote metrics snapshot");
                    }
                    None => warn!("No metrics recorder installed; skipping metrics snapshot"),
                }
            }

            println!("✅ Cleaned {} rows", result.rows.len());
        }
        Commands::Rules { path } => {
            let rules = load_rules(path.as_deref())?;
            println!("✅ Rule tables compiled");
            println!("   color:    {} rules", rules.color.len());
            println!("   os:       {} rules", rules.os.len());
            println!("   feature:  {} rules", rules.feature.len());
            println!(
                "   gpu:      {} rewrites, {} patterns",
                rules.gpu.rewrite.len(),
                rules.gpu.extractor.len()
            );
            println!(
                "   cpu:      {} rewrites, {} patterns",
                rules.cpu.rewrite.len(),
                rules.cpu.extractor.len()
            );
            println!(
                "   brand:    {} aliases, {} keywords",
                rules.brand.aliases.len(),
                rules.brand.keywords.len()
            );
        }
    }
    Ok(())
}
