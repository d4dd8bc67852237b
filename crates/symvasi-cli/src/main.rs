//! symvasi CLI entrypoint
//! Parses command-line arguments and dispatches to the core generator.

// Internal imports (std, crate)
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use symvasi_core::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "symvasi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Root directory holding one sub-directory per target
    #[arg(long, global = true)]
    targets_dir: Option<PathBuf>,

    /// Base directory for template patterns and outputs (default: the manifest's directory)
    #[arg(long, global = true)]
    working_dir: Option<PathBuf>,

    /// Maximum number of concurrent units of work
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run every build of a manifest and write the generated files
    Build {
        /// Path to the build manifest (YAML)
        manifest: PathBuf,
    },
    /// Load every build of a manifest without writing anything
    Check {
        /// Path to the build manifest (YAML)
        manifest: PathBuf,
    },
}

impl Cli {
    async fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .await
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::new(),
        };

        if let Some(dir) = &self.targets_dir {
            config.targets_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.working_dir {
            config.working_dir = Some(dir.clone());
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = cli.config().await?;
    tracing::debug!(?config, "Resolved configuration");

    match &cli.command {
        Commands::Build { manifest } => {
            let reports = symvasi_core::generate(&config, manifest)
                .await
                .with_context(|| format!("Build of {} failed", manifest.display()))?;

            for report in &reports {
                println!(
                    "✅ {} files for [{}] in: {}",
                    report.files.len(),
                    report.targets.join(", "),
                    report.output.display()
                );
            }
        }
        Commands::Check { manifest } => {
            let builds = symvasi_core::check(&config, manifest)
                .await
                .with_context(|| format!("Check of {} failed", manifest.display()))?;

            for build in &builds {
                let targets: Vec<&str> = build.targets.iter().map(|t| t.name()).collect();
                println!(
                    "✅ {} definitions, {} augmentations for [{}] -> {}",
                    build.definitions.len(),
                    build.augmentations,
                    targets.join(", "),
                    build.output.display()
                );
            }
        }
    }
    Ok(())
}
