use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};

use chart_sync::cli::{run_sync, SyncArgs};
use chart_sync::config::{self, AppVersionPolicy, Config};
use chart_sync::normalize::{normalize_file, NormalizeOutcome, NormalizeRules};
use chart_sync::notice::Notice;
use chart_sync::{ui, ChartSyncError};

#[derive(Parser)]
#[command(
    name = "chart-sync",
    version,
    about = "Normalize Helm chart versions and sync Artifact Hub changes from the changelog"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
    verbose: u8,

    #[arg(short, long, global = true, help = "Suppress log output")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Strip the marker from `version` and apply the appVersion policy in Chart.yaml
    Normalize {
        #[arg(help = "Path to Chart.yaml")]
        chart: PathBuf,

        #[arg(long, value_enum, help = "Marker handling for appVersion (overrides config)")]
        app_version: Option<AppVersionPolicy>,

        #[arg(long, help = "Version marker letter (overrides config)")]
        marker: Option<char>,

        #[arg(long, help = "Report what would change without writing")]
        dry_run: bool,
    },

    /// Update artifacthub-pkg.yml with the changes recorded in the changelog
    SyncChanges {
        #[arg(help = "Chart directory or Chart.yaml")]
        chart: PathBuf,

        #[arg(help = "Release version (defaults to NEXT_RELEASE_VERSION env)")]
        version: Option<String>,

        #[arg(help = "Path to CHANGELOG.md (default: chart dir, then repository root)")]
        changelog: Option<PathBuf>,

        #[arg(long, help = "Print the updated document without writing it")]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    ui::init_logging(args.verbose, args.quiet);

    if let Err(err) = run(args) {
        ui::display_error(&format!("{:#}", err));
        let code = err
            .downcast_ref::<ChartSyncError>()
            .map(ChartSyncError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }

    Ok(())
}

fn run(args: Args) -> Result<()> {
    let mut config = config::load_config(args.config.as_deref())
        .context("Error loading config")?;

    match args.command {
        Command::Normalize {
            chart,
            app_version,
            marker,
            dry_run,
        } => {
            if let Some(policy) = app_version {
                config.normalize.app_version = policy;
            }
            if let Some(marker) = marker {
                config.normalize.marker = marker;
            }
            config.validate()?;
            normalize_chart(&chart, &config, dry_run)
        }
        Command::SyncChanges {
            chart,
            version,
            changelog,
            dry_run,
        } => {
            let sync_args = SyncArgs {
                chart_path: chart,
                version,
                changelog_path: changelog,
                dry_run,
            };
            sync_changes(&sync_args, &config)
        }
    }
}

fn normalize_chart(chart: &Path, config: &Config, dry_run: bool) -> Result<()> {
    let rules = NormalizeRules::from(&config.normalize);
    let path = chart.canonicalize().unwrap_or_else(|_| chart.to_path_buf());

    match normalize_file(&path, &rules, dry_run)? {
        NormalizeOutcome::Normalized => {
            ui::display_success(&format!("Normalized version/appVersion in {}", path.display()));
            if dry_run {
                ui::display_notice(&Notice::DryRun { path });
            }
        }
        NormalizeOutcome::Unchanged => {
            ui::display_notice(&Notice::NoChangeNeeded { path });
        }
    }
    Ok(())
}

fn sync_changes(args: &SyncArgs, config: &Config) -> Result<()> {
    let report = run_sync(args, config, chrono::Utc::now())?;

    if report.changes.is_empty() {
        ui::display_notice(&Notice::NoChangesForVersion {
            version: report.version.clone(),
            changelog: report.changelog_path.clone(),
        });
    } else {
        ui::display_changes(&report.version, &report.changes);
    }

    if report.written {
        ui::display_success(&format!(
            "Updated {} with version {} and {} change(s).",
            report.metadata_path.display(),
            report.version,
            report.changes.len()
        ));
    } else {
        print!("{}", report.document);
        ui::display_notice(&Notice::DryRun {
            path: report.metadata_path,
        });
    }
    Ok(())
}
