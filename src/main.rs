mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use vidprep::processor::{FileProcessor, FileStatus, RunSummary};
use vidprep::{config, scanner, signal};
use vidprep_av::{SystemRunner, ToolRegistry};

fn main() -> Result<()> {
    let cli = Cli::parse_from(cli::normalize_args(std::env::args_os()));

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use the --log-level flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        let level = cli.log_level.filter();
        format!("vidprep={level},vidprep_av={level},vidprep_common={level}")
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = config::load_config_or_default(cli.config.as_deref())?;
    cli.apply(&mut config);
    config::validate_config(&config)?;

    let tools = ToolRegistry::discover(&config.tools);
    if cli.check_tools {
        return check_tools(&tools);
    }

    let discovery = scanner::discover(cli.directory.as_deref(), &cli.files)?;
    let processor = FileProcessor::new(config, tools, Arc::new(SystemRunner), cli.options())?;

    let stop = signal::install_stop_handler().unwrap_or_else(|e| {
        tracing::warn!("Failed to install stop handler: {}", e);
        Arc::new(AtomicBool::new(false))
    });

    if cli.dry_run {
        tracing::info!("[DRY RUN] Nothing will be changed");
    }

    let summary = processor.with_stop_signal(stop).run(discovery);
    report_summary(&summary);

    Ok(())
}

fn report_summary(summary: &RunSummary) {
    for report in &summary.reports {
        match report.status() {
            FileStatus::Succeeded => {}
            FileStatus::Skipped => tracing::warn!("Skipped: {}", report.path.display()),
            FileStatus::Failed => tracing::error!("Failed: {}", report.path.display()),
        }
    }

    tracing::info!(
        "Processed {} files: {} succeeded, {} skipped, {} failed",
        summary.reports.len(),
        summary.succeeded(),
        summary.skipped(),
        summary.failed()
    );

    if summary.cancelled {
        tracing::warn!("Stopped before all files were processed");
    }
}

fn check_tools(tools: &ToolRegistry) -> Result<()> {
    println!("Checking external tools...\n");

    let mut all_ok = true;

    for tool in tools.check_all() {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All tools are available!");
    } else {
        println!("Some tools are missing. Install them to enable all features.");
    }

    Ok(())
}
