use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use gin_bench::config::{ResolvedOutputs, SoakConfig};
use gin_bench::logging::init_logging;
use gin_bench::soak::SoakRunner;

/// Seeded soak harness for the gin rummy card counter.
#[derive(Debug, Parser)]
#[command(
    name = "gin-bench",
    author,
    version,
    about = "Replays random gin rummy deals and checks every counter event"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/soak.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of deals to play.
    #[arg(long, value_name = "DEALS")]
    deals: Option<usize>,

    /// Override the RNG seed for deal generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration.
    #[arg(long)]
    validate_only: bool,

    /// Log every counter event at INFO regardless of config.
    #[arg(long)]
    log_counter_details: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SoakConfig::from_path(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }
    if let Some(deals) = cli.deals {
        config.deals.count = deals;
    }
    if let Some(seed) = cli.seed {
        config.deals.seed = Some(seed);
    }
    if cli.log_counter_details {
        config.logging.counter_details = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let deals = config.deals.count;
    println!(
        "Loaded configuration '{run_id}' ({deals} deal{}, take face-up {}%)",
        if deals == 1 { "" } else { "s" },
        config.play.take_face_up_percent
    );

    if cli.validate_only {
        println!("Validation-only mode: soak run skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let summary = SoakRunner::new(config, outputs).run()?;

    println!(
        "Soak complete for '{run_id}': {} deals, {} events checked ({} gin, {} wall, {} turn cap) -> {}",
        summary.deals_played,
        summary.events_checked,
        summary.gins,
        summary.walls,
        summary.turn_caps,
        summary.jsonl_path.display()
    );
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    if summary.violations > 0 {
        anyhow::bail!(
            "{} counter violation(s) detected; see the telemetry log",
            summary.violations
        );
    }
    Ok(())
}
