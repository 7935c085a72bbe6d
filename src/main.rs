use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use jx402::api::{RemitApi, RemitClient, RemitRequest};
use jx402::app::App;
use jx402::config::Config;
use jx402::flow::{format_amount, Currency, SequencerEvent, SimulationParams, StepSequencer};
use jx402::logging;
use jx402::ui::terminal_guard::install_panic_hook;

#[derive(Parser)]
#[command(name = "jx402")]
#[command(about = "Cross-border payments dashboard and remittance simulator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one simulated remittance and print each step
    Simulate {
        /// Amount in USD (non-numeric input counts as 0)
        #[arg(short, long)]
        amount: Option<String>,

        /// Destination currency (NGN, GHS, BRL, KES)
        #[arg(short, long, default_value = "NGN")]
        to: String,
    },

    /// Write a default config to .jx402/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    // No subcommand means the dashboard takes over the terminal
    let is_tui_mode = cli.command.is_none();

    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::Simulate { amount, to }) => {
            cmd_simulate(&config, amount, &to).await?;
        }
        Some(Commands::Init { force }) => {
            cmd_init(&config, force)?;
        }
        None => {
            run_tui(config, logging_handle.log_file_path).await?;
        }
    }

    Ok(())
}

async fn run_tui(config: Config, log_file_path: Option<PathBuf>) -> Result<()> {
    install_panic_hook();

    let mut app = App::new(config)?;
    let result = app.run().await;

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

async fn cmd_simulate(config: &Config, amount: Option<String>, to: &str) -> Result<()> {
    let currency: Currency = to.parse()?;
    let amount = amount.unwrap_or_else(|| config.ui.default_amount.clone());
    let params = SimulationParams::from_input(&amount, currency);

    println!(
        "Simulating ${} USD → {} ({})",
        format_amount(params.amount),
        currency,
        currency.corridor()
    );
    println!();

    let mut sequencer = StepSequencer::new(config.simulation.rates);
    let mut handle = sequencer.run(params);
    let steps = sequencer.snapshot().steps;
    let width = label_width(steps.iter().map(|s| s.label.as_str()));

    let mut summary = None;
    while let Some(event) = handle.events.recv().await {
        match event {
            SequencerEvent::StepCompleted { index, elapsed, .. } => {
                let label = steps.get(index).map(|s| s.label.as_str()).unwrap_or("?");
                println!("{}", step_line(label, width, elapsed.as_secs_f64()));
            }
            SequencerEvent::Completed(done) => {
                summary = Some(done);
                break;
            }
        }
    }

    let Some(summary) = summary else {
        bail!("Simulation ended before completing");
    };

    println!();
    println!("{}", summary.headline());
    println!(
        "  Rate: 1 USD = {} {}   Fee: ${:.2}",
        format_amount(summary.rate),
        summary.currency,
        summary.fee_usd
    );

    if config.api.remit_on_complete {
        match RemitClient::from_config(&config.api)? {
            Some(client) => {
                let request = RemitRequest::from_summary(&summary);
                let api: Arc<dyn RemitApi> = Arc::new(client);
                match api.remit(&request).await {
                    Ok(body) => println!("  Remit accepted: {}", body),
                    Err(e) => eprintln!("  Remit failed: {}", e),
                }
            }
            None => eprintln!("  Remit skipped: no API key configured"),
        }
    }

    Ok(())
}

/// Column width that fits the longest step label
fn label_width<'a>(labels: impl IntoIterator<Item = &'a str>) -> usize {
    labels.into_iter().map(|l| l.chars().count()).max().unwrap_or(0)
}

fn step_line(label: &str, width: usize, elapsed_secs: f64) -> String {
    format!("  ✓ {:<width$} {:>6.1}s", label, elapsed_secs, width = width)
}

fn cmd_init(config: &Config, force: bool) -> Result<()> {
    let path = Config::local_config_path();
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    // Never write the key to disk; it belongs in JX402__API__API_KEY
    let mut to_save = config.clone();
    to_save.api.api_key = None;
    to_save.save_to(&path)?;

    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jx402::flow::journey_steps;

    #[test]
    fn test_step_lines_align_for_long_labels() {
        let steps = journey_steps(Currency::Ngn);
        let width = label_width(steps.iter().map(|s| s.label.as_str()));
        assert!(width >= "Fiat Input (Circle ACH)".chars().count());

        let lines: Vec<String> = steps
            .iter()
            .map(|s| step_line(&s.label, width, 8.3))
            .collect();
        let ends: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(ends.windows(2).all(|w| w[0] == w[1]), "{:#?}", lines);
    }
}
