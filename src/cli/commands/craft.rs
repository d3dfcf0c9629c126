//! Implementation of the `crafter craft` command.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::cli::context::build_engine;
use crate::cli::display::{create_spinner, ProgressBarExt};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, CraftMode, CraftOptions, CraftReport, Element};

#[derive(Args, Debug)]
pub struct CraftArgs {
    /// Mode code or name: 0 exhaustive-base, 1 random-with-base,
    /// 2 random-with-random, 3 specific-with-random, 4 specific-pair
    #[arg(long, short)]
    pub mode: String,

    /// Sample size for the random modes (defaults to engine.default_count)
    #[arg(long, short)]
    pub count: Option<usize>,

    /// Named element for the specific modes
    #[arg(long)]
    pub first: Option<String>,

    /// Second named element for specific-pair
    #[arg(long)]
    pub second: Option<String>,

    /// Stop exhaustive mode after this many rounds
    #[arg(long)]
    pub max_rounds: Option<usize>,

    /// Answer every pair locally with "Nothing" instead of calling the service
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct RoundSummary {
    pub round: usize,
    pub pairs: usize,
    pub failed: usize,
    pub discovered: usize,
}

#[derive(Debug, Serialize)]
pub struct CraftOutput {
    pub mode: String,
    pub dry_run: bool,
    pub rounds: Vec<RoundSummary>,
    pub discovered: Vec<Element>,
    pub pairs_dispatched: usize,
    pub failed: usize,
    pub total_known: usize,
    pub truncated: bool,
}

impl CraftOutput {
    fn from_report(report: &CraftReport, dry_run: bool) -> Self {
        Self {
            mode: report.mode.to_string(),
            dry_run,
            rounds: report
                .rounds
                .iter()
                .map(|r| RoundSummary {
                    round: r.round,
                    pairs: r.pairs_dispatched,
                    failed: r.failed,
                    discovered: r.discovered.len(),
                })
                .collect(),
            discovered: report.discovered().cloned().collect(),
            pairs_dispatched: report.pairs_dispatched(),
            failed: report.failed(),
            total_known: report.total_known,
            truncated: report.truncated,
        }
    }
}

impl CommandOutput for CraftOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        for round in &self.rounds {
            lines.push(format!(
                "round {}: {} pair(s), {} failed, {} new",
                round.round, round.pairs, round.failed, round.discovered
            ));
        }
        if self.discovered.is_empty() {
            lines.push("No new elements.".to_string());
        } else {
            lines.push(format!("{} new element(s):", style(self.discovered.len()).bold()));
            for element in &self.discovered {
                let marker = if element.is_new() {
                    format!(" {}", style("(first discovery)").yellow())
                } else {
                    String::new()
                };
                lines.push(format!("  {element}{marker}"));
            }
        }
        lines.push(format!("Known elements: {}", self.total_known));
        if self.truncated {
            lines.push("Stopped at the round limit; more may be discoverable.".to_string());
        }
        if self.dry_run {
            lines.push(style("Dry run: no requests were sent.").dim().to_string());
        }
        lines.join("\n")
    }
}

/// Run one crafting invocation and report what it found.
pub async fn execute(args: CraftArgs, config: &Config, json_mode: bool) -> Result<()> {
    // Reject a bad mode before touching the store or the network.
    let mode: CraftMode = args.mode.parse()?;

    let options = CraftOptions {
        count: args.count.unwrap_or(config.engine.default_count),
        first: args.first,
        second: args.second,
        max_rounds: args.max_rounds,
    };

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, cancelling round");
                cancel.cancel();
            }
        })
    };

    let mut engine = build_engine(config, args.dry_run, cancel).await?;

    let spinner = create_spinner(format!("crafting ({mode})"), json_mode);
    let result = engine.run(mode, &options).await;
    ctrl_c.abort();

    let report = match result {
        Ok(report) => {
            spinner.finish_success(format!("{} new", report.discovered_count()));
            report
        }
        Err(err) => {
            spinner.finish_error("crafting failed");
            return Err(err).context(format!("Crafting with mode {mode} failed"));
        }
    };

    output(&CraftOutput::from_report(&report, args.dry_run), json_mode);
    Ok(())
}
