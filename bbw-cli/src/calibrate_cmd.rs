//! Calibrate command - league rates over a batch of games

use anyhow::{bail, Context, Result};
use clap::Args;

use bbw_batch::{run_calibration, CalibrationConfig, CalibrationReport};

use crate::teams::{load_teams, RuleArgs, TeamArgs};

#[derive(Args, Debug)]
pub struct CalibrateArgs {
    #[command(flatten)]
    pub teams: TeamArgs,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Games to simulate
    #[arg(long, default_value = "500")]
    pub games: usize,

    /// Exit with an error if any rate is out of range
    #[arg(long)]
    pub strict: bool,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: CalibrateArgs, seed: Option<u64>) -> Result<()> {
    let (home, away) = load_teams(&args.teams)?;
    let config = CalibrationConfig {
        games: args.games,
        base_seed: seed.unwrap_or(42),
        options: args.rules.options(),
        parallel: true,
    };

    let report = run_calibration(&home, &away, &config).context("Calibration batch failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }

    if args.strict && !report.all_in_range() {
        let names: Vec<&str> = report.out_of_range().map(|c| c.metric).collect();
        bail!("out of range: {}", names.join(", "));
    }
    Ok(())
}

fn format_report(report: &CalibrationReport) -> String {
    let mut out = format!("\n=== Calibration ({} games) ===\n", report.games);
    for c in &report.checks {
        out.push_str(&format!(
            "{:<14}{:>8.3}   [{:.3}, {:.3}]  {}\n",
            c.metric,
            c.value,
            c.low,
            c.high,
            if c.in_range { "ok" } else { "OUT" }
        ));
    }
    out
}
