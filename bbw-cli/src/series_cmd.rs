//! Series command - several games between the same two teams

use anyhow::{Context, Result};
use clap::Args;

use bbw_batch::{play_series, play_series_parallel, SeriesResult};
use bbw_core::TeamSide;

use crate::teams::{load_teams, RuleArgs, TeamArgs};

#[derive(Args, Debug)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub teams: TeamArgs,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Number of games
    #[arg(long, default_value = "7")]
    pub games: usize,

    /// Play games on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: SeriesArgs, seed: Option<u64>) -> Result<()> {
    let (home, away) = load_teams(&args.teams)?;
    let seed = seed.unwrap_or(42);

    tracing::info!(
        "Starting series: {} at {} ({} games, seed {})",
        away.team_id,
        home.team_id,
        args.games,
        seed
    );

    let series = if args.parallel {
        play_series_parallel(&home, &away, args.games, seed, args.rules.options())
    } else {
        play_series(&home, &away, args.games, seed, args.rules.options())
    }
    .context("Series could not be played")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&series)?);
    } else {
        print!("{}", format_series(&series));
    }
    Ok(())
}

fn format_series(series: &SeriesResult) -> String {
    let mut out = String::from("\n=== Series Results ===\n");
    for g in &series.games {
        out.push_str(&format!(
            "Game {:>3}: {} {:>2} - {} {:>2}{}  ({} vs {})\n",
            g.game_number + 1,
            series.away_team_id,
            g.away_score,
            series.home_team_id,
            g.home_score,
            if g.innings > 9 { format!(" F/{}", g.innings) } else { String::new() },
            g.away_starter,
            g.home_starter
        ));
    }
    out.push_str(&format!(
        "\n{} {} wins ({:.1}%)\n{} {} wins ({:.1}%)\n",
        series.away_team_id,
        series.away_wins,
        series.win_rate(TeamSide::Away) * 100.0,
        series.home_team_id,
        series.home_wins,
        series.win_rate(TeamSide::Home) * 100.0
    ));
    if series.ties > 0 {
        out.push_str(&format!("Ties: {}\n", series.ties));
    }
    match series.leader() {
        Some(side) => {
            let team = match side {
                TeamSide::Home => &series.home_team_id,
                TeamSide::Away => &series.away_team_id,
            };
            out.push_str(&format!(
                "{} lead the series {}-{}\n",
                team,
                series.wins(side),
                series.wins(side.opponent())
            ));
        }
        None => out.push_str(&format!("Series tied {}-{}\n", series.home_wins, series.away_wins)),
    }
    out.push_str(&format!("Runs per game: {:.2}\n", series.avg_runs));
    out
}
