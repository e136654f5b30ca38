//! Play command - one game, printed as a box score
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_game(), report_result()
//! - Level 4: box score formatting

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use bbw_core::{run_game, GameResult, GameSheet, PitchingDecision, TeamSide};

use crate::teams::{load_teams, RuleArgs, TeamArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Game sheet JSON file; replaces the team and rule options
    #[arg(long, value_name = "FILE")]
    pub game: Option<PathBuf>,

    #[command(flatten)]
    pub teams: TeamArgs,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Game number in the season, picks each rotation's starter
    #[arg(long, default_value = "0")]
    pub game_number: usize,

    /// Output the full result as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let sheet = load_game(&args, seed)?;
    let config = sheet.to_config().context("Invalid game setup")?;

    tracing::info!(
        "Playing {}: {} at {} (seed {})",
        config.game_id,
        config.away_team_id,
        config.home_team_id,
        config.seed
    );

    let result = run_game(&config).context("Game rejected its configuration")?;
    report_result(&result, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_game(args: &PlayArgs, seed: Option<u64>) -> Result<GameSheet> {
    if let Some(path) = &args.game {
        let mut sheet = GameSheet::load(path)?;
        if let Some(s) = seed {
            sheet.seed = s;
        }
        return Ok(sheet);
    }

    let (home, away) = load_teams(&args.teams)?;
    let seed = seed.unwrap_or(42);
    Ok(GameSheet {
        game_id: format!("{}-at-{}-{}", away.team_id, home.team_id, seed),
        seed,
        home,
        away,
        game_number: args.game_number,
        options: args.rules.options(),
    })
}

fn report_result(result: &GameResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print!("{}", format_box_score(result));
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - FORMATTING
// ============================================================================

pub fn format_box_score(result: &GameResult) -> String {
    let mut out = String::new();
    out.push_str(&format_line_score(result));

    for side in [TeamSide::Away, TeamSide::Home] {
        let team_id = match side {
            TeamSide::Away => &result.away_team_id,
            TeamSide::Home => &result.home_team_id,
        };

        out.push_str(&format!(
            "\n{:<22}{:>4}{:>4}{:>4}{:>4}{:>4}{:>4}{:>4}\n",
            team_id, "AB", "R", "H", "RBI", "BB", "SO", "HR"
        ));
        for l in result.batting_for(side) {
            out.push_str(&format!(
                "{:<22}{:>4}{:>4}{:>4}{:>4}{:>4}{:>4}{:>4}\n",
                l.name, l.ab, l.r, l.h, l.rbi, l.bb, l.so, l.hr
            ));
        }

        out.push_str(&format!(
            "\n{:<22}{:>5}{:>4}{:>4}{:>4}{:>4}{:>4}\n",
            "Pitching", "IP", "H", "R", "ER", "BB", "SO"
        ));
        for l in result.pitching_for(side) {
            let name = match l.decision {
                Some(PitchingDecision::Win) => format!("{} (W)", l.name),
                Some(PitchingDecision::Loss) => format!("{} (L)", l.name),
                Some(PitchingDecision::Save) => format!("{} (S)", l.name),
                None => l.name.clone(),
            };
            out.push_str(&format!(
                "{:<22}{:>5}{:>4}{:>4}{:>4}{:>4}{:>4}\n",
                name,
                l.ip_display(),
                l.h,
                l.r,
                l.er,
                l.bb,
                l.so
            ));
        }
    }
    out
}

fn format_line_score(result: &GameResult) -> String {
    let ls = &result.line_score;
    let away: String = ls.away.iter().map(|r| format!("{:>3}", r)).collect();
    let home: String = ls
        .home
        .iter()
        .map(|r| match r {
            Some(r) => format!("{:>3}", r),
            None => format!("{:>3}", "x"),
        })
        .collect();

    format!(
        "{:<6}{}  {:>3}{:>3}{:>3}\n{:<6}{}  {:>3}{:>3}{:>3}\n",
        result.away_team_id,
        away,
        result.away_score,
        ls.away_hits,
        ls.away_errors,
        result.home_team_id,
        home,
        result.home_score,
        ls.home_hits,
        ls.home_errors
    )
}
