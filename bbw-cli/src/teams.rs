//! Arguments shared by the game-playing commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use bbw_core::sample::{harbor, mesa};
use bbw_core::{GameOptions, OutcomeResolution, TeamSheet};

#[derive(Args, Debug, Clone)]
pub struct TeamArgs {
    /// Home team sheet JSON file (built-in club if omitted)
    #[arg(long, value_name = "FILE")]
    pub home: Option<PathBuf>,

    /// Away team sheet JSON file (built-in club if omitted)
    #[arg(long, value_name = "FILE")]
    pub away: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct RuleArgs {
    /// Pitchers bat; lineups must carry P instead of DH
    #[arg(long)]
    pub no_dh: bool,

    /// How rolled card values become outcomes
    #[arg(long, value_enum, default_value = "serd")]
    pub resolution: ResolutionArg,

    /// Innings after which a tied game is called
    #[arg(long, default_value = "25")]
    pub max_innings: u32,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionArg {
    Serd,
    WeightedTable,
}

impl RuleArgs {
    pub fn options(&self) -> GameOptions {
        GameOptions {
            designated_hitter: !self.no_dh,
            resolution: match self.resolution {
                ResolutionArg::Serd => OutcomeResolution::Serd,
                ResolutionArg::WeightedTable => OutcomeResolution::WeightedTable,
            },
            max_innings: self.max_innings,
        }
    }
}

/// Load both team sheets, falling back to the built-in clubs
pub fn load_teams(args: &TeamArgs) -> Result<(TeamSheet, TeamSheet)> {
    let home = match &args.home {
        Some(path) => TeamSheet::load(path).context("Failed to load home team")?,
        None => mesa(),
    };
    let away = match &args.away {
        Some(path) => TeamSheet::load(path).context("Failed to load away team")?,
        None => harbor(),
    };
    Ok((home, away))
}
