//! Calibration - league batting rates over a batch of games
//!
//! Level 1 - Orchestration

use bbw_core::{BattingLine, GameOptions, GameResult, TeamSheet, TeamSide};
use serde::Serialize;

use crate::error::BatchError;
use crate::series::play_games;

/// (metric, low, high) per team-game, from modern MLB seasons
pub const MLB_RANGES: [(&str, f64, f64); 7] = [
    ("runs_per_game", 3.5, 5.5),
    ("avg", 0.230, 0.280),
    ("obp", 0.300, 0.350),
    ("slg", 0.370, 0.450),
    ("hr_per_game", 0.6, 1.4),
    ("k_pct", 0.15, 0.26),
    ("bb_pct", 0.07, 0.10),
];

#[derive(Clone, Copy, Debug)]
pub struct CalibrationConfig {
    pub games: usize,
    pub base_seed: u64,
    pub options: GameOptions,
    pub parallel: bool,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            games: 500,
            base_seed: 42,
            options: GameOptions::default(),
            parallel: true,
        }
    }
}

/// Aggregate rates; per-game figures are per team
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LeagueStats {
    pub team_games: u32,
    pub runs_per_game: f64,
    pub avg: f64,
    pub obp: f64,
    pub slg: f64,
    pub hr_per_game: f64,
    pub k_pct: f64,
    pub bb_pct: f64,
}

impl LeagueStats {
    fn from_totals(totals: &BattingLine, runs: u32, team_games: u32) -> Self {
        let per_game = |n: u32| if team_games == 0 { 0.0 } else { n as f64 / team_games as f64 };
        let per_pa = |n: u32| if totals.pa == 0 { 0.0 } else { n as f64 / totals.pa as f64 };
        Self {
            team_games,
            runs_per_game: per_game(runs),
            avg: totals.avg(),
            obp: totals.obp(),
            slg: totals.slg(),
            hr_per_game: per_game(totals.hr),
            k_pct: per_pa(totals.so),
            bb_pct: per_pa(totals.bb),
        }
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        match name {
            "runs_per_game" => Some(self.runs_per_game),
            "avg" => Some(self.avg),
            "obp" => Some(self.obp),
            "slg" => Some(self.slg),
            "hr_per_game" => Some(self.hr_per_game),
            "k_pct" => Some(self.k_pct),
            "bb_pct" => Some(self.bb_pct),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricCheck {
    pub metric: &'static str,
    pub value: f64,
    pub low: f64,
    pub high: f64,
    pub in_range: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalibrationReport {
    pub games: u32,
    pub stats: LeagueStats,
    pub checks: Vec<MetricCheck>,
}

impl CalibrationReport {
    pub fn all_in_range(&self) -> bool {
        self.checks.iter().all(|c| c.in_range)
    }

    pub fn out_of_range(&self) -> impl Iterator<Item = &MetricCheck> {
        self.checks.iter().filter(|c| !c.in_range)
    }
}

/// Run a calibration batch between two teams (Level 1 orchestration)
pub fn run_calibration(
    home: &TeamSheet,
    away: &TeamSheet,
    config: &CalibrationConfig,
) -> Result<CalibrationReport, BatchError> {
    tracing::info!("calibrating over {} games from seed {}", config.games, config.base_seed);

    let results = play_games(home, away, config.games, config.base_seed, config.options, config.parallel)?;
    let stats = league_stats(&results);
    let checks = check_ranges(&stats);

    for c in checks.iter().filter(|c| !c.in_range) {
        tracing::warn!("{} = {:.3} outside [{:.3}, {:.3}]", c.metric, c.value, c.low, c.high);
    }

    Ok(CalibrationReport {
        games: results.len() as u32,
        stats,
        checks,
    })
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

fn league_stats(results: &[GameResult]) -> LeagueStats {
    let mut totals = BattingLine::default();
    let mut runs = 0u32;
    for result in results {
        for side in [TeamSide::Away, TeamSide::Home] {
            totals.accumulate(&result.team_batting(side));
            runs += result.score(side);
        }
    }
    LeagueStats::from_totals(&totals, runs, 2 * results.len() as u32)
}

fn check_ranges(stats: &LeagueStats) -> Vec<MetricCheck> {
    MLB_RANGES
        .iter()
        .filter_map(|&(metric, low, high)| {
            let value = stats.metric(metric)?;
            Some(MetricCheck {
                metric,
                value,
                low,
                high,
                in_range: value >= low && value <= high,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_from_totals() {
        let totals = BattingLine {
            pa: 100,
            ab: 88,
            h: 22,
            doubles: 4,
            hr: 3,
            bb: 8,
            so: 20,
            ..Default::default()
        };
        let stats = LeagueStats::from_totals(&totals, 9, 2);
        assert!((stats.runs_per_game - 4.5).abs() < 1e-12);
        assert!((stats.avg - 0.25).abs() < 1e-12);
        assert!((stats.k_pct - 0.20).abs() < 1e-12);
        assert!((stats.hr_per_game - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_every_range_has_a_metric() {
        let stats = LeagueStats::default();
        let checks = check_ranges(&stats);
        assert_eq!(checks.len(), MLB_RANGES.len());
        assert!(checks.iter().all(|c| c.low < c.high));
    }

    #[test]
    fn test_empty_batch() {
        let stats = league_stats(&[]);
        assert_eq!(stats.team_games, 0);
        assert_eq!(stats.runs_per_game, 0.0);
    }
}
