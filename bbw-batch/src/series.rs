//! Series play - multiple games between two teams
//!
//! Level 2 - Phase-level implementation

use bbw_core::{build_config, run_game, GameOptions, GameResult, RunGameConfig, TeamSheet, TeamSide};
use rayon::prelude::*;
use serde::Serialize;

use crate::error::BatchError;

/// One game of a series
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSummary {
    pub game_number: usize,
    pub seed: u64,
    pub home_starter: String,
    pub away_starter: String,
    pub home_score: u32,
    pub away_score: u32,
    pub innings: u32,
}

impl GameSummary {
    pub fn winner(&self) -> Option<TeamSide> {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Result of a series
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SeriesResult {
    pub home_team_id: String,
    pub away_team_id: String,
    pub home_wins: u32,
    pub away_wins: u32,
    /// Games still level at the extra-inning cap
    pub ties: u32,
    /// Average combined runs per game
    pub avg_runs: f32,
    pub games_played: u32,
    pub games: Vec<GameSummary>,
}

impl SeriesResult {
    /// Create empty result
    pub fn empty(home_team_id: &str, away_team_id: &str) -> Self {
        Self {
            home_team_id: home_team_id.to_string(),
            away_team_id: away_team_id.to_string(),
            home_wins: 0,
            away_wins: 0,
            ties: 0,
            avg_runs: 0.0,
            games_played: 0,
            games: Vec::new(),
        }
    }

    pub fn wins(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.home_wins,
            TeamSide::Away => self.away_wins,
        }
    }

    pub fn win_rate(&self, side: TeamSide) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.wins(side) as f32 / self.games_played as f32
        }
    }

    /// Series leader, `None` when level
    pub fn leader(&self) -> Option<TeamSide> {
        match self.home_wins.cmp(&self.away_wins) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Play a series of `games` games (Level 2 phase)
///
/// Game `i` is seeded `base_seed + i` and both teams start
/// `rotation[i % rotation.len()]`.
pub fn play_series(
    home: &TeamSheet,
    away: &TeamSheet,
    games: usize,
    base_seed: u64,
    options: GameOptions,
) -> Result<SeriesResult, BatchError> {
    let results = play_games(home, away, games, base_seed, options, false)?;
    Ok(aggregate(home, away, &results))
}

/// Play a series with parallel execution (Level 2 phase)
pub fn play_series_parallel(
    home: &TeamSheet,
    away: &TeamSheet,
    games: usize,
    base_seed: u64,
    options: GameOptions,
) -> Result<SeriesResult, BatchError> {
    let results = play_games(home, away, games, base_seed, options, true)?;
    Ok(aggregate(home, away, &results))
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Build every game's configuration up front so a bad sheet fails before
/// anything is simulated
fn prepare_games(
    home: &TeamSheet,
    away: &TeamSheet,
    games: usize,
    base_seed: u64,
    options: GameOptions,
) -> Result<Vec<RunGameConfig>, BatchError> {
    (0..games)
        .map(|i| {
            let game_id = format!("{}-at-{}-{}", away.team_id, home.team_id, i + 1);
            let seed = base_seed.wrapping_add(i as u64);
            build_config(&game_id, seed, home, away, i, options)
                .map_err(|source| BatchError::Sheet { game: i, source })
        })
        .collect()
}

fn play_one(game: usize, config: &RunGameConfig) -> Result<GameResult, BatchError> {
    run_game(config).map_err(|source| BatchError::Config { game, source })
}

/// Play every game; results come back in game order either way
pub(crate) fn play_games(
    home: &TeamSheet,
    away: &TeamSheet,
    games: usize,
    base_seed: u64,
    options: GameOptions,
    parallel: bool,
) -> Result<Vec<GameResult>, BatchError> {
    let configs = prepare_games(home, away, games, base_seed, options)?;
    tracing::debug!("playing {} games ({})", configs.len(), if parallel { "parallel" } else { "sequential" });

    if parallel {
        configs
            .par_iter()
            .enumerate()
            .map(|(i, c)| play_one(i, c))
            .collect()
    } else {
        configs.iter().enumerate().map(|(i, c)| play_one(i, c)).collect()
    }
}

fn summarize(game_number: usize, result: &GameResult) -> GameSummary {
    let starter = |side: TeamSide| {
        result
            .pitching_for(side)
            .find(|l| l.gs)
            .map(|l| l.pitcher_id.clone())
            .unwrap_or_default()
    };
    GameSummary {
        game_number,
        seed: result.seed,
        home_starter: starter(TeamSide::Home),
        away_starter: starter(TeamSide::Away),
        home_score: result.home_score,
        away_score: result.away_score,
        innings: result.innings,
    }
}

/// Aggregate game results into a series result
fn aggregate(home: &TeamSheet, away: &TeamSheet, results: &[GameResult]) -> SeriesResult {
    let mut series = SeriesResult::empty(&home.team_id, &away.team_id);
    let mut total_runs = 0u32;

    for (i, result) in results.iter().enumerate() {
        let summary = summarize(i, result);
        match summary.winner() {
            Some(TeamSide::Home) => series.home_wins += 1,
            Some(TeamSide::Away) => series.away_wins += 1,
            None => series.ties += 1,
        }
        total_runs += summary.home_score + summary.away_score;
        series.games.push(summary);
    }

    series.games_played = series.games.len() as u32;
    if series.games_played > 0 {
        series.avg_runs = total_runs as f32 / series.games_played as f32;
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbw_core::sample::{harbor, mesa};

    #[test]
    fn test_series_counts_add_up() {
        let series = play_series(&mesa(), &harbor(), 6, 100, GameOptions::default()).unwrap();
        assert_eq!(series.games_played, 6);
        assert_eq!(series.home_wins + series.away_wins + series.ties, 6);
        assert_eq!(series.home_team_id, "MES");
    }

    #[test]
    fn test_rotation_cycles_through_starters() {
        let home = mesa();
        let away = harbor();
        let n = home.rotation.len();
        let series = play_series(&home, &away, n + 2, 7, GameOptions::default()).unwrap();
        for game in &series.games {
            assert_eq!(game.home_starter, home.rotation[game.game_number % n].pitcher_id);
            assert_eq!(game.away_starter, away.rotation[game.game_number % away.rotation.len()].pitcher_id);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let a = play_series(&mesa(), &harbor(), 8, 55, GameOptions::default()).unwrap();
        let b = play_series_parallel(&mesa(), &harbor(), 8, 55, GameOptions::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_and_leader() {
        let mut series = SeriesResult::empty("MES", "HAR");
        assert_eq!(series.win_rate(TeamSide::Home), 0.0);
        assert_eq!(series.leader(), None);

        series.games_played = 3;
        series.away_wins = 2;
        series.home_wins = 1;
        assert_eq!(series.leader(), Some(TeamSide::Away));
        assert!((series.win_rate(TeamSide::Away) - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_bad_sheet_fails_before_play() {
        let mut home = mesa();
        home.rotation.clear();
        let err = play_series(&home, &harbor(), 3, 1, GameOptions::default()).unwrap_err();
        assert!(matches!(err, BatchError::Sheet { game: 0, .. }));
    }
}
