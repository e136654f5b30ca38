//! Whole-game checks against the box score.

use bbw_core::sample::{sample_config, sample_game};
use bbw_core::{run_game, GameResult, OutcomeResolution, TeamSide};

fn play(seed: u64) -> GameResult {
    run_game(&sample_config(seed).unwrap()).unwrap()
}

#[test]
fn test_same_seed_same_box_score() {
    for seed in [0, 17, 4242] {
        let a = serde_json::to_string(&play(seed)).unwrap();
        let b = serde_json::to_string(&play(seed)).unwrap();
        assert_eq!(a, b, "seed {}", seed);
    }
}

#[test]
fn test_different_seeds_differ() {
    let results: Vec<GameResult> = (0..10).map(play).collect();
    let first = &results[0];
    assert!(results.iter().any(|r| r.player_batting_lines != first.player_batting_lines));
}

#[test]
fn test_box_score_consistency() {
    for seed in 0..30 {
        let result = play(seed);
        for side in [TeamSide::Away, TeamSide::Home] {
            let team = result.team_batting(side);
            let hits = match side {
                TeamSide::Away => result.line_score.away_hits,
                TeamSide::Home => result.line_score.home_hits,
            };
            assert_eq!(team.h, hits, "seed {} {}", seed, side);
            assert!(team.ab <= team.pa);
            assert!(team.h <= team.ab);
            assert!(team.doubles + team.triples + team.hr <= team.h);

            let allowed: u32 = result.pitching_for(side.opponent()).map(|l| l.h).sum();
            assert_eq!(allowed, team.h, "seed {} {}", seed, side);
            let er: u32 = result.pitching_for(side.opponent()).map(|l| l.er).sum();
            assert!(er <= result.score(side));
        }

        let home_runs: u32 = result.line_score.home.iter().flatten().sum();
        assert_eq!(home_runs, result.home_score);
        assert_eq!(
            result.player_pitching_lines.iter().filter(|l| l.gs).count(),
            2,
            "seed {}",
            seed
        );
    }
}

#[test]
fn test_unplayed_bottom_half_only_when_home_leads() {
    for seed in 0..40 {
        let result = play(seed);
        if let Some(Some(_)) = result.line_score.home.last() {
            continue;
        }
        assert!(result.home_score > result.away_score, "seed {}", seed);
    }
}

#[test]
fn test_weighted_table_game() {
    let mut sheet = sample_game(8);
    sheet.options.resolution = OutcomeResolution::WeightedTable;
    let config = sheet.to_config().unwrap();
    let result = run_game(&config).unwrap();
    assert!(result.innings >= 9);
    let runs: u32 = result.player_batting_lines.iter().map(|l| l.r).sum();
    assert_eq!(runs, result.home_score + result.away_score);
}

#[test]
fn test_result_json_shape() {
    let value = serde_json::to_value(play(3)).unwrap();
    for key in [
        "game_id",
        "seed",
        "home_score",
        "away_score",
        "innings",
        "line_score",
        "player_batting_lines",
        "player_pitching_lines",
    ] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
}

#[test]
fn test_demo_game_sheet_plays() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos/sample_game.json");
    let sheet = bbw_core::GameSheet::load(&path).unwrap();
    assert_eq!(sheet.home.team_id, "BAY");
    let result = run_game(&sheet.to_config().unwrap()).unwrap();
    assert_eq!(result.seed, sheet.seed);
    assert!(result.innings >= 9);
}
