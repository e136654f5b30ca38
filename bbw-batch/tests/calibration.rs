//! Calibration batches over the built-in clubs.

use bbw_batch::{run_calibration, CalibrationConfig, MLB_RANGES};
use bbw_core::sample::{harbor, mesa};
use bbw_core::GameOptions;

fn config(games: usize) -> CalibrationConfig {
    CalibrationConfig {
        games,
        base_seed: 2024,
        options: GameOptions::default(),
        parallel: true,
    }
}

#[test]
fn test_report_covers_every_range() {
    let report = run_calibration(&mesa(), &harbor(), &config(40)).unwrap();
    assert_eq!(report.games, 40);
    assert_eq!(report.stats.team_games, 80);
    assert_eq!(report.checks.len(), MLB_RANGES.len());
    assert_eq!(report.all_in_range(), report.out_of_range().count() == 0);
}

#[test]
fn test_default_batch_lands_in_mlb_ranges() {
    let report = run_calibration(&mesa(), &harbor(), &CalibrationConfig::default()).unwrap();
    let misses: Vec<String> = report
        .out_of_range()
        .map(|c| format!("{} = {:.3} [{}, {}]", c.metric, c.value, c.low, c.high))
        .collect();
    assert!(report.all_in_range(), "{:?}", misses);

    let stats = &report.stats;
    assert!(stats.obp >= stats.avg);
    assert!(stats.slg >= stats.avg);
}

#[test]
fn test_calibration_is_reproducible() {
    let mut sequential = config(20);
    sequential.parallel = false;
    let a = run_calibration(&mesa(), &harbor(), &sequential).unwrap();
    let b = run_calibration(&mesa(), &harbor(), &config(20)).unwrap();
    assert_eq!(a, b);
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}
