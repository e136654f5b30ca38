//! BBW Batch - multi-game drivers
//!
//! This crate runs many games at once:
//! - Series play between two teams with rotation cycling
//! - Calibration batches checked against historical league ranges
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_calibration (orchestration)
//! - Level 2: play_series, play_series_parallel (phases)
//! - Level 3: prepare_games, play_one, aggregate (steps)
//! - Level 4: rate helpers, fixed ranges

mod calibration;
mod error;
mod series;

pub use calibration::{run_calibration, CalibrationConfig, CalibrationReport, LeagueStats, MetricCheck, MLB_RANGES};
pub use error::BatchError;
pub use series::{play_series, play_series_parallel, GameSummary, SeriesResult};
