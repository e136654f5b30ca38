//! BBW Core - card-driven baseball simulation
//!
//! This crate provides the simulation core:
//! - 35-slot player cards and the rate-stat card generator
//! - Outcome resolution (weighted table or SERD columns) and archetype modifiers
//! - Baserunning, pitcher fatigue and bullpen logic
//! - Manager decision profiles
//! - The deterministic game runner and box score

pub mod rng;
pub mod outcome;
pub mod archetype;
pub mod card;
pub mod serd;
pub mod table;
pub mod strategy;
pub mod bases;
pub mod resolver;
pub mod generator;
pub mod pitching;
pub mod manager;
pub mod config;
pub mod boxscore;
pub mod runner;
pub mod sheet;
pub mod sample;

// Re-exports for convenient access
pub use rng::SeededRng;
pub use outcome::{OutcomeCategory, ALL_OUTCOMES};
pub use archetype::{apply_archetype_modifier, Archetype, Hand, ModifierResult, ModifierType};
pub use card::{Card, CardError, CardValue, PlayerCard, PlayerId, CARD_LEN};
pub use strategy::{OutcomeResolution, OutcomeResolutionStrategy, SerdStrategy, WeightedTableStrategy};
pub use table::OutcomeTable;
pub use bases::{Base, BaseState};
pub use resolver::{resolve_outcome, resolve_steal, BatterDestination, ResolvedOutcome};
pub use generator::{generate_card, generate_player_card, BattingRates, RatesError};
pub use pitching::{compute_effective_grade, PitcherCard, PitcherGameState, PitcherRole, RemovalReason};
pub use manager::{Decision, GameSituation, Manager, ManagerProfile, ManagerStyle};
pub use config::{ConfigError, LineupEntry, Position, RunGameConfig, TeamSide};
pub use boxscore::{BattingLine, GameResult, LineScore, PitchingDecision, PitchingLine};
pub use runner::{run_game, GameRunner};
pub use sheet::{build_config, GameOptions, GameSheet, SheetError, TeamSheet};
