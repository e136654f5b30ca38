//! Outcome resolution strategies
//!
//! Two mechanisms turn a rolled card value into an outcome: the weighted
//! decision table with bounded retries, and the grade-indexed SERD lookup.
//! Which one a game uses is a configuration choice.

use serde::{Deserialize, Serialize};

use crate::card::CardValue;
use crate::outcome::OutcomeCategory;
use crate::rng::SeededRng;
use crate::serd::{direct_outcome, serd_column, serd_lookup};
use crate::table::OutcomeTable;

/// Maps a rolled card value to an outcome category
pub trait OutcomeResolutionStrategy: Send + Sync {
    fn resolve(&self, value: CardValue, pitcher_grade: u8, rng: &mut SeededRng) -> OutcomeCategory;

    fn name(&self) -> &'static str;
}

/// Weighted decision table; a miss after the retry budget falls back to
/// the value's neutral reading
#[derive(Clone, Copy, Debug)]
pub struct WeightedTableStrategy {
    table: OutcomeTable,
}

impl WeightedTableStrategy {
    pub const fn new(table: OutcomeTable) -> Self {
        Self { table }
    }
}

impl OutcomeResolutionStrategy for WeightedTableStrategy {
    fn resolve(&self, value: CardValue, _pitcher_grade: u8, rng: &mut SeededRng) -> OutcomeCategory {
        let lookup = self.table.lookup_outcome(value, rng);
        match lookup.matched() {
            Some(outcome) => outcome,
            None => {
                tracing::trace!("table miss for value {} after {} attempts", value.get(), lookup.attempts);
                direct_outcome(value)
            }
        }
    }

    fn name(&self) -> &'static str {
        "weighted_table"
    }
}

/// Direct five-column lookup keyed by the pitcher's effective grade
#[derive(Clone, Copy, Debug, Default)]
pub struct SerdStrategy;

impl OutcomeResolutionStrategy for SerdStrategy {
    fn resolve(&self, value: CardValue, pitcher_grade: u8, _rng: &mut SeededRng) -> OutcomeCategory {
        serd_lookup(value, serd_column(pitcher_grade))
    }

    fn name(&self) -> &'static str {
        "serd"
    }
}

static WEIGHTED_TABLE: WeightedTableStrategy = WeightedTableStrategy::new(OutcomeTable::shipped());
static SERD: SerdStrategy = SerdStrategy;

/// Configuration selector for the resolution strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeResolution {
    WeightedTable,
    #[default]
    Serd,
}

impl OutcomeResolution {
    pub fn strategy(self) -> &'static dyn OutcomeResolutionStrategy {
        match self {
            OutcomeResolution::WeightedTable => &WEIGHTED_TABLE,
            OutcomeResolution::Serd => &SERD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serd_ignores_rng() {
        let strategy = OutcomeResolution::Serd.strategy();
        let mut a = SeededRng::new(1);
        let mut b = SeededRng::new(2);
        for v in 0..=42u8 {
            let value = CardValue::literal(v);
            assert_eq!(strategy.resolve(value, 12, &mut a), strategy.resolve(value, 12, &mut b));
        }
    }

    #[test]
    fn test_serd_grade_matters() {
        let strategy = OutcomeResolution::Serd.strategy();
        let mut rng = SeededRng::new(1);
        let weak = strategy.resolve(CardValue::literal(10), 4, &mut rng);
        let ace = strategy.resolve(CardValue::literal(10), 20, &mut rng);
        assert_eq!(weak, OutcomeCategory::SingleClean);
        assert_eq!(ace, OutcomeCategory::GroundOut);
    }

    #[test]
    fn test_weighted_table_stays_in_value_family() {
        let strategy = OutcomeResolution::WeightedTable.strategy();
        let mut rng = SeededRng::new(9);
        for _ in 0..300 {
            let outcome = strategy.resolve(CardValue::literal(1), 10, &mut rng);
            assert!(outcome.is_home_run());
        }
        for _ in 0..300 {
            let outcome = strategy.resolve(CardValue::literal(13), 10, &mut rng);
            assert!(outcome.is_strikeout(), "{:?}", outcome);
        }
    }

    #[test]
    fn test_weighted_table_deterministic() {
        let strategy = OutcomeResolution::WeightedTable.strategy();
        let mut a = SeededRng::new(44);
        let mut b = SeededRng::new(44);
        for v in 0..=42u8 {
            let value = CardValue::literal(v);
            assert_eq!(strategy.resolve(value, 10, &mut a), strategy.resolve(value, 10, &mut b));
        }
    }
}
