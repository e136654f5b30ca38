//! Weighted outcome decision table
//!
//! A card value is resolved by sampling a row in proportion to its
//! frequency weight and accepting it when the value falls inside the row's
//! threshold band. Rows whose low threshold exceeds the high threshold are
//! dead rows kept from the legacy layout; they never match.

use serde::{Deserialize, Serialize};

use crate::card::CardValue;
use crate::outcome::OutcomeCategory;
use crate::rng::SeededRng;

/// Attempts `lookup_outcome` makes before reporting a miss
pub const MAX_LOOKUP_ATTEMPTS: u32 = 3;

/// One row of the decision table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRow {
    pub frequency_weight: u32,
    pub threshold_low: u8,
    pub threshold_high: u8,
    pub outcome_index: u8,
}

const fn row(frequency_weight: u32, threshold_low: u8, threshold_high: u8, outcome_index: u8) -> OutcomeRow {
    OutcomeRow {
        frequency_weight,
        threshold_low,
        threshold_high,
        outcome_index,
    }
}

/// The shipped 36-row table (weights sum to 75)
pub const OUTCOME_TABLE: [OutcomeRow; 36] = [
    row(1, 5, 10, 15),
    row(3, 0, 1, 0),
    row(1, 0, 0, 1),
    row(2, 2, 2, 2),
    row(3, 3, 4, 3),
    row(2, 2, 4, 3),
    row(3, 5, 6, 15),
    row(4, 7, 11, 16),
    row(2, 5, 11, 16),
    row(2, 12, 12, 6),
    row(4, 13, 13, 7),
    row(1, 13, 15, 8),
    row(4, 14, 14, 4),
    row(1, 14, 12, 5),
    row(3, 15, 15, 8),
    row(2, 16, 16, 18),
    row(2, 17, 17, 19),
    row(4, 18, 23, 9),
    row(2, 18, 20, 13),
    row(1, 16, 19, 18),
    row(4, 24, 29, 10),
    row(2, 27, 30, 11),
    row(3, 30, 32, 11),
    row(1, 30, 31, 14),
    row(3, 33, 35, 12),
    row(1, 34, 36, 17),
    row(3, 37, 37, 20),
    row(1, 36, 38, 21),
    row(1, 39, 39, 22),
    row(1, 37, 40, 23),
    row(1, 41, 41, 24),
    row(2, 21, 24, 9),
    row(2, 40, 42, 9),
    row(1, 25, 22, 10),
    row(1, 31, 28, 12),
    row(1, 25, 29, 10),
];

/// Rows of the narrower in-game table, with their weights (sum 12)
pub const IDT_ROWS: [usize; 9] = [1, 3, 4, 6, 7, 12, 9, 17, 20];
pub const IDT_WEIGHTS: [u32; 9] = [1, 1, 2, 1, 2, 1, 1, 2, 1];

/// Result of a table lookup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LookupResult {
    pub success: bool,
    pub outcome: Option<OutcomeCategory>,
    pub row_index: Option<usize>,
    pub attempts: u32,
}

impl LookupResult {
    /// Matched outcome, `None` on a miss
    pub fn matched(&self) -> Option<OutcomeCategory> {
        if self.success {
            self.outcome
        } else {
            None
        }
    }
}

/// Weighted decision table
#[derive(Clone, Copy, Debug)]
pub struct OutcomeTable {
    rows: &'static [OutcomeRow],
}

impl Default for OutcomeTable {
    fn default() -> Self {
        Self::shipped()
    }
}

impl OutcomeTable {
    /// The shipped legacy table
    pub const fn shipped() -> Self {
        Self { rows: &OUTCOME_TABLE }
    }

    pub fn rows(&self) -> &[OutcomeRow] {
        self.rows
    }

    pub fn total_weight(&self) -> u32 {
        self.rows.iter().map(|r| r.frequency_weight).sum()
    }

    /// Prefix sums of the row weights
    pub fn build_cumulative_weights(&self) -> Vec<u32> {
        self.rows
            .iter()
            .scan(0u32, |acc, r| {
                *acc += r.frequency_weight;
                Some(*acc)
            })
            .collect()
    }

    /// Draw a row index with probability proportional to its weight
    pub fn select_weighted_row(&self, rng: &mut SeededRng) -> usize {
        let weights: Vec<u32> = self.rows.iter().map(|r| r.frequency_weight).collect();
        weighted_index(&weights, rng)
    }

    /// Repeatedly sample a row until one accepts `card_value`, up to
    /// `MAX_LOOKUP_ATTEMPTS` times
    pub fn lookup_outcome(&self, card_value: CardValue, rng: &mut SeededRng) -> LookupResult {
        for attempt in 1..=MAX_LOOKUP_ATTEMPTS {
            let idx = self.select_weighted_row(rng);
            let row = &self.rows[idx];
            if card_value_matches_row(card_value.get(), row) {
                return LookupResult {
                    success: true,
                    outcome: OutcomeCategory::from_index(row.outcome_index),
                    row_index: Some(idx),
                    attempts: attempt,
                };
            }
        }

        LookupResult {
            success: false,
            outcome: None,
            row_index: None,
            attempts: MAX_LOOKUP_ATTEMPTS,
        }
    }

    /// Sample the nine-row in-game table; always succeeds
    pub fn lookup_idt_outcome(&self, rng: &mut SeededRng) -> LookupResult {
        let pick = weighted_index(&IDT_WEIGHTS, rng);
        let idx = IDT_ROWS[pick];
        LookupResult {
            success: true,
            outcome: OutcomeCategory::from_index(self.rows[idx].outcome_index),
            row_index: Some(idx),
            attempts: 1,
        }
    }
}

/// True iff `threshold_low <= value <= threshold_high`. Inverted rows never match.
pub fn card_value_matches_row(value: u8, row: &OutcomeRow) -> bool {
    row.threshold_low <= row.threshold_high
        && row.threshold_low <= value
        && value <= row.threshold_high
}

fn weighted_index(weights: &[u32], rng: &mut SeededRng) -> usize {
    let total: u32 = weights.iter().sum();
    let mut roll = rng.next_int_exclusive(0, total as i64) as u32;
    for (i, &w) in weights.iter().enumerate() {
        if roll < w {
            return i;
        }
        roll -= w;
    }
    weights.len().saturating_sub(1)
}
