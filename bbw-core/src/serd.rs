//! SERD: five-column direct card-value lookup keyed by pitcher grade
//!
//! Column 0 is the weakest pitching column and column 4 the strongest.
//! Stronger columns turn marginal hits into outs; the weakest column turns
//! a few outs into hits. Column 2 is the neutral reading of a card value.

use crate::card::CardValue;
use crate::outcome::OutcomeCategory;
use crate::outcome::OutcomeCategory::*;

pub const SERD_COLUMNS: usize = 5;

/// Column used for the neutral reading of a value
pub const NEUTRAL_COLUMN: usize = 2;

/// Contiguous band of card values sharing one row of outcomes
struct SerdBand {
    low: u8,
    high: u8,
    columns: [OutcomeCategory; SERD_COLUMNS],
}

const fn band(low: u8, high: u8, columns: [OutcomeCategory; SERD_COLUMNS]) -> SerdBand {
    SerdBand { low, high, columns }
}

const fn flat(low: u8, high: u8, outcome: OutcomeCategory) -> SerdBand {
    SerdBand {
        low,
        high,
        columns: [outcome; SERD_COLUMNS],
    }
}

/// Bands cover every value 0-42 exactly once
static SERD_TABLE: [SerdBand; 31] = [
    band(0, 0, [HomeRun, HomeRun, HomeRun, HomeRun, Double]),
    flat(1, 1, HomeRun),
    band(2, 2, [Triple, Triple, Triple, Triple, Double]),
    flat(3, 3, Double),
    band(4, 4, [Double, Double, Double, Double, SingleAdvance]),
    flat(5, 6, SingleAdvance),
    flat(7, 8, SingleClean),
    band(9, 9, [SingleClean, SingleClean, SingleClean, SingleClean, GroundOut]),
    band(10, 10, [SingleClean, SingleClean, SingleClean, GroundOut, GroundOut]),
    band(11, 11, [SingleAdvance, SingleClean, SingleClean, FlyOut, PopOut]),
    flat(12, 12, HitByPitch),
    flat(13, 13, StrikeoutSwinging),
    band(14, 14, [Walk, Walk, Walk, Walk, StrikeoutLooking]),
    band(15, 15, [Walk, StrikeoutLooking, StrikeoutLooking, StrikeoutLooking, StrikeoutLooking]),
    flat(16, 16, ReachedOnError),
    flat(17, 17, FieldersChoice),
    flat(18, 18, GroundIntoDoublePlay),
    flat(19, 22, GroundOut),
    band(23, 23, [SingleClean, GroundOut, GroundOut, GroundOut, GroundOut]),
    flat(24, 28, FlyOut),
    band(29, 29, [Double, FlyOut, FlyOut, FlyOut, FlyOut]),
    flat(30, 30, LineIntoDoublePlay),
    flat(31, 32, LineOut),
    flat(33, 35, PopOut),
    flat(36, 36, Sacrifice),
    band(37, 37, [WildPitch, StolenBaseOpportunity, StolenBaseOpportunity, StolenBaseOpportunity, StolenBaseOpportunity]),
    flat(38, 38, WildPitch),
    flat(39, 39, Balk),
    flat(40, 40, PassedBall),
    flat(41, 41, SpecialEvent),
    flat(42, 42, GroundOut),
];

/// Column for a pitcher's effective grade
pub fn serd_column(effective_grade: u8) -> usize {
    match effective_grade {
        0..=5 => 0,
        6..=9 => 1,
        10..=13 => 2,
        14..=17 => 3,
        _ => 4,
    }
}

/// Outcome for a card value in the given column
pub fn serd_lookup(value: CardValue, column: usize) -> OutcomeCategory {
    let v = value.get();
    let column = column.min(SERD_COLUMNS - 1);
    SERD_TABLE
        .iter()
        .find(|b| b.low <= v && v <= b.high)
        .map(|b| b.columns[column])
        .unwrap_or(GroundOut)
}

/// Neutral reading of a card value
pub fn direct_outcome(value: CardValue) -> OutcomeCategory {
    serd_lookup(value, NEUTRAL_COLUMN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_value_covered_once() {
        for v in 0..=42u8 {
            let hits = SERD_TABLE.iter().filter(|b| b.low <= v && v <= b.high).count();
            assert_eq!(hits, 1, "value {} covered {} times", v, hits);
        }
    }

    #[test]
    fn test_columns_by_grade() {
        assert_eq!(serd_column(1), 0);
        assert_eq!(serd_column(9), 1);
        assert_eq!(serd_column(12), 2);
        assert_eq!(serd_column(14), 3);
        assert_eq!(serd_column(22), 4);
    }

    #[test]
    fn test_stronger_columns_never_add_hits() {
        for v in 0..=42u8 {
            let value = CardValue::literal(v);
            let bases: Vec<u32> = (0..SERD_COLUMNS)
                .map(|c| serd_lookup(value, c).total_bases())
                .collect();
            for w in bases.windows(2) {
                assert!(w[0] >= w[1], "value {} bases {:?}", v, bases);
            }
        }
    }

    #[test]
    fn test_direct_readings() {
        assert_eq!(direct_outcome(CardValue::literal(1)), HomeRun);
        assert_eq!(direct_outcome(CardValue::literal(8)), SingleClean);
        assert_eq!(direct_outcome(CardValue::literal(14)), Walk);
        assert_eq!(direct_outcome(CardValue::literal(13)), StrikeoutSwinging);
        assert_eq!(direct_outcome(CardValue::literal(37)), StolenBaseOpportunity);
    }
}
