//! Card generator: season rate statistics -> 35-slot card
//!
//! The 23 countable positions (3 gates + 20 outcome slots) are apportioned
//! across walks, strikeouts, home runs, singles, doubles, triples and outs
//! by the largest-remainder method. Gates are decided first and the
//! outcome slots are filled net of what the gates already represent.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::archetype::{Archetype, Hand};
use crate::card::{Card, CardValue, PlayerCard, GATE_POSITIONS, OUTCOME_POSITIONS};

/// Countable positions on a card: 3 gates + 20 outcome slots
pub const COUNTABLE_SLOTS: u32 = (GATE_POSITIONS.len() + OUTCOME_POSITIONS.len()) as u32;

/// Gate value when walks outpace strikeouts
pub const WALK_GATE_VALUE: u8 = 14;
/// Gate value otherwise, and the fixed strikeout gate
pub const STRIKEOUT_GATE_VALUE: u8 = 13;
/// Fixed power gate (a fly ball)
pub const POWER_GATE_VALUE: u8 = 24;

/// SB per PA at which the speed rating saturates
const FULL_SPEED_SB_RATE: f64 = 0.04;

/// Speed rating floor for the speed archetypes
const SPEED_ARCHETYPE_FLOOR: f64 = 0.7;

/// Out values cycled through when filling out slots
const OUT_VALUES: [u8; 20] = [
    19, 24, 21, 33, 26, 31, 18, 22, 28, 16, 25, 34, 20, 27, 17, 32, 30, 35, 23, 29,
];

/// (upper ISO bound, tier)
const POWER_TIERS: [(f64, u8); 5] = [(0.100, 0), (0.140, 1), (0.180, 2), (0.220, 3), (0.260, 4)];
const TOP_POWER_TIER: u8 = 5;

/// Fixed card for a pitcher batting; mostly outs
const PITCHER_OUTCOMES: [u8; 20] = [
    13, 13, 15, 13, 19, 21, 24, 26, 33, 31, 22, 28, 20, 34, 19, 25, 7, 9, 14, 36,
];
const PITCHER_GATES: [u8; 3] = [STRIKEOUT_GATE_VALUE, POWER_GATE_VALUE, STRIKEOUT_GATE_VALUE];

/// Per-plate-appearance rate statistics for one batter
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BattingRates {
    pub walk_rate: f64,
    pub strikeout_rate: f64,
    pub home_run_rate: f64,
    pub single_rate: f64,
    pub double_rate: f64,
    pub triple_rate: f64,
    #[serde(default)]
    pub stolen_base_rate: f64,
    /// Isolated power (SLG - AVG)
    #[serde(default)]
    pub iso: f64,
    #[serde(default = "default_babip")]
    pub babip: f64,
}

fn default_babip() -> f64 {
    0.300
}

/// Rejected rate statistics
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatesError {
    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} is negative ({value})")]
    Negative { field: &'static str, value: f64 },

    #[error("per-PA event rates sum to {0:.3}, above 1.0")]
    ExceedsOne(f64),
}

impl BattingRates {
    fn fields(&self) -> [(&'static str, f64); 9] {
        [
            ("walk_rate", self.walk_rate),
            ("strikeout_rate", self.strikeout_rate),
            ("home_run_rate", self.home_run_rate),
            ("single_rate", self.single_rate),
            ("double_rate", self.double_rate),
            ("triple_rate", self.triple_rate),
            ("stolen_base_rate", self.stolen_base_rate),
            ("iso", self.iso),
            ("babip", self.babip),
        ]
    }

    /// Sum of the rates that end a plate appearance other than in an out
    pub fn event_total(&self) -> f64 {
        self.walk_rate
            + self.strikeout_rate
            + self.home_run_rate
            + self.single_rate
            + self.double_rate
            + self.triple_rate
    }

    pub fn validate(&self) -> Result<(), RatesError> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(RatesError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(RatesError::Negative { field, value });
            }
        }
        let total = self.event_total();
        if total > 1.0 + 1e-9 {
            return Err(RatesError::ExceedsOne(total));
        }
        Ok(())
    }

    /// Estimated OBP + SLG implied by the rates
    pub fn estimated_ops(&self) -> f64 {
        let hits = self.single_rate + self.double_rate + self.triple_rate + self.home_run_rate;
        let obp = hits + self.walk_rate;
        let at_bats = (1.0 - self.walk_rate).max(1e-9);
        let total_bases = self.single_rate
            + 2.0 * self.double_rate
            + 3.0 * self.triple_rate
            + 4.0 * self.home_run_rate;
        obp + total_bases / at_bats
    }
}

/// How the 23 countable positions were apportioned
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlotAllocation {
    pub walks: u32,
    pub strikeouts: u32,
    pub home_runs: u32,
    pub singles: u32,
    pub doubles: u32,
    pub triples: u32,
    pub outs: u32,
}

impl SlotAllocation {
    pub fn total(&self) -> u32 {
        self.as_array().iter().sum()
    }

    fn as_array(&self) -> [u32; 7] {
        [
            self.walks,
            self.strikeouts,
            self.home_runs,
            self.singles,
            self.doubles,
            self.triples,
            self.outs,
        ]
    }

    fn from_array(c: [u32; 7]) -> Self {
        Self {
            walks: c[BB],
            strikeouts: c[K],
            home_runs: c[HR],
            singles: c[B1],
            doubles: c[B2],
            triples: c[B3],
            outs: c[OUT],
        }
    }
}

const BB: usize = 0;
const K: usize = 1;
const HR: usize = 2;
const B1: usize = 3;
const B2: usize = 4;
const B3: usize = 5;
const OUT: usize = 6;

/// Apportion `total` units across `shares` by the largest-remainder method.
/// Ties on remainder go to the earlier share.
pub fn largest_remainder(shares: &[f64], total: u32) -> Vec<u32> {
    let sum: f64 = shares.iter().filter(|s| **s > 0.0).sum();
    let mut counts = vec![0u32; shares.len()];
    if sum <= 0.0 || shares.is_empty() {
        if let Some(last) = counts.last_mut() {
            *last = total;
        }
        return counts;
    }

    let exact: Vec<f64> = shares
        .iter()
        .map(|s| s.max(0.0) / sum * total as f64)
        .collect();
    for (c, e) in counts.iter_mut().zip(&exact) {
        *c = e.floor() as u32;
    }

    let assigned: u32 = counts.iter().sum();
    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.partial_cmp(&ra).unwrap_or(Ordering::Equal).then(a.cmp(&b))
    });
    for &i in order.iter().cycle().take(total.saturating_sub(assigned) as usize) {
        counts[i] += 1;
    }
    counts
}

fn argmax(counts: &[u32]) -> usize {
    counts
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Take one unit from `cat`, or from the largest category if `cat` is empty
fn consume(counts: &mut [u32; 7], cat: usize) {
    let idx = if counts[cat] > 0 { cat } else { argmax(counts) };
    counts[idx] = counts[idx].saturating_sub(1);
}

/// Apportion all 23 countable positions from the rates.
///
/// Any category with a strictly positive rate gets at least one position,
/// taken from the largest category.
pub fn allocate_slots(rates: &BattingRates) -> SlotAllocation {
    let out_rate = (1.0 - rates.event_total()).max(0.0);
    let shares = [
        rates.walk_rate,
        rates.strikeout_rate,
        rates.home_run_rate,
        rates.single_rate,
        rates.double_rate,
        rates.triple_rate,
        out_rate,
    ];

    let mut counts = [0u32; 7];
    counts.copy_from_slice(&largest_remainder(&shares, COUNTABLE_SLOTS));

    for cat in 0..counts.len() {
        if shares[cat] > 0.0 && counts[cat] == 0 {
            let donor = argmax(&counts);
            if counts[donor] > 1 {
                counts[donor] -= 1;
                counts[cat] = 1;
            }
        }
    }
    SlotAllocation::from_array(counts)
}

/// Power tier (0-5) from isolated power
pub fn power_tier(iso: f64) -> u8 {
    POWER_TIERS
        .iter()
        .find(|(bound, _)| iso < *bound)
        .map(|(_, tier)| *tier)
        .unwrap_or(TOP_POWER_TIER)
}

/// Baserunning speed rating (0-1)
pub fn speed_rating(stolen_base_rate: f64, archetype: Archetype) -> f64 {
    let base = (stolen_base_rate / FULL_SPEED_SB_RATE).clamp(0.0, 1.0);
    match archetype {
        Archetype::Speed | Archetype::ContactSpeed => base.max(SPEED_ARCHETYPE_FLOOR),
        _ => base,
    }
}

/// Split single slots into (advance, solid, weak) tiers. Higher BABIP
/// shifts weight from weak singles toward advance singles.
fn single_tiers(singles: u32, babip: f64) -> [u32; 3] {
    let q = ((babip - 0.260) / 0.100).clamp(0.0, 1.0);
    let split = largest_remainder(&[0.15 + 0.25 * q, 0.45, 0.40 - 0.25 * q], singles);
    [split[0], split[1], split[2]]
}

fn push_cycled(out: &mut Vec<u8>, values: &[u8], n: u32) {
    out.extend(values.iter().cycle().take(n as usize));
}

/// Generate a card from validated rates
pub fn generate_card(rates: &BattingRates, archetype: Archetype) -> Result<Card, RatesError> {
    rates.validate()?;

    let allocation = allocate_slots(rates);
    let mut counts = allocation.as_array();

    let walk_gate = rates.walk_rate > rates.strikeout_rate;
    consume(&mut counts, if walk_gate { BB } else { K });
    consume(&mut counts, K);
    consume(&mut counts, OUT);

    let tier = power_tier(rates.iso);
    let mut values: Vec<u8> = Vec::with_capacity(OUTCOME_POSITIONS.len());
    push_cycled(&mut values, &[14], counts[BB]);
    push_cycled(&mut values, &[15, 13], counts[K]);
    let hr_values: &[u8] = if tier >= 4 { &[1, 0] } else { &[1] };
    push_cycled(&mut values, hr_values, counts[HR]);

    let [advance, solid, weak] = single_tiers(counts[B1], rates.babip);
    push_cycled(&mut values, &[5, 6], advance);
    push_cycled(&mut values, &[7, 8], solid);
    push_cycled(&mut values, &[9, 10, 11], weak);

    push_cycled(&mut values, &[3, 4], counts[B2]);
    push_cycled(&mut values, &[2], counts[B3]);
    push_cycled(&mut values, &OUT_VALUES, counts[OUT]);

    // Counts always sum to 20 here; the padding only guards the array
    values.resize(OUTCOME_POSITIONS.len(), OUT_VALUES[0]);

    let mut outcomes = [CardValue::literal(0); 20];
    for (slot, v) in outcomes.iter_mut().zip(&values) {
        *slot = CardValue::new(*v).unwrap_or(CardValue::literal(OUT_VALUES[0]));
    }
    let gates = [
        CardValue::literal(if walk_gate { WALK_GATE_VALUE } else { STRIKEOUT_GATE_VALUE }),
        CardValue::literal(POWER_GATE_VALUE),
        CardValue::literal(STRIKEOUT_GATE_VALUE),
    ];

    Ok(Card::assemble(&outcomes, &gates, CardValue::literal(tier), archetype))
}

/// Generate a full player card with the ratings the manager layer reads
pub fn generate_player_card(
    player_id: &str,
    name: &str,
    rates: &BattingRates,
    archetype: Archetype,
    bats: Hand,
) -> Result<PlayerCard, RatesError> {
    let card = generate_card(rates, archetype)?;
    Ok(PlayerCard {
        player_id: player_id.to_string(),
        name: name.to_string(),
        card,
        archetype,
        bats,
        speed: speed_rating(rates.stolen_base_rate, archetype),
        ops: rates.estimated_ops(),
        contact_rate: (1.0 - rates.strikeout_rate).clamp(0.0, 1.0),
    })
}

/// The fixed card every pitcher bats with
pub fn generate_pitcher_batting_card() -> Card {
    let outcomes = PITCHER_OUTCOMES.map(CardValue::literal);
    let gates = PITCHER_GATES.map(CardValue::literal);
    Card::assemble(&outcomes, &gates, CardValue::literal(0), Archetype::Pitcher)
}

/// Player card wrapping the pitcher batting card
pub fn pitcher_batting_player(player_id: &str, name: &str, bats: Hand) -> PlayerCard {
    PlayerCard {
        player_id: player_id.to_string(),
        name: name.to_string(),
        card: generate_pitcher_batting_card(),
        archetype: Archetype::Pitcher,
        bats,
        speed: 0.2,
        ops: 0.350,
        contact_rate: 0.60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{ARCHETYPE_PRIMARY, ARCHETYPE_SECONDARY, POWER_POSITION, STRUCTURAL_SLOTS};
    use crate::serd::direct_outcome;

    fn league_average() -> BattingRates {
        BattingRates {
            walk_rate: 0.085,
            strikeout_rate: 0.220,
            home_run_rate: 0.030,
            single_rate: 0.140,
            double_rate: 0.045,
            triple_rate: 0.004,
            stolen_base_rate: 0.010,
            iso: 0.160,
            babip: 0.295,
        }
    }

    #[test]
    fn test_largest_remainder_sums_to_total() {
        let counts = largest_remainder(&[0.5, 0.3, 0.2], 23);
        assert_eq!(counts.iter().sum::<u32>(), 23);
        // exact 11.5 / 6.9 / 4.6: the two largest remainders round up
        assert_eq!(counts, vec![11, 7, 5]);

        let counts = largest_remainder(&[0.0, 0.0], 5);
        assert_eq!(counts, vec![0, 5]);
    }

    #[test]
    fn test_allocation_floor_of_one() {
        let rates = league_average();
        let alloc = allocate_slots(&rates);
        assert_eq!(alloc.total(), COUNTABLE_SLOTS);
        // 0.4% triples rounds to zero but still gets a slot
        assert_eq!(alloc.triples, 1);
        assert!(alloc.outs > alloc.singles);

        let no_triples = BattingRates { triple_rate: 0.0, ..rates };
        assert_eq!(allocate_slots(&no_triples).triples, 0);
    }

    #[test]
    fn test_structural_and_archetype_bytes() {
        let card = generate_card(&league_average(), Archetype::PowerLeft).unwrap();
        for &(p, v) in &STRUCTURAL_SLOTS {
            assert_eq!(card.get(p).unwrap().get(), v);
        }
        assert_eq!(card.get(ARCHETYPE_PRIMARY).unwrap().get(), 1);
        assert_eq!(card.get(ARCHETYPE_SECONDARY).unwrap().get(), 1);
        assert_eq!(card.archetype(), Archetype::PowerLeft);
        assert_eq!(card.countable_values().len(), 23);
    }

    #[test]
    fn test_walk_strikeout_gate() {
        let patient = BattingRates {
            walk_rate: 0.150,
            strikeout_rate: 0.100,
            ..league_average()
        };
        let card = generate_card(&patient, Archetype::StandardRight).unwrap();
        assert_eq!(card.get(0).unwrap().get(), WALK_GATE_VALUE);

        let card = generate_card(&league_average(), Archetype::StandardRight).unwrap();
        assert_eq!(card.get(0).unwrap().get(), STRIKEOUT_GATE_VALUE);
    }

    #[test]
    fn test_power_tiers() {
        assert_eq!(power_tier(0.050), 0);
        assert_eq!(power_tier(0.120), 1);
        assert_eq!(power_tier(0.160), 2);
        assert_eq!(power_tier(0.200), 3);
        assert_eq!(power_tier(0.250), 4);
        assert_eq!(power_tier(0.320), 5);

        let card = generate_card(&league_average(), Archetype::StandardRight).unwrap();
        assert_eq!(card.get(POWER_POSITION).unwrap().get(), 2);
    }

    #[test]
    fn test_card_reflects_rates() {
        let count = |card: &Card, pred: fn(crate::outcome::OutcomeCategory) -> bool| {
            card.countable_values().into_iter().filter(|v| pred(direct_outcome(*v))).count()
        };

        let slugger = BattingRates {
            home_run_rate: 0.080,
            iso: 0.300,
            ..league_average()
        };
        let slap = BattingRates {
            home_run_rate: 0.005,
            iso: 0.060,
            ..league_average()
        };
        let big = generate_card(&slugger, Archetype::PowerRight).unwrap();
        let small = generate_card(&slap, Archetype::ContactSpeed).unwrap();
        assert!(count(&big, |o| o.is_home_run()) > count(&small, |o| o.is_home_run()));
    }

    #[test]
    fn test_babip_shifts_single_quality() {
        let high = single_tiers(10, 0.360);
        let low = single_tiers(10, 0.240);
        assert_eq!(high.iter().sum::<u32>(), 10);
        assert_eq!(low.iter().sum::<u32>(), 10);
        assert!(high[0] > low[0]);
        assert!(high[2] < low[2]);
    }

    #[test]
    fn test_rejects_bad_rates() {
        let neg = BattingRates { walk_rate: -0.1, ..league_average() };
        assert!(matches!(generate_card(&neg, Archetype::Utility), Err(RatesError::Negative { .. })));

        let nan = BattingRates { babip: f64::NAN, ..league_average() };
        assert_eq!(
            generate_card(&nan, Archetype::Utility),
            Err(RatesError::NotFinite { field: "babip" })
        );

        let over = BattingRates { single_rate: 0.9, ..league_average() };
        assert!(matches!(generate_card(&over, Archetype::Utility), Err(RatesError::ExceedsOne(_))));
    }

    #[test]
    fn test_pitcher_batting_card_mostly_outs() {
        let card = generate_pitcher_batting_card();
        assert_eq!(card.archetype(), Archetype::Pitcher);
        let outs = card
            .countable_values()
            .into_iter()
            .filter(|v| {
                let o = direct_outcome(*v);
                !(o.is_hit() || o.is_walk())
            })
            .count();
        assert!(outs >= 19, "outs = {}", outs);
    }

    #[test]
    fn test_player_ratings() {
        let player = generate_player_card("p1", "Test", &league_average(), Archetype::Speed, Hand::Left).unwrap();
        assert!(player.validate().is_ok());
        assert!(player.speed >= 0.7);
        assert!((player.contact_rate - 0.78).abs() < 1e-9);
        assert!(player.ops > 0.6 && player.ops < 0.9, "ops = {}", player.ops);
    }
}
