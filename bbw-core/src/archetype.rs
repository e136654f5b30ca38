//! Player archetypes and the post-resolution archetype modifier

use serde::{Deserialize, Serialize};

use crate::outcome::OutcomeCategory;
use crate::rng::SeededRng;

/// Probability a power hitter's fly out carries for a home run
pub const POWER_HR_UPGRADE_CHANCE: f64 = 0.15;

/// Probability a contact+speed hitter puts a strikeout in play
pub const CONTACT_K_DOWNGRADE_CHANCE: f64 = 0.20;

/// Batting or throwing hand
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    #[default]
    Right,
    Left,
}

impl Hand {
    pub fn opposite(self) -> Self {
        match self {
            Hand::Right => Hand::Left,
            Hand::Left => Hand::Right,
        }
    }
}

/// Behavioral profile stored in card bytes 33 and 34
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    StandardRight,
    StandardLeft,
    PowerRight,
    PowerLeft,
    Speed,
    ContactSpeed,
    EliteDefense,
    Utility,
    Pitcher,
}

/// (byte33, byte34) encoding of every archetype
const ARCHETYPE_BYTES: [(Archetype, u8, u8); 9] = [
    (Archetype::StandardRight, 0, 0),
    (Archetype::StandardLeft, 0, 1),
    (Archetype::PowerRight, 1, 0),
    (Archetype::PowerLeft, 1, 1),
    (Archetype::Speed, 2, 2),
    (Archetype::ContactSpeed, 3, 3),
    (Archetype::EliteDefense, 4, 4),
    (Archetype::Utility, 5, 5),
    (Archetype::Pitcher, 8, 6),
];

impl Archetype {
    /// Decode the archetype bytes; `None` for an unassigned pair
    pub fn from_bytes(byte33: u8, byte34: u8) -> Option<Self> {
        ARCHETYPE_BYTES
            .iter()
            .find(|(_, b33, b34)| *b33 == byte33 && *b34 == byte34)
            .map(|(a, _, _)| *a)
    }

    pub fn to_bytes(self) -> (u8, u8) {
        ARCHETYPE_BYTES
            .iter()
            .find(|(a, _, _)| *a == self)
            .map(|(_, b33, b34)| (*b33, *b34))
            .unwrap_or((0, 0))
    }

    pub fn is_power(self) -> bool {
        matches!(self, Archetype::PowerRight | Archetype::PowerLeft)
    }

    /// Hand implied by the archetype, if it encodes one
    pub fn implied_hand(self) -> Option<Hand> {
        match self {
            Archetype::StandardRight | Archetype::PowerRight => Some(Hand::Right),
            Archetype::StandardLeft | Archetype::PowerLeft => Some(Hand::Left),
            _ => None,
        }
    }
}

/// Which rule changed the outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierType {
    PowerUpgrade,
    ContactDowngrade,
}

/// Result of passing an outcome through the archetype modifier
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModifierResult {
    pub outcome: OutcomeCategory,
    pub modified: bool,
    pub modifier_type: Option<ModifierType>,
    pub trigger_stolen_base_check: bool,
}

impl ModifierResult {
    fn unchanged(outcome: OutcomeCategory) -> Self {
        Self {
            outcome,
            modified: false,
            modifier_type: None,
            trigger_stolen_base_check: false,
        }
    }
}

/// Post-process a resolved outcome according to the batter's archetype.
///
/// Randomness is drawn only when the archetype has a rule for the outcome.
pub fn apply_archetype_modifier(
    outcome: OutcomeCategory,
    archetype: Archetype,
    rng: &mut SeededRng,
) -> ModifierResult {
    match archetype {
        Archetype::PowerRight | Archetype::PowerLeft if outcome == OutcomeCategory::FlyOut => {
            if rng.chance(POWER_HR_UPGRADE_CHANCE) {
                ModifierResult {
                    outcome: OutcomeCategory::HomeRun,
                    modified: true,
                    modifier_type: Some(ModifierType::PowerUpgrade),
                    trigger_stolen_base_check: false,
                }
            } else {
                ModifierResult::unchanged(outcome)
            }
        }
        Archetype::ContactSpeed if outcome.is_strikeout() => {
            if rng.chance(CONTACT_K_DOWNGRADE_CHANCE) {
                ModifierResult {
                    outcome: OutcomeCategory::GroundOut,
                    modified: true,
                    modifier_type: Some(ModifierType::ContactDowngrade),
                    trigger_stolen_base_check: false,
                }
            } else {
                ModifierResult::unchanged(outcome)
            }
        }
        Archetype::Speed => ModifierResult {
            trigger_stolen_base_check: matches!(
                outcome,
                OutcomeCategory::SingleClean
                    | OutcomeCategory::SingleAdvance
                    | OutcomeCategory::Walk
                    | OutcomeCategory::HitByPitch
            ),
            ..ModifierResult::unchanged(outcome)
        },
        _ => ModifierResult::unchanged(outcome),
    }
}
