//! The 35-slot player card
//!
//! Slot layout:
//! - 9 structural constants, identical on every card
//! - 3 gates: walk/strikeout (slot 0), power, strikeout
//! - 1 power position holding the power tier
//! - 2 archetype bytes (slots 33 and 34)
//! - 20 outcome slots filled from the player's rates

use serde::{Deserialize, Serialize};

use crate::archetype::{Archetype, Hand};

/// Number of slots on a card
pub const CARD_LEN: usize = 35;

/// Largest legal slot value
pub const MAX_CARD_VALUE: u8 = 42;

/// Gate chosen per player: walk value if walks outpace strikeouts
pub const WALK_STRIKEOUT_GATE: usize = 0;
pub const POWER_GATE: usize = 15;
pub const STRIKEOUT_GATE: usize = 20;
pub const POWER_POSITION: usize = 24;
pub const ARCHETYPE_PRIMARY: usize = 33;
pub const ARCHETYPE_SECONDARY: usize = 34;

pub const GATE_POSITIONS: [usize; 3] = [WALK_STRIKEOUT_GATE, POWER_GATE, STRIKEOUT_GATE];

/// (position, value) anchors inherited from the legacy table layout
pub const STRUCTURAL_SLOTS: [(usize, u8); 9] = [
    (1, 37),
    (3, 24),
    (6, 20),
    (11, 8),
    (13, 14),
    (18, 31),
    (23, 34),
    (25, 13),
    (32, 22),
];

pub const OUTCOME_POSITIONS: [usize; 20] = [
    2, 4, 5, 7, 8, 9, 10, 12, 14, 16, 17, 19, 21, 22, 26, 27, 28, 29, 30, 31,
];

/// Positions a plate appearance can land on: everything except the
/// power position and the archetype bytes
pub const PLAYABLE_POSITIONS: [usize; 32] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 25,
    26, 27, 28, 29, 30, 31, 32,
];

/// Bounded card slot value (0-42)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CardValue(u8);

impl CardValue {
    pub fn new(value: u8) -> Option<Self> {
        (value <= MAX_CARD_VALUE).then_some(Self(value))
    }

    /// Compile-time constructor for table literals
    pub const fn literal(value: u8) -> Self {
        assert!(value <= MAX_CARD_VALUE);
        Self(value)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for CardValue {
    type Error = CardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CardValue::new(value).ok_or(CardError::ValueOutOfRange { position: None, value })
    }
}

impl From<CardValue> for u8 {
    fn from(v: CardValue) -> u8 {
        v.0
    }
}

/// Card construction and validation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    #[error("card has {0} slots, expected 35")]
    WrongLength(usize),

    #[error("card value {value} out of range 0-42 (position {position:?})")]
    ValueOutOfRange { position: Option<usize>, value: u8 },

    #[error("structural slot {position} holds {found}, expected {expected}")]
    StructuralMismatch { position: usize, expected: u8, found: u8 },

    #[error("unknown archetype bytes ({0}, {1})")]
    UnknownArchetype(u8, u8),

    #[error("card archetype {on_card:?} does not match player archetype {stored:?}")]
    ArchetypeMismatch { on_card: Archetype, stored: Archetype },
}

/// A validated 35-slot card
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Card {
    slots: [CardValue; CARD_LEN],
}

impl Card {
    /// Validate raw slot values
    pub fn from_slots(raw: &[u8]) -> Result<Self, CardError> {
        if raw.len() != CARD_LEN {
            return Err(CardError::WrongLength(raw.len()));
        }

        let mut slots = [CardValue(0); CARD_LEN];
        for (position, &value) in raw.iter().enumerate() {
            slots[position] = CardValue::new(value).ok_or(CardError::ValueOutOfRange {
                position: Some(position),
                value,
            })?;
        }

        for &(position, expected) in &STRUCTURAL_SLOTS {
            if raw[position] != expected {
                return Err(CardError::StructuralMismatch {
                    position,
                    expected,
                    found: raw[position],
                });
            }
        }

        let (b33, b34) = (raw[ARCHETYPE_PRIMARY], raw[ARCHETYPE_SECONDARY]);
        if Archetype::from_bytes(b33, b34).is_none() {
            return Err(CardError::UnknownArchetype(b33, b34));
        }

        Ok(Self { slots })
    }

    /// Assemble a card from generated parts. Structural slots and
    /// archetype bytes are written here, so the result is always valid.
    pub(crate) fn assemble(
        outcomes: &[CardValue; 20],
        gates: &[CardValue; 3],
        power_tier: CardValue,
        archetype: Archetype,
    ) -> Self {
        let mut slots = [CardValue(0); CARD_LEN];
        for &(position, value) in &STRUCTURAL_SLOTS {
            slots[position] = CardValue(value);
        }
        for (&position, &value) in GATE_POSITIONS.iter().zip(gates.iter()) {
            slots[position] = value;
        }
        for (&position, &value) in OUTCOME_POSITIONS.iter().zip(outcomes.iter()) {
            slots[position] = value;
        }
        slots[POWER_POSITION] = power_tier;
        let (b33, b34) = archetype.to_bytes();
        slots[ARCHETYPE_PRIMARY] = CardValue(b33);
        slots[ARCHETYPE_SECONDARY] = CardValue(b34);
        Self { slots }
    }

    pub fn get(&self, position: usize) -> Option<CardValue> {
        self.slots.get(position).copied()
    }

    pub fn slots(&self) -> &[CardValue; CARD_LEN] {
        &self.slots
    }

    /// Archetype encoded in bytes 33 and 34
    pub fn archetype(&self) -> Archetype {
        Archetype::from_bytes(self.slots[ARCHETYPE_PRIMARY].0, self.slots[ARCHETYPE_SECONDARY].0)
            .unwrap_or(Archetype::Utility)
    }

    pub fn power_tier(&self) -> u8 {
        self.slots[POWER_POSITION].0
    }

    /// Gate and outcome slot values (always 23 of them)
    pub fn countable_values(&self) -> Vec<CardValue> {
        GATE_POSITIONS
            .iter()
            .chain(OUTCOME_POSITIONS.iter())
            .map(|&p| self.slots[p])
            .collect()
    }

    /// Value at the n-th playable position
    pub fn playable(&self, index: usize) -> CardValue {
        self.slots[PLAYABLE_POSITIONS[index % PLAYABLE_POSITIONS.len()]]
    }
}

impl TryFrom<Vec<u8>> for Card {
    type Error = CardError;

    fn try_from(raw: Vec<u8>) -> Result<Self, Self::Error> {
        Card::from_slots(&raw)
    }
}

impl From<Card> for Vec<u8> {
    fn from(card: Card) -> Vec<u8> {
        card.slots.iter().map(|v| v.0).collect()
    }
}

/// Player identifier, unique within a game
pub type PlayerId = String;

/// A batter's card plus the ratings the manager layer reads
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerCard {
    pub player_id: PlayerId,
    pub name: String,
    pub card: Card,
    pub archetype: Archetype,
    #[serde(default)]
    pub bats: Hand,
    /// Baserunning speed, 0.0-1.0
    pub speed: f64,
    /// Estimated on-base plus slugging
    pub ops: f64,
    /// Share of plate appearances not ending in a strikeout
    pub contact_rate: f64,
}

impl PlayerCard {
    /// Check the card's archetype bytes against the stored archetype
    pub fn validate(&self) -> Result<(), CardError> {
        let on_card = self.card.archetype();
        if on_card != self.archetype {
            return Err(CardError::ArchetypeMismatch {
                on_card,
                stored: self.archetype,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_card() -> Vec<u8> {
        let mut raw = vec![24u8; CARD_LEN];
        for &(p, v) in &STRUCTURAL_SLOTS {
            raw[p] = v;
        }
        raw[POWER_POSITION] = 2;
        raw[ARCHETYPE_PRIMARY] = 0;
        raw[ARCHETYPE_SECONDARY] = 0;
        raw
    }

    #[test]
    fn test_layout_partitions_all_slots() {
        let mut seen = [0u8; CARD_LEN];
        for &(p, _) in &STRUCTURAL_SLOTS {
            seen[p] += 1;
        }
        for p in GATE_POSITIONS.iter().chain(OUTCOME_POSITIONS.iter()) {
            seen[*p] += 1;
        }
        seen[POWER_POSITION] += 1;
        seen[ARCHETYPE_PRIMARY] += 1;
        seen[ARCHETYPE_SECONDARY] += 1;
        assert!(seen.iter().all(|&n| n == 1), "{:?}", seen);
    }

    #[test]
    fn test_playable_positions_exclude_metadata() {
        assert!(!PLAYABLE_POSITIONS.contains(&POWER_POSITION));
        assert!(!PLAYABLE_POSITIONS.contains(&ARCHETYPE_PRIMARY));
        assert!(!PLAYABLE_POSITIONS.contains(&ARCHETYPE_SECONDARY));
    }

    #[test]
    fn test_from_slots_accepts_valid_card() {
        let card = Card::from_slots(&raw_card()).unwrap();
        assert_eq!(card.archetype(), Archetype::StandardRight);
        assert_eq!(card.power_tier(), 2);
        assert_eq!(card.countable_values().len(), 23);
    }

    #[test]
    fn test_from_slots_rejects_bad_cards() {
        assert_eq!(Card::from_slots(&[0; 34]), Err(CardError::WrongLength(34)));

        let mut raw = raw_card();
        raw[2] = 43;
        assert!(matches!(
            Card::from_slots(&raw),
            Err(CardError::ValueOutOfRange { position: Some(2), value: 43 })
        ));

        let mut raw = raw_card();
        raw[1] = 5;
        assert!(matches!(Card::from_slots(&raw), Err(CardError::StructuralMismatch { position: 1, .. })));

        let mut raw = raw_card();
        raw[ARCHETYPE_PRIMARY] = 7;
        assert_eq!(Card::from_slots(&raw), Err(CardError::UnknownArchetype(7, 0)));
    }

    #[test]
    fn test_card_value_bounds() {
        assert!(CardValue::new(42).is_some());
        assert!(CardValue::new(43).is_none());
        assert!(CardValue::try_from(50u8).is_err());
    }

    #[test]
    fn test_serde_rejects_invalid_card() {
        let json = serde_json::to_string(&raw_card()).unwrap();
        let card: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(Vec::<u8>::from(card), raw_card());

        let short = serde_json::to_string(&vec![0u8; 10]).unwrap();
        assert!(serde_json::from_str::<Card>(&short).is_err());
    }
}
