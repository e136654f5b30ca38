//! Plate-appearance and baserunning outcome categories

use serde::{Deserialize, Serialize};

/// One discrete plate-appearance or baserunning event.
///
/// The discriminant is the legacy decision-table outcome index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeCategory {
    HomeRun = 0,
    HomeRunInsidePark = 1,
    Triple = 2,
    Double = 3,
    Walk = 4,
    IntentionalWalk = 5,
    HitByPitch = 6,
    StrikeoutSwinging = 7,
    StrikeoutLooking = 8,
    GroundOut = 9,
    FlyOut = 10,
    LineOut = 11,
    PopOut = 12,
    GroundIntoDoublePlay = 13,
    LineIntoDoublePlay = 14,
    /// Single; runners take two bases
    SingleAdvance = 15,
    /// Single; runners take one base
    SingleClean = 16,
    Sacrifice = 17,
    ReachedOnError = 18,
    FieldersChoice = 19,
    StolenBaseOpportunity = 20,
    WildPitch = 21,
    Balk = 22,
    PassedBall = 23,
    SpecialEvent = 24,
}

/// Every category in legacy index order
pub const ALL_OUTCOMES: [OutcomeCategory; 25] = [
    OutcomeCategory::HomeRun,
    OutcomeCategory::HomeRunInsidePark,
    OutcomeCategory::Triple,
    OutcomeCategory::Double,
    OutcomeCategory::Walk,
    OutcomeCategory::IntentionalWalk,
    OutcomeCategory::HitByPitch,
    OutcomeCategory::StrikeoutSwinging,
    OutcomeCategory::StrikeoutLooking,
    OutcomeCategory::GroundOut,
    OutcomeCategory::FlyOut,
    OutcomeCategory::LineOut,
    OutcomeCategory::PopOut,
    OutcomeCategory::GroundIntoDoublePlay,
    OutcomeCategory::LineIntoDoublePlay,
    OutcomeCategory::SingleAdvance,
    OutcomeCategory::SingleClean,
    OutcomeCategory::Sacrifice,
    OutcomeCategory::ReachedOnError,
    OutcomeCategory::FieldersChoice,
    OutcomeCategory::StolenBaseOpportunity,
    OutcomeCategory::WildPitch,
    OutcomeCategory::Balk,
    OutcomeCategory::PassedBall,
    OutcomeCategory::SpecialEvent,
];

impl OutcomeCategory {
    /// Category for a legacy outcome index
    pub fn from_index(index: u8) -> Option<Self> {
        ALL_OUTCOMES.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn is_single(self) -> bool {
        matches!(self, Self::SingleClean | Self::SingleAdvance)
    }

    pub fn is_home_run(self) -> bool {
        matches!(self, Self::HomeRun | Self::HomeRunInsidePark)
    }

    /// Counts as a base hit in the box score
    pub fn is_hit(self) -> bool {
        self.is_single() || self.is_home_run() || matches!(self, Self::Double | Self::Triple)
    }

    pub fn is_strikeout(self) -> bool {
        matches!(self, Self::StrikeoutSwinging | Self::StrikeoutLooking)
    }

    pub fn is_walk(self) -> bool {
        matches!(self, Self::Walk | Self::IntentionalWalk)
    }

    pub fn is_double_play(self) -> bool {
        matches!(self, Self::GroundIntoDoublePlay | Self::LineIntoDoublePlay)
    }

    /// Events that happen between pitches and never end the plate appearance
    pub fn is_no_pa(self) -> bool {
        matches!(
            self,
            Self::StolenBaseOpportunity
                | Self::WildPitch
                | Self::Balk
                | Self::PassedBall
                | Self::SpecialEvent
        )
    }

    /// Charged as an official at-bat
    pub fn is_at_bat(self) -> bool {
        !(self.is_no_pa() || self.is_walk() || matches!(self, Self::HitByPitch | Self::Sacrifice))
    }

    /// Number of bases credited to the batter on a hit
    pub fn total_bases(self) -> u32 {
        match self {
            Self::SingleClean | Self::SingleAdvance => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::HomeRun | Self::HomeRunInsidePark => 4,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (i, cat) in ALL_OUTCOMES.iter().enumerate() {
            assert_eq!(cat.index() as usize, i);
            assert_eq!(OutcomeCategory::from_index(i as u8), Some(*cat));
        }
        assert_eq!(OutcomeCategory::from_index(25), None);
    }

    #[test]
    fn test_no_pa_events_are_not_at_bats() {
        for cat in ALL_OUTCOMES.iter().filter(|c| c.is_no_pa()) {
            assert!(!cat.is_at_bat());
            assert!(!cat.is_hit());
        }
        assert_eq!(ALL_OUTCOMES.iter().filter(|c| c.is_no_pa()).count(), 5);
    }

    #[test]
    fn test_at_bat_classification() {
        assert!(OutcomeCategory::ReachedOnError.is_at_bat());
        assert!(OutcomeCategory::FieldersChoice.is_at_bat());
        assert!(!OutcomeCategory::Walk.is_at_bat());
        assert!(!OutcomeCategory::Sacrifice.is_at_bat());
        assert!(!OutcomeCategory::HitByPitch.is_at_bat());
    }
}
