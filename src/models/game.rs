//! A single bracket match: which side of the bracket it sits on, who fills its
//! slots, where its winner and loser go, and how far it has progressed.

use crate::models::participant::{Participant, ParticipantId, Slot};
use serde::{Deserialize, Serialize};

/// Unique identifier for a match. Assigned in build order, never reused.
pub type MatchId = u32;

/// Which slot of a match (A is the first feeder's slot, B the second).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    #[default]
    A,
    B,
}

impl Position {
    pub fn other(self) -> Self {
        match self {
            Position::A => Position::B,
            Position::B => Position::A,
        }
    }
}

/// Part of the bracket a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Winners,
    Losers,
    /// Grand final, decider and third-place match.
    Final,
}

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// At least one slot is still waiting on a feeder.
    #[default]
    Pending,
    /// Both slots hold participants; waiting for a reported result.
    Ready,
    Completed,
}

/// One node of the bracket graph.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    /// 1-based, counted within `side`.
    pub round: u32,
    pub side: Side,
    pub slot_a: Slot,
    pub slot_b: Slot,
    /// Match the winner advances to; `None` on the terminal match.
    pub winner_target: Option<MatchId>,
    /// Match the loser drops to (winners bracket in double elimination, semifinals with a third-place match).
    pub loser_target: Option<MatchId>,
    /// Matches feeding this one, in slot order.
    pub feeders: Vec<MatchId>,
    pub status: MatchStatus,
    /// Set only once completed, and never to a bye.
    pub winner: Option<Participant>,
    /// Slot that won. `None` while open and for a match between two byes.
    pub winner_position: Option<Position>,
}

impl GameMatch {
    pub fn new(id: MatchId, round: u32, side: Side) -> Self {
        Self {
            id,
            round,
            side,
            slot_a: Slot::Pending,
            slot_b: Slot::Pending,
            winner_target: None,
            loser_target: None,
            feeders: Vec::new(),
            status: MatchStatus::Pending,
            winner: None,
            winner_position: None,
        }
    }

    pub fn slot(&self, position: Position) -> &Slot {
        match position {
            Position::A => &self.slot_a,
            Position::B => &self.slot_b,
        }
    }

    pub fn slot_mut(&mut self, position: Position) -> &mut Slot {
        match position {
            Position::A => &mut self.slot_a,
            Position::B => &mut self.slot_b,
        }
    }

    /// First-round matches have no feeders; their slots are fixed at build time.
    pub fn is_opening(&self) -> bool {
        self.feeders.is_empty()
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// True for a completed match that no one actually played (one or both slots were byes).
    pub fn was_walkover(&self) -> bool {
        self.is_completed() && (self.slot_a.is_bye() || self.slot_b.is_bye())
    }

    /// The participant who lost, if the match was played between two participants.
    pub fn loser(&self) -> Option<&Participant> {
        self.winner_position
            .and_then(|p| self.slot(p.other()).participant())
    }

    /// Whether `id` occupies either slot.
    pub fn involves(&self, id: ParticipantId) -> bool {
        [&self.slot_a, &self.slot_b]
            .iter()
            .any(|s| s.participant().is_some_and(|p| p.id == id))
    }
}
