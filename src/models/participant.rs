//! Participant and the values a match slot can hold.

use serde::{Deserialize, Serialize};

/// Stable identifier for a participant, supplied by the caller.
pub type ParticipantId = u32;

/// A real entrant in the bracket.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

impl Participant {
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One side of a match.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "participant", rename_all = "snake_case")]
pub enum Slot {
    /// Waiting on an upstream match.
    #[default]
    Pending,
    /// No opponent; whoever sits on the other side advances without playing.
    Bye,
    Entrant(Participant),
}

impl Slot {
    /// True once the slot is no longer waiting on a feeder.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Slot::Pending)
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Slot::Bye)
    }

    pub fn participant(&self) -> Option<&Participant> {
        match self {
            Slot::Entrant(p) => Some(p),
            Slot::Pending | Slot::Bye => None,
        }
    }
}

impl From<Participant> for Slot {
    fn from(p: Participant) -> Self {
        Slot::Entrant(p)
    }
}
