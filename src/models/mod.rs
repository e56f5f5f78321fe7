//! Data structures for a knockout bracket: participants, matches, configuration, the bracket aggregate.

mod bracket;
mod config;
mod game;
mod participant;

pub(crate) use bracket::Route;
pub use bracket::{Bracket, BracketError, InputError, StateError};
pub use config::{BracketConfig, Format, SeedOrdering};
pub use game::{GameMatch, MatchId, MatchStatus, Position, Side};
pub use participant::{Participant, ParticipantId, Slot};
