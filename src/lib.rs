//! Knockout bracket engine: seeds participants, builds single- or double-elimination
//! match graphs, and advances them as results are reported.

pub mod logic;
pub mod models;

pub use logic::{
    build_bracket, create_bracket, read_participants, reopen_match, replace_participant,
    report_result, seed_participants,
};
pub use models::{
    Bracket, BracketConfig, BracketError, Format, GameMatch, InputError, MatchId, MatchStatus,
    Participant, ParticipantId, Position, SeedOrdering, Side, Slot, StateError,
};
