//! Setup: seed a participant list and build its bracket in one step.

use crate::logic::{build_bracket, seed_participants};
use crate::models::{Bracket, BracketConfig, BracketError, Participant};

/// Seed `participants` with `config.seed_ordering` and build the bracket.
///
/// Call again to reset: the returned bracket is meant to replace the old one
/// wholesale, never to be merged with it.
pub fn create_bracket(
    participants: &[Participant],
    config: BracketConfig,
) -> Result<Bracket, BracketError> {
    let slots = seed_participants(participants, config.seed_ordering)?;
    build_bracket(slots, config)
}
