//! Participant seeding: pad the field to a power of two with byes.

use crate::models::{BracketError, InputError, Participant, SeedOrdering, Slot};
use std::collections::HashSet;

/// Turn an ordered participant list into round-1 slots, two per match.
///
/// The slot count is the next power of two. With `b` byes, the first `n - b`
/// participants meet each other in order and each of the last `b` is paired with a
/// bye, so no opening match is ever bye against bye.
pub fn seed_participants(
    participants: &[Participant],
    ordering: SeedOrdering,
) -> Result<Vec<Slot>, BracketError> {
    if participants.is_empty() {
        return Err(InputError::NoParticipants.into());
    }
    let mut seen = HashSet::with_capacity(participants.len());
    for p in participants {
        if !seen.insert(p.id) {
            return Err(InputError::DuplicateParticipant(p.id).into());
        }
    }

    match ordering {
        SeedOrdering::Natural => Ok(natural_order(participants)),
    }
}

fn natural_order(participants: &[Participant]) -> Vec<Slot> {
    let size = participants.len().next_power_of_two();
    let byes = size - participants.len();
    // n > size / 2, so this never underflows and stays even for size >= 2.
    let paired = participants.len() - byes;

    let mut slots = Vec::with_capacity(size);
    slots.extend(participants[..paired].iter().cloned().map(Slot::Entrant));
    for p in &participants[paired..] {
        slots.push(Slot::Entrant(p.clone()));
        slots.push(Slot::Bye);
    }
    slots
}
