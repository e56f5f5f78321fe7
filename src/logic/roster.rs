//! Roster import: read participants from CSV with an `id,name` header.

use crate::models::{BracketError, InputError, Participant, ParticipantId};
use serde::Deserialize;
use std::io::Read;

#[derive(Deserialize)]
struct RosterRow {
    id: ParticipantId,
    name: String,
}

/// Parse a roster. Rows keep file order, which is the seed order.
pub fn read_participants<R: Read>(reader: R) -> Result<Vec<Participant>, BracketError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut participants = Vec::new();
    for row in rdr.deserialize::<RosterRow>() {
        let row = row.map_err(|e| InputError::Roster(e.to_string()))?;
        if row.name.is_empty() {
            return Err(InputError::Roster(format!("participant {} has no name", row.id)).into());
        }
        participants.push(Participant::new(row.id, row.name));
    }
    Ok(participants)
}
