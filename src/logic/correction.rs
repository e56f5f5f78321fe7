//! Data corrections on an existing bracket: swapping the participant in a slot and
//! reopening a played match so its result can be reported again.

use crate::logic::builder::remove_decider;
use crate::models::{
    Bracket, BracketError, InputError, MatchId, MatchStatus, Participant, Position, Route, Slot,
    StateError,
};

/// Put `participant` into a slot that already holds one. Returns the participant replaced.
///
/// `participant` must be new to the bracket, or carry the id of the one being replaced,
/// in which case only the name changes. The recorded winner of a completed match is
/// left as it is; reopen the match and report it again to change the outcome.
pub fn replace_participant(
    bracket: &mut Bracket,
    match_id: MatchId,
    position: Position,
    participant: Participant,
) -> Result<Participant, BracketError> {
    let game = bracket
        .get(match_id)
        .ok_or(StateError::MatchNotFound(match_id))?;
    let Slot::Entrant(previous) = game.slot(position) else {
        return Err(StateError::SlotNotFilled {
            id: match_id,
            position,
        }
        .into());
    };
    // Anyone already entered sits in some slot of the bracket; writing them into a
    // second one could pair them against themselves later on.
    if participant.id != previous.id
        && bracket.participants.iter().any(|p| p.id == participant.id)
    {
        return Err(InputError::DuplicateParticipant(participant.id).into());
    }
    let previous = previous.clone();

    log::info!(
        "Match {} slot {:?}: {} replaced by {}",
        match_id,
        position,
        previous.name,
        participant.name
    );
    match bracket.participants.iter_mut().find(|p| p.id == participant.id) {
        Some(entry) => entry.name = participant.name.clone(),
        None => bracket.participants.push(participant.clone()),
    }
    if let Some(game) = bracket.get_mut(match_id) {
        *game.slot_mut(position) = Slot::Entrant(participant);
    }
    Ok(previous)
}

/// Take back the result of a played match so it becomes `Ready` again.
///
/// Only matches decided by a report can be reopened, and only while nothing they fed
/// has been completed. The slots they filled downstream go back to pending. Reopening
/// the grand final also removes a decider it created, as long as the decider is unplayed.
pub fn reopen_match(bracket: &mut Bracket, match_id: MatchId) -> Result<(), BracketError> {
    let game = bracket
        .get(match_id)
        .ok_or(StateError::MatchNotFound(match_id))?;
    if !game.is_completed() {
        return Err(StateError::NotCompleted(match_id).into());
    }
    if game.was_walkover() || game.winner_position.is_none() {
        return Err(StateError::DecidedByBye(match_id).into());
    }
    let targets = [
        (game.winner_target, Route::Winner),
        (game.loser_target, Route::Loser),
    ];
    for target in targets.iter().filter_map(|(t, _)| *t) {
        if bracket.get(target).is_some_and(|t| t.is_completed()) {
            return Err(StateError::DownstreamCompleted {
                id: match_id,
                downstream: target,
            }
            .into());
        }
    }

    if bracket.decider.is_some() && bracket.grand_final == Some(match_id) {
        remove_decider(bracket, match_id);
    } else {
        for (target, route) in targets {
            let Some(target) = target else { continue };
            let Some(position) = bracket.target_position(target, match_id, route) else {
                continue;
            };
            if let Some(downstream) = bracket.get_mut(target) {
                *downstream.slot_mut(position) = Slot::Pending;
                downstream.status = MatchStatus::Pending;
            }
        }
    }

    if let Some(game) = bracket.get_mut(match_id) {
        game.status = MatchStatus::Ready;
        game.winner = None;
        game.winner_position = None;
    }
    log::info!("Match {} reopened", match_id);
    Ok(())
}
