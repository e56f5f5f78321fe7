//! Result propagation: report a winner, forward winner and loser into the linked
//! matches, and let byes complete matches on their own.

use crate::logic::builder::append_decider;
use crate::models::{
    Bracket, BracketError, Format, MatchId, MatchStatus, Position, Route, Slot, StateError,
};

/// Record the winner of a ready match and advance both participants.
///
/// Fails with `InvalidState` unless the match exists and is `Ready`; nothing is
/// modified in that case. On success the winner moves to `winner_target` and the
/// loser to `loser_target`. Any match that ends up facing a bye completes on its
/// own, and so on downstream until nothing else can be resolved.
pub fn report_result(
    bracket: &mut Bracket,
    match_id: MatchId,
    winner: Position,
) -> Result<(), BracketError> {
    let game = bracket
        .get(match_id)
        .ok_or(StateError::MatchNotFound(match_id))?;
    if game.status != MatchStatus::Ready {
        return Err(StateError::NotReady {
            id: match_id,
            status: game.status,
        }
        .into());
    }

    if let Some(p) = game.slot(winner).participant() {
        log::info!("Match {} ({:?} round {}): {} wins", match_id, game.side, game.round, p.name);
    }

    let touched = complete(bracket, match_id, Some(winner));
    settle(bracket, touched);
    Ok(())
}

/// Re-evaluate matches whose slots may have changed, cascading through byes.
///
/// A match with both slots filled by participants becomes `Ready`. A match with a
/// bye against a participant completes with the participant as winner. Two byes
/// complete with no winner and send a bye onward.
pub(crate) fn settle(bracket: &mut Bracket, mut queue: Vec<MatchId>) {
    while let Some(id) = queue.pop() {
        let Some(game) = bracket.get_mut(id) else {
            continue;
        };
        if game.is_completed() {
            continue;
        }
        let walkover = match (&game.slot_a, &game.slot_b) {
            (Slot::Pending, _) | (_, Slot::Pending) => {
                game.status = MatchStatus::Pending;
                None
            }
            (Slot::Entrant(_), Slot::Entrant(_)) => {
                game.status = MatchStatus::Ready;
                None
            }
            (Slot::Entrant(_), Slot::Bye) => Some(Some(Position::A)),
            (Slot::Bye, Slot::Entrant(_)) => Some(Some(Position::B)),
            (Slot::Bye, Slot::Bye) => Some(None),
        };
        if let Some(winner) = walkover {
            log::debug!("Match {} resolved by bye", id);
            queue.extend(complete(bracket, id, winner));
        }
    }
}

/// Mark `id` completed and place its winner and loser downstream.
/// Returns the matches whose slots changed.
fn complete(bracket: &mut Bracket, id: MatchId, winner: Option<Position>) -> Vec<MatchId> {
    let Some(game) = bracket.get_mut(id) else {
        return Vec::new();
    };
    let (advancing, eliminated) = match winner {
        Some(p) => (game.slot(p).clone(), game.slot(p.other()).clone()),
        None => (Slot::Bye, Slot::Bye),
    };
    game.status = MatchStatus::Completed;
    game.winner = advancing.participant().cloned();
    game.winner_position = winner;
    let mut targets = (game.winner_target, game.loser_target);

    if needs_decider(bracket, id, winner, &eliminated) {
        let decider = append_decider(bracket, id);
        targets = (Some(decider), Some(decider));
    }

    let mut touched = Vec::with_capacity(2);
    if let Some(target) = targets.0 {
        place(bracket, target, id, Route::Winner, advancing);
        touched.push(target);
    }
    if let Some(target) = targets.1 {
        place(bracket, target, id, Route::Loser, eliminated);
        if !touched.contains(&target) {
            touched.push(target);
        }
    }
    touched
}

/// The losers-bracket entrant (slot B) beat a real opponent in the grand final of a
/// double-elimination bracket that allows a decider.
fn needs_decider(
    bracket: &Bracket,
    id: MatchId,
    winner: Option<Position>,
    eliminated: &Slot,
) -> bool {
    bracket.config.format == Format::Double
        && bracket.config.consolation_final
        && bracket.grand_final == Some(id)
        && bracket.decider.is_none()
        && winner == Some(Position::B)
        && eliminated.participant().is_some()
}

fn place(bracket: &mut Bracket, target: MatchId, feeder: MatchId, route: Route, slot: Slot) {
    let Some(position) = bracket.target_position(target, feeder, route) else {
        return;
    };
    if let Some(game) = bracket.get_mut(target) {
        *game.slot_mut(position) = slot;
    }
}
