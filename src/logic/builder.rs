//! Bracket construction: winners rounds, losers rounds, grand final, third-place
//! match, and the decider that is appended only when a grand final calls for it.

use crate::logic::propagation::settle;
use crate::models::{
    Bracket, BracketConfig, BracketError, Format, InputError, MatchId, Route, Side, Slot,
};
use std::collections::HashSet;

/// Build the full match graph for a seeded slot list.
///
/// Winners round 1 takes the slots two at a time; each later round pairs the
/// previous round's matches in order. In double elimination the losers bracket
/// alternates between pairing its own survivors and taking in the losers of the
/// next winners round, and the grand final joins both champions. Byes are resolved
/// before returning, so any opening match with a bye is already completed.
pub fn build_bracket(slots: Vec<Slot>, config: BracketConfig) -> Result<Bracket, BracketError> {
    validate(&slots, &config)?;

    let size = slots.len();
    let participants = slots
        .iter()
        .filter_map(|s| s.participant().cloned())
        .collect();
    let mut bracket = Bracket::empty(config, participants);

    let winners = build_winners(&mut bracket, slots);
    let winners_final = winners[winners.len() - 1][0];

    match config.format {
        Format::Single => {
            bracket.terminal = winners_final;
            if config.consolation_final {
                let semis = &winners[winners.len() - 2];
                let third = bracket.push_match(1, Side::Final).id;
                bracket.link(semis[0], third, Route::Loser);
                bracket.link(semis[1], third, Route::Loser);
                bracket.third_place = Some(third);
            }
        }
        Format::Double => {
            let losers = build_losers(&mut bracket, &winners);
            let grand_final = bracket.push_match(1, Side::Final).id;
            bracket.link(winners_final, grand_final, Route::Winner);
            match losers.last().and_then(|round| round.first()) {
                Some(&losers_final) => bracket.link(losers_final, grand_final, Route::Winner),
                // Two slots: the only winners match sends its loser straight to the final.
                None => bracket.link(winners_final, grand_final, Route::Loser),
            }
            bracket.grand_final = Some(grand_final);
            bracket.terminal = grand_final;
        }
    }

    log::info!(
        "Built {:?} bracket: {} slots, {} matches, {} participants",
        config.format,
        size,
        bracket.matches.len(),
        bracket.participants.len()
    );

    let openers: Vec<MatchId> = bracket
        .matches
        .iter()
        .filter(|m| m.is_opening())
        .map(|m| m.id)
        .collect();
    settle(&mut bracket, openers);

    Ok(bracket)
}

fn validate(slots: &[Slot], config: &BracketConfig) -> Result<(), BracketError> {
    if slots.len() < 2 {
        return Err(InputError::TooFewSlots(slots.len()).into());
    }
    if !slots.len().is_power_of_two() {
        return Err(InputError::SlotCountNotPowerOfTwo(slots.len()).into());
    }
    if config.consolation_final && slots.len() < 4 {
        return Err(InputError::ConsolationNeedsFourSlots(slots.len()).into());
    }
    if let Some(index) = slots.iter().position(|s| !s.is_resolved()) {
        return Err(InputError::PendingSeed(index).into());
    }
    let mut seen = HashSet::new();
    for p in slots.iter().filter_map(Slot::participant) {
        if !seen.insert(p.id) {
            return Err(InputError::DuplicateParticipant(p.id).into());
        }
    }
    if seen.len() < 2 {
        return Err(InputError::TooFewParticipants(seen.len()).into());
    }
    Ok(())
}

/// Winners rounds, first to last. The last round holds the single winners final.
fn build_winners(bracket: &mut Bracket, slots: Vec<Slot>) -> Vec<Vec<MatchId>> {
    let mut opening = Vec::with_capacity(slots.len() / 2);
    let mut slots = slots.into_iter();
    while let (Some(a), Some(b)) = (slots.next(), slots.next()) {
        let game = bracket.push_match(1, Side::Winners);
        game.slot_a = a;
        game.slot_b = b;
        opening.push(game.id);
    }

    let mut rounds = vec![opening];
    let mut round = 2;
    while rounds[rounds.len() - 1].len() > 1 {
        let previous = &rounds[rounds.len() - 1];
        let next: Vec<MatchId> = previous
            .chunks(2)
            .map(|pair| {
                let id = bracket.push_match(round, Side::Winners).id;
                bracket.link(pair[0], id, Route::Winner);
                bracket.link(pair[1], id, Route::Winner);
                id
            })
            .collect();
        rounds.push(next);
        round += 1;
    }
    rounds
}

/// Losers rounds, first to last; empty when the winners bracket has a single round.
///
/// For each winners round `i >= 2` two losers rounds are added: one that pairs up
/// survivors (the losers of winners round 1, the first time), and one where each
/// survivor meets a loser dropping from winners round `i`. Drops always come from a
/// round built earlier, so every slot has a feeder that can fill it.
fn build_losers(bracket: &mut Bracket, winners: &[Vec<MatchId>]) -> Vec<Vec<MatchId>> {
    let mut rounds: Vec<Vec<MatchId>> = Vec::new();
    let mut round = 1;

    for drops in winners.iter().skip(1) {
        let (sources, route) = match rounds.last() {
            None => (winners[0].as_slice(), Route::Loser),
            Some(previous) => (previous.as_slice(), Route::Winner),
        };
        let consolidated: Vec<MatchId> = sources
            .chunks(2)
            .map(|pair| {
                let id = bracket.push_match(round, Side::Losers).id;
                bracket.link(pair[0], id, route);
                bracket.link(pair[1], id, route);
                id
            })
            .collect();

        let merged: Vec<MatchId> = consolidated
            .iter()
            .zip(drops)
            .map(|(&survivor, &drop)| {
                let id = bracket.push_match(round + 1, Side::Losers).id;
                bracket.link(survivor, id, Route::Winner);
                bracket.link(drop, id, Route::Loser);
                id
            })
            .collect();

        rounds.push(consolidated);
        rounds.push(merged);
        round += 2;
    }
    rounds
}

/// Append the bracket-reset decider after the grand final; the decider becomes terminal.
pub(crate) fn append_decider(bracket: &mut Bracket, grand_final: MatchId) -> MatchId {
    let id = bracket.push_match(2, Side::Final).id;
    bracket.link(grand_final, id, Route::Winner);
    bracket.link(grand_final, id, Route::Loser);
    bracket.decider = Some(id);
    bracket.terminal = id;
    log::info!("Grand final {} won from the losers bracket; decider {} added", grand_final, id);
    id
}

/// Undo [`append_decider`] for an unplayed decider.
pub(crate) fn remove_decider(bracket: &mut Bracket, grand_final: MatchId) {
    let Some(decider) = bracket.decider.take() else {
        return;
    };
    bracket.remove_match(decider);
    if let Some(gf) = bracket.get_mut(grand_final) {
        gf.winner_target = None;
        gf.loser_target = None;
    }
    bracket.terminal = grand_final;
}
