//! Bracket aggregate and BracketError.

use crate::models::config::BracketConfig;
use crate::models::game::{GameMatch, MatchId, MatchStatus, Position, Side};
use crate::models::participant::{Participant, ParticipantId, Slot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by bracket operations. A failed call leaves the bracket unchanged.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BracketError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
    #[error("invalid state: {0}")]
    InvalidState(#[from] StateError),
}

/// Malformed participant lists, seed lists, rosters and snapshots.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum InputError {
    #[error("participant list is empty")]
    NoParticipants,
    #[error("participant {0} appears more than once")]
    DuplicateParticipant(ParticipantId),
    #[error("slot count {0} is not a power of two")]
    SlotCountNotPowerOfTwo(usize),
    #[error("a bracket needs at least two slots (got {0})")]
    TooFewSlots(usize),
    #[error("a bracket needs at least two participants (got {0})")]
    TooFewParticipants(usize),
    #[error("seed slot {0} is pending")]
    PendingSeed(usize),
    #[error("a consolation final needs at least 4 slots (got {0})")]
    ConsolationNeedsFourSlots(usize),
    #[error("roster: {0}")]
    Roster(String),
    #[error("snapshot: {0}")]
    Snapshot(String),
}

/// Operations attempted on a match that cannot accept them right now.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum StateError {
    #[error("match {0} does not exist")]
    MatchNotFound(MatchId),
    #[error("match {id} is {status:?}, not ready")]
    NotReady { id: MatchId, status: MatchStatus },
    #[error("match {id} has no participant in slot {position:?}")]
    SlotNotFilled { id: MatchId, position: Position },
    #[error("match {0} has not been played")]
    NotCompleted(MatchId),
    #[error("match {0} was decided by a bye")]
    DecidedByBye(MatchId),
    #[error("match {id} already fed match {downstream}, which is completed")]
    DownstreamCompleted { id: MatchId, downstream: MatchId },
}

/// How a feeder reaches its target.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Route {
    Winner,
    Loser,
}

/// All matches of one tournament instance, plus the handles a caller needs to follow it.
///
/// Matches are kept sorted by id. Ids are handed out in build order and never reused,
/// so lookups are a binary search.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub config: BracketConfig,
    /// Real entrants (byes excluded), in seed order.
    pub participants: Vec<Participant>,
    pub matches: Vec<GameMatch>,
    /// Match whose winner takes the tournament: the final, the grand final, or the decider once created.
    pub terminal: MatchId,
    pub grand_final: Option<MatchId>,
    pub decider: Option<MatchId>,
    pub third_place: Option<MatchId>,
    next_id: MatchId,
}

impl Bracket {
    /// Empty bracket; the builder fills it.
    pub(crate) fn empty(config: BracketConfig, participants: Vec<Participant>) -> Self {
        Self {
            config,
            participants,
            matches: Vec::new(),
            terminal: 0,
            grand_final: None,
            decider: None,
            third_place: None,
            next_id: 1,
        }
    }

    /// Append a new match with the next id.
    pub(crate) fn push_match(&mut self, round: u32, side: Side) -> &mut GameMatch {
        let id = self.next_id;
        self.next_id += 1;
        self.matches.push(GameMatch::new(id, round, side));
        let last = self.matches.len() - 1;
        &mut self.matches[last]
    }

    /// Wire `from` into `to`: set the target on `from` and append `from` to `to`'s feeders.
    pub(crate) fn link(&mut self, from: MatchId, to: MatchId, route: Route) {
        if let Some(source) = self.get_mut(from) {
            match route {
                Route::Winner => source.winner_target = Some(to),
                Route::Loser => source.loser_target = Some(to),
            }
        }
        if let Some(target) = self.get_mut(to) {
            target.feeders.push(from);
        }
    }

    /// Slot of `target` that `feeder` fills via `route`. When one match feeds both
    /// slots, its winner takes the first and its loser the last.
    pub(crate) fn target_position(
        &self,
        target: MatchId,
        feeder: MatchId,
        route: Route,
    ) -> Option<Position> {
        let game = self.get(target)?;
        let mut hits = game
            .feeders
            .iter()
            .enumerate()
            .filter(|(_, f)| **f == feeder)
            .map(|(i, _)| i);
        let index = match route {
            Route::Winner => hits.next()?,
            Route::Loser => hits.last()?,
        };
        Some(if index == 0 { Position::A } else { Position::B })
    }

    /// Remove a match that nothing else has started depending on. Used to drop an unplayed decider.
    pub(crate) fn remove_match(&mut self, id: MatchId) {
        self.matches.retain(|m| m.id != id);
    }

    fn index_of(&self, id: MatchId) -> Option<usize> {
        self.matches.binary_search_by_key(&id, |m| m.id).ok()
    }

    pub fn get(&self, id: MatchId) -> Option<&GameMatch> {
        let i = self.index_of(id)?;
        Some(&self.matches[i])
    }

    pub(crate) fn get_mut(&mut self, id: MatchId) -> Option<&mut GameMatch> {
        let i = self.index_of(id)?;
        Some(&mut self.matches[i])
    }

    /// Matches of one side, in id order.
    pub fn side(&self, side: Side) -> impl Iterator<Item = &GameMatch> {
        self.matches.iter().filter(move |m| m.side == side)
    }

    /// Matches of one round of one side, top to bottom.
    pub fn round(&self, side: Side, round: u32) -> Vec<&GameMatch> {
        self.side(side).filter(|m| m.round == round).collect()
    }

    /// Matches waiting for a result.
    pub fn ready_matches(&self) -> impl Iterator<Item = &GameMatch> {
        self.matches
            .iter()
            .filter(|m| m.status == MatchStatus::Ready)
    }

    /// The tournament is over once the terminal match is completed.
    pub fn is_complete(&self) -> bool {
        self.get(self.terminal).is_some_and(GameMatch::is_completed)
    }

    pub fn champion(&self) -> Option<&Participant> {
        self.get(self.terminal)
            .filter(|m| m.is_completed())
            .and_then(|m| m.winner.as_ref())
    }

    /// Every target points at a match that lists the source among its feeders exactly
    /// as many times as the source targets it, and vice versa.
    pub fn links_are_symmetric(&self) -> bool {
        self.matches.iter().all(|m| {
            let targets_ok = [m.winner_target, m.loser_target]
                .into_iter()
                .flatten()
                .all(|t| {
                    let outgoing = [m.winner_target, m.loser_target]
                        .into_iter()
                        .filter(|x| *x == Some(t))
                        .count();
                    self.get(t).is_some_and(|target| {
                        target.feeders.iter().filter(|f| **f == m.id).count() == outgoing
                    })
                });
            let feeders_ok = m.feeders.iter().all(|f| {
                self.get(*f).is_some_and(|feeder| {
                    feeder.winner_target == Some(m.id) || feeder.loser_target == Some(m.id)
                })
            });
            targets_ok && feeders_ok && m.feeders.len() <= 2
        })
    }

    /// Serialize the whole graph for a persistence collaborator.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Reload a snapshot written by [`Bracket::to_json`].
    pub fn from_json(json: &str) -> Result<Self, BracketError> {
        let bracket: Bracket =
            serde_json::from_str(json).map_err(|e| InputError::Snapshot(e.to_string()))?;
        let ordered = bracket.matches.windows(2).all(|w| w[0].id < w[1].id);
        let fresh_ids = bracket.matches.iter().all(|m| m.id < bracket.next_id);
        if !ordered || !fresh_ids {
            return Err(InputError::Snapshot("match ids are out of order".into()).into());
        }
        let handles = [
            Some(bracket.terminal),
            bracket.grand_final,
            bracket.decider,
            bracket.third_place,
        ];
        let mut handles = handles.into_iter().flatten();
        if let Some(missing) = handles.find(|id| bracket.get(*id).is_none()) {
            return Err(InputError::Snapshot(format!("match {missing} is missing")).into());
        }
        if !bracket.links_are_symmetric() {
            return Err(InputError::Snapshot("feeder and target links disagree".into()).into());
        }
        if let Some(m) = bracket.matches.iter().find(|m| !status_matches_slots(m)) {
            let reason = format!("match {} is {:?} but its slots disagree", m.id, m.status);
            return Err(InputError::Snapshot(reason).into());
        }
        Ok(bracket)
    }
}

/// Status and recorded result agree with what the slots hold. A completed winner may
/// differ from its slot after a replacement.
fn status_matches_slots(m: &GameMatch) -> bool {
    let open = m.winner.is_none() && m.winner_position.is_none();
    match m.status {
        MatchStatus::Pending => {
            open && (matches!(m.slot_a, Slot::Pending) || matches!(m.slot_b, Slot::Pending))
        }
        MatchStatus::Ready => {
            open && matches!(
                (&m.slot_a, &m.slot_b),
                (Slot::Entrant(_), Slot::Entrant(_))
            )
        }
        MatchStatus::Completed => match m.winner_position {
            Some(p) => m.winner.is_some() && m.slot(p).participant().is_some(),
            None => m.winner.is_none() && m.slot_a.is_bye() && m.slot_b.is_bye(),
        },
    }
}
