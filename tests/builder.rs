//! Integration tests for bracket construction: shape, links, byes, validation.

use knockout_bracket::{
    build_bracket, create_bracket, Bracket, BracketConfig, BracketError, InputError,
    MatchStatus, Participant, Side, Slot,
};

fn participants(n: u32) -> Vec<Participant> {
    (1..=n).map(|i| Participant::new(i, format!("P{i}"))).collect()
}

fn entrant(id: u32) -> Slot {
    Slot::Entrant(Participant::new(id, format!("P{id}")))
}

fn size_for(n: u32) -> usize {
    (n as usize).next_power_of_two()
}

/// Structure without ids: side, round, slot contents and status, in build order.
fn shape(bracket: &Bracket) -> Vec<(Side, u32, Slot, Slot, MatchStatus, usize)> {
    bracket
        .matches
        .iter()
        .map(|m| {
            (
                m.side,
                m.round,
                m.slot_a.clone(),
                m.slot_b.clone(),
                m.status,
                m.feeders.len(),
            )
        })
        .collect()
}

#[test]
fn single_elimination_match_counts() {
    for n in 2..=40 {
        let b = create_bracket(&participants(n), BracketConfig::single()).unwrap();
        let size = size_for(n);
        assert_eq!(b.side(Side::Winners).count(), size - 1, "n = {n}");
        assert_eq!(b.side(Side::Losers).count(), 0);
        assert_eq!(b.side(Side::Final).count(), 0);
        assert_eq!(b.round(Side::Winners, 1).len(), size / 2);
    }
}

#[test]
fn double_elimination_match_counts() {
    for n in 2..=40 {
        let b = create_bracket(&participants(n), BracketConfig::double()).unwrap();
        let size = size_for(n);
        let rounds = size.trailing_zeros();
        assert_eq!(b.side(Side::Winners).count(), size - 1, "n = {n}");
        assert_eq!(b.side(Side::Losers).count(), size - 2, "n = {n}");
        assert_eq!(b.side(Side::Final).count(), 1, "n = {n}");
        let last_losers_round = b.side(Side::Losers).map(|m| m.round).max().unwrap_or(0);
        assert_eq!(last_losers_round, 2 * (rounds - 1));
    }
}

#[test]
fn links_are_symmetric_for_every_shape() {
    for n in 2..=33 {
        for config in [
            BracketConfig::single(),
            BracketConfig::double(),
            BracketConfig::double().with_consolation_final(n >= 3),
            BracketConfig::single().with_consolation_final(n >= 3),
        ] {
            let b = create_bracket(&participants(n), config).unwrap();
            assert!(b.links_are_symmetric(), "n = {n}, {config:?}");
            for m in &b.matches {
                for target in [m.winner_target, m.loser_target].into_iter().flatten() {
                    assert!(b.get(target).unwrap().feeders.contains(&m.id));
                }
            }
        }
    }
}

#[test]
fn exactly_one_terminal_match() {
    for n in 2..=20 {
        for config in [BracketConfig::single(), BracketConfig::double()] {
            let b = create_bracket(&participants(n), config).unwrap();
            let terminals: Vec<_> = b
                .matches
                .iter()
                .filter(|m| m.winner_target.is_none() && m.loser_target.is_none())
                .map(|m| m.id)
                .collect();
            assert_eq!(terminals, vec![b.terminal], "n = {n}, {config:?}");
        }
    }
}

#[test]
fn winners_rounds_pair_consecutive_matches() {
    let b = create_bracket(&participants(8), BracketConfig::single()).unwrap();
    let first = b.round(Side::Winners, 1);
    let second = b.round(Side::Winners, 2);
    assert_eq!(second.len(), 2);
    for (i, m) in second.iter().enumerate() {
        assert_eq!(m.feeders, vec![first[2 * i].id, first[2 * i + 1].id]);
        assert_eq!(first[2 * i].winner_target, Some(m.id));
        assert_eq!(first[2 * i + 1].winner_target, Some(m.id));
    }
    assert_eq!(b.round(Side::Winners, 3).len(), 1);
}

#[test]
fn losers_bracket_alternates_consolidation_and_drop_ins() {
    let b = create_bracket(&participants(8), BracketConfig::double()).unwrap();
    let w1 = b.round(Side::Winners, 1);
    let w2 = b.round(Side::Winners, 2);
    let w3 = b.round(Side::Winners, 3);
    let l1 = b.round(Side::Losers, 1);
    let l2 = b.round(Side::Losers, 2);
    let l3 = b.round(Side::Losers, 3);
    let l4 = b.round(Side::Losers, 4);
    assert_eq!([l1.len(), l2.len(), l3.len(), l4.len()], [2, 2, 1, 1]);

    // Round 1 of the losers bracket takes only losers of winners round 1.
    for (i, m) in l1.iter().enumerate() {
        assert_eq!(m.feeders, vec![w1[2 * i].id, w1[2 * i + 1].id]);
        assert_eq!(w1[2 * i].loser_target, Some(m.id));
    }
    // Drop-in rounds meet a survivor with a loser from the next winners round.
    for (i, m) in l2.iter().enumerate() {
        assert_eq!(m.feeders, vec![l1[i].id, w2[i].id]);
        assert_eq!(w2[i].loser_target, Some(m.id));
    }
    assert_eq!(l3[0].feeders, vec![l2[0].id, l2[1].id]);
    assert_eq!(l4[0].feeders, vec![l3[0].id, w3[0].id]);
    assert_eq!(w3[0].loser_target, Some(l4[0].id));

    let gf = b.get(b.grand_final.unwrap()).unwrap();
    assert_eq!(gf.side, Side::Final);
    assert_eq!(gf.feeders, vec![w3[0].id, l4[0].id]);
    assert_eq!(b.terminal, gf.id);
}

#[test]
fn drops_always_come_from_an_earlier_match() {
    for n in 2..=33 {
        let b = create_bracket(&participants(n), BracketConfig::double()).unwrap();
        for m in &b.matches {
            assert!(m.feeders.iter().all(|f| *f < m.id), "n = {n}, match {}", m.id);
        }
    }
}

#[test]
fn two_slot_double_elimination_sends_the_loser_to_the_final() {
    let b = create_bracket(&participants(2), BracketConfig::double()).unwrap();
    assert_eq!(b.matches.len(), 2);
    let opener = &b.matches[0];
    let gf = &b.matches[1];
    assert_eq!(opener.winner_target, Some(gf.id));
    assert_eq!(opener.loser_target, Some(gf.id));
    assert_eq!(gf.feeders, vec![opener.id, opener.id]);
}

#[test]
fn single_elimination_consolation_adds_a_third_place_match() {
    let b = create_bracket(
        &participants(4),
        BracketConfig::single().with_consolation_final(true),
    )
    .unwrap();
    let semis = b.round(Side::Winners, 1);
    let third = b.get(b.third_place.unwrap()).unwrap();
    assert_eq!(third.side, Side::Final);
    assert_eq!(third.feeders, vec![semis[0].id, semis[1].id]);
    assert!(semis.iter().all(|m| m.loser_target == Some(third.id)));
    assert_eq!(b.terminal, b.round(Side::Winners, 2)[0].id);
}

#[test]
fn double_elimination_consolation_does_not_schedule_the_decider_up_front() {
    let b = create_bracket(
        &participants(5),
        BracketConfig::double().with_consolation_final(true),
    )
    .unwrap();
    assert_eq!(b.decider, None);
    assert_eq!(b.side(Side::Final).count(), 1);
}

#[test]
fn bye_matches_are_completed_after_build() {
    let b = create_bracket(&participants(3), BracketConfig::single()).unwrap();
    let opening = b.round(Side::Winners, 1);
    assert_eq!(opening[0].status, MatchStatus::Ready);
    assert_eq!(opening[1].status, MatchStatus::Completed);
    assert_eq!(opening[1].winner.as_ref().map(|p| p.name.as_str()), Some("P3"));

    let final_match = b.get(b.terminal).unwrap();
    assert_eq!(final_match.status, MatchStatus::Pending);
    assert_eq!(final_match.slot_b.participant().map(|p| p.id), Some(3));
}

#[test]
fn consecutive_byes_cascade() {
    // P1 has byes all the way to the final.
    let slots = vec![
        entrant(1),
        Slot::Bye,
        Slot::Bye,
        Slot::Bye,
        entrant(2),
        entrant(3),
        entrant(4),
        entrant(5),
    ];
    let b = build_bracket(slots, BracketConfig::single()).unwrap();
    let r2 = b.round(Side::Winners, 2);
    assert_eq!(r2[0].status, MatchStatus::Completed);
    assert_eq!(r2[0].winner.as_ref().map(|p| p.id), Some(1));
    let final_match = b.get(b.terminal).unwrap();
    assert_eq!(final_match.slot_a.participant().map(|p| p.id), Some(1));
    assert_eq!(final_match.status, MatchStatus::Pending);
}

#[test]
fn byes_reach_the_losers_bracket_and_resolve() {
    let b = create_bracket(&participants(5), BracketConfig::double()).unwrap();
    // P3, P4 and P5 sit opposite byes: their byes meet each other or a real loser.
    let l1 = b.round(Side::Losers, 1);
    assert_eq!(l1[0].slot_b, Slot::Bye);
    assert_eq!(l1[0].status, MatchStatus::Pending);
    assert_eq!(l1[1].status, MatchStatus::Completed);
    assert_eq!(l1[1].winner, None);
    assert_eq!(l1[1].winner_position, None);
    let l2 = b.round(Side::Losers, 2);
    assert_eq!(l2[1].slot_a, Slot::Bye);
    for m in b.matches.iter().filter(|m| m.is_completed()) {
        let has_participant = m.slot_a.participant().is_some() || m.slot_b.participant().is_some();
        assert_eq!(m.winner.is_some(), has_participant, "match {}", m.id);
    }
}

#[test]
fn building_twice_gives_the_same_graph() {
    let config = BracketConfig::double().with_consolation_final(true);
    let a = create_bracket(&participants(11), config).unwrap();
    let b = create_bracket(&participants(11), config).unwrap();
    assert_eq!(shape(&a), shape(&b));
    assert_eq!(a, b);
}

#[test]
fn slot_count_must_be_a_power_of_two() {
    let slots = vec![entrant(1), entrant(2), entrant(3)];
    assert_eq!(
        build_bracket(slots, BracketConfig::single()),
        Err(BracketError::InvalidInput(InputError::SlotCountNotPowerOfTwo(3)))
    );
}

#[test]
fn consolation_needs_four_slots() {
    let slots = vec![entrant(1), entrant(2)];
    assert_eq!(
        build_bracket(slots, BracketConfig::double().with_consolation_final(true)),
        Err(BracketError::InvalidInput(InputError::ConsolationNeedsFourSlots(2)))
    );
}

#[test]
fn pending_seed_is_rejected() {
    let slots = vec![entrant(1), Slot::Pending];
    assert_eq!(
        build_bracket(slots, BracketConfig::single()),
        Err(BracketError::InvalidInput(InputError::PendingSeed(1)))
    );
}

#[test]
fn single_participant_cannot_be_built() {
    assert_eq!(
        create_bracket(&participants(1), BracketConfig::single()),
        Err(BracketError::InvalidInput(InputError::TooFewSlots(1)))
    );
    let slots = vec![entrant(1), Slot::Bye];
    assert_eq!(
        build_bracket(slots, BracketConfig::single()),
        Err(BracketError::InvalidInput(InputError::TooFewParticipants(1)))
    );
}

#[test]
fn duplicate_slots_are_rejected() {
    let slots = vec![entrant(1), entrant(2), entrant(1), Slot::Bye];
    assert!(matches!(
        build_bracket(slots, BracketConfig::single()),
        Err(BracketError::InvalidInput(InputError::DuplicateParticipant(1)))
    ));
}
