//! Integration tests for winner recording and bracket advancement.

use bracket_tournament_web::{
    advance_round, create_first_round, record_winner, Advancement, EntrantId, GameMatch,
    MatchFormat, MatchStatus, MemoryStore, Side, Tournament, TournamentError, TournamentId,
    TournamentStatus, TournamentStore,
};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

fn drafted(n: usize, format: MatchFormat, seed: u64) -> (MemoryStore, TournamentId) {
    let mut store = MemoryStore::new();
    let mut tournament = Tournament::new("Office Open", format, Utc::now());
    let entrants: Vec<EntrantId> = (0..n).map(|_| Uuid::new_v4()).collect();
    tournament.entrants = entrants.clone();
    let id = tournament.id;
    let scheduled = tournament.scheduled_time;
    store.insert_tournament(tournament);
    let mut rng = StdRng::seed_from_u64(seed);
    create_first_round(&mut store, &mut rng, id, &entrants, scheduled, format.team_size()).unwrap();
    (store, id)
}

/// Matches of the current round still waiting to be played.
fn open_matches(store: &MemoryStore, id: TournamentId) -> Vec<GameMatch> {
    let round = store.find_tournament(id).unwrap().current_round;
    store
        .matches_for_round(id, round)
        .into_iter()
        .filter(|m| m.status != MatchStatus::Completed)
        .collect()
}

#[test]
fn advance_reports_incomplete_round_without_mutation() {
    let (mut store, id) = drafted(4, MatchFormat::OneVOne, 3);
    assert_eq!(
        advance_round(&mut store, id),
        Ok(Advancement::RoundIncomplete { pending: 2 })
    );
    assert!(store.matches_for_round(id, 2).is_empty());
    assert_eq!(store.find_tournament(id).unwrap().current_round, 1);
}

#[test]
fn advance_reports_no_matches_before_draft() {
    let mut store = MemoryStore::new();
    let tournament = Tournament::new("Office Open", MatchFormat::OneVOne, Utc::now());
    let id = tournament.id;
    store.insert_tournament(tournament);
    assert_eq!(
        advance_round(&mut store, id),
        Ok(Advancement::RoundHasNoMatches)
    );
}

#[test]
fn advance_fails_for_unknown_tournament() {
    let mut store = MemoryStore::new();
    let id = Uuid::new_v4();
    assert_eq!(
        advance_round(&mut store, id),
        Err(TournamentError::TournamentNotFound(id))
    );
}

#[test]
fn recording_last_winner_drafts_the_next_round() {
    let (mut store, id) = drafted(4, MatchFormat::OneVOne, 3);
    let open = open_matches(&store, id);
    assert_eq!(open.len(), 2);

    let (_, advancement) = record_winner(&mut store, open[0].id, open[0].participants[0]).unwrap();
    assert_eq!(advancement, Advancement::RoundIncomplete { pending: 1 });

    let (updated, advancement) =
        record_winner(&mut store, open[1].id, open[1].participants[1]).unwrap();
    assert_eq!(updated.status, MatchStatus::Completed);
    assert_eq!(updated.winner, Some(open[1].participants[1]));
    assert_eq!(
        advancement,
        Advancement::RoundAdvanced { round: 2, new_matches: 1 }
    );

    // The final pairs the two round-1 winners in match order.
    let finals = store.matches_for_round(id, 2);
    assert_eq!(finals.len(), 1);
    assert_eq!(
        finals[0].participants,
        vec![open[0].participants[0], open[1].participants[1]]
    );
    assert_eq!(store.find_tournament(id).unwrap().current_round, 2);
}

#[test]
fn repeated_advance_calls_never_duplicate_a_round() {
    let (mut store, id) = drafted(4, MatchFormat::OneVOne, 3);
    for m in open_matches(&store, id) {
        record_winner(&mut store, m.id, m.participants[0]).unwrap();
    }
    let drafted_finals = store.matches_for_round(id, 2);
    assert_eq!(drafted_finals.len(), 1);

    // The round already advanced; further calls see the unfinished final.
    for _ in 0..3 {
        assert_eq!(
            advance_round(&mut store, id),
            Ok(Advancement::RoundIncomplete { pending: 1 })
        );
        assert_eq!(store.matches_for_round(id, 2), drafted_finals);
    }
}

#[test]
fn winner_must_be_a_participant() {
    let (mut store, id) = drafted(4, MatchFormat::OneVOne, 5);
    let open = open_matches(&store, id);
    let outsider = Uuid::new_v4();
    assert_eq!(
        record_winner(&mut store, open[0].id, outsider),
        Err(TournamentError::WinnerNotParticipant(outsider))
    );
    // No mutation happened.
    assert_eq!(
        store.find_match(open[0].id).unwrap().status,
        MatchStatus::Scheduled
    );

    // Same check for team-wide sides.
    let (mut store, id) = drafted(8, MatchFormat::TwoVTwo, 5);
    let open = open_matches(&store, id);
    assert_eq!(
        record_winner(&mut store, open[0].id, outsider),
        Err(TournamentError::WinnerNotParticipant(outsider))
    );
}

#[test]
fn recorded_winners_are_immutable() {
    let (mut store, id) = drafted(4, MatchFormat::OneVOne, 7);
    let open = open_matches(&store, id);
    let m = &open[0];
    record_winner(&mut store, m.id, m.participants[0]).unwrap();
    // Even re-recording the same winner is refused.
    assert_eq!(
        record_winner(&mut store, m.id, m.participants[0]),
        Err(TournamentError::MatchAlreadyCompleted(m.id))
    );
}

#[test]
fn recording_fails_for_unknown_match() {
    let (mut store, _) = drafted(4, MatchFormat::OneVOne, 7);
    let missing = Uuid::new_v4();
    assert_eq!(
        record_winner(&mut store, missing, Uuid::new_v4()),
        Err(TournamentError::MatchNotFound(missing))
    );
}

#[test]
fn five_entrant_bracket_runs_to_a_single_champion() {
    // 5 sides -> 3 byes + 1 pairing, then 2 matches, then the final.
    let (mut store, id) = drafted(5, MatchFormat::OneVOne, 11);
    assert_eq!(store.matches_for_round(id, 1).len(), 4);

    let mut rounds_played = 0;
    let mut champion = None;
    while champion.is_none() {
        rounds_played += 1;
        assert!(rounds_played <= 3, "bracket should finish in 3 rounds");
        let mut last = None;
        for m in open_matches(&store, id) {
            let (_, advancement) = record_winner(&mut store, m.id, m.participants[0]).unwrap();
            last = Some(advancement);
        }
        match last.expect("each round has at least one open match") {
            Advancement::TournamentCompleted { champion: c } => champion = Some(c),
            Advancement::RoundAdvanced { .. } => {}
            other => panic!("unexpected advancement: {other:?}"),
        }
    }
    assert_eq!(rounds_played, 3); // log2(next_pow2(5))

    let tournament = store.find_tournament(id).unwrap();
    assert_eq!(tournament.status, TournamentStatus::Completed);
    assert_eq!(tournament.champion, champion);
}

#[test]
fn team_bracket_advances_whole_sides_and_crowns_a_representative() {
    // 8 entrants, 2v2: 4 sides, no byes, 2 semis then a final.
    let (mut store, id) = drafted(8, MatchFormat::TwoVTwo, 13);
    let semis = open_matches(&store, id);
    assert_eq!(semis.len(), 2);

    // Side B of match 1 wins (reported via its second member), side A of match 2.
    record_winner(&mut store, semis[0].id, semis[0].participants[3]).unwrap();
    let (_, advancement) = record_winner(&mut store, semis[1].id, semis[1].participants[0]).unwrap();
    assert_eq!(
        advancement,
        Advancement::RoundAdvanced { round: 2, new_matches: 1 }
    );

    // The final holds both full winning sides, in match order.
    let finals = store.matches_for_round(id, 2);
    assert_eq!(finals.len(), 1);
    let expected: Vec<EntrantId> = semis[0].participants[2..4]
        .iter()
        .chain(&semis[1].participants[0..2])
        .copied()
        .collect();
    assert_eq!(finals[0].participants, expected);

    // Side B of the final wins; the champion is that side's first member,
    // regardless of which member was reported.
    let (_, advancement) =
        record_winner(&mut store, finals[0].id, finals[0].participants[3]).unwrap();
    assert_eq!(
        advancement,
        Advancement::TournamentCompleted { champion: finals[0].participants[2] }
    );
    assert_eq!(
        store.find_tournament(id).unwrap().champion,
        Some(finals[0].participants[2])
    );
}

#[test]
fn completed_tournament_replays_the_same_champion() {
    let (mut store, id) = drafted(2, MatchFormat::OneVOne, 17);
    let open = open_matches(&store, id);
    let winner = open[0].participants[0];
    let (_, advancement) = record_winner(&mut store, open[0].id, winner).unwrap();
    assert_eq!(advancement, Advancement::TournamentCompleted { champion: winner });

    // Advancing again neither changes the champion nor drafts anything.
    assert_eq!(
        advance_round(&mut store, id),
        Ok(Advancement::TournamentCompleted { champion: winner })
    );
    assert_eq!(store.find_tournament(id).unwrap().current_round, 1);
    assert_eq!(store.matches_for_round(id, 2).len(), 0);
}

#[test]
fn odd_survivor_count_is_refused_not_dropped() {
    // Simulate external interference: a completed round of 3 matches, as if
    // one of 4 matches had been deleted. The engine refuses to pair it.
    let mut store = MemoryStore::new();
    let mut tournament = Tournament::new("Office Open", MatchFormat::OneVOne, Utc::now());
    tournament.status = TournamentStatus::Active;
    tournament.current_round = 1;
    let id = tournament.id;
    let scheduled = tournament.scheduled_time;
    store.insert_tournament(tournament);

    let matches: Vec<GameMatch> = (0..3)
        .map(|i| {
            let side_a = Side::new(vec![Uuid::new_v4()]);
            let side_b = Side::new(vec![Uuid::new_v4()]);
            let mut m = GameMatch::scheduled(id, 1, i + 1, &side_a, &side_b, scheduled);
            m.status = MatchStatus::Completed;
            m.winner = Some(side_a.representative());
            m
        })
        .collect();
    store.insert_matches(matches);

    assert_eq!(
        advance_round(&mut store, id),
        Err(TournamentError::UnpairableSides { count: 3 })
    );
    // Nothing was drafted and the round counter did not move.
    assert!(store.matches_for_round(id, 2).is_empty());
    assert_eq!(store.find_tournament(id).unwrap().current_round, 1);
}

#[test]
fn champion_count_matches_bracket_depth_for_many_field_sizes() {
    for n in [2usize, 3, 6, 8, 9, 16] {
        let (mut store, id) = drafted(n, MatchFormat::OneVOne, n as u64);
        let expected_rounds = n.next_power_of_two().trailing_zeros();
        let mut rounds_played = 0u32;
        loop {
            let open = open_matches(&store, id);
            if open.is_empty() {
                break;
            }
            rounds_played += 1;
            let mut last = None;
            for m in open {
                let (_, adv) = record_winner(&mut store, m.id, m.participants[0]).unwrap();
                last = Some(adv);
            }
            if matches!(last, Some(Advancement::TournamentCompleted { .. })) {
                break;
            }
        }
        assert_eq!(rounds_played, expected_rounds, "{n} entrants");
        let t = store.find_tournament(id).unwrap();
        assert_eq!(t.status, TournamentStatus::Completed, "{n} entrants");
        assert!(t.champion.is_some(), "{n} entrants");
    }
}
