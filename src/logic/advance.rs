//! Round advancement: detect a completed round and draft the next one, or
//! crown the champion.

use crate::models::{
    EntrantId, GameMatch, MatchStatus, Side, TournamentError, TournamentId, TournamentStatus,
};
use crate::store::{TournamentStore, TournamentUpdate};
use serde::Serialize;

/// Outcome of an advancement check. Only `TournamentNotFound` and corrupt
/// match state are errors; everything here is a valid answer to "anything to
/// do for this tournament?".
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Advancement {
    /// The current round has no matches; the tournament has ended.
    RoundHasNoMatches,
    /// Some matches are still unplayed; nothing was changed.
    RoundIncomplete { pending: usize },
    /// The next round was drafted (or already exists, for a repeated call).
    RoundAdvanced { round: u32, new_matches: usize },
    /// One side remains; the tournament is complete.
    TournamentCompleted { champion: EntrantId },
}

/// Check the tournament's current round and advance the bracket if every
/// match is completed.
///
/// Winning sides are rebuilt from each match in `match_number` order, which
/// makes the next-round pairing deterministic: sides of matches 1 and 2 meet,
/// 3 and 4 meet, and so on. Advancement happens at most once per round: the
/// store-level claim on `current_round` makes a repeated (or racing) call
/// report the existing next round instead of drafting a duplicate.
pub fn advance_round<S: TournamentStore>(
    store: &mut S,
    tournament_id: TournamentId,
) -> Result<Advancement, TournamentError> {
    let tournament = store
        .find_tournament(tournament_id)
        .ok_or(TournamentError::TournamentNotFound(tournament_id))?;

    // Replay after completion stays idempotent: same champion, no writes.
    if tournament.status == TournamentStatus::Completed {
        if let Some(champion) = tournament.champion {
            return Ok(Advancement::TournamentCompleted { champion });
        }
    }

    let round = tournament.current_round;
    let matches = store.matches_for_round(tournament_id, round);
    if matches.is_empty() {
        return Ok(Advancement::RoundHasNoMatches);
    }

    let pending = matches
        .iter()
        .filter(|m| m.status != MatchStatus::Completed)
        .count();
    if pending > 0 {
        return Ok(Advancement::RoundIncomplete { pending });
    }

    let team_size = tournament.format.team_size();
    let winners = matches
        .iter()
        .map(|m| m.winning_side(team_size))
        .collect::<Result<Vec<Side>, _>>()?;

    if winners.len() == 1 {
        let champion = winners[0].representative();
        store.update_tournament(
            tournament_id,
            TournamentUpdate {
                status: Some(TournamentStatus::Completed),
                champion: Some(champion),
                ..Default::default()
            },
        );
        log::info!("Tournament {tournament_id} completed; champion {champion}");
        return Ok(Advancement::TournamentCompleted { champion });
    }

    // Round 1 byes guarantee a power-of-two field, so an odd count here means
    // a match was voided externally. Refuse instead of dropping a side.
    if winners.len() % 2 != 0 {
        return Err(TournamentError::UnpairableSides {
            count: winners.len(),
        });
    }

    let next_round = round + 1;
    if !store.claim_round_advance(tournament_id, round) {
        // Lost the claim: another call drafted this round already.
        let existing = store.matches_for_round(tournament_id, next_round).len();
        return Ok(Advancement::RoundAdvanced {
            round: next_round,
            new_matches: existing,
        });
    }

    let new_matches: Vec<GameMatch> = winners
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            GameMatch::scheduled(
                tournament_id,
                next_round,
                i as u32 + 1,
                &pair[0],
                &pair[1],
                tournament.scheduled_time,
            )
        })
        .collect();
    let created = new_matches.len();
    store.insert_matches(new_matches);

    log::info!(
        "Round {round} of tournament {tournament_id} completed; drafted {created} match(es) for round {next_round}"
    );
    Ok(Advancement::RoundAdvanced {
        round: next_round,
        new_matches: created,
    })
}
