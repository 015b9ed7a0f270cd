//! First-round seeding: shuffle the pool, group sides, resolve byes.

use crate::logic::shuffle::shuffle;
use crate::models::{EntrantId, GameMatch, Side, TournamentError, TournamentId, TournamentStatus};
use crate::store::{TournamentStore, TournamentUpdate};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Partition already-shuffled entrants into consecutive sides of
/// `team_size`. Callers guarantee the length is a multiple of `team_size`
/// (draft validation); any remainder would be dropped by `chunks_exact`.
pub fn group_into_sides(entrants: &[EntrantId], team_size: usize) -> Vec<Side> {
    entrants
        .chunks_exact(team_size)
        .map(|chunk| Side::new(chunk.to_vec()))
        .collect()
}

/// Sides split into automatic advancers and the rest, in draft order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ByeSplit {
    /// Sides that advance without playing round 1.
    pub byes: Vec<Side>,
    /// Sides paired off sequentially into round-1 matches.
    pub paired: Vec<Side>,
}

/// Give the first `next_pow2(S) - S` sides a bye so that the field entering
/// round 2 is always a power of two; later rounds then never need byes.
pub fn split_byes(mut sides: Vec<Side>) -> ByeSplit {
    let bye_count = sides.len().next_power_of_two() - sides.len();
    let paired = sides.split_off(bye_count);
    ByeSplit { byes: sides, paired }
}

/// Draft round 1 of a tournament from its registered entrant pool.
///
/// Bye sides become completed round-1 matches with the side representative
/// as winner; remaining sides are paired in shuffle order into scheduled
/// matches. On success the tournament becomes Active at round 1 and the
/// number of created matches is returned.
pub fn create_first_round<S: TournamentStore, R: Rng>(
    store: &mut S,
    rng: &mut R,
    tournament_id: TournamentId,
    entrant_ids: &[EntrantId],
    scheduled_time: DateTime<Utc>,
    team_size: usize,
) -> Result<usize, TournamentError> {
    let tournament = store
        .find_tournament(tournament_id)
        .ok_or(TournamentError::TournamentNotFound(tournament_id))?;
    if !tournament.accepts_entrants() {
        return Err(TournamentError::DraftNotAllowed(tournament.status));
    }

    let required = team_size * 2;
    if entrant_ids.len() < required {
        return Err(TournamentError::InsufficientEntrants {
            required,
            have: entrant_ids.len(),
        });
    }
    if entrant_ids.len() % team_size != 0 {
        return Err(TournamentError::InvalidPlayerCount {
            count: entrant_ids.len(),
            team_size,
        });
    }

    let mut pool = entrant_ids.to_vec();
    shuffle(&mut pool, rng);

    let sides = group_into_sides(&pool, team_size);
    let ByeSplit { byes, paired } = split_byes(sides);

    let mut matches = Vec::with_capacity(byes.len() + paired.len() / 2);
    let mut match_number = 1u32;

    for side in &byes {
        matches.push(GameMatch::bye(
            tournament_id,
            1,
            match_number,
            side,
            scheduled_time,
        ));
        match_number += 1;
    }
    for pair in paired.chunks_exact(2) {
        matches.push(GameMatch::scheduled(
            tournament_id,
            1,
            match_number,
            &pair[0],
            &pair[1],
            scheduled_time,
        ));
        match_number += 1;
    }

    let created = matches.len();
    store.insert_matches(matches);
    store.update_tournament(
        tournament_id,
        TournamentUpdate {
            status: Some(TournamentStatus::Active),
            current_round: Some(1),
            ..Default::default()
        },
    );

    log::info!(
        "Drafted round 1 for tournament {tournament_id}: {created} match(es), {} bye(s)",
        byes.len()
    );
    Ok(created)
}
