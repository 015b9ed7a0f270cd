//! Winner recording: complete one match, then roll the round forward.

use crate::logic::advance::{advance_round, Advancement};
use crate::models::{EntrantId, GameMatch, MatchId, MatchStatus, TournamentError};
use crate::store::{MatchUpdate, TournamentStore};

/// Record the winner of a match and attempt to advance its tournament.
///
/// The winner id is one representative of the winning side; it must appear in
/// the match's participant list. A completed match never changes again, so a
/// second call fails with `MatchAlreadyCompleted` even for the same winner.
pub fn record_winner<S: TournamentStore>(
    store: &mut S,
    match_id: MatchId,
    winner: EntrantId,
) -> Result<(GameMatch, Advancement), TournamentError> {
    let game_match = store
        .find_match(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    if game_match.status == MatchStatus::Completed {
        return Err(TournamentError::MatchAlreadyCompleted(match_id));
    }
    if !game_match.participants.contains(&winner) {
        return Err(TournamentError::WinnerNotParticipant(winner));
    }

    let updated = store
        .update_match(
            match_id,
            MatchUpdate {
                status: Some(MatchStatus::Completed),
                winner: Some(winner),
            },
        )
        .ok_or(TournamentError::MatchNotFound(match_id))?;

    log::info!(
        "Match {} (round {}) of tournament {} completed",
        updated.match_number,
        updated.round,
        updated.tournament
    );

    let advancement = advance_round(store, updated.tournament)?;
    Ok((updated, advancement))
}
