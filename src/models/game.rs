//! Match record and status for bracket play.

use crate::models::entrant::EntrantId;
use crate::models::side::Side;
use crate::models::tournament::{TournamentError, TournamentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Lifecycle of a single match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Completed => "completed",
            MatchStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// A single bracket match.
///
/// `participants` holds side A's entrants followed by side B's (a bye match
/// holds one side only). Side boundaries are not stored; they are recovered
/// by slicing at the tournament's team size.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament: TournamentId,
    /// Round number, starting at 1.
    pub round: u32,
    /// Position within the round; unique per round and the pairing order for
    /// the next round.
    pub match_number: u32,
    pub participants: Vec<EntrantId>,
    pub is_bye: bool,
    pub status: MatchStatus,
    /// One representative entrant of the winning side. None until completed.
    pub winner: Option<EntrantId>,
    pub scheduled_time: DateTime<Utc>,
}

impl GameMatch {
    /// A regular match between two sides, waiting to be played.
    pub fn scheduled(
        tournament: TournamentId,
        round: u32,
        match_number: u32,
        side_a: &Side,
        side_b: &Side,
        scheduled_time: DateTime<Utc>,
    ) -> Self {
        let mut participants = side_a.entrants.clone();
        participants.extend_from_slice(&side_b.entrants);
        Self {
            id: Uuid::new_v4(),
            tournament,
            round,
            match_number,
            participants,
            is_bye: false,
            status: MatchStatus::Scheduled,
            winner: None,
            scheduled_time,
        }
    }

    /// A bye: one side, already completed, the side's representative as winner.
    pub fn bye(
        tournament: TournamentId,
        round: u32,
        match_number: u32,
        side: &Side,
        scheduled_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament,
            round,
            match_number,
            participants: side.entrants.clone(),
            is_bye: true,
            status: MatchStatus::Completed,
            winner: Some(side.representative()),
            scheduled_time,
        }
    }

    /// Rebuild both sides from the participant list (non-bye matches).
    pub fn sides(&self, team_size: usize) -> Result<(Side, Side), TournamentError> {
        if self.is_bye || self.participants.len() != team_size * 2 {
            return Err(TournamentError::MalformedParticipants(self.id));
        }
        let (a, b) = self.participants.split_at(team_size);
        Ok((Side::new(a.to_vec()), Side::new(b.to_vec())))
    }

    /// The side that advances out of this match: the bye side, or whichever
    /// side the recorded winner belongs to.
    pub fn winning_side(&self, team_size: usize) -> Result<Side, TournamentError> {
        if self.is_bye {
            if self.participants.is_empty() || self.participants.len() > team_size {
                return Err(TournamentError::MalformedParticipants(self.id));
            }
            return Ok(Side::new(self.participants.clone()));
        }
        let winner = self
            .winner
            .ok_or(TournamentError::MatchMissingWinner(self.id))?;
        let (side_a, side_b) = self.sides(team_size)?;
        if side_a.contains(winner) {
            Ok(side_a)
        } else if side_b.contains(winner) {
            Ok(side_b)
        } else {
            Err(TournamentError::WinnerNotParticipant(winner))
        }
    }
}
