//! Tournament record, match format, status, and operation errors.

use crate::models::entrant::EntrantId;
use crate::models::game::MatchId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Errors that can occur during bracket operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Not enough entrants registered to seed a first round.
    InsufficientEntrants { required: usize, have: usize },
    /// Entrant count is not a multiple of the team size.
    InvalidPlayerCount { count: usize, team_size: usize },
    /// Drafting attempted while the tournament is not open for it.
    DraftNotAllowed(TournamentStatus),
    /// Tournament id did not resolve.
    TournamentNotFound(TournamentId),
    /// Match id did not resolve.
    MatchNotFound(MatchId),
    /// Winner already recorded; results are immutable.
    MatchAlreadyCompleted(MatchId),
    /// The recorded winner is not among the match's participants.
    WinnerNotParticipant(EntrantId),
    /// A match's participant list does not split into two full sides.
    MalformedParticipants(MatchId),
    /// A completed match has no winner recorded.
    MatchMissingWinner(MatchId),
    /// An odd number of sides (>1) is waiting to advance; a match was voided
    /// externally. Refused rather than dropping the unpaired side.
    UnpairableSides { count: usize },
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InsufficientEntrants { required, have } => {
                write!(f, "Need at least {required} entrants to draft (have {have})")
            }
            TournamentError::InvalidPlayerCount { count, team_size } => {
                write!(
                    f,
                    "Entrant count ({count}) must be a multiple of the team size ({team_size})"
                )
            }
            TournamentError::DraftNotAllowed(status) => {
                write!(f, "Drafting is not allowed while the tournament is {status}")
            }
            TournamentError::TournamentNotFound(_) => write!(f, "Tournament not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::MatchAlreadyCompleted(_) => write!(f, "Match is already completed"),
            TournamentError::WinnerNotParticipant(_) => {
                write!(f, "The winner is not a participant in this match")
            }
            TournamentError::MalformedParticipants(_) => {
                write!(f, "Match participants do not form two full sides")
            }
            TournamentError::MatchMissingWinner(_) => {
                write!(f, "Completed match has no winner recorded")
            }
            TournamentError::UnpairableSides { count } => {
                write!(f, "Cannot pair {count} advancing sides; a match result is missing")
            }
        }
    }
}

/// Lifecycle of a tournament. Transitions are monotonic:
/// RegistrationOpen -> Active -> Completed, with Cancelled as a terminal
/// escape hatch the engine never takes itself.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Drafting,
    #[default]
    RegistrationOpen,
    Active,
    Completed,
    Cancelled,
}

impl std::fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TournamentStatus::Drafting => "drafting",
            TournamentStatus::RegistrationOpen => "registration_open",
            TournamentStatus::Active => "active",
            TournamentStatus::Completed => "completed",
            TournamentStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// Match format; fixes the team size and the minimum field to draft.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum MatchFormat {
    #[default]
    #[serde(rename = "1v1")]
    OneVOne,
    #[serde(rename = "2v2")]
    TwoVTwo,
    #[serde(rename = "4v4")]
    FourVFour,
    #[serde(rename = "8v8")]
    EightVEight,
}

impl MatchFormat {
    /// Entrants per side.
    pub fn team_size(self) -> usize {
        match self {
            MatchFormat::OneVOne => 1,
            MatchFormat::TwoVTwo => 2,
            MatchFormat::FourVFour => 4,
            MatchFormat::EightVEight => 8,
        }
    }

    /// Smallest field that still holds one match: two full sides.
    pub fn min_entrants(self) -> usize {
        self.team_size() * 2
    }
}

impl std::fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchFormat::OneVOne => "1v1",
            MatchFormat::TwoVTwo => "2v2",
            MatchFormat::FourVFour => "4v4",
            MatchFormat::EightVEight => "8v8",
        };
        write!(f, "{s}")
    }
}

/// A tournament: registered entrant pool plus bracket progress.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: MatchFormat,
    pub scheduled_time: DateTime<Utc>,
    pub status: TournamentStatus,
    /// 0 until the first round is drafted; only ever increases.
    pub current_round: u32,
    /// Entrants registered for the draft pool.
    pub entrants: Vec<EntrantId>,
    /// Representative entrant of the winning side, set when completed.
    pub champion: Option<EntrantId>,
}

impl Tournament {
    /// Create a tournament open for registration, not yet drafted.
    pub fn new(
        name: impl Into<String>,
        format: MatchFormat,
        scheduled_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format,
            scheduled_time,
            status: TournamentStatus::RegistrationOpen,
            current_round: 0,
            entrants: Vec::new(),
            champion: None,
        }
    }

    /// Whether entrants may still be registered or a draft started.
    pub fn accepts_entrants(&self) -> bool {
        matches!(
            self.status,
            TournamentStatus::RegistrationOpen | TournamentStatus::Drafting
        )
    }
}
