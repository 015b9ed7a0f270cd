//! Single-elimination bracket web app: library with models, store, and
//! bracket engine.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{advance_round, create_first_round, record_winner, Advancement};
pub use models::{
    Entrant, EntrantId, GameMatch, MatchFormat, MatchId, MatchStatus, Side, Tournament,
    TournamentError, TournamentId, TournamentStatus,
};
pub use store::{MatchUpdate, MemoryStore, TournamentStore, TournamentUpdate};
