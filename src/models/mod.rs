//! Data structures for the bracket app: entrants, sides, matches, tournaments.

mod entrant;
mod game;
mod side;
mod tournament;

pub use entrant::{Entrant, EntrantId};
pub use game::{GameMatch, MatchId, MatchStatus};
pub use side::Side;
pub use tournament::{MatchFormat, Tournament, TournamentError, TournamentId, TournamentStatus};
