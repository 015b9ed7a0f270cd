//! Bracket engine: seeding, round advancement, winner recording.

mod advance;
mod record;
mod seeding;
mod shuffle;

pub use advance::{advance_round, Advancement};
pub use record::record_winner;
pub use seeding::{create_first_round, group_into_sides, split_byes, ByeSplit};
pub use shuffle::shuffle;
