//! Persistence seam for the bracket engine.
//!
//! The engine consumes the `TournamentStore` trait only; `MemoryStore` is the
//! shipped implementation, held behind an `RwLock` by the web binary. Extra
//! CRUD used by the web layer (create/list/remove tournaments, entrant
//! registration) lives as inherent methods on `MemoryStore` so the trait
//! stays exactly as wide as the engine needs.

use crate::models::{
    EntrantId, GameMatch, MatchId, MatchStatus, Tournament, TournamentId, TournamentStatus,
};
use std::collections::HashMap;

/// Sparse field update for a tournament record.
#[derive(Clone, Debug, Default)]
pub struct TournamentUpdate {
    pub status: Option<TournamentStatus>,
    pub current_round: Option<u32>,
    pub champion: Option<EntrantId>,
}

/// Sparse field update for a match record.
#[derive(Clone, Debug, Default)]
pub struct MatchUpdate {
    pub status: Option<MatchStatus>,
    pub winner: Option<EntrantId>,
}

/// Store operations the bracket engine requires.
pub trait TournamentStore {
    fn find_tournament(&self, id: TournamentId) -> Option<Tournament>;

    /// Apply the set fields and return the updated record; None if absent.
    fn update_tournament(
        &mut self,
        id: TournamentId,
        update: TournamentUpdate,
    ) -> Option<Tournament>;

    /// Atomically move `current_round` from `from_round` to `from_round + 1`.
    /// Returns false (and changes nothing) if the round already moved on, so
    /// a round can be claimed for advancement at most once.
    fn claim_round_advance(&mut self, id: TournamentId, from_round: u32) -> bool;

    fn find_match(&self, id: MatchId) -> Option<GameMatch>;

    /// All matches of one round, sorted by `match_number` ascending. The
    /// ordering is load-bearing: it fixes next-round pairing.
    fn matches_for_round(&self, tournament: TournamentId, round: u32) -> Vec<GameMatch>;

    fn insert_matches(&mut self, matches: Vec<GameMatch>);

    /// Apply the set fields and return the updated record; None if absent.
    fn update_match(&mut self, id: MatchId, update: MatchUpdate) -> Option<GameMatch>;
}

/// In-memory store backing the single-binary deployment.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tournaments: HashMap<TournamentId, Tournament>,
    matches: HashMap<MatchId, GameMatch>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_tournament(&mut self, tournament: Tournament) {
        self.tournaments.insert(tournament.id, tournament);
    }

    /// All tournaments, newest scheduled first.
    pub fn list_tournaments(&self) -> Vec<Tournament> {
        let mut all: Vec<_> = self.tournaments.values().cloned().collect();
        all.sort_by(|a, b| b.scheduled_time.cmp(&a.scheduled_time));
        all
    }

    /// Register an entrant into a tournament's draft pool. Returns false if
    /// the tournament is absent or no longer accepting entrants.
    pub fn register_entrant(&mut self, id: TournamentId, entrant: EntrantId) -> bool {
        match self.tournaments.get_mut(&id) {
            Some(t) if t.accepts_entrants() => {
                if !t.entrants.contains(&entrant) {
                    t.entrants.push(entrant);
                }
                true
            }
            _ => false,
        }
    }

    /// Every match of a tournament, sorted by (round, match_number).
    pub fn matches_for_tournament(&self, tournament: TournamentId) -> Vec<GameMatch> {
        let mut found: Vec<_> = self
            .matches
            .values()
            .filter(|m| m.tournament == tournament)
            .cloned()
            .collect();
        found.sort_by_key(|m| (m.round, m.match_number));
        found
    }

    /// Whole-tournament teardown: drop the record and all of its matches.
    pub fn remove_tournament(&mut self, id: TournamentId) {
        self.tournaments.remove(&id);
        self.matches.retain(|_, m| m.tournament != id);
    }
}

impl TournamentStore for MemoryStore {
    fn find_tournament(&self, id: TournamentId) -> Option<Tournament> {
        self.tournaments.get(&id).cloned()
    }

    fn update_tournament(
        &mut self,
        id: TournamentId,
        update: TournamentUpdate,
    ) -> Option<Tournament> {
        let t = self.tournaments.get_mut(&id)?;
        if let Some(status) = update.status {
            t.status = status;
        }
        if let Some(round) = update.current_round {
            t.current_round = round;
        }
        if let Some(champion) = update.champion {
            t.champion = Some(champion);
        }
        Some(t.clone())
    }

    fn claim_round_advance(&mut self, id: TournamentId, from_round: u32) -> bool {
        match self.tournaments.get_mut(&id) {
            Some(t) if t.current_round == from_round => {
                t.current_round = from_round + 1;
                true
            }
            _ => false,
        }
    }

    fn find_match(&self, id: MatchId) -> Option<GameMatch> {
        self.matches.get(&id).cloned()
    }

    fn matches_for_round(&self, tournament: TournamentId, round: u32) -> Vec<GameMatch> {
        let mut found: Vec<_> = self
            .matches
            .values()
            .filter(|m| m.tournament == tournament && m.round == round)
            .cloned()
            .collect();
        found.sort_by_key(|m| m.match_number);
        found
    }

    fn insert_matches(&mut self, matches: Vec<GameMatch>) {
        for m in matches {
            self.matches.insert(m.id, m);
        }
    }

    fn update_match(&mut self, id: MatchId, update: MatchUpdate) -> Option<GameMatch> {
        let m = self.matches.get_mut(&id)?;
        if let Some(status) = update.status {
            m.status = status;
        }
        if let Some(winner) = update.winner {
            m.winner = Some(winner);
        }
        Some(m.clone())
    }
}
