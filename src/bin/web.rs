//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_files::Files;
use actix_web::{
    get, post, put,
    web::{self, Bytes, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use bracket_tournament_web::{
    advance_round, create_first_round, record_winner, Advancement, Entrant, EntrantId, GameMatch,
    MatchFormat, MatchId, MemoryStore, Tournament, TournamentError, TournamentId,
    TournamentStatus, TournamentStore,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// In-memory state: the store plus web-only bookkeeping (display names and
/// per-tournament activity timestamps for auto-cleanup).
struct WebState {
    store: MemoryStore,
    /// Display names by entrant id; the bracket engine never reads these.
    roster: HashMap<EntrantId, String>,
    last_activity: HashMap<TournamentId, Instant>,
}

type AppState = Data<RwLock<WebState>>;

/// Inactivity threshold: tournaments not touched for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    format: MatchFormat,
    /// Defaults to "now" when omitted.
    scheduled_time: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct NewEntrant {
    name: String,
}

#[derive(Deserialize)]
struct RegisterEntrantsBody {
    entrants: Vec<NewEntrant>,
}

#[derive(Deserialize)]
struct RecordWinnerBody {
    winner_id: EntrantId,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segment: match id (e.g. /api/matches/{id}/winner)
#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

#[derive(Serialize)]
struct RoundView {
    round: u32,
    matches: Vec<GameMatch>,
}

/// Public bracket view: the tournament, its matches grouped by round, and the
/// entrant names needed to render them.
#[derive(Serialize)]
struct BracketView {
    tournament: Tournament,
    rounds: Vec<RoundView>,
    entrants: Vec<Entrant>,
}

#[derive(Serialize)]
struct RecordWinnerResponse {
    #[serde(rename = "match")]
    game_match: GameMatch,
    advancement: Advancement,
}

#[derive(Serialize)]
struct ChampionView {
    tournament: Tournament,
    champion: Entrant,
}

/// Not-found errors map to 404, everything else to 400; the engine itself
/// never decides HTTP codes.
fn error_response(err: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        TournamentError::TournamentNotFound(_) | TournamentError::MatchNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn bracket_view(state: &WebState, tournament: Tournament) -> BracketView {
    let mut rounds: Vec<RoundView> = Vec::new();
    for m in state.store.matches_for_tournament(tournament.id) {
        match rounds.last_mut() {
            Some(r) if r.round == m.round => r.matches.push(m),
            _ => rounds.push(RoundView {
                round: m.round,
                matches: vec![m],
            }),
        }
    }
    let entrants = tournament
        .entrants
        .iter()
        .map(|&id| Entrant {
            id,
            name: state
                .roster
                .get(&id)
                .cloned()
                .unwrap_or_else(|| id.to_string()),
        })
        .collect();
    BracketView {
        tournament,
        rounds,
        entrants,
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-tournament-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a tournament (RegistrationOpen; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let name = body.name.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "Tournament name must not be empty" }));
    }
    let scheduled = body.scheduled_time.unwrap_or_else(Utc::now);
    let tournament = Tournament::new(name, body.format, scheduled);
    let id = tournament.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.store.insert_tournament(tournament.clone());
    g.last_activity.insert(id, Instant::now());
    HttpResponse::Ok().json(tournament)
}

/// List tournaments, newest scheduled first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.store.list_tournaments())
}

/// Public bracket view (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.store.find_tournament(path.id) {
        Some(t) => {
            g.last_activity.insert(path.id, Instant::now());
            HttpResponse::Ok().json(bracket_view(&g, t))
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    }
}

/// Register entrants by name (RegistrationOpen/Drafting only). Names already
/// registered for this tournament are skipped, case-insensitively.
#[post("/api/tournaments/{id}/entrants")]
async fn api_register_entrants(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<RegisterEntrantsBody>,
) -> HttpResponse {
    let names: Vec<String> = body
        .entrants
        .iter()
        .map(|e| e.name.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    register_names(&state, path.id, names)
}

/// Bulk import entrants from a CSV body with a `name` column (header row
/// required; other columns are ignored).
#[post("/api/tournaments/{id}/entrants/csv")]
async fn api_register_entrants_csv(
    state: AppState,
    path: Path<TournamentPath>,
    body: Bytes,
) -> HttpResponse {
    let mut reader = csv::Reader::from_reader(body.as_ref());
    let name_idx = match reader.headers() {
        Ok(headers) => match headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case("name"))
        {
            Some(idx) => idx,
            None => {
                return HttpResponse::BadRequest()
                    .json(serde_json::json!({ "error": "CSV is missing a 'name' column" }))
            }
        },
        Err(e) => {
            return HttpResponse::BadRequest()
                .json(serde_json::json!({ "error": format!("Invalid CSV: {e}") }))
        }
    };
    let mut names = Vec::new();
    for record in reader.records() {
        match record {
            Ok(record) => {
                let name = record.get(name_idx).unwrap_or("").trim().to_string();
                if !name.is_empty() {
                    names.push(name);
                }
            }
            Err(e) => {
                return HttpResponse::BadRequest()
                    .json(serde_json::json!({ "error": format!("Invalid CSV: {e}") }))
            }
        }
    }
    register_names(&state, path.id, names)
}

/// Shared registration path for JSON and CSV entry points.
fn register_names(state: &AppState, id: TournamentId, names: Vec<String>) -> HttpResponse {
    if names.is_empty() {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "No entrant names provided" }));
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let tournament = match g.store.find_tournament(id) {
        Some(t) => t,
        None => {
            return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
        }
    };
    if !tournament.accepts_entrants() {
        return error_response(&TournamentError::DraftNotAllowed(tournament.status));
    }
    g.last_activity.insert(id, Instant::now());

    let mut taken: Vec<String> = tournament
        .entrants
        .iter()
        .filter_map(|e| g.roster.get(e))
        .map(|n| n.to_ascii_lowercase())
        .collect();
    let mut registered = 0usize;
    for name in names {
        if taken.contains(&name.to_ascii_lowercase()) {
            continue;
        }
        let entrant = Entrant::new(name.as_str());
        taken.push(name.to_ascii_lowercase());
        g.roster.insert(entrant.id, entrant.name);
        g.store.register_entrant(id, entrant.id);
        registered += 1;
    }
    let tournament = g.store.find_tournament(id).unwrap_or(tournament);
    HttpResponse::Ok().json(serde_json::json!({
        "registered": registered,
        "tournament": tournament,
    }))
}

/// Draft round 1 from the registered pool (RegistrationOpen/Drafting only).
#[post("/api/tournaments/{id}/draft")]
async fn api_draft(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let tournament = match g.store.find_tournament(path.id) {
        Some(t) => t,
        None => {
            return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
        }
    };
    g.last_activity.insert(path.id, Instant::now());
    let result = create_first_round(
        &mut g.store,
        &mut rand::thread_rng(),
        path.id,
        &tournament.entrants,
        tournament.scheduled_time,
        tournament.format.team_size(),
    );
    match result {
        Ok(created) => HttpResponse::Ok().json(serde_json::json!({ "matches_created": created })),
        Err(e) => error_response(&e),
    }
}

/// All matches of a tournament, sorted by (round, match_number).
#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    if g.store.find_tournament(path.id).is_none() {
        return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }));
    }
    HttpResponse::Ok().json(g.store.matches_for_tournament(path.id))
}

/// Manual advancement check (normally triggered by recording a winner).
#[post("/api/tournaments/{id}/advance")]
async fn api_advance(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.last_activity.insert(path.id, Instant::now());
    match advance_round(&mut g.store, path.id) {
        Ok(advancement) => HttpResponse::Ok().json(advancement),
        Err(e) => error_response(&e),
    }
}

/// Record the winner of a match; returns the updated match and whether the
/// bracket advanced as a result.
#[put("/api/matches/{id}/winner")]
async fn api_record_winner(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<RecordWinnerBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match record_winner(&mut g.store, path.id, body.winner_id) {
        Ok((game_match, advancement)) => {
            g.last_activity
                .insert(game_match.tournament, Instant::now());
            HttpResponse::Ok().json(RecordWinnerResponse {
                game_match,
                advancement,
            })
        }
        Err(e) => error_response(&e),
    }
}

/// Completed tournaments and their champions.
#[get("/api/winners")]
async fn api_winners(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let winners: Vec<ChampionView> = g
        .store
        .list_tournaments()
        .into_iter()
        .filter(|t| t.status == TournamentStatus::Completed)
        .filter_map(|t| {
            let id = t.champion?;
            let name = g
                .roster
                .get(&id)
                .cloned()
                .unwrap_or_else(|| id.to_string());
            Some(ChampionView {
                tournament: t,
                champion: Entrant { id, name },
            })
        })
        .collect();
    HttpResponse::Ok().json(winners)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(WebState {
        store: MemoryStore::new(),
        roster: HashMap::new(),
        last_activity: HashMap::new(),
    }));

    // Background task: every 30 minutes, tear down tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let stale: Vec<TournamentId> = g
                .last_activity
                .iter()
                .filter(|(_, seen)| seen.elapsed() >= INACTIVITY_TIMEOUT)
                .map(|(id, _)| *id)
                .collect();
            for id in &stale {
                if let Some(t) = g.store.find_tournament(*id) {
                    for entrant in &t.entrants {
                        g.roster.remove(entrant);
                    }
                }
                g.store.remove_tournament(*id);
                g.last_activity.remove(id);
            }
            if !stale.is_empty() {
                log::info!(
                    "Cleaned up {} inactive tournament(s) (no activity for 12h)",
                    stale.len()
                );
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_get_tournament)
            .service(api_register_entrants)
            .service(api_register_entrants_csv)
            .service(api_draft)
            .service(api_list_matches)
            .service(api_advance)
            .service(api_record_winner)
            .service(api_winners)
            .service(Files::new("/static", "static").show_files_listing())
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
