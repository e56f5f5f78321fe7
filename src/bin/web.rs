//! JSON API over the bracket engine, for a presentation layer to call into.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use knockout_bracket::{
    create_bracket, reopen_match, replace_participant, report_result, Bracket, BracketConfig,
    MatchId, Participant, Position,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-bracket entry: bracket data + last activity time (for auto-cleanup).
struct BracketEntry {
    bracket: Bracket,
    created_at: DateTime<Utc>,
    last_activity: Instant,
}

/// In-memory state: many brackets by id. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<Uuid, BracketEntry>>>;

/// Inactivity threshold: brackets not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// What the API returns for a bracket.
#[derive(Serialize)]
struct BracketView<'a> {
    id: Uuid,
    created_at: DateTime<Utc>,
    complete: bool,
    champion: Option<&'a Participant>,
    bracket: &'a Bracket,
}

impl<'a> BracketView<'a> {
    fn new(id: Uuid, entry: &'a BracketEntry) -> Self {
        Self {
            id,
            created_at: entry.created_at,
            complete: entry.bracket.is_complete(),
            champion: entry.bracket.champion(),
            bracket: &entry.bracket,
        }
    }
}

#[derive(Deserialize)]
struct CreateBracketBody {
    participants: Vec<Participant>,
    #[serde(default)]
    config: BracketConfig,
}

#[derive(Deserialize)]
struct ReportResultBody {
    winner: Position,
}

#[derive(Deserialize)]
struct ReplaceParticipantBody {
    position: Position,
    participant: Participant,
}

/// Path segment: bracket id (e.g. /api/brackets/{id})
#[derive(Deserialize)]
struct BracketPath {
    id: Uuid,
}

/// Path segments: bracket id and match id (e.g. /api/brackets/{id}/matches/{match_id})
#[derive(Deserialize)]
struct BracketMatchPath {
    id: Uuid,
    match_id: MatchId,
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No bracket" }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "knockout-bracket",
    })
}

/// Seed and build a new bracket (returns it with id; client stores id for subsequent requests).
#[post("/api/brackets")]
async fn api_create_bracket(state: AppState, body: Json<CreateBracketBody>) -> HttpResponse {
    let bracket = match create_bracket(&body.participants, body.config) {
        Ok(b) => b,
        Err(e) => return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    };
    let id = Uuid::new_v4();
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = g.entry(id).or_insert(BracketEntry {
        bracket,
        created_at: Utc::now(),
        last_activity: Instant::now(),
    });
    log::info!("Created bracket {}", id);
    HttpResponse::Ok().json(BracketView::new(id, entry))
}

/// Get a bracket by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/brackets/{id}")]
async fn api_get_bracket(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(BracketView::new(path.id, entry))
        }
        None => not_found(),
    }
}

/// Replace the bracket wholesale (participant list or format changed).
#[post("/api/brackets/{id}/rebuild")]
async fn api_rebuild_bracket(
    state: AppState,
    path: Path<BracketPath>,
    body: Json<CreateBracketBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match create_bracket(&body.participants, body.config) {
        Ok(bracket) => {
            entry.bracket = bracket;
            HttpResponse::Ok().json(BracketView::new(path.id, entry))
        }
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Report the winner of a ready match.
#[put("/api/brackets/{id}/matches/{match_id}/result")]
async fn api_report_result(
    state: AppState,
    path: Path<BracketMatchPath>,
    body: Json<ReportResultBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match report_result(&mut entry.bracket, path.match_id, body.winner) {
        Ok(()) => HttpResponse::Ok().json(BracketView::new(path.id, entry)),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Swap the participant in one slot of a match.
#[put("/api/brackets/{id}/matches/{match_id}/slots")]
async fn api_replace_participant(
    state: AppState,
    path: Path<BracketMatchPath>,
    body: Json<ReplaceParticipantBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let body = body.into_inner();
    match replace_participant(&mut entry.bracket, path.match_id, body.position, body.participant) {
        Ok(_) => HttpResponse::Ok().json(BracketView::new(path.id, entry)),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Take back a reported result so it can be reported again.
#[post("/api/brackets/{id}/matches/{match_id}/reopen")]
async fn api_reopen_match(state: AppState, path: Path<BracketMatchPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match reopen_match(&mut entry.bracket, path.match_id) {
        Ok(()) => HttpResponse::Ok().json(BracketView::new(path.id, entry)),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
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

    let state = Data::new(RwLock::new(HashMap::<Uuid, BracketEntry>::new()));

    // Background task: every 30 minutes, remove brackets inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive bracket(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_bracket)
            .service(api_get_bracket)
            .service(api_rebuild_bracket)
            .service(api_report_result)
            .service(api_replace_participant)
            .service(api_reopen_match)
    })
    .bind(bind)?
    .run()
    .await
}
