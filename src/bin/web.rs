//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080), ADMIN_PASSWORD.

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use bracket_tournament_web::{
    apply_result, build_knockout, build_round_robin, recompute, validate_scores, Classification,
    Format, MatchKind, PlayerId, Roster, Tournament, TournamentId,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: one shared roster plus many tournaments by ID.
struct AppData {
    roster: Roster,
    tournaments: HashMap<TournamentId, TournamentEntry>,
}

type AppState = Data<RwLock<AppData>>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct LoginBody {
    password: String,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct SetClassificationBody {
    classification: Classification,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(default)]
    format: Format,
    #[serde(default)]
    kind: MatchKind,
    player_ids: Vec<PlayerId>,
}

#[derive(Deserialize)]
struct MatchResultBody {
    score_a: i64,
    score_b: i64,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: Uuid,
}

/// Path segment: roster player id.
#[derive(Deserialize)]
struct PlayerPath {
    id: PlayerId,
}

/// True when the session may mutate state. With no ADMIN_PASSWORD set the
/// app runs open (local club use); otherwise a logged-in session is needed.
fn is_admin(session: &Session) -> bool {
    match std::env::var("ADMIN_PASSWORD") {
        Ok(p) if !p.is_empty() => session.get::<bool>("admin").ok().flatten().unwrap_or(false),
        _ => true,
    }
}

fn admin_denied() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Admin session required" }))
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

/// Log in as admin (password from ADMIN_PASSWORD env; open when unset).
#[post("/api/auth/login")]
async fn api_login(session: Session, body: Json<LoginBody>) -> HttpResponse {
    let expected = std::env::var("ADMIN_PASSWORD").unwrap_or_default();
    if !expected.is_empty() && body.password != expected {
        return HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Wrong password" }));
    }
    match session.insert("admin", true) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "admin": true })),
        Err(_) => HttpResponse::InternalServerError().body("session error"),
    }
}

#[post("/api/auth/logout")]
async fn api_logout(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(serde_json::json!({ "admin": false }))
}

#[get("/api/auth/me")]
async fn api_auth_me(session: Session) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "admin": is_admin(&session) }))
}

/// Full roster: players plus classification map.
#[get("/api/players")]
async fn api_list_players(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(&g.roster)
}

/// Add a player to the roster (names unique, case-insensitive).
#[post("/api/players")]
async fn api_add_player(state: AppState, session: Session, body: Json<AddPlayerBody>) -> HttpResponse {
    if !is_admin(&session) {
        return admin_denied();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.roster.add_player(body.name.trim()) {
        Ok(_) => HttpResponse::Ok().json(&g.roster),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Remove a roster player by id.
#[delete("/api/players/{id}")]
async fn api_remove_player(state: AppState, session: Session, path: Path<PlayerPath>) -> HttpResponse {
    if !is_admin(&session) {
        return admin_denied();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.roster.remove_player(path.id) {
        Ok(()) => HttpResponse::Ok().json(&g.roster),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Set a player's bracket classification (seed / separated / normal).
#[put("/api/players/{id}/classification")]
async fn api_set_classification(
    state: AppState,
    session: Session,
    path: Path<PlayerPath>,
    body: Json<SetClassificationBody>,
) -> HttpResponse {
    if !is_admin(&session) {
        return admin_denied();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.roster.set_classification(path.id, body.classification) {
        Ok(()) => HttpResponse::Ok().json(&g.roster),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Import player names from a CSV body (first column, deduplicated).
#[post("/api/players/import")]
async fn api_import_players(state: AppState, session: Session, body: String) -> HttpResponse {
    if !is_admin(&session) {
        return admin_denied();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.roster.import_names_csv(body.as_bytes()) {
        Ok(added) => HttpResponse::Ok().json(serde_json::json!({ "added": added })),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Export the roster as CSV (name, classification).
#[get("/api/players/export.csv")]
async fn api_export_players(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let mut out: Vec<u8> = Vec::new();
    match g.roster.export_csv(&mut out) {
        Ok(()) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(out),
        Err(e) => HttpResponse::InternalServerError()
            .json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Create a tournament from roster players (knockout or round-robin-6).
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    session: Session,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    if !is_admin(&session) {
        return admin_denied();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let players = match g.roster.players_by_ids(&body.player_ids) {
        Ok(players) => players,
        Err(e) => return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    };
    let classification = g.roster.classification.clone();
    let mut rng = rand::thread_rng();
    let built = match body.format {
        Format::Knockout => build_knockout(&players, &classification, body.kind, &mut rng),
        Format::RoundRobinSix => build_round_robin(&players, &classification, &mut rng),
    };
    match built {
        Ok(tournament) => {
            let id = tournament.id;
            g.tournaments.insert(
                id,
                TournamentEntry {
                    tournament,
                    last_activity: Instant::now(),
                },
            );
            match g.tournaments.get(&id) {
                Some(entry) => HttpResponse::Ok().json(&entry.tournament),
                None => HttpResponse::InternalServerError().body("state error"),
            }
        }
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.tournaments.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.tournament)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    }
}

/// Delete a tournament by id.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(
    state: AppState,
    session: Session,
    path: Path<TournamentPath>,
) -> HttpResponse {
    if !is_admin(&session) {
        return admin_denied();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.tournaments.remove(&path.id) {
        Some(_) => HttpResponse::Ok().json(serde_json::json!({ "deleted": true })),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    }
}

/// Submit a match result: validate scores, derive the winner from the
/// higher score, record it, and rebuild the bracket's derived state.
#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_submit_result(
    state: AppState,
    session: Session,
    path: Path<TournamentMatchPath>,
    body: Json<MatchResultBody>,
) -> HttpResponse {
    if !is_admin(&session) {
        return admin_denied();
    }
    let (score_a, score_b) = match validate_scores(body.score_a, body.score_b) {
        Ok(pair) => pair,
        Err(e) => return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.tournaments.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    let slots = match t.find_match(path.match_id) {
        Some(m) => (m.competitor_a, m.competitor_b),
        None => return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Match not found" })),
    };
    let (Some(a), Some(b)) = slots else {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "Match participants not yet determined" }));
    };
    let winner = if score_a > score_b { a } else { b };
    match apply_result(t, path.match_id, winner, Some(score_a), Some(score_b)) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Re-run the bracket updater (idempotent).
#[post("/api/tournaments/{id}/recompute")]
async fn api_recompute(state: AppState, session: Session, path: Path<TournamentPath>) -> HttpResponse {
    if !is_admin(&session) {
        return admin_denied();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.tournaments.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    entry.last_activity = Instant::now();
    recompute(&mut entry.tournament);
    HttpResponse::Ok().json(&entry.tournament)
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

    let state = Data::new(RwLock::new(AppData {
        roster: Roster::new(),
        tournaments: HashMap::new(),
    }));

    // Session cookies are signed with a fresh key per process; admin
    // sessions do not survive a restart.
    let secret_key = Key::generate();

    // Background task: every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.tournaments.len();
            g.tournaments
                .retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.tournaments.len();
            if removed > 0 {
                log::info!(
                    "Cleaned up {} inactive tournament(s) (no activity for 12h)",
                    removed
                );
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_login)
            .service(api_logout)
            .service(api_auth_me)
            .service(api_list_players)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_set_classification)
            .service(api_import_players)
            .service(api_export_players)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_submit_result)
            .service(api_recompute)
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
