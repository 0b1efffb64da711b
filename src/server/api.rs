//! JSON payload builders and the in-memory session store behind the HTTP
//! routes. All engine state lives in [GameSession]; this layer only parses
//! requests, drains wall-clock ticks and serializes snapshots.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data::registry::DataRegistry;
use crate::game::index::GuessLanguage;
use crate::game::session::{GameSession, Phase, SessionEvent, SessionSnapshot};

#[derive(Debug)]
pub enum ApiError {
    Parse(serde_json::Error),
    Validation(String),
    SessionNotFound,
    Internal(serde_json::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid request body: {err}"),
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::SessionNotFound => write!(f, "session not found"),
            Self::Internal(err) => write!(f, "failed to serialize response: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// One stored session plus the wall-clock anchor for lazy tick draining.
/// The anchor is Some only while the session is Running, so no tick can
/// accrue against a paused or ended game.
struct SessionEntry {
    session: GameSession,
    last_tick: Option<Instant>,
}

/// Shared server state: the immutable data registry and the session store.
pub struct AppState {
    registry: Arc<DataRegistry>,
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
}

impl AppState {
    pub fn new(registry: Arc<DataRegistry>) -> AppState {
        AppState {
            registry,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &DataRegistry {
        &self.registry
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CreateSessionRequest {
    language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GuessRequest {
    text: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LanguageRequest {
    language: String,
}

#[derive(Debug, Serialize)]
struct SessionResponse {
    status: &'static str,
    session_id: String,
    snapshot: SessionSnapshot,
    events: Vec<SessionEvent>,
}

pub fn health_payload(state: &AppState) -> Result<String, ApiError> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "mrt-recall-api",
        "version": env!("CARGO_PKG_VERSION"),
        "data_available": !state.registry.is_empty(),
        "total_stations": state.registry.catalog().total_distinct(),
        "data_version": state.registry.data_version(),
    }))
    .map_err(ApiError::Internal)
}

pub fn stations_payload(state: &AppState) -> Result<String, ApiError> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "total_stations": state.registry.catalog().total_distinct(),
        "stations": state.registry.catalog().stations(),
    }))
    .map_err(ApiError::Internal)
}

pub fn lines_payload(state: &AppState) -> Result<String, ApiError> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "lines": state.registry.line_groups(),
    }))
    .map_err(ApiError::Internal)
}

/// POST /api/sessions — create a session, optionally choosing the answer
/// language up front. An empty body defaults to English.
pub fn session_create_payload(state: &AppState, body: &str) -> Result<String, ApiError> {
    let request: CreateSessionRequest = if body.trim().is_empty() {
        CreateSessionRequest::default()
    } else {
        serde_json::from_str(body).map_err(ApiError::Parse)?
    };
    let language = match request.language.as_deref() {
        Some(raw) => parse_language(raw)?,
        None => GuessLanguage::English,
    };

    let id = Uuid::new_v4();
    let session = GameSession::new(Arc::clone(&state.registry), language);
    let snapshot = session.snapshot();
    let mut sessions = lock_sessions(state);
    sessions.insert(
        id,
        SessionEntry {
            session,
            last_tick: None,
        },
    );

    respond(id, snapshot, Vec::new())
}

/// GET /api/sessions/{id} — current snapshot after draining elapsed ticks.
pub fn session_get_payload(state: &AppState, id: &str) -> Result<String, ApiError> {
    let id = parse_session_id(id)?;
    let mut sessions = lock_sessions(state);
    let entry = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;

    let events = drain_pending_ticks(entry);
    respond(id, entry.session.snapshot(), events)
}

/// POST /api/sessions/{id}/{action} — drive one transition.
pub fn session_action_payload(
    state: &AppState,
    id: &str,
    action: &str,
    body: &str,
) -> Result<String, ApiError> {
    let id = parse_session_id(id)?;
    let mut sessions = lock_sessions(state);
    let entry = sessions.get_mut(&id).ok_or(ApiError::SessionNotFound)?;

    let mut events = Vec::new();
    match action {
        "start" => {
            events.extend(drain_pending_ticks(entry));
            entry.session.start();
            sync_tick_anchor(entry);
        }
        "pause" => {
            events.extend(drain_pending_ticks(entry));
            entry.session.pause();
            sync_tick_anchor(entry);
        }
        "resume" => {
            events.extend(drain_pending_ticks(entry));
            entry.session.resume();
            sync_tick_anchor(entry);
        }
        "guess" => {
            // Guess first, clock second: a winning final answer beats a
            // timeout that lands in the same request window.
            let request: GuessRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
            if let Some(event) = entry.session.submit_guess(&request.text) {
                events.push(event);
            }
            events.extend(drain_pending_ticks(entry));
        }
        "giveup" => {
            events.extend(drain_pending_ticks(entry));
            if let Some(event) = entry.session.give_up() {
                events.push(event);
            }
            sync_tick_anchor(entry);
        }
        "reset" => {
            let request: CreateSessionRequest = if body.trim().is_empty() {
                CreateSessionRequest::default()
            } else {
                serde_json::from_str(body).map_err(ApiError::Parse)?
            };
            let language = match request.language.as_deref() {
                Some(raw) => Some(parse_language(raw)?),
                None => None,
            };
            entry.session.reset(language);
            entry.last_tick = None;
        }
        "language" => {
            let request: LanguageRequest = serde_json::from_str(body).map_err(ApiError::Parse)?;
            entry.session.select_language(parse_language(&request.language)?);
        }
        other => {
            return Err(ApiError::Validation(format!("unknown session action '{other}'")));
        }
    }

    respond(id, entry.session.snapshot(), events)
}

/// DELETE /api/sessions/{id} — drop a session from the store. Clients are
/// expected to delete finished sessions; without this the store would only
/// ever grow.
pub fn session_delete_payload(state: &AppState, id: &str) -> Result<String, ApiError> {
    let id = parse_session_id(id)?;
    let mut sessions = lock_sessions(state);
    if sessions.remove(&id).is_none() {
        return Err(ApiError::SessionNotFound);
    }

    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "session_id": id.to_string(),
        "deleted": true,
    }))
    .map_err(ApiError::Internal)
}

fn respond(
    id: Uuid,
    snapshot: SessionSnapshot,
    events: Vec<SessionEvent>,
) -> Result<String, ApiError> {
    serde_json::to_string_pretty(&SessionResponse {
        status: "ok",
        session_id: id.to_string(),
        snapshot,
        events,
    })
    .map_err(ApiError::Internal)
}

fn parse_language(raw: &str) -> Result<GuessLanguage, ApiError> {
    GuessLanguage::parse(raw).ok_or_else(|| {
        ApiError::Validation(format!(
            "unknown language '{raw}'; expected english, pinyin, chinese or abbreviation"
        ))
    })
}

fn parse_session_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::SessionNotFound)
}

fn lock_sessions(state: &AppState) -> std::sync::MutexGuard<'_, HashMap<Uuid, SessionEntry>> {
    match state.sessions.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Apply one engine tick per whole wall-clock second elapsed since the
/// anchor. Draining stops at a terminal phase, and the anchor is cleared
/// whenever the session is not Running so the clock cannot leak into a
/// paused or ended game.
fn drain_pending_ticks(entry: &mut SessionEntry) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    if entry.session.phase() != Phase::Running {
        entry.last_tick = None;
        return events;
    }
    let anchor = match entry.last_tick {
        Some(anchor) => anchor,
        None => {
            entry.last_tick = Some(Instant::now());
            return events;
        }
    };

    let elapsed = anchor.elapsed().as_secs();
    for _ in 0..elapsed {
        if let Some(event) = entry.session.tick() {
            events.push(event);
        }
        if entry.session.phase().is_terminal() {
            break;
        }
    }

    if entry.session.phase() == Phase::Running {
        entry.last_tick = Some(anchor + Duration::from_secs(elapsed));
    } else {
        entry.last_tick = None;
    }
    events
}

/// Anchor the wall clock when the session is Running, clear it otherwise.
/// An existing anchor is never moved: redundant start/resume posts must not
/// discard time accrued since the last drain.
fn sync_tick_anchor(entry: &mut SessionEntry) {
    if entry.session.phase() == Phase::Running {
        if entry.last_tick.is_none() {
            entry.last_tick = Some(Instant::now());
        }
    } else {
        entry.last_tick = None;
    }
}
