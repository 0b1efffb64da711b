use mrt_recall::data::registry::DataRegistry;
use mrt_recall::data::station::RawStationRecord;
use mrt_recall::server::api::AppState;
use mrt_recall::server::routes::route_request;
use serde_json::Value;

fn record(code: &str, english: &str, pinyin: &str, chinese: &str) -> RawStationRecord {
    RawStationRecord {
        stn_code: code.to_string(),
        mrt_station_english: english.to_string(),
        mrt_station_pinyin: pinyin.to_string(),
        mrt_station_chinese: chinese.to_string(),
        abbreviation: None,
    }
}

fn state() -> AppState {
    AppState::new(DataRegistry::from_records(
        &[
            record("NS1", "Jurong East", "Yulang Dong", "裕廊东"),
            record("EW24", "Jurong East", "Yulang Dong", "裕廊东"),
            record("CC1", "Dhoby Ghaut", "Duomei Ge", "多美歌"),
        ],
        Some("test-fixture".to_string()),
    ))
}

fn json(body: &str) -> Value {
    serde_json::from_str(body).expect("response should be valid json")
}

#[test]
fn health_endpoint_reports_loaded_data() {
    let state = state();
    let response = route_request(&state, "GET", "/api/health", "");

    assert_eq!(response.status_code, 200);
    assert_eq!(response.content_type, "application/json");
    let payload = json(&response.body);
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["data_available"], true);
    assert_eq!(payload["total_stations"], 2);
    assert_eq!(payload["data_version"], "test-fixture");
}

#[test]
fn stations_and_lines_endpoints_expose_the_catalog() {
    let state = state();

    let stations = json(&route_request(&state, "GET", "/api/stations", "").body);
    assert_eq!(stations["total_stations"], 2);
    assert_eq!(stations["stations"].as_array().map(Vec::len), Some(3));

    let lines = json(&route_request(&state, "GET", "/api/lines", "").body);
    let groups = lines["lines"].as_array().expect("lines should be an array");
    let codes: Vec<&str> = groups
        .iter()
        .map(|g| g["line_code"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(codes, vec!["EW", "NS", "CC"]);
    // Interchange pills carry every code of the station.
    assert_eq!(
        groups[0]["stations"][0]["codes"],
        serde_json::json!(["NS1", "EW24"])
    );
}

#[test]
fn session_lifecycle_runs_end_to_end_over_http() {
    let state = state();

    let created = route_request(&state, "POST", "/api/sessions", r#"{"language":"english"}"#);
    assert_eq!(created.status_code, 200);
    let created = json(&created.body);
    let id = created["session_id"].as_str().expect("session id").to_string();
    assert_eq!(created["snapshot"]["phase"], "not_started");
    assert_eq!(created["snapshot"]["total_stations"], 2);

    let started = json(
        &route_request(&state, "POST", &format!("/api/sessions/{id}/start"), "{}").body,
    );
    assert_eq!(started["snapshot"]["phase"], "running");
    assert_eq!(started["snapshot"]["time_remaining_seconds"], 900);

    let guessed = json(
        &route_request(
            &state,
            "POST",
            &format!("/api/sessions/{id}/guess"),
            r#"{"text":"JURONG-EAST"}"#,
        )
        .body,
    );
    assert_eq!(guessed["snapshot"]["found_count"], 1);
    assert_eq!(guessed["snapshot"]["last_guess"]["correct"], true);
    assert_eq!(
        guessed["snapshot"]["found_stations"],
        serde_json::json!(["Jurong East"])
    );

    let duplicate = json(
        &route_request(
            &state,
            "POST",
            &format!("/api/sessions/{id}/guess"),
            r#"{"text":"jurong east"}"#,
        )
        .body,
    );
    assert_eq!(duplicate["snapshot"]["found_count"], 1);
    assert_eq!(duplicate["events"][0]["kind"], "already_found");
    assert_eq!(duplicate["events"][0]["station"], "Jurong East");

    let winning = json(
        &route_request(
            &state,
            "POST",
            &format!("/api/sessions/{id}/guess"),
            r#"{"text":"Dhoby Ghaut"}"#,
        )
        .body,
    );
    assert_eq!(winning["snapshot"]["phase"], "ended");
    assert_eq!(winning["snapshot"]["end_reason"], "won");
    assert_eq!(winning["events"][0]["kind"], "victory");
    assert_eq!(winning["snapshot"]["revealed"], false);
    assert_eq!(winning["snapshot"]["progress"], 1.0);

    let fetched = json(&route_request(&state, "GET", &format!("/api/sessions/{id}"), "").body);
    assert_eq!(fetched["snapshot"]["phase"], "ended");
}

#[test]
fn give_up_over_http_reveals_without_winning() {
    let state = state();
    let created = json(&route_request(&state, "POST", "/api/sessions", "").body);
    let id = created["session_id"].as_str().expect("session id").to_string();

    route_request(&state, "POST", &format!("/api/sessions/{id}/start"), "{}");
    let gave_up = json(
        &route_request(&state, "POST", &format!("/api/sessions/{id}/giveup"), "{}").body,
    );
    assert_eq!(gave_up["snapshot"]["end_reason"], "gave_up");
    assert_eq!(gave_up["snapshot"]["revealed"], true);
    assert_eq!(gave_up["events"][0]["kind"], "gave_up");

    // Reset brings the session back to a clean slate with a new language.
    let reset = json(
        &route_request(
            &state,
            "POST",
            &format!("/api/sessions/{id}/reset"),
            r#"{"language":"pinyin"}"#,
        )
        .body,
    );
    assert_eq!(reset["snapshot"]["phase"], "not_started");
    assert_eq!(reset["snapshot"]["language"], "pinyin");
    assert_eq!(reset["snapshot"]["found_count"], 0);
}

#[test]
fn language_endpoint_is_a_no_op_after_start() {
    let state = state();
    let created = json(&route_request(&state, "POST", "/api/sessions", "").body);
    let id = created["session_id"].as_str().expect("session id").to_string();

    route_request(&state, "POST", &format!("/api/sessions/{id}/start"), "{}");
    let changed = json(
        &route_request(
            &state,
            "POST",
            &format!("/api/sessions/{id}/language"),
            r#"{"language":"chinese"}"#,
        )
        .body,
    );
    assert_eq!(changed["snapshot"]["language"], "english");
}

#[test]
fn malformed_requests_yield_structured_errors() {
    let state = state();

    let unknown = route_request(&state, "GET", "/api/nope", "");
    assert_eq!(unknown.status_code, 404);
    assert!(unknown.body.contains("\"status\": \"error\""));

    let missing = route_request(
        &state,
        "GET",
        "/api/sessions/00000000-0000-0000-0000-000000000000",
        "",
    );
    assert_eq!(missing.status_code, 404);

    let not_a_uuid = route_request(&state, "GET", "/api/sessions/not-a-uuid", "");
    assert_eq!(not_a_uuid.status_code, 404);

    let bad_language = route_request(&state, "POST", "/api/sessions", r#"{"language":"klingon"}"#);
    assert_eq!(bad_language.status_code, 400);

    let created = json(&route_request(&state, "POST", "/api/sessions", "").body);
    let id = created["session_id"].as_str().expect("session id").to_string();
    let bad_body = route_request(
        &state,
        "POST",
        &format!("/api/sessions/{id}/guess"),
        "not json",
    );
    assert_eq!(bad_body.status_code, 400);

    let bad_action = route_request(&state, "POST", &format!("/api/sessions/{id}/frobnicate"), "{}");
    assert_eq!(bad_action.status_code, 400);
}

#[test]
fn redundant_start_and_resume_do_not_rewind_the_clock() {
    let state = state();
    let created = json(&route_request(&state, "POST", "/api/sessions", "").body);
    let id = created["session_id"].as_str().expect("session id").to_string();

    route_request(&state, "POST", &format!("/api/sessions/{id}/start"), "{}");
    std::thread::sleep(std::time::Duration::from_millis(1200));

    // A second start on a running session must not re-anchor the clock.
    let restarted = json(
        &route_request(&state, "POST", &format!("/api/sessions/{id}/start"), "{}").body,
    );
    let after_start = restarted["snapshot"]["time_remaining_seconds"]
        .as_u64()
        .expect("time remaining");
    assert!(
        after_start <= 899,
        "redundant start discarded elapsed time: {after_start}"
    );

    std::thread::sleep(std::time::Duration::from_millis(1200));
    let resumed = json(
        &route_request(&state, "POST", &format!("/api/sessions/{id}/resume"), "{}").body,
    );
    let after_resume = resumed["snapshot"]["time_remaining_seconds"]
        .as_u64()
        .expect("time remaining");
    assert!(
        after_resume <= 898,
        "redundant resume discarded elapsed time: {after_resume}"
    );
    assert_eq!(resumed["snapshot"]["phase"], "running");
}

#[test]
fn deleting_a_session_removes_it_from_the_store() {
    let state = state();
    let created = json(&route_request(&state, "POST", "/api/sessions", "").body);
    let id = created["session_id"].as_str().expect("session id").to_string();

    let deleted = route_request(&state, "DELETE", &format!("/api/sessions/{id}"), "");
    assert_eq!(deleted.status_code, 200);
    let deleted = json(&deleted.body);
    assert_eq!(deleted["deleted"], true);
    assert_eq!(deleted["session_id"], id.as_str());

    let fetched = route_request(&state, "GET", &format!("/api/sessions/{id}"), "");
    assert_eq!(fetched.status_code, 404);

    let again = route_request(&state, "DELETE", &format!("/api/sessions/{id}"), "");
    assert_eq!(again.status_code, 404);
}

#[test]
fn empty_registry_serves_a_disabled_game() {
    let state = AppState::new(DataRegistry::from_records(&[], None));

    let health = json(&route_request(&state, "GET", "/api/health", "").body);
    assert_eq!(health["data_available"], false);
    assert_eq!(health["total_stations"], 0);

    let created = json(&route_request(&state, "POST", "/api/sessions", "").body);
    let id = created["session_id"].as_str().expect("session id").to_string();
    let started = json(
        &route_request(&state, "POST", &format!("/api/sessions/{id}/start"), "{}").body,
    );
    // Start is refused with no stations; the session stays inert.
    assert_eq!(started["snapshot"]["phase"], "not_started");
    assert_eq!(started["snapshot"]["data_available"], false);
}
