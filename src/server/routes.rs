use crate::server::api::{self, ApiError, AppState};

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

pub fn route_request(state: &AppState, method: &str, path: &str, body: &str) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);

    match (method, path) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "text/html; charset=utf-8",
            body: index_html(),
        },
        ("GET", "/api/health") => json_result(api::health_payload(state)),
        ("GET", "/api/stations") => json_result(api::stations_payload(state)),
        ("GET", "/api/lines") => json_result(api::lines_payload(state)),
        ("POST", "/api/sessions") => json_result(api::session_create_payload(state, body)),
        (method, path) if path.starts_with("/api/sessions/") => {
            let rest = path.trim_start_matches("/api/sessions/");
            let mut parts = rest.splitn(2, '/');
            let id = parts.next().unwrap_or("");
            match (method, parts.next()) {
                ("GET", None) => json_result(api::session_get_payload(state, id)),
                ("DELETE", None) => json_result(api::session_delete_payload(state, id)),
                ("POST", Some(action)) => {
                    json_result(api::session_action_payload(state, id, action, body))
                }
                _ => error_response(404, "Not Found", "Route not found"),
            }
        }
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn json_result(result: Result<String, ApiError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body: payload,
        },
        Err(ApiError::SessionNotFound) => error_response(404, "Not Found", "Session not found"),
        Err(err @ ApiError::Parse(_)) => error_response(400, "Bad Request", &err.to_string()),
        Err(ApiError::Validation(msg)) => error_response(400, "Bad Request", &msg),
        Err(err @ ApiError::Internal(_)) => {
            error_response(500, "Internal Server Error", &err.to_string())
        }
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn index_html() -> String {
    r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>MRT Recall</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 900px; margin: 24px auto; padding: 0 12px; }
    h1 { margin-bottom: 8px; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 14px; margin: 14px 0; }
    label { display:block; margin: 8px 0 4px; font-weight: 600; }
    input, select { padding: 8px; box-sizing: border-box; }
    button { margin-top: 8px; padding: 8px 14px; }
    pre { background: #111; color: #aef2ae; padding: 12px; overflow: auto; border-radius: 6px; min-height: 180px; }
  </style>
</head>
<body>
  <h1>MRT Recall</h1>
  <p>Name every station before the clock runs out.</p>

  <div class="card">
    <label for="language">Answer language</label>
    <select id="language">
      <option value="english">English</option>
      <option value="pinyin">Pinyin</option>
      <option value="chinese">中文</option>
      <option value="abbreviation">Abbreviation</option>
    </select>
    <div>
      <button id="new-btn">New session</button>
      <button id="start-btn">Start</button>
      <button id="pause-btn">Pause</button>
      <button id="resume-btn">Resume</button>
      <button id="giveup-btn">Give up</button>
    </div>
    <label for="guess">Guess</label>
    <input id="guess" placeholder="Type a station name..." />
    <button id="guess-btn">Submit</button>
  </div>

  <pre id="output">Ready.</pre>

  <script>
    const output = document.getElementById('output');
    let sessionId = null;

    async function call(path, options) {
      const response = await fetch(path, options);
      const text = await response.text();
      output.textContent = 'HTTP ' + response.status + '\n' + text;
      try { return JSON.parse(text); } catch (e) { return null; }
    }

    document.getElementById('new-btn').addEventListener('click', async () => {
      const language = document.getElementById('language').value;
      const data = await call('/api/sessions', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ language }),
      });
      if (data) sessionId = data.session_id;
    });

    function action(name) {
      return async () => {
        if (!sessionId) { output.textContent = 'Create a session first.'; return; }
        await call('/api/sessions/' + sessionId + '/' + name, { method: 'POST', body: '{}' });
      };
    }
    document.getElementById('start-btn').addEventListener('click', action('start'));
    document.getElementById('pause-btn').addEventListener('click', action('pause'));
    document.getElementById('resume-btn').addEventListener('click', action('resume'));
    document.getElementById('giveup-btn').addEventListener('click', action('giveup'));

    document.getElementById('guess-btn').addEventListener('click', async () => {
      if (!sessionId) { output.textContent = 'Create a session first.'; return; }
      const text = document.getElementById('guess').value;
      await call('/api/sessions/' + sessionId + '/guess', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ text }),
      });
      document.getElementById('guess').value = '';
    });
  </script>
</body>
</html>
"#
    .to_string()
}
