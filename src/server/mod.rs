use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;

pub mod api;
pub mod routes;

use crate::data::registry::DataRegistry;

/// Upper bound on a single request (headers + body). Requests beyond this
/// are dropped without a response.
const MAX_REQUEST_BYTES: usize = 1 << 20;

pub fn run_server(bind_addr: &str) -> std::io::Result<()> {
    let registry = DataRegistry::load();
    if registry.is_empty() {
        eprintln!("warning: no station data loaded; the game is disabled until a dataset is imported");
    }
    let state = Arc::new(api::AppState::new(registry));

    let listener = TcpListener::bind(bind_addr)?;
    println!("mrt-recall server listening on http://{bind_addr}");

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&state, &mut stream) {
                    eprintln!("request error: {err}");
                }
            }
            Err(err) => eprintln!("connection failed: {err}"),
        }
    }

    Ok(())
}

/// Reads one request. The headers are read until the blank-line terminator,
/// then the body is read until Content-Length bytes have arrived, however
/// the client chooses to fragment the stream.
fn handle_connection(state: &api::AppState, stream: &mut TcpStream) -> std::io::Result<()> {
    let mut buffer: Vec<u8> = Vec::with_capacity(4096);
    let mut chunk = [0_u8; 4096];

    let header_end = loop {
        let bytes_read = stream.read(&mut chunk)?;
        if bytes_read == 0 {
            if buffer.is_empty() {
                return Ok(());
            }
            // Client closed mid-headers; treat what arrived as the head.
            break buffer.len();
        }
        buffer.extend_from_slice(&chunk[..bytes_read]);
        if let Some(end) = find_header_end(&buffer) {
            break end;
        }
        if buffer.len() > MAX_REQUEST_BYTES {
            return Ok(());
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).into_owned();
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET").to_string();
    let path = request_parts.next().unwrap_or("/").to_string();

    let content_length = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0)
        .min(MAX_REQUEST_BYTES);

    while buffer.len() < header_end + content_length {
        let bytes_read = stream.read(&mut chunk)?;
        if bytes_read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..bytes_read]);
    }

    let body_end = (header_end + content_length).min(buffer.len());
    let body = String::from_utf8_lossy(&buffer[header_end..body_end]);

    let response = routes::route_request(state, &method, &path, &body).to_http_string();
    stream.write_all(response.as_bytes())?;
    stream.flush()?;
    Ok(())
}

/// Index just past the `\r\n\r\n` header terminator, if present.
fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
}

#[cfg(test)]
mod tests {
    use super::find_header_end;

    #[test]
    fn header_terminator_is_found_past_the_blank_line() {
        let raw = b"POST /api/sessions HTTP/1.1\r\nContent-Length: 2\r\n\r\n{}";
        let end = find_header_end(raw).expect("terminator present");
        assert_eq!(&raw[end..], b"{}");
    }

    #[test]
    fn incomplete_headers_have_no_terminator() {
        assert_eq!(find_header_end(b"POST /api/sessions HTTP/1.1\r\nCont"), None);
    }
}
