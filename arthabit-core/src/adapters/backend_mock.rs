//! Mock Arthabit backend for testing
//!
//! This module provides a mock HTTP server that simulates the three backend
//! services (auth, user, expense) on a single port, allowing comprehensive
//! testing without a running backend.
//!
//! The mock implements the same routes and response shapes as the real services:
//! - GET  /auth/v1/ping returns "Ping Successful for user: {uuid}"
//! - POST /auth/v1/login and /auth/v1/signup return { accessToken, token, userId }
//! - POST /auth/v1/refreshToken returns { accessToken, token } (no userId)
//! - GET  /user/v1/getUser?userId={id} returns the profile row
//! - GET  /expense/v1/getExpense returns a JSON array of expense rows
//! - POST /expense/v1/addExpense records the raw body and returns 201
//!
//! Bearer-authenticated routes accept any token starting with "valid"; the
//! tokens issued by the mock itself all carry that prefix so a login or
//! refresh round trip yields tokens the mock will accept afterwards.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use chrono::Utc;
use serde::Serialize;

/// The one user the mock backend knows about.
const MOCK_USER_ID: &str = "f47ac10b-58cc-4372-a567-0e02b2c3d479";

/// Mock backend server for testing
pub struct MockBackend {
    port: u16,
    running: Arc<AtomicBool>,
    thread_handle: Option<thread::JoinHandle<()>>,
    add_expense_bodies: Arc<Mutex<Vec<String>>>,
}

/// Configuration for mock behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Reject every authenticated request and login attempt with 401
    pub fail_auth: bool,
    /// Reject refresh attempts with 403
    pub fail_refresh: bool,
    /// Reject signup attempts with 409 (username already taken)
    pub fail_signup: bool,
    /// Answer ping with 200 but without a user UUID in the body
    pub blank_ping_body: bool,
    /// Sleep this many milliseconds before answering
    pub delay_ms: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            fail_auth: false,
            fail_refresh: false,
            fail_signup: false,
            blank_ping_body: false,
            delay_ms: 0,
        }
    }
}

// Response structures matching the real services

#[derive(Serialize)]
struct TokenResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "token")]
    refresh_token: String,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
}

#[derive(Serialize)]
struct ProfileResponse {
    user_id: String,
    first_name: String,
    last_name: String,
    phone_number: i64,
    email: String,
    profile_pic: Option<String>,
}

#[derive(Serialize)]
struct ExpenseRow {
    amount: f64,
    merchant: String,
    currency: String,
    created_at: String,
    external_id: String,
    user_id: String,
}

#[derive(Serialize)]
struct ApiError {
    status: u16,
    error: String,
    message: String,
    path: String,
    timestamp: String,
}

impl MockBackend {
    /// Start a new mock backend on a random available port
    pub fn start(config: MockConfig) -> Self {
        let listener =
            TcpListener::bind("127.0.0.1:0").expect("failed to bind mock backend listener");
        let port = listener
            .local_addr()
            .expect("failed to read mock backend address")
            .port();
        let running = Arc::new(AtomicBool::new(true));
        let accept_flag = running.clone();
        let add_expense_bodies = Arc::new(Mutex::new(Vec::new()));
        let bodies_clone = add_expense_bodies.clone();

        // Non-blocking accept loop so the server can shut down cleanly
        listener
            .set_nonblocking(true)
            .expect("failed to configure mock backend listener");

        let thread_handle = thread::spawn(move || {
            while accept_flag.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let conn_config = config.clone();
                        let bodies = bodies_clone.clone();
                        thread::spawn(move || {
                            handle_connection(stream, &conn_config, &bodies);
                        });
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            port,
            running,
            thread_handle: Some(thread_handle),
            add_expense_bodies,
        }
    }

    /// Port the listener bound to
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base URL clients should point at
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// The user ID the mock issues on login and embeds in ping responses
    pub fn user_id(&self) -> String {
        MOCK_USER_ID.to_string()
    }

    /// Raw request bodies received by POST /expense/v1/addExpense, in order
    pub fn received_add_expense_bodies(&self) -> Vec<String> {
        self.add_expense_bodies
            .lock()
            .expect("mock body lock poisoned")
            .clone()
    }

    /// Shut the listener down and join the accept thread
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(mut stream: TcpStream, config: &MockConfig, bodies: &Mutex<Vec<String>>) {
    let request = match read_request(&mut stream) {
        Some(request) => request,
        None => return,
    };

    if config.delay_ms > 0 {
        thread::sleep(std::time::Duration::from_millis(config.delay_ms));
    }

    let first_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        let body = error_body(400, "Bad Request", "Invalid request", "/");
        send_response(&mut stream, 400, "Bad Request", "application/json", &body);
        return;
    }

    let method = parts[0];
    let path = parts[1];
    let path_without_query = path.split('?').next().unwrap_or(path);

    match (method, path_without_query) {
        ("GET", "/auth/v1/ping") => {
            if config.fail_auth || !has_valid_bearer(&request) {
                let body = error_body(401, "Unauthorized", "Access token is invalid", path);
                send_response(&mut stream, 401, "Unauthorized", "application/json", &body);
            } else if config.blank_ping_body {
                send_response(&mut stream, 200, "OK", "text/plain", "Ping Successful");
            } else {
                let body = format!("Ping Successful for user: {}", MOCK_USER_ID);
                send_response(&mut stream, 200, "OK", "text/plain", &body);
            }
        }
        ("POST", "/auth/v1/login") => {
            if config.fail_auth {
                let body =
                    error_body(401, "Unauthorized", "Invalid username or password", path);
                send_response(&mut stream, 401, "Unauthorized", "application/json", &body);
            } else {
                let tokens = TokenResponse {
                    access_token: "valid-access-1".to_string(),
                    refresh_token: "refresh-1".to_string(),
                    user_id: Some(MOCK_USER_ID.to_string()),
                };
                let json = serde_json::to_string(&tokens).unwrap();
                send_response(&mut stream, 200, "OK", "application/json", &json);
            }
        }
        ("POST", "/auth/v1/signup") => {
            if config.fail_signup {
                let body = error_body(409, "Conflict", "User already exists", path);
                send_response(&mut stream, 409, "Conflict", "application/json", &body);
            } else {
                let tokens = TokenResponse {
                    access_token: "valid-access-1".to_string(),
                    refresh_token: "refresh-1".to_string(),
                    user_id: Some(MOCK_USER_ID.to_string()),
                };
                let json = serde_json::to_string(&tokens).unwrap();
                send_response(&mut stream, 200, "OK", "application/json", &json);
            }
        }
        ("POST", "/auth/v1/refreshToken") => {
            if config.fail_refresh {
                let body = error_body(403, "Forbidden", "Refresh token is expired", path);
                send_response(&mut stream, 403, "Forbidden", "application/json", &body);
            } else {
                let tokens = TokenResponse {
                    access_token: "valid-access-2".to_string(),
                    refresh_token: "refresh-2".to_string(),
                    user_id: None,
                };
                let json = serde_json::to_string(&tokens).unwrap();
                send_response(&mut stream, 200, "OK", "application/json", &json);
            }
        }
        // The real user service takes userId as a query parameter and no auth headers
        ("GET", "/user/v1/getUser") => {
            let requested = query_param(path, "userId");
            if requested.as_deref() == Some(MOCK_USER_ID) {
                let profile = ProfileResponse {
                    user_id: MOCK_USER_ID.to_string(),
                    first_name: "Wanda".to_string(),
                    last_name: "Maximoff".to_string(),
                    phone_number: 9862048854,
                    email: "wanda@example.com".to_string(),
                    profile_pic: None,
                };
                let json = serde_json::to_string(&profile).unwrap();
                send_response(&mut stream, 200, "OK", "application/json", &json);
            } else {
                let body = error_body(404, "Not Found", "User not found", path);
                send_response(&mut stream, 404, "Not Found", "application/json", &body);
            }
        }
        ("GET", "/expense/v1/getExpense") => {
            if config.fail_auth || !has_valid_bearer(&request) {
                let body = error_body(401, "Unauthorized", "Access token is invalid", path);
                send_response(&mut stream, 401, "Unauthorized", "application/json", &body);
            } else {
                let rows = mock_expense_rows();
                let json = serde_json::to_string(&rows).unwrap();
                send_response(&mut stream, 200, "OK", "application/json", &json);
            }
        }
        ("POST", "/expense/v1/addExpense") => {
            if config.fail_auth || !has_valid_bearer(&request) {
                let body = error_body(401, "Unauthorized", "Access token is invalid", path);
                send_response(&mut stream, 401, "Unauthorized", "application/json", &body);
            } else {
                bodies
                    .lock()
                    .expect("mock body lock poisoned")
                    .push(request_body(&request).to_string());
                send_response(
                    &mut stream,
                    201,
                    "Created",
                    "application/json",
                    r#"{"message": "Expense added"}"#,
                );
            }
        }
        _ => {
            let body = error_body(404, "Not Found", "Endpoint not found", path);
            send_response(&mut stream, 404, "Not Found", "application/json", &body);
        }
    }
}

/// Read a full HTTP request: headers plus the Content-Length body if present
fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buffer = [0; 4096];

    // Read until the header terminator shows up
    let header_end = loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buffer[..n]);
        if let Some(pos) = find_header_end(&data) {
            break pos;
        }
        if data.len() > 64 * 1024 {
            return None;
        }
    };

    let headers = String::from_utf8_lossy(&data[..header_end]).to_string();
    let content_length = headers
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    let body_start = header_end + 4;
    while data.len() < body_start + content_length {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);
    }

    Some(String::from_utf8_lossy(&data).to_string())
}

fn find_header_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|window| window == b"\r\n\r\n")
}

/// The body portion of a raw request, empty if there is none
fn request_body(request: &str) -> &str {
    match request.split_once("\r\n\r\n") {
        Some((_, body)) => body,
        None => "",
    }
}

/// Check the Authorization header carries a token the mock accepts.
/// Any token starting with "valid" passes, which covers both the fixed
/// tokens used directly in tests and the tokens the mock itself issues.
fn has_valid_bearer(request: &str) -> bool {
    let request_lower = request.to_lowercase();
    request_lower.contains("authorization: bearer valid")
}

fn query_param(path: &str, name: &str) -> Option<String> {
    let query = path.split_once('?')?.1;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == name {
            Some(value.to_string())
        } else {
            None
        }
    })
}

fn error_body(status: u16, error: &str, message: &str, path: &str) -> String {
    let body = ApiError {
        status,
        error: error.to_string(),
        message: message.to_string(),
        path: path.split('?').next().unwrap_or(path).to_string(),
        timestamp: Utc::now().format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
    };
    serde_json::to_string(&body).unwrap()
}

fn send_response(
    stream: &mut TcpStream,
    status: u16,
    status_text: &str,
    content_type: &str,
    body: &str,
) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n\r\n{}",
        status,
        status_text,
        content_type,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn mock_expense_rows() -> Vec<ExpenseRow> {
    vec![
        ExpenseRow {
            amount: 250.0,
            merchant: "Chai Point".to_string(),
            currency: "INR".to_string(),
            created_at: "2025-08-09T12:30:00.000+00:00".to_string(),
            external_id: "exp-1".to_string(),
            user_id: MOCK_USER_ID.to_string(),
        },
        ExpenseRow {
            amount: 12.5,
            merchant: "Starbucks".to_string(),
            currency: "USD".to_string(),
            created_at: "2025-08-10T09:15:00.000+00:00".to_string(),
            external_id: "exp-2".to_string(),
            user_id: MOCK_USER_ID.to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_backend_starts() {
        let server = MockBackend::start(MockConfig::default());
        assert!(server.port() > 0);
    }

    #[test]
    fn test_unknown_endpoint_returns_404() {
        let server = MockBackend::start(MockConfig::default());

        let mut stream = TcpStream::connect(("127.0.0.1", server.port())).unwrap();
        stream
            .write_all(b"GET /nope HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();

        assert!(response.starts_with("HTTP/1.1 404"));
        assert!(response.contains("Endpoint not found"));
    }

    #[test]
    fn test_query_param_extraction() {
        assert_eq!(
            query_param("/user/v1/getUser?userId=abc", "userId"),
            Some("abc".to_string())
        );
        assert_eq!(query_param("/user/v1/getUser", "userId"), None);
        assert_eq!(
            query_param("/user/v1/getUser?other=1&userId=abc", "userId"),
            Some("abc".to_string())
        );
    }

    #[test]
    fn test_request_body_extraction() {
        let raw = "POST /x HTTP/1.1\r\nContent-Length: 2\r\n\r\nhi";
        assert_eq!(request_body(raw), "hi");
        assert_eq!(request_body("GET /x HTTP/1.1\r\n\r\n"), "");
    }
}
