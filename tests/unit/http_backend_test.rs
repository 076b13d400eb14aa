//! Unit tests for the REST client: status classification, message parsing,
//! request shape, and 401 handling against a one-shot local HTTP responder.

use std::sync::Arc;

use reqwest::StatusCode;
use rstest::rstest;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use stampbook::api::client::{check_status, error_message, parse_message};
use stampbook::api::{AccountBackend, HttpBackend, StampBackend};
use stampbook::database::{Database, LocalStorage};
use stampbook::managers::session_manager::{SessionManager, SessionManagerTrait};
use stampbook::types::errors::ApiError;
use stampbook::types::settings::ApiSettings;

fn session() -> Arc<SessionManager> {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    Arc::new(SessionManager::new(LocalStorage::new(db)))
}

fn backend(base_url: &str, session: Arc<SessionManager>) -> HttpBackend {
    let settings = ApiSettings {
        base_url: base_url.to_string(),
        request_timeout_secs: 5,
    };
    HttpBackend::new(&settings, session).expect("client should build")
}

/// Accepts one connection, replies with the given status and body, and yields the raw request text.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let lower = l.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                    })
                    .unwrap_or(0);
                if raw.len() >= end + 4 + length {
                    break;
                }
            }
        }
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&raw).to_string()
    });
    (format!("http://{}/api", addr), handle)
}

#[rstest]
#[case(200, true)]
#[case(201, true)]
#[case(204, true)]
#[case(400, false)]
#[case(404, false)]
#[case(500, false)]
fn test_check_status_success_range(#[case] code: u16, #[case] ok: bool) {
    let status = StatusCode::from_u16(code).unwrap();
    assert_eq!(check_status(status, "").is_ok(), ok);
}

#[test]
fn test_check_status_401_is_unauthorized() {
    assert_eq!(
        check_status(StatusCode::UNAUTHORIZED, "{\"message\":\"expired\"}"),
        Err(ApiError::Unauthorized)
    );
}

#[test]
fn test_check_status_carries_backend_message() {
    assert_eq!(
        check_status(StatusCode::CONFLICT, "{\"message\":\"이미 추가된 장소입니다\"}"),
        Err(ApiError::Status {
            code: 409,
            message: "이미 추가된 장소입니다".to_string()
        })
    );
}

#[rstest]
#[case("{\"message\":\"board not found\"}", "board not found")]
#[case("{\"message\":\"\"}", "HTTP 404")]
#[case("{\"error\":\"x\"}", "HTTP 404")]
#[case("<html>Not Found</html>", "HTTP 404")]
#[case("", "HTTP 404")]
fn test_error_message_fallback(#[case] body: &str, #[case] expected: &str) {
    assert_eq!(error_message(404, body), expected);
}

#[rstest]
#[case("\"북마크 추가 완료\"", "북마크 추가 완료")]
#[case("북마크 추가 완료\n", "북마크 추가 완료")]
#[case("", "")]
fn test_parse_message_accepts_json_or_text(#[case] body: &str, #[case] expected: &str) {
    assert_eq!(parse_message(body), expected);
}

#[test]
fn test_base_url_trailing_slash_is_trimmed() {
    let backend = backend("http://localhost:8080/api/", session());
    assert_eq!(backend.base_url(), "http://localhost:8080/api");
    assert_eq!(
        backend.endpoint("/stampboards/me/boards"),
        "http://localhost:8080/api/stampboards/me/boards"
    );
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let backend = backend("http://127.0.0.1:1/api", session());
    assert!(matches!(
        backend.list_boards().await,
        Err(ApiError::Network(_))
    ));
}

#[tokio::test]
async fn test_list_boards_sends_bearer_and_parses_numeric_ids() {
    let body = r##"[{"id":5,"title":"카페 스탬프","color":"#153641","createdAt":"2024-01-01T00:00:00.000Z","user":{"id":1},
        "bookmarks":[{"id":9,"placeName":"스타벅스","address":"서울","latitude":37.5665,"longitude":126.978,"visited":true,"user":{"id":1}}]}]"##;
    let (base, request) = serve_once("200 OK", body).await;
    let session = session();
    session.login("secret-token", None).unwrap();

    let boards = backend(&base, session).list_boards().await.unwrap();

    assert_eq!(boards[0].id, "5");
    assert_eq!(boards[0].bookmarks[0].id, "9");
    let raw = request.await.unwrap();
    assert!(raw.starts_with("GET /api/stampboards/me/boards "));
    assert!(raw
        .to_ascii_lowercase()
        .contains("authorization: bearer secret-token"));
}

#[tokio::test]
async fn test_membership_sends_raw_bookmark_id_body() {
    let (base, request) = serve_once("200 OK", "\"스탬프보드에 북마크 추가 완료\"").await;
    let message = backend(&base, session())
        .add_bookmark_to_board("3", "17")
        .await
        .unwrap();

    assert_eq!(message, "스탬프보드에 북마크 추가 완료");
    let raw = request.await.unwrap();
    assert!(raw.starts_with("POST /api/stampboards/3/bookmark "));
    assert!(raw.ends_with("\r\n\r\n17"));
}

#[tokio::test]
async fn test_query_parameters_are_encoded() {
    let (base, request) = serve_once("200 OK", "\"ok\"").await;
    backend(&base, session())
        .rename_board("2", "맛집 & 카페")
        .await
        .unwrap();
    let raw = request.await.unwrap();
    let first_line = raw.lines().next().unwrap_or_default().to_string();
    assert!(first_line.starts_with("PATCH /api/stampboards/2/title?title="));
    assert_eq!(first_line.matches(' ').count(), 2, "spaces must be encoded");
    assert!(!first_line.contains('&'), "ampersand must be percent-encoded");
}

#[tokio::test]
async fn test_401_clears_token_and_requests_login() {
    let (base, _request) = serve_once("401 Unauthorized", "{\"message\":\"expired\"}").await;
    let session = session();
    session.login("stale-token", None).unwrap();

    let result = backend(&base, session.clone()).me().await;

    assert_eq!(result, Err(ApiError::Unauthorized));
    assert_eq!(session.token(), None);
    assert!(session.take_login_required());
}

#[tokio::test]
async fn test_unparsable_body_is_parse_error() {
    let (base, _request) = serve_once("200 OK", "{\"not\":\"a list\"}").await;
    assert!(matches!(
        backend(&base, session()).list_boards().await,
        Err(ApiError::Parse(_))
    ));
}
