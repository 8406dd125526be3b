//! Login handshake against a mock panel.

use deployscout_fetch::{ClientSettings, SessionClient};
use deployscout_scrape::{AuthError, Authenticator};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const LOGIN_PAGE: &str = r#"<!DOCTYPE html><html><head>
<meta name="csrf-token" content="abc123">
</head><body><form method="POST" action="/login"></form></body></html>"#;

fn client_for(server: &MockServer) -> SessionClient {
    SessionClient::new(ClientSettings::new(&server.uri()).unwrap()).unwrap()
}

fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

async fn mount_login_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "panel_session=first; Path=/; HttpOnly")
                .set_body_string(LOGIN_PAGE),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_echoes_csrf_token_and_succeeds() {
    let server = MockServer::start().await;
    mount_login_page(&server).await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/dashboard")
                .insert_header("Set-Cookie", "panel_session=second; Path=/"),
        )
        .mount(&server)
        .await;
    Mock::given(path("/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Dashboard</h1>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let outcome = Authenticator::new(client.clone())
        .login("ops@example.com", "hunter2")
        .await
        .unwrap();

    assert_eq!(outcome.status, 200);
    assert_eq!(outcome.final_url, format!("{}/dashboard", server.uri()));
    assert!(outcome.csrf_token_found);
    assert!(outcome.confirmed);
    assert_eq!(client.session().csrf_token().as_deref(), Some("abc123"));
    assert_eq!(
        client.session().cookie_header().as_deref(),
        Some("panel_session=second")
    );

    let requests = server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|r| r.method.as_str() == "POST" && r.url.path() == "/login")
        .unwrap();
    assert_eq!(header(post, "x-csrf-token"), Some("abc123"));
    assert_eq!(header(post, "referer"), Some(format!("{}/login", server.uri()).as_str()));
    assert_eq!(header(post, "cookie"), Some("panel_session=first"));
    assert_eq!(
        String::from_utf8_lossy(&post.body),
        "email=ops%40example.com&password=hunter2"
    );
}

#[tokio::test]
async fn test_failure_phrase_means_invalid_credentials() {
    let server = MockServer::start().await;
    mount_login_page(&server).await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(422).set_body_string(
            "<div class=\"text-error\">These credentials do not match our records.</div>",
        ))
        .mount(&server)
        .await;

    let err = Authenticator::new(client_for(&server))
        .login("ops@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_absence_of_failure_phrase_is_success_even_when_unconfirmed() {
    let server = MockServer::start().await;
    mount_login_page(&server).await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server Error"))
        .mount(&server)
        .await;

    let outcome = Authenticator::new(client_for(&server))
        .login("ops@example.com", "hunter2")
        .await
        .unwrap();
    assert_eq!(outcome.status, 500);
    assert!(!outcome.confirmed);
}

#[tokio::test]
async fn test_login_without_csrf_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<form></form>"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<form></form>"))
        .mount(&server)
        .await;

    let outcome = Authenticator::new(client_for(&server))
        .login("ops@example.com", "hunter2")
        .await
        .unwrap();
    assert!(!outcome.csrf_token_found);
    // Still on the login form.
    assert!(!outcome.confirmed);

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| header(r, "x-csrf-token").is_none()));
}

#[tokio::test]
async fn test_unreachable_host_gives_configuration_guidance() {
    let client = SessionClient::new(ClientSettings::new("http://127.0.0.1:1").unwrap()).unwrap();
    let err = Authenticator::new(client)
        .login("ops@example.com", "hunter2")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::UnreachableHost { .. }));
    let message = err.to_string();
    assert!(message.contains("DEPLOYSCOUT_URL"));
    assert!(message.contains("PANEL_URL"));
    assert!(message.contains("APP_URL"));
}
