//! Session client behaviour against a local mock server.

use deployscout_fetch::{ClientSettings, FetchError, RequestOptions, ResponseBody, SessionClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> SessionClient {
    SessionClient::new(ClientSettings::new(&server.uri()).unwrap()).unwrap()
}

fn header<'a>(request: &'a wiremock::Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn test_cookies_set_on_redirect_are_sent_to_next_hop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/next")
                .append_header("Set-Cookie", "a=1; Path=/; HttpOnly")
                .append_header("Set-Cookie", "b=2; Path=/"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.get("/start").await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.url, format!("{}/next", server.uri()));
    assert_eq!(response.text(), "ok");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(header(&requests[0], "cookie"), None);
    assert_eq!(header(&requests[1], "cookie"), Some("a=1; b=2"));
}

#[tokio::test]
async fn test_latest_cookie_value_wins() {
    let server = MockServer::start().await;
    Mock::given(path("/one"))
        .respond_with(ResponseTemplate::new(200).insert_header("Set-Cookie", "s=old; Path=/"))
        .mount(&server)
        .await;
    Mock::given(path("/two"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", "s=new; Path=/")
                .append_header("Set-Cookie", "t=1"),
        )
        .mount(&server)
        .await;
    Mock::given(path("/three"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.get("/one").await.unwrap();
    client.get("/two").await.unwrap();
    client.get("/three").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(header(&requests[1], "cookie"), Some("s=old"));
    assert_eq!(header(&requests[2], "cookie"), Some("s=new; t=1"));
}

#[tokio::test]
async fn test_relative_location_resolves_against_base() {
    let server = MockServer::start().await;
    Mock::given(path("/a/b"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "foo"))
        .mount(&server)
        .await;
    Mock::given(path("/a/c"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/foo"))
        .mount(&server)
        .await;
    Mock::given(path("/foo"))
        .respond_with(ResponseTemplate::new(200).set_body_string("landed"))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let response = client.get("/a/b").await.unwrap();
    assert_eq!(response.url, format!("{}/foo", server.uri()));
    assert_eq!(response.text(), "landed");

    let response = client.get("/a/c").await.unwrap();
    assert_eq!(response.url, format!("{}/foo", server.uri()));
}

#[tokio::test]
async fn test_redirect_replays_method_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/done"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/done"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let options = RequestOptions::post_form([("k", "v")]).header("X-Extra", "1");
    let response = client.request("/submit", &options).await.unwrap();
    assert_eq!(response.status, 200);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let replay = &requests[1];
    assert_eq!(replay.method.as_str(), "POST");
    assert_eq!(String::from_utf8_lossy(&replay.body), "k=v");
    assert_eq!(header(replay, "x-extra"), Some("1"));
    assert_eq!(
        header(replay, "content-type"),
        Some("application/x-www-form-urlencoded")
    );
}

#[tokio::test]
async fn test_redirect_loop_is_capped() {
    let server = MockServer::start().await;
    Mock::given(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
        .mount(&server)
        .await;

    let settings = ClientSettings::new(&server.uri())
        .unwrap()
        .with_max_redirects(3);
    let client = SessionClient::new(settings).unwrap();

    let err = client.get("/loop").await.unwrap_err();
    assert!(matches!(err, FetchError::TooManyRedirects { limit: 3, .. }));

    // The original request plus three followed hops.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_non_success_status_is_a_response() {
    let server = MockServer::start().await;
    Mock::given(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
        .mount(&server)
        .await;
    Mock::given(path("/boom"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.get("/missing").await.unwrap();
    assert_eq!(response.status, 404);
    assert!(!response.is_success());
    assert_eq!(response.body, ResponseBody::Text("nope".into()));

    let response = client.get("/boom").await.unwrap();
    assert_eq!(response.status, 500);
}

#[tokio::test]
async fn test_redirect_without_location_is_returned() {
    let server = MockServer::start().await;
    Mock::given(path("/cached"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.get("/cached").await.unwrap();
    assert_eq!(response.status, 304);
}

#[tokio::test]
async fn test_json_body_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"ok"}"#))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.get("/api").await.unwrap();
    let json = response.body.as_json().expect("json body");
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_csrf_token_from_page_is_sent_on_every_request() {
    let server = MockServer::start().await;
    Mock::given(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><meta name="csrf-token" content="fresh-token"></head></html>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(path("/after"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.get("/page").await.unwrap();
    assert_eq!(client.session().csrf_token().as_deref(), Some("fresh-token"));

    client.get("/after").await.unwrap();
    let requests = server.received_requests().await.unwrap();
    assert_eq!(header(&requests[0], "x-csrf-token"), None);
    assert_eq!(header(&requests[1], "x-csrf-token"), Some("fresh-token"));
}

#[tokio::test]
async fn test_page_without_token_keeps_held_token() {
    let server = MockServer::start().await;
    Mock::given(path("/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>no meta</p>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.session().set_csrf_token(Some("held".into()));
    client.get("/plain").await.unwrap();
    assert_eq!(client.session().csrf_token().as_deref(), Some("held"));
}

#[tokio::test]
async fn test_refused_connection_is_transport_error() {
    let settings = ClientSettings::new("http://127.0.0.1:1").unwrap();
    let client = SessionClient::new(settings).unwrap();

    let err = client.get("/login").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
    assert!(err.is_unreachable());
}
