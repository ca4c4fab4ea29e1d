use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, Account, Page, PageList};
use serde_json::Value;
use tower::{Service, ServiceExt};

/// `[{"tag":"p","children":["Hello, world!"]}]`, form-encoded.
const PARAGRAPH: &str =
    "%5B%7B%22tag%22%3A%22p%22%2C%22children%22%3A%5B%22Hello%2C%20world%21%22%5D%7D%5D";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(body.to_string())
        .unwrap()
}

/// Send one request through a shared router and return the envelope.
async fn call(app: &mut Router, uri: &str, body: &str) -> Value {
    let resp = ServiceExt::<Request<String>>::ready(app)
        .await
        .unwrap()
        .call(form_request(uri, body))
        .await
        .unwrap();
    body_json(resp).await
}

fn result<T: serde::de::DeserializeOwned>(envelope: Value) -> T {
    assert_eq!(envelope["ok"], true, "unexpected envelope: {envelope}");
    serde_json::from_value(envelope["result"].clone()).unwrap()
}

fn error(envelope: &Value) -> &str {
    assert_eq!(envelope["ok"], false, "unexpected envelope: {envelope}");
    envelope["error"].as_str().unwrap()
}

// --- accounts ---

#[tokio::test]
async fn create_account_returns_token() {
    let request = form_request("/createAccount", "short_name=Sandbox&author_name=Anna");
    let resp = app().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let account: Account = result(body_json(resp).await);
    assert_eq!(account.short_name.as_deref(), Some("Sandbox"));
    assert_eq!(account.author_name.as_deref(), Some("Anna"));
    assert!(account.access_token.is_some());
    assert!(account.auth_url.is_some());
}

#[tokio::test]
async fn create_account_requires_short_name() {
    let resp = app()
        .oneshot(form_request("/createAccount", "author_name=Anna"))
        .await
        .unwrap();
    assert_eq!(error(&body_json(resp).await), "SHORT_NAME_REQUIRED");
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let resp = app()
        .oneshot(form_request("/getAccountInfo", "access_token=nope"))
        .await
        .unwrap();
    assert_eq!(error(&body_json(resp).await), "ACCESS_TOKEN_INVALID");
}

// --- pages ---

#[tokio::test]
async fn get_missing_page() {
    let resp = app()
        .oneshot(form_request("/getPage", "path=Missing-01-01"))
        .await
        .unwrap();
    assert_eq!(error(&body_json(resp).await), "PAGE_NOT_FOUND");
}

#[tokio::test]
async fn unknown_method_returns_error_envelope() {
    let resp = app()
        .oneshot(form_request("/deletePage", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(error(&body_json(resp).await), "UNKNOWN_METHOD");
}

#[tokio::test]
async fn get_views_requires_coarser_periods() {
    let resp = app()
        .oneshot(form_request("/getViews", "path=Sample&year=2017&hour=3"))
        .await
        .unwrap();
    assert_eq!(error(&body_json(resp).await), "DAY_REQUIRED");
}

// --- full lifecycle ---

#[tokio::test]
async fn page_lifecycle() {
    let mut app = app();

    let account: Account = result(call(&mut app, "/createAccount", "short_name=Sandbox").await);
    let token = account.access_token.unwrap();

    // content must be a node array
    let env = call(
        &mut app,
        "/createPage",
        &format!("access_token={token}&title=Sample%20Page&content=%7B%7D"),
    )
    .await;
    assert_eq!(error(&env), "CONTENT_FORMAT_INVALID");

    // create
    let page: Page = result(
        call(
            &mut app,
            "/createPage",
            &format!(
                "access_token={token}&title=Sample%20Page&content={PARAGRAPH}&return_content=true"
            ),
        )
        .await,
    );
    assert!(page.path.starts_with("Sample-Page-"));
    assert!(page.can_edit);
    assert_eq!(page.description, "Hello, world!");
    assert_eq!(
        page.content.unwrap(),
        serde_json::json!([{"tag": "p", "children": ["Hello, world!"]}])
    );

    // get without, then with content; each read counts a view
    let by_path = format!("path={}", page.path);
    let fetched: Page = result(call(&mut app, "/getPage", &by_path).await);
    assert!(fetched.content.is_none());
    let with_content = format!("{by_path}&return_content=true");
    let fetched: Page = result(call(&mut app, "/getPage", &with_content).await);
    assert!(fetched.content.is_some());
    let views = call(&mut app, "/getViews", &by_path).await;
    assert_eq!(views["result"]["views"], 2);

    // edit
    let edit_uri = format!("/editPage/{}", page.path);
    let body = format!("access_token={token}&title=Renamed&content=%5B%22plain%22%5D");
    let edited: Page = result(call(&mut app, &edit_uri, &body).await);
    assert_eq!(edited.title, "Renamed");
    assert_eq!(edited.path, page.path);

    // another account cannot edit it
    let other: Account = result(call(&mut app, "/createAccount", "short_name=Other").await);
    let body = format!(
        "access_token={}&title=Hijack&content=%5B%22x%22%5D",
        other.access_token.unwrap()
    );
    let env = call(&mut app, &edit_uri, &body).await;
    assert_eq!(error(&env), "PAGE_ACCESS_DENIED");

    // list and page count
    let auth = format!("access_token={token}");
    let list: PageList = result(call(&mut app, "/getPageList", &auth).await);
    assert_eq!(list.total_count, 1);
    assert_eq!(list.pages[0].path, page.path);
    let info: Account = result(
        call(
            &mut app,
            "/getAccountInfo",
            &format!("access_token={token}&fields=%5B%22page_count%22%5D"),
        )
        .await,
    );
    assert_eq!(info.page_count, Some(1));
    assert!(info.short_name.is_none());

    // revoke: old token stops working
    let revoked: Account = result(call(&mut app, "/revokeAccessToken", &auth).await);
    let fresh = revoked.access_token.unwrap();
    assert_ne!(fresh, token);
    let env = call(&mut app, "/getPageList", &auth).await;
    assert_eq!(error(&env), "ACCESS_TOKEN_INVALID");
    let fresh_auth = format!("access_token={fresh}");
    let list: PageList = result(call(&mut app, "/getPageList", &fresh_auth).await);
    assert_eq!(list.total_count, 1);
}
