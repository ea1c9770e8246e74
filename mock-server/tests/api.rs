use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, ErrorBody, Page, DEFAULT_MX, DENIED_API_KEY, PAGE_SIZE};
use tower::ServiceExt;

const API_KEY: &str = "at_abcdefghijklmnopqrstuvwxyz012";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn lookup_request(query: &str) -> Request<String> {
    Request::builder()
        .uri(format!("/api/v1?{query}"))
        .body(String::new())
        .unwrap()
}

async fn get(query: &str) -> axum::response::Response {
    app().oneshot(lookup_request(query)).await.unwrap()
}

// --- pages ---

#[tokio::test]
async fn first_page_is_full() {
    let resp = get(&format!("apiKey={API_KEY}&mx={DEFAULT_MX}&from=0&outputFormat=JSON")).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let page: Page = body_json(resp).await;
    assert_eq!(page.size, PAGE_SIZE);
    assert_eq!(page.result.len(), PAGE_SIZE);
    assert_eq!(page.current_page, 1);
    assert_eq!(page.result[0].name, "domain-00000.example");
}

#[tokio::test]
async fn cursor_starts_after_given_domain() {
    let resp = get(&format!(
        "apiKey={API_KEY}&mx={DEFAULT_MX}&from=domain-00599.example&outputFormat=json"
    ))
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let page: Page = body_json(resp).await;
    assert_eq!(page.size, 50);
    assert_eq!(page.result[0].name, "domain-00600.example");
    assert_eq!(page.result.last().unwrap().name, "domain-00649.example");
}

#[tokio::test]
async fn mx_lookup_is_case_insensitive() {
    let resp = get(&format!("apiKey={API_KEY}&mx=ASPMX.L.GOOGLE.COM")).await;

    let page: Page = body_json(resp).await;
    assert_eq!(page.size, PAGE_SIZE);
}

#[tokio::test]
async fn unknown_mx_returns_empty_page() {
    let resp = get(&format!("apiKey={API_KEY}&mx=mx.nowhere.example")).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let page: Page = body_json(resp).await;
    assert_eq!(page.size, 0);
    assert!(page.result.is_empty());
}

#[tokio::test]
async fn xml_output_format() {
    let resp = get(&format!("apiKey={API_KEY}&mx={DEFAULT_MX}&outputFormat=XML")).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(text.starts_with("<?xml"));
    assert!(text.contains("<name>domain-00000.example</name>"));
}

// --- errors ---

#[tokio::test]
async fn denied_key_returns_403() {
    let resp = get(&format!("apiKey={DENIED_API_KEY}&mx={DEFAULT_MX}")).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.code, 403);
    assert!(body.messages.starts_with("Access restricted"));
}

#[tokio::test]
async fn malformed_key_returns_403() {
    let resp = get(&format!("apiKey=at_short&mx={DEFAULT_MX}")).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_key_returns_400() {
    let resp = get(&format!("mx={DEFAULT_MX}")).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.code, 400);
}

#[tokio::test]
async fn missing_mx_returns_400() {
    let resp = get(&format!("apiKey={API_KEY}")).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unsupported_format_returns_422() {
    let resp = get(&format!("apiKey={API_KEY}&mx={DEFAULT_MX}&outputFormat=csv")).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.code, 422);
}

#[tokio::test]
async fn unknown_path_returns_404() {
    let resp = app()
        .oneshot(Request::builder().uri("/api/v2").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full walk ---

#[tokio::test]
async fn walk_every_page() {
    use tower::Service;

    let mut app = app().into_service();
    let mut cursor = "0".to_string();
    let mut seen = Vec::new();

    loop {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(lookup_request(&format!(
                "apiKey={API_KEY}&mx={DEFAULT_MX}&from={cursor}"
            )))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let page: Page = body_json(resp).await;
        seen.extend(page.result.iter().map(|r| r.name.clone()));
        if page.size < PAGE_SIZE {
            break;
        }
        cursor = page.result.last().unwrap().name.clone();
    }

    assert_eq!(seen.len(), mock_server::DEFAULT_MX_DOMAINS);
    let mut sorted = seen.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted, seen);
}
