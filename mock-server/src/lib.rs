//! In-memory stand-in for the hosted Reverse MX API.
//!
//! Serves `GET /api/v1` with the same query parameters as the real service
//! (`apiKey`, `mx`, `from`, `outputFormat`) over a fixed dataset. Pages hold
//! at most `PAGE_SIZE` records and start strictly after the `from` cursor.

use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub const PAGE_SIZE: usize = 300;

/// Key the mock treats as revoked: well-formed, but always answered with 403.
pub const DENIED_API_KEY: &str = "at_00000000000000000000000000000";

/// MX served by the default dataset with several pages of records.
pub const DEFAULT_MX: &str = "aspmx.l.google.com";
pub const DEFAULT_MX_DOMAINS: usize = 650;

const FIRST_PAGE_CURSOR: &str = "0";
const BASE_EPOCH: i64 = 1_530_000_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub first_seen: String,
    pub last_visit: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page {
    pub result: Vec<Record>,
    pub current_page: usize,
    pub size: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub messages: String,
}

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
    pub mx: Option<String>,
    pub from: Option<String>,
    #[serde(rename = "outputFormat")]
    pub output_format: Option<String>,
}

/// Records per MX server, kept sorted by domain name.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    domains: BTreeMap<String, Vec<Record>>,
    denied_keys: HashSet<String>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `names` under `mx`, with synthetic first/last-seen times.
    pub fn with_mx<I, S>(mut self, mx: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let records = self.domains.entry(mx.to_ascii_lowercase()).or_default();
        for (i, name) in names.into_iter().enumerate() {
            let seen = BASE_EPOCH + i as i64 * 60;
            records.push(Record {
                name: name.into(),
                first_seen: seen.to_string(),
                last_visit: (seen + 86_400).to_string(),
            });
        }
        records.sort_by(|a, b| a.name.cmp(&b.name));
        self
    }

    pub fn with_denied_key(mut self, key: &str) -> Self {
        self.denied_keys.insert(key.to_string());
        self
    }

    /// The page of `mx` that follows `cursor`.
    pub fn page(&self, mx: &str, cursor: &str) -> Page {
        let records = self
            .domains
            .get(&mx.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default();
        let start = if cursor == FIRST_PAGE_CURSOR {
            0
        } else {
            records.partition_point(|r| r.name.as_str() <= cursor)
        };
        let result: Vec<Record> = records[start..].iter().take(PAGE_SIZE).cloned().collect();
        Page {
            size: result.len(),
            current_page: start / PAGE_SIZE + 1,
            result,
        }
    }
}

/// `DEFAULT_MX` with `DEFAULT_MX_DOMAINS` generated domains, plus `DENIED_API_KEY`.
pub fn default_dataset() -> Dataset {
    Dataset::new()
        .with_mx(
            DEFAULT_MX,
            (0..DEFAULT_MX_DOMAINS).map(|i| format!("domain-{i:05}.example")),
        )
        .with_denied_key(DENIED_API_KEY)
}

pub type Db = Arc<Dataset>;

pub fn app() -> Router {
    app_with(default_dataset())
}

pub fn app_with(dataset: Dataset) -> Router {
    Router::new()
        .route("/api/v1", get(lookup))
        .with_state(Arc::new(dataset))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, dataset: Dataset) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(dataset)).await
}

async fn lookup(State(db): State<Db>, Query(params): Query<LookupParams>) -> Response {
    let Some(api_key) = params.api_key.filter(|k| !k.is_empty()) else {
        return error(StatusCode::BAD_REQUEST, "Missing apiKey parameter.");
    };
    if !is_well_formed_key(&api_key) || db.denied_keys.contains(&api_key) {
        return error(
            StatusCode::FORBIDDEN,
            "Access restricted. Check credits balance or enter the correct API key.",
        );
    }
    let Some(mx) = params.mx.filter(|mx| !mx.is_empty()) else {
        return error(StatusCode::BAD_REQUEST, "Missing mx parameter.");
    };
    let format = params
        .output_format
        .unwrap_or_else(|| "json".to_string())
        .to_ascii_lowercase();
    let cursor = params
        .from
        .filter(|from| !from.is_empty())
        .unwrap_or_else(|| FIRST_PAGE_CURSOR.to_string());

    let page = db.page(&mx, &cursor);
    match format.as_str() {
        "json" => Json(page).into_response(),
        "xml" => ([(header::CONTENT_TYPE, "application/xml")], to_xml(&page)).into_response(),
        _ => error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Output format should be either JSON or XML.",
        ),
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    let body = ErrorBody {
        code: status.as_u16(),
        messages: message.to_string(),
    };
    (status, Json(body)).into_response()
}

fn is_well_formed_key(key: &str) -> bool {
    key.len() == 32
        && key.get(..3).is_some_and(|prefix| prefix.eq_ignore_ascii_case("at_"))
        && key[3..].chars().all(|c| c.is_ascii_alphanumeric())
}

fn to_xml(page: &Page) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="utf-8"?><response><result>"#);
    for record in &page.result {
        xml.push_str(&format!(
            "<domain><name>{}</name><first_seen>{}</first_seen><last_visit>{}</last_visit></domain>",
            escape(&record.name),
            record.first_seen,
            record.last_visit
        ));
    }
    xml.push_str(&format!(
        "</result><current_page>{}</current_page><size>{}</size></response>",
        page.current_page, page.size
    ));
    xml
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Dataset {
        Dataset::new().with_mx("MX.Example.com", ["c.com", "a.com", "b.com"])
    }

    #[test]
    fn records_are_sorted_by_name() {
        let page = small().page("mx.example.com", "0");
        let names: Vec<&str> = page.result.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a.com", "b.com", "c.com"]);
        assert_eq!(page.size, 3);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn cursor_is_exclusive() {
        let page = small().page("mx.example.com", "a.com");
        let names: Vec<&str> = page.result.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["b.com", "c.com"]);
    }

    #[test]
    fn cursor_past_the_end_yields_empty_page() {
        let page = small().page("mx.example.com", "zzz.com");
        assert!(page.result.is_empty());
        assert_eq!(page.size, 0);
    }

    #[test]
    fn unknown_mx_yields_empty_page() {
        let page = small().page("nothing.example", "0");
        assert!(page.result.is_empty());
    }

    #[test]
    fn pages_are_capped() {
        let dataset = default_dataset();
        let first = dataset.page(DEFAULT_MX, "0");
        assert_eq!(first.size, PAGE_SIZE);
        let last_name = first.result.last().unwrap().name.clone();
        let second = dataset.page(DEFAULT_MX, &last_name);
        assert_eq!(second.current_page, 2);
        assert_eq!(second.result[0].name, "domain-00300.example");
    }

    #[test]
    fn key_shape_check() {
        assert!(is_well_formed_key("at_abcdefghijklmnopqrstuvwxyz012"));
        assert!(is_well_formed_key("AT_ABCDEFGHIJKLMNOPQRSTUVWXYZ012"));
        assert!(!is_well_formed_key("at_short"));
        assert!(!is_well_formed_key("xx_abcdefghijklmnopqrstuvwxyz012"));
    }

    #[test]
    fn xml_body_lists_records() {
        let xml = to_xml(&small().page("mx.example.com", "0"));
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<name>a.com</name>"));
        assert!(xml.contains("<size>3</size>"));
    }

    #[test]
    fn error_body_uses_messages_field() {
        let body = ErrorBody {
            code: 403,
            messages: "denied".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 403);
        assert_eq!(json["messages"], "denied");
    }
}
