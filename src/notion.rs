use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::projects::{NotionPage, ProjectQuery, SortSpec};

pub const API_KEY_VAR: &str = "NOTION_API_KEY";
pub const DATABASE_ID_VAR: &str = "NOTION_DATABASE_ID";
pub const API_BASE_VAR: &str = "NOTION_API_BASE";

pub const DEFAULT_DATABASE_ID: &str = "1f2c8a7e4b9d4f0e8a3c6b5d7e9f1a2b";
pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";

pub static GLOBAL_QUERY_CACHE: LazyLock<QueryCache> = LazyLock::new(QueryCache::default);

static HTTP_CLIENT: LazyLock<Result<reqwest::Client, ProxyError>> = LazyLock::new(|| {
    reqwest::Client::builder()
        .user_agent(concat!("portfolio-site/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ProxyError::from)
});

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProxyError {
    #[error("Notion API key not configured")]
    Configuration,
    #[error("Notion API request failed: {message}")]
    Upstream { status: u16, message: String },
    #[error("Invalid response from Notion: {0}")]
    Validation(String),
    #[error("Invalid request body: {0}")]
    BadRequest(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Configuration | ProxyError::Validation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        let status = err
            .status()
            .map(|s| s.as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY.as_u16());
        ProxyError::Upstream {
            status,
            message: err.to_string(),
        }
    }
}

/// Where the proxy reads its settings from on every request.
pub trait ConfigSource: Send + Sync {
    fn lookup(&self, key: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotionConfig {
    pub api_key: String,
    pub database_id: String,
    pub api_base: String,
}

impl NotionConfig {
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self, ProxyError> {
        let lookup = |key: &str| source.lookup(key).filter(|v| !v.trim().is_empty());
        let api_key = lookup(API_KEY_VAR).ok_or(ProxyError::Configuration)?;
        Ok(Self {
            api_key,
            database_id: lookup(DATABASE_ID_VAR).unwrap_or_else(|| DEFAULT_DATABASE_ID.to_string()),
            api_base: lookup(API_BASE_VAR)
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }

    fn query_url(&self) -> String {
        format!("{}/databases/{}/query", self.api_base, self.database_id)
    }
}

/// Body of a Notion database query.
#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sorts: Option<&'a [SortSpec]>,
}

impl<'a> From<&'a ProjectQuery> for QueryBody<'a> {
    fn from(query: &'a ProjectQuery) -> Self {
        Self {
            filter: query.filters.as_ref(),
            sorts: query.sorts.as_deref(),
        }
    }
}

#[derive(Debug, Clone)]
struct CachedQuery {
    fetched_at: DateTime<Utc>,
    pages: Vec<NotionPage>,
}

/// Upstream page lists keyed by endpoint and query, kept for five minutes.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: DashMap<String, CachedQuery>,
}

impl QueryCache {
    pub const TTL_SECONDS: i64 = 5 * 60;

    pub fn key(config: &NotionConfig, query: &ProjectQuery) -> String {
        let query = serde_json::to_string(query).unwrap_or_default();
        format!("{}|{}|{}", config.api_base, config.database_id, query)
    }

    fn is_fresh(entry: &CachedQuery, now: DateTime<Utc>) -> bool {
        now - entry.fetched_at < Duration::seconds(Self::TTL_SECONDS)
    }

    /// Returns the cached pages if still fresh. An expired entry is removed.
    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<Vec<NotionPage>> {
        let entry = self.entries.get(key)?.value().clone();
        if Self::is_fresh(&entry, now) {
            return Some(entry.pages);
        }
        self.entries.remove_if(key, |_, entry| !Self::is_fresh(entry, now));
        None
    }

    /// Stores a fresh entry and drops every expired one.
    pub fn insert(&self, key: String, pages: Vec<NotionPage>, now: DateTime<Utc>) {
        self.entries.retain(|_, entry| Self::is_fresh(entry, now));
        self.entries.insert(
            key,
            CachedQuery {
                fetched_at: now,
                pages,
            },
        );
    }
}

/// Parses a query response. A missing or non-list `results` is a validation
/// error; individual entries that don't look like pages are dropped.
fn parse_results(body: serde_json::Value) -> Result<Vec<NotionPage>, ProxyError> {
    let results = match body {
        serde_json::Value::Object(mut obj) => obj.remove("results"),
        _ => None,
    };
    match results {
        Some(serde_json::Value::Array(items)) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<NotionPage>(item).ok())
            .collect()),
        Some(_) => Err(ProxyError::Validation("`results` is not a list".to_string())),
        None => Err(ProxyError::Validation("missing `results`".to_string())),
    }
}

async fn query_database(
    config: &NotionConfig,
    query: &ProjectQuery,
) -> Result<Vec<NotionPage>, ProxyError> {
    let client = HTTP_CLIENT.as_ref().map_err(Clone::clone)?;
    let res = client
        .post(config.query_url())
        .bearer_auth(&config.api_key)
        .header("Notion-Version", NOTION_VERSION)
        .json(&QueryBody::from(query))
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let message = res
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or_else(|| status.to_string());
        return Err(ProxyError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    let body = res
        .json::<serde_json::Value>()
        .await
        .map_err(|e| ProxyError::Validation(e.to_string()))?;
    parse_results(body)
}

/// Fetches the project pages that are ready to show.
pub async fn fetch_projects(
    source: &dyn ConfigSource,
    query: &ProjectQuery,
) -> Result<Vec<NotionPage>, ProxyError> {
    let config = NotionConfig::from_source(source)?;
    let cache = &*GLOBAL_QUERY_CACHE;
    let key = QueryCache::key(&config, query);

    let pages = match cache.get(&key, Utc::now()) {
        Some(pages) => {
            tracing::debug!(count = pages.len(), "serving projects from cache");
            pages
        }
        None => {
            let pages = query_database(&config, query).await?;
            cache.insert(key, pages.clone(), Utc::now());
            pages
        }
    };

    let total = pages.len();
    let complete = pages
        .into_iter()
        .filter(NotionPage::is_complete)
        .collect::<Vec<_>>();
    tracing::info!(total, kept = complete.len(), "queried project database");
    Ok(complete)
}
