//! In-memory Telegraph API used by the client's integration tests.
//!
//! Every method is a form POST answered with an `{ ok, result, error }`
//! envelope. State lives in one `RwLock`-guarded store and is lost when the
//! router is dropped.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

const DEFAULT_FIELDS: [&str; 3] = ["short_name", "author_name", "author_url"];
const DESCRIPTION_LIMIT: usize = 150;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Account {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Page {
    pub path: String,
    pub url: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    pub views: u64,
    #[serde(default)]
    pub can_edit: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageList {
    pub total_count: u64,
    pub pages: Vec<Page>,
}

#[derive(Clone, Debug)]
struct AccountRecord {
    id: Uuid,
    short_name: String,
    author_name: String,
    author_url: String,
    auth_url: String,
}

#[derive(Clone, Debug)]
struct PageRecord {
    owner: Uuid,
    path: String,
    title: String,
    author_name: String,
    author_url: String,
    content: Value,
    views: u64,
}

impl PageRecord {
    fn to_page(&self, return_content: bool, can_edit: bool) -> Page {
        Page {
            path: self.path.clone(),
            url: format!("https://telegra.ph/{}", self.path),
            title: self.title.clone(),
            description: describe(&self.content),
            author_name: non_empty(&self.author_name),
            author_url: non_empty(&self.author_url),
            content: return_content.then(|| self.content.clone()),
            views: self.views,
            can_edit,
        }
    }
}

#[derive(Default)]
pub struct Store {
    accounts: HashMap<String, AccountRecord>,
    /// Creation order; listings reverse it.
    pages: Vec<PageRecord>,
}

pub type Db = Arc<RwLock<Store>>;

type Params = HashMap<String, String>;
type Reply = std::result::Result<Value, &'static str>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/createAccount", post(create_account))
        .route("/editAccountInfo", post(edit_account_info))
        .route("/getAccountInfo", post(get_account_info))
        .route("/revokeAccessToken", post(revoke_access_token))
        .route("/createPage", post(create_page))
        .route("/editPage/{path}", post(edit_page))
        .route("/getPage", post(get_page))
        .route("/getPageList", post(get_page_list))
        .route("/getViews", post(get_views))
        .fallback(unknown_method)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn envelope(reply: Reply) -> Json<Value> {
    match reply {
        Ok(result) => Json(json!({ "ok": true, "result": result })),
        Err(error) => {
            tracing::debug!(error, "telegraph call rejected");
            Json(json!({ "ok": false, "error": error }))
        }
    }
}

async fn unknown_method() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "ok": false, "error": "UNKNOWN_METHOD" })),
    )
}

fn param<'a>(params: &'a Params, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

fn flag(params: &Params, name: &str) -> bool {
    param(params, name) == Some("true")
}

fn number(params: &Params, name: &str) -> std::result::Result<Option<u64>, &'static str> {
    param(params, name)
        .map(|v| v.parse().map_err(|_| "INVALID_NUMBER"))
        .transpose()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn authorized<'a>(
    store: &'a Store,
    params: &Params,
) -> std::result::Result<&'a AccountRecord, &'static str> {
    param(params, "access_token")
        .and_then(|token| store.accounts.get(token))
        .ok_or("ACCESS_TOKEN_INVALID")
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

fn new_auth_url() -> String {
    format!("https://edit.telegra.ph/auth/{}", Uuid::new_v4().simple())
}

fn account_fields(record: &AccountRecord, page_count: u64, fields: &[String]) -> Value {
    let mut result = Map::new();
    for field in fields {
        let value = match field.as_str() {
            "short_name" => json!(record.short_name),
            "author_name" => json!(record.author_name),
            "author_url" => json!(record.author_url),
            "auth_url" => json!(record.auth_url),
            "page_count" => json!(page_count),
            _ => continue,
        };
        result.insert(field.clone(), value);
    }
    Value::Object(result)
}

fn default_fields() -> Vec<String> {
    DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect()
}

/// Content is a JSON array of strings and `{tag, attrs?, children?}` objects.
fn valid_content(value: &Value) -> bool {
    fn valid_node(node: &Value) -> bool {
        match node {
            Value::String(_) => true,
            Value::Object(object) => {
                matches!(object.get("tag"), Some(Value::String(_)))
                    && match object.get("attrs") {
                        None => true,
                        Some(Value::Object(attrs)) => attrs.values().all(Value::is_string),
                        Some(_) => false,
                    }
                    && match object.get("children") {
                        None => true,
                        Some(Value::Array(children)) => children.iter().all(valid_node),
                        Some(_) => false,
                    }
            }
            _ => false,
        }
    }
    matches!(value, Value::Array(nodes) if !nodes.is_empty() && nodes.iter().all(valid_node))
}

fn parse_content(params: &Params) -> std::result::Result<Value, &'static str> {
    let raw = param(params, "content").ok_or("CONTENT_REQUIRED")?;
    let content: Value = serde_json::from_str(raw).map_err(|_| "CONTENT_FORMAT_INVALID")?;
    if valid_content(&content) {
        Ok(content)
    } else {
        Err("CONTENT_FORMAT_INVALID")
    }
}

/// Text of the content in document order, cut to a short summary.
fn describe(content: &Value) -> String {
    fn collect(node: &Value, out: &mut String) {
        match node {
            Value::String(text) => out.push_str(text),
            Value::Array(nodes) => nodes.iter().for_each(|n| collect(n, out)),
            Value::Object(object) => {
                if let Some(children) = object.get("children") {
                    collect(children, out);
                }
            }
            _ => {}
        }
    }
    let mut text = String::new();
    collect(content, &mut text);
    text.chars().take(DESCRIPTION_LIMIT).collect()
}

/// `Title-Words-MM-DD`, with `-N` appended while the path is taken.
fn page_path(store: &Store, title: &str) -> String {
    let slug = title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    let slug = if slug.is_empty() {
        "Untitled".to_string()
    } else {
        slug
    };
    let base = format!("{slug}-{}", chrono::Utc::now().format("%m-%d"));

    let taken = |path: &str| store.pages.iter().any(|p| p.path == path);
    if !taken(base.as_str()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken(candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

async fn create_account(State(db): State<Db>, Form(params): Form<Params>) -> Json<Value> {
    tracing::debug!("createAccount");
    let mut store = db.write().await;
    let reply = (|| -> Reply {
        let short_name = param(&params, "short_name").ok_or("SHORT_NAME_REQUIRED")?;
        let record = AccountRecord {
            id: Uuid::new_v4(),
            short_name: short_name.to_string(),
            author_name: param(&params, "author_name")
                .unwrap_or_default()
                .to_string(),
            author_url: param(&params, "author_url")
                .unwrap_or_default()
                .to_string(),
            auth_url: new_auth_url(),
        };
        let token = new_token();
        let mut result = account_fields(&record, 0, &default_fields());
        result["access_token"] = json!(token);
        result["auth_url"] = json!(record.auth_url);
        store.accounts.insert(token, record);
        Ok(result)
    })();
    envelope(reply)
}

async fn edit_account_info(State(db): State<Db>, Form(params): Form<Params>) -> Json<Value> {
    tracing::debug!("editAccountInfo");
    let mut store = db.write().await;
    let reply = (|| -> Reply {
        let token = param(&params, "access_token").ok_or("ACCESS_TOKEN_INVALID")?;
        let record = store.accounts.get_mut(token).ok_or("ACCESS_TOKEN_INVALID")?;
        if let Some(short_name) = param(&params, "short_name") {
            record.short_name = short_name.to_string();
        }
        if let Some(author_name) = params.get("author_name") {
            record.author_name = author_name.clone();
        }
        if let Some(author_url) = params.get("author_url") {
            record.author_url = author_url.clone();
        }
        Ok(account_fields(record, 0, &default_fields()))
    })();
    envelope(reply)
}

async fn get_account_info(State(db): State<Db>, Form(params): Form<Params>) -> Json<Value> {
    tracing::debug!("getAccountInfo");
    let store = db.read().await;
    let reply = (|| -> Reply {
        let record = authorized(&store, &params)?;
        let fields = match param(&params, "fields") {
            Some(raw) => serde_json::from_str::<Vec<String>>(raw)
                .map_err(|_| "FIELDS_FORMAT_INVALID")?,
            None => default_fields(),
        };
        let page_count = store.pages.iter().filter(|p| p.owner == record.id).count() as u64;
        Ok(account_fields(record, page_count, &fields))
    })();
    envelope(reply)
}

async fn revoke_access_token(State(db): State<Db>, Form(params): Form<Params>) -> Json<Value> {
    tracing::debug!("revokeAccessToken");
    let mut store = db.write().await;
    let reply = (|| -> Reply {
        let token = param(&params, "access_token").ok_or("ACCESS_TOKEN_INVALID")?;
        let mut record = store.accounts.remove(token).ok_or("ACCESS_TOKEN_INVALID")?;
        record.auth_url = new_auth_url();
        let fresh = new_token();
        let result = json!({ "access_token": fresh, "auth_url": record.auth_url });
        store.accounts.insert(fresh, record);
        Ok(result)
    })();
    envelope(reply)
}

async fn create_page(State(db): State<Db>, Form(params): Form<Params>) -> Json<Value> {
    tracing::debug!("createPage");
    let mut store = db.write().await;
    let reply = (|| -> Reply {
        let account = authorized(&store, &params)?.clone();
        let title = param(&params, "title").ok_or("TITLE_REQUIRED")?;
        let content = parse_content(&params)?;
        let record = PageRecord {
            owner: account.id,
            path: page_path(&store, title),
            title: title.to_string(),
            author_name: params
                .get("author_name")
                .cloned()
                .unwrap_or(account.author_name),
            author_url: params
                .get("author_url")
                .cloned()
                .unwrap_or(account.author_url),
            content,
            views: 0,
        };
        let page = record.to_page(flag(&params, "return_content"), true);
        store.pages.push(record);
        serde_json::to_value(page).map_err(|_| "INTERNAL_ERROR")
    })();
    envelope(reply)
}

async fn edit_page(
    State(db): State<Db>,
    Path(path): Path<String>,
    Form(params): Form<Params>,
) -> Json<Value> {
    tracing::debug!(%path, "editPage");
    let mut store = db.write().await;
    let reply = (|| -> Reply {
        let owner = authorized(&store, &params)?.id;
        let title = param(&params, "title").ok_or("TITLE_REQUIRED")?.to_string();
        let content = parse_content(&params)?;
        let record = store
            .pages
            .iter_mut()
            .find(|p| p.path == path)
            .ok_or("PAGE_NOT_FOUND")?;
        if record.owner != owner {
            return Err("PAGE_ACCESS_DENIED");
        }
        record.title = title;
        record.content = content;
        if let Some(author_name) = params.get("author_name") {
            record.author_name = author_name.clone();
        }
        if let Some(author_url) = params.get("author_url") {
            record.author_url = author_url.clone();
        }
        let page = record.to_page(flag(&params, "return_content"), true);
        serde_json::to_value(page).map_err(|_| "INTERNAL_ERROR")
    })();
    envelope(reply)
}

async fn get_page(State(db): State<Db>, Form(params): Form<Params>) -> Json<Value> {
    tracing::debug!("getPage");
    let mut store = db.write().await;
    let reply = (|| -> Reply {
        let path = param(&params, "path").ok_or("PAGE_NOT_FOUND")?;
        let record = store
            .pages
            .iter_mut()
            .find(|p| p.path == path)
            .ok_or("PAGE_NOT_FOUND")?;
        record.views += 1;
        let page = record.to_page(flag(&params, "return_content"), false);
        serde_json::to_value(page).map_err(|_| "INTERNAL_ERROR")
    })();
    envelope(reply)
}

async fn get_page_list(State(db): State<Db>, Form(params): Form<Params>) -> Json<Value> {
    tracing::debug!("getPageList");
    let store = db.read().await;
    let reply = (|| -> Reply {
        let owner = authorized(&store, &params)?.id;
        let offset = number(&params, "offset")?.unwrap_or(0) as usize;
        let limit = number(&params, "limit")?.unwrap_or(50).min(200) as usize;
        let owned: Vec<&PageRecord> = store
            .pages
            .iter()
            .rev()
            .filter(|p| p.owner == owner)
            .collect();
        let list = PageList {
            total_count: owned.len() as u64,
            pages: owned
                .into_iter()
                .skip(offset)
                .take(limit)
                .map(|p| p.to_page(false, true))
                .collect(),
        };
        serde_json::to_value(list).map_err(|_| "INTERNAL_ERROR")
    })();
    envelope(reply)
}

async fn get_views(State(db): State<Db>, Form(params): Form<Params>) -> Json<Value> {
    tracing::debug!("getViews");
    let store = db.read().await;
    let reply = (|| -> Reply {
        let path = param(&params, "path").ok_or("PAGE_NOT_FOUND")?;
        let (year, month, day, hour) = (
            number(&params, "year")?,
            number(&params, "month")?,
            number(&params, "day")?,
            number(&params, "hour")?,
        );
        if hour.is_some() && day.is_none() {
            return Err("DAY_REQUIRED");
        }
        if day.is_some() && month.is_none() {
            return Err("MONTH_REQUIRED");
        }
        if month.is_some() && year.is_none() {
            return Err("YEAR_REQUIRED");
        }
        let record = store
            .pages
            .iter()
            .find(|p| p.path == path)
            .ok_or("PAGE_NOT_FOUND")?;
        Ok(json!({ "views": record.views }))
    })();
    envelope(reply)
}
