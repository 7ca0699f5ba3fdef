//! Relational backend client (PostgREST dialect)
//!
//! The backend exposes named entity collections over HTTP with
//! column-scoped select/insert/update/delete, equality and pattern filters,
//! and ascending ordering. Queries are described by an explicit
//! [`QuerySpec`] instead of an open-ended fluent proxy; repositories in the
//! domain crates build specs and hand them to a [`BackendExecutor`].
//!
//! "No row matched" on a single-row request is a distinguishable signal
//! (error code `PGRST116`) and maps to [`BackendError::NotFound`] so that
//! repositories can normalize it to `None`.

use serde_json::Value;
use thiserror::Error;

use crate::config::RemoteConfig;

/// Error code the backend returns when a single-row request matched no row.
const NO_ROW_CODE: &str = "PGRST116";

#[derive(Debug, Error)]
pub enum BackendError {
    /// A single-row request matched no row.
    #[error("no row matched the query")]
    NotFound,

    /// The backend rejected the request.
    #[error("backend error {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The request never completed.
    #[error("backend transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected shape.
    #[error("backend response decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Operation a [`QuerySpec`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FilterOp {
    /// Exact match
    Eq,
    /// Case-insensitive partial match; the value is wrapped in wildcards
    Ilike,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Filter {
    column: String,
    op: FilterOp,
    value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OrderBy {
    column: String,
    descending: bool,
}

/// Declarative description of one backend call.
///
/// Rendering is deterministic: `select`, then filters in insertion order,
/// then `order`.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    table: String,
    operation: Operation,
    columns: Option<String>,
    filters: Vec<Filter>,
    order: Option<OrderBy>,
    payload: Option<Value>,
}

impl QuerySpec {
    pub fn select(table: impl Into<String>) -> Self {
        Self::new(table, Operation::Select, None)
    }

    pub fn insert(table: impl Into<String>, payload: Value) -> Self {
        Self::new(table, Operation::Insert, Some(payload))
    }

    pub fn update(table: impl Into<String>, payload: Value) -> Self {
        Self::new(table, Operation::Update, Some(payload))
    }

    pub fn delete(table: impl Into<String>) -> Self {
        Self::new(table, Operation::Delete, None)
    }

    fn new(table: impl Into<String>, operation: Operation, payload: Option<Value>) -> Self {
        Self {
            table: table.into(),
            operation,
            columns: None,
            filters: Vec::new(),
            order: None,
            payload,
        }
    }

    /// Column list to return, including embedded relations,
    /// e.g. `"id,title,authors(id,authorname)"`.
    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    /// Equality filter.
    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            op: FilterOp::Eq,
            value: value.to_string(),
        });
        self
    }

    /// Case-insensitive partial match on `column`.
    pub fn ilike(mut self, column: impl Into<String>, needle: impl AsRef<str>) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            op: FilterOp::Ilike,
            value: needle.as_ref().to_string(),
        });
        self
    }

    /// Ascending order by `column`.
    pub fn order_asc(mut self, column: impl Into<String>) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            descending: false,
        });
        self
    }

    /// Descending order by `column`.
    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            descending: true,
        });
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Render the query string as ordered key/value pairs.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(columns) = &self.columns {
            pairs.push(("select".to_string(), columns.clone()));
        }
        for filter in &self.filters {
            let rendered = match filter.op {
                FilterOp::Eq => format!("eq.{}", filter.value),
                FilterOp::Ilike => format!("ilike.*{}*", filter.value),
            };
            pairs.push((filter.column.clone(), rendered));
        }
        if let Some(order) = &self.order {
            let direction = if order.descending { "desc" } else { "asc" };
            pairs.push(("order".to_string(), format!("{}.{direction}", order.column)));
        }
        pairs
    }
}

/// Port for executing backend queries.
///
/// `fetch_single` is the only operation that can produce
/// [`BackendError::NotFound`].
#[trait_variant::make(BackendExecutor: Send)]
pub trait LocalBackendExecutor {
    /// Run a query returning any number of rows.
    async fn fetch_rows(&self, spec: QuerySpec) -> Result<Vec<Value>, BackendError>;

    /// Run a query that must match exactly one row.
    async fn fetch_single(&self, spec: QuerySpec) -> Result<Value, BackendError>;

    /// Run a query without reading rows back (e.g. delete).
    async fn execute(&self, spec: QuerySpec) -> Result<(), BackendError>;
}

/// HTTP implementation of [`BackendExecutor`].
#[derive(Clone)]
pub struct PostgrestClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl PostgrestClient {
    pub fn new(config: &RemoteConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            anon_key: config.anon_key.clone(),
        }
    }

    fn request(&self, spec: &QuerySpec, single: bool) -> reqwest::RequestBuilder {
        let method = match spec.operation() {
            Operation::Select => reqwest::Method::GET,
            Operation::Insert => reqwest::Method::POST,
            Operation::Update => reqwest::Method::PATCH,
            Operation::Delete => reqwest::Method::DELETE,
        };
        let url = format!("{}/rest/v1/{}", self.base_url, spec.table());

        let mut request = self
            .http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .query(&spec.query_pairs());

        if single {
            request = request.header("Accept", "application/vnd.pgrst.object+json");
        }
        if matches!(spec.operation(), Operation::Insert | Operation::Update) {
            request = request.header("Prefer", "return=representation");
        }
        if let Some(payload) = spec.payload() {
            request = request.json(payload);
        }
        request
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        let code = body
            .get("code")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown backend error")
            .to_string();

        if code == NO_ROW_CODE {
            return Err(BackendError::NotFound);
        }

        tracing::error!(status, code = %code, message = %message, "Backend request failed");
        Err(BackendError::Api {
            status,
            code,
            message,
        })
    }
}

impl BackendExecutor for PostgrestClient {
    async fn fetch_rows(&self, spec: QuerySpec) -> Result<Vec<Value>, BackendError> {
        let response = self.request(&spec, false).send().await?;
        let response = self.check(response).await?;
        let rows: Vec<Value> = response.json().await?;
        Ok(rows)
    }

    async fn fetch_single(&self, spec: QuerySpec) -> Result<Value, BackendError> {
        let response = self.request(&spec, true).send().await?;
        let response = self.check(response).await?;
        let row: Value = response.json().await?;
        Ok(row)
    }

    async fn execute(&self, spec: QuerySpec) -> Result<(), BackendError> {
        let response = self.request(&spec, false).send().await?;
        self.check(response).await?;
        Ok(())
    }
}
