//! The remote-engine boundary: a client trait plus the HTTP implementation.
//!
//! Dataset/project bootstrap and authentication live behind this trait —
//! the store only needs three verbs (create table, load rows, run merge)
//! and a way to classify the client's errors.

use std::{future::Future, time::Duration};

use serde_json::Value;
use tabula_core::ErrorClass;
use thiserror::Error;

use crate::{merge::MergeStatement, schema::TableSchema};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the destination engine.
///
/// All methods return `Send` futures; every call blocks the logical flow
/// until the engine answers. No implementation retries internally —
/// cancellation and deadlines are the caller's concern.
pub trait WarehouseClient: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create `table` with the given schema. Creating a table that already
  /// exists should surface an error that classifies as
  /// [`ErrorClass::AlreadyExists`].
  fn create_table(
    &self,
    table: &str,
    schema: &TableSchema,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Bulk-load `rows` into `table`.
  fn load_rows(
    &self,
    table: &str,
    rows: Vec<Value>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Execute a merge statement as one atomic set operation.
  fn run_merge(
    &self,
    statement: &MergeStatement,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Sort this backend's errors into the classes the store's control flow
  /// cares about.
  fn classify(err: &Self::Error) -> ErrorClass;
}

// ─── HTTP implementation ─────────────────────────────────────────────────────

/// Connection settings for the warehouse REST API.
///
/// Passed explicitly into [`HttpClient::new`]; there is no process-wide
/// project or dataset state.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
  pub base_url: String,
  pub dataset:  String,
  /// Bearer token; `None` for unauthenticated/local deployments.
  pub token:    Option<String>,
}

#[derive(Debug, Error)]
pub enum HttpError {
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("POST {path} → {status}: {message}")]
  Status {
    path:    String,
    status:  reqwest::StatusCode,
    message: String,
  },
}

/// Warehouse client over a JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpClient {
  client: reqwest::Client,
  config: WarehouseConfig,
}

impl HttpClient {
  pub fn new(config: WarehouseConfig) -> Result<Self, HttpError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/v1{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.config.token {
      Some(token) => req.bearer_auth(token),
      None        => req,
    }
  }

  async fn post<B: serde::Serialize + ?Sized>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<(), HttpError> {
    let resp = self
      .auth(self.client.post(self.url(path)))
      .json(body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let message = resp.text().await.unwrap_or_default();
      return Err(HttpError::Status { path: path.to_owned(), status, message });
    }
    Ok(())
  }
}

impl WarehouseClient for HttpClient {
  type Error = HttpError;

  async fn create_table(
    &self,
    table: &str,
    schema: &TableSchema,
  ) -> Result<(), HttpError> {
    let path = format!("/datasets/{}/tables", self.config.dataset);
    self
      .post(&path, &serde_json::json!({
        "name": table,
        "columns": schema.columns,
      }))
      .await
  }

  async fn load_rows(
    &self,
    table: &str,
    rows: Vec<Value>,
  ) -> Result<(), HttpError> {
    let path =
      format!("/datasets/{}/tables/{}/rows", self.config.dataset, table);
    self.post(&path, &serde_json::json!({ "rows": rows })).await
  }

  async fn run_merge(
    &self,
    statement: &MergeStatement,
  ) -> Result<(), HttpError> {
    self
      .post("/queries", &serde_json::json!({ "query": statement.to_sql() }))
      .await
  }

  fn classify(err: &HttpError) -> ErrorClass {
    match err {
      HttpError::Status { status, .. }
        if *status == reqwest::StatusCode::CONFLICT =>
      {
        ErrorClass::AlreadyExists
      }
      _ => ErrorClass::Fatal,
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn status_error(status: reqwest::StatusCode) -> HttpError {
    HttpError::Status {
      path: "/datasets/tabula/tables".into(),
      status,
      message: String::new(),
    }
  }

  #[test]
  fn conflict_classifies_as_already_exists() {
    assert_eq!(
      HttpClient::classify(&status_error(reqwest::StatusCode::CONFLICT)),
      ErrorClass::AlreadyExists,
    );
  }

  #[test]
  fn other_statuses_are_fatal() {
    for status in [
      reqwest::StatusCode::BAD_REQUEST,
      reqwest::StatusCode::NOT_FOUND,
      reqwest::StatusCode::INTERNAL_SERVER_ERROR,
    ] {
      assert_eq!(
        HttpClient::classify(&status_error(status)),
        ErrorClass::Fatal,
      );
    }
  }
}
