// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! HTTP driver for the Neo4j transactional endpoint
//!
//! | Operation          | Request                          |
//! |--------------------|----------------------------------|
//! | connect / `/dbms`  | `GET /` (discovery document)     |
//! | auto-commit run    | `POST /db/{db}/tx/commit`        |
//! | begin              | `POST /db/{db}/tx`               |
//! | run in transaction | `POST /db/{db}/tx/{id}`          |
//! | commit             | `POST /db/{db}/tx/{id}/commit`   |
//! | rollback           | `DELETE /db/{db}/tx/{id}`        |
//!
//! Each connection owns a current-thread tokio runtime and blocks on the
//! async reqwest client, so every call is synchronous for the console.

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::runtime::{Builder, Runtime};

use super::{
    Connection, Driver, DriverError, DriverResult, Params, QueryOutcome, ServerDetails,
    TransactionHandle,
};

const DEFAULT_HTTP_PORT: u16 = 7474;
const DEFAULT_HTTPS_PORT: u16 = 7473;
const SYNTAX_ERROR_CODE: &str = "Neo.ClientError.Statement.SyntaxError";
const UNAUTHORIZED_CODE: &str = "Neo.ClientError.Security.Unauthorized";

/// Driver speaking the Neo4j HTTP API against one database
pub struct HttpDriver {
    database: String,
}

impl HttpDriver {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
        }
    }
}

impl Driver for HttpDriver {
    fn connect(&self, uri: &str, user: &str, password: &str) -> DriverResult<Box<dyn Connection>> {
        let base = normalize_uri(uri)?;
        log::info!("Connecting to {} as {}", base, user);

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DriverError::Transport(format!("failed to start runtime: {}", e)))?;
        let client = Client::builder()
            .build()
            .map_err(|e| DriverError::Transport(e.to_string()))?;

        let mut connection = HttpConnection {
            runtime,
            client,
            uri: base.as_str().trim_end_matches('/').to_string(),
            base,
            user: user.to_string(),
            password: password.to_string(),
            database: self.database.clone(),
        };

        // Discovery proves the server is reachable; it is served without auth.
        let details = connection.server_details()?;
        log::debug!("Connected to server version {}", details.version);
        connection.authenticate()?;

        Ok(Box::new(connection))
    }
}

struct HttpConnection {
    runtime: Runtime,
    client: Client,
    base: Url,
    uri: String,
    user: String,
    password: String,
    database: String,
}

impl HttpConnection {
    fn endpoint(&self, path: &str) -> DriverResult<Url> {
        self.base
            .join(path)
            .map_err(|e| DriverError::Transport(format!("invalid endpoint '{}': {}", path, e)))
    }

    fn transaction_endpoint(&self) -> DriverResult<Url> {
        self.endpoint(&format!("db/{}/tx", self.database))
    }

    fn send(&self, request: RequestBuilder) -> DriverResult<TxResponse> {
        let request = request.basic_auth(&self.user, Some(&self.password));
        self.runtime.block_on(async move {
            let response = request.send().await.map_err(request_error)?;
            let status = response.status();
            let body = response.text().await.map_err(request_error)?;
            decode_tx_response(status, &body)
        })
    }

    fn post(&self, url: Url, body: Value) -> DriverResult<TxResponse> {
        log::debug!("POST {}", url);
        self.send(self.client.post(url).json(&body))
    }

    /// Run an empty auto-commit request so bad credentials or an unknown
    /// database fail at connect time
    fn authenticate(&self) -> DriverResult<()> {
        let url = self.endpoint(&format!("db/{}/tx/commit", self.database))?;
        self.post(url, empty_statements())?;
        log::debug!("Authenticated as {}", self.user);
        Ok(())
    }
}

fn empty_statements() -> Value {
    json!({ "statements": [] })
}

impl Connection for HttpConnection {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn user(&self) -> &str {
        &self.user
    }

    fn run(
        &mut self,
        statement: &str,
        parameters: &Params,
        transaction: Option<&TransactionHandle>,
    ) -> DriverResult<QueryOutcome> {
        let url = match transaction {
            Some(handle) => parse_handle(handle)?,
            None => self.endpoint(&format!("db/{}/tx/commit", self.database))?,
        };
        let body = json!({
            "statements": [{
                "statement": statement,
                "parameters": parameters,
                "includeStats": true,
            }]
        });
        let response = self.post(url, body)?;
        Ok(response.into_outcome())
    }

    fn begin_transaction(&mut self) -> DriverResult<TransactionHandle> {
        let url = self.transaction_endpoint()?;
        let response = self.post(url, empty_statements())?;
        let commit = response.commit.ok_or_else(|| {
            DriverError::Protocol("transaction opened without a commit URI".to_string())
        })?;
        let id = commit.trim_end_matches("/commit").to_string();
        log::debug!("Opened transaction {}", id);
        Ok(TransactionHandle::new(id))
    }

    fn commit(&mut self, transaction: TransactionHandle) -> DriverResult<()> {
        let url = parse_handle(&transaction)?;
        let commit_url = Url::parse(&format!("{}/commit", url.as_str().trim_end_matches('/')))
            .map_err(|e| DriverError::Protocol(e.to_string()))?;
        self.post(commit_url, empty_statements())?;
        Ok(())
    }

    fn rollback(&mut self, transaction: TransactionHandle) -> DriverResult<()> {
        let url = parse_handle(&transaction)?;
        log::debug!("DELETE {}", url);
        self.send(self.client.delete(url))?;
        Ok(())
    }

    fn server_details(&mut self) -> DriverResult<ServerDetails> {
        let request = self.client.get(self.base.clone());
        let document = self.runtime.block_on(async move {
            let response = request.send().await.map_err(request_error)?;
            let status = response.status();
            if !status.is_success() {
                return Err(DriverError::Protocol(format!("discovery returned HTTP {}", status)));
            }
            response
                .json::<serde_json::Map<String, Value>>()
                .await
                .map_err(|e| DriverError::Protocol(e.to_string()))
        })?;
        Ok(details_from_discovery(&document))
    }
}

/// Resolve a user-supplied address to the HTTP base URL of the server.
///
/// A bare host gets the `http://` scheme and a missing port defaults to the
/// server's HTTP (7474) or HTTPS (7473) port. Bolt addresses (`bolt://`,
/// `neo4j://` and their `+s`/`+ssc` variants) are mapped to the HTTP
/// endpoint of the same host; the Bolt port is dropped.
pub fn normalize_uri(uri: &str) -> DriverResult<Url> {
    let with_scheme = if uri.contains("://") {
        uri.to_string()
    } else {
        format!("http://{}", uri)
    };
    let mut url = Url::parse(&with_scheme)
        .map_err(|e| DriverError::Transport(format!("invalid URI '{}': {}", uri, e)))?;

    let default_port = match url.scheme() {
        "http" => DEFAULT_HTTP_PORT,
        "https" => DEFAULT_HTTPS_PORT,
        "bolt" | "neo4j" => {
            url = bolt_to_http(uri, &url, "http")?;
            DEFAULT_HTTP_PORT
        }
        "bolt+s" | "bolt+ssc" | "neo4j+s" | "neo4j+ssc" => {
            url = bolt_to_http(uri, &url, "https")?;
            DEFAULT_HTTPS_PORT
        }
        other => {
            return Err(DriverError::Transport(format!(
                "unsupported scheme '{}' in '{}', expected http, https, bolt or neo4j",
                other, uri
            )))
        }
    };
    if url.port().is_none() {
        url.set_port(Some(default_port))
            .map_err(|_| DriverError::Transport(format!("invalid URI '{}'", uri)))?;
    }
    Ok(url)
}

/// `Url::set_scheme` cannot move a non-special scheme to http, so the URL is rebuilt
fn bolt_to_http(uri: &str, bolt: &Url, scheme: &str) -> DriverResult<Url> {
    let host = bolt
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| DriverError::Transport(format!("invalid URI '{}': missing host", uri)))?;
    let url = Url::parse(&format!("{}://{}/", scheme, host))
        .map_err(|e| DriverError::Transport(format!("invalid URI '{}': {}", uri, e)))?;
    log::info!("Using HTTP endpoint {} for Bolt address {}", url, uri);
    Ok(url)
}

fn parse_handle(handle: &TransactionHandle) -> DriverResult<Url> {
    Url::parse(handle.id())
        .map_err(|e| DriverError::Protocol(format!("bad transaction URI '{}': {}", handle.id(), e)))
}

fn request_error(error: reqwest::Error) -> DriverError {
    if error.is_connect() || error.is_timeout() {
        DriverError::ServiceUnavailable(error.to_string())
    } else {
        DriverError::Transport(error.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<ServerError>,
    #[serde(default)]
    commit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<DataRow>,
    #[serde(default)]
    stats: Option<serde_json::Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct DataRow {
    #[serde(default)]
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ServerError {
    code: String,
    message: String,
}

impl ServerError {
    fn into_driver_error(self) -> DriverError {
        if self.code == SYNTAX_ERROR_CODE {
            DriverError::Syntax(self.message)
        } else {
            DriverError::Client {
                code: self.code,
                message: self.message,
            }
        }
    }
}

impl TxResponse {
    fn into_outcome(self) -> QueryOutcome {
        let Some(result) = self.results.into_iter().next() else {
            return QueryOutcome::default();
        };
        let counters = result
            .stats
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(name, value)| value.as_i64().filter(|n| *n != 0).map(|n| (name, n)))
            .collect();
        QueryOutcome {
            columns: result.columns,
            rows: result.data.into_iter().map(|data| data.row).collect(),
            counters,
        }
    }
}

fn decode_tx_response(status: StatusCode, body: &str) -> DriverResult<TxResponse> {
    let mut response: TxResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(_) if status == StatusCode::UNAUTHORIZED => {
            return Err(DriverError::Client {
                code: UNAUTHORIZED_CODE.to_string(),
                message: "The client is unauthorized due to authentication failure.".to_string(),
            })
        }
        Err(e) => {
            return Err(DriverError::Protocol(format!("HTTP {}: {}", status, e)));
        }
    };

    if let Some(error) = std::mem::take(&mut response.errors).into_iter().next() {
        return Err(error.into_driver_error());
    }
    if !status.is_success() {
        return Err(DriverError::Protocol(format!("HTTP {}", status)));
    }
    Ok(response)
}

fn details_from_discovery(document: &serde_json::Map<String, Value>) -> ServerDetails {
    let mut details = ServerDetails::default();
    for (key, value) in document {
        let Some(text) = value.as_str() else {
            continue;
        };
        match key.as_str() {
            "neo4j_version" => details.version = text.to_string(),
            "neo4j_edition" => details.edition = text.to_string(),
            _ => {
                details.extra.insert(key.clone(), text.to_string());
            }
        }
    }
    details
}
