//! GitLab API v4 implementation of `RemoteRepositoryClient`.
//!
//! # Responsibility
//! - Translate project create/delete/get into GitLab REST calls.
//! - Classify HTTP outcomes into `RemoteError` variants.
//!
//! # Invariants
//! - Tokens are sent only in the `PRIVATE-TOKEN` header and never logged.
//! - Every call is bounded by the configured timeout.

use super::{RemoteError, RemoteProject, RemoteRepositoryClient, RemoteResult};
use crate::config::GitlabConfig;
use log::{debug, error};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Blocking GitLab REST client.
pub struct GitlabRestClient {
    client: Client,
    config: GitlabConfig,
}

#[derive(Debug, Serialize)]
struct CreateProjectBody<'a> {
    name: &'a str,
    path: &'a str,
    description: &'a str,
    ci_config_path: &'a str,
    build_timeout: u64,
}

#[derive(Debug, Deserialize)]
struct GitlabNamespace {
    full_path: String,
}

#[derive(Debug, Deserialize)]
struct GitlabProject {
    id: i64,
    web_url: String,
    path: String,
    namespace: GitlabNamespace,
}

impl From<GitlabProject> for RemoteProject {
    fn from(value: GitlabProject) -> Self {
        Self {
            remote_id: value.id,
            url: value.web_url,
            namespace: value.namespace.full_path,
            project_name: value.path,
        }
    }
}

impl GitlabRestClient {
    /// Builds a client from validated settings.
    pub fn new(config: GitlabConfig) -> RemoteResult<Self> {
        // Decision: blocking client keeps the lifecycle manager synchronous,
        // like the SQLite store it sits next to.
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| RemoteError::Unavailable(format!("failed to build client: {err}")))?;
        Ok(Self { client, config })
    }

    fn projects_url(&self) -> String {
        format!("{}/api/v4/projects", self.config.base_url)
    }

    fn project_url(&self, remote_id: i64) -> String {
        format!("{}/{remote_id}", self.projects_url())
    }

    fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
        token: &str,
    ) -> RemoteResult<(StatusCode, String)> {
        let started_at = Instant::now();
        let response = request
            .header(PRIVATE_TOKEN_HEADER, token)
            .send()
            .map_err(|err| {
                debug!(
                    "event=remote_request module=remote status=error op={} duration_ms={} error={}",
                    operation,
                    started_at.elapsed().as_millis(),
                    err
                );
                RemoteError::Unavailable(err.to_string())
            })?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|err| RemoteError::Unavailable(format!("failed to read body: {err}")))?;
        debug!(
            "event=remote_request module=remote status=ok op={} http_status={} duration_ms={}",
            operation,
            status.as_u16(),
            started_at.elapsed().as_millis()
        );
        Ok((status, body))
    }
}

impl RemoteRepositoryClient for GitlabRestClient {
    fn create_project(
        &self,
        token: &str,
        name: &str,
        path: &str,
        description: &str,
    ) -> RemoteResult<RemoteProject> {
        let body = CreateProjectBody {
            name,
            path,
            description,
            ci_config_path: self.config.ci_config_path.as_str(),
            build_timeout: self.config.build_timeout_secs,
        };
        let request = self.client.post(self.projects_url()).json(&body);
        let (status, text) = self.send("create_project", request, token)?;
        if !status.is_success() {
            return Err(classify_failure(status.as_u16(), &text, None));
        }
        decode_created_project(path, &text)
    }

    fn delete_project(&self, token: &str, remote_id: i64) -> RemoteResult<()> {
        let request = self.client.delete(self.project_url(remote_id));
        let (status, text) = self.send("delete_project", request, token)?;
        if status.is_success() {
            return Ok(());
        }
        Err(classify_failure(status.as_u16(), &text, Some(remote_id)))
    }

    fn get_project(&self, token: &str, remote_id: i64) -> RemoteResult<RemoteProject> {
        let request = self.client.get(self.project_url(remote_id));
        let (status, text) = self.send("get_project", request, token)?;
        if !status.is_success() {
            return Err(classify_failure(status.as_u16(), &text, Some(remote_id)));
        }
        parse_project(&text)
    }
}

/// Maps a non-success GitLab response to a `RemoteError`.
///
/// GitLab reports duplicate names as `400` with a "has already been taken"
/// message, so that case is a conflict as well as a plain `409`.
/// `remote_id` is known for calls that address an existing project.
pub fn classify_failure(status: u16, body: &str, remote_id: Option<i64>) -> RemoteError {
    let message = summarize_body(body);
    match status {
        409 => RemoteError::Conflict(message),
        400 if body.contains("has already been taken") => RemoteError::Conflict(message),
        400 | 422 => RemoteError::InvalidParameters(message),
        404 => match remote_id {
            Some(remote_id) => RemoteError::NotFound(remote_id),
            None => RemoteError::Unavailable(format!("http 404: {message}")),
        },
        other => RemoteError::Unavailable(format!("http {other}: {message}")),
    }
}

fn parse_project(body: &str) -> RemoteResult<RemoteProject> {
    serde_json::from_str::<GitlabProject>(body)
        .map(RemoteProject::from)
        .map_err(|err| RemoteError::Unavailable(format!("undecodable project response: {err}")))
}

/// Decodes a 2xx create response.
///
/// GitLab has already created the project at this point, so a body that does
/// not decode leaves a remote project no local record will point to.
fn decode_created_project(path: &str, body: &str) -> RemoteResult<RemoteProject> {
    parse_project(body).map_err(|err| {
        let remote_id = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| value.get("id").and_then(serde_json::Value::as_i64))
            .map_or_else(|| "unknown".to_string(), |id| id.to_string());
        error!(
            "event=project_partial_failure module=remote status=error op=create_project path={} remote_id={} error={}",
            path, remote_id, err
        );
        RemoteError::Unavailable(format!(
            "project `{path}` may exist on the remote but its create response was unreadable (remote_id={remote_id}): {err}"
        ))
    })
}

fn summarize_body(body: &str) -> String {
    let normalized = body.replace(['\n', '\r'], " ");
    let trimmed = normalized.trim();
    let mut summary = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>();
    if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
        summary.push_str("...");
    }
    summary
}
