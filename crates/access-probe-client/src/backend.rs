// crates/access-probe-client/src/backend.rs
// ============================================================================
// Module: Backend Directory
// Description: Seam for the backend's identity/session/permission surface.
// Purpose: Abstract the HTTP directory calls the provisioner issues, with a
// reqwest implementation for real backends.
// Dependencies: access-probe-core, async-trait, reqwest, serde, time, url
// ============================================================================

//! ## Overview
//! The backend directory is the external collaborator persisting users,
//! sessions, and permissions. The provisioner talks to it only through the
//! [`BackendDirectory`] trait, so unit tests substitute an in-memory stub
//! while system tests drive the real HTTP surface. Every record-creating call
//! carries the run tag used by `delete-by-run-tag` teardown.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use access_probe_core::PermissionLevel;
use access_probe_core::RunTag;
use access_probe_core::TeamKey;
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use url::Url;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Backend directory call errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The backend could not be reached at all.
    #[error("backend unreachable: {0}")]
    Unavailable(String),
    /// The backend answered with a non-success status.
    #[error("backend rejected {operation}: status {status}: {message}")]
    Rejected {
        /// Directory operation that was rejected.
        operation: &'static str,
        /// HTTP status returned.
        status: u16,
        /// Response body or reason text.
        message: String,
    },
    /// The backend answered with a payload this client cannot interpret.
    #[error("malformed backend response for {operation}: {message}")]
    Malformed {
        /// Directory operation whose response was malformed.
        operation: &'static str,
        /// Description of the malformation.
        message: String,
    },
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Request body for scaffold team creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTeamRequest<'a> {
    /// Run tag stamped on the record.
    pub run_tag: &'a RunTag,
    /// Team fixture key.
    pub key: &'a TeamKey,
    /// Display name for the team.
    pub display_name: &'a str,
}

/// Request body for user record creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserRequest<'a> {
    /// Run tag stamped on the record.
    pub run_tag: &'a RunTag,
    /// Login name for the user.
    pub login: &'a str,
    /// Password for the user.
    pub password: &'a str,
    /// Display name for the user.
    pub display_name: &'a str,
    /// Whether the user is a global administrator.
    pub admin: bool,
}

/// Response body for user record creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserResponse {
    /// Backend-assigned user identifier.
    pub user_id: String,
}

/// Request body for permission assignment.
#[derive(Debug, Clone, Serialize)]
pub struct AssignPermissionRequest<'a> {
    /// Run tag stamped on the record.
    pub run_tag: &'a RunTag,
    /// Login of the user receiving the grant.
    pub login: &'a str,
    /// Team the grant applies to.
    pub team: &'a TeamKey,
    /// Level granted on the team.
    pub level: PermissionLevel,
}

/// Request body for session creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest<'a> {
    /// Run tag stamped on the record.
    pub run_tag: &'a RunTag,
    /// Login of the session owner.
    pub login: &'a str,
    /// Password of the session owner.
    pub password: &'a str,
}

/// Response body for session creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionResponse {
    /// Opaque session token.
    pub token: String,
    /// Expiry as unix seconds.
    pub expires_at: i64,
}

/// A minted session credential as returned by the directory seam.
///
/// # Invariants
/// - `token` is opaque; the backend is authoritative for `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    /// Opaque session token.
    pub token: String,
    /// Expiry reported by the backend.
    pub expires_at: OffsetDateTime,
}

// ============================================================================
// SECTION: Directory Trait
// ============================================================================

/// Backend directory surface the provisioner depends on.
///
/// Implementations must be idempotency-friendly on deletion: deleting records
/// for a tag with nothing left to delete is a success, not an error.
#[async_trait]
pub trait BackendDirectory: Send + Sync {
    /// Creates a scaffold team record tagged with `run_tag`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the backend is unreachable or rejects
    /// the record.
    async fn create_team(
        &self,
        run_tag: &RunTag,
        team: &TeamKey,
        display_name: &str,
    ) -> Result<(), DirectoryError>;

    /// Creates a user record and returns its backend identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the backend is unreachable or rejects
    /// the record.
    async fn create_user(
        &self,
        run_tag: &RunTag,
        login: &str,
        password: &str,
        display_name: &str,
        admin: bool,
    ) -> Result<String, DirectoryError>;

    /// Assigns a (user, team, level) permission grant.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the backend is unreachable or rejects
    /// the grant.
    async fn assign_permission(
        &self,
        run_tag: &RunTag,
        login: &str,
        team: &TeamKey,
        level: PermissionLevel,
    ) -> Result<(), DirectoryError>;

    /// Mints a live session for a user.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the backend is unreachable or rejects
    /// the credentials.
    async fn create_session(
        &self,
        run_tag: &RunTag,
        login: &str,
        password: &str,
    ) -> Result<SessionGrant, DirectoryError>;

    /// Deletes every backend record carrying `run_tag`.
    ///
    /// Idempotent: a tag with no remaining records deletes successfully.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the backend is unreachable or fails
    /// the deletion outright.
    async fn delete_by_run_tag(&self, run_tag: &RunTag) -> Result<(), DirectoryError>;
}

// ============================================================================
// SECTION: HTTP Implementation
// ============================================================================

/// HTTP implementation of the backend directory surface.
///
/// # Invariants
/// - `base_url` always ends with a slash so endpoint joins are stable.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    /// Backend base URL.
    base_url: Url,
    /// Shared HTTP client with a per-request timeout.
    client: reqwest::Client,
}

impl HttpBackend {
    /// Builds an HTTP directory client for the given backend base URL.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Malformed`] when the URL does not parse or
    /// the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DirectoryError> {
        let normalized =
            if base_url.ends_with('/') { base_url.to_string() } else { format!("{base_url}/") };
        let base_url = Url::parse(&normalized).map_err(|err| DirectoryError::Malformed {
            operation: "configure",
            message: format!("invalid base url: {err}"),
        })?;
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(|err| {
            DirectoryError::Malformed {
                operation: "configure",
                message: format!("http client construction failed: {err}"),
            }
        })?;
        Ok(Self {
            base_url,
            client,
        })
    }

    /// Joins an endpoint path onto the base URL.
    fn endpoint(&self, operation: &'static str, path: &str) -> Result<Url, DirectoryError> {
        self.base_url.join(path).map_err(|err| DirectoryError::Malformed {
            operation,
            message: format!("invalid endpoint path {path}: {err}"),
        })
    }

    /// Sends a JSON POST and checks for a success status.
    async fn post_json<T: Serialize + Sync>(
        &self,
        operation: &'static str,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, DirectoryError> {
        let url = self.endpoint(operation, path)?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| DirectoryError::Unavailable(err.to_string()))?;
        check_status(operation, response).await
    }
}

/// Maps a non-success response into a rejection carrying the body text.
async fn check_status(
    operation: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, DirectoryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(DirectoryError::Rejected {
        operation,
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl BackendDirectory for HttpBackend {
    async fn create_team(
        &self,
        run_tag: &RunTag,
        team: &TeamKey,
        display_name: &str,
    ) -> Result<(), DirectoryError> {
        let request = CreateTeamRequest {
            run_tag,
            key: team,
            display_name,
        };
        self.post_json("create-team", "api/teams", &request).await?;
        Ok(())
    }

    async fn create_user(
        &self,
        run_tag: &RunTag,
        login: &str,
        password: &str,
        display_name: &str,
        admin: bool,
    ) -> Result<String, DirectoryError> {
        let request = CreateUserRequest {
            run_tag,
            login,
            password,
            display_name,
            admin,
        };
        let response = self.post_json("create-user", "api/users", &request).await?;
        let payload: CreateUserResponse =
            response.json().await.map_err(|err| DirectoryError::Malformed {
                operation: "create-user",
                message: err.to_string(),
            })?;
        Ok(payload.user_id)
    }

    async fn assign_permission(
        &self,
        run_tag: &RunTag,
        login: &str,
        team: &TeamKey,
        level: PermissionLevel,
    ) -> Result<(), DirectoryError> {
        let request = AssignPermissionRequest {
            run_tag,
            login,
            team,
            level,
        };
        self.post_json("assign-permission", "api/permissions", &request).await?;
        Ok(())
    }

    async fn create_session(
        &self,
        run_tag: &RunTag,
        login: &str,
        password: &str,
    ) -> Result<SessionGrant, DirectoryError> {
        let request = CreateSessionRequest {
            run_tag,
            login,
            password,
        };
        let response = self.post_json("create-session", "api/sessions", &request).await?;
        let payload: CreateSessionResponse =
            response.json().await.map_err(|err| DirectoryError::Malformed {
                operation: "create-session",
                message: err.to_string(),
            })?;
        let expires_at = OffsetDateTime::from_unix_timestamp(payload.expires_at).map_err(
            |err| DirectoryError::Malformed {
                operation: "create-session",
                message: format!("expiry out of range: {err}"),
            },
        )?;
        Ok(SessionGrant {
            token: payload.token,
            expires_at,
        })
    }

    async fn delete_by_run_tag(&self, run_tag: &RunTag) -> Result<(), DirectoryError> {
        let url = self.endpoint("delete-by-run-tag", &format!("api/runs/{run_tag}"))?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|err| DirectoryError::Unavailable(err.to_string()))?;
        // Already-deleted tags answer 404; deletion is idempotent by contract.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        check_status("delete-by-run-tag", response).await?;
        Ok(())
    }
}
