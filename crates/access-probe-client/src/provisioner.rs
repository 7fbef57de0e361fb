// crates/access-probe-client/src/provisioner.rs
// ============================================================================
// Module: Session Provisioner
// Description: Run-scoped creation and teardown of backend test state.
// Purpose: Turn fixture identities into real backend users and sessions with
// at-most-one backend record per key per run.
// Dependencies: access-probe-core, crate::{audit, backend, cache}, thiserror,
// time
// ============================================================================

//! ## Overview
//! The provisioner owns the identity-key to live-session mapping for one run
//! and is the only component that mutates backend state. Its lifecycle is a
//! strict state machine: `Uninitialized -> ScaffoldReady ->
//! (IdentitiesProvisioned)* -> TeardownPending -> TornDown`, with `TornDown`
//! terminal. Caches act as single-flight gates so concurrent calls for one
//! key collapse to one backend operation.
//!
//! ## Invariants
//! - `setup()` strictly precedes any provisioning call.
//! - At most one backend session exists per identity per run.
//! - No operation runs after teardown; stale credentials are never returned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use access_probe_core::CatalogError;
use access_probe_core::FixtureCatalog;
use access_probe_core::GlobalRole;
use access_probe_core::IdentityKey;
use access_probe_core::RunTag;
use access_probe_core::Session;
use thiserror::Error;
use time::OffsetDateTime;

use crate::audit::NoopAudit;
use crate::audit::ProvisionAudit;
use crate::audit::ProvisionEvent;
use crate::backend::BackendDirectory;
use crate::backend::DirectoryError;
use crate::cache::KeyedCells;

// ============================================================================
// SECTION: Run Phase
// ============================================================================

/// Lifecycle phase of one provisioning run.
///
/// # Invariants
/// - Phases only move forward; `TornDown` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// No backend state exists yet.
    Uninitialized,
    /// Scaffold team records exist; identities may be provisioned.
    ScaffoldReady,
    /// At least one identity record has been provisioned.
    IdentitiesProvisioned,
    /// Caches are cleared and provisioning is sealed, but the tagged backend
    /// records have not been confirmed deleted; `teardown()` may be retried.
    TeardownPending,
    /// All tagged backend records were deleted; the run is over.
    TornDown,
}

impl RunPhase {
    /// Returns a stable label for the phase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::ScaffoldReady => "scaffold_ready",
            Self::IdentitiesProvisioned => "identities_provisioned",
            Self::TeardownPending => "teardown_pending",
            Self::TornDown => "torn_down",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Provisioning errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling; configuration and
///   lifecycle errors always name the offending key or operation.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A fixture key or grant was invalid (configuration error class).
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The backend could not be reached; the run must abort.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
    /// The backend rejected a directory operation.
    #[error("backend rejected {operation}: status {status}: {message}")]
    BackendRejected {
        /// Directory operation that was rejected.
        operation: &'static str,
        /// HTTP status returned.
        status: u16,
        /// Response body or reason text.
        message: String,
    },
    /// The backend answered with an uninterpretable payload.
    #[error("malformed backend response for {operation}: {message}")]
    MalformedResponse {
        /// Directory operation whose response was malformed.
        operation: &'static str,
        /// Description of the malformation.
        message: String,
    },
    /// An operation was attempted after teardown (programmer error).
    #[error("{operation} attempted after teardown; call setup() on a fresh run")]
    AlreadyTornDown {
        /// Operation that was attempted.
        operation: &'static str,
    },
    /// A provisioning operation ran before `setup()`.
    #[error("{operation} requires setup() first (phase: {phase})")]
    NotScaffolded {
        /// Operation that was attempted.
        operation: &'static str,
        /// Phase the run was in.
        phase: &'static str,
    },
}

impl From<DirectoryError> for ProvisionError {
    fn from(error: DirectoryError) -> Self {
        match error {
            DirectoryError::Unavailable(message) => Self::BackendUnavailable(message),
            DirectoryError::Rejected {
                operation,
                status,
                message,
            } => Self::BackendRejected {
                operation,
                status,
                message,
            },
            DirectoryError::Malformed {
                operation,
                message,
            } => Self::MalformedResponse {
                operation,
                message,
            },
        }
    }
}

// ============================================================================
// SECTION: Provisioned Identity
// ============================================================================

/// A backend user record provisioned for a fixture identity.
///
/// # Invariants
/// - `user_id` is the backend's identifier for the tagged record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedIdentity {
    /// Fixture key of the identity.
    pub key: IdentityKey,
    /// Backend-assigned user identifier.
    pub user_id: String,
}

// ============================================================================
// SECTION: Session Provisioner
// ============================================================================

/// Run-scoped provisioner of backend identities and sessions.
///
/// # Invariants
/// - Solely responsible for creating and destroying backend-persisted
///   session/identity records; no other component mutates them.
pub struct SessionProvisioner<B: BackendDirectory> {
    /// Backend directory client.
    backend: B,
    /// Immutable fixture catalog for the run.
    catalog: Arc<FixtureCatalog>,
    /// Tag stamped on every backend record created by this run.
    run_tag: RunTag,
    /// Current lifecycle phase.
    phase: Mutex<RunPhase>,
    /// Single-flight cache of provisioned identities.
    identities: KeyedCells<ProvisionedIdentity>,
    /// Single-flight cache of live sessions.
    sessions: KeyedCells<Session>,
    /// Audit sink for lifecycle events.
    audit: Arc<dyn ProvisionAudit>,
}

impl<B: BackendDirectory> SessionProvisioner<B> {
    /// Creates a provisioner for one run.
    #[must_use]
    pub fn new(backend: B, catalog: Arc<FixtureCatalog>, run_tag: RunTag) -> Self {
        Self {
            backend,
            catalog,
            run_tag,
            phase: Mutex::new(RunPhase::Uninitialized),
            identities: KeyedCells::new(),
            sessions: KeyedCells::new(),
            audit: Arc::new(NoopAudit),
        }
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn ProvisionAudit>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the run tag.
    #[must_use]
    pub const fn run_tag(&self) -> &RunTag {
        &self.run_tag
    }

    /// Returns the catalog this run provisions from.
    #[must_use]
    pub fn catalog(&self) -> &FixtureCatalog {
        &self.catalog
    }

    /// Returns the current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> RunPhase {
        *lock_unpoisoned(&self.phase)
    }

    /// Stores a new phase.
    fn set_phase(&self, phase: RunPhase) {
        *lock_unpoisoned(&self.phase) = phase;
    }

    /// Checks that a provisioning operation is currently legal.
    fn ensure_provisionable(&self, operation: &'static str) -> Result<(), ProvisionError> {
        match self.phase() {
            RunPhase::ScaffoldReady | RunPhase::IdentitiesProvisioned => Ok(()),
            RunPhase::TeardownPending | RunPhase::TornDown => {
                Err(ProvisionError::AlreadyTornDown {
                    operation,
                })
            }
            RunPhase::Uninitialized => Err(ProvisionError::NotScaffolded {
                operation,
                phase: RunPhase::Uninitialized.as_str(),
            }),
        }
    }

    /// Idempotently creates the scaffold team records the catalog requires.
    ///
    /// All-or-nothing: when any team creation fails, records already created
    /// under this run tag are rolled back before the error propagates, so a
    /// half-provisioned scaffold never survives.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::BackendUnavailable`] (fatal for the run)
    /// when the backend cannot be reached, [`ProvisionError::AlreadyTornDown`]
    /// after teardown, or the backend's rejection otherwise.
    pub async fn setup(&self) -> Result<(), ProvisionError> {
        match self.phase() {
            RunPhase::Uninitialized => {}
            // Scaffold already exists for this run; nothing to re-apply.
            RunPhase::ScaffoldReady | RunPhase::IdentitiesProvisioned => return Ok(()),
            RunPhase::TeardownPending | RunPhase::TornDown => {
                return Err(ProvisionError::AlreadyTornDown {
                    operation: "setup",
                });
            }
        }

        let teams: Vec<_> = self.catalog.teams().cloned().collect();
        for team in &teams {
            let created =
                self.backend.create_team(&self.run_tag, &team.key, &team.display_name).await;
            if let Err(error) = created {
                // Roll back whatever was created under this tag; the rollback
                // outcome is secondary to the original failure.
                let _ = self.backend.delete_by_run_tag(&self.run_tag).await;
                self.audit.record(ProvisionEvent::ScaffoldRolledBack {
                    run_tag: &self.run_tag,
                });
                return Err(error.into());
            }
            self.audit.record(ProvisionEvent::ScaffoldCreated {
                team: &team.key,
            });
        }

        self.set_phase(RunPhase::ScaffoldReady);
        Ok(())
    }

    /// Creates (or returns the cached) backend user record for a fixture key,
    /// applying its role and permission grants.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownIdentity`] for keys absent from the
    /// catalog, lifecycle errors before setup or after teardown, and backend
    /// errors otherwise.
    pub async fn create_identity(
        &self,
        key: &IdentityKey,
    ) -> Result<ProvisionedIdentity, ProvisionError> {
        self.ensure_provisionable("create_identity")?;
        let identity = self.catalog.identity(key)?.clone();

        let cell = self.identities.cell(key);
        let provisioned = cell
            .get_or_try_init(|| async {
                let user_id = self
                    .backend
                    .create_user(
                        &self.run_tag,
                        &identity.credentials.login,
                        &identity.credentials.password,
                        &identity.display_name,
                        identity.role == GlobalRole::Admin,
                    )
                    .await?;
                for grant in &identity.grants {
                    self.backend
                        .assign_permission(
                            &self.run_tag,
                            &identity.credentials.login,
                            &grant.team,
                            grant.level,
                        )
                        .await?;
                }
                self.audit.record(ProvisionEvent::IdentityCreated {
                    key,
                });
                Ok::<_, ProvisionError>(ProvisionedIdentity {
                    key: key.clone(),
                    user_id,
                })
            })
            .await?
            .clone();

        self.set_phase(RunPhase::IdentitiesProvisioned);
        Ok(provisioned)
    }

    /// Creates (or returns the cached) live session for a fixture key.
    ///
    /// The identity record is provisioned on demand first. Concurrent calls
    /// for the same key collapse to at most one backend session: the per-key
    /// cache cell is the single-flight gate.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownIdentity`] for keys absent from the
    /// catalog, lifecycle errors before setup or after teardown, and backend
    /// errors otherwise.
    pub async fn create_session(&self, key: &IdentityKey) -> Result<Session, ProvisionError> {
        self.ensure_provisionable("create_session")?;
        self.create_identity(key).await?;
        let identity = self.catalog.identity(key)?.clone();

        let cell = self.sessions.cell(key);
        let session = cell
            .get_or_try_init(|| async {
                let grant = self
                    .backend
                    .create_session(
                        &self.run_tag,
                        &identity.credentials.login,
                        &identity.credentials.password,
                    )
                    .await?;
                self.audit.record(ProvisionEvent::SessionMinted {
                    key,
                });
                Ok::<_, ProvisionError>(Session {
                    identity: key.clone(),
                    token: grant.token,
                    created_at: OffsetDateTime::now_utc(),
                    expires_at: grant.expires_at,
                })
            })
            .await?
            .clone();
        Ok(session)
    }

    /// Deletes every backend record created during this run and seals the
    /// provisioner.
    ///
    /// Safe to call after a partially failed setup, and idempotent: calling
    /// it on an already-torn-down run is a no-op. Caches are cleared before
    /// the delete is attempted so a stale credential can never be returned
    /// afterwards, but the run only becomes `TornDown` once the backend
    /// confirms the delete: a failed delete leaves the run in
    /// [`RunPhase::TeardownPending`], sealed against provisioning, and a
    /// later `teardown()` call retries the delete.
    ///
    /// # Errors
    ///
    /// Returns backend errors when deletion itself fails; already-deleted
    /// records are not an error.
    pub async fn teardown(&self) -> Result<(), ProvisionError> {
        if self.phase() == RunPhase::TornDown {
            return Ok(());
        }
        // Seal first: even while deletion is pending or failed, no later
        // operation may observe cached state from this run.
        self.identities.clear();
        self.sessions.clear();
        self.set_phase(RunPhase::TeardownPending);

        self.backend.delete_by_run_tag(&self.run_tag).await?;
        self.set_phase(RunPhase::TornDown);
        self.audit.record(ProvisionEvent::RunTornDown {
            run_tag: &self.run_tag,
        });
        Ok(())
    }
}

/// Locks a mutex, recovering the guard when a previous holder panicked.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
