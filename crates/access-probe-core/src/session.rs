// crates/access-probe-core/src/session.rs
// ============================================================================
// Module: Session Model
// Description: Ephemeral backend-issued session credential for an identity.
// Purpose: Bind an identity key to an opaque, backend-verifiable token.
// Dependencies: crate::identifiers, time
// ============================================================================

//! ## Overview
//! A session is a live credential minted by the backend for one fixture
//! identity. Sessions are created on demand by the provisioner, cached per
//! identity key for the duration of a run, and destroyed en masse at
//! teardown. The backend is authoritative for expiry; this type records it
//! but never enforces it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::OffsetDateTime;

use crate::identifiers::IdentityKey;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Cookie name the backend expects the session token under.
pub const SESSION_COOKIE: &str = "probe_session";

// ============================================================================
// SECTION: Session
// ============================================================================

/// A live, backend-recognized session bound to one identity.
///
/// # Invariants
/// - `token` is opaque; only the backend can interpret it.
/// - At most one session exists per identity per run (single-flight contract
///   enforced by the provisioner cache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Owning identity key.
    pub identity: IdentityKey,
    /// Opaque backend token.
    pub token: String,
    /// Creation time reported locally at mint.
    pub created_at: OffsetDateTime,
    /// Expiry reported by the backend.
    pub expires_at: OffsetDateTime,
}

impl Session {
    /// Returns the `Cookie` header value carrying this session.
    #[must_use]
    pub fn cookie_value(&self) -> String {
        format!("{SESSION_COOKIE}={}", self.token)
    }
}
