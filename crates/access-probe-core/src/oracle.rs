// crates/access-probe-core/src/oracle.rs
// ============================================================================
// Module: Permission Oracle
// Description: Expected-access computation over fixture catalog data.
// Purpose: Drive test parametrization and assertions from pure lookups.
// Dependencies: crate::catalog, serde
// ============================================================================

//! ## Overview
//! The oracle answers what access an identity *should* have, using only the
//! immutable catalog. It is independently testable without any backend: a
//! disagreement between the oracle and an observed HTTP result is the primary
//! signal this system exists to surface, and it is a test assertion failure,
//! never an infrastructure error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::catalog::CatalogError;
use crate::catalog::FixtureCatalog;
use crate::catalog::GlobalRole;
use crate::catalog::Identity;
use crate::catalog::PermissionLevel;
use crate::identifiers::IdentityKey;
use crate::identifiers::TeamKey;

// ============================================================================
// SECTION: Access Decision
// ============================================================================

/// Expected access decision for an (identity, team, level) query.
///
/// # Invariants
/// - Variants are stable for serialization and test transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// The identity should be permitted the operation.
    Allow,
    /// The identity should be refused the operation.
    Deny,
}

impl Access {
    /// Returns a stable label for the decision.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

// ============================================================================
// SECTION: Oracle Functions
// ============================================================================

/// Computes the expected access for `identity` on `team` at `required` level.
///
/// Allow iff the identity's grant level for the team is at least `required`.
/// Global admins are allowed everywhere, including teams absent from their
/// explicit grants. Monotonic in `required`: an identity allowed at level L
/// is allowed at every level below L.
#[must_use]
pub fn expected_access(
    identity: &Identity,
    team: &TeamKey,
    required: PermissionLevel,
) -> Access {
    if identity.role == GlobalRole::Admin {
        return Access::Allow;
    }
    if identity.grant_level(team) >= required {
        Access::Allow
    } else {
        Access::Deny
    }
}

/// Maps an expected decision to the uniform HTTP status convention.
///
/// Missing or invalid credentials always map to 401; an authenticated but
/// denied request maps to 403 regardless of which boundary (level or team)
/// was crossed; an allowed request maps to 200.
#[must_use]
pub const fn expected_status(access: Access, authenticated: bool) -> u16 {
    if !authenticated {
        return 401;
    }
    match access {
        Access::Allow => 200,
        Access::Deny => 403,
    }
}

impl FixtureCatalog {
    /// Computes expected access by identity and team key.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when either key is absent from the catalog.
    pub fn expected_access(
        &self,
        identity: &IdentityKey,
        team: &TeamKey,
        required: PermissionLevel,
    ) -> Result<Access, CatalogError> {
        let identity = self.identity(identity)?;
        let team = self.team(team)?;
        Ok(expected_access(identity, &team.key, required))
    }
}
