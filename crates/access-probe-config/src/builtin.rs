// crates/access-probe-config/src/builtin.rs
// ============================================================================
// Module: Built-in Catalog
// Description: Default fixture catalog shipped with the workspace.
// Purpose: Provide the baseline identities required by every suite without an
// external catalog file.
// Dependencies: access-probe-core
// ============================================================================

//! ## Overview
//! The built-in catalog carries one identity per distinct permission level on
//! `team-1`, a membership-free identity (negative-access baseline), an
//! identity scoped only to the disjoint `team-2` (cross-team isolation
//! baseline), and a global admin. Suites that need different topology load
//! their own catalog document instead of mutating this one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use access_probe_core::Credentials;
use access_probe_core::FixtureCatalog;
use access_probe_core::GlobalRole;
use access_probe_core::Grant;
use access_probe_core::Identity;
use access_probe_core::IdentityKey;
use access_probe_core::PermissionLevel;
use access_probe_core::Team;
use access_probe_core::TeamKey;

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Builds one team fixture.
fn team(key: &str, display_name: &str) -> Team {
    Team {
        key: TeamKey::new(key),
        display_name: display_name.to_string(),
    }
}

/// Builds one identity fixture with derived credentials.
fn identity(key: &str, role: GlobalRole, grants: Vec<Grant>) -> Identity {
    Identity {
        key: IdentityKey::new(key),
        display_name: key.to_string(),
        credentials: Credentials {
            login: format!("{key}@probe.test"),
            password: format!("probe-{key}-pw"),
        },
        role,
        grants,
    }
}

/// Builds one grant.
fn grant(team: &str, level: PermissionLevel) -> Grant {
    Grant {
        team: TeamKey::new(team),
        level,
    }
}

// ============================================================================
// SECTION: Built-in Catalog
// ============================================================================

/// Returns the default catalog used by the workspace suites.
///
/// # Panics
///
/// Never panics in practice: the built-in definitions satisfy every catalog
/// invariant, and the crate tests re-validate them.
#[must_use]
pub fn builtin_catalog() -> FixtureCatalog {
    let teams = vec![team("team-1", "Team One"), team("team-2", "Team Two")];
    let identities = vec![
        identity("global-admin", GlobalRole::Admin, vec![]),
        identity(
            "team-owner",
            GlobalRole::Standard,
            vec![grant("team-1", PermissionLevel::Owner)],
        ),
        identity(
            "team-editor",
            GlobalRole::Standard,
            vec![grant("team-1", PermissionLevel::Edit)],
        ),
        identity(
            "team-runner",
            GlobalRole::Standard,
            vec![grant("team-1", PermissionLevel::Run)],
        ),
        identity(
            "team-viewer",
            GlobalRole::Standard,
            vec![grant("team-1", PermissionLevel::View)],
        ),
        // Negative-access baseline: no team membership at all.
        identity("outsider", GlobalRole::Standard, vec![]),
        // Cross-team isolation baseline: scoped to team-2 only.
        identity(
            "team2-user",
            GlobalRole::Standard,
            vec![grant("team-2", PermissionLevel::Edit)],
        ),
    ];
    match FixtureCatalog::new(teams, identities) {
        Ok(catalog) => catalog,
        // The definitions above are static and validated by the crate tests;
        // an invariant violation here is unreachable.
        Err(_) => unreachable!("built-in catalog definitions are valid"),
    }
}
