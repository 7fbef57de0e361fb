// crates/access-probe-core/src/catalog.rs
// ============================================================================
// Module: Fixture Catalog
// Description: Immutable identity/team definitions and catalog queries.
// Purpose: Own the canonical fixture data for a run and validate it once at
// construction.
// Dependencies: crate::identifiers, serde, thiserror
// ============================================================================

//! ## Overview
//! The fixture catalog is the single source of truth for test identities,
//! teams, and permission grants. It is validated at construction and
//! immutable afterwards: components receive a shared reference and never
//! mutate it, which keeps expected-access computation deterministic for the
//! whole run.
//!
//! ## Invariants
//! - Identity and team keys are unique within a catalog.
//! - No identity carries two grants for the same team.
//! - Every grant references a team defined in the catalog.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::identifiers::IdentityKey;
use crate::identifiers::TeamKey;

// ============================================================================
// SECTION: Permission Levels
// ============================================================================

/// Permission level an identity holds on a team.
///
/// # Invariants
/// - The derived ordering is total (`None < View < Run < Edit < Owner`), so
///   "at least X" boundary checks are well-defined.
/// - Variants are stable for serialization and catalog files.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    /// No access.
    None,
    /// Read-only access.
    View,
    /// View plus the ability to execute runs.
    Run,
    /// Run plus mutation of team resources.
    Edit,
    /// Full control including destructive operations.
    Owner,
}

impl PermissionLevel {
    /// All levels in ascending order.
    pub const ALL: [Self; 5] = [Self::None, Self::View, Self::Run, Self::Edit, Self::Owner];

    /// Returns a stable label for the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::View => "view",
            Self::Run => "run",
            Self::Edit => "edit",
            Self::Owner => "owner",
        }
    }
}

/// Global role attached to an identity, independent of team grants.
///
/// # Invariants
/// - Variants are stable for serialization and catalog files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalRole {
    /// Ordinary identity; access comes only from explicit grants.
    Standard,
    /// Instance administrator; allowed everywhere regardless of grants.
    Admin,
}

impl GlobalRole {
    /// Returns a stable label for the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Admin => "admin",
        }
    }
}

// ============================================================================
// SECTION: Fixture Records
// ============================================================================

/// Login credentials used to mint the backend user record for an identity.
///
/// # Invariants
/// - Test-only material; never secret and never reused outside a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Login name presented to the backend.
    pub login: String,
    /// Password presented to the backend.
    pub password: String,
}

/// A (team, level) permission grant held by an identity.
///
/// # Invariants
/// - `team` references a team defined in the owning catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Team the grant applies to.
    pub team: TeamKey,
    /// Level granted on the team.
    pub level: PermissionLevel,
}

/// A named test identity with role and team grants.
///
/// # Invariants
/// - `grants` never contains two entries for the same team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable fixture key.
    pub key: IdentityKey,
    /// Human-readable display name.
    pub display_name: String,
    /// Backend login credentials.
    pub credentials: Credentials,
    /// Global role.
    pub role: GlobalRole,
    /// Team permission grants.
    pub grants: Vec<Grant>,
}

impl Identity {
    /// Returns the level explicitly granted on `team`, or
    /// [`PermissionLevel::None`] when no grant exists.
    ///
    /// The global role is deliberately not consulted here; use
    /// [`crate::oracle::expected_access`] for effective access.
    #[must_use]
    pub fn grant_level(&self, team: &TeamKey) -> PermissionLevel {
        self.grants
            .iter()
            .find(|grant| grant.team == *team)
            .map_or(PermissionLevel::None, |grant| grant.level)
    }
}

/// A named team used as a permission scoping unit.
///
/// # Invariants
/// - Teams are referenced by grants, never owning: membership is derived from
///   identity grants, not stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Stable fixture key.
    pub key: TeamKey,
    /// Human-readable display name.
    pub display_name: String,
}

// ============================================================================
// SECTION: Catalog Errors
// ============================================================================

/// Fixture catalog errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling and always name the
///   offending key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Lookup for an identity key absent from the catalog.
    #[error("unknown identity key: {0}")]
    UnknownIdentity(IdentityKey),
    /// Lookup for a team key absent from the catalog.
    #[error("unknown team key: {0}")]
    UnknownTeam(TeamKey),
    /// Two identities share the same key.
    #[error("duplicate identity key: {0}")]
    DuplicateIdentity(IdentityKey),
    /// Two teams share the same key.
    #[error("duplicate team key: {0}")]
    DuplicateTeam(TeamKey),
    /// An identity carries two grants for the same team.
    #[error("identity {identity} has contradictory grants for team {team}")]
    DuplicateGrant {
        /// Identity carrying the contradictory grants.
        identity: IdentityKey,
        /// Team granted twice.
        team: TeamKey,
    },
    /// An identity grant references a team not defined in the catalog.
    #[error("identity {identity} grants on undefined team {team}")]
    GrantTargetMissing {
        /// Identity carrying the dangling grant.
        identity: IdentityKey,
        /// Undefined team referenced by the grant.
        team: TeamKey,
    },
}

// ============================================================================
// SECTION: Fixture Catalog
// ============================================================================

/// Immutable, validated catalog of test identities and teams.
///
/// # Invariants
/// - Construction validates key uniqueness and grant consistency; once built,
///   the catalog never changes for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureCatalog {
    /// Identities keyed by fixture key.
    identities: BTreeMap<IdentityKey, Identity>,
    /// Teams keyed by fixture key.
    teams: BTreeMap<TeamKey, Team>,
}

impl FixtureCatalog {
    /// Builds a catalog from team and identity definitions.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when keys collide, an identity grants twice
    /// on one team, or a grant references an undefined team.
    pub fn new(
        team_defs: impl IntoIterator<Item = Team>,
        identity_defs: impl IntoIterator<Item = Identity>,
    ) -> Result<Self, CatalogError> {
        let mut teams = BTreeMap::new();
        for team in team_defs {
            let key = team.key.clone();
            if teams.insert(key.clone(), team).is_some() {
                return Err(CatalogError::DuplicateTeam(key));
            }
        }

        let mut identities = BTreeMap::new();
        for identity in identity_defs {
            validate_grants(&identity, &teams)?;
            let key = identity.key.clone();
            if identities.insert(key.clone(), identity).is_some() {
                return Err(CatalogError::DuplicateIdentity(key));
            }
        }

        Ok(Self {
            identities,
            teams,
        })
    }

    /// Looks up an identity definition.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownIdentity`] when the key is absent.
    pub fn identity(&self, key: &IdentityKey) -> Result<&Identity, CatalogError> {
        self.identities.get(key).ok_or_else(|| CatalogError::UnknownIdentity(key.clone()))
    }

    /// Looks up a team definition.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownTeam`] when the key is absent.
    pub fn team(&self, key: &TeamKey) -> Result<&Team, CatalogError> {
        self.teams.get(key).ok_or_else(|| CatalogError::UnknownTeam(key.clone()))
    }

    /// Iterates all identities in key order.
    pub fn identities(&self) -> impl Iterator<Item = &Identity> {
        self.identities.values()
    }

    /// Iterates all teams in key order.
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    /// Returns the keys of identities whose effective level on `team` is at
    /// least `level`. Global admins always qualify.
    ///
    /// Used to parametrize permission-boundary tests.
    #[must_use]
    pub fn identities_with_at_least(
        &self,
        team: &TeamKey,
        level: PermissionLevel,
    ) -> Vec<IdentityKey> {
        self.identities
            .values()
            .filter(|identity| {
                identity.role == GlobalRole::Admin || identity.grant_level(team) >= level
            })
            .map(|identity| identity.key.clone())
            .collect()
    }

    /// Returns the derived member set of a team: all identities holding an
    /// explicit grant above [`PermissionLevel::None`] on it.
    #[must_use]
    pub fn members(&self, team: &TeamKey) -> Vec<IdentityKey> {
        self.identities
            .values()
            .filter(|identity| identity.grant_level(team) > PermissionLevel::None)
            .map(|identity| identity.key.clone())
            .collect()
    }
}

/// Checks one identity's grants for duplicates and dangling team references.
fn validate_grants(
    identity: &Identity,
    teams: &BTreeMap<TeamKey, Team>,
) -> Result<(), CatalogError> {
    let mut seen: Vec<&TeamKey> = Vec::with_capacity(identity.grants.len());
    for grant in &identity.grants {
        if !teams.contains_key(&grant.team) {
            return Err(CatalogError::GrantTargetMissing {
                identity: identity.key.clone(),
                team: grant.team.clone(),
            });
        }
        if seen.contains(&&grant.team) {
            return Err(CatalogError::DuplicateGrant {
                identity: identity.key.clone(),
                team: grant.team.clone(),
            });
        }
        seen.push(&grant.team);
    }
    Ok(())
}
