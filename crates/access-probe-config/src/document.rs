// crates/access-probe-config/src/document.rs
// ============================================================================
// Module: Catalog Document
// Description: TOML wire model for fixture catalog files.
// Purpose: Parse and validate versioned catalog documents fail-closed.
// Dependencies: access-probe-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Catalog files are parsed strictly: unknown fields, unsupported versions,
//! and any violation of catalog invariants (duplicate keys, contradictory
//! grants, dangling team references) abort loading with an error naming the
//! offending key. There is no partial acceptance.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use access_probe_core::CatalogError;
use access_probe_core::Credentials;
use access_probe_core::FixtureCatalog;
use access_probe_core::GlobalRole;
use access_probe_core::Grant;
use access_probe_core::Identity;
use access_probe_core::IdentityKey;
use access_probe_core::PermissionLevel;
use access_probe_core::Team;
use access_probe_core::TeamKey;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Catalog document version this crate understands.
pub const CATALOG_VERSION: u32 = 1;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Catalog file loading errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum CatalogFileError {
    /// Reading the file failed.
    #[error("failed to read catalog file {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid TOML or has an unexpected shape.
    #[error("failed to parse catalog document: {0}")]
    Parse(#[from] toml::de::Error),
    /// The document declares a version this crate does not understand.
    #[error("unsupported catalog version {found} (expected {CATALOG_VERSION})")]
    UnsupportedVersion {
        /// Version declared by the document.
        found: u32,
    },
    /// The parsed data violates a catalog invariant.
    #[error(transparent)]
    Invalid(#[from] CatalogError),
}

// ============================================================================
// SECTION: Document Model
// ============================================================================

/// Root of a catalog TOML document.
///
/// # Invariants
/// - Wire shape only; catalog invariants are enforced on conversion.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    /// Document metadata.
    pub catalog: CatalogMeta,
    /// Team definitions.
    #[serde(default)]
    pub team: Vec<TeamEntry>,
    /// Identity definitions.
    #[serde(default)]
    pub identity: Vec<IdentityEntry>,
}

/// Catalog document metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogMeta {
    /// Declared document version.
    pub version: u32,
}

/// One `[[team]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamEntry {
    /// Stable team key.
    pub key: String,
    /// Human-readable display name.
    pub display_name: String,
}

/// One `[[identity]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityEntry {
    /// Stable identity key.
    pub key: String,
    /// Human-readable display name.
    pub display_name: String,
    /// Backend login name.
    pub login: String,
    /// Backend password.
    pub password: String,
    /// Global role (defaults to standard).
    #[serde(default = "default_role")]
    pub role: GlobalRole,
    /// Team permission grants.
    #[serde(default)]
    pub grant: Vec<GrantEntry>,
}

/// One `[[identity.grant]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrantEntry {
    /// Team the grant applies to.
    pub team: String,
    /// Level granted on the team.
    pub level: PermissionLevel,
}

/// Default global role for identities that do not declare one.
fn default_role() -> GlobalRole {
    GlobalRole::Standard
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Parses a catalog document from TOML text and validates it.
///
/// # Errors
///
/// Returns [`CatalogFileError`] on malformed TOML, an unsupported version,
/// or a catalog invariant violation.
pub fn parse_catalog(text: &str) -> Result<FixtureCatalog, CatalogFileError> {
    let document: CatalogDocument = toml::from_str(text)?;
    if document.catalog.version != CATALOG_VERSION {
        return Err(CatalogFileError::UnsupportedVersion {
            found: document.catalog.version,
        });
    }
    let teams = document.team.into_iter().map(|entry| Team {
        key: TeamKey::new(entry.key),
        display_name: entry.display_name,
    });
    let identities = document.identity.into_iter().map(|entry| Identity {
        key: IdentityKey::new(entry.key),
        display_name: entry.display_name,
        credentials: Credentials {
            login: entry.login,
            password: entry.password,
        },
        role: entry.role,
        grants: entry
            .grant
            .into_iter()
            .map(|grant| Grant {
                team: TeamKey::new(grant.team),
                level: grant.level,
            })
            .collect(),
    });
    Ok(FixtureCatalog::new(teams, identities)?)
}

/// Loads and validates a catalog document from a file path.
///
/// # Errors
///
/// Returns [`CatalogFileError`] when the file cannot be read or fails
/// parsing/validation.
pub fn load_catalog(path: &Path) -> Result<FixtureCatalog, CatalogFileError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&text)
}
