// crates/access-probe-core/src/lib.rs
// ============================================================================
// Module: Access Probe Core
// Description: Pure fixture data model and permission oracle.
// Purpose: Define identities, teams, grants, sessions, and expected-access
// computation with zero I/O.
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! Core types for the Access Probe fixture system. Everything in this crate
//! is pure data plus pure queries: the catalog owns canonical identity and
//! team definitions for a run, and the oracle computes expected access
//! decisions from catalog data alone. Backend mutation lives entirely in
//! `access-probe-client`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod identifiers;
pub mod oracle;
pub mod session;

pub use catalog::CatalogError;
pub use catalog::Credentials;
pub use catalog::FixtureCatalog;
pub use catalog::GlobalRole;
pub use catalog::Grant;
pub use catalog::Identity;
pub use catalog::PermissionLevel;
pub use catalog::Team;
pub use identifiers::IdentityKey;
pub use identifiers::RunTag;
pub use identifiers::TeamKey;
pub use oracle::Access;
pub use oracle::expected_access;
pub use oracle::expected_status;
pub use session::SESSION_COOKIE;
pub use session::Session;
