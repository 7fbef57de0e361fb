// crates/access-probe-core/src/identifiers.rs
// ============================================================================
// Module: Access Probe Identifiers
// Description: Canonical opaque identifiers for fixtures and runs.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! This module defines the canonical identifiers used throughout Access
//! Probe. Identifiers are opaque UTF-8 strings and serialize transparently on
//! the wire. No normalization is applied at construction; the catalog is the
//! validation boundary for key uniqueness.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Stable key naming a test identity in the fixture catalog.
///
/// # Invariants
/// - Opaque UTF-8 string; unique within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Creates a new identity key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for IdentityKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for IdentityKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Stable key naming a team scoping unit.
///
/// # Invariants
/// - Opaque UTF-8 string; unique within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamKey(String);

impl TeamKey {
    /// Creates a new team key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TeamKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TeamKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Opaque tag stamped on every backend record created during one run.
///
/// # Invariants
/// - Unique per run; teardown deletes backend records by this tag, so two
///   concurrent runs with distinct tags never touch each other's records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunTag(String);

impl RunTag {
    /// Creates a new run tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RunTag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RunTag {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
