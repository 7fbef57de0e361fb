// crates/access-probe-config/src/lib.rs
// ============================================================================
// Module: Access Probe Config
// Description: Fixture catalog document model, parsing, and defaults.
// Purpose: Load versioned catalog files into validated fixture catalogs.
// Dependencies: access-probe-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! The catalog is checked-in, immutable configuration: a versioned TOML
//! document listing teams and identities with their grants. This crate is the
//! only reader of that file format; everything downstream consumes the
//! validated [`FixtureCatalog`] it produces. A built-in default catalog
//! covering every permission level plus the negative-access and cross-team
//! baselines ships here so suites can run without an external file.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod builtin;
mod document;

pub use builtin::builtin_catalog;
pub use document::CATALOG_VERSION;
pub use document::CatalogDocument;
pub use document::CatalogFileError;
pub use document::load_catalog;
pub use document::parse_catalog;
