// crates/access-probe-client/src/lib.rs
// ============================================================================
// Module: Access Probe Client
// Description: Backend directory client, session provisioner, run lifecycle.
// Purpose: Turn fixture definitions into real, backend-recognized identities
// and sessions, with guaranteed cleanup.
// Dependencies: access-probe-core, async-trait, rand, reqwest, serde,
// thiserror, time, tokio, url
// ============================================================================

//! ## Overview
//! This crate owns every mutation of backend-persisted test state. The
//! [`SessionProvisioner`] creates scaffold teams, user records, and live
//! sessions tagged with a per-run [`access_probe_core::RunTag`], caches them
//! per identity key behind a single-flight gate, and deletes everything by
//! tag at teardown. All operations intentionally hit a real backend: a broken
//! authorization path must produce a genuine failure, not mock drift.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod backend;
mod cache;
pub mod provisioner;
pub mod run;

pub use audit::NoopAudit;
pub use audit::ProvisionAudit;
pub use audit::ProvisionEvent;
pub use backend::BackendDirectory;
pub use backend::DirectoryError;
pub use backend::HttpBackend;
pub use backend::SessionGrant;
pub use provisioner::ProvisionError;
pub use provisioner::ProvisionedIdentity;
pub use provisioner::RunPhase;
pub use provisioner::SessionProvisioner;
pub use run::fresh_run_tag;
pub use run::with_provisioned_run;
