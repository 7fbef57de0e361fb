// crates/access-probe-client/src/audit.rs
// ============================================================================
// Module: Provisioning Audit
// Description: Observability hooks for provisioning operations.
// Purpose: Surface lifecycle events without a hard logging dependency.
// Dependencies: access-probe-core
// ============================================================================

//! ## Overview
//! A thin audit interface for provisioning lifecycle events. It is
//! intentionally dependency-light so embedders can plug in their own logging
//! or metrics backend without redesign; the default sink discards events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use access_probe_core::IdentityKey;
use access_probe_core::RunTag;
use access_probe_core::TeamKey;

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// Provisioning lifecycle event.
///
/// # Invariants
/// - Events carry fixture keys only, never credentials or tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionEvent<'a> {
    /// A scaffold team record was created.
    ScaffoldCreated {
        /// Team that was created.
        team: &'a TeamKey,
    },
    /// Scaffold creation failed and tagged records were rolled back.
    ScaffoldRolledBack {
        /// Tag whose records were rolled back.
        run_tag: &'a RunTag,
    },
    /// A backend user record was created for an identity.
    IdentityCreated {
        /// Fixture key of the created identity.
        key: &'a IdentityKey,
    },
    /// A live session was minted for an identity.
    SessionMinted {
        /// Fixture key owning the session.
        key: &'a IdentityKey,
    },
    /// All tagged backend records for the run were deleted.
    RunTornDown {
        /// Tag whose records were deleted.
        run_tag: &'a RunTag,
    },
}

// ============================================================================
// SECTION: Audit Sink
// ============================================================================

/// Sink receiving provisioning lifecycle events.
pub trait ProvisionAudit: Send + Sync {
    /// Records one lifecycle event.
    fn record(&self, event: ProvisionEvent<'_>);
}

/// Default audit sink that discards every event.
///
/// # Invariants
/// - Recording has no side effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAudit;

impl ProvisionAudit for NoopAudit {
    fn record(&self, _event: ProvisionEvent<'_>) {}
}
