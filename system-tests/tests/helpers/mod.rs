// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for Access Probe system-tests.
// Purpose: Provide the stub backend, harness wiring, and readiness probes.
// Dependencies: system-tests, access-probe-client, access-probe-core
// ============================================================================

//! ## Overview
//! Shared helpers for Access Probe system-tests.
//! Purpose: Provide the stub backend, harness wiring, and readiness probes.
//! Invariants:
//! - System-test execution is deterministic and fail-closed.
//! - Each suite provisions under its own run tag and tears down after itself.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod readiness;
