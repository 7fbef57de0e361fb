// crates/access-probe-client/src/run.rs
// ============================================================================
// Module: Run Lifecycle
// Description: Scoped setup/teardown sequencing for test groups.
// Purpose: Guarantee teardown on every exit path around a provisioned run.
// Dependencies: access-probe-core, crate::provisioner, rand
// ============================================================================

//! ## Overview
//! Isolation and cleanup discipline for one test group: `setup()` strictly
//! precedes the body, `teardown()` strictly follows it, success or failure.
//! Two concurrent runs with distinct run tags never observe each other's
//! backend records; within a run, catalog key uniqueness keeps the caches
//! from cross-contaminating identities.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;

use access_probe_core::RunTag;
use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::backend::BackendDirectory;
use crate::provisioner::ProvisionError;
use crate::provisioner::SessionProvisioner;

// ============================================================================
// SECTION: Run Tags
// ============================================================================

/// Length of the random suffix in generated run tags.
const RUN_TAG_SUFFIX_LEN: usize = 12;

/// Generates a fresh, collision-resistant run tag.
#[must_use]
pub fn fresh_run_tag() -> RunTag {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RUN_TAG_SUFFIX_LEN)
        .map(char::from)
        .collect();
    RunTag::new(format!("run-{suffix}"))
}

// ============================================================================
// SECTION: Scoped Runs
// ============================================================================

/// Runs `body` inside a fully provisioned run, tearing down on every exit
/// path.
///
/// Sequencing: `setup()` completes before `body` starts; `teardown()` runs
/// after `body` finishes whether it succeeded or failed. A body error takes
/// precedence over a teardown error in the returned result. Panics are not
/// caught: a panicking body aborts the whole test process, which is the
/// loud failure the lifecycle contract wants.
///
/// # Errors
///
/// Returns the setup error, the body error, or (when the body succeeded) the
/// teardown error.
pub async fn with_provisioned_run<'a, B, T, E, F, Fut>(
    provisioner: &'a SessionProvisioner<B>,
    body: F,
) -> Result<T, E>
where
    B: BackendDirectory,
    E: From<ProvisionError>,
    F: FnOnce(&'a SessionProvisioner<B>) -> Fut,
    Fut: Future<Output = Result<T, E>> + 'a,
{
    provisioner.setup().await.map_err(E::from)?;
    let outcome = body(provisioner).await;
    let teardown = provisioner.teardown().await;
    match (outcome, teardown) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(error)) => Err(E::from(error)),
        (Err(error), _) => Err(error),
    }
}
