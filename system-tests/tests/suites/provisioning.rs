// system-tests/tests/suites/provisioning.rs
// ============================================================================
// Module: Provisioning Tests
// Description: System tests for scaffold, session, and teardown over HTTP.
// Purpose: Validate run lifecycle and isolation against the stub backend's
// real wire surface.
// Dependencies: system-tests helpers
// ============================================================================

//! Provisioning lifecycle system tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::Arc;

use access_probe_client::HttpBackend;
use access_probe_client::ProvisionError;
use access_probe_client::SessionProvisioner;
use access_probe_client::fresh_run_tag;
use access_probe_client::with_provisioned_run;
use access_probe_core::IdentityKey;
use access_probe_core::TeamKey;
use system_tests::config::SystemTestConfig;

use helpers::harness::ProbeAction;
use helpers::harness::ProbeRig;

#[tokio::test(flavor = "multi_thread")]
async fn setup_scaffolds_every_catalog_team() -> Result<(), Box<dyn std::error::Error>> {
    let rig = ProbeRig::spawn().await?;
    let provisioner = rig.provisioner();
    provisioner.setup().await?;

    let expected = provisioner.catalog().teams().count();
    let stats = rig.run_stats(provisioner.run_tag().as_str()).await?;
    assert_eq!(stats.teams, expected);
    assert_eq!(stats.users, 0, "setup must not create identities eagerly");

    rig.finish().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_session_requests_mint_once_over_http()
-> Result<(), Box<dyn std::error::Error>> {
    let rig = ProbeRig::spawn().await?;
    let provisioner = rig.provisioner();
    provisioner.setup().await?;

    let key = IdentityKey::new("team-editor");
    let (first, second, third) = tokio::join!(
        provisioner.create_session(&key),
        provisioner.create_session(&key),
        provisioner.create_session(&key),
    );
    let first = first?;
    assert_eq!(first.token, second?.token);
    assert_eq!(first.token, third?.token);

    let stats = rig.run_stats(provisioner.run_tag().as_str()).await?;
    assert_eq!(stats.session_mints, 1, "one backend session per identity per run");

    rig.finish().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn teardown_deletes_records_and_invalidates_sessions()
-> Result<(), Box<dyn std::error::Error>> {
    let rig = ProbeRig::spawn().await?;
    let provisioner = rig.provisioner();
    provisioner.setup().await?;

    let team = TeamKey::new("team-1");
    let session = provisioner.create_session(&IdentityKey::new("team-viewer")).await?;
    let before = rig.probe(ProbeAction::ReadReports, &team, Some(&session)).await?;
    assert_eq!(before, 200);

    provisioner.teardown().await?;

    let stats = rig.run_stats(provisioner.run_tag().as_str()).await?;
    assert_eq!(stats.teams, 0);
    assert_eq!(stats.users, 0);
    assert_eq!(stats.sessions, 0);

    // The retained token no longer authenticates anything.
    let after = rig
        .probe(ProbeAction::ReadReports, &TeamKey::new("team-2"), Some(&session))
        .await?;
    assert_eq!(after, 401);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_runs_never_observe_each_other() -> Result<(), Box<dyn std::error::Error>> {
    let rig = ProbeRig::spawn().await?;
    let first = rig.provisioner();
    first.setup().await?;

    // A second run against the same backend, under its own tag.
    let directory = HttpBackend::new(rig.base_url(), rig.timeout())?;
    let second = SessionProvisioner::new(
        directory,
        Arc::new(first.catalog().clone()),
        fresh_run_tag(),
    );
    second.setup().await?;

    let key = IdentityKey::new("team-runner");
    let first_session = first.create_session(&key).await?;
    let second_session = second.create_session(&key).await?;
    assert_ne!(first_session.token, second_session.token);

    first.teardown().await?;

    // The first run's teardown removes only its own records.
    let stats = rig.run_stats(first.run_tag().as_str()).await?;
    assert_eq!(stats.users, 0);
    assert_eq!(stats.sessions, 0);
    let stats = rig.run_stats(second.run_tag().as_str()).await?;
    assert_eq!(stats.users, 1);
    assert_eq!(stats.sessions, 1);

    // The surviving run keeps working after the other run's teardown.
    let team = TeamKey::new("team-1");
    let observed = rig.probe(ProbeAction::LaunchJob, &team, Some(&second_session)).await?;
    assert_eq!(observed, 200);

    second.teardown().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn scoped_run_cleans_up_after_body_failure() -> Result<(), Box<dyn std::error::Error>> {
    let rig = ProbeRig::spawn().await?;
    let provisioner = rig.provisioner();

    let outcome: Result<(), ProvisionError> =
        with_provisioned_run(provisioner, |run| async move {
            run.create_session(&IdentityKey::new("team-owner")).await?;
            Err(ProvisionError::BackendUnavailable("injected body failure".to_string()))
        })
        .await;
    assert!(outcome.is_err());

    let stats = rig.run_stats(provisioner.run_tag().as_str()).await?;
    assert_eq!(stats.teams, 0);
    assert_eq!(stats.users, 0);
    assert_eq!(stats.sessions, 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn external_backend_and_keep_fixtures_overrides_are_honored()
-> Result<(), Box<dyn std::error::Error>> {
    let host = ProbeRig::spawn().await?;

    // A second rig configured as if the environment pointed it at an
    // already-running backend and asked to keep its fixtures.
    let config = SystemTestConfig {
        backend_url: Some(host.base_url().to_string()),
        keep_fixtures: true,
        ..SystemTestConfig::default()
    };
    let rig = ProbeRig::spawn_with(config).await?;
    rig.provisioner().setup().await?;
    rig.provisioner().create_session(&IdentityKey::new("team-viewer")).await?;
    let tag = rig.provisioner().run_tag().as_str().to_string();
    rig.finish().await?;

    // The records landed on the host backend and survived finish().
    let stats = host.run_stats(&tag).await?;
    assert_eq!(stats.users, 1);
    assert_eq!(stats.sessions, 1);

    rig.provisioner().teardown().await?;
    Ok(())
}
