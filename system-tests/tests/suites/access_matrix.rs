// system-tests/tests/suites/access_matrix.rs
// ============================================================================
// Module: Access Matrix Tests
// Description: System tests comparing observed RBAC outcomes to the oracle.
// Purpose: Surface disagreements between expected and enforced access as
// descriptive per-case assertion failures.
// Dependencies: system-tests helpers
// ============================================================================

//! Access matrix system tests.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use access_probe_core::IdentityKey;
use access_probe_core::Session;
use access_probe_core::TeamKey;
use access_probe_core::expected_status;
use time::OffsetDateTime;

use helpers::harness::ProbeAction;
use helpers::harness::ProbeRig;

#[tokio::test(flavor = "multi_thread")]
async fn full_matrix_agrees_with_oracle() -> Result<(), Box<dyn std::error::Error>> {
    let rig = ProbeRig::spawn().await?;
    let provisioner = rig.provisioner();
    provisioner.setup().await?;

    let catalog = provisioner.catalog().clone();
    let identity_keys: Vec<IdentityKey> =
        catalog.identities().map(|identity| identity.key.clone()).collect();
    let team_keys: Vec<_> = catalog.teams().map(|team| team.key.clone()).collect();

    let mut mismatches = Vec::new();
    for key in &identity_keys {
        let session = provisioner.create_session(key).await?;
        for team in &team_keys {
            for action in ProbeAction::ALL {
                let access =
                    catalog.expected_access(key, team, action.required_level())?;
                let expected = expected_status(access, true);
                let observed = rig.probe(action, team, Some(&session)).await?;
                if observed != expected {
                    mismatches.push(format!(
                        "{key} on {team} {}: expected {expected}, observed {observed}",
                        action.as_str()
                    ));
                }
            }
        }
    }
    rig.finish().await?;

    assert!(
        mismatches.is_empty(),
        "oracle disagreements:\n{}",
        mismatches.join("\n")
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_credential_is_unauthenticated() -> Result<(), Box<dyn std::error::Error>> {
    let rig = ProbeRig::spawn().await?;
    let provisioner = rig.provisioner();
    provisioner.setup().await?;

    let team = provisioner
        .catalog()
        .teams()
        .next()
        .map(|record| record.key.clone())
        .ok_or("catalog has no teams")?;
    for action in ProbeAction::ALL {
        let observed = rig.probe(action, &team, None).await?;
        assert_eq!(observed, 401, "unauthenticated {} should be 401", action.as_str());
    }
    rig.finish().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_session_token_is_unauthenticated() -> Result<(), Box<dyn std::error::Error>> {
    let rig = ProbeRig::spawn().await?;
    let provisioner = rig.provisioner();
    provisioner.setup().await?;

    let team = provisioner
        .catalog()
        .teams()
        .next()
        .map(|record| record.key.clone())
        .ok_or("catalog has no teams")?;
    let forged = Session {
        identity: IdentityKey::new("team-viewer"),
        token: "tok-never-minted".to_string(),
        created_at: OffsetDateTime::now_utc(),
        expires_at: OffsetDateTime::now_utc() + time::Duration::hours(1),
    };
    let observed = rig.probe(ProbeAction::ReadReports, &team, Some(&forged)).await?;
    assert_eq!(observed, 401);
    rig.finish().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn viewer_hits_the_permission_floor() -> Result<(), Box<dyn std::error::Error>> {
    let rig = ProbeRig::spawn().await?;
    let provisioner = rig.provisioner();
    provisioner.setup().await?;

    let team = TeamKey::new("team-1");
    let session = provisioner.create_session(&IdentityKey::new("team-viewer")).await?;
    let read = rig.probe(ProbeAction::ReadReports, &team, Some(&session)).await?;
    assert_eq!(read, 200, "viewer can read reports");
    let delete = rig.probe(ProbeAction::DeleteTeam, &team, Some(&session)).await?;
    assert_eq!(delete, 403, "viewer cannot delete the team");

    rig.finish().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn cross_team_denial_is_indistinguishable_from_low_level()
-> Result<(), Box<dyn std::error::Error>> {
    let rig = ProbeRig::spawn().await?;
    let provisioner = rig.provisioner();
    provisioner.setup().await?;

    let team_one = TeamKey::new("team-1");
    let outsider = provisioner.create_session(&IdentityKey::new("outsider")).await?;
    let other_team = provisioner.create_session(&IdentityKey::new("team2-user")).await?;

    for action in ProbeAction::ALL {
        let no_grants = rig.probe(action, &team_one, Some(&outsider)).await?;
        let wrong_team = rig.probe(action, &team_one, Some(&other_team)).await?;
        assert_eq!(no_grants, 403, "outsider {} should be 403", action.as_str());
        // The denial reveals nothing about which boundary was crossed.
        assert_eq!(wrong_team, no_grants, "cross-team {} leaks info", action.as_str());
    }

    rig.finish().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn admin_is_allowed_on_every_team() -> Result<(), Box<dyn std::error::Error>> {
    let rig = ProbeRig::spawn().await?;
    let provisioner = rig.provisioner();
    provisioner.setup().await?;

    let session = provisioner.create_session(&IdentityKey::new("global-admin")).await?;
    let team_keys: Vec<_> =
        provisioner.catalog().teams().map(|record| record.key.clone()).collect();
    for team in &team_keys {
        for action in ProbeAction::ALL {
            let observed = rig.probe(action, team, Some(&session)).await?;
            assert_eq!(
                observed,
                200,
                "admin {} on {team} should be 200",
                action.as_str()
            );
        }
    }

    rig.finish().await?;
    Ok(())
}
