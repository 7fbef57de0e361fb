// system-tests/tests/helpers/readiness.rs
// ============================================================================
// Module: Readiness Helpers
// Description: Readiness probes for the stub backend.
// Purpose: Ensure servers are ready without arbitrary sleeps.
// Dependencies: reqwest, tokio
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use tokio::time::sleep;

/// Polls the health route until the backend responds or the timeout expires.
pub async fn wait_for_backend_ready(base_url: &str, timeout: Duration) -> Result<(), String> {
    let client = reqwest::Client::new();
    let url = format!("{base_url}/healthz");
    let start = Instant::now();
    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        match client.get(&url).send().await {
            Ok(response) if response.status().is_success() => return Ok(()),
            Ok(response) => {
                if start.elapsed() > timeout {
                    return Err(format!(
                        "backend readiness timeout after {attempts} attempts: status {}",
                        response.status()
                    ));
                }
                sleep(Duration::from_millis(50)).await;
            }
            Err(err) => {
                if start.elapsed() > timeout {
                    return Err(format!(
                        "backend readiness timeout after {attempts} attempts: {err}"
                    ));
                }
                sleep(Duration::from_millis(50)).await;
            }
        }
    }
}
