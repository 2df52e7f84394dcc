//! Simulated ingestion heartbeat.
//!
//! Logs a heartbeat per station on a fixed cadence so operators can see at
//! a glance that the worker process is alive, independent of whether the
//! enrichment loop currently has work. Stations rotate round-robin to keep
//! the output deterministic.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::info;

const STATIONS: [&str; 4] = ["Pulse One", "Europa Hits", "Nordic Drive", "Sunset FM"];

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);

/// Emit heartbeats until the token is cancelled.
pub async fn run(cancel: CancellationToken) {
    let mut tick: usize = 0;

    loop {
        let station = STATIONS[tick % STATIONS.len()];
        info!(station, timestamp = %Utc::now(), "simulated ingestion heartbeat");
        tick = tick.wrapping_add(1);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(HEARTBEAT_INTERVAL) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_heartbeat_stops_on_cancellation() {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(run(token));

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("heartbeat should stop promptly after cancellation")
            .unwrap();
    }
}
