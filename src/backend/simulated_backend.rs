//! Simulated link controller for tests and dry runs

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    backend::LinkController,
    core::{
        error::{LinkError, LinkResult},
        types::{AttemptOutcome, NetworkDescriptor, SecurityMethod, TrialTarget},
    },
};

/// Internal state for the simulated link
#[derive(Debug, Clone, Default)]
struct SimState {
    networks: Vec<NetworkDescriptor>,
    secret: Option<String>,
    latency: Duration,
    should_fail_scan: bool,
    hang: bool,
    scripted: HashMap<usize, AttemptOutcome>,
    attempts: Vec<String>,
    disconnects: usize,
    releases: usize,
    associated: bool,
    stale_attempts: usize,
}

/// Deterministic in-memory link controller
///
/// Accepts exactly one secret. Every attempt takes `latency`, capped by the
/// attempt timeout. Outcomes can be scripted per attempt number (1-based).
/// The controller records each candidate it sees, counts teardowns and
/// remembers attempts that started while a previous link was still up.
#[derive(Debug, Clone, Default)]
pub struct SimulatedLink {
    inner: Arc<Mutex<SimState>>,
}

impl SimulatedLink {
    /// Create a simulated link with no networks and no secret
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a simulated link that accepts `secret`
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SimState {
                secret: Some(secret.into()),
                ..SimState::default()
            })),
        }
    }

    /// A small neighbourhood of access points for dry runs
    pub fn demo_networks() -> Vec<NetworkDescriptor> {
        [
            ("HomeNetwork", "02:00:00:00:00:01", -48, 6, "[WPA2-PSK-CCMP][ESS]"),
            ("CoffeeShop", "02:00:00:00:00:02", -67, 1, "[ESS]"),
            ("OldRouter", "02:00:00:00:00:03", -74, 11, "[WPA-PSK-TKIP][ESS]"),
            ("", "02:00:00:00:00:04", -81, 36, "[WPA2-PSK-CCMP][ESS]"),
        ]
        .into_iter()
        .map(|(name, link_id, dbm, channel, flags)| NetworkDescriptor {
            name: name.to_string(),
            link_id: link_id.to_string(),
            signal_quality: NetworkDescriptor::quality_from_dbm(dbm),
            channel,
            security: SecurityMethod::from_flags(flags),
        })
        .collect()
    }

    /// Configure the networks returned by `scan`
    pub async fn set_networks(&self, networks: Vec<NetworkDescriptor>) {
        self.inner.lock().await.networks = networks;
    }

    /// Time each attempt takes before the link settles
    pub async fn set_latency(&self, latency: Duration) {
        self.inner.lock().await.latency = latency;
    }

    pub async fn set_scan_failure(&self, should_fail: bool) {
        self.inner.lock().await.should_fail_scan = should_fail;
    }

    /// Make attempts ignore their own timeout and never return
    pub async fn set_hang(&self, hang: bool) {
        self.inner.lock().await.hang = hang;
    }

    /// Force the outcome of the attempt with the given 1-based number
    pub async fn script_outcome(&self, attempt: usize, outcome: AttemptOutcome) {
        self.inner.lock().await.scripted.insert(attempt, outcome);
    }

    /// Candidates seen so far, in order
    pub async fn attempts(&self) -> Vec<String> {
        self.inner.lock().await.attempts.clone()
    }

    pub async fn disconnects(&self) -> usize {
        self.inner.lock().await.disconnects
    }

    /// Number of completed sessions that handed the link back
    pub async fn releases(&self) -> usize {
        self.inner.lock().await.releases
    }

    pub async fn is_associated(&self) -> bool {
        self.inner.lock().await.associated
    }

    /// Attempts that began while a previous association was still up
    pub async fn stale_attempts(&self) -> usize {
        self.inner.lock().await.stale_attempts
    }
}

impl LinkController for SimulatedLink {
    async fn scan(&self) -> LinkResult<Vec<NetworkDescriptor>> {
        let state = self.inner.lock().await;
        if state.should_fail_scan {
            Err(LinkError::ScanFailed("Simulated scan failure".into()))
        } else {
            Ok(state.networks.clone())
        }
    }

    async fn attempt(
        &self,
        target: &TrialTarget,
        candidate: &str,
        timeout: Duration,
    ) -> AttemptOutcome {
        let (number, latency, hang, scripted, secret) = {
            let mut state = self.inner.lock().await;
            if state.associated {
                state.stale_attempts += 1;
            }
            state.attempts.push(candidate.to_string());
            state.associated = true;
            let number = state.attempts.len();
            (
                number,
                state.latency,
                state.hang,
                state.scripted.get(&number).cloned(),
                state.secret.clone(),
            )
        };

        debug!(
            "Simulated attempt {} against {}",
            number,
            target.network.display_name()
        );

        if hang {
            std::future::pending::<()>().await;
        }

        if latency >= timeout {
            tokio::time::sleep(timeout).await;
            return AttemptOutcome::TimedOut;
        }
        tokio::time::sleep(latency).await;

        if let Some(outcome) = scripted {
            return outcome;
        }

        if !target.profile.requires_key() {
            return AttemptOutcome::Success;
        }

        match secret {
            Some(secret) if secret == candidate && !target.profile.rejects(candidate) => {
                AttemptOutcome::Success
            }
            _ => AttemptOutcome::Failure,
        }
    }

    async fn disconnect(&self) {
        let mut state = self.inner.lock().await;
        state.disconnects += 1;
        state.associated = false;
    }

    async fn release(&self) {
        self.inner.lock().await.releases += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn network(name: &str, flags: &str) -> NetworkDescriptor {
        NetworkDescriptor {
            name: name.into(),
            link_id: "aa:bb:cc:dd:ee:ff".into(),
            signal_quality: 70,
            channel: 6,
            security: SecurityMethod::from_flags(flags),
        }
    }

    fn target(flags: &str) -> TrialTarget {
        TrialTarget::select(network("TestNetwork", flags), None).unwrap()
    }

    #[test]
    fn test_demo_networks() {
        let networks = SimulatedLink::demo_networks();
        assert_eq!(networks.len(), 4);
        assert_eq!(networks[0].signal_quality, 100);
        assert!(networks[1].security.contains(&SecurityMethod::Open));
        assert!(networks[3].is_hidden());
    }

    #[tokio::test]
    async fn test_simulated_scan() {
        let link = SimulatedLink::new();
        assert_eq!(link.scan().await.unwrap().len(), 0);

        link.set_networks(vec![network("TestNetwork", "[WPA2-PSK-CCMP]")])
            .await;

        let results = link.scan().await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "TestNetwork");
    }

    #[tokio::test]
    async fn test_simulated_scan_failure() {
        let link = SimulatedLink::new();
        link.set_scan_failure(true).await;
        assert!(link.scan().await.is_err());
    }

    #[tokio::test]
    async fn test_simulated_attempt_matches_secret() {
        let link = SimulatedLink::with_secret("password");
        let target = target("[WPA2-PSK-CCMP]");
        let timeout = Duration::from_secs(1);

        assert_eq!(
            link.attempt(&target, "letmein1", timeout).await,
            AttemptOutcome::Failure
        );
        link.disconnect().await;
        assert_eq!(
            link.attempt(&target, "password", timeout).await,
            AttemptOutcome::Success
        );
        assert!(link.is_associated().await);

        link.disconnect().await;
        assert!(!link.is_associated().await);
        assert_eq!(link.attempts().await, vec!["letmein1", "password"]);
        assert_eq!(link.disconnects().await, 2);
        assert_eq!(link.stale_attempts().await, 0);
    }

    #[tokio::test]
    async fn test_simulated_short_secret_never_matches_psk_network() {
        let link = SimulatedLink::with_secret("1234");
        let outcome = link
            .attempt(&target("[WPA2-PSK-CCMP]"), "1234", Duration::from_secs(1))
            .await;
        assert_eq!(outcome, AttemptOutcome::Failure);
    }

    #[tokio::test]
    async fn test_simulated_open_network_accepts_anything() {
        let link = SimulatedLink::new();
        let outcome = link
            .attempt(&target("[ESS]"), "x", Duration::from_secs(1))
            .await;
        assert_eq!(outcome, AttemptOutcome::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_attempt_times_out() {
        let link = SimulatedLink::with_secret("password");
        link.set_latency(Duration::from_secs(10)).await;

        let outcome = link
            .attempt(&target("[WPA2-PSK-CCMP]"), "password", Duration::from_secs(4))
            .await;
        assert_eq!(outcome, AttemptOutcome::TimedOut);
    }

    #[tokio::test]
    async fn test_simulated_scripted_outcome_and_stale_link() {
        let link = SimulatedLink::with_secret("password");
        link.script_outcome(2, AttemptOutcome::Error("driver fault".into()))
            .await;
        let target = target("[WPA2-PSK-CCMP]");
        let timeout = Duration::from_secs(1);

        assert_eq!(
            link.attempt(&target, "first123", timeout).await,
            AttemptOutcome::Failure
        );
        // No teardown in between
        assert_eq!(
            link.attempt(&target, "password", timeout).await,
            AttemptOutcome::Error("driver fault".into())
        );
        assert_eq!(link.stale_attempts().await, 1);
    }
}
