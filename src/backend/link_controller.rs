//! Link controller trait definition

use std::time::Duration;

use trait_variant::make;

use crate::core::{
    error::LinkResult,
    types::{AttemptOutcome, NetworkDescriptor, TrialTarget},
};

/// Abstraction over the wireless interface (typically wpa_supplicant)
///
/// The trial engine owns exactly one controller during a run and never
/// calls it concurrently.
#[make(Send)]
pub trait LinkController: Sync + 'static {
    /// Scan for available networks
    ///
    /// The scan operation may take several seconds.
    async fn scan(&self) -> LinkResult<Vec<NetworkDescriptor>>;

    /// Try to associate with `target` using `candidate` as the key
    ///
    /// Implementations enforce `timeout` themselves and report
    /// [`AttemptOutcome::TimedOut`] when the link has not come up in time.
    /// Any failure is classified into an outcome, never returned as an error.
    async fn attempt(
        &self,
        target: &TrialTarget,
        candidate: &str,
        timeout: Duration,
    ) -> AttemptOutcome;

    /// Tear down the current association and its network profile
    ///
    /// Best effort: failures are logged by the implementation.
    async fn disconnect(&self);

    /// Hand the interface back once a session has ended
    ///
    /// Called exactly once per session after the last teardown. Restores
    /// whatever the attempts changed outside their own network profile.
    async fn release(&self);
}
