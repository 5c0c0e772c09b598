//! Sequential credential trial engine

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::{
    backend::LinkController,
    core::{
        cancel::CancelHandle,
        credentials::CandidateList,
        error::{ConfigError, TrialResult},
        progress::ProgressEvent,
        session::TrialSession,
        types::{AttemptOutcome, TrialState, TrialTarget},
    },
    report::{TrialReport, TrialReporter},
};

/// Per-attempt timeout used when none is configured
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(4);

/// Consecutive link errors tolerated before the adapter is considered broken
pub const DEFAULT_MAX_CONSECUTIVE_ERRORS: usize = 3;

/// Extra time granted to a link controller past its own timeout
pub const DEFAULT_ATTEMPT_GRACE: Duration = Duration::from_secs(2);

/// Engine tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialConfig {
    pub per_attempt_timeout: Duration,
    pub max_consecutive_errors: usize,
    pub attempt_grace: Duration,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            per_attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            max_consecutive_errors: DEFAULT_MAX_CONSECUTIVE_ERRORS,
            attempt_grace: DEFAULT_ATTEMPT_GRACE,
        }
    }
}

impl TrialConfig {
    pub fn with_timeout(per_attempt_timeout: Duration) -> Self {
        Self {
            per_attempt_timeout,
            ..Self::default()
        }
    }
}

/// Drives candidates through a link controller one at a time
///
/// The engine owns its controller, and `run` borrows the engine mutably,
/// so nothing else can drive the interface while a session is running.
pub struct TrialEngine<L: LinkController> {
    link: L,
    config: TrialConfig,
    state: TrialState,
    cancel: CancelHandle,
}

impl<L: LinkController> TrialEngine<L> {
    pub fn new(link: L, config: TrialConfig) -> Self {
        Self {
            link,
            config,
            state: TrialState::Idle,
            cancel: CancelHandle::new(),
        }
    }

    /// Handle that cancels the running session between attempts
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// State of the most recent session
    pub fn state(&self) -> TrialState {
        self.state
    }

    /// Run a fresh session against `target`
    ///
    /// Fails with [`ConfigError::EmptyCandidateSet`] before any attempt when
    /// there is nothing to try. Otherwise returns the session in its
    /// terminal state; use [`TrialSession::into_result`] to surface an
    /// adapter fault as an error.
    pub async fn run<R: TrialReporter>(
        &mut self,
        target: TrialTarget,
        candidates: CandidateList,
        reporter: &mut R,
    ) -> TrialResult<TrialSession> {
        self.run_session(TrialSession::new(target, candidates), reporter)
            .await
    }

    /// Run a session created by the caller
    pub async fn run_session<R: TrialReporter>(
        &mut self,
        mut session: TrialSession,
        reporter: &mut R,
    ) -> TrialResult<TrialSession> {
        if session.candidates().is_empty() {
            return Err(ConfigError::EmptyCandidateSet.into());
        }

        session.start()?;
        self.state = TrialState::Running;

        info!(
            session = %session.id(),
            "Starting trial against {} ({}) with {} candidates",
            session.target().network.display_name(),
            session.target().network.link_id,
            session.total()
        );

        self.drive(&mut session, reporter).await;
        self.link.release().await;
        self.state = session.state();

        match session.state() {
            TrialState::Succeeded => info!(
                session = %session.id(),
                "Candidate matched after {} attempts", session.attempts()
            ),
            TrialState::Faulted => error!(
                session = %session.id(),
                "Adapter fault after {} attempts: {}",
                session.attempts(),
                session.fault_reason().unwrap_or_default()
            ),
            state => info!(
                session = %session.id(),
                "Trial finished as {:?} after {} attempts", state, session.attempts()
            ),
        }

        if let Some(report) = TrialReport::from_session(&session) {
            reporter.on_finish(&report);
        }
        Ok(session)
    }

    async fn drive<R: TrialReporter>(&self, session: &mut TrialSession, reporter: &mut R) {
        let cancel = self.cancel.clone();
        let candidates = session.candidates().clone();
        let total = candidates.len();
        let mut consecutive_errors = 0usize;

        for candidate in candidates.iter() {
            if cancel.is_cancelled() {
                session.cancel();
                break;
            }

            let outcome = self.attempt(session.target(), candidate).await;
            self.link.disconnect().await;

            let index = session.record_attempt();
            debug!(session = %session.id(), "Attempt {}/{}: {:?}", index, total, outcome.kind());
            reporter.on_progress(
                &ProgressEvent::new(session.id(), index, total, session.elapsed(), outcome.kind())
                    .with_candidate(candidate),
            );

            match outcome {
                AttemptOutcome::Success => {
                    session.succeed(candidate);
                    break;
                }
                AttemptOutcome::Failure | AttemptOutcome::TimedOut => {
                    consecutive_errors = 0;
                }
                AttemptOutcome::Error(reason) => {
                    consecutive_errors += 1;
                    warn!(
                        session = %session.id(),
                        "Link error on attempt {} ({} in a row): {}",
                        index, consecutive_errors, reason
                    );
                    if consecutive_errors >= self.config.max_consecutive_errors {
                        session.fault(reason);
                        break;
                    }
                }
            }
        }

        // Every candidate was tried, even if a cancel request came in late
        if session.state() == TrialState::Running {
            session.exhaust();
        }
        cancel.reset();
    }

    /// One attempt, bounded even if the controller ignores its timeout
    async fn attempt(&self, target: &TrialTarget, candidate: &str) -> AttemptOutcome {
        let timeout = self.config.per_attempt_timeout;
        let guard = timeout + self.config.attempt_grace;

        match tokio::time::timeout(guard, self.link.attempt(target, candidate, timeout)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!("Link controller overran its {:?} timeout", timeout);
                AttemptOutcome::TimedOut
            }
        }
    }
}
