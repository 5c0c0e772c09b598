//! Trial session state

use std::time::Duration;

use tokio::time::Instant;

use crate::core::{
    credentials::CandidateList,
    error::{TrialError, TrialResult},
    progress,
    types::{SessionId, TrialOutcome, TrialState, TrialTarget},
};

/// Mutable run state, owned by the trial engine while running
///
/// `index` only grows, `result` is set only by a successful attempt and
/// no attempt happens after it is set.
#[derive(Debug, Clone)]
pub struct TrialSession {
    id: SessionId,
    target: TrialTarget,
    candidates: CandidateList,
    state: TrialState,
    index: usize,
    started_at: Option<Instant>,
    elapsed: Duration,
    result: Option<String>,
    fault: Option<String>,
}

impl TrialSession {
    pub fn new(target: TrialTarget, candidates: CandidateList) -> Self {
        Self {
            id: SessionId::new(),
            target,
            candidates,
            state: TrialState::Idle,
            index: 0,
            started_at: None,
            elapsed: Duration::ZERO,
            result: None,
            fault: None,
        }
    }

    /// Transition `Idle -> Running`
    pub(crate) fn start(&mut self) -> TrialResult<()> {
        match self.state {
            TrialState::Idle => {
                self.state = TrialState::Running;
                self.started_at = Some(Instant::now());
                Ok(())
            }
            from => Err(TrialError::InvalidStateTransition {
                from,
                to: TrialState::Running,
            }),
        }
    }

    /// Record that the attempt with the next index has completed
    pub(crate) fn record_attempt(&mut self) -> usize {
        self.index += 1;
        self.elapsed = self.elapsed_now();
        self.index
    }

    pub(crate) fn succeed(&mut self, candidate: &str) {
        self.result = Some(candidate.to_string());
        self.finish(TrialState::Succeeded);
    }

    pub(crate) fn exhaust(&mut self) {
        self.finish(TrialState::Exhausted);
    }

    pub(crate) fn cancel(&mut self) {
        self.finish(TrialState::Cancelled);
    }

    pub(crate) fn fault(&mut self, reason: String) {
        self.fault = Some(reason);
        self.finish(TrialState::Faulted);
    }

    fn finish(&mut self, state: TrialState) {
        debug_assert_eq!(self.state, TrialState::Running);
        self.elapsed = self.elapsed_now();
        self.state = state;
    }

    fn elapsed_now(&self) -> Duration {
        self.started_at
            .map(|start| start.elapsed())
            .unwrap_or(self.elapsed)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn target(&self) -> &TrialTarget {
        &self.target
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn state(&self) -> TrialState {
        self.state
    }

    /// Attempts made so far
    pub fn attempts(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.candidates.len()
    }

    /// Elapsed time, frozen once the session is terminal
    pub fn elapsed(&self) -> Duration {
        if self.state == TrialState::Running {
            self.elapsed_now()
        } else {
            self.elapsed
        }
    }

    /// Matched candidate, set only after a successful attempt
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn fault_reason(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    pub fn outcome(&self) -> Option<TrialOutcome> {
        TrialOutcome::try_from(self.state).ok()
    }

    /// Attempts per second over the whole session
    pub fn rate(&self) -> Option<f64> {
        progress::rate(self.index, self.elapsed())
    }

    /// Surface an adapter fault as an error, pass every other session through
    pub fn into_result(self) -> TrialResult<Self> {
        match self.state {
            TrialState::Faulted => Err(TrialError::AdapterFault {
                attempts: self.index,
                reason: self
                    .fault
                    .unwrap_or_else(|| "repeated link errors".to_string()),
            }),
            _ => Ok(self),
        }
    }
}
