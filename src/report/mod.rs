//! Result reporting: live progress, terminal summary and success records

pub mod console;
pub mod json;
pub mod record;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{
    cancel::CancelHandle,
    progress::{ProgressEvent, duration_secs},
    session::TrialSession,
    types::{SessionId, TrialOutcome},
};

pub use console::ConsoleReporter;
pub use json::JsonLinesReporter;
pub use record::ResultRecord;

/// Terminal summary of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialReport {
    pub session: SessionId,
    pub network: String,
    pub link_id: String,
    pub outcome: TrialOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_candidate: Option<String>,
    pub attempts_made: usize,
    pub total: usize,
    #[serde(rename = "elapsed_secs", with = "duration_secs")]
    pub elapsed: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
}

impl TrialReport {
    /// Summarise a session, `None` while it has not terminated
    pub fn from_session(session: &TrialSession) -> Option<Self> {
        let outcome = session.outcome()?;
        let network = &session.target().network;

        Some(Self {
            session: session.id(),
            network: network.display_name().to_string(),
            link_id: network.link_id.clone(),
            outcome,
            matched_candidate: session.result().map(str::to_string),
            attempts_made: session.attempts(),
            total: session.total(),
            elapsed: session.elapsed(),
            fault: session.fault_reason().map(str::to_string),
        })
    }
}

/// Consumer of engine events
///
/// Called only between attempts: once per completed attempt and once when
/// the session terminates.
pub trait TrialReporter {
    fn on_progress(&mut self, event: &ProgressEvent);

    fn on_finish(&mut self, report: &TrialReport);
}

/// Reporter that keeps every event in memory
///
/// Optionally requests cancellation once a given attempt index is reported.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub progress: Vec<ProgressEvent>,
    pub finished: Option<TrialReport>,
    cancel_at: Option<(usize, CancelHandle)>,
}

impl RecordingReporter {
    pub fn cancel_after(index: usize, handle: CancelHandle) -> Self {
        Self {
            cancel_at: Some((index, handle)),
            ..Self::default()
        }
    }
}

impl TrialReporter for RecordingReporter {
    fn on_progress(&mut self, event: &ProgressEvent) {
        if let Some((index, handle)) = &self.cancel_at {
            if event.index >= *index {
                handle.cancel();
            }
        }
        self.progress.push(event.clone());
    }

    fn on_finish(&mut self, report: &TrialReport) {
        self.finished = Some(report.clone());
    }
}
