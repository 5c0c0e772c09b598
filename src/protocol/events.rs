//! Trial events for machine consumers

use serde::{Deserialize, Serialize};

use crate::{core::progress::ProgressEvent, report::TrialReport};

/// Events emitted while a session runs, one JSON object per line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum TrialEvent {
    /// An attempt completed
    Progress(ProgressEvent),

    /// The session reached a terminal state
    Finished(TrialReport),
}

impl TrialEvent {
    /// Serialize as a single line without trailing newline
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<ProgressEvent> for TrialEvent {
    fn from(event: ProgressEvent) -> Self {
        TrialEvent::Progress(event)
    }
}

impl From<TrialReport> for TrialEvent {
    fn from(report: TrialReport) -> Self {
        TrialEvent::Finished(report)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::core::types::{OutcomeKind, SessionId, TrialOutcome};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_progress_event_line() {
        let event: TrialEvent =
            ProgressEvent::new(SessionId::new(), 1, 2, Duration::from_secs(2), OutcomeKind::Failure)
                .into();
        let line = event.to_json_line().unwrap();
        assert!(!line.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["event"], "progress");
        assert_eq!(value["data"]["index"], 1);
        assert_eq!(value["data"]["rate"], 0.5);
    }

    #[test]
    fn test_finished_event_round_trip() {
        let report = TrialReport {
            session: SessionId::new(),
            network: "Home".into(),
            link_id: "aa:bb:cc:dd:ee:ff".into(),
            outcome: TrialOutcome::Succeeded,
            matched_candidate: Some("password".into()),
            attempts_made: 3,
            total: 4,
            elapsed: Duration::from_secs(6),
            fault: None,
        };
        let event = TrialEvent::from(report);
        let line = event.to_json_line().unwrap();

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["event"], "finished");
        assert_eq!(value["data"]["outcome"], "succeeded");
        assert_eq!(value["data"]["elapsed_secs"], 6.0);
        assert!(value["data"].get("fault").is_none());

        let parsed: TrialEvent = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, event);
    }
}
