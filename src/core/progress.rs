//! Per-attempt progress and ETA computation

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::types::{OutcomeKind, SessionId};

/// Progress snapshot emitted after every completed attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub session: SessionId,
    /// Attempts made so far (1-based)
    pub index: usize,
    pub total: usize,
    #[serde(rename = "elapsed_secs", with = "duration_secs")]
    pub elapsed: Duration,
    /// Candidates per second, absent while no time has elapsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(
        rename = "eta_secs",
        with = "opt_secs",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub eta: Option<Duration>,
    pub outcome: OutcomeKind,
    /// Candidate tried by this attempt
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub candidate: Option<String>,
}

impl ProgressEvent {
    pub fn new(
        session: SessionId,
        index: usize,
        total: usize,
        elapsed: Duration,
        outcome: OutcomeKind,
    ) -> Self {
        let rate = rate(index, elapsed);
        let eta = rate.and_then(|r| eta(index, total, r));

        Self {
            session,
            index,
            total,
            elapsed,
            rate,
            eta,
            outcome,
            candidate: None,
        }
    }

    pub fn with_candidate(mut self, candidate: &str) -> Self {
        self.candidate = Some(candidate.to_string());
        self
    }

    /// Completed share of the candidate list in percent
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.index as f64 * 100.0 / self.total as f64
    }
}

/// Attempts per second, `None` when no measurable time has elapsed
pub fn rate(attempts: usize, elapsed: Duration) -> Option<f64> {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return None;
    }
    Some(attempts as f64 / secs)
}

/// Remaining time at the given rate
pub fn eta(index: usize, total: usize, rate: f64) -> Option<Duration> {
    if rate <= 0.0 || !rate.is_finite() {
        return None;
    }
    let remaining = total.saturating_sub(index) as f64;
    Duration::try_from_secs_f64(remaining / rate).ok()
}

pub(crate) mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

mod opt_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&d.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<f64>::deserialize(deserializer)?
            .map(|secs| Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom))
            .transpose()
    }
}
