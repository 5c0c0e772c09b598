//! Human readable progress line and summary

use std::io::Write;

use tracing::warn;

use crate::{
    core::{progress::ProgressEvent, types::TrialOutcome},
    report::{TrialReport, TrialReporter},
};

const CANDIDATE_WIDTH: usize = 35;

/// Renders a single, continuously rewritten progress line
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn progress_line(event: &ProgressEvent) -> String {
        let rate = event
            .rate
            .map(|r| format!("{:6.1}", r))
            .unwrap_or_else(|| format!("{:>6}", "--"));
        let eta = event
            .eta
            .map(|d| format!("{:4.0}s", d.as_secs_f64()))
            .unwrap_or_else(|| format!("{:>5}", "--"));
        let candidate: String = event
            .candidate
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(CANDIDATE_WIDTH)
            .collect();

        format!(
            "[{:05}/{:05}] {:5.1}% | {} cand/s | ETA: {} | {:<width$}",
            event.index,
            event.total,
            event.percent(),
            rate,
            eta,
            candidate,
            width = CANDIDATE_WIDTH
        )
    }

    fn summary(report: &TrialReport) -> Vec<String> {
        let mut lines = Vec::new();
        match report.outcome {
            TrialOutcome::Succeeded => {
                lines.push("PASSWORD FOUND".to_string());
                lines.push(format!("Network:  {}", report.network));
                lines.push(format!(
                    "Password: {}",
                    report.matched_candidate.as_deref().unwrap_or_default()
                ));
            }
            TrialOutcome::Exhausted => {
                lines.push("NO MATCH".to_string());
                lines.push(format!("Network:  {}", report.network));
                lines.push("No valid password found in wordlist".to_string());
            }
            TrialOutcome::Cancelled => {
                lines.push("INTERRUPTED".to_string());
                lines.push(format!("Network:  {}", report.network));
            }
            TrialOutcome::Faulted => {
                lines.push("ADAPTER FAULT".to_string());
                lines.push(format!("Network:  {}", report.network));
                lines.push(format!(
                    "Reason:   {}",
                    report.fault.as_deref().unwrap_or_default()
                ));
            }
        }
        lines.push(format!(
            "Attempts: {}/{}",
            report.attempts_made, report.total
        ));
        lines.push(format!("Time:     {:.1}s", report.elapsed.as_secs_f64()));
        lines
    }
}

impl<W: Write> TrialReporter for ConsoleReporter<W> {
    fn on_progress(&mut self, event: &ProgressEvent) {
        let line = Self::progress_line(event);
        if let Err(e) = write!(self.out, "\r{}", line).and_then(|_| self.out.flush()) {
            warn!("Failed to write progress: {}", e);
        }
    }

    fn on_finish(&mut self, report: &TrialReport) {
        let mut text = String::from("\n\n");
        for line in Self::summary(report) {
            text.push_str(&line);
            text.push('\n');
        }
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            warn!("Failed to write summary: {}", e);
        }
    }
}
