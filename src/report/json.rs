//! JSON-lines event output

use std::io::Write;

use tracing::warn;

use crate::{
    core::{error::ReportResult, progress::ProgressEvent},
    protocol::TrialEvent,
    report::{TrialReport, TrialReporter},
};

/// Writes every event as one JSON object per line
pub struct JsonLinesReporter<W: Write> {
    out: W,
}

impl JsonLinesReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> JsonLinesReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: TrialEvent) -> ReportResult<()> {
        let line = event.to_json_line()?;
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> TrialReporter for JsonLinesReporter<W> {
    fn on_progress(&mut self, event: &ProgressEvent) {
        if let Err(e) = self.emit(TrialEvent::Progress(event.clone())) {
            warn!("Failed to emit progress event: {}", e);
        }
    }

    fn on_finish(&mut self, report: &TrialReport) {
        if let Err(e) = self.emit(TrialEvent::Finished(report.clone())) {
            warn!("Failed to emit finished event: {}", e);
        }
    }
}
