//! Flat text record written after a successful session

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use tokio::{
    fs::{self, OpenOptions},
    io::AsyncWriteExt,
};
use tracing::info;

use crate::core::{
    error::{ReportError, ReportResult},
    session::TrialSession,
};

const RULE_WIDTH: usize = 60;

/// Result record for a matched candidate
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub network: String,
    pub link_id: String,
    pub matched_candidate: String,
    pub signal_quality: u8,
    pub attempts: usize,
    pub elapsed_secs: f64,
    pub rate: Option<f64>,
    pub timestamp: DateTime<Local>,
}

impl ResultRecord {
    /// Build the record for a succeeded session
    pub fn from_session(session: &TrialSession, timestamp: DateTime<Local>) -> ReportResult<Self> {
        let matched = session.result().ok_or(ReportError::NoMatch)?;
        let network = &session.target().network;

        Ok(Self {
            network: network.display_name().to_string(),
            link_id: network.link_id.clone(),
            matched_candidate: matched.to_string(),
            signal_quality: network.signal_quality,
            attempts: session.attempts(),
            elapsed_secs: session.elapsed().as_secs_f64(),
            rate: session.rate(),
            timestamp,
        })
    }

    /// Render the record as text
    pub fn render(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let rate = self
            .rate
            .map(|r| format!("{:.1} candidates/sec", r))
            .unwrap_or_else(|| "n/a".to_string());

        let mut out = String::new();
        out.push_str(&format!("{}\nFWIFI - SUCCESSFUL TRIAL\n{}\n\n", rule, rule));
        out.push_str(&format!("Network:           {}\n", self.network));
        out.push_str(&format!("Link identifier:   {}\n", self.link_id));
        out.push_str(&format!("Matched candidate: {}\n", self.matched_candidate));
        out.push_str(&format!("Signal:            {}%\n", self.signal_quality));
        out.push_str(&format!("Attempts:          {}\n", self.attempts));
        out.push_str(&format!("Elapsed time:      {:.1}s\n", self.elapsed_secs));
        out.push_str(&format!("Rate:              {}\n", rate));
        out.push_str(&format!(
            "Timestamp:         {}\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        ));
        out
    }

    /// `<sanitized network>_<YYYYmmdd_HHMMSS>.txt`
    pub fn file_name(&self) -> String {
        self.numbered_file_name(0)
    }

    /// File name with `_<n>` appended to the stem for `n > 0`
    fn numbered_file_name(&self, n: usize) -> String {
        let stem = format!(
            "{}_{}",
            sanitize(&self.network),
            self.timestamp.format("%Y%m%d_%H%M%S")
        );
        match n {
            0 => format!("{}.txt", stem),
            n => format!("{}_{}.txt", stem, n),
        }
    }

    /// Write the record into `dir`, creating it when missing
    ///
    /// Existing records are never overwritten: a taken name gets a numeric
    /// suffix.
    pub async fn write_to(&self, dir: impl AsRef<Path>) -> ReportResult<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await?;

        let mut n = 0;
        let (path, mut file) = loop {
            let path = dir.join(self.numbered_file_name(n));
            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e.into()),
            }
        };

        file.write_all(self.render().as_bytes()).await?;
        file.flush().await?;

        info!("Result saved to {}", path.display());
        Ok(path)
    }
}

/// Replace everything outside `[A-Za-z0-9._-]` with `_`
pub fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "network".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn record() -> ResultRecord {
        ResultRecord {
            network: "Home WiFi".into(),
            link_id: "aa:bb:cc:dd:ee:ff".into(),
            matched_candidate: "password".into(),
            signal_quality: 72,
            attempts: 3,
            elapsed_secs: 12.34,
            rate: Some(0.243),
            timestamp: Local.with_ymd_and_hms(2026, 10, 19, 8, 5, 9).unwrap(),
        }
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Home WiFi"), "Home_WiFi");
        assert_eq!(sanitize("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize("café-5G"), "caf_-5G");
        assert_eq!(sanitize(""), "network");
        assert_eq!(sanitize(".."), "network");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(record().file_name(), "Home_WiFi_20261019_080509.txt");
    }

    #[test]
    fn test_render_fields() {
        let text = record().render();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=".repeat(60));
        assert_eq!(lines[1], "FWIFI - SUCCESSFUL TRIAL");
        assert_eq!(lines[4], "Network:           Home WiFi");
        assert_eq!(lines[5], "Link identifier:   aa:bb:cc:dd:ee:ff");
        assert_eq!(lines[6], "Matched candidate: password");
        assert_eq!(lines[7], "Signal:            72%");
        assert_eq!(lines[8], "Attempts:          3");
        assert_eq!(lines[9], "Elapsed time:      12.3s");
        assert_eq!(lines[10], "Rate:              0.2 candidates/sec");
        assert_eq!(lines[11], "Timestamp:         2026-10-19 08:05:09");
    }

    #[test]
    fn test_render_without_rate() {
        let mut record = record();
        record.rate = None;
        assert!(record.render().contains("Rate:              n/a\n"));
    }

    #[tokio::test]
    async fn test_write_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("results");

        let path = record().write_to(&results).await.unwrap();

        assert_eq!(path, results.join("Home_WiFi_20261019_080509.txt"));
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, record().render());
    }

    #[tokio::test]
    async fn test_write_keeps_existing_records() {
        let dir = tempfile::tempdir().unwrap();
        let first = record();
        let mut second = record();
        second.matched_candidate = "letmein123".into();

        let first_path = first.write_to(dir.path()).await.unwrap();
        let second_path = second.write_to(dir.path()).await.unwrap();
        let third_path = second.write_to(dir.path()).await.unwrap();

        assert_eq!(first_path, dir.path().join("Home_WiFi_20261019_080509.txt"));
        assert_eq!(second_path, dir.path().join("Home_WiFi_20261019_080509_1.txt"));
        assert_eq!(third_path, dir.path().join("Home_WiFi_20261019_080509_2.txt"));
        assert_eq!(std::fs::read_to_string(&first_path).unwrap(), first.render());
        assert_eq!(std::fs::read_to_string(&second_path).unwrap(), second.render());
    }
}
