//! Candidate list loading

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::core::error::{ConfigError, ConfigResult};

/// Ordered, finite list of candidate passwords
///
/// File lines are trimmed and blank lines dropped. The list is restartable:
/// [`CandidateList::reload`] reads the backing file again from the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    source: Option<PathBuf>,
    candidates: Vec<String>,
}

impl CandidateList {
    /// Load candidates from a wordlist file
    pub async fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();

        let bytes = fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::WordlistNotFound(path.clone()),
            _ => ConfigError::WordlistIo {
                path: path.clone(),
                source: e,
            },
        })?;

        // Undecodable bytes are replaced rather than rejected
        let text = String::from_utf8_lossy(&bytes);
        let candidates = Self::parse(&text);

        if candidates.is_empty() {
            return Err(ConfigError::WordlistEmpty(path));
        }

        debug!(
            "Loaded {} candidates from {}",
            candidates.len(),
            path.display()
        );

        Ok(Self {
            source: Some(path),
            candidates,
        })
    }

    /// Build a list from in-memory candidates
    ///
    /// Candidates are kept verbatim, only empty strings are dropped.
    pub fn from_vec<S: Into<String>>(candidates: Vec<S>) -> Self {
        Self {
            source: None,
            candidates: candidates
                .into_iter()
                .map(Into::into)
                .filter(|c: &String| !c.is_empty())
                .collect(),
        }
    }

    /// Re-read the backing file from the beginning
    pub async fn reload(&self) -> ConfigResult<Self> {
        match &self.source {
            Some(path) => Self::load(path).await,
            None => Ok(self.clone()),
        }
    }

    fn parse(text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.candidates
    }
}
