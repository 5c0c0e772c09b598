//! Built-in candidate lists and wordlist helpers

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use tokio::fs;
use tracing::info;

use crate::core::{
    credentials::CandidateList,
    error::{ConfigError, ConfigResult},
};

/// Default wordlist location relative to the working directory
pub const DEFAULT_WORDLIST: &str = "wordlists/default.txt";

const DATE_LIMIT: usize = 1000;

const COMMON: &[&str] = &[
    "password", "123456", "12345678", "1234", "qwerty", "admin", "welcome", "12345",
    "password123", "admin123", "letmein", "monkey", "dragon", "baseball", "football", "hello",
    "secret", "asdf", "jordan", "superman", "batman", "trustno1", "master", "sunshine",
    "iloveyou",
];

const SHORT_COMMON: &[&str] = &[
    "password", "123456", "admin", "welcome", "qwerty", "letmein", "monkey", "sunshine",
    "password1", "admin123",
];

const WIFI_WORDS: &[&str] = &[
    "wifipassword", "wireless", "internet", "mywifi", "homewifi", "linksys", "netgear", "dlink",
    "cisco", "belkin",
];

const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

const PATTERNS: &[&str] = &[
    "abc123", "qwerty123", "asdfgh", "zxcvbn", "qazwsx", "123abc", "123qwe", "1q2w3e",
    "1qaz2wsx", "q1w2e3r4",
];

const PHONE: &[&str] = &[
    "0000", "1111", "1234", "4321", "9999", "1212", "1313", "1414", "1515", "123123",
];

const NAMES: &[&str] = &[
    "john", "michael", "david", "robert", "james", "mary", "jennifer", "linda", "patricia",
    "elizabeth",
];

/// Candidate generators that can be combined into a wordlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// The built-in default list
    Default,
    /// Sequential numbers 1-1000
    Numbers,
    /// Frequently used passwords
    Common,
    /// DDMMYYYY and MMDDYYYY dates from 2000 to 2024
    Dates,
    /// Phone keypad patterns
    Phone,
}

impl Preset {
    pub fn candidates(&self) -> Vec<String> {
        match self {
            Preset::Default => default_candidates(),
            Preset::Numbers => (1..=1000).map(|n| n.to_string()).collect(),
            Preset::Common => to_owned(SHORT_COMMON),
            Preset::Dates => dates(),
            Preset::Phone => to_owned(PHONE),
        }
    }
}

fn to_owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn default_candidates() -> Vec<String> {
    let mut out: Vec<String> = (1..=20).map(|n| n.to_string()).collect();
    out.extend(to_owned(COMMON));
    out.extend(to_owned(WIFI_WORDS));
    out.extend((2015..=2024).rev().map(|y| y.to_string()));
    out.extend(to_owned(MONTHS));
    out.extend(to_owned(PATTERNS));
    out.extend((0..=9).map(|d| d.to_string().repeat(4)));
    out.extend(to_owned(NAMES));
    out
}

fn dates() -> Vec<String> {
    let mut out = Vec::with_capacity(DATE_LIMIT);
    'outer: for year in 2000..2025 {
        for month in 1..=12 {
            for day in 1..=31 {
                out.push(format!("{:02}{:02}{}", day, month, year));
                out.push(format!("{:02}{:02}{}", month, day, year));
                if out.len() >= DATE_LIMIT {
                    break 'outer;
                }
            }
        }
    }
    out
}

/// Combine presets and user supplied words, keeping the first occurrence
/// of every candidate
///
/// Words are trimmed and blank ones skipped, as they end up as lines in a
/// wordlist file.
pub fn generate(presets: &[Preset], words: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    presets
        .iter()
        .flat_map(|p| p.candidates())
        .chain(
            words
                .iter()
                .flat_map(|w| w.lines())
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_string),
        )
        .filter(|c| seen.insert(c.clone()))
        .collect()
}

/// Write candidates one per line
pub async fn write(path: impl AsRef<Path>, candidates: &[String]) -> ConfigResult<()> {
    let path = path.as_ref();
    let io_err = |source| ConfigError::WordlistIo {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let mut body = candidates.join("\n");
    body.push('\n');
    fs::write(path, body).await.map_err(io_err)?;

    info!("Wrote {} candidates to {}", candidates.len(), path.display());
    Ok(())
}

/// Return the wordlist at `path`, creating the default list there if missing
pub async fn ensure_default(path: impl AsRef<Path>) -> ConfigResult<PathBuf> {
    let path = path.as_ref().to_path_buf();
    if fs::try_exists(&path).await.unwrap_or(false) {
        return Ok(path);
    }

    info!("Creating default wordlist at {}", path.display());
    write(&path, &generate(&[Preset::Default], &[])).await?;
    Ok(path)
}

/// Summary of a wordlist file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub total: usize,
    pub size_bytes: u64,
    pub head: Vec<String>,
}

/// Count a wordlist and return its first `limit` candidates
pub async fn preview(path: impl AsRef<Path>, limit: usize) -> ConfigResult<Preview> {
    let list = CandidateList::load(&path).await?;
    let size_bytes = fs::metadata(path.as_ref())
        .await
        .map(|m| m.len())
        .unwrap_or(0);

    Ok(Preview {
        total: list.len(),
        size_bytes,
        head: list.iter().take(limit).map(str::to_string).collect(),
    })
}

/// A wordlist file found in a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordlistEntry {
    pub name: String,
    pub size_bytes: u64,
}

/// List the `.txt` wordlists in `dir`, sorted by name
///
/// A missing directory holds no wordlists.
pub async fn list(dir: impl AsRef<Path>) -> ConfigResult<Vec<WordlistEntry>> {
    let dir = dir.as_ref();
    let io_err = |source| ConfigError::WordlistIo {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_err(e)),
    };

    let mut found = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "txt") {
            continue;
        }
        let metadata = entry.metadata().await.map_err(io_err)?;
        if !metadata.is_file() {
            continue;
        }
        found.push(WordlistEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            size_bytes: metadata.len(),
        });
    }

    found.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_list_shape() {
        let list = Preset::Default.candidates();
        assert_eq!(&list[..3], &["1", "2", "3"]);
        assert_eq!(list[20], "password");
        assert!(list.contains(&"netgear".to_string()));
        assert!(list.contains(&"7777".to_string()));
        assert_eq!(list.last().map(String::as_str), Some("elizabeth"));
    }

    #[test]
    fn test_numbers_preset() {
        let list = Preset::Numbers.candidates();
        assert_eq!(list.len(), 1000);
        assert_eq!(list[0], "1");
        assert_eq!(list[999], "1000");
    }

    #[test]
    fn test_dates_preset_is_capped() {
        let list = Preset::Dates.candidates();
        assert_eq!(list.len(), DATE_LIMIT);
        assert_eq!(list[0], "01012000");
        assert_eq!(list[3], "01022000");
    }

    #[test]
    fn test_generate_deduplicates_preserving_order() {
        let list = generate(&[Preset::Common, Preset::Phone, Preset::Common], &[]);
        assert_eq!(list.len(), SHORT_COMMON.len() + PHONE.len());
        assert_eq!(list[0], "password");
        assert_eq!(list[SHORT_COMMON.len()], "0000");
    }

    #[test]
    fn test_generate_appends_custom_words() {
        let words = vec![
            " mysecret ".to_string(),
            "".to_string(),
            "1234".to_string(),
            "alpha\nbravo".to_string(),
        ];
        let list = generate(&[Preset::Phone], &words);

        assert_eq!(list.len(), PHONE.len() + 3);
        assert_eq!(&list[PHONE.len()..], &["mysecret", "alpha", "bravo"]);
    }

    #[test]
    fn test_generate_words_only() {
        let words = vec!["one".to_string(), "two".to_string(), "one".to_string()];
        assert_eq!(generate(&[], &words), vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_list_wordlists() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("phone.txt"), &generate(&[Preset::Phone], &[]))
            .await
            .unwrap();
        std::fs::write(dir.path().join("common.txt"), "password\n").unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored\n").unwrap();
        std::fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let found = list(dir.path()).await.unwrap();
        assert_eq!(
            found,
            vec![
                WordlistEntry {
                    name: "common.txt".into(),
                    size_bytes: 9,
                },
                WordlistEntry {
                    name: "phone.txt".into(),
                    size_bytes: std::fs::metadata(dir.path().join("phone.txt")).unwrap().len(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_list_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let found = list(dir.path().join("absent")).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_ensure_default_creates_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wordlists").join("default.txt");

        ensure_default(&path).await.unwrap();
        let list = CandidateList::load(&path).await.unwrap();
        assert_eq!(list.len(), Preset::Default.candidates().len());

        std::fs::write(&path, "custom\n").unwrap();
        ensure_default(&path).await.unwrap();
        let list = CandidateList::load(&path).await.unwrap();
        assert_eq!(list.as_slice(), &["custom"]);
    }

    #[tokio::test]
    async fn test_preview() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.txt");
        write(&path, &generate(&[Preset::Phone], &[])).await.unwrap();

        let preview = preview(&path, 3).await.unwrap();
        assert_eq!(preview.total, PHONE.len());
        assert_eq!(preview.head, vec!["0000", "1111", "1234"]);
        assert!(preview.size_bytes > 0);
    }
}
