//! Command-line argument parsing

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::wordlist::{DEFAULT_WORDLIST, Preset};

#[derive(Parser, Debug, Clone)]
#[clap(name = "fwifi", version, author)]
#[clap(about = "WiFi credential trial tool for authorized security testing")]
pub struct CliArgs {
    /// Wireless network interface name
    #[clap(short, long, global = true, default_value = "wlan0")]
    pub interface: String,

    /// Link controller implementation
    #[clap(long, global = true, value_enum, default_value_t = BackendKind::Wpa)]
    pub backend: BackendKind,

    /// Passphrase accepted by the simulated backend
    #[clap(long, global = true)]
    pub simulated_password: Option<String>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// wpa_supplicant control socket
    Wpa,
    /// In-memory access points, no radio involved
    Simulated,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Scan and list nearby networks
    Scan,
    /// Try every candidate of a wordlist against one network
    Attack(AttackArgs),
    /// Inspect or generate wordlists
    Wordlist {
        #[clap(subcommand)]
        command: WordlistCommand,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AttackArgs {
    /// Target access point by BSSID
    #[clap(long, conflicts_with_all = ["ssid", "index"])]
    pub bssid: Option<String>,

    /// Target network by SSID
    #[clap(long, conflicts_with = "index")]
    pub ssid: Option<String>,

    /// Target by 1-based position in the scan listing
    #[clap(long)]
    pub index: Option<usize>,

    /// Network name to use for a hidden network
    #[clap(long)]
    pub name: Option<String>,

    /// Candidate file, one per line
    #[clap(short, long, default_value = DEFAULT_WORDLIST)]
    pub wordlist: PathBuf,

    /// Per-attempt timeout in seconds
    #[clap(short, long, default_value_t = 4)]
    pub timeout: u64,

    /// Consecutive adapter errors before giving up
    #[clap(long, default_value_t = 3)]
    pub max_consecutive_errors: usize,

    /// Directory for success records
    #[clap(long, default_value = "results")]
    pub results_dir: PathBuf,

    /// Emit JSON lines instead of the progress display
    #[clap(long)]
    pub json: bool,

    /// Confirm you are authorized to test the target network
    #[clap(long)]
    pub accept_disclaimer: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum WordlistCommand {
    /// List the wordlists in a directory
    List {
        #[clap(long, default_value = "wordlists")]
        dir: PathBuf,
    },
    /// Show size and first entries of a wordlist
    Show {
        path: PathBuf,

        /// Number of entries to print
        #[clap(long, default_value_t = 20)]
        limit: usize,
    },
    /// Generate a wordlist from presets
    Create {
        /// File name, `.txt` is appended when missing
        name: String,

        #[clap(long, value_enum, num_args = 1.., required_unless_present = "word")]
        preset: Vec<Preset>,

        /// Custom candidate, may be repeated
        #[clap(long)]
        word: Vec<String>,

        #[clap(long, default_value = "wordlists")]
        dir: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_attack_defaults() {
        let args = CliArgs::parse_from(["fwifi", "attack", "--ssid", "Home"]);
        assert_eq!(args.interface, "wlan0");
        assert_eq!(args.backend, BackendKind::Wpa);

        let Command::Attack(attack) = args.command else {
            panic!("expected attack command");
        };
        assert_eq!(attack.ssid.as_deref(), Some("Home"));
        assert_eq!(attack.wordlist, PathBuf::from(DEFAULT_WORDLIST));
        assert_eq!(attack.timeout, 4);
        assert_eq!(attack.max_consecutive_errors, 3);
        assert_eq!(attack.results_dir, PathBuf::from("results"));
        assert!(!attack.json);
        assert!(!attack.accept_disclaimer);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from([
            "fwifi",
            "scan",
            "--backend",
            "simulated",
            "-i",
            "wlp2s0",
        ]);
        assert_eq!(args.backend, BackendKind::Simulated);
        assert_eq!(args.interface, "wlp2s0");
    }

    #[test]
    fn test_conflicting_targets_rejected() {
        let result =
            CliArgs::try_parse_from(["fwifi", "attack", "--bssid", "aa:bb", "--index", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_wordlist_create() {
        let args = CliArgs::parse_from([
            "fwifi", "wordlist", "create", "mine", "--preset", "numbers", "phone",
        ]);
        let Command::Wordlist {
            command:
                WordlistCommand::Create {
                    name,
                    preset,
                    word,
                    dir,
                },
        } = args.command
        else {
            panic!("expected wordlist create");
        };
        assert_eq!(name, "mine");
        assert_eq!(preset, vec![Preset::Numbers, Preset::Phone]);
        assert!(word.is_empty());
        assert_eq!(dir, PathBuf::from("wordlists"));
    }

    #[test]
    fn test_wordlist_create_custom_words() {
        let args = CliArgs::parse_from([
            "fwifi", "wordlist", "create", "mine", "--word", "hunter22", "--word", "s3cret!!",
        ]);
        let Command::Wordlist {
            command: WordlistCommand::Create { preset, word, .. },
        } = args.command
        else {
            panic!("expected wordlist create");
        };
        assert!(preset.is_empty());
        assert_eq!(word, vec!["hunter22", "s3cret!!"]);
    }

    #[test]
    fn test_wordlist_create_needs_candidates() {
        let result = CliArgs::try_parse_from(["fwifi", "wordlist", "create", "mine"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_wordlist_list_default_dir() {
        let args = CliArgs::parse_from(["fwifi", "wordlist", "list"]);
        let Command::Wordlist {
            command: WordlistCommand::List { dir },
        } = args.command
        else {
            panic!("expected wordlist list");
        };
        assert_eq!(dir, PathBuf::from("wordlists"));
    }
}
