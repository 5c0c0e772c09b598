//! Runtime settings

use std::{path::PathBuf, time::Duration};

use crate::{
    config::cli::AttackArgs,
    core::engine::{DEFAULT_ATTEMPT_GRACE, TrialConfig},
};

/// Settings for one trial run
#[derive(Debug, Clone)]
pub struct TrialSettings {
    pub wordlist: PathBuf,
    pub results_dir: PathBuf,
    pub per_attempt_timeout: Duration,
    pub max_consecutive_errors: usize,
    pub json: bool,
}

impl TrialSettings {
    pub fn trial_config(&self) -> TrialConfig {
        TrialConfig {
            per_attempt_timeout: self.per_attempt_timeout,
            max_consecutive_errors: self.max_consecutive_errors,
            attempt_grace: DEFAULT_ATTEMPT_GRACE,
        }
    }
}

impl From<&AttackArgs> for TrialSettings {
    fn from(args: &AttackArgs) -> Self {
        TrialSettings {
            wordlist: args.wordlist.clone(),
            results_dir: args.results_dir.clone(),
            // Both values must be at least 1
            per_attempt_timeout: Duration::from_secs(args.timeout.max(1)),
            max_consecutive_errors: args.max_consecutive_errors.max(1),
            json: args.json,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::config::cli::{CliArgs, Command};
    use pretty_assertions::assert_eq;

    fn attack(argv: &[&str]) -> AttackArgs {
        let args = CliArgs::parse_from(["fwifi", "attack"].iter().chain(argv));
        match args.command {
            Command::Attack(a) => a,
            _ => panic!("expected attack command"),
        }
    }

    #[test]
    fn test_defaults_match_engine() {
        let settings = TrialSettings::from(&attack(&[]));
        assert_eq!(settings.trial_config(), TrialConfig::default());
    }

    #[test]
    fn test_overrides() {
        let settings = TrialSettings::from(&attack(&[
            "--timeout",
            "10",
            "--max-consecutive-errors",
            "5",
            "--json",
        ]));
        let config = settings.trial_config();
        assert_eq!(config.per_attempt_timeout, Duration::from_secs(10));
        assert_eq!(config.max_consecutive_errors, 5);
        assert!(settings.json);
    }

    #[test]
    fn test_zero_values_clamped() {
        let settings = TrialSettings::from(&attack(&[
            "--timeout",
            "0",
            "--max-consecutive-errors",
            "0",
        ]));
        assert_eq!(settings.per_attempt_timeout, Duration::from_secs(1));
        assert_eq!(settings.max_consecutive_errors, 1);
    }
}
