//! Configuration module

pub mod cli;
pub mod settings;

pub use cli::{AttackArgs, BackendKind, CliArgs, Command, WordlistCommand};
pub use settings::TrialSettings;
