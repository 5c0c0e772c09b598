//! fwifi
//!
//! Sequential WiFi credential trials for authorized security testing. A
//! [`TrialEngine`] drives candidates from a [`CandidateList`] through a
//! [`LinkController`](backend::LinkController), one association attempt at
//! a time, and reports progress to a [`TrialReporter`](report::TrialReporter).

pub mod backend;
pub mod config;
pub mod core;
pub mod protocol;
pub mod report;
pub mod wordlist;

pub use core::{
    cancel::CancelHandle,
    credentials::CandidateList,
    engine::{TrialConfig, TrialEngine},
    error::{ConfigError, LinkError, ReportError, TrialError},
    session::TrialSession,
    types::{AttemptOutcome, NetworkDescriptor, TrialOutcome, TrialState, TrialTarget},
};
