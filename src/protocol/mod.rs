//! Event protocol definitions

pub mod events;

pub use events::TrialEvent;
