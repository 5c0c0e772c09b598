//! Domain types for credential trials

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::error::{ConfigError, ConfigResult};

/// Security methods advertised by an access point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecurityMethod {
    Open,
    Wpa,
    Wpa2,
    WpaPsk,
    Wpa2Psk,
}

impl SecurityMethod {
    /// Parse a wpa_supplicant flag string such as `[WPA2-PSK-CCMP][ESS]`
    ///
    /// A flag string without any WPA, RSN or WEP token describes an open
    /// network. WEP is recognised but yields no method.
    pub fn from_flags(flags: &str) -> BTreeSet<SecurityMethod> {
        let mut methods = BTreeSet::new();
        let mut protected = false;

        for token in flags.split(['[', ']']).filter(|t| !t.is_empty()) {
            let upper = token.to_ascii_uppercase();
            if upper.starts_with("WPA2-") || upper.starts_with("RSN-") {
                protected = true;
                methods.insert(SecurityMethod::Wpa2);
                if upper.contains("-PSK") {
                    methods.insert(SecurityMethod::Wpa2Psk);
                }
            } else if upper.starts_with("WPA-") {
                protected = true;
                methods.insert(SecurityMethod::Wpa);
                if upper.contains("-PSK") {
                    methods.insert(SecurityMethod::WpaPsk);
                }
            } else if upper.starts_with("WEP") {
                protected = true;
            }
        }

        if !protected {
            methods.insert(SecurityMethod::Open);
        }

        methods
    }
}

impl std::fmt::Display for SecurityMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SecurityMethod::Open => "Open",
            SecurityMethod::Wpa => "WPA",
            SecurityMethod::Wpa2 => "WPA2",
            SecurityMethod::WpaPsk => "WPA-PSK",
            SecurityMethod::Wpa2Psk => "WPA2-PSK",
        };
        f.write_str(label)
    }
}

/// A discovered wireless network
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkDescriptor {
    /// Network name (SSID), empty for hidden networks
    pub name: String,
    /// MAC address of the access point (BSSID)
    pub link_id: String,
    /// Signal quality in percent (0-100)
    pub signal_quality: u8,
    /// Channel number, 0 when unknown
    pub channel: u16,
    /// Advertised security methods
    pub security: BTreeSet<SecurityMethod>,
}

impl NetworkDescriptor {
    /// Map a signal level in dBm onto a 0-100 quality scale
    pub fn quality_from_dbm(dbm: i32) -> u8 {
        ((dbm + 100) * 2).clamp(0, 100) as u8
    }

    /// Name suitable for display, `hidden` when the SSID is empty
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "hidden"
        } else {
            &self.name
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.name.is_empty()
    }

    /// Comma separated list of security methods
    pub fn security_label(&self) -> String {
        self.security
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Pairwise cipher used for a PSK network block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cipher {
    Tkip,
    Ccmp,
}

impl Cipher {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cipher::Tkip => "TKIP",
            Cipher::Ccmp => "CCMP",
        }
    }
}

/// Connection profile chosen once when a target is selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SecurityProfile {
    Open,
    WpaPsk { pairwise: Cipher },
    Wpa2Psk { pairwise: Cipher },
}

/// Valid WPA passphrase lengths in bytes
pub const PASSPHRASE_LEN: std::ops::RangeInclusive<usize> = 8..=63;

impl SecurityProfile {
    /// Pick the strongest supported profile for a set of advertised methods
    pub fn from_methods(methods: &BTreeSet<SecurityMethod>) -> Option<Self> {
        if methods.contains(&SecurityMethod::Wpa2Psk) {
            Some(SecurityProfile::Wpa2Psk {
                pairwise: Cipher::Ccmp,
            })
        } else if methods.contains(&SecurityMethod::WpaPsk) {
            Some(SecurityProfile::WpaPsk {
                pairwise: Cipher::Tkip,
            })
        } else if methods.contains(&SecurityMethod::Open) {
            Some(SecurityProfile::Open)
        } else {
            None
        }
    }

    pub fn requires_key(&self) -> bool {
        !matches!(self, SecurityProfile::Open)
    }

    /// Whether a candidate can never authenticate under this profile
    pub fn rejects(&self, candidate: &str) -> bool {
        self.requires_key() && !PASSPHRASE_LEN.contains(&candidate.len())
    }
}

/// Target network with its connection profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialTarget {
    pub network: NetworkDescriptor,
    pub profile: SecurityProfile,
}

impl TrialTarget {
    /// Select a network as the trial target
    ///
    /// Hidden networks need `name_override` since the SSID is part of the
    /// association request and the key derivation.
    pub fn select(
        mut network: NetworkDescriptor,
        name_override: Option<&str>,
    ) -> ConfigResult<Self> {
        if let Some(name) = name_override.filter(|n| !n.is_empty()) {
            network.name = name.to_string();
        }

        if network.is_hidden() {
            return Err(ConfigError::HiddenNetwork(network.link_id));
        }

        let profile = SecurityProfile::from_methods(&network.security).ok_or_else(|| {
            ConfigError::UnsupportedSecurity {
                network: network.name.clone(),
                methods: network.security_label(),
            }
        })?;

        Ok(Self { network, profile })
    }
}

/// Result of a single connect-and-verify cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    Failure,
    TimedOut,
    Error(String),
}

impl AttemptOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            AttemptOutcome::Success => OutcomeKind::Success,
            AttemptOutcome::Failure => OutcomeKind::Failure,
            AttemptOutcome::TimedOut => OutcomeKind::TimedOut,
            AttemptOutcome::Error(_) => OutcomeKind::Error,
        }
    }
}

/// Outcome tag without the error payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    Failure,
    TimedOut,
    Error,
}

/// Trial engine state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TrialState {
    Idle = 0,
    Running = 1,
    Succeeded = 2,
    Exhausted = 3,
    Cancelled = 4,
    Faulted = 5,
}

impl TrialState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TrialState::Idle | TrialState::Running)
    }
}

impl From<TrialState> for u8 {
    fn from(state: TrialState) -> Self {
        state as u8
    }
}

/// Terminal outcome of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialOutcome {
    Succeeded,
    Exhausted,
    Cancelled,
    Faulted,
}

impl TryFrom<TrialState> for TrialOutcome {
    type Error = ();

    fn try_from(state: TrialState) -> Result<Self, <Self as TryFrom<TrialState>>::Error> {
        match state {
            TrialState::Succeeded => Ok(TrialOutcome::Succeeded),
            TrialState::Exhausted => Ok(TrialOutcome::Exhausted),
            TrialState::Cancelled => Ok(TrialOutcome::Cancelled),
            TrialState::Faulted => Ok(TrialOutcome::Faulted),
            TrialState::Idle | TrialState::Running => Err(()),
        }
    }
}

/// Session identifier used to correlate log lines and events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
