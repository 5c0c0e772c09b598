//! wifi-ctrl backend implementation

use std::time::Duration;

use tokio::{
    sync::{Mutex, broadcast},
    time::Instant,
};
use tracing::{debug, error, warn};
use wifi_ctrl::sta::{Broadcast, BroadcastReceiver, RequestClient, WifiSetup};

use crate::{
    backend::{LinkController, psk::derive_psk_hex},
    core::{
        error::{LinkError, LinkResult},
        types::{AttemptOutcome, NetworkDescriptor, SecurityMethod, SecurityProfile, TrialTarget},
    },
};

/// Link controller driving wpa_supplicant through its control socket
pub struct WifiCtrlLink {
    interface: String,
    client: RequestClient,
    broadcast_receiver: BroadcastReceiver,
    /// Network block added by the current attempt
    network_id: Mutex<Option<usize>>,
}

impl WifiCtrlLink {
    pub async fn new(interface: String) -> LinkResult<Self> {
        let path = format!("/var/run/wpa_supplicant/{}", interface);
        let mut setup =
            WifiSetup::new().map_err(|e| LinkError::WpaSupplicantError(e.to_string()))?;
        setup.set_socket_path(path);

        let client = setup.get_request_client();
        let broadcast_receiver = setup.get_broadcast_receiver();
        let station = setup.complete();

        // Spawn the station runtime
        tokio::spawn(async move {
            if let Err(e) = station.run().await {
                error!("WifiStation runtime error: {}", e);
            }
        });

        Ok(Self {
            interface,
            client,
            broadcast_receiver,
            network_id: Mutex::new(None),
        })
    }

    /// Convert frequency (MHz) to channel number
    fn frequency_to_channel(freq_str: &str) -> u16 {
        let freq = freq_str.parse::<u16>().unwrap_or(0);
        match freq {
            2412..=2472 => (freq - 2407) / 5,
            2484 => 14,
            5160..=5885 => (freq - 5000) / 5,
            _ => 0,
        }
    }

    /// Send a raw control command, treating a `FAIL` reply as an error
    async fn command(&self, cmd: String) -> LinkResult<()> {
        debug!("wpa_supplicant <- {}", cmd);
        let reply = self
            .client
            .send_custom(cmd.clone())
            .await
            .map_err(|e| LinkError::WpaSupplicantError(format!("{}: {}", cmd, e)))?;

        if reply.trim() == "FAIL" {
            return Err(LinkError::WpaSupplicantError(format!("{}: FAIL", cmd)));
        }
        Ok(())
    }

    /// Add and select a network block for one candidate
    async fn configure_network(&self, target: &TrialTarget, candidate: &str) -> LinkResult<()> {
        let network = &target.network;

        let id = self.client.add_network().await.map_err(|e| {
            LinkError::WpaSupplicantError(format!("Failed to add network: {}", e))
        })?;
        *self.network_id.lock().await = Some(id);

        // wifi-ctrl handles quoting internally via conf_escape
        self.client
            .set_network_ssid(id, network.name.clone())
            .await
            .map_err(|e| LinkError::WpaSupplicantError(format!("Failed to set SSID: {}", e)))?;

        self.command(format!("SET_NETWORK {} bssid {}", id, network.link_id))
            .await?;

        match target.profile {
            SecurityProfile::Open => {
                self.command(format!("SET_NETWORK {} key_mgmt NONE", id))
                    .await?;
            }
            SecurityProfile::WpaPsk { pairwise } | SecurityProfile::Wpa2Psk { pairwise } => {
                let proto = match target.profile {
                    SecurityProfile::WpaPsk { .. } => "WPA",
                    _ => "RSN",
                };
                self.command(format!("SET_NETWORK {} key_mgmt WPA-PSK", id))
                    .await?;
                self.command(format!("SET_NETWORK {} proto {}", id, proto))
                    .await?;
                self.command(format!("SET_NETWORK {} pairwise {}", id, pairwise.as_str()))
                    .await?;
                // Unquoted hex is taken as the raw PSK
                let psk = derive_psk_hex(candidate, &network.name);
                self.command(format!("SET_NETWORK {} psk {}", id, psk))
                    .await?;
            }
        }

        self.client.select_network(id).await.map_err(|e| {
            LinkError::WpaSupplicantError(format!("Failed to select network: {}", e))
        })?;

        Ok(())
    }
}

impl LinkController for WifiCtrlLink {
    async fn scan(&self) -> LinkResult<Vec<NetworkDescriptor>> {
        debug!("Starting WiFi scan on interface: {}", self.interface);

        let results = self
            .client
            .get_scan()
            .await
            .map_err(|e| LinkError::ScanFailed(e.to_string()))?;

        let networks: Vec<NetworkDescriptor> = results
            .iter()
            .map(|res| NetworkDescriptor {
                name: res.name.clone(),
                link_id: res.mac.clone(),
                signal_quality: NetworkDescriptor::quality_from_dbm(res.signal as i32),
                channel: Self::frequency_to_channel(&res.frequency),
                security: SecurityMethod::from_flags(&res.flags),
            })
            .collect();

        debug!("Scan complete, found {} networks", networks.len());
        Ok(networks)
    }

    async fn attempt(
        &self,
        target: &TrialTarget,
        candidate: &str,
        timeout: Duration,
    ) -> AttemptOutcome {
        if target.profile.rejects(candidate) {
            debug!("Skipping candidate of invalid passphrase length");
            return AttemptOutcome::Failure;
        }

        // Start listening to events BEFORE connecting to avoid race condition
        let mut receiver = self.broadcast_receiver.resubscribe();
        let deadline = Instant::now() + timeout;

        if let Err(e) = self.configure_network(target, candidate).await {
            return AttemptOutcome::Error(e.to_string());
        }

        loop {
            match tokio::time::timeout_at(deadline, receiver.recv()).await {
                Ok(Ok(Broadcast::Connected)) => return AttemptOutcome::Success,
                Ok(Ok(Broadcast::WrongPsk)) => return AttemptOutcome::Failure,
                Ok(Ok(Broadcast::NetworkNotFound)) => {
                    return AttemptOutcome::Error("Network not found".to_string());
                }
                Ok(Ok(event)) => {
                    // Disconnected events also precede a fresh association
                    debug!("Ignoring broadcast event: {:?}", event);
                }
                Ok(Err(broadcast::error::RecvError::Lagged(skipped))) => {
                    warn!("Broadcast receiver lagged by {} events", skipped);
                }
                Ok(Err(broadcast::error::RecvError::Closed)) => {
                    return AttemptOutcome::Error("Broadcast channel closed".to_string());
                }
                Err(_) => return AttemptOutcome::TimedOut,
            }
        }
    }

    async fn disconnect(&self) {
        debug!("Disconnecting");

        if let Err(e) = self.command("DISCONNECT".to_string()).await {
            warn!("Failed to disconnect: {}", e);
        }

        let network_id = self.network_id.lock().await.take();
        if let Some(id) = network_id {
            if let Err(e) = self.command(format!("REMOVE_NETWORK {}", id)).await {
                warn!("Failed to remove network {}: {}", id, e);
            }
        }
    }

    async fn release(&self) {
        // SELECT_NETWORK disabled every saved network block
        debug!("Re-enabling saved networks");
        if let Err(e) = self.command("ENABLE_NETWORK all".to_string()).await {
            warn!("Failed to re-enable saved networks: {}", e);
        }
    }
}
