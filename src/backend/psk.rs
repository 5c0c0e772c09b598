//! WPA passphrase to PSK derivation

use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;

const PSK_ROUNDS: u32 = 4096;

/// Derive the 256-bit PSK for a passphrase and SSID
///
/// PSK = PBKDF2(HMAC-SHA1, passphrase, ssid, 4096, 256)
pub fn derive_psk(passphrase: &str, ssid: &str) -> [u8; 32] {
    let mut psk = [0u8; 32];
    pbkdf2_hmac::<Sha1>(passphrase.as_bytes(), ssid.as_bytes(), PSK_ROUNDS, &mut psk);
    psk
}

/// Hex form accepted by `SET_NETWORK <id> psk`
pub fn derive_psk_hex(passphrase: &str, ssid: &str) -> String {
    hex::encode(derive_psk(passphrase, ssid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ieee_802_11i_vector() {
        assert_eq!(
            derive_psk_hex("password", "IEEE"),
            "f42c6fc52df0ebef9ebb4b90b38a5f902e83fe1b135a70e23aed762e9710a12e"
        );
    }

    #[test]
    fn test_ssid_acts_as_salt() {
        assert_ne!(
            derive_psk("password", "IEEE"),
            derive_psk("password", "ThisIsASSID")
        );
    }
}
