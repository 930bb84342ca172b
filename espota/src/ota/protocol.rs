//! Byte-level constants of the OTA protocol and status checking

use std::time::Duration;

use bitflags::bitflags;

use crate::error::{DeviceErrorKind, OtaError};

/// Sent by the client to open a session
pub const MAGIC_BYTES: [u8; 5] = [0x6C, 0x26, 0xF7, 0x5C, 0x45];

pub const OTA_VERSION_1_0: u8 = 1;
pub const OTA_VERSION_2_0: u8 = 2;

pub const RESPONSE_OK: u8 = 0x00;
pub const RESPONSE_REQUEST_AUTH: u8 = 0x01;
pub const RESPONSE_REQUEST_SHA256_AUTH: u8 = 0x02;

pub const RESPONSE_HEADER_OK: u8 = 0x40;
pub const RESPONSE_AUTH_OK: u8 = 0x41;
pub const RESPONSE_UPDATE_PREPARE_OK: u8 = 0x42;
pub const RESPONSE_BIN_MD5_OK: u8 = 0x43;
pub const RESPONSE_RECEIVE_OK: u8 = 0x44;
pub const RESPONSE_UPDATE_END_OK: u8 = 0x45;
pub const RESPONSE_SUPPORTS_COMPRESSION: u8 = 0x46;
pub const RESPONSE_CHUNK_OK: u8 = 0x47;

/// Size of a single write during the transfer phase
pub const UPLOAD_BLOCK_SIZE: usize = 8192;
/// Send buffer used while transferring, keeps progress close to what the
/// device has actually received
pub const UPLOAD_BUFFER_SIZE: usize = UPLOAD_BLOCK_SIZE * 8;

/// Timeout used while probing candidate addresses
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(20);
/// Must match the idle timeout of the device, flash writes can be slow
pub const DATA_TIMEOUT: Duration = Duration::from_secs(90);
/// Time given to the device to reboot into the new image
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Default OTA port of ESP32 class devices
pub const DEFAULT_PORT: u16 = 3232;

bitflags! {
    /// Features advertised by the client after the handshake
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Features: u8 {
        const COMPRESSION = 0x01;
        const SHA256_AUTH = 0x02;
    }
}

/// Check a status byte received during `phase`
///
/// An empty `expected` accepts any byte. Otherwise known device error codes
/// fail with their diagnosis and any other byte missing from `expected` fails
/// as an unexpected response.
pub fn check_error(status: u8, expected: &[u8], phase: &'static str) -> Result<u8, OtaError> {
    if expected.is_empty() {
        return Ok(status);
    }

    if let Some(kind) = DeviceErrorKind::from_status(status) {
        return Err(OtaError::Device { phase, kind });
    }

    if !expected.contains(&status) {
        return Err(OtaError::UnexpectedResponse {
            phase,
            byte: status,
        });
    }

    Ok(status)
}
