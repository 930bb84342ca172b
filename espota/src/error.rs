//! Library and application errors

use std::{io, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::api::{frame::FrameError, wire::DecodeError};

/// All possible errors returned by espota
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Ota(#[from] OtaError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Frame(#[from] FrameError),

    #[error("Failed to open file: {0}")]
    FileOpenError(String, #[source] io::Error),

    #[cfg(feature = "cli")]
    #[error("Failed to parse configuration file {0}")]
    #[diagnostic(
        code(espota::config::parse),
        help("Check the syntax of the TOML file, or remove it to use the defaults")
    )]
    ConfigParse(PathBuf, #[source] toml::de::Error),

    #[error("No upload target was provided")]
    #[diagnostic(
        code(espota::no_hosts),
        help("Pass at least one `--host`, or list `hosts` in espota.toml")
    )]
    NoHosts,
}

/// Errors raised while uploading firmware over the air
///
/// Every variant renders as a diagnosis meant for the person running the
/// upload rather than as a raw status code.
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum OtaError {
    #[error("Device uses unsupported OTA version {0}")]
    #[diagnostic(
        code(espota::unsupported_version),
        help("Supported OTA protocol versions are 1 and 2, try updating espota")
    )]
    UnsupportedVersion(u8),

    #[error("ESP requests password, but no password given!")]
    #[diagnostic(
        code(espota::password_required),
        help("Provide the OTA password with `--password` or in espota.toml")
    )]
    PasswordRequired,

    #[error("Error {phase}: {kind}")]
    #[diagnostic(code(espota::device_error))]
    Device {
        phase: &'static str,
        #[source]
        kind: DeviceErrorKind,
    },

    #[error("Error {phase}: Unexpected response from ESP: {byte:#04X}")]
    #[diagnostic(code(espota::unexpected_response))]
    UnexpectedResponse { phase: &'static str, byte: u8 },

    #[error("Error sending {phase}: {source}")]
    #[diagnostic(code(espota::send))]
    Send {
        phase: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Error receiving {phase}: {source}")]
    #[diagnostic(code(espota::receive))]
    Receive {
        phase: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Error configuring socket: {0}")]
    #[diagnostic(code(espota::socket))]
    Socket(#[source] io::Error),

    #[error("Error resolving IP address of {host}. Is it connected to WiFi?")]
    #[diagnostic(
        code(espota::resolve),
        help("If this error persists, please set a static IP address on the device")
    )]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("No address could be resolved for any of the given hosts")]
    #[diagnostic(code(espota::no_addresses))]
    NoAddresses,

    #[error("Connection failed.")]
    #[diagnostic(
        code(espota::connection_failed),
        help("Ensure the device is powered, on the same network and running the OTA component")
    )]
    ConnectionFailed,

    #[error("Firmware of {0} bytes does not fit the 32-bit size field")]
    #[diagnostic(code(espota::firmware_too_large))]
    FirmwareTooLarge(usize),

    #[error("Failed to compress firmware: {0}")]
    #[diagnostic(code(espota::compression))]
    Compression(#[source] io::Error),

    #[error("Failed to read firmware image {path}")]
    #[diagnostic(code(espota::firmware_read))]
    FirmwareRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors reported by the device in an OTA status byte
#[derive(Clone, Copy, Debug, Diagnostic, Error, PartialEq, Eq, strum::FromRepr)]
#[non_exhaustive]
#[repr(u8)]
pub enum DeviceErrorKind {
    #[error("Invalid magic byte")]
    #[diagnostic(code(espota::device::magic))]
    Magic = 0x80,

    #[error(
        "Couldn't prepare flash memory for update. Is the binary too big? Please try restarting the ESP."
    )]
    #[diagnostic(code(espota::device::update_prepare))]
    UpdatePrepare = 0x81,

    #[error("Authentication invalid. Is the password correct?")]
    #[diagnostic(code(espota::device::auth_invalid))]
    AuthInvalid = 0x82,

    #[error("Writing OTA data to flash memory failed. See USB logs for more information.")]
    #[diagnostic(code(espota::device::writing_flash))]
    WritingFlash = 0x83,

    #[error("Finishing update failed. See the MQTT/USB logs for more information.")]
    #[diagnostic(code(espota::device::update_end))]
    UpdateEnd = 0x84,

    #[error(
        "Please press the reset button on the ESP. A manual reset is required on the first OTA-Update after flashing via USB."
    )]
    #[diagnostic(code(espota::device::invalid_bootstrapping))]
    InvalidBootstrapping = 0x85,

    #[error(
        "ESP has been flashed with wrong flash size. Please choose the correct 'board' option (esp01_1m always works) and then flash over USB."
    )]
    #[diagnostic(code(espota::device::wrong_current_flash_config))]
    WrongCurrentFlashConfig = 0x86,

    #[error(
        "ESP does not have the requested flash size (wrong board). Please choose the correct 'board' option (esp01_1m always works) and try uploading again."
    )]
    #[diagnostic(code(espota::device::wrong_new_flash_config))]
    WrongNewFlashConfig = 0x87,

    #[error(
        "ESP does not have enough space to store OTA file. Please try flashing a minimal firmware (remove everything except ota)"
    )]
    #[diagnostic(code(espota::device::esp8266_not_enough_space))]
    Esp8266NotEnoughSpace = 0x88,

    #[error(
        "The OTA partition on the ESP is too small. ESPHome needs to resize this partition, please flash over USB."
    )]
    #[diagnostic(code(espota::device::esp32_not_enough_space))]
    Esp32NotEnoughSpace = 0x89,

    #[error(
        "The OTA partition on the ESP couldn't be found. ESPHome needs to create this partition, please flash over USB."
    )]
    #[diagnostic(code(espota::device::no_update_partition))]
    NoUpdatePartition = 0x8A,

    #[error("Application MD5 code mismatch. Please try again or flash over USB with a good quality cable.")]
    #[diagnostic(code(espota::device::md5_mismatch))]
    Md5Mismatch = 0x8B,

    #[error("Unknown error from ESP")]
    #[diagnostic(code(espota::device::unknown))]
    Unknown = 0xFF,
}

impl DeviceErrorKind {
    /// Look up the error kind for a status byte, if it is an error code
    pub fn from_status(status: u8) -> Option<Self> {
        Self::from_repr(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_round_trip() {
        for byte in 0x80..=0x8B {
            let kind = DeviceErrorKind::from_status(byte).unwrap();
            assert_eq!(kind as u8, byte);
        }
        assert_eq!(
            DeviceErrorKind::from_status(0xFF),
            Some(DeviceErrorKind::Unknown)
        );
    }

    #[test]
    fn success_codes_are_not_errors() {
        for byte in [0x00, 0x01, 0x02, 0x40, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47] {
            assert_eq!(DeviceErrorKind::from_status(byte), None);
        }
        assert_eq!(DeviceErrorKind::from_status(0x8C), None);
    }

    #[test]
    fn device_error_names_the_phase() {
        let err = OtaError::Device {
            phase: "auth result",
            kind: DeviceErrorKind::AuthInvalid,
        };
        assert_eq!(
            err.to_string(),
            "Error auth result: Authentication invalid. Is the password correct?"
        );
    }

    #[test]
    fn unexpected_response_is_hex() {
        let err = OtaError::UnexpectedResponse {
            phase: "binary size",
            byte: 0x4a,
        };
        assert_eq!(
            err.to_string(),
            "Error binary size: Unexpected response from ESP: 0x4A"
        );
    }
}
