//! Upload firmware to a device over the air
//!
//! The [OtaClient] drives a single upload over an already connected socket
//! through a fixed sequence of states:
//!
//! 1. magic handshake and version check
//! 2. feature negotiation, which decides once whether the payload is gzipped
//! 3. optional MD5 or SHA-256 challenge-response authentication
//! 4. size and checksum exchange
//! 5. chunked transfer, acknowledged per chunk from protocol version 2 on
//! 6. completion handshake
//!
//! Any unexpected status byte aborts the session with an [OtaError]. The
//! socket is closed on every exit path before the error is returned.
//!
//! [try_run_ota] raises those errors to the caller, while [run_ota] turns
//! them into a `(1, None)` result so batch callers can move on to the next
//! device.

use std::{
    io::Write,
    net::{SocketAddr, ToSocketAddrs},
    path::Path,
    thread::sleep,
    time::{Duration, Instant},
};

use flate2::{write::GzEncoder, Compression};
use log::{debug, error, info};
use md5::{Digest, Md5};

pub use self::{
    auth::AuthMethod,
    protocol::{check_error, Features},
    socket::OtaSocket,
};
use self::{auth::to_hex, protocol::*};
use crate::{error::OtaError, progress::ProgressCallbacks};

mod auth;
pub mod protocol;
mod socket;

/// States of an upload session, in the order they are visited
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum OtaState {
    MagicHandshake,
    FeatureNegotiation,
    Authentication,
    SizeExchange,
    ChecksumExchange,
    Transfer,
    Completion,
}

/// Client side of the OTA upload protocol
#[derive(Clone, Debug)]
pub struct OtaClient<'a> {
    password: Option<&'a str>,
    settle_delay: Duration,
}

impl<'a> OtaClient<'a> {
    pub fn new(password: Option<&'a str>) -> Self {
        Self {
            password: password.filter(|p| !p.is_empty()),
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Change how long to wait after the device confirmed the update
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Upload `firmware` over `socket`
    ///
    /// The socket is consumed and always closed exactly once before this
    /// returns, whether the upload succeeded or not.
    pub fn perform<S: OtaSocket>(
        &self,
        mut socket: S,
        firmware: &[u8],
        progress: &mut dyn ProgressCallbacks,
    ) -> Result<(), OtaError> {
        let result = Session {
            socket: &mut socket,
            client: self,
            version: 0,
        }
        .run(firmware, progress);

        if let Err(err) = socket.close() {
            debug!("Failed to close OTA socket: {err}");
        }

        result
    }
}

/// Upload `firmware` over `socket`, see [OtaClient::perform]
pub fn perform_ota<S: OtaSocket>(
    socket: S,
    password: Option<&str>,
    firmware: &[u8],
    progress: &mut dyn ProgressCallbacks,
) -> Result<(), OtaError> {
    OtaClient::new(password).perform(socket, firmware, progress)
}

struct Session<'s, 'c, S> {
    socket: &'s mut S,
    client: &'s OtaClient<'c>,
    version: u8,
}

impl<S: OtaSocket> Session<'_, '_, S> {
    fn run(&mut self, firmware: &[u8], progress: &mut dyn ProgressCallbacks) -> Result<(), OtaError> {
        info!("Uploading firmware ({} bytes)", firmware.len());

        self.enter(OtaState::MagicHandshake);
        self.handshake()?;

        self.enter(OtaState::FeatureNegotiation);
        let payload = self.negotiate_features(firmware)?;

        self.enter(OtaState::Authentication);
        self.authenticate()?;

        self.enter(OtaState::SizeExchange);
        let size =
            u32::try_from(payload.len()).map_err(|_| OtaError::FirmwareTooLarge(payload.len()))?;
        self.send(&size.to_be_bytes(), "binary size")?;
        self.receive_status(&[RESPONSE_UPDATE_PREPARE_OK], "binary size")?;

        self.enter(OtaState::ChecksumExchange);
        let checksum = payload_checksum(&payload);
        debug!("MD5 of upload is {checksum}");
        self.send(checksum.as_bytes(), "file checksum")?;
        self.receive_status(&[RESPONSE_BIN_MD5_OK], "file checksum")?;

        self.enter(OtaState::Transfer);
        self.transfer(&payload, progress)?;

        self.enter(OtaState::Completion);
        self.socket.set_nodelay(true).map_err(OtaError::Socket)?;
        self.receive_status(&[RESPONSE_RECEIVE_OK], "receive OK")?;
        self.receive_status(&[RESPONSE_UPDATE_END_OK], "Update end")?;
        self.send(&[RESPONSE_OK], "end acknowledgement")?;

        info!("OTA successful");

        // Do not connect logs until the device is fully up
        sleep(self.client.settle_delay);

        Ok(())
    }

    fn enter(&self, state: OtaState) {
        debug!("OTA state: {state}");
    }

    fn handshake(&mut self) -> Result<(), OtaError> {
        self.socket.set_timeout(CONNECT_TIMEOUT).map_err(OtaError::Socket)?;
        self.socket.set_nodelay(true).map_err(OtaError::Socket)?;

        self.send(&MAGIC_BYTES, "magic bytes")?;

        let mut response = [0; 2];
        self.receive(&mut response, &[RESPONSE_OK], "version")?;
        let version = response[1];
        debug!("Device supports OTA version: {version}");

        if version != OTA_VERSION_1_0 && version != OTA_VERSION_2_0 {
            return Err(OtaError::UnsupportedVersion(version));
        }
        self.version = version;

        Ok(())
    }

    fn negotiate_features(&mut self, firmware: &[u8]) -> Result<Vec<u8>, OtaError> {
        let features = Features::COMPRESSION | Features::SHA256_AUTH;
        self.send(&[features.bits()], "features")?;

        let response = self.receive_byte("features")?;
        if response != RESPONSE_SUPPORTS_COMPRESSION {
            return Ok(firmware.to_vec());
        }

        let compressed = compress_firmware(firmware)?;
        info!("Compressed to {} bytes", compressed.len());

        Ok(compressed)
    }

    fn authenticate(&mut self) -> Result<(), OtaError> {
        let status = self.receive_status(
            &[
                RESPONSE_REQUEST_AUTH,
                RESPONSE_REQUEST_SHA256_AUTH,
                RESPONSE_AUTH_OK,
            ],
            "auth",
        )?;

        let method = match AuthMethod::from_status(status) {
            Some(AuthMethod::None) | None => return Ok(()),
            Some(method) => method,
        };

        let password = self.client.password.ok_or(OtaError::PasswordRequired)?;

        let mut nonce = vec![0; method.nonce_size()];
        self.socket
            .read_exact(&mut nonce)
            .map_err(|source| OtaError::Receive {
                phase: "authentication nonce",
                source,
            })?;
        debug!(
            "Auth: {method} Nonce is {}",
            String::from_utf8_lossy(&nonce)
        );

        let cnonce = method.generate_cnonce();
        debug!("Auth: {method} CNonce is {cnonce}");
        self.send(cnonce.as_bytes(), "auth cnonce")?;

        let result = method.response(password, &nonce, &cnonce);
        debug!("Auth: {method} Result is {result}");
        self.send(result.as_bytes(), "auth result")?;

        self.receive_status(&[RESPONSE_AUTH_OK], "auth result")?;

        Ok(())
    }

    fn transfer(
        &mut self,
        payload: &[u8],
        progress: &mut dyn ProgressCallbacks,
    ) -> Result<(), OtaError> {
        // Coalesce writes during the bulk phase
        self.socket.set_nodelay(false).map_err(OtaError::Socket)?;
        self.socket
            .set_send_buffer_size(UPLOAD_BUFFER_SIZE)
            .map_err(OtaError::Socket)?;
        self.socket.set_timeout(DATA_TIMEOUT).map_err(OtaError::Socket)?;

        let start = Instant::now();
        let mut offset = 0;

        progress.init(payload.len());
        for chunk in payload.chunks(UPLOAD_BLOCK_SIZE) {
            self.send(chunk, "data")?;
            offset += chunk.len();

            if self.version >= OTA_VERSION_2_0 {
                self.receive_status(&[RESPONSE_CHUNK_OK], "chunk OK")?;
            }

            progress.update(offset);
        }
        progress.finish();

        info!(
            "Upload took {:.2} seconds, waiting for result...",
            start.elapsed().as_secs_f64()
        );

        Ok(())
    }

    fn send(&mut self, data: &[u8], phase: &'static str) -> Result<(), OtaError> {
        self.socket
            .write_all(data)
            .and_then(|_| self.socket.flush())
            .map_err(|source| OtaError::Send { phase, source })
    }

    fn receive_byte(&mut self, phase: &'static str) -> Result<u8, OtaError> {
        let mut byte = [0];
        self.socket
            .read_exact(&mut byte)
            .map_err(|source| OtaError::Receive { phase, source })?;

        Ok(byte[0])
    }

    fn receive_status(&mut self, expected: &[u8], phase: &'static str) -> Result<u8, OtaError> {
        let status = self.receive_byte(phase)?;
        check_error(status, expected, phase)
    }

    /// Fill `buf`, checking its first byte as a status byte
    fn receive(
        &mut self,
        buf: &mut [u8],
        expected: &[u8],
        phase: &'static str,
    ) -> Result<(), OtaError> {
        let Some((status, rest)) = buf.split_first_mut() else {
            return Ok(());
        };

        *status = self.receive_status(expected, phase)?;
        self.socket
            .read_exact(rest)
            .map_err(|source| OtaError::Receive { phase, source })
    }
}

/// Gzip `firmware` the way it is sent to devices supporting compression
pub fn compress_firmware(firmware: &[u8]) -> Result<Vec<u8>, OtaError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(firmware)
        .and_then(|_| encoder.finish())
        .map_err(OtaError::Compression)
}

/// Lowercase hex MD5 of the payload, as announced before the transfer
pub fn payload_checksum(payload: &[u8]) -> String {
    to_hex(&Md5::digest(payload))
}

/// Upload a firmware image to the first reachable host
///
/// Every host is resolved in order and the resulting addresses are tried one
/// after the other. The first address that accepts a connection runs the
/// protocol and its outcome is final.
pub fn try_run_ota<H: AsRef<str>>(
    hosts: &[H],
    port: u16,
    password: Option<&str>,
    firmware: &Path,
    progress: &mut dyn ProgressCallbacks,
) -> Result<SocketAddr, OtaError> {
    let data = std::fs::read(firmware).map_err(|source| OtaError::FirmwareRead {
        path: firmware.to_path_buf(),
        source,
    })?;

    let addrs = resolve_hosts(hosts, port)?;
    let Some((addr, stream)) = socket::connect_first(&addrs) else {
        return Err(OtaError::ConnectionFailed);
    };

    perform_ota(stream, password, &data, progress)?;

    Ok(addr)
}

/// Upload a firmware image, reporting failure as a result code
///
/// Returns `(0, Some(address))` on success and `(1, None)` on any failure,
/// after logging the diagnosis.
pub fn run_ota<H: AsRef<str>>(
    hosts: &[H],
    port: u16,
    password: Option<&str>,
    firmware: &Path,
    progress: &mut dyn ProgressCallbacks,
) -> (i32, Option<SocketAddr>) {
    match try_run_ota(hosts, port, password, firmware, progress) {
        Ok(addr) => (0, Some(addr)),
        Err(err) => {
            error!("{err}");
            (1, None)
        }
    }
}

/// Resolve every host, failing only when none of them resolves
pub fn resolve_hosts<H: AsRef<str>>(hosts: &[H], port: u16) -> Result<Vec<SocketAddr>, OtaError> {
    let mut addrs = Vec::new();
    let mut last_error = None;

    for host in hosts {
        let host = host.as_ref();
        match (host, port).to_socket_addrs() {
            Ok(resolved) => addrs.extend(resolved),
            Err(source) => {
                error!("Error resolving IP address of {host}: {source}");
                last_error = Some(OtaError::Resolve {
                    host: host.to_string(),
                    source,
                });
            }
        }
    }

    match (addrs.is_empty(), last_error) {
        (false, _) => Ok(addrs),
        (true, Some(err)) => Err(err),
        (true, None) => Err(OtaError::NoAddresses),
    }
}
