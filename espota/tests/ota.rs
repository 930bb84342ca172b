use std::{
    cell::RefCell,
    collections::VecDeque,
    io::{self, Read, Write},
    rc::Rc,
    time::Duration,
};

use espota::{
    error::{DeviceErrorKind, OtaError},
    ota::{compress_firmware, payload_checksum, protocol::*, OtaClient, OtaSocket},
    progress::ProgressCallbacks,
};
use md5::{Digest, Md5};
use pretty_assertions::assert_eq;
use sha2::Sha256;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Event {
    Sent(Vec<u8>),
    Received(usize),
}

#[derive(Debug, Default)]
struct DeviceState {
    responses: VecDeque<u8>,
    events: Vec<Event>,
    nodelay: Vec<bool>,
    timeouts: Vec<Duration>,
    send_buffer_size: Option<usize>,
    close_calls: usize,
}

impl DeviceState {
    fn sent(&self) -> Vec<Vec<u8>> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Sent(data) => Some(data.clone()),
                Event::Received(_) => None,
            })
            .collect()
    }
}

/// A device which answers with a fixed script, whatever it receives
struct FakeDevice(Rc<RefCell<DeviceState>>);

impl Read for FakeDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.0.borrow_mut();
        let len = buf.len().min(state.responses.len());
        for byte in buf.iter_mut().take(len) {
            *byte = state.responses.pop_front().unwrap();
        }
        if len > 0 {
            state.events.push(Event::Received(len));
        }
        Ok(len)
    }
}

impl Write for FakeDevice {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().events.push(Event::Sent(buf.to_vec()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl OtaSocket for FakeDevice {
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.0.borrow_mut().timeouts.push(timeout);
        Ok(())
    }

    fn set_nodelay(&mut self, nodelay: bool) -> io::Result<()> {
        self.0.borrow_mut().nodelay.push(nodelay);
        Ok(())
    }

    fn set_send_buffer_size(&mut self, size: usize) -> io::Result<()> {
        self.0.borrow_mut().send_buffer_size = Some(size);
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.0.borrow_mut().close_calls += 1;
        Ok(())
    }
}

fn device(script: &[&[u8]]) -> (FakeDevice, Rc<RefCell<DeviceState>>) {
    let state = Rc::new(RefCell::new(DeviceState {
        responses: script.concat().into(),
        ..Default::default()
    }));

    (FakeDevice(state.clone()), state)
}

#[derive(Debug, Default)]
struct RecordedProgress {
    total: Option<usize>,
    updates: Vec<usize>,
    finished: bool,
}

impl ProgressCallbacks for RecordedProgress {
    fn init(&mut self, total: usize) {
        self.total = Some(total);
    }

    fn update(&mut self, current: usize) {
        self.updates.push(current);
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

fn firmware(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn upload(
    socket: FakeDevice,
    password: Option<&str>,
    firmware: &[u8],
) -> (Result<(), OtaError>, RecordedProgress) {
    let mut progress = RecordedProgress::default();
    let result = OtaClient::new(password)
        .with_settle_delay(Duration::ZERO)
        .perform(socket, firmware, &mut progress);

    (result, progress)
}

const VERSION_2: &[u8] = &[RESPONSE_OK, OTA_VERSION_2_0];
const COMPRESSION: &[u8] = &[RESPONSE_SUPPORTS_COMPRESSION];
const NO_COMPRESSION: &[u8] = &[0x00];
const NO_AUTH: &[u8] = &[RESPONSE_AUTH_OK];
const PREPARE_OK: &[u8] = &[RESPONSE_UPDATE_PREPARE_OK];
const MD5_OK: &[u8] = &[RESPONSE_BIN_MD5_OK];
const CHUNK_OK: &[u8] = &[RESPONSE_CHUNK_OK];
const COMPLETE: &[u8] = &[RESPONSE_RECEIVE_OK, RESPONSE_UPDATE_END_OK];

const MD5_NONCE: &[u8] = b"0123456789abcdef0123456789abcdef";
const SHA256_NONCE: &[u8] = b"fedcba9876543210fedcba9876543210fedcba9876543210fedcba9876543210";

#[test]
fn version_2_upload_acknowledges_every_chunk() {
    let firmware = firmware(2 * UPLOAD_BLOCK_SIZE + 1000);
    let (socket, state) = device(&[
        VERSION_2,
        NO_COMPRESSION,
        NO_AUTH,
        PREPARE_OK,
        MD5_OK,
        CHUNK_OK,
        CHUNK_OK,
        CHUNK_OK,
        COMPLETE,
    ]);

    let (result, progress) = upload(socket, None, &firmware);
    result.unwrap();

    let state = state.borrow();
    assert!(state.responses.is_empty());
    assert_eq!(state.close_calls, 1);
    assert_eq!(state.nodelay, [true, false, true]);
    assert_eq!(state.send_buffer_size, Some(UPLOAD_BUFFER_SIZE));
    assert_eq!(state.timeouts, [CONNECT_TIMEOUT, DATA_TIMEOUT]);

    let size = (firmware.len() as u32).to_be_bytes().to_vec();
    let checksum = payload_checksum(&firmware).into_bytes();
    assert_eq!(
        state.events,
        [
            Event::Sent(MAGIC_BYTES.to_vec()),
            Event::Received(1),
            Event::Received(1),
            Event::Sent(vec![0x03]),
            Event::Received(1),
            Event::Received(1),
            Event::Sent(size),
            Event::Received(1),
            Event::Sent(checksum),
            Event::Received(1),
            Event::Sent(firmware[..8192].to_vec()),
            Event::Received(1),
            Event::Sent(firmware[8192..16384].to_vec()),
            Event::Received(1),
            Event::Sent(firmware[16384..].to_vec()),
            Event::Received(1),
            Event::Received(1),
            Event::Received(1),
            Event::Sent(vec![RESPONSE_OK]),
        ]
    );

    assert_eq!(progress.total, Some(firmware.len()));
    assert_eq!(progress.updates, [8192, 16384, 17384]);
    assert!(progress.finished);
}

#[test]
fn version_1_upload_reads_no_chunk_acknowledgements() {
    let firmware = firmware(2 * UPLOAD_BLOCK_SIZE + 1000);
    let (socket, state) = device(&[
        &[RESPONSE_OK, OTA_VERSION_1_0],
        NO_COMPRESSION,
        NO_AUTH,
        PREPARE_OK,
        MD5_OK,
        COMPLETE,
    ]);

    let (result, _) = upload(socket, None, &firmware);
    result.unwrap();

    let state = state.borrow();
    assert!(state.responses.is_empty());

    let transfer: Vec<_> = state.events[10..13].to_vec();
    assert_eq!(
        transfer,
        [
            Event::Sent(firmware[..8192].to_vec()),
            Event::Sent(firmware[8192..16384].to_vec()),
            Event::Sent(firmware[16384..].to_vec()),
        ]
    );
    assert_eq!(state.sent().last(), Some(&vec![RESPONSE_OK]));
}

#[test]
fn compressed_upload_announces_compressed_payload() {
    let firmware = vec![0xAA; 4 * UPLOAD_BLOCK_SIZE];
    let compressed = compress_firmware(&firmware).unwrap();
    let chunks = compressed.len().div_ceil(UPLOAD_BLOCK_SIZE);
    assert!(compressed.len() < firmware.len());

    let mut script = vec![
        VERSION_2,
        COMPRESSION,
        NO_AUTH,
        PREPARE_OK,
        MD5_OK,
    ];
    script.extend(std::iter::repeat(CHUNK_OK).take(chunks));
    script.push(COMPLETE);
    let (socket, state) = device(&script);

    let (result, progress) = upload(socket, None, &firmware);
    result.unwrap();

    let sent = state.borrow().sent();
    assert_eq!(sent[2], (compressed.len() as u32).to_be_bytes());
    assert_eq!(sent[3], payload_checksum(&compressed).into_bytes());
    assert_eq!(sent[4..4 + chunks].concat(), compressed);
    assert_eq!(progress.total, Some(compressed.len()));
}

#[test]
fn md5_authentication() {
    let firmware = firmware(100);
    let (socket, state) = device(&[
        VERSION_2,
        NO_COMPRESSION,
        &[RESPONSE_REQUEST_AUTH],
        MD5_NONCE,
        &[RESPONSE_AUTH_OK],
        PREPARE_OK,
        MD5_OK,
        CHUNK_OK,
        COMPLETE,
    ]);

    let (result, _) = upload(socket, Some("hunter2"), &firmware);
    result.unwrap();

    let sent = state.borrow().sent();
    let cnonce = &sent[2];
    assert_eq!(cnonce.len(), 32);
    assert!(cnonce.iter().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    let mut hasher = Md5::new();
    hasher.update(b"hunter2");
    hasher.update(MD5_NONCE);
    hasher.update(cnonce);
    let expected = format!("{:x}", hasher.finalize());
    assert_eq!(String::from_utf8(sent[3].clone()).unwrap(), expected);
}

#[test]
fn sha256_authentication() {
    let firmware = firmware(100);
    let (socket, state) = device(&[
        VERSION_2,
        NO_COMPRESSION,
        &[RESPONSE_REQUEST_SHA256_AUTH],
        SHA256_NONCE,
        &[RESPONSE_AUTH_OK],
        PREPARE_OK,
        MD5_OK,
        CHUNK_OK,
        COMPLETE,
    ]);

    let (result, _) = upload(socket, Some("hunter2"), &firmware);
    result.unwrap();

    let sent = state.borrow().sent();
    let cnonce = &sent[2];
    assert_eq!(cnonce.len(), 64);

    let mut hasher = Sha256::new();
    hasher.update(b"hunter2");
    hasher.update(SHA256_NONCE);
    hasher.update(cnonce);
    let expected = format!("{:x}", hasher.finalize());
    assert_eq!(String::from_utf8(sent[3].clone()).unwrap(), expected);
}

#[test]
fn rejected_password() {
    let (socket, state) = device(&[
        VERSION_2,
        NO_COMPRESSION,
        &[RESPONSE_REQUEST_AUTH],
        MD5_NONCE,
        &[0x82],
    ]);

    let (result, progress) = upload(socket, Some("wrong"), &firmware(100));
    let err = result.unwrap_err();

    assert!(matches!(
        err,
        OtaError::Device {
            kind: DeviceErrorKind::AuthInvalid,
            ..
        }
    ));
    assert!(err.to_string().contains("Authentication invalid"));
    assert_eq!(state.borrow().close_calls, 1);
    assert_eq!(progress.total, None);
}

#[test]
fn password_required_but_missing() {
    let (socket, state) = device(&[
        VERSION_2,
        NO_COMPRESSION,
        &[RESPONSE_REQUEST_AUTH],
        MD5_NONCE,
    ]);

    let (result, _) = upload(socket, None, &firmware(100));
    assert!(matches!(result, Err(OtaError::PasswordRequired)));

    let state = state.borrow();
    assert_eq!(state.sent(), [MAGIC_BYTES.to_vec(), vec![0x03]]);
    assert_eq!(state.close_calls, 1);
}

#[test]
fn unsupported_version() {
    let (socket, state) = device(&[&[RESPONSE_OK, 3]]);

    let (result, _) = upload(socket, None, &firmware(100));
    assert!(matches!(result, Err(OtaError::UnsupportedVersion(3))));

    let state = state.borrow();
    assert_eq!(state.sent(), [MAGIC_BYTES.to_vec()]);
    assert_eq!(state.timeouts, [CONNECT_TIMEOUT]);
    assert_eq!(state.close_calls, 1);
}

#[test]
fn device_error_while_preparing() {
    let (socket, state) = device(&[
        VERSION_2,
        NO_COMPRESSION,
        NO_AUTH,
        &[0x81],
    ]);

    let (result, _) = upload(socket, None, &firmware(100));
    let err = result.unwrap_err();
    assert!(err
        .to_string()
        .contains("Couldn't prepare flash memory for update"));
    assert_eq!(state.borrow().close_calls, 1);
}

#[test]
fn unexpected_response_is_reported_in_hex() {
    let (socket, _) = device(&[
        VERSION_2,
        NO_COMPRESSION,
        NO_AUTH,
        PREPARE_OK,
        &[0x4A],
    ]);

    let (result, _) = upload(socket, None, &firmware(100));
    let err = result.unwrap_err();
    assert!(matches!(
        err,
        OtaError::UnexpectedResponse { byte: 0x4A, .. }
    ));
    assert!(err.to_string().contains("Unexpected response from ESP: 0x4A"));
}

#[test]
fn missing_chunk_acknowledgement() {
    let (socket, state) = device(&[
        VERSION_2,
        NO_COMPRESSION,
        NO_AUTH,
        PREPARE_OK,
        MD5_OK,
    ]);

    let (result, progress) = upload(socket, None, &firmware(100));
    assert!(matches!(result, Err(OtaError::Receive { .. })));
    assert!(progress.updates.is_empty());
    assert_eq!(state.borrow().close_calls, 1);
}

#[test]
fn error_code_during_transfer() {
    let (socket, _) = device(&[
        VERSION_2,
        NO_COMPRESSION,
        NO_AUTH,
        PREPARE_OK,
        MD5_OK,
        &[0x83],
    ]);

    let (result, _) = upload(socket, None, &firmware(100));
    assert!(matches!(
        result,
        Err(OtaError::Device {
            kind: DeviceErrorKind::WritingFlash,
            ..
        })
    ));
}
