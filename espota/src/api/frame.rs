//! Frame transport for the native API
//!
//! A frame is `varint(payload length) ‖ varint(message type) ‖ payload`. On a
//! plaintext connection every frame is additionally preceded by a single
//! `0x00` indicator byte; encrypted connections use a different indicator and
//! are not handled here.

use std::io::{self, Read, Write};

use log::{debug, trace};
use miette::Diagnostic;
use thiserror::Error;

use super::{
    message::{Encode, MessageInfo},
    wire::{ProtoVarInt, ProtoWriter},
};

/// Indicator byte of an unencrypted frame
pub const PLAINTEXT_INDICATOR: u8 = 0x00;

/// Largest payload accepted by [PlaintextFrameHelper] unless configured
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 32 * 1024;

/// Errors raised while reading or writing frames
#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum FrameError {
    #[error("Frame header contains a malformed varint")]
    #[diagnostic(code(espota::api::frame::header))]
    InvalidHeader,

    #[error("Message type {0} is out of range")]
    #[diagnostic(code(espota::api::frame::message_type))]
    InvalidMessageType(u64),

    #[error("Frame of {size} bytes exceeds the maximum message size of {max} bytes")]
    #[diagnostic(code(espota::api::frame::too_large))]
    TooLarge { size: u64, max: usize },

    #[error("Invalid frame indicator {0:#04X}")]
    #[diagnostic(
        code(espota::api::frame::indicator),
        help("The peer may be using an encrypted connection")
    )]
    BadIndicator(u8),

    #[error("Connection closed by peer")]
    #[diagnostic(code(espota::api::frame::closed))]
    Closed,

    #[error("Frame transport failed: {0}")]
    #[diagnostic(code(espota::api::frame::io))]
    Io(#[from] io::Error),
}

/// A single received frame, borrowing its payload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame<'a> {
    pub message_type: u16,
    pub payload: &'a [u8],
}

/// Append one frame carrying `message` to `out`
pub fn encode_frame<M: Encode + ?Sized>(out: &mut Vec<u8>, message_type: u16, message: &M) {
    let size = message.calculate_size();
    out.reserve(size + 6);

    let mut writer = ProtoWriter::new(out);
    writer.write_varint(size as u64);
    writer.write_varint(u64::from(message_type));
    message.encode(&mut writer);
}

/// Try to decode one frame from the start of `buffer`
///
/// Returns `Ok(None)` while the buffer does not yet hold a complete frame.
/// On success the number of bytes the frame occupied is returned alongside
/// it, so the caller can drop them from its receive buffer.
pub fn decode_frame(buffer: &[u8]) -> Result<Option<(Frame<'_>, usize)>, FrameError> {
    let Some((size, size_len)) = parse_header_varint(buffer)? else {
        return Ok(None);
    };
    let Some((message_type, type_len)) = parse_header_varint(&buffer[size_len..])? else {
        return Ok(None);
    };
    let message_type = to_message_type(message_type)?;

    let header_len = size_len + type_len;
    let available = (buffer.len() - header_len) as u64;
    if size.as_u64() > available {
        return Ok(None);
    }

    let end = header_len + size.as_u64() as usize;
    let frame = Frame {
        message_type,
        payload: &buffer[header_len..end],
    };

    Ok(Some((frame, end)))
}

fn parse_header_varint(buffer: &[u8]) -> Result<Option<(ProtoVarInt, usize)>, FrameError> {
    ProtoVarInt::parse(buffer).map_err(|_| FrameError::InvalidHeader)
}

fn to_message_type(value: ProtoVarInt) -> Result<u16, FrameError> {
    u16::try_from(value.as_u64()).map_err(|_| FrameError::InvalidMessageType(value.as_u64()))
}

/// Plaintext frame transport over a byte stream
///
/// Outgoing frames are collected until either a message with the `no_delay`
/// option is written or [PlaintextFrameHelper::flush] is called.
#[derive(Debug)]
pub struct PlaintextFrameHelper<S> {
    stream: S,
    max_message_size: usize,
    rx: Vec<u8>,
    tx: Vec<u8>,
}

impl<S: Read + Write> PlaintextFrameHelper<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            rx: Vec::new(),
            tx: Vec::new(),
        }
    }

    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Block until a whole frame has been received
    ///
    /// The returned payload stays valid until the next call.
    pub fn read_packet(&mut self) -> Result<Frame<'_>, FrameError> {
        let mut indicator = [0u8; 1];
        match self.stream.read_exact(&mut indicator) {
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(FrameError::Closed)
            }
            result => result?,
        }
        if indicator[0] != PLAINTEXT_INDICATOR {
            return Err(FrameError::BadIndicator(indicator[0]));
        }

        let size = self.read_varint()?;
        let message_type = to_message_type(self.read_varint()?)?;

        if size.as_u64() > self.max_message_size as u64 {
            return Err(FrameError::TooLarge {
                size: size.as_u64(),
                max: self.max_message_size,
            });
        }

        self.rx.clear();
        self.rx.resize(size.as_u64() as usize, 0);
        self.stream.read_exact(&mut self.rx)?;

        trace!("Received frame of type {message_type} with {} bytes", self.rx.len());

        Ok(Frame {
            message_type,
            payload: &self.rx,
        })
    }

    fn read_varint(&mut self) -> Result<ProtoVarInt, FrameError> {
        let mut bytes = [0u8; 10];

        for i in 0..bytes.len() {
            self.stream.read_exact(&mut bytes[i..=i])?;
            if let Some((value, _)) = parse_header_varint(&bytes[..=i])? {
                return Ok(value);
            }
        }

        Err(FrameError::InvalidHeader)
    }

    /// Queue `message` for sending
    pub fn write_message<M: Encode + MessageInfo>(&mut self, message: &M) -> Result<(), FrameError> {
        debug!("Sending {}", M::MESSAGE_NAME);

        self.tx.push(PLAINTEXT_INDICATOR);
        encode_frame(&mut self.tx, u16::from(M::MESSAGE_TYPE), message);

        if M::NO_DELAY {
            self.flush()?;
        }

        Ok(())
    }

    /// Write every queued frame to the stream
    pub fn flush(&mut self) -> Result<(), FrameError> {
        if !self.tx.is_empty() {
            self.stream.write_all(&self.tx)?;
            self.tx.clear();
        }
        self.stream.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::api::wire::ProtoSize;

    struct Number(u32);

    impl Encode for Number {
        fn encode(&self, buffer: &mut ProtoWriter<'_>) {
            buffer.encode_uint32(1, self.0, false);
        }

        fn calculate_size(&self) -> usize {
            ProtoSize::uint32_field(1, self.0, false)
        }
    }

    impl MessageInfo for Number {
        const MESSAGE_TYPE: u8 = 200;
        const MESSAGE_NAME: &'static str = "number";
    }

    struct Urgent;

    impl Encode for Urgent {
        fn encode(&self, _buffer: &mut ProtoWriter<'_>) {}

        fn calculate_size(&self) -> usize {
            0
        }
    }

    impl MessageInfo for Urgent {
        const MESSAGE_TYPE: u8 = 7;
        const MESSAGE_NAME: &'static str = "urgent";
        const NO_DELAY: bool = true;
    }

    #[test]
    fn frame_layout() {
        let mut out = Vec::new();
        encode_frame(&mut out, 200, &Number(300));
        assert_eq!(out, [0x03, 0xC8, 0x01, 0x08, 0xAC, 0x02]);
    }

    #[test]
    fn empty_payload_frame() {
        let mut out = Vec::new();
        encode_frame(&mut out, 7, &Number(0));
        assert_eq!(out, [0x00, 0x07]);

        let (frame, consumed) = decode_frame(&out).unwrap().unwrap();
        assert_eq!(frame.message_type, 7);
        assert!(frame.payload.is_empty());
        assert_eq!(consumed, 2);
    }

    #[test]
    fn incremental_decoding() {
        let mut out = Vec::new();
        encode_frame(&mut out, 200, &Number(300));
        encode_frame(&mut out, 7, &Number(0));

        for len in 0..6 {
            assert_eq!(decode_frame(&out[..len]).unwrap(), None);
        }

        let (frame, consumed) = decode_frame(&out).unwrap().unwrap();
        assert_eq!(frame.message_type, 200);
        assert_eq!(frame.payload, [0x08, 0xAC, 0x02]);
        assert_eq!(consumed, 6);

        let (frame, consumed) = decode_frame(&out[consumed..]).unwrap().unwrap();
        assert_eq!(frame.message_type, 7);
        assert_eq!(consumed, 2);
    }

    #[test]
    fn message_type_out_of_range() {
        let result = decode_frame(&[0x00, 0x80, 0x80, 0x04]);
        assert!(matches!(result, Err(FrameError::InvalidMessageType(65536))));
    }

    #[test]
    fn read_plaintext_packets() {
        let stream = Cursor::new(vec![0x00, 0x03, 0xC8, 0x01, 0x08, 0xAC, 0x02, 0x00, 0x00, 0x07]);
        let mut helper = PlaintextFrameHelper::new(stream);

        let frame = helper.read_packet().unwrap();
        assert_eq!(frame.message_type, 200);
        assert_eq!(frame.payload, [0x08, 0xAC, 0x02]);

        let frame = helper.read_packet().unwrap();
        assert_eq!(frame.message_type, 7);
        assert!(frame.payload.is_empty());

        assert!(matches!(helper.read_packet(), Err(FrameError::Closed)));
    }

    #[test]
    fn reject_encrypted_indicator() {
        let mut helper = PlaintextFrameHelper::new(Cursor::new(vec![0x01, 0x00, 0x07]));
        assert!(matches!(
            helper.read_packet(),
            Err(FrameError::BadIndicator(0x01))
        ));
    }

    #[test]
    fn reject_oversized_frame() {
        let mut helper =
            PlaintextFrameHelper::new(Cursor::new(vec![0x00, 0x81, 0x01, 0x07])).with_max_message_size(128);
        assert!(matches!(
            helper.read_packet(),
            Err(FrameError::TooLarge { size: 129, max: 128 })
        ));
    }

    #[test]
    fn writes_are_queued_until_no_delay() {
        let mut helper = PlaintextFrameHelper::new(Cursor::new(Vec::new()));

        helper.write_message(&Number(1)).unwrap();
        assert!(helper.stream.get_ref().is_empty());

        helper.write_message(&Urgent).unwrap();
        assert_eq!(
            helper.into_inner().into_inner(),
            [0x00, 0x02, 0xC8, 0x01, 0x08, 0x01, 0x00, 0x00, 0x07]
        );
    }
}
