//! Protobuf wire format primitives
//!
//! Only the subset used by the native API is implemented: varints (with
//! zig-zag for `sint32`), little-endian 32-bit values and length-delimited
//! fields. 64-bit fixed width values are never produced, and are skipped when
//! received.

use miette::Diagnostic;
use thiserror::Error;

use super::message::Encode;

/// Errors returned while decoding a message payload
#[derive(Clone, Copy, Debug, Diagnostic, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("Unexpected end of message while decoding field {0}")]
    #[diagnostic(code(espota::api::truncated))]
    Truncated(u32),

    #[error("Varint is longer than 10 bytes")]
    #[diagnostic(code(espota::api::varint_overflow))]
    VarintOverflow,

    #[error("Unsupported wire type {wire_type} for field {field_id}")]
    #[diagnostic(
        code(espota::api::wire_type),
        help("Groups are not part of the native API wire format")
    )]
    InvalidWireType { field_id: u32, wire_type: u8 },

    #[error("String field {0} is not valid UTF-8")]
    #[diagnostic(code(espota::api::utf8))]
    InvalidUtf8(u32),
}

/// The 3-bit wire type stored in every field tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::FromRepr)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    StartGroup = 3,
    EndGroup = 4,
    Fixed32 = 5,
}

/// A decoded varint, interpreted according to the field's declared type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProtoVarInt(u64);

impl ProtoVarInt {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Parse a varint from the start of `data`
    ///
    /// Returns the value and the number of bytes consumed, or `None` if the
    /// buffer ends before the varint does.
    pub fn parse(data: &[u8]) -> Result<Option<(Self, usize)>, DecodeError> {
        let mut value = 0u64;

        for (i, byte) in data.iter().enumerate() {
            if i >= MAX_VARINT_LEN {
                return Err(DecodeError::VarintOverflow);
            }

            value |= u64::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(Some((Self(value), i + 1)));
            }
        }

        if data.len() >= MAX_VARINT_LEN {
            return Err(DecodeError::VarintOverflow);
        }

        Ok(None)
    }

    pub fn as_u32(self) -> u32 {
        self.0 as u32
    }

    pub fn as_i32(self) -> i32 {
        self.0 as i32
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    pub fn as_i64(self) -> i64 {
        self.0 as i64
    }

    pub fn as_bool(self) -> bool {
        self.0 != 0
    }

    pub fn as_sint32(self) -> i32 {
        decode_zigzag32(self.0 as u32)
    }
}

const MAX_VARINT_LEN: usize = 10;

/// Number of bytes `value` takes as a varint
pub fn varint_len(value: u64) -> usize {
    match value {
        0 => 1,
        v => (64 - v.leading_zeros() as usize).div_ceil(7),
    }
}

pub fn encode_zigzag32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

pub fn decode_zigzag32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Appends encoded fields to a buffer
///
/// Every `encode_*` method skips the field entirely when it holds the
/// default value, unless `force` is set. Repeated fields force each element.
#[derive(Debug)]
pub struct ProtoWriter<'a> {
    buffer: &'a mut Vec<u8>,
}

impl<'a> ProtoWriter<'a> {
    pub fn new(buffer: &'a mut Vec<u8>) -> Self {
        Self { buffer }
    }

    pub fn write_varint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buffer.push((value as u8) | 0x80);
            value >>= 7;
        }
        self.buffer.push(value as u8);
    }

    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_tag(&mut self, field_id: u32, wire_type: WireType) {
        self.write_varint(u64::from((field_id << 3) | wire_type as u32));
    }

    pub fn encode_uint32(&mut self, field_id: u32, value: u32, force: bool) {
        self.encode_uint64(field_id, u64::from(value), force);
    }

    /// Negative values are sign extended to ten bytes, as protobuf requires
    pub fn encode_int32(&mut self, field_id: u32, value: i32, force: bool) {
        self.encode_uint64(field_id, i64::from(value) as u64, force);
    }

    pub fn encode_sint32(&mut self, field_id: u32, value: i32, force: bool) {
        self.encode_uint32(field_id, encode_zigzag32(value), force);
    }

    pub fn encode_uint64(&mut self, field_id: u32, value: u64, force: bool) {
        if value == 0 && !force {
            return;
        }
        self.write_tag(field_id, WireType::Varint);
        self.write_varint(value);
    }

    pub fn encode_int64(&mut self, field_id: u32, value: i64, force: bool) {
        self.encode_uint64(field_id, value as u64, force);
    }

    pub fn encode_bool(&mut self, field_id: u32, value: bool, force: bool) {
        self.encode_uint64(field_id, u64::from(value), force);
    }

    /// Enums travel as their numeric value
    pub fn encode_enum(&mut self, field_id: u32, value: u32, force: bool) {
        self.encode_uint64(field_id, u64::from(value), force);
    }

    pub fn encode_fixed32(&mut self, field_id: u32, value: u32, force: bool) {
        if value == 0 && !force {
            return;
        }
        self.write_tag(field_id, WireType::Fixed32);
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn encode_sfixed32(&mut self, field_id: u32, value: i32, force: bool) {
        self.encode_fixed32(field_id, value as u32, force);
    }

    /// Only `+0.0` counts as the default, `-0.0` is written
    pub fn encode_float(&mut self, field_id: u32, value: f32, force: bool) {
        self.encode_fixed32(field_id, value.to_bits(), force);
    }

    pub fn encode_string(&mut self, field_id: u32, value: &str, force: bool) {
        self.encode_bytes(field_id, value.as_bytes(), force);
    }

    pub fn encode_bytes(&mut self, field_id: u32, value: &[u8], force: bool) {
        if value.is_empty() && !force {
            return;
        }
        self.write_tag(field_id, WireType::LengthDelimited);
        self.write_varint(value.len() as u64);
        self.buffer.extend_from_slice(value);
    }

    pub fn encode_message<M: Encode + ?Sized>(&mut self, field_id: u32, value: &M, force: bool) {
        let size = value.calculate_size();
        if size == 0 && !force {
            return;
        }
        self.write_tag(field_id, WireType::LengthDelimited);
        self.write_varint(size as u64);
        value.encode(self);
    }
}

/// Size estimators matching the [ProtoWriter] encoders
///
/// `tag_size` is the encoded size of the field tag, see [ProtoSize::tag_size].
#[derive(Debug)]
pub struct ProtoSize;

impl ProtoSize {
    pub fn tag_size(field_id: u32) -> usize {
        varint_len(u64::from(field_id << 3))
    }

    pub fn uint32_field(tag_size: usize, value: u32, force: bool) -> usize {
        Self::uint64_field(tag_size, u64::from(value), force)
    }

    pub fn int32_field(tag_size: usize, value: i32, force: bool) -> usize {
        Self::uint64_field(tag_size, i64::from(value) as u64, force)
    }

    pub fn sint32_field(tag_size: usize, value: i32, force: bool) -> usize {
        Self::uint32_field(tag_size, encode_zigzag32(value), force)
    }

    pub fn uint64_field(tag_size: usize, value: u64, force: bool) -> usize {
        if value == 0 && !force {
            0
        } else {
            tag_size + varint_len(value)
        }
    }

    pub fn int64_field(tag_size: usize, value: i64, force: bool) -> usize {
        Self::uint64_field(tag_size, value as u64, force)
    }

    pub fn bool_field(tag_size: usize, value: bool, force: bool) -> usize {
        Self::uint64_field(tag_size, u64::from(value), force)
    }

    pub fn fixed32_field(tag_size: usize, value: u32, force: bool) -> usize {
        if value == 0 && !force {
            0
        } else {
            tag_size + 4
        }
    }

    pub fn sfixed32_field(tag_size: usize, value: i32, force: bool) -> usize {
        Self::fixed32_field(tag_size, value as u32, force)
    }

    pub fn float_field(tag_size: usize, value: f32, force: bool) -> usize {
        Self::fixed32_field(tag_size, value.to_bits(), force)
    }

    /// Size of a string, bytes or embedded message field of `len` bytes
    pub fn length_field(tag_size: usize, len: usize, force: bool) -> usize {
        if len == 0 && !force {
            0
        } else {
            tag_size + varint_len(len as u64) + len
        }
    }
}
