//! Message level encoding and decoding
//!
//! Generated message types implement [Encode] when the device sends them and
//! [Decode] when the device receives them. Decoding is zero-copy: strings,
//! bytes and packed buffers borrow from the receive buffer, so the buffer has
//! to outlive every message decoded from it. The `'a` lifetime on [Decode]
//! ties the two together.

#[cfg(feature = "dump")]
use std::fmt::Write as _;

use log::trace;

use super::wire::{DecodeError, ProtoVarInt, ProtoWriter, WireType};

/// Largest field number a protobuf descriptor can assign
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// A message which can be written to the wire
pub trait Encode {
    /// Append the encoded fields to `buffer`
    fn encode(&self, buffer: &mut ProtoWriter<'_>);

    /// Exact number of bytes [Encode::encode] will write
    fn calculate_size(&self) -> usize;

    fn encode_to_vec(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.calculate_size());
        self.encode(&mut ProtoWriter::new(&mut buffer));
        buffer
    }
}

/// A message which can be read from the wire
///
/// Decoding dispatches every field to one of three hooks depending on its
/// wire type. A hook returns `false` for field numbers it does not know,
/// such fields are skipped so newer peers can add fields freely.
pub trait Decode<'a>: Default {
    fn decode_varint(&mut self, _field_id: u32, _value: ProtoVarInt) -> bool {
        false
    }

    fn decode_length(&mut self, _field_id: u32, _value: &'a [u8]) -> Result<bool, DecodeError> {
        Ok(false)
    }

    fn decode_32bit(&mut self, _field_id: u32, _value: u32) -> bool {
        false
    }

    /// Decode a complete payload into a default constructed message
    fn decode(buffer: &'a [u8]) -> Result<Self, DecodeError> {
        let mut message = Self::default();
        message.merge(buffer)?;
        Ok(message)
    }

    /// Decode `buffer` on top of the current field values
    fn merge(&mut self, mut buffer: &'a [u8]) -> Result<(), DecodeError> {
        while !buffer.is_empty() {
            let (tag, len) = ProtoVarInt::parse(buffer)?.ok_or(DecodeError::Truncated(0))?;
            buffer = &buffer[len..];

            let wire_type = (tag.as_u64() & 0x07) as u8;
            // Numbers past the protobuf maximum are never assigned
            // and are skipped like any other unknown field
            let number = tag.as_u64() >> 3;
            let known = u32::try_from(number)
                .ok()
                .filter(|id| *id <= MAX_FIELD_NUMBER);
            let field_id = known.unwrap_or(u32::MAX);

            let consumed = match WireType::from_repr(wire_type) {
                Some(WireType::Varint) => {
                    let (value, len) = ProtoVarInt::parse(buffer)?
                        .ok_or(DecodeError::Truncated(field_id))?;
                    buffer = &buffer[len..];
                    known.is_some() && self.decode_varint(field_id, value)
                }
                Some(WireType::LengthDelimited) => {
                    let (len, prefix) = ProtoVarInt::parse(buffer)?
                        .ok_or(DecodeError::Truncated(field_id))?;
                    let rest = &buffer[prefix..];
                    if len.as_u64() > rest.len() as u64 {
                        return Err(DecodeError::Truncated(field_id));
                    }
                    let (value, rest) = rest.split_at(len.as_u64() as usize);
                    buffer = rest;
                    known.is_some() && self.decode_length(field_id, value)?
                }
                Some(WireType::Fixed32) => {
                    let (value, rest) = buffer
                        .split_first_chunk::<4>()
                        .ok_or(DecodeError::Truncated(field_id))?;
                    buffer = rest;
                    known.is_some() && self.decode_32bit(field_id, u32::from_le_bytes(*value))
                }
                Some(WireType::Fixed64) => {
                    // No supported field type uses this encoding
                    let (_, rest) = buffer
                        .split_first_chunk::<8>()
                        .ok_or(DecodeError::Truncated(field_id))?;
                    buffer = rest;
                    false
                }
                _ => {
                    return Err(DecodeError::InvalidWireType {
                        field_id,
                        wire_type,
                    })
                }
            };

            if !consumed {
                trace!("Skipping unknown field {number} with wire type {wire_type}");
            }
        }

        Ok(())
    }
}

/// Identity of a message which travels in its own frame
pub trait MessageInfo {
    /// Numeric type written in the frame header
    const MESSAGE_TYPE: u8;
    const MESSAGE_NAME: &'static str;
    /// Send immediately instead of waiting for the next flush
    const NO_DELAY: bool = false;
}

/// Borrow a length-delimited field as a string
pub fn decode_str(field_id: u32, value: &[u8]) -> Result<&str, DecodeError> {
    std::str::from_utf8(value).map_err(|_| DecodeError::InvalidUtf8(field_id))
}

/// A packed repeated numeric field kept in its encoded form
///
/// Decoding only records where the elements live and how many there are;
/// individual values are decoded lazily on iteration. Used for large
/// homogeneous arrays such as raw infrared timings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PackedBuffer<'a> {
    data: &'a [u8],
    count: usize,
}

impl<'a> PackedBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        // every varint ends with exactly one byte without the continuation bit
        let count = data.iter().filter(|b| *b & 0x80 == 0).count();
        Self { data, count }
    }

    /// Number of encoded elements
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The raw encoded bytes
    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    pub fn varints(&self) -> PackedVarints<'a> {
        PackedVarints { data: self.data }
    }

    pub fn sint32s(&self) -> impl Iterator<Item = i32> + 'a {
        self.varints().map(ProtoVarInt::as_sint32)
    }

    pub fn uint32s(&self) -> impl Iterator<Item = u32> + 'a {
        self.varints().map(ProtoVarInt::as_u32)
    }

    /// Pack `values` as zig-zag varints
    pub fn pack_sint32s(values: &[i32], out: &mut Vec<u8>) {
        let mut writer = ProtoWriter::new(out);
        for value in values {
            writer.write_varint(u64::from(super::wire::encode_zigzag32(*value)));
        }
    }
}

/// Iterator over the varints of a [PackedBuffer]
///
/// Stops at the first malformed or truncated element.
#[derive(Clone, Debug)]
pub struct PackedVarints<'a> {
    data: &'a [u8],
}

impl Iterator for PackedVarints<'_> {
    type Item = ProtoVarInt;

    fn next(&mut self) -> Option<Self::Item> {
        match ProtoVarInt::parse(self.data) {
            Ok(Some((value, len))) => {
                self.data = &self.data[len..];
                Some(value)
            }
            _ => {
                self.data = &[];
                None
            }
        }
    }
}

/// Human-readable rendering of a message, for logs
#[cfg(feature = "dump")]
pub trait Dump {
    fn dump_to(&self, out: &mut String);

    fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_to(&mut out);
        out
    }
}

/// A single field value inside a [Dump]
#[cfg(feature = "dump")]
pub trait DumpValue {
    fn dump_value(&self, out: &mut String);
}

#[cfg(feature = "dump")]
macro_rules! display_dump_value {
    ( $( $type:ty ),* ) => {
        $(
            impl DumpValue for $type {
                fn dump_value(&self, out: &mut String) {
                    write!(out, "{}", self).ok();
                }
            }
        )*
    };
}

#[cfg(feature = "dump")]
display_dump_value!(bool, u32, i32, u64, i64);

#[cfg(feature = "dump")]
impl DumpValue for f32 {
    fn dump_value(&self, out: &mut String) {
        write!(out, "{self:?}").ok();
    }
}

#[cfg(feature = "dump")]
impl DumpValue for str {
    fn dump_value(&self, out: &mut String) {
        write!(out, "'{self}'").ok();
    }
}

#[cfg(feature = "dump")]
impl DumpValue for String {
    fn dump_value(&self, out: &mut String) {
        self.as_str().dump_value(out);
    }
}

#[cfg(feature = "dump")]
impl DumpValue for [u8] {
    fn dump_value(&self, out: &mut String) {
        for (i, byte) in self.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            write!(out, "{byte:02X}").ok();
        }
        write!(out, " ({})", self.len()).ok();
    }
}

#[cfg(feature = "dump")]
impl DumpValue for Vec<u8> {
    fn dump_value(&self, out: &mut String) {
        self.as_slice().dump_value(out);
    }
}

#[cfg(feature = "dump")]
impl DumpValue for PackedBuffer<'_> {
    fn dump_value(&self, out: &mut String) {
        write!(out, "packed buffer [{} values, {} bytes]", self.count, self.data.len()).ok();
    }
}

#[cfg(feature = "dump")]
impl<T: DumpValue + ?Sized> DumpValue for &T {
    fn dump_value(&self, out: &mut String) {
        (**self).dump_value(out);
    }
}

/// Builder used by generated [Dump] implementations
#[cfg(feature = "dump")]
#[derive(Debug)]
pub struct MessageDump<'o> {
    out: &'o mut String,
}

#[cfg(feature = "dump")]
impl<'o> MessageDump<'o> {
    pub fn begin(out: &'o mut String, name: &str) -> Self {
        out.push_str(name);
        out.push_str(" {\n");
        Self { out }
    }

    pub fn field(&mut self, name: &str, value: &dyn DumpValue) {
        write!(self.out, "  {name}: ").ok();
        value.dump_value(self.out);
        self.out.push('\n');
    }

    pub fn message(&mut self, name: &str, value: &dyn Dump) {
        let nested = value.dump();
        writeln!(self.out, "  {name}: {}", nested.replace('\n', "\n  ")).ok();
    }

    pub fn finish(self) {
        self.out.push('}');
    }
}
