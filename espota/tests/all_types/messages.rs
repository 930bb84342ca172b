// This file is automatically generated from `espota/tests/all_types/api.proto` by
// `cargo xtask generate-api`, please do not edit it by hand.

#[cfg(feature = "dump")]
use super::message::{Dump, DumpValue, MessageDump};
use super::{
    message::{decode_str, Decode, Encode, MessageInfo},
    wire::{DecodeError, ProtoSize, ProtoVarInt, ProtoWriter},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Level(pub u32);

impl Level {
    pub const LOW: Self = Self(0);
    pub const HIGH: Self = Self(1);
    pub const CRITICAL: Self = Self(2);

    /// Descriptor name of a known value
    pub fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("LEVEL_LOW"),
            1 => Some("LEVEL_HIGH"),
            2 => Some("LEVEL_CRITICAL"),
            _ => None,
        }
    }
}

#[cfg(feature = "dump")]
impl DumpValue for Level {
    fn dump_value(&self, out: &mut String) {
        match self.name() {
            Some(name) => out.push_str(name),
            None => out.push_str(&format!("UNKNOWN({})", self.0)),
        }
    }
}

/// Embedded only, the source is inherited from AllTypesRequest
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reading<'a> {
    pub offset: i32,
    pub raw: &'a [u8],
}

impl Encode for Reading<'_> {
    fn encode(&self, buffer: &mut ProtoWriter<'_>) {
        buffer.encode_sfixed32(1, self.offset, false);
        buffer.encode_bytes(2, &self.raw, false);
    }

    fn calculate_size(&self) -> usize {
        let mut size = 0;
        size += ProtoSize::sfixed32_field(1, self.offset, false);
        size += ProtoSize::length_field(1, self.raw.len(), false);
        size
    }
}

impl<'a> Decode<'a> for Reading<'a> {
    fn decode_length(&mut self, field_id: u32, value: &'a [u8]) -> Result<bool, DecodeError> {
        match field_id {
            2 => self.raw = value,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn decode_32bit(&mut self, field_id: u32, value: u32) -> bool {
        match field_id {
            1 => self.offset = value as i32,
            _ => return false,
        }
        true
    }
}

#[cfg(feature = "dump")]
impl Dump for Reading<'_> {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "Reading");
        dump.field("offset", &self.offset);
        dump.field("raw", &self.raw);
        dump.finish();
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AllTypesRequest<'a> {
    pub float_value: f32,
    pub int32_value: i32,
    pub int64_value: i64,
    pub uint32_value: u32,
    pub uint64_value: u64,
    pub sint32_value: i32,
    pub fixed32_value: u32,
    pub sfixed32_value: i32,
    pub bool_value: bool,
    pub string_value: &'a str,
    pub bytes_value: &'a [u8],
    pub level: Level,
    pub reading: Reading<'a>,
    pub int64_values: Vec<i64>,
    pub uint64_values: Vec<u64>,
    pub sfixed32_values: Vec<i32>,
    pub levels: Vec<Level>,
    pub bytes_values: Vec<&'a [u8]>,
    pub readings: Vec<Reading<'a>>,
}

impl MessageInfo for AllTypesRequest<'_> {
    const MESSAGE_TYPE: u8 = 1;
    const MESSAGE_NAME: &'static str = "all_types_request";
}

impl Encode for AllTypesRequest<'_> {
    fn encode(&self, buffer: &mut ProtoWriter<'_>) {
        buffer.encode_float(1, self.float_value, false);
        buffer.encode_int32(2, self.int32_value, false);
        buffer.encode_int64(3, self.int64_value, false);
        buffer.encode_uint32(4, self.uint32_value, false);
        buffer.encode_uint64(5, self.uint64_value, false);
        buffer.encode_sint32(6, self.sint32_value, false);
        buffer.encode_fixed32(7, self.fixed32_value, false);
        buffer.encode_sfixed32(8, self.sfixed32_value, false);
        buffer.encode_bool(9, self.bool_value, false);
        buffer.encode_string(10, &self.string_value, false);
        buffer.encode_bytes(11, &self.bytes_value, false);
        buffer.encode_enum(12, self.level.0, false);
        buffer.encode_message(13, &self.reading, false);
        for item in &self.int64_values {
            buffer.encode_int64(16, *item, true);
        }
        for item in &self.uint64_values {
            buffer.encode_uint64(17, *item, true);
        }
        for item in &self.sfixed32_values {
            buffer.encode_sfixed32(18, *item, true);
        }
        for item in &self.levels {
            buffer.encode_enum(19, item.0, true);
        }
        for item in &self.bytes_values {
            buffer.encode_bytes(20, item, true);
        }
        for item in &self.readings {
            buffer.encode_message(21, item, true);
        }
    }

    fn calculate_size(&self) -> usize {
        let mut size = 0;
        size += ProtoSize::float_field(1, self.float_value, false);
        size += ProtoSize::int32_field(1, self.int32_value, false);
        size += ProtoSize::int64_field(1, self.int64_value, false);
        size += ProtoSize::uint32_field(1, self.uint32_value, false);
        size += ProtoSize::uint64_field(1, self.uint64_value, false);
        size += ProtoSize::sint32_field(1, self.sint32_value, false);
        size += ProtoSize::fixed32_field(1, self.fixed32_value, false);
        size += ProtoSize::sfixed32_field(1, self.sfixed32_value, false);
        size += ProtoSize::bool_field(1, self.bool_value, false);
        size += ProtoSize::length_field(1, self.string_value.len(), false);
        size += ProtoSize::length_field(1, self.bytes_value.len(), false);
        size += ProtoSize::uint32_field(1, self.level.0, false);
        size += ProtoSize::length_field(1, self.reading.calculate_size(), false);
        for item in &self.int64_values {
            size += ProtoSize::int64_field(2, *item, true);
        }
        for item in &self.uint64_values {
            size += ProtoSize::uint64_field(2, *item, true);
        }
        for item in &self.sfixed32_values {
            size += ProtoSize::sfixed32_field(2, *item, true);
        }
        for item in &self.levels {
            size += ProtoSize::uint32_field(2, item.0, true);
        }
        for item in &self.bytes_values {
            size += ProtoSize::length_field(2, item.len(), true);
        }
        for item in &self.readings {
            size += ProtoSize::length_field(2, item.calculate_size(), true);
        }
        size
    }
}

impl<'a> Decode<'a> for AllTypesRequest<'a> {
    fn decode_varint(&mut self, field_id: u32, value: ProtoVarInt) -> bool {
        match field_id {
            2 => self.int32_value = value.as_i32(),
            3 => self.int64_value = value.as_i64(),
            4 => self.uint32_value = value.as_u32(),
            5 => self.uint64_value = value.as_u64(),
            6 => self.sint32_value = value.as_sint32(),
            9 => self.bool_value = value.as_bool(),
            12 => self.level = Level(value.as_u32()),
            16 => self.int64_values.push(value.as_i64()),
            17 => self.uint64_values.push(value.as_u64()),
            19 => self.levels.push(Level(value.as_u32())),
            _ => return false,
        }
        true
    }

    fn decode_length(&mut self, field_id: u32, value: &'a [u8]) -> Result<bool, DecodeError> {
        match field_id {
            10 => self.string_value = decode_str(10, value)?,
            11 => self.bytes_value = value,
            13 => self.reading = Reading::decode(value)?,
            20 => self.bytes_values.push(value),
            21 => self.readings.push(Reading::decode(value)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn decode_32bit(&mut self, field_id: u32, value: u32) -> bool {
        match field_id {
            1 => self.float_value = f32::from_bits(value),
            7 => self.fixed32_value = value,
            8 => self.sfixed32_value = value as i32,
            18 => self.sfixed32_values.push(value as i32),
            _ => return false,
        }
        true
    }
}

#[cfg(feature = "dump")]
impl Dump for AllTypesRequest<'_> {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "AllTypesRequest");
        dump.field("float_value", &self.float_value);
        dump.field("int32_value", &self.int32_value);
        dump.field("int64_value", &self.int64_value);
        dump.field("uint32_value", &self.uint32_value);
        dump.field("uint64_value", &self.uint64_value);
        dump.field("sint32_value", &self.sint32_value);
        dump.field("fixed32_value", &self.fixed32_value);
        dump.field("sfixed32_value", &self.sfixed32_value);
        dump.field("bool_value", &self.bool_value);
        dump.field("string_value", &self.string_value);
        dump.field("bytes_value", &self.bytes_value);
        dump.field("level", &self.level);
        dump.message("reading", &self.reading);
        for item in &self.int64_values {
            dump.field("int64_values", item);
        }
        for item in &self.uint64_values {
            dump.field("uint64_values", item);
        }
        for item in &self.sfixed32_values {
            dump.field("sfixed32_values", item);
        }
        for item in &self.levels {
            dump.field("levels", item);
        }
        for item in &self.bytes_values {
            dump.field("bytes_values", item);
        }
        for item in &self.readings {
            dump.message("readings", item);
        }
        dump.finish();
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AllTypesResponse {
    pub string_value: String,
    pub bytes_value: Vec<u8>,
    pub string_values: Vec<String>,
    pub bytes_values: Vec<Vec<u8>>,
}

impl MessageInfo for AllTypesResponse {
    const MESSAGE_TYPE: u8 = 2;
    const MESSAGE_NAME: &'static str = "all_types_response";
}

impl Encode for AllTypesResponse {
    fn encode(&self, buffer: &mut ProtoWriter<'_>) {
        buffer.encode_string(1, &self.string_value, false);
        buffer.encode_bytes(2, &self.bytes_value, false);
        for item in &self.string_values {
            buffer.encode_string(3, item, true);
        }
        for item in &self.bytes_values {
            buffer.encode_bytes(4, item, true);
        }
    }

    fn calculate_size(&self) -> usize {
        let mut size = 0;
        size += ProtoSize::length_field(1, self.string_value.len(), false);
        size += ProtoSize::length_field(1, self.bytes_value.len(), false);
        for item in &self.string_values {
            size += ProtoSize::length_field(1, item.len(), true);
        }
        for item in &self.bytes_values {
            size += ProtoSize::length_field(1, item.len(), true);
        }
        size
    }
}

#[cfg(feature = "dump")]
impl Dump for AllTypesResponse {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "AllTypesResponse");
        dump.field("string_value", &self.string_value);
        dump.field("bytes_value", &self.bytes_value);
        for item in &self.string_values {
            dump.field("string_values", item);
        }
        for item in &self.bytes_values {
            dump.field("bytes_values", item);
        }
        dump.finish();
    }
}
