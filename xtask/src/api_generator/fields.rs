//! Code generation rules for message fields
//!
//! Every supported field type knows its Rust storage type, the wire category
//! it is decoded from and the statements that decode, encode, size and dump
//! it. The rules are combined with the field [Shape] to produce the code for
//! a single field.

use super::descriptor::FieldDescriptor;

/// Scalar protobuf types which are supported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScalarType {
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Fixed32,
    Sfixed32,
    Bool,
    String,
    Bytes,
}

impl ScalarType {
    pub(crate) fn from_proto(name: &str) -> Option<Self> {
        let scalar = match name {
            "float" => Self::Float,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "sint32" => Self::Sint32,
            "fixed32" => Self::Fixed32,
            "sfixed32" => Self::Sfixed32,
            "bool" => Self::Bool,
            "string" => Self::String,
            "bytes" => Self::Bytes,
            _ => return None,
        };

        Some(scalar)
    }

    /// Suffix of the `ProtoWriter::encode_*` method
    fn encoder(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Sint32 => "sint32",
            Self::Fixed32 => "fixed32",
            Self::Sfixed32 => "sfixed32",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }

    /// The `ProtoSize` estimator for fixed size and varint values
    fn size_estimator(self) -> &'static str {
        match self {
            Self::Float => "float_field",
            Self::Int32 => "int32_field",
            Self::Int64 => "int64_field",
            Self::Uint32 => "uint32_field",
            Self::Uint64 => "uint64_field",
            Self::Sint32 => "sint32_field",
            Self::Fixed32 => "fixed32_field",
            Self::Sfixed32 => "sfixed32_field",
            Self::Bool => "bool_field",
            Self::String | Self::Bytes => "length_field",
        }
    }
}

/// 64-bit encodings the runtime does not implement
pub(crate) const UNSUPPORTED_TYPES: &[&str] = &["double", "fixed64", "sfixed64", "sint64"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldType {
    Scalar(ScalarType),
    Enum(String),
    /// An embedded message, `borrows` when it carries a lifetime
    Message { name: String, borrows: bool },
}

/// Wire type category a field is decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DecodeCategory {
    Varint,
    Fixed32,
    LengthDelimited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Single,
    /// A `Vec` of elements
    Repeated,
    /// A `heapless::Vec` of at most this many elements, encode only
    FixedArray(usize),
    /// Packed varints kept undecoded in the receive buffer, decode only
    PackedBuffer,
}

impl FieldType {
    /// Whether values of this type borrow from the receive buffer when
    /// decoded
    pub(crate) fn borrows(&self) -> bool {
        match self {
            Self::Scalar(scalar) => matches!(scalar, ScalarType::String | ScalarType::Bytes),
            Self::Enum(_) => false,
            Self::Message { borrows, .. } => *borrows,
        }
    }

    /// Varint encoded numbers, the only element type of a packed buffer
    pub(crate) fn is_varint_number(&self) -> bool {
        match self {
            Self::Scalar(scalar) => matches!(
                scalar,
                ScalarType::Int32
                    | ScalarType::Int64
                    | ScalarType::Uint32
                    | ScalarType::Uint64
                    | ScalarType::Sint32
                    | ScalarType::Bool
            ),
            Self::Enum(_) => true,
            Self::Message { .. } => false,
        }
    }

    fn category(&self) -> DecodeCategory {
        match self {
            Self::Scalar(ScalarType::Float | ScalarType::Fixed32 | ScalarType::Sfixed32) => {
                DecodeCategory::Fixed32
            }
            Self::Scalar(ScalarType::String | ScalarType::Bytes) | Self::Message { .. } => {
                DecodeCategory::LengthDelimited
            }
            Self::Scalar(_) | Self::Enum(_) => DecodeCategory::Varint,
        }
    }

    /// Rust type of a single element, `zero_copy` when the message is decoded
    fn element_type(&self, zero_copy: bool) -> String {
        match self {
            Self::Scalar(scalar) => match scalar {
                ScalarType::Float => "f32",
                ScalarType::Int32 | ScalarType::Sint32 | ScalarType::Sfixed32 => "i32",
                ScalarType::Int64 => "i64",
                ScalarType::Uint32 | ScalarType::Fixed32 => "u32",
                ScalarType::Uint64 => "u64",
                ScalarType::Bool => "bool",
                ScalarType::String if zero_copy => "&'a str",
                ScalarType::String => "String",
                ScalarType::Bytes if zero_copy => "&'a [u8]",
                ScalarType::Bytes => "Vec<u8>",
            }
            .to_string(),
            Self::Enum(name) => name.clone(),
            Self::Message {
                name,
                borrows: true,
            } => format!("{name}<'a>"),
            Self::Message { name, .. } => name.clone(),
        }
    }

    /// Expression turning the raw wire value into an element
    fn decode_expr(&self, field_id: u32) -> String {
        match self {
            Self::Scalar(scalar) => match scalar {
                ScalarType::Int32 => "value.as_i32()".into(),
                ScalarType::Int64 => "value.as_i64()".into(),
                ScalarType::Uint32 => "value.as_u32()".into(),
                ScalarType::Uint64 => "value.as_u64()".into(),
                ScalarType::Sint32 => "value.as_sint32()".into(),
                ScalarType::Bool => "value.as_bool()".into(),
                ScalarType::Fixed32 => "value".into(),
                ScalarType::Sfixed32 => "value as i32".into(),
                ScalarType::Float => "f32::from_bits(value)".into(),
                ScalarType::String => format!("decode_str({field_id}, value)?"),
                ScalarType::Bytes => "value".into(),
            },
            Self::Enum(name) => format!("{name}(value.as_u32())"),
            Self::Message { name, .. } => format!("{name}::decode(value)?"),
        }
    }

    /// Encoder call for `value`, which is a place for single fields and a
    /// reference for repeated elements
    fn encode_call(&self, field_id: u32, value: &str, by_ref: bool, force: bool) -> String {
        match self {
            Self::Scalar(scalar @ (ScalarType::String | ScalarType::Bytes)) => {
                let value = if by_ref { value.to_string() } else { format!("&{value}") };
                format!("buffer.encode_{}({field_id}, {value}, {force});", scalar.encoder())
            }
            Self::Scalar(scalar) => {
                let value = if by_ref { format!("*{value}") } else { value.to_string() };
                format!("buffer.encode_{}({field_id}, {value}, {force});", scalar.encoder())
            }
            Self::Enum(_) => format!("buffer.encode_enum({field_id}, {value}.0, {force});"),
            Self::Message { .. } => {
                let value = if by_ref { value.to_string() } else { format!("&{value}") };
                format!("buffer.encode_message({field_id}, {value}, {force});")
            }
        }
    }

    fn size_expr(&self, tag_size: usize, value: &str, by_ref: bool, force: bool) -> String {
        match self {
            Self::Scalar(ScalarType::String | ScalarType::Bytes) => {
                format!("ProtoSize::length_field({tag_size}, {value}.len(), {force})")
            }
            Self::Scalar(scalar) => {
                let value = if by_ref { format!("*{value}") } else { value.to_string() };
                format!(
                    "ProtoSize::{}({tag_size}, {value}, {force})",
                    scalar.size_estimator()
                )
            }
            Self::Enum(_) => format!("ProtoSize::uint32_field({tag_size}, {value}.0, {force})"),
            Self::Message { .. } => format!(
                "ProtoSize::length_field({tag_size}, {value}.calculate_size(), {force})"
            ),
        }
    }

    fn dump_call(&self, name: &str, value: &str) -> String {
        match self {
            Self::Message { .. } => format!("dump.message(\"{name}\", {value});"),
            _ => format!("dump.field(\"{name}\", {value});"),
        }
    }
}

/// Encoded size of the tag of field `field_id`
pub(crate) fn tag_size(field_id: u32) -> usize {
    let mut value = u64::from(field_id) << 3;
    let mut size = 1;
    while value >= 0x80 {
        value >>= 7;
        size += 1;
    }
    size
}

/// A resolved message field
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Field {
    pub descriptor: FieldDescriptor,
    pub ty: FieldType,
    pub shape: Shape,
}

impl Field {
    pub(crate) fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn number(&self) -> u32 {
        self.descriptor.number
    }

    /// `#[cfg(...)]` line of a field which only exists with a feature
    pub(crate) fn cfg(&self) -> Option<String> {
        self.descriptor
            .ifdef
            .as_ref()
            .map(|feature| format!("#[cfg(feature = \"{feature}\")]"))
    }

    /// Whether the field makes its message borrow from the receive buffer
    pub(crate) fn borrows(&self, decoded: bool) -> bool {
        match self.shape {
            Shape::PackedBuffer => true,
            _ => match &self.ty {
                FieldType::Message { borrows, .. } => *borrows,
                ty => decoded && ty.borrows(),
            },
        }
    }

    pub(crate) fn rust_type(&self, zero_copy: bool) -> String {
        let element = self.ty.element_type(zero_copy);
        match self.shape {
            Shape::Single => element,
            Shape::Repeated => format!("Vec<{element}>"),
            Shape::FixedArray(size) => format!("heapless::Vec<{element}, {size}>"),
            Shape::PackedBuffer => "super::message::PackedBuffer<'a>".into(),
        }
    }

    pub(crate) fn decode_category(&self) -> DecodeCategory {
        match self.shape {
            Shape::PackedBuffer => DecodeCategory::LengthDelimited,
            _ => self.ty.category(),
        }
    }

    /// Match arm storing a decoded value, `None` for encode only shapes
    pub(crate) fn decode_arm(&self) -> Option<String> {
        let number = self.number();
        let name = self.name();

        let arm = match self.shape {
            Shape::Single => format!("{number} => self.{name} = {},", self.ty.decode_expr(number)),
            Shape::Repeated => {
                format!("{number} => self.{name}.push({}),", self.ty.decode_expr(number))
            }
            Shape::PackedBuffer => {
                format!("{number} => self.{name} = super::message::PackedBuffer::new(value),")
            }
            Shape::FixedArray(_) => return None,
        };

        Some(arm)
    }

    pub(crate) fn encode_statement(&self) -> String {
        let number = self.number();
        let name = self.name();

        match self.shape {
            Shape::Single => self.ty.encode_call(number, &format!("self.{name}"), false, false),
            Shape::Repeated | Shape::FixedArray(_) => format!(
                "for item in &self.{name} {{\n{}\n}}",
                self.ty.encode_call(number, "item", true, true)
            ),
            Shape::PackedBuffer => {
                format!("buffer.encode_bytes({number}, self.{name}.as_bytes(), false);")
            }
        }
    }

    pub(crate) fn size_statement(&self) -> String {
        let tag_size = tag_size(self.number());
        let name = self.name();

        match self.shape {
            Shape::Single => format!(
                "size += {};",
                self.ty.size_expr(tag_size, &format!("self.{name}"), false, false)
            ),
            Shape::Repeated | Shape::FixedArray(_) => format!(
                "for item in &self.{name} {{\nsize += {};\n}}",
                self.ty.size_expr(tag_size, "item", true, true)
            ),
            Shape::PackedBuffer => format!(
                "size += ProtoSize::length_field({tag_size}, self.{name}.as_bytes().len(), false);"
            ),
        }
    }

    pub(crate) fn dump_statement(&self) -> String {
        let name = self.name();

        match self.shape {
            Shape::Single | Shape::PackedBuffer => {
                self.ty.dump_call(name, &format!("&self.{name}"))
            }
            Shape::Repeated | Shape::FixedArray(_) => format!(
                "for item in &self.{name} {{\n{}\n}}",
                self.ty.dump_call(name, "item")
            ),
        }
    }
}
