//! Emit the generated modules
//!
//! The output is valid but only roughly indented Rust, it is run through
//! rustfmt before being written.

use super::{
    descriptor::EnumDescriptor,
    fields::{DecodeCategory, Field},
    Api,
    Message,
};

const HEADER: &str = "\
// This file is automatically generated from `$ORIGIN` by
// `cargo xtask generate-api`, please do not edit it by hand.
";

/// Line oriented code buffer
#[derive(Debug, Default)]
struct Code {
    out: String,
    indent: usize,
}

impl Code {
    fn line(&mut self, line: impl AsRef<str>) {
        for line in line.as_ref().lines() {
            if !line.is_empty() {
                self.out.push_str(&"    ".repeat(self.indent));
            }
            self.out.push_str(line);
            self.out.push('\n');
        }
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self, line: impl AsRef<str>) {
        self.line(line);
        self.indent += 1;
    }

    fn close(&mut self, line: impl AsRef<str>) {
        self.indent = self.indent.saturating_sub(1);
        self.line(line);
    }

    fn docs(&mut self, docs: &[String]) {
        for doc in docs {
            if doc.is_empty() {
                self.line("///");
            } else {
                self.line(format!("/// {doc}"));
            }
        }
    }

    fn attribute(&mut self, attribute: Option<&str>) {
        if let Some(attribute) = attribute {
            self.line(attribute);
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

fn header(origin: &str) -> String {
    HEADER.replace("$ORIGIN", origin)
}

/// `HelloRequest` becomes `hello_request`
pub(crate) fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut snake = String::with_capacity(name.len() + 8);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let previous = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if previous.is_ascii_lowercase()
                || previous.is_ascii_digit()
                || (previous.is_ascii_uppercase() && next_is_lower)
            {
                snake.push('_');
            }
        }
        snake.push(c.to_ascii_lowercase());
    }

    snake
}

/// Common `PREFIX_` of all value names, empty when stripping it would leave
/// an invalid or empty name
fn enum_prefix(descriptor: &EnumDescriptor) -> String {
    let Some(first) = descriptor.values.first() else {
        return String::new();
    };

    let mut prefix = first.name.as_str();
    for value in &descriptor.values[1..] {
        let common = prefix
            .chars()
            .zip(value.name.chars())
            .take_while(|(a, b)| a == b)
            .count();
        prefix = &prefix[..common];
    }

    let prefix = match prefix.rfind('_') {
        Some(index) => &prefix[..=index],
        None => "",
    };

    let valid = descriptor.values.iter().all(|value| {
        value.name[prefix.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
    });

    if valid {
        prefix.to_string()
    } else {
        String::new()
    }
}

fn feature_cfg(feature: Option<&String>) -> Option<String> {
    feature.map(|feature| format!("#[cfg(feature = \"{feature}\")]"))
}

fn dump_cfg(feature: Option<&String>) -> String {
    match feature {
        Some(feature) => format!("#[cfg(all(feature = \"{feature}\", feature = \"dump\"))]"),
        None => "#[cfg(feature = \"dump\")]".to_string(),
    }
}

// ----------------------------------------------------------------------------
// messages.rs

pub(crate) fn messages(api: &Api, origin: &str) -> String {
    let mut code = Code::default();

    code.line(header(origin));
    code.blank();
    code.line("#[cfg(feature = \"dump\")]");
    code.line("use super::message::{Dump, DumpValue, MessageDump};");
    code.open("use super::{");
    code.line("message::{decode_str, Decode, Encode, MessageInfo},");
    code.line("wire::{DecodeError, ProtoSize, ProtoVarInt, ProtoWriter},");
    code.close("};");

    for descriptor in &api.enums {
        code.blank();
        emit_enum(&mut code, descriptor);
    }

    for message in &api.messages {
        code.blank();
        emit_message(&mut code, message);
    }

    code.finish()
}

fn emit_enum(code: &mut Code, descriptor: &EnumDescriptor) {
    let name = &descriptor.name;
    let prefix = enum_prefix(descriptor);

    code.docs(&descriptor.docs);
    code.line("#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]");
    code.line(format!("pub struct {name}(pub u32);"));
    code.blank();

    code.open(format!("impl {name} {{"));
    for value in &descriptor.values {
        code.docs(&value.docs);
        code.line(format!(
            "pub const {}: Self = Self({});",
            &value.name[prefix.len()..],
            value.number
        ));
    }
    code.blank();
    code.line("/// Descriptor name of a known value");
    code.open("pub fn name(self) -> Option<&'static str> {");
    code.open("match self.0 {");
    let mut seen = Vec::new();
    for value in &descriptor.values {
        // Aliases share a number, the first name wins
        if seen.contains(&value.number) {
            continue;
        }
        seen.push(value.number);
        code.line(format!("{} => Some(\"{}\"),", value.number, value.name));
    }
    code.line("_ => None,");
    code.close("}");
    code.close("}");
    code.close("}");
    code.blank();

    code.line("#[cfg(feature = \"dump\")]");
    code.open(format!("impl DumpValue for {name} {{"));
    code.open("fn dump_value(&self, out: &mut String) {");
    code.open("match self.name() {");
    code.line("Some(name) => out.push_str(name),");
    code.line("None => out.push_str(&format!(\"UNKNOWN({})\", self.0)),");
    code.close("}");
    code.close("}");
    code.close("}");
}

fn emit_message(code: &mut Code, message: &Message) {
    let name = message.name();
    let ifdef = message.descriptor.ifdef.as_ref();
    let cfg = feature_cfg(ifdef);
    let cfg = cfg.as_deref();
    let type_ref = if message.borrows {
        format!("{name}<'_>")
    } else {
        name.to_string()
    };

    code.docs(&message.descriptor.docs);
    code.attribute(cfg);
    code.line("#[derive(Clone, Debug, Default, PartialEq)]");
    if message.fields.is_empty() {
        code.line(format!("pub struct {name};"));
    } else {
        let generics = if message.borrows { "<'a>" } else { "" };
        code.open(format!("pub struct {name}{generics} {{"));
        let zero_copy = message.source.decodes();
        for field in &message.fields {
            code.docs(&field.descriptor.docs);
            code.attribute(field.cfg().as_deref());
            code.line(format!(
                "pub {}: {},",
                field.name(),
                field.rust_type(zero_copy)
            ));
        }
        code.close("}");
    }

    if let Some(id) = message.descriptor.id {
        code.blank();
        code.attribute(cfg);
        code.open(format!("impl MessageInfo for {type_ref} {{"));
        code.line(format!("const MESSAGE_TYPE: u8 = {id};"));
        code.line(format!(
            "const MESSAGE_NAME: &'static str = \"{}\";",
            snake_case(name)
        ));
        if message.descriptor.no_delay {
            code.line("const NO_DELAY: bool = true;");
        }
        code.close("}");
    }

    if message.source.encodes() {
        code.blank();
        code.attribute(cfg);
        emit_encode(code, message, &type_ref);
    }

    if message.source.decodes() {
        code.blank();
        code.attribute(cfg);
        emit_decode(code, message);
    }

    code.blank();
    code.line(dump_cfg(ifdef));
    emit_dump(code, message, &type_ref);
}

fn emit_encode(code: &mut Code, message: &Message, type_ref: &str) {
    code.open(format!("impl Encode for {type_ref} {{"));

    if message.fields.is_empty() {
        code.line("fn encode(&self, _buffer: &mut ProtoWriter<'_>) {}");
        code.blank();
        code.open("fn calculate_size(&self) -> usize {");
        code.line("0");
        code.close("}");
        code.close("}");
        return;
    }

    code.open("fn encode(&self, buffer: &mut ProtoWriter<'_>) {");
    for field in &message.fields {
        code.attribute(field.cfg().as_deref());
        code.line(field.encode_statement());
    }
    code.close("}");
    code.blank();

    code.open("fn calculate_size(&self) -> usize {");
    code.line("let mut size = 0;");
    for field in &message.fields {
        match field.cfg() {
            // Compound assignments cannot carry attributes
            Some(cfg) => {
                code.line(cfg);
                code.open("{");
                code.line(field.size_statement());
                code.close("}");
            }
            None => code.line(field.size_statement()),
        }
    }
    code.line("size");
    code.close("}");

    code.close("}");
}

fn emit_decode(code: &mut Code, message: &Message) {
    let name = message.name();
    let sections = [
        (
            DecodeCategory::Varint,
            "fn decode_varint(&mut self, field_id: u32, value: ProtoVarInt) -> bool {",
            "_ => return false,",
            "true",
        ),
        (
            DecodeCategory::LengthDelimited,
            "fn decode_length(&mut self, field_id: u32, value: &'a [u8]) -> Result<bool, DecodeError> {",
            "_ => return Ok(false),",
            "Ok(true)",
        ),
        (
            DecodeCategory::Fixed32,
            "fn decode_32bit(&mut self, field_id: u32, value: u32) -> bool {",
            "_ => return false,",
            "true",
        ),
    ];

    let arms = |category: DecodeCategory| {
        message
            .fields
            .iter()
            .filter(|field| field.decode_category() == category && field.decode_arm().is_some())
            .collect::<Vec<&Field>>()
    };

    let has_length_fields = !arms(DecodeCategory::LengthDelimited).is_empty();
    let header = if message.borrows {
        format!("impl<'a> Decode<'a> for {name}<'a>")
    } else if has_length_fields {
        format!("impl<'a> Decode<'a> for {name}")
    } else {
        format!("impl Decode<'_> for {name}")
    };

    if sections.iter().all(|(category, ..)| arms(*category).is_empty()) {
        code.line(format!("{header} {{}}"));
        return;
    }

    code.open(format!("{header} {{"));
    let mut first = true;
    for (category, signature, fallback, result) in sections {
        let fields = arms(category);
        if fields.is_empty() {
            continue;
        }
        if !first {
            code.blank();
        }
        first = false;

        code.open(signature);
        code.open("match field_id {");
        for field in fields {
            code.attribute(field.cfg().as_deref());
            if let Some(arm) = field.decode_arm() {
                code.line(arm);
            }
        }
        code.line(fallback);
        code.close("}");
        code.line(result);
        code.close("}");
    }
    code.close("}");
}

fn emit_dump(code: &mut Code, message: &Message, type_ref: &str) {
    let name = message.name();

    code.open(format!("impl Dump for {type_ref} {{"));
    code.open("fn dump_to(&self, out: &mut String) {");
    if message.fields.is_empty() {
        code.line(format!("out.push_str(\"{name} {{}}\");"));
    } else {
        code.line(format!(
            "let mut dump = MessageDump::begin(out, \"{name}\");"
        ));
        for field in &message.fields {
            code.attribute(field.cfg().as_deref());
            code.line(field.dump_statement());
        }
        code.line("dump.finish();");
    }
    code.close("}");
    code.close("}");
}

// ----------------------------------------------------------------------------
// service.rs

pub(crate) fn service(api: &Api, origin: &str) -> String {
    let dispatched: Vec<&Message> = api
        .messages
        .iter()
        .filter(|message| message.is_dispatched())
        .collect();

    let mut code = Code::default();

    code.line(header(origin));
    code.blank();
    code.line("use log::trace;");
    code.blank();
    code.line("#[cfg(feature = \"dump\")]");
    code.line("use super::message::Dump;");
    code.open("use super::{");
    code.line("dispatch::{ConnectionState, DispatchPolicy},");
    code.line("message::Decode,");
    code.line("messages::*,");
    code.line("wire::DecodeError,");
    code.close("};");
    code.blank();

    code.line("/// Handlers for every message a client can send");
    code.line("///");
    code.line("/// All handlers default to doing nothing.");
    code.open("pub trait ApiConnectionHandler: ConnectionState {");
    for (i, message) in dispatched.iter().enumerate() {
        if i > 0 {
            code.blank();
        }
        let type_ref = if message.borrows {
            format!("{}<'_>", message.name())
        } else {
            message.name().to_string()
        };
        code.attribute(feature_cfg(message.descriptor.ifdef.as_ref()).as_deref());
        code.line(format!(
            "fn on_{}(&mut self, _message: &{type_ref}) {{}}",
            snake_case(message.name())
        ));
    }
    code.close("}");
    code.blank();

    code.line("/// Connection requirements of a message a client can send");
    code.line("///");
    code.line("/// Returns `None` for message types which are never dispatched.");
    code.open("pub fn dispatch_policy(message_type: u16) -> Option<DispatchPolicy> {");
    code.open("let policy = match message_type {");
    for message in &dispatched {
        let descriptor = &message.descriptor;
        let id = descriptor.id.unwrap_or_default();
        code.attribute(feature_cfg(descriptor.ifdef.as_ref()).as_deref());
        code.open(format!("{id} => DispatchPolicy {{"));
        code.line(format!(
            "needs_setup_connection: {},",
            descriptor.needs_setup_connection
        ));
        code.line(format!(
            "needs_authentication: {},",
            descriptor.needs_authentication
        ));
        code.close("},");
    }
    code.line("_ => return None,");
    code.close("};");
    code.blank();
    code.line("Some(policy)");
    code.close("}");
    code.blank();

    code.line("/// Decode `data` as a message of `message_type` and pass it to `handler`");
    code.line("///");
    code.line("/// Unknown message types and messages rejected by their dispatch policy are");
    code.line("/// dropped. Returns `true` when a handler was invoked.");
    code.open("pub fn read_message<H: ApiConnectionHandler + ?Sized>(");
    code.line("handler: &mut H,");
    code.line("message_type: u16,");
    code.line("data: &[u8],");
    code.close(") -> Result<bool, DecodeError> {");
    code.indent += 1;
    code.open("let Some(policy) = dispatch_policy(message_type) else {");
    code.line("trace!(\"Ignoring message of unknown type {message_type}\");");
    code.line("return Ok(false);");
    code.close("};");
    code.blank();
    code.open("if !policy.permits(handler) {");
    code.line("return Ok(false);");
    code.close("}");
    code.blank();
    code.open("match message_type {");
    for message in &dispatched {
        let descriptor = &message.descriptor;
        let id = descriptor.id.unwrap_or_default();
        let handler = format!("on_{}", snake_case(message.name()));
        code.attribute(feature_cfg(descriptor.ifdef.as_ref()).as_deref());
        code.open(format!("{id} => {{"));
        code.line(format!("let message = {}::decode(data)?;", message.name()));
        code.line("#[cfg(feature = \"dump\")]");
        code.line(format!("trace!(\"{handler}: {{}}\", message.dump());"));
        code.line(format!("handler.{handler}(&message);"));
        code.close("}");
    }
    code.line("_ => return Ok(false),");
    code.close("}");
    code.blank();
    code.line("Ok(true)");
    code.close("}");

    code.finish()
}
