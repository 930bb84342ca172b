//! Generate the native API message types from `api.proto`
//!
//! The descriptor is parsed, validated and turned into two modules of the
//! `espota` crate: `messages.rs` with the message and enum types and
//! `service.rs` with the connection handler and its dispatch table.

use std::{
    collections::{HashMap, HashSet},
    fs,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
};

use clap::Args;
use log::info;
use thiserror::Error;

use self::{
    descriptor::{EnumDescriptor, MessageDescriptor, ProtoFile, Source},
    fields::{Field, FieldType, ScalarType, Shape, UNSUPPORTED_TYPES},
};
use crate::Result;

mod descriptor;
mod emit;
mod fields;

#[derive(Debug, Args)]
pub(crate) struct GenerateApiArgs {
    /// Protocol description, relative to the workspace
    #[arg(long, default_value = "espota/api.proto")]
    proto: PathBuf,
    /// Directory receiving `messages.rs` and `service.rs`, relative to the
    /// workspace
    #[arg(long, default_value = "espota/src/api")]
    out: PathBuf,
    /// Fail if the checked in modules differ from the generated ones instead
    /// of overwriting them
    #[arg(long)]
    check: bool,
}

/// Problems with the descriptor, all of them fatal
#[derive(Debug, Error)]
pub(crate) enum GeneratorError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: {construct} is not supported")]
    Unsupported { line: usize, construct: String },

    #[error("invalid value {value} for option `{option}` of `{owner}`")]
    InvalidOption {
        owner: String,
        option: String,
        value: String,
    },

    #[error("`{name}` is defined more than once")]
    DuplicateDefinition { name: String },

    #[error("field `{message}.{field}` has type `{type_name}`, 64-bit types are not supported")]
    UnsupportedType {
        message: String,
        field: String,
        type_name: String,
    },

    #[error("field `{message}.{field}` has unknown type `{type_name}`")]
    UnknownType {
        message: String,
        field: String,
        type_name: String,
    },

    #[error("field `{message}.{field}` is a fixed array, but `{message}` is decoded")]
    FixedArrayOnDecodable { message: String, field: String },

    #[error("field `{message}.{field}` is a fixed array, but not repeated")]
    FixedArrayNotRepeated { message: String, field: String },

    #[error("field `{message}.{field}` is a packed buffer, but `{message}` is never decoded")]
    PackedBufferOnEncodeOnly { message: String, field: String },

    #[error("field `{message}.{field}` is a packed buffer, but not a repeated varint number")]
    PackedBufferNotNumeric { message: String, field: String },

    #[error("message `{message}` has id {id}, ids must fit in a byte")]
    MessageIdTooLarge { message: String, id: u32 },

    #[error("messages `{first}` and `{second}` share the id {id}")]
    DuplicateMessageId {
        id: u32,
        first: String,
        second: String,
    },

    #[error("message `{message}` uses field number {number} more than once")]
    DuplicateFieldNumber { message: String, number: u32 },

    #[error("rustfmt failed to format the generated code: {stderr}")]
    Format { stderr: String },

    #[error("{} is out of date, run `cargo xtask generate-api`", .path.display())]
    Stale { path: PathBuf },
}

/// A validated descriptor, ready to be emitted
#[derive(Debug)]
pub(crate) struct Api {
    pub enums: Vec<EnumDescriptor>,
    pub messages: Vec<Message>,
}

#[derive(Debug)]
pub(crate) struct Message {
    pub descriptor: MessageDescriptor,
    pub source: Source,
    /// Declares a `'a` lifetime for borrowed fields
    pub borrows: bool,
    pub fields: Vec<Field>,
}

impl Message {
    pub(crate) fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// A handler is generated for messages the device receives in frames
    pub(crate) fn is_dispatched(&self) -> bool {
        self.descriptor.id.is_some() && self.source.decodes()
    }
}

impl Api {
    pub(crate) fn from_source(source: &str) -> std::result::Result<Self, GeneratorError> {
        Self::build(ProtoFile::parse(source)?)
    }

    fn build(file: ProtoFile) -> std::result::Result<Self, GeneratorError> {
        let mut names = HashSet::new();
        for name in file
            .enums
            .iter()
            .map(|e| &e.name)
            .chain(file.messages.iter().map(|m| &m.name))
        {
            if !names.insert(name.as_str()) {
                return Err(GeneratorError::DuplicateDefinition { name: name.clone() });
            }
        }

        let enums: HashSet<&str> = file.enums.iter().map(|e| e.name.as_str()).collect();
        let messages: HashSet<&str> = file.messages.iter().map(|m| m.name.as_str()).collect();
        let sources = file.resolve_sources();

        let mut resolved = Vec::with_capacity(file.messages.len());
        for descriptor in &file.messages {
            let source = sources
                .get(&descriptor.name)
                .copied()
                .unwrap_or(Source::Both);

            let fields = descriptor
                .fields
                .iter()
                .map(|field| resolve_field(descriptor, source, field, &enums, &messages))
                .collect::<std::result::Result<Vec<_>, _>>()?;

            resolved.push(Message {
                descriptor: descriptor.clone(),
                source,
                borrows: false,
                fields,
            });
        }

        resolve_lifetimes(&mut resolved);

        let api = Self {
            enums: file.enums,
            messages: resolved,
        };
        api.validate()?;

        Ok(api)
    }

    fn validate(&self) -> std::result::Result<(), GeneratorError> {
        let mut ids: HashMap<u32, &str> = HashMap::new();

        for message in &self.messages {
            if let Some(id) = message.descriptor.id {
                if id > u32::from(u8::MAX) {
                    return Err(GeneratorError::MessageIdTooLarge {
                        message: message.name().to_string(),
                        id,
                    });
                }
                if let Some(first) = ids.insert(id, message.name()) {
                    return Err(GeneratorError::DuplicateMessageId {
                        id,
                        first: first.to_string(),
                        second: message.name().to_string(),
                    });
                }
            }

            let mut numbers = HashSet::new();
            for field in &message.fields {
                if !numbers.insert(field.descriptor.number) {
                    return Err(GeneratorError::DuplicateFieldNumber {
                        message: message.name().to_string(),
                        number: field.descriptor.number,
                    });
                }
            }
        }

        Ok(())
    }
}

fn resolve_field(
    message: &MessageDescriptor,
    source: Source,
    field: &descriptor::FieldDescriptor,
    enums: &HashSet<&str>,
    messages: &HashSet<&str>,
) -> std::result::Result<Field, GeneratorError> {
    let message_name = || message.name.clone();
    let field_name = || field.name.clone();
    let type_name = field.type_name.as_str();

    if UNSUPPORTED_TYPES.contains(&type_name) {
        return Err(GeneratorError::UnsupportedType {
            message: message_name(),
            field: field_name(),
            type_name: type_name.to_string(),
        });
    }

    let ty = if let Some(scalar) = ScalarType::from_proto(type_name) {
        FieldType::Scalar(scalar)
    } else if enums.contains(type_name) {
        FieldType::Enum(type_name.to_string())
    } else if messages.contains(type_name) {
        FieldType::Message {
            name: type_name.to_string(),
            borrows: false,
        }
    } else {
        return Err(GeneratorError::UnknownType {
            message: message_name(),
            field: field_name(),
            type_name: type_name.to_string(),
        });
    };

    let shape = if field.packed_buffer {
        if !source.decodes() {
            return Err(GeneratorError::PackedBufferOnEncodeOnly {
                message: message_name(),
                field: field_name(),
            });
        }
        if !field.repeated || !ty.is_varint_number() {
            return Err(GeneratorError::PackedBufferNotNumeric {
                message: message_name(),
                field: field_name(),
            });
        }
        Shape::PackedBuffer
    } else if let Some(size) = field.fixed_array_size {
        if !field.repeated {
            return Err(GeneratorError::FixedArrayNotRepeated {
                message: message_name(),
                field: field_name(),
            });
        }
        if source.decodes() {
            return Err(GeneratorError::FixedArrayOnDecodable {
                message: message_name(),
                field: field_name(),
            });
        }
        Shape::FixedArray(size)
    } else if field.repeated {
        Shape::Repeated
    } else {
        Shape::Single
    };

    Ok(Field {
        descriptor: field.clone(),
        ty,
        shape,
    })
}

/// Work out which messages borrow from the receive buffer
///
/// Decoded messages with string, bytes or packed buffer fields borrow, as
/// does every message embedding a borrowing message.
fn resolve_lifetimes(messages: &mut [Message]) {
    let mut changed = true;
    while changed {
        changed = false;

        let borrowing: HashSet<String> = messages
            .iter()
            .filter(|message| message.borrows)
            .map(|message| message.name().to_string())
            .collect();

        for message in messages.iter_mut() {
            for field in &mut message.fields {
                if let FieldType::Message { name, borrows } = &mut field.ty {
                    if !*borrows && borrowing.contains(name.as_str()) {
                        *borrows = true;
                        changed = true;
                    }
                }
            }

            let decoded = message.source.decodes();
            if !message.borrows && message.fields.iter().any(|field| field.borrows(decoded)) {
                message.borrows = true;
                changed = true;
            }
        }
    }
}

pub(crate) fn generate_api(workspace: &Path, args: GenerateApiArgs) -> Result<()> {
    let out_dir = workspace.join(&args.out);

    for (file, contents) in render(workspace, &args.proto)? {
        let path = out_dir.join(file);

        if args.check {
            if fs::read_to_string(&path)? != contents {
                return Err(GeneratorError::Stale { path }.into());
            }
            info!("{} is up to date", path.display());
        } else {
            fs::write(&path, contents)?;
            info!("Wrote {}", path.display());
        }
    }

    Ok(())
}

/// Formatted `messages.rs` and `service.rs` for the descriptor at `proto`
fn render(workspace: &Path, proto: &Path) -> Result<[(&'static str, String); 2]> {
    let proto_path = workspace.join(proto);

    let source = fs::read_to_string(&proto_path)?;
    let api = Api::from_source(&source)
        .map_err(|error| format!("{}: {error}", proto_path.display()))?;

    let origin = proto.display().to_string().replace('\\', "/");

    Ok([
        (
            "messages.rs",
            format_source(workspace, emit::messages(&api, &origin))?,
        ),
        (
            "service.rs",
            format_source(workspace, emit::service(&api, &origin))?,
        ),
    ])
}

/// Run `source` through rustfmt with the settings of the `espota` crate
fn format_source(workspace: &Path, source: String) -> Result<String> {
    let mut child = Command::new("rustfmt")
        .args(["--edition", "2021"])
        .current_dir(workspace)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Feed stdin from another thread, the output may not fit in the pipe
    let mut stdin = child.stdin.take().ok_or("rustfmt has no stdin")?;
    let writer = thread::spawn(move || stdin.write_all(source.as_bytes()));

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(GeneratorError::Format {
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    writer
        .join()
        .map_err(|_| "writing to rustfmt panicked")??;

    Ok(String::from_utf8(output.stdout)?)
}
