//! Parser for the protobuf subset used to describe the native API
//!
//! Only what `api.proto` needs is understood: `syntax`, `import`, `package`
//! and file level `option` statements are accepted and ignored, `service`
//! blocks are skipped, and `enum` and `message` definitions are parsed along
//! with their options. Nested definitions, `oneof` and `map` fields are
//! rejected.
//!
//! Line comments placed directly above a definition, a field or an enum value
//! become its documentation.

use std::collections::HashMap;

use log::debug;

use super::GeneratorError;

/// Which side of the connection sends a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Source {
    Both,
    Server,
    Client,
}

impl Source {
    fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "SOURCE_BOTH" => Some(Self::Both),
            "SOURCE_SERVER" => Some(Self::Server),
            "SOURCE_CLIENT" => Some(Self::Client),
            _ => None,
        }
    }

    /// The device writes messages from this source
    pub(crate) fn encodes(self) -> bool {
        matches!(self, Self::Both | Self::Server)
    }

    /// The device reads messages from this source
    pub(crate) fn decodes(self) -> bool {
        matches!(self, Self::Both | Self::Client)
    }

    fn union(self, other: Self) -> Self {
        if self == other { self } else { Self::Both }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProtoFile {
    pub enums: Vec<EnumDescriptor>,
    pub messages: Vec<MessageDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EnumDescriptor {
    pub name: String,
    pub docs: Vec<String>,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EnumValue {
    pub name: String,
    pub docs: Vec<String>,
    pub number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MessageDescriptor {
    pub name: String,
    pub docs: Vec<String>,
    pub id: Option<u32>,
    /// Explicit `source` option, see [ProtoFile::resolve_sources]
    pub source: Option<Source>,
    pub no_delay: bool,
    pub needs_setup_connection: bool,
    pub needs_authentication: bool,
    pub ifdef: Option<String>,
    pub base_class: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl MessageDescriptor {
    fn new(name: String, docs: Vec<String>) -> Self {
        Self {
            name,
            docs,
            id: None,
            source: None,
            no_delay: false,
            needs_setup_connection: true,
            needs_authentication: true,
            ifdef: None,
            base_class: None,
            fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldDescriptor {
    pub name: String,
    pub docs: Vec<String>,
    pub number: u32,
    pub repeated: bool,
    pub type_name: String,
    pub fixed_array_size: Option<usize>,
    pub packed_buffer: bool,
    pub ifdef: Option<String>,
}

impl ProtoFile {
    pub(crate) fn parse(source: &str) -> Result<Self, GeneratorError> {
        Parser::new(tokenize(source)?).parse_file()
    }

    pub(crate) fn message(&self, name: &str) -> Option<&MessageDescriptor> {
        self.messages.iter().find(|message| message.name == name)
    }

    /// Work out the source of every message
    ///
    /// Messages without a `source` option take the union of the sources of
    /// all messages embedding them, repeated until nothing changes. Messages
    /// which end up with no source at all default to [Source::Both].
    pub(crate) fn resolve_sources(&self) -> HashMap<String, Source> {
        let mut sources: HashMap<String, Source> = self
            .messages
            .iter()
            .filter_map(|message| Some((message.name.clone(), message.source?)))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;

            for message in &self.messages {
                let Some(&source) = sources.get(&message.name) else {
                    continue;
                };

                for field in &message.fields {
                    let Some(embedded) = self.message(&field.type_name) else {
                        continue;
                    };
                    if embedded.source.is_some() {
                        continue;
                    }

                    let merged = match sources.get(&embedded.name) {
                        Some(current) => current.union(source),
                        None => source,
                    };
                    if sources.insert(embedded.name.clone(), merged) != Some(merged) {
                        changed = true;
                    }
                }
            }
        }

        for message in &self.messages {
            sources.entry(message.name.clone()).or_insert(Source::Both);
        }

        sources
    }
}

// ----------------------------------------------------------------------------
// Tokenizer

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Int(i64),
    Str(String),
    Symbol(char),
    /// A `//` comment, `own_line` when nothing precedes it on its line
    Comment { text: String, own_line: bool },
}

#[derive(Debug, Clone, PartialEq)]
struct Spanned {
    token: Token,
    line: usize,
}

fn tokenize(source: &str) -> Result<Vec<Spanned>, GeneratorError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1;
    let mut line_has_tokens = false;

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                chars.next();
                line += 1;
                line_has_tokens = false;
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '/' => {
                chars.next();
                match chars.next() {
                    Some('/') => {
                        let mut text = String::new();
                        while let Some(&c) = chars.peek() {
                            if c == '\n' {
                                break;
                            }
                            text.push(c);
                            chars.next();
                        }
                        let text = text.strip_prefix(' ').unwrap_or(&text).trim_end();
                        tokens.push(Spanned {
                            token: Token::Comment {
                                text: text.to_string(),
                                own_line: !line_has_tokens,
                            },
                            line,
                        });
                    }
                    Some('*') => {
                        let mut previous = '\0';
                        loop {
                            match chars.next() {
                                Some('/') if previous == '*' => break,
                                Some(c) => {
                                    if c == '\n' {
                                        line += 1;
                                        line_has_tokens = false;
                                    }
                                    previous = c;
                                }
                                None => {
                                    return Err(GeneratorError::Syntax {
                                        line,
                                        message: "unterminated block comment".into(),
                                    });
                                }
                            }
                        }
                    }
                    _ => {
                        return Err(GeneratorError::Syntax {
                            line,
                            message: "unexpected `/`".into(),
                        });
                    }
                }
            }
            '"' | '\'' => {
                let quote = c;
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some(c) if c == quote => break,
                        Some('\\') => match chars.next() {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some(c) => value.push(c),
                            None => break,
                        },
                        Some('\n') | None => {
                            return Err(GeneratorError::Syntax {
                                line,
                                message: "unterminated string literal".into(),
                            });
                        }
                        Some(c) => value.push(c),
                    }
                }
                tokens.push(Spanned {
                    token: Token::Str(value),
                    line,
                });
                line_has_tokens = true;
            }
            c if c.is_ascii_digit() || c == '-' => {
                let mut literal = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '-' {
                        literal.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Spanned {
                    token: Token::Int(parse_int(&literal).ok_or_else(|| {
                        GeneratorError::Syntax {
                            line,
                            message: format!("invalid integer `{literal}`"),
                        }
                    })?),
                    line,
                });
                line_has_tokens = true;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Spanned {
                    token: Token::Ident(ident),
                    line,
                });
                line_has_tokens = true;
            }
            '{' | '}' | '(' | ')' | '[' | ']' | '<' | '>' | ';' | '=' | ',' | '.' => {
                chars.next();
                tokens.push(Spanned {
                    token: Token::Symbol(c),
                    line,
                });
                line_has_tokens = true;
            }
            c => {
                return Err(GeneratorError::Syntax {
                    line,
                    message: format!("unexpected character `{c}`"),
                });
            }
        }
    }

    Ok(tokens)
}

fn parse_int(literal: &str) -> Option<i64> {
    let (negative, digits) = match literal.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, literal),
    };

    let value = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };

    Some(if negative { -value } else { value })
}

// ----------------------------------------------------------------------------
// Parser

#[derive(Debug, Clone, PartialEq)]
enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Ident(String),
}

struct Parser {
    tokens: Vec<Spanned>,
    position: usize,
    /// Own-line comments seen since the last definition
    comments: Vec<(usize, String)>,
}

impl Parser {
    fn new(tokens: Vec<Spanned>) -> Self {
        Self {
            tokens,
            position: 0,
            comments: Vec::new(),
        }
    }

    fn skip_comments(&mut self) {
        while let Some(Spanned {
            token: Token::Comment { text, own_line },
            line,
        }) = self.tokens.get(self.position)
        {
            if *own_line {
                self.comments.push((*line, text.clone()));
            }
            self.position += 1;
        }
    }

    fn peek(&mut self) -> Option<&Spanned> {
        self.skip_comments();
        self.tokens.get(self.position)
    }

    fn line(&mut self) -> usize {
        match self.peek() {
            Some(spanned) => spanned.line,
            None => self.tokens.last().map_or(1, |spanned| spanned.line),
        }
    }

    fn next(&mut self) -> Result<Spanned, GeneratorError> {
        self.skip_comments();
        let line = self.line();
        let spanned = self
            .tokens
            .get(self.position)
            .cloned()
            .ok_or_else(|| GeneratorError::Syntax {
                line,
                message: "unexpected end of file".into(),
            })?;
        self.position += 1;
        Ok(spanned)
    }

    fn error<T>(&self, line: usize, message: impl Into<String>) -> Result<T, GeneratorError> {
        Err(GeneratorError::Syntax {
            line,
            message: message.into(),
        })
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<(), GeneratorError> {
        let spanned = self.next()?;
        match spanned.token {
            Token::Symbol(c) if c == symbol => Ok(()),
            other => self.error(spanned.line, format!("expected `{symbol}`, found {other:?}")),
        }
    }

    fn expect_ident(&mut self) -> Result<String, GeneratorError> {
        let spanned = self.next()?;
        match spanned.token {
            Token::Ident(ident) => Ok(ident),
            other => self.error(spanned.line, format!("expected identifier, found {other:?}")),
        }
    }

    fn expect_str(&mut self) -> Result<String, GeneratorError> {
        let spanned = self.next()?;
        match spanned.token {
            Token::Str(value) => Ok(value),
            other => self.error(spanned.line, format!("expected string, found {other:?}")),
        }
    }

    fn expect_int(&mut self) -> Result<i64, GeneratorError> {
        let spanned = self.next()?;
        match spanned.token {
            Token::Int(value) => Ok(value),
            other => self.error(spanned.line, format!("expected integer, found {other:?}")),
        }
    }

    fn next_is_symbol(&mut self, symbol: char) -> bool {
        matches!(self.peek(), Some(Spanned { token: Token::Symbol(c), .. }) if *c == symbol)
    }

    /// Documentation for a definition starting on `line`
    ///
    /// Only the run of comments on the lines immediately above counts, a
    /// blank line separates section headers from documentation.
    fn take_docs(&mut self, line: usize) -> Vec<String> {
        let mut docs = Vec::new();
        let mut expected = line;
        while let Some((comment_line, _)) = self.comments.last() {
            if *comment_line + 1 != expected {
                break;
            }
            expected = *comment_line;
            if let Some((_, text)) = self.comments.pop() {
                docs.push(text);
            }
        }
        self.comments.clear();
        docs.reverse();
        docs
    }

    fn parse_file(&mut self) -> Result<ProtoFile, GeneratorError> {
        let mut file = ProtoFile {
            enums: Vec::new(),
            messages: Vec::new(),
        };

        while self.peek().is_some() {
            let line = self.line();
            let docs = self.take_docs(line);
            let keyword = self.expect_ident()?;

            match keyword.as_str() {
                "syntax" => {
                    self.expect_symbol('=')?;
                    let syntax = self.expect_str()?;
                    if syntax != "proto3" {
                        return self.error(line, format!("unsupported syntax `{syntax}`"));
                    }
                    self.expect_symbol(';')?;
                }
                "import" => {
                    if matches!(self.peek(), Some(Spanned { token: Token::Ident(_), .. })) {
                        self.expect_ident()?;
                    }
                    let import = self.expect_str()?;
                    debug!("Ignoring import of {import}");
                    self.expect_symbol(';')?;
                }
                "package" => {
                    self.expect_ident()?;
                    self.expect_symbol(';')?;
                }
                "option" => {
                    let (name, _) = self.parse_option()?;
                    debug!("Ignoring file option {name}");
                    self.expect_symbol(';')?;
                }
                "enum" => file.enums.push(self.parse_enum(docs)?),
                "message" => file.messages.push(self.parse_message(docs)?),
                "service" => {
                    self.expect_ident()?;
                    self.skip_block()?;
                }
                other => return self.error(line, format!("unexpected `{other}`")),
            }
        }

        Ok(file)
    }

    fn skip_block(&mut self) -> Result<(), GeneratorError> {
        self.expect_symbol('{')?;
        let mut depth = 1;
        while depth > 0 {
            match self.next()?.token {
                Token::Symbol('{') => depth += 1,
                Token::Symbol('}') => depth -= 1,
                _ => {}
            }
        }
        self.comments.clear();
        Ok(())
    }

    fn skip_statement(&mut self) -> Result<(), GeneratorError> {
        while self.next()?.token != Token::Symbol(';') {}
        Ok(())
    }

    /// `name = value` of an option, custom option names are unwrapped
    fn parse_option(&mut self) -> Result<(String, OptionValue), GeneratorError> {
        let name = if self.next_is_symbol('(') {
            self.expect_symbol('(')?;
            let name = self.expect_ident()?;
            self.expect_symbol(')')?;
            let name = name.rsplit('.').next().unwrap_or(&name).to_string();
            if self.next_is_symbol('.') {
                self.expect_symbol('.')?;
                format!("{name}.{}", self.expect_ident()?)
            } else {
                name
            }
        } else {
            self.expect_ident()?
        };

        self.expect_symbol('=')?;

        let value = match self.next()?.token {
            Token::Str(value) => OptionValue::Str(value),
            Token::Int(value) => OptionValue::Int(value),
            Token::Ident(ident) if ident == "true" => OptionValue::Bool(true),
            Token::Ident(ident) if ident == "false" => OptionValue::Bool(false),
            Token::Ident(ident) => OptionValue::Ident(ident),
            other => {
                let line = self.line();
                return self.error(line, format!("invalid value for option `{name}`: {other:?}"));
            }
        };

        Ok((name, value))
    }

    fn parse_enum(&mut self, docs: Vec<String>) -> Result<EnumDescriptor, GeneratorError> {
        let name = self.expect_ident()?;
        let mut values = Vec::new();

        self.expect_symbol('{')?;
        loop {
            let line = self.line();
            let docs = self.take_docs(line);
            let spanned = self.next()?;

            match spanned.token {
                Token::Symbol('}') => break,
                Token::Symbol(';') => {}
                Token::Ident(ident) if ident == "option" => {
                    self.parse_option()?;
                    self.expect_symbol(';')?;
                }
                Token::Ident(ident) if ident == "reserved" => self.skip_statement()?,
                Token::Ident(value_name) => {
                    self.expect_symbol('=')?;
                    let number = self.expect_int()?;
                    let number = u32::try_from(number).or_else(|_| {
                        self.error(line, format!("negative value for `{name}.{value_name}`"))
                    })?;
                    if self.next_is_symbol('[') {
                        self.parse_field_options(&name, &value_name)?;
                    }
                    self.expect_symbol(';')?;

                    values.push(EnumValue {
                        name: value_name,
                        docs,
                        number,
                    });
                }
                other => {
                    return self.error(spanned.line, format!("unexpected {other:?} in enum"));
                }
            }
        }

        self.comments.clear();

        Ok(EnumDescriptor { name, docs, values })
    }

    fn parse_message(&mut self, docs: Vec<String>) -> Result<MessageDescriptor, GeneratorError> {
        let mut message = MessageDescriptor::new(self.expect_ident()?, docs);

        self.expect_symbol('{')?;
        loop {
            let line = self.line();
            let docs = self.take_docs(line);
            let spanned = self.next()?;

            let keyword = match spanned.token {
                Token::Symbol('}') => break,
                Token::Symbol(';') => continue,
                Token::Ident(keyword) => keyword,
                other => {
                    return self.error(spanned.line, format!("unexpected {other:?} in message"));
                }
            };

            match keyword.as_str() {
                "option" => {
                    let (name, value) = self.parse_option()?;
                    apply_message_option(&mut message, &name, value)?;
                    self.expect_symbol(';')?;
                }
                "reserved" => self.skip_statement()?,
                "message" | "enum" | "oneof" | "map" | "optional" | "required" | "extend"
                | "extensions" | "group" => {
                    return Err(GeneratorError::Unsupported {
                        line,
                        construct: format!("`{keyword}` in message `{}`", message.name),
                    });
                }
                _ => {
                    let (repeated, type_name) = if keyword == "repeated" {
                        (true, self.expect_ident()?)
                    } else {
                        (false, keyword)
                    };
                    if self.next_is_symbol('<') {
                        return Err(GeneratorError::Unsupported {
                            line,
                            construct: format!("generic field type in message `{}`", message.name),
                        });
                    }

                    let field = self.parse_field(&message.name, docs, repeated, type_name)?;
                    message.fields.push(field);
                }
            }
        }

        self.comments.clear();

        Ok(message)
    }

    fn parse_field(
        &mut self,
        message: &str,
        docs: Vec<String>,
        repeated: bool,
        type_name: String,
    ) -> Result<FieldDescriptor, GeneratorError> {
        let name = self.expect_ident()?;
        self.expect_symbol('=')?;
        let line = self.line();
        let number = self.expect_int()?;
        let number = u32::try_from(number)
            .ok()
            .filter(|number| (1..(1 << 29)).contains(number))
            .map_or_else(
                || self.error(line, format!("invalid field number {number} for `{message}.{name}`")),
                Ok,
            )?;

        let mut field = FieldDescriptor {
            name,
            docs,
            number,
            repeated,
            type_name,
            fixed_array_size: None,
            packed_buffer: false,
            ifdef: None,
        };

        if self.next_is_symbol('[') {
            for (option, value) in self.parse_field_options(message, &field.name)? {
                apply_field_option(message, &mut field, &option, value)?;
            }
        }
        self.expect_symbol(';')?;

        Ok(field)
    }

    fn parse_field_options(
        &mut self,
        message: &str,
        field: &str,
    ) -> Result<Vec<(String, OptionValue)>, GeneratorError> {
        let mut options = Vec::new();

        self.expect_symbol('[')?;
        loop {
            options.push(self.parse_option()?);
            if self.next_is_symbol(',') {
                self.expect_symbol(',')?;
            } else {
                break;
            }
        }
        self.expect_symbol(']')?;

        debug!("Options of {message}.{field}: {options:?}");

        Ok(options)
    }
}

fn invalid_option(owner: &str, option: &str, value: &OptionValue) -> GeneratorError {
    GeneratorError::InvalidOption {
        owner: owner.to_string(),
        option: option.to_string(),
        value: format!("{value:?}"),
    }
}

fn apply_message_option(
    message: &mut MessageDescriptor,
    option: &str,
    value: OptionValue,
) -> Result<(), GeneratorError> {
    match (option, value) {
        ("id", OptionValue::Int(id)) if id >= 0 => {
            message.id = u32::try_from(id).ok();
        }
        ("source", OptionValue::Ident(ref ident)) if Source::from_ident(ident).is_some() => {
            message.source = Source::from_ident(ident);
        }
        ("no_delay", OptionValue::Bool(value)) => message.no_delay = value,
        ("needs_setup_connection", OptionValue::Bool(value)) => {
            message.needs_setup_connection = value;
        }
        ("needs_authentication", OptionValue::Bool(value)) => {
            message.needs_authentication = value;
        }
        ("ifdef", OptionValue::Str(value)) => message.ifdef = Some(value),
        ("base_class", OptionValue::Str(value)) => message.base_class = Some(value),
        (
            "id" | "source" | "no_delay" | "needs_setup_connection" | "needs_authentication"
            | "ifdef" | "base_class",
            value,
        ) => return Err(invalid_option(&message.name, option, &value)),
        (option, _) => debug!("Ignoring option {option} of {}", message.name),
    }

    Ok(())
}

fn apply_field_option(
    message: &str,
    field: &mut FieldDescriptor,
    option: &str,
    value: OptionValue,
) -> Result<(), GeneratorError> {
    match (option, value) {
        ("fixed_array_size", OptionValue::Int(size)) if size > 0 => {
            field.fixed_array_size = usize::try_from(size).ok();
        }
        ("packed_buffer", OptionValue::Bool(value)) => field.packed_buffer = value,
        ("field_ifdef", OptionValue::Str(value)) => field.ifdef = Some(value),
        // Repeated numbers are written unpacked either way
        ("packed", OptionValue::Bool(_)) => {}
        ("fixed_array_size" | "packed_buffer" | "field_ifdef" | "packed", value) => {
            return Err(invalid_option(
                &format!("{message}.{}", field.name),
                option,
                &value,
            ));
        }
        (option, _) => debug!("Ignoring option {option} of {message}.{}", field.name),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROTO: &str = r#"
// File header

syntax = "proto3";

import "api_options.proto";

package espota;

service APIConnection {
  rpc hello (HelloRequest) returns (HelloResponse) {
    option (needs_authentication) = false;
  }
}

// ==================== SECTION ====================

enum Level {
  LEVEL_NONE = 0;
  // Loud
  LEVEL_LOUD = 0x02;
}

// Says hello
// on two lines
message HelloRequest {
  option (id) = 1;
  option (source) = SOURCE_CLIENT;
  option (no_delay) = true;
  option (needs_authentication) = false;

  string client_info = 1; // trailing comments are not docs
  uint32 api_version = 2;
  // Padding
  repeated sint32 timings = 3 [packed = true, (packed_buffer) = true];
}

/* block
   comment */
message Batch {
  option (id) = 2;
  option (source) = SOURCE_SERVER;
  option (ifdef) = "extras";
  option (base_class) = "Base";

  repeated Item items = 1 [(fixed_array_size) = 8];
  Level level = 2 [(field_ifdef) = "levels"];
}

message Item {
  bytes data = 1;
}
"#;

    #[test]
    fn parses_definitions() {
        let file = ProtoFile::parse(PROTO).unwrap();

        assert_eq!(file.enums.len(), 1);
        let level = &file.enums[0];
        assert_eq!(level.name, "Level");
        assert!(level.docs.is_empty());
        assert_eq!(level.values[1].name, "LEVEL_LOUD");
        assert_eq!(level.values[1].number, 2);
        assert_eq!(level.values[1].docs, ["Loud"]);

        let names: Vec<_> = file.messages.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["HelloRequest", "Batch", "Item"]);

        let hello = &file.messages[0];
        assert_eq!(hello.docs, ["Says hello", "on two lines"]);
        assert_eq!(hello.id, Some(1));
        assert_eq!(hello.source, Some(Source::Client));
        assert!(hello.no_delay);
        assert!(hello.needs_setup_connection);
        assert!(!hello.needs_authentication);
        assert!(hello.fields[0].docs.is_empty());
        assert!(hello.fields[1].docs.is_empty());
        assert_eq!(hello.fields[2].docs, ["Padding"]);
        assert!(hello.fields[2].repeated);
        assert!(hello.fields[2].packed_buffer);

        let batch = &file.messages[1];
        assert!(batch.docs.is_empty());
        assert_eq!(batch.ifdef.as_deref(), Some("extras"));
        assert_eq!(batch.base_class.as_deref(), Some("Base"));
        assert_eq!(batch.fields[0].type_name, "Item");
        assert_eq!(batch.fields[0].fixed_array_size, Some(8));
        assert_eq!(batch.fields[1].ifdef.as_deref(), Some("levels"));
    }

    #[test]
    fn section_headers_are_not_docs() {
        let file = ProtoFile::parse(
            "// ==== SECTION ====\n\nmessage A {}\n// Docs\nmessage B {}\n",
        )
        .unwrap();

        assert!(file.messages[0].docs.is_empty());
        assert_eq!(file.messages[1].docs, ["Docs"]);
    }

    #[test]
    fn sources_are_inherited_from_embedding_messages() {
        let file = ProtoFile::parse(PROTO).unwrap();
        let sources = file.resolve_sources();

        assert_eq!(sources["HelloRequest"], Source::Client);
        assert_eq!(sources["Batch"], Source::Server);
        assert_eq!(sources["Item"], Source::Server);
    }

    #[test]
    fn sources_are_merged_across_embedders() {
        let file = ProtoFile::parse(
            r#"
            message Up { option (source) = SOURCE_CLIENT; Shared shared = 1; }
            message Down { option (source) = SOURCE_SERVER; Shared shared = 1; }
            message Shared { Leaf leaf = 1; }
            message Leaf { uint32 value = 1; }
            message Lonely { uint32 value = 1; }
            "#,
        )
        .unwrap();
        let sources = file.resolve_sources();

        assert_eq!(sources["Shared"], Source::Both);
        assert_eq!(sources["Leaf"], Source::Both);
        assert_eq!(sources["Lonely"], Source::Both);
    }

    #[test]
    fn rejects_unsupported_constructs() {
        let result = ProtoFile::parse("message A { oneof choice { uint32 a = 1; } }");
        assert!(matches!(result, Err(GeneratorError::Unsupported { .. })));

        let result = ProtoFile::parse("message A { map<string, uint32> values = 1; }");
        assert!(matches!(result, Err(GeneratorError::Unsupported { .. })));

        let result = ProtoFile::parse("syntax = \"proto2\";");
        assert!(matches!(result, Err(GeneratorError::Syntax { line: 1, .. })));
    }

    #[test]
    fn rejects_malformed_options() {
        let result = ProtoFile::parse("message A { option (source) = SOURCE_NOWHERE; }");
        assert!(matches!(result, Err(GeneratorError::InvalidOption { .. })));

        let result = ProtoFile::parse("message A { option (no_delay) = 1; }");
        assert!(matches!(result, Err(GeneratorError::InvalidOption { .. })));

        let result = ProtoFile::parse("message A { repeated A a = 1 [(fixed_array_size) = 0]; }");
        assert!(matches!(result, Err(GeneratorError::InvalidOption { .. })));
    }

    #[test]
    fn reports_the_line_of_syntax_errors() {
        let result = ProtoFile::parse("message A {\n  uint32 a = ;\n}");
        assert!(matches!(result, Err(GeneratorError::Syntax { line: 2, .. })));

        let result = ProtoFile::parse("message A {\n  uint32 a = 0;\n}");
        assert!(matches!(result, Err(GeneratorError::Syntax { line: 2, .. })));
    }
}
