// This file is automatically generated from `espota/api.proto` by
// `cargo xtask generate-api`, please do not edit it by hand.

#[cfg(feature = "dump")]
use super::message::{Dump, DumpValue, MessageDump};
use super::{
    message::{decode_str, Decode, Encode, MessageInfo},
    wire::{DecodeError, ProtoSize, ProtoVarInt, ProtoWriter},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EntityCategory(pub u32);

impl EntityCategory {
    pub const NONE: Self = Self(0);
    pub const CONFIG: Self = Self(1);
    pub const DIAGNOSTIC: Self = Self(2);

    /// Descriptor name of a known value
    pub fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("ENTITY_CATEGORY_NONE"),
            1 => Some("ENTITY_CATEGORY_CONFIG"),
            2 => Some("ENTITY_CATEGORY_DIAGNOSTIC"),
            _ => None,
        }
    }
}

#[cfg(feature = "dump")]
impl DumpValue for EntityCategory {
    fn dump_value(&self, out: &mut String) {
        match self.name() {
            Some(name) => out.push_str(name),
            None => out.push_str(&format!("UNKNOWN({})", self.0)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SensorStateClass(pub u32);

impl SensorStateClass {
    pub const NONE: Self = Self(0);
    pub const MEASUREMENT: Self = Self(1);
    pub const TOTAL_INCREASING: Self = Self(2);
    pub const TOTAL: Self = Self(3);

    /// Descriptor name of a known value
    pub fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("STATE_CLASS_NONE"),
            1 => Some("STATE_CLASS_MEASUREMENT"),
            2 => Some("STATE_CLASS_TOTAL_INCREASING"),
            3 => Some("STATE_CLASS_TOTAL"),
            _ => None,
        }
    }
}

#[cfg(feature = "dump")]
impl DumpValue for SensorStateClass {
    fn dump_value(&self, out: &mut String) {
        match self.name() {
            Some(name) => out.push_str(name),
            None => out.push_str(&format!("UNKNOWN({})", self.0)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LogLevel(pub u32);

impl LogLevel {
    pub const NONE: Self = Self(0);
    pub const ERROR: Self = Self(1);
    pub const WARN: Self = Self(2);
    pub const INFO: Self = Self(3);
    pub const CONFIG: Self = Self(4);
    pub const DEBUG: Self = Self(5);
    pub const VERBOSE: Self = Self(6);
    pub const VERY_VERBOSE: Self = Self(7);

    /// Descriptor name of a known value
    pub fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("LOG_LEVEL_NONE"),
            1 => Some("LOG_LEVEL_ERROR"),
            2 => Some("LOG_LEVEL_WARN"),
            3 => Some("LOG_LEVEL_INFO"),
            4 => Some("LOG_LEVEL_CONFIG"),
            5 => Some("LOG_LEVEL_DEBUG"),
            6 => Some("LOG_LEVEL_VERBOSE"),
            7 => Some("LOG_LEVEL_VERY_VERBOSE"),
            _ => None,
        }
    }
}

#[cfg(feature = "dump")]
impl DumpValue for LogLevel {
    fn dump_value(&self, out: &mut String) {
        match self.name() {
            Some(name) => out.push_str(name),
            None => out.push_str(&format!("UNKNOWN({})", self.0)),
        }
    }
}

/// The first message a client sends after connecting
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HelloRequest<'a> {
    pub client_info: &'a str,
    pub api_version_major: u32,
    pub api_version_minor: u32,
}

impl MessageInfo for HelloRequest<'_> {
    const MESSAGE_TYPE: u8 = 1;
    const MESSAGE_NAME: &'static str = "hello_request";
    const NO_DELAY: bool = true;
}

impl<'a> Decode<'a> for HelloRequest<'a> {
    fn decode_varint(&mut self, field_id: u32, value: ProtoVarInt) -> bool {
        match field_id {
            2 => self.api_version_major = value.as_u32(),
            3 => self.api_version_minor = value.as_u32(),
            _ => return false,
        }
        true
    }

    fn decode_length(&mut self, field_id: u32, value: &'a [u8]) -> Result<bool, DecodeError> {
        match field_id {
            1 => self.client_info = decode_str(1, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(feature = "dump")]
impl Dump for HelloRequest<'_> {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "HelloRequest");
        dump.field("client_info", &self.client_info);
        dump.field("api_version_major", &self.api_version_major);
        dump.field("api_version_minor", &self.api_version_minor);
        dump.finish();
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HelloResponse {
    pub api_version_major: u32,
    pub api_version_minor: u32,
    pub server_info: String,
    pub name: String,
}

impl MessageInfo for HelloResponse {
    const MESSAGE_TYPE: u8 = 2;
    const MESSAGE_NAME: &'static str = "hello_response";
    const NO_DELAY: bool = true;
}

impl Encode for HelloResponse {
    fn encode(&self, buffer: &mut ProtoWriter<'_>) {
        buffer.encode_uint32(1, self.api_version_major, false);
        buffer.encode_uint32(2, self.api_version_minor, false);
        buffer.encode_string(3, &self.server_info, false);
        buffer.encode_string(4, &self.name, false);
    }

    fn calculate_size(&self) -> usize {
        let mut size = 0;
        size += ProtoSize::uint32_field(1, self.api_version_major, false);
        size += ProtoSize::uint32_field(1, self.api_version_minor, false);
        size += ProtoSize::length_field(1, self.server_info.len(), false);
        size += ProtoSize::length_field(1, self.name.len(), false);
        size
    }
}

#[cfg(feature = "dump")]
impl Dump for HelloResponse {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "HelloResponse");
        dump.field("api_version_major", &self.api_version_major);
        dump.field("api_version_minor", &self.api_version_minor);
        dump.field("server_info", &self.server_info);
        dump.field("name", &self.name);
        dump.finish();
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthenticationRequest<'a> {
    pub password: &'a str,
}

impl MessageInfo for AuthenticationRequest<'_> {
    const MESSAGE_TYPE: u8 = 3;
    const MESSAGE_NAME: &'static str = "authentication_request";
    const NO_DELAY: bool = true;
}

impl<'a> Decode<'a> for AuthenticationRequest<'a> {
    fn decode_length(&mut self, field_id: u32, value: &'a [u8]) -> Result<bool, DecodeError> {
        match field_id {
            1 => self.password = decode_str(1, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(feature = "dump")]
impl Dump for AuthenticationRequest<'_> {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "AuthenticationRequest");
        dump.field("password", &self.password);
        dump.finish();
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthenticationResponse {
    pub invalid_password: bool,
}

impl MessageInfo for AuthenticationResponse {
    const MESSAGE_TYPE: u8 = 4;
    const MESSAGE_NAME: &'static str = "authentication_response";
    const NO_DELAY: bool = true;
}

impl Encode for AuthenticationResponse {
    fn encode(&self, buffer: &mut ProtoWriter<'_>) {
        buffer.encode_bool(1, self.invalid_password, false);
    }

    fn calculate_size(&self) -> usize {
        let mut size = 0;
        size += ProtoSize::bool_field(1, self.invalid_password, false);
        size
    }
}

#[cfg(feature = "dump")]
impl Dump for AuthenticationResponse {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "AuthenticationResponse");
        dump.field("invalid_password", &self.invalid_password);
        dump.finish();
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisconnectRequest;

impl MessageInfo for DisconnectRequest {
    const MESSAGE_TYPE: u8 = 5;
    const MESSAGE_NAME: &'static str = "disconnect_request";
    const NO_DELAY: bool = true;
}

impl Encode for DisconnectRequest {
    fn encode(&self, _buffer: &mut ProtoWriter<'_>) {}

    fn calculate_size(&self) -> usize {
        0
    }
}

impl Decode<'_> for DisconnectRequest {}

#[cfg(feature = "dump")]
impl Dump for DisconnectRequest {
    fn dump_to(&self, out: &mut String) {
        out.push_str("DisconnectRequest {}");
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisconnectResponse;

impl MessageInfo for DisconnectResponse {
    const MESSAGE_TYPE: u8 = 6;
    const MESSAGE_NAME: &'static str = "disconnect_response";
    const NO_DELAY: bool = true;
}

impl Encode for DisconnectResponse {
    fn encode(&self, _buffer: &mut ProtoWriter<'_>) {}

    fn calculate_size(&self) -> usize {
        0
    }
}

impl Decode<'_> for DisconnectResponse {}

#[cfg(feature = "dump")]
impl Dump for DisconnectResponse {
    fn dump_to(&self, out: &mut String) {
        out.push_str("DisconnectResponse {}");
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PingRequest;

impl MessageInfo for PingRequest {
    const MESSAGE_TYPE: u8 = 7;
    const MESSAGE_NAME: &'static str = "ping_request";
}

impl Encode for PingRequest {
    fn encode(&self, _buffer: &mut ProtoWriter<'_>) {}

    fn calculate_size(&self) -> usize {
        0
    }
}

impl Decode<'_> for PingRequest {}

#[cfg(feature = "dump")]
impl Dump for PingRequest {
    fn dump_to(&self, out: &mut String) {
        out.push_str("PingRequest {}");
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PingResponse;

impl MessageInfo for PingResponse {
    const MESSAGE_TYPE: u8 = 8;
    const MESSAGE_NAME: &'static str = "ping_response";
}

impl Encode for PingResponse {
    fn encode(&self, _buffer: &mut ProtoWriter<'_>) {}

    fn calculate_size(&self) -> usize {
        0
    }
}

impl Decode<'_> for PingResponse {}

#[cfg(feature = "dump")]
impl Dump for PingResponse {
    fn dump_to(&self, out: &mut String) {
        out.push_str("PingResponse {}");
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceInfoRequest;

impl MessageInfo for DeviceInfoRequest {
    const MESSAGE_TYPE: u8 = 9;
    const MESSAGE_NAME: &'static str = "device_info_request";
}

impl Decode<'_> for DeviceInfoRequest {}

#[cfg(feature = "dump")]
impl Dump for DeviceInfoRequest {
    fn dump_to(&self, out: &mut String) {
        out.push_str("DeviceInfoRequest {}");
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceInfoResponse {
    pub uses_password: bool,
    pub name: String,
    pub mac_address: String,
    pub esphome_version: String,
    pub compilation_time: String,
    pub model: String,
    pub has_deep_sleep: bool,
    pub project_name: String,
    pub project_version: String,
    pub webserver_port: u32,
    pub manufacturer: String,
    pub friendly_name: String,
    #[cfg(feature = "bluetooth-proxy")]
    pub bluetooth_proxy_feature_flags: u32,
    pub suggested_area: String,
}

impl MessageInfo for DeviceInfoResponse {
    const MESSAGE_TYPE: u8 = 10;
    const MESSAGE_NAME: &'static str = "device_info_response";
}

impl Encode for DeviceInfoResponse {
    fn encode(&self, buffer: &mut ProtoWriter<'_>) {
        buffer.encode_bool(1, self.uses_password, false);
        buffer.encode_string(2, &self.name, false);
        buffer.encode_string(3, &self.mac_address, false);
        buffer.encode_string(4, &self.esphome_version, false);
        buffer.encode_string(5, &self.compilation_time, false);
        buffer.encode_string(6, &self.model, false);
        buffer.encode_bool(7, self.has_deep_sleep, false);
        buffer.encode_string(8, &self.project_name, false);
        buffer.encode_string(9, &self.project_version, false);
        buffer.encode_uint32(10, self.webserver_port, false);
        buffer.encode_string(12, &self.manufacturer, false);
        buffer.encode_string(13, &self.friendly_name, false);
        #[cfg(feature = "bluetooth-proxy")]
        buffer.encode_uint32(15, self.bluetooth_proxy_feature_flags, false);
        buffer.encode_string(16, &self.suggested_area, false);
    }

    fn calculate_size(&self) -> usize {
        let mut size = 0;
        size += ProtoSize::bool_field(1, self.uses_password, false);
        size += ProtoSize::length_field(1, self.name.len(), false);
        size += ProtoSize::length_field(1, self.mac_address.len(), false);
        size += ProtoSize::length_field(1, self.esphome_version.len(), false);
        size += ProtoSize::length_field(1, self.compilation_time.len(), false);
        size += ProtoSize::length_field(1, self.model.len(), false);
        size += ProtoSize::bool_field(1, self.has_deep_sleep, false);
        size += ProtoSize::length_field(1, self.project_name.len(), false);
        size += ProtoSize::length_field(1, self.project_version.len(), false);
        size += ProtoSize::uint32_field(1, self.webserver_port, false);
        size += ProtoSize::length_field(1, self.manufacturer.len(), false);
        size += ProtoSize::length_field(1, self.friendly_name.len(), false);
        #[cfg(feature = "bluetooth-proxy")]
        {
            size += ProtoSize::uint32_field(1, self.bluetooth_proxy_feature_flags, false);
        }
        size += ProtoSize::length_field(2, self.suggested_area.len(), false);
        size
    }
}

#[cfg(feature = "dump")]
impl Dump for DeviceInfoResponse {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "DeviceInfoResponse");
        dump.field("uses_password", &self.uses_password);
        dump.field("name", &self.name);
        dump.field("mac_address", &self.mac_address);
        dump.field("esphome_version", &self.esphome_version);
        dump.field("compilation_time", &self.compilation_time);
        dump.field("model", &self.model);
        dump.field("has_deep_sleep", &self.has_deep_sleep);
        dump.field("project_name", &self.project_name);
        dump.field("project_version", &self.project_version);
        dump.field("webserver_port", &self.webserver_port);
        dump.field("manufacturer", &self.manufacturer);
        dump.field("friendly_name", &self.friendly_name);
        #[cfg(feature = "bluetooth-proxy")]
        dump.field(
            "bluetooth_proxy_feature_flags",
            &self.bluetooth_proxy_feature_flags,
        );
        dump.field("suggested_area", &self.suggested_area);
        dump.finish();
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListEntitiesRequest;

impl MessageInfo for ListEntitiesRequest {
    const MESSAGE_TYPE: u8 = 11;
    const MESSAGE_NAME: &'static str = "list_entities_request";
}

impl Decode<'_> for ListEntitiesRequest {}

#[cfg(feature = "dump")]
impl Dump for ListEntitiesRequest {
    fn dump_to(&self, out: &mut String) {
        out.push_str("ListEntitiesRequest {}");
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListEntitiesDoneResponse;

impl MessageInfo for ListEntitiesDoneResponse {
    const MESSAGE_TYPE: u8 = 19;
    const MESSAGE_NAME: &'static str = "list_entities_done_response";
    const NO_DELAY: bool = true;
}

impl Encode for ListEntitiesDoneResponse {
    fn encode(&self, _buffer: &mut ProtoWriter<'_>) {}

    fn calculate_size(&self) -> usize {
        0
    }
}

#[cfg(feature = "dump")]
impl Dump for ListEntitiesDoneResponse {
    fn dump_to(&self, out: &mut String) {
        out.push_str("ListEntitiesDoneResponse {}");
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubscribeStatesRequest;

impl MessageInfo for SubscribeStatesRequest {
    const MESSAGE_TYPE: u8 = 20;
    const MESSAGE_NAME: &'static str = "subscribe_states_request";
}

impl Decode<'_> for SubscribeStatesRequest {}

#[cfg(feature = "dump")]
impl Dump for SubscribeStatesRequest {
    fn dump_to(&self, out: &mut String) {
        out.push_str("SubscribeStatesRequest {}");
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListEntitiesSensorResponse {
    pub object_id: String,
    pub key: u32,
    pub name: String,
    pub icon: String,
    pub unit_of_measurement: String,
    pub accuracy_decimals: i32,
    pub force_update: bool,
    pub device_class: String,
    pub state_class: SensorStateClass,
    pub disabled_by_default: bool,
    pub entity_category: EntityCategory,
}

impl MessageInfo for ListEntitiesSensorResponse {
    const MESSAGE_TYPE: u8 = 16;
    const MESSAGE_NAME: &'static str = "list_entities_sensor_response";
}

impl Encode for ListEntitiesSensorResponse {
    fn encode(&self, buffer: &mut ProtoWriter<'_>) {
        buffer.encode_string(1, &self.object_id, false);
        buffer.encode_fixed32(2, self.key, false);
        buffer.encode_string(3, &self.name, false);
        buffer.encode_string(5, &self.icon, false);
        buffer.encode_string(6, &self.unit_of_measurement, false);
        buffer.encode_int32(7, self.accuracy_decimals, false);
        buffer.encode_bool(8, self.force_update, false);
        buffer.encode_string(9, &self.device_class, false);
        buffer.encode_enum(10, self.state_class.0, false);
        buffer.encode_bool(12, self.disabled_by_default, false);
        buffer.encode_enum(13, self.entity_category.0, false);
    }

    fn calculate_size(&self) -> usize {
        let mut size = 0;
        size += ProtoSize::length_field(1, self.object_id.len(), false);
        size += ProtoSize::fixed32_field(1, self.key, false);
        size += ProtoSize::length_field(1, self.name.len(), false);
        size += ProtoSize::length_field(1, self.icon.len(), false);
        size += ProtoSize::length_field(1, self.unit_of_measurement.len(), false);
        size += ProtoSize::int32_field(1, self.accuracy_decimals, false);
        size += ProtoSize::bool_field(1, self.force_update, false);
        size += ProtoSize::length_field(1, self.device_class.len(), false);
        size += ProtoSize::uint32_field(1, self.state_class.0, false);
        size += ProtoSize::bool_field(1, self.disabled_by_default, false);
        size += ProtoSize::uint32_field(1, self.entity_category.0, false);
        size
    }
}

#[cfg(feature = "dump")]
impl Dump for ListEntitiesSensorResponse {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "ListEntitiesSensorResponse");
        dump.field("object_id", &self.object_id);
        dump.field("key", &self.key);
        dump.field("name", &self.name);
        dump.field("icon", &self.icon);
        dump.field("unit_of_measurement", &self.unit_of_measurement);
        dump.field("accuracy_decimals", &self.accuracy_decimals);
        dump.field("force_update", &self.force_update);
        dump.field("device_class", &self.device_class);
        dump.field("state_class", &self.state_class);
        dump.field("disabled_by_default", &self.disabled_by_default);
        dump.field("entity_category", &self.entity_category);
        dump.finish();
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SensorStateResponse {
    pub key: u32,
    pub state: f32,
    /// If the sensor does not have a valid state yet.
    pub missing_state: bool,
}

impl MessageInfo for SensorStateResponse {
    const MESSAGE_TYPE: u8 = 25;
    const MESSAGE_NAME: &'static str = "sensor_state_response";
    const NO_DELAY: bool = true;
}

impl Encode for SensorStateResponse {
    fn encode(&self, buffer: &mut ProtoWriter<'_>) {
        buffer.encode_fixed32(1, self.key, false);
        buffer.encode_float(2, self.state, false);
        buffer.encode_bool(3, self.missing_state, false);
    }

    fn calculate_size(&self) -> usize {
        let mut size = 0;
        size += ProtoSize::fixed32_field(1, self.key, false);
        size += ProtoSize::float_field(1, self.state, false);
        size += ProtoSize::bool_field(1, self.missing_state, false);
        size
    }
}

#[cfg(feature = "dump")]
impl Dump for SensorStateResponse {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "SensorStateResponse");
        dump.field("key", &self.key);
        dump.field("state", &self.state);
        dump.field("missing_state", &self.missing_state);
        dump.finish();
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubscribeLogsRequest {
    pub level: LogLevel,
    pub dump_config: bool,
}

impl MessageInfo for SubscribeLogsRequest {
    const MESSAGE_TYPE: u8 = 28;
    const MESSAGE_NAME: &'static str = "subscribe_logs_request";
}

impl Decode<'_> for SubscribeLogsRequest {
    fn decode_varint(&mut self, field_id: u32, value: ProtoVarInt) -> bool {
        match field_id {
            1 => self.level = LogLevel(value.as_u32()),
            2 => self.dump_config = value.as_bool(),
            _ => return false,
        }
        true
    }
}

#[cfg(feature = "dump")]
impl Dump for SubscribeLogsRequest {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "SubscribeLogsRequest");
        dump.field("level", &self.level);
        dump.field("dump_config", &self.dump_config);
        dump.finish();
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubscribeLogsResponse {
    pub level: LogLevel,
    pub message: Vec<u8>,
}

impl MessageInfo for SubscribeLogsResponse {
    const MESSAGE_TYPE: u8 = 29;
    const MESSAGE_NAME: &'static str = "subscribe_logs_response";
}

impl Encode for SubscribeLogsResponse {
    fn encode(&self, buffer: &mut ProtoWriter<'_>) {
        buffer.encode_enum(1, self.level.0, false);
        buffer.encode_bytes(3, &self.message, false);
    }

    fn calculate_size(&self) -> usize {
        let mut size = 0;
        size += ProtoSize::uint32_field(1, self.level.0, false);
        size += ProtoSize::length_field(1, self.message.len(), false);
        size
    }
}

#[cfg(feature = "dump")]
impl Dump for SubscribeLogsResponse {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "SubscribeLogsResponse");
        dump.field("level", &self.level);
        dump.field("message", &self.message);
        dump.finish();
    }
}

/// Embedded only, the source is inherited from ExecuteServiceRequest
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecuteServiceArgument<'a> {
    pub bool_: bool,
    pub legacy_int: i32,
    pub float_: f32,
    pub string_: &'a str,
    pub int_: i32,
    pub bool_array: Vec<bool>,
    pub int_array: Vec<i32>,
    pub float_array: Vec<f32>,
    pub string_array: Vec<&'a str>,
}

impl Encode for ExecuteServiceArgument<'_> {
    fn encode(&self, buffer: &mut ProtoWriter<'_>) {
        buffer.encode_bool(1, self.bool_, false);
        buffer.encode_int32(2, self.legacy_int, false);
        buffer.encode_float(3, self.float_, false);
        buffer.encode_string(4, &self.string_, false);
        buffer.encode_sint32(5, self.int_, false);
        for item in &self.bool_array {
            buffer.encode_bool(6, *item, true);
        }
        for item in &self.int_array {
            buffer.encode_sint32(7, *item, true);
        }
        for item in &self.float_array {
            buffer.encode_float(8, *item, true);
        }
        for item in &self.string_array {
            buffer.encode_string(9, item, true);
        }
    }

    fn calculate_size(&self) -> usize {
        let mut size = 0;
        size += ProtoSize::bool_field(1, self.bool_, false);
        size += ProtoSize::int32_field(1, self.legacy_int, false);
        size += ProtoSize::float_field(1, self.float_, false);
        size += ProtoSize::length_field(1, self.string_.len(), false);
        size += ProtoSize::sint32_field(1, self.int_, false);
        for item in &self.bool_array {
            size += ProtoSize::bool_field(1, *item, true);
        }
        for item in &self.int_array {
            size += ProtoSize::sint32_field(1, *item, true);
        }
        for item in &self.float_array {
            size += ProtoSize::float_field(1, *item, true);
        }
        for item in &self.string_array {
            size += ProtoSize::length_field(1, item.len(), true);
        }
        size
    }
}

impl<'a> Decode<'a> for ExecuteServiceArgument<'a> {
    fn decode_varint(&mut self, field_id: u32, value: ProtoVarInt) -> bool {
        match field_id {
            1 => self.bool_ = value.as_bool(),
            2 => self.legacy_int = value.as_i32(),
            5 => self.int_ = value.as_sint32(),
            6 => self.bool_array.push(value.as_bool()),
            7 => self.int_array.push(value.as_sint32()),
            _ => return false,
        }
        true
    }

    fn decode_length(&mut self, field_id: u32, value: &'a [u8]) -> Result<bool, DecodeError> {
        match field_id {
            4 => self.string_ = decode_str(4, value)?,
            9 => self.string_array.push(decode_str(9, value)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn decode_32bit(&mut self, field_id: u32, value: u32) -> bool {
        match field_id {
            3 => self.float_ = f32::from_bits(value),
            8 => self.float_array.push(f32::from_bits(value)),
            _ => return false,
        }
        true
    }
}

#[cfg(feature = "dump")]
impl Dump for ExecuteServiceArgument<'_> {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "ExecuteServiceArgument");
        dump.field("bool_", &self.bool_);
        dump.field("legacy_int", &self.legacy_int);
        dump.field("float_", &self.float_);
        dump.field("string_", &self.string_);
        dump.field("int_", &self.int_);
        for item in &self.bool_array {
            dump.field("bool_array", item);
        }
        for item in &self.int_array {
            dump.field("int_array", item);
        }
        for item in &self.float_array {
            dump.field("float_array", item);
        }
        for item in &self.string_array {
            dump.field("string_array", item);
        }
        dump.finish();
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExecuteServiceRequest<'a> {
    pub key: u32,
    pub args: Vec<ExecuteServiceArgument<'a>>,
}

impl MessageInfo for ExecuteServiceRequest<'_> {
    const MESSAGE_TYPE: u8 = 42;
    const MESSAGE_NAME: &'static str = "execute_service_request";
}

impl Encode for ExecuteServiceRequest<'_> {
    fn encode(&self, buffer: &mut ProtoWriter<'_>) {
        buffer.encode_fixed32(1, self.key, false);
        for item in &self.args {
            buffer.encode_message(2, item, true);
        }
    }

    fn calculate_size(&self) -> usize {
        let mut size = 0;
        size += ProtoSize::fixed32_field(1, self.key, false);
        for item in &self.args {
            size += ProtoSize::length_field(1, item.calculate_size(), true);
        }
        size
    }
}

impl<'a> Decode<'a> for ExecuteServiceRequest<'a> {
    fn decode_length(&mut self, field_id: u32, value: &'a [u8]) -> Result<bool, DecodeError> {
        match field_id {
            2 => self.args.push(ExecuteServiceArgument::decode(value)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn decode_32bit(&mut self, field_id: u32, value: u32) -> bool {
        match field_id {
            1 => self.key = value,
            _ => return false,
        }
        true
    }
}

#[cfg(feature = "dump")]
impl Dump for ExecuteServiceRequest<'_> {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "ExecuteServiceRequest");
        dump.field("key", &self.key);
        for item in &self.args {
            dump.message("args", item);
        }
        dump.finish();
    }
}

#[cfg(feature = "bluetooth-proxy")]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BluetoothLeRawAdvertisement {
    pub address: u64,
    pub rssi: i32,
    pub address_type: u32,
    pub data: Vec<u8>,
}

#[cfg(feature = "bluetooth-proxy")]
impl Encode for BluetoothLeRawAdvertisement {
    fn encode(&self, buffer: &mut ProtoWriter<'_>) {
        buffer.encode_uint64(1, self.address, false);
        buffer.encode_sint32(2, self.rssi, false);
        buffer.encode_uint32(3, self.address_type, false);
        buffer.encode_bytes(4, &self.data, false);
    }

    fn calculate_size(&self) -> usize {
        let mut size = 0;
        size += ProtoSize::uint64_field(1, self.address, false);
        size += ProtoSize::sint32_field(1, self.rssi, false);
        size += ProtoSize::uint32_field(1, self.address_type, false);
        size += ProtoSize::length_field(1, self.data.len(), false);
        size
    }
}

#[cfg(all(feature = "bluetooth-proxy", feature = "dump"))]
impl Dump for BluetoothLeRawAdvertisement {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "BluetoothLeRawAdvertisement");
        dump.field("address", &self.address);
        dump.field("rssi", &self.rssi);
        dump.field("address_type", &self.address_type);
        dump.field("data", &self.data);
        dump.finish();
    }
}

#[cfg(feature = "bluetooth-proxy")]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BluetoothLeRawAdvertisementsResponse {
    pub advertisements: heapless::Vec<BluetoothLeRawAdvertisement, 16>,
}

#[cfg(feature = "bluetooth-proxy")]
impl MessageInfo for BluetoothLeRawAdvertisementsResponse {
    const MESSAGE_TYPE: u8 = 93;
    const MESSAGE_NAME: &'static str = "bluetooth_le_raw_advertisements_response";
    const NO_DELAY: bool = true;
}

#[cfg(feature = "bluetooth-proxy")]
impl Encode for BluetoothLeRawAdvertisementsResponse {
    fn encode(&self, buffer: &mut ProtoWriter<'_>) {
        for item in &self.advertisements {
            buffer.encode_message(1, item, true);
        }
    }

    fn calculate_size(&self) -> usize {
        let mut size = 0;
        for item in &self.advertisements {
            size += ProtoSize::length_field(1, item.calculate_size(), true);
        }
        size
    }
}

#[cfg(all(feature = "bluetooth-proxy", feature = "dump"))]
impl Dump for BluetoothLeRawAdvertisementsResponse {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "BluetoothLeRawAdvertisementsResponse");
        for item in &self.advertisements {
            dump.message("advertisements", item);
        }
        dump.finish();
    }
}

#[cfg(feature = "infrared")]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InfraredRawTimingsRequest<'a> {
    pub key: u32,
    pub carrier_frequency: u32,
    pub repeat_count: u32,
    /// Alternating mark and space durations in microseconds, marks positive.
    pub timings: super::message::PackedBuffer<'a>,
}

#[cfg(feature = "infrared")]
impl MessageInfo for InfraredRawTimingsRequest<'_> {
    const MESSAGE_TYPE: u8 = 136;
    const MESSAGE_NAME: &'static str = "infrared_raw_timings_request";
}

#[cfg(feature = "infrared")]
impl<'a> Decode<'a> for InfraredRawTimingsRequest<'a> {
    fn decode_varint(&mut self, field_id: u32, value: ProtoVarInt) -> bool {
        match field_id {
            2 => self.carrier_frequency = value.as_u32(),
            3 => self.repeat_count = value.as_u32(),
            _ => return false,
        }
        true
    }

    fn decode_length(&mut self, field_id: u32, value: &'a [u8]) -> Result<bool, DecodeError> {
        match field_id {
            4 => self.timings = super::message::PackedBuffer::new(value),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn decode_32bit(&mut self, field_id: u32, value: u32) -> bool {
        match field_id {
            1 => self.key = value,
            _ => return false,
        }
        true
    }
}

#[cfg(all(feature = "infrared", feature = "dump"))]
impl Dump for InfraredRawTimingsRequest<'_> {
    fn dump_to(&self, out: &mut String) {
        let mut dump = MessageDump::begin(out, "InfraredRawTimingsRequest");
        dump.field("key", &self.key);
        dump.field("carrier_frequency", &self.carrier_frequency);
        dump.field("repeat_count", &self.repeat_count);
        dump.field("timings", &self.timings);
        dump.finish();
    }
}
