//! Codec coverage for every field type the code generator supports
//!
//! `messages.rs` and `service.rs` are generated from `api.proto` in this
//! directory. The runtime modules are mounted under the names the generated
//! code expects from inside `espota::api`.

use espota::api::frame::{decode_frame, encode_frame};
use pretty_assertions::assert_eq;

use crate::{
    dispatch::ConnectionState,
    message::{Decode, Encode, MessageInfo},
    messages::*,
    service::{dispatch_policy, read_message, ApiConnectionHandler},
};

mod dispatch {
    pub use espota::api::dispatch::*;
}

mod message {
    pub use espota::api::message::*;
}

mod wire {
    pub use espota::api::wire::*;
}

mod messages;
mod service;

fn every_field<'a>() -> AllTypesRequest<'a> {
    AllTypesRequest {
        float_value: -21.5,
        int32_value: -7,
        int64_value: -5_000_000_000,
        uint32_value: 4_000_000_000,
        uint64_value: u64::MAX,
        sint32_value: -300,
        fixed32_value: 0xDEAD_BEEF,
        sfixed32_value: -2,
        bool_value: true,
        string_value: "kitchen",
        bytes_value: &[0x00, 0xFF],
        level: Level::CRITICAL,
        reading: Reading {
            offset: i32::MIN,
            raw: b"abc",
        },
        int64_values: vec![i64::MIN, 0, i64::MAX],
        uint64_values: vec![0, 1 << 40],
        sfixed32_values: vec![-1, 0, i32::MAX],
        levels: vec![Level::HIGH, Level(9), Level::LOW],
        bytes_values: vec![b"ab".as_slice(), b"".as_slice(), b"c".as_slice()],
        readings: vec![Reading::default(), Reading { offset: 3, raw: &[] }],
    }
}

#[derive(Debug, Default)]
struct Device {
    setup: bool,
    rejected: usize,
    received: Vec<(i64, u64, Vec<Level>)>,
}

impl ConnectionState for Device {
    fn is_connection_setup(&self) -> bool {
        self.setup
    }

    fn is_authenticated(&self) -> bool {
        false
    }

    fn on_no_setup_connection(&mut self) {
        self.rejected += 1;
    }

    fn on_unauthenticated_access(&mut self) {
        self.rejected += 1;
    }
}

impl ApiConnectionHandler for Device {
    fn on_all_types_request(&mut self, message: &AllTypesRequest<'_>) {
        self.received.push((
            message.int64_value,
            message.uint64_value,
            message.levels.clone(),
        ));
    }
}

#[test]
fn every_field_type_round_trips() {
    let message = every_field();

    let encoded = message.encode_to_vec();
    assert_eq!(encoded.len(), message.calculate_size());
    assert_eq!(AllTypesRequest::decode(&encoded).unwrap(), message);
}

#[test]
fn wide_and_signed_fixed_layout() {
    let message = AllTypesRequest {
        int64_value: -1,
        uint64_value: u64::MAX,
        sfixed32_value: -2,
        ..Default::default()
    };

    let mut expected = vec![0x18];
    expected.extend([0xFF; 9]);
    expected.push(0x01);
    expected.push(0x28);
    expected.extend([0xFF; 9]);
    expected.push(0x01);
    expected.extend([0x45, 0xFE, 0xFF, 0xFF, 0xFF]);

    assert_eq!(message.encode_to_vec(), expected);
    assert_eq!(message.calculate_size(), 27);
    assert_eq!(AllTypesRequest::decode(&expected).unwrap(), message);
}

#[test]
fn repeated_enums_and_bytes_keep_every_element() {
    let message = AllTypesRequest {
        levels: vec![Level::HIGH, Level(9)],
        bytes_values: vec![b"".as_slice()],
        ..Default::default()
    };

    let encoded = message.encode_to_vec();
    assert_eq!(
        encoded,
        [0x98, 0x01, 0x01, 0x98, 0x01, 0x09, 0xA2, 0x01, 0x00]
    );
    assert_eq!(message.calculate_size(), encoded.len());

    let decoded = AllTypesRequest::decode(&encoded).unwrap();
    assert_eq!(decoded.levels, [Level::HIGH, Level(9)]);
    assert_eq!(decoded.levels[0].name(), Some("LEVEL_HIGH"));
    assert_eq!(decoded.levels[1].name(), None);
    assert_eq!(decoded.bytes_values, [b"".as_slice()]);
}

#[test]
fn empty_nested_messages() {
    let message = AllTypesRequest {
        readings: vec![Reading::default()],
        ..Default::default()
    };

    // Only the repeated element is written, the single field is left out
    let encoded = message.encode_to_vec();
    assert_eq!(encoded, [0xAA, 0x01, 0x00]);
    assert_eq!(message.calculate_size(), 3);
    assert_eq!(AllTypesRequest::decode(&encoded).unwrap(), message);
}

#[test]
fn sent_messages_own_their_data() {
    let message = AllTypesResponse {
        string_value: "ok".into(),
        bytes_value: vec![0x01],
        string_values: vec!["a".into(), String::new()],
        bytes_values: vec![Vec::new()],
    };

    let encoded = message.encode_to_vec();
    assert_eq!(
        encoded,
        [0x0A, 0x02, b'o', b'k', 0x12, 0x01, 0x01, 0x1A, 0x01, b'a', 0x1A, 0x00, 0x22, 0x00]
    );
    assert_eq!(message.calculate_size(), encoded.len());

    assert_eq!(AllTypesResponse::MESSAGE_TYPE, 2);
    assert_eq!(AllTypesResponse::MESSAGE_NAME, "all_types_response");
    assert!(!AllTypesResponse::NO_DELAY);
}

#[test]
fn dispatches_after_setup() {
    let mut out = Vec::new();
    encode_frame(
        &mut out,
        u16::from(AllTypesRequest::MESSAGE_TYPE),
        &every_field(),
    );
    let (frame, consumed) = decode_frame(&out).unwrap().unwrap();
    assert_eq!(consumed, out.len());

    let mut device = Device::default();
    assert!(!read_message(&mut device, frame.message_type, frame.payload).unwrap());
    assert_eq!(device.rejected, 1);
    assert!(device.received.is_empty());

    device.setup = true;
    assert!(read_message(&mut device, frame.message_type, frame.payload).unwrap());
    assert_eq!(
        device.received,
        [(
            -5_000_000_000,
            u64::MAX,
            vec![Level::HIGH, Level(9), Level::LOW]
        )]
    );

    // Sent by the device only
    assert_eq!(dispatch_policy(u16::from(AllTypesResponse::MESSAGE_TYPE)), None);
    assert!(!read_message(&mut device, 2, &[]).unwrap());
}

#[cfg(feature = "dump")]
#[test]
fn dumps_every_field_type() {
    use crate::message::Dump;

    let reading = Reading {
        offset: -1,
        raw: &[0xAB, 0x01],
    };
    assert_eq!(
        reading.dump(),
        "Reading {\n  offset: -1\n  raw: AB.01 (2)\n}"
    );

    let dump = every_field().dump();
    assert!(dump.starts_with("AllTypesRequest {\n  float_value: -21.5\n"));
    assert!(dump.contains("  uint64_value: 18446744073709551615\n"));
    assert!(dump.contains("  level: LEVEL_CRITICAL\n"));
    assert!(dump.contains("  levels: UNKNOWN(9)\n"));
    assert!(dump.contains("  bytes_values:  (0)\n"));
}
