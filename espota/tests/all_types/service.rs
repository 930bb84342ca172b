// This file is automatically generated from `espota/tests/all_types/api.proto` by
// `cargo xtask generate-api`, please do not edit it by hand.

use log::trace;

#[cfg(feature = "dump")]
use super::message::Dump;
use super::{
    dispatch::{ConnectionState, DispatchPolicy},
    message::Decode,
    messages::*,
    wire::DecodeError,
};

/// Handlers for every message a client can send
///
/// All handlers default to doing nothing.
pub trait ApiConnectionHandler: ConnectionState {
    fn on_all_types_request(&mut self, _message: &AllTypesRequest<'_>) {}
}

/// Connection requirements of a message a client can send
///
/// Returns `None` for message types which are never dispatched.
pub fn dispatch_policy(message_type: u16) -> Option<DispatchPolicy> {
    let policy = match message_type {
        1 => DispatchPolicy {
            needs_setup_connection: true,
            needs_authentication: false,
        },
        _ => return None,
    };

    Some(policy)
}

/// Decode `data` as a message of `message_type` and pass it to `handler`
///
/// Unknown message types and messages rejected by their dispatch policy are
/// dropped. Returns `true` when a handler was invoked.
pub fn read_message<H: ApiConnectionHandler + ?Sized>(
    handler: &mut H,
    message_type: u16,
    data: &[u8],
) -> Result<bool, DecodeError> {
    let Some(policy) = dispatch_policy(message_type) else {
        trace!("Ignoring message of unknown type {message_type}");
        return Ok(false);
    };

    if !policy.permits(handler) {
        return Ok(false);
    }

    match message_type {
        1 => {
            let message = AllTypesRequest::decode(data)?;
            #[cfg(feature = "dump")]
            trace!("on_all_types_request: {}", message.dump());
            handler.on_all_types_request(&message);
        }
        _ => return Ok(false),
    }

    Ok(true)
}
