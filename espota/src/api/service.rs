// This file is automatically generated from `espota/api.proto` by
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
    fn on_hello_request(&mut self, _message: &HelloRequest<'_>) {}

    fn on_authentication_request(&mut self, _message: &AuthenticationRequest<'_>) {}

    fn on_disconnect_request(&mut self, _message: &DisconnectRequest) {}

    fn on_disconnect_response(&mut self, _message: &DisconnectResponse) {}

    fn on_ping_request(&mut self, _message: &PingRequest) {}

    fn on_ping_response(&mut self, _message: &PingResponse) {}

    fn on_device_info_request(&mut self, _message: &DeviceInfoRequest) {}

    fn on_list_entities_request(&mut self, _message: &ListEntitiesRequest) {}

    fn on_subscribe_states_request(&mut self, _message: &SubscribeStatesRequest) {}

    fn on_subscribe_logs_request(&mut self, _message: &SubscribeLogsRequest) {}

    fn on_execute_service_request(&mut self, _message: &ExecuteServiceRequest<'_>) {}

    #[cfg(feature = "infrared")]
    fn on_infrared_raw_timings_request(&mut self, _message: &InfraredRawTimingsRequest<'_>) {}
}

/// Connection requirements of a message a client can send
///
/// Returns `None` for message types which are never dispatched.
pub fn dispatch_policy(message_type: u16) -> Option<DispatchPolicy> {
    let policy = match message_type {
        1 => DispatchPolicy {
            needs_setup_connection: false,
            needs_authentication: false,
        },
        3 => DispatchPolicy {
            needs_setup_connection: false,
            needs_authentication: false,
        },
        5 => DispatchPolicy {
            needs_setup_connection: false,
            needs_authentication: false,
        },
        6 => DispatchPolicy {
            needs_setup_connection: false,
            needs_authentication: false,
        },
        7 => DispatchPolicy {
            needs_setup_connection: false,
            needs_authentication: false,
        },
        8 => DispatchPolicy {
            needs_setup_connection: false,
            needs_authentication: false,
        },
        9 => DispatchPolicy {
            needs_setup_connection: true,
            needs_authentication: false,
        },
        11 => DispatchPolicy {
            needs_setup_connection: true,
            needs_authentication: true,
        },
        20 => DispatchPolicy {
            needs_setup_connection: true,
            needs_authentication: true,
        },
        28 => DispatchPolicy {
            needs_setup_connection: true,
            needs_authentication: true,
        },
        42 => DispatchPolicy {
            needs_setup_connection: true,
            needs_authentication: true,
        },
        #[cfg(feature = "infrared")]
        136 => DispatchPolicy {
            needs_setup_connection: true,
            needs_authentication: true,
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
            let message = HelloRequest::decode(data)?;
            #[cfg(feature = "dump")]
            trace!("on_hello_request: {}", message.dump());
            handler.on_hello_request(&message);
        }
        3 => {
            let message = AuthenticationRequest::decode(data)?;
            #[cfg(feature = "dump")]
            trace!("on_authentication_request: {}", message.dump());
            handler.on_authentication_request(&message);
        }
        5 => {
            let message = DisconnectRequest::decode(data)?;
            #[cfg(feature = "dump")]
            trace!("on_disconnect_request: {}", message.dump());
            handler.on_disconnect_request(&message);
        }
        6 => {
            let message = DisconnectResponse::decode(data)?;
            #[cfg(feature = "dump")]
            trace!("on_disconnect_response: {}", message.dump());
            handler.on_disconnect_response(&message);
        }
        7 => {
            let message = PingRequest::decode(data)?;
            #[cfg(feature = "dump")]
            trace!("on_ping_request: {}", message.dump());
            handler.on_ping_request(&message);
        }
        8 => {
            let message = PingResponse::decode(data)?;
            #[cfg(feature = "dump")]
            trace!("on_ping_response: {}", message.dump());
            handler.on_ping_response(&message);
        }
        9 => {
            let message = DeviceInfoRequest::decode(data)?;
            #[cfg(feature = "dump")]
            trace!("on_device_info_request: {}", message.dump());
            handler.on_device_info_request(&message);
        }
        11 => {
            let message = ListEntitiesRequest::decode(data)?;
            #[cfg(feature = "dump")]
            trace!("on_list_entities_request: {}", message.dump());
            handler.on_list_entities_request(&message);
        }
        20 => {
            let message = SubscribeStatesRequest::decode(data)?;
            #[cfg(feature = "dump")]
            trace!("on_subscribe_states_request: {}", message.dump());
            handler.on_subscribe_states_request(&message);
        }
        28 => {
            let message = SubscribeLogsRequest::decode(data)?;
            #[cfg(feature = "dump")]
            trace!("on_subscribe_logs_request: {}", message.dump());
            handler.on_subscribe_logs_request(&message);
        }
        42 => {
            let message = ExecuteServiceRequest::decode(data)?;
            #[cfg(feature = "dump")]
            trace!("on_execute_service_request: {}", message.dump());
            handler.on_execute_service_request(&message);
        }
        #[cfg(feature = "infrared")]
        136 => {
            let message = InfraredRawTimingsRequest::decode(data)?;
            #[cfg(feature = "dump")]
            trace!("on_infrared_raw_timings_request: {}", message.dump());
            handler.on_infrared_raw_timings_request(&message);
        }
        _ => return Ok(false),
    }

    Ok(true)
}
