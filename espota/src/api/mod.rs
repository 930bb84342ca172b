//! Native API wire codec
//!
//! The native API exchanges protobuf encoded messages over a small frame
//! transport. Only the subset of protobuf needed by the API is supported, see
//! [wire] for the primitives and [message] for the traits implemented by the
//! generated message types.
//!
//! The [messages] and [service] modules are generated from `api.proto` by
//! `cargo xtask generate-api`; they must not be edited by hand.
//!
//! A device side connection reads frames with a [frame::PlaintextFrameHelper]
//! and hands them to [dispatch::handle_frame], which decodes the payload and
//! calls the matching [service::ApiConnectionHandler] hook once the
//! message's [dispatch::DispatchPolicy] is satisfied.

pub mod dispatch;
pub mod frame;
pub mod message;
pub mod messages;
pub mod service;
pub mod wire;
