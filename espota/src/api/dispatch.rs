//! Routing of received frames to message handlers

use log::{debug, warn};

use super::{frame::Frame, service, service::ApiConnectionHandler, wire::DecodeError};

/// Connection requirements a message has to satisfy before it is handled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchPolicy {
    pub needs_setup_connection: bool,
    pub needs_authentication: bool,
}

impl DispatchPolicy {
    /// Handled at any point of the connection
    pub const ALWAYS: Self = Self {
        needs_setup_connection: false,
        needs_authentication: false,
    };

    /// Handled once the hello exchange completed
    pub const CONNECTION_SETUP: Self = Self {
        needs_setup_connection: true,
        needs_authentication: false,
    };

    /// Handled once the client is authenticated
    pub const AUTHENTICATED: Self = Self {
        needs_setup_connection: true,
        needs_authentication: true,
    };

    /// Check `connection` against the policy
    ///
    /// A rejected message triggers the matching hook of the connection and
    /// must then be dropped.
    pub fn permits<C: ConnectionState + ?Sized>(&self, connection: &mut C) -> bool {
        if (self.needs_setup_connection || self.needs_authentication)
            && !connection.is_connection_setup()
        {
            warn!("Message received before the connection was set up");
            connection.on_no_setup_connection();
            return false;
        }

        if self.needs_authentication && !connection.is_authenticated() {
            warn!("Message received on an unauthenticated connection");
            connection.on_unauthenticated_access();
            return false;
        }

        true
    }
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self::AUTHENTICATED
    }
}

/// State of an API connection as seen by the dispatcher
pub trait ConnectionState {
    fn is_connection_setup(&self) -> bool;

    fn is_authenticated(&self) -> bool;

    /// A message arrived which requires a completed hello exchange
    fn on_no_setup_connection(&mut self);

    /// A message arrived which requires authentication
    fn on_unauthenticated_access(&mut self);
}

/// Decode and dispatch a single frame
///
/// Returns `true` when a handler was invoked.
pub fn handle_frame<H: ApiConnectionHandler + ?Sized>(
    handler: &mut H,
    frame: &Frame<'_>,
) -> Result<bool, DecodeError> {
    let handled = service::read_message(handler, frame.message_type, frame.payload)?;
    if !handled {
        debug!("Dropped frame of type {}", frame.message_type);
    }

    Ok(handled)
}
