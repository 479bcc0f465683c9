//! State machine for GitHub connection status
//!
//! Connection states: Disconnected → Connecting → Connected, with rejection
//! and revocation both returning to Disconnected.

pub use canvasforge_common::StateError;
pub use canvasforge_session::ConnectionState;

/// Events that trigger connection state transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectionEvent {
    /// Start an OAuth or manual-token connect
    BeginConnect,
    /// A credential was obtained and stored
    Establish,
    /// The pending connect failed or was denied
    Reject,
    /// Drop the stored credential
    Revoke,
}

impl std::fmt::Display for ConnectionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BeginConnect => write!(f, "begin_connect"),
            Self::Establish => write!(f, "establish"),
            Self::Reject => write!(f, "reject"),
            Self::Revoke => write!(f, "revoke"),
        }
    }
}

/// Connection state machine
pub struct ConnectionStateMachine;

impl ConnectionStateMachine {
    /// Attempt a state transition
    pub fn transition(
        current: ConnectionState,
        event: ConnectionEvent,
    ) -> Result<ConnectionState, StateError> {
        let next = match (&current, &event) {
            (ConnectionState::Disconnected, ConnectionEvent::BeginConnect) => {
                ConnectionState::Connecting
            }
            (ConnectionState::Connecting, ConnectionEvent::Establish) => ConnectionState::Connected,
            (ConnectionState::Connecting, ConnectionEvent::Reject) => ConnectionState::Disconnected,
            (ConnectionState::Connected, ConnectionEvent::Revoke) => ConnectionState::Disconnected,
            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }
}
