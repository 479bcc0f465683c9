//! Connection lifecycle operations over the session vault
//!
//! Every connection-state write flows through the state machine; handlers
//! compose these operations instead of poking the vault directly. The
//! invariant they maintain: a stored credential exists exactly while the
//! connection is established.

use uuid::Uuid;

use canvasforge_common::{Error, Result};
use canvasforge_session::{ConnectionState, SessionStore, StoredCredential};

use crate::domain::state::{ConnectionEvent, ConnectionStateMachine, StateError};

/// Apply one state machine event for the visitor
fn apply_event(
    sessions: &SessionStore,
    visitor_id: Uuid,
    event: ConnectionEvent,
) -> Result<ConnectionState> {
    let current = sessions.connection_state(visitor_id);
    let next = ConnectionStateMachine::transition(current, event).map_err(|e| match e {
        StateError::InvalidTransition { from, event } => Error::Validation(format!(
            "Invalid connection transition: cannot apply '{}' event from '{}' state",
            event, from
        )),
    })?;
    sessions.set_connection_state(visitor_id, next);
    Ok(next)
}

/// Move the visitor into Connecting
///
/// Replacing an established connection revokes it (and drops its credential)
/// first; a connect already underway stays underway.
pub fn begin_connect(sessions: &SessionStore, visitor_id: Uuid) -> Result<()> {
    match sessions.connection_state(visitor_id) {
        ConnectionState::Connecting => Ok(()),
        ConnectionState::Connected => {
            apply_event(sessions, visitor_id, ConnectionEvent::Revoke)?;
            sessions.clear_github_credential(visitor_id);
            apply_event(sessions, visitor_id, ConnectionEvent::BeginConnect)?;
            Ok(())
        }
        ConnectionState::Disconnected => {
            apply_event(sessions, visitor_id, ConnectionEvent::BeginConnect)?;
            Ok(())
        }
    }
}

/// Record an obtained credential and mark the connection established
pub fn establish(
    sessions: &SessionStore,
    visitor_id: Uuid,
    credential: StoredCredential,
) -> Result<()> {
    if sessions.connection_state(visitor_id) != ConnectionState::Connecting {
        begin_connect(sessions, visitor_id)?;
    }
    sessions.set_github_credential(visitor_id, credential);
    apply_event(sessions, visitor_id, ConnectionEvent::Establish)?;
    Ok(())
}

/// Drop a pending connect attempt
///
/// Established or absent connections are left untouched, so a denial
/// callback can never sever a working connection.
pub fn reject(sessions: &SessionStore, visitor_id: Uuid) -> Result<()> {
    if sessions.connection_state(visitor_id) != ConnectionState::Connecting {
        return Ok(());
    }
    apply_event(sessions, visitor_id, ConnectionEvent::Reject)?;
    sessions.disconnect_github(visitor_id);
    Ok(())
}

/// Sever an established connection and drop its credential
pub fn revoke(sessions: &SessionStore, visitor_id: Uuid) -> Result<()> {
    apply_event(sessions, visitor_id, ConnectionEvent::Revoke)?;
    sessions.disconnect_github(visitor_id);
    Ok(())
}
