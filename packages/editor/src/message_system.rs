//! # Message System
//!
//! Fan-out wrapper around a [`Session`]. Consumers such as the form view and
//! the navigation tree register a listener; every response produced by
//! [`MessageSystem::post_message`] is delivered to all of them in
//! registration order, so each consumer sees the same sequence of snapshots.

use crate::errors::EditorResult;
use crate::messages::{Request, Response};
use crate::session::{Session, SessionOptions};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

pub type ListenerId = u64;

type Listener = Box<dyn FnMut(&Response)>;

pub struct MessageSystem {
    session: Session,
    next_listener_id: ListenerId,
    listeners: BTreeMap<ListenerId, Listener>,
}

impl MessageSystem {
    pub fn new() -> Self {
        Self::with_session(Session::new())
    }

    pub fn with_options(options: SessionOptions) -> Self {
        Self::with_session(Session::with_options(options))
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            next_listener_id: 1,
            listeners: BTreeMap::new(),
        }
    }

    /// Register a listener; the returned id removes it again
    pub fn add<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&Response) + 'static,
    {
        let id = self.next_listener_id;
        self.next_listener_id = self.next_listener_id.saturating_add(1);
        self.listeners.insert(id, Box::new(listener));
        id
    }

    pub fn remove(&mut self, listener_id: ListenerId) -> bool {
        self.listeners.remove(&listener_id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Handle a request and broadcast the response
    ///
    /// Failed requests are not broadcast; the error goes to the caller only.
    pub fn post_message(&mut self, request: Request) -> EditorResult<Response> {
        let response = self.session.handle(request)?;
        debug!(listeners = self.listeners.len(), "Broadcasting response");
        for listener in self.listeners.values_mut() {
            listener(&response);
        }
        Ok(response)
    }

    /// JSON wire form of [`MessageSystem::post_message`]
    pub fn post_json(&mut self, request: &str) -> EditorResult<String> {
        let request: Request = serde_json::from_str(request)?;
        let response = self.post_message(request)?;
        Ok(serde_json::to_string(&response)?)
    }
}

impl Default for MessageSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MessageSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageSystem")
            .field("session", &self.session)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
