//! Session gate: decides whether the console shows the login form or the
//! catalog.
//!
//! The gate starts `Unauthenticated` and only becomes `Authenticated` through
//! a successful sign-in or a successful check of a stored token. There is no
//! logout; a later failed check is the only way back.

use crate::client::ApiClient;
use crate::config;
use crate::error::Result;
use crate::events::{ConsoleEvent, EventBus};
use crate::models::{Credential, SessionState, SessionToken};
use crate::token_store::TokenStore;

pub struct SessionGate {
    state: SessionState,
    store: Box<dyn TokenStore>,
}

impl SessionGate {
    pub fn new(store: Box<dyn TokenStore>) -> Self {
        Self {
            state: SessionState::Unauthenticated,
            store,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// Load the persisted token, if any, into the client's session context.
    ///
    /// Store failures are logged and read as "no token".
    pub fn restore(&mut self, client: &mut ApiClient) -> Option<SessionToken> {
        match self.store.load() {
            Ok(Some(token)) => {
                log::debug!("restored session token expiring {}", token.expires);
                client.session_mut().install(token.clone());
                Some(token)
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("could not read token store: {}", e);
                None
            }
        }
    }

    /// Probe the remote with the current token. Failures are silent and
    /// resolve to `Unauthenticated`.
    pub fn check_session(&mut self, client: &mut ApiClient, events: &EventBus) -> SessionState {
        let next = match client.check() {
            Ok(()) => SessionState::Authenticated,
            Err(e) => {
                log::info!("session check failed: {}", e);
                SessionState::Unauthenticated
            }
        };
        self.set_state(next, events);
        next
    }

    /// Sign in, persist the token, and flip to `Authenticated`.
    ///
    /// On failure an alert is raised and the gate stays where it was.
    pub fn login(
        &mut self,
        client: &mut ApiClient,
        credential: &Credential,
        events: &EventBus,
    ) -> Result<SessionToken> {
        let token = match client.signin(credential) {
            Ok(token) => token,
            Err(e) => {
                log::warn!("login failed for {}: {}", credential.username, e);
                events.emit(ConsoleEvent::Alert(config::LOGIN_FAILED_ALERT.to_string()));
                return Err(e);
            }
        };

        if let Err(e) = self.store.save(&token) {
            log::warn!("could not persist session token: {}", e);
        }
        client.session_mut().install(token.clone());
        log::info!("signed in as {}", credential.username);
        self.set_state(SessionState::Authenticated, events);
        Ok(token)
    }

    fn set_state(&mut self, state: SessionState, events: &EventBus) {
        if self.state != state {
            self.state = state;
            events.emit(ConsoleEvent::SessionChanged(state));
        }
    }
}
