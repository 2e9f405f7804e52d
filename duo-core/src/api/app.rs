// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Duo-Connecte Orchestrator
//!
//! Main entry point. Wires the mode switch, the identity handshake keyed to
//! that mode, the gate and the session machine around one preference store.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use duo_core::api::{DuoApp, DuoConfig};
//! use duo_core::clock::SystemClock;
//!
//! let config = DuoConfig::default().with_expected_origin("https://community.example");
//! let mut app = DuoApp::open(config, Arc::new(SystemClock), PostMessageChannel::new)?;
//!
//! // Platform glue
//! app.handle_message(&inbound);
//! app.poll();
//!
//! match app.gate() {
//!     Gate::Admitted(identity) => render_app(identity),
//!     Gate::Loading => render_spinner(),
//!     _ => render_denied(),
//! }
//! ```

use std::sync::Arc;

use super::config::DuoConfig;
use super::error::{DuoError, DuoResult};
use super::events::{CallbackHandler, DuoEvent, EventDispatcher, EventHandler};
use crate::clock::Clock;
use crate::gate::{decide, Gate};
use crate::handshake::{
    AuthIdentity, HandshakeClient, HandshakeOutcome, InboundMessage, MessageChannel,
    MessageDisposition,
};
use crate::mode::{Mode, ModeChange, ModeSwitch};
use crate::prefs::{PreferenceStore, SqlitePreferenceStore};
use crate::session::{Outcome, SessionError, SessionMachine};
use crate::theme::{effective_theme, ThemeMode, ThemeSlot};

type ChannelFactory<C> = Box<dyn FnMut() -> C + Send>;

/// Main Duo-Connecte orchestrator.
pub struct DuoApp<C: MessageChannel> {
    config: DuoConfig,
    store: Arc<dyn PreferenceStore>,
    clock: Arc<dyn Clock>,
    mode: ModeSwitch,
    handshake: HandshakeClient<C>,
    new_channel: ChannelFactory<C>,
    session: SessionMachine,
    events: EventDispatcher,
    theme: ThemeSlot,
}

impl<C: MessageChannel> DuoApp<C> {
    /// Creates the app and starts the handshake for the persisted mode.
    ///
    /// `new_channel` is called once per handshake instance.
    pub fn new<F>(
        config: DuoConfig,
        store: Arc<dyn PreferenceStore>,
        clock: Arc<dyn Clock>,
        mut new_channel: F,
    ) -> Self
    where
        F: FnMut() -> C + Send + 'static,
    {
        let mode = ModeSwitch::load(store.clone(), config.default_mode);
        let theme = ThemeSlot::new();
        let mut handshake = HandshakeClient::new(
            config.handshake_config(mode.current()),
            new_channel(),
            clock.clone(),
        )
        .with_theme_slot(theme.clone());
        handshake.start();
        let session = SessionMachine::initialize(store.clone(), clock.clone());

        DuoApp {
            config,
            store,
            clock,
            mode,
            handshake,
            new_channel: Box::new(new_channel),
            session,
            events: EventDispatcher::new(),
            theme,
        }
    }

    /// Creates the app over the SQLite store at `config.storage_path`.
    pub fn open<F>(config: DuoConfig, clock: Arc<dyn Clock>, new_channel: F) -> DuoResult<Self>
    where
        F: FnMut() -> C + Send + 'static,
    {
        if config.storage_path.as_os_str().is_empty() || config.storage_path.is_dir() {
            return Err(DuoError::Configuration(format!(
                "storage path must name a database file: {}",
                config.storage_path.display()
            )));
        }
        let store: Arc<dyn PreferenceStore> =
            Arc::new(SqlitePreferenceStore::open(&config.storage_path)?);
        Ok(Self::new(config, store, clock, new_channel))
    }

    // === Events ===

    /// Adds an event handler.
    pub fn add_event_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.events.add_handler(handler);
    }

    /// Adds a closure as event handler.
    pub fn on_event<F>(&mut self, callback: F)
    where
        F: Fn(DuoEvent) + Send + Sync + 'static,
    {
        self.events
            .add_handler(Arc::new(CallbackHandler::new(callback)));
    }

    // === Accessors ===

    pub fn config(&self) -> &DuoConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn PreferenceStore> {
        &self.store
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode.current()
    }

    /// Current handshake instance.
    pub fn handshake(&self) -> &HandshakeClient<C> {
        &self.handshake
    }

    /// Screen family to render.
    pub fn gate(&self) -> Gate<'_> {
        decide(self.handshake.outcome())
    }

    /// Identity of the admitted user.
    pub fn identity(&self) -> Option<&AuthIdentity> {
        self.handshake.outcome().identity()
    }

    /// Theme to render.
    pub fn theme(&self) -> ThemeMode {
        effective_theme(&self.theme, self.store.as_ref())
    }

    pub fn session(&self) -> &SessionMachine {
        &self.session
    }

    /// Direct session access. Transitions made here emit no events.
    pub fn session_mut(&mut self) -> &mut SessionMachine {
        &mut self.session
    }

    // === Handshake ===

    /// Feeds an inbound message from the parent-frame channel.
    pub fn handle_message(&mut self, message: &InboundMessage) -> MessageDisposition {
        let disposition = self.handshake.handle_message(message);
        if disposition == MessageDisposition::Accepted {
            self.emit_outcome();
        }
        disposition
    }

    /// Fires due handshake timers.
    pub fn poll(&mut self) {
        let was_settled = self.handshake.outcome().is_settled();
        self.handshake.poll();
        if !was_settled && self.handshake.outcome().is_settled() {
            self.emit_outcome();
        }
    }

    /// Next time [`poll`](Self::poll) is due, if any.
    pub fn next_wakeup(&self) -> Option<u64> {
        self.handshake.next_wakeup()
    }

    // === Mode ===

    /// Changes the mode. A switch rebuilds the handshake from scratch; a
    /// reload rebuilds everything from the store.
    pub fn set_mode(&mut self, target: Mode) -> ModeChange {
        let change = self.mode.set_mode(target);
        match change {
            ModeChange::Unchanged => {}
            ModeChange::Switched(mode) => {
                self.restart_handshake();
                self.events.dispatch(DuoEvent::ModeChanged { mode });
            }
            ModeChange::ReloadRequired => {
                self.events.dispatch(DuoEvent::ReloadRequested);
                self.reload();
            }
        }
        change
    }

    /// Rebuilds in-memory state from the store, as a page reload would.
    pub fn reload(&mut self) {
        self.mode = ModeSwitch::load(self.store.clone(), self.config.default_mode);
        self.theme = ThemeSlot::new();
        self.session = SessionMachine::initialize(self.store.clone(), self.clock.clone());
        self.restart_handshake();
    }

    // === Session ===

    /// Follows the step graph and emits [`DuoEvent::StepChanged`], or
    /// [`DuoEvent::Error`] when the move is rejected.
    pub fn advance(&mut self, outcome: Outcome) -> Result<usize, SessionError> {
        let from = self.session.current_step();
        match self.session.advance(outcome) {
            Ok(to) => {
                self.events.dispatch(DuoEvent::StepChanged { from, to });
                Ok(to)
            }
            Err(e) => {
                self.events.dispatch(DuoEvent::Error {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Jumps to a step and emits [`DuoEvent::StepChanged`].
    pub fn go_to_step(&mut self, target: usize) {
        let from = self.session.current_step();
        self.session.go_to_step(target);
        self.events
            .dispatch(DuoEvent::StepChanged { from, to: target });
    }

    /// Steps back; emits [`DuoEvent::StepChanged`] only if the step moved.
    pub fn go_back(&mut self) {
        let from = self.session.current_step();
        self.session.go_back();
        let to = self.session.current_step();
        if from != to {
            self.events.dispatch(DuoEvent::StepChanged { from, to });
        }
    }

    fn restart_handshake(&mut self) {
        // The old instance stops listening before the new one starts.
        self.handshake.teardown();
        let mut next = HandshakeClient::new(
            self.config.handshake_config(self.mode.current()),
            (self.new_channel)(),
            self.clock.clone(),
        )
        .with_theme_slot(self.theme.clone());
        next.start();
        self.handshake = next;
        if self.handshake.outcome().is_settled() {
            self.emit_outcome();
        }
    }

    fn emit_outcome(&self) {
        match self.handshake.outcome() {
            HandshakeOutcome::Pending => {}
            HandshakeOutcome::Resolved(identity) => {
                self.events.dispatch(DuoEvent::HandshakeResolved {
                    public_id: identity.public_id.clone(),
                });
                if let Some(mode) = identity.theme_hint {
                    self.events.dispatch(DuoEvent::ThemeHint { mode });
                }
            }
            HandshakeOutcome::Blocked(reason) => {
                self.events
                    .dispatch(DuoEvent::HandshakeBlocked { reason: *reason });
            }
        }
    }
}
