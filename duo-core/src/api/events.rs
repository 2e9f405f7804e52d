// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Event System
//!
//! Callbacks for app-level events.

use std::sync::Arc;

use crate::handshake::BlockReason;
use crate::mode::Mode;
use crate::theme::ThemeMode;

/// Events emitted by [`DuoApp`](super::DuoApp).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuoEvent {
    /// The handshake produced an identity.
    HandshakeResolved {
        /// Public id of the admitted user.
        public_id: String,
    },

    /// The handshake was blocked.
    HandshakeBlocked {
        /// Why it was blocked.
        reason: BlockReason,
    },

    /// The mode changed in place and the handshake was rebuilt.
    ModeChanged {
        /// The new mode.
        mode: Mode,
    },

    /// The front end must hard-reload.
    ReloadRequested,

    /// The session moved between steps.
    StepChanged {
        /// Previous step index.
        from: usize,
        /// New step index.
        to: usize,
    },

    /// The host sent a theme hint.
    ThemeHint {
        /// Requested theme.
        mode: ThemeMode,
    },

    /// Error event for operations that do not return one.
    Error {
        /// Error description.
        message: String,
    },
}

/// Event handler trait.
///
/// Implement this trait to receive app events.
pub trait EventHandler: Send + Sync {
    /// Called when an event occurs.
    fn on_event(&self, event: DuoEvent);
}

/// Simple callback-based event handler.
///
/// Wraps a closure for easy event handling.
pub struct CallbackHandler<F>
where
    F: Fn(DuoEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackHandler<F>
where
    F: Fn(DuoEvent) + Send + Sync,
{
    /// Creates a new callback handler.
    pub fn new(callback: F) -> Self {
        CallbackHandler { callback }
    }
}

impl<F> EventHandler for CallbackHandler<F>
where
    F: Fn(DuoEvent) + Send + Sync,
{
    fn on_event(&self, event: DuoEvent) {
        (self.callback)(event);
    }
}

/// Event dispatcher for managing multiple handlers.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    /// Creates a new event dispatcher.
    pub fn new() -> Self {
        EventDispatcher {
            handlers: Vec::new(),
        }
    }

    /// Adds an event handler.
    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    /// Removes all handlers.
    pub fn clear_handlers(&mut self) {
        self.handlers.clear();
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Dispatches an event to all handlers.
    pub fn dispatch(&self, event: DuoEvent) {
        for handler in &self.handlers {
            handler.on_event(event.clone());
        }
    }
}
