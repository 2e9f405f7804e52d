// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! tokio driver for the handshake client.
//!
//! Runs the poll-driven client on an event loop: inbound messages arrive on
//! an `mpsc` channel, timers are `sleep_until` the client's next wakeup.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

use super::channel::MessageChannel;
use super::client::{HandshakeClient, HandshakeConfig, HandshakeOutcome};
use super::message::InboundMessage;
use crate::clock::Clock;
use crate::theme::ThemeSlot;

/// Clock backed by tokio's time source (honours paused time in tests).
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TokioClock {
    /// Creates a clock reading zero now.
    pub fn new() -> Self {
        TokioClock {
            origin: Instant::now(),
        }
    }

    fn instant_at(&self, ms: u64) -> Instant {
        self.origin + Duration::from_millis(ms)
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Runs one handshake instance to completion on the current tokio runtime.
pub struct HandshakeDriver<C: MessageChannel> {
    client: HandshakeClient<C>,
    clock: TokioClock,
    inbound: mpsc::Receiver<InboundMessage>,
}

impl<C: MessageChannel> HandshakeDriver<C> {
    /// Creates a driver. Inbound messages are read from `inbound`.
    pub fn new(config: HandshakeConfig, channel: C, inbound: mpsc::Receiver<InboundMessage>) -> Self {
        let clock = TokioClock::new();
        HandshakeDriver {
            client: HandshakeClient::new(config, channel, Arc::new(clock)),
            clock,
            inbound,
        }
    }

    /// Uses a shared theme slot for the host's theme hint.
    pub fn with_theme_slot(mut self, theme: ThemeSlot) -> Self {
        self.client = self.client.with_theme_slot(theme);
        self
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &HandshakeClient<C> {
        &self.client
    }

    /// Runs until the outcome settles.
    pub async fn run(self) -> HandshakeOutcome {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Runs until the outcome settles or `shutdown` completes.
    ///
    /// On shutdown the client is torn down and the outcome may still be
    /// `Pending`.
    pub async fn run_until<F: Future>(mut self, shutdown: F) -> HandshakeOutcome {
        tokio::pin!(shutdown);
        self.client.start();
        let mut inbound_open = true;

        while !self.client.outcome().is_settled() {
            let Some(wakeup) = self.client.next_wakeup() else {
                break;
            };
            let wake_at = self.clock.instant_at(wakeup);

            tokio::select! {
                _ = &mut shutdown => {
                    debug!("handshake driver shut down");
                    break;
                }
                message = self.inbound.recv(), if inbound_open => match message {
                    Some(message) => {
                        self.client.handle_message(&message);
                    }
                    None => inbound_open = false,
                },
                _ = tokio::time::sleep_until(wake_at) => {
                    self.client.poll();
                }
            }
        }

        let outcome = self.client.outcome().clone();
        self.client.teardown();
        outcome
    }
}
