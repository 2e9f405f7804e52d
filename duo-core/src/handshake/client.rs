// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Handshake Client State Machine
//!
//! Establishes, within a bounded time budget, whether the app runs inside
//! an authorized embedding host and obtains the identity the host asserts.
//!
//! `Idle -> Requesting -> (Resolved | Blocked)`. The client is poll-driven:
//! the platform feeds inbound messages to [`HandshakeClient::handle_message`]
//! and calls [`HandshakeClient::poll`] when [`HandshakeClient::next_wakeup`]
//! is due. Time comes from the injected [`Clock`].

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::channel::MessageChannel;
use super::identity::AuthIdentity;
use super::message::{parse_identity_message, InboundMessage, MessageError, OutboundMessage};
use crate::clock::Clock;
use crate::theme::ThemeSlot;

/// Default delay between identity requests.
pub const DEFAULT_REQUEST_INTERVAL_MS: u64 = 500;

/// Default number of identity requests before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Why a handshake ended without an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockReason {
    /// Not running inside an authorized host.
    OriginMismatch,
    /// No valid identity message arrived in time.
    Timeout,
    /// No expected origin configured.
    ConfigMissing,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BlockReason::OriginMismatch => "origin mismatch",
            BlockReason::Timeout => "timeout",
            BlockReason::ConfigMissing => "expected origin not configured",
        };
        f.write_str(s)
    }
}

/// Result of a handshake. Once settled it never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeOutcome {
    Pending,
    Resolved(AuthIdentity),
    Blocked(BlockReason),
}

impl HandshakeOutcome {
    /// Returns true once the outcome is `Resolved` or `Blocked`.
    pub fn is_settled(&self) -> bool {
        !matches!(self, HandshakeOutcome::Pending)
    }

    /// Returns the identity if resolved.
    pub fn identity(&self) -> Option<&AuthIdentity> {
        match self {
            HandshakeOutcome::Resolved(identity) => Some(identity),
            _ => None,
        }
    }
}

/// Handshake configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeConfig {
    /// Origin of the authorized host. Compared byte for byte.
    pub expected_origin: Option<String>,
    /// Delay between identity requests (milliseconds).
    pub request_interval_ms: u64,
    /// Number of identity requests to send before timing out.
    pub max_attempts: u32,
    /// Skip the exchange and resolve to the development identity.
    pub dev_mode_enabled: bool,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        HandshakeConfig {
            expected_origin: None,
            request_interval_ms: DEFAULT_REQUEST_INTERVAL_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            dev_mode_enabled: false,
        }
    }
}

impl HandshakeConfig {
    /// Creates a config for the given host origin.
    pub fn for_origin(origin: impl Into<String>) -> Self {
        HandshakeConfig {
            expected_origin: Some(origin.into()),
            ..Default::default()
        }
    }

    /// Overall time budget: `request_interval_ms * max_attempts`.
    pub fn timeout_ms(&self) -> u64 {
        self.request_interval_ms
            .saturating_mul(u64::from(self.max_attempts))
    }
}

/// Lifecycle phase of a handshake instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakePhase {
    /// Created, not started.
    Idle,
    /// Listening and re-requesting on the interval.
    Requesting,
    /// Outcome latched.
    Settled,
    /// Timers cancelled and listener removed.
    TornDown,
}

/// What happened to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageDisposition {
    /// Valid identity; the handshake resolved.
    Accepted,
    /// Sender origin differs from the expected origin; dropped silently.
    UntrustedOrigin,
    /// Same-origin message failing schema validation; retries continue.
    Malformed(MessageError),
    /// Outcome already latched; ignored.
    AlreadySettled,
    /// Not started or torn down; ignored.
    NotListening,
}

/// Embedded-origin handshake client.
pub struct HandshakeClient<C: MessageChannel> {
    config: HandshakeConfig,
    channel: C,
    clock: Arc<dyn Clock>,
    theme: ThemeSlot,
    phase: HandshakePhase,
    outcome: HandshakeOutcome,
    attempts_sent: u32,
    next_request_at: Option<u64>,
    deadline: Option<u64>,
}

impl<C: MessageChannel> HandshakeClient<C> {
    /// Creates an idle client.
    pub fn new(config: HandshakeConfig, channel: C, clock: Arc<dyn Clock>) -> Self {
        HandshakeClient {
            config,
            channel,
            clock,
            theme: ThemeSlot::new(),
            phase: HandshakePhase::Idle,
            outcome: HandshakeOutcome::Pending,
            attempts_sent: 0,
            next_request_at: None,
            deadline: None,
        }
    }

    /// Uses a shared theme slot for the host's theme hint.
    pub fn with_theme_slot(mut self, theme: ThemeSlot) -> Self {
        self.theme = theme;
        self
    }

    /// Returns the current outcome.
    pub fn outcome(&self) -> &HandshakeOutcome {
        &self.outcome
    }

    /// Returns the current phase.
    pub fn phase(&self) -> HandshakePhase {
        self.phase
    }

    /// Returns the number of identity requests posted so far.
    pub fn attempts_sent(&self) -> u32 {
        self.attempts_sent
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HandshakeConfig {
        &self.config
    }

    /// Returns the channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Returns the theme slot the client publishes into.
    pub fn theme_slot(&self) -> &ThemeSlot {
        &self.theme
    }

    /// Starts the handshake. Calling it again has no effect.
    pub fn start(&mut self) -> &HandshakeOutcome {
        if self.phase != HandshakePhase::Idle {
            return &self.outcome;
        }

        if self.config.dev_mode_enabled {
            info!("development mode: bypassing identity handshake");
            self.settle(HandshakeOutcome::Resolved(AuthIdentity::development()));
            return &self.outcome;
        }

        let has_origin = self
            .config
            .expected_origin
            .as_deref()
            .is_some_and(|o| !o.trim().is_empty());
        if !has_origin {
            warn!("no expected origin configured; handshake blocked");
            self.settle(HandshakeOutcome::Blocked(BlockReason::ConfigMissing));
            return &self.outcome;
        }

        if !self.channel.is_embedded() {
            info!("not running inside a host frame; handshake blocked");
            self.settle(HandshakeOutcome::Blocked(BlockReason::OriginMismatch));
            return &self.outcome;
        }

        let now = self.clock.now_ms();
        self.phase = HandshakePhase::Requesting;
        self.deadline = Some(now.saturating_add(self.config.timeout_ms()));

        if self.config.max_attempts == 0 {
            self.settle(HandshakeOutcome::Blocked(BlockReason::Timeout));
            return &self.outcome;
        }

        self.send_request();
        self.next_request_at = Some(now.saturating_add(self.config.request_interval_ms));
        &self.outcome
    }

    /// Fires any timers due at the clock's current time.
    pub fn poll(&mut self) -> &HandshakeOutcome {
        if self.phase != HandshakePhase::Requesting {
            return &self.outcome;
        }

        let now = self.clock.now_ms();
        if self.deadline.is_some_and(|deadline| now >= deadline) {
            info!(
                attempts = self.attempts_sent,
                "no identity received in time; handshake blocked"
            );
            self.settle(HandshakeOutcome::Blocked(BlockReason::Timeout));
            return &self.outcome;
        }

        while self.attempts_sent < self.config.max_attempts {
            match self.next_request_at {
                Some(at) if now >= at => {
                    self.send_request();
                    self.next_request_at = Some(at.saturating_add(self.config.request_interval_ms));
                }
                _ => break,
            }
        }
        if self.attempts_sent >= self.config.max_attempts {
            self.next_request_at = None;
        }

        &self.outcome
    }

    /// Returns when [`poll`](Self::poll) should next be called.
    pub fn next_wakeup(&self) -> Option<u64> {
        if self.phase != HandshakePhase::Requesting {
            return None;
        }
        match (self.next_request_at, self.deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Processes an inbound message.
    pub fn handle_message(&mut self, message: &InboundMessage) -> MessageDisposition {
        match self.phase {
            HandshakePhase::Idle | HandshakePhase::TornDown => {
                return MessageDisposition::NotListening
            }
            HandshakePhase::Settled => return MessageDisposition::AlreadySettled,
            HandshakePhase::Requesting => {}
        }

        let expected = self.config.expected_origin.as_deref().unwrap_or_default();
        if message.origin != expected {
            debug!(origin = %message.origin, "dropping message from untrusted origin");
            return MessageDisposition::UntrustedOrigin;
        }

        match parse_identity_message(&message.payload) {
            Ok(identity) => {
                if let Some(mode) = identity.theme_hint {
                    self.theme.publish(mode);
                }
                info!(
                    public_id = %identity.public_id,
                    attempts = self.attempts_sent,
                    "identity handshake resolved"
                );
                self.settle(HandshakeOutcome::Resolved(identity));
                MessageDisposition::Accepted
            }
            Err(e) => {
                warn!(origin = %message.origin, error = %e, "malformed identity message");
                MessageDisposition::Malformed(e)
            }
        }
    }

    /// Cancels timers and stops listening. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.phase == HandshakePhase::TornDown {
            return;
        }
        self.next_request_at = None;
        self.deadline = None;
        self.phase = HandshakePhase::TornDown;
        debug!("identity handshake torn down");
    }

    fn settle(&mut self, outcome: HandshakeOutcome) {
        self.outcome = outcome;
        self.phase = HandshakePhase::Settled;
        self.next_request_at = None;
        self.deadline = None;
    }

    fn send_request(&mut self) {
        self.attempts_sent += 1;
        let target = self.config.expected_origin.clone().unwrap_or_default();
        match self.channel.post(&target, &OutboundMessage::IdentityRequest) {
            Ok(()) => debug!(attempt = self.attempts_sent, origin = %target, "identity requested"),
            Err(e) => warn!(attempt = self.attempts_sent, error = %e, "identity request failed"),
        }
    }
}

impl<C: MessageChannel> Drop for HandshakeClient<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
