// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Embedded-Origin Handshake Module
//!
//! Bounded request/response exchange with the parent frame that hosts the
//! app. Validates the sender origin and the identity payload, and latches
//! to an authenticated identity or a blocked result.

mod channel;
mod client;
#[cfg(feature = "runtime")]
pub mod driver;
mod identity;
mod message;

pub use channel::{ChannelError, MessageChannel, MockChannel, SentMessage};
pub use client::{
    BlockReason, HandshakeClient, HandshakeConfig, HandshakeOutcome, HandshakePhase,
    MessageDisposition, DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_INTERVAL_MS,
};
#[cfg(feature = "runtime")]
pub use driver::{HandshakeDriver, TokioClock};
pub use identity::AuthIdentity;
pub use message::{
    parse_identity_message, InboundMessage, MessageError, OutboundMessage, IDENTITY_AUTH_TYPE,
    IDENTITY_REQUEST_TYPE,
};
