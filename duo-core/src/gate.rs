// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Gate Decisions
//!
//! Pure mappings from handshake and membership state to the screen family
//! the front end renders.

use crate::handshake::{AuthIdentity, BlockReason, HandshakeOutcome};
use crate::member::{AppSettings, Member};

/// Screen family picked from a handshake outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate<'a> {
    /// Handshake in flight.
    Loading,
    /// Not inside an authorized host.
    AccessDenied,
    /// Blocked for a reason that is not an access decision (timeout or
    /// missing configuration).
    Unavailable(BlockReason),
    /// Identity established.
    Admitted(&'a AuthIdentity),
}

/// Maps a handshake outcome to a gate. Total and side-effect free.
pub fn decide(outcome: &HandshakeOutcome) -> Gate<'_> {
    match outcome {
        HandshakeOutcome::Pending => Gate::Loading,
        HandshakeOutcome::Blocked(BlockReason::OriginMismatch) => Gate::AccessDenied,
        HandshakeOutcome::Blocked(reason) => Gate::Unavailable(*reason),
        HandshakeOutcome::Resolved(identity) => Gate::Admitted(identity),
    }
}

/// Paywall decision for an authenticated member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    PaymentRequired { url: Option<String> },
}

/// Decides whether a member may start a run.
pub fn paywall(settings: &AppSettings, member: &Member) -> Access {
    if !settings.paywall_enabled || member.has_paid || member.is_admin {
        return Access::Granted;
    }
    Access::PaymentRequired {
        url: settings.paywall_url.clone(),
    }
}
