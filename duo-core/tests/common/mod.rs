// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! Shared fixtures for the handshake, session and app tests.

#![allow(dead_code)]

pub mod strategies;

use std::sync::Arc;

use duo_core::clock::{Clock, ManualClock};
use duo_core::handshake::{HandshakeClient, HandshakeConfig, InboundMessage, MockChannel};
use duo_core::prefs::{MemoryPreferenceStore, PreferenceStore};
use serde_json::{json, Value};

pub const HOST_ORIGIN: &str = "https://community.example";

/// Identity payload as the host posts it.
pub fn identity_payload(public_id: &str) -> Value {
    json!({
        "type": "IDENTITY_AUTH",
        "user": {
            "publicId": public_id,
            "email": "ana@example.com",
            "displayName": "Ana B.",
            "firstName": "Ana",
            "lastName": "B",
            "isAdmin": false,
            "issuedAtEpochMs": 1_760_000_000_000i64
        }
    })
}

/// Identity payload with a theme hint.
pub fn identity_payload_with_theme(public_id: &str, theme: &str) -> Value {
    let mut payload = identity_payload(public_id);
    payload["theme"] = json!(theme);
    payload
}

pub fn identity_from(origin: &str, public_id: &str) -> InboundMessage {
    InboundMessage::new(origin, identity_payload(public_id))
}

/// Fresh store handle pair: concrete (for toggling) and trait object.
pub fn memory_store() -> (Arc<MemoryPreferenceStore>, Arc<dyn PreferenceStore>) {
    let store = Arc::new(MemoryPreferenceStore::new());
    let dyn_store: Arc<dyn PreferenceStore> = store.clone();
    (store, dyn_store)
}

/// Handshake client on a manual clock at t=0.
pub fn handshake(config: HandshakeConfig) -> (HandshakeClient<MockChannel>, MockChannel, ManualClock) {
    let clock = ManualClock::new(0);
    let channel = MockChannel::new();
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    let client = HandshakeClient::new(config, channel.clone(), shared);
    (client, channel, clock)
}

pub fn retry_config(interval_ms: u64, max_attempts: u32) -> HandshakeConfig {
    HandshakeConfig {
        request_interval_ms: interval_ms,
        max_attempts,
        ..HandshakeConfig::for_origin(HOST_ORIGIN)
    }
}
