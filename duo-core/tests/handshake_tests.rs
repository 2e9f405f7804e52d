// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Handshake Integration Tests
//!
//! Drives the poll-based handshake client on a manual clock:
//! - Origin validation and latching
//! - Retry cadence and timeout
//! - Development bypass and configuration errors
//! - Teardown

mod common;

use common::strategies::{origin_strategy, public_id_strategy};
use common::*;
use duo_core::handshake::{
    BlockReason, HandshakeConfig, HandshakeOutcome, HandshakePhase, InboundMessage,
    MessageDisposition, MessageError, MockChannel, OutboundMessage, IDENTITY_REQUEST_TYPE,
};
use duo_core::theme::ThemeMode;
use duo_core::{Clock, HandshakeClient, ManualClock};
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

// ============================================================
// Resolution
// ============================================================

#[test]
fn test_resolves_on_matching_origin() {
    let (mut client, channel, clock) = handshake(retry_config(500, 10));
    client.start();
    assert_eq!(client.outcome(), &HandshakeOutcome::Pending);
    assert_eq!(channel.sent_count(), 1);

    clock.advance(120);
    let disposition = client.handle_message(&identity_from(HOST_ORIGIN, "m-42"));

    assert_eq!(disposition, MessageDisposition::Accepted);
    assert_eq!(client.phase(), HandshakePhase::Settled);
    let identity = client.outcome().identity().expect("resolved");
    assert_eq!(identity.public_id, "m-42");
    assert_eq!(identity.email, "ana@example.com");
    assert!(!identity.is_admin);
}

#[test]
fn test_requests_target_expected_origin() {
    let (mut client, channel, _clock) = handshake(retry_config(500, 10));
    client.start();

    let sent = channel.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].target_origin, HOST_ORIGIN);
    assert_eq!(sent[0].message, OutboundMessage::IdentityRequest);

    let json: serde_json::Value =
        serde_json::from_str(&sent[0].message.to_json().unwrap()).unwrap();
    assert_eq!(json["type"], IDENTITY_REQUEST_TYPE);
}

#[test]
fn test_origin_comparison_is_case_sensitive() {
    let (mut client, _channel, clock) = handshake(retry_config(500, 3));
    client.start();

    let disposition =
        client.handle_message(&identity_from("https://Community.example", "m-42"));
    assert_eq!(disposition, MessageDisposition::UntrustedOrigin);
    assert_eq!(client.outcome(), &HandshakeOutcome::Pending);

    clock.set(1500);
    client.poll();
    assert_eq!(
        client.outcome(),
        &HandshakeOutcome::Blocked(BlockReason::Timeout)
    );
}

#[test]
fn test_origin_with_trailing_slash_is_untrusted() {
    let (mut client, _channel, _clock) = handshake(retry_config(500, 3));
    client.start();

    let message = identity_from(&format!("{}/", HOST_ORIGIN), "m-42");
    assert_eq!(
        client.handle_message(&message),
        MessageDisposition::UntrustedOrigin
    );
}

#[test]
fn test_theme_hint_is_published() {
    let (mut client, _channel, _clock) = handshake(retry_config(500, 3));
    client.start();

    let message = InboundMessage::new(HOST_ORIGIN, identity_payload_with_theme("m-1", "dark"));
    client.handle_message(&message);

    assert_eq!(client.theme_slot().current(), Some(ThemeMode::Dark));
    assert_eq!(
        client.outcome().identity().unwrap().theme_hint,
        Some(ThemeMode::Dark)
    );
}

// ============================================================
// Retry cadence and timeout
// ============================================================

#[test]
fn test_timeout_after_three_attempts() {
    let (mut client, channel, clock) = handshake(retry_config(500, 3));
    client.start();
    assert_eq!(channel.sent_count(), 1);

    clock.set(499);
    client.poll();
    assert_eq!(channel.sent_count(), 1);

    clock.set(500);
    client.poll();
    assert_eq!(channel.sent_count(), 2);

    clock.set(1000);
    client.poll();
    assert_eq!(channel.sent_count(), 3);

    clock.set(1499);
    client.poll();
    assert_eq!(client.outcome(), &HandshakeOutcome::Pending);

    clock.set(1500);
    client.poll();
    assert_eq!(
        client.outcome(),
        &HandshakeOutcome::Blocked(BlockReason::Timeout)
    );

    clock.set(10_000);
    client.poll();
    assert_eq!(channel.sent_count(), 3);
    assert_eq!(client.attempts_sent(), 3);
}

#[test]
fn test_late_poll_catches_up_requests() {
    let (mut client, channel, clock) = handshake(retry_config(500, 3));
    client.start();

    clock.set(1200);
    client.poll();

    assert_eq!(channel.sent_count(), 3);
    assert_eq!(client.outcome(), &HandshakeOutcome::Pending);
    assert_eq!(client.next_wakeup(), Some(1500));
}

#[test]
fn test_next_wakeup_tracks_timers() {
    let (mut client, _channel, clock) = handshake(retry_config(500, 2));
    assert_eq!(client.next_wakeup(), None);

    client.start();
    assert_eq!(client.next_wakeup(), Some(500));

    clock.set(500);
    client.poll();
    assert_eq!(client.next_wakeup(), Some(1000));

    client.handle_message(&identity_from(HOST_ORIGIN, "m-1"));
    assert_eq!(client.next_wakeup(), None);
}

#[test]
fn test_no_requests_after_resolution() {
    let (mut client, channel, clock) = handshake(retry_config(500, 10));
    client.start();

    clock.set(250);
    client.handle_message(&identity_from(HOST_ORIGIN, "m-42"));

    for t in [500, 1000, 5000, 60_000] {
        clock.set(t);
        client.poll();
    }
    assert_eq!(channel.sent_count(), 1);
    assert!(client.outcome().is_settled());
}

#[test]
fn test_failed_posts_still_count_as_attempts() {
    let clock = ManualClock::new(0);
    let channel = MockChannel::failing();
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    let mut client = HandshakeClient::new(retry_config(100, 3), channel.clone(), shared);
    client.start();

    clock.set(200);
    client.poll();
    clock.set(300);
    client.poll();

    assert_eq!(channel.sent_count(), 3);
    assert_eq!(
        client.outcome(),
        &HandshakeOutcome::Blocked(BlockReason::Timeout)
    );
}

#[test]
fn test_zero_attempts_times_out_immediately() {
    let (mut client, channel, _clock) = handshake(retry_config(500, 0));
    client.start();

    assert_eq!(
        client.outcome(),
        &HandshakeOutcome::Blocked(BlockReason::Timeout)
    );
    assert_eq!(channel.sent_count(), 0);
}

// ============================================================
// Malformed messages
// ============================================================

#[test]
fn test_malformed_message_keeps_listening() {
    let (mut client, _channel, _clock) = handshake(retry_config(500, 3));
    client.start();

    let missing_user = InboundMessage::new(HOST_ORIGIN, json!({ "type": "IDENTITY_AUTH" }));
    assert!(matches!(
        client.handle_message(&missing_user),
        MessageDisposition::Malformed(MessageError::InvalidPayload(_))
    ));

    let wrong_type = InboundMessage::new(HOST_ORIGIN, json!({ "type": "PING" }));
    assert_eq!(
        client.handle_message(&wrong_type),
        MessageDisposition::Malformed(MessageError::UnexpectedType("PING".into()))
    );

    let blank_id = identity_from(HOST_ORIGIN, "  ");
    assert_eq!(
        client.handle_message(&blank_id),
        MessageDisposition::Malformed(MessageError::EmptyPublicId)
    );

    assert_eq!(client.outcome(), &HandshakeOutcome::Pending);
    assert_eq!(
        client.handle_message(&identity_from(HOST_ORIGIN, "m-7")),
        MessageDisposition::Accepted
    );
}

// ============================================================
// Latching
// ============================================================

#[test]
fn test_first_identity_wins() {
    let (mut client, _channel, _clock) = handshake(retry_config(500, 3));
    client.start();

    client.handle_message(&identity_from(HOST_ORIGIN, "first"));
    let second = client.handle_message(&identity_from(HOST_ORIGIN, "second"));

    assert_eq!(second, MessageDisposition::AlreadySettled);
    assert_eq!(client.outcome().identity().unwrap().public_id, "first");
}

#[test]
fn test_identity_after_timeout_is_ignored() {
    let (mut client, _channel, clock) = handshake(retry_config(500, 3));
    client.start();
    clock.set(1500);
    client.poll();

    let late = client.handle_message(&identity_from(HOST_ORIGIN, "late"));

    assert_eq!(late, MessageDisposition::AlreadySettled);
    assert_eq!(
        client.outcome(),
        &HandshakeOutcome::Blocked(BlockReason::Timeout)
    );
}

// ============================================================
// Development mode and configuration
// ============================================================

#[test]
fn test_dev_mode_resolves_synchronously() {
    let config = HandshakeConfig {
        dev_mode_enabled: true,
        ..retry_config(500, 3)
    };
    let (mut client, channel, _clock) = handshake(config);

    client.start();

    let identity = client.outcome().identity().expect("dev identity");
    assert_eq!(identity.public_id, "dev-user");
    assert!(identity.is_admin);
    assert_eq!(channel.sent_count(), 0);
}

#[test]
fn test_dev_mode_wins_over_missing_origin() {
    let config = HandshakeConfig {
        dev_mode_enabled: true,
        ..HandshakeConfig::default()
    };
    let (mut client, _channel, _clock) = handshake(config);

    assert!(client.start().identity().is_some());
}

#[test]
fn test_missing_origin_blocks_with_config_missing() {
    for origin in [None, Some(String::new()), Some("   ".to_string())] {
        let config = HandshakeConfig {
            expected_origin: origin,
            ..HandshakeConfig::default()
        };
        let (mut client, channel, _clock) = handshake(config);
        client.start();

        assert_eq!(
            client.outcome(),
            &HandshakeOutcome::Blocked(BlockReason::ConfigMissing)
        );
        assert_eq!(channel.sent_count(), 0);
    }
}

#[test]
fn test_top_level_page_is_origin_mismatch() {
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(0));
    let mut client =
        HandshakeClient::new(retry_config(500, 3), MockChannel::top_level(), clock);

    client.start();

    assert_eq!(
        client.outcome(),
        &HandshakeOutcome::Blocked(BlockReason::OriginMismatch)
    );
}

// ============================================================
// Lifecycle
// ============================================================

#[test]
fn test_messages_before_start_are_ignored() {
    let (mut client, _channel, _clock) = handshake(retry_config(500, 3));
    assert_eq!(
        client.handle_message(&identity_from(HOST_ORIGIN, "m-1")),
        MessageDisposition::NotListening
    );
    assert_eq!(client.phase(), HandshakePhase::Idle);
}

#[test]
fn test_teardown_stops_timers_and_listener() {
    let (mut client, channel, clock) = handshake(retry_config(500, 3));
    client.start();
    client.teardown();
    client.teardown();

    clock.set(5000);
    client.poll();
    let late = client.handle_message(&identity_from(HOST_ORIGIN, "m-1"));

    assert_eq!(late, MessageDisposition::NotListening);
    assert_eq!(channel.sent_count(), 1);
    assert_eq!(client.outcome(), &HandshakeOutcome::Pending);
    assert_eq!(client.phase(), HandshakePhase::TornDown);
}

#[test]
fn test_start_twice_sends_once() {
    let (mut client, channel, _clock) = handshake(retry_config(500, 3));
    client.start();
    client.start();
    assert_eq!(channel.sent_count(), 1);
}

// ============================================================
// Properties
// ============================================================

proptest! {
    #[test]
    fn prop_only_expected_origin_resolves(
        expected in origin_strategy(),
        sender in origin_strategy(),
        public_id in public_id_strategy(),
    ) {
        let config = HandshakeConfig {
            request_interval_ms: 500,
            max_attempts: 3,
            ..HandshakeConfig::for_origin(expected.clone())
        };
        let (mut client, _channel, _clock) = handshake(config);
        client.start();

        let disposition = client.handle_message(&identity_from(&sender, &public_id));

        if sender == expected {
            prop_assert_eq!(disposition, MessageDisposition::Accepted);
            prop_assert_eq!(&client.outcome().identity().unwrap().public_id, &public_id);
        } else {
            prop_assert_eq!(disposition, MessageDisposition::UntrustedOrigin);
            prop_assert_eq!(client.outcome(), &HandshakeOutcome::Pending);
        }
    }

    #[test]
    fn prop_requests_never_exceed_max_attempts(
        interval in 1u64..1000,
        max_attempts in 0u32..12,
        steps in proptest::collection::vec(0u64..2000, 0..20),
    ) {
        let (mut client, channel, clock) = handshake(retry_config(interval, max_attempts));
        client.start();
        for step in steps {
            clock.advance(step);
            client.poll();
        }
        prop_assert!(channel.sent_count() <= max_attempts as usize);
    }
}
