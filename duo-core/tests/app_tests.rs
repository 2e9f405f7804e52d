// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! App Orchestrator Tests
//!
//! Mode-keyed handshake rebuilds, gate decisions and event emission.

mod common;

use std::sync::{Arc, Mutex};

use common::*;
use duo_core::api::{DuoApp, DuoConfig, DuoError, DuoEvent};
use duo_core::clock::{Clock, ManualClock};
use duo_core::gate::Gate;
use duo_core::handshake::{BlockReason, HandshakePhase, InboundMessage, MockChannel};
use duo_core::mode::{Mode, ModeChange};
use duo_core::prefs::keys::{MODE_KEY, SESSION_TOKEN_KEY};
use duo_core::prefs::PreferenceStore;
use duo_core::session::{FlowKind, Outcome, SessionError, SessionUpdate};
use duo_core::theme::ThemeMode;

struct Harness {
    app: DuoApp<MockChannel>,
    clock: ManualClock,
    channels: Arc<Mutex<Vec<MockChannel>>>,
    events: Arc<Mutex<Vec<DuoEvent>>>,
    store: Arc<dyn PreferenceStore>,
}

impl Harness {
    fn events(&self) -> Vec<DuoEvent> {
        self.events.lock().unwrap().clone()
    }

    fn channel(&self, index: usize) -> MockChannel {
        self.channels.lock().unwrap()[index].clone()
    }

    fn channel_count(&self) -> usize {
        self.channels.lock().unwrap().len()
    }
}

fn harness_with(config: DuoConfig, store: Arc<dyn PreferenceStore>, embedded: bool) -> Harness {
    let clock = ManualClock::new(0);
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    let channels = Arc::new(Mutex::new(Vec::new()));
    let factory_channels = channels.clone();
    let mut app = DuoApp::new(config, store.clone(), shared, move || {
        let channel = if embedded {
            MockChannel::new()
        } else {
            MockChannel::top_level()
        };
        factory_channels.lock().unwrap().push(channel.clone());
        channel
    });

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    app.on_event(move |event| sink.lock().unwrap().push(event));

    Harness {
        app,
        clock,
        channels,
        events,
        store,
    }
}

fn harness() -> Harness {
    let (_, store) = memory_store();
    let config = DuoConfig::default()
        .with_expected_origin(HOST_ORIGIN)
        .with_retry(500, 3);
    harness_with(config, store, true)
}

// ============================================================
// Gate
// ============================================================

#[test]
fn test_production_app_admits_after_handshake() {
    let mut h = harness();
    assert_eq!(h.app.mode(), Mode::Production);
    assert_eq!(h.app.gate(), Gate::Loading);
    assert_eq!(h.channel(0).sent_count(), 1);

    h.app.handle_message(&identity_from(HOST_ORIGIN, "m-42"));

    match h.app.gate() {
        Gate::Admitted(identity) => assert_eq!(identity.public_id, "m-42"),
        other => panic!("expected admitted, got {:?}", other),
    }
    assert_eq!(
        h.events(),
        vec![DuoEvent::HandshakeResolved {
            public_id: "m-42".into()
        }]
    );
}

#[test]
fn test_missing_origin_is_unavailable() {
    let (_, store) = memory_store();
    let h = harness_with(DuoConfig::default(), store, true);
    assert_eq!(h.app.gate(), Gate::Unavailable(BlockReason::ConfigMissing));
}

#[test]
fn test_top_level_page_is_access_denied() {
    let (_, store) = memory_store();
    let config = DuoConfig::default().with_expected_origin(HOST_ORIGIN);
    let h = harness_with(config, store, false);
    assert_eq!(h.app.gate(), Gate::AccessDenied);
}

#[test]
fn test_timeout_emits_blocked_once() {
    let mut h = harness();
    for t in [500, 1000, 1500, 2000] {
        h.clock.set(t);
        h.app.poll();
    }

    assert_eq!(h.app.gate(), Gate::Unavailable(BlockReason::Timeout));
    assert_eq!(
        h.events(),
        vec![DuoEvent::HandshakeBlocked {
            reason: BlockReason::Timeout
        }]
    );
    assert_eq!(h.channel(0).sent_count(), 3);
}

#[test]
fn test_theme_hint_reaches_app_theme() {
    let mut h = harness();
    assert_eq!(h.app.theme(), ThemeMode::Light);

    let message = InboundMessage::new(HOST_ORIGIN, identity_payload_with_theme("m-1", "dark"));
    h.app.handle_message(&message);

    assert_eq!(h.app.theme(), ThemeMode::Dark);
    assert!(h.events().contains(&DuoEvent::ThemeHint {
        mode: ThemeMode::Dark
    }));
}

// ============================================================
// Mode changes
// ============================================================

#[test]
fn test_entering_development_rebuilds_handshake() {
    let mut h = harness();
    assert_eq!(h.app.gate(), Gate::Loading);

    let change = h.app.set_mode(Mode::Development);

    assert_eq!(change, ModeChange::Switched(Mode::Development));
    assert_eq!(h.channel_count(), 2);
    assert_eq!(h.channel(1).sent_count(), 0);
    match h.app.gate() {
        Gate::Admitted(identity) => assert_eq!(identity.public_id, "dev-user"),
        other => panic!("expected dev identity, got {:?}", other),
    }
    assert_eq!(
        h.events(),
        vec![
            DuoEvent::HandshakeResolved {
                public_id: "dev-user".into()
            },
            DuoEvent::ModeChanged {
                mode: Mode::Development
            },
        ]
    );

    // The first instance no longer sends.
    h.clock.set(5000);
    h.app.poll();
    assert_eq!(h.channel(0).sent_count(), 1);
}

#[test]
fn test_entering_production_requests_reload() {
    let (_, store) = memory_store();
    store.set(MODE_KEY, "development").unwrap();
    store.set(SESSION_TOKEN_KEY, "s-token").unwrap();
    let config = DuoConfig::default().with_expected_origin(HOST_ORIGIN);
    let mut h = harness_with(config, store, true);
    assert_eq!(h.app.mode(), Mode::Development);
    h.app
        .session_mut()
        .update(SessionUpdate::names("Léa", "Marc"));

    let change = h.app.set_mode(Mode::Production);

    assert_eq!(change, ModeChange::ReloadRequired);
    assert_eq!(h.events()[0], DuoEvent::ReloadRequested);
    assert_eq!(h.app.mode(), Mode::Production);
    assert_eq!(h.app.gate(), Gate::Loading);
    assert_eq!(h.app.handshake().phase(), HandshakePhase::Requesting);
    assert_eq!(h.store.get(SESSION_TOKEN_KEY).unwrap(), None);
    assert_eq!(h.app.session().state().participant_a_name, "Léa");

    // Already production now.
    assert_eq!(h.app.set_mode(Mode::Production), ModeChange::Unchanged);
}

// ============================================================
// Session events
// ============================================================

#[test]
fn test_navigation_emits_step_changes() {
    let mut h = harness();
    h.app.session_mut().choose_flow(FlowKind::Solo).unwrap();

    assert_eq!(h.app.advance(Outcome::Continue).unwrap(), 1);
    h.app.go_to_step(5);
    h.app.go_back();

    assert_eq!(
        h.events(),
        vec![
            DuoEvent::StepChanged { from: 0, to: 1 },
            DuoEvent::StepChanged { from: 1, to: 5 },
            DuoEvent::StepChanged { from: 5, to: 4 },
        ]
    );
}

#[test]
fn test_rejected_advance_emits_error() {
    let mut h = harness();
    h.app.session_mut().choose_flow(FlowKind::Duo).unwrap();
    h.app.advance(Outcome::Continue).unwrap();

    assert_eq!(
        h.app.advance(Outcome::Continue),
        Err(SessionError::NamesRequired)
    );

    let events = h.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(
        &events[1],
        DuoEvent::Error { message } if message.contains("named")
    ));
}

#[test]
fn test_go_back_at_zero_emits_nothing() {
    let mut h = harness();
    h.app.go_back();
    assert!(h.events().is_empty());
}

#[test]
fn test_open_uses_sqlite_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = DuoConfig::default()
        .with_expected_origin(HOST_ORIGIN)
        .with_storage_path(dir.path().join("nested").join("prefs.db"));
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(0));

    let mut app = DuoApp::open(config.clone(), clock.clone(), MockChannel::new).unwrap();
    assert_eq!(app.set_mode(Mode::Development), ModeChange::Switched(Mode::Development));
    drop(app);

    let reopened = DuoApp::open(config, clock, MockChannel::new).unwrap();
    assert_eq!(reopened.mode(), Mode::Development);
}

#[test]
fn test_open_rejects_directory_storage_path() {
    let dir = tempfile::tempdir().unwrap();
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(0));

    let config = DuoConfig::default().with_storage_path(dir.path());
    assert!(matches!(
        DuoApp::open(config, clock.clone(), MockChannel::new),
        Err(DuoError::Configuration(_))
    ));

    let config = DuoConfig::default().with_storage_path("");
    assert!(matches!(
        DuoApp::open(config, clock, MockChannel::new),
        Err(DuoError::Configuration(_))
    ));
}
