//! Duo-Connecte Core Library
//!
//! Guided-conversation app meant to run embedded in a community host page.
//! The host proves who the user is through an origin-checked handshake;
//! the app then walks one person (Solo) or two people (Duo) through a
//! structured exchange.

pub mod api;
#[cfg(feature = "backend")]
pub mod backend;
pub mod clock;
pub mod gate;
pub mod handshake;
pub mod member;
pub mod mode;
pub mod prefs;
pub mod session;
pub mod theme;

pub use api::{DuoApp, DuoConfig, DuoError, DuoEvent, DuoResult};
#[cfg(feature = "backend")]
pub use backend::{ApiClient, ApiError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use gate::{decide, paywall, Access, Gate};
pub use handshake::{
    AuthIdentity, BlockReason, HandshakeClient, HandshakeConfig, HandshakeOutcome,
    InboundMessage, MessageChannel, MockChannel, OutboundMessage,
};
pub use member::{AppSettings, Feedback, Member, MemberUpdate, NewMember};
pub use mode::{Mode, ModeChange, ModeSwitch};
pub use prefs::{
    MemoryPreferenceStore, PreferenceStore, PreferenceStoreExt, PrefsError,
    SqlitePreferenceStore,
};
pub use session::{FlowKind, Outcome, SessionError, SessionMachine, SessionState, StepGraph};
pub use theme::ThemeMode;
