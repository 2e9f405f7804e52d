// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Duo-Connecte App Layer
//!
//! High-level API coordinating:
//! - Mode selection
//! - The identity handshake and the gate
//! - Session navigation
//! - Event handling
//!
//! # Module Structure
//!
//! - [`error`] - Error types for the app layer
//! - [`config`] - Configuration types
//! - [`events`] - Event system for callbacks
//! - [`app`] - Main orchestrator

pub mod app;
pub mod config;
pub mod error;
pub mod events;

pub use app::DuoApp;
pub use config::DuoConfig;
pub use error::{DuoError, DuoResult};
pub use events::{CallbackHandler, DuoEvent, EventDispatcher, EventHandler};
