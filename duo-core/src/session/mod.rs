// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Guided Session Module
//!
//! Wizard state for Solo and Duo runs: the state container, the declarative
//! step graph for each flow, and the state machine that navigates it.

mod error;
pub mod graph;
mod machine;
mod state;

pub use error::SessionError;
pub use graph::{Edge, Outcome, Phase, StepDef, StepGraph};
pub use machine::SessionMachine;
pub use state::{AnswerValue, FlowKind, ParticipantNames, Role, SessionState, SessionUpdate};
