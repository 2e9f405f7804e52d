// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Session Error Types

use thiserror::Error;

use super::graph::Outcome;
use super::state::FlowKind;

/// Errors returned by graph-driven session transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No flow selected")]
    NoFlowSelected,

    #[error("Flow already chosen for this run: {0}")]
    FlowLocked(FlowKind),

    #[error("Both participants must be named before continuing")]
    NamesRequired,

    #[error("Flow already completed")]
    Completed,

    #[error("No transition from step {step} on {outcome}")]
    NoTransition { step: usize, outcome: Outcome },
}
