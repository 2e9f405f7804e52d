// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Session state types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Script variant chosen at the entry screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    /// One participant working alone.
    Solo,
    /// Two participants: a sender and a receiver.
    Duo,
}

impl FlowKind {
    /// Parses a flow name (`solo` / `duo`, case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "solo" => Some(FlowKind::Solo),
            "duo" => Some(FlowKind::Duo),
            _ => None,
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowKind::Solo => f.write_str("solo"),
            FlowKind::Duo => f.write_str("duo"),
        }
    }
}

/// Participant role in a Duo run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Initiator, shares first (participant A).
    Sender,
    /// Listener, reflects and validates (participant B).
    Receiver,
}

/// Answer collected on a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Checklist item or yes/no question.
    Flag(bool),
    /// Scale answer (e.g. 1 to 5).
    Rating(u8),
    /// Free text.
    Text(String),
}

/// Working memory of a wizard run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub participant_a_name: String,
    pub participant_b_name: String,
    pub current_step: usize,
    /// `None` until chosen at the entry screen.
    pub flow_kind: Option<FlowKind>,
    pub answers: BTreeMap<String, AnswerValue>,
    /// Milliseconds; refreshed on every mutation.
    pub last_updated_at: u64,
}

impl SessionState {
    /// Default state at the given time.
    pub fn empty(now_ms: u64) -> Self {
        SessionState {
            participant_a_name: String::new(),
            participant_b_name: String::new(),
            current_step: 0,
            flow_kind: None,
            answers: BTreeMap::new(),
            last_updated_at: now_ms,
        }
    }

    /// Returns the name for a role.
    pub fn name_for(&self, role: Role) -> &str {
        match role {
            Role::Sender => &self.participant_a_name,
            Role::Receiver => &self.participant_b_name,
        }
    }

    /// Returns true once both participants are named.
    pub fn has_names(&self) -> bool {
        !self.participant_a_name.trim().is_empty() && !self.participant_b_name.trim().is_empty()
    }
}

/// Partial update merged into [`SessionState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub participant_a_name: Option<String>,
    pub participant_b_name: Option<String>,
    pub current_step: Option<usize>,
    pub flow_kind: Option<FlowKind>,
    /// Merged key by key into the existing answers.
    pub answers: BTreeMap<String, AnswerValue>,
}

impl SessionUpdate {
    /// Update setting both participant names.
    pub fn names(a: impl Into<String>, b: impl Into<String>) -> Self {
        SessionUpdate {
            participant_a_name: Some(a.into()),
            participant_b_name: Some(b.into()),
            ..Default::default()
        }
    }

    /// Update setting the flow kind.
    pub fn flow(kind: FlowKind) -> Self {
        SessionUpdate {
            flow_kind: Some(kind),
            ..Default::default()
        }
    }

    /// Update setting the current step.
    pub fn step(step: usize) -> Self {
        SessionUpdate {
            current_step: Some(step),
            ..Default::default()
        }
    }

    /// Adds an answer to the update.
    pub fn answer(mut self, key: impl Into<String>, value: AnswerValue) -> Self {
        self.answers.insert(key.into(), value);
        self
    }
}

/// Participant names as cached in the preference store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantNames {
    #[serde(rename = "participantA", default)]
    pub participant_a: String,
    #[serde(rename = "participantB", default)]
    pub participant_b: String,
}
