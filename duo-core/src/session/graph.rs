// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Step Graph
//!
//! Declarative script for each flow kind: an ordered step table plus the
//! branch edges between steps. A step without an explicit edge continues to
//! the next index; fork steps only move on the outcomes listed for them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::{FlowKind, Role};

/// Result a screen reports when the participant moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Plain "continue".
    Continue,
    /// The listener's reflection was accurate.
    Confirmed,
    /// The reflection missed something; go back and rephrase.
    NeedsClarification,
    /// A request was accepted.
    Accepted,
    /// A request was declined.
    Declined,
}

impl Outcome {
    /// Every outcome, in display order.
    pub const ALL: [Outcome; 5] = [
        Outcome::Continue,
        Outcome::Confirmed,
        Outcome::NeedsClarification,
        Outcome::Accepted,
        Outcome::Declined,
    ];

    /// Returns the snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Continue => "continue",
            Outcome::Confirmed => "confirmed",
            Outcome::NeedsClarification => "needs_clarification",
            Outcome::Accepted => "accepted",
            Outcome::Declined => "declined",
        }
    }

    /// Parses a snake_case name.
    pub fn parse(value: &str) -> Option<Self> {
        Outcome::ALL.into_iter().find(|o| o.as_str() == value)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Section of the script a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Entry,
    Grounding,
    Sharing,
    Validation,
    Closing,
    Completion,
}

/// One content screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDef {
    /// Stable screen identifier.
    pub id: &'static str,
    pub phase: Phase,
    /// Who speaks on this screen, if a single participant does.
    pub speaker: Option<Role>,
}

/// Directed edge between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: usize,
    pub outcome: Outcome,
    pub to: usize,
}

const fn step(id: &'static str, phase: Phase, speaker: Option<Role>) -> StepDef {
    StepDef { id, phase, speaker }
}

const fn edge(from: usize, outcome: Outcome, to: usize) -> Edge {
    Edge { from, outcome, to }
}

/// Step indices of the Duo script.
pub mod duo {
    pub const WELCOME: usize = 0;
    pub const ROLE_NAMING: usize = 1;
    pub const SENDER_SITUATION: usize = 8;
    pub const SITUATION_CHECK: usize = 10;
    pub const SENDER_FEELINGS: usize = 11;
    pub const FEELINGS_CHECK: usize = 13;
    pub const SENDER_NEEDS: usize = 14;
    pub const NEEDS_CHECK: usize = 16;
    pub const RECEIVER_EMPATHY: usize = 19;
    pub const RECEIVER_RESPONSE: usize = 21;
    pub const REQUEST_ACCEPTED: usize = 22;
    pub const REQUEST_NEGOTIATION: usize = 23;
    pub const SENDER_FEELS_HEARD: usize = 24;
    pub const RECEIVER_FEEDBACK: usize = 25;
    pub const COMPLETION: usize = 33;
}

/// Step indices of the Solo script.
pub mod solo {
    pub const WELCOME: usize = 0;
    pub const FEELINGS: usize = 5;
    pub const FEELINGS_CHECK: usize = 6;
    pub const NEEDS: usize = 7;
    pub const NEEDS_CHECK: usize = 9;
    pub const REQUEST_TO_SELF: usize = 10;
    pub const PREPARE_CONVERSATION: usize = 11;
    pub const INVITE_PARTNER: usize = 12;
    pub const SELF_CARE_PLAN: usize = 13;
    pub const CLOSING_REFLECTION: usize = 14;
    pub const COMPLETION: usize = 17;
}

use Phase::*;
use Role::{Receiver, Sender};

const DUO_STEPS: &[StepDef] = &[
    step("welcome", Entry, None),
    step("role_naming", Entry, None),
    step("safety_agreement", Entry, None),
    step("grounding_breath", Grounding, None),
    step("grounding_body_scan", Grounding, None),
    step("sender_intention", Grounding, Some(Sender)),
    step("receiver_intention", Grounding, Some(Receiver)),
    step("topic_choice", Sharing, Some(Sender)),
    step("sender_situation", Sharing, Some(Sender)),
    step("receiver_reflect_situation", Sharing, Some(Receiver)),
    step("situation_check", Validation, Some(Sender)),
    step("sender_feelings", Sharing, Some(Sender)),
    step("receiver_reflect_feelings", Sharing, Some(Receiver)),
    step("feelings_check", Validation, Some(Sender)),
    step("sender_needs", Sharing, Some(Sender)),
    step("receiver_reflect_needs", Sharing, Some(Receiver)),
    step("needs_check", Validation, Some(Sender)),
    step("receiver_validation", Validation, Some(Receiver)),
    step("sender_receives_validation", Validation, Some(Sender)),
    step("receiver_empathy", Validation, Some(Receiver)),
    step("sender_request", Sharing, Some(Sender)),
    step("receiver_response", Validation, Some(Receiver)),
    step("request_accepted", Validation, None),
    step("request_negotiation", Validation, None),
    step("sender_feels_heard", Validation, Some(Sender)),
    step("receiver_feedback", Closing, Some(Receiver)),
    step("sender_feedback", Closing, Some(Sender)),
    step("gratitude_sender", Closing, Some(Sender)),
    step("gratitude_receiver", Closing, Some(Receiver)),
    step("closing_breath", Closing, None),
    step("closing_reflection", Closing, None),
    step("closing_checklist", Closing, None),
    step("feedback_form", Closing, None),
    step("completion", Completion, None),
];

const DUO_EDGES: &[Edge] = &[
    edge(duo::SITUATION_CHECK, Outcome::Confirmed, duo::SENDER_FEELINGS),
    edge(duo::SITUATION_CHECK, Outcome::NeedsClarification, duo::SENDER_SITUATION),
    edge(duo::FEELINGS_CHECK, Outcome::Confirmed, duo::SENDER_NEEDS),
    edge(duo::FEELINGS_CHECK, Outcome::NeedsClarification, duo::SENDER_FEELINGS),
    edge(duo::NEEDS_CHECK, Outcome::Confirmed, duo::NEEDS_CHECK + 1),
    edge(duo::NEEDS_CHECK, Outcome::NeedsClarification, duo::SENDER_NEEDS),
    edge(duo::RECEIVER_RESPONSE, Outcome::Accepted, duo::REQUEST_ACCEPTED),
    edge(duo::RECEIVER_RESPONSE, Outcome::Declined, duo::REQUEST_NEGOTIATION),
    edge(duo::REQUEST_ACCEPTED, Outcome::Continue, duo::SENDER_FEELS_HEARD),
    edge(duo::SENDER_FEELS_HEARD, Outcome::Confirmed, duo::RECEIVER_FEEDBACK),
    edge(duo::SENDER_FEELS_HEARD, Outcome::NeedsClarification, duo::RECEIVER_EMPATHY),
];

const SOLO_STEPS: &[StepDef] = &[
    step("welcome", Entry, None),
    step("intention", Entry, None),
    step("grounding_breath", Grounding, None),
    step("grounding_body_scan", Grounding, None),
    step("situation", Sharing, None),
    step("feelings", Sharing, None),
    step("feelings_check", Validation, None),
    step("needs", Sharing, None),
    step("self_empathy", Validation, None),
    step("needs_check", Validation, None),
    step("request_to_self", Sharing, None),
    step("prepare_conversation", Closing, None),
    step("invite_partner", Closing, None),
    step("self_care_plan", Closing, None),
    step("closing_reflection", Closing, None),
    step("closing_checklist", Closing, None),
    step("feedback_form", Closing, None),
    step("completion", Completion, None),
];

const SOLO_EDGES: &[Edge] = &[
    edge(solo::FEELINGS_CHECK, Outcome::Confirmed, solo::NEEDS),
    edge(solo::FEELINGS_CHECK, Outcome::NeedsClarification, solo::FEELINGS),
    edge(solo::NEEDS_CHECK, Outcome::Confirmed, solo::REQUEST_TO_SELF),
    edge(solo::NEEDS_CHECK, Outcome::NeedsClarification, solo::NEEDS),
    edge(solo::PREPARE_CONVERSATION, Outcome::Accepted, solo::INVITE_PARTNER),
    edge(solo::PREPARE_CONVERSATION, Outcome::Declined, solo::SELF_CARE_PLAN),
    edge(solo::INVITE_PARTNER, Outcome::Continue, solo::CLOSING_REFLECTION),
];

static DUO_GRAPH: StepGraph = StepGraph {
    flow: FlowKind::Duo,
    steps: DUO_STEPS,
    edges: DUO_EDGES,
};

static SOLO_GRAPH: StepGraph = StepGraph {
    flow: FlowKind::Solo,
    steps: SOLO_STEPS,
    edges: SOLO_EDGES,
};

/// Step table and edges for one flow kind.
#[derive(Debug)]
pub struct StepGraph {
    flow: FlowKind,
    steps: &'static [StepDef],
    edges: &'static [Edge],
}

impl StepGraph {
    /// Returns the graph for a flow kind.
    pub fn for_flow(flow: FlowKind) -> &'static StepGraph {
        match flow {
            FlowKind::Solo => &SOLO_GRAPH,
            FlowKind::Duo => &DUO_GRAPH,
        }
    }

    pub fn flow(&self) -> FlowKind {
        self.flow
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The step table, in index order.
    pub fn steps(&self) -> &'static [StepDef] {
        self.steps
    }

    pub fn step(&self, index: usize) -> Option<&'static StepDef> {
        self.steps.get(index)
    }

    /// Looks a step up by identifier.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == id)
    }

    /// First step of the flow.
    pub fn entry(&self) -> usize {
        0
    }

    /// Terminal step of the flow.
    pub fn completion(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn is_valid(&self, index: usize) -> bool {
        index < self.steps.len()
    }

    /// True if the step forks on a non-continue outcome.
    pub fn is_branch_point(&self, index: usize) -> bool {
        self.edges
            .iter()
            .any(|e| e.from == index && e.outcome != Outcome::Continue)
    }

    /// Target of `outcome` at `from`, if that edge exists.
    pub fn next(&self, from: usize, outcome: Outcome) -> Option<usize> {
        if let Some(e) = self
            .edges
            .iter()
            .find(|e| e.from == from && e.outcome == outcome)
        {
            return Some(e.to);
        }
        if outcome == Outcome::Continue && !self.is_branch_point(from) && from < self.completion() {
            return Some(from + 1);
        }
        None
    }

    /// Outcomes that lead somewhere from `from`.
    pub fn outcomes_at(&self, from: usize) -> Vec<Outcome> {
        Outcome::ALL
            .into_iter()
            .filter(|o| self.next(from, *o).is_some())
            .collect()
    }

    /// Every edge of the graph, explicit and implied.
    pub fn edges(&self) -> Vec<Edge> {
        (0..self.steps.len())
            .flat_map(|from| {
                Outcome::ALL.into_iter().filter_map(move |outcome| {
                    self.next(from, outcome)
                        .map(|to| Edge { from, outcome, to })
                })
            })
            .collect()
    }
}
