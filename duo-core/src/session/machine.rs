// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Session State Machine
//!
//! Single source of truth for where a run is in its script. Participant
//! names are written through to the preference store and rehydrated on
//! initialization; everything else lives only as long as the machine.

use std::sync::Arc;

use tracing::{debug, warn};

use super::error::SessionError;
use super::graph::{duo, Outcome, StepDef, StepGraph};
use super::state::{AnswerValue, FlowKind, ParticipantNames, SessionState, SessionUpdate};
use crate::clock::Clock;
use crate::prefs::keys::NAMES_KEY;
use crate::prefs::{PreferenceStore, PreferenceStoreExt};

/// Wizard session state machine.
pub struct SessionMachine {
    state: SessionState,
    store: Arc<dyn PreferenceStore>,
    clock: Arc<dyn Clock>,
}

impl SessionMachine {
    /// Creates default state, rehydrating participant names from the store.
    ///
    /// Missing, malformed or unreadable cached names are treated as absent.
    pub fn initialize(store: Arc<dyn PreferenceStore>, clock: Arc<dyn Clock>) -> Self {
        let mut state = SessionState::empty(clock.now_ms());

        if let Some(raw) = store.get_or_absent(NAMES_KEY) {
            match serde_json::from_str::<ParticipantNames>(&raw) {
                Ok(names) => {
                    state.participant_a_name = names.participant_a;
                    state.participant_b_name = names.participant_b;
                }
                Err(e) => warn!(error = %e, "ignoring malformed cached participant names"),
            }
        }

        SessionMachine {
            state,
            store,
            clock,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the current step index.
    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    /// Returns the chosen flow kind, if any.
    pub fn flow_kind(&self) -> Option<FlowKind> {
        self.state.flow_kind
    }

    /// Returns the step graph of the chosen flow.
    pub fn graph(&self) -> Option<&'static StepGraph> {
        self.state.flow_kind.map(StepGraph::for_flow)
    }

    /// Returns the definition of the current step.
    pub fn current_step_def(&self) -> Option<&'static StepDef> {
        self.graph()
            .and_then(|graph| graph.step(self.state.current_step))
    }

    /// True once the run sits on its flow's completion step.
    pub fn is_complete(&self) -> bool {
        self.graph()
            .is_some_and(|graph| graph.completion() == self.state.current_step)
    }

    /// Merges a partial update.
    ///
    /// Once a flow kind is chosen it cannot change until [`reset`](Self::reset);
    /// an update carrying a different one keeps the existing value.
    pub fn update(&mut self, update: SessionUpdate) {
        if let Some(name) = update.participant_a_name {
            self.state.participant_a_name = name;
        }
        if let Some(name) = update.participant_b_name {
            self.state.participant_b_name = name;
        }
        if let Some(kind) = update.flow_kind {
            match self.state.flow_kind {
                Some(existing) if existing != kind => {
                    warn!(%existing, requested = %kind, "flow kind is fixed for this run")
                }
                _ => self.state.flow_kind = Some(kind),
            }
        }
        if let Some(step) = update.current_step {
            self.state.current_step = step;
        }
        self.state.answers.extend(update.answers);
        self.touch();

        if !self.state.participant_a_name.is_empty() || !self.state.participant_b_name.is_empty() {
            self.persist_names();
        }
    }

    /// Jumps to a step. The target is not validated against the step table.
    pub fn go_to_step(&mut self, target: usize) {
        let from = self.state.current_step;
        self.state.current_step = target;
        self.touch();
        debug!(from, to = target, "step changed");
    }

    /// Steps back by one. No-op at step 0.
    pub fn go_back(&mut self) {
        if self.state.current_step > 0 {
            self.go_to_step(self.state.current_step - 1);
        }
    }

    /// Restores defaults for everything except the participant names.
    pub fn reset(&mut self) {
        let mut state = SessionState::empty(self.clock.now_ms());
        state.participant_a_name = std::mem::take(&mut self.state.participant_a_name);
        state.participant_b_name = std::mem::take(&mut self.state.participant_b_name);
        self.state = state;
        debug!("session reset");
    }

    /// Chooses the flow at the entry screen and moves to its first step.
    ///
    /// Answers from an earlier run are cleared.
    pub fn choose_flow(&mut self, kind: FlowKind) -> Result<(), SessionError> {
        if let Some(existing) = self.state.flow_kind {
            if existing != kind {
                return Err(SessionError::FlowLocked(existing));
            }
        }
        self.state.flow_kind = Some(kind);
        self.state.answers.clear();
        self.go_to_step(StepGraph::for_flow(kind).entry());
        Ok(())
    }

    /// Follows the step graph edge for `outcome` from the current step.
    ///
    /// A Duo run cannot leave the role-naming step until both names are set.
    pub fn advance(&mut self, outcome: Outcome) -> Result<usize, SessionError> {
        let graph = self.graph().ok_or(SessionError::NoFlowSelected)?;
        let step = self.state.current_step;
        if step == graph.completion() {
            return Err(SessionError::Completed);
        }
        if graph.flow() == FlowKind::Duo && step == duo::ROLE_NAMING && !self.state.has_names() {
            return Err(SessionError::NamesRequired);
        }
        let next = graph
            .next(step, outcome)
            .ok_or(SessionError::NoTransition { step, outcome })?;
        self.go_to_step(next);
        Ok(next)
    }

    /// Records one answer.
    pub fn record_answer(&mut self, key: impl Into<String>, value: AnswerValue) {
        self.update(SessionUpdate::default().answer(key, value));
    }

    fn touch(&mut self) {
        self.state.last_updated_at = self.clock.now_ms();
    }

    fn persist_names(&self) {
        let names = ParticipantNames {
            participant_a: self.state.participant_a_name.clone(),
            participant_b: self.state.participant_b_name.clone(),
        };
        match serde_json::to_string(&names) {
            Ok(json) => {
                self.store.set_best_effort(NAMES_KEY, &json);
            }
            Err(e) => warn!(error = %e, "failed to encode participant names"),
        }
    }
}
