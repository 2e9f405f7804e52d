//! Participant Names Commands

use std::sync::Arc;

use anyhow::Result;
use duo_core::clock::SystemClock;
use duo_core::session::{SessionMachine, SessionUpdate};

use crate::config::CliConfig;
use crate::display;

/// Show the cached participant names.
pub fn show(config: &CliConfig) -> Result<()> {
    let session = SessionMachine::initialize(config.open_store()?, Arc::new(SystemClock));
    let state = session.state();
    if state.participant_a_name.is_empty() && state.participant_b_name.is_empty() {
        display::info("No participant names saved. Set them with 'duo names <a> <b>'");
        return Ok(());
    }
    display::display_session(state);
    Ok(())
}

/// Save both participant names.
pub fn set(config: &CliConfig, a: &str, b: &str) -> Result<()> {
    let mut session = SessionMachine::initialize(config.open_store()?, Arc::new(SystemClock));
    session.update(SessionUpdate::names(a.trim(), b.trim()));
    display::success(&format!("Saved participants: {} and {}", a.trim(), b.trim()));
    Ok(())
}
