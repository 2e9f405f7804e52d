//! Mode Commands
//!
//! Show or switch between development and production.

use anyhow::{anyhow, Result};
use duo_core::mode::{Mode, ModeChange, ModeSwitch};

use crate::config::CliConfig;
use crate::display;

/// Show the current mode.
pub fn show(config: &CliConfig) -> Result<()> {
    let store = config.open_store()?;
    let mode = ModeSwitch::load(store, config.duo_config().default_mode);
    println!("{}", mode.current());
    Ok(())
}

/// Switch mode.
pub fn set(config: &CliConfig, target: &str) -> Result<()> {
    let target = Mode::parse(target)
        .ok_or_else(|| anyhow!("Unknown mode: {} (use development or production)", target))?;
    let store = config.open_store()?;
    let mut mode = ModeSwitch::load(store, config.duo_config().default_mode);

    match mode.set_mode(target) {
        ModeChange::Unchanged => display::info(&format!("Already in {} mode", target)),
        ModeChange::Switched(mode) => display::success(&format!("Switched to {} mode", mode)),
        ModeChange::ReloadRequired => {
            display::success("Switched to production mode");
            display::warning("Cached credentials were cleared; running front ends must reload");
        }
    }
    Ok(())
}
