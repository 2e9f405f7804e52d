//! Walk Command
//!
//! Interactive run through a Solo or Duo flow.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use console::style;
use dialoguer::{Input, Select};
use duo_core::clock::SystemClock;
use duo_core::session::{FlowKind, Outcome, SessionError, SessionMachine, SessionUpdate};

use crate::config::CliConfig;
use crate::display;

enum Choice {
    Go(Outcome),
    Back,
    Reset,
    Quit,
}

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Continue => "Continue",
        Outcome::Confirmed => "Yes, that's it",
        Outcome::NeedsClarification => "Not quite, go back",
        Outcome::Accepted => "Accept",
        Outcome::Declined => "Decline",
    }
}

fn pick_flow() -> Result<FlowKind> {
    let flows = [FlowKind::Solo, FlowKind::Duo];
    let selection = Select::new()
        .with_prompt("Which flow?")
        .items(&["Solo: prepare on your own", "Duo: talk it through together"])
        .default(1)
        .interact()?;
    Ok(flows[selection])
}

fn ask_names(session: &mut SessionMachine) -> Result<()> {
    let a: String = Input::new()
        .with_prompt("Participant A (speaks first)")
        .with_initial_text(session.state().participant_a_name.clone())
        .interact_text()?;
    let b: String = Input::new()
        .with_prompt("Participant B (listens first)")
        .with_initial_text(session.state().participant_b_name.clone())
        .interact_text()?;
    session.update(SessionUpdate::names(a.trim(), b.trim()));
    Ok(())
}

/// Walk a flow interactively.
pub fn run(config: &CliConfig, flow: Option<FlowKind>) -> Result<()> {
    let mut session = SessionMachine::initialize(config.open_store()?, Arc::new(SystemClock));

    loop {
        let kind = match flow {
            Some(kind) => kind,
            None => pick_flow()?,
        };
        session.choose_flow(kind)?;
        if kind == FlowKind::Duo && !session.state().has_names() {
            ask_names(&mut session)?;
        }

        match walk_steps(&mut session)? {
            Choice::Reset => {
                session.reset();
                display::info("Session reset");
            }
            _ => return Ok(()),
        }
    }
}

fn walk_steps(session: &mut SessionMachine) -> Result<Choice> {
    let graph = session.graph().ok_or_else(|| anyhow!("No flow selected"))?;

    while !session.is_complete() {
        let index = session.current_step();
        let step = graph
            .step(index)
            .ok_or_else(|| anyhow!("Step {} is outside the {} flow", index, graph.flow()))?;

        println!();
        println!(
            "{} {}",
            style(format!("[{}/{}]", index, graph.completion())).dim(),
            style(step.id).bold()
        );
        if let Some(role) = step.speaker {
            let name = session.state().name_for(role);
            if !name.is_empty() {
                println!("  {} speaks", style(name).cyan());
            }
        }

        let mut choices: Vec<Choice> = graph
            .outcomes_at(index)
            .into_iter()
            .map(Choice::Go)
            .collect();
        if index > 0 {
            choices.push(Choice::Back);
        }
        choices.push(Choice::Reset);
        choices.push(Choice::Quit);

        let labels: Vec<&str> = choices
            .iter()
            .map(|c| match c {
                Choice::Go(outcome) => outcome_label(*outcome),
                Choice::Back => "Back",
                Choice::Reset => "Start over",
                Choice::Quit => "Quit",
            })
            .collect();

        let selection = Select::new().items(&labels).default(0).interact()?;
        match choices.swap_remove(selection) {
            Choice::Go(outcome) => match session.advance(outcome) {
                Err(SessionError::NamesRequired) => {
                    display::warning("Both participants need a name");
                    ask_names(session)?;
                }
                result => {
                    result?;
                }
            },
            Choice::Back => session.go_back(),
            Choice::Reset => return Ok(Choice::Reset),
            Choice::Quit => return Ok(Choice::Quit),
        }
    }

    display::success("Flow complete. Thank you both.");
    Ok(Choice::Quit)
}
