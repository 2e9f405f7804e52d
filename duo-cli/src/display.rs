//! Display Helpers
//!
//! Terminal output formatting and styling.

use console::style;
use duo_core::gate::Gate;
use duo_core::session::{SessionState, StepGraph};
use duo_core::Member;
use tabled::{settings::Style, Table, Tabled};

/// Prints a success message.
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Prints an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Prints a warning message.
pub fn warning(msg: &str) {
    println!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Prints an info message.
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Step")]
    id: &'static str,
    #[tabled(rename = "Phase")]
    phase: String,
    #[tabled(rename = "Speaker")]
    speaker: String,
    #[tabled(rename = "Next")]
    next: String,
}

/// Prints every step of a flow with its outgoing edges.
pub fn display_steps(graph: &StepGraph) {
    let rows: Vec<StepRow> = graph
        .steps()
        .iter()
        .enumerate()
        .map(|(index, step)| StepRow {
            index,
            id: step.id,
            phase: format!("{:?}", step.phase),
            speaker: step
                .speaker
                .map(|role| format!("{:?}", role))
                .unwrap_or_default(),
            next: graph
                .outcomes_at(index)
                .into_iter()
                .filter_map(|outcome| {
                    graph
                        .next(index, outcome)
                        .map(|to| format!("{} → {}", outcome, to))
                })
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
    println!(
        "\n{} {} steps, completion at {}",
        style(format!("{} flow:", graph.flow())).bold(),
        graph.len(),
        graph.completion()
    );
}

/// Prints the gate decision.
pub fn display_gate(gate: &Gate<'_>) {
    match gate {
        Gate::Loading => info("Still waiting for the host"),
        Gate::AccessDenied => error("Access denied: not inside an authorized host"),
        Gate::Unavailable(reason) => warning(&format!("Unavailable: {}", reason)),
        Gate::Admitted(identity) => {
            success(&format!(
                "Admitted {} <{}>",
                identity.display_name, identity.email
            ));
            println!("  Public ID: {}", identity.public_id);
            if identity.is_admin {
                println!("  {}", style("administrator").cyan());
            }
            if let Some(theme) = identity.theme_hint {
                println!("  Theme:     {}", theme.as_str());
            }
        }
    }
}

/// Prints a member record.
pub fn display_member(member: &Member) {
    println!("{}", style(&member.name).bold().cyan());
    println!("  Email:  {}", member.email);
    println!("  ID:     {}", member.id);
    println!(
        "  Access: {}",
        if member.has_paid || member.is_admin {
            style("granted").green()
        } else {
            style("payment required").yellow()
        }
    );
}

/// Prints the participant names and position of a session.
pub fn display_session(state: &SessionState) {
    let name = |n: &str| {
        if n.is_empty() {
            style("(unnamed)".to_string()).dim()
        } else {
            style(n.to_string()).bold()
        }
    };
    println!("  Participant A: {}", name(&state.participant_a_name));
    println!("  Participant B: {}", name(&state.participant_b_name));
    if let Some(flow) = state.flow_kind {
        println!("  Flow: {}  Step: {}", flow, state.current_step);
    }
}
