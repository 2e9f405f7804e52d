//! Steps Command

use duo_core::session::{FlowKind, StepGraph};

use crate::display;

/// Print the step table of a flow.
pub fn run(flow: FlowKind) {
    display::display_steps(StepGraph::for_flow(flow));
}
