//! Check Message Command
//!
//! Replays a recorded host message through a fresh handshake and prints
//! the gate the app would render.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use duo_core::clock::ManualClock;
use duo_core::gate::{decide, Gate};
use duo_core::handshake::{HandshakeClient, InboundMessage, MessageDisposition, MockChannel};
use duo_core::mode::Mode;

use crate::config::CliConfig;
use crate::display;

/// Run the handshake against `file`, as if posted by `from`.
pub fn run(config: &CliConfig, origin: Option<&str>, from: &str, file: &Path) -> Result<()> {
    let raw = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let payload: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", file.display()))?;

    let mut duo = config.duo_config();
    if let Some(origin) = origin {
        duo = duo.with_expected_origin(origin);
    }

    let mut client = HandshakeClient::new(
        duo.handshake_config(Mode::Production),
        MockChannel::new(),
        Arc::new(ManualClock::new(0)),
    );
    client.start();

    if !client.outcome().is_settled() {
        match client.handle_message(&InboundMessage::new(from, payload)) {
            MessageDisposition::Accepted => {}
            MessageDisposition::UntrustedOrigin => {
                display::warning(&format!("Dropped: {} is not the expected origin", from))
            }
            MessageDisposition::Malformed(e) => display::warning(&format!("Malformed: {}", e)),
            MessageDisposition::AlreadySettled | MessageDisposition::NotListening => {}
        }
    }

    let gate = decide(client.outcome());
    display::display_gate(&gate);
    if !matches!(gate, Gate::Admitted(_)) {
        bail!("Message would not admit the user");
    }
    Ok(())
}
