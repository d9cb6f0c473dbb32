use anyhow::Context;
use colored::Colorize;
use netconn_core::{Action, EventEnvelope, EventError};
use std::path::Path;

/// Print a verdict for the payload in `file` as if it arrived on `subject`.
/// Returns whether the request would be accepted.
pub fn handle(file: &Path, subject: &str) -> anyhow::Result<bool> {
    let payload =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    match check(subject, &payload) {
        Ok(action) => {
            println!("{}", format!("✓ valid {} request", action).green().bold());
            Ok(true)
        }
        Err(e) => {
            println!("{}", format!("✗ {}", e).red());
            Ok(false)
        }
    }
}

fn check(subject: &str, payload: &[u8]) -> netconn_core::Result<Action> {
    let event = EventEnvelope::decode(subject, payload)?;
    event.validate()?;

    match event.action() {
        Some(action @ (Action::Create | Action::Delete)) => Ok(action),
        Some(Action::Update | Action::Get) => Err(EventError::Unsupported(subject.to_string())),
        None => Err(EventError::UnrecognizedAction(subject.to_string())),
    }
}
