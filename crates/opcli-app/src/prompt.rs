//! Terminal prompts for the password and two-factor codes.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use opcli_session::TwoFactorChannel;

pub fn read_password(email: &str) -> Result<String> {
    rpassword::prompt_password(format!("Password for {email}: "))
        .context("failed to read password")
}

/// A two-factor channel that asks on the terminal each time the CLI wants a
/// code. Each request reads one line from stdin on its own thread.
pub fn terminal_two_factor() -> TwoFactorChannel {
    let (channel, sender) = TwoFactorChannel::new();
    channel.with_notifier(move || {
        let sender = sender.clone();
        let spawned = std::thread::Builder::new()
            .name("opcli-two-factor".to_string())
            .spawn(move || {
                eprint!("Six-digit authentication code: ");
                let _ = io::stderr().flush();
                let mut line = String::new();
                if let Err(e) = io::stdin().lock().read_line(&mut line) {
                    log::warn!("failed to read two-factor code: {e}");
                }
                // An empty code is rejected by the CLI, which ends the run.
                sender.blocking_put_code(line.trim());
            });
        if let Err(e) = spawned {
            log::warn!("failed to start two-factor prompt: {e}");
        }
    })
}
