use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::SessionConfig;
use crate::directory::AccountInfo;

/// Stderr marker for the two-factor prompt.
pub const TWO_FACTOR_MARKER: &str = "six-digit authentication code";

/// Stderr marker for the benign warning about a relocated config file.
pub const NONSTANDARD_CONFIG_MARKER: &str = "configuration at non-standard location";

/// Stderr marker for a terminal failure.
pub const ERROR_MARKER: &str = "ERROR";

/// Immutable description of one `signin` invocation.
///
/// Built fresh for every authentication attempt; nothing is carried over
/// from a previous run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigninCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl SigninCommand {
    /// `<cmd_path> signin <url> <email> <account_key> --raw --config <op_config_path>`
    pub fn new(config: &SessionConfig, info: &AccountInfo) -> Self {
        let args = vec![
            OsString::from("signin"),
            OsString::from(&info.url),
            OsString::from(&info.email),
            OsString::from(&info.account_key),
            OsString::from("--raw"),
            OsString::from("--config"),
            config.op_config_path().into_os_string(),
        ];
        Self {
            program: config.cmd_path.clone().into_os_string(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        Path::new(&self.program)
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Build the process command with all three stdio streams piped.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

/// Classification of one stderr chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StderrKind {
    TwoFactorPrompt,
    Ignored,
    Error,
    Diagnostic,
}

/// Classify a stderr chunk by substring search; a chunk may hold a partial
/// line or several lines.
pub fn classify_stderr(chunk: &str) -> StderrKind {
    if chunk.contains(TWO_FACTOR_MARKER) {
        StderrKind::TwoFactorPrompt
    } else if chunk.contains(NONSTANDARD_CONFIG_MARKER) {
        StderrKind::Ignored
    } else if chunk.contains(ERROR_MARKER) {
        StderrKind::Error
    } else {
        StderrKind::Diagnostic
    }
}

/// The session token is the signin output up to its first newline.
pub fn session_token(output: &str) -> &str {
    match output.find('\n') {
        Some(end) => &output[..end],
        None => output,
    }
}
