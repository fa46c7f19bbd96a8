use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::command::{classify_stderr, session_token, SigninCommand, StderrKind};
use crate::config::SessionConfig;
use crate::directory::AccountInfo;
use crate::error::SessionError;
use crate::runner::{self, Completion, ProcessFailure};
use crate::stream::{chunk_channel, input_channel, Chunk, InputQueue};

/// Lifetime of a session token, counted from when it was obtained.
const SESSION_EXPIRY_MINUTES: i64 = 45;

/// One account's sign-in state.
///
/// A driver starts out unauthenticated, either freshly created for a sign-in
/// attempt or restored from a persisted identifier. Only its own
/// [`authenticate`](Self::authenticate) run mutates it.
#[derive(Debug, Clone)]
pub struct SessionDriver {
    config: Arc<SessionConfig>,
    id: String,
    session: String,
    session_expiry: Option<DateTime<Utc>>,
    diagnostics: String,
}

impl SessionDriver {
    pub fn new(config: Arc<SessionConfig>, id: impl Into<String>) -> Self {
        Self {
            config,
            id: id.into(),
            session: String::new(),
            session_expiry: None,
            diagnostics: String::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    /// Store a session token; it expires 45 minutes from now.
    pub fn set_session(&mut self, token: impl Into<String>) {
        self.session = token.into();
        self.session_expiry = Some(Utc::now() + Duration::minutes(SESSION_EXPIRY_MINUTES));
    }

    pub fn session_expiry(&self) -> Option<DateTime<Utc>> {
        self.session_expiry
    }

    pub fn is_authenticated(&self) -> bool {
        !self.session.is_empty()
    }

    /// Advisory only: nothing revokes or renews a session when this flips.
    pub fn is_expired(&self) -> bool {
        match self.session_expiry {
            Some(expiry) => Utc::now() > expiry,
            None => true,
        }
    }

    /// Stderr text collected during the last failed sign-in attempt.
    pub fn diagnostics(&self) -> &str {
        &self.diagnostics
    }

    /// Run `signin` for `info`, answering its prompts, and return the session
    /// token it prints.
    ///
    /// The password is typed first. Every two-factor prompt on stderr calls
    /// `two_factor` and types the code it returns; the prompt may repeat. The
    /// loop ends only when the process does: stdout output or an `ERROR` on
    /// stderr just close stdin so a child waiting for input can exit.
    ///
    /// There is no timeout. A `two_factor` future that never resolves stalls
    /// the run, and while it is pending the other stream's writer stays
    /// blocked on its full queue.
    pub async fn authenticate<F, Fut>(
        &mut self,
        info: &AccountInfo,
        password: &str,
        mut two_factor: F,
    ) -> Result<String, SessionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = String>,
    {
        let command = SigninCommand::new(&self.config, info);
        let (mut input, feed) = input_channel(format!("{password}\n"));
        let (stdout_sink, mut stdout_rx) = chunk_channel();
        let (stderr_sink, mut stderr_rx) = chunk_channel();

        log::debug!("starting signin for {} at {}", info.email, info.url);
        let mut done = runner::spawn(&command, feed, stdout_sink, stderr_sink);

        let mut output: Vec<u8> = Vec::new();
        self.diagnostics.clear();

        let completion: Completion = loop {
            tokio::select! {
                // Output first: whatever was queued before the child exited
                // must be seen before its completion.
                biased;

                Some(chunk) = stderr_rx.recv() => {
                    self.handle_stderr(&chunk, &mut input, &mut two_factor).await;
                }
                Some(chunk) = stdout_rx.recv() => {
                    log::debug!("signin stdout chunk ({} bytes)", chunk.len());
                    output.extend_from_slice(&chunk);
                    input.close();
                }
                outcome = &mut done => {
                    break outcome.unwrap_or(Err(ProcessFailure::Lost));
                }
            }
        };

        drop(stdout_rx);
        drop(stderr_rx);
        input.close();

        match completion {
            Ok(()) => {
                self.diagnostics.clear();
                let output = String::from_utf8_lossy(&output);
                Ok(session_token(&output).to_string())
            }
            Err(cause) => {
                log::warn!("signin for {} failed: {cause}", info.email);
                Err(SessionError::Unauthorized {
                    diagnostics: self.diagnostics.clone(),
                    cause,
                })
            }
        }
    }

    async fn handle_stderr<F, Fut>(&mut self, chunk: &Chunk, input: &mut InputQueue, two_factor: &mut F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = String>,
    {
        let text = String::from_utf8_lossy(chunk);
        match classify_stderr(&text) {
            StderrKind::TwoFactorPrompt => {
                log::debug!("signin asked for a two-factor code");
                let code = two_factor().await;
                if !input.send(format!("{code}\n")).await {
                    log::debug!("two-factor code not delivered, stdin already closed");
                }
            }
            StderrKind::Ignored => {}
            kind => {
                if !self.diagnostics.is_empty() {
                    self.diagnostics.push('\n');
                }
                self.diagnostics.push_str(&text);
                if kind == StderrKind::Error {
                    log::debug!("signin reported an error, closing stdin");
                    input.close();
                }
            }
        }
    }
}
