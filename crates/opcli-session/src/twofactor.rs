//! Hand-off of two-factor codes from whoever collects them to a running
//! sign-in.
//!
//! The protocol loop asks for a code by awaiting [`TwoFactorChannel::request`];
//! a terminal prompt, a GUI, or a test delivers it through a [`CodeSender`].
//! Dropping every sender cancels the wait.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

type Notifier = Arc<dyn Fn() + Send + Sync>;

/// Future returned by [`TwoFactorChannel::callback`].
pub type CodeFuture = Pin<Box<dyn Future<Output = String> + Send>>;

/// Receiving end, handed to the sign-in as its two-factor callback.
pub struct TwoFactorChannel {
    rx: Arc<Mutex<mpsc::Receiver<String>>>,
    notifier: Option<Notifier>,
}

/// Delivers codes to a waiting [`TwoFactorChannel`].
#[derive(Clone)]
pub struct CodeSender {
    tx: mpsc::Sender<String>,
}

impl TwoFactorChannel {
    pub fn new() -> (Self, CodeSender) {
        let (tx, rx) = mpsc::channel(1);
        (
            Self {
                rx: Arc::new(Mutex::new(rx)),
                notifier: None,
            },
            CodeSender { tx },
        )
    }

    /// Run `notify` each time a code is requested, e.g. to show a prompt.
    pub fn with_notifier(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notifier = Some(Arc::new(notify));
        self
    }

    /// Wait for the next code.
    ///
    /// Returns an empty string once every sender has been dropped; the CLI
    /// rejects it and the sign-in fails through its normal error path.
    pub async fn request(&self) -> String {
        if let Some(notify) = &self.notifier {
            notify();
        }
        let mut rx = self.rx.lock().await;
        match rx.recv().await {
            Some(code) => code,
            None => {
                log::debug!("two-factor request cancelled");
                String::new()
            }
        }
    }

    /// A callback suitable for
    /// [`SessionDriver::authenticate`](crate::SessionDriver::authenticate).
    pub fn callback(&self) -> impl FnMut() -> CodeFuture {
        let rx = Arc::clone(&self.rx);
        let notifier = self.notifier.clone();
        move || {
            let channel = TwoFactorChannel {
                rx: Arc::clone(&rx),
                notifier: notifier.clone(),
            };
            let code: CodeFuture = Box::pin(async move { channel.request().await });
            code
        }
    }
}

impl CodeSender {
    /// Hand a code to the waiting sign-in.
    ///
    /// Returns `false` if the receiving side is gone.
    pub async fn put_code(&self, code: impl Into<String>) -> bool {
        self.tx.send(code.into()).await.is_ok()
    }

    /// Same as [`put_code`](Self::put_code), for plain threads outside the
    /// runtime.
    pub fn blocking_put_code(&self, code: impl Into<String>) -> bool {
        self.tx.blocking_send(code.into()).is_ok()
    }
}
