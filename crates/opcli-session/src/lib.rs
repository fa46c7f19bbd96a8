//! opcli-session: drives the credential manager's interactive `signin`
//! without a human at the keyboard.
//!
//! The CLI is run as a subprocess. Its stdout and stderr are cut into chunk
//! events, its stdin is fed from a queue, and a protocol loop answers the
//! prompts it recognises until the process exits with a session token.
//!
//! # Architecture
//!
//! - [`stream`]: [`ChunkSink`] turns each subprocess write into one queued
//!   chunk; [`InputFeed`] serves queued strings to the subprocess's stdin.
//! - [`runner`]: Background thread that runs one subprocess to completion.
//! - [`SessionDriver`]: One sign-in attempt: the prompt/response loop, the
//!   resulting token and its expiry.
//! - [`AccountRegistry`]: Signed-in accounts keyed by identifier, resolved
//!   against the credential manager's own [`AccountDirectory`].
//! - [`TwoFactorChannel`]: Hands two-factor codes to a waiting sign-in.

pub mod command;
pub mod config;
pub mod directory;
pub mod error;
pub mod registry;
pub mod runner;
pub mod session;
pub mod stream;
pub mod twofactor;

#[cfg(all(test, unix))]
pub(crate) mod testing;

pub use config::SessionConfig;
pub use directory::{AccountDirectory, AccountInfo, DirectoryError};
pub use error::SessionError;
pub use registry::AccountRegistry;
pub use runner::ProcessFailure;
pub use session::SessionDriver;
pub use stream::{ChunkSink, InputFeed, InputQueue};
pub use twofactor::{CodeSender, TwoFactorChannel};
