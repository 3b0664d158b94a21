//! Decision engine for command-echo log events.
//!
//! This module provides:
//!
//! - **`commands`**: The [`ProtectedCommandSet`] and the built-in
//!   [`PROTECTED_COMMAND_PREFIXES`].
//! - **`template`**: The closed set of [`MessageTemplate`] shapes the command
//!   dispatcher logs.
//! - **`argument`** and **`verdict`**: Engine input ([`LogArgument`]) and
//!   output ([`Verdict`]).
//! - **`decision`**: The [`DecisionEngine`] and the [`evaluate`] entrypoint.
//!
//! Backend adapters live in `crate::slog` and `crate::tracing`.
//!
//! # Example
//!
//! ```rust
//! use command_echo_filter::{DecisionEngine, LogArgument, Verdict};
//!
//! let engine = DecisionEngine::default();
//! let echo = [LogArgument::Text("Bob"), LogArgument::Text("reg mypassword")];
//! assert_eq!(engine.evaluate("{0} executed command: /{1}", &echo), Verdict::Deny);
//!
//! let echo = [LogArgument::Text("Bob"), LogArgument::Text("help")];
//! assert_eq!(engine.evaluate("{0} executed command: /{1}", &echo), Verdict::Keep);
//! ```

mod argument;
mod commands;
mod decision;
mod template;
mod verdict;

#[cfg(any(feature = "slog", feature = "tracing"))]
pub(crate) use argument::CapturedArgument;
pub use argument::LogArgument;
pub use commands::{PROTECTED_COMMAND_PREFIXES, ProtectedCommandSet};
#[cfg(any(feature = "slog", feature = "tracing"))]
pub(crate) use decision::fail_open;
pub use decision::{DecisionEngine, evaluate};
pub use template::MessageTemplate;
pub use verdict::Verdict;
