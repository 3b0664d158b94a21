//! Keeps sensitive user commands out of logs.
//!
//! A command dispatcher typically logs every command a user runs, e.g.
//! `"{} issued server command: {}"`. For commands such as `/login <password>`
//! that line leaks a credential. This crate separates:
//! - **The decision engine**: a pure function from a message template and its
//!   ordered arguments to a [`Verdict`].
//! - **Backend adapters**: glue that feeds a logging backend's events to the
//!   engine and chains with the filter the backend already had.
//!
//! What this crate does:
//! - recognizes the fixed set of command-echo [`MessageTemplate`]s
//! - matches the echoed command against a [`ProtectedCommandSet`]
//! - provides adapters behind feature flags (`slog`, `tracing`)
//!
//! What it does not do:
//! - scan arbitrary log text for secrets
//! - rewrite or mask events; a protected echo is dropped whole
//!
//! The engine fails open: any event it cannot classify is kept.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

// Module declarations
pub mod engine;
mod error;
#[cfg(feature = "slog")]
pub mod slog;
#[cfg(feature = "tracing")]
pub mod tracing;

// Re-exports from engine module
pub use engine::{
    DecisionEngine, LogArgument, MessageTemplate, PROTECTED_COMMAND_PREFIXES, ProtectedCommandSet,
    Verdict, evaluate,
};
pub use error::{Error, Result};
#[cfg(feature = "slog")]
pub use self::slog::CommandEchoDrain;
#[cfg(feature = "tracing")]
pub use self::tracing::{CommandEchoFilter, CommandEchoLayer};
