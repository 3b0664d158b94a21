//! The decision engine.
//!
//! Evaluation is pure: it reads only its inputs and an immutable prefix set,
//! so one engine can be shared across threads without synchronization.
//! Anything the engine cannot classify is kept.

use std::sync::{Arc, LazyLock};

use super::{
    argument::LogArgument, commands::ProtectedCommandSet, template::MessageTemplate,
    verdict::Verdict,
};

static DEFAULT_ENGINE: LazyLock<DecisionEngine> = LazyLock::new(DecisionEngine::default);

/// Decides whether a command-echo log event may be emitted.
#[derive(Clone, Debug, Default)]
pub struct DecisionEngine {
    commands: Arc<ProtectedCommandSet>,
}

impl DecisionEngine {
    pub fn new(commands: ProtectedCommandSet) -> Self {
        Self {
            commands: Arc::new(commands),
        }
    }

    pub fn protected_commands(&self) -> &ProtectedCommandSet {
        &self.commands
    }

    /// Evaluates one event given its message template and ordered arguments.
    ///
    /// Returns [`Verdict::Deny`] only when `template` is a recognized
    /// command echo and the rebuilt command line starts with a protected
    /// prefix.
    pub fn evaluate(&self, template: &str, arguments: &[LogArgument<'_>]) -> Verdict {
        // A command echo always has a string second argument.
        if arguments.get(1).and_then(LogArgument::as_text).is_none() {
            return Verdict::Keep;
        }

        let shape = MessageTemplate::parse(template);
        let Some(argument) = shape
            .command_argument()
            .and_then(|index| arguments.get(index))
            .and_then(LogArgument::as_text)
        else {
            return Verdict::Keep;
        };
        let Some(command) = shape.command_text(argument) else {
            return Verdict::Keep;
        };

        if self.commands.matches(&command) {
            Verdict::Deny
        } else {
            Verdict::Keep
        }
    }
}

/// Evaluates an event against the built-in protected commands.
///
/// ```rust
/// use command_echo_filter::{LogArgument, Verdict, evaluate};
///
/// let arguments = [LogArgument::Text("Alice"), LogArgument::Text("/login hunter2")];
/// assert_eq!(evaluate("{} issued server command: {}", &arguments), Verdict::Deny);
/// ```
pub fn evaluate(template: &str, arguments: &[LogArgument<'_>]) -> Verdict {
    DEFAULT_ENGINE.evaluate(template, arguments)
}

/// Runs an adapter's event inspection, keeping the event if it panics.
#[cfg(any(feature = "slog", feature = "tracing"))]
pub(crate) fn fail_open(inspect: impl FnOnce() -> Verdict) -> Verdict {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(inspect)).unwrap_or(Verdict::Keep)
}
