//! Adapter that keeps command echoes out of a `slog` drain.
//!
//! [`CommandEchoDrain`] wraps an existing drain. Every record is first offered
//! to the prior [`RecordFilter`] the caller supplies, then normalized into a
//! template and ordered arguments for the [`DecisionEngine`]. A record reaches
//! the inner drain only when both accept it.
//!
//! Normalization:
//! - The template is the record message. Dispatchers log it as a literal with
//!   escaped braces, e.g. `"{{}} issued server command: {{}}"`.
//! - The arguments are the record's own key-value pairs in declaration order.
//!   `&str` and `String` values are text; everything else, including `%`
//!   formatted values, is opaque. Logger context (`o!`) is not an argument.
//!
//! A value that fails or panics while being serialized leaves the record
//! unclassified, and the record is kept.
//!
//! ## Example
//! ```ignore
//! use command_echo_filter::slog::CommandEchoDrain;
//!
//! let logger = CommandEchoDrain::new(drain).install();
//! info!(logger, "{{}} issued server command: {{}}"; "player" => name, "command" => line);
//! ```

use std::{
    borrow::Cow,
    fmt,
    panic::{RefUnwindSafe, UnwindSafe},
};

use slog::{Drain, KV, Key, Level, Logger, OwnedKVList, Record, Serializer};

use crate::engine::{CapturedArgument, DecisionEngine, LogArgument, Verdict, fail_open};

/// A filter that was guarding the drain before the command echo filter.
pub trait RecordFilter {
    /// Returns `true` if the record may be logged.
    fn accepts(&self, record: &Record<'_>) -> bool;
}

impl<F> RecordFilter for F
where
    F: Fn(&Record<'_>) -> bool,
{
    fn accepts(&self, record: &Record<'_>) -> bool {
        self(record)
    }
}

/// Prior filter that accepts every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl RecordFilter for AcceptAll {
    fn accepts(&self, _record: &Record<'_>) -> bool {
        true
    }
}

/// `slog::Drain` that drops records echoing protected commands.
///
/// Rejected records are returned as `Ok(None)`, the same way `slog::Filter`
/// reports records it skipped.
pub struct CommandEchoDrain<D, P = AcceptAll> {
    drain: D,
    prior: P,
    engine: DecisionEngine,
}

impl<D> CommandEchoDrain<D> {
    /// Wraps `drain` with no prior filter and the built-in protected commands.
    pub fn new(drain: D) -> Self {
        Self::with_prior(drain, AcceptAll)
    }
}

impl<D, P> CommandEchoDrain<D, P> {
    /// Wraps `drain`, chaining with the filter that was already guarding it.
    pub fn with_prior(drain: D, prior: P) -> Self {
        Self {
            drain,
            prior,
            engine: DecisionEngine::default(),
        }
    }

    /// Uses a custom engine instead of the built-in protected commands.
    #[must_use]
    pub fn with_engine(mut self, engine: DecisionEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// Combined verdict of the prior filter and the engine.
    pub fn verdict(&self, record: &Record<'_>) -> Verdict
    where
        P: RecordFilter,
    {
        if !self.prior.accepts(record) {
            return Verdict::Deny;
        }
        evaluate_record(&self.engine, record)
    }
}

impl<D, P> CommandEchoDrain<D, P>
where
    D: Drain + Send + Sync + RefUnwindSafe + UnwindSafe + 'static,
    D::Err: fmt::Debug,
    P: RecordFilter + Send + Sync + RefUnwindSafe + UnwindSafe + 'static,
{
    /// Builds the root logger the application logs through.
    ///
    /// Call once during startup, before any user command can be dispatched.
    pub fn install(self) -> Logger {
        let protected_commands = self.engine.protected_commands().len();
        let logger = Logger::root(self.fuse(), slog::o!());
        slog::debug!(logger, "command echo filter installed"; "protected_commands" => protected_commands);
        logger
    }
}

impl<D, P> Drain for CommandEchoDrain<D, P>
where
    D: Drain,
    P: RecordFilter,
{
    type Ok = Option<D::Ok>;
    type Err = D::Err;

    fn log(&self, record: &Record<'_>, values: &OwnedKVList) -> Result<Self::Ok, Self::Err> {
        if self.verdict(record).is_keep() {
            self.drain.log(record, values).map(Some)
        } else {
            Ok(None)
        }
    }

    fn is_enabled(&self, level: Level) -> bool {
        self.drain.is_enabled(level)
    }
}

fn evaluate_record(engine: &DecisionEngine, record: &Record<'_>) -> Verdict {
    fail_open(|| {
        let Ok(captured) = record_arguments(record) else {
            return Verdict::Keep;
        };
        let arguments: Vec<LogArgument<'_>> =
            captured.iter().map(CapturedArgument::as_argument).collect();
        engine.evaluate(&message_template(record), &arguments)
    })
}

fn message_template(record: &Record<'_>) -> Cow<'static, str> {
    let message = record.msg();
    message
        .as_str()
        .map_or_else(|| Cow::Owned(message.to_string()), Cow::Borrowed)
}

fn record_arguments(record: &Record<'_>) -> slog::Result<Vec<CapturedArgument>> {
    let mut collector = ArgumentCollector::default();
    record.kv().serialize(record, &mut collector)?;
    // Record key-values serialize last-declared first.
    collector.arguments.reverse();
    Ok(collector.arguments)
}

#[derive(Default)]
struct ArgumentCollector {
    arguments: Vec<CapturedArgument>,
}

impl Serializer for ArgumentCollector {
    fn emit_arguments(&mut self, _key: Key, _val: &fmt::Arguments<'_>) -> slog::Result {
        self.arguments.push(CapturedArgument::Opaque);
        Ok(())
    }

    fn emit_str(&mut self, _key: Key, val: &str) -> slog::Result {
        self.arguments.push(CapturedArgument::Text(val.to_owned()));
        Ok(())
    }
}
