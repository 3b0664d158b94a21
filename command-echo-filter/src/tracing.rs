//! Adapter that keeps command echoes out of `tracing` output.
//!
//! [`CommandEchoLayer`] wraps the layer that writes events out and skips
//! the events the [`DecisionEngine`] denies. Everything else (callsite
//! registration, spans, other events) is forwarded untouched, and other
//! layers on the same subscriber still see the denied event.
//!
//! [`CommandEchoFilter`] chains that layer with the per-layer filter the
//! output already had (the prior filter), so an event is recorded only when
//! both accept it.
//!
//! Normalization:
//! - The template is the event's `message` field. Dispatchers log it with
//!   escaped braces, e.g. `"{{}} issued server command: {{}}"`.
//! - The arguments are the remaining fields in declaration order. Fields
//!   recorded as strings (`&str`, `String`) are text; everything else,
//!   including `%` and `?` formatted values, is opaque.
//!
//! # Example
//!
//! ```ignore
//! use command_echo_filter::tracing::CommandEchoFilter;
//!
//! CommandEchoFilter::new().install()?;
//! tracing::info!(player = name, command = line, "{{}} issued server command: {{}}");
//! ```

use std::fmt;

use tracing::{
    Event, Metadata, Subscriber,
    field::{Field, Visit},
    level_filters::LevelFilter,
    span,
    subscriber::Interest,
};
use tracing_subscriber::{
    Layer, Registry,
    filter::Filtered,
    layer::{Context, Filter, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::{
    engine::{CapturedArgument, DecisionEngine, LogArgument, Verdict, fail_open},
    error::Result,
};

const MESSAGE_FIELD: &str = "message";

/// Layer wrapper that withholds events echoing protected commands from `inner`.
#[derive(Clone, Debug)]
pub struct CommandEchoLayer<L> {
    inner: L,
    engine: DecisionEngine,
}

impl<L> CommandEchoLayer<L> {
    /// Wraps `inner` with the built-in protected commands.
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            engine: DecisionEngine::default(),
        }
    }

    #[must_use]
    pub fn with_engine(mut self, engine: DecisionEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<S, L> Layer<S> for CommandEchoLayer<L>
where
    S: Subscriber,
    L: Layer<S>,
{
    fn on_layer(&mut self, subscriber: &mut S) {
        self.inner.on_layer(subscriber);
    }

    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        self.inner.register_callsite(metadata)
    }

    fn enabled(&self, metadata: &Metadata<'_>, ctx: Context<'_, S>) -> bool {
        self.inner.enabled(metadata, ctx)
    }

    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        self.inner.on_new_span(attrs, id, ctx);
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        self.inner.max_level_hint()
    }

    fn on_record(&self, id: &span::Id, values: &span::Record<'_>, ctx: Context<'_, S>) {
        self.inner.on_record(id, values, ctx);
    }

    fn on_follows_from(&self, id: &span::Id, follows: &span::Id, ctx: Context<'_, S>) {
        self.inner.on_follows_from(id, follows, ctx);
    }

    // Returning false here would disable the event for every layer, so the
    // engine is consulted in `on_event` instead.
    fn event_enabled(&self, event: &Event<'_>, ctx: Context<'_, S>) -> bool {
        self.inner.event_enabled(event, ctx)
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        if evaluate_event(&self.engine, event).is_keep() {
            self.inner.on_event(event, ctx);
        }
    }

    fn on_enter(&self, id: &span::Id, ctx: Context<'_, S>) {
        self.inner.on_enter(id, ctx);
    }

    fn on_exit(&self, id: &span::Id, ctx: Context<'_, S>) {
        self.inner.on_exit(id, ctx);
    }

    fn on_close(&self, id: span::Id, ctx: Context<'_, S>) {
        self.inner.on_close(id, ctx);
    }

    fn on_id_change(&self, old: &span::Id, new: &span::Id, ctx: Context<'_, S>) {
        self.inner.on_id_change(old, new, ctx);
    }
}

/// Chains a prior per-layer filter with the command echo check.
///
/// The prior filter keeps deciding callsite interest, level hints and
/// spans; the engine only ever removes events it accepted.
#[derive(Clone, Debug)]
pub struct CommandEchoFilter<F = LevelFilter> {
    prior: F,
    engine: DecisionEngine,
}

impl CommandEchoFilter {
    /// Creates a filter with no prior filter and the built-in protected commands.
    pub fn new() -> Self {
        Self::with_prior(LevelFilter::TRACE)
    }
}

impl Default for CommandEchoFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> CommandEchoFilter<F> {
    /// Chains with the filter the layer was already using.
    pub fn with_prior(prior: F) -> Self {
        Self {
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

    /// The engine's verdict for `event`, ignoring the prior filter.
    pub fn evaluate_event(&self, event: &Event<'_>) -> Verdict {
        evaluate_event(&self.engine, event)
    }

    /// Applies the prior filter and the engine to `layer`.
    pub fn filter_layer<L, S>(self, layer: L) -> Filtered<CommandEchoLayer<L>, F, S>
    where
        S: Subscriber,
        L: Layer<S>,
        F: Filter<S>,
    {
        CommandEchoLayer::new(layer)
            .with_engine(self.engine)
            .with_filter(self.prior)
    }
}

impl<F> CommandEchoFilter<F>
where
    F: Filter<Registry> + Send + Sync + 'static,
{
    /// Installs a global subscriber that formats every event this filter accepts.
    ///
    /// Call once during startup, before any user command can be dispatched.
    /// Fails if a global subscriber is already set.
    pub fn install(self) -> Result<()> {
        self.install_with(tracing_subscriber::fmt::layer())
    }

    /// Installs a global subscriber that hands every accepted event to `layer`.
    pub fn install_with<L>(self, layer: L) -> Result<()>
    where
        L: Layer<Registry> + Send + Sync + 'static,
    {
        let protected_commands = self.engine.protected_commands().len();
        tracing_subscriber::registry()
            .with(self.filter_layer::<L, Registry>(layer))
            .try_init()?;
        tracing::debug!(protected_commands, "command echo filter installed");
        Ok(())
    }
}

fn evaluate_event(engine: &DecisionEngine, event: &Event<'_>) -> Verdict {
    fail_open(|| {
        let mut collector = EventCollector::default();
        event.record(&mut collector);
        collector.evaluate(engine)
    })
}

#[derive(Debug, Default)]
struct EventCollector {
    template: Option<String>,
    arguments: Vec<CapturedArgument>,
}

impl EventCollector {
    fn evaluate(&self, engine: &DecisionEngine) -> Verdict {
        let arguments: Vec<LogArgument<'_>> = self
            .arguments
            .iter()
            .map(CapturedArgument::as_argument)
            .collect();
        engine.evaluate(self.template.as_deref().unwrap_or_default(), &arguments)
    }
}

impl Visit for EventCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            self.template = Some(value.to_owned());
        } else {
            self.arguments.push(CapturedArgument::Text(value.to_owned()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            self.template = Some(format!("{value:?}"));
        } else {
            self.arguments.push(CapturedArgument::Opaque);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tracing::{debug, info, subscriber::with_default};

    use super::*;
    use crate::engine::ProtectedCommandSet;

    // Collects the engine's input for every event it receives.
    #[derive(Clone, Default)]
    struct InspectingLayer {
        seen: Arc<Mutex<Vec<(Option<String>, Vec<CapturedArgument>)>>>,
    }

    impl<S: tracing::Subscriber> Layer<S> for InspectingLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut collector = EventCollector::default();
            event.record(&mut collector);
            self.seen
                .lock()
                .unwrap()
                .push((collector.template, collector.arguments));
        }
    }

    fn inspect(log: impl FnOnce()) -> Vec<(Option<String>, Vec<CapturedArgument>)> {
        let layer = InspectingLayer::default();
        let subscriber = tracing_subscriber::registry().with(layer.clone());
        with_default(subscriber, log);
        layer.seen.lock().unwrap().clone()
    }

    #[test]
    fn message_field_becomes_the_template() {
        let seen = inspect(|| {
            info!(player = "Alice", command = "/help", "{{}} issued server command: {{}}");
        });
        assert_eq!(seen[0].0.as_deref(), Some("{} issued server command: {}"));
    }

    #[test]
    fn fields_keep_declaration_order() {
        let seen = inspect(|| {
            info!(player = "Alice", command = "/help", "{{}} issued server command: {{}}");
        });
        assert_eq!(
            seen[0].1,
            vec![
                CapturedArgument::Text("Alice".into()),
                CapturedArgument::Text("/help".into()),
            ]
        );
    }

    #[test]
    fn formatted_and_numeric_fields_are_opaque() {
        let seen = inspect(|| {
            info!(count = 3, shown = %"y", debugged = ?"z", owned = String::from("x"), "message");
        });
        assert_eq!(
            seen[0].1,
            vec![
                CapturedArgument::Opaque,
                CapturedArgument::Opaque,
                CapturedArgument::Opaque,
                CapturedArgument::Text("x".into()),
            ]
        );
    }

    #[test]
    fn event_without_message_has_no_template() {
        let seen = inspect(|| {
            info!(player = "Alice", command = "/login pw");
        });
        assert_eq!(seen[0].0, None);
    }

    #[test]
    fn collector_without_template_keeps() {
        let collector = EventCollector {
            template: None,
            arguments: vec![
                CapturedArgument::Text("Alice".into()),
                CapturedArgument::Text("/login pw".into()),
            ],
        };
        assert_eq!(
            collector.evaluate(&DecisionEngine::default()),
            Verdict::Keep
        );
    }

    const ISSUED: &str = "{} issued server command: {}";

    fn templates(layer: &InspectingLayer) -> Vec<Option<String>> {
        layer
            .seen
            .lock()
            .unwrap()
            .iter()
            .map(|(template, _)| template.clone())
            .collect()
    }

    #[test]
    fn wrapped_layer_skips_protected_echo() {
        let wrapped = InspectingLayer::default();
        let sibling = InspectingLayer::default();
        let subscriber = tracing_subscriber::registry()
            .with(CommandEchoLayer::new(wrapped.clone()))
            .with(sibling.clone());

        with_default(subscriber, || {
            info!(player = "Alice", command = "/login pw", "{{}} issued server command: {{}}");
            info!(player = "Alice", command = "/help", "{{}} issued server command: {{}}");
        });

        assert_eq!(templates(&wrapped), vec![Some(ISSUED.to_owned())]);
        assert_eq!(templates(&sibling).len(), 2);
    }

    #[test]
    fn filtered_layer_drops_protected_echo() {
        let layer = InspectingLayer::default();
        let subscriber = tracing_subscriber::registry()
            .with(CommandEchoFilter::new().filter_layer(layer.clone()));

        with_default(subscriber, || {
            info!(player = "Alice", command = "/login pw", "{{}} issued server command: {{}}");
            info!(player = "Alice", command = "/reg pw pw", "{{}} issued server command: {{}}");
            info!(player = "Alice", "player left");
        });

        assert_eq!(templates(&layer), vec![Some("player left".to_owned())]);
    }

    #[test]
    fn prior_filter_still_gates_by_level() {
        let layer = InspectingLayer::default();
        let filter = CommandEchoFilter::with_prior(LevelFilter::INFO);
        let subscriber = tracing_subscriber::registry().with(filter.filter_layer(layer.clone()));

        with_default(subscriber, || {
            debug!(player = "Alice", command = "/help", "{{}} issued server command: {{}}");
            info!(player = "Alice", command = "/help", "{{}} issued server command: {{}}");
            info!(player = "Alice", command = "/passwd a b", "{{}} issued server command: {{}}");
        });

        assert_eq!(templates(&layer), vec![Some(ISSUED.to_owned())]);
    }

    #[test]
    fn custom_engine_reaches_the_wrapped_layer() {
        let engine = DecisionEngine::new(ProtectedCommandSet::new(["/pin "]).unwrap());
        let layer = CommandEchoLayer::new(InspectingLayer::default()).with_engine(engine);
        assert_eq!(layer.engine().protected_commands().len(), 1);
        assert!(layer.inner().seen.lock().unwrap().is_empty());
    }
}
