//! Global installation of the tracing adapter.
//!
//! Installing sets process-wide state, so this lives in its own test binary
//! and runs as a single test.

#![cfg(feature = "tracing")]

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use command_echo_filter::{Error, tracing::CommandEchoFilter};
use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{Layer, layer::Context};

// A layer that captures the rendered message of every event it receives.
#[derive(Clone, Default)]
struct CaptureLayer {
    messages: Arc<Mutex<Vec<String>>>,
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.messages.lock().unwrap().push(visitor.0);
    }
}

#[test]
fn installs_once_per_process() {
    let capture = CaptureLayer::default();
    CommandEchoFilter::new()
        .install_with(capture.clone())
        .expect("first install should succeed");

    tracing::info!(player = "Alice", command = "/help", "{{}} issued server command: {{}}");
    tracing::info!(player = "Alice", command = "/login pw", "{{}} issued server command: {{}}");

    assert_eq!(
        *capture.messages.lock().unwrap(),
        vec![
            "command echo filter installed",
            "{} issued server command: {}",
        ]
    );

    let err = CommandEchoFilter::new().install().unwrap_err();
    assert!(matches!(err, Error::Install(_)));
    assert_eq!(err.to_string(), "failed to install the global tracing subscriber");
}
