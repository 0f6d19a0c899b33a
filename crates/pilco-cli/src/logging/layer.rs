//! Custom tracing layer for JSONL output.
//!
//! This layer produces machine-parseable JSONL logs on stderr while
//! keeping stdout clean for results.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Fields recorded on a span, inherited by events inside it.
#[derive(Debug, Clone, Default)]
struct SpanFields(Map<String, Value>);

/// A visitor that collects tracing fields into a JSON map.
struct JsonFieldVisitor {
    fields: Map<String, Value>,
    message: Option<String>,
}

impl JsonFieldVisitor {
    fn new() -> Self {
        JsonFieldVisitor {
            fields: Map::new(),
            message: None,
        }
    }

    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for JsonFieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, Value::String(value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(s);
        } else {
            self.insert(field, Value::String(s));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        // JSON has no NaN/inf; keep them readable as strings
        match serde_json::Number::from_f64(value) {
            Some(n) => self.insert(field, Value::Number(n)),
            None => self.insert(field, Value::String(value.to_string())),
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }
}

/// JSONL tracing layer, stderr by default.
pub struct JsonlLayer<W = io::Stderr> {
    writer: Mutex<W>,
}

impl JsonlLayer<io::Stderr> {
    /// Create a new JSONL layer writing to stderr.
    pub fn stderr() -> Self {
        JsonlLayer {
            writer: Mutex::new(io::stderr()),
        }
    }
}

impl<W: Write> JsonlLayer<W> {
    /// Create a new JSONL layer with a custom writer.
    pub fn new(writer: W) -> Self {
        JsonlLayer {
            writer: Mutex::new(writer),
        }
    }
}

impl<S, W> Layer<S> for JsonlLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: Write + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = JsonFieldVisitor::new();
        attrs.record(&mut visitor);

        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(SpanFields(visitor.fields));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let ts = Utc::now();

        // Innermost span wins on key collisions
        let mut span_fields = Map::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope {
                if let Some(fields) = span.extensions().get::<SpanFields>() {
                    for (key, value) in &fields.0 {
                        span_fields.entry(key.clone()).or_insert_with(|| value.clone());
                    }
                }
            }
        }

        let mut visitor = JsonFieldVisitor::new();
        event.record(&mut visitor);

        let metadata = event.metadata();
        let mut obj = Map::new();
        obj.insert("ts".to_string(), Value::String(ts.to_rfc3339()));
        obj.insert(
            "level".to_string(),
            Value::String(metadata.level().as_str().to_ascii_lowercase()),
        );
        obj.insert(
            "event".to_string(),
            Value::String(metadata.target().to_string()),
        );
        if let Some(msg) = visitor.message {
            obj.insert("message".to_string(), Value::String(msg));
        }
        if !span_fields.is_empty() {
            obj.insert("span".to_string(), Value::Object(span_fields));
        }
        if !visitor.fields.is_empty() {
            obj.insert("fields".to_string(), Value::Object(visitor.fields));
        }

        let json = serde_json::to_string(&Value::Object(obj)).unwrap_or_default();
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    struct BufWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for BufWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> Vec<Value> {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let layer = JsonlLayer::new(BufWriter(buffer.clone()));
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, f);

        let output = buffer.lock().unwrap();
        String::from_utf8_lossy(&output)
            .lines()
            .map(|line| serde_json::from_str(line).expect("valid JSON line"))
            .collect()
    }

    #[test]
    fn records_level_message_and_target() {
        let lines = capture(|| {
            tracing::info!(target: "pilco.test", message = "hello");
        });
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "info");
        assert_eq!(lines[0]["message"], "hello");
        assert_eq!(lines[0]["event"], "pilco.test");
        assert!(lines[0]["ts"].is_string());
    }

    #[test]
    fn records_typed_fields() {
        let lines = capture(|| {
            tracing::warn!(dimension = 4u64, cost = 0.25, finite = true, "evaluated");
        });
        assert_eq!(lines[0]["level"], "warn");
        assert_eq!(lines[0]["fields"]["dimension"], 4);
        assert_eq!(lines[0]["fields"]["cost"], 0.25);
        assert_eq!(lines[0]["fields"]["finite"], true);
    }

    #[test]
    fn non_finite_floats_become_strings() {
        let lines = capture(|| {
            tracing::warn!(cost = f64::NAN, "bad");
        });
        assert_eq!(lines[0]["fields"]["cost"], "NaN");
    }

    #[test]
    fn events_inherit_span_fields() {
        let lines = capture(|| {
            let outer = tracing::info_span!("command", command = "eval", index = 1u64);
            let _outer = outer.enter();
            let inner = tracing::info_span!("belief", index = 2u64);
            let _inner = inner.enter();
            tracing::info!("inside");
        });
        assert_eq!(lines[0]["span"]["command"], "eval");
        assert_eq!(lines[0]["span"]["index"], 2);
    }
}
