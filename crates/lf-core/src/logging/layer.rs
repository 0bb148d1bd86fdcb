//! Custom tracing layer for JSONL output.
//!
//! This layer produces machine-parseable JSONL logs on stderr while
//! keeping stdout clean for the report payload.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::Utc;
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use super::events::Level;

/// Keys lifted to the top level of each JSON line instead of `fields`.
const CONTEXT_KEYS: [&str; 3] = ["run_id", "input", "stage"];

/// Storage for span context data.
#[derive(Debug, Clone, Default)]
struct SpanContext {
    run_id: Option<String>,
    input: Option<String>,
    stage: Option<String>,
}

impl SpanContext {
    fn set(&mut self, name: &str, value: String) {
        match name {
            "run_id" => self.run_id = Some(value),
            "input" => self.input = Some(value),
            "stage" => self.stage = Some(value),
            _ => {}
        }
    }

    fn fill_from(&mut self, other: &SpanContext) {
        if self.run_id.is_none() {
            self.run_id.clone_from(&other.run_id);
        }
        if self.input.is_none() {
            self.input.clone_from(&other.input);
        }
        if self.stage.is_none() {
            self.stage.clone_from(&other.stage);
        }
    }
}

/// A visitor that extracts field values from tracing events.
struct JsonFieldVisitor {
    context: SpanContext,
    fields: serde_json::Map<String, serde_json::Value>,
    message: Option<String>,
}

impl JsonFieldVisitor {
    fn new() -> Self {
        JsonFieldVisitor {
            context: SpanContext::default(),
            fields: serde_json::Map::new(),
            message: None,
        }
    }

    fn insert_string(&mut self, name: &str, value: String) {
        if name == "message" {
            self.message = Some(value);
        } else if CONTEXT_KEYS.contains(&name) {
            self.context.set(name, value);
        } else {
            self.fields
                .insert(name.to_string(), serde_json::Value::String(value));
        }
    }
}

impl tracing::field::Visit for JsonFieldVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.insert_string(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.insert_string(field.name(), format!("{:?}", value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields.insert(
            field.name().to_string(),
            serde_json::Value::Number(value.into()),
        );
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields.insert(
            field.name().to_string(),
            serde_json::Value::Number(serde_json::Number::from(value)),
        );
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        let v = serde_json::Number::from_f64(value)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| serde_json::Value::String(value.to_string()));
        self.fields.insert(field.name().to_string(), v);
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields
            .insert(field.name().to_string(), serde_json::Value::Bool(value));
    }
}

/// A visitor for extracting span context.
struct SpanContextVisitor {
    context: SpanContext,
}

impl tracing::field::Visit for SpanContextVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.context.set(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.context.set(field.name(), format!("{:?}", value));
    }
}

/// JSONL tracing layer that outputs to stderr.
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
        let mut visitor = SpanContextVisitor {
            context: SpanContext::default(),
        };
        attrs.record(&mut visitor);

        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(visitor.context);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let ts = Utc::now();

        // Event fields take precedence over enclosing spans.
        let mut visitor = JsonFieldVisitor::new();
        event.record(&mut visitor);

        let mut context = visitor.context.clone();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope {
                if let Some(span_ctx) = span.extensions().get::<SpanContext>() {
                    context.fill_from(span_ctx);
                }
            }
        }

        let level: Level = (*event.metadata().level()).into();
        let mut obj = serde_json::Map::new();

        obj.insert("ts".to_string(), serde_json::json!(ts.to_rfc3339()));
        obj.insert("level".to_string(), serde_json::json!(level));
        obj.insert(
            "event".to_string(),
            serde_json::json!(event.metadata().target()),
        );

        if let Some(id) = context.run_id {
            obj.insert("run_id".to_string(), serde_json::json!(id));
        }
        if let Some(s) = context.stage {
            obj.insert("stage".to_string(), serde_json::json!(s));
        }
        if let Some(input) = context.input {
            obj.insert("input".to_string(), serde_json::json!(input));
        }
        if let Some(msg) = visitor.message {
            obj.insert("message".to_string(), serde_json::json!(msg));
        }
        if !visitor.fields.is_empty() {
            obj.insert(
                "fields".to_string(),
                serde_json::Value::Object(visitor.fields),
            );
        }

        let json = serde_json::to_string(&serde_json::Value::Object(obj)).unwrap_or_default();
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

    fn capture(f: impl FnOnce()) -> Vec<serde_json::Value> {
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
    fn layer_records_level_message_and_target() {
        let lines = capture(|| {
            tracing::warn!(target: "transform.unmapped_level", message = "unmapped");
        });
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "warn");
        assert_eq!(lines[0]["event"], "transform.unmapped_level");
        assert_eq!(lines[0]["message"], "unmapped");
        assert!(lines[0]["ts"].is_string());
    }

    #[test]
    fn layer_lifts_context_fields() {
        let lines = capture(|| {
            tracing::info!(
                target: "fit.finished",
                run_id = "lf-20260115-143022-a7xq",
                stage = "fit",
                groups = 3u64,
                slope = 2.5,
                saturated = false,
                message = "fit done"
            );
        });
        let line = &lines[0];
        assert_eq!(line["run_id"], "lf-20260115-143022-a7xq");
        assert_eq!(line["stage"], "fit");
        assert_eq!(line["fields"]["groups"], 3);
        assert_eq!(line["fields"]["slope"], 2.5);
        assert_eq!(line["fields"]["saturated"], false);
        assert!(line["fields"].get("run_id").is_none());
    }

    #[test]
    fn layer_inherits_span_context() {
        let lines = capture(|| {
            let span = tracing::info_span!("run", run_id = "lf-span", input = "data.csv");
            let _enter = span.enter();
            tracing::info!(target: "load.started", stage = "load", message = "loading");
        });
        let line = &lines[0];
        assert_eq!(line["run_id"], "lf-span");
        assert_eq!(line["input"], "data.csv");
        assert_eq!(line["stage"], "load");
    }

    #[test]
    fn non_finite_floats_stay_representable() {
        let lines = capture(|| {
            tracing::info!(target: "fit.finished", t_value = f64::INFINITY, message = "inf");
        });
        assert_eq!(lines[0]["fields"]["t_value"], "inf");
    }
}
