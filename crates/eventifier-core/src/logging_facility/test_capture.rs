//! In-memory log capture for tests
//!
//! One global layer records every event as a flat field map. Runs are
//! distinguished by their `run_id` field, operations by `op`.

use eventifier_core_types::schema::{EVENT_END, EVENT_END_ERROR};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub op: Option<String>,
    pub event: Option<String>,
    /// Every field including `op`, `event` and `message`, rendered as text
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    fn from_fields(level: Level, fields: BTreeMap<String, String>) -> Self {
        Self {
            level,
            op: fields.get("op").cloned(),
            event: fields.get("event").cloned(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }
}

struct Fields(BTreeMap<String, String>);

impl Fields {
    fn put(&mut self, field: &Field, value: String) {
        self.0.insert(field.name().to_string(), value);
    }
}

impl Visit for Fields {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.put(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }
}

type Sink = Arc<Mutex<Vec<CapturedEvent>>>;

struct CaptureLayer(Sink);

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields(BTreeMap::new());
        event.record(&mut fields);
        let captured = CapturedEvent::from_fields(*event.metadata().level(), fields.0);
        if let Ok(mut events) = self.0.lock() {
            events.push(captured);
        }
    }
}

/// Shared view of everything captured so far
#[derive(Clone)]
pub struct TestCapture(Sink);

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.0.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn matching(&self, keep: impl Fn(&CapturedEvent) -> bool) -> Vec<CapturedEvent> {
        self.events().into_iter().filter(|e| keep(e)).collect()
    }

    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.matching(|e| e.op.as_deref() == Some(op))
    }

    /// Events stamped with `run_id`, in emission order
    pub fn events_for_run(&self, run_id: &str) -> Vec<CapturedEvent> {
        self.matching(|e| e.field("run_id") == Some(run_id))
    }

    /// The `end` or `end_error` event closing `op`, if any
    pub fn last_outcome(&self, op: &str) -> Option<CapturedEvent> {
        self.events_for_op(op).into_iter().rev().find(|e| {
            matches!(e.event.as_deref(), Some(ev) if ev == EVENT_END || ev == EVENT_END_ERROR)
        })
    }

    /// # Panics
    ///
    /// Panics if no event with this `op`/`event` pair was captured
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events.iter().any(|e| e.is(op, event)),
            "no {}/{} event among {} captured",
            op,
            event,
            events.len()
        );
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.0.lock() {
            events.clear();
        }
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber (first call only).
///
/// Every test shares the same capture; filter on an op name or run id that
/// is unique to the test.
///
/// ```
/// use eventifier_core::logging_facility::test_capture::init_test_capture;
/// use eventifier_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_capture_op");
/// capture.assert_event_exists("doc_capture_op", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let sink: Sink = Arc::new(Mutex::new(Vec::new()));
            tracing_subscriber::registry()
                .with(CaptureLayer(sink.clone()))
                .init();
            TestCapture(sink)
        })
        .clone()
}
