//! In-memory event capture for log assertions in tests
//!
//! The capture subscriber is process-global. Tests that run in parallel
//! should filter on a watch name or cycle id of their own.

use crate::core_types::schema::{
    FIELD_COMPONENT, FIELD_CYCLE_ID, FIELD_EVENT, FIELD_OP, FIELD_WATCH_NAME,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event, fields rendered as strings
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// True for the `op` / `event` pair written by the `log_op_*` macros
    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }
}

#[derive(Default)]
struct Fields(HashMap<String, String>);

impl Visit for Fields {
    // Strings are stored unquoted; everything else uses its Debug form,
    // which for integers and bools matches Display.
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

type Buffer = Arc<Mutex<Vec<CapturedEvent>>>;

struct CaptureLayer {
    buffer: Buffer,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);
        let Fields(fields) = fields;

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            component: fields.get(FIELD_COMPONENT).cloned(),
            op: fields.get(FIELD_OP).cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            fields,
        };
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(captured);
        }
    }
}

/// Read handle on the captured events
#[derive(Clone)]
pub struct TestCapture {
    buffer: Buffer,
}

impl TestCapture {
    /// Every event captured so far, in emission order
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.buffer
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Events whose field `name` equals `value`
    pub fn events_with_field(&self, name: &str, value: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.field(name) == Some(value))
            .collect()
    }

    /// `op` / `event` markers logged for one watch target
    pub fn markers_for(&self, watch_name: &str, op: &str, event: &str) -> Vec<CapturedEvent> {
        self.events_with_field(FIELD_WATCH_NAME, watch_name)
            .into_iter()
            .filter(|e| e.is(op, event))
            .collect()
    }

    /// Everything logged under one cycle id
    pub fn cycle_events(&self, cycle_id: &str) -> Vec<CapturedEvent> {
        self.events_with_field(FIELD_CYCLE_ID, cycle_id)
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture subscriber (first call only) and return its handle
///
/// # Example
///
/// ```
/// use pagewatch_core::logging_facility::test_capture::init_test_capture;
/// use pagewatch_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("watch_cycle", watch_name = "doc-example");
/// assert_eq!(capture.markers_for("doc-example", "watch_cycle", "start").len(), 1);
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let buffer = Buffer::default();
            tracing_subscriber::registry()
                .with(CaptureLayer {
                    buffer: Arc::clone(&buffer),
                })
                .init();
            TestCapture { buffer }
        })
        .clone()
}
