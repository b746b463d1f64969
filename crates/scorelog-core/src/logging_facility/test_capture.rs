//! In-memory event capture for log assertions in tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use scorelog_core_types::schema::{FIELD_COMPONENT, FIELD_EVENT, FIELD_OP};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event. Every field is kept as text; `op`, `event` and
/// `component` are lifted out for filtering.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn record(event: &Event<'_>) -> Self {
        let mut fields = FieldText::default();
        event.record(&mut fields);
        let fields = fields.0;

        Self {
            level: *event.metadata().level(),
            component: fields.get(FIELD_COMPONENT).cloned(),
            op: fields.get(FIELD_OP).cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            fields,
        }
    }

    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }
}

/// Strings are stored bare; everything else through its `Debug` form,
/// which for integers and bools is the plain value.
#[derive(Default)]
struct FieldText(HashMap<String, String>);

impl Visit for FieldText {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

type Buffer = Arc<Mutex<Vec<CapturedEvent>>>;

/// Layer appending every event to a shared buffer.
pub struct TestCaptureLayer {
    buffer: Buffer,
}

impl TestCaptureLayer {
    pub fn new() -> (Self, TestCapture) {
        let buffer = Buffer::default();
        (
            Self {
                buffer: buffer.clone(),
            },
            TestCapture { buffer },
        )
    }
}

impl<S: Subscriber> Layer<S> for TestCaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let captured = CapturedEvent::record(event);
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(captured);
        }
    }
}

/// Read side of the capture buffer.
#[derive(Clone)]
pub struct TestCapture {
    buffer: Buffer,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.buffer
            .lock()
            .map(|buffer| buffer.clone())
            .unwrap_or_default()
    }

    /// Events emitted for one operation, in emission order
    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.op.as_deref() == Some(op))
            .collect()
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber (first call only)
/// and return a handle to it.
///
/// All tests in one binary share the buffer, so filter on an op name the
/// test owns.
///
/// ```
/// use scorelog_core::logging_facility::test_capture::init_test_capture;
/// use scorelog_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_submit_report", partition = "2024-03");
///
/// let events = capture.events_for_op("doc_submit_report");
/// assert!(events[0].is("doc_submit_report", "start"));
/// assert_eq!(events[0].fields["partition"], "2024-03");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCaptureLayer::new();
            tracing_subscriber::registry().with(layer).try_init().ok();
            capture
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture_locally(emit: impl FnOnce()) -> TestCapture {
        let (layer, capture) = TestCaptureLayer::new();
        tracing::subscriber::with_default(tracing_subscriber::registry().with(layer), emit);
        capture
    }

    #[test]
    fn test_layer_records_into_shared_buffer() {
        let capture = capture_locally(|| {
            tracing::info!(op = "local_op", event = "start", partition = "2024-03");
        });

        let events = capture.events_for_op("local_op");
        assert_eq!(events.len(), 1);
        assert!(events[0].is("local_op", "start"));
        assert_eq!(
            events[0].fields.get("partition").map(String::as_str),
            Some("2024-03")
        );
    }

    #[test]
    fn test_numeric_and_bool_fields_are_plain_text() {
        let capture = capture_locally(|| {
            tracing::warn!(op = "typed_op", row_count = 3u64, report_id = -1i64, is_add = false);
        });

        let events = capture.events_for_op("typed_op");
        assert_eq!(events[0].level, Level::WARN);
        assert_eq!(events[0].fields["row_count"], "3");
        assert_eq!(events[0].fields["report_id"], "-1");
        assert_eq!(events[0].fields["is_add"], "false");
    }

    #[test]
    fn test_count_events_filters_by_predicate() {
        let capture = capture_locally(|| {
            tracing::info!(op = "counted", event = "start");
            tracing::info!(op = "counted", event = "end");
            tracing::info!(op = "other", event = "end");
        });

        assert_eq!(capture.count_events(|e| e.is("counted", "end")), 1);
        assert_eq!(capture.count_events(|e| e.event.as_deref() == Some("end")), 2);
    }
}
