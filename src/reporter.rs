// Run reporter - translates lifecycle events into log lines
// One reporter instance observes exactly one run; it never mutates the run,
// the collection, or any payload it receives.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

use crate::events::{EventKind, RunEmitter};
use crate::logging::LogSink;
use crate::options::{ReporterOptions, RunOptions};

/// Structured record logged for each completed request
#[derive(Debug, Serialize)]
struct ResponseRecord {
    code: u16,
    reason: String,
    size: u64,
    time: u64,
}

/// State shared by every registered handler
struct ReporterState {
    sink: LogSink,
    /// Resolved once at construction: collection name, else id
    label: Option<String>,
    /// Set to 1 on `start`, incremented once per processed assertion
    count: AtomicUsize,
    no_success_assertions: bool,
}

impl ReporterState {
    fn label_text(&self) -> &str {
        self.label.as_deref().unwrap_or("(unnamed collection)")
    }
}

/// Lifecycle reporter for a single collection run
///
/// Registers its handlers against the emitter at construction and does
/// nothing afterwards except react to events. When either silence flag is
/// set the reporter registers nothing at all and stays inert for its whole
/// lifetime.
pub struct RunReporter {
    state: Option<Arc<ReporterState>>,
}

impl RunReporter {
    /// Build the reporter and subscribe it to the run-lifecycle source
    pub fn attach(
        emitter: &mut RunEmitter,
        options: ReporterOptions,
        run_options: &RunOptions,
    ) -> Self {
        // Respect the silent option: no sink, no subscriptions
        if options.silent || run_options.silent {
            return Self { state: None };
        }

        let state = Arc::new(ReporterState {
            sink: LogSink::new(&options.log_options()),
            label: run_options.collection.label().map(str::to_string),
            count: AtomicUsize::new(1),
            no_success_assertions: options.no_success_assertions,
        });

        {
            let state = Arc::clone(&state);
            emitter.on(
                EventKind::Start,
                Box::new(move |_, _| {
                    state
                        .sink
                        .info(&format!("run started for collection: {}", state.label_text()));
                    state.count.store(1, Ordering::SeqCst);
                }),
            );
        }

        {
            let state = Arc::clone(&state);
            emitter.on(
                EventKind::BeforeItem,
                Box::new(move |err, payload| {
                    if err.is_some() {
                        return;
                    }
                    if let Some(item) = &payload.item {
                        state.sink.info(&format!("run {}", item.name));
                    }
                }),
            );
        }

        {
            let state = Arc::clone(&state);
            emitter.on(
                EventKind::BeforeRequest,
                Box::new(move |err, payload| {
                    if err.is_some() {
                        return;
                    }
                    if let Some(request) = &payload.request {
                        state
                            .sink
                            .info(&format!("{} {}", request.method, request.url));
                    }
                }),
            );
        }

        {
            let state = Arc::clone(&state);
            emitter.on(
                EventKind::Request,
                Box::new(move |err, payload| {
                    if let Some(err) = err {
                        state.sink.error(&err.message);
                        return;
                    }

                    if let Some(response) = &payload.response {
                        let record = ResponseRecord {
                            code: response.code,
                            reason: response.reason.clone(),
                            size: response.transferred_size(),
                            time: response.response_time_ms,
                        };
                        if let Ok(line) = serde_json::to_string(&record) {
                            state.sink.info(&line);
                        }
                    }
                }),
            );
        }

        // Reserved; must neither log nor fail
        emitter.on(EventKind::Script, Box::new(|_, _| {}));

        if !options.no_assertions {
            let state = Arc::clone(&state);
            emitter.on(
                EventKind::Assertion,
                Box::new(move |err, payload| {
                    let count = state.count.load(Ordering::SeqCst);
                    let item_name = payload.item.as_ref().map(|item| item.name.as_str());

                    if let Some(err) = err {
                        if let (Some(assertion), Some(item_name)) = (&payload.assertion, item_name)
                        {
                            state.sink.error(&format!(
                                "[ASSERTION FAILED] [{} / {}]: \"{}\" {}",
                                count, item_name, assertion.description, err.message
                            ));
                        }
                    } else if let Some(assertion) = &payload.assertion {
                        if !state.no_success_assertions {
                            if assertion.skipped {
                                state
                                    .sink
                                    .info(&format!("[ASSERTION SKIPPED] {}", assertion.description));
                            } else if let Some(item_name) = item_name {
                                state.sink.info(&format!(
                                    "[ASSERTION PASSED] [{} / {}]: \"{}\"",
                                    count, item_name, assertion.description
                                ));
                            }
                        }
                    }

                    // Counts assertions processed, not messages logged
                    state.count.fetch_add(1, Ordering::SeqCst);
                }),
            );
        }

        {
            let state = Arc::clone(&state);
            emitter.on(
                EventKind::Done,
                Box::new(move |_, _| {
                    state.sink.info(&format!(
                        "run completed for collection: {}, {} tests executed",
                        state.label_text(),
                        state.count.load(Ordering::SeqCst)
                    ));
                }),
            );
        }

        Self { state: Some(state) }
    }

    /// False when the reporter was silenced at construction
    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Current counter value; 0 for a silenced reporter
    pub fn assertion_count(&self) -> usize {
        self.state
            .as_ref()
            .map(|state| state.count.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventPayload, RunError};
    use crate::logging::LogTarget;
    use crate::model::{Assertion, Collection, Item};
    use std::sync::Mutex;

    fn memory_options() -> (ReporterOptions, Arc<Mutex<Vec<u8>>>) {
        let (target, buffer) = LogTarget::memory();
        let options = ReporterOptions {
            targets: Some(vec![target]),
            ..Default::default()
        };
        (options, buffer)
    }

    fn captured(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn test_silent_reporter_registers_nothing() {
        let mut emitter = RunEmitter::new();
        let (options, buffer) = memory_options();
        let options = ReporterOptions {
            silent: true,
            ..options
        };
        let run_options = RunOptions::for_collection(Collection::named("Suite A"));

        let reporter = RunReporter::attach(&mut emitter, options, &run_options);

        assert!(!reporter.is_active());
        assert_eq!(emitter.total_handlers(), 0);

        emitter.emit(EventKind::Start, None, &EventPayload::empty());
        assert!(captured(&buffer).is_empty());
    }

    #[test]
    fn test_run_options_silent_wins() {
        let mut emitter = RunEmitter::new();
        let (options, _buffer) = memory_options();
        let run_options = RunOptions {
            collection: Collection::named("Suite A"),
            silent: true,
        };

        let reporter = RunReporter::attach(&mut emitter, options, &run_options);

        assert!(!reporter.is_active());
        assert_eq!(emitter.total_handlers(), 0);
    }

    #[test]
    fn test_no_assertions_skips_subscription() {
        let mut emitter = RunEmitter::new();
        let (options, buffer) = memory_options();
        let options = ReporterOptions {
            no_assertions: true,
            ..options
        };
        let run_options = RunOptions::for_collection(Collection::named("Suite A"));

        let reporter = RunReporter::attach(&mut emitter, options, &run_options);

        assert!(!emitter.is_subscribed(EventKind::Assertion));

        // Emitting anyway must not move the counter or log anything
        let payload = EventPayload {
            item: Some(Item::new("Login")),
            assertion: Some(Assertion::new("status is 200")),
            ..Default::default()
        };
        emitter.emit(EventKind::Start, None, &EventPayload::empty());
        emitter.emit(EventKind::Assertion, None, &payload);

        assert_eq!(reporter.assertion_count(), 1);
        assert!(!captured(&buffer).contains("ASSERTION"));
    }

    #[test]
    fn test_script_event_is_silent() {
        let mut emitter = RunEmitter::new();
        let (options, buffer) = memory_options();
        let run_options = RunOptions::for_collection(Collection::named("Suite A"));

        let _reporter = RunReporter::attach(&mut emitter, options, &run_options);

        assert!(emitter.is_subscribed(EventKind::Script));
        emitter.emit(EventKind::Script, None, &EventPayload::empty());
        emitter.emit(
            EventKind::Script,
            Some(&RunError::new("script blew up")),
            &EventPayload::empty(),
        );

        assert!(captured(&buffer).is_empty());
    }

    #[test]
    fn test_counter_increments_even_when_suppressed() {
        let mut emitter = RunEmitter::new();
        let (options, buffer) = memory_options();
        let options = ReporterOptions {
            no_success_assertions: true,
            ..options
        };
        let run_options = RunOptions::for_collection(Collection::named("Suite A"));

        let reporter = RunReporter::attach(&mut emitter, options, &run_options);

        emitter.emit(EventKind::Start, None, &EventPayload::empty());
        let payload = EventPayload {
            item: Some(Item::new("Login")),
            assertion: Some(Assertion::new("status is 200")),
            ..Default::default()
        };
        emitter.emit(EventKind::Assertion, None, &payload);
        emitter.emit(EventKind::Assertion, None, &payload);

        assert_eq!(reporter.assertion_count(), 3);
        assert!(!captured(&buffer).contains("ASSERTION PASSED"));
    }

    #[test]
    fn test_missing_payload_fields_do_not_panic() {
        let mut emitter = RunEmitter::new();
        let (options, buffer) = memory_options();
        let run_options = RunOptions::for_collection(Collection::named("Suite A"));

        let reporter = RunReporter::attach(&mut emitter, options, &run_options);

        // Empty payloads everywhere: nothing to report, nothing to crash on
        emitter.emit(EventKind::BeforeItem, None, &EventPayload::empty());
        emitter.emit(EventKind::BeforeRequest, None, &EventPayload::empty());
        emitter.emit(EventKind::Request, None, &EventPayload::empty());
        emitter.emit(EventKind::Assertion, None, &EventPayload::empty());

        // The bare assertion still counts as processed
        assert_eq!(reporter.assertion_count(), 2);
        assert!(captured(&buffer).is_empty());
    }
}
