// Run-lifecycle events - named events emitted by the execution engine
// The reporter subscribes by name at construction; dispatch is synchronous
// and single-threaded, handlers run in registration order.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Assertion, HttpRequest, HttpResponse, Item};

/// Lifecycle event names recognized by the reporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Start,
    BeforeItem,
    BeforeRequest,
    Request,
    Script,
    Assertion,
    Done,
}

impl EventKind {
    /// All recognized events, in the order a well-behaved run emits them
    pub const ALL: [EventKind; 7] = [
        EventKind::Start,
        EventKind::BeforeItem,
        EventKind::BeforeRequest,
        EventKind::Request,
        EventKind::Script,
        EventKind::Assertion,
        EventKind::Done,
    ];

    /// Subscribe-by-name spelling used by the engine
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Start => "start",
            EventKind::BeforeItem => "beforeItem",
            EventKind::BeforeRequest => "beforeRequest",
            EventKind::Request => "request",
            EventKind::Script => "script",
            EventKind::Assertion => "assertion",
            EventKind::Done => "done",
        }
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(EventKind::Start),
            "beforeItem" => Ok(EventKind::BeforeItem),
            "beforeRequest" => Ok(EventKind::BeforeRequest),
            "request" => Ok(EventKind::Request),
            "script" => Ok(EventKind::Script),
            "assertion" => Ok(EventKind::Assertion),
            "done" => Ok(EventKind::Done),
            other => Err(format!("unknown lifecycle event: {}", other)),
        }
    }
}

/// Upstream-reported error delivered as the first handler argument
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct RunError {
    pub message: String,
}

impl RunError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Event-specific payload; absent fields mean "nothing to report"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    pub item: Option<Item>,
    pub request: Option<HttpRequest>,
    pub response: Option<HttpResponse>,
    pub assertion: Option<Assertion>,
}

impl EventPayload {
    /// Empty payload, for events that carry nothing (start, done)
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Handler invoked with the optional upstream error and the event payload
pub type Handler = Box<dyn FnMut(Option<&RunError>, &EventPayload) + Send>;

/// Handler table keyed by event name
///
/// Stands in for the engine's emitter in tests and embeddings; handlers are
/// registered once and never removed.
#[derive(Default)]
pub struct RunEmitter {
    handlers: HashMap<EventKind, Vec<Handler>>,
}

impl RunEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an event
    pub fn on(&mut self, kind: EventKind, handler: Handler) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Invoke every handler registered for the event, in registration order
    pub fn emit(&mut self, kind: EventKind, error: Option<&RunError>, payload: &EventPayload) {
        if let Some(handlers) = self.handlers.get_mut(&kind) {
            for handler in handlers.iter_mut() {
                handler(error, payload);
            }
        }
    }

    /// Number of handlers registered for an event
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map(Vec::len).unwrap_or(0)
    }

    /// Whether any handler is registered for an event
    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.handler_count(kind) > 0
    }

    /// Total handlers across all events
    pub fn total_handlers(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }
}
