pub mod events;
pub mod logging;
pub mod model;
pub mod options;
pub mod reporter;

pub use events::{EventKind, EventPayload, RunEmitter, RunError};
pub use logging::{LogSink, LogTarget};
pub use model::{Assertion, Collection, HttpRequest, HttpResponse, Item, ResponseSize};
pub use options::{LogOptions, ReporterOptions, RunOptions};
pub use reporter::RunReporter;
